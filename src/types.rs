use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::Error;

pub const API_VERSION_HEADER: &str = "X-Broker-API-Version";
pub const API_INFO_LOCATION_HEADER: &str = "X-Api-Info-Location";
pub const ORIGINATING_IDENTITY_HEADER: &str = "X-Broker-API-Originating-Identity";
pub const REQUEST_IDENTITY_HEADER: &str = "X-Broker-API-Request-Identity";

/// Configured version value that accepts any `X-Broker-API-Version` header.
pub const API_VERSION_ANY: &str = "*";

/// Identity of the platform user that triggered a request.
///
/// Decoded from `X-Broker-API-Originating-Identity: <platform> <base64 json>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginatingIdentity {
    /// Platform name, e.g. `cloudfoundry` or `kubernetes`.
    pub platform: String,
    /// Decoded identity properties.
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl OriginatingIdentity {
    pub fn parse_header(header: &str) -> Result<Self, Error> {
        let (platform, encoded) =
            header
                .trim()
                .split_once(' ')
                .ok_or_else(|| Error::InvalidOriginatingIdentity {
                    reason: "expected a platform and an encoded value separated by a space".into(),
                })?;

        let decoded =
            STANDARD
                .decode(encoded.trim())
                .map_err(|e| Error::InvalidOriginatingIdentity {
                    reason: format!("value is not valid base64: {e}"),
                })?;

        let value: serde_json::Value =
            serde_json::from_slice(&decoded).map_err(|e| Error::InvalidOriginatingIdentity {
                reason: format!("value is not valid JSON: {e}"),
            })?;

        let serde_json::Value::Object(properties) = value else {
            return Err(Error::InvalidOriginatingIdentity {
                reason: "value is not a JSON object".into(),
            });
        };

        Ok(Self {
            platform: platform.to_string(),
            properties,
        })
    }

    pub fn to_header(&self) -> String {
        let json = serde_json::Value::Object(self.properties.clone()).to_string();
        format!("{} {}", self.platform, STANDARD.encode(json))
    }
}

/// Platform-supplied request metadata shared by every lifecycle request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Platform instance segment of the request path, for multi-platform brokers.
    pub platform_instance_id: Option<String>,
    pub api_info_location: Option<String>,
    pub api_version: Option<String>,
    pub request_identity: Option<String>,
    pub originating_identity: Option<OriginatingIdentity>,
}

impl RequestContext {
    /// Builds a context from raw header values. Only the originating identity
    /// is parsed; an invalid value fails the whole request.
    pub fn from_headers(
        platform_instance_id: Option<&str>,
        api_version: Option<&str>,
        api_info_location: Option<&str>,
        originating_identity: Option<&str>,
        request_identity: Option<&str>,
    ) -> Result<Self, Error> {
        let originating_identity = originating_identity
            .map(OriginatingIdentity::parse_header)
            .transpose()?;

        Ok(Self {
            platform_instance_id: platform_instance_id.map(str::to_string),
            api_info_location: api_info_location.map(str::to_string),
            api_version: api_version.map(str::to_string),
            request_identity: request_identity.map(str::to_string),
            originating_identity,
        })
    }

    /// Same as [`RequestContext::from_headers`], reading the broker headers
    /// through `header`. The lookup receives the canonical header names.
    pub fn from_header_lookup<'a, F>(
        platform_instance_id: Option<&str>,
        header: F,
    ) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        Self::from_headers(
            platform_instance_id,
            header(API_VERSION_HEADER),
            header(API_INFO_LOCATION_HEADER),
            header(ORIGINATING_IDENTITY_HEADER),
            header(REQUEST_IDENTITY_HEADER),
        )
    }
}

/// Rejects a request whose API version does not match the configured one.
///
/// `expected = None` or [`API_VERSION_ANY`] accepts everything, including a
/// missing header.
pub fn check_api_version(expected: Option<&str>, provided: Option<&str>) -> Result<(), Error> {
    match expected {
        None | Some(API_VERSION_ANY) => Ok(()),
        Some(expected) if provided == Some(expected) => Ok(()),
        Some(expected) => Err(Error::ApiVersionMismatch {
            expected: expected.to_string(),
            provided: provided.map(str::to_string),
        }),
    }
}
