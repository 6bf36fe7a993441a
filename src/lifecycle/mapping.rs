use crate::error::{Error, ErrorKind, ErrorMessage};
use crate::lifecycle::{LifecycleResponse, Outcome};

/// Description returned for failures whose message must not reach the platform.
pub const GENERIC_ERROR_DESCRIPTION: &str = "Internal error while processing the request";

/// Canonical mapping from [`ErrorKind`] to [`Outcome`].
///
/// `OperationInProgress` maps to `NotFound`: the protocol hides in-progress
/// resources from reads until the operation finishes.
pub fn error_kind_to_outcome(kind: ErrorKind) -> Outcome {
    match kind {
        ErrorKind::ServiceInstanceDoesNotExist
        | ErrorKind::ServiceInstanceBindingDoesNotExist
        | ErrorKind::ServiceDefinitionDoesNotExist
        | ErrorKind::ServiceDefinitionPlanDoesNotExist
        | ErrorKind::AsyncRequired
        | ErrorKind::InvalidParameters
        | ErrorKind::BindingRequiresApp
        | ErrorKind::Concurrency
        | ErrorKind::InvalidOriginatingIdentity
        | ErrorKind::InstanceUpdateNotSupported => Outcome::UnprocessableEntity,
        ErrorKind::ServiceInstanceExists | ErrorKind::ServiceInstanceBindingExists => {
            Outcome::Conflict
        }
        ErrorKind::OperationInProgress => Outcome::NotFound,
        ErrorKind::ApiVersionMismatch => Outcome::PreconditionFailed,
        ErrorKind::Unavailable => Outcome::ServiceUnavailable,
        ErrorKind::Validation | ErrorKind::Json => Outcome::BadRequest,
        ErrorKind::Broker | ErrorKind::Config | ErrorKind::Unexpected => {
            Outcome::InternalServerError
        }
    }
}

pub fn error_to_outcome(error: &Error) -> Outcome {
    error_kind_to_outcome(error.kind())
}

/// Body for a failed request. Failures outside the broker taxonomy get a
/// generic description.
pub fn error_to_message(error: &Error) -> ErrorMessage {
    match error.kind() {
        ErrorKind::Unexpected | ErrorKind::Config => ErrorMessage::new(GENERIC_ERROR_DESCRIPTION),
        _ => error.error_message(),
    }
}

impl LifecycleResponse {
    /// Translates a failure into the response the platform sees, logging it
    /// at the severity its kind calls for.
    pub fn from_error(error: &Error) -> Self {
        let outcome = error_to_outcome(error);
        match error.kind() {
            ErrorKind::Unexpected | ErrorKind::Config => {
                tracing::error!(error = %error, "unknown error handled");
            }
            ErrorKind::InvalidOriginatingIdentity | ErrorKind::Validation | ErrorKind::Json => {
                tracing::error!(error = %error, outcome = %outcome, "unprocessable request received");
            }
            _ => {
                tracing::debug!(error = %error, outcome = %outcome, "request failed");
            }
        }

        let body = serde_json::to_value(error_to_message(error)).unwrap_or_else(|_| {
            serde_json::json!({ "description": GENERIC_ERROR_DESCRIPTION })
        });
        Self::new(outcome, Some(body))
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    fn description(response: &LifecycleResponse) -> String {
        response.body.as_ref().unwrap()["description"]
            .as_str()
            .unwrap()
            .to_string()
    }

    #[test]
    fn error_kind_to_outcome_covers_all_variants() {
        let expected = [
            (ErrorKind::ServiceInstanceDoesNotExist, Outcome::UnprocessableEntity),
            (ErrorKind::ServiceInstanceExists, Outcome::Conflict),
            (ErrorKind::ServiceInstanceBindingDoesNotExist, Outcome::UnprocessableEntity),
            (ErrorKind::ServiceInstanceBindingExists, Outcome::Conflict),
            (ErrorKind::ServiceDefinitionDoesNotExist, Outcome::UnprocessableEntity),
            (ErrorKind::ServiceDefinitionPlanDoesNotExist, Outcome::UnprocessableEntity),
            (ErrorKind::OperationInProgress, Outcome::NotFound),
            (ErrorKind::AsyncRequired, Outcome::UnprocessableEntity),
            (ErrorKind::InvalidParameters, Outcome::UnprocessableEntity),
            (ErrorKind::BindingRequiresApp, Outcome::UnprocessableEntity),
            (ErrorKind::Concurrency, Outcome::UnprocessableEntity),
            (ErrorKind::InvalidOriginatingIdentity, Outcome::UnprocessableEntity),
            (ErrorKind::InstanceUpdateNotSupported, Outcome::UnprocessableEntity),
            (ErrorKind::ApiVersionMismatch, Outcome::PreconditionFailed),
            (ErrorKind::Unavailable, Outcome::ServiceUnavailable),
            (ErrorKind::Broker, Outcome::InternalServerError),
            (ErrorKind::Validation, Outcome::BadRequest),
            (ErrorKind::Json, Outcome::BadRequest),
            (ErrorKind::Config, Outcome::InternalServerError),
            (ErrorKind::Unexpected, Outcome::InternalServerError),
        ];
        assert_eq!(expected.len(), ErrorKind::iter().count());
        for (kind, outcome) in expected {
            assert_eq!(error_kind_to_outcome(kind), outcome, "{kind}");
        }
    }

    #[test]
    fn missing_resource_descriptions_include_ids() {
        let response = LifecycleResponse::from_error(&Error::ServiceInstanceDoesNotExist {
            service_instance_id: "foo".to_string(),
        });
        assert_eq!(response.outcome, Outcome::UnprocessableEntity);
        assert!(description(&response).contains("foo"));

        let response = LifecycleResponse::from_error(&Error::ServiceDefinitionDoesNotExist {
            service_definition_id: "service-one-id".to_string(),
        });
        assert!(description(&response).contains("service-one-id"));
    }

    #[test]
    fn operation_in_progress_is_not_found() {
        let response = LifecycleResponse::from_error(&Error::OperationInProgress {
            reason: "still working".to_string(),
        });
        assert_eq!(response.status_code(), 404);
        assert!(description(&response).contains("still working"));
    }

    #[test]
    fn unexpected_errors_do_not_leak_details() {
        let response = LifecycleResponse::from_error(&Error::Unexpected {
            reason: "connection string postgres://secret".to_string(),
        });
        assert_eq!(response.outcome, Outcome::InternalServerError);
        assert_eq!(description(&response), GENERIC_ERROR_DESCRIPTION);
    }

    #[test]
    fn failed_error_flows_map_by_triggering_failure() {
        let response = LifecycleResponse::from_error(&Error::ErrorFlowsFailed {
            source: Box::new(Error::ServiceInstanceDoesNotExist {
                service_instance_id: "foo".to_string(),
            }),
            hook_failures: vec![Error::Broker {
                reason: "audit sink down".to_string(),
            }],
        });
        assert_eq!(response.outcome, Outcome::UnprocessableEntity);
        let text = description(&response);
        assert!(text.contains("foo"));
        assert!(text.contains("audit sink down"));

        let hidden = LifecycleResponse::from_error(&Error::ErrorFlowsFailed {
            source: Box::new(Error::Unexpected {
                reason: "init panicked".to_string(),
            }),
            hook_failures: vec![],
        });
        assert_eq!(hidden.outcome, Outcome::InternalServerError);
        assert_eq!(description(&hidden), GENERIC_ERROR_DESCRIPTION);
    }

    #[test]
    fn generic_domain_failure_keeps_its_message() {
        let response = LifecycleResponse::from_error(&Error::Broker {
            reason: "backend refused".to_string(),
        });
        assert_eq!(response.outcome, Outcome::InternalServerError);
        assert_eq!(description(&response), "backend refused");
    }

    #[test]
    fn validation_failure_lists_fields() {
        let response = LifecycleResponse::from_error(&Error::Validation {
            fields: vec!["service_id".to_string(), "plan_id".to_string()],
        });
        assert_eq!(response.outcome, Outcome::BadRequest);
        let description = description(&response);
        assert!(description.contains("service_id"));
        assert!(description.contains("plan_id"));
    }

    #[test]
    fn concurrency_body_carries_error_code() {
        let response = LifecycleResponse::from_error(&Error::Concurrency {
            reason: "instance changed".to_string(),
        });
        assert_eq!(
            response.body.unwrap()["error"],
            serde_json::json!("ConcurrencyError")
        );
    }
}
