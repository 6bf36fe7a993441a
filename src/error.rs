use serde::Serialize;

/// Failures raised by the broker, by service implementations and by event flows.
///
/// Every variant maps to exactly one protocol outcome, see
/// [`crate::lifecycle::mapping::error_to_outcome`].
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Service instance does not exist: id={service_instance_id}")]
    ServiceInstanceDoesNotExist { service_instance_id: String },

    #[error(
        "Service instance with the given ID already exists: serviceInstanceId={service_instance_id}, serviceDefinitionId={service_definition_id}"
    )]
    ServiceInstanceExists {
        service_instance_id: String,
        service_definition_id: String,
    },

    #[error(
        "Service instance binding does not exist: serviceInstanceId={service_instance_id}, bindingId={binding_id}"
    )]
    ServiceInstanceBindingDoesNotExist {
        service_instance_id: String,
        binding_id: String,
    },

    #[error(
        "Service instance binding already exists: serviceInstanceId={service_instance_id}, bindingId={binding_id}"
    )]
    ServiceInstanceBindingExists {
        service_instance_id: String,
        binding_id: String,
    },

    #[error("Service definition does not exist: id={service_definition_id}")]
    ServiceDefinitionDoesNotExist { service_definition_id: String },

    #[error(
        "Service definition plan does not exist: planId={plan_id}, serviceDefinitionId={service_definition_id}"
    )]
    ServiceDefinitionPlanDoesNotExist {
        plan_id: String,
        service_definition_id: String,
    },

    #[error("Service broker operation in progress: {reason}")]
    OperationInProgress { reason: String },

    #[error("Service broker requires async operation: {reason}")]
    AsyncRequired { reason: String },

    #[error("Service broker parameters are invalid: {reason}")]
    InvalidParameters { reason: String },

    #[error("Service broker binding requires an application: {reason}")]
    BindingRequiresApp { reason: String },

    #[error("Service broker concurrency error: {reason}")]
    Concurrency { reason: String },

    #[error("Invalid originating identity: {reason}")]
    InvalidOriginatingIdentity { reason: String },

    #[error("Service instance update not supported: {reason}")]
    InstanceUpdateNotSupported { reason: String },

    #[error(
        "The provided service broker API version is not supported: expectedVersion={expected}, providedVersion={}",
        .provided.as_deref().unwrap_or("none")
    )]
    ApiVersionMismatch {
        expected: String,
        provided: Option<String>,
    },

    #[error("Service broker is unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("{reason}")]
    Broker { reason: String },

    #[error("Missing required fields:{}", .fields.iter().map(|f| format!(" {f}")).collect::<String>())]
    Validation { fields: Vec<String> },

    /// A failure after which one or more error flows failed too. The
    /// triggering failure still decides the outcome.
    #[error(
        "{source}; error flows failed:{}",
        .hook_failures.iter().map(|e| format!(" [{e}]")).collect::<String>()
    )]
    ErrorFlowsFailed {
        #[source]
        source: Box<Error>,
        hook_failures: Vec<Error>,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {reason}")]
    Config { reason: String },

    #[error("unexpected error: {reason}")]
    Unexpected { reason: String },
}

/// Fieldless discriminant of [`Error`], used for the outcome table.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
    strum_macros::EnumIter,
)]
pub enum ErrorKind {
    ServiceInstanceDoesNotExist,
    ServiceInstanceExists,
    ServiceInstanceBindingDoesNotExist,
    ServiceInstanceBindingExists,
    ServiceDefinitionDoesNotExist,
    ServiceDefinitionPlanDoesNotExist,
    OperationInProgress,
    AsyncRequired,
    InvalidParameters,
    BindingRequiresApp,
    Concurrency,
    InvalidOriginatingIdentity,
    InstanceUpdateNotSupported,
    ApiVersionMismatch,
    Unavailable,
    Broker,
    Validation,
    Json,
    Config,
    Unexpected,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ServiceInstanceDoesNotExist { .. } => ErrorKind::ServiceInstanceDoesNotExist,
            Self::ServiceInstanceExists { .. } => ErrorKind::ServiceInstanceExists,
            Self::ServiceInstanceBindingDoesNotExist { .. } => {
                ErrorKind::ServiceInstanceBindingDoesNotExist
            }
            Self::ServiceInstanceBindingExists { .. } => ErrorKind::ServiceInstanceBindingExists,
            Self::ServiceDefinitionDoesNotExist { .. } => ErrorKind::ServiceDefinitionDoesNotExist,
            Self::ServiceDefinitionPlanDoesNotExist { .. } => {
                ErrorKind::ServiceDefinitionPlanDoesNotExist
            }
            Self::OperationInProgress { .. } => ErrorKind::OperationInProgress,
            Self::AsyncRequired { .. } => ErrorKind::AsyncRequired,
            Self::InvalidParameters { .. } => ErrorKind::InvalidParameters,
            Self::BindingRequiresApp { .. } => ErrorKind::BindingRequiresApp,
            Self::Concurrency { .. } => ErrorKind::Concurrency,
            Self::InvalidOriginatingIdentity { .. } => ErrorKind::InvalidOriginatingIdentity,
            Self::InstanceUpdateNotSupported { .. } => ErrorKind::InstanceUpdateNotSupported,
            Self::ApiVersionMismatch { .. } => ErrorKind::ApiVersionMismatch,
            Self::Unavailable { .. } => ErrorKind::Unavailable,
            Self::Broker { .. } => ErrorKind::Broker,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::ErrorFlowsFailed { source, .. } => source.kind(),
            Self::Json(_) => ErrorKind::Json,
            Self::Config { .. } => ErrorKind::Config,
            Self::Unexpected { .. } => ErrorKind::Unexpected,
        }
    }

    /// Machine-readable error code defined by the OSB API, where one exists.
    pub fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::AsyncRequired { .. } => Some("AsyncRequired"),
            Self::Concurrency { .. } => Some("ConcurrencyError"),
            Self::BindingRequiresApp { .. } => Some("RequiresApp"),
            Self::ErrorFlowsFailed { source, .. } => source.error_code(),
            _ => None,
        }
    }

    pub fn error_message(&self) -> ErrorMessage {
        ErrorMessage {
            error: self.error_code().map(str::to_string),
            description: self.to_string(),
        }
    }
}

/// Error body returned to the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct ErrorMessage {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
    pub description: String,
}

impl ErrorMessage {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            error: None,
            description: description.into(),
        }
    }
}
