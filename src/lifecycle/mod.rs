pub mod mapping;

use serde::Serialize;

use crate::error::Error;
use crate::operations::{AsyncResponse, LastOperationResponse, OperationState};

/// Protocol-visible disposition of a lifecycle request.
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
pub enum Outcome {
    Ok,
    Created,
    Accepted,
    BadRequest,
    NotFound,
    Conflict,
    Gone,
    PreconditionFailed,
    UnprocessableEntity,
    InternalServerError,
    ServiceUnavailable,
}

impl Outcome {
    pub fn status_code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::Created => 201,
            Self::Accepted => 202,
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::Gone => 410,
            Self::PreconditionFailed => 412,
            Self::UnprocessableEntity => 422,
            Self::InternalServerError => 500,
            Self::ServiceUnavailable => 503,
        }
    }

    pub fn is_success(self) -> bool {
        self.status_code() < 300
    }
}

pub struct LifecycleEngine;

impl LifecycleEngine {
    /// Applies to instances and bindings alike.
    pub fn decide_create(is_async: bool, existed: bool) -> Outcome {
        match (is_async, existed) {
            (true, _) => Outcome::Accepted,
            (false, false) => Outcome::Created,
            (false, true) => Outcome::Ok,
        }
    }

    pub fn decide_update(is_async: bool) -> Outcome {
        if is_async {
            Outcome::Accepted
        } else {
            Outcome::Ok
        }
    }

    pub fn decide_delete(is_async: bool) -> Outcome {
        if is_async {
            Outcome::Accepted
        } else {
            Outcome::Ok
        }
    }

    /// A succeeded deletion is reported as gone so the platform can tell it
    /// apart from a succeeded create or update.
    pub fn decide_last_operation(state: OperationState, delete_operation: bool) -> Outcome {
        match state {
            OperationState::Succeeded if delete_operation => Outcome::Gone,
            OperationState::InProgress | OperationState::Succeeded | OperationState::Failed => {
                Outcome::Ok
            }
        }
    }
}

/// Outcome plus the JSON body the transport layer should write.
#[derive(Debug, Clone, PartialEq)]
pub struct LifecycleResponse {
    pub outcome: Outcome,
    /// `None` for outcomes without a body.
    pub body: Option<serde_json::Value>,
    /// Set for last-operation polls.
    pub operation_state: Option<OperationState>,
}

impl LifecycleResponse {
    pub fn new(outcome: Outcome, body: Option<serde_json::Value>) -> Self {
        Self {
            outcome,
            body,
            operation_state: None,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.outcome.status_code()
    }

    pub fn for_create<R>(response: &R, existed: bool) -> Result<Self, Error>
    where
        R: AsyncResponse + Serialize,
    {
        let outcome = LifecycleEngine::decide_create(response.is_async(), existed);
        log_accepted(response);
        Ok(Self::new(outcome, Some(to_body(response)?)))
    }

    pub fn for_update<R>(response: &R) -> Result<Self, Error>
    where
        R: AsyncResponse + Serialize,
    {
        let outcome = LifecycleEngine::decide_update(response.is_async());
        log_accepted(response);
        Ok(Self::new(outcome, Some(to_body(response)?)))
    }

    pub fn for_delete<R>(response: &R) -> Result<Self, Error>
    where
        R: AsyncResponse + Serialize,
    {
        let outcome = LifecycleEngine::decide_delete(response.is_async());
        log_accepted(response);
        let body = if response.is_async() {
            to_body(response)?
        } else {
            serde_json::Value::Object(serde_json::Map::new())
        };
        Ok(Self::new(outcome, Some(body)))
    }

    pub fn for_get<R: Serialize>(response: &R) -> Result<Self, Error> {
        Ok(Self::new(Outcome::Ok, Some(to_body(response)?)))
    }

    pub fn for_last_operation(response: &LastOperationResponse) -> Result<Self, Error> {
        let outcome =
            LifecycleEngine::decide_last_operation(response.state, response.delete_operation);
        Ok(Self {
            outcome,
            body: Some(to_body(response)?),
            operation_state: Some(response.state),
        })
    }
}

fn log_accepted<R: AsyncResponse>(response: &R) {
    if response.is_async() {
        tracing::debug!(
            operation = response.operation().unwrap_or_default(),
            "operation accepted for asynchronous completion"
        );
    }
}

fn to_body<T: Serialize>(value: &T) -> Result<serde_json::Value, Error> {
    serde_json::to_value(value).map_err(|e| Error::Unexpected {
        reason: format!("failed to serialize response: {e}"),
    })
}
