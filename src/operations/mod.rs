pub mod binding;
pub mod instance;

use serde::{Deserialize, Serialize};

use crate::catalog::Resolved;
use crate::types::RequestContext;

/// Every lifecycle operation the broker serves.
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
#[strum(serialize_all = "snake_case")]
pub enum OperationKind {
    CreateInstance,
    GetInstance,
    UpdateInstance,
    DeleteInstance,
    GetInstanceLastOperation,
    CreateBinding,
    GetBinding,
    DeleteBinding,
    GetBindingLastOperation,
}

/// State of an asynchronous operation as reported by a last-operation poll.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
)]
pub enum OperationState {
    #[serde(rename = "IN_PROGRESS", alias = "in progress")]
    #[strum(serialize = "IN_PROGRESS")]
    InProgress,
    #[serde(rename = "SUCCEEDED", alias = "succeeded")]
    #[strum(serialize = "SUCCEEDED")]
    Succeeded,
    #[serde(rename = "FAILED", alias = "failed")]
    #[strum(serialize = "FAILED")]
    Failed,
}

/// Responses that may report an asynchronous operation in place of a result.
pub trait AsyncResponse {
    fn is_async(&self) -> bool;

    /// Opaque token the platform echoes back when polling.
    fn operation(&self) -> Option<&str>;
}

/// Response to a last-operation poll, shared by instances and bindings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastOperationResponse {
    pub state: OperationState,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    /// Set when the polled operation was a deletion; a succeeded deletion is reported as gone.
    #[serde(skip)]
    pub delete_operation: bool,
}

impl LastOperationResponse {
    pub fn new(state: OperationState, description: impl Into<String>) -> Self {
        Self {
            state,
            description: Some(description.into()),
            delete_operation: false,
        }
    }

    pub fn deletion(mut self) -> Self {
        self.delete_operation = true;
        self
    }
}

/// Common view of every lifecycle request, used by the broker before orchestration.
pub trait LifecycleRequest: Send + Sync {
    const KIND: OperationKind;

    /// Names of required body fields (model names, e.g. `serviceDefinitionId`)
    /// and query parameters (wire names, e.g. `plan_id`) that are absent or
    /// empty. Path segments are guaranteed by routing.
    fn missing_fields(&self) -> Vec<String> {
        Vec::new()
    }

    fn context(&self) -> &RequestContext;

    fn async_accepted(&self) -> bool {
        false
    }

    /// `(service_id, plan_id)` to resolve against the catalog, if the request carries them.
    fn catalog_ids(&self) -> (Option<&str>, Option<&str>) {
        (None, None)
    }

    fn set_resolved(&mut self, _resolved: Resolved) {}
}

/// Appends `name` to `missing` when `value` is empty.
pub(crate) fn require(missing: &mut Vec<String>, name: &str, value: &str) {
    if value.trim().is_empty() {
        missing.push(name.to_string());
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use super::*;

    #[test]
    fn operation_state_wire_names() {
        assert_eq!(
            serde_json::to_value(OperationState::InProgress).unwrap(),
            serde_json::json!("IN_PROGRESS")
        );
        assert_eq!(
            serde_json::from_value::<OperationState>(serde_json::json!("in progress")).unwrap(),
            OperationState::InProgress
        );
        assert_eq!(OperationState::Succeeded.to_string(), "SUCCEEDED");
        assert_eq!("FAILED".parse::<OperationState>().ok(), Some(OperationState::Failed));
    }

    #[test]
    fn last_operation_body_hides_delete_flag() {
        let response = LastOperationResponse::new(OperationState::Succeeded, "all gone").deletion();
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            serde_json::json!({"state": "SUCCEEDED", "description": "all gone"})
        );
    }
}
