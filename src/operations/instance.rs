use serde::{Deserialize, Serialize};

use crate::catalog::Resolved;
use crate::operations::{
    AsyncResponse, LastOperationResponse, LifecycleRequest, OperationKind, require,
};
use crate::types::RequestContext;

type Parameters = serde_json::Map<String, serde_json::Value>;

/// Body of `PUT /v2/service_instances/{instance_id}` plus path and header data.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CreateServiceInstanceRequest {
    #[serde(skip)]
    pub service_instance_id: String,
    #[serde(rename = "service_id", default)]
    pub service_definition_id: String,
    #[serde(default)]
    pub plan_id: String,
    #[serde(default)]
    pub organization_guid: Option<String>,
    #[serde(default)]
    pub space_guid: Option<String>,
    /// Platform-specific `context` object.
    #[serde(rename = "context", default)]
    pub platform_context: Option<serde_json::Value>,
    #[serde(default)]
    pub parameters: Option<Parameters>,
    #[serde(skip)]
    pub async_accepted: bool,
    #[serde(skip)]
    pub context: RequestContext,
    #[serde(skip)]
    pub resolved: Resolved,
}

impl CreateServiceInstanceRequest {
    pub fn new(
        service_instance_id: impl Into<String>,
        service_definition_id: impl Into<String>,
        plan_id: impl Into<String>,
    ) -> Self {
        Self {
            service_instance_id: service_instance_id.into(),
            service_definition_id: service_definition_id.into(),
            plan_id: plan_id.into(),
            ..Self::default()
        }
    }
}

impl LifecycleRequest for CreateServiceInstanceRequest {
    const KIND: OperationKind = OperationKind::CreateInstance;

    fn missing_fields(&self) -> Vec<String> {
        let mut missing = Vec::new();
        require(&mut missing, "serviceDefinitionId", &self.service_definition_id);
        require(&mut missing, "planId", &self.plan_id);
        missing
    }

    fn context(&self) -> &RequestContext {
        &self.context
    }

    fn async_accepted(&self) -> bool {
        self.async_accepted
    }

    fn catalog_ids(&self) -> (Option<&str>, Option<&str>) {
        (Some(self.service_definition_id.as_str()), Some(self.plan_id.as_str()))
    }

    fn set_resolved(&mut self, resolved: Resolved) {
        self.resolved = resolved;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateServiceInstanceResponse {
    #[serde(skip)]
    pub is_async: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashboard_url: Option<String>,
    /// An identical instance already existed; the create was a no-op.
    #[serde(skip)]
    pub instance_existed: bool,
}

impl CreateServiceInstanceResponse {
    pub fn accepted(operation: impl Into<String>) -> Self {
        Self {
            is_async: true,
            operation: Some(operation.into()),
            ..Self::default()
        }
    }
}

impl AsyncResponse for CreateServiceInstanceResponse {
    fn is_async(&self) -> bool {
        self.is_async
    }

    fn operation(&self) -> Option<&str> {
        self.operation.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetServiceInstanceRequest {
    pub service_instance_id: String,
    pub context: RequestContext,
}

impl LifecycleRequest for GetServiceInstanceRequest {
    const KIND: OperationKind = OperationKind::GetInstance;

    fn context(&self) -> &RequestContext {
        &self.context
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GetServiceInstanceResponse {
    #[serde(rename = "service_id", skip_serializing_if = "Option::is_none")]
    pub service_definition_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashboard_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Parameters>,
}

/// Values of the instance before the update, as sent by the platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PreviousValues {
    #[serde(rename = "service_id", default)]
    pub service_definition_id: Option<String>,
    #[serde(default)]
    pub plan_id: Option<String>,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub space_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UpdateServiceInstanceRequest {
    #[serde(skip)]
    pub service_instance_id: String,
    #[serde(rename = "service_id", default)]
    pub service_definition_id: String,
    #[serde(default)]
    pub plan_id: Option<String>,
    #[serde(default)]
    pub previous_values: Option<PreviousValues>,
    #[serde(rename = "context", default)]
    pub platform_context: Option<serde_json::Value>,
    #[serde(default)]
    pub parameters: Option<Parameters>,
    #[serde(skip)]
    pub async_accepted: bool,
    #[serde(skip)]
    pub context: RequestContext,
    #[serde(skip)]
    pub resolved: Resolved,
}

impl LifecycleRequest for UpdateServiceInstanceRequest {
    const KIND: OperationKind = OperationKind::UpdateInstance;

    fn missing_fields(&self) -> Vec<String> {
        let mut missing = Vec::new();
        require(&mut missing, "serviceDefinitionId", &self.service_definition_id);
        missing
    }

    fn context(&self) -> &RequestContext {
        &self.context
    }

    fn async_accepted(&self) -> bool {
        self.async_accepted
    }

    fn catalog_ids(&self) -> (Option<&str>, Option<&str>) {
        (Some(self.service_definition_id.as_str()), self.plan_id.as_deref())
    }

    fn set_resolved(&mut self, resolved: Resolved) {
        self.resolved = resolved;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateServiceInstanceResponse {
    #[serde(skip)]
    pub is_async: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashboard_url: Option<String>,
}

impl AsyncResponse for UpdateServiceInstanceResponse {
    fn is_async(&self) -> bool {
        self.is_async
    }

    fn operation(&self) -> Option<&str> {
        self.operation.as_deref()
    }
}

/// `DELETE /v2/service_instances/{instance_id}?service_id=..&plan_id=..`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteServiceInstanceRequest {
    pub service_instance_id: String,
    pub service_definition_id: String,
    pub plan_id: String,
    pub async_accepted: bool,
    pub context: RequestContext,
    pub resolved: Resolved,
}

impl LifecycleRequest for DeleteServiceInstanceRequest {
    const KIND: OperationKind = OperationKind::DeleteInstance;

    fn missing_fields(&self) -> Vec<String> {
        let mut missing = Vec::new();
        require(&mut missing, "service_id", &self.service_definition_id);
        require(&mut missing, "plan_id", &self.plan_id);
        missing
    }

    fn context(&self) -> &RequestContext {
        &self.context
    }

    fn async_accepted(&self) -> bool {
        self.async_accepted
    }

    fn catalog_ids(&self) -> (Option<&str>, Option<&str>) {
        (Some(self.service_definition_id.as_str()), Some(self.plan_id.as_str()))
    }

    fn set_resolved(&mut self, resolved: Resolved) {
        self.resolved = resolved;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeleteServiceInstanceResponse {
    #[serde(skip)]
    pub is_async: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
}

impl DeleteServiceInstanceResponse {
    pub fn accepted(operation: impl Into<String>) -> Self {
        Self {
            is_async: true,
            operation: Some(operation.into()),
        }
    }
}

impl AsyncResponse for DeleteServiceInstanceResponse {
    fn is_async(&self) -> bool {
        self.is_async
    }

    fn operation(&self) -> Option<&str> {
        self.operation.as_deref()
    }
}

/// `GET /v2/service_instances/{instance_id}/last_operation`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetLastServiceOperationRequest {
    pub service_instance_id: String,
    pub service_definition_id: Option<String>,
    pub plan_id: Option<String>,
    pub operation: Option<String>,
    pub context: RequestContext,
}

impl LifecycleRequest for GetLastServiceOperationRequest {
    const KIND: OperationKind = OperationKind::GetInstanceLastOperation;

    fn context(&self) -> &RequestContext {
        &self.context
    }

    fn catalog_ids(&self) -> (Option<&str>, Option<&str>) {
        (self.service_definition_id.as_deref(), self.plan_id.as_deref())
    }
}

pub type GetLastServiceOperationResponse = LastOperationResponse;
