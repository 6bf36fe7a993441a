use serde::{Deserialize, Serialize};

use crate::catalog::Resolved;
use crate::operations::{
    AsyncResponse, LastOperationResponse, LifecycleRequest, OperationKind, require,
};
use crate::types::RequestContext;

type Parameters = serde_json::Map<String, serde_json::Value>;

/// Resource the binding is created for: an application or a route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BindResource {
    #[serde(default)]
    pub app_guid: Option<String>,
    #[serde(default)]
    pub route: Option<String>,
}

/// Body of `PUT /v2/service_instances/{instance_id}/service_bindings/{binding_id}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CreateServiceInstanceBindingRequest {
    #[serde(skip)]
    pub service_instance_id: String,
    #[serde(skip)]
    pub binding_id: String,
    #[serde(rename = "service_id", default)]
    pub service_definition_id: String,
    #[serde(default)]
    pub plan_id: String,
    /// Deprecated top-level app guid; prefer `bind_resource.app_guid`.
    #[serde(default)]
    pub app_guid: Option<String>,
    #[serde(default)]
    pub bind_resource: Option<BindResource>,
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

impl CreateServiceInstanceBindingRequest {
    pub fn new(
        service_instance_id: impl Into<String>,
        binding_id: impl Into<String>,
        service_definition_id: impl Into<String>,
        plan_id: impl Into<String>,
    ) -> Self {
        Self {
            service_instance_id: service_instance_id.into(),
            binding_id: binding_id.into(),
            service_definition_id: service_definition_id.into(),
            plan_id: plan_id.into(),
            ..Self::default()
        }
    }

    /// Application the binding targets, from `bind_resource` or the legacy field.
    pub fn target_app_guid(&self) -> Option<&str> {
        self.bind_resource
            .as_ref()
            .and_then(|r| r.app_guid.as_deref())
            .or(self.app_guid.as_deref())
    }
}

impl LifecycleRequest for CreateServiceInstanceBindingRequest {
    const KIND: OperationKind = OperationKind::CreateBinding;

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
        (
            Some(self.service_definition_id.as_str()),
            Some(self.plan_id.as_str()),
        )
    }

    fn set_resolved(&mut self, resolved: Resolved) {
        self.resolved = resolved;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateServiceInstanceAppBindingResponse {
    #[serde(skip)]
    pub is_async: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    #[serde(skip)]
    pub binding_existed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Parameters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub syslog_drain_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub volume_mounts: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateServiceInstanceRouteBindingResponse {
    #[serde(skip)]
    pub is_async: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    #[serde(skip)]
    pub binding_existed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_service_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CreateServiceInstanceBindingResponse {
    App(CreateServiceInstanceAppBindingResponse),
    Route(CreateServiceInstanceRouteBindingResponse),
}

impl CreateServiceInstanceBindingResponse {
    /// An identical binding already existed; the create was a no-op.
    pub fn binding_existed(&self) -> bool {
        match self {
            Self::App(r) => r.binding_existed,
            Self::Route(r) => r.binding_existed,
        }
    }
}

impl Default for CreateServiceInstanceBindingResponse {
    fn default() -> Self {
        Self::App(CreateServiceInstanceAppBindingResponse::default())
    }
}

impl AsyncResponse for CreateServiceInstanceBindingResponse {
    fn is_async(&self) -> bool {
        match self {
            Self::App(r) => r.is_async,
            Self::Route(r) => r.is_async,
        }
    }

    fn operation(&self) -> Option<&str> {
        match self {
            Self::App(r) => r.operation.as_deref(),
            Self::Route(r) => r.operation.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetServiceInstanceBindingRequest {
    pub service_instance_id: String,
    pub binding_id: String,
    pub context: RequestContext,
}

impl LifecycleRequest for GetServiceInstanceBindingRequest {
    const KIND: OperationKind = OperationKind::GetBinding;

    fn context(&self) -> &RequestContext {
        &self.context
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GetServiceInstanceAppBindingResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Parameters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub syslog_drain_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub volume_mounts: Vec<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Parameters>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GetServiceInstanceRouteBindingResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_service_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Parameters>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GetServiceInstanceBindingResponse {
    App(GetServiceInstanceAppBindingResponse),
    Route(GetServiceInstanceRouteBindingResponse),
}

/// `DELETE .../service_bindings/{binding_id}?service_id=..&plan_id=..`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteServiceInstanceBindingRequest {
    pub service_instance_id: String,
    pub binding_id: String,
    pub service_definition_id: String,
    pub plan_id: String,
    pub async_accepted: bool,
    pub context: RequestContext,
    pub resolved: Resolved,
}

impl LifecycleRequest for DeleteServiceInstanceBindingRequest {
    const KIND: OperationKind = OperationKind::DeleteBinding;

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
        (
            Some(self.service_definition_id.as_str()),
            Some(self.plan_id.as_str()),
        )
    }

    fn set_resolved(&mut self, resolved: Resolved) {
        self.resolved = resolved;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeleteServiceInstanceBindingResponse {
    #[serde(skip)]
    pub is_async: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
}

impl DeleteServiceInstanceBindingResponse {
    pub fn accepted(operation: impl Into<String>) -> Self {
        Self {
            is_async: true,
            operation: Some(operation.into()),
        }
    }
}

impl AsyncResponse for DeleteServiceInstanceBindingResponse {
    fn is_async(&self) -> bool {
        self.is_async
    }

    fn operation(&self) -> Option<&str> {
        self.operation.as_deref()
    }
}

/// `GET .../service_bindings/{binding_id}/last_operation`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetLastServiceBindingOperationRequest {
    pub service_instance_id: String,
    pub binding_id: String,
    pub service_definition_id: Option<String>,
    pub plan_id: Option<String>,
    pub operation: Option<String>,
    pub context: RequestContext,
}

impl LifecycleRequest for GetLastServiceBindingOperationRequest {
    const KIND: OperationKind = OperationKind::GetBindingLastOperation;

    fn context(&self) -> &RequestContext {
        &self.context
    }

    fn catalog_ids(&self) -> (Option<&str>, Option<&str>) {
        (self.service_definition_id.as_deref(), self.plan_id.as_deref())
    }
}

pub type GetLastServiceBindingOperationResponse = LastOperationResponse;
