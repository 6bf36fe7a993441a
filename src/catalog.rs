use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A plan offered by a service definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default = "default_free")]
    pub free: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub bindable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

fn default_free() -> bool {
    true
}

impl Plan {
    pub fn new(id: impl Into<String>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            free: true,
            bindable: None,
            metadata: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub bindable: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub plan_updateable: Option<bool>,
    #[serde(default)]
    pub plans: Vec<Plan>,
}

impl ServiceDefinition {
    pub fn plan(&self, plan_id: &str) -> Option<&Plan> {
        self.plans.iter().find(|p| p.id == plan_id)
    }

    /// A plan-level `bindable` flag overrides the service-level one.
    pub fn is_plan_bindable(&self, plan: &Plan) -> bool {
        plan.bindable.unwrap_or(self.bindable)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub services: Vec<ServiceDefinition>,
}

impl Catalog {
    pub fn service_definition(&self, id: &str) -> Option<&ServiceDefinition> {
        self.services.iter().find(|s| s.id == id)
    }
}

/// Source of service definitions consulted before a request is orchestrated.
#[async_trait::async_trait]
pub trait CatalogService: Send + Sync {
    async fn get_catalog(&self) -> Result<Catalog, Error>;

    async fn get_service_definition(&self, id: &str) -> Result<Option<ServiceDefinition>, Error>;
}

#[async_trait::async_trait]
impl CatalogService for Catalog {
    async fn get_catalog(&self) -> Result<Catalog, Error> {
        Ok(self.clone())
    }

    async fn get_service_definition(&self, id: &str) -> Result<Option<ServiceDefinition>, Error> {
        Ok(self.service_definition(id).cloned())
    }
}

/// Catalog objects attached to a request once its ids are resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolved {
    pub service_definition: Option<ServiceDefinition>,
    pub plan: Option<Plan>,
}

/// Resolves a `(service_id, plan_id)` pair against the catalog.
///
/// An unknown definition is an error only when `required`; an unknown plan
/// under a known definition is always an error.
pub async fn resolve<C: CatalogService + ?Sized>(
    catalog: &C,
    service_definition_id: Option<&str>,
    plan_id: Option<&str>,
    required: bool,
) -> Result<Resolved, Error> {
    let Some(service_definition_id) = service_definition_id.filter(|id| !id.is_empty()) else {
        return Ok(Resolved::default());
    };

    let Some(definition) = catalog.get_service_definition(service_definition_id).await? else {
        if required {
            return Err(Error::ServiceDefinitionDoesNotExist {
                service_definition_id: service_definition_id.to_string(),
            });
        }
        tracing::debug!(service_definition_id, "service definition not found, continuing");
        return Ok(Resolved::default());
    };

    let plan = match plan_id.filter(|id| !id.is_empty()) {
        Some(plan_id) => Some(definition.plan(plan_id).cloned().ok_or_else(|| {
            Error::ServiceDefinitionPlanDoesNotExist {
                plan_id: plan_id.to_string(),
                service_definition_id: service_definition_id.to_string(),
            }
        })?),
        None => None,
    };

    Ok(Resolved {
        service_definition: Some(definition),
        plan,
    })
}
