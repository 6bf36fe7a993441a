//! Entry point for the transport layer: one method per lifecycle endpoint.
//!
//! Each call runs the same pipeline: API version check, required-field
//! validation, catalog resolution, async-required check, the flow-wrapped
//! service call, and finally outcome derivation. Failures at any step are
//! translated through the error taxonomy; callers always get a
//! [`LifecycleResponse`].

use std::sync::Arc;

use tracing::Instrument;

use crate::catalog::{CatalogService, resolve};
use crate::config::BrokerConfig;
use crate::error::Error;
use crate::flows::EventFlowRegistries;
use crate::lifecycle::LifecycleResponse;
use crate::operations::binding::{
    CreateServiceInstanceBindingRequest, DeleteServiceInstanceBindingRequest,
    GetLastServiceBindingOperationRequest, GetServiceInstanceBindingRequest,
};
use crate::operations::instance::{
    CreateServiceInstanceRequest, DeleteServiceInstanceRequest, GetLastServiceOperationRequest,
    GetServiceInstanceRequest, UpdateServiceInstanceRequest,
};
use crate::operations::{LifecycleRequest, OperationKind};
use crate::service::events::{ServiceInstanceBindingEventService, ServiceInstanceEventService};
use crate::service::{ServiceInstanceBindingService, ServiceInstanceService};
use crate::types::check_api_version;

pub struct ServiceBroker<C, I, B> {
    config: BrokerConfig,
    catalog: C,
    instances: ServiceInstanceEventService<I>,
    bindings: ServiceInstanceBindingEventService<B>,
}

/// Operations that cannot proceed without a known service definition.
fn requires_service_definition(kind: OperationKind) -> bool {
    matches!(
        kind,
        OperationKind::CreateInstance | OperationKind::UpdateInstance | OperationKind::CreateBinding
    )
}

fn respond(result: Result<LifecycleResponse, Error>) -> LifecycleResponse {
    match result {
        Ok(response) => {
            tracing::debug!(outcome = %response.outcome, "request completed");
            response
        }
        Err(err) => LifecycleResponse::from_error(&err),
    }
}

impl<C, I, B> ServiceBroker<C, I, B>
where
    C: CatalogService,
    I: ServiceInstanceService,
    B: ServiceInstanceBindingService,
{
    pub fn new(
        config: BrokerConfig,
        catalog: C,
        instance_service: I,
        binding_service: B,
        registries: Arc<EventFlowRegistries>,
    ) -> Self {
        Self {
            config,
            catalog,
            instances: ServiceInstanceEventService::new(instance_service, Arc::clone(&registries)),
            bindings: ServiceInstanceBindingEventService::new(binding_service, registries),
        }
    }

    pub fn config(&self) -> &BrokerConfig {
        &self.config
    }

    /// Checks and enriches a request before any event flow runs.
    async fn prepare<R: LifecycleRequest>(
        &self,
        request: &mut R,
        requires_async: bool,
    ) -> Result<(), Error> {
        check_api_version(
            self.config.api_version.as_deref(),
            request.context().api_version.as_deref(),
        )?;

        let missing = request.missing_fields();
        if !missing.is_empty() {
            return Err(Error::Validation { fields: missing });
        }

        let (service_definition_id, plan_id) = request.catalog_ids();
        if service_definition_id.is_some() {
            let resolved = resolve(
                &self.catalog,
                service_definition_id,
                plan_id,
                requires_service_definition(R::KIND),
            )
            .await?;
            request.set_resolved(resolved);
        }

        if requires_async && !request.async_accepted() {
            return Err(Error::AsyncRequired {
                reason: format!("{} requires accepts_incomplete=true", R::KIND),
            });
        }

        Ok(())
    }

    pub async fn get_catalog(&self) -> LifecycleResponse {
        respond(
            async {
                let catalog = self.catalog.get_catalog().await?;
                LifecycleResponse::for_get(&catalog)
            }
            .await,
        )
    }

    pub async fn create_service_instance(
        &self,
        mut request: CreateServiceInstanceRequest,
    ) -> LifecycleResponse {
        let span = tracing::debug_span!(
            "create_service_instance",
            service_instance_id = %request.service_instance_id
        );
        let requires_async = self.instances.requires_async(OperationKind::CreateInstance);
        respond(
            async {
                self.prepare(&mut request, requires_async).await?;
                let response = self.instances.create_service_instance(&request).await?;
                LifecycleResponse::for_create(&response, response.instance_existed)
            }
            .instrument(span)
            .await,
        )
    }

    pub async fn get_service_instance(
        &self,
        mut request: GetServiceInstanceRequest,
    ) -> LifecycleResponse {
        let span = tracing::debug_span!(
            "get_service_instance",
            service_instance_id = %request.service_instance_id
        );
        respond(
            async {
                self.prepare(&mut request, false).await?;
                let response = self.instances.get_service_instance(&request).await?;
                LifecycleResponse::for_get(&response)
            }
            .instrument(span)
            .await,
        )
    }

    pub async fn update_service_instance(
        &self,
        mut request: UpdateServiceInstanceRequest,
    ) -> LifecycleResponse {
        let span = tracing::debug_span!(
            "update_service_instance",
            service_instance_id = %request.service_instance_id
        );
        let requires_async = self.instances.requires_async(OperationKind::UpdateInstance);
        respond(
            async {
                self.prepare(&mut request, requires_async).await?;
                let response = self.instances.update_service_instance(&request).await?;
                LifecycleResponse::for_update(&response)
            }
            .instrument(span)
            .await,
        )
    }

    pub async fn delete_service_instance(
        &self,
        mut request: DeleteServiceInstanceRequest,
    ) -> LifecycleResponse {
        let span = tracing::debug_span!(
            "delete_service_instance",
            service_instance_id = %request.service_instance_id
        );
        let requires_async = self.instances.requires_async(OperationKind::DeleteInstance);
        respond(
            async {
                self.prepare(&mut request, requires_async).await?;
                let response = self.instances.delete_service_instance(&request).await?;
                LifecycleResponse::for_delete(&response)
            }
            .instrument(span)
            .await,
        )
    }

    pub async fn get_last_instance_operation(
        &self,
        mut request: GetLastServiceOperationRequest,
    ) -> LifecycleResponse {
        let span = tracing::debug_span!(
            "get_last_instance_operation",
            service_instance_id = %request.service_instance_id
        );
        respond(
            async {
                self.prepare(&mut request, false).await?;
                let response = self.instances.get_last_operation(&request).await?;
                LifecycleResponse::for_last_operation(&response)
            }
            .instrument(span)
            .await,
        )
    }

    pub async fn create_service_instance_binding(
        &self,
        mut request: CreateServiceInstanceBindingRequest,
    ) -> LifecycleResponse {
        let span = tracing::debug_span!(
            "create_service_instance_binding",
            service_instance_id = %request.service_instance_id,
            binding_id = %request.binding_id
        );
        let requires_async = self.bindings.requires_async(OperationKind::CreateBinding);
        respond(
            async {
                self.prepare(&mut request, requires_async).await?;
                let response = self.bindings.create_service_instance_binding(&request).await?;
                LifecycleResponse::for_create(&response, response.binding_existed())
            }
            .instrument(span)
            .await,
        )
    }

    pub async fn get_service_instance_binding(
        &self,
        mut request: GetServiceInstanceBindingRequest,
    ) -> LifecycleResponse {
        let span = tracing::debug_span!(
            "get_service_instance_binding",
            service_instance_id = %request.service_instance_id,
            binding_id = %request.binding_id
        );
        respond(
            async {
                self.prepare(&mut request, false).await?;
                let response = self.bindings.get_service_instance_binding(&request).await?;
                LifecycleResponse::for_get(&response)
            }
            .instrument(span)
            .await,
        )
    }

    pub async fn delete_service_instance_binding(
        &self,
        mut request: DeleteServiceInstanceBindingRequest,
    ) -> LifecycleResponse {
        let span = tracing::debug_span!(
            "delete_service_instance_binding",
            service_instance_id = %request.service_instance_id,
            binding_id = %request.binding_id
        );
        let requires_async = self.bindings.requires_async(OperationKind::DeleteBinding);
        respond(
            async {
                self.prepare(&mut request, requires_async).await?;
                let response = self.bindings.delete_service_instance_binding(&request).await?;
                LifecycleResponse::for_delete(&response)
            }
            .instrument(span)
            .await,
        )
    }

    pub async fn get_last_binding_operation(
        &self,
        mut request: GetLastServiceBindingOperationRequest,
    ) -> LifecycleResponse {
        let span = tracing::debug_span!(
            "get_last_binding_operation",
            service_instance_id = %request.service_instance_id,
            binding_id = %request.binding_id
        );
        respond(
            async {
                self.prepare(&mut request, false).await?;
                let response = self.bindings.get_last_operation(&request).await?;
                LifecycleResponse::for_last_operation(&response)
            }
            .instrument(span)
            .await,
        )
    }
}
