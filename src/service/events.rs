//! Service decorators that run the registered event flows around a delegate.

use std::sync::Arc;

use crate::error::Error;
use crate::flows::{EventFlowRegistries, run_with_flows};
use crate::operations::OperationKind;
use crate::operations::binding::{
    CreateServiceInstanceBindingRequest, CreateServiceInstanceBindingResponse,
    DeleteServiceInstanceBindingRequest, DeleteServiceInstanceBindingResponse,
    GetLastServiceBindingOperationRequest, GetLastServiceBindingOperationResponse,
    GetServiceInstanceBindingRequest, GetServiceInstanceBindingResponse,
};
use crate::operations::instance::{
    CreateServiceInstanceRequest, CreateServiceInstanceResponse, DeleteServiceInstanceRequest,
    DeleteServiceInstanceResponse, GetLastServiceOperationRequest,
    GetLastServiceOperationResponse, GetServiceInstanceRequest, GetServiceInstanceResponse,
    UpdateServiceInstanceRequest, UpdateServiceInstanceResponse,
};
use crate::service::{ServiceInstanceBindingService, ServiceInstanceService};

pub struct ServiceInstanceEventService<S> {
    delegate: S,
    registries: Arc<EventFlowRegistries>,
}

impl<S> ServiceInstanceEventService<S> {
    pub fn new(delegate: S, registries: Arc<EventFlowRegistries>) -> Self {
        Self {
            delegate,
            registries,
        }
    }
}

#[async_trait::async_trait]
impl<S: ServiceInstanceService> ServiceInstanceService for ServiceInstanceEventService<S> {
    async fn create_service_instance(
        &self,
        request: &CreateServiceInstanceRequest,
    ) -> Result<CreateServiceInstanceResponse, Error> {
        run_with_flows(&self.registries.create_instance, request, || {
            self.delegate.create_service_instance(request)
        })
        .await
    }

    async fn get_service_instance(
        &self,
        request: &GetServiceInstanceRequest,
    ) -> Result<GetServiceInstanceResponse, Error> {
        self.delegate.get_service_instance(request).await
    }

    async fn update_service_instance(
        &self,
        request: &UpdateServiceInstanceRequest,
    ) -> Result<UpdateServiceInstanceResponse, Error> {
        run_with_flows(&self.registries.update_instance, request, || {
            self.delegate.update_service_instance(request)
        })
        .await
    }

    async fn delete_service_instance(
        &self,
        request: &DeleteServiceInstanceRequest,
    ) -> Result<DeleteServiceInstanceResponse, Error> {
        run_with_flows(&self.registries.delete_instance, request, || {
            self.delegate.delete_service_instance(request)
        })
        .await
    }

    async fn get_last_operation(
        &self,
        request: &GetLastServiceOperationRequest,
    ) -> Result<GetLastServiceOperationResponse, Error> {
        run_with_flows(&self.registries.async_operation_instance, request, || {
            self.delegate.get_last_operation(request)
        })
        .await
    }

    fn requires_async(&self, kind: OperationKind) -> bool {
        self.delegate.requires_async(kind)
    }
}

pub struct ServiceInstanceBindingEventService<S> {
    delegate: S,
    registries: Arc<EventFlowRegistries>,
}

impl<S> ServiceInstanceBindingEventService<S> {
    pub fn new(delegate: S, registries: Arc<EventFlowRegistries>) -> Self {
        Self {
            delegate,
            registries,
        }
    }
}

#[async_trait::async_trait]
impl<S: ServiceInstanceBindingService> ServiceInstanceBindingService
    for ServiceInstanceBindingEventService<S>
{
    async fn create_service_instance_binding(
        &self,
        request: &CreateServiceInstanceBindingRequest,
    ) -> Result<CreateServiceInstanceBindingResponse, Error> {
        run_with_flows(&self.registries.create_binding, request, || {
            self.delegate.create_service_instance_binding(request)
        })
        .await
    }

    async fn get_service_instance_binding(
        &self,
        request: &GetServiceInstanceBindingRequest,
    ) -> Result<GetServiceInstanceBindingResponse, Error> {
        self.delegate.get_service_instance_binding(request).await
    }

    async fn delete_service_instance_binding(
        &self,
        request: &DeleteServiceInstanceBindingRequest,
    ) -> Result<DeleteServiceInstanceBindingResponse, Error> {
        run_with_flows(&self.registries.delete_binding, request, || {
            self.delegate.delete_service_instance_binding(request)
        })
        .await
    }

    async fn get_last_operation(
        &self,
        request: &GetLastServiceBindingOperationRequest,
    ) -> Result<GetLastServiceBindingOperationResponse, Error> {
        run_with_flows(&self.registries.async_operation_binding, request, || {
            self.delegate.get_last_operation(request)
        })
        .await
    }

    fn requires_async(&self, kind: OperationKind) -> bool {
        self.delegate.requires_async(kind)
    }
}
