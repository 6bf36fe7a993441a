pub mod events;

use crate::error::Error;
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

/// Backend implementation of the service instance operations.
///
/// State of the instances is owned by the implementor. Operations without a
/// natural implementation default to an error the platform can act on.
#[async_trait::async_trait]
pub trait ServiceInstanceService: Send + Sync {
    async fn create_service_instance(
        &self,
        request: &CreateServiceInstanceRequest,
    ) -> Result<CreateServiceInstanceResponse, Error>;

    async fn get_service_instance(
        &self,
        request: &GetServiceInstanceRequest,
    ) -> Result<GetServiceInstanceResponse, Error> {
        Err(Error::Broker {
            reason: format!(
                "This service broker does not support retrieving service instances: {}",
                request.service_instance_id
            ),
        })
    }

    async fn update_service_instance(
        &self,
        request: &UpdateServiceInstanceRequest,
    ) -> Result<UpdateServiceInstanceResponse, Error> {
        Err(Error::InstanceUpdateNotSupported {
            reason: format!(
                "service instance {} cannot be updated",
                request.service_instance_id
            ),
        })
    }

    async fn delete_service_instance(
        &self,
        request: &DeleteServiceInstanceRequest,
    ) -> Result<DeleteServiceInstanceResponse, Error>;

    async fn get_last_operation(
        &self,
        request: &GetLastServiceOperationRequest,
    ) -> Result<GetLastServiceOperationResponse, Error> {
        Err(Error::Broker {
            reason: format!(
                "last operation of service instance {} is not tracked",
                request.service_instance_id
            ),
        })
    }

    /// Whether `kind` can only complete asynchronously for this backend.
    fn requires_async(&self, _kind: OperationKind) -> bool {
        false
    }
}

/// Backend implementation of the service binding operations.
#[async_trait::async_trait]
pub trait ServiceInstanceBindingService: Send + Sync {
    async fn create_service_instance_binding(
        &self,
        request: &CreateServiceInstanceBindingRequest,
    ) -> Result<CreateServiceInstanceBindingResponse, Error>;

    async fn get_service_instance_binding(
        &self,
        request: &GetServiceInstanceBindingRequest,
    ) -> Result<GetServiceInstanceBindingResponse, Error> {
        Err(Error::Broker {
            reason: format!(
                "This service broker does not support retrieving service bindings: {}",
                request.binding_id
            ),
        })
    }

    async fn delete_service_instance_binding(
        &self,
        request: &DeleteServiceInstanceBindingRequest,
    ) -> Result<DeleteServiceInstanceBindingResponse, Error>;

    async fn get_last_operation(
        &self,
        request: &GetLastServiceBindingOperationRequest,
    ) -> Result<GetLastServiceBindingOperationResponse, Error> {
        Err(Error::Broker {
            reason: format!(
                "last operation of service binding {} is not tracked",
                request.binding_id
            ),
        })
    }

    fn requires_async(&self, _kind: OperationKind) -> bool {
        false
    }
}
