pub mod orchestrator;
pub mod registry;

use crate::operations::LastOperationResponse;
use crate::operations::binding::{
    CreateServiceInstanceBindingRequest, CreateServiceInstanceBindingResponse,
    DeleteServiceInstanceBindingRequest, DeleteServiceInstanceBindingResponse,
    GetLastServiceBindingOperationRequest,
};
use crate::operations::instance::{
    CreateServiceInstanceRequest, CreateServiceInstanceResponse, DeleteServiceInstanceRequest,
    DeleteServiceInstanceResponse, GetLastServiceOperationRequest, UpdateServiceInstanceRequest,
    UpdateServiceInstanceResponse,
};
pub use orchestrator::run_with_flows;
pub use registry::{CompletionFlow, ErrorFlow, EventFlowRegistry, InitializationFlow};

/// The seven process-wide registries, one per flow-carrying operation.
///
/// Populate at startup, then share behind an `Arc`.
#[derive(Debug, Default)]
pub struct EventFlowRegistries {
    pub create_instance: EventFlowRegistry<CreateServiceInstanceRequest, CreateServiceInstanceResponse>,
    pub update_instance: EventFlowRegistry<UpdateServiceInstanceRequest, UpdateServiceInstanceResponse>,
    pub delete_instance: EventFlowRegistry<DeleteServiceInstanceRequest, DeleteServiceInstanceResponse>,
    pub async_operation_instance:
        EventFlowRegistry<GetLastServiceOperationRequest, LastOperationResponse>,
    pub create_binding:
        EventFlowRegistry<CreateServiceInstanceBindingRequest, CreateServiceInstanceBindingResponse>,
    pub delete_binding:
        EventFlowRegistry<DeleteServiceInstanceBindingRequest, DeleteServiceInstanceBindingResponse>,
    pub async_operation_binding:
        EventFlowRegistry<GetLastServiceBindingOperationRequest, LastOperationResponse>,
}

impl EventFlowRegistries {
    pub fn new() -> Self {
        Self::default()
    }
}
