#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::dbg_macro,
        clippy::print_stdout,
        clippy::print_stderr,
        clippy::panic,
    )
)]

pub mod broker;
pub mod catalog;
pub mod config;
pub mod error;
pub mod flows;
pub mod lifecycle;
pub mod operations;
pub mod service;
pub mod types;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use broker::ServiceBroker;
pub use catalog::{Catalog, CatalogService, Plan, ServiceDefinition};
pub use config::BrokerConfig;
pub use error::{Error, ErrorKind, ErrorMessage};
pub use flows::{EventFlowRegistries, EventFlowRegistry, run_with_flows};
pub use lifecycle::mapping::{error_kind_to_outcome, error_to_outcome};
pub use lifecycle::{LifecycleEngine, LifecycleResponse, Outcome};
pub use operations::{AsyncResponse, LastOperationResponse, OperationKind, OperationState};
pub use service::events::{ServiceInstanceBindingEventService, ServiceInstanceEventService};
pub use service::{ServiceInstanceBindingService, ServiceInstanceService};
pub use types::{OriginatingIdentity, RequestContext};
