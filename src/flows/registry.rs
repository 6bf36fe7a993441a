use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::error::Error;

/// Runs before the delegate. A failure aborts the operation.
pub type InitializationFlow<Req> =
    Arc<dyn for<'a> Fn(&'a Req) -> BoxFuture<'a, Result<(), Error>> + Send + Sync>;

/// Runs after the delegate succeeded. A failure becomes the operation's failure.
pub type CompletionFlow<Req, Resp> =
    Arc<dyn for<'a> Fn(&'a Req, &'a Resp) -> BoxFuture<'a, Result<(), Error>> + Send + Sync>;

/// Runs after any failure. Failures are logged, never returned.
pub type ErrorFlow<Req> =
    Arc<dyn for<'a> Fn(&'a Req, &'a Error) -> BoxFuture<'a, Result<(), Error>> + Send + Sync>;

/// Ordered hooks for one operation kind.
///
/// Registration is append-only and happens at startup; insertion order is
/// execution order. Once wrapped in an `Arc` the registry is read-only and
/// shared by every in-flight request.
pub struct EventFlowRegistry<Req, Resp> {
    initialization_flows: Vec<InitializationFlow<Req>>,
    completion_flows: Vec<CompletionFlow<Req, Resp>>,
    error_flows: Vec<ErrorFlow<Req>>,
}

impl<Req, Resp> EventFlowRegistry<Req, Resp> {
    pub fn new() -> Self {
        Self {
            initialization_flows: Vec::new(),
            completion_flows: Vec::new(),
            error_flows: Vec::new(),
        }
    }

    pub fn add_initialization_flow<F>(&mut self, flow: F) -> &mut Self
    where
        F: for<'a> Fn(&'a Req) -> BoxFuture<'a, Result<(), Error>> + Send + Sync + 'static,
    {
        self.initialization_flows.push(Arc::new(flow));
        self
    }

    pub fn add_completion_flow<F>(&mut self, flow: F) -> &mut Self
    where
        F: for<'a> Fn(&'a Req, &'a Resp) -> BoxFuture<'a, Result<(), Error>>
            + Send
            + Sync
            + 'static,
    {
        self.completion_flows.push(Arc::new(flow));
        self
    }

    pub fn add_error_flow<F>(&mut self, flow: F) -> &mut Self
    where
        F: for<'a> Fn(&'a Req, &'a Error) -> BoxFuture<'a, Result<(), Error>>
            + Send
            + Sync
            + 'static,
    {
        self.error_flows.push(Arc::new(flow));
        self
    }

    pub fn initialization_flows(&self) -> &[InitializationFlow<Req>] {
        &self.initialization_flows
    }

    pub fn completion_flows(&self) -> &[CompletionFlow<Req, Resp>] {
        &self.completion_flows
    }

    pub fn error_flows(&self) -> &[ErrorFlow<Req>] {
        &self.error_flows
    }

    pub fn is_empty(&self) -> bool {
        self.initialization_flows.is_empty()
            && self.completion_flows.is_empty()
            && self.error_flows.is_empty()
    }
}

impl<Req, Resp> Default for EventFlowRegistry<Req, Resp> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Req, Resp> fmt::Debug for EventFlowRegistry<Req, Resp> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventFlowRegistry")
            .field("initialization_flows", &self.initialization_flows.len())
            .field("completion_flows", &self.completion_flows.len())
            .field("error_flows", &self.error_flows.len())
            .finish()
    }
}
