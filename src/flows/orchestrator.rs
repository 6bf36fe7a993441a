//! Runs a delegate operation between the hooks of an [`EventFlowRegistry`].
//!
//! ```text
//!   initialization flows (in order, first failure aborts)
//!        │ ok                          │ err
//!        ▼                             ▼
//!     delegate ──── err ────────► error flows (all, best-effort) ─► Err(original)
//!        │ ok
//!        ▼
//!   completion flows (in order, first failure is returned)
//!        │
//!        ▼
//!     Ok(response)
//! ```
//!
//! Every step is awaited before the next one starts; nothing runs concurrently
//! within one request. A panic in any step becomes [`Error::Unexpected`].
//! When an initialization failure is followed by failing error flows, the
//! result is [`Error::ErrorFlowsFailed`] carrying both.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;

use crate::error::Error;
use crate::flows::registry::EventFlowRegistry;

pub async fn run_with_flows<Req, Resp, D, Fut>(
    registry: &EventFlowRegistry<Req, Resp>,
    request: &Req,
    delegate: D,
) -> Result<Resp, Error>
where
    D: FnOnce() -> Fut,
    Fut: Future<Output = Result<Resp, Error>>,
{
    for (index, flow) in registry.initialization_flows().iter().enumerate() {
        if let Err(err) = guarded("initialization flow", async { flow(request).await }).await {
            tracing::debug!(flow = index, error = %err, "initialization flow failed");
            let hook_failures = run_error_flows(registry, request, &err).await;
            if hook_failures.is_empty() {
                return Err(err);
            }
            return Err(Error::ErrorFlowsFailed {
                source: Box::new(err),
                hook_failures,
            });
        }
    }

    let response = match guarded("delegate", async move { delegate().await }).await {
        Ok(response) => response,
        Err(err) => {
            // The delegate's failure is returned even when error flows fail.
            run_error_flows(registry, request, &err).await;
            return Err(err);
        }
    };

    for (index, flow) in registry.completion_flows().iter().enumerate() {
        if let Err(err) = guarded("completion flow", async { flow(request, &response).await }).await
        {
            tracing::debug!(flow = index, error = %err, "completion flow failed");
            return Err(err);
        }
    }

    Ok(response)
}

/// Awaits `future`, turning a panic into [`Error::Unexpected`].
async fn guarded<T, F>(stage: &'static str, future: F) -> Result<T, Error>
where
    F: Future<Output = Result<T, Error>>,
{
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => {
            let reason = format!("{stage} panicked: {}", panic_message(payload.as_ref()));
            tracing::error!(stage, reason = %reason, "panic caught");
            Err(Error::Unexpected { reason })
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Invokes every error flow, isolating each from the others' failures and panics.
///
/// Returns the failures of the flows that did not complete cleanly.
async fn run_error_flows<Req, Resp>(
    registry: &EventFlowRegistry<Req, Resp>,
    request: &Req,
    trigger: &Error,
) -> Vec<Error> {
    let mut failures = Vec::new();
    for (index, flow) in registry.error_flows().iter().enumerate() {
        if let Err(err) = guarded("error flow", async { flow(request, trigger).await }).await {
            tracing::warn!(flow = index, error = %err, trigger = %trigger, "error flow failed");
            failures.push(err);
        }
    }
    failures
}

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    clippy::panic,
    reason = "test code uses unwrap/panic for concise assertions"
)]
mod tests {
    use std::sync::{Arc, Mutex};

    use futures::future::BoxFuture;

    use super::*;

    type Log = Arc<Mutex<Vec<String>>>;

    fn marker<'a>(log: &Log, entry: String) -> BoxFuture<'a, Result<(), Error>> {
        let log = Arc::clone(log);
        async move {
            log.lock().unwrap().push(entry);
            Ok(())
        }
        .boxed()
    }

    fn failing<'a>(log: &Log, entry: String) -> BoxFuture<'a, Result<(), Error>> {
        let log = Arc::clone(log);
        async move {
            log.lock().unwrap().push(entry.clone());
            Err(Error::Broker { reason: entry })
        }
        .boxed()
    }

    fn panicking<'a>(message: &'static str) -> BoxFuture<'a, Result<(), Error>> {
        async move { panic!("{message}") }.boxed()
    }

    fn registry(log: &Log) -> EventFlowRegistry<String, u32> {
        let mut registry = EventFlowRegistry::new();
        let (l1, l2, l3, l4) = (log.clone(), log.clone(), log.clone(), log.clone());
        registry
            .add_initialization_flow(move |req| marker(&l1, format!("init-1 {req}")))
            .add_initialization_flow(move |req| marker(&l2, format!("init-2 {req}")))
            .add_completion_flow(move |req, resp| marker(&l3, format!("complete {req} {resp}")))
            .add_error_flow(move |req, err| marker(&l4, format!("error {req}: {err}")));
        registry
    }

    fn entries(log: &Log) -> Vec<String> {
        log.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn success_runs_init_delegate_and_completion_in_order() {
        let log = Log::default();
        let registry = registry(&log);
        let delegate_log = log.clone();

        let response = run_with_flows(&registry, &"foo".to_string(), || async move {
            delegate_log.lock().unwrap().push("delegate".to_string());
            Ok(7)
        })
        .await
        .unwrap();

        assert_eq!(response, 7);
        assert_eq!(
            entries(&log),
            vec!["init-1 foo", "init-2 foo", "delegate", "complete foo 7"]
        );
    }

    #[tokio::test]
    async fn delegate_failure_runs_error_flows_and_keeps_original_error() {
        let log = Log::default();
        let registry = registry(&log);

        let err = run_with_flows(&registry, &"foo".to_string(), || async {
            Err::<u32, _>(Error::ServiceInstanceDoesNotExist {
                service_instance_id: "foo".to_string(),
            })
        })
        .await
        .unwrap_err();

        assert!(matches!(err, Error::ServiceInstanceDoesNotExist { .. }));
        assert_eq!(
            entries(&log),
            vec![
                "init-1 foo",
                "init-2 foo",
                "error foo: Service instance does not exist: id=foo"
            ]
        );
    }

    #[tokio::test]
    async fn initialization_failure_skips_delegate_and_completion() {
        let log = Log::default();
        let mut registry: EventFlowRegistry<String, u32> = EventFlowRegistry::new();
        let (l1, l2, l3, l4) = (log.clone(), log.clone(), log.clone(), log.clone());
        registry
            .add_initialization_flow(move |req| failing(&l1, format!("init-1 {req}")))
            .add_initialization_flow(move |req| marker(&l2, format!("init-2 {req}")))
            .add_completion_flow(move |req, _| marker(&l3, format!("complete {req}")))
            .add_error_flow(move |req, err| marker(&l4, format!("error {req}: {err}")));

        let err = run_with_flows(&registry, &"foo".to_string(), || async {
            panic!("delegate must not run")
        })
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), "init-1 foo");
        assert_eq!(entries(&log), vec!["init-1 foo", "error foo: init-1 foo"]);
    }

    #[tokio::test]
    async fn completion_failure_fails_call_without_error_flows() {
        let log = Log::default();
        let mut registry: EventFlowRegistry<String, u32> = EventFlowRegistry::new();
        let (l1, l2, l3) = (log.clone(), log.clone(), log.clone());
        registry
            .add_completion_flow(move |req, _| failing(&l1, format!("complete-1 {req}")))
            .add_completion_flow(move |req, _| marker(&l2, format!("complete-2 {req}")))
            .add_error_flow(move |req, _| marker(&l3, format!("error {req}")));

        let err = run_with_flows(&registry, &"foo".to_string(), || async { Ok(1) })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "complete-1 foo");
        assert_eq!(entries(&log), vec!["complete-1 foo"]);
    }

    #[tokio::test]
    async fn failing_error_flow_does_not_stop_the_others() {
        let log = Log::default();
        let mut registry: EventFlowRegistry<String, u32> = EventFlowRegistry::new();
        let (l1, l2, l3) = (log.clone(), log.clone(), log.clone());
        registry
            .add_error_flow(move |_, _| marker(&l1, "error-1".to_string()))
            .add_error_flow(move |_, _| failing(&l2, "error-2".to_string()))
            .add_error_flow(move |_, _| marker(&l3, "error-3".to_string()));

        let err = run_with_flows(&registry, &"foo".to_string(), || async {
            Err::<u32, _>(Error::OperationInProgress {
                reason: "still working".to_string(),
            })
        })
        .await
        .unwrap_err();

        assert!(matches!(err, Error::OperationInProgress { .. }));
        assert_eq!(entries(&log), vec!["error-1", "error-2", "error-3"]);
    }

    #[tokio::test]
    async fn panicking_error_flow_is_isolated() {
        let log = Log::default();
        let mut registry: EventFlowRegistry<String, u32> = EventFlowRegistry::new();
        let l2 = log.clone();
        registry
            .add_error_flow(|_, _| panicking("hook bug"))
            .add_error_flow(move |_, _| marker(&l2, "error-2".to_string()));

        let failures = run_error_flows(
            &registry,
            &"foo".to_string(),
            &Error::Broker {
                reason: "boom".to_string(),
            },
        )
        .await;

        assert_eq!(failures.len(), 1);
        assert!(matches!(
            &failures[0],
            Error::Unexpected { reason } if reason.contains("hook bug")
        ));
        assert_eq!(entries(&log), vec!["error-2"]);
    }

    #[tokio::test]
    async fn failing_error_flow_after_initialization_failure_is_surfaced() {
        let log = Log::default();
        let mut registry: EventFlowRegistry<String, u32> = EventFlowRegistry::new();
        let (l1, l2) = (log.clone(), log.clone());
        registry
            .add_initialization_flow(move |_| failing(&l1, "init failed".to_string()))
            .add_error_flow(move |_, _| failing(&l2, "audit sink down".to_string()));

        let err = run_with_flows(&registry, &"foo".to_string(), || async { Ok(1) })
            .await
            .unwrap_err();

        let Error::ErrorFlowsFailed {
            source,
            hook_failures,
        } = &err
        else {
            panic!("expected error flow failures to be surfaced, got {err:?}");
        };
        assert!(matches!(source.as_ref(), Error::Broker { reason } if reason == "init failed"));
        assert_eq!(hook_failures.len(), 1);
        assert_eq!(hook_failures[0].to_string(), "audit sink down");
        assert_eq!(err.kind(), crate::error::ErrorKind::Broker);
        assert!(err.to_string().contains("audit sink down"));
        assert_eq!(entries(&log), vec!["init failed", "audit sink down"]);
    }

    #[tokio::test]
    async fn failing_error_flow_after_delegate_failure_keeps_original_error() {
        let log = Log::default();
        let mut registry: EventFlowRegistry<String, u32> = EventFlowRegistry::new();
        let l1 = log.clone();
        registry.add_error_flow(move |_, _| failing(&l1, "audit sink down".to_string()));

        let err = run_with_flows(&registry, &"foo".to_string(), || async {
            Err::<u32, _>(Error::Concurrency {
                reason: "instance changed".to_string(),
            })
        })
        .await
        .unwrap_err();

        assert!(matches!(err, Error::Concurrency { .. }));
        assert_eq!(entries(&log), vec!["audit sink down"]);
    }

    #[tokio::test]
    async fn panicking_delegate_becomes_unexpected_and_runs_error_flows() {
        let log = Log::default();
        let registry = registry(&log);

        let err = run_with_flows(&registry, &"foo".to_string(), || async {
            panic!("backend bug")
        })
        .await
        .unwrap_err();

        assert!(matches!(&err, Error::Unexpected { reason } if reason.contains("backend bug")));
        assert_eq!(entries(&log).len(), 3);
        assert!(entries(&log)[2].starts_with("error foo: unexpected error: delegate panicked"));
    }

    #[tokio::test]
    async fn panicking_initialization_and_completion_flows_are_caught() {
        let mut registry: EventFlowRegistry<String, u32> = EventFlowRegistry::new();
        registry.add_initialization_flow(|_| panicking("init bug"));
        let err = run_with_flows(&registry, &"foo".to_string(), || async { Ok(1) })
            .await
            .unwrap_err();
        assert!(matches!(&err, Error::Unexpected { reason } if reason.contains("init bug")));

        let mut registry: EventFlowRegistry<String, u32> = EventFlowRegistry::new();
        registry.add_completion_flow(|_, _| panicking("completion bug"));
        let err = run_with_flows(&registry, &"foo".to_string(), || async { Ok(1) })
            .await
            .unwrap_err();
        assert!(matches!(&err, Error::Unexpected { reason } if reason.contains("completion bug")));
    }
}
