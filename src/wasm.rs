use strum::IntoEnumIterator;
use wasm_bindgen::prelude::*;

use crate::error::ErrorKind;
use crate::lifecycle::mapping;
use crate::lifecycle::{LifecycleEngine, Outcome};
use crate::operations::OperationState;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = JSON)]
    fn parse(s: &str) -> JsValue;
}

fn to_js(value: &serde_json::Value) -> JsValue {
    match serde_json::to_string(value) {
        Ok(json_str) => parse(&json_str),
        Err(_) => JsValue::NULL,
    }
}

fn outcome_result(outcome: Outcome) -> JsValue {
    to_js(&serde_json::json!({
        "outcome": outcome.as_ref(),
        "status": outcome.status_code(),
    }))
}

/// Outcome of a create (instance or binding).
#[wasm_bindgen]
pub fn decide_create(is_async: bool, existed: bool) -> JsValue {
    outcome_result(LifecycleEngine::decide_create(is_async, existed))
}

#[wasm_bindgen]
pub fn decide_update(is_async: bool) -> JsValue {
    outcome_result(LifecycleEngine::decide_update(is_async))
}

#[wasm_bindgen]
pub fn decide_delete(is_async: bool) -> JsValue {
    outcome_result(LifecycleEngine::decide_delete(is_async))
}

/// Accepts both `IN_PROGRESS` and the lowercase protocol spelling.
#[wasm_bindgen]
pub fn decide_last_operation(state: &str, delete_operation: bool) -> JsValue {
    let parsed = state.parse::<OperationState>().ok().or_else(|| {
        serde_json::from_value::<OperationState>(serde_json::Value::String(state.to_string())).ok()
    });
    let Some(state) = parsed else {
        return error_result(&format!("Unknown operation state \"{state}\""));
    };
    outcome_result(LifecycleEngine::decide_last_operation(state, delete_operation))
}

/// Map an error kind name to its outcome and status code.
#[wasm_bindgen]
pub fn error_kind_to_outcome(kind: &str) -> JsValue {
    match kind.parse::<ErrorKind>() {
        Ok(kind) => outcome_result(mapping::error_kind_to_outcome(kind)),
        Err(_) => error_result(&format!("Unknown error kind \"{kind}\"")),
    }
}

/// The full error taxonomy as `[{kind, outcome, status}]`.
#[wasm_bindgen]
pub fn get_error_taxonomy() -> JsValue {
    let rows: Vec<serde_json::Value> = ErrorKind::iter()
        .map(|kind| {
            let outcome = mapping::error_kind_to_outcome(kind);
            serde_json::json!({
                "kind": kind.as_ref(),
                "outcome": outcome.as_ref(),
                "status": outcome.status_code(),
            })
        })
        .collect();
    to_js(&serde_json::Value::Array(rows))
}

fn error_result(msg: &str) -> JsValue {
    let obj = serde_json::json!({"error": msg});
    to_js(&obj)
}
