use serde_json::{json, Value};

/// Echoes a platform ownership challenge back to the caller.
///
/// Returns `None` when the payload carries no `challenge` key, in which case
/// the event is processed normally.
pub fn handle_challenge(payload: &Value) -> Option<Value> {
    payload
        .as_object()
        .and_then(|object| object.get("challenge"))
        .map(|challenge| json!({ "challenge": challenge }))
}
