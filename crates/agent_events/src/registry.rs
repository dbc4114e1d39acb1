use std::borrow::Cow;

use serde_json::{json, Value};
use tracing::warn;

use crate::handler::{BoxedHandler, EventHandler};
use crate::kind::{LEGACY_KIND_ORDER, UNKNOWN_KIND};
use crate::payload::RawEvent;

struct Registered {
    handler: BoxedHandler,
    // Priority is captured at registration; a handler that later changes its
    // answer does not re-sort the list.
    priority: i32,
    seq: usize,
}

/// Session-owned event router.
///
/// Handlers are kept sorted ascending by priority, ties broken by registration
/// order. Dispatch isolates handler failures: one handler erroring never
/// blocks the rest or the caller.
#[derive(Default)]
pub struct EventRegistry {
    handlers: Vec<Registered>,
    next_seq: usize,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler. No uniqueness constraint; the same handler type
    /// may appear any number of times.
    pub fn register(&mut self, handler: BoxedHandler) {
        let priority = handler.priority();
        let seq = self.next_seq;
        self.next_seq += 1;
        self.handlers.push(Registered {
            handler,
            priority,
            seq,
        });
        self.handlers.sort_by_key(|r| (r.priority, r.seq));
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Handlers accepting `kind`, in priority order.
    pub fn get_handlers(&self, kind: &str) -> Vec<&(dyn EventHandler + Send)> {
        self.handlers
            .iter()
            .filter(|r| r.handler.can_handle(kind))
            .map(|r| r.handler.as_ref())
            .collect()
    }

    /// Normalizes, infers the kind, and dispatches to every matching handler.
    ///
    /// Returns all non-null handler results in invocation order. A failing
    /// handler contributes a synthesized `handler_error` record in its slot
    /// instead of raising.
    pub fn process_event(&mut self, event: &RawEvent) -> Vec<Value> {
        let normalized = normalize_event(event);
        let kind = infer_kind(&normalized);

        let mut results = Vec::new();
        for registered in &mut self.handlers {
            if !registered.handler.can_handle(&kind) {
                continue;
            }
            match registered.handler.handle(&normalized) {
                Ok(Some(value)) => results.push(value),
                Ok(None) => {}
                Err(err) => {
                    warn!(
                        handler = registered.handler.name(),
                        event_type = %kind,
                        error = %err,
                        "event handler failed; continuing dispatch"
                    );
                    results.push(json!({
                        "handler_error": {
                            "handler": registered.handler.name(),
                            "error_type": err.error_type(),
                            "error_message": err.message(),
                            "event_type": kind,
                        }
                    }));
                }
            }
        }
        results
    }
}

/// Rewrites legacy payloads into the standard dialect. First rule wins:
///
/// 1. payload already has `"type"`: identity;
/// 2. exactly one key, `"result"`: completion;
/// 3. has `"force_stop"`: forced stop with its reason;
/// 4. anything else: identity (legacy untyped, handlers match on keys).
pub fn normalize_event(event: &RawEvent) -> Cow<'_, RawEvent> {
    if event.contains("type") {
        return Cow::Borrowed(event);
    }

    if event.len() == 1 {
        if let Some(result) = event.get("result") {
            let mut rewritten = RawEvent::new();
            rewritten.insert("type", json!("complete"));
            rewritten.insert("result", result.clone());
            return Cow::Owned(rewritten);
        }
    }

    if event.contains("force_stop") {
        let reason = event
            .get("force_stop_reason")
            .cloned()
            .unwrap_or_else(|| json!("Unknown"));
        let mut rewritten = RawEvent::new();
        rewritten.insert("type", json!("force_stop"));
        rewritten.insert("reason", reason);
        return Cow::Owned(rewritten);
    }

    Cow::Borrowed(event)
}

/// Infers the dispatch kind of a payload.
///
/// An explicit `"type"` wins. Legacy payloads are scanned against
/// [`LEGACY_KIND_ORDER`]; failing that, the first key in the payload's own
/// iteration order stands in, and an empty payload reports
/// [`UNKNOWN_KIND`].
pub fn infer_kind(event: &RawEvent) -> String {
    if let Some(explicit) = event.str_field("type") {
        return explicit.to_string();
    }

    for key in LEGACY_KIND_ORDER {
        if event.contains(key) {
            return key.to_string();
        }
    }

    event
        .first_key()
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_KIND.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawEvent {
        RawEvent::from_value(value).unwrap()
    }

    #[test]
    fn typed_payloads_pass_through_unchanged() {
        let event = raw(json!({"type": "data", "data": "hello"}));
        let normalized = normalize_event(&event);
        assert!(matches!(normalized, Cow::Borrowed(_)));
        assert_eq!(normalized.as_ref(), &event);
    }

    #[test]
    fn lone_result_becomes_complete_and_is_a_fixed_point() {
        let event = raw(json!({"result": "X"}));
        let normalized = normalize_event(&event).into_owned();
        assert_eq!(
            normalized,
            raw(json!({"type": "complete", "result": "X"}))
        );

        let again = normalize_event(&normalized);
        assert_eq!(again.as_ref(), &normalized);
    }

    #[test]
    fn result_with_siblings_is_left_alone() {
        let event = raw(json!({"result": "X", "extra": 1}));
        let normalized = normalize_event(&event);
        assert_eq!(normalized.as_ref(), &event);
    }

    #[test]
    fn force_stop_rewrites_with_reason() {
        let event = raw(json!({"force_stop": true, "force_stop_reason": "timeout"}));
        let normalized = normalize_event(&event).into_owned();
        assert_eq!(
            normalized,
            raw(json!({"type": "force_stop", "reason": "timeout"}))
        );
    }

    #[test]
    fn force_stop_without_reason_defaults_to_unknown() {
        let event = raw(json!({"force_stop": true}));
        let normalized = normalize_event(&event).into_owned();
        assert_eq!(normalized.str_field("reason"), Some("Unknown"));
    }

    #[test]
    fn kind_inference_prefers_explicit_type() {
        let event = raw(json!({"type": "complete", "data": "x"}));
        assert_eq!(infer_kind(&event), "complete");
    }

    #[test]
    fn kind_inference_scans_legacy_keys_in_order() {
        let event = raw(json!({"reasoningText": "t", "data": "x"}));
        assert_eq!(infer_kind(&event), "data");

        let event = raw(json!({"force_stop": true, "tool_result": {}}));
        assert_eq!(infer_kind(&event), "tool_result");
    }

    #[test]
    fn kind_inference_falls_back_to_first_key() {
        let event = raw(json!({"unrelated_key": 123}));
        assert_eq!(infer_kind(&event), "unrelated_key");
    }

    #[test]
    fn kind_inference_reports_unknown_for_empty_payloads() {
        assert_eq!(infer_kind(&RawEvent::new()), UNKNOWN_KIND);
    }
}
