//! In-memory recording tracer for tests.
//!
//! `RecordingTracer` keeps every span it starts, and all of its spans append
//! to one shared, ordered event log. Tests can interleave their own markers
//! with `push_event` to assert the relative order of span operations and
//! handler invocation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::span::{Span, SpanContext, SpanHandle};
use crate::tracer::Tracer;

/// Tracer that records spans in memory.
#[derive(Default)]
pub struct RecordingTracer {
    spans: Mutex<Vec<Arc<RecordingSpan>>>,
    events: Arc<Mutex<Vec<String>>>,
}

impl RecordingTracer {
    pub fn new() -> Self {
        Self::default()
    }

    /// All spans started so far, in start order.
    pub fn spans(&self) -> Vec<Arc<RecordingSpan>> {
        self.spans.lock().unwrap().clone()
    }

    /// Spans whose `finish` has been called at least once.
    pub fn finished_spans(&self) -> Vec<Arc<RecordingSpan>> {
        self.spans()
            .into_iter()
            .filter(|span| span.is_finished())
            .collect()
    }

    /// Number of spans started so far.
    pub fn span_count(&self) -> usize {
        self.spans.lock().unwrap().len()
    }

    /// The ordered event log across all spans of this tracer.
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    /// Append a caller-supplied marker to the event log.
    pub fn push_event(&self, event: impl Into<String>) {
        self.events.lock().unwrap().push(event.into());
    }

    fn record(&self, span: Arc<RecordingSpan>, start_event: String) {
        self.events.lock().unwrap().push(start_event);
        self.spans.lock().unwrap().push(span);
    }
}

impl Tracer for RecordingTracer {
    fn start_span(&self, operation_name: &str) -> SpanHandle {
        let span = Arc::new(RecordingSpan::new(
            operation_name,
            SpanContext::new_root(),
            None,
            self.events.clone(),
        ));
        self.record(span.clone(), format!("start_span {operation_name}"));
        span
    }

    fn start_child_span(&self, operation_name: &str, parent: &SpanContext) -> SpanHandle {
        let span = Arc::new(RecordingSpan::new(
            operation_name,
            SpanContext::new_child(parent),
            Some(parent.span_id),
            self.events.clone(),
        ));
        self.record(span.clone(), format!("start_child_span {operation_name}"));
        span
    }
}

/// A span recorded by [`RecordingTracer`].
pub struct RecordingSpan {
    context: SpanContext,
    parent_span_id: Option<Uuid>,
    state: Mutex<SpanState>,
    events: Arc<Mutex<Vec<String>>>,
}

struct SpanState {
    operation_name: String,
    tags: HashMap<String, serde_json::Value>,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    finish_count: u32,
}

impl RecordingSpan {
    fn new(
        operation_name: &str,
        context: SpanContext,
        parent_span_id: Option<Uuid>,
        events: Arc<Mutex<Vec<String>>>,
    ) -> Self {
        Self {
            context,
            parent_span_id,
            state: Mutex::new(SpanState {
                operation_name: operation_name.to_string(),
                tags: HashMap::new(),
                started_at: Utc::now(),
                finished_at: None,
                finish_count: 0,
            }),
            events,
        }
    }

    /// Current operation name, reflecting any renames.
    pub fn operation_name(&self) -> String {
        self.state.lock().unwrap().operation_name.clone()
    }

    /// Span id of the parent, if this span was started as a child.
    pub fn parent_span_id(&self) -> Option<Uuid> {
        self.parent_span_id
    }

    /// This span's trace identity.
    pub fn span_context(&self) -> SpanContext {
        self.context
    }

    /// Snapshot of all tags set so far.
    pub fn tags(&self) -> HashMap<String, serde_json::Value> {
        self.state.lock().unwrap().tags.clone()
    }

    /// Value of one tag, if set.
    pub fn tag(&self, key: &str) -> Option<serde_json::Value> {
        self.state.lock().unwrap().tags.get(key).cloned()
    }

    /// Whether `finish` has been called at least once.
    pub fn is_finished(&self) -> bool {
        self.state.lock().unwrap().finished_at.is_some()
    }

    /// Number of times `finish` has been called.
    pub fn finish_count(&self) -> u32 {
        self.state.lock().unwrap().finish_count
    }

    /// Wall-clock duration, available once finished.
    pub fn duration_ms(&self) -> Option<u64> {
        let state = self.state.lock().unwrap();
        state
            .finished_at
            .map(|end| (end - state.started_at).num_milliseconds().max(0) as u64)
    }
}

impl Span for RecordingSpan {
    fn context(&self) -> SpanContext {
        self.context
    }

    fn set_operation_name(&self, operation_name: &str) {
        self.state.lock().unwrap().operation_name = operation_name.to_string();
        self.events
            .lock()
            .unwrap()
            .push(format!("set_operation_name {operation_name}"));
    }

    fn set_tag(&self, key: &str, value: serde_json::Value) {
        self.events
            .lock()
            .unwrap()
            .push(format!("set_tag {key}={value}"));
        self.state.lock().unwrap().tags.insert(key.to_string(), value);
    }

    fn finish(&self) {
        let mut state = self.state.lock().unwrap();
        state.finish_count += 1;
        if state.finished_at.is_none() {
            state.finished_at = Some(Utc::now());
        }
        self.events.lock().unwrap().push("finish".to_string());
    }
}
