//! Canonical schema constants for structured logging and events
//!
//! These constants keep log output consistent between the reconcilers,
//! the diagnostic sinks and the test capture layer.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Record field a diagnostic refers to
pub const FIELD_FIELD: &str = "field";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_DIAGNOSTIC: &str = "diagnostic";
