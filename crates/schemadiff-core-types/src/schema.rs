//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Comparison identifiers
pub const FIELD_SCOPE: &str = "scope";
pub const FIELD_EXISTING_REF: &str = "existing_ref";
pub const FIELD_FUTURE_REF: &str = "future_ref";

// Report sizes
pub const FIELD_ADDED_LEN: &str = "added_len";
pub const FIELD_REMOVED_LEN: &str = "removed_len";
pub const FIELD_CHANGED_LEN: &str = "changed_len";
pub const FIELD_BREAKING_LEN: &str = "breaking_len";
pub const FIELD_POTENTIALLY_BREAKING_LEN: &str = "potentially_breaking_len";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
