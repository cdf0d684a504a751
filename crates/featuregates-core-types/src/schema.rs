//! Canonical schema constants for structured logging and events
//!
//! These constants keep op and event names stable between the logging
//! macros and test assertions.

// Canonical field keys read back by test capture
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

// Canonical operation names
pub const OP_LOAD: &str = "gates.load";
pub const OP_SET: &str = "gates.set";
pub const OP_INITIALIZE: &str = "gates.initialize";
pub const OP_RELOAD: &str = "gates.reload";
pub const OP_REFRESH: &str = "gates.refresh";

/// Message carried by the record handed to the reload logger
pub const RELOAD_MESSAGE: &str = "Feature gates loaded";
