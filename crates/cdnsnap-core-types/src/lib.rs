//! Core types shared across cdnsnap facilities
//!
//! - **Schema constants**: canonical field keys and event names used by the
//!   structured logging macros and the diagnostic sinks

pub mod schema;
