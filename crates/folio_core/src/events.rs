//! Input event types
//!
//! Event types are plain `u32` constants so they can be stored in listener
//! tables and compared cheaply.

/// Event type identifier
pub type EventType = u32;

pub mod event_types {
    use super::EventType;

    pub const POINTER_ENTER: EventType = 1;
    pub const POINTER_LEAVE: EventType = 2;
    pub const FOCUS: EventType = 10;
    pub const BLUR: EventType = 11;

    /// Human-readable name, used in logs
    pub fn name(event_type: EventType) -> &'static str {
        match event_type {
            POINTER_ENTER => "pointer_enter",
            POINTER_LEAVE => "pointer_leave",
            FOCUS => "focus",
            BLUR => "blur",
            _ => "unknown",
        }
    }
}
