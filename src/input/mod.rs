/// Contains the code to decode the fixed-size kernel input records read
/// off the device stream
pub mod raw;

/// Kernel event type and code constants recognized by the decoder
pub mod ecodes;

/// Contains the single-contact state machine fed by decoded events
pub mod contact;

/// Contains the background reader loop that owns the blocking device
/// stream and drives the decoder and the contact tracker
pub mod ev;

use cgmath::Point2;

/// A discrete pointer event derived from contact transitions, carrying the
/// mapped screen position it applies to. Queued in FIFO order and consumed
/// exactly once by the engine's per-tick drain; a `Release` is always
/// drained after its matching press went out.
#[derive(Debug, PartialEq, Copy, Clone)]
pub enum PointerEvent {
    Press { pos: Point2<i32> },
    Release { pos: Point2<i32> },
}
