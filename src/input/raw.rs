use crate::error::{Result, TouchBridgeError};
use crate::input::ecodes;

/// Size of one kernel input record on the wire: a 16-byte timestamp we
/// discard, then a 2-byte type, a 2-byte code and a 4-byte signed value,
/// all little-endian.
pub const INPUT_EVENT_SIZE: usize = 24;

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum EventKind {
    Sync,
    Key,
    AbsAxis,
    Unknown,
}

/// One decoded kernel input record. Produced and consumed within a single
/// read-decode-feed step of the reader loop.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct RawInputEvent {
    pub kind: EventKind,
    pub code: u16,
    pub value: i32,
}

impl RawInputEvent {
    /// Decode one fixed-size record. A buffer shorter than
    /// `INPUT_EVENT_SIZE` is the only error and is fatal to the stream;
    /// the reader treats it like a failed read.
    pub fn decode(buf: &[u8]) -> Result<RawInputEvent> {
        if buf.len() < INPUT_EVENT_SIZE {
            return Err(TouchBridgeError::ShortRecord {
                expected: INPUT_EVENT_SIZE,
                actual: buf.len(),
            });
        }

        let ev_type = u16::from_le_bytes([buf[16], buf[17]]);
        let code = u16::from_le_bytes([buf[18], buf[19]]);
        let value = i32::from_le_bytes([buf[20], buf[21], buf[22], buf[23]]);

        let kind = match ev_type {
            ecodes::EV_SYN => EventKind::Sync,
            ecodes::EV_KEY => EventKind::Key,
            ecodes::EV_ABS => EventKind::AbsAxis,
            _ => EventKind::Unknown,
        };

        Ok(RawInputEvent { kind, code, value })
    }
}
