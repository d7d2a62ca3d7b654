use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::mpsc::Sender;

use cgmath::Point2;

use crate::input::ecodes;
use crate::input::raw::{EventKind, RawInputEvent};
use crate::input::PointerEvent;

/// Shared view of the single tracked contact.
///
/// The reader thread writes the raw coordinates and drives the
/// active/idle transitions; the foreground tick writes the delivery
/// bookkeeping (`press_sent`, last sent mapped position, drag anchor).
/// Each field has one logical writer at a time, so relaxed atomics give
/// all the visibility that is needed.
pub struct ContactState {
    active: AtomicBool,
    touch_x: AtomicI32,
    touch_y: AtomicI32,
    last_drag_x: AtomicI32,
    last_drag_y: AtomicI32,
    press_sent: AtomicBool,
    last_sent_x: AtomicI32,
    last_sent_y: AtomicI32,
}

impl ::std::default::Default for ContactState {
    fn default() -> Self {
        ContactState {
            active: AtomicBool::new(false),
            touch_x: AtomicI32::new(0),
            touch_y: AtomicI32::new(0),
            last_drag_x: AtomicI32::new(0),
            last_drag_y: AtomicI32::new(0),
            press_sent: AtomicBool::new(false),
            last_sent_x: AtomicI32::new(0),
            last_sent_y: AtomicI32::new(0),
        }
    }
}

impl ContactState {
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }

    /// Latest raw sensor coordinate reported by the device.
    pub fn touch_position(&self) -> Point2<i32> {
        Point2 {
            x: self.touch_x.load(Ordering::Relaxed),
            y: self.touch_y.load(Ordering::Relaxed),
        }
    }

    /// Whether the press for the current contact already went out.
    pub fn press_sent(&self) -> bool {
        self.press_sent.load(Ordering::Relaxed)
    }

    /// Raw coordinate of the last delivered press or drag.
    pub fn drag_anchor(&self) -> Point2<i32> {
        Point2 {
            x: self.last_drag_x.load(Ordering::Relaxed),
            y: self.last_drag_y.load(Ordering::Relaxed),
        }
    }

    /// Mapped screen coordinate of the last delivered press or drag. The
    /// release for this contact is queued at this position.
    pub fn last_sent(&self) -> Point2<i32> {
        Point2 {
            x: self.last_sent_x.load(Ordering::Relaxed),
            y: self.last_sent_y.load(Ordering::Relaxed),
        }
    }

    /// Record that the press for the current contact was delivered at
    /// `mapped`, anchoring future drags at `raw`.
    pub fn record_press(&self, raw: Point2<i32>, mapped: Point2<i32>) {
        self.press_sent.store(true, Ordering::Relaxed);
        self.record_drag(raw, mapped);
    }

    /// Record a delivered drag update.
    pub fn record_drag(&self, raw: Point2<i32>, mapped: Point2<i32>) {
        self.last_drag_x.store(raw.x, Ordering::Relaxed);
        self.last_drag_y.store(raw.y, Ordering::Relaxed);
        self.last_sent_x.store(mapped.x, Ordering::Relaxed);
        self.last_sent_y.store(mapped.y, Ordering::Relaxed);
    }

    /// Drop the contact without emitting a release. Only used when the GUI
    /// surface went away mid-contact and there is nothing to release into.
    pub fn force_idle(&self) {
        self.active.store(false, Ordering::Relaxed);
        self.press_sent.store(false, Ordering::Relaxed);
    }
}

/// Feed one decoded record through the contact state machine. Runs on the
/// reader thread; `queue` receives the discrete events that the engine
/// drains on the foreground tick.
pub fn feed(state: &ContactState, ev: &RawInputEvent, queue: &Sender<PointerEvent>) {
    match ev.kind {
        EventKind::Sync => { /* frame boundary, nothing tracked per-frame */ }
        EventKind::AbsAxis => match ev.code {
            ecodes::ABS_MT_POSITION_X => {
                state.touch_x.store(ev.value, Ordering::Relaxed);
            }
            ecodes::ABS_MT_POSITION_Y => {
                state.touch_y.store(ev.value, Ordering::Relaxed);
            }
            ecodes::ABS_MT_TRACKING_ID => {
                if ev.value == -1 {
                    touch_ended(state, queue);
                } else {
                    touch_started(state);
                }
            }
            _ => {
                debug!(
                    "unhandled absolute axis (code={0}, value={1})",
                    ev.code, ev.value
                );
            }
        },
        EventKind::Key => {
            if ev.code == ecodes::BTN_TOUCH {
                match ev.value {
                    1 => touch_started(state),
                    0 => touch_ended(state, queue),
                    other => debug!("unexpected BTN_TOUCH value {0}", other),
                }
            }
        }
        EventKind::Unknown => {
            debug!(
                "unknown event type for touch device [code: {0} value: {1}]",
                ev.code, ev.value
            );
        }
    }
}

fn touch_started(state: &ContactState) {
    // Edge trigger: repeated presence signals while active must not re-arm
    // the press.
    if state.active.swap(true, Ordering::Relaxed) {
        return;
    }

    state.press_sent.store(false, Ordering::Relaxed);
    let pos = state.touch_position();
    state.last_drag_x.store(pos.x, Ordering::Relaxed);
    state.last_drag_y.store(pos.y, Ordering::Relaxed);
    debug!("touch started at ({0}, {1})", pos.x, pos.y);
}

fn touch_ended(state: &ContactState, queue: &Sender<PointerEvent>) {
    if !state.active.swap(false, Ordering::Relaxed) {
        return;
    }

    state.press_sent.store(false, Ordering::Relaxed);
    state.last_drag_x.store(0, Ordering::Relaxed);
    state.last_drag_y.store(0, Ordering::Relaxed);

    // The release goes out where the press/drag was last delivered, not at
    // the latest raw coordinate.
    let pos = state.last_sent();
    if let Err(e) = queue.send(PointerEvent::Release { pos }) {
        error!("failed to queue the release event: {0}", e);
    }
    debug!("touch ended at screen ({0}, {1})", pos.x, pos.y);
}
