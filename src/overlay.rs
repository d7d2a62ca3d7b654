use std::time::{Duration, Instant};

use cgmath::Point2;

/// How long a recorded marker stays visible.
pub const MARKER_LIFETIME: Duration = Duration::from_millis(2000);

/// Radius the host should draw markers at, in scaled display pixels.
pub const MARKER_RADIUS: i32 = 15;

/// One recorded press position.
#[derive(Debug, Copy, Clone)]
pub struct ClickMarker {
    pub pos: Point2<i32>,
    pub created: Instant,
}

impl ClickMarker {
    /// Remaining opacity in `[0, 1]`, fading linearly over the lifetime.
    pub fn opacity(&self, now: Instant) -> f32 {
        let age = now.saturating_duration_since(self.created);
        if age >= MARKER_LIFETIME {
            return 0.0;
        }
        1.0 - age.as_secs_f32() / MARKER_LIFETIME.as_secs_f32()
    }

    fn expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created) > MARKER_LIFETIME
    }
}

/// Bookkeeping for the debug overlay: an ordered sequence of recorded
/// click markers, owned by the host integration layer. The host records a
/// marker per synthesized press and runs `sweep` once per render tick
/// before drawing whatever `markers` still holds.
#[derive(Default)]
pub struct MarkerOverlay {
    enabled: bool,
    markers: Vec<ClickMarker>,
}

impl MarkerOverlay {
    pub fn new(enabled: bool) -> MarkerOverlay {
        MarkerOverlay {
            enabled,
            markers: Vec::new(),
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.markers.clear();
        }
    }

    pub fn record(&mut self, pos: Point2<i32>, now: Instant) {
        if !self.enabled {
            return;
        }
        self.markers.push(ClickMarker { pos, created: now });
    }

    /// Drop every expired marker. One retain pass per render tick; never
    /// interleaved with iteration over `markers`.
    pub fn sweep(&mut self, now: Instant) {
        self.markers.retain(|marker| !marker.expired(now));
    }

    pub fn markers(&self) -> &[ClickMarker] {
        &self.markers
    }
}
