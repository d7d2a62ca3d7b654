use std::time::{Duration, Instant};

use cgmath::Point2;

use crate::mapping::MappingMode;
use crate::settings::Settings;

/// Minimum spacing between two accepted samples. One physical touch can
/// register several presses in quick succession; anything inside the
/// window is discarded as a duplicate of the previous sample.
pub const SAMPLE_DEBOUNCE: Duration = Duration::from_millis(500);

/// One calibration observation: the screen position the user was asked to
/// touch, and the raw coordinate the sensor reported for that touch.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct CalibrationSample {
    pub screen: Point2<i32>,
    pub touch: Point2<i32>,
}

/// Mapping parameters inferred from two samples.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct CalibrationOutcome {
    pub swap_xy: bool,
    pub invert_x: bool,
    pub invert_y: bool,
    pub mapping_mode: MappingMode,
}

impl CalibrationOutcome {
    /// Write the inferred parameters into a settings draft. The caller
    /// persists the draft and hands it to the engine's `reload`; the live
    /// settings value is never mutated field by field.
    pub fn apply(&self, draft: &mut Settings) {
        draft.swap_xy = self.swap_xy;
        draft.invert_x = self.invert_x;
        draft.invert_y = self.invert_y;
        draft.mapping_mode = self.mapping_mode;
    }
}

/// Two-point linear calibration over nominally top-left and bottom-right
/// reference touches.
///
/// The axes are considered swapped when the dominant movement axis differs
/// between sensor and screen; inversions come from sign agreement between
/// the paired axes. Non-monotonic or non-affine digitizer behavior is out
/// of reach of a two-point fit.
pub fn analyze(first: &CalibrationSample, second: &CalibrationSample) -> CalibrationOutcome {
    let screen_delta = second.screen - first.screen;
    let touch_delta = second.touch - first.touch;

    info!(
        "calibration deltas: screen ({0}, {1}), touch ({2}, {3})",
        screen_delta.x, screen_delta.y, touch_delta.x, touch_delta.y
    );

    let swap_xy = (touch_delta.x.abs() > touch_delta.y.abs())
        != (screen_delta.x.abs() > screen_delta.y.abs());

    let (invert_x, invert_y) = if swap_xy {
        // Touch y drives screen x and touch x drives screen y.
        (
            (touch_delta.y > 0) == (screen_delta.x < 0),
            (touch_delta.x > 0) == (screen_delta.y < 0),
        )
    } else {
        (
            (touch_delta.x > 0) == (screen_delta.x < 0),
            (touch_delta.y > 0) == (screen_delta.y < 0),
        )
    };

    let mapping_mode = if !swap_xy && !invert_x && !invert_y {
        MappingMode::Normal
    } else if !swap_xy && invert_x && invert_y {
        MappingMode::Rotate180
    } else {
        MappingMode::Custom
    };

    let outcome = CalibrationOutcome {
        swap_xy,
        invert_x,
        invert_y,
        mapping_mode,
    };
    info!(
        "calibration result: mode {0:?}, swap_xy {1}, invert_x {2}, invert_y {3}",
        outcome.mapping_mode, outcome.swap_xy, outcome.invert_x, outcome.invert_y
    );
    outcome
}

/// State of the two-step interactive procedure after a recorded sample.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum SessionProgress {
    /// Sample discarded: still inside the debounce window of the previous
    /// one.
    Debounced,
    /// First reference point taken; awaiting the second.
    AwaitingSecond,
    /// Both reference points taken; parameters inferred.
    Complete(CalibrationOutcome),
}

/// Driver for the interactive calibration: the caller shows the two
/// reference targets, records one (screen, touch) pair per accepted step
/// and applies the final outcome to a settings draft.
#[derive(Default)]
pub struct CalibrationSession {
    samples: Vec<CalibrationSample>,
    last_sample_at: Option<Instant>,
}

impl CalibrationSession {
    pub fn new() -> CalibrationSession {
        CalibrationSession::default()
    }

    /// Record one observation. `now` is the caller's clock so the debounce
    /// window is enforced against the time the touch actually registered.
    pub fn record(&mut self, sample: CalibrationSample, now: Instant) -> SessionProgress {
        if let Some(at) = self.last_sample_at {
            if now.saturating_duration_since(at) < SAMPLE_DEBOUNCE {
                debug!("calibration sample inside the debounce window, ignored");
                return SessionProgress::Debounced;
            }
        }
        self.last_sample_at = Some(now);

        if self.samples.len() < 2 {
            self.samples.push(sample);
        }
        match self.samples.len() {
            1 => SessionProgress::AwaitingSecond,
            _ => SessionProgress::Complete(analyze(&self.samples[0], &self.samples[1])),
        }
    }

    /// Discard any recorded samples and start over.
    pub fn reset(&mut self) {
        self.samples.clear();
        self.last_sample_at = None;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample(sx: i32, sy: i32, tx: i32, ty: i32) -> CalibrationSample {
        CalibrationSample {
            screen: Point2 { x: sx, y: sy },
            touch: Point2 { x: tx, y: ty },
        }
    }

    #[test]
    fn aligned_axes_yield_normal() {
        // Both deltas positive, x dominant on both sides.
        let outcome = analyze(&sample(50, 50, 100, 80), &sample(2000, 900, 1500, 700));
        assert_eq!(
            outcome,
            CalibrationOutcome {
                swap_xy: false,
                invert_x: false,
                invert_y: false,
                mapping_mode: MappingMode::Normal,
            }
        );
    }

    #[test]
    fn sign_flipped_axes_yield_rotate180() {
        // Screen moves down-right while touch moves up-left.
        let outcome = analyze(&sample(50, 50, 1500, 700), &sample(2000, 900, 100, 80));
        assert_eq!(outcome.mapping_mode, MappingMode::Rotate180);
        assert!(!outcome.swap_xy);
        assert!(outcome.invert_x);
        assert!(outcome.invert_y);
    }

    #[test]
    fn single_inversion_yields_custom() {
        // x tracks, y opposes.
        let outcome = analyze(&sample(50, 50, 100, 700), &sample(2000, 900, 1500, 80));
        assert_eq!(outcome.mapping_mode, MappingMode::Custom);
        assert!(!outcome.swap_xy);
        assert!(!outcome.invert_x);
        assert!(outcome.invert_y);
    }

    #[test]
    fn rotated_panel_yields_swapped_custom() {
        // A portrait sensor on a landscape display: screen x follows touch
        // y, screen y follows mirrored touch x.
        let outcome = analyze(
            &sample(100, 100, 1500, 200),
            &sample(2100, 900, 100, 2400),
        );
        assert_eq!(
            outcome,
            CalibrationOutcome {
                swap_xy: true,
                invert_x: false,
                invert_y: true,
                mapping_mode: MappingMode::Custom,
            }
        );
    }

    #[test]
    fn outcome_applies_to_a_draft() {
        let outcome = CalibrationOutcome {
            swap_xy: true,
            invert_x: false,
            invert_y: true,
            mapping_mode: MappingMode::Custom,
        };
        let mut draft = Settings::default();
        draft.mapping_mode = MappingMode::Auto;
        outcome.apply(&mut draft);
        assert!(draft.swap_xy);
        assert!(!draft.invert_x);
        assert!(draft.invert_y);
        assert_eq!(draft.mapping_mode, MappingMode::Custom);
    }

    #[test]
    fn session_debounces_rapid_samples() {
        let mut session = CalibrationSession::new();
        let t0 = Instant::now();

        assert_eq!(
            session.record(sample(50, 50, 100, 80), t0),
            SessionProgress::AwaitingSecond
        );
        // A bounce 100 ms later must not count as the second reference.
        assert_eq!(
            session.record(sample(52, 51, 102, 82), t0 + Duration::from_millis(100)),
            SessionProgress::Debounced
        );

        match session.record(
            sample(2000, 900, 1500, 700),
            t0 + Duration::from_millis(600),
        ) {
            SessionProgress::Complete(outcome) => {
                assert_eq!(outcome.mapping_mode, MappingMode::Normal)
            }
            other => panic!("expected completion, got {:?}", other),
        }
    }

    #[test]
    fn session_resets_for_another_run() {
        let mut session = CalibrationSession::new();
        let t0 = Instant::now();
        session.record(sample(50, 50, 100, 80), t0);
        session.reset();
        assert_eq!(
            session.record(sample(50, 50, 100, 80), t0 + Duration::from_secs(1)),
            SessionProgress::AwaitingSecond
        );
    }
}
