use cgmath::{Point2, Vector2};
use thiserror::Error;

/// Returned by a `GuiRuntime` when it rejects a synthesized pointer event.
/// The engine catches and logs these per event; a rejected delivery never
/// aborts the tick or the reader loop.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct DeliveryError {
    pub message: String,
}

impl DeliveryError {
    pub fn new(message: impl Into<String>) -> DeliveryError {
        DeliveryError {
            message: message.into(),
        }
    }
}

pub type DeliveryResult = std::result::Result<(), DeliveryError>;

/// Capability surface of the host GUI runtime that consumes the
/// synthesized pointer events.
///
/// The engine never learns what the host's elements are; it only asks
/// whether an interactive element claims a point, and prefers the
/// element-targeted press over the untargeted one when something does.
/// All positions are in the host's scaled display coordinate space.
pub trait GuiRuntime {
    /// Whether any surface is currently presented. While this is false the
    /// engine drops an in-flight contact without synthesizing a release.
    fn surface_present(&self) -> bool;

    /// Live window dimensions in physical pixels, if they can be read.
    /// `None` makes the engine fall back to the configured manual scale.
    fn window_size(&self) -> Option<Vector2<u32>>;

    /// Whether any interactive element claims the point.
    fn element_at(&self, pos: Point2<i32>) -> bool;

    /// Deliver a press to the element claiming `pos`.
    fn press_element(&mut self, pos: Point2<i32>) -> DeliveryResult;

    /// Deliver an untargeted press at `pos`; the fallback when no element
    /// claims the point.
    fn press(&mut self, pos: Point2<i32>) -> DeliveryResult;

    /// Deliver a drag to `pos`, `delta` away from the previous delivered
    /// position.
    fn drag(&mut self, pos: Point2<i32>, delta: Vector2<i32>) -> DeliveryResult;

    /// Deliver a release at `pos`.
    fn release(&mut self, pos: Point2<i32>) -> DeliveryResult;
}
