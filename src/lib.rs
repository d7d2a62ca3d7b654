#[macro_use]
extern crate log;

#[macro_use]
extern crate lazy_static;

pub extern crate cgmath;

/// One of the core components: decoding of the kernel input records read
/// off the touch device, the single-contact state machine and the
/// background reader loop that owns the device stream
pub mod input;

/// The other core component: conversion of raw touch-sensor coordinates
/// into host display coordinates, plus the two-point calibration that
/// infers the transform parameters from observed touches
pub mod mapping;

/// The in-memory settings record consumed by the mapper and the engine,
/// with JSON persistence for settings-UI callers
pub mod settings;

/// Contains the `TouchInputEngine`, which ties the reader, the contact
/// tracker and the mapper together and hands synthesized pointer events to
/// the host GUI runtime once per host tick. The engine is an explicitly
/// constructed object held by the host integration layer; there is no
/// process-wide instance.
pub mod engine;

/// The capability surface the host GUI runtime exposes to consume
/// synthesized pointer events
pub mod gui;

/// Bookkeeping for the optional debug overlay of recorded click markers
pub mod overlay;

/// Crate-wide error type
pub mod error;
