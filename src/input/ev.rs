use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::error::TouchBridgeError;
use crate::input::contact::{self, ContactState};
use crate::input::raw::{RawInputEvent, INPUT_EVENT_SIZE};
use crate::input::PointerEvent;

/// How long the reader sleeps after a failed read before trying again.
/// The device stream is assumed to recover, e.g. after a hotplug.
const READ_RETRY_BACKOFF: Duration = Duration::from_millis(100);

/// Owns the background thread that blocks on the device stream, decodes
/// records and feeds the contact tracker. The device handle lives and dies
/// on that thread; stopping is signal-only and observed on the next loop
/// iteration.
pub struct DeviceContext {
    path: PathBuf,
    state: Arc<ContactState>,
    tx: Sender<PointerEvent>,
    started: Arc<AtomicBool>,
    exit_requested: Arc<AtomicBool>,
    exited: Arc<AtomicBool>,
}

impl DeviceContext {
    pub fn new(
        path: PathBuf,
        state: Arc<ContactState>,
        tx: Sender<PointerEvent>,
    ) -> DeviceContext {
        DeviceContext {
            path,
            state,
            tx,
            started: Arc::new(AtomicBool::new(false)),
            exit_requested: Arc::new(AtomicBool::new(false)),
            exited: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn started(&self) -> bool {
        self.started.load(Ordering::Relaxed)
    }

    pub fn exited(&self) -> bool {
        self.exited.load(Ordering::Relaxed)
    }

    /// After exit is requested, at most one more record is read from the
    /// device before the loop winds down.
    pub fn exit_requested(&self) -> bool {
        self.exit_requested.load(Ordering::Relaxed)
    }

    pub fn stop(&self) {
        self.exit_requested.store(true, Ordering::Relaxed);
    }

    /// Non-blocking: opens the device and spawns the reader thread. An
    /// open failure is fatal to the reader only; the contact stays idle
    /// until a later `start` succeeds.
    pub fn start(&self) {
        self.started.store(true, Ordering::Relaxed);
        self.exited.store(false, Ordering::Relaxed);
        self.exit_requested.store(false, Ordering::Relaxed);

        let path = self.path.clone();
        let state = Arc::clone(&self.state);
        let tx = self.tx.clone();
        let exit_requested = Arc::clone(&self.exit_requested);
        let exited = Arc::clone(&self.exited);

        let _ = thread::spawn(move || {
            match File::open(&path) {
                Err(e) => {
                    let err = TouchBridgeError::DeviceOpen {
                        path: path.clone(),
                        source: e,
                    };
                    error!("{0}", err);
                }
                Ok(mut device) => {
                    info!("reading touch events from {:?}", path);
                    let mut record = [0u8; INPUT_EVENT_SIZE];
                    while !exit_requested.load(Ordering::Relaxed) {
                        if let Err(e) = device.read_exact(&mut record) {
                            if exit_requested.load(Ordering::Relaxed) {
                                break;
                            }
                            warn!("touch device read failed: {0}", e);
                            thread::sleep(READ_RETRY_BACKOFF);
                            continue;
                        }

                        match RawInputEvent::decode(&record) {
                            Ok(ev) => contact::feed(&state, &ev, &tx),
                            // Same policy as a failed read; never partially
                            // decoded.
                            Err(e) => {
                                warn!("dropping malformed input record: {0}", e);
                                thread::sleep(READ_RETRY_BACKOFF);
                            }
                        }
                    }
                    info!("touch device reader for {:?} exiting", path);
                }
            }
            exited.store(true, Ordering::Relaxed);
        });
    }
}
