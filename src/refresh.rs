//! Fixed-interval redraw ticker
//!
//! Runs on its own thread, independent of how fast points are generated. The
//! thread waits on a channel with a timeout: every timeout is a tick, and
//! dropping the sender stops it without waiting out the interval.

use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::Result;
use crate::view::PatternView;

/// Handle to a running refresh timer
#[derive(Debug)]
pub struct RefreshTicker {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<u64>>,
}

impl RefreshTicker {
    pub fn spawn(view: Arc<dyn PatternView>, interval: Duration) -> Result<Self> {
        let (stop, stopped) = mpsc::channel::<()>();
        let handle = thread::Builder::new()
            .name("refresh-ticker".into())
            .spawn(move || {
                let mut ticks = 0u64;
                loop {
                    match stopped.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            view.request_redraw();
                            ticks += 1;
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                ticks
            })?;
        log::debug!("Refresh ticker started ({:?} interval)", interval);
        Ok(Self {
            stop: Some(stop),
            handle: Some(handle),
        })
    }

    /// Cancel the timer and return how many ticks fired
    pub fn stop(mut self) -> u64 {
        self.shutdown()
    }

    fn shutdown(&mut self) -> u64 {
        drop(self.stop.take());
        let Some(handle) = self.handle.take() else {
            return 0;
        };
        match handle.join() {
            Ok(ticks) => {
                log::debug!("Refresh ticker stopped after {} ticks", ticks);
                ticks
            }
            Err(_) => {
                log::error!("Refresh ticker thread panicked");
                0
            }
        }
    }
}

impl Drop for RefreshTicker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
