//! Threaded controller: one core behind one lock, ticked by a background loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::core::ControllerCore;
use mb_model::{MotorProfile, MotorSnapshot};

/// Target tick period (seconds). 10 Hz, best-effort, drift uncorrected.
pub const TICK_PERIOD_S: f64 = 0.1;

/// How long `shutdown` waits for the tick thread before proceeding anyway.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

/// Owns one `ControllerCore` and its background tick thread.
///
/// All public operations and the background tick serialize on the same
/// mutex; lock hold times are one model update or one field mutation.
/// Exactly one instance exists per rig, owned by the composition root.
pub struct MotorController {
    core: Arc<Mutex<ControllerCore>>,
    stop_flag: Arc<AtomicBool>,
    tick_thread: Option<JoinHandle<()>>,
}

impl MotorController {
    pub fn new(profile: MotorProfile) -> Self {
        Self {
            core: Arc::new(Mutex::new(ControllerCore::new(profile))),
            stop_flag: Arc::new(AtomicBool::new(false)),
            tick_thread: None,
        }
    }

    /// Start the background physics loop. No-op if already running.
    pub fn spawn_loop(&mut self) {
        if self.tick_thread.is_some() {
            return;
        }
        self.stop_flag.store(false, Ordering::Relaxed);

        let core = Arc::clone(&self.core);
        let stop_flag = Arc::clone(&self.stop_flag);
        let period = Duration::from_secs_f64(TICK_PERIOD_S);

        self.tick_thread = Some(thread::spawn(move || {
            while !stop_flag.load(Ordering::Relaxed) {
                lock_core(&core).tick(TICK_PERIOD_S);
                // Best-effort rate: sleep a full period after each tick.
                thread::sleep(period);
            }
            tracing::debug!("tick loop exited");
        }));
        tracing::info!("background physics loop started");
    }

    /// Signal the tick thread to stop and wait a bounded grace period.
    ///
    /// Cooperative: if the thread has not exited within the window it is
    /// detached and the caller proceeds regardless.
    pub fn shutdown(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        let Some(handle) = self.tick_thread.take() else {
            return;
        };

        let deadline = Instant::now() + SHUTDOWN_GRACE;
        while !handle.is_finished() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(10));
        }
        if handle.is_finished() {
            let _ = handle.join();
            tracing::info!("background physics loop stopped");
        } else {
            tracing::warn!("tick thread did not exit within grace period, detaching");
        }
    }

    /// Whether the background loop has been spawned and not shut down.
    pub fn loop_running(&self) -> bool {
        self.tick_thread.is_some()
    }

    pub fn start_motor(&self) {
        lock_core(&self.core).start_motor();
    }

    /// Soft stop: deceleration first, power-off once below threshold.
    pub fn stop_motor(&self) {
        lock_core(&self.core).stop_motor();
    }

    pub fn set_target_speed(&self, rpm: f64) {
        lock_core(&self.core).set_target_speed(rpm);
    }

    pub fn set_load(&self, load_nm: f64) {
        lock_core(&self.core).set_load(load_nm);
    }

    pub fn inject_fault(&self, name: impl Into<String>) {
        lock_core(&self.core).inject_fault(name);
    }

    pub fn clear_fault(&self) {
        lock_core(&self.core).clear_fault();
    }

    /// Telemetry snapshot taken under the lock: all fields reflect the same
    /// tick, and the call never blocks longer than one tick's critical
    /// section.
    pub fn get_status(&self) -> MotorSnapshot {
        lock_core(&self.core).status()
    }
}

impl Drop for MotorController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Acquire the core lock, recovering from poisoning.
///
/// Every mutation under this lock is field-granular, so a panicking holder
/// cannot leave the core half-applied; the guard is safe to reuse.
fn lock_core(core: &Arc<Mutex<ControllerCore>>) -> MutexGuard<'_, ControllerCore> {
    core.lock().unwrap_or_else(PoisonError::into_inner)
}
