//! Vision engine seam and readiness handle
//!
//! The digitizer reaches line and contour detection only through the
//! [`VisionEngine`] trait. [`NativeEngine`] implements it with this
//! crate's Hough transform and border tracing.
//!
//! An engine may need time to load. [`EngineHandle`] is a readiness
//! signal shared between the loader and any number of waiters: waiters
//! block on a condition variable for at most a configured timeout and
//! get [`RegionError::EngineUnavailable`] if the engine is still loading
//! or failed to load.

use crate::ccbord::get_outer_borders;
use crate::error::{RegionError, RegionResult};
use crate::hough::{HoughParams, hough_lines_p};
use chartdig_core::{Contour, LineSegment, Pix};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

/// Default bound for [`EngineHandle::wait_ready`].
pub const DEFAULT_READY_TIMEOUT: Duration = Duration::from_secs(30);

/// Line and contour detection on binary edge maps.
pub trait VisionEngine: Send + Sync {
    /// Short engine name for diagnostics.
    fn name(&self) -> &str;

    /// Detect line segments in a 1 bpp edge map.
    fn detect_lines(&self, edges: &Pix, params: &HoughParams) -> RegionResult<Vec<LineSegment>>;

    /// Trace the outer border of every connected region of a 1 bpp edge map.
    fn detect_contours(&self, edges: &Pix) -> RegionResult<Vec<Contour>>;
}

/// The built-in engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeEngine;

impl VisionEngine for NativeEngine {
    fn name(&self) -> &str {
        "native"
    }

    fn detect_lines(&self, edges: &Pix, params: &HoughParams) -> RegionResult<Vec<LineSegment>> {
        hough_lines_p(edges, params)
    }

    fn detect_contours(&self, edges: &Pix) -> RegionResult<Vec<Contour>> {
        get_outer_borders(edges)
    }
}

enum Readiness {
    Loading,
    Ready(Arc<dyn VisionEngine>),
    Failed(String),
}

type Shared = Arc<(Mutex<Readiness>, Condvar)>;

fn lock(shared: &Shared) -> MutexGuard<'_, Readiness> {
    // state is a plain enum, a poisoned lock still holds a valid value
    shared.0.lock().unwrap_or_else(|e| e.into_inner())
}

/// Readiness signal for a vision engine.
///
/// Cloning shares the same signal.
#[derive(Clone)]
pub struct EngineHandle {
    shared: Shared,
}

/// Completion side of a loading [`EngineHandle`].
///
/// Dropping it without calling [`EngineInit::complete`] marks the engine
/// as failed, so waiters are released instead of timing out.
pub struct EngineInit {
    shared: Shared,
    done: bool,
}

impl EngineHandle {
    /// A handle that is ready immediately.
    pub fn ready(engine: Arc<dyn VisionEngine>) -> Self {
        Self {
            shared: Arc::new((Mutex::new(Readiness::Ready(engine)), Condvar::new())),
        }
    }

    /// A ready handle wrapping [`NativeEngine`].
    pub fn native() -> Self {
        Self::ready(Arc::new(NativeEngine))
    }

    /// A loading handle and the initializer that will complete it.
    pub fn loading() -> (Self, EngineInit) {
        let shared: Shared = Arc::new((Mutex::new(Readiness::Loading), Condvar::new()));
        (
            Self {
                shared: shared.clone(),
            },
            EngineInit {
                shared,
                done: false,
            },
        )
    }

    /// Load an engine on a background thread.
    pub fn spawn<F>(load: F) -> Self
    where
        F: FnOnce() -> Result<Arc<dyn VisionEngine>, String> + Send + 'static,
    {
        let (handle, init) = Self::loading();
        thread::spawn(move || match load() {
            Ok(engine) => init.complete(engine),
            Err(reason) => init.fail(reason),
        });
        handle
    }

    /// Check readiness without blocking.
    pub fn is_ready(&self) -> bool {
        matches!(*lock(&self.shared), Readiness::Ready(_))
    }

    /// Block until the engine is ready, for at most `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::EngineUnavailable`] when the timeout elapses
    /// or loading failed.
    pub fn wait_ready(&self, timeout: Duration) -> RegionResult<Arc<dyn VisionEngine>> {
        let start = Instant::now();
        let (_, cvar) = &*self.shared;
        let guard = lock(&self.shared);
        let (guard, _) = cvar
            .wait_timeout_while(guard, timeout, |state| matches!(state, Readiness::Loading))
            .unwrap_or_else(|e| e.into_inner());

        match &*guard {
            Readiness::Ready(engine) => Ok(engine.clone()),
            Readiness::Failed(reason) => Err(RegionError::EngineUnavailable {
                waited: start.elapsed(),
                reason: reason.clone(),
            }),
            Readiness::Loading => {
                log::warn!("vision engine still loading after {:?}", timeout);
                Err(RegionError::EngineUnavailable {
                    waited: start.elapsed(),
                    reason: "engine still loading".to_string(),
                })
            }
        }
    }
}

impl EngineInit {
    /// Publish the loaded engine and wake all waiters.
    pub fn complete(mut self, engine: Arc<dyn VisionEngine>) {
        self.finish(Readiness::Ready(engine));
    }

    /// Record a load failure and wake all waiters.
    pub fn fail(mut self, reason: impl Into<String>) {
        self.finish(Readiness::Failed(reason.into()));
    }

    fn finish(&mut self, state: Readiness) {
        self.done = true;
        *lock(&self.shared) = state;
        self.shared.1.notify_all();
    }
}

impl Drop for EngineInit {
    fn drop(&mut self) {
        if !self.done {
            self.finish(Readiness::Failed("engine initializer dropped".to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_handle() {
        let handle = EngineHandle::native();
        assert!(handle.is_ready());
        let engine = handle.wait_ready(Duration::ZERO).unwrap();
        assert_eq!(engine.name(), "native");
    }

    #[test]
    fn test_timeout_while_loading() {
        let (handle, _init) = EngineHandle::loading();
        let err = handle.wait_ready(Duration::from_millis(20)).err().unwrap();
        match err {
            RegionError::EngineUnavailable { waited, .. } => {
                assert!(waited >= Duration::from_millis(20))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_waiter_woken_by_completion() {
        let (handle, init) = EngineHandle::loading();
        let waiter = {
            let handle = handle.clone();
            thread::spawn(move || handle.wait_ready(Duration::from_secs(10)).map(|e| e.name().to_string()))
        };
        thread::sleep(Duration::from_millis(10));
        init.complete(Arc::new(NativeEngine));
        assert_eq!(waiter.join().unwrap().unwrap(), "native");
        assert!(handle.is_ready());
    }

    #[test]
    fn test_failed_load_and_dropped_init() {
        let handle = EngineHandle::spawn(|| Err("missing model".to_string()));
        let err = handle.wait_ready(Duration::from_secs(10)).err().unwrap();
        assert!(err.to_string().contains("missing model"));

        let (handle, init) = EngineHandle::loading();
        drop(init);
        assert!(handle.wait_ready(Duration::from_secs(10)).is_err());
    }
}
