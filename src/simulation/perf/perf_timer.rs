//! Wall-clock stopwatch. `Date.now()` in the browser, a process-wide
//! `Instant` elsewhere.

#[cfg(not(target_arch = "wasm32"))]
use std::sync::OnceLock;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

#[cfg(target_arch = "wasm32")]
fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
fn now_ms() -> f64 {
    static EPOCH: OnceLock<Instant> = OnceLock::new();
    EPOCH.get_or_init(Instant::now).elapsed().as_secs_f64() * 1000.0
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct PerfTimer {
    start_ms: f64,
}

impl PerfTimer {
    pub(crate) fn start() -> Self {
        PerfTimer { start_ms: now_ms() }
    }

    /// Never negative, even if the browser clock steps back.
    pub(crate) fn elapsed_ms(&self) -> f64 {
        (now_ms() - self.start_ms).max(0.0)
    }

    /// Run `f` and return its result with the time it took.
    pub(crate) fn measure<R>(f: impl FnOnce() -> R) -> (R, f64) {
        let timer = PerfTimer::start();
        let out = f();
        (out, timer.elapsed_ms())
    }
}
