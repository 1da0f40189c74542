#![forbid(unsafe_code)]

//! Single-shot timer pump.
//!
//! The controller exposes one `next_deadline`; the pump keeps exactly one
//! `setTimeout` armed for it and re-arms after every call into the controller.

use core::time::Duration;

/// Milliseconds to wait for `deadline` when the clock reads `now`.
///
/// Rounds up so the callback never fires before the deadline, and clamps to
/// the `i32` range `setTimeout` accepts.
#[must_use]
pub fn timeout_delay_ms(deadline: Duration, now: Duration) -> i32 {
    let wait = deadline.saturating_sub(now);
    let ms = wait.as_micros().div_ceil(1000);
    i32::try_from(ms).unwrap_or(i32::MAX)
}

#[cfg(target_arch = "wasm32")]
pub(crate) use browser::TimerPump;

#[cfg(target_arch = "wasm32")]
mod browser {
    use core::time::Duration;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;
    use web_sys::Window;

    use super::timeout_delay_ms;

    pub(crate) struct TimerPump {
        window: Window,
        callback: Closure<dyn FnMut()>,
        handle: Option<i32>,
        armed_for: Option<Duration>,
    }

    impl TimerPump {
        pub(crate) fn new(window: Window, callback: Closure<dyn FnMut()>) -> Self {
            Self {
                window,
                callback,
                handle: None,
                armed_for: None,
            }
        }

        /// Arm for `deadline`, replacing any timeout aimed elsewhere.
        pub(crate) fn arm(&mut self, deadline: Option<Duration>, now: Duration) {
            if deadline == self.armed_for && self.handle.is_some() {
                return;
            }
            self.cancel();
            let Some(deadline) = deadline else {
                return;
            };
            let delay = timeout_delay_ms(deadline, now);
            match self
                .window
                .set_timeout_with_callback_and_timeout_and_arguments_0(
                    self.callback.as_ref().unchecked_ref(),
                    delay,
                ) {
                Ok(handle) => {
                    self.handle = Some(handle);
                    self.armed_for = Some(deadline);
                }
                Err(err) => tracing::error!(?err, "setTimeout failed"),
            }
        }

        /// Mark the armed timeout as fired without clearing it.
        pub(crate) fn fired(&mut self) {
            self.handle = None;
            self.armed_for = None;
        }

        pub(crate) fn cancel(&mut self) {
            if let Some(handle) = self.handle.take() {
                self.window.clear_timeout_with_handle(handle);
            }
            self.armed_for = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn delay_is_exact_for_whole_millis() {
        assert_eq!(timeout_delay_ms(ms(1500), ms(0)), 1500);
        assert_eq!(timeout_delay_ms(ms(1500), ms(1400)), 100);
    }

    #[test]
    fn delay_rounds_up_partial_millis() {
        let now = Duration::from_micros(100);
        assert_eq!(timeout_delay_ms(ms(1), now), 1);
        assert_eq!(timeout_delay_ms(Duration::from_micros(1001), Duration::ZERO), 2);
    }

    #[test]
    fn past_deadline_fires_immediately() {
        assert_eq!(timeout_delay_ms(ms(10), ms(20)), 0);
    }

    #[test]
    fn huge_delay_is_clamped() {
        assert_eq!(timeout_delay_ms(Duration::from_secs(u64::MAX / 4), ms(0)), i32::MAX);
    }
}
