//! Debounce and throttle helpers for interactive input.
//!
//! Both run on tokio's clock, so they need a runtime and can be tested with
//! paused time.

mod debounce;
mod throttle;

pub use debounce::Debouncer;
pub use throttle::Throttler;
