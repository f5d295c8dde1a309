//! Rate Limiters
//!
//! Guards that bound how often callers may trigger an expensive action.

mod debounce;
mod throttle;

pub use debounce::{debounce, debounce_on, Debounced};
pub use throttle::{throttle, Throttled};
