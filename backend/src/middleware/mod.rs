//! Request middleware for trace correlation, request logging and panic
//! isolation.

pub mod catch_panic;
pub mod trace;

pub use catch_panic::CatchPanic;
pub use trace::Trace;
