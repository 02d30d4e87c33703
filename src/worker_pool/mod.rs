//! Bounded task scheduler
//!
//! Limits how many remote operations are outstanding at once and bounds
//! each one with a deadline.

pub mod errors;
pub mod pool;

pub use errors::PoolError;
pub use pool::WorkerPool;
