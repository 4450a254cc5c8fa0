//! Timer state machine and its per-user lock table

pub mod controller;
pub mod locks;

pub use controller::TimerController;
pub use locks::{UserLockGuard, UserLocks};
