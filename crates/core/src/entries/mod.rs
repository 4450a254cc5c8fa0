//! Time-entry management outside the timer

pub mod ports;
pub mod service;

pub use ports::EntryStore;
pub use service::EntryService;
