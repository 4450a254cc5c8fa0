pub mod command_helpers;
pub mod logging;
