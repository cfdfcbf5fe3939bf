//! Permission gating, input sanitization and display formatting for the
//! housing-management admin console.

pub mod actions;
pub mod config;
pub mod console;
pub mod format;
pub mod notify;
pub mod permissions;
pub mod render;
pub mod sanitize;
pub mod store;
pub mod validate;
