pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod model;
pub mod protocol;
pub mod remote;
pub mod session;
pub mod store;
pub mod tui;
