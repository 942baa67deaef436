pub mod auth;
pub mod config;
pub mod notify;
pub mod sync;
pub mod task;
