pub mod api;
pub mod auth;
pub mod commands;
pub mod format;
pub mod http;
pub mod runtime;
pub mod settings;
