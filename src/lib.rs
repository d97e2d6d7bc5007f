//! dockpeek: a terminal dashboard for a multi-host container inventory service.
//!
//! This library exposes the core modules for use by the binary and by tests.

pub mod model;
pub mod error;
pub mod config;
pub mod settings;
pub mod client;
pub mod pipeline;
pub mod server_filter;
pub mod store;
pub mod dispatcher;
pub mod notifications;
pub mod clipboard;
pub mod export;
pub mod dashboard_controller;
pub mod view;
pub mod app;
