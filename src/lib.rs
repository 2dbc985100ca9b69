//! Library crate for regdesk.
//!
//! This crate exposes the building blocks of the TUI:
//! - REST client for the registration backend (`api`)
//! - Application state and update loop (`app`)
//! - Command-line configuration (`config`)
//! - Error and result types (`error`)
//! - Registration form state and validation (`form`)
//! - UI rendering and widgets, including the tab and modal controls (`ui`)
//!
//! It is used by the `regdesk` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod form;
pub mod ui;

/// Error and result types of the backend client.
pub use error::{ApiError, ApiResult};
