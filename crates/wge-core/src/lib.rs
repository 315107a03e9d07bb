//! Core domain + application logic for the WhatsApp group contact exporter.
//!
//! This crate is intentionally framework-agnostic. The WhatsApp client
//! (a whatsapp-web.js bridge sidecar) lives behind a port (trait) implemented
//! in the adapter crate; the HTTP surface lives in the server crate.

pub mod cache;
pub mod config;
pub mod contacts;
pub mod domain;
pub mod errors;
pub mod events;
pub mod export;
pub mod extract;
pub mod logging;
pub mod whatsapp;

pub use errors::{Error, Result};
