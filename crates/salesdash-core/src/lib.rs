//! Domain layer for the SalesDash client.
//!
//! Pure state machines and models; no I/O. Controllers in
//! `salesdash-application` drive these types and reach the backend through the
//! traits in [`service`].

pub mod config;
pub mod conversation;
pub mod disclosure;
pub mod error;
pub mod health;
pub mod sales;
pub mod service;

pub use error::{DashError, Result};
