//! IRSA Core - Query construction, transport and VOTable parsing
//!
//! This crate turns sky positions, search shapes and angular sizes into the
//! query parameters the IRSA Gator catalog service expects, sends them, and
//! parses the returned VOTable into a [`models::Table`].

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod parse;
pub mod payload;
pub mod ports;
pub mod votable;

pub use client::IrsaClient;
pub use error::{IrsaError, Result};
