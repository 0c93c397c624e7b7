//! Kodo request construction
//!
//! Builds fully signed `http::Request` values for the management (`rs`),
//! persistent processing (`pfop`) and async fetch APIs, plus signed download
//! URLs and upload tokens. Sending the requests is left to whichever HTTP
//! client the caller already uses.

pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod form;
pub mod pfop;

pub use client::Client;
pub use config::Config;
pub use error::{ClientError, Result};
pub use fetch::FetchRequest;
pub use pfop::PfopRequest;
