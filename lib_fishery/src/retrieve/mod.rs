//! # Data Retrieval Module
//!
//! Generic HTTP retrieval shared by the remote data source: URL joining,
//! timeouts, transient-failure retries and JSON decoding live here so the
//! sources only deal with the shape of the payload.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

/// Blocking HTTP `ApiClient` with linear-backoff retries.
pub mod ky_http;

pub use ky_http::ApiClient;
