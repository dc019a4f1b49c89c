//! HTTP client module for backend checks
//!
//! Provides the request/response plumbing used by every check.

mod client;

pub use client::{HttpClient, HttpError, HttpRequest, HttpResponse, DEFAULT_TIMEOUT_SECS};
