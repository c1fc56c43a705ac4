//! HTTP networking module
//!
//! Provides the HTTP client shared by the provider adapters.

mod client;

pub use client::{default_user_agent, HttpClient, HttpResponse};
