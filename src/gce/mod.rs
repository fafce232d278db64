//! GCE API interaction module
//!
//! Core functionality for talking to the Compute Engine API: authentication,
//! HTTP plumbing, batched requests, and the project client.
//!
//! # Module Structure
//!
//! - [`auth`] - Credentials and token caching over Application Default Credentials
//! - [`http`] - HTTP utilities for REST API calls
//! - [`batch`] - Multipart encoding/decoding for batched requests
//! - [`project`] - The project client dispatching list/insert/delete calls

pub mod auth;
pub mod batch;
pub mod http;
pub mod project;
