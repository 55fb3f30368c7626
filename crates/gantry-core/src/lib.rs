//! # Gantry Core
//!
//! Core types shared across the Gantry request-binding toolkit: the
//! [`ServiceError`] taxonomy, the uniform [`ServiceResponse`] envelope,
//! and the per-call [`CallContext`].
//!
//! All responses, data and errors alike, travel in the same envelope
//! shape, and every client-visible error message carries a log key that
//! matches the server-side tracing events for the call.

#![doc(html_root_url = "https://docs.rs/gantry-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod error;
mod response;

pub use context::CallContext;
pub use error::{ServiceError, ServiceResult};
pub use response::ServiceResponse;
