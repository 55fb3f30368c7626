//! Route dispatch over bound parameters.
//!
//! This crate connects [`gantry_bind`]'s request binding to service
//! endpoints: handlers register under `"METHOD path"` route keys, the
//! [`Dispatcher`] compiles each route once on first use, and every
//! outcome lands in [`gantry_core`]'s standard response envelope.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use gantry_bind::{BufferedRequest, StandardQuery};
//! use gantry_core::{CallContext, ServiceError};
//! use gantry_dispatch::{Dispatcher, HandlerRegistry};
//!
//! let mut registry = HandlerRegistry::new();
//! registry.register_fn("GET /widgets", 0, |query: StandardQuery, _ctx, _extras| {
//!     Ok::<_, ServiceError>(vec![query.top, query.skip])
//! });
//!
//! let dispatcher = Dispatcher::new(Arc::new(registry));
//! let request = BufferedRequest::builder().path("/widgets").build();
//! let (status, response) = dispatcher.dispatch(&request, &CallContext::mock(), &[]);
//!
//! assert_eq!(status.as_u16(), 200);
//! assert_eq!(response.count, 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod dispatcher;
mod handler;
mod registry;

pub use dispatcher::{ArgStep, CompiledRoute, Dispatcher};
pub use handler::{bind_error_to_service, FnRouteHandler, RouteHandler};
pub use registry::{HandlerDiscovery, HandlerRegistry};
