//! Gantry: metadata-driven HTTP parameter binding and dispatch.
//!
//! A service endpoint declares its inputs once, as a static descriptor
//! table on a plain struct. Gantry binds each buffered request onto
//! that struct, reporting every problem in one aggregated message,
//! routes the call through a compiled-route cache, and wraps the
//! outcome in a uniform JSON envelope.
//!
//! The workspace splits into three layers, re-exported here:
//!
//! | Crate | Concern |
//! |---|---|
//! | [`gantry_core`] | error taxonomy, response envelope, call context |
//! | [`gantry_bind`] | descriptors, coercion, the binder |
//! | [`gantry_dispatch`] | handler registry, route cache, dispatch |
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use gantry::prelude::*;
//!
//! let mut registry = HandlerRegistry::new();
//! registry.register_fn("GET /widgets", 0, |query: StandardQuery, _ctx, _extras| {
//!     Ok::<_, ServiceError>(query.top)
//! });
//!
//! let dispatcher = Dispatcher::new(Arc::new(registry));
//! let request = BufferedRequest::builder()
//!     .path("/widgets")
//!     .query_pair("$top", "5")
//!     .build();
//!
//! let (status, response) = dispatcher.dispatch(&request, &CallContext::mock(), &[]);
//! assert_eq!(status.as_u16(), 200);
//! assert_eq!(response.count, 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub use gantry_bind::{
    bind, AssignError, BindError, BindFailure, Bindable, BoundValue, BufferedRequest,
    FieldDescriptor, FieldKind, Problem, RequestSource, ScalarKind, StandardQuery,
};
pub use gantry_core::{CallContext, ServiceError, ServiceResponse, ServiceResult};
pub use gantry_dispatch::{Dispatcher, HandlerRegistry, RouteHandler};

/// Everything needed to declare, bind, and dispatch an endpoint.
pub mod prelude {
    pub use gantry_bind::{
        bind, AssignError, Bindable, BoundValue, BufferedRequest, DocumentShape, EnumTable,
        FieldDescriptor, FieldKind, RequestSource, ScalarKind, ScalarValue, StandardQuery,
    };
    pub use gantry_core::{CallContext, ServiceError, ServiceResponse, ServiceResult};
    pub use gantry_dispatch::{Dispatcher, FnRouteHandler, HandlerRegistry, RouteHandler};
}
