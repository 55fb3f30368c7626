//! Route handlers.
//!
//! A [`RouteHandler`] takes a buffered request plus call context and
//! produces a JSON value or a [`ServiceError`]. [`FnRouteHandler`]
//! adapts a plain function over a bindable argument struct, so most
//! handlers are a closure and a descriptor table away.

use std::marker::PhantomData;

use serde::Serialize;
use serde_json::Value;

use gantry_bind::{bind, BindError, Bindable, RequestSource};
use gantry_core::{CallContext, ServiceError};

/// One invocable route endpoint.
pub trait RouteHandler: Send + Sync {
    /// Number of extra positional arguments the handler expects
    /// beyond the bound parameters and the call context.
    fn extra_count(&self) -> usize;

    /// Runs the handler against a request.
    fn invoke(
        &self,
        request: &dyn RequestSource,
        context: &CallContext,
        extras: &[Value],
    ) -> Result<Value, ServiceError>;
}

/// Maps a binding failure onto the service error taxonomy.
///
/// Request problems are the caller's fault and become `BadParameter`
/// with the aggregated problem lines as the message. A schema flaw is
/// a configuration defect and becomes `FatalError`.
#[must_use]
pub fn bind_error_to_service(error: BindError) -> ServiceError {
    match error {
        BindError::Parameters(failure) => ServiceError::bad_parameter(failure.to_string()),
        BindError::Schema(schema) => ServiceError::fatal(schema.to_string()),
    }
}

/// Adapts `Fn(Args, &CallContext, &[Value]) -> Result<R, ServiceError>`
/// into a [`RouteHandler`].
///
/// The request binds onto a fresh `Args` before the function runs;
/// the result serializes to JSON afterwards.
pub struct FnRouteHandler<Args, Ret, F> {
    func: F,
    extra_count: usize,
    _marker: PhantomData<fn(Args) -> Ret>,
}

impl<Args, Ret, F> FnRouteHandler<Args, Ret, F>
where
    Args: Bindable + Default,
    Ret: Serialize,
    F: Fn(Args, &CallContext, &[Value]) -> Result<Ret, ServiceError> + Send + Sync,
{
    /// Wraps a function, declaring how many extra arguments it takes.
    pub fn new(extra_count: usize, func: F) -> Self {
        Self {
            func,
            extra_count,
            _marker: PhantomData,
        }
    }
}

impl<Args, Ret, F> RouteHandler for FnRouteHandler<Args, Ret, F>
where
    Args: Bindable + Default,
    Ret: Serialize,
    F: Fn(Args, &CallContext, &[Value]) -> Result<Ret, ServiceError> + Send + Sync,
{
    fn extra_count(&self) -> usize {
        self.extra_count
    }

    fn invoke(
        &self,
        request: &dyn RequestSource,
        context: &CallContext,
        extras: &[Value],
    ) -> Result<Value, ServiceError> {
        let args: Args = bind(request).map_err(bind_error_to_service)?;
        let result = (self.func)(args, context, extras)?;
        serde_json::to_value(result).map_err(|error| {
            ServiceError::fatal_with_source("handler result did not serialize", error)
        })
    }
}
