//! The dispatcher and its compiled-route cache.
//!
//! First resolution of a route key consults [`HandlerDiscovery`] and
//! builds a [`CompiledRoute`]: the handler plus its argument plan.
//! The compiled route is cached, so every later hit for the same key
//! skips discovery entirely. The cache is keyed through `DashMap`
//! entries, which makes concurrent first hits settle on one compiled
//! route and one discovery call.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use http::StatusCode;
use serde_json::Value;

use gantry_bind::RequestSource;
use gantry_core::{CallContext, ServiceError, ServiceResponse};

use crate::handler::RouteHandler;
use crate::registry::HandlerDiscovery;

/// One step of a compiled argument plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgStep {
    /// Bind the request onto the handler's parameter struct.
    Bind,
    /// Pass the call context through.
    Context,
    /// Pass the caller-supplied extra at this position through.
    Extra(usize),
}

/// A handler plus its precomputed argument plan.
pub struct CompiledRoute {
    handler: Arc<dyn RouteHandler>,
    steps: Vec<ArgStep>,
}

impl std::fmt::Debug for CompiledRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledRoute")
            .field("steps", &self.steps)
            .finish_non_exhaustive()
    }
}

impl CompiledRoute {
    fn compile(handler: Arc<dyn RouteHandler>) -> Self {
        let mut steps = vec![ArgStep::Bind, ArgStep::Context];
        steps.extend((0..handler.extra_count()).map(ArgStep::Extra));
        Self { handler, steps }
    }

    /// The argument plan, in invocation order.
    #[must_use]
    pub fn steps(&self) -> &[ArgStep] {
        &self.steps
    }

    fn invoke(
        &self,
        request: &dyn RequestSource,
        context: &CallContext,
        extras: &[Value],
    ) -> Result<Value, ServiceError> {
        let expected = self
            .steps
            .iter()
            .filter(|step| matches!(step, ArgStep::Extra(_)))
            .count();
        if extras.len() != expected {
            return Err(ServiceError::fatal(format!(
                "route '{}' expects {expected} extra arguments, got {}",
                request.route_key(),
                extras.len()
            )));
        }
        self.handler.invoke(request, context, extras)
    }
}

/// Resolves, caches, and invokes routes, wrapping every outcome in
/// the standard response envelope.
pub struct Dispatcher {
    discovery: Arc<dyn HandlerDiscovery>,
    routes: DashMap<String, Arc<CompiledRoute>>,
}

impl Dispatcher {
    /// Creates a dispatcher over a discovery source.
    #[must_use]
    pub fn new(discovery: Arc<dyn HandlerDiscovery>) -> Self {
        Self {
            discovery,
            routes: DashMap::new(),
        }
    }

    /// Returns the compiled route for a key, building and caching it
    /// on first use.
    ///
    /// # Errors
    ///
    /// `ServiceError::Fatal` when discovery knows no handler for the
    /// key. Misses are not cached; a later registration for the same
    /// key can still succeed.
    pub fn resolve(&self, route_key: &str) -> Result<Arc<CompiledRoute>, ServiceError> {
        if let Some(existing) = self.routes.get(route_key) {
            return Ok(Arc::clone(existing.value()));
        }
        match self.routes.entry(route_key.to_string()) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(slot) => {
                let handler = self.discovery.find(route_key).ok_or_else(|| {
                    ServiceError::fatal(format!("no handler is registered for route '{route_key}'"))
                })?;
                let compiled = Arc::new(CompiledRoute::compile(handler));
                slot.insert(Arc::clone(&compiled));
                Ok(compiled)
            }
        }
    }

    /// Number of routes compiled so far.
    #[must_use]
    pub fn compiled_count(&self) -> usize {
        self.routes.len()
    }

    /// Runs one request end to end and envelopes the outcome.
    ///
    /// Success envelopes the handler's JSON value with status 200.
    /// Failure logs the full error detail under the context's log key
    /// and envelopes the client-safe rendering, with the status the
    /// error class dictates.
    pub fn dispatch(
        &self,
        request: &dyn RequestSource,
        context: &CallContext,
        extras: &[Value],
    ) -> (StatusCode, ServiceResponse) {
        match self
            .resolve(request.route_key())
            .and_then(|route| route.invoke(request, context, extras))
        {
            Ok(value) => (StatusCode::OK, ServiceResponse::ok(value)),
            Err(error) => {
                tracing::error!(
                    log_key = context.log_key(),
                    route = request.route_key(),
                    code = error.code(),
                    error = ?error,
                    "service call failed"
                );
                (
                    error.status_code(),
                    ServiceResponse::failure(&error, context.log_key()),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::HandlerRegistry;
    use gantry_bind::StandardQuery;

    fn dispatcher_with_route(key: &str, extra_count: usize) -> Dispatcher {
        let mut registry = HandlerRegistry::new();
        registry.register_fn(key, extra_count, |query: StandardQuery, _ctx, extras| {
            Ok::<_, ServiceError>(i64::from(query.top) + extras.len() as i64)
        });
        Dispatcher::new(Arc::new(registry))
    }

    #[test]
    fn test_resolve_compiles_once() {
        let dispatcher = dispatcher_with_route("GET /w", 0);
        let first = dispatcher.resolve("GET /w").unwrap();
        let second = dispatcher.resolve("GET /w").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(dispatcher.compiled_count(), 1);
    }

    #[test]
    fn test_argument_plan_shape() {
        let dispatcher = dispatcher_with_route("GET /w", 2);
        let route = dispatcher.resolve("GET /w").unwrap();
        assert_eq!(
            route.steps(),
            &[
                ArgStep::Bind,
                ArgStep::Context,
                ArgStep::Extra(0),
                ArgStep::Extra(1)
            ]
        );
    }

    #[test]
    fn test_unknown_route_is_fatal_and_uncached() {
        let dispatcher = dispatcher_with_route("GET /w", 0);
        let error = dispatcher.resolve("GET /nope").unwrap_err();
        assert_eq!(error.code(), "FatalError");
        assert_eq!(dispatcher.compiled_count(), 0);
    }
}
