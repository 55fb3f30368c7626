//! Handler discovery.
//!
//! The dispatcher finds handlers through the [`HandlerDiscovery`]
//! seam, so route lookup is swappable (and countable, in tests).
//! [`HandlerRegistry`] is the stock implementation: an exact-match
//! map keyed by `"METHOD path"` route keys.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use gantry_bind::Bindable;
use gantry_core::{CallContext, ServiceError};

use crate::handler::{FnRouteHandler, RouteHandler};

/// Resolves a route key to a handler.
pub trait HandlerDiscovery: Send + Sync {
    /// Finds the handler for `route_key`, if one exists.
    fn find(&self, route_key: &str) -> Option<Arc<dyn RouteHandler>>;
}

/// Exact-match route table.
#[derive(Default)]
pub struct HandlerRegistry {
    routes: HashMap<String, Arc<dyn RouteHandler>>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler under a route key, replacing any previous
    /// registration for the same key.
    pub fn register(&mut self, route_key: impl Into<String>, handler: Arc<dyn RouteHandler>) {
        self.routes.insert(route_key.into(), handler);
    }

    /// Registers a plain function as a handler.
    ///
    /// ```
    /// use gantry_dispatch::HandlerRegistry;
    /// use gantry_bind::StandardQuery;
    ///
    /// let mut registry = HandlerRegistry::new();
    /// registry.register_fn("GET /widgets", 0, |query: StandardQuery, _ctx, _extras| {
    ///     Ok::<_, gantry_core::ServiceError>(query.top)
    /// });
    /// ```
    pub fn register_fn<Args, Ret, F>(
        &mut self,
        route_key: impl Into<String>,
        extra_count: usize,
        func: F,
    ) where
        Args: Bindable + Default + 'static,
        Ret: Serialize + 'static,
        F: Fn(Args, &CallContext, &[Value]) -> Result<Ret, ServiceError> + Send + Sync + 'static,
    {
        self.register(route_key, Arc::new(FnRouteHandler::new(extra_count, func)));
    }

    /// Number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// True when no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl HandlerDiscovery for HandlerRegistry {
    fn find(&self, route_key: &str) -> Option<Arc<dyn RouteHandler>> {
        self.routes.get(route_key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantry_bind::StandardQuery;

    #[test]
    fn test_register_and_find() {
        let mut registry = HandlerRegistry::new();
        registry.register_fn("GET /widgets", 0, |query: StandardQuery, _ctx, _extras| {
            Ok::<_, ServiceError>(query.top)
        });

        assert_eq!(registry.len(), 1);
        assert!(registry.find("GET /widgets").is_some());
        assert!(registry.find("POST /widgets").is_none());
    }

    #[test]
    fn test_reregistration_replaces() {
        let mut registry = HandlerRegistry::new();
        registry.register_fn("GET /w", 0, |_: StandardQuery, _ctx, _extras| {
            Ok::<_, ServiceError>(1)
        });
        registry.register_fn("GET /w", 2, |_: StandardQuery, _ctx, _extras| {
            Ok::<_, ServiceError>(2)
        });

        assert_eq!(registry.len(), 1);
        let handler = registry.find("GET /w").unwrap();
        assert_eq!(handler.extra_count(), 2);
    }
}
