//! Filter chains: ordered post-processing handlers per controller.
//!
//! Handlers are registered by name once, resolved to typed function
//! references at registration time, and invoked through that function
//! interface during evaluation. Chains are append-only at setup and
//! read-only during request handling.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::errors::{Error, RestResult};

use super::scope::FilterScope;

/// A post-processing handler: takes the operation result, returns the
/// replacement value for the next rule in the chain
pub type Handler = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Named handler registry.
///
/// Handler ids are resolved here exactly once, when a filter is added to a
/// chain; evaluation never looks anything up by name.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Handler>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under an id
    pub fn register(&mut self, id: impl Into<String>, handler: impl Fn(Value) -> Value + Send + Sync + 'static) {
        self.handlers.insert(id.into(), Arc::new(handler));
    }

    /// Resolve a handler by id
    pub fn get(&self, id: &str) -> Option<Handler> {
        self.handlers.get(id).cloned()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&String> = self.handlers.keys().collect();
        ids.sort();
        f.debug_struct("HandlerRegistry").field("handlers", &ids).finish()
    }
}

/// One entry in a controller's filter chain
#[derive(Clone)]
pub struct FilterRule {
    /// Handler id, kept for diagnostics
    pub handler_id: String,

    /// The resolved handler
    pub handler: Handler,

    /// When the handler applies
    pub scope: FilterScope,
}

impl fmt::Debug for FilterRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterRule")
            .field("handler_id", &self.handler_id)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Filter chains keyed by controller id.
///
/// Insertion order is execution order. Registration is additive only;
/// there is no removal or override.
#[derive(Clone, Default)]
pub struct FilterChains {
    chains: HashMap<String, Vec<FilterRule>>,
}

impl FilterChains {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a filter to a controller's chain, resolving the handler id
    /// against the registry. Unknown ids fail registration.
    pub fn add_filter(
        &mut self,
        controller: &str,
        handler_id: &str,
        scope: FilterScope,
        handlers: &HandlerRegistry,
    ) -> RestResult<()> {
        let handler = handlers.get(handler_id).ok_or_else(|| {
            Error::InvalidRegistration(format!(
                "unknown filter handler {handler_id:?} for controller {controller}"
            ))
        })?;

        self.chains
            .entry(controller.to_string())
            .or_default()
            .push(FilterRule {
                handler_id: handler_id.to_string(),
                handler,
                scope,
            });
        Ok(())
    }

    /// Run the chain registered for a controller against a value.
    ///
    /// Rules are applied sequentially in insertion order; each eligible
    /// handler's return value feeds the next rule. With no chain
    /// registered the value passes through unchanged.
    pub fn apply(&self, controller: &str, action: &str, value: Value) -> Value {
        let Some(chain) = self.chains.get(controller) else {
            return value;
        };

        let mut current = value;
        for rule in chain {
            if rule.scope.is_eligible(action) {
                current = (rule.handler)(current);
            }
        }
        current
    }

    /// Number of rules registered for a controller
    pub fn chain_len(&self, controller: &str) -> usize {
        self.chains.get(controller).map(Vec::len).unwrap_or(0)
    }
}

impl fmt::Debug for FilterChains {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut controllers: Vec<&String> = self.chains.keys().collect();
        controllers.sort();
        f.debug_struct("FilterChains")
            .field("controllers", &controllers)
            .finish()
    }
}
