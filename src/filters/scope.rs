//! Filter scope: the only/except/if/unless rules that decide whether a
//! registered handler runs for a given action.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// A boolean-producing closure attached to a filter scope
pub type Predicate = Arc<dyn Fn() -> bool + Send + Sync>;

/// Conditions under which a filter-chain handler applies.
///
/// Eligibility for an action is computed as:
/// 1. `except` contains the action -> skip
/// 2. `only` is set and does not contain the action -> skip
/// 3. any `unless` predicate returns false -> skip
/// 4. any `if` predicate returns false -> skip
/// 5. otherwise the handler runs
///
/// Predicates are always kept as ordered lists; all of them must hold for
/// the handler to proceed.
#[derive(Clone, Default)]
pub struct FilterScope {
    only: Option<BTreeSet<String>>,
    except: Option<BTreeSet<String>>,
    if_predicates: Vec<Predicate>,
    unless_predicates: Vec<Predicate>,
}

impl FilterScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the handler to these actions
    pub fn only<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.only = Some(actions.into_iter().map(|a| a.as_ref().to_string()).collect());
        self
    }

    /// Skip the handler for these actions
    pub fn except<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.except = Some(actions.into_iter().map(|a| a.as_ref().to_string()).collect());
        self
    }

    /// Add an `if` predicate; the handler runs only when every one holds
    pub fn when(mut self, predicate: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.if_predicates.push(Arc::new(predicate));
        self
    }

    /// Add an `unless` predicate; the handler runs only when every one holds
    pub fn unless(mut self, predicate: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.unless_predicates.push(Arc::new(predicate));
        self
    }

    /// Whether the handler is eligible for the named action
    pub fn is_eligible(&self, action: &str) -> bool {
        if let Some(except) = &self.except {
            if except.contains(action) {
                return false;
            }
        }

        if let Some(only) = &self.only {
            if !only.contains(action) {
                return false;
            }
        }

        if !self.unless_predicates.iter().all(|p| p()) {
            return false;
        }

        self.if_predicates.iter().all(|p| p())
    }
}

impl fmt::Debug for FilterScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterScope")
            .field("only", &self.only)
            .field("except", &self.except)
            .field("if_predicates", &self.if_predicates.len())
            .field("unless_predicates", &self.unless_predicates.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unscoped_applies_everywhere() {
        let scope = FilterScope::new();
        assert!(scope.is_eligible("index"));
        assert!(scope.is_eligible("show"));
    }

    #[test]
    fn test_only() {
        let scope = FilterScope::new().only(["show"]);
        assert!(scope.is_eligible("show"));
        assert!(!scope.is_eligible("index"));
    }

    #[test]
    fn test_except() {
        let scope = FilterScope::new().except(["show"]);
        assert!(!scope.is_eligible("show"));
        assert!(scope.is_eligible("index"));
        assert!(scope.is_eligible("destroy"));
    }

    #[test]
    fn test_except_takes_precedence_over_only() {
        let scope = FilterScope::new().only(["show"]).except(["show"]);
        assert!(!scope.is_eligible("show"));
    }

    #[test]
    fn test_predicates_must_all_hold() {
        let scope = FilterScope::new().when(|| true).when(|| false);
        assert!(!scope.is_eligible("index"));

        let scope = FilterScope::new().when(|| true).when(|| true);
        assert!(scope.is_eligible("index"));
    }

    #[test]
    fn test_unless_predicates_must_all_hold() {
        let scope = FilterScope::new().unless(|| false);
        assert!(!scope.is_eligible("index"));

        let scope = FilterScope::new().unless(|| true);
        assert!(scope.is_eligible("index"));
    }

    #[test]
    fn test_scope_conditions_compose() {
        let scope = FilterScope::new().only(["show", "index"]).when(|| true);
        assert!(scope.is_eligible("index"));
        assert!(!scope.is_eligible("destroy"));
    }
}
