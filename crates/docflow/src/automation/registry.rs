use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use super::service_type::ServiceType;
use super::strategy::AutomationStrategy;

/// Lookup table from canonical service-type tag to automation strategy.
///
/// Resolution is exact-match: each strategy declares exactly one canonical
/// tag and the normalized input must equal it. Substring or fuzzy matching
/// is deliberately not offered; ambiguous offerings must arrive as distinct
/// canonical tags. The registry is an explicitly constructed value handed
/// to the engine at startup, not a process-wide singleton.
#[derive(Default)]
pub struct StrategyRegistry {
    strategies: HashMap<ServiceType, Arc<dyn AutomationStrategy>>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register under the strategy's declared tag. Re-registering a tag
    /// replaces the previous strategy.
    pub fn register(&mut self, strategy: Arc<dyn AutomationStrategy>) {
        let tag = strategy.service_type();
        if self.strategies.insert(tag.clone(), strategy).is_some() {
            warn!(%tag, "replaced previously registered automation strategy");
        }
    }

    /// Exact-match lookup. `None` is a recoverable condition the engine
    /// turns into a failed ticket, not a defect.
    pub fn resolve(&self, service_type: &ServiceType) -> Option<Arc<dyn AutomationStrategy>> {
        self.strategies.get(service_type).cloned()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Registered tags, sorted for stable display.
    pub fn service_types(&self) -> Vec<ServiceType> {
        let mut tags: Vec<_> = self.strategies.keys().cloned().collect();
        tags.sort();
        tags
    }
}
