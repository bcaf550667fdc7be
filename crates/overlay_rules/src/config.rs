//! Configuration for the merge engine.

use overlay_foundation::Strategy;

/// Configuration for a [`Merger`](crate::Merger).
#[derive(Clone, Debug)]
pub struct MergeConfig {
    /// Strategy given to chains created when a CHAIN rule coerces a value.
    pub chain_strategy: Strategy,

    /// Dump both operands and the derived rules when a rule faults.
    pub dump_on_fault: bool,

    /// Parse `name__` / `__name` property markers during composition.
    pub property_markers: bool,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            chain_strategy: Strategy::LastDefined,
            dump_on_fault: true,
            property_markers: true,
        }
    }
}

impl MergeConfig {
    /// Creates a configuration that takes property names literally.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            property_markers: false,
            ..Self::default()
        }
    }

    /// Creates a configuration that logs faults without dumping values.
    #[must_use]
    pub fn quiet() -> Self {
        Self {
            dump_on_fault: false,
            ..Self::default()
        }
    }

    /// Builder method to set the chain strategy.
    #[must_use]
    pub fn with_chain_strategy(mut self, strategy: Strategy) -> Self {
        self.chain_strategy = strategy;
        self
    }

    /// Builder method to set fault dumps.
    #[must_use]
    pub fn with_dump_on_fault(mut self, dump: bool) -> Self {
        self.dump_on_fault = dump;
        self
    }

    /// Builder method to set property marker parsing.
    #[must_use]
    pub fn with_property_markers(mut self, markers: bool) -> Self {
        self.property_markers = markers;
        self
    }
}
