//! Implementors and lineages.

use std::fmt;
use std::sync::Arc;

use overlay_foundation::{Record, Value};

use crate::definition::{Definition, DefinitionRef};

/// Something a definition can implement.
#[derive(Clone)]
pub enum Implementor {
    /// A definition.
    Definition(DefinitionRef),
    /// A previously composed object, standing for the definitions it was
    /// composed from.
    Composed(Arc<Lineage>),
}

impl Implementor {
    /// Returns the definition this implementor stands for.
    #[must_use]
    pub fn definition(&self) -> &DefinitionRef {
        match self {
            Self::Definition(definition) => definition,
            Self::Composed(lineage) => &lineage.primary,
        }
    }
}

impl From<DefinitionRef> for Implementor {
    fn from(definition: DefinitionRef) -> Self {
        Self::Definition(definition)
    }
}

impl From<&DefinitionRef> for Implementor {
    fn from(definition: &DefinitionRef) -> Self {
        Self::Definition(Arc::clone(definition))
    }
}

impl From<Definition> for Implementor {
    fn from(definition: Definition) -> Self {
        Self::Definition(definition.shared())
    }
}

impl From<&Composed> for Implementor {
    fn from(composed: &Composed) -> Self {
        Self::Composed(Arc::clone(&composed.lineage))
    }
}

impl From<Composed> for Implementor {
    fn from(composed: Composed) -> Self {
        Self::Composed(composed.lineage)
    }
}

impl fmt::Debug for Implementor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Definition(definition) => write!(f, "Definition({})", definition.name()),
            Self::Composed(lineage) => write!(f, "Composed({})", lineage.primary.name()),
        }
    }
}

/// The primary definition of a composed object together with the
/// implementors it was created with.
#[derive(Clone, Debug)]
pub struct Lineage {
    pub(crate) primary: DefinitionRef,
    pub(crate) implementors: Vec<Implementor>,
}

impl Lineage {
    /// Creates a lineage.
    #[must_use]
    pub fn new(primary: DefinitionRef, implementors: Vec<Implementor>) -> Self {
        Self {
            primary,
            implementors,
        }
    }

    /// Returns the primary definition.
    #[must_use]
    pub fn primary(&self) -> &DefinitionRef {
        &self.primary
    }

    /// Returns the implementors given at creation, ahead of the primary's own.
    #[must_use]
    pub fn implementors(&self) -> &[Implementor] {
        &self.implementors
    }
}

/// The output of a composition.
///
/// The lineage travels beside the record, never inside it.
#[derive(Clone, Debug)]
pub struct Composed {
    record: Record,
    lineage: Arc<Lineage>,
}

impl Composed {
    pub(crate) fn new(record: Record, lineage: Arc<Lineage>) -> Self {
        Self { record, lineage }
    }

    /// Returns the composed record.
    #[must_use]
    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Returns the composed record for modification.
    pub fn record_mut(&mut self) -> &mut Record {
        &mut self.record
    }

    /// Consumes the object, returning the record.
    #[must_use]
    pub fn into_record(self) -> Record {
        self.record
    }

    /// Returns a property of the composed record.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.record.get(name)
    }

    /// Returns the definition this object was composed from.
    #[must_use]
    pub fn definition(&self) -> &DefinitionRef {
        &self.lineage.primary
    }

    /// Returns the lineage.
    #[must_use]
    pub fn lineage(&self) -> &Arc<Lineage> {
        &self.lineage
    }
}
