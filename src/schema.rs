//! Declarative property and type schemas.
//!
//! The vocabulary's per-property surface is data, not code: each property
//! declares its alternative value shapes in priority order, its cardinality
//! and whether a `<name>Map` language-map sibling travels with it. One
//! generic engine ([`crate::value::UnionValue`] and
//! [`crate::object::VocabObject`]) interprets these schemas for every type.

use std::sync::Arc;

/// The alternative value shapes a property may declare, tried in the
/// property's declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AltKind {
    /// A nested object resolved through the registry's object capability.
    Object,
    /// A nested object resolved through the registry's link capability.
    Link,
    /// A bare absolute-IRI reference.
    Iri,
    Str,
    Float,
    NonNegInt,
    Bool,
    DateTime,
    Duration,
    LangTag,
    MediaType,
    LinkRel,
}

impl AltKind {
    pub fn is_object_like(self) -> bool {
        matches!(self, AltKind::Object | AltKind::Link)
    }
}

/// One named property slot of a vocabulary type.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySchema {
    pub name: &'static str,
    /// Functional properties hold at most one value; non-functional ones
    /// hold an order-significant sequence.
    pub functional: bool,
    /// Whether a `<name>Map` language-map sibling key is recognized.
    pub language_map: bool,
    /// Alternative shapes in priority order; the first match wins.
    pub alternatives: Vec<AltKind>,
}

impl PropertySchema {
    pub fn functional(name: &'static str, alternatives: &[AltKind]) -> Self {
        Self {
            name,
            functional: true,
            language_map: false,
            alternatives: alternatives.to_vec(),
        }
    }

    pub fn many(name: &'static str, alternatives: &[AltKind]) -> Self {
        Self {
            name,
            functional: false,
            language_map: false,
            alternatives: alternatives.to_vec(),
        }
    }

    pub fn with_language_map(mut self) -> Self {
        self.language_map = true;
        self
    }

    pub(crate) fn has_object_alternative(&self) -> bool {
        self.alternatives.iter().any(|a| a.is_object_like())
    }

    pub(crate) fn map_key(&self) -> String {
        format!("{}Map", self.name)
    }
}

/// A concrete vocabulary type: its canonical discriminator, its capability
/// and its declared properties.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSchema {
    pub name: &'static str,
    /// Link-like types resolve through [`crate::Registry::resolve_as_link`]
    /// only; everything else resolves through the object capability.
    pub link: bool,
    pub properties: Vec<PropertySchema>,
}

impl TypeSchema {
    pub fn object(name: &'static str, properties: Vec<PropertySchema>) -> Arc<Self> {
        Arc::new(Self {
            name,
            link: false,
            properties,
        })
    }

    pub fn link(name: &'static str, properties: Vec<PropertySchema>) -> Arc<Self> {
        Arc::new(Self {
            name,
            link: true,
            properties,
        })
    }

    pub fn property(&self, name: &str) -> Option<&PropertySchema> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub(crate) fn index_of(&self, name: &str) -> Option<usize> {
        self.properties.iter().position(|p| p.name == name)
    }

    /// Index of the property whose `<name>Map` sibling key is `key`.
    pub(crate) fn language_map_index(&self, key: &str) -> Option<usize> {
        let base = key.strip_suffix("Map")?;
        let idx = self.index_of(base)?;
        self.properties[idx].language_map.then_some(idx)
    }
}
