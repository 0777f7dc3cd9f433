//! The type resolver registry: a constructed table from type discriminator
//! to concrete vocabulary schema.
//!
//! The registry is passed explicitly into every decode entry point, so a
//! test or an extension vocabulary can carry its own table; there is no
//! global mutable state. An unmatched discriminator resolves to `None`,
//! which callers read as "this alternative does not apply", never as an
//! error.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::trace;

use crate::error::{Error, Result};
use crate::object::{discriminator_strings, VocabObject};
use crate::schema::TypeSchema;

#[derive(Debug, Clone, Default)]
pub struct Registry {
    types: HashMap<&'static str, Arc<TypeSchema>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a schema under its canonical discriminator, replacing any
    /// earlier registration of the same name.
    pub fn register(&mut self, schema: Arc<TypeSchema>) {
        self.types.insert(schema.name, schema);
    }

    pub fn schema(&self, discriminator: &str) -> Option<&Arc<TypeSchema>> {
        self.types.get(discriminator)
    }

    /// A blank instance of the non-link type registered under
    /// `discriminator`, if any.
    pub fn resolve_as_object(&self, discriminator: &str) -> Option<VocabObject> {
        self.types
            .get(discriminator)
            .filter(|schema| !schema.link)
            .map(|schema| VocabObject::new(Arc::clone(schema)))
    }

    /// A blank instance of the link type registered under `discriminator`,
    /// if any.
    pub fn resolve_as_link(&self, discriminator: &str) -> Option<VocabObject> {
        self.types
            .get(discriminator)
            .filter(|schema| schema.link)
            .map(|schema| VocabObject::new(Arc::clone(schema)))
    }

    /// Decodes a whole document, resolving the concrete type from the
    /// document's own `type` key under either capability.
    pub fn deserialize_document(&self, raw: &Value) -> Result<VocabObject> {
        let map = raw
            .as_object()
            .ok_or(Error::MalformedDocument("top-level value must be a JSON object"))?;
        let type_key = map
            .get("type")
            .ok_or(Error::MalformedDocument("document carries no type key"))?;
        for disc in discriminator_strings(type_key) {
            if let Some(mut obj) = self
                .resolve_as_object(&disc)
                .or_else(|| self.resolve_as_link(&disc))
            {
                obj.populate(map, self)?;
                return Ok(obj);
            }
            trace!(discriminator = %disc, "unregistered type discriminator");
        }
        Err(Error::MalformedDocument(
            "no registered type matches the document's type key",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AltKind, PropertySchema};
    use serde_json::json;

    fn registry() -> Registry {
        let mut r = Registry::new();
        r.register(TypeSchema::object(
            "Widget",
            vec![PropertySchema::functional("id", &[AltKind::Iri])],
        ));
        r.register(TypeSchema::link(
            "WidgetLink",
            vec![PropertySchema::functional("href", &[AltKind::Iri])],
        ));
        r
    }

    #[test]
    fn resolution_is_capability_filtered() {
        let r = registry();
        assert!(r.resolve_as_object("Widget").is_some());
        assert!(r.resolve_as_link("Widget").is_none());
        assert!(r.resolve_as_object("WidgetLink").is_none());
        assert!(r.resolve_as_link("WidgetLink").is_some());
        assert!(r.resolve_as_object("Gizmo").is_none());
    }

    #[test]
    fn document_resolution_takes_the_first_known_discriminator() {
        let r = registry();
        let doc = r
            .deserialize_document(&json!({"type": ["Gizmo", "Widget"]}))
            .unwrap();
        assert_eq!(doc.type_name(), "Widget");
        assert_eq!(doc.type_names(), ["Gizmo", "Widget"]);
    }

    #[test]
    fn unresolvable_document_is_an_error() {
        let r = registry();
        assert!(r.deserialize_document(&json!({"type": "Gizmo"})).is_err());
        assert!(r.deserialize_document(&json!({"id": "https://x.example/"})).is_err());
        assert!(r.deserialize_document(&json!("Widget")).is_err());
    }
}
