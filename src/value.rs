//! The union value: one property slot holding exactly one of several
//! alternative shapes, or an opaque unknown fallback when nothing matched.
//!
//! Resolution order is the property's declared alternative order. Nested
//! objects carrying a `type` discriminator resolve through the registry;
//! everything else runs through the scalar codecs. An unmatched raw value is
//! never dropped: it is retained verbatim so that re-encoding reproduces it.

use chrono::{DateTime, Duration, FixedOffset};
use serde_json::Value;
use url::Url;

use crate::error::{Error, Result};
use crate::object::{discriminator_strings, VocabObject};
use crate::registry::Registry;
use crate::scalar;
use crate::schema::{AltKind, PropertySchema};

/// The populated alternative of a [`UnionValue`].
///
/// Exactly one variant is ever held, so the single-alternative invariant is
/// structural rather than checked.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    /// A nested vocabulary object or link, already resolved to its concrete
    /// type.
    Object(Box<VocabObject>),
    /// A bare absolute-IRI reference.
    Iri(Url),
    Str(String),
    Float(f64),
    NonNegInt(u64),
    Bool(bool),
    DateTime(DateTime<FixedOffset>),
    Duration(Duration),
    LangTag(String),
    MediaType(String),
    LinkRel(String),
}

/// One value of one property: either a resolved [`PropValue`] alternative or
/// an opaque unknown fallback, never both.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UnionValue {
    value: Option<PropValue>,
    unknown: Option<Value>,
}

impl UnionValue {
    pub fn new(value: PropValue) -> Self {
        Self {
            value: Some(value),
            unknown: None,
        }
    }

    /// A value that matched no declared alternative, kept verbatim.
    pub fn opaque(raw: Value) -> Self {
        Self {
            value: None,
            unknown: Some(raw),
        }
    }

    pub fn iri(url: Url) -> Self {
        Self::new(PropValue::Iri(url))
    }

    pub fn string(s: impl Into<String>) -> Self {
        Self::new(PropValue::Str(s.into()))
    }

    pub fn object(obj: VocabObject) -> Self {
        Self::new(PropValue::Object(Box::new(obj)))
    }

    pub fn non_neg_int(n: u64) -> Self {
        Self::new(PropValue::NonNegInt(n))
    }

    pub fn value(&self) -> Option<&PropValue> {
        self.value.as_ref()
    }

    pub fn unknown(&self) -> Option<&Value> {
        self.unknown.as_ref()
    }

    /// True when neither an alternative nor the fallback is populated;
    /// serializing such a value omits the property's key upstream.
    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.unknown.is_none()
    }

    pub fn as_object(&self) -> Option<&VocabObject> {
        match &self.value {
            Some(PropValue::Object(obj)) => Some(obj),
            _ => None,
        }
    }

    pub fn as_iri(&self) -> Option<&Url> {
        match &self.value {
            Some(PropValue::Iri(url)) => Some(url),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            Some(PropValue::Str(s))
            | Some(PropValue::LangTag(s))
            | Some(PropValue::MediaType(s))
            | Some(PropValue::LinkRel(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_non_neg_int(&self) -> Option<u64> {
        match self.value {
            Some(PropValue::NonNegInt(n)) => Some(n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self.value {
            Some(PropValue::Float(f)) => Some(f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.value {
            Some(PropValue::Bool(b)) => Some(b),
            _ => None,
        }
    }

    pub fn as_date_time(&self) -> Option<&DateTime<FixedOffset>> {
        match &self.value {
            Some(PropValue::DateTime(dt)) => Some(dt),
            _ => None,
        }
    }

    pub fn as_duration(&self) -> Option<Duration> {
        match self.value {
            Some(PropValue::Duration(d)) => Some(d),
            _ => None,
        }
    }

    /// Resolves `raw` against the property's declared alternatives.
    ///
    /// Objects carrying a `type` key resolve through the registry under the
    /// first object-like alternative whose capability accepts one of the
    /// discriminators; a nested decode failure after that match propagates.
    /// Objects without a discriminator stay opaque. Non-objects run through
    /// the scalar codecs in declared order, and a value matching nothing is
    /// kept verbatim in the unknown fallback.
    pub(crate) fn deserialize(
        raw: &Value,
        prop: &PropertySchema,
        registry: &Registry,
    ) -> Result<Self> {
        if let Value::Object(map) = raw {
            if !prop.has_object_alternative() {
                return Err(Error::AmbiguousMap {
                    property: prop.name.to_owned(),
                });
            }
            let discriminators = map
                .get("type")
                .map(discriminator_strings)
                .unwrap_or_default();
            for alt in prop.alternatives.iter().filter(|a| a.is_object_like()) {
                for disc in &discriminators {
                    let resolved = match alt {
                        AltKind::Object => registry.resolve_as_object(disc),
                        _ => registry.resolve_as_link(disc),
                    };
                    if let Some(mut nested) = resolved {
                        nested.populate(map, registry).map_err(|e| Error::Structural {
                            property: prop.name.to_owned(),
                            source: Box::new(e),
                        })?;
                        return Ok(Self::new(PropValue::Object(Box::new(nested))));
                    }
                }
            }
            // No discriminator, or none the registry knows: opaque.
            return Ok(Self::opaque(raw.clone()));
        }

        for alt in &prop.alternatives {
            if let Some(value) = try_scalar(*alt, raw) {
                return Ok(Self::new(value));
            }
        }
        Ok(Self::opaque(raw.clone()))
    }

    /// The encoded form of the populated alternative, the verbatim unknown
    /// fallback, or `None` when the slot is empty.
    pub(crate) fn serialize(&mut self) -> Option<Value> {
        match &mut self.value {
            Some(PropValue::Object(obj)) => Some(obj.serialize()),
            Some(PropValue::Iri(url)) => Some(scalar::encode_iri(url)),
            Some(PropValue::Str(s)) => Some(scalar::encode_string(s)),
            Some(PropValue::Float(f)) => Some(scalar::encode_float(*f)),
            Some(PropValue::NonNegInt(n)) => Some(scalar::encode_non_neg_int(*n)),
            Some(PropValue::Bool(b)) => Some(scalar::encode_bool(*b)),
            Some(PropValue::DateTime(dt)) => Some(scalar::encode_date_time(dt)),
            Some(PropValue::Duration(d)) => Some(scalar::encode_duration(d)),
            Some(PropValue::LangTag(s))
            | Some(PropValue::MediaType(s))
            | Some(PropValue::LinkRel(s)) => Some(scalar::encode_string(s)),
            None => self.unknown.clone(),
        }
    }
}

fn try_scalar(kind: AltKind, raw: &Value) -> Option<PropValue> {
    match kind {
        AltKind::Object | AltKind::Link => None,
        AltKind::Iri => scalar::decode_iri(raw).ok().map(PropValue::Iri),
        AltKind::Str => scalar::decode_string(raw).ok().map(PropValue::Str),
        AltKind::Float => scalar::decode_float(raw).ok().map(PropValue::Float),
        AltKind::NonNegInt => scalar::decode_non_neg_int(raw).ok().map(PropValue::NonNegInt),
        AltKind::Bool => scalar::decode_bool(raw).ok().map(PropValue::Bool),
        AltKind::DateTime => scalar::decode_date_time(raw).ok().map(PropValue::DateTime),
        AltKind::Duration => scalar::decode_duration(raw).ok().map(PropValue::Duration),
        AltKind::LangTag => scalar::decode_lang_tag(raw).ok().map(PropValue::LangTag),
        AltKind::MediaType => scalar::decode_media_type(raw).ok().map(PropValue::MediaType),
        AltKind::LinkRel => scalar::decode_link_rel(raw).ok().map(PropValue::LinkRel),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{PropertySchema, TypeSchema};
    use serde_json::json;

    fn fake_registry() -> Registry {
        let mut registry = Registry::new();
        registry.register(TypeSchema::object(
            "Widget",
            vec![
                PropertySchema::functional("id", &[AltKind::Iri]),
                PropertySchema::many("label", &[AltKind::Str, AltKind::Iri]),
            ],
        ));
        registry.register(TypeSchema::link(
            "WidgetLink",
            vec![PropertySchema::functional("href", &[AltKind::Iri])],
        ));
        registry
    }

    fn prop(alternatives: &[AltKind]) -> PropertySchema {
        PropertySchema::many("subject", alternatives)
    }

    #[test]
    fn first_declared_alternative_wins() {
        let registry = Registry::new();
        // An absolute IRI is also a plain string; declaration order decides.
        let raw = json!("https://example.com/things/1");

        let v = UnionValue::deserialize(&raw, &prop(&[AltKind::Str, AltKind::Iri]), &registry).unwrap();
        assert_eq!(v.as_str(), Some("https://example.com/things/1"));
        assert!(v.as_iri().is_none());

        let v = UnionValue::deserialize(&raw, &prop(&[AltKind::Iri, AltKind::Str]), &registry).unwrap();
        assert!(v.as_iri().is_some());
        assert!(v.as_str().is_none());
    }

    #[test]
    fn codec_failure_only_disqualifies_that_alternative() {
        let registry = Registry::new();
        let v = UnionValue::deserialize(
            &json!("hello world"),
            &prop(&[AltKind::Iri, AltKind::Str]),
            &registry,
        )
        .unwrap();
        assert_eq!(v.as_str(), Some("hello world"));
    }

    #[test]
    fn unmatched_scalar_is_kept_verbatim() {
        let registry = Registry::new();
        let raw = json!(["a", "b"]);
        let mut v =
            UnionValue::deserialize(&raw, &prop(&[AltKind::NonNegInt]), &registry).unwrap();
        assert!(v.value().is_none());
        assert_eq!(v.unknown(), Some(&raw));
        assert_eq!(v.serialize(), Some(raw));
    }

    #[test]
    fn typed_object_resolves_through_the_registry() {
        let registry = fake_registry();
        let raw = json!({"type": "Widget", "label": "a gadget"});
        let v = UnionValue::deserialize(
            &raw,
            &prop(&[AltKind::Object, AltKind::Link, AltKind::Iri]),
            &registry,
        )
        .unwrap();
        let nested = v.as_object().unwrap();
        assert_eq!(nested.type_name(), "Widget");
        assert_eq!(nested.values("label").unwrap()[0].as_str(), Some("a gadget"));
    }

    #[test]
    fn capability_filter_selects_the_link_alternative() {
        let registry = fake_registry();
        let raw = json!({"type": "WidgetLink", "href": "https://example.com/w/1"});
        let v = UnionValue::deserialize(
            &raw,
            &prop(&[AltKind::Object, AltKind::Link]),
            &registry,
        )
        .unwrap();
        assert!(v.as_object().unwrap().is_link());
    }

    #[test]
    fn object_without_discriminator_stays_opaque() {
        let registry = fake_registry();
        let raw = json!({"sharedInbox": "https://example.com/inbox"});
        let v = UnionValue::deserialize(&raw, &prop(&[AltKind::Object]), &registry).unwrap();
        assert!(v.value().is_none());
        assert_eq!(v.unknown(), Some(&raw));
    }

    #[test]
    fn unresolvable_discriminator_stays_opaque() {
        let registry = fake_registry();
        let raw = json!({"type": "Gizmo", "label": "?"});
        let v = UnionValue::deserialize(&raw, &prop(&[AltKind::Object]), &registry).unwrap();
        assert_eq!(v.unknown(), Some(&raw));
    }

    #[test]
    fn object_against_scalar_only_property_is_a_hard_error() {
        let registry = fake_registry();
        let raw = json!({"type": "Widget"});
        let err =
            UnionValue::deserialize(&raw, &prop(&[AltKind::Str, AltKind::Iri]), &registry)
                .unwrap_err();
        assert!(matches!(err, Error::AmbiguousMap { .. }));
    }

    #[test]
    fn nested_failure_after_discriminator_match_propagates() {
        let registry = fake_registry();
        // The type key matches Widget, but its scalar-only label property
        // then receives an object value.
        let raw = json!({"type": "Widget", "label": {"type": 42}});
        let err = UnionValue::deserialize(&raw, &prop(&[AltKind::Object]), &registry).unwrap_err();
        assert!(matches!(err, Error::Structural { .. }));
    }

    #[test]
    fn at_most_one_alternative_after_deserialize() {
        let registry = fake_registry();
        for raw in [
            json!("https://example.com/x"),
            json!("plain"),
            json!(7),
            json!({"type": "Widget"}),
            json!({"opaque": true}),
        ] {
            let v = UnionValue::deserialize(
                &raw,
                &prop(&[AltKind::Object, AltKind::Str, AltKind::Iri, AltKind::NonNegInt]),
                &registry,
            )
            .unwrap();
            let populated = usize::from(v.value().is_some()) + usize::from(v.unknown().is_some());
            assert_eq!(populated, 1);
        }
    }
}
