//! The vocabulary object: many named property slots composed under one
//! addressable entity, plus the unknown-extension bag that keeps undeclared
//! data intact across a decode/encode round trip.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::trace;
use url::Url;

use crate::error::{Error, Result};
use crate::langmap::LanguageMap;
use crate::registry::Registry;
use crate::schema::TypeSchema;
use crate::value::UnionValue;

/// Storage for one declared property: its value sequence (at most one entry
/// for functional properties) and, when declared, its language-map sibling.
#[derive(Debug, Clone, PartialEq, Default)]
struct Slot {
    values: Vec<UnionValue>,
    map: Option<LanguageMap>,
}

/// A concrete vocabulary instance driven by its [`TypeSchema`].
///
/// Decoding is a single pass over the raw object's keys: `@context` is
/// ignored, `type` feeds the discriminator list, declared keys dispatch to
/// their slots and everything else lands in the unknown-extension mapping.
/// The first error aborts the decode with no partial object.
#[derive(Debug, Clone, PartialEq)]
pub struct VocabObject {
    schema: Arc<TypeSchema>,
    types: Vec<String>,
    slots: Vec<Slot>,
    unknown: Map<String, Value>,
}

impl VocabObject {
    /// A blank instance: empty slots, empty discriminator list.
    pub fn new(schema: Arc<TypeSchema>) -> Self {
        let slots = vec![Slot::default(); schema.properties.len()];
        Self {
            schema,
            types: Vec::new(),
            slots,
            unknown: Map::new(),
        }
    }

    pub fn schema(&self) -> &TypeSchema {
        &self.schema
    }

    /// The canonical type discriminator of this instance's schema.
    pub fn type_name(&self) -> &'static str {
        self.schema.name
    }

    pub fn is_link(&self) -> bool {
        self.schema.link
    }

    /// The discriminator strings seen at decode time (or set manually).
    pub fn type_names(&self) -> &[String] {
        &self.types
    }

    pub fn add_type(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.types.contains(&name) {
            self.types.push(name);
        }
    }

    pub fn unknown(&self) -> &Map<String, Value> {
        &self.unknown
    }

    pub fn insert_unknown(&mut self, key: impl Into<String>, value: Value) {
        self.unknown.insert(key.into(), value);
    }

    pub fn id(&self) -> Option<&Url> {
        let idx = self.schema.index_of("id")?;
        self.slots[idx].values.first()?.as_iri()
    }

    pub fn set_id(&mut self, id: Url) -> Result<()> {
        self.set("id", UnionValue::iri(id))
    }

    fn index(&self, name: &str) -> Result<usize> {
        self.schema
            .index_of(name)
            .ok_or_else(|| Error::UnknownProperty(name.to_owned()))
    }

    /// The single value of a functional property, if set.
    pub fn get(&self, name: &str) -> Result<Option<&UnionValue>> {
        let idx = self.index(name)?;
        if !self.schema.properties[idx].functional {
            return Err(Error::NotFunctional(name.to_owned()));
        }
        Ok(self.slots[idx].values.first())
    }

    pub fn set(&mut self, name: &str, value: UnionValue) -> Result<()> {
        let idx = self.index(name)?;
        if !self.schema.properties[idx].functional {
            return Err(Error::NotFunctional(name.to_owned()));
        }
        self.slots[idx].values = vec![value];
        Ok(())
    }

    pub fn take(&mut self, name: &str) -> Result<Option<UnionValue>> {
        let idx = self.index(name)?;
        if !self.schema.properties[idx].functional {
            return Err(Error::NotFunctional(name.to_owned()));
        }
        Ok(self.slots[idx].values.pop())
    }

    /// The ordered value sequence of a non-functional property.
    pub fn values(&self, name: &str) -> Result<&[UnionValue]> {
        let idx = self.index(name)?;
        if self.schema.properties[idx].functional {
            return Err(Error::Functional(name.to_owned()));
        }
        Ok(&self.slots[idx].values)
    }

    pub fn append(&mut self, name: &str, value: UnionValue) -> Result<()> {
        let idx = self.index(name)?;
        if self.schema.properties[idx].functional {
            return Err(Error::Functional(name.to_owned()));
        }
        self.slots[idx].values.push(value);
        Ok(())
    }

    pub fn prepend(&mut self, name: &str, value: UnionValue) -> Result<()> {
        let idx = self.index(name)?;
        if self.schema.properties[idx].functional {
            return Err(Error::Functional(name.to_owned()));
        }
        self.slots[idx].values.insert(0, value);
        Ok(())
    }

    pub fn remove_at(&mut self, name: &str, index: usize) -> Result<UnionValue> {
        let idx = self.index(name)?;
        if self.schema.properties[idx].functional {
            return Err(Error::Functional(name.to_owned()));
        }
        let len = self.slots[idx].values.len();
        if index >= len {
            return Err(Error::IndexOutOfBounds {
                property: name.to_owned(),
                index,
                len,
            });
        }
        Ok(self.slots[idx].values.remove(index))
    }

    pub fn count(&self, name: &str) -> Result<usize> {
        Ok(self.slots[self.index(name)?].values.len())
    }

    /// The language-map sibling of `name`, if the property declares one and
    /// it has been populated.
    pub fn language_map(&self, name: &str) -> Option<&LanguageMap> {
        let idx = self.schema.index_of(name)?;
        self.slots[idx].map.as_ref()
    }

    /// The language-map sibling of `name`, created empty on first access.
    pub fn language_map_mut(&mut self, name: &str) -> Result<&mut LanguageMap> {
        let idx = self.index(name)?;
        if !self.schema.properties[idx].language_map {
            return Err(Error::UnknownProperty(format!("{name}Map")));
        }
        Ok(self.slots[idx].map.get_or_insert_with(LanguageMap::new))
    }

    /// Whether any of the audience properties resolves, as a literal IRI, to
    /// the well-known public-audience sentinel. Computed over decoded data,
    /// not persisted.
    pub fn is_public_audience(&self) -> bool {
        ["to", "bto", "cc", "bcc"].iter().any(|name| {
            self.schema.index_of(name).is_some_and(|idx| {
                self.slots[idx].values.iter().any(|value| {
                    value
                        .as_iri()
                        .is_some_and(|iri| iri.as_str() == crate::vocab::PUBLIC_AUDIENCE)
                })
            })
        })
    }

    /// Decodes `raw` into a fresh instance of `schema`.
    pub fn deserialize(schema: Arc<TypeSchema>, raw: &Value, registry: &Registry) -> Result<Self> {
        let map = raw
            .as_object()
            .ok_or(Error::MalformedDocument("expected a JSON object"))?;
        let mut obj = Self::new(schema);
        obj.populate(map, registry)?;
        Ok(obj)
    }

    pub(crate) fn populate(&mut self, map: &Map<String, Value>, registry: &Registry) -> Result<()> {
        trace!(type_name = self.schema.name, keys = map.len(), "decoding object");
        let schema = Arc::clone(&self.schema);
        for (key, value) in map {
            if key == "@context" {
                // Context handling belongs to an outer layer; the key is
                // ignored and never stored as unknown.
                continue;
            }
            if key == "type" {
                self.types = decode_type_list(value)?;
                continue;
            }
            if let Some(idx) = schema.index_of(key) {
                let prop = &schema.properties[idx];
                let slot = &mut self.slots[idx];
                slot.values.clear();
                match value {
                    // A non-functional property accepts the bare and the
                    // array shape symmetrically.
                    Value::Array(items) if !prop.functional => {
                        for item in items {
                            slot.values.push(UnionValue::deserialize(item, prop, registry)?);
                        }
                    }
                    other => slot.values.push(UnionValue::deserialize(other, prop, registry)?),
                }
                continue;
            }
            if let Some(idx) = schema.language_map_index(key) {
                let lang_map: LanguageMap =
                    serde_json::from_value(value.clone()).map_err(|_| Error::Format {
                        expected: "language map",
                        value: value.clone(),
                    })?;
                self.slots[idx].map = Some(lang_map);
                continue;
            }
            let normalized = normalize_unknown(value, registry)?;
            self.unknown.insert(key.clone(), normalized);
        }
        Ok(())
    }

    /// Encodes the instance back to a raw JSON object.
    ///
    /// The canonical type discriminator is inserted into the list when
    /// absent; that is the only self-mutation. Unknown extensions are
    /// emitted first so that declared properties override any colliding
    /// stale key. A non-functional slot of length one collapses to a bare
    /// value; empty slots omit their key entirely.
    pub fn serialize(&mut self) -> Value {
        trace!(type_name = self.schema.name, "encoding object");
        if !self.types.iter().any(|t| t == self.schema.name) {
            self.types.push(self.schema.name.to_owned());
        }

        let schema = Arc::clone(&self.schema);
        let mut out = Map::new();
        for (key, value) in &self.unknown {
            out.insert(key.clone(), value.clone());
        }
        out.insert("type".to_owned(), encode_type_list(&self.types));
        for (idx, prop) in schema.properties.iter().enumerate() {
            let slot = &mut self.slots[idx];
            let mut encoded: Vec<Value> =
                slot.values.iter_mut().filter_map(UnionValue::serialize).collect();
            if encoded.len() == 1 {
                if let Some(single) = encoded.pop() {
                    out.insert(prop.name.to_owned(), single);
                }
            } else if !encoded.is_empty() {
                out.insert(prop.name.to_owned(), Value::Array(encoded));
            }
            if let Some(map) = &slot.map {
                if !map.is_empty() {
                    out.insert(prop.map_key(), map.to_json());
                }
            }
        }
        Value::Object(out)
    }
}

/// The discriminator strings present in a raw `type` value. Non-string
/// entries are skipped; strictness belongs to [`decode_type_list`].
pub(crate) fn discriminator_strings(raw: &Value) -> Vec<String> {
    match raw {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(|i| i.as_str().map(str::to_owned))
            .collect(),
        _ => Vec::new(),
    }
}

fn decode_type_list(raw: &Value) -> Result<Vec<String>> {
    match raw {
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|i| {
                i.as_str()
                    .map(str::to_owned)
                    .ok_or(Error::MalformedDocument("type array must contain strings"))
            })
            .collect(),
        _ => Err(Error::MalformedDocument(
            "type key must be a string or an array of strings",
        )),
    }
}

fn encode_type_list(types: &[String]) -> Value {
    if types.len() == 1 {
        Value::String(types[0].clone())
    } else {
        Value::Array(types.iter().cloned().map(Value::String).collect())
    }
}

/// Applies the decode rules one level down inside unknown-extension data:
/// objects whose discriminator resolves are decoded and re-encoded (so a
/// malformed known-typed extension payload aborts the decode), arrays are
/// normalized element-wise and everything else passes through verbatim.
fn normalize_unknown(value: &Value, registry: &Registry) -> Result<Value> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| normalize_unknown(item, registry))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Value::Object(map) => {
            if let Some(type_key) = map.get("type") {
                for disc in discriminator_strings(type_key) {
                    if let Some(mut obj) = registry
                        .resolve_as_object(&disc)
                        .or_else(|| registry.resolve_as_link(&disc))
                    {
                        obj.populate(map, registry)?;
                        return Ok(obj.serialize());
                    }
                }
            }
            Ok(value.clone())
        }
        _ => Ok(value.clone()),
    }
}
