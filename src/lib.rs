/*! # activity-vocab

An object model for the [ActivityStreams] vocabulary. Every property of
every vocabulary type may hold one of several alternative value shapes — a
nested typed object, a link, a bare IRI reference, a literal scalar or a
language-tagged string — with exactly one alternative populated at a time,
and unknown values preserved verbatim for lossless round-tripping.

The crate works on already-parsed `serde_json::Value` trees; it performs no
I/O and no JSON-LD context processing. The per-type surface is declarative:
a [`TypeSchema`] states which properties a type carries and in which
priority order their alternatives resolve, and one generic engine
([`VocabObject`] over [`UnionValue`]) interprets those schemas for the whole
vocabulary.

## Example

```
use activity_vocab::vocab::activity_streams;
use serde_json::json;

let raw = json!({
    "type": "CollectionPage",
    "totalItems": 3,
    "items": ["https://ex.org/1", "https://ex.org/2"]
});
let mut page = activity_streams().deserialize_document(&raw)?;
assert_eq!(page.values("items")?.len(), 2);
assert_eq!(page.serialize(), raw);
# Ok::<(), activity_vocab::Error>(())
```

[ActivityStreams]: https://www.w3.org/TR/activitystreams-vocabulary/
*/

pub mod error;
pub mod langmap;
pub mod object;
pub mod registry;
pub mod scalar;
pub mod schema;
pub mod value;
pub mod vocab;

// Re-exports
pub use error::Error;
pub use langmap::LanguageMap;
pub use object::VocabObject;
pub use registry::Registry;
pub use schema::{AltKind, PropertySchema, TypeSchema};
pub use value::{PropValue, UnionValue};
pub use vocab::{activity_streams, PUBLIC_AUDIENCE};
