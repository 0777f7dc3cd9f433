//! The ActivityStreams vocabulary as data: property tables, the concrete
//! type catalog and the default registry.
//!
//! Everything here is declarative. The decode/encode behavior of every type
//! lives in the generic engine; this module only states which properties
//! each type carries and in which priority order their alternatives apply.

use lazy_static::lazy_static;

use crate::registry::Registry;
use crate::schema::{
    AltKind::{self, *},
    PropertySchema, TypeSchema,
};

/// The well-known sentinel IRI addressing the public audience.
pub const PUBLIC_AUDIENCE: &str = "https://www.w3.org/ns/activitystreams#Public";

const OBJECT_OR_LINK: &[AltKind] = &[Object, Link, Iri];
const OBJECT_REF: &[AltKind] = &[Object, Iri];

fn object_properties() -> Vec<PropertySchema> {
    vec![
        PropertySchema::functional("id", &[Iri]),
        PropertySchema::many("attachment", OBJECT_OR_LINK),
        PropertySchema::many("attributedTo", OBJECT_OR_LINK),
        PropertySchema::many("audience", OBJECT_OR_LINK),
        PropertySchema::many("to", OBJECT_OR_LINK),
        PropertySchema::many("bto", OBJECT_OR_LINK),
        PropertySchema::many("cc", OBJECT_OR_LINK),
        PropertySchema::many("bcc", OBJECT_OR_LINK),
        PropertySchema::many("content", &[Str, Iri]).with_language_map(),
        PropertySchema::many("name", &[Str, Iri]).with_language_map(),
        PropertySchema::many("summary", &[Str, Iri]).with_language_map(),
        PropertySchema::many("context", OBJECT_OR_LINK),
        PropertySchema::many("generator", OBJECT_OR_LINK),
        PropertySchema::many("icon", OBJECT_OR_LINK),
        PropertySchema::many("image", OBJECT_OR_LINK),
        PropertySchema::many("inReplyTo", OBJECT_OR_LINK),
        PropertySchema::many("location", OBJECT_OR_LINK),
        PropertySchema::many("preview", OBJECT_OR_LINK),
        PropertySchema::many("tag", OBJECT_OR_LINK),
        PropertySchema::many("url", &[Link, Iri]),
        PropertySchema::functional("replies", OBJECT_REF),
        PropertySchema::functional("likes", OBJECT_REF),
        PropertySchema::functional("shares", OBJECT_REF),
        PropertySchema::functional("source", OBJECT_REF),
        PropertySchema::functional("mediaType", &[MediaType, Iri]),
        PropertySchema::functional("duration", &[Duration, Iri]),
        PropertySchema::functional("startTime", &[DateTime, Iri]),
        PropertySchema::functional("endTime", &[DateTime, Iri]),
        PropertySchema::functional("published", &[DateTime, Iri]),
        PropertySchema::functional("updated", &[DateTime, Iri]),
        PropertySchema::functional("altitude", &[Float, Iri]),
    ]
}

fn link_properties() -> Vec<PropertySchema> {
    vec![
        PropertySchema::functional("id", &[Iri]),
        PropertySchema::functional("href", &[Iri]),
        PropertySchema::many("rel", &[LinkRel, Iri]),
        PropertySchema::functional("mediaType", &[MediaType, Iri]),
        PropertySchema::many("name", &[Str, Iri]).with_language_map(),
        PropertySchema::functional("hreflang", &[LangTag, Iri]),
        PropertySchema::functional("height", &[NonNegInt, Iri]),
        PropertySchema::functional("width", &[NonNegInt, Iri]),
        PropertySchema::many("preview", OBJECT_OR_LINK),
    ]
}

fn activity_properties() -> Vec<PropertySchema> {
    let mut props = intransitive_activity_properties();
    props.push(PropertySchema::many("object", OBJECT_OR_LINK));
    props
}

fn intransitive_activity_properties() -> Vec<PropertySchema> {
    let mut props = object_properties();
    props.extend([
        PropertySchema::many("actor", OBJECT_OR_LINK),
        PropertySchema::many("target", OBJECT_OR_LINK),
        PropertySchema::many("result", OBJECT_OR_LINK),
        PropertySchema::many("origin", OBJECT_OR_LINK),
        PropertySchema::many("instrument", OBJECT_OR_LINK),
    ]);
    props
}

fn question_properties() -> Vec<PropertySchema> {
    let mut props = intransitive_activity_properties();
    props.extend([
        PropertySchema::many("oneOf", OBJECT_OR_LINK),
        PropertySchema::many("anyOf", OBJECT_OR_LINK),
        PropertySchema::functional("closed", &[Object, Link, DateTime, Bool, Iri]),
    ]);
    props
}

fn actor_properties() -> Vec<PropertySchema> {
    let mut props = object_properties();
    props.extend([
        PropertySchema::functional("preferredUsername", &[Str, Iri]).with_language_map(),
        PropertySchema::functional("inbox", OBJECT_REF),
        PropertySchema::functional("outbox", OBJECT_REF),
        PropertySchema::functional("following", OBJECT_REF),
        PropertySchema::functional("followers", OBJECT_REF),
        PropertySchema::functional("liked", OBJECT_REF),
        PropertySchema::many("streams", OBJECT_REF),
        PropertySchema::functional("endpoints", OBJECT_REF),
    ]);
    props
}

fn collection_properties(ordered: bool) -> Vec<PropertySchema> {
    let mut props = object_properties();
    props.extend([
        PropertySchema::functional("totalItems", &[NonNegInt, Iri]),
        PropertySchema::functional("current", OBJECT_OR_LINK),
        PropertySchema::functional("first", OBJECT_OR_LINK),
        PropertySchema::functional("last", OBJECT_OR_LINK),
        PropertySchema::many(if ordered { "orderedItems" } else { "items" }, OBJECT_OR_LINK),
    ]);
    props
}

fn collection_page_properties(ordered: bool) -> Vec<PropertySchema> {
    let mut props = collection_properties(ordered);
    props.extend([
        PropertySchema::functional("partOf", OBJECT_OR_LINK),
        PropertySchema::functional("next", OBJECT_OR_LINK),
        PropertySchema::functional("prev", OBJECT_OR_LINK),
    ]);
    if ordered {
        props.push(PropertySchema::functional("startIndex", &[NonNegInt, Iri]));
    }
    props
}

fn place_properties() -> Vec<PropertySchema> {
    let mut props = object_properties();
    props.extend([
        PropertySchema::functional("accuracy", &[Float, Iri]),
        PropertySchema::functional("latitude", &[Float, Iri]),
        PropertySchema::functional("longitude", &[Float, Iri]),
        PropertySchema::functional("radius", &[Float, Iri]),
        PropertySchema::functional("units", &[Str, Iri]),
    ]);
    props
}

fn profile_properties() -> Vec<PropertySchema> {
    let mut props = object_properties();
    props.push(PropertySchema::functional("describes", OBJECT_REF));
    props
}

fn tombstone_properties() -> Vec<PropertySchema> {
    let mut props = object_properties();
    props.extend([
        PropertySchema::many("formerType", &[Object, Str, Iri]),
        PropertySchema::functional("deleted", &[DateTime, Iri]),
    ]);
    props
}

fn relationship_properties() -> Vec<PropertySchema> {
    let mut props = object_properties();
    props.extend([
        PropertySchema::functional("subject", OBJECT_OR_LINK),
        PropertySchema::many("object", OBJECT_OR_LINK),
        PropertySchema::many("relationship", OBJECT_REF),
    ]);
    props
}

const PLAIN_OBJECT_TYPES: &[&str] = &[
    "Object", "Article", "Audio", "Document", "Event", "Image", "Note", "Page", "Video",
];

const ACTOR_TYPES: &[&str] = &["Application", "Group", "Organization", "Person", "Service"];

const TRANSITIVE_ACTIVITY_TYPES: &[&str] = &[
    "Activity",
    "Accept",
    "Add",
    "Announce",
    "Block",
    "Create",
    "Delete",
    "Dislike",
    "Flag",
    "Follow",
    "Ignore",
    "Invite",
    "Join",
    "Leave",
    "Like",
    "Listen",
    "Move",
    "Offer",
    "Read",
    "Reject",
    "Remove",
    "TentativeAccept",
    "TentativeReject",
    "Undo",
    "Update",
    "View",
];

const INTRANSITIVE_ACTIVITY_TYPES: &[&str] = &["IntransitiveActivity", "Arrive", "Travel"];

fn build_registry() -> Registry {
    let mut registry = Registry::new();
    for &name in PLAIN_OBJECT_TYPES {
        registry.register(TypeSchema::object(name, object_properties()));
    }
    for &name in ACTOR_TYPES {
        registry.register(TypeSchema::object(name, actor_properties()));
    }
    for &name in TRANSITIVE_ACTIVITY_TYPES {
        registry.register(TypeSchema::object(name, activity_properties()));
    }
    for &name in INTRANSITIVE_ACTIVITY_TYPES {
        registry.register(TypeSchema::object(name, intransitive_activity_properties()));
    }
    registry.register(TypeSchema::object("Question", question_properties()));
    registry.register(TypeSchema::object("Collection", collection_properties(false)));
    registry.register(TypeSchema::object("OrderedCollection", collection_properties(true)));
    registry.register(TypeSchema::object("CollectionPage", collection_page_properties(false)));
    registry.register(TypeSchema::object(
        "OrderedCollectionPage",
        collection_page_properties(true),
    ));
    registry.register(TypeSchema::object("Place", place_properties()));
    registry.register(TypeSchema::object("Profile", profile_properties()));
    registry.register(TypeSchema::object("Tombstone", tombstone_properties()));
    registry.register(TypeSchema::object("Relationship", relationship_properties()));
    registry.register(TypeSchema::link("Link", link_properties()));
    registry.register(TypeSchema::link("Mention", link_properties()));
    registry
}

lazy_static! {
    static ref ACTIVITY_STREAMS: Registry = build_registry();
}

/// The registry of all ActivityStreams vocabulary types.
pub fn activity_streams() -> &'static Registry {
    &ACTIVITY_STREAMS
}
