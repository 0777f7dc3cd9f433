use serde_json::Value;
use thiserror::Error;

/// Errors raised while decoding or manipulating vocabulary objects.
///
/// A `Format` error is recoverable inside the union engine: it only means
/// "this alternative does not apply" and the next declared alternative is
/// tried. A `Structural` error is raised after a type discriminator already
/// matched and always aborts the whole top-level decode.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("not a valid {expected}: {value}")]
    Format { expected: &'static str, value: Value },

    #[error("nested object under '{property}' failed to decode: {source}")]
    Structural {
        property: String,
        #[source]
        source: Box<Error>,
    },

    #[error("object value for '{property}', which declares no object alternative")]
    AmbiguousMap { property: String },

    #[error("malformed document: {0}")]
    MalformedDocument(&'static str),

    #[error("no property named '{0}' on this type")]
    UnknownProperty(String),

    #[error("property '{0}' is functional")]
    Functional(String),

    #[error("property '{0}' is not functional")]
    NotFunctional(String),

    #[error("index {index} out of bounds for '{property}' (len {len})")]
    IndexOutOfBounds {
        property: String,
        index: usize,
        len: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
