//! Error types and helpers.
use {
    crate::io::{ReadError, WriteError},
    thiserror::Error,
};

#[derive(Error, Debug)]
pub enum Error {
    #[error("No conversion strategy supports `{0}`")]
    UnsupportedType(&'static str),
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error(transparent)]
    Write(#[from] WriteError),
    #[error("Encoded value needs {needed} bytes but the destination holds {capacity}")]
    Oversize { needed: usize, capacity: usize },
    #[error("Exact literal mismatch: expected {expected:02X?}, found {found:02X?}")]
    LiteralMismatch { expected: Vec<u8>, found: Vec<u8> },
    #[error("Unknown encoding `{0}`")]
    UnknownEncoding(String),
    #[error("Custom converter {id:?} reported failure")]
    CustomConverter { id: Option<&'static str> },
    #[error("Could not construct an instance of `{0}`")]
    Construction(&'static str),
    #[error("Self-describing type `{0}` rejected its binary form")]
    SelfDescribing(&'static str),
    #[error("Cannot write a null value of `{0}`")]
    NullValue(&'static str),
    #[error("Value {value} is not a variant of `{target}`")]
    InvalidEnumValue { target: &'static str, value: String },
    #[error("Integer does not fit in {0} bytes")]
    IntegerOverflow(usize),
    #[error("Text cannot be represented in `{0}`")]
    InvalidText(String),
    #[error("Member `{member}` failed: {source}")]
    Member {
        member: &'static str,
        source: Box<Error>,
    },
}

/// Coarse classification of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnsupportedType,
    Truncated,
    Oversize,
    LiteralMismatch,
    UnknownEncoding,
    CustomConverter,
    Construction,
    InvalidValue,
    Io,
}

impl Error {
    /// Classify the error, looking through member context.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnsupportedType(_) => ErrorKind::UnsupportedType,
            Error::Read(ReadError::ReadSizeLimit(_)) => ErrorKind::Truncated,
            Error::Write(WriteError::WriteSizeLimit(_)) | Error::Oversize { .. } => {
                ErrorKind::Oversize
            }
            Error::Read(ReadError::Io(_)) | Error::Write(WriteError::Io(_)) => ErrorKind::Io,
            Error::LiteralMismatch { .. } => ErrorKind::LiteralMismatch,
            Error::UnknownEncoding(_) => ErrorKind::UnknownEncoding,
            Error::CustomConverter { .. } => ErrorKind::CustomConverter,
            Error::Construction(_) => ErrorKind::Construction,
            Error::SelfDescribing(_)
            | Error::NullValue(_)
            | Error::InvalidEnumValue { .. }
            | Error::IntegerOverflow(_)
            | Error::InvalidText(_) => ErrorKind::InvalidValue,
            Error::Member { source, .. } => source.kind(),
        }
    }

    /// Name of the innermost composite member the error was raised in, if any.
    pub fn member(&self) -> Option<&'static str> {
        match self {
            Error::Member { member, source } => source.member().or(Some(*member)),
            _ => None,
        }
    }

    #[cold]
    pub(crate) fn in_member(self, member: &'static str) -> Error {
        Error::Member {
            member,
            source: Box::new(self),
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;

#[cold]
pub const fn unsupported_type(target: &'static str) -> Error {
    Error::UnsupportedType(target)
}

#[cold]
pub const fn oversize(needed: usize, capacity: usize) -> Error {
    Error::Oversize { needed, capacity }
}

#[cold]
pub fn literal_mismatch(expected: Vec<u8>, found: Vec<u8>) -> Error {
    Error::LiteralMismatch { expected, found }
}

#[cold]
pub fn unknown_encoding(name: &str) -> Error {
    Error::UnknownEncoding(name.to_owned())
}

#[cold]
pub const fn custom_converter(id: Option<&'static str>) -> Error {
    Error::CustomConverter { id }
}

#[cold]
pub const fn construction(target: &'static str) -> Error {
    Error::Construction(target)
}

#[cold]
pub const fn self_describing(target: &'static str) -> Error {
    Error::SelfDescribing(target)
}

#[cold]
pub const fn null_value(target: &'static str) -> Error {
    Error::NullValue(target)
}

#[cold]
pub fn invalid_enum_value(target: &'static str, value: String) -> Error {
    Error::InvalidEnumValue { target, value }
}

#[cold]
pub const fn integer_overflow(width: usize) -> Error {
    Error::IntegerOverflow(width)
}

#[cold]
pub fn invalid_text(encoding: &str) -> Error {
    Error::InvalidText(encoding.to_owned())
}
