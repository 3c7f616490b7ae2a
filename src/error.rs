use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapforgeError {
    #[error("Invalid magic number in bundle header")]
    InvalidMagic,

    #[error("Unsupported format version: {major}.{minor}")]
    UnsupportedVersion { major: u16, minor: u16 },

    #[error("Bundle graph checksum verification failed")]
    ChecksumMismatch,

    #[error("Truncated bundle: {0}")]
    Truncated(&'static str),

    #[error("Payload decode error: {0}")]
    Decode(String),

    #[error("Payload encode error: {0}")]
    Encode(String),

    #[error("Invalid field path '{0}'")]
    InvalidPath(String),

    #[error("Field not found: {0}")]
    FieldNotFound(String),

    #[error("Type mismatch at '{path}': expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Unknown type id: {0}")]
    UnknownTypeId(u32),

    #[error("Bundle has no schema for class '{0}'")]
    UnknownClass(String),

    #[error("Object not found: {0}")]
    ObjectNotFound(i64),

    #[error("Bundle has no {0} object")]
    MissingObject(&'static str),

    #[error("Atlas image '{name}' is {width}x{height}, expected {expected_width}x{expected_height}")]
    AtlasImageSize {
        name: String,
        width: u32,
        height: u32,
        expected_width: u32,
        expected_height: u32,
    },

    #[error("Image decode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Descriptor parse error: {0}")]
    Descriptor(#[from] serde_json::Error),

    #[error("Compression error: {0}")]
    Compression(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MapforgeError>;
