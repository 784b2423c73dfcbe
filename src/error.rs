use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read asset '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed file '{}' at line {line_number}: {reason} ('{line}')", path.display())]
    Malformed {
        path: PathBuf,
        line_number: usize,
        line: String,
        reason: &'static str,
    },

    #[error("{attribute} index {index} is out of range for a pool of {len}")]
    IndexOutOfRange {
        attribute: &'static str,
        index: i64,
        len: usize,
    },

    #[error("group '{group}' mixes faces with and without {attribute}")]
    InconsistentAttributes {
        group: String,
        attribute: &'static str,
    },

    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("group '{group}' pushes the model past {} vertices", u32::MAX)]
    TooManyVertices { group: String },

    #[error("decoded image is not row-contiguous")]
    UnsupportedStride,

    #[error("failed to compile shader '{name}': {log}")]
    Compile { name: String, log: String },

    #[error("failed to link shader program: {0}")]
    Link(String),

    #[error("gpu: {0}")]
    Gpu(String),

    #[error("window: {0}")]
    Window(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        return Error::Io {
            path: path.into(),
            source,
        };
    }
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        match e {
            image::ImageError::Unsupported(e) => Error::UnsupportedFormat(e.to_string()),
            e => Error::Decode(e.to_string()),
        }
    }
}
