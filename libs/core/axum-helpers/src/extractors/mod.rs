//! Extractors that reject with an [`crate::AppError`] body instead of plain text.

pub mod uuid_path;
pub mod validated_json;

pub use uuid_path::{UuidPath, UuidPathPair};
pub use validated_json::{Batch, ValidatedJson};
