//! Classification of write errors returned by the driver

use ::mongodb::error::{Error, ErrorKind, WriteFailure};

/// Server code for a unique index violation
pub const DUPLICATE_KEY_CODE: i32 = 11000;

/// True when `err` is a unique index violation (E11000), from a single
/// write or from any element of an `insert_many`.
pub fn is_duplicate_key(err: &Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY_CODE,
        ErrorKind::InsertMany(e) => e
            .write_errors
            .as_ref()
            .is_some_and(|errors| errors.iter().any(|e| e.code == DUPLICATE_KEY_CODE)),
        _ => false,
    }
}
