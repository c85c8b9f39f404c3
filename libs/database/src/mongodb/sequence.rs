//! Named monotonic counters stored in the `counters` collection.
//!
//! Each counter is one document `{ _id: <name>, seq: <i64> }`, advanced with a
//! single atomic find-and-modify so concurrent callers never observe the same value.

use ::mongodb::{
    Database,
    bson::{Bson, Document, doc},
    options::ReturnDocument,
};
use std::ops::RangeInclusive;
use tracing::instrument;

use crate::common::{DatabaseError, DatabaseResult};

pub const COUNTERS_COLLECTION: &str = "counters";

/// Increment counter `name` and return its new value.
///
/// A missing counter is created, so the first call returns 1.
#[instrument(skip(db))]
pub async fn next_sequence(db: &Database, name: &str) -> DatabaseResult<i64> {
    let block = reserve_sequence(db, name, 1).await?;
    Ok(*block.end())
}

/// Advance counter `name` by `count` in one step and return the reserved values.
///
/// Reserving a block keeps bulk inserts to a single round trip while values
/// stay unique across concurrent callers. `count` must be at least 1.
#[instrument(skip(db))]
pub async fn reserve_sequence(
    db: &Database,
    name: &str,
    count: u64,
) -> DatabaseResult<RangeInclusive<i64>> {
    let step = i64::try_from(count)
        .ok()
        .filter(|step| *step > 0)
        .ok_or_else(|| {
            DatabaseError::UnexpectedDocument(format!("invalid reservation size {count}"))
        })?;

    let updated = db
        .collection::<Document>(COUNTERS_COLLECTION)
        .find_one_and_update(doc! { "_id": name }, doc! { "$inc": { "seq": step } })
        .upsert(true)
        .return_document(ReturnDocument::After)
        .await?
        .ok_or_else(|| {
            DatabaseError::UnexpectedDocument(format!("counter '{name}' missing after upsert"))
        })?;

    let last = read_seq(&updated)?;
    tracing::debug!(counter = name, last, count, "Sequence advanced");
    Ok(block_ending_at(last, step))
}

fn block_ending_at(last: i64, step: i64) -> RangeInclusive<i64> {
    (last - step + 1)..=last
}

fn read_seq(counter: &Document) -> DatabaseResult<i64> {
    match counter.get("seq") {
        Some(Bson::Int64(n)) => Ok(*n),
        Some(Bson::Int32(n)) => Ok(i64::from(*n)),
        Some(Bson::Double(n)) if n.fract() == 0.0 => Ok(*n as i64),
        other => Err(DatabaseError::UnexpectedDocument(format!(
            "counter seq has unexpected value {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_seq_accepts_numeric_widths() {
        assert_eq!(read_seq(&doc! { "seq": 7_i64 }).unwrap(), 7);
        assert_eq!(read_seq(&doc! { "seq": 7_i32 }).unwrap(), 7);
        assert_eq!(read_seq(&doc! { "seq": 7.0 }).unwrap(), 7);
    }

    #[test]
    fn test_block_ending_at() {
        assert_eq!(block_ending_at(10, 3), 8..=10);
        assert_eq!(block_ending_at(1, 1), 1..=1);
    }

    #[test]
    fn test_read_seq_rejects_garbage() {
        assert!(read_seq(&doc! { "seq": "seven" }).is_err());
        assert!(read_seq(&doc! {}).is_err());
    }
}
