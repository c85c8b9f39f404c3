//! Random "related" and "recommended" product samples.

use database::mongodb::{uuid_array, uuid_bson};
use mongodb::bson::{doc, Document};
use uuid::Uuid;

pub const RELATED_SAMPLE_SIZE: i64 = 4;
pub const RECOMMENDED_SAMPLE_SIZE: i64 = 6;

/// What sampled products must share
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupingKey<'a> {
    Generic(Uuid),
    SubCategories(&'a [Uuid]),
}

/// Match products in the group, minus the excluded ids
pub fn sample_filter(exclude: &[Uuid], key: GroupingKey<'_>) -> Document {
    let mut filter = match key {
        GroupingKey::Generic(generic) => doc! { "generic": uuid_bson(&generic) },
        GroupingKey::SubCategories(ids) => doc! { "subCategory": { "$in": uuid_array(ids) } },
    };
    if !exclude.is_empty() {
        filter.insert("_id", doc! { "$nin": uuid_array(exclude) });
    }
    filter
}

/// `$match` followed by a uniform `$sample` of `size`
pub fn sample_pipeline(filter: Document, size: i64) -> Vec<Document> {
    vec![doc! { "$match": filter }, doc! { "$sample": { "size": size } }]
}
