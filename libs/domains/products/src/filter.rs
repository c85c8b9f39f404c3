//! Typed product filter expressions.
//!
//! Clients describe filters as JSON:
//!
//! ```json
//! [
//!   { "field": "categorySlug", "op": "eq", "value": "pain-relief" },
//!   { "or": [
//!       { "field": "price", "op": "lte", "value": 50 },
//!       { "field": "tags", "op": "in", "value": ["offer"] }
//!   ] }
//! ]
//! ```
//!
//! Every expression is checked against the product field allowlist before it
//! becomes a MongoDB filter, so a malformed request is rejected as a 400 and
//! never reaches the database.

use database::mongodb::{serde_timestamp, uuid_bson};
use mongodb::bson::{self, doc, Bson, Document};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// Comparison operator of a [`FilterClause`]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FilterOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    Nin,
    /// Case-insensitive pattern match; the value must compile as a regex
    Regex,
    /// `true` when the field must be present, `false` when it must be absent
    Exists,
}

impl FilterOp {
    fn mongo_operator(self) -> &'static str {
        match self {
            FilterOp::Eq => "$eq",
            FilterOp::Ne => "$ne",
            FilterOp::Gt => "$gt",
            FilterOp::Gte => "$gte",
            FilterOp::Lt => "$lt",
            FilterOp::Lte => "$lte",
            FilterOp::In => "$in",
            FilterOp::Nin => "$nin",
            FilterOp::Regex => "$regex",
            FilterOp::Exists => "$exists",
        }
    }

    fn is_range(self) -> bool {
        matches!(
            self,
            FilterOp::Gt | FilterOp::Gte | FilterOp::Lt | FilterOp::Lte
        )
    }
}

/// A single `field op value` condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FilterClause {
    /// Stored field name, e.g. `price`, `brandSlug`, `attributes.strength`
    pub field: String,
    pub op: FilterOp,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub value: Value,
}

/// Filter expression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
#[schema(no_recursion)]
pub enum FilterExpr {
    And { and: Vec<FilterExpr> },
    Or { or: Vec<FilterExpr> },
    Nor { nor: Vec<FilterExpr> },
    Clause(FilterClause),
}

#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("unknown filter field '{0}'")]
    UnknownField(String),

    #[error("operator '{op}' is not supported on field '{field}'")]
    UnsupportedOperator { field: String, op: FilterOp },

    #[error("operator '{op}' on field '{field}' requires an array value")]
    ExpectedArray { field: String, op: FilterOp },

    #[error("field '{field}' expects {expected}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
    },

    #[error("field '{field}' expects a UUID, got '{value}'")]
    InvalidReference { field: String, value: String },

    #[error("invalid pattern for field '{field}': {reason}")]
    InvalidRegex { field: String, reason: String },

    #[error("'{0}' group must contain at least one expression")]
    EmptyGroup(&'static str),

    #[error("field '{0}' cannot be used for sorting")]
    UnsortableField(String),
}

/// Value shape of a filterable field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldKind {
    /// Stored UUID string pointing at another document
    Reference,
    Text,
    Number,
    /// Timestamp stored as a fixed-width UTC RFC 3339 string
    Timestamp,
    /// Free-form `attributes.*` value
    Any,
}

impl FieldKind {
    pub(crate) fn of(field: &str) -> Option<FieldKind> {
        match field {
            "_id" | "brand" | "category" | "subCategory" | "generic" | "unitType"
            | "prices.unit" => Some(FieldKind::Reference),
            "name" | "slug" | "sku" | "brandSlug" | "categorySlug" | "subCategorySlug" | "tags"
            | "images" => Some(FieldKind::Text),
            "price" | "prices.price" | "prices.discountedPrice" | "prices.quantity" => {
                Some(FieldKind::Number)
            }
            "createdAt" | "updatedAt" => Some(FieldKind::Timestamp),
            _ => field
                .strip_prefix("attributes.")
                .filter(|rest| !rest.is_empty() && !rest.starts_with('$'))
                .map(|_| FieldKind::Any),
        }
    }
}

impl FilterExpr {
    /// Shorthand for an equality clause
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        FilterExpr::clause(field, FilterOp::Eq, value)
    }

    pub fn clause(field: impl Into<String>, op: FilterOp, value: impl Into<Value>) -> Self {
        FilterExpr::Clause(FilterClause {
            field: field.into(),
            op,
            value: value.into(),
        })
    }

    /// Validate and translate into a MongoDB filter document
    pub fn to_document(&self) -> Result<Document, FilterError> {
        match self {
            FilterExpr::And { and } => group("$and", "and", and),
            FilterExpr::Or { or } => group("$or", "or", or),
            FilterExpr::Nor { nor } => group("$nor", "nor", nor),
            FilterExpr::Clause(clause) => clause.to_document(),
        }
    }
}

fn group(operator: &str, name: &'static str, items: &[FilterExpr]) -> Result<Document, FilterError> {
    if items.is_empty() {
        return Err(FilterError::EmptyGroup(name));
    }
    let parts = items
        .iter()
        .map(FilterExpr::to_document)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(doc! { operator: parts })
}

impl FilterClause {
    pub fn to_document(&self) -> Result<Document, FilterError> {
        let field = self.field.as_str();
        let kind = FieldKind::of(field).ok_or_else(|| FilterError::UnknownField(field.into()))?;

        let operand = match self.op {
            FilterOp::In | FilterOp::Nin => {
                let items = self.value.as_array().ok_or_else(|| FilterError::ExpectedArray {
                    field: field.into(),
                    op: self.op,
                })?;
                let converted = items
                    .iter()
                    .map(|item| scalar(field, kind, item))
                    .collect::<Result<Vec<_>, _>>()?;
                Bson::Array(converted)
            }
            FilterOp::Regex => {
                if !matches!(kind, FieldKind::Text | FieldKind::Any) {
                    return Err(self.unsupported());
                }
                let pattern = self.value.as_str().ok_or_else(|| FilterError::TypeMismatch {
                    field: field.into(),
                    expected: "a string pattern",
                })?;
                regex::Regex::new(pattern).map_err(|e| FilterError::InvalidRegex {
                    field: field.into(),
                    reason: e.to_string(),
                })?;
                return Ok(doc! { field: { "$regex": pattern, "$options": "i" } });
            }
            FilterOp::Exists => match &self.value {
                Value::Null => Bson::Boolean(true),
                Value::Bool(flag) => Bson::Boolean(*flag),
                _ => {
                    return Err(FilterError::TypeMismatch {
                        field: field.into(),
                        expected: "a boolean",
                    })
                }
            },
            op if op.is_range() && kind == FieldKind::Reference => {
                return Err(self.unsupported());
            }
            _ => scalar(field, kind, &self.value)?,
        };

        let operator = self.op.mongo_operator();
        Ok(doc! { field: { operator: operand } })
    }

    fn unsupported(&self) -> FilterError {
        FilterError::UnsupportedOperator {
            field: self.field.clone(),
            op: self.op,
        }
    }
}

fn scalar(field: &str, kind: FieldKind, value: &Value) -> Result<Bson, FilterError> {
    let mismatch = |expected| FilterError::TypeMismatch {
        field: field.into(),
        expected,
    };

    match kind {
        FieldKind::Reference => {
            let raw = value.as_str().ok_or_else(|| mismatch("a UUID string"))?;
            Uuid::parse_str(raw)
                .map(|id| uuid_bson(&id))
                .map_err(|_| FilterError::InvalidReference {
                    field: field.into(),
                    value: raw.into(),
                })
        }
        FieldKind::Text => value
            .as_str()
            .map(|s| Bson::String(s.to_string()))
            .ok_or_else(|| mismatch("a string")),
        // Stored timestamps are fixed-width UTC strings; compare in the same form
        FieldKind::Timestamp => value
            .as_str()
            .and_then(serde_timestamp::normalize)
            .map(Bson::String)
            .ok_or_else(|| mismatch("an RFC 3339 timestamp")),
        FieldKind::Number => match value {
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(Bson::Int64(i)),
                None => n.as_f64().map(Bson::Double).ok_or_else(|| mismatch("a number")),
            },
            _ => Err(mismatch("a number")),
        },
        FieldKind::Any => bson::to_bson(value).map_err(|_| mismatch("a JSON value")),
    }
}

/// Conjoin several filter documents; an empty list matches everything
pub fn conjoin(mut parts: Vec<Document>) -> Document {
    match parts.len() {
        0 => Document::new(),
        1 => parts.remove(0),
        _ => doc! { "$and": parts },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> FilterExpr {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_equality_clause() {
        let expr = FilterExpr::eq("categorySlug", "pain-relief");
        assert_eq!(
            expr.to_document().unwrap(),
            doc! { "categorySlug": { "$eq": "pain-relief" } }
        );
    }

    #[test]
    fn test_nested_groups_deserialize_and_translate() {
        let expr = parse(json!({
            "or": [
                { "field": "price", "op": "lte", "value": 50 },
                { "nor": [{ "field": "tags", "op": "in", "value": ["expired"] }] }
            ]
        }));

        assert_eq!(
            expr.to_document().unwrap(),
            doc! {
                "$or": [
                    { "price": { "$lte": 50_i64 } },
                    { "$nor": [{ "tags": { "$in": ["expired"] } }] }
                ]
            }
        );
    }

    #[test]
    fn test_reference_values_become_uuid_strings() {
        let id = Uuid::now_v7();
        let expr = FilterExpr::clause("brand", FilterOp::In, json!([id.to_string()]));
        assert_eq!(
            expr.to_document().unwrap(),
            doc! { "brand": { "$in": [id.to_string()] } }
        );
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = FilterExpr::eq("$where", "1 == 1").to_document().unwrap_err();
        assert_eq!(err, FilterError::UnknownField("$where".into()));

        let err = FilterExpr::eq("attributes.$gt", 1).to_document().unwrap_err();
        assert!(matches!(err, FilterError::UnknownField(_)));
    }

    #[test]
    fn test_in_requires_array() {
        let err = FilterExpr::clause("tags", FilterOp::In, "offer")
            .to_document()
            .unwrap_err();
        assert!(matches!(err, FilterError::ExpectedArray { .. }));
    }

    #[test]
    fn test_invalid_regex_rejected() {
        let err = FilterExpr::clause("name", FilterOp::Regex, "para(")
            .to_document()
            .unwrap_err();
        assert!(matches!(err, FilterError::InvalidRegex { .. }));
    }

    #[test]
    fn test_regex_is_case_insensitive() {
        let doc = FilterExpr::clause("name", FilterOp::Regex, "^para")
            .to_document()
            .unwrap();
        assert_eq!(doc, doc! { "name": { "$regex": "^para", "$options": "i" } });
    }

    #[test]
    fn test_non_uuid_reference_rejected() {
        let err = FilterExpr::eq("subCategory", "painkillers")
            .to_document()
            .unwrap_err();
        assert!(matches!(err, FilterError::InvalidReference { .. }));
    }

    #[test]
    fn test_range_on_reference_rejected() {
        let id = Uuid::now_v7().to_string();
        let err = FilterExpr::clause("generic", FilterOp::Gt, id)
            .to_document()
            .unwrap_err();
        assert!(matches!(err, FilterError::UnsupportedOperator { .. }));
    }

    #[test]
    fn test_timestamp_values_are_normalized_to_stored_form() {
        let expr = FilterExpr::clause("createdAt", FilterOp::Gt, "2026-10-18T11:30:00.5+02:00");
        assert_eq!(
            expr.to_document().unwrap(),
            doc! { "createdAt": { "$gt": "2026-10-18T09:30:00.500Z" } }
        );

        let err = FilterExpr::clause("updatedAt", FilterOp::Lt, "last week")
            .to_document()
            .unwrap_err();
        assert!(matches!(err, FilterError::TypeMismatch { .. }));
    }

    #[test]
    fn test_number_field_rejects_strings() {
        let err = FilterExpr::clause("price", FilterOp::Gte, "10")
            .to_document()
            .unwrap_err();
        assert!(matches!(err, FilterError::TypeMismatch { .. }));
    }

    #[test]
    fn test_exists_defaults_to_true() {
        let doc = FilterExpr::clause("attributes.strength", FilterOp::Exists, Value::Null)
            .to_document()
            .unwrap();
        assert_eq!(doc, doc! { "attributes.strength": { "$exists": true } });
    }

    #[test]
    fn test_empty_group_rejected() {
        let err = parse(json!({ "and": [] })).to_document().unwrap_err();
        assert_eq!(err, FilterError::EmptyGroup("and"));
    }

    #[test]
    fn test_conjoin() {
        assert!(conjoin(vec![]).is_empty());
        assert_eq!(conjoin(vec![doc! { "a": 1 }]), doc! { "a": 1 });
        assert_eq!(
            conjoin(vec![doc! { "a": 1 }, doc! { "b": 2 }]),
            doc! { "$and": [{ "a": 1 }, { "b": 2 }] }
        );
    }
}
