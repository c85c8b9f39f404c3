//! Product query compilation: filter expressions, free-text search, sort and
//! pagination folded into one MongoDB filter plus find options.

use axum_helpers::Pagination;
use database::mongodb::token_search;
use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use validator::Validate;

use crate::filter::{conjoin, FieldKind, FilterError, FilterExpr};

/// Fields free-text search looks at
pub const SEARCH_FIELDS: [&str; 2] = ["name", "sku"];

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    fn as_mongo(self) -> i32 {
        match self {
            SortDirection::Asc => 1,
            SortDirection::Desc => -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SortKey {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

/// Body of the list, filter and price-range endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    /// Clauses combined with AND
    #[serde(default)]
    pub query: Vec<FilterExpr>,
    /// Whitespace/comma separated tokens matched against name and SKU
    #[serde(default)]
    pub search: Option<String>,
    /// Extra expression ANDed with everything else
    #[serde(default)]
    pub filter: Option<FilterExpr>,
    #[serde(default)]
    #[validate(nested)]
    pub paginate: Option<Pagination>,
    /// Applied in order, before pagination
    #[serde(default)]
    pub sort: Vec<SortKey>,
}

/// Body of `POST /product/search`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct SearchRequest {
    #[validate(length(min = 1, max = 200))]
    pub q: String,
    #[serde(default)]
    pub filter: Option<FilterExpr>,
    #[serde(default)]
    #[validate(nested)]
    pub paginate: Option<Pagination>,
}

impl From<SearchRequest> for ProductQuery {
    fn from(request: SearchRequest) -> Self {
        ProductQuery {
            search: Some(request.q),
            filter: request.filter,
            paginate: request.paginate,
            ..Default::default()
        }
    }
}

/// A validated query, ready for the repository
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledQuery {
    pub filter: Document,
    pub sort: Option<Document>,
    pub skip: Option<u64>,
    pub limit: Option<i64>,
}

impl CompiledQuery {
    /// Match by filter only, unsorted and unbounded
    pub fn matching(filter: Document) -> Self {
        Self {
            filter,
            ..Default::default()
        }
    }
}

impl ProductQuery {
    /// Only the text search, everything else left empty
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            search: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn filter_document(&self) -> Result<Document, FilterError> {
        let mut parts = self
            .query
            .iter()
            .map(FilterExpr::to_document)
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(filter) = &self.filter {
            parts.push(filter.to_document()?);
        }
        if let Some(search) = self.search.as_deref().and_then(|text| token_search(text, &SEARCH_FIELDS)) {
            parts.push(search);
        }

        Ok(conjoin(parts))
    }

    pub fn sort_document(&self) -> Result<Option<Document>, FilterError> {
        if self.sort.is_empty() {
            return Ok(None);
        }

        let mut sort = Document::new();
        for key in &self.sort {
            match FieldKind::of(&key.field) {
                Some(FieldKind::Reference) | Some(FieldKind::Any) | None => {
                    return Err(FilterError::UnsortableField(key.field.clone()));
                }
                Some(_) => {
                    sort.insert(key.field.as_str(), key.direction.as_mongo());
                }
            }
        }
        Ok(Some(sort))
    }

    pub fn compile(&self) -> Result<CompiledQuery, FilterError> {
        Ok(CompiledQuery {
            filter: self.filter_document()?,
            sort: self.sort_document()?,
            skip: self.paginate.map(|page| page.skip()),
            limit: self.paginate.map(|page| page.limit()),
        })
    }
}
