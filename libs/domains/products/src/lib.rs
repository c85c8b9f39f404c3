//! Products Domain
//!
//! Catalog products stored in MongoDB: CRUD, bulk import and update, the
//! filter/sort/paginate query pipeline, price ranges and random related or
//! recommended samples.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, slug rules, SKU assignment, population
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + MongoDB implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs, query language
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_products::{handlers, MongoProductRepository, ProductService};
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("catalog");
//!
//! let repository = MongoProductRepository::new(&db);
//! repository.init_indexes().await?;
//!
//! let router = handlers::router(ProductService::new(repository));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod filter;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod populate;
pub mod query;
pub mod repository;
pub mod sampler;
pub mod service;
pub mod sku;

pub use error::{ProductError, ProductResult};
pub use filter::{FilterClause, FilterError, FilterExpr, FilterOp};
pub use handlers::ApiDoc;
pub use models::{
    BatchUpdateReport, BulkUpdateItem, CreateProduct, PriceRange, PriceTier, Product,
    UpdateProduct,
};
pub use mongodb::MongoProductRepository;
pub use populate::ProductView;
pub use query::{ProductQuery, SearchRequest, SortDirection, SortKey};
pub use repository::ProductRepository;
pub use service::ProductService;
