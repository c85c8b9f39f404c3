//! Catalog Domain
//!
//! Brands, categories and unit types. Each is a named record with a unique
//! slug in its own collection; one generic repository, service and router
//! serve all three through the [`CatalogEntity`] trait.
//!
//! ```rust,no_run
//! use domain_catalog::{handlers, Brand, CatalogService, MongoCatalogRepository};
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("catalog");
//!
//! let brands = MongoCatalogRepository::<Brand>::new(&db);
//! brands.init_indexes().await?;
//! let router = handlers::router(CatalogService::new(brands));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{CatalogError, CatalogResult};
pub use handlers::ApiDoc;
pub use models::{Brand, CatalogEntity, CatalogSearch, Category, UnitType};
pub use mongodb::MongoCatalogRepository;
pub use repository::CatalogRepository;
pub use service::CatalogService;
