//! # Axum Helpers
//!
//! Shared HTTP plumbing for the catalog services.
//!
//! ## Modules
//!
//! - **[`server`]**: Router assembly with OpenAPI UIs, health endpoints, graceful shutdown
//! - **[`http`]**: CORS and security-header middleware
//! - **[`errors`]**: `AppError` and the JSON error body
//! - **[`extractors`]**: UUID path and validated JSON extractors
//! - **[`response`]**: The `{ data, count, message }` success envelope
//! - **[`pagination`]**: Page-size / current-page pagination input
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//! use core_config::{app_info, server::ServerConfig};
//!
//! let api_routes = Router::new(); // domain routers, state already applied
//! let app = create_router::<ApiDoc>(api_routes)
//!     .await?
//!     .merge(health_router(app_info!()));
//! create_production_app(app, &ServerConfig::default(), Duration::from_secs(30), async {}).await?;
//! ```

pub mod errors;
pub mod extractors;
pub mod http;
pub mod pagination;
pub mod response;
pub mod server;

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks, shutdown_signal,
};

pub use http::{cors_layer_from_env, create_cors_layer, security_headers};

pub use errors::{AppError, DATABASE_FAILURE_MESSAGE, ErrorCode, ErrorResponse};

pub use extractors::{Batch, UuidPath, UuidPathPair, ValidatedJson};

pub use pagination::{MAX_PAGE, MAX_PAGE_SIZE, Pagination};
pub use response::{ApiResponse, MessageResponse};
