//! Combined OpenAPI document served at `/api-docs/openapi.json`

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "Products, brands, categories and unit types backed by MongoDB",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/product", api = domain_products::ApiDoc),
        (path = "/api/catalog", api = domain_catalog::ApiDoc)
    ),
    tags(
        (name = "Products", description = "Product catalog, search and filtering"),
        (name = "Catalog", description = "Brands (/api/brand), categories (/api/category) and unit types (/api/unit-type)")
    )
)]
pub struct ApiDoc;
