//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for Subscriptions API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Subscriptions API",
        version = "0.1.0",
        description = "CRUD service for tracking user subscriptions and their spend",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/subscriptions", api = domain_subscriptions::ApiDoc)
    ),
    tags(
        (name = "subscriptions", description = "Subscription management endpoints")
    )
)]
pub struct ApiDoc;
