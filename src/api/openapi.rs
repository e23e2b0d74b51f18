//! OpenAPI specification definition.
//!
//! Aggregates all route handlers and schemas for OpenAPI documentation generation.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        crate::routes::health::health_check,
        // Diagrams
        crate::routes::diagrams::list_diagrams,
        crate::routes::diagrams::get_diagram,
        crate::routes::diagrams::create_diagram,
        crate::routes::diagrams::update_diagram,
        crate::routes::diagrams::delete_diagram,
        // Authentication
        crate::routes::auth::signup,
        crate::routes::auth::login,
        crate::routes::auth::me,
        // OpenAPI
        crate::routes::openapi::serve_openapi_json,
    ),
    components(schemas(
        crate::models::Diagram,
        crate::models::Bone,
        crate::models::BoneInput,
        crate::models::DiagramStatus,
        crate::models::CreateDiagramRequest,
        crate::models::UpdateDiagramRequest,
        crate::models::DeleteDiagramResponse,
        crate::models::SignupRequest,
        crate::models::SignupResponse,
        crate::models::LoginForm,
        crate::models::TokenResponse,
        crate::models::User,
        crate::routes::error::ErrorBody,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Diagrams", description = "Ishikawa diagrams and their bone trees"),
        (name = "Auth", description = "Placeholder account endpoints"),
        (name = "Health", description = "Liveness check"),
        (name = "OpenAPI", description = "OpenAPI specification"),
    ),
    info(
        title = "Fishbone API",
        description = "REST API for Ishikawa diagrams with nested cause trees",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        // Update version to match Cargo.toml version
        openapi.info.version = env!("CARGO_PKG_VERSION").to_string();

        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::new);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
