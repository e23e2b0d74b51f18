//! Services module - business logic between the routes and storage.

pub mod auth_service;
pub mod diagram_service;
pub mod error;
pub mod jwt_service;
pub mod password;

// Re-export for convenience
pub use auth_service::{AuthError, AuthService};
pub use diagram_service::DiagramService;
pub use error::DiagramServiceError;
pub use jwt_service::{Claims, JwtService, SharedJwtService};
