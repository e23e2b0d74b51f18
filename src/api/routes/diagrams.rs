//! Diagram routes: list, fetch, create, partially update and delete diagrams.

use axum::{
    Router,
    body::Bytes,
    extract::{Path, State},
    response::Json,
    routing::get,
};
use serde::Deserialize;
use std::sync::Arc;

use super::app_state::AppState;
use super::error::{ApiError, ErrorBody};
use crate::models::{
    CreateDiagramRequest, DeleteDiagramResponse, Diagram, UpdateDiagramRequest,
};
use crate::services::DiagramService;
use crate::tree::MAX_BONE_DEPTH;

/// JSON nesting allowed in a PATCH body: the body object and the `bones`
/// array, then one object and one `children` array per bone level.
const MAX_UPDATE_NESTING: usize = 2 * MAX_BONE_DEPTH + 2;

/// Create the diagrams router
pub fn diagrams_router() -> Router<AppState> {
    Router::new()
        .route("/diagrams", get(list_diagrams).post(create_diagram))
        .route(
            "/diagrams/{diagram_id}",
            get(get_diagram).patch(update_diagram).delete(delete_diagram),
        )
}

/// GET /diagrams - List all diagrams with their bone trees
#[utoipa::path(
    get,
    path = "/diagrams",
    tag = "Diagrams",
    responses(
        (status = 200, description = "All diagrams", body = [Diagram]),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn list_diagrams(
    State(service): State<Arc<DiagramService>>,
) -> Result<Json<Vec<Diagram>>, ApiError> {
    Ok(Json(service.list_diagrams().await?))
}

/// GET /diagrams/{diagram_id} - Fetch one diagram with its bone tree
#[utoipa::path(
    get,
    path = "/diagrams/{diagram_id}",
    tag = "Diagrams",
    params(("diagram_id" = String, Path, description = "Diagram identifier")),
    responses(
        (status = 200, description = "The diagram", body = Diagram),
        (status = 404, description = "Diagram not found", body = ErrorBody)
    )
)]
pub async fn get_diagram(
    State(service): State<Arc<DiagramService>>,
    Path(diagram_id): Path<String>,
) -> Result<Json<Diagram>, ApiError> {
    Ok(Json(service.get_diagram(&diagram_id).await?))
}

/// POST /diagrams - Create an empty diagram
#[utoipa::path(
    post,
    path = "/diagrams",
    tag = "Diagrams",
    request_body = CreateDiagramRequest,
    responses(
        (status = 200, description = "Diagram created", body = Diagram),
        (status = 400, description = "Title is empty", body = ErrorBody),
        (status = 422, description = "Malformed request body")
    )
)]
pub async fn create_diagram(
    State(service): State<Arc<DiagramService>>,
    Json(request): Json<CreateDiagramRequest>,
) -> Result<Json<Diagram>, ApiError> {
    Ok(Json(service.create_diagram(request).await?))
}

/// PATCH /diagrams/{diagram_id} - Merge fields; `bones` replaces the whole tree
#[utoipa::path(
    patch,
    path = "/diagrams/{diagram_id}",
    tag = "Diagrams",
    params(("diagram_id" = String, Path, description = "Diagram identifier")),
    request_body = UpdateDiagramRequest,
    responses(
        (status = 200, description = "Updated diagram", body = Diagram),
        (status = 400, description = "Malformed body, invalid field value or bones nested too deep", body = ErrorBody),
        (status = 404, description = "Diagram not found", body = ErrorBody)
    )
)]
pub async fn update_diagram(
    State(service): State<Arc<DiagramService>>,
    Path(diagram_id): Path<String>,
    body: Bytes,
) -> Result<Json<Diagram>, ApiError> {
    let request = parse_update_request(&body)?;
    Ok(Json(service.update_diagram(&diagram_id, request).await?))
}

/// Parse a PATCH body. serde_json's default recursion limit would cut bone
/// trees off at 63 levels, so the limit is lifted once the body's nesting
/// has been checked against [`MAX_UPDATE_NESTING`].
fn parse_update_request(body: &[u8]) -> Result<UpdateDiagramRequest, ApiError> {
    if json_nesting_depth(body) > MAX_UPDATE_NESTING {
        return Err(ApiError::bad_request(format!(
            "bones nest more than {} levels deep",
            MAX_BONE_DEPTH
        )));
    }

    let mut deserializer = serde_json::Deserializer::from_slice(body);
    deserializer.disable_recursion_limit();
    let request = UpdateDiagramRequest::deserialize(&mut deserializer)
        .and_then(|request| deserializer.end().map(|()| request))
        .map_err(|e| {
            ApiError::bad_request(format!("Failed to parse the request body as JSON: {}", e))
        })?;
    Ok(request)
}

/// Deepest bracket nesting in a JSON document, ignoring brackets in strings.
fn json_nesting_depth(body: &[u8]) -> usize {
    let mut depth: usize = 0;
    let mut deepest = 0;
    let mut in_string = false;
    let mut escaped = false;

    for &byte in body {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}

/// DELETE /diagrams/{diagram_id} - Delete a diagram and all its bones
#[utoipa::path(
    delete,
    path = "/diagrams/{diagram_id}",
    tag = "Diagrams",
    params(("diagram_id" = String, Path, description = "Diagram identifier")),
    responses(
        (status = 200, description = "Diagram deleted", body = DeleteDiagramResponse),
        (status = 404, description = "Diagram not found", body = ErrorBody)
    )
)]
pub async fn delete_diagram(
    State(service): State<Arc<DiagramService>>,
    Path(diagram_id): Path<String>,
) -> Result<Json<DeleteDiagramResponse>, ApiError> {
    service.delete_diagram(&diagram_id).await?;
    Ok(Json(DeleteDiagramResponse {
        message: "Diagram deleted".to_string(),
    }))
}
