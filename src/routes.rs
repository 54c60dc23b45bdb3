use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::error::LinkError;
use crate::model::{CreatedLink, Link, LinkSpecification};
use crate::service::LinkService;
use crate::validation::validate_url;

const CACHE_CONTROL_HEADER_VALUE: &str = "no-store";

impl IntoResponse for LinkError {
    fn into_response(self) -> Response {
        let status = match &self {
            LinkError::InvalidUrl | LinkError::InvalidCode => StatusCode::BAD_REQUEST,
            LinkError::CodeTaken => StatusCode::CONFLICT,
            LinkError::NotFound => StatusCode::NOT_FOUND,
            LinkError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            LinkError::CodeSpaceExhausted { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!("{}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub fn create_router(service: LinkService) -> Router {
    Router::new()
        .route("/api/links", get(list_links).post(create_link))
        .route("/api/links/:code", get(link_statistics).delete(delete_link))
        .route("/api/health", get(health))
        .route("/:code", get(redirect))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

pub async fn create_link(
    State(service): State<LinkService>,
    payload: Result<Json<LinkSpecification>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedLink>), LinkError> {
    let Json(link_specification) = payload.map_err(|rejection| {
        tracing::debug!("Rejected link body: {}", rejection);
        LinkError::InvalidUrl
    })?;
    let url = link_specification.url()?;
    validate_url(url)?;
    let link = service.create(url, link_specification.code()?).await?;
    Ok((StatusCode::CREATED, Json(link)))
}

pub async fn list_links(State(service): State<LinkService>) -> Result<Json<Vec<Link>>, LinkError> {
    Ok(Json(service.list().await?))
}

pub async fn link_statistics(
    State(service): State<LinkService>,
    Path(code): Path<String>,
) -> Result<Json<Link>, LinkError> {
    Ok(Json(service.stats(&code).await?))
}

pub async fn delete_link(
    State(service): State<LinkService>,
    Path(code): Path<String>,
) -> Result<StatusCode, LinkError> {
    service.remove(&code).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn redirect(
    State(service): State<LinkService>,
    Path(code): Path<String>,
) -> Result<Response, LinkError> {
    let url = service.resolve(&code).await?;
    let headers = [
        (header::LOCATION, url),
        (header::CACHE_CONTROL, CACHE_CONTROL_HEADER_VALUE.to_string()),
    ];
    Ok((StatusCode::FOUND, headers).into_response())
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
