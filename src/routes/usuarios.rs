//! Usuario routes: create, fetch and list employees

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use crate::database::models::{NewUsuario, Usuario};
use crate::error::ApiError;
use crate::server::AppState;

pub async fn create_usuario(
    State(app_state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<NewUsuario>, ApiError>,
) -> Result<(StatusCode, Json<Usuario>), ApiError> {
    let new = payload
        .normalized()
        .map_err(|field| ApiError::bad_request(format!("{} must not be empty", field)))?;

    let usuario = app_state.usuarios.create(new).await?;
    tracing::info!("Created usuario {}", usuario.id);
    Ok((StatusCode::CREATED, Json(usuario)))
}

pub async fn get_usuario(
    State(app_state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> Result<Json<Usuario>, ApiError> {
    app_state
        .usuarios
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("usuario {} not found", id)))
}

pub async fn list_usuarios(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Usuario>>, ApiError> {
    Ok(Json(app_state.usuarios.list().await?))
}

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/usuarios", get(list_usuarios).post(create_usuario))
        .route("/usuarios/{id}", get(get_usuario))
}
