use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{OriginalUri, Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use netadmin_vlan::{ensure_valid, NewVlan, Vlan, VlanId, VlanStore};

use crate::error::ApiError;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn VlanStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn VlanStore>) -> Self {
        Self { store }
    }

    /// Run `op` against the store on the blocking pool.
    ///
    /// Store calls wait on a lock and sync the file to disk, so they stay off
    /// the async workers and a request timeout can still fire around them.
    pub async fn with_store<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        F: FnOnce(&dyn VlanStore) -> T + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || op(store.as_ref()))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "store task failed");
                ApiError::Internal("store task failed".into())
            })
    }
}

/// Health check response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}

/// Health check handler.
pub async fn health_handler() -> impl IntoResponse {
    (
        [(header::CACHE_CONTROL, "no-cache")],
        Json(HealthResponse::default()),
    )
}

/// `GET /api/v1/vlans`
pub async fn list_vlans(State(state): State<AppState>) -> Result<Json<Vec<Vlan>>, ApiError> {
    state.with_store(|store| store.list()).await.map(Json)
}

/// `POST /api/v1/vlans`
///
/// Assigns a fresh id and answers `201 Created` with a `Location` header.
pub async fn create_vlan(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    payload: Result<Json<NewVlan>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(new) = payload?;
    let vlan = new.into_vlan(VlanId::new());
    ensure_valid(&vlan)?;

    let id = vlan.id;
    state
        .with_store(move |store| store.save(vlan))
        .await?
        .map_err(|e| ApiError::from_store(e, "failed to save vlan"))?;

    let location = format!("{}/{id}", uri.path().trim_end_matches('/'));
    Ok((StatusCode::CREATED, [(header::LOCATION, location)]))
}

/// `GET /api/v1/vlans/:id`
pub async fn read_vlan(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vlan>, ApiError> {
    let id = parse_id(&id)?;
    state
        .with_store(move |store| store.get(&id))
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("vlan {id} not found")))
}

/// `PUT /api/v1/vlans/:id`
///
/// The body must carry the same id as the path.
pub async fn update_vlan(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Vlan>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    let Json(vlan) = payload?;
    if vlan.id != id {
        return Err(ApiError::InvalidInput(
            "mismatching vlan id in request body".into(),
        ));
    }
    ensure_valid(&vlan)?;

    state
        .with_store(move |store| store.update(vlan))
        .await?
        .map_err(|e| ApiError::from_store(e, "failed to update vlan"))?;
    Ok(StatusCode::OK)
}

/// `DELETE /api/v1/vlans/:id`
pub async fn delete_vlan(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state
        .with_store(move |store| store.delete(&id))
        .await?
        .map_err(|e| ApiError::from_store(e, "failed to delete vlan"))?;
    Ok(StatusCode::OK)
}

fn parse_id(raw: &str) -> Result<VlanId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::InvalidInput("invalid vlan id".into()))
}
