use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::instrument;

use crate::{auth::extractors::AuthUser, error::ApiError, state::AppState};

use super::dto::{PackageList, PackageView};

pub fn routes() -> Router<AppState> {
    Router::new().route("/package/getAllPackages", post(get_all_packages))
}

/// Authenticated catalog listing. Replies 201 for historical client
/// compatibility.
#[instrument(skip(state))]
pub async fn get_all_packages(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
) -> Result<(StatusCode, Json<PackageList>), ApiError> {
    let packages = state.catalog.list_packages().await?;
    let data = packages
        .into_iter()
        .enumerate()
        .map(|(idx, p)| PackageView::from_package(idx + 1, p))
        .collect();
    Ok((StatusCode::CREATED, Json(PackageList { data })))
}
