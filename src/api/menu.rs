use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;
use tracing::warn;

use super::AppState;
use crate::model::MenuItem;

#[derive(Serialize)]
struct MenuResponse {
    menu: Vec<MenuItem>,
    status: &'static str,
}

/// Full menu of available items. Degrades to an empty menu on storage
/// failure instead of a 5xx.
async fn get_menu(State(state): State<AppState>) -> Json<MenuResponse> {
    match state.store.menu().await {
        Ok(menu) => Json(MenuResponse {
            menu,
            status: "success",
        }),
        Err(err) => {
            warn!(error = %err, "menu read failed");
            Json(MenuResponse {
                menu: Vec::new(),
                status: "error",
            })
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/menu", get(get_menu))
}
