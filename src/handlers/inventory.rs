use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::db::queries;
use crate::errors::AppResult;
use crate::models::InventoryItem;
use crate::state::AppState;

// GET /inventory
pub async fn list_inventory(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<InventoryItem>>> {
    let items = {
        let db = state.conn();
        queries::list_active_inventory(&db)?
    };
    Ok(Json(items))
}
