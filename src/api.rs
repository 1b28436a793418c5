use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::service::QuoteService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<QuoteService>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/v1/quote", get(list_quotes))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Deserialize)]
struct QuoteQuery {
    category: Option<String>,
}

#[derive(serde::Serialize)]
struct QuoteOut {
    quote: String,
    author: String,
}

/// Always 200 with a JSON array; upstream failure degrades to fewer (or
/// zero) elements. The browser card renderer reads `.quote` and `.author`
/// from each element, so both fields are always present.
async fn list_quotes(
    State(state): State<AppState>,
    Query(q): Query<QuoteQuery>,
) -> Json<Vec<QuoteOut>> {
    let quotes = state.service.get_quotes(q.category.as_deref()).await;
    let out = quotes
        .into_iter()
        .map(|q| QuoteOut {
            quote: q.text,
            author: q.author,
        })
        .collect::<Vec<_>>();
    Json(out)
}
