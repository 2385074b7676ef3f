use axum::{
    extract::{rejection::JsonRejection, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::aggregator::Aggregator;
use crate::error::{Error, Result};
use crate::provider::DataProvider;
use crate::types::{AssetRecord, BalanceRequest};

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

/// `POST /balances`, open to every origin.
pub fn router<P>(aggregator: Arc<Aggregator<P>>) -> Router
where
    P: DataProvider + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .route("/balances", post(balances::<P>))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(aggregator)
}

/// Start the HTTP server. This blocks for the lifetime of the server.
pub async fn serve<P>(aggregator: Arc<Aggregator<P>>, port: u16) -> Result<()>
where
    P: DataProvider + 'static,
{
    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, router(aggregator)).await?;

    Ok(())
}

async fn balances<P>(
    State(aggregator): State<Arc<Aggregator<P>>>,
    payload: std::result::Result<Json<BalanceRequest>, JsonRejection>,
) -> Result<Json<Vec<AssetRecord>>>
where
    P: DataProvider + 'static,
{
    let Json(request) = payload.map_err(|e| Error::InvalidRequest(e.body_text()))?;

    match aggregator.report(&request).await {
        Ok(records) => Ok(Json(records)),
        Err(e) => {
            warn!("Balance request for {} on {} failed: {}", request.address, request.chain, e);
            Err(e)
        }
    }
}
