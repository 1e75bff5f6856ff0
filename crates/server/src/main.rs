use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use shared::{
    domain::{Account, AccountDraft, AccountId},
    error::{ApiError, ErrorCode},
};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod api;
mod app_state;
mod config;

use api::{
    account_route, accounts_route, create_account, delete_account, get_account, list_accounts,
    update_account, ApiContext,
};
use app_state::AppState;
use config::load_settings;

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let settings = load_settings();
    let state = AppState {
        api: ApiContext::new(),
    };
    let app = build_router(Arc::new(state), settings.max_body_bytes);

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "accounts server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(
            accounts_route(),
            get(http_list_accounts).post(http_create_account),
        )
        .route(
            account_route(),
            get(http_get_account)
                .put(http_update_account)
                .delete(http_delete_account),
        )
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_list_accounts(State(state): State<Arc<AppState>>) -> Json<Vec<Account>> {
    Json(list_accounts(&state.api).await)
}

async fn http_get_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Account>> {
    get_account(&state.api, AccountId(id))
        .await
        .map(Json)
        .map_err(error_response)
}

async fn http_create_account(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<AccountDraft>,
) -> ApiResult<(StatusCode, Json<Account>)> {
    let account = create_account(&state.api, draft)
        .await
        .map_err(error_response)?;
    info!(account_id = account.id.0, "account created");
    Ok((StatusCode::CREATED, Json(account)))
}

async fn http_update_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(draft): Json<AccountDraft>,
) -> ApiResult<Json<Account>> {
    let account = update_account(&state.api, AccountId(id), draft)
        .await
        .map_err(error_response)?;
    info!(account_id = id, "account updated");
    Ok(Json(account))
}

async fn http_delete_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    delete_account(&state.api, AccountId(id))
        .await
        .map_err(error_response)?;
    info!(account_id = id, "account deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn error_response(err: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match err.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
    };
    debug!(status = status.as_u16(), message = %err.message, "request rejected");
    (status, Json(err))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
