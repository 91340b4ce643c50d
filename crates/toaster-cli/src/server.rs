//! JSON endpoints serving the tables over HTTP.
//!
//! Each request opens its own read-only connection inside
//! `spawn_blocking`; the store is never written while serving.

use axum::Json;
use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use chrono::{NaiveDate, Utc};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use toaster_index::{BuildSummary, Database};
use toaster_tables::{
    FilterInfo, TableContext, TableInfo, TableRequest, TableResponse, lookup, recent_builds,
};
use toaster_types::{LayerVersionId, ProjectId, RecipeId};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

type Pairs = Vec<(String, String)>;

#[derive(Clone)]
pub struct AppState {
    db_path: Arc<PathBuf>,
    page_size: usize,
}

impl AppState {
    pub fn new(db_path: PathBuf, page_size: usize) -> Self {
        Self {
            db_path: Arc::new(db_path),
            page_size,
        }
    }
}

/// Error body `{"error": "..."}` with a status derived from the failure.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: String) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message,
        }
    }

    fn internal(message: String) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message,
        }
    }
}

impl From<toaster_tables::Error> for ApiError {
    fn from(err: toaster_tables::Error) -> Self {
        let status = if err.is_not_found() {
            StatusCode::NOT_FOUND
        } else if err.is_bad_request() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<toaster_index::Error> for ApiError {
    fn from(err: toaster_index::Error) -> Self {
        toaster_tables::Error::from(err).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(error = %self.message, "request failed");
        }
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/toastergui/tables", get(handle_tables))
        .route("/toastergui/table/{name}", get(handle_table))
        .route("/toastergui/table/{name}/filterinfo", get(handle_filter_info))
        .route("/toastergui/mrb", get(handle_recent_builds))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `listen` and serve until Ctrl-C.
pub async fn serve(state: AppState, listen: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(listen).await?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}

async fn handle_health() -> &'static str {
    "ok"
}

async fn handle_tables(Query(pairs): Query<Pairs>) -> ApiResult<Vec<TableInfo>> {
    let ctx = context_from_pairs(&pairs)?;
    Ok(Json(toaster_tables::tables::list(&ctx)))
}

async fn handle_table(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(pairs): Query<Pairs>,
) -> ApiResult<TableResponse> {
    let table = lookup(&name)?;
    let ctx = context_from_pairs(&pairs)?;
    let request = TableRequest::from_query_pairs(&pairs, state.page_size)?;

    let response = with_database(&state, move |db| {
        Ok(table.get_data(db, &ctx, &request)?)
    })
    .await?;
    Ok(Json(response))
}

async fn handle_filter_info(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(pairs): Query<Pairs>,
) -> ApiResult<FilterInfo> {
    let table = lookup(&name)?;
    let ctx = context_from_pairs(&pairs)?;
    let filter = param(&pairs, "name")
        .ok_or_else(|| ApiError::bad_request("Missing parameter: name".to_string()))?
        .to_string();
    let search = param(&pairs, "search").map(str::to_string);

    let info = with_database(&state, move |db| {
        Ok(table.filter_info(db, &ctx, &filter, search.as_deref())?)
    })
    .await?;
    Ok(Json(info))
}

async fn handle_recent_builds(
    State(state): State<AppState>,
    Query(pairs): Query<Pairs>,
) -> ApiResult<Vec<BuildSummary>> {
    let ctx = context_from_pairs(&pairs)?;
    let builds = with_database(&state, move |db| Ok(recent_builds(db, &ctx)?)).await?;
    Ok(Json(builds))
}

/// Run `f` against a fresh connection on the blocking pool.
async fn with_database<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&Database) -> Result<T, ApiError> + Send + 'static,
{
    let db_path = Arc::clone(&state.db_path);
    tokio::task::spawn_blocking(move || {
        let db = Database::open_read_only(db_path.as_path())?;
        f(&db)
    })
    .await
    .map_err(|e| ApiError::internal(format!("worker failed: {}", e)))?
}

fn param<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .rev()
        .find(|(k, v)| k == key && !v.trim().is_empty())
        .map(|(_, v)| v.trim())
}

fn id_param(pairs: &[(String, String)], key: &str) -> Result<Option<i64>, ApiError> {
    param(pairs, key)
        .map(|v| {
            v.parse::<i64>()
                .map_err(|_| ApiError::bad_request(format!("Invalid {}: '{}'", key, v)))
        })
        .transpose()
}

/// Scope identifiers and the optional `today` override from the query.
fn context_from_pairs(pairs: &[(String, String)]) -> Result<TableContext, ApiError> {
    let today = match param(pairs, "today") {
        Some(date) => NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| ApiError::bad_request(format!("Invalid today: '{}'", date)))?,
        None => Utc::now().date_naive(),
    };

    let mut ctx = TableContext::new(today);
    if let Some(pid) = id_param(pairs, "pid")? {
        ctx = ctx.with_project(ProjectId::new(pid));
    }
    if let Some(layerid) = id_param(pairs, "layerid")? {
        ctx = ctx.with_layer(LayerVersionId::new(layerid));
    }
    if let Some(recipeid) = id_param(pairs, "recipeid")? {
        ctx = ctx.with_recipe(RecipeId::new(recipeid));
    }
    Ok(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Pairs {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_context_from_pairs() {
        let ctx =
            context_from_pairs(&pairs(&[("pid", "3"), ("layerid", "7"), ("today", "2024-01-02")]))
                .unwrap();
        assert_eq!(ctx.pid, Some(ProjectId::new(3)));
        assert_eq!(ctx.layerid, Some(LayerVersionId::new(7)));
        assert_eq!(ctx.recipeid, None);
        assert_eq!(ctx.today, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn test_non_numeric_id_rejected() {
        let err = context_from_pairs(&pairs(&[("pid", "abc")])).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message.contains("pid"));
    }

    #[test]
    fn test_blank_param_ignored() {
        let ctx = context_from_pairs(&pairs(&[("pid", " ")])).unwrap();
        assert_eq!(ctx.pid, None);
    }

    #[test]
    fn test_error_status_mapping() {
        let err: ApiError = toaster_tables::Error::UnknownTable("x".to_string()).into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        let err: ApiError = toaster_tables::Error::MissingParameter("pid").into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
