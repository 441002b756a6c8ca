use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::{get, post},
    Router,
    Json,
    http::Method,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use crate::{
    AppState,
    error::AppError,
    services::{
        file_processor,
        session::Session,
        tabular::{Cell, ChartKind, ChartSuggestion, ColumnProfile, ColumnType},
    },
};
use tower_http::cors::{CorsLayer, Any};

pub fn routes(max_file_size: usize) -> Router<Arc<AppState>> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/charts/upload", post(upload_chart))
        .route("/charts/kind", post(set_chart_kind))
        .route("/charts/filter", post(set_filter))
        .route("/charts/view", get(current_view))
        .layer(DefaultBodyLimit::max(max_file_size))
        .layer(cors)
}

#[derive(Debug, Deserialize)]
pub struct SetChartKindRequest {
    kind: ChartKind,
}

#[derive(Debug, Deserialize)]
pub struct SetFilterRequest {
    #[serde(default)]
    value: Option<Cell>,
}

#[derive(Debug, Serialize, Clone)]
pub struct ColumnAnalysis {
    name: String,
    #[serde(rename = "type")]
    data_type: ColumnType,
    sample_values: Vec<String>,
    null_count: usize,
    unique_count: usize,
}

impl From<&ColumnProfile> for ColumnAnalysis {
    fn from(profile: &ColumnProfile) -> Self {
        ColumnAnalysis {
            name: profile.name.clone(),
            data_type: profile.column_type,
            sample_values: profile.sample_values.to_vec(),
            null_count: profile.null_count,
            unique_count: profile.unique_count,
        }
    }
}

/// Everything a client needs to render the current chart.
#[derive(Debug, Serialize)]
pub struct VisualizationView {
    columns: Vec<String>,
    chart_kind: Option<ChartKind>,
    suggestion: Option<ChartSuggestion>,
    filter: Option<Cell>,
    visible_rows: Vec<Vec<Cell>>,
    distinct_filter_values: Vec<Cell>,
}

fn view_of(session: &Session) -> VisualizationView {
    VisualizationView {
        columns: session.table().columns.clone(),
        chart_kind: session.chart_kind(),
        suggestion: session.suggestion().cloned(),
        filter: session.filter().cloned(),
        visible_rows: session.visible_rows().into_iter().cloned().collect(),
        distinct_filter_values: session.distinct_filter_values(),
    }
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    file_name: String,
    row_count: usize,
    column_count: usize,
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
    column_analysis: Vec<ColumnAnalysis>,
    suggestion: Option<ChartSuggestion>,
}

#[axum::debug_handler]
async fn upload_chart(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let start = std::time::Instant::now();

    // 1. Claim an upload ticket before reading the payload, so a faster
    //    follow-up upload can supersede this one.
    let ticket = state.sessions.begin_upload();

    // 2. Pull the file out of the multipart body.
    let mut upload: Option<(String, Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Invalid multipart payload: {}", e)))?
    {
        if field.name() == Some("file") || field.file_name().is_some() {
            let file_name = field
                .file_name()
                .ok_or_else(|| AppError::InvalidInput("File field has no filename".to_string()))?
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::InvalidInput(format!("Failed to read upload: {}", e)))?;
            upload = Some((file_name, data));
            break;
        }
    }
    let (file_name, data) = upload
        .ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))?;
    if data.len() > state.config.max_file_size {
        return Err(AppError::InvalidInput(format!(
            "File exceeds the {}MB limit",
            state.config.max_file_size / (1024 * 1024)
        )));
    }
    tracing::info!("Received {} ({}KB)", file_name, data.len() / 1024);

    // 3. Parse, profile and install as the live session.
    let response = ingest_upload(&state, ticket, file_name, &data)?;
    tracing::info!("Upload processed in {:?}", start.elapsed());

    Ok(Json(response))
}

/// Parse the payload into a session and try to make it the live one.
fn ingest_upload(
    state: &AppState,
    ticket: u64,
    file_name: String,
    data: &[u8],
) -> Result<UploadResponse, AppError> {
    let table = file_processor::parse_file(data, &file_name)?;
    let session = Session::new(file_name.clone(), table);

    let response = UploadResponse {
        file_name,
        row_count: session.table().row_count(),
        column_count: session.table().column_count(),
        columns: session.table().columns.clone(),
        rows: session.table().rows.clone(),
        column_analysis: session.profiles().iter().map(ColumnAnalysis::from).collect(),
        suggestion: session.suggestion().cloned(),
    };
    state.sessions.install(ticket, session)?;
    Ok(response)
}

#[axum::debug_handler]
async fn set_chart_kind(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SetChartKindRequest>,
) -> Result<Json<VisualizationView>, AppError> {
    state.sessions.with_session(|session| {
        if !session.set_chart_kind(request.kind) {
            tracing::info!(
                "Chart kind {} not applicable, encoding unchanged",
                request.kind.label()
            );
        }
        Json(view_of(session))
    })
}

#[axum::debug_handler]
async fn set_filter(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SetFilterRequest>,
) -> Result<Json<VisualizationView>, AppError> {
    state.sessions.with_session(|session| {
        session.set_filter(request.value.clone());
        Json(view_of(session))
    })
}

#[axum::debug_handler]
async fn current_view(
    State(state): State<Arc<AppState>>,
) -> Result<Json<VisualizationView>, AppError> {
    state.sessions.with_session(|session| Json(view_of(session)))
}
