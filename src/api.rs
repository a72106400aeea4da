//! REST API for the cargo stowage service.
//!
//! Provides HTTP endpoints for communication with collaborators. Uses Axum
//! as the web framework and supports CORS, matching the teacher's layout.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Query, State};
use axum::{
    Router,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
use serde_json::json;
use std::sync::{Arc, Mutex, OnceLock};
use tower_http::cors::{Any, CorsLayer};
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::audit::{ActionType, AuditEntry, AuditFilter};
use crate::config::{ApiConfig, CoreConfig};
use crate::csv_io;
use crate::error::CoreError;
use crate::lifecycle::{MoveStep, ReturnedItem, UsageEvent};
use crate::model::{Container, Item};
use crate::obstruction::RetrievalStep;
use crate::simulate::Advance;
use crate::store::Store;

#[derive(Clone)]
struct ApiState {
    store: Arc<Mutex<Store>>,
    core: CoreConfig,
}

static OPENAPI_DOC: OnceLock<utoipa::openapi::OpenApi> = OnceLock::new();

const SWAGGER_UI_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
    <head>
        <meta charset="utf-8" />
        <title>cargohold API Docs</title>
        <link
            rel="stylesheet"
            href="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui.css"
            integrity="sha384-wxLW6kwyHktdDGr6Pv1zgm/VGJh99lfUbzSn6HNHBENZlCN7W602k9VkGdxuFvPn"
            crossorigin="anonymous"
        />
    </head>
    <body>
        <div id="swagger-ui"></div>
        <script
            src="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui-bundle.js"
            integrity="sha384-wmyclcVGX/WhUkdkATwhaK1X1JtiNrr2EoYJ+diV3vj4v6OC5yCeSu+yW13SYJep"
            crossorigin="anonymous"
        ></script>
        <script
            src="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui-standalone-preset.js"
            integrity="sha384-2YH8WDRaj7V2OqU/trsmzSagmk/E2SutiCsGkdgoQwC9pNUJV1u/141DHB6jgs8t"
            crossorigin="anonymous"
        ></script>
        <script>
            window.onload = function () {
                const ui = SwaggerUIBundle({
                    url: "/docs/openapi.json",
                    dom_id: "#swagger-ui",
                    presets: [SwaggerUIBundle.presets.apis, SwaggerUIStandalonePreset],
                    layout: "StandaloneLayout",
                });
                window.ui = ui;
            };
        </script>
    </body>
    </html>"##;

fn openapi_doc() -> &'static utoipa::openapi::OpenApi {
    OPENAPI_DOC.get_or_init(ApiDoc::openapi)
}

#[derive(Serialize, ToSchema)]
struct ErrorResponse {
    error: String,
    details: String,
}

impl ErrorResponse {
    fn new(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self { error: error.into(), details: details.into() }
    }
}

fn error_response(status: StatusCode, error: impl Into<String>, details: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(error, details))).into_response()
}

fn json_deserialize_error(err: JsonRejection) -> Response {
    error_response(StatusCode::UNPROCESSABLE_ENTITY, "Invalid JSON data", err.to_string())
}

/// Maps `CoreError` to an HTTP status (spec §7: InputInvalid/Conflict → 422,
/// NotFound → 404, NoFit → handled by the caller as a 200 with unplaced[],
/// StoreFailure → 500).
fn core_error_response(err: CoreError) -> Response {
    let status = match &err {
        CoreError::InputInvalid(_) | CoreError::Conflict(_) => StatusCode::UNPROCESSABLE_ENTITY,
        CoreError::NotFound(_) => StatusCode::NOT_FOUND,
        CoreError::NoFit(_) => StatusCode::OK,
        CoreError::StoreFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, err.kind(), err.to_string())
}

fn lock_error() -> Response {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "StoreFailure", "store mutex was poisoned")
}

// ---- /api/placement ----------------------------------------------------

#[derive(Deserialize, ToSchema)]
pub struct ItemRequest {
    pub item_id: String,
    pub name: String,
    #[schema(value_type = [f64; 3], example = json!([30.0, 40.0, 20.0]))]
    pub dims: (f64, f64, f64),
    pub mass: f64,
    pub priority: i32,
    pub expiry_date: Option<NaiveDate>,
    pub usage_limit: Option<u32>,
    pub preferred_zone: String,
}

#[derive(Deserialize, ToSchema)]
pub struct ContainerRequest {
    pub container_id: String,
    pub zone: String,
    #[schema(value_type = [f64; 3], example = json!([120.0, 100.0, 80.0]))]
    pub dims: (f64, f64, f64),
}

#[derive(Deserialize, ToSchema)]
pub struct PlacementRequest {
    pub items: Vec<ItemRequest>,
    pub containers: Vec<ContainerRequest>,
}

#[derive(Serialize, ToSchema)]
pub struct PlacedEntry {
    pub item_id: String,
    pub container_id: String,
    #[schema(value_type = [f64; 3])]
    pub start: (f64, f64, f64),
    #[schema(value_type = [f64; 3])]
    pub end: (f64, f64, f64),
}

#[derive(Serialize, ToSchema)]
pub struct PlacementResponse {
    pub placements: Vec<PlacedEntry>,
    pub unplaced: Vec<String>,
}

#[utoipa::path(
    post,
    path = "/api/placement",
    request_body = PlacementRequest,
    responses(
        (status = 200, description = "Placement plan computed", body = PlacementResponse),
        (status = 422, description = "Invalid item or container", body = ErrorResponse)
    ),
    tag = "placement"
)]
async fn handle_placement(
    State(state): State<ApiState>,
    payload: Result<Json<PlacementRequest>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(err) => return json_deserialize_error(err),
    };

    let containers: Result<Vec<Container>, CoreError> = payload
        .containers
        .into_iter()
        .map(|c| Container::new(c.container_id, c.zone, c.dims))
        .collect();
    let containers = match containers {
        Ok(containers) => containers,
        Err(err) => return core_error_response(err),
    };

    let items: Result<Vec<Item>, CoreError> = payload
        .items
        .into_iter()
        .map(|i| Item::new(i.item_id, i.name, i.dims, i.mass, i.priority, i.expiry_date, i.usage_limit, i.preferred_zone))
        .collect();
    let items = match items {
        Ok(items) => items,
        Err(err) => return core_error_response(err),
    };

    let result = tokio::task::spawn_blocking(move || {
        let Ok(mut store) = state.store.lock() else {
            return Err(());
        };
        for container in containers {
            store.add_container(container);
        }
        for item in items {
            store.add_item(item);
        }
        Ok(store.plan_placement(Utc::now()))
    })
    .await;

    let Ok(Ok(result)) = result else {
        return lock_error();
    };

    let placements = result
        .placements
        .into_iter()
        .map(|p| PlacedEntry {
            item_id: p.item_id,
            container_id: p.container_id,
            start: p.location.placement.start,
            end: p.location.placement.end,
        })
        .collect();

    (StatusCode::OK, Json(PlacementResponse { placements, unplaced: result.unplaced })).into_response()
}

// ---- /api/search ---------------------------------------------------------

#[derive(Deserialize, IntoParams)]
pub struct SearchQuery {
    pub item_id: Option<String>,
    pub item_name: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct RetrievalStepResponse {
    pub item_id: String,
    #[schema(value_type = [f64; 3])]
    pub start: (f64, f64, f64),
    #[schema(value_type = [f64; 3])]
    pub end: (f64, f64, f64),
}

impl From<RetrievalStep> for RetrievalStepResponse {
    fn from(step: RetrievalStep) -> Self {
        Self { item_id: step.item_id, start: step.placement.start, end: step.placement.end }
    }
}

#[derive(Serialize, ToSchema)]
pub struct SearchResponse {
    pub item: Item,
    pub retrieval_steps: Vec<RetrievalStepResponse>,
}

#[utoipa::path(
    get,
    path = "/api/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Item found", body = SearchResponse),
        (status = 404, description = "Item not found", body = ErrorResponse)
    ),
    tag = "search"
)]
async fn handle_search(State(state): State<ApiState>, Query(query): Query<SearchQuery>) -> Response {
    let Ok(store) = state.store.lock() else { return lock_error() };
    match store.search(query.item_id.as_deref(), query.item_name.as_deref()) {
        Ok(result) => (
            StatusCode::OK,
            Json(SearchResponse {
                item: result.item,
                retrieval_steps: result.retrieval_steps.into_iter().map(Into::into).collect(),
            }),
        )
            .into_response(),
        Err(err) => core_error_response(err),
    }
}

// ---- /api/place -----------------------------------------------------------

#[derive(Deserialize, ToSchema)]
pub struct PlaceRequest {
    pub item_id: String,
    pub container_id: String,
    #[schema(value_type = [f64; 3])]
    pub start: (f64, f64, f64),
    #[schema(value_type = [f64; 3])]
    pub end: (f64, f64, f64),
}

#[utoipa::path(
    post,
    path = "/api/place",
    request_body = PlaceRequest,
    responses(
        (status = 200, description = "Placed"),
        (status = 404, description = "Item or container not found", body = ErrorResponse),
        (status = 422, description = "Containment or overlap violation", body = ErrorResponse)
    ),
    tag = "placement"
)]
async fn handle_place(
    State(state): State<ApiState>,
    payload: Result<Json<PlaceRequest>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(err) => return json_deserialize_error(err),
    };
    let Ok(mut store) = state.store.lock() else { return lock_error() };
    match store.manual_place(&payload.item_id, &payload.container_id, payload.start, payload.end, Utc::now()) {
        Ok(()) => StatusCode::OK.into_response(),
        Err(err) => core_error_response(err),
    }
}

// ---- /api/retrieve ---------------------------------------------------------

#[derive(Deserialize, ToSchema)]
pub struct RetrieveRequest {
    pub item_id: String,
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
}

#[utoipa::path(
    post,
    path = "/api/retrieve",
    request_body = RetrieveRequest,
    responses(
        (status = 200, description = "Retrieved"),
        (status = 404, description = "Item not found", body = ErrorResponse)
    ),
    tag = "lifecycle"
)]
async fn handle_retrieve(
    State(state): State<ApiState>,
    payload: Result<Json<RetrieveRequest>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(err) => return json_deserialize_error(err),
    };
    let Ok(mut store) = state.store.lock() else { return lock_error() };
    match store.retrieve_item(&payload.item_id, &payload.user_id, payload.timestamp) {
        Ok(()) => StatusCode::OK.into_response(),
        Err(err) => core_error_response(err),
    }
}

// ---- /api/waste/identify ---------------------------------------------------

#[derive(Serialize, ToSchema)]
pub struct WasteIdentifyResponse {
    pub items: Vec<Item>,
}

#[utoipa::path(
    get,
    path = "/api/waste/identify",
    responses((status = 200, description = "Waste items", body = WasteIdentifyResponse)),
    tag = "waste"
)]
async fn handle_waste_identify(State(state): State<ApiState>) -> Response {
    let Ok(store) = state.store.lock() else { return lock_error() };
    let items = store.identify_waste().into_iter().cloned().collect();
    (StatusCode::OK, Json(WasteIdentifyResponse { items })).into_response()
}

// ---- /api/waste/return-plan -------------------------------------------------

#[derive(Deserialize, ToSchema)]
pub struct ReturnPlanRequest {
    pub undocking_container_id: String,
    pub date: NaiveDate,
    pub max_weight: f64,
}

#[derive(Serialize, ToSchema)]
pub struct ReturnedItemResponse {
    pub item_id: String,
    pub mass: f64,
    pub waste_reason: Option<String>,
}

impl From<ReturnedItem> for ReturnedItemResponse {
    fn from(item: ReturnedItem) -> Self {
        Self { item_id: item.item_id, mass: item.mass, waste_reason: item.waste_reason.map(|r| r.to_string()) }
    }
}

#[derive(Serialize, ToSchema)]
pub struct MoveStepResponse {
    pub item_id: String,
    pub from_container: String,
    pub to_container: String,
    pub order: usize,
}

impl From<MoveStep> for MoveStepResponse {
    fn from(step: MoveStep) -> Self {
        Self {
            item_id: step.item_id,
            from_container: step.from_container,
            to_container: step.to_container,
            order: step.order,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ItemRetrievalSteps {
    pub item_id: String,
    pub steps: Vec<RetrievalStepResponse>,
}

#[derive(Serialize, ToSchema)]
pub struct ReturnPlanResponse {
    pub undocking_container_id: String,
    pub date: NaiveDate,
    pub included: Vec<ReturnedItemResponse>,
    pub total_volume: f64,
    pub total_mass: f64,
    pub move_steps: Vec<MoveStepResponse>,
    pub retrieval_steps: Vec<ItemRetrievalSteps>,
}

#[utoipa::path(
    post,
    path = "/api/waste/return-plan",
    request_body = ReturnPlanRequest,
    responses((status = 200, description = "Return manifest", body = ReturnPlanResponse)),
    tag = "waste"
)]
async fn handle_return_plan(
    State(state): State<ApiState>,
    payload: Result<Json<ReturnPlanRequest>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(err) => return json_deserialize_error(err),
    };
    let Ok(store) = state.store.lock() else { return lock_error() };
    let plan = store.plan_return(&payload.undocking_container_id, payload.date, payload.max_weight);

    (
        StatusCode::OK,
        Json(ReturnPlanResponse {
            undocking_container_id: plan.undocking_container_id,
            date: plan.date,
            included: plan.included.into_iter().map(Into::into).collect(),
            total_volume: plan.total_volume,
            total_mass: plan.total_mass,
            move_steps: plan.move_steps.into_iter().map(Into::into).collect(),
            retrieval_steps: plan
                .retrieval_steps
                .into_iter()
                .map(|(item_id, steps)| ItemRetrievalSteps {
                    item_id,
                    steps: steps.into_iter().map(Into::into).collect(),
                })
                .collect(),
        }),
    )
        .into_response()
}

// ---- /api/waste/complete-undocking ------------------------------------------

#[derive(Deserialize, ToSchema)]
pub struct UndockingRequest {
    pub undocking_container_id: String,
}

#[derive(Serialize, ToSchema)]
pub struct UndockingResponse {
    pub removed_count: usize,
}

#[utoipa::path(
    post,
    path = "/api/waste/complete-undocking",
    request_body = UndockingRequest,
    responses((status = 200, description = "Undocking committed", body = UndockingResponse)),
    tag = "waste"
)]
async fn handle_complete_undocking(
    State(state): State<ApiState>,
    payload: Result<Json<UndockingRequest>, JsonRejection>,
) -> Response {
    if let Err(err) = payload {
        return json_deserialize_error(err);
    }
    let Ok(mut store) = state.store.lock() else { return lock_error() };
    let removed_count = store.commit_undocking(Utc::now());
    (StatusCode::OK, Json(UndockingResponse { removed_count })).into_response()
}

// ---- /api/simulate/day --------------------------------------------------

#[derive(Deserialize, ToSchema)]
pub struct UsageEventRequest {
    pub item_id: Option<String>,
    pub item_name: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct SimulateRequest {
    pub days: Option<u32>,
    pub target_date: Option<NaiveDate>,
    #[serde(default)]
    pub usage_list: Vec<UsageEventRequest>,
}

#[derive(Serialize, ToSchema)]
pub struct SimulateResponse {
    pub new_date: NaiveDate,
    pub used: Vec<String>,
    pub expired: Vec<String>,
    pub depleted: Vec<String>,
}

#[utoipa::path(
    post,
    path = "/api/simulate/day",
    request_body = SimulateRequest,
    responses(
        (status = 200, description = "Clock advanced", body = SimulateResponse),
        (status = 422, description = "Neither days nor targetDate given", body = ErrorResponse)
    ),
    tag = "simulation"
)]
async fn handle_simulate(
    State(state): State<ApiState>,
    payload: Result<Json<SimulateRequest>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(err) => return json_deserialize_error(err),
    };

    let advance = match (payload.days, payload.target_date) {
        (Some(days), _) => Advance::Days(days),
        (None, Some(date)) => Advance::ToDate(date),
        (None, None) => {
            return core_error_response(CoreError::input_invalid("either days or targetDate is required"));
        }
    };

    let usage: Vec<UsageEvent> = payload
        .usage_list
        .into_iter()
        .map(|u| UsageEvent { item_id: u.item_id, item_name: u.item_name })
        .collect();

    let Ok(mut store) = state.store.lock() else { return lock_error() };
    let result = store.simulate(advance, &usage, Utc::now());

    (
        StatusCode::OK,
        Json(SimulateResponse {
            new_date: result.new_date,
            used: result.summary.used,
            expired: result.summary.expired,
            depleted: result.summary.depleted,
        }),
    )
        .into_response()
}

// ---- /api/import/items, /api/import/containers -----------------------------

#[derive(Serialize, ToSchema)]
pub struct ImportResponse {
    pub success_count: usize,
    pub errors: Vec<ImportRowError>,
}

#[derive(Serialize, ToSchema)]
pub struct ImportRowError {
    pub row: usize,
    pub message: String,
}

#[utoipa::path(
    post,
    path = "/api/import/items",
    request_body(content = String, content_type = "text/csv"),
    responses((status = 200, description = "Import outcome", body = ImportResponse)),
    tag = "import"
)]
async fn handle_import_items(State(state): State<ApiState>, body: String) -> Response {
    let (items, outcome) = csv_io::import_items_csv(&body);
    let Ok(mut store) = state.store.lock() else { return lock_error() };
    store.import_items(items, Utc::now());
    (StatusCode::OK, Json(import_response(outcome))).into_response()
}

#[utoipa::path(
    post,
    path = "/api/import/containers",
    request_body(content = String, content_type = "text/csv"),
    responses((status = 200, description = "Import outcome", body = ImportResponse)),
    tag = "import"
)]
async fn handle_import_containers(State(state): State<ApiState>, body: String) -> Response {
    let (containers, outcome) = csv_io::import_containers_csv(&body);
    let Ok(mut store) = state.store.lock() else { return lock_error() };
    store.import_containers(containers, Utc::now());
    (StatusCode::OK, Json(import_response(outcome))).into_response()
}

fn import_response(outcome: csv_io::ImportOutcome) -> ImportResponse {
    ImportResponse {
        success_count: outcome.success_count,
        errors: outcome.errors.into_iter().map(|e| ImportRowError { row: e.row, message: e.message }).collect(),
    }
}

// ---- /api/export/arrangement ------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/export/arrangement",
    responses((status = 200, description = "Arrangement CSV", body = String, content_type = "text/csv")),
    tag = "export"
)]
async fn handle_export_arrangement(State(state): State<ApiState>) -> Response {
    let Ok(store) = state.store.lock() else { return lock_error() };
    let items: Vec<Item> = store.items().cloned().collect();
    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/csv")],
        csv_io::export_arrangement_csv(&items),
    )
        .into_response()
}

// ---- /api/logs -----------------------------------------------------------

#[derive(Deserialize, IntoParams)]
pub struct LogsQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub item_id: Option<String>,
    pub user_id: Option<String>,
    pub action_type: Option<ActionType>,
    pub limit: Option<usize>,
}

#[derive(Serialize, ToSchema)]
pub struct LogsResponse {
    pub entries: Vec<AuditEntry>,
}

#[utoipa::path(
    get,
    path = "/api/logs",
    params(LogsQuery),
    responses((status = 200, description = "Audit log entries", body = LogsResponse)),
    tag = "audit"
)]
async fn handle_logs(State(state): State<ApiState>, Query(query): Query<LogsQuery>) -> Response {
    let Ok(store) = state.store.lock() else { return lock_error() };
    let filter = AuditFilter {
        from: query.from,
        to: query.to,
        item_id: query.item_id,
        user_id: query.user_id,
        action_type: query.action_type,
    };
    let limit = query.limit.unwrap_or_else(|| state.core.log_page_size());
    let entries = store.query_audit_log(&filter, limit);
    (StatusCode::OK, Json(LogsResponse { entries })).into_response()
}

// ---- docs ------------------------------------------------------------------

async fn serve_openapi_json() -> impl IntoResponse {
    Json(openapi_doc())
}

async fn serve_openapi_ui() -> impl IntoResponse {
    Html(SWAGGER_UI_HTML)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handle_placement,
        handle_search,
        handle_place,
        handle_retrieve,
        handle_waste_identify,
        handle_return_plan,
        handle_complete_undocking,
        handle_simulate,
        handle_import_items,
        handle_import_containers,
        handle_export_arrangement,
        handle_logs
    ),
    components(
        schemas(
            ItemRequest,
            ContainerRequest,
            PlacementRequest,
            PlacedEntry,
            PlacementResponse,
            crate::model::Item,
            crate::model::ItemLocation,
            crate::model::Placement,
            crate::model::WasteReason,
            SearchResponse,
            RetrievalStepResponse,
            PlaceRequest,
            RetrieveRequest,
            WasteIdentifyResponse,
            ReturnPlanRequest,
            ReturnedItemResponse,
            MoveStepResponse,
            ItemRetrievalSteps,
            ReturnPlanResponse,
            UndockingRequest,
            UndockingResponse,
            SimulateRequest,
            UsageEventRequest,
            SimulateResponse,
            ImportResponse,
            ImportRowError,
            LogsResponse,
            ErrorResponse
        )
    ),
    tags(
        (name = "placement", description = "Planning and manual placement"),
        (name = "search", description = "Item lookup and retrieval path"),
        (name = "lifecycle", description = "Retrieval and usage"),
        (name = "waste", description = "Waste identification and undocking"),
        (name = "simulation", description = "Simulated clock advancement"),
        (name = "import", description = "CSV bulk import"),
        (name = "export", description = "CSV export"),
        (name = "audit", description = "Audit log queries")
    )
)]
struct ApiDoc;

/// Starts the API server, binding per `config` and serving from a single
/// in-process [`Store`] behind a mutex (spec §5).
pub async fn start_api_server(config: ApiConfig, core: CoreConfig, store: Store) {
    let cors = CorsLayer::new().allow_methods(Any).allow_origin(Any).allow_headers(Any);
    let state = ApiState { store: Arc::new(Mutex::new(store)), core };

    let app = Router::new()
        .route("/api/placement", post(handle_placement))
        .route("/api/search", get(handle_search))
        .route("/api/place", post(handle_place))
        .route("/api/retrieve", post(handle_retrieve))
        .route("/api/waste/identify", get(handle_waste_identify))
        .route("/api/waste/return-plan", post(handle_return_plan))
        .route("/api/waste/complete-undocking", post(handle_complete_undocking))
        .route("/api/simulate/day", post(handle_simulate))
        .route("/api/import/items", post(handle_import_items))
        .route("/api/import/containers", post(handle_import_containers))
        .route("/api/export/arrangement", get(handle_export_arrangement))
        .route("/api/logs", get(handle_logs))
        .route("/docs/openapi.json", get(serve_openapi_json))
        .route("/docs", get(serve_openapi_ui))
        .layer(cors)
        .with_state(state);

    let addr = config.socket_addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => panic!("❌ Could not bind API server to {}: {}", addr, err),
    };

    let display_host = config.display_host().to_string();
    log::info!("Server running on http://{}:{}", display_host, config.port());
    if config.binds_to_all_interfaces() {
        log::info!("Local access: http://localhost:{}", config.port());
    }
    log::info!("Documentation at http://{}:{}/docs", display_host, config.port());

    if let Err(err) = axum::serve(listener, app).await {
        log::error!("API server terminated with an error: {err}");
    }
}
