use crate::constants::MSG_DELETED;
use crate::error::{AppError, AppResult};
use crate::routes::AppState;
use crate::types::{
    CreateReleaseCodeRequest, ErrorResponse, InternalErrorResponse, MessageResponse, ReleaseCode,
    UpdateReleaseCodeRequest,
};
use crate::validation::{validate_create, validate_update};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{info, warn};

/// A body sent without a JSON content type is read as an empty mapping, so
/// its fields count as absent.
fn request_body<T: Default>(body: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    match body {
        Ok(Json(request)) => Ok(request),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(T::default()),
        Err(rejection) => Err(rejection.into()),
    }
}

#[utoipa::path(
    get,
    path = "/api/chaves",
    responses(
        (status = 200, description = "All records ordered by idcodigo", body = Vec<ReleaseCode>),
        (status = 500, description = "Datastore error", body = InternalErrorResponse)
    ),
    tag = "Chaves"
)]
pub async fn list_handler(State(state): State<AppState>) -> AppResult<Json<Vec<ReleaseCode>>> {
    state.metrics.increment_requests().await;

    let result = state.store.list_all().await.map_err(AppError::from);
    state.metrics.record_outcome(&result).await;

    let records = result?;
    info!(count = records.len(), "Listed release codes");
    Ok(Json(records))
}

#[utoipa::path(
    get,
    path = "/api/chaves/{idcodigo}",
    params(("idcodigo" = i64, Path, description = "Record id")),
    responses(
        (status = 200, description = "Record found", body = ReleaseCode),
        (status = 404, description = "Record not found", body = ErrorResponse),
        (status = 500, description = "Datastore error", body = InternalErrorResponse)
    ),
    tag = "Chaves"
)]
pub async fn get_by_id_handler(
    State(state): State<AppState>,
    Path(idcodigo): Path<String>,
) -> AppResult<Json<ReleaseCode>> {
    state.metrics.increment_requests().await;

    let result = match state.store.find_by_id(&idcodigo).await {
        Ok(Some(record)) => Ok(record),
        Ok(None) => Err(AppError::NotFound),
        Err(e) => Err(AppError::from(e)),
    };
    state.metrics.record_outcome(&result).await;
    result.map(Json)
}

#[utoipa::path(
    get,
    path = "/api/chaves/codigo/{codigo}",
    params(("codigo" = String, Path, description = "Business code")),
    responses(
        (status = 200, description = "Record found", body = ReleaseCode),
        (status = 404, description = "Record not found", body = ErrorResponse),
        (status = 500, description = "Datastore error", body = InternalErrorResponse)
    ),
    tag = "Chaves"
)]
pub async fn get_by_codigo_handler(
    State(state): State<AppState>,
    Path(codigo): Path<String>,
) -> AppResult<Json<ReleaseCode>> {
    state.metrics.increment_requests().await;

    let result = match state.store.find_by_codigo(&codigo).await {
        Ok(Some(record)) => Ok(record),
        Ok(None) => Err(AppError::NotFound),
        Err(e) => Err(AppError::from(e)),
    };
    state.metrics.record_outcome(&result).await;
    result.map(Json)
}

#[utoipa::path(
    get,
    path = "/api/chaves/email/{email}",
    params(("email" = String, Path, description = "Contact email")),
    responses(
        (status = 200, description = "Every record with this email", body = Vec<ReleaseCode>),
        (status = 404, description = "No record with this email", body = ErrorResponse),
        (status = 500, description = "Datastore error", body = InternalErrorResponse)
    ),
    tag = "Chaves"
)]
pub async fn get_by_email_handler(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<Json<Vec<ReleaseCode>>> {
    state.metrics.increment_requests().await;

    let result = match state.store.find_by_email(&email).await {
        Ok(records) if records.is_empty() => Err(AppError::NotFound),
        Ok(records) => Ok(records),
        Err(e) => Err(AppError::from(e)),
    };
    state.metrics.record_outcome(&result).await;
    result.map(Json)
}

#[utoipa::path(
    post,
    path = "/api/chaves",
    request_body = CreateReleaseCodeRequest,
    responses(
        (status = 201, description = "Record created", body = ReleaseCode),
        (status = 400, description = "Missing field, invalid email or emuso", body = ErrorResponse),
        (status = 409, description = "Code already exists", body = ErrorResponse),
        (status = 500, description = "Datastore error", body = InternalErrorResponse)
    ),
    tag = "Chaves"
)]
pub async fn create_handler(
    State(state): State<AppState>,
    body: Result<Json<CreateReleaseCodeRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ReleaseCode>)> {
    state.metrics.increment_requests().await;

    let result = create(&state, body).await;
    state.metrics.record_outcome(&result).await;

    let record = result?;
    state.metrics.increment_created().await;
    info!(idcodigo = record.idcodigo, codigo = %record.codigo, "Release code created");
    Ok((StatusCode::CREATED, Json(record)))
}

async fn create(
    state: &AppState,
    body: Result<Json<CreateReleaseCodeRequest>, JsonRejection>,
) -> AppResult<ReleaseCode> {
    let request = request_body(body)?;
    let record = validate_create(&request)?;

    // Not atomic with the insert below: two concurrent creates with the same
    // codigo can both pass this check.
    if state.store.codigo_exists(&record.codigo).await? {
        warn!(codigo = %record.codigo, "Duplicate codigo");
        return Err(AppError::Conflict);
    }

    Ok(state.store.insert(&record).await?)
}

#[utoipa::path(
    put,
    path = "/api/chaves/{idcodigo}",
    params(("idcodigo" = i64, Path, description = "Record id")),
    request_body = UpdateReleaseCodeRequest,
    responses(
        (status = 200, description = "Record updated", body = ReleaseCode),
        (status = 400, description = "Invalid email or emuso", body = ErrorResponse),
        (status = 404, description = "Record not found", body = ErrorResponse),
        (status = 500, description = "Datastore error", body = InternalErrorResponse)
    ),
    tag = "Chaves"
)]
pub async fn update_handler(
    State(state): State<AppState>,
    Path(idcodigo): Path<String>,
    body: Result<Json<UpdateReleaseCodeRequest>, JsonRejection>,
) -> AppResult<Json<ReleaseCode>> {
    state.metrics.increment_requests().await;

    let result = update(&state, &idcodigo, body).await;
    state.metrics.record_outcome(&result).await;

    let record = result?;
    state.metrics.increment_updated().await;
    info!(idcodigo = record.idcodigo, "Release code updated");
    Ok(Json(record))
}

async fn update(
    state: &AppState,
    idcodigo: &str,
    body: Result<Json<UpdateReleaseCodeRequest>, JsonRejection>,
) -> AppResult<ReleaseCode> {
    let request = request_body(body)?;
    let changes = validate_update(&request)?;

    state
        .store
        .update(idcodigo, &changes)
        .await?
        .ok_or(AppError::NotFound)
}

#[utoipa::path(
    delete,
    path = "/api/chaves/{idcodigo}",
    params(("idcodigo" = i64, Path, description = "Record id")),
    responses(
        (status = 200, description = "Record removed", body = MessageResponse),
        (status = 404, description = "Record not found", body = ErrorResponse),
        (status = 500, description = "Datastore error", body = InternalErrorResponse)
    ),
    tag = "Chaves"
)]
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(idcodigo): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.metrics.increment_requests().await;

    let result = match state.store.delete(&idcodigo).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(AppError::NotFound),
        Err(e) => Err(AppError::from(e)),
    };
    state.metrics.record_outcome(&result).await;
    result?;

    state.metrics.increment_deleted().await;
    info!(idcodigo = %idcodigo, "Release code removed");
    Ok(Json(MessageResponse {
        message: MSG_DELETED.to_string(),
    }))
}
