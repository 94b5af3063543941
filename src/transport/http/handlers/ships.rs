use crate::app::ShipCatalog;
use crate::domain::ship::{Listing, ShipDraft};
use crate::transport::http::handlers::common::{error_response, ok_json, rejection_400};
use crate::transport::http::types::{ApiResponse, AppState, ShipListParams};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    get,
    path = "/rest/ships",
    params(ShipListParams),
    responses(
        (status = 200, description = "One page of matching ships (data.items)", body = ApiResponse),
        (status = 400, description = "Malformed filter or paging parameters", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn list_ships_handler(
    State(state): State<AppState>,
    params: Result<Query<ShipListParams>, QueryRejection>,
) -> impl IntoResponse {
    let Query(params) = match params {
        Ok(v) => v,
        Err(e) => return rejection_400(e, "ship filter query parameters").into_response(),
    };
    let query = params
        .filter()
        .and_then(|filter| params.page_request().map(|page| (filter, page)));
    let (filter, page) = match query {
        Ok(v) => v,
        Err(e) => return error_response(&e).into_response(),
    };

    match state.catalog.list(&filter, Some(page)).await {
        Ok(Listing::Page(page)) => ok_json(&page).into_response(),
        Ok(Listing::All(ships)) => ok_json(&ships).into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/rest/ships/count",
    params(ShipListParams),
    responses(
        (status = 200, description = "Number of matching ships (data.count)", body = ApiResponse),
        (status = 400, description = "Malformed filter parameters", body = ApiResponse)
    )
)]
pub async fn count_ships_handler(
    State(state): State<AppState>,
    params: Result<Query<ShipListParams>, QueryRejection>,
) -> impl IntoResponse {
    let Query(params) = match params {
        Ok(v) => v,
        Err(e) => return rejection_400(e, "ship filter query parameters").into_response(),
    };
    let filter = match params.filter() {
        Ok(f) => f,
        Err(e) => return error_response(&e).into_response(),
    };

    match state.catalog.count(&filter).await {
        Ok(count) => ok_json(&serde_json::json!({ "count": count })).into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/rest/ships",
    request_body = ShipDraft,
    responses(
        (status = 200, description = "Ship created; data is the stored ship", body = ApiResponse),
        (status = 400, description = "Validation failed or malformed body", body = ApiResponse)
    )
)]
pub async fn create_ship_handler(
    State(state): State<AppState>,
    request: Result<Json<ShipDraft>, JsonRejection>,
) -> impl IntoResponse {
    let Json(draft) = match request {
        Ok(v) => v,
        Err(e) => return rejection_400(e, "a ship JSON object").into_response(),
    };

    match state.catalog.create(&draft).await {
        Ok(ship) => ok_json(&ship).into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/rest/ships/{id}",
    params(("id" = String, Path, description = "Ship id (positive integer)")),
    responses(
        (status = 200, description = "The ship", body = ApiResponse),
        (status = 400, description = "Malformed id", body = ApiResponse),
        (status = 404, description = "No ship with this id", body = ApiResponse)
    )
)]
pub async fn get_ship_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> impl IntoResponse {
    let id = match ShipCatalog::parse_identifier(Some(&raw_id)) {
        Ok(id) => id,
        Err(e) => return error_response(&e).into_response(),
    };

    match state.catalog.get(id).await {
        Ok(ship) => ok_json(&ship).into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/rest/ships/{id}",
    params(("id" = String, Path, description = "Ship id (positive integer)")),
    request_body = ShipDraft,
    responses(
        (status = 200, description = "Ship updated; only fields present in the body were changed", body = ApiResponse),
        (status = 400, description = "Malformed id, body, or invalid field", body = ApiResponse),
        (status = 404, description = "No ship with this id", body = ApiResponse)
    )
)]
pub async fn update_ship_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    request: Result<Json<ShipDraft>, JsonRejection>,
) -> impl IntoResponse {
    let id = match ShipCatalog::parse_identifier(Some(&raw_id)) {
        Ok(id) => id,
        Err(e) => return error_response(&e).into_response(),
    };
    let Json(patch) = match request {
        Ok(v) => v,
        Err(e) => return rejection_400(e, "a partial ship JSON object").into_response(),
    };

    match state.catalog.update(id, &patch).await {
        Ok(ship) => ok_json(&ship).into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/rest/ships/{id}",
    params(("id" = String, Path, description = "Ship id (positive integer)")),
    responses(
        (status = 200, description = "Ship deleted", body = ApiResponse),
        (status = 400, description = "Malformed id", body = ApiResponse),
        (status = 404, description = "No ship with this id", body = ApiResponse)
    )
)]
pub async fn delete_ship_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> impl IntoResponse {
    let id = match ShipCatalog::parse_identifier(Some(&raw_id)) {
        Ok(id) => id,
        Err(e) => return error_response(&e).into_response(),
    };

    match state.catalog.delete(id).await {
        Ok(()) => ok_json(&serde_json::json!({ "id": id, "deleted": true })).into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}
