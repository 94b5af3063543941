use crate::domain::ship::{Ship, ShipDraft, ShipOrder, ShipType};
use crate::transport::http::handlers::{health, ships};
use crate::transport::http::types::ApiResponse;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        ships::list_ships_handler,
        ships::count_ships_handler,
        ships::create_ship_handler,
        ships::get_ship_handler,
        ships::update_ship_handler,
        ships::delete_ship_handler
    ),
    components(schemas(ApiResponse, Ship, ShipDraft, ShipType, ShipOrder))
)]
pub struct ApiDoc;

pub fn create_router(app_state: crate::transport::http::types::AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route(
            "/rest/ships",
            get(ships::list_ships_handler).post(ships::create_ship_handler),
        )
        .route("/rest/ships/count", get(ships::count_ships_handler))
        .route(
            "/rest/ships/:id",
            get(ships::get_ship_handler)
                .post(ships::update_ship_handler)
                .delete(ships::delete_ship_handler),
        )
        .with_state(app_state)
}
