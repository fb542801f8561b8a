pub mod orders;

use actix_web::web;
use utoipa::OpenApi;

use crate::errors::AppError;

#[derive(OpenApi)]
#[openapi(
    paths(
        orders::validate_order,
        orders::place_order,
        orders::get_order,
        orders::list_orders,
        orders::update_order_status,
    ),
    components(schemas(
        orders::CartItemRequest,
        orders::ValidateOrderRequest,
        orders::PlaceOrderRequest,
        orders::ValidationResponse,
        orders::PlaceOrderResponse,
        orders::OrderResponse,
        orders::UpdateStatusRequest,
        orders::ListOrdersResponse,
    )),
    tags((name = "orders", description = "Meal order admission and back office"))
)]
pub struct ApiDoc;

/// Registers the order routes. Extractor failures (malformed JSON, bad query
/// strings) are reported as 400 with the same error body as other failures.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .service(
        web::scope("/orders")
            .route("", web::post().to(orders::place_order))
            .route("", web::get().to(orders::list_orders))
            .route("/validate", web::post().to(orders::validate_order))
            .route("/{id}", web::get().to(orders::get_order))
            .route("/{id}/status", web::patch().to(orders::update_order_status)),
    );
}
