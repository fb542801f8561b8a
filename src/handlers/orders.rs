use std::str::FromStr;

use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::order_service::{CheckoutOutcome, SharedOrderService};
use crate::domain::order::{Cart, CartLineItem, Code, MealOrderView, OrderFilter, OrderStatus};
use crate::domain::validation::ValidationResult;
use crate::errors::AppError;

// ── Request / response DTOs ──────────────────────────────────────────────────

/// Reads a decimal from a JSON number or string using its literal text, so
/// a number never passes through `f64`.
fn decimal_from_json<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = <Box<RawValue>>::deserialize(deserializer)?;
    let text = raw.get();
    let literal = serde_json::from_str::<String>(text).unwrap_or_else(|_| text.to_string());
    BigDecimal::from_str(literal.trim())
        .map_err(|_| de::Error::custom(format!("invalid decimal amount {}", text)))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CartItemRequest {
    /// `weekly_menu` or `single_day`.
    #[serde(alias = "type")]
    pub kind: String,
    /// One of S, M, L, XL, XXL, XXL+, CUSTOM.
    #[serde(alias = "sizeCode")]
    pub size_code: String,
    /// Day labels (e.g. "Pondelok") picked for a weekly menu.
    #[serde(default, alias = "selectedDays")]
    pub selected_days: Option<Vec<String>>,
    /// Monday of the weekly menu.
    #[serde(default, alias = "menuWindowStart")]
    pub menu_window_start: Option<NaiveDate>,
    /// Number of days the weekly menu offers.
    #[serde(default, alias = "menuDayCount")]
    pub menu_day_count: Option<u32>,
}

impl From<CartItemRequest> for CartLineItem {
    fn from(item: CartItemRequest) -> Self {
        CartLineItem {
            kind: Code::parse(&item.kind),
            size_code: Code::parse(&item.size_code),
            selected_days: item.selected_days,
            menu_window_start: item.menu_window_start,
            menu_day_count: item.menu_day_count,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ValidateOrderRequest {
    #[serde(alias = "cartItems")]
    pub cart_items: Vec<CartItemRequest>,
    /// Cart total as a JSON number or decimal string, e.g. "129.90".
    #[serde(alias = "totalPrice", deserialize_with = "decimal_from_json")]
    #[schema(value_type = String, example = "129.90")]
    pub total_price: BigDecimal,
    #[serde(default, alias = "deliveryRegion")]
    pub delivery_region: Option<String>,
}

impl From<ValidateOrderRequest> for Cart {
    fn from(body: ValidateOrderRequest) -> Self {
        Cart {
            items: body.cart_items.into_iter().map(CartLineItem::from).collect(),
            total_price: body.total_price,
            delivery_region: body.delivery_region,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PlaceOrderRequest {
    #[serde(alias = "customerId")]
    pub customer_id: Uuid,
    #[serde(alias = "cartItems")]
    pub cart_items: Vec<CartItemRequest>,
    #[serde(alias = "totalPrice", deserialize_with = "decimal_from_json")]
    #[schema(value_type = String, example = "129.90")]
    pub total_price: BigDecimal,
    #[serde(default, alias = "deliveryRegion")]
    pub delivery_region: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ValidationResponse {
    pub valid: bool,
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Canonical delivery region.
    pub region: String,
}

impl From<ValidationResult> for ValidationResponse {
    fn from(result: ValidationResult) -> Self {
        let valid = result.is_valid();
        ValidationResponse {
            valid,
            message: Some(if valid {
                "Order is valid".to_string()
            } else {
                "Order validation failed".to_string()
            }),
            region: result.region().to_string(),
            errors: result.errors().to_vec(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlaceOrderResponse {
    pub order_ids: Vec<Uuid>,
    pub region: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub checkout_id: Uuid,
    pub customer_id: Uuid,
    pub position: i32,
    pub kind: String,
    pub size_code: String,
    pub selected_days: Vec<String>,
    pub menu_window_start: Option<NaiveDate>,
    pub total_price: String,
    pub delivery_region: Option<String>,
    pub region: String,
    pub status: String,
    pub created_at: String,
}

impl From<MealOrderView> for OrderResponse {
    fn from(o: MealOrderView) -> Self {
        OrderResponse {
            id: o.id,
            checkout_id: o.checkout_id,
            customer_id: o.customer_id,
            position: o.position,
            kind: o.kind,
            size_code: o.size_code,
            selected_days: o.selected_days,
            menu_window_start: o.menu_window_start,
            total_price: o.total_price.to_string(),
            delivery_region: o.delivery_region,
            region: o.region,
            status: o.status,
            created_at: o.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    /// PENDING, CONFIRMED, PREPARING, OUT_FOR_DELIVERY, DELIVERED or CANCELLED.
    pub status: String,
}

// ── Pagination ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListOrdersParams {
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page. Defaults to 20, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
    pub customer_id: Option<Uuid>,
    pub status: Option<String>,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListOrdersResponse {
    pub items: Vec<OrderResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

fn parse_status(raw: &str) -> Result<OrderStatus, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("Unknown order status '{}'", raw)))
}

async fn run_blocking<T, F>(service: web::Data<SharedOrderService>, f: F) -> Result<T, AppError>
where
    F: FnOnce(&SharedOrderService) -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    web::block(move || f(&service))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders/validate
///
/// Runs the admission rules without storing anything. A cart that breaks a
/// rule is still a 200 response, with `valid: false` and every violation.
#[utoipa::path(
    post,
    path = "/orders/validate",
    request_body = ValidateOrderRequest,
    responses(
        (status = 200, description = "Validation outcome", body = ValidationResponse),
        (status = 400, description = "Malformed request"),
    ),
    tag = "orders"
)]
pub async fn validate_order(
    service: web::Data<SharedOrderService>,
    body: web::Json<ValidateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let cart = Cart::from(body.into_inner());
    let result = service.validate(&cart);
    Ok(HttpResponse::Ok().json(ValidationResponse::from(result)))
}

/// POST /orders
///
/// Checkout. An admissible cart is stored as one order per cart line together
/// with an outbox event, in one transaction.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = PlaceOrderRequest,
    responses(
        (status = 201, description = "Orders created", body = PlaceOrderResponse),
        (status = 200, description = "Cart rejected by a business rule", body = ValidationResponse),
        (status = 400, description = "Malformed request"),
        (status = 429, description = "Too many checkouts for this customer"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn place_order(
    service: web::Data<SharedOrderService>,
    body: web::Json<PlaceOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let customer_id = body.customer_id;
    let cart = Cart {
        items: body.cart_items.into_iter().map(CartLineItem::from).collect(),
        total_price: body.total_price,
        delivery_region: body.delivery_region,
    };

    let outcome = run_blocking(service, move |svc| {
        Ok(svc.place_order(customer_id, cart)?)
    })
    .await?;

    Ok(match outcome {
        CheckoutOutcome::Accepted { order_ids, region } => {
            HttpResponse::Created().json(PlaceOrderResponse {
                order_ids,
                region: region.to_string(),
            })
        }
        CheckoutOutcome::Rejected(result) => {
            HttpResponse::Ok().json(ValidationResponse::from(result))
        }
    })
}

/// GET /orders/{id}
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    service: web::Data<SharedOrderService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let order = run_blocking(service, move |svc| Ok(svc.get_order(order_id)?)).await?;

    match order {
        Some(order) => Ok(HttpResponse::Ok().json(OrderResponse::from(order))),
        None => Err(AppError::NotFound),
    }
}

/// GET /orders
///
/// Newest orders first. Use `page` (1-based) and `limit` to paginate, and
/// `customer_id` / `status` to narrow the list.
#[utoipa::path(
    get,
    path = "/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 20, max 100)"),
        ("customer_id" = Option<Uuid>, Query, description = "Only orders of this customer"),
        ("status" = Option<String>, Query, description = "Only orders in this status"),
    ),
    responses(
        (status = 200, description = "Paginated list of orders", body = ListOrdersResponse),
        (status = 400, description = "Unknown status filter"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    service: web::Data<SharedOrderService>,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let page = params.page.max(1);
    let limit = params.limit.clamp(1, 100);
    let filter = OrderFilter {
        customer_id: params.customer_id,
        status: params.status.as_deref().map(parse_status).transpose()?,
    };

    let result = run_blocking(service, move |svc| Ok(svc.list_orders(&filter, page, limit)?)).await?;

    Ok(HttpResponse::Ok().json(ListOrdersResponse {
        items: result.items.into_iter().map(OrderResponse::from).collect(),
        total: result.total,
        page,
        limit,
    }))
}

/// PATCH /orders/{id}/status
#[utoipa::path(
    patch,
    path = "/orders/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = OrderResponse),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Transition not allowed from the current status"),
    ),
    tag = "orders"
)]
pub async fn update_order_status(
    service: web::Data<SharedOrderService>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let status = parse_status(&body.status)?;

    let order = run_blocking(service, move |svc| Ok(svc.update_status(order_id, status)?)).await?;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}
