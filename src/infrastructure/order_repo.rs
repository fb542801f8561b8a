use chrono::Utc;
use diesel::pg::Pg;
use diesel::prelude::*;
use serde_json::json;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{ListResult, MealOrderView, NewCheckout, OrderFilter, OrderStatus};
use crate::domain::ports::OrderRepository;
use crate::schema::{meal_order_outbox, meal_orders};

use super::models::{MealOrderRow, NewMealOrderRow, NewOutboxEventRow};

const AGGREGATE_TYPE: &str = "MealOrder";

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn filtered(filter: &OrderFilter) -> meal_orders::BoxedQuery<'static, Pg> {
    let mut query = meal_orders::table.into_boxed();
    if let Some(customer_id) = filter.customer_id {
        query = query.filter(meal_orders::customer_id.eq(customer_id));
    }
    if let Some(status) = filter.status {
        query = query.filter(meal_orders::status.eq(status.as_str()));
    }
    query
}

impl OrderRepository for DieselOrderRepository {
    fn create_orders(&self, checkout: NewCheckout) -> Result<Vec<Uuid>, DomainError> {
        let mut conn = self.pool.get()?;
        let checkout_id = Uuid::new_v4();

        let rows: Vec<NewMealOrderRow> = checkout
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| NewMealOrderRow {
                id: Uuid::new_v4(),
                checkout_id,
                customer_id: checkout.customer_id,
                position: i as i32 + 1,
                kind: item.kind.to_string(),
                size_code: item.size_code.to_string(),
                selected_days: item.selected_days.clone().unwrap_or_default(),
                menu_window_start: item.menu_window_start,
                total_price: checkout.total_price.clone(),
                delivery_region: checkout.delivery_region.clone(),
                region: checkout.region.to_string(),
                status: OrderStatus::Pending.to_string(),
            })
            .collect();

        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. One order row per cart line
            diesel::insert_into(meal_orders::table)
                .values(&rows)
                .execute(conn)?;

            // 2. A single outbox event for the whole checkout, committed with
            //    the orders. CDC routes it to the topic named by `aggregate_type`.
            let order_payloads: Vec<serde_json::Value> = rows
                .iter()
                .map(|r| {
                    json!({
                        "order_id": r.id,
                        "position": r.position,
                        "kind": r.kind,
                        "size_code": r.size_code,
                        "selected_days": r.selected_days,
                        "menu_window_start": r.menu_window_start,
                    })
                })
                .collect();

            let event_payload = json!({
                "checkout_id": checkout_id,
                "customer_id": checkout.customer_id,
                "status": OrderStatus::Pending.as_str(),
                "total_price": checkout.total_price.to_string(),
                "delivery_region": checkout.delivery_region,
                "region": checkout.region.as_str(),
                "orders": order_payloads
            });

            diesel::insert_into(meal_order_outbox::table)
                .values(&NewOutboxEventRow {
                    id: Uuid::new_v4(),
                    aggregate_type: AGGREGATE_TYPE.to_string(),
                    aggregate_id: checkout_id.to_string(),
                    event_type: "OrderPlaced".to_string(),
                    payload: event_payload,
                })
                .execute(conn)?;

            Ok(rows.iter().map(|r| r.id).collect())
        })
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<MealOrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let order = meal_orders::table
            .filter(meal_orders::id.eq(id))
            .select(MealOrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(order.map(MealOrderView::from))
    }

    fn list(&self, filter: &OrderFilter, page: i64, limit: i64) -> Result<ListResult, DomainError> {
        let mut conn = self.pool.get()?;

        let offset = page.saturating_sub(1).saturating_mul(limit);
        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = filtered(filter).count().get_result(conn)?;

            let rows = filtered(filter)
                .select(MealOrderRow::as_select())
                .order((meal_orders::created_at.desc(), meal_orders::position.asc()))
                .limit(limit)
                .offset(offset)
                .load(conn)?;

            Ok(ListResult {
                items: rows.into_iter().map(MealOrderView::from).collect(),
                total,
            })
        })
    }

    fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<MealOrderView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let current: String = meal_orders::table
                .filter(meal_orders::id.eq(id))
                .select(meal_orders::status)
                .for_update()
                .first(conn)
                .optional()?
                .ok_or(DomainError::NotFound)?;

            let allowed = current
                .parse::<OrderStatus>()
                .map(|from| from.can_transition_to(status))
                .unwrap_or(false);
            if !allowed {
                return Err(DomainError::InvalidTransition {
                    from: current,
                    to: status,
                });
            }

            let row = diesel::update(meal_orders::table.filter(meal_orders::id.eq(id)))
                .set((
                    meal_orders::status.eq(status.as_str()),
                    meal_orders::updated_at.eq(Utc::now()),
                ))
                .returning(MealOrderRow::as_returning())
                .get_result(conn)?;

            diesel::insert_into(meal_order_outbox::table)
                .values(&NewOutboxEventRow {
                    id: Uuid::new_v4(),
                    aggregate_type: AGGREGATE_TYPE.to_string(),
                    aggregate_id: row.checkout_id.to_string(),
                    event_type: "OrderStatusChanged".to_string(),
                    payload: json!({
                        "order_id": row.id,
                        "checkout_id": row.checkout_id,
                        "customer_id": row.customer_id,
                        "previous_status": current,
                        "status": row.status,
                    }),
                })
                .execute(conn)?;

            Ok(MealOrderView::from(row))
        })
    }
}
