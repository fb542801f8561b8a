use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::order::MealOrderView;
use crate::schema::{meal_order_outbox, meal_orders};

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = meal_orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MealOrderRow {
    pub id: Uuid,
    pub checkout_id: Uuid,
    pub customer_id: Uuid,
    pub position: i32,
    pub kind: String,
    pub size_code: String,
    pub selected_days: Vec<String>,
    pub menu_window_start: Option<NaiveDate>,
    pub total_price: BigDecimal,
    pub delivery_region: Option<String>,
    pub region: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MealOrderRow> for MealOrderView {
    fn from(row: MealOrderRow) -> Self {
        MealOrderView {
            id: row.id,
            checkout_id: row.checkout_id,
            customer_id: row.customer_id,
            position: row.position,
            kind: row.kind,
            size_code: row.size_code,
            selected_days: row.selected_days,
            menu_window_start: row.menu_window_start,
            total_price: row.total_price,
            delivery_region: row.delivery_region,
            region: row.region,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = meal_orders)]
pub struct NewMealOrderRow {
    pub id: Uuid,
    pub checkout_id: Uuid,
    pub customer_id: Uuid,
    pub position: i32,
    pub kind: String,
    pub size_code: String,
    pub selected_days: Vec<String>,
    pub menu_window_start: Option<NaiveDate>,
    pub total_price: BigDecimal,
    pub delivery_region: Option<String>,
    pub region: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = meal_order_outbox)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OutboxEventRow {
    pub id: Uuid,
    pub aggregate_type: String,
    pub aggregate_id: String,
    pub event_type: String,
    pub payload: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = meal_order_outbox)]
pub struct NewOutboxEventRow {
    pub id: Uuid,
    pub aggregate_type: String,
    pub aggregate_id: String,
    pub event_type: String,
    pub payload: Value,
}
