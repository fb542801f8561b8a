use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::region::Region;

/// A label parsed into a closed enumeration, or the raw text when it is not
/// part of that enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Code<T> {
    Known(T),
    Unknown(String),
}

impl<T: FromStr> Code<T> {
    pub fn parse(raw: &str) -> Self {
        raw.parse()
            .map(Code::Known)
            .unwrap_or_else(|_| Code::Unknown(raw.to_string()))
    }
}

impl<T> Code<T> {
    pub fn known(&self) -> Option<&T> {
        match self {
            Code::Known(value) => Some(value),
            Code::Unknown(_) => None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Code<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Code::Known(value) => value.fmt(f),
            Code::Unknown(raw) => f.write_str(raw),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    WeeklyMenu,
    SingleDay,
}

impl ItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::WeeklyMenu => "weekly_menu",
            ItemKind::SingleDay => "single_day",
        }
    }
}

impl FromStr for ItemKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekly_menu" | "weekly" => Ok(ItemKind::WeeklyMenu),
            "single_day" | "single" => Ok(ItemKind::SingleDay),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Portion size of a meal plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeCode {
    S,
    M,
    L,
    Xl,
    Xxl,
    XxlPlus,
    Custom,
}

impl SizeCode {
    pub fn as_str(self) -> &'static str {
        match self {
            SizeCode::S => "S",
            SizeCode::M => "M",
            SizeCode::L => "L",
            SizeCode::Xl => "XL",
            SizeCode::Xxl => "XXL",
            SizeCode::XxlPlus => "XXL+",
            SizeCode::Custom => "CUSTOM",
        }
    }
}

impl FromStr for SizeCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "S" => Ok(SizeCode::S),
            "M" => Ok(SizeCode::M),
            "L" => Ok(SizeCode::L),
            "XL" => Ok(SizeCode::Xl),
            "XXL" => Ok(SizeCode::Xxl),
            "XXL+" | "XXL_PLUS" => Ok(SizeCode::XxlPlus),
            "CUSTOM" => Ok(SizeCode::Custom),
            _ => Err(()),
        }
    }
}

impl fmt::Display for SizeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of a submitted cart. Carries no identity beyond its position.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLineItem {
    pub kind: Code<ItemKind>,
    pub size_code: Code<SizeCode>,
    /// Day labels picked for a weekly item, in the customer's order.
    pub selected_days: Option<Vec<String>>,
    /// Monday of the referenced weekly menu.
    pub menu_window_start: Option<NaiveDate>,
    /// Number of days the referenced menu offers.
    pub menu_day_count: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Preparing => "PREPARING",
            OrderStatus::OutForDelivery => "OUT_FOR_DELIVERY",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Preparing)
                | (Confirmed, Cancelled)
                | (Preparing, OutForDelivery)
                | (OutForDelivery, Delivered)
        )
    }
}

impl FromStr for OrderStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(OrderStatus::Pending),
            "CONFIRMED" => Ok(OrderStatus::Confirmed),
            "PREPARING" => Ok(OrderStatus::Preparing),
            "OUT_FOR_DELIVERY" => Ok(OrderStatus::OutForDelivery),
            "DELIVERED" => Ok(OrderStatus::Delivered),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            _ => Err(()),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a customer submits at checkout.
#[derive(Debug, Clone)]
pub struct Cart {
    pub items: Vec<CartLineItem>,
    /// Computed by the caller; not reconciled with catalog prices.
    pub total_price: BigDecimal,
    pub delivery_region: Option<String>,
}

/// An accepted checkout, ready to be persisted as one order per cart line.
#[derive(Debug, Clone)]
pub struct NewCheckout {
    pub customer_id: Uuid,
    pub items: Vec<CartLineItem>,
    pub total_price: BigDecimal,
    pub delivery_region: Option<String>,
    pub region: Region,
}

#[derive(Debug, Clone)]
pub struct MealOrderView {
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
}

#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub customer_id: Option<Uuid>,
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Clone)]
pub struct ListResult {
    pub items: Vec<MealOrderView>,
    pub total: i64,
}
