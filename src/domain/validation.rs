//! Admission rules applied to a cart before it becomes an order.
//!
//! Every rule runs on every call and the violations are collected, so a
//! customer sees all problems with a cart in a single response.

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;

use super::calendar::{is_day_orderable, NEXT_DAY_CUTOFF_HOUR};
use super::order::{CartLineItem, Code, ItemKind};
use super::region::{Region, RegionAliasTable};

/// Decimal places a stored price keeps.
pub const PRICE_SCALE: i64 = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationLimits {
    /// Maximum number of days a single weekly item may cover.
    pub max_quantity_per_item: usize,
    pub max_total_order_value: BigDecimal,
    pub max_cart_items: usize,
    /// Day count assumed for a weekly item that names neither its days nor
    /// its menu's length.
    pub default_days_per_item: usize,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_quantity_per_item: 50,
            max_total_order_value: BigDecimal::from(10_000),
            max_cart_items: 20,
            default_days_per_item: 5,
        }
    }
}

/// Outcome of validating a cart. Valid exactly when there are no errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    errors: Vec<String>,
    region: Region,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Canonical delivery region, for logging only.
    pub fn region(&self) -> Region {
        self.region
    }
}

#[derive(Debug, Clone, Default)]
pub struct OrderValidator {
    limits: ValidationLimits,
    aliases: RegionAliasTable,
}

impl OrderValidator {
    pub fn new(limits: ValidationLimits, aliases: RegionAliasTable) -> Self {
        Self { limits, aliases }
    }

    pub fn limits(&self) -> &ValidationLimits {
        &self.limits
    }

    pub fn canonical_region(&self, delivery_region: Option<&str>) -> Region {
        self.aliases.canonicalize(delivery_region)
    }

    pub fn validate(
        &self,
        items: &[CartLineItem],
        total_price: &BigDecimal,
        delivery_region: Option<&str>,
        now: NaiveDateTime,
    ) -> ValidationResult {
        let limits = &self.limits;
        let mut errors = Vec::new();

        if items.is_empty() {
            errors.push("Cart is empty".to_string());
        }
        if items.len() > limits.max_cart_items {
            errors.push(format!(
                "Cart cannot contain more than {} items",
                limits.max_cart_items
            ));
        }

        if *total_price > limits.max_total_order_value {
            errors.push(format!(
                "Total order value cannot exceed {} €",
                limits.max_total_order_value
            ));
        }
        if *total_price <= BigDecimal::from(0) {
            errors.push("Total order value must be greater than zero".to_string());
        }
        if total_price.with_scale(PRICE_SCALE) != *total_price {
            errors.push(format!(
                "Total order value cannot have more than {PRICE_SCALE} decimal places"
            ));
        }

        for (index, item) in items.iter().enumerate() {
            self.check_item(index + 1, item, now, &mut errors);
        }

        ValidationResult {
            errors,
            region: self.aliases.canonicalize(delivery_region),
        }
    }

    fn check_item(
        &self,
        position: usize,
        item: &CartLineItem,
        now: NaiveDateTime,
        errors: &mut Vec<String>,
    ) {
        let limits = &self.limits;

        if item.kind == Code::Known(ItemKind::WeeklyMenu) {
            let days = self.number_of_days(item);
            if days > limits.max_quantity_per_item {
                errors.push(format!(
                    "Item {position}: cannot order more than {} days",
                    limits.max_quantity_per_item
                ));
            }
            if days == 0 {
                errors.push(format!("Item {position}: must have at least one day"));
            }

            if let (Some(selected), Some(week_start)) =
                (&item.selected_days, item.menu_window_start)
            {
                let unavailable: Vec<&str> = selected
                    .iter()
                    .filter(|day| !is_day_orderable(day, week_start, now))
                    .map(String::as_str)
                    .collect();
                if !unavailable.is_empty() {
                    errors.push(format!(
                        "Item {position}: these days can no longer be ordered: {}. \
                         Same-day orders are not accepted and next-day orders close \
                         at {NEXT_DAY_CUTOFF_HOUR}:00 the day before",
                        unavailable.join(", ")
                    ));
                }
            }
        }

        if let Code::Unknown(raw) = &item.size_code {
            errors.push(format!("Item {position}: invalid size '{raw}'"));
        }
        if let Code::Unknown(raw) = &item.kind {
            errors.push(format!("Item {position}: invalid item type '{raw}'"));
        }
    }

    fn number_of_days(&self, item: &CartLineItem) -> usize {
        match (&item.selected_days, item.menu_day_count) {
            (Some(days), _) => days.len(),
            (None, Some(count)) => count as usize,
            (None, None) => self.limits.default_days_per_item,
        }
    }
}
