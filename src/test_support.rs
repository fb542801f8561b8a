use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{ListResult, MealOrderView, NewCheckout, OrderFilter, OrderStatus};
use crate::domain::ports::OrderRepository;

/// Repository kept in memory, for service and handler tests.
#[derive(Clone, Default)]
pub struct InMemoryOrderRepository {
    orders: Arc<Mutex<Vec<MealOrderView>>>,
}

impl InMemoryOrderRepository {
    pub fn len(&self) -> usize {
        self.orders.lock().len()
    }
}

impl OrderRepository for InMemoryOrderRepository {
    fn create_orders(&self, checkout: NewCheckout) -> Result<Vec<Uuid>, DomainError> {
        let checkout_id = Uuid::new_v4();
        let mut orders = self.orders.lock();
        let mut ids = Vec::with_capacity(checkout.items.len());
        for (position, item) in checkout.items.iter().enumerate() {
            let id = Uuid::new_v4();
            orders.push(MealOrderView {
                id,
                checkout_id,
                customer_id: checkout.customer_id,
                position: position as i32 + 1,
                kind: item.kind.to_string(),
                size_code: item.size_code.to_string(),
                selected_days: item.selected_days.clone().unwrap_or_default(),
                menu_window_start: item.menu_window_start,
                total_price: checkout.total_price.clone(),
                delivery_region: checkout.delivery_region.clone(),
                region: checkout.region.to_string(),
                status: OrderStatus::Pending.to_string(),
                created_at: Utc::now(),
            });
            ids.push(id);
        }
        Ok(ids)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<MealOrderView>, DomainError> {
        Ok(self.orders.lock().iter().find(|o| o.id == id).cloned())
    }

    fn list(&self, filter: &OrderFilter, page: i64, limit: i64) -> Result<ListResult, DomainError> {
        let orders = self.orders.lock();
        let matching: Vec<&MealOrderView> = orders
            .iter()
            .filter(|o| filter.customer_id.map_or(true, |c| o.customer_id == c))
            .filter(|o| filter.status.map_or(true, |s| o.status == s.as_str()))
            .collect();
        let offset = usize::try_from(page.saturating_sub(1).saturating_mul(limit))
            .unwrap_or(usize::MAX);
        Ok(ListResult {
            total: matching.len() as i64,
            items: matching
                .into_iter()
                .rev()
                .skip(offset)
                .take(usize::try_from(limit).unwrap_or(0))
                .cloned()
                .collect(),
        })
    }

    fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<MealOrderView, DomainError> {
        let mut orders = self.orders.lock();
        let order = orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(DomainError::NotFound)?;
        let current: OrderStatus = order
            .status
            .parse()
            .map_err(|_| DomainError::Internal(format!("unknown status {}", order.status)))?;
        if !current.can_transition_to(status) {
            return Err(DomainError::InvalidTransition {
                from: order.status.clone(),
                to: status,
            });
        }
        order.status = status.to_string();
        Ok(order.clone())
    }
}
