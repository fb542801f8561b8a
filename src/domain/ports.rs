use uuid::Uuid;

use super::errors::DomainError;
use super::order::{ListResult, MealOrderView, NewCheckout, OrderFilter, OrderStatus};

pub trait OrderRepository: Send + Sync + 'static {
    /// Persists one order per cart line and returns their ids in cart order.
    fn create_orders(&self, checkout: NewCheckout) -> Result<Vec<Uuid>, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<MealOrderView>, DomainError>;
    fn list(&self, filter: &OrderFilter, page: i64, limit: i64) -> Result<ListResult, DomainError>;
    /// Sets the status if the current one allows it and returns the updated order.
    fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<MealOrderView, DomainError>;
}

impl<T: OrderRepository + ?Sized> OrderRepository for Box<T> {
    fn create_orders(&self, checkout: NewCheckout) -> Result<Vec<Uuid>, DomainError> {
        (**self).create_orders(checkout)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<MealOrderView>, DomainError> {
        (**self).find_by_id(id)
    }

    fn list(&self, filter: &OrderFilter, page: i64, limit: i64) -> Result<ListResult, DomainError> {
        (**self).list(filter, page, limit)
    }

    fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<MealOrderView, DomainError> {
        (**self).update_status(id, status)
    }
}
