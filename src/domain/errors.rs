use std::time::Duration;

use thiserror::Error;

use super::order::OrderStatus;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Order not found")]
    NotFound,
    #[error("Cannot change order status from {from} to {to}")]
    InvalidTransition { from: String, to: OrderStatus },
    #[error("Too many requests, retry in {} s", .retry_after.as_secs())]
    RateLimited { retry_after: Duration },
    #[error("Internal error: {0}")]
    Internal(String),
}
