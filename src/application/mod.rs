pub mod order_service;
pub mod rate_limit;
