use uuid::Uuid;

use super::rate_limit::RateLimiter;
use crate::domain::clock::Clock;
use crate::domain::errors::DomainError;
use crate::domain::order::{Cart, ListResult, MealOrderView, NewCheckout, OrderFilter, OrderStatus};
use crate::domain::ports::OrderRepository;
use crate::domain::region::Region;
use crate::domain::validation::{OrderValidator, ValidationResult};

#[derive(Debug)]
pub enum CheckoutOutcome {
    Accepted { order_ids: Vec<Uuid>, region: Region },
    Rejected(ValidationResult),
}

/// The service as shared by the HTTP layer, independent of the storage backend.
pub type SharedOrderService = OrderService<Box<dyn OrderRepository>>;

pub struct OrderService<R> {
    repo: R,
    validator: OrderValidator,
    clock: Box<dyn Clock>,
    checkout_limiter: RateLimiter,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(
        repo: R,
        validator: OrderValidator,
        clock: Box<dyn Clock>,
        checkout_limiter: RateLimiter,
    ) -> Self {
        Self {
            repo,
            validator,
            clock,
            checkout_limiter,
        }
    }

    /// Checks a cart against the admission rules at the current time.
    pub fn validate(&self, cart: &Cart) -> ValidationResult {
        self.validator.validate(
            &cart.items,
            &cart.total_price,
            cart.delivery_region.as_deref(),
            self.clock.now(),
        )
    }

    /// Validates the cart and, if it is admissible, stores one order per
    /// cart line. A rejected cart is a normal outcome, not an error.
    ///
    /// Every checkout attempt counts against the customer's rate limit,
    /// including carts the rules reject.
    pub fn place_order(&self, customer_id: Uuid, cart: Cart) -> Result<CheckoutOutcome, DomainError> {
        self.checkout_limiter
            .check(&customer_id.to_string())
            .map_err(|retry_after| {
                log::warn!("Checkout rate limit hit for customer {}", customer_id);
                DomainError::RateLimited { retry_after }
            })?;

        let result = self.validator.validate(
            &cart.items,
            &cart.total_price,
            cart.delivery_region.as_deref(),
            self.clock.now(),
        );
        if !result.is_valid() {
            log::info!(
                "Rejected checkout for customer {} (region {}): {}",
                customer_id,
                result.region(),
                result.errors().join("; ")
            );
            return Ok(CheckoutOutcome::Rejected(result));
        }

        let region = result.region();
        let order_ids = self.repo.create_orders(NewCheckout {
            customer_id,
            items: cart.items,
            total_price: cart.total_price,
            delivery_region: cart.delivery_region,
            region,
        })?;
        log::info!(
            "Accepted checkout for customer {} (region {}): {} order(s)",
            customer_id,
            region,
            order_ids.len()
        );
        Ok(CheckoutOutcome::Accepted { order_ids, region })
    }

    pub fn get_order(&self, id: Uuid) -> Result<Option<MealOrderView>, DomainError> {
        self.repo.find_by_id(id)
    }

    pub fn list_orders(
        &self,
        filter: &OrderFilter,
        page: i64,
        limit: i64,
    ) -> Result<ListResult, DomainError> {
        self.repo.list(filter, page, limit)
    }

    pub fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<MealOrderView, DomainError> {
        let order = self.repo.update_status(id, status)?;
        log::info!("Order {} moved to {}", id, status);
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;
    use std::time::Duration;

    use bigdecimal::BigDecimal;
    use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
    use parking_lot::Mutex;

    use super::*;
    use crate::domain::clock::FixedClock;
    use crate::domain::order::{CartLineItem, Code, ItemKind, SizeCode};
    use crate::test_support::InMemoryOrderRepository;

    fn monday_at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn service(repo: InMemoryOrderRepository, budget: u32) -> OrderService<InMemoryOrderRepository> {
        OrderService::new(
            repo,
            OrderValidator::default(),
            Box::new(FixedClock(monday_at(10))),
            RateLimiter::new(budget, Duration::from_secs(60)),
        )
    }

    fn cart(items: usize, total: &str) -> Cart {
        let item = CartLineItem {
            kind: Code::Known(ItemKind::WeeklyMenu),
            size_code: Code::Known(SizeCode::Xl),
            selected_days: Some(vec!["Utorok".to_string(), "Streda".to_string()]),
            menu_window_start: NaiveDate::from_ymd_opt(2026, 10, 19),
            menu_day_count: Some(5),
        };
        Cart {
            items: vec![item; items],
            total_price: BigDecimal::from_str(total).unwrap(),
            delivery_region: Some("Trnava".to_string()),
        }
    }

    #[test]
    fn accepted_checkout_stores_one_order_per_line() {
        let repo = InMemoryOrderRepository::default();
        let svc = service(repo.clone(), 10);

        let outcome = svc.place_order(Uuid::new_v4(), cart(3, "150")).unwrap();

        match outcome {
            CheckoutOutcome::Accepted { order_ids, region } => {
                assert_eq!(order_ids.len(), 3);
                assert_eq!(region, Region::Trnava);
            }
            other => panic!("expected acceptance, got {other:?}"),
        }
        assert_eq!(repo.len(), 3);
    }

    #[test]
    fn rejected_checkout_stores_nothing() {
        let repo = InMemoryOrderRepository::default();
        let svc = service(repo.clone(), 10);

        let outcome = svc.place_order(Uuid::new_v4(), cart(0, "150")).unwrap();

        assert!(matches!(outcome, CheckoutOutcome::Rejected(r) if !r.is_valid()));
        assert_eq!(repo.len(), 0);
    }

    #[test]
    fn checkout_is_rate_limited_per_customer() {
        let svc = service(InMemoryOrderRepository::default(), 2);
        let customer = Uuid::new_v4();

        svc.place_order(customer, cart(1, "50")).unwrap();
        svc.place_order(customer, cart(1, "50")).unwrap();
        let err = svc.place_order(customer, cart(1, "50")).unwrap_err();

        assert!(matches!(err, DomainError::RateLimited { .. }));
        assert!(svc.place_order(Uuid::new_v4(), cart(1, "50")).is_ok());
    }

    #[test]
    fn rejected_checkouts_count_against_the_rate_limit() {
        let svc = service(InMemoryOrderRepository::default(), 1);
        let customer = Uuid::new_v4();

        let outcome = svc.place_order(customer, cart(0, "50")).unwrap();
        assert!(matches!(outcome, CheckoutOutcome::Rejected(_)));

        let err = svc.place_order(customer, cart(1, "50")).unwrap_err();
        assert!(matches!(err, DomainError::RateLimited { .. }));
    }

    /// Wall clock that falls back one hour on every reading.
    struct RewindingClock(Mutex<NaiveDateTime>);

    impl Clock for RewindingClock {
        fn now(&self) -> NaiveDateTime {
            let mut now = self.0.lock();
            *now -= TimeDelta::hours(1);
            *now
        }
    }

    #[test]
    fn wall_clock_going_back_does_not_extend_the_rate_limit() {
        let svc = OrderService::new(
            InMemoryOrderRepository::default(),
            OrderValidator::default(),
            Box::new(RewindingClock(Mutex::new(monday_at(11)))),
            RateLimiter::new(1, Duration::from_millis(50)),
        );
        let customer = Uuid::new_v4();

        svc.place_order(customer, cart(1, "50")).unwrap();
        std::thread::sleep(Duration::from_millis(60));

        assert!(svc.place_order(customer, cart(1, "50")).is_ok());
    }

    #[test]
    fn validate_uses_the_injected_clock() {
        let svc = service(InMemoryOrderRepository::default(), 10);
        let mut late = cart(1, "50");
        late.items[0].selected_days = Some(vec!["Pondelok".to_string()]);

        assert!(svc.validate(&cart(1, "50")).is_valid());
        assert!(!svc.validate(&late).is_valid());
    }

    #[test]
    fn status_updates_respect_transitions() {
        let repo = InMemoryOrderRepository::default();
        let svc = service(repo, 10);
        let CheckoutOutcome::Accepted { order_ids, .. } =
            svc.place_order(Uuid::new_v4(), cart(1, "50")).unwrap()
        else {
            panic!("checkout should be accepted");
        };
        let id = order_ids[0];

        let order = svc.update_status(id, OrderStatus::Confirmed).unwrap();
        assert_eq!(order.status, "CONFIRMED");

        let err = svc.update_status(id, OrderStatus::Delivered).unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));
        assert!(matches!(
            svc.update_status(Uuid::new_v4(), OrderStatus::Confirmed),
            Err(DomainError::NotFound)
        ));
    }
}
