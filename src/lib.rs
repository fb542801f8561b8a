pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

#[cfg(test)]
mod test_support;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::order_service::{OrderService, SharedOrderService};
use application::rate_limit::RateLimiter;
use config::Settings;
use domain::clock::SystemClock;
use domain::region::RegionAliasTable;
use domain::validation::OrderValidator;
use handlers::ApiDoc;
use infrastructure::order_repo::DieselOrderRepository;

pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub type MigrationError = Box<dyn std::error::Error + Send + Sync>;

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), MigrationError> {
    let mut conn = pool.get()?;
    conn.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}

/// Wire the order service to PostgreSQL, the system clock and the configured
/// admission limits.
pub fn build_order_service(settings: &Settings, pool: DbPool) -> SharedOrderService {
    OrderService::new(
        Box::new(DieselOrderRepository::new(pool)),
        OrderValidator::new(settings.limits.clone(), RegionAliasTable::default()),
        Box::new(SystemClock),
        RateLimiter::new(settings.checkout_rate_limit, settings.checkout_rate_window),
    )
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    service: SharedOrderService,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let service = web::Data::new(service);
    let openapi = ApiDoc::openapi();
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .wrap(Logger::default())
            .configure(handlers::configure)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
