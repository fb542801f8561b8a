use dotenvy::dotenv;
use meal_order_service::config::Settings;
use meal_order_service::{build_order_service, build_server, create_pool, run_migrations};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let settings = Settings::from_env()?;

    let pool = create_pool(&settings.database_url)?;
    run_migrations(&pool).map_err(|e| format!("Failed to run database migrations: {}", e))?;

    log::info!(
        "Starting server at http://{}:{} (max {} items, max value {}, {} checkouts per {:?})",
        settings.host,
        settings.port,
        settings.limits.max_cart_items,
        settings.limits.max_total_order_value,
        settings.checkout_rate_limit,
        settings.checkout_rate_window
    );

    let service = build_order_service(&settings, pool);
    build_server(service, &settings.host, settings.port)?.await?;
    Ok(())
}
