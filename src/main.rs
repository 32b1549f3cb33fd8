use ecommerce_api::config::configuration;
use ecommerce_api::db::establish_connection;
use ecommerce_api::startup::Application;
use ecommerce_api::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let subscriber = get_subscriber("ecommerce-api".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let config = configuration::Settings::new().expect("Failed to load configurations");
    let pool = establish_connection(&config.database.url);
    let port = 8080;

    let application = Application::build(port, pool, config.jwt.secret).await?;
    application.run_until_stopped().await?;
    Ok(())
}
