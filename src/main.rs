use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::trace::TraceLayer;

use skytransfer_backend::api::{self, AppState};
use skytransfer_backend::config::Config;
use skytransfer_backend::notifications::{
    LogEmailChannel, LogSmsChannel, NotificationDispatcher,
};
use skytransfer_backend::payments::providers::PaytrProvider;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load configuration; missing merchant credentials abort startup here
    let config = Config::from_env()?;

    tracing::info!("Starting SkyTransfer backend");
    tracing::info!("Environment: {}", config.server.environment);
    tracing::info!("Gateway test mode: {}", config.paytr.test_mode);

    let gateway = Arc::new(PaytrProvider::new(config.paytr.clone())?);
    let notifier = Arc::new(NotificationDispatcher::new(vec![
        Box::new(LogEmailChannel {
            sender: config.notifications.email_sender.clone(),
        }),
        Box::new(LogSmsChannel {
            sender_id: config.notifications.sms_sender_id.clone(),
        }),
    ]));

    let state = AppState {
        config: config.clone(),
        gateway,
        notifier,
    };

    let app = api::router(state).layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
