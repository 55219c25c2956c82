use std::sync::Arc;

use cachehunt_bot::api;
use cachehunt_bot::config::Config;
use cachehunt_bot::db::Database;
use cachehunt_bot::dispatch::Dispatcher;
use cachehunt_bot::metrics;
use cachehunt_bot::transport::HttpMessenger;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = Config::load();
    metrics::register_metrics();

    let db = Database::new(&config.database_url)
        .await
        .expect("Failed to initialize database");
    let db = Arc::new(db);

    let messenger = Arc::new(HttpMessenger::new(&config.messenger_url));
    let webhook_token = config.webhook_token.clone();
    let port = config.port;
    let admins = config.admin_ids.len();

    let dispatcher = Arc::new(Dispatcher::new(db, messenger, config));
    let app = api::router(dispatcher, webhook_token);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .expect("Failed to bind server port");

    tracing::info!(port, admins, "cachehunt bot listening");
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
