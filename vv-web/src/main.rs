// main.rs only boots the router and server

mod handlers;
mod router;
mod state;
mod templates;

use std::env;

use state::AppState;
use tracing::info;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let app = router::app_router(AppState::new());

    let port: u16 = env::var("PORT").ok().and_then(|s| s.parse().ok()).unwrap_or(3000);
    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("failed to bind server address");

    info!("web server listening on {} (visit http://127.0.0.1:{})", bind_addr, port);
    axum::serve(listener, app).await.expect("server error");
}
