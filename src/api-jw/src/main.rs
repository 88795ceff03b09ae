use common_jw::{get_api_bind_addr, get_db_pool, setup_logging};

use api_jw::routes;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    setup_logging("api_jw=debug,tower_http=debug");

    let pool = get_db_pool().await;
    let app = routes::router().with_state(pool);

    let addr = get_api_bind_addr().expect("Invalid HOST or PORT");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind to address {}: {}", addr, e));
    tracing::info!("API server listening on {}", addr);
    axum::serve(listener, app).await.unwrap();
}
