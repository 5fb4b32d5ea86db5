use campanile::logging::init_tracing;
use campanile::router::init_router;
use campanile::state::init_app_state;
use dotenvy::dotenv;
use tracing::info;

#[tokio::main]
async fn main() {
    dotenv().ok();

    init_tracing();

    let state = init_app_state().await;
    let addr = state.server_config.bind_addr.clone();
    let app = init_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind server address");
    info!("Server running on http://{addr}");
    info!("Swagger UI available at http://{addr}/swagger-ui");
    info!("Scalar UI available at http://{addr}/scalar");
    axum::serve(listener, app).await.expect("Server error");
}
