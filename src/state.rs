use sqlx::PgPool;

use crate::config::cors::CorsConfig;
use crate::config::server::ServerConfig;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub cors_config: CorsConfig,
    pub server_config: ServerConfig,
}

pub async fn init_app_state() -> AppState {
    AppState {
        db: campanile_db::init_db_pool().await,
        cors_config: CorsConfig::from_env(),
        server_config: ServerConfig::from_env(),
    }
}
