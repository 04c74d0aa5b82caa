pub mod api;
pub mod config;
pub mod crypto;
pub mod db;
pub mod local;
pub mod token;

pub use db::DbPool;

use config::Config;
use token::TokenKeys;

/// Shared application state. Built once at startup and read-only afterwards;
/// nothing here is mutated across requests.
pub struct AppState {
    pub config: Config,
    pub db: DbPool,
    pub keys: TokenKeys,
}

impl AppState {
    pub fn new(config: Config, db: DbPool) -> Self {
        let keys = TokenKeys::new(&config.auth.jwt_secret, config.auth.token_ttl_days);
        Self { config, db, keys }
    }
}
