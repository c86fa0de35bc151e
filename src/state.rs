use crate::auth::TokenService;
use crate::config::Config;
use crate::db::Store;

/// Process-wide state shared by every request handler. Built once at
/// startup; the config and signing secret are read-only afterwards.
#[derive(Clone)]
pub struct SharedState {
    pub config: Config,

    pub store: Store,

    pub tokens: TokenService,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.database.path,
            config.database.max_connections,
            config.database.min_connections,
        )
        .await?;

        let tokens = TokenService::new(
            &config.auth.token_secret,
            config.auth.token_expiry_minutes,
        );

        Ok(Self {
            config,
            store,
            tokens,
        })
    }
}
