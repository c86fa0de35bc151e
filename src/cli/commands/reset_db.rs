use crate::config::Config;
use crate::db::Store;

/// Drops every table and reruns the migrations from scratch. All user,
/// habit and progress data is lost.
pub async fn cmd_reset_db(config: &Config) -> anyhow::Result<()> {
    let store = Store::with_pool_options(
        &config.database.path,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await?;

    store.reset().await?;

    println!("✓ Database reset: {}", config.database.path);
    Ok(())
}
