use crate::client::{ApiClient, TokenFile};
use crate::config::Config;

pub async fn cmd_register(
    config: &Config,
    username: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<()> {
    let client = ApiClient::new(&config.client.server_url);
    let user = client.register(username, email, password).await?;

    println!("✓ Registered {} <{}> (ID: {})", user.username, user.email, user.id);
    println!("  Log in with: habitrack login {} <password>", user.username);
    Ok(())
}

pub async fn cmd_login(config: &Config, username: &str, password: &str) -> anyhow::Result<()> {
    let client = ApiClient::new(&config.client.server_url);
    let grant = client.login(username, password).await?;

    let token_file = TokenFile::new(config.token_file_path());
    token_file.save(&grant.access_token)?;

    println!("✓ Logged in as {username}");
    Ok(())
}

/// Logout never talks to the server; tokens are stateless and simply
/// forgotten locally.
pub fn cmd_logout(config: &Config) -> anyhow::Result<()> {
    TokenFile::new(config.token_file_path()).clear()?;
    println!("Logged out.");
    Ok(())
}
