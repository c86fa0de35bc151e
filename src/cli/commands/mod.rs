mod account;
mod habits;
mod progress;
mod reset_db;

pub use account::{cmd_login, cmd_logout, cmd_register};
pub use habits::{
    cmd_habit_add, cmd_habit_list, cmd_habit_remove, cmd_habit_show, cmd_habit_update,
};
pub use progress::{cmd_progress_list, cmd_progress_log};
pub use reset_db::cmd_reset_db;

use crate::client::TokenFile;
use crate::config::Config;

/// Load the stored bearer token or tell the user to log in.
fn require_token(config: &Config) -> anyhow::Result<String> {
    TokenFile::new(config.token_file_path())
        .load()?
        .ok_or_else(|| {
            anyhow::anyhow!("Not logged in. Run 'habitrack login <username> <password>' first")
        })
}
