use chrono::NaiveDate;

use crate::client::ApiClient;
use crate::config::Config;

pub async fn cmd_progress_log(
    config: &Config,
    habit_id: i32,
    amount: i32,
    date: Option<NaiveDate>,
) -> anyhow::Result<()> {
    let client = ApiClient::new(&config.client.server_url);

    let entry = client.log_progress(habit_id, date, amount).await?;

    println!(
        "✓ Logged {} for habit {} on {}",
        entry.amount_done, entry.habit_id, entry.date_tracked
    );
    Ok(())
}

pub async fn cmd_progress_list(config: &Config, habit: Option<i32>) -> anyhow::Result<()> {
    let client = ApiClient::new(&config.client.server_url);

    let entries = match habit {
        Some(habit_id) => client.list_habit_progress(habit_id).await?,
        None => client.list_all_progress().await?,
    };

    if entries.is_empty() {
        println!("No progress entries.");
        return Ok(());
    }

    println!("Progress:");
    println!("{:-<60}", "");
    for entry in entries {
        println!(
            "[{}] habit {} | {} | {} done",
            entry.id, entry.habit_id, entry.date_tracked, entry.amount_done
        );
    }
    Ok(())
}
