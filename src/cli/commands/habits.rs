use super::require_token;
use crate::client::{ApiClient, HabitPatch};
use crate::config::Config;

pub async fn cmd_habit_add(
    config: &Config,
    name: &str,
    category: Option<&str>,
    target: i32,
) -> anyhow::Result<()> {
    let token = require_token(config)?;
    let client = ApiClient::new(&config.client.server_url);

    let habit = client.create_habit(&token, name, category, target).await?;

    println!("✓ Added habit: {} (ID: {})", habit.name, habit.id);
    if let Some(category) = &habit.category {
        println!("  Category: {category}");
    }
    println!("  Target: {}/day", habit.target_per_day);
    Ok(())
}

pub async fn cmd_habit_list(config: &Config) -> anyhow::Result<()> {
    let token = require_token(config)?;
    let client = ApiClient::new(&config.client.server_url);

    let habits = client.list_habits(&token).await?;

    if habits.is_empty() {
        println!("No habits yet. Add one with 'habitrack habit add <name>'");
        return Ok(());
    }

    println!("Your habits:");
    println!("{:-<60}", "");
    for habit in habits {
        let category = habit.category.as_deref().unwrap_or("-");
        println!(
            "[{}] {} | {} | target {}/day",
            habit.id, habit.name, category, habit.target_per_day
        );
    }
    Ok(())
}

pub async fn cmd_habit_show(config: &Config, id: i32) -> anyhow::Result<()> {
    let token = require_token(config)?;
    let client = ApiClient::new(&config.client.server_url);

    let habit = client.get_habit(&token, id).await?;

    println!("Habit: {} (ID: {})", habit.name, habit.id);
    println!(
        "  Category: {}",
        habit.category.as_deref().unwrap_or("(none)")
    );
    println!("  Target: {}/day", habit.target_per_day);

    let entries = client.list_habit_progress(habit.id).await?;
    if entries.is_empty() {
        println!("  No progress logged yet.");
        return Ok(());
    }

    println!("  Progress:");
    for entry in entries {
        println!("    {} - {} done", entry.date_tracked, entry.amount_done);
    }
    Ok(())
}

pub async fn cmd_habit_update(
    config: &Config,
    id: i32,
    patch: HabitPatch,
) -> anyhow::Result<()> {
    if patch.name.is_none() && patch.category.is_none() && patch.target_per_day.is_none() {
        println!("Nothing to change. Pass --name, --category or --target.");
        return Ok(());
    }

    let token = require_token(config)?;
    let client = ApiClient::new(&config.client.server_url);

    let habit = client.update_habit(&token, id, &patch).await?;

    println!("✓ Updated habit: {} (ID: {})", habit.name, habit.id);
    println!(
        "  Category: {} | target {}/day",
        habit.category.as_deref().unwrap_or("(none)"),
        habit.target_per_day
    );
    Ok(())
}

pub async fn cmd_habit_remove(config: &Config, id: i32) -> anyhow::Result<()> {
    let token = require_token(config)?;
    let client = ApiClient::new(&config.client.server_url);

    client.delete_habit(&token, id).await?;

    println!("✓ Removed habit {id} and its progress entries");
    Ok(())
}
