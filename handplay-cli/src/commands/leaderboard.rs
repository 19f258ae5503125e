use super::CommandResult;
use crate::config::CliConfig;
use comfy_table::{presets::UTF8_FULL, Table};
use handplay_core::LeaderboardStore;

pub fn show_leaderboard(settings: &CliConfig, limit: Option<usize>) -> CommandResult {
    let store = LeaderboardStore::new(settings.data_dir.join(&settings.game.leaderboard.file_name));
    let entries = store.read_all()?;

    if entries.is_empty() {
        println!("No finished runs yet.");
        println!("Ledger: {}", store.path().display());
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Rank", "Name", "Time"]);

    let shown = limit.unwrap_or(entries.len());
    for (rank, entry) in entries.iter().take(shown).enumerate() {
        table.add_row(vec![
            (rank + 1).to_string(),
            entry.name.clone(),
            format!("{:.2} s", entry.duration_seconds),
        ]);
    }

    println!("{table}");
    if shown < entries.len() {
        println!("Showing {} of {} runs", shown, entries.len());
    }

    Ok(())
}
