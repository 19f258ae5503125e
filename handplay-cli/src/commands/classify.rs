use super::{CommandResult, RecordedFrame};
use comfy_table::{presets::UTF8_FULL, Table};
use handplay_core::{classifier, LANDMARK_COUNT};
use std::path::Path;

/// Print the pose and gesture flags of every hand in a single-frame JSON file.
pub async fn classify_frame(path: &Path) -> CommandResult {
    let content = tokio::fs::read_to_string(path).await?;
    let frame: RecordedFrame = serde_json::from_str(&content)?;

    if frame.hands.is_empty() {
        println!("No hands in frame.");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Hand", "Landmarks", "Pose", "Start", "Pointing", "Restart"]);

    let flag = |set: bool| if set { "yes" } else { "-" };
    for (i, hand) in frame.hands.iter().enumerate() {
        if hand.len() != LANDMARK_COUNT {
            tracing::warn!("Hand {} has {} landmarks", i, hand.len());
        } else if let Some(landmark) = hand.first_out_of_frame() {
            tracing::warn!("Hand {} has {} outside the frame", i, landmark);
        }
        table.add_row(vec![
            i.to_string(),
            hand.len().to_string(),
            classifier::classify(hand).to_string(),
            flag(classifier::is_start_pose(hand)).to_string(),
            flag(classifier::is_pointing_pose(hand)).to_string(),
            flag(classifier::is_restart_gesture(hand)).to_string(),
        ]);
    }

    println!("{table}");
    Ok(())
}
