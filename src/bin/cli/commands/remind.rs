use anyhow::Result;

use wordwise_lib::commands;

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let notifications = commands::anki_reminders(app.repo(), &app.clock)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&notifications)?);
        }
        OutputFormat::Plain => {
            if notifications.is_empty() {
                println!("Nothing to review");
            }
            for notification in &notifications {
                println!(
                    "{} {}",
                    paint(&notification.title, Color::BOLD, use_color),
                    notification.message
                );
            }
        }
    }
    Ok(())
}
