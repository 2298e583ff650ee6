use anyhow::{Context, Result};

use wordwise_lib::anki::algorithm::format_interval;
use wordwise_lib::anki::{AnkiConfig, AnkiGrade};
use wordwise_lib::commands;

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

pub fn run_create(
    app: &App,
    name: &str,
    tables: &[String],
    new_per_day: Option<u32>,
    reviews_per_day: Option<u32>,
    format: &OutputFormat,
) -> Result<()> {
    let tables = app.find_tables(tables)?;
    let defaults = app.config.anki;
    let config = AnkiConfig {
        new_cards_per_day: new_per_day.unwrap_or(defaults.new_cards_per_day),
        max_reviews_per_day: reviews_per_day.unwrap_or(defaults.max_reviews_per_day),
    };
    let table_ids = tables.iter().map(|t| t.id).collect();
    let deck = commands::create_anki_deck(app.repo(), name.to_string(), table_ids, config)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&deck)?),
        OutputFormat::Plain => println!(
            "Created deck {} ({} new / {} reviews per day)",
            deck.name, deck.anki_config.new_cards_per_day, deck.anki_config.max_reviews_per_day
        ),
    }
    Ok(())
}

pub fn run_due(app: &App, deck: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let deck = app.find_deck(deck)?;
    let view = commands::anki_due(app.repo(), &app.clock, deck.id)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        OutputFormat::Plain => {
            println!(
                "{}: {} due, {} new ({} today)",
                paint(&view.deck_name, Color::BOLD, use_color),
                view.summary.due_count,
                view.summary.new_count,
                view.summary.clamped_new_count
            );
            for card in &view.cards {
                let tag = if card.due_date.is_some() {
                    paint("due", Color::YELLOW, use_color)
                } else {
                    paint("new", Color::GREEN, use_color)
                };
                println!(
                    "  [{}] {:<24} again {} · hard {} · good {} · easy {}",
                    tag,
                    card.label,
                    card.preview[0],
                    card.preview[1],
                    card.preview[2],
                    card.preview[3]
                );
            }
        }
    }
    Ok(())
}

pub fn run_review(
    app: &App,
    deck: &str,
    row: &str,
    grade: &str,
    format: &OutputFormat,
) -> Result<()> {
    let deck = app.find_deck(deck)?;
    let grade = AnkiGrade::parse(grade)
        .with_context(|| format!("Unknown grade '{}' (again, hard, good, easy or 1-4)", grade))?;
    let tables = app.repo().get_tables(&deck.table_ids)?;
    let row_id = app.find_row_in(&tables, row)?;

    let result = commands::review_anki_card(app.repo(), &app.clock, deck.id, row_id, grade)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Plain => println!(
            "Next review in {} (due {}, ease {:.2})",
            format_interval(result.interval),
            result.due_date.format("%Y-%m-%d"),
            result.ease_factor
        ),
    }
    Ok(())
}
