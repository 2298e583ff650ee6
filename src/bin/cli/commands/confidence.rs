use anyhow::{Context, Result};

use wordwise_lib::commands::{self, ConfidenceOverview};
use wordwise_lib::confidence::FlashcardStatus;

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

fn print_overview(
    overview: &ConfidenceOverview,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(overview)?);
        }
        OutputFormat::Plain => {
            println!(
                "{} ({} cards)",
                paint(&overview.name, Color::BOLD, use_color),
                overview.queue_len
            );
            let counts: Vec<String> = overview
                .status_counts
                .iter()
                .filter(|(_, count)| *count > 0)
                .map(|(status, count)| format!("{} {}", status.as_str(), count))
                .collect();
            println!("  {}", paint(&counts.join(" · "), Color::DIM, use_color));

            match &overview.current {
                Some(card) => println!(
                    "  Next: {} [{}, seen {}x]",
                    paint(&card.label, Color::CYAN, use_color),
                    card.status.as_str(),
                    card.viewed
                ),
                None => println!("  Queue is empty"),
            }
        }
    }
    Ok(())
}

pub fn run_create(
    app: &App,
    name: &str,
    tables: &[String],
    new_words: usize,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let tables = app.find_tables(tables)?;
    let progress = commands::create_confidence_review(
        app.repo(),
        &app.clock,
        name.to_string(),
        tables.iter().map(|t| t.id).collect(),
        new_words,
        &app.config.priority,
    )?;

    let overview = commands::show_confidence_review(app.repo(), progress.id)?;
    print_overview(&overview, format, use_color)
}

pub fn run_show(app: &App, review: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let progress = app.find_review(review)?;
    let overview = commands::show_confidence_review(app.repo(), progress.id)?;
    print_overview(&overview, format, use_color)
}

/// Grade a card; without `row` the card at the front of the queue is graded
pub fn run_grade(
    app: &App,
    review: &str,
    grade: &str,
    row: Option<&str>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let progress = app.find_review(review)?;
    let grade = FlashcardStatus::parse(grade)
        .filter(|g| *g != FlashcardStatus::New)
        .with_context(|| {
            format!(
                "Unknown grade '{}' (again, hard, good, easy, perfect, superb)",
                grade
            )
        })?;

    let row_id = match row {
        Some(key) => {
            let tables = app.repo().get_tables(&progress.table_ids)?;
            app.find_row_in(&tables, key)?
        }
        None => progress.front().context("Review queue is empty")?,
    };

    let overview = commands::grade_confidence_card(app.repo(), progress.id, row_id, grade)?;
    print_overview(&overview, format, use_color)
}

pub fn run_add_words(app: &App, review: &str, format: &OutputFormat) -> Result<()> {
    let progress = app.find_review(review)?;
    let added = commands::add_confidence_words(
        app.repo(),
        &app.clock,
        progress.id,
        &app.config.priority,
    )?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "added": added })),
        OutputFormat::Plain => println!("Added {} word(s) to {}", added, progress.name),
    }
    Ok(())
}
