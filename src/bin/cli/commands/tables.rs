use anyhow::Result;

use wordwise_lib::commands;
use wordwise_lib::vocab::stats::MAX_LEVEL;

use crate::app::App;
use crate::render::terminal::{level_pips, paint, score_bar, truncate, Color};
use crate::OutputFormat;

pub fn run_list(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let tables = commands::list_tables(app.repo())?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&tables)?);
        }
        OutputFormat::Plain => {
            if tables.is_empty() {
                println!("(no tables)");
            }
            for table in &tables {
                println!(
                    "{} ({} rows, {} relations) {}",
                    paint(&table.name, Color::BOLD, use_color),
                    table.row_count,
                    table.relation_count,
                    paint(&table.id.to_string(), Color::DIM, use_color)
                );
            }
        }
    }

    Ok(())
}

pub fn run_priority(
    app: &App,
    table: &str,
    limit: usize,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let table = app.find_table(table)?;
    let ranked = commands::rank_table(app.repo(), &app.clock, table.id, &app.config.priority)?;
    let ranked: Vec<_> = ranked.into_iter().take(limit).collect();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&ranked)?);
        }
        OutputFormat::Plain => {
            println!("{}", paint(&table.name, Color::BOLD, use_color));
            for row in &ranked {
                println!(
                    "  {:.3} {}  {}  {:<24} rp {:>3}",
                    row.score,
                    paint(&score_bar(row.score, 10), Color::CYAN, use_color),
                    level_pips(row.level, MAX_LEVEL),
                    truncate(&row.label, 24),
                    row.rank_point
                );
            }
        }
    }

    Ok(())
}

pub fn run_validate(
    app: &App,
    table: &str,
    relation: Option<&str>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let table = app.find_table(table)?;
    let relation_id = match relation {
        Some(key) => Some(
            table
                .relations
                .iter()
                .find(|r| r.id.to_string() == key || r.name.eq_ignore_ascii_case(key))
                .map(|r| r.id)
                .ok_or_else(|| {
                    anyhow::anyhow!("No relation matching '{}' in {}", key, table.name)
                })?,
        ),
        None => None,
    };
    let reports = commands::validate_rows(app.repo(), table.id, relation_id)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        OutputFormat::Plain => {
            for report in &reports {
                let status = if report.invalid_rows.is_empty() {
                    paint("all rows valid", Color::GREEN, use_color)
                } else {
                    paint(
                        &format!("{} invalid row(s)", report.invalid_rows.len()),
                        Color::YELLOW,
                        use_color,
                    )
                };
                println!("{}: {}", paint(&report.relation_name, Color::BOLD, use_color), status);

                for result in &report.invalid_rows {
                    let label = table
                        .row(result.row_id)
                        .map(|row| commands::row_label(&table, row))
                        .unwrap_or_else(|| result.row_id.to_string());
                    println!("  {}", label);
                    for issue in &result.issues {
                        let modes: Vec<&str> =
                            issue.affected_modes.iter().map(|m| m.as_str()).collect();
                        let detail = issue.message.as_deref().unwrap_or("missing value");
                        println!("    {} [{}]: {}", issue.column_id, modes.join(", "), detail);
                    }
                }
            }
        }
    }

    Ok(())
}

pub fn run_reset(app: &App, table: &str, row: Option<&str>, format: &OutputFormat) -> Result<()> {
    let table = app.find_table(table)?;
    let row_id = row.map(|key| app.find_row(&table, key)).transpose()?;
    let count = commands::reset_rows(app.repo(), table.id, row_id)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "tableId": table.id.to_string(), "reset": count }));
        }
        OutputFormat::Plain => {
            println!("Reset progress of {} row(s) in {}", count, table.name);
        }
    }

    Ok(())
}
