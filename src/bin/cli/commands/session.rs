use anyhow::{bail, Context, Result};

use wordwise_lib::commands::{self, Answer};
use wordwise_lib::study::{
    CriteriaSort, SessionSummary, SortCriterion, SortDirection, StudySettings, StudySource,
    WordSelection,
};
use wordwise_lib::validation::StudyQuestion;
use wordwise_lib::vocab::InteractionMode;

use crate::app::App;
use crate::render::terminal::{correctness, paint, Color};
use crate::OutputFormat;

/// Parse `criterion[:asc|desc]`
fn parse_sort(value: &str) -> Result<CriteriaSort> {
    let (name, direction) = match value.split_once(':') {
        Some((name, dir)) => (name, Some(dir)),
        None => (value, None),
    };
    let criterion = SortCriterion::parse(name)
        .with_context(|| format!("Unknown sort criterion '{}'", name))?;
    let direction = match direction.map(|d| d.to_lowercase()).as_deref() {
        None | Some("desc") => SortDirection::Descending,
        Some("asc") => SortDirection::Ascending,
        Some(other) => bail!("Unknown sort direction '{}' (asc or desc)", other),
    };
    Ok(CriteriaSort::new(criterion, direction))
}

fn print_question(question: &StudyQuestion, remaining: usize, use_color: bool) {
    println!(
        "[{}] {} {}",
        question.mode.as_str(),
        paint(&question.prompt, Color::BOLD, use_color),
        paint(&format!("({} left)", remaining), Color::DIM, use_color)
    );
    if !question.tiles.is_empty() {
        println!("  tiles: {}", question.tiles.join(" "));
    }
}

fn print_summary(summary: &SessionSummary, use_color: bool) {
    println!(
        "{} {}/{} correct over {} word(s)",
        paint(&format!("Session {:?}.", summary.status), Color::BOLD, use_color),
        summary.correct,
        summary.answered,
        summary.rows
    );
    if summary.quit_rows > 0 {
        println!("  {} word(s) left unanswered", summary.quit_rows);
    }
}

#[allow(clippy::too_many_arguments)]
pub fn run_create(
    app: &App,
    name: &str,
    tables: &[String],
    count: Option<usize>,
    words: &[String],
    modes: &[String],
    sorts: &[String],
    format: &OutputFormat,
) -> Result<()> {
    let tables = app.find_tables(tables)?;

    let selection = if words.is_empty() {
        WordSelection::WordCount(count.unwrap_or(app.config.session.word_count))
    } else {
        let ids = words
            .iter()
            .map(|w| app.find_row_in(&tables, w))
            .collect::<Result<Vec<_>>>()?;
        WordSelection::ManualWordIds(ids)
    };
    let sources = tables
        .iter()
        .map(|t| StudySource {
            table_id: t.id,
            relation_ids: Vec::new(),
        })
        .collect();

    let mut settings = StudySettings::new(name.to_string(), sources, selection);
    settings.modes = modes
        .iter()
        .map(|m| InteractionMode::parse(m).with_context(|| format!("Unknown mode '{}'", m)))
        .collect::<Result<_>>()?;
    settings.criteria_sorts = sorts.iter().map(|s| parse_sort(s)).collect::<Result<_>>()?;

    let settings = commands::create_study_settings(app.repo(), settings)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&settings)?),
        OutputFormat::Plain => println!("Saved study settings {} ({})", settings.name, settings.id),
    }
    Ok(())
}

pub fn run_start(app: &App, settings: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let settings = app.find_settings(settings)?;
    let mut rng = rand::thread_rng();
    let progress = commands::start_session(
        app.repo(),
        &app.clock,
        settings.id,
        &app.config.priority,
        &mut rng,
    )?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&progress)?),
        OutputFormat::Plain => {
            println!("Session {} with {} question(s)", progress.id, progress.queue.len());
            if let Some(question) = progress.current() {
                print_question(question, progress.remaining(), use_color);
            }
        }
    }
    Ok(())
}

pub fn run_answer(
    app: &App,
    session: &str,
    response: Option<String>,
    graded: Option<bool>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let progress = app.find_session(session)?;
    let answer = match (response, graded) {
        (_, Some(correct)) => Answer::Graded(correct),
        (Some(text), None) => Answer::Response(text),
        (None, None) => bail!("Give a response, or --correct / --wrong for self-graded cards"),
    };

    let outcome = commands::answer_question(app.repo(), &app.clock, progress.id, answer)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        OutputFormat::Plain => {
            match &outcome.expected {
                Some(expected) if !outcome.correct => {
                    println!("{} (expected: {})", correctness(false, use_color), expected)
                }
                _ => println!("{}", correctness(outcome.correct, use_color)),
            }
            if let Some(next) = &outcome.next {
                print_question(next, outcome.remaining, use_color);
            }
            if let Some(summary) = &outcome.summary {
                print_summary(summary, use_color);
            }
        }
    }
    Ok(())
}

pub fn run_quit(app: &App, session: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let progress = app.find_session(session)?;
    let summary = commands::quit_study_session(app.repo(), &app.clock, progress.id)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Plain => print_summary(&summary, use_color),
    }
    Ok(())
}
