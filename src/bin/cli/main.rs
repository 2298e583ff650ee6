mod app;
mod commands;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "wordwise-cli", about = "Vocabulary review and scheduling", version)]
struct Cli {
    /// Data directory (default: from config, else the platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Config file (default: <config dir>/wordwise/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// List vocabulary tables
    Tables,

    /// Rank the rows of a table by study priority
    Priority {
        /// Table name or id (case-insensitive prefix match)
        table: String,
        /// Maximum rows to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Check which rows can be asked in each interaction mode
    Validate {
        /// Table name or id
        table: String,
        /// Restrict to one relation (name or id)
        #[arg(long)]
        relation: Option<String>,
    },

    /// Confidence reviews
    #[command(subcommand)]
    Confidence(ConfidenceCommand),

    /// Anki decks
    #[command(subcommand)]
    Anki(AnkiCommand),

    /// Show reminders for decks with cards to study
    Remind,

    /// Study sessions
    #[command(subcommand)]
    Session(SessionCommand),

    /// Reset study progress of a table or one of its rows
    Reset {
        /// Table name or id
        table: String,
        /// Row id or cell value; all rows when omitted
        #[arg(long)]
        row: Option<String>,
    },
}

#[derive(Subcommand)]
enum ConfidenceCommand {
    /// Start a review over one or more tables
    Create {
        name: String,
        /// Table names or ids
        #[arg(long = "table", required = true)]
        tables: Vec<String>,
        /// Words introduced per batch
        #[arg(long, default_value = "10")]
        new_words: usize,
    },

    /// Show a review and its next card
    Show { review: String },

    /// Grade the front card (or --row) of a review
    Grade {
        review: String,
        /// again, hard, good, easy, perfect or superb
        grade: String,
        #[arg(long)]
        row: Option<String>,
    },

    /// Bring the next batch of words into a review
    AddWords { review: String },
}

#[derive(Subcommand)]
enum AnkiCommand {
    /// Create a deck over one or more tables
    Create {
        name: String,
        #[arg(long = "table", required = true)]
        tables: Vec<String>,
        /// Default: [anki] newCardsPerDay from config
        #[arg(long)]
        new_per_day: Option<u32>,
        /// Default: [anki] maxReviewsPerDay from config
        #[arg(long)]
        reviews_per_day: Option<u32>,
    },

    /// Today's cards of a deck
    Due { deck: String },

    /// Grade a card of a deck
    Review {
        deck: String,
        /// Row id or cell value
        row: String,
        /// again, hard, good, easy (or 1-4)
        grade: String,
    },
}

#[derive(Subcommand)]
enum SessionCommand {
    /// Save study settings
    Create {
        name: String,
        #[arg(long = "table", required = true)]
        tables: Vec<String>,
        /// Words per session (default: [session] wordCount from config)
        #[arg(long, conflicts_with = "words")]
        count: Option<usize>,
        /// Study exactly these words (row ids or cell values)
        #[arg(long = "word")]
        words: Vec<String>,
        /// Interaction modes; all the relations support when omitted
        #[arg(long = "mode")]
        modes: Vec<String>,
        /// Sort criteria as criterion[:asc|desc], applied in order
        #[arg(long = "sort")]
        sorts: Vec<String>,
    },

    /// Generate a session from saved settings
    Start { settings: String },

    /// Answer the current question of a session
    Answer {
        /// Session id (or prefix)
        session: String,
        /// Typed response
        response: Option<String>,
        /// Self-grade as correct
        #[arg(long, conflicts_with = "wrong")]
        correct: bool,
        /// Self-grade as wrong
        #[arg(long)]
        wrong: bool,
    },

    /// Quit a session, flagging unanswered words
    Quit { session: String },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && atty_check();
    let app = app::App::new(cli.data_dir, cli.config.as_deref())?;
    let format = &cli.format;

    match cli.command {
        Command::Tables => commands::tables::run_list(&app, format, use_color)?,
        Command::Priority { table, limit } => {
            commands::tables::run_priority(&app, &table, limit, format, use_color)?;
        }
        Command::Validate { table, relation } => {
            commands::tables::run_validate(&app, &table, relation.as_deref(), format, use_color)?;
        }
        Command::Confidence(subcmd) => match subcmd {
            ConfidenceCommand::Create { name, tables, new_words } => {
                commands::confidence::run_create(
                    &app, &name, &tables, new_words, format, use_color,
                )?;
            }
            ConfidenceCommand::Show { review } => {
                commands::confidence::run_show(&app, &review, format, use_color)?;
            }
            ConfidenceCommand::Grade { review, grade, row } => {
                commands::confidence::run_grade(
                    &app,
                    &review,
                    &grade,
                    row.as_deref(),
                    format,
                    use_color,
                )?;
            }
            ConfidenceCommand::AddWords { review } => {
                commands::confidence::run_add_words(&app, &review, format)?;
            }
        },
        Command::Anki(subcmd) => match subcmd {
            AnkiCommand::Create { name, tables, new_per_day, reviews_per_day } => {
                commands::anki::run_create(
                    &app,
                    &name,
                    &tables,
                    new_per_day,
                    reviews_per_day,
                    format,
                )?;
            }
            AnkiCommand::Due { deck } => commands::anki::run_due(&app, &deck, format, use_color)?,
            AnkiCommand::Review { deck, row, grade } => {
                commands::anki::run_review(&app, &deck, &row, &grade, format)?;
            }
        },
        Command::Remind => commands::remind::run(&app, format, use_color)?,
        Command::Session(subcmd) => match subcmd {
            SessionCommand::Create { name, tables, count, words, modes, sorts } => {
                commands::session::run_create(
                    &app, &name, &tables, count, &words, &modes, &sorts, format,
                )?;
            }
            SessionCommand::Start { settings } => {
                commands::session::run_start(&app, &settings, format, use_color)?;
            }
            SessionCommand::Answer { session, response, correct, wrong } => {
                let graded = if correct {
                    Some(true)
                } else if wrong {
                    Some(false)
                } else {
                    None
                };
                commands::session::run_answer(&app, &session, response, graded, format, use_color)?;
            }
            SessionCommand::Quit { session } => {
                commands::session::run_quit(&app, &session, format, use_color)?;
            }
        },
        Command::Reset { table, row } => {
            commands::tables::run_reset(&app, &table, row.as_deref(), format)?;
        }
    }

    Ok(())
}

/// Check if stdout is a terminal (for color support)
fn atty_check() -> bool {
    use std::io::IsTerminal;
    std::io::stdout().is_terminal()
}
