//! Terminal adapter for the todo list.
//!
//! # Responsibility
//! - Map one sub-command to one list action or theme call.
//! - Print the resulting list, or the resolved theme.

mod terminal;

use clap::{Args, Parser, Subcommand};
use lazytodo_core::db::open_db;
use lazytodo_core::{
    init_logging, ConfigOverrides, CoreConfig, Filter, SqliteKvStore, TaskId, ThemeService,
    TodoStore, UuidIdGenerator,
};
use log::error;
use std::path::PathBuf;
use std::process::ExitCode;
use terminal::{apply_action, TodoAction};

#[derive(Debug, Parser)]
#[command(name = "lazytodo", version, about = "Local todo list")]
struct Cli {
    /// SQLite file holding the list (env: LAZYTODO_DB_PATH).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files (env: LAZYTODO_LOG_DIR).
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error (env: LAZYTODO_LOG_LEVEL).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Add a todo; words are joined with single spaces.
    Add { text: Vec<String> },
    /// Flip a todo between active and completed.
    Toggle { id: String },
    /// Delete a todo.
    Rm { id: String },
    /// Delete every completed todo.
    ClearCompleted,
    /// Show the list.
    List {
        #[arg(long, default_value = "all", value_parser = parse_filter)]
        filter: Filter,
    },
    /// Store a new order; must name every todo exactly once.
    Reorder {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Light/dark theme preference.
    #[command(subcommand)]
    Theme(ThemeCommand),
}

#[derive(Debug, Subcommand)]
enum ThemeCommand {
    /// Print the theme that applies now.
    Show(SystemScheme),
    /// Switch theme and remember the choice.
    Toggle(SystemScheme),
}

#[derive(Debug, Args)]
struct SystemScheme {
    /// Treat the OS color scheme as dark.
    #[arg(long)]
    system_dark: bool,
}

fn parse_filter(value: &str) -> Result<Filter, String> {
    Filter::parse(value).map_err(|err| err.to_string())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = CoreConfig::resolve(ConfigOverrides {
        db_path: cli.db.clone(),
        log_level: cli.log_level.clone(),
        log_dir: cli.log_dir.clone(),
    });

    if let Some(log_dir) = &config.log_dir {
        if let Err(err) = init_logging(&config.log_level, &log_dir.to_string_lossy()) {
            eprintln!("logging disabled: {err}");
        }
    }

    match run(cli.command, &config) {
        Ok(code) => code,
        Err(err) => {
            error!("event=cli_command module=cli status=error error={}", err);
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, config: &CoreConfig) -> Result<ExitCode, String> {
    let conn = open_db(&config.db_path).map_err(|err| {
        format!("failed to open database `{}`: {err}", config.db_path.display())
    })?;

    let action = match command {
        Command::Theme(theme_command) => {
            return run_theme(SqliteKvStore::new(&conn), theme_command);
        }
        Command::Add { text } => TodoAction::Add(text.join(" ")),
        Command::Toggle { id } => TodoAction::Toggle(TaskId::from(id)),
        Command::Rm { id } => TodoAction::Remove(TaskId::from(id)),
        Command::ClearCompleted => TodoAction::ClearCompleted,
        Command::List { filter } => TodoAction::List(filter),
        Command::Reorder { ids } => {
            TodoAction::Reorder(ids.into_iter().map(TaskId::from).collect())
        }
    };
    let store = TodoStore::load(SqliteKvStore::new(&conn), UuidIdGenerator);
    let view = apply_action(store, action).map_err(|err| err.to_string())?;

    let mut stdout = std::io::stdout().lock();
    view.print(&mut stdout)
        .map_err(|err| format!("failed to write output: {err}"))?;

    if view.alert_shown() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn run_theme(kv: SqliteKvStore<'_>, command: ThemeCommand) -> Result<ExitCode, String> {
    let themes = ThemeService::new(kv);
    let theme = match command {
        ThemeCommand::Show(scheme) => themes.resolve(scheme.system_dark),
        ThemeCommand::Toggle(scheme) => themes
            .resolve(scheme.system_dark)
            .and_then(|current| themes.toggle(current)),
    }
    .map_err(|err| err.to_string())?;
    println!("{theme} (icon: {})", theme.icon());
    Ok(ExitCode::SUCCESS)
}
