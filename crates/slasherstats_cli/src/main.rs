//! SlasherStats console entry point.
//!
//! # Responsibility
//! - Parse flags into a store choice, log settings and `ManagerConfig`.
//! - Run the interactive menu on stdin/stdout.

mod menu;

use clap::Parser;
use log::info;
use menu::ConsoleMenu;
use slasherstats_core::db::open_db;
use slasherstats_core::{
    default_log_level, init_logging, DuplicateTitlePolicy, InMemoryMovieRepository,
    ManagerConfig, MovieManager, PointsMode, SqliteMovieRepository, ValidationProfile,
};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

/// Track the horror movies you have watched.
#[derive(Debug, Parser)]
#[command(name = "slasherstats", version, about)]
struct Cli {
    /// SQLite database file, created when missing.
    #[arg(long, default_value = "slasherstats.sqlite3")]
    db: PathBuf,

    /// Keep records in memory for this session only.
    #[arg(long, conflicts_with = "db")]
    in_memory: bool,

    /// trace|debug|info|warn|error; defaults by build mode.
    #[arg(long)]
    log_level: Option<String>,

    /// Directory for rolling log files.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// How account points are computed: derived|tracked.
    #[arg(long, default_value_t = PointsMode::Derived)]
    points_mode: PointsMode,

    /// What to do when an added title already exists: reject|allow.
    #[arg(long, default_value_t = DuplicateTitlePolicy::Reject)]
    duplicate_titles: DuplicateTitlePolicy,

    /// Rule set for new and updated records: entity|basic.
    #[arg(long, default_value_t = ValidationProfile::Entity)]
    validation: ValidationProfile,
}

impl Cli {
    fn manager_config(&self) -> ManagerConfig {
        ManagerConfig {
            points_mode: self.points_mode,
            validation: self.validation,
            duplicate_titles: self.duplicate_titles,
        }
    }

    fn resolved_log_dir(&self) -> PathBuf {
        match &self.log_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => std::env::current_dir()
                .map(|cwd| cwd.join(dir))
                .unwrap_or_else(|_| dir.clone()),
            None => std::env::temp_dir().join("slasherstats-logs"),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = cli.log_level.as_deref().unwrap_or_else(|| default_log_level());
    if let Err(err) = init_logging(level, cli.resolved_log_dir()) {
        eprintln!("logging disabled: {err}");
    }

    let config = cli.manager_config();
    info!(
        "event=cli_start module=cli status=ok store={} points_mode={} validation={} duplicate_titles={}",
        if cli.in_memory { "memory" } else { "file" },
        config.points_mode,
        config.validation,
        config.duplicate_titles
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let result = if cli.in_memory {
        let manager = MovieManager::with_config(InMemoryMovieRepository::new(), config);
        let mut menu = ConsoleMenu::new(manager, stdin.lock(), stdout.lock());
        menu.run()
    } else {
        let conn = match open_db(&cli.db) {
            Ok(conn) => conn,
            Err(err) => {
                eprintln!("cannot open database `{}`: {err}", cli.db.display());
                return ExitCode::FAILURE;
            }
        };
        let manager = MovieManager::with_config(SqliteMovieRepository::new(&conn), config);
        let mut menu = ConsoleMenu::new(manager, stdin.lock(), stdout.lock());
        menu.run()
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("console error: {err}");
            ExitCode::FAILURE
        }
    }
}
