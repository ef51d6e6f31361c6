use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use evd_core::EventQuery;
use evd_core::forms::{LoginForm, RegistrationForm};
use evd_core::wizard::{DEFAULT_CAPACITY, EventDraft};
use evd_db::Backend;
use tracing_subscriber::EnvFilter;

use evd_cli::commands::{attendance, check_in, dashboard, events, register, session, status};
use evd_cli::{AttendanceAction, Cli, Commands, Config, EventsAction};

/// Load config and open storage, ensuring the parent directory exists.
///
/// A database that cannot be opened is replaced by memory for this run.
fn open_backend(config_path: Option<&std::path::Path>) -> Result<(Backend, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        if let Err(err) = std::fs::create_dir_all(parent) {
            tracing::warn!(path = %parent.display(), %err, "failed to create database directory");
        }
    }

    let backend = Backend::open_or_memory(&config.database_path);
    Ok((backend, config))
}

#[expect(
    clippy::too_many_lines,
    reason = "CLI command dispatch is inherently verbose"
)]
fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let Some(command) = cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let (mut backend, config) = open_backend(cli.config.as_deref())?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::Login {
            email,
            password,
            role,
        } => {
            let form = LoginForm {
                email,
                password,
                role,
            };
            session::login(&mut out, &mut backend, &form)?;
        }
        Commands::Logout => session::logout(&mut out, &mut backend)?,
        Commands::Whoami => session::whoami(&mut out, &mut backend)?,
        Commands::CheckIn { code } => {
            check_in::run(&mut out, &mut backend, &config, &code)?;
        }
        Commands::Attendance(action) => match action {
            AttendanceAction::List { json } => attendance::list(&mut out, &mut backend, json)?,
            AttendanceAction::Delete { index } => {
                attendance::delete(&mut out, &mut backend, index)?;
            }
            AttendanceAction::Clear => attendance::clear(&mut out, &mut backend)?,
        },
        Commands::Events(action) => match action {
            EventsAction::List {
                search,
                sort,
                from,
                to,
                category,
                json,
            } => {
                let query = EventQuery {
                    search,
                    sort: sort.into(),
                    from,
                    to,
                    category,
                };
                events::list(&mut out, &mut backend, &config, &query, json)?;
            }
            EventsAction::Show { id } => events::show(&mut out, &mut backend, &config, &id)?,
            EventsAction::Participate { id } => {
                events::participate(&mut out, &mut backend, &config, &id)?;
            }
            EventsAction::Create {
                title,
                date,
                description,
                poster,
                category,
                capacity,
            } => {
                let draft = EventDraft {
                    title,
                    date,
                    description,
                    poster,
                    category: category.unwrap_or_default(),
                    capacity: capacity.unwrap_or(DEFAULT_CAPACITY),
                };
                events::create(&mut out, &mut backend, &config, draft)?;
            }
        },
        Commands::Register {
            name,
            email,
            role,
            password,
            confirm_password,
            event,
        } => {
            let form = RegistrationForm {
                full_name: name,
                email,
                role,
                password,
                confirm_password,
                event_id: event,
            };
            register::run(&mut out, &mut backend, &config, &form)?;
        }
        Commands::Dashboard { json } => dashboard::run(&mut out, &mut backend, &config, json)?,
        Commands::Status => status::run(&mut out, &mut backend, &config)?,
    }

    out.flush()?;
    Ok(())
}
