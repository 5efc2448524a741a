//! burrow - a stateful file explorer with a command-line shell.
//!
//! Usage:
//!   burrow [PATH]            Start the interactive shell
//!   burrow ls [PATH]         Print a sorted listing
//!   burrow roots             Show the root directory of each scope
//!   burrow --help            Show help

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};
use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result};
use tracing_subscriber::EnvFilter;

use burrow_core::{Entry, ExplorerConfig, Scope};
use burrow_ops::{ListOptions, TransferKind, list_directory};
use burrow_session::{ExplorerSession, Listing, RootResolver, SelectionChanged};

/// Environment variable holding the log filter.
const LOG_ENV: &str = "BURROW_LOG";

#[derive(Parser)]
#[command(
    name = "burrow",
    version,
    about = "A stateful file explorer",
    long_about = "burrow browses directories with history, selection and a \
                  copy/move clipboard.\n\n\
                  Start the interactive shell by running `burrow [PATH]`, or use \
                  subcommands for one-shot operations."
)]
struct Cli {
    /// Start location (defaults to the root of the configured scope)
    path: Option<PathBuf>,

    /// Configuration file (defaults to <config dir>/burrow/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print a sorted directory listing
    Ls {
        /// Directory to list
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show the root directory of each scope
    Roots,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Some(Command::Ls { path, format }) => run_ls(&path, &config, format)?,
        Some(Command::Roots) => run_roots(),
        None => run_shell(config, cli.path.as_deref())?,
    }

    Ok(())
}

/// Install the stderr log subscriber.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Load the configuration from `explicit`, the default location, or defaults.
fn load_config(explicit: Option<&Path>) -> Result<ExplorerConfig> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => dirs::config_dir()
            .map(|dir| dir.join("burrow").join("config.toml"))
            .filter(|path| path.is_file()),
    };

    let Some(path) = path else {
        return Ok(ExplorerConfig::default());
    };

    let text = fs::read_to_string(&path)
        .with_context(|| format!("Cannot read config file {}", path.display()))?;
    let config = ExplorerConfig::from_toml(&text)
        .with_context(|| format!("Invalid config file {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Print a one-shot listing.
fn run_ls(path: &Path, config: &ExplorerConfig, format: OutputFormat) -> Result<()> {
    let entries = list_directory(path, &ListOptions::from(config)).context("Listing failed")?;

    match format {
        OutputFormat::Text => {
            for entry in &entries {
                println!("{}", format_entry(entry, false));
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
    }

    Ok(())
}

/// Print the resolved root of each scope.
fn run_roots() {
    let resolver = RootResolver::default();
    for scope in [Scope::Internal, Scope::External] {
        println!("{:<10} {}", scope, resolver.root_for(scope).display());
    }
}

enum Flow {
    Continue,
    Quit,
}

/// Run the interactive shell until `quit` or end of input.
fn run_shell(config: ExplorerConfig, start: Option<&Path>) -> Result<()> {
    let mut session = ExplorerSession::open(config, start).context("Cannot open start location")?;
    let mut events = session.subscribe();

    let listing = session.list_current().context("Cannot list start location")?;
    print_listing(&listing, &session);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{}> ", session.location().display());
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let line = line.context("Cannot read input")?;

        let flow = run_command(&mut session, line.trim());

        while let Ok(SelectionChanged { state }) = events.try_recv() {
            println!("(selection {})", format!("{state:?}").to_lowercase());
        }

        if let Flow::Quit = flow {
            break;
        }
    }

    Ok(())
}

/// Execute one shell command, printing its outcome.
fn run_command(session: &mut ExplorerSession, line: &str) -> Flow {
    let (command, arg) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let outcome = match command {
        "" => Ok(()),
        "ls" => session.list_current().map(|listing| print_listing(&listing, session)),
        "cd" if !arg.is_empty() => session
            .navigate_into(Path::new(arg))
            .map(|listing| print_listing(&listing, session)),
        "up" => session
            .navigate_up()
            .map(|listing| print_listing(&listing, session)),
        "scope" => {
            let target = if arg.is_empty() {
                Ok(session.current_scope().other())
            } else {
                arg.parse::<Scope>()
            };
            match target {
                Ok(scope) => session
                    .switch_scope(scope)
                    .map(|listing| print_listing(&listing, session)),
                Err(_) => {
                    println!("unknown scope '{arg}' (internal or external)");
                    Ok(())
                }
            }
        }
        "sel" if !arg.is_empty() => session.toggle_select(Path::new(arg)).map(|selected| {
            println!("{} {arg}", if selected { "selected" } else { "deselected" });
        }),
        "clear" => {
            session.clear_selection();
            Ok(())
        }
        "selected" => {
            for entry in session.selected_entries() {
                println!("{}", entry.path.display());
            }
            Ok(())
        }
        "copy" | "move" => {
            let kind = if command == "copy" {
                TransferKind::Copy
            } else {
                TransferKind::Move
            };
            let staged = if arg.is_empty() {
                session.stage_selected(kind)
            } else if kind == TransferKind::Copy {
                session.stage_copy(Path::new(arg))
            } else {
                session.stage_move(Path::new(arg))
            };
            staged.map(|staged| println!("staged {} of {}", staged.kind, staged.source.name))
        }
        "paste" => session.paste().map(|report| println!("{}", report.summary())),
        "mkdir" if !arg.is_empty() => session
            .create_directory(arg)
            .map(|report| println!("{}", report.summary())),
        "rename" => match arg.split_once(char::is_whitespace) {
            Some((name, new_name)) => session
                .rename(Path::new(name), new_name.trim())
                .map(|report| println!("{}", report.summary())),
            None if !arg.is_empty() && session.is_selection_active() => session
                .rename_selected(arg)
                .map(|report| println!("{}", report.summary())),
            None => {
                println!("usage: rename <name> <new name>");
                Ok(())
            }
        },
        "rm" => {
            let result = if arg.is_empty() {
                session.delete_selected()
            } else {
                session.delete(Path::new(arg))
            };
            result.map(|report| println!("{}", report.summary()))
        }
        "pwd" => {
            println!("{} ({})", session.location().display(), session.current_scope());
            Ok(())
        }
        "help" => {
            print_help();
            Ok(())
        }
        "quit" | "exit" => return Flow::Quit,
        _ => {
            println!("unknown command '{line}', try 'help'");
            Ok(())
        }
    };

    if let Err(e) = outcome {
        if e.is_boundary() {
            println!("{e}");
        } else {
            println!("error: {e}");
        }
    }

    Flow::Continue
}

fn print_help() {
    println!("  ls                      list the current directory");
    println!("  cd <name>               enter a directory");
    println!("  up                      go to the parent directory");
    println!("  scope [internal|external]  switch scope (toggles without argument)");
    println!("  sel <name>              toggle selection of an entry");
    println!("  clear                   clear the selection");
    println!("  selected                show selected entries");
    println!("  copy [name]             stage a copy (selection when no name)");
    println!("  move [name]             stage a move (selection when no name)");
    println!("  paste                   paste the staged entry here");
    println!("  mkdir <name>            create a directory");
    println!("  rename <name> <new>     rename an entry");
    println!("  rm [name]               delete an entry (selection when no name)");
    println!("  pwd                     show the current location");
    println!("  quit                    leave the shell");
}

/// Print a listing with a header.
fn print_listing(listing: &Listing, session: &ExplorerSession) {
    println!();
    println!("{}", "─".repeat(60));
    println!(
        " {} [{}] - {} entries",
        listing.location.display(),
        listing.scope,
        listing.entries.len()
    );
    println!(" {}: 'scope'", listing.scope.toggle_label());
    println!("{}", "─".repeat(60));

    for entry in &listing.entries {
        let selected = session.selection().contains(&entry.path);
        println!("{}", format_entry(entry, selected));
    }
    println!();
}

/// One listing row: marker, name, size and modification time.
fn format_entry(entry: &Entry, selected: bool) -> String {
    let marker = if selected { "*" } else { " " };
    let name = if entry.is_directory {
        format!("{}/", entry.name)
    } else {
        entry.name.to_string()
    };
    let size = if entry.is_directory {
        "-".to_string()
    } else {
        format_size(entry.size)
    };

    format!(
        "{} {:<40} {:>10}  {}",
        marker,
        truncate(&name, 40),
        size,
        format_time(entry.last_modified)
    )
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// Format a timestamp in local time.
fn format_time(time: SystemTime) -> String {
    DateTime::<Local>::from(time).format("%Y-%m-%d %H:%M").to_string()
}

/// Truncate a string to max length.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 1).collect();
        format!("{kept}…")
    }
}
