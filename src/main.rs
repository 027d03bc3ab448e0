//! # Marktype
//!
//! Headless driver for the marktype editing core: typed input goes through
//! the same keystroke path an interactive front end would use, so the
//! markdown-like shortcuts fire as you type.
//!
//! ## Quick Start
//!
//! ```bash
//! # Type a heading and a red line, then save
//! cargo run -- -t "# Notes" -t "** important"
//!
//! # Pipe lines in; each line ends with Enter
//! printf '* bold\n``` fn main() {}\n' | cargo run -- --memory
//!
//! # Show the saved document and the shortcut list
//! cargo run -- --guide
//!
//! # Write a config file with the current settings
//! cargo run -- --init-config
//! ```

mod render;

use anyhow::Context;
use clap::Parser;
use std::io::{BufRead, IsTerminal};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use marktype_core::{
    shortcut_guide, Config, Editor, EventHandler, FileStore, KeyValueStore, MemoryStore,
};

/// Marktype - rich text with markdown-like typing shortcuts
#[derive(Parser, Debug)]
#[command(name = "marktype")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Text to type; each value is one line
    #[arg(short = 't', long = "type", value_name = "TEXT")]
    lines: Vec<String>,

    /// Config file (defaults to the platform config directory)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Storage directory override
    #[arg(short, long, value_name = "DIR")]
    store: Option<PathBuf>,

    /// Keep the document in memory only
    #[arg(long)]
    memory: bool,

    /// Do not save after typing
    #[arg(long)]
    no_save: bool,

    /// Print the shortcut list
    #[arg(short, long)]
    guide: bool,

    /// Render styles with ANSI escapes
    #[arg(long)]
    color: bool,

    /// Write the effective config back to its file and exit
    #[arg(long)]
    init_config: bool,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    tracing::info!("Starting Marktype v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load(),
    };
    if let Some(dir) = &args.store {
        config.storage.directory = Some(dir.clone());
    }

    if args.init_config {
        let path = write_config(&config, args.config.as_deref())?;
        println!("Config written to {}", path.display());
        return Ok(());
    }

    let input = read_input(&args)?;

    let output = if args.memory {
        run(Editor::open(MemoryStore::new(), config), &args, &input)?
    } else {
        let dir = config.storage_dir()?;
        tracing::info!("Storage directory: {}", dir.display());
        run(Editor::open(FileStore::new(dir), config), &args, &input)?
    };
    println!("{output}");

    Ok(())
}

/// Saves `config` to `path`, or to the platform default location.
fn write_config(config: &Config, path: Option<&Path>) -> anyhow::Result<PathBuf> {
    let written = match path {
        Some(path) => {
            config.save_to(path)?;
            path.to_path_buf()
        }
        None => {
            config.save()?;
            Config::default_path()?
        }
    };
    tracing::info!("Config written to {}", written.display());
    Ok(written)
}

/// Lines from `--type`, or from stdin when it is piped.
fn read_input(args: &Args) -> anyhow::Result<Vec<String>> {
    if !args.lines.is_empty() {
        return Ok(args.lines.clone());
    }
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(Vec::new());
    }
    stdin
        .lock()
        .lines()
        .collect::<Result<_, _>>()
        .context("Failed to read stdin")
}

/// Types `input` into the editor, saves, and returns the report to print.
fn run<S: KeyValueStore>(
    mut editor: Editor<S>,
    args: &Args,
    input: &[String],
) -> anyhow::Result<String> {
    let mut events = EventHandler::new(editor.subscribe());

    if !input.is_empty() {
        editor.move_to_end()?;
        if !editor.state().focus_block().is_empty() {
            editor.insert_newline()?;
        }
    }
    for (i, line) in input.iter().enumerate() {
        if i > 0 {
            editor.insert_newline()?;
        }
        for kind in editor.type_text(line)? {
            tracing::info!("Shortcut: {}", kind);
        }
    }

    if !input.is_empty() && !args.no_save {
        editor.save()?;
    }

    for event in events.drain() {
        tracing::debug!(?event, "editor event");
    }

    let mut out = Vec::new();
    if args.guide {
        out.push("Shortcuts:".to_string());
        for (pattern, description) in shortcut_guide() {
            out.push(format!("  {pattern:<4} {description}"));
        }
        out.push(String::new());
    }
    out.push(render::render_document(
        editor.state(),
        editor.style_map(),
        args.color,
    ));
    let active = editor.active_styles();
    out.push(format!(
        "Active Styles: {}",
        if active.is_empty() {
            "None".to_string()
        } else {
            active.to_string()
        }
    ));
    if let Some(message) = editor.notification() {
        out.push(format!("Notification: {message}"));
    }
    Ok(out.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["marktype"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_args_parsing() {
        let args = args(&[]);
        assert!(args.lines.is_empty());
        assert!(!args.memory);
        assert_eq!(args.verbose, 0);
        assert!(!args.init_config);
    }

    #[test]
    fn test_write_config_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let args = args(&["--init-config", "-c", path.to_str().unwrap()]);
        assert!(args.init_config);

        let mut config = Config::default();
        config.storage.directory = Some(dir.path().join("store"));
        let written = write_config(&config, args.config.as_deref()).unwrap();
        assert_eq!(written, path);

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.storage.directory, config.storage.directory);
    }

    #[test]
    fn test_args_with_lines() {
        let args = args(&["-t", "# Title", "--type", "body", "-vv"]);
        assert_eq!(args.lines, vec!["# Title", "body"]);
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_run_in_memory() {
        let args = args(&["--memory"]);
        let input = vec!["# Title".to_string(), "** hot".to_string()];
        let report = run(
            Editor::open(MemoryStore::new(), Config::default()),
            &args,
            &input,
        )
        .unwrap();
        assert!(report.contains("  header-one | Title"));
        assert!(report.contains("    unstyled | hot"));
        assert!(report.contains("Active Styles: RED_TEXT"));
        assert!(report.contains("Notification: Content Saved"));
    }

    #[test]
    fn test_run_appends_to_saved_document() {
        let dir = tempdir().unwrap();
        let args = args(&["--guide"]);

        let first = vec!["first".to_string()];
        run(
            Editor::open(FileStore::new(dir.path()), Config::default()),
            &args,
            &first,
        )
        .unwrap();

        let second = vec!["second".to_string()];
        let report = run(
            Editor::open(FileStore::new(dir.path()), Config::default()),
            &args,
            &second,
        )
        .unwrap();
        assert!(report.starts_with("Shortcuts:"));
        assert!(report.contains("      unstyled | first\n>     unstyled | second"));
        assert!(report.contains("Active Styles: None"));
    }
}
