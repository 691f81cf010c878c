//! CLI entry point for the code-assist engine.
//!
//! Runs one completion request against a file on disk, lists namespaces known
//! to the workspace, and manages the `.sharpassist/settings.toml` file.

use anyhow::{Context, Result, anyhow, bail};
use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use sharp_assist::completion::{Completion, CompletionEngine};
use sharp_assist::display::{THEME, create_completion_table, create_namespace_table};
use sharp_assist::source::SourceBuffer;
use sharp_assist::workspace::WorkspaceContext;
use sharp_assist::Settings;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Heuristic C# code assist
#[derive(Parser)]
#[command(
    name = "sharp-assist",
    version = env!("CARGO_PKG_VERSION"),
    about = "Heuristic C# code assist",
    long_about = "Complete locals, inherited members, types and namespaces in C# sources using assembly manifests.",
    next_line_help = true,
    styles = clap_cargo_style()
)]
struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Set up .sharpassist directory with default configuration
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Complete at a position in a source file
    #[command(
        after_help = "Examples:\n  sharp-assist complete Page.aspx.cs --offset 1204\n  sharp-assist complete Page.aspx.cs --line 40 --column 17 --json"
    )]
    Complete {
        /// C# code file or markup page
        file: PathBuf,

        /// Byte offset of the cursor
        #[arg(short, long, conflicts_with_all = ["line", "column"])]
        offset: Option<usize>,

        /// 1-based cursor line
        #[arg(long, requires = "column")]
        line: Option<usize>,

        /// 1-based cursor column, in characters
        #[arg(long, requires = "line")]
        column: Option<usize>,

        /// Output the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List namespaces directly below a prefix
    Namespaces {
        /// Namespace prefix; omit for root namespaces
        prefix: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Display active settings
    Config,
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    if let Some(path) = &cli.config {
        return Settings::load_from(path).map_err(|e| {
            anyhow!("Configuration error loading from {}: {e}", path.display())
        });
    }
    if let Err(warning) = Settings::check_init() {
        if !matches!(cli.command, Commands::Init { .. }) {
            eprintln!("{}", THEME.warning_with_icon(&warning));
            eprintln!("Using default configuration for now.");
        }
    }
    Ok(Settings::load().unwrap_or_else(|e| {
        eprintln!("{}", THEME.error_with_icon(&format!("Configuration error: {e}")));
        Settings::default()
    }))
}

/// Byte offset of a 1-based line/column pair.
fn offset_of(text: &str, line: usize, column: usize) -> Option<usize> {
    let start = if line <= 1 {
        0
    } else {
        text.match_indices('\n').nth(line - 2).map(|(i, _)| i + 1)?
    };
    let rest = &text[start..];
    let line_len = rest.find('\n').unwrap_or(rest.len());
    let col = column.saturating_sub(1);
    rest[..line_len]
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(line_len))
        .nth(col)
        .map(|i| start + i)
}

fn read_source(
    file: &Path,
    offset: Option<usize>,
    line: Option<usize>,
    column: Option<usize>,
) -> Result<SourceBuffer> {
    let cursor = match (offset, line, column) {
        (Some(offset), _, _) => offset,
        (None, Some(line), Some(column)) => {
            let text = std::fs::read_to_string(file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            match offset_of(&text, line, column) {
                Some(offset) => offset,
                None => bail!("{}:{line}:{column} is outside the file", file.display()),
            }
        }
        _ => bail!("Pass either --offset or --line and --column"),
    };
    Ok(SourceBuffer::from_file(file, cursor)?)
}

fn print_completion(completion: &Completion, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(completion)?);
        return Ok(());
    }
    if completion.items.is_empty() {
        eprintln!("{}", THEME.warning_with_icon("No completions"));
        return Ok(());
    }
    println!("{}", create_completion_table(completion));
    println!(
        "{} items",
        THEME.apply(&THEME.number, completion.items.len())
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(&cli)?;
    init_tracing(cli.debug || settings.debug);
    debug!(root = ?settings.workspace_root, "settings loaded");

    match &cli.command {
        Commands::Init { force } => {
            let path = Settings::init_config_file(*force)?;
            println!("{}", THEME.success_with_icon("Created configuration file"));
            println!("  {}", THEME.apply(&THEME.path, path.display()));
            let manifests = path.with_file_name("manifests");
            println!(
                "Put assembly manifests under {}",
                THEME.apply(&THEME.path, manifests.display())
            );
        }

        Commands::Config => {
            println!("{}", THEME.apply(&THEME.header, "Current Configuration:"));
            println!("{}", "=".repeat(50));
            println!("{}", toml::to_string_pretty(&settings)?);
        }

        Commands::Complete {
            file,
            offset,
            line,
            column,
            json,
        } => {
            let source = read_source(file, *offset, *line, *column)?;
            let engine = CompletionEngine::from_settings(&settings);
            let completion = engine.complete(&source);
            print_completion(&completion, *json)?;
        }

        Commands::Namespaces { prefix, json } => {
            let ctx = WorkspaceContext::from_settings(&settings);
            let prefix = prefix.as_deref().unwrap_or("");
            let children = ctx.namespaces().immediate_child_namespaces(prefix);
            if *json {
                println!("{}", serde_json::to_string_pretty(&children)?);
            } else if children.is_empty() {
                eprintln!(
                    "{}",
                    THEME.warning_with_icon(&format!("No namespaces below '{prefix}'"))
                );
            } else {
                println!("{}", create_namespace_table(prefix, &children));
            }
        }
    }

    Ok(())
}
