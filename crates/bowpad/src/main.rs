mod commands;
mod first_line;

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use bowpad_config::{CascadeSettings, LexStyles};
use clap::{Parser, Subcommand};

/// Inspect and edit BowPad's lexer and language configuration.
#[derive(Parser, Debug)]
#[command(name = "bowpad", version, about)]
struct Cli {
    /// Directory holding plugin files and the user configuration.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the language BowPad would use for a file.
    Resolve { path: PathBuf },
    /// Print the style table of a language's lexer.
    Styles {
        lang: String,
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Remember a language for a path.
    SetLang { path: String, lang: String },
    /// List languages.
    Languages {
        /// Include hidden languages.
        #[arg(long)]
        all: bool,
    },
    /// List the file-type filters.
    Filters,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = match cli.data_dir {
        Some(dir) => CascadeSettings::with_data_dir(dir),
        None => CascadeSettings::default(),
    };
    tracing::debug!("Using data directory {}", settings.data_dir.display());
    let mut styles = LexStyles::new(settings);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Command::Resolve { path } => commands::resolve(&mut styles, &path, &mut out)?,
        Command::Styles { lang, json } => commands::styles(&styles, &lang, json, &mut out)?,
        Command::SetLang { path, lang } => commands::set_lang(&mut styles, &path, &lang, &mut out)?,
        Command::Languages { all } => commands::languages(&styles, all, &mut out)?,
        Command::Filters => commands::filters(&styles, &mut out)?,
    }
    out.flush()?;
    Ok(())
}
