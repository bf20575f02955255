use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use tabfold::config::{ExtractConfig, TemplateSpec};
use tabfold::data::loader::load_file;
use tabfold::export;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Text,
}

/// Fold spreadsheet rows into a nested structure described by a template.
#[derive(Debug, Parser)]
#[command(name = "tabfold", version, about)]
struct Cli {
    /// Input file (.csv, .json, .parquet, .xlsx, .xls, .ods)
    path: PathBuf,

    /// Column template, e.g. "[[_,_],[_]]"
    #[arg(short, long)]
    template: Option<String>,

    /// JSON config file; flags given on the command line take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Leading rows to discard before reading data
    #[arg(long)]
    skip_rows: Option<usize>,

    /// Treat the first row after skipping as column headers
    #[arg(long)]
    header: bool,

    /// Worksheet name (workbooks only)
    #[arg(long)]
    sheet: Option<String>,

    /// Additional spelling to treat as null (repeatable)
    #[arg(long = "null-token", value_name = "TOKEN")]
    null_tokens: Vec<String>,

    /// Drop all-null leaf entries and the branches they leave empty
    #[arg(long)]
    drop_empty_leaves: bool,

    #[arg(short, long, value_enum, default_value = "json")]
    format: Format,
}

impl Cli {
    fn config(&self) -> Result<ExtractConfig> {
        let mut cfg = match &self.config {
            Some(path) => ExtractConfig::from_path(path)?,
            None => ExtractConfig::default(),
        };
        if let Some(template) = &self.template {
            cfg.template = Some(TemplateSpec::Text(template.clone()));
        }
        if let Some(n) = self.skip_rows {
            cfg.skip_rows = n;
        }
        if self.header {
            cfg.has_header = true;
        }
        if let Some(sheet) = &self.sheet {
            cfg.sheet = Some(sheet.clone());
        }
        cfg.extra_null_tokens.extend(self.null_tokens.iter().cloned());
        if self.drop_empty_leaves {
            cfg.drop_empty_leaves = true;
        }
        Ok(cfg)
    }
}

fn run(cli: &Cli) -> Result<()> {
    let cfg = cli.config()?;
    let extractor = cfg.extractor()?;
    let sheet = load_file(&cli.path, &cfg.load_options())?;
    let tree = extractor
        .run(&sheet)
        .with_context(|| format!("extracting {}", cli.path.display()))?;

    match cli.format {
        Format::Json => {
            let text = serde_json::to_string_pretty(&export::to_json(&tree))?;
            println!("{text}");
        }
        Format::Text => print!("{}", export::to_text(&tree)),
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
