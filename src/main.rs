use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use termrank::config::Config;
use termrank::document::{SourceFormat, list_candidates};
use termrank::pipeline::{
    CommandConverter, MarkupConverter, Pipeline, load_document, write_outputs,
};

#[derive(Parser)]
#[command(name = "termrank")]
#[command(about = "Extract document text and rank its nouns by frequency")]
#[command(version)]
struct Cli {
    /// Document to process; a bare file name is looked up in the target directory
    file: Option<PathBuf>,

    /// Source format (inferred from the file extension when omitted)
    #[arg(short, long, value_enum)]
    format: Option<SourceFormat>,

    /// Directory holding candidate documents
    #[arg(long)]
    target_dir: Option<PathBuf>,

    /// Directory receiving the output files
    #[arg(long)]
    save_dir: Option<PathBuf>,

    /// List candidate documents for the format and exit
    #[arg(short, long)]
    list: bool,

    /// Print the parsed document tree as JSON instead of ranking terms
    #[arg(long)]
    dump_tree: bool,

    /// Write a default config file and exit
    #[arg(long)]
    init_config: bool,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    if cli.init_config {
        match Config::init_default()? {
            Some(path) => println!("Wrote default config to {}", path.display()),
            None => println!("No config directory available on this platform"),
        }
        return Ok(());
    }

    let mut config = Config::load().context("failed to load config")?;
    if let Some(dir) = cli.target_dir {
        config.target_dir = dir;
    }
    if let Some(dir) = cli.save_dir {
        config.save_dir = dir;
    }
    std::fs::create_dir_all(&config.save_dir)?;

    let Some(file) = cli.file.filter(|_| !cli.list) else {
        let format = cli.format.unwrap_or(SourceFormat::Hwp);
        let candidates = list_candidates(&config.target_dir, format)?;
        if candidates.is_empty() {
            println!(
                "No ({}) files available. Put the {} files to extract into '{}'.",
                format,
                format,
                config.target_dir.display()
            );
        } else {
            for (index, path) in candidates.iter().enumerate() {
                println!("{:>3}) {}", index + 1, path.display());
            }
        }
        return Ok(());
    };

    let path = if file.exists() || file.components().count() > 1 {
        file
    } else {
        config.target_dir.join(file)
    };

    let Some(format) = cli.format.or_else(|| SourceFormat::from_path(&path)) else {
        bail!(
            "Cannot infer the format of {}; pass --format hwp or --format pdf",
            path.display()
        );
    };

    if cli.dump_tree {
        if format != SourceFormat::Hwp {
            bail!("--dump-tree is only available for the hwp format");
        }
        let converter = config
            .converter_command
            .as_ref()
            .map(|command| CommandConverter::new(command.clone(), config.converter_args.clone()));
        let document = load_document(&path, converter.as_ref().map(|c| c as &dyn MarkupConverter))
            .await?;
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }

    let pipeline = Pipeline::from_config(&config).await?;

    let output = pipeline
        .run(&path, format)
        .await
        .with_context(|| format!("failed to process {}", path.display()))?;

    let report = write_outputs(&output, &config.save_dir).await;
    if !report.is_complete() {
        bail!("{} output file(s) could not be written", report.failed.len());
    }

    Ok(())
}
