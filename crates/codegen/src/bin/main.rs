use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use sqlgen_codegen::{Config, Generator};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Generate Go query code from SQL templates in interface doc comments
#[derive(Debug, Parser)]
#[command(name = "sqlgen", version, about)]
struct Cli {
    /// Path of the YAML config file
    #[arg(short, long, default_value = "sqlgen.yaml")]
    config: PathBuf,

    /// Override the query package output directory
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Print the files that would be written without writing them
    #[arg(long)]
    dry_run: bool,

    /// Print the compiled clause tree of methods with this name as JSON
    #[arg(long, value_name = "METHOD")]
    dump_ir: Option<String>,

    /// Log filter, overriding RUST_LOG (e.g. `debug`, `sqlgen_codegen=trace`)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let filter = match &cli.log_level {
        Some(level) => EnvFilter::try_new(level).context("invalid --log-level")?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    let mut config = Config::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(out_dir) = cli.out_dir {
        config.out_dir = out_dir;
    }

    tracing::info!(config = %cli.config.display(), "starting sqlgen");
    let generator = Generator::open(config)
        .await
        .context("opening catalog")?;

    if let Some(method) = &cli.dump_ir {
        let plan = generator.plan().await?;
        let dump = serde_json::to_string_pretty(&plan.dump_ir(method))?;
        println!("{dump}");
        return Ok(ExitCode::SUCCESS);
    }

    let output = generator.generate().await?;
    if cli.dry_run {
        for file in &output.files {
            println!("{}", file.path.display());
        }
    } else {
        output.write_all()?;
    }

    for failure in &output.report.failures {
        eprintln!("error: {failure}");
    }
    Ok(if output.report.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
