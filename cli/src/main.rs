//! CLI entrypoint for roundtable
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use roundtable_application::OrchestratorSettings;
use roundtable_domain::Model;
use roundtable_infrastructure::{ConfigLoader, FileConfig};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "roundtable",
    version,
    about = "Group chat with a roundtable of independently-hosted models"
)]
struct Cli {
    /// Path to a config file (overrides global and project configs)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Participating model id, repeatable (overrides the config file)
    #[arg(short, long)]
    model: Vec<String>,

    /// Confidence below which an opt-in speaker stays silent (0.0-1.0)
    #[arg(short, long)]
    threshold: Option<f64>,

    /// Append logs to this file instead of stderr
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Ignore config files and run on built-in defaults
    #[arg(long)]
    no_config: bool,

    /// Print the resolved configuration and exit
    #[arg(long)]
    show_config: bool,

    /// Disable the evaluation spinner
    #[arg(short, long)]
    quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    info!("Starting roundtable");

    let config = if cli.no_config {
        FileConfig::default()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("failed to load configuration")?
    };

    if cli.show_config {
        ConfigLoader::print_config_sources();
        println!();
        println!(
            "{}",
            toml::to_string_pretty(&config).context("failed to render configuration")?
        );
        return Ok(());
    }

    let mut settings = config.to_settings();
    if !cli.model.is_empty() {
        settings.models = cli
            .model
            .iter()
            .map(|id| Model::from(id.as_str()))
            .collect();
    }
    if let Some(threshold) = cli.threshold {
        settings = settings.with_silence_threshold(threshold);
    }
    if settings.models.is_empty() {
        bail!("no models configured; pass --model or set [models] enabled in the config");
    }

    run(&cli, &config, settings).await
}

/// Initialize logging based on verbosity level. The returned guard keeps
/// the file writer flushing until the process exits.
fn init_logging(
    verbose: u8,
    log_file: Option<&std::path::Path>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .init();
            Ok(None)
        }
    }
}

#[cfg(feature = "http-client")]
async fn run(cli: &Cli, config: &FileConfig, settings: OrchestratorSettings) -> Result<()> {
    use roundtable_application::ProcessTurnUseCase;
    use roundtable_domain::ModelCatalog;
    use roundtable_infrastructure::{
        JsonlTranscriptStore, LocalToolExecutor, OpenAiCompatClient, RiskBasedGate,
    };
    use roundtable_presentation::ChatRepl;
    use std::sync::Arc;

    // === Dependency Injection ===
    let client = Arc::new(
        OpenAiCompatClient::from_config(&config.provider)
            .context("failed to build model client")?
            .with_models(settings.models.clone()),
    );

    let tools = if config.tools.enabled {
        let mut executor = LocalToolExecutor::new();
        if let Some(dir) = &config.tools.working_dir {
            executor = executor.with_working_dir(dir.clone());
        }
        executor
    } else {
        LocalToolExecutor::with_tools(Vec::new())
    };

    let gate = RiskBasedGate::new().with_auto_approve(config.tools.auto_approve.clone());
    let catalog = Arc::new(ModelCatalog::builtin());
    let models = settings.models.clone();

    let mut use_case = ProcessTurnUseCase::new(
        client,
        Arc::new(tools),
        Arc::new(gate),
        Arc::clone(&catalog),
        settings,
    );

    if config.transcript.enabled {
        let path = transcript_path(config);
        let store =
            JsonlTranscriptStore::new(&path).context("failed to open transcript store")?;
        info!("Recording transcript to {}", path.display());
        use_case = use_case.with_transcript(Arc::new(store));
    }

    let mut repl = ChatRepl::new(use_case, models, catalog).with_spinner(!cli.quiet);
    repl.run().await?;

    Ok(())
}

#[cfg(not(feature = "http-client"))]
async fn run(_cli: &Cli, _config: &FileConfig, _settings: OrchestratorSettings) -> Result<()> {
    bail!("this build has no model provider; rebuild with the http-client feature")
}

#[cfg(feature = "http-client")]
fn transcript_path(config: &FileConfig) -> PathBuf {
    let dir = config
        .transcript
        .dir
        .as_ref()
        .map(PathBuf::from)
        .or_else(|| dirs::data_dir().map(|p| p.join("roundtable").join("transcripts")))
        .unwrap_or_else(|| PathBuf::from("transcripts"));
    let name = chrono::Local::now()
        .format("chat-%Y%m%d-%H%M%S.jsonl")
        .to_string();
    dir.join(name)
}
