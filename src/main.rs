use std::{
    io::{self, BufRead, IsTerminal, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::{Args, Parser, Subcommand};
use rusafety::{
    Error, PipelineError, Result, RiskPipeline,
    client::{ApiKey, resolve_api_key},
    draft::DraftEdits,
    export::{export_file, import_file},
    input::RawTaskInput,
    render::{ViewMode, render},
    shared::{PipelineConfig, Session},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rusafety", version, about = "AI 건설 위험성평가 생성기")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Generation service API key (falls back to config, then environment)
    #[arg(long, global = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ask for recommended equipment and documents (first stage)
    Recommend {
        #[command(flatten)]
        task: TaskArgs,
    },
    /// Generate the risk assessment table
    Assess {
        #[command(flatten)]
        task: TaskArgs,

        /// Ask for an equipment draft first and merge edits before the table
        #[arg(long)]
        two_stage: bool,

        /// JSON file with edits to the equipment draft (implies --two-stage)
        #[arg(long)]
        edits: Option<PathBuf>,

        /// table | cards
        #[arg(long, default_value = "table")]
        view: String,

        /// Write the result as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Render a previously exported CSV
    Show {
        #[arg(long)]
        csv: PathBuf,

        #[arg(long, default_value = "table")]
        view: String,
    },
    /// List the selectable risk-characteristic tags
    Tags,
}

#[derive(Args)]
struct TaskArgs {
    /// JSON file with task fields; flags override its values
    #[arg(long)]
    input: Option<PathBuf>,

    /// 작업명
    #[arg(long)]
    task: Option<String>,

    /// 작업 위치
    #[arg(long)]
    location: Option<String>,

    /// 위험 특성 (repeatable)
    #[arg(long = "tag")]
    tags: Vec<String>,

    /// 기타 위험 특성
    #[arg(long)]
    context: Option<String>,

    #[arg(long)]
    workers: Option<i64>,

    #[arg(long)]
    materials: Option<String>,

    #[arg(long)]
    tools: Option<String>,

    /// 보호구 (repeatable or comma-joined)
    #[arg(long = "ppe")]
    protective_equipment: Vec<String>,

    #[arg(long)]
    environment: Option<String>,
}

impl TaskArgs {
    fn into_raw(self) -> Result<RawTaskInput> {
        let mut raw = match &self.input {
            Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
            None => RawTaskInput::default(),
        };
        raw.task_name = self.task.or(raw.task_name);
        raw.location = self.location.or(raw.location);
        if !self.tags.is_empty() {
            raw.tags = self.tags;
        }
        raw.risk_context = self.context.or(raw.risk_context);
        raw.worker_count = self.workers.or(raw.worker_count);
        raw.materials = self.materials.or(raw.materials);
        raw.tools = self.tools.or(raw.tools);
        if !self.protective_equipment.is_empty() {
            raw.protective_equipment = self.protective_equipment;
        }
        raw.environment = self.environment.or(raw.environment);
        Ok(raw)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("설정 오류: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.log_level);

    match run(cli.command, cli.api_key, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("오류: {e}");
            if let Error::Pipeline(PipelineError::MalformedResponse { raw }) = &e {
                eprintln!("--- 원본 응답 ---\n{raw}");
            }
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<PipelineConfig> {
    let config = match path {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };
    config.with_env_overrides()
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run(command: Command, api_key: Option<String>, config: PipelineConfig) -> Result<()> {
    match command {
        Command::Tags => {
            for tag in config.tags.selectable() {
                println!("{tag}");
            }
            Ok(())
        }
        Command::Show { csv, view } => {
            let view: ViewMode = view.parse()?;
            let rows = import_file(&csv)?;
            print!("{}", render(&rows, view));
            Ok(())
        }
        Command::Recommend { task } => {
            let raw = task.into_raw()?;
            let mut session = open_session(&config, api_key)?;
            let pipeline = RiskPipeline::new(build_client(&config)?, config);
            let task = pipeline.normalize(raw);

            let draft = pipeline.recommend_equipment(&mut session, &task).await?;
            println!("{}", serde_json::to_string_pretty(draft)?);
            Ok(())
        }
        Command::Assess {
            task,
            two_stage,
            edits,
            view,
            csv,
        } => {
            let view: ViewMode = view.parse()?;
            let edits: Option<DraftEdits> = match edits {
                Some(path) => Some(serde_json::from_str(&std::fs::read_to_string(path)?)?),
                None => None,
            };
            let raw = task.into_raw()?;
            let mut session = open_session(&config, api_key)?;
            let pipeline = RiskPipeline::new(build_client(&config)?, config);
            let task = pipeline.normalize(raw);

            let table = if two_stage || edits.is_some() {
                let edits = edits.unwrap_or_default();
                pipeline.run_two_stage(&mut session, &task, &edits).await?
            } else {
                pipeline.run_single_stage(&mut session, &task).await?
            };
            print!("{}", render(&table.rows, view));

            if let Some(path) = csv {
                export_file(&table.rows, &path)?;
                info!("exported {} rows to {}", table.len(), path.display());
            }
            for warning in session.warnings() {
                eprintln!("주의: {warning}");
            }
            Ok(())
        }
    }
}

fn build_client(config: &PipelineConfig) -> Result<Box<dyn rusafety::client::GenerationClient>> {
    config
        .build_client()
        .map_err(|e| Error::Pipeline(PipelineError::Generation(e)))
}

/// Resolves the key from config, environment, flag or an interactive
/// prompt, in that order. A missing key is reported at generation time.
fn open_session(config: &PipelineConfig, flag: Option<String>) -> Result<Session> {
    let mut key = resolve_api_key(config.api_key.as_deref(), &config.api_key_env, flag.as_deref());
    if key.is_none() && io::stdin().is_terminal() {
        key = prompt_api_key()?;
    }
    if key.is_none() {
        warn!("no API key available; generation will be refused");
    }
    Ok(Session::new(key))
}

fn prompt_api_key() -> Result<Option<ApiKey>> {
    eprint!("API 키 입력: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(ApiKey::new(line))
}
