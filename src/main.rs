// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use clap::Parser;
use colored::Colorize;
use phsh_url::application::orchestrator::DomainOrchestrator;
use phsh_url::application::use_cases::harvest::{
    finish, flush_on_interrupt, prepare_domains, Harvester, OutputPaths, Reporter, RunOutcome,
};
use phsh_url::config::settings::Settings;
use phsh_url::domain::models::log_event::Severity;
use phsh_url::infrastructure::http::retrying_fetcher::RetryingFetcher;
use phsh_url::infrastructure::sources::factory::{parse_exclusions, SourceFactory};
use phsh_url::infrastructure::storage;
use phsh_url::presentation::cli::{banner, version_line, Cli};
use phsh_url::utils::errors::HarvestError;
use phsh_url::utils::telemetry;
use phsh_url::workers::interrupt::InterruptWatcher;
use phsh_url::workers::log_aggregator::{LogSink, NullSink, TerminalSink};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

/// 主函数
///
/// 解析命令行参数并运行收集任务，致命错误以 `[FATAL]` 前缀输出并返回非零状态
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.version {
        println!("{}", version_line());
        return ExitCode::SUCCESS;
    }

    telemetry::init_telemetry(cli.silent);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", format!("[FATAL] {}", e).red());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let sink: Arc<dyn LogSink> = if cli.silent {
        Arc::new(NullSink)
    } else {
        Arc::new(TerminalSink::new())
    };
    let reporter = Reporter::new(sink.clone(), cli.silent);

    if !cli.silent {
        eprintln!("{}", banner());
    }

    // 1. Load configuration
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Settings::default_path()?,
    };
    let settings = Settings::load(&config_path)?;
    info!("Configuration loaded");

    // 2. Read and validate domains
    let lines = match &cli.domains {
        Some(path) => storage::read_lines(path)
            .await
            .map_err(|source| HarvestError::DomainInput {
                origin: path.display().to_string(),
                source,
            })?,
        None => {
            reporter.report(Severity::Info, "Reading domains from stdin...");
            storage::read_lines_from_stdin()
                .await
                .map_err(|source| HarvestError::DomainInput {
                    origin: "stdin".to_string(),
                    source,
                })?
        }
    };

    let domains = prepare_domains(&lines, &reporter);
    if domains.is_empty() {
        return Err(HarvestError::NoDomains.into());
    }
    reporter.report(Severity::Info, format!("Loaded {} domains.", domains.len()));

    // 3. Build sources
    let (excluded, unknown) = parse_exclusions(&cli.exclude);
    for name in unknown {
        reporter.report(
            Severity::Warning,
            format!("Ignoring unknown source in exclusion list: {}", name),
        );
    }

    let fetcher = RetryingFetcher::new(settings.request_timeout(), settings.retry_policy())
        .map_err(HarvestError::from)?;
    let sources =
        SourceFactory::new(Arc::new(fetcher), settings.source_keys()).create_enabled(&excluded);

    // 4. Run until done or interrupted
    let orchestrator = DomainOrchestrator::new(sources, sink, cli.silent);
    let harvester = Harvester::new(orchestrator, reporter.clone(), settings.domain_delay());
    let paths = OutputPaths::new(&cli.output);

    let interrupt = InterruptWatcher::spawn();
    let outcome = harvester.run_until(&domains, interrupt.fired()).await;
    let snapshot = harvester.accumulator().lock().snapshot();

    // 5. Persist
    match outcome {
        RunOutcome::Completed => {
            let mut stdout = std::io::stdout().lock();
            finish(&snapshot, &paths, &reporter, &mut stdout).await?;
        }
        RunOutcome::Interrupted => flush_on_interrupt(&snapshot, &paths, &reporter).await?,
    }

    Ok(())
}
