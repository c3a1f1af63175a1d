use clap::Parser;
use group_prune::core::ConfigProvider;
use group_prune::utils::error::{ErrorSeverity, PruneError};
use group_prune::utils::{logger, validation::Validate};
use group_prune::{CliConfig, FileErrorLog, GraphClient, PruneEngine, TerminalSelector};
use std::sync::Arc;

fn exit_code(e: &PruneError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(e: PruneError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(exit_code(&e));
}

#[tokio::main]
async fn main() {
    let mut config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting group-prune");

    if let Err(e) = config.load_settings_file() {
        fail(e);
    }
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        fail(e);
    }

    let sink = match FileErrorLog::open(config.error_log_path()) {
        Ok(sink) => Arc::new(sink),
        Err(e) => fail(e),
    };

    let client = match config.timeout() {
        Some(timeout) => match GraphClient::with_timeout(config.api_url(), timeout) {
            Ok(client) => client,
            Err(e) => fail(e),
        },
        None => GraphClient::new(config.api_url()),
    };

    let mut engine = PruneEngine::new(client, TerminalSelector::stdio(), config, sink);

    match engine.run().await {
        Ok(report) => {
            tracing::info!(
                fetched = report.fetched,
                matched = report.matched,
                selected = report.selected,
                "✅ Run finished"
            );
        }
        Err(e) => fail(e),
    }
}
