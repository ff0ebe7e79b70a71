use anyhow::Context;
use clap::Parser;
use kaktus_status::core::ConfigProvider;
use kaktus_status::output::render;
use kaktus_status::utils::error::ErrorSeverity;
use kaktus_status::utils::{logger, validation::Validate};
use kaktus_status::{CliArgs, HttpTransport, StatusChecker, TomlConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 初始化日誌
    if args.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting kaktus-status");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("failed to load config file '{}'", args.config))?;
    args.apply_overrides(&mut config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - portal will not be contacted");
        println!("Portal:        {}", config.dashboard_url());
        println!("Username:      {}", config.username());
        println!("Poll attempts: {}", config.poll_attempts());
        println!("Poll delay:    {:?}", config.poll_delay());
        println!("Timeout:       {:?}", config.timeout());
        return Ok(());
    }

    let transport = HttpTransport::new(config.timeout(), config.user_agent())?;
    let checker = StatusChecker::new(transport, config);

    match checker.check_status().await {
        Ok(record) => {
            println!("{}", render(&record, args.format)?);
        }
        Err(e) => {
            tracing::error!(
                "❌ Status check failed: {} (Category: {:?}, Severity: {:?}, retryable: {})",
                e,
                e.category(),
                e.severity(),
                e.is_retryable()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            // 依錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }

    Ok(())
}
