use app_console::commands::{self, Command};
use clap::Parser;
use common::config::AppConfig;
use common::errors::AppError;
use common::rest::HttpRestClient;
use log::{info, LevelFilter};
use std::str::FromStr;
use std::sync::Arc;

/// 会议管理后台的命令行客户端
#[derive(Parser, Debug)]
#[command(name = "app_console", version, about)]
struct Cli {
    /// 配置文件，环境变量 APP_* 可覆盖其中的值
    #[arg(long, default_value = "main-config.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    // 读取配置文件
    let app_cfg = AppConfig::init(&cli.config)?;
    //初始化日志
    init_log(&app_cfg)?;

    let api = app_cfg.get_api();
    info!("using backend {}", api.base_url);
    let client = Arc::new(HttpRestClient::new(&api)?);
    commands::run(cli.command, client, &app_cfg).await?;
    Ok(())
}

pub fn init_log(config: &AppConfig) -> Result<(), AppError> {
    let mut builder = env_logger::Builder::new();
    let log_level = &config.get_sys().log_level;
    let level = LevelFilter::from_str(log_level)
        .map_err(|e| AppError::Internal(format!("invalid log_level {}: {}", log_level, e)))?;
    builder.filter(None, level).init();
    Ok(())
}
