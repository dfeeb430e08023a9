use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

mod config;
mod error;
mod events;
mod geometry;
mod layout;
mod mappings;
mod registry;
mod services;
mod utils;

use config::{Config, LoggingConfig};
use services::{create_hotkey_listener, create_window_system, TilingDispatcher};

#[derive(Parser, Debug)]
#[command(name = "hotkey-tiler")]
#[command(about = "Тайлер окон X11: горячая клавиша открывает окно у курсора, другая закрывает окно под курсором")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "tiler.toml")]
    config: String,

    /// Режим сухого запуска (эмуляция окон и нажатий)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования (перекрывает logging.level)
    #[arg(long)]
    log_level: Option<String>,

    /// Напечатать итоговую конфигурацию в TOML и выйти
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(&args.config)?;
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
        config.validate()?;
    }

    if args.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    init_tracing(&config.logging)?;

    info!("Запуск Hotkey Tiler v{}", env!("CARGO_PKG_VERSION"));
    info!("Конфигурация загружена из: {}", args.config);
    info!(
        "Горячие клавиши: открыть = {}, закрыть = {}",
        config.open_hotkey()?,
        config.close_hotkey()?
    );
    info!("Приложение для новых окон: {} {}", config.spawn.command, config.spawn.args.join(" "));

    if args.dry_run {
        warn!("Режим сухого запуска - окна и клавиатура эмулируются");
    } else {
        utils::permissions::check_permissions(&config)?;
    }

    let config = Arc::new(config);

    let window_system = create_window_system(args.dry_run).await?;
    let (sender, receiver) = mpsc::channel(config.dispatcher.queue_capacity);
    let hotkey_listener = create_hotkey_listener(config.clone(), sender, args.dry_run)?;
    let dispatcher = TilingDispatcher::new(config.clone(), window_system);

    info!("Все компоненты инициализированы");

    let listener_handle = tokio::spawn(async move {
        if let Err(e) = hotkey_listener.run().await {
            error!("Ошибка в HotkeyListener: {}", e);
        }
    });
    let dispatcher_handle = tokio::spawn(async move {
        if let Err(e) = dispatcher.run(receiver).await {
            error!("Ошибка в TilingDispatcher: {}", e);
        }
    });

    info!("Все сервисы запущены");

    match signal::ctrl_c().await {
        Ok(()) => info!("Получен сигнал завершения (Ctrl+C)"),
        Err(err) => error!("Ошибка при ожидании сигнала завершения: {}", err),
    }

    info!("Завершение работы...");

    // Прерываем задачи, чтобы гарантированно освободить grab в Drop
    listener_handle.abort();
    dispatcher_handle.abort();

    let shutdown_timeout = tokio::time::Duration::from_secs(5);
    let shutdown_result = tokio::time::timeout(shutdown_timeout, async {
        let _ = listener_handle.await;
        let _ = dispatcher_handle.await;
    })
    .await;

    match shutdown_result {
        Ok(_) => info!("Все сервисы завершили работу корректно"),
        Err(_) => warn!("Таймаут при завершении сервисов"),
    }

    info!("Hotkey Tiler завершил работу");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let directives = if logging.filter.is_empty() {
        logging.level.clone()
    } else {
        format!("{},{}", logging.level, logging.filter)
    };

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(directives))?;

    let registry = tracing_subscriber::registry().with(filter);
    match logging.format.as_str() {
        "compact" => registry.with(fmt::layer().compact()).init(),
        _ => registry.with(fmt::layer().pretty()).init(),
    }

    Ok(())
}
