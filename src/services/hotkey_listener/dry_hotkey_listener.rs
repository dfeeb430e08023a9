use crate::config::Config;
use crate::error::Result;
use crate::events::TilerCommand;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{sleep, Duration};
use tracing::{debug, info};

use super::r#trait::HotkeyListenerTrait;

/// Сценарий dry-run: три окна, затем закрытие окна под курсором
const SCRIPT: [TilerCommand; 4] = [
    TilerCommand::Open,
    TilerCommand::Open,
    TilerCommand::Open,
    TilerCommand::Close,
];

const SCRIPT_STEP: Duration = Duration::from_secs(2);

pub struct DryRunHotkeyListener {
    config: Arc<Config>,
    commands: mpsc::Sender<TilerCommand>,
}

impl DryRunHotkeyListener {
    pub fn new(config: Arc<Config>, commands: mpsc::Sender<TilerCommand>) -> Self {
        info!("Инициализация DryRunHotkeyListener");
        Self { config, commands }
    }

    async fn run_impl(self) -> Result<()> {
        info!("Dry-run режим - HotkeyListener эмулирует нажатия");
        info!(
            "Горячие клавиши (dry-run): open = {}, close = {}",
            self.config.hotkeys.open, self.config.hotkeys.close
        );

        for command in SCRIPT {
            sleep(SCRIPT_STEP).await;
            info!("[DRY RUN] Эмуляция горячей клавиши: {}", command);
            self.commands
                .send(command)
                .await
                .map_err(|_| crate::tiler_error!(service_unavailable, "диспетчер тайлинга остановлен"))?;
        }

        info!("[DRY RUN] Сценарий завершён, ожидаем Ctrl+C");
        loop {
            sleep(Duration::from_secs(5)).await;
            debug!("HotkeyListener работает в dry-run режиме");
        }
    }
}

#[async_trait::async_trait]
impl HotkeyListenerTrait for DryRunHotkeyListener {
    async fn run(self: Box<Self>) -> Result<()> {
        (*self).run_impl().await
    }
}
