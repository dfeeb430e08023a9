use crate::config::Config;
use crate::error::{TilerError, Result};
use crate::events::{ProcessHandle, TilerCommand, WindowInfo};
use crate::geometry::WindowId;
use crate::layout::{self, ApplyReport, Placements};
use crate::registry::{TrackedWindow, WindowRegistry};
use crate::services::WindowSystem;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

/// Единственный обработчик команд тайлинга.
///
/// Владеет реестром окон эксклюзивно; команды из очереди обрабатываются
/// строго по одной, от изменения реестра до последнего перемещения окна.
pub struct TilingDispatcher {
    config: Arc<Config>,
    system: Arc<dyn WindowSystem>,
    registry: WindowRegistry,
}

impl TilingDispatcher {
    pub fn new(config: Arc<Config>, system: Arc<dyn WindowSystem>) -> Self {
        info!("Инициализация TilingDispatcher (оконная система: {})", system.name());
        Self {
            config,
            system,
            registry: WindowRegistry::new(),
        }
    }

    pub fn registry(&self) -> &WindowRegistry {
        &self.registry
    }

    /// Обрабатывать команды, пока отправители живы
    pub async fn run(mut self, mut commands: mpsc::Receiver<TilerCommand>) -> Result<()> {
        info!("TilingDispatcher запущен");

        while let Some(command) = commands.recv().await {
            self.handle_command(command).await;
        }

        info!("Очередь команд закрыта, TilingDispatcher завершает работу");
        Ok(())
    }

    /// Выполнить команду; ошибки только логируются
    pub async fn handle_command(&mut self, command: TilerCommand) {
        debug!("Команда: {}", command);

        let result = match command {
            TilerCommand::Open => self.on_open_requested().await,
            TilerCommand::Close => self.on_close_requested().await,
        };

        match result {
            Ok(id) => debug!("Команда {} выполнена для окна {:#x}", command, id),
            Err(e @ TilerError::NoWindowAtPointer { .. }) => warn!("{}", e),
            Err(e @ TilerError::NoActiveWindow(_)) => warn!("{}", e),
            Err(e) => error!("Ошибка выполнения команды {}: {}", command, e),
        }
    }

    /// Запустить приложение, дождаться его окна и вписать в раскладку
    pub async fn on_open_requested(&mut self) -> Result<WindowId> {
        let spawn = &self.config.spawn;
        info!("Горячая клавиша: открываем новое окно ({})", spawn.command);

        // окно в фокусе до запуска точно не наше: новое окно ещё не отображено
        let previous_focus = self.system.active_window().await?.map(|w| w.id);

        let process = self.system.spawn_process(&spawn.command, &spawn.args).await?;
        let window = self.wait_for_new_window(&process, previous_focus).await?;
        info!("Появилось окно {} процесса {}", window, process);

        let rect = match window.geometry {
            Some(rect) => rect,
            None => self.system.window_geometry(window.id).await?,
        };

        self.refresh_registry().await;
        self.registry.add(TrackedWindow::new(window.id, rect));

        let pointer = self.system.pointer_position().await?;
        let screen = self.system.screen_size().await?;
        let plan = layout::plan_insertion(&self.registry, pointer, screen);
        self.apply_plan("вставка", &plan).await;

        Ok(window.id)
    }

    /// Закрыть окно под курсором и перераспределить остальные
    pub async fn on_close_requested(&mut self) -> Result<WindowId> {
        info!("Горячая клавиша: закрываем окно под курсором");

        self.refresh_registry().await;

        let pointer = self.system.pointer_position().await?;
        let id = self
            .registry
            .find_at(pointer.x, pointer.y)
            .map(|w| w.id)
            .ok_or(TilerError::NoWindowAtPointer { x: pointer.x, y: pointer.y })?;

        match self.system.close(id).await {
            Ok(()) => self.wait_for_window_gone(id).await,
            Err(TilerError::WindowGone(_)) => debug!("Окно {:#x} уже закрыто", id),
            Err(e) => return Err(e),
        }

        self.registry.remove(id);
        info!("Окно {:#x} закрыто, осталось {} окон", id, self.registry.len());

        let screen = self.system.screen_size().await?;
        let plan = layout::plan_redistribution(&self.registry, screen);
        self.apply_plan("перераспределение", &plan).await;

        Ok(id)
    }

    async fn apply_plan(&mut self, kind: &str, plan: &Placements) -> ApplyReport {
        let report = layout::apply(self.system.as_ref(), &mut self.registry, plan).await;
        if report.is_complete() {
            debug!("Раскладка ({}) применена к {} окнам", kind, report.applied);
        } else {
            warn!(
                "Раскладка ({}) применена частично: успешно {}, исчезло {}, ошибок {}",
                kind, report.applied, report.gone, report.failed
            );
        }
        report
    }

    /// Обновить последнюю известную геометрию и убрать исчезнувшие окна
    async fn refresh_registry(&mut self) {
        for id in self.registry.ids() {
            match self.system.window_geometry(id).await {
                Ok(rect) => {
                    self.registry.update_rect(id, rect);
                }
                Err(TilerError::WindowGone(_)) => {
                    info!("Окно {:#x} закрыто вне тайлера, убираем из реестра", id);
                    self.registry.remove(id);
                }
                Err(e) => warn!("Не удалось обновить геометрию окна {:#x}: {}", id, e),
            }
        }
    }

    /// Ждать появления окна запущенного процесса
    async fn wait_for_new_window(
        &self,
        process: &ProcessHandle,
        previous_focus: Option<WindowId>,
    ) -> Result<WindowInfo> {
        let spawn = &self.config.spawn;

        match timeout(spawn.window_timeout(), self.poll_new_window(process, previous_focus)).await {
            Ok(result) => result,
            Err(_) => Err(crate::tiler_error!(
                no_active_window,
                "процесс {} не создал окно за {} мс",
                process,
                spawn.window_timeout_ms
            )),
        }
    }

    async fn poll_new_window(
        &self,
        process: &ProcessHandle,
        previous_focus: Option<WindowId>,
    ) -> Result<WindowInfo> {
        loop {
            if let Some(window) = self.system.active_window().await? {
                if self.is_spawned_window(&window, process, previous_focus) {
                    return Ok(window);
                }
            }
            sleep(self.config.spawn.poll_interval()).await;
        }
    }

    /// Активное окно принимается как новое, если оно не отслеживается, не было
    /// в фокусе до запуска и (когда оба pid известны) принадлежит процессу
    fn is_spawned_window(
        &self,
        window: &WindowInfo,
        process: &ProcessHandle,
        previous_focus: Option<WindowId>,
    ) -> bool {
        if self.registry.contains(window.id) || previous_focus == Some(window.id) {
            return false;
        }

        match (window.pid, process.pid) {
            (Some(window_pid), Some(process_pid)) if window_pid != process_pid => {
                debug!(
                    "Окно {} принадлежит pid {}, ждём окно процесса {}",
                    window, window_pid, process
                );
                false
            }
            _ => true,
        }
    }

    /// Ждать исчезновения окна; по таймауту раскладка продолжается
    async fn wait_for_window_gone(&self, id: WindowId) {
        let wait = async {
            loop {
                match self.system.window_exists(id).await {
                    Ok(false) => return,
                    Ok(true) => {}
                    Err(e) => {
                        debug!("Не удалось проверить окно {:#x}: {}", id, e);
                        return;
                    }
                }
                sleep(self.config.spawn.poll_interval()).await;
            }
        };

        if timeout(self.config.close.settle_timeout(), wait).await.is_err() {
            warn!(
                "Окно {:#x} не закрылось за {} мс, перераспределяем без него",
                id, self.config.close.settle_timeout_ms
            );
        }
    }
}
