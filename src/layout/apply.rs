use super::Placement;
use crate::registry::WindowRegistry;
use crate::services::WindowSystem;
use tracing::{debug, error, warn};

/// Итог применения раскладки
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ApplyReport {
    pub applied: usize,
    pub gone: usize,
    pub failed: usize,
}

impl ApplyReport {
    pub fn is_complete(&self) -> bool {
        self.gone == 0 && self.failed == 0
    }
}

/// Применить размещения по одному: перемещение, затем изменение размера.
///
/// Не атомарно. Ошибка на одном окне не откатывает уже перемещённые и не
/// останавливает остальные. Успешно применённая геометрия запоминается в
/// реестре.
pub async fn apply(
    system: &dyn WindowSystem,
    registry: &mut WindowRegistry,
    placements: &[Placement],
) -> ApplyReport {
    let mut report = ApplyReport::default();

    for placement in placements {
        let Placement { id, rect } = *placement;

        let result = match system.move_to(id, rect.x, rect.y).await {
            Ok(()) => system.resize_to(id, rect.width, rect.height).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                debug!("Размещение применено: {}", placement);
                registry.update_rect(id, rect);
                report.applied += 1;
            }
            Err(e) if e.is_window_gone() => {
                warn!("Окно {:#x} исчезло во время раскладки: {}", id, e);
                report.gone += 1;
            }
            Err(e) => {
                error!("Не удалось применить размещение {}: {}", placement, e);
                report.failed += 1;
            }
        }
    }

    report
}
