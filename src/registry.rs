use crate::geometry::{adjacent, Rect, WindowId};
use std::fmt;
use tracing::{debug, warn};

/// Окно под управлением тайлера: идентичность + последняя известная геометрия.
/// Само окно принадлежит X-серверу.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedWindow {
    pub id: WindowId,
    pub rect: Rect,
}

impl TrackedWindow {
    pub fn new(id: WindowId, rect: Rect) -> Self {
        Self { id, rect }
    }
}

impl fmt::Display for TrackedWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x} {}", self.id, self.rect)
    }
}

/// Упорядоченный список отслеживаемых окон.
///
/// Порядок вставки значим: последний элемент это самое новое окно.
/// Дубликатов нет.
#[derive(Debug, Default, Clone)]
pub struct WindowRegistry {
    windows: Vec<TrackedWindow>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Добавить окно в конец. Повторное добавление того же id игнорируется.
    pub fn add(&mut self, window: TrackedWindow) {
        if self.contains(window.id) {
            warn!("Окно {:#x} уже отслеживается, повторное добавление пропущено", window.id);
            return;
        }
        debug!("Окно {} добавлено в реестр", window);
        self.windows.push(window);
    }

    /// Удалить окно по id. Отсутствующее окно молча пропускается.
    pub fn remove(&mut self, id: WindowId) -> Option<TrackedWindow> {
        let index = self.windows.iter().position(|w| w.id == id)?;
        let removed = self.windows.remove(index);
        debug!("Окно {} удалено из реестра", removed);
        Some(removed)
    }

    /// Первое окно в порядке вставки, содержащее точку
    pub fn find_at(&self, px: i32, py: i32) -> Option<&TrackedWindow> {
        self.windows.iter().find(|w| w.rect.contains(px, py))
    }

    /// Все окна, соприкасающиеся с `rect`
    pub fn find_adjacent_to(&self, rect: &Rect) -> Vec<&TrackedWindow> {
        self.windows
            .iter()
            .filter(|w| adjacent(rect, &w.rect))
            .collect()
    }

    /// Запомнить применённую геометрию
    pub fn update_rect(&mut self, id: WindowId, rect: Rect) -> bool {
        match self.windows.iter_mut().find(|w| w.id == id) {
            Some(window) => {
                window.rect = rect;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: WindowId) -> Option<&TrackedWindow> {
        self.windows.iter().find(|w| w.id == id)
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.windows.iter().any(|w| w.id == id)
    }

    pub fn last(&self) -> Option<&TrackedWindow> {
        self.windows.last()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackedWindow> {
        self.windows.iter()
    }

    pub fn as_slice(&self) -> &[TrackedWindow] {
        &self.windows
    }

    pub fn ids(&self) -> Vec<WindowId> {
        self.windows.iter().map(|w| w.id).collect()
    }
}
