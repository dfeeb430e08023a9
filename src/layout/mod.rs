//! Движок раскладки.
//!
//! Два алгоритма:
//! - вставка ([`plan_insertion`]): делит окно под курсором пополам, чтобы
//!   разместить только что открытое окно;
//! - перераспределение ([`plan_redistribution`]): после закрытия окна заново
//!   раскладывает все окна только по их количеству.
//!
//! Оба алгоритма чистые и возвращают список [`Placement`]. Применение к
//! реальным окнам выполняет [`apply`].

mod apply;
mod insertion;
mod redistribution;

pub use apply::{apply, ApplyReport};
pub use insertion::plan_insertion;
pub use redistribution::plan_redistribution;

use crate::geometry::{Rect, WindowId};
use smallvec::SmallVec;
use std::fmt;

/// Одна инструкция перемещения+изменения размера
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub id: WindowId,
    pub rect: Rect,
}

impl Placement {
    pub fn new(id: WindowId, rect: Rect) -> Self {
        Self { id, rect }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x} -> {}", self.id, self.rect)
    }
}

/// Вставка даёт не больше двух размещений, перераспределение обычно до четырёх
pub type Placements = SmallVec<[Placement; 4]>;
