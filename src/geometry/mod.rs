//! Геометрия раскладки: прямоугольники окон, точка курсора и размер экрана.
//!
//! Все вычисления целочисленные, начало координат в левом верхнем углу,
//! ось Y направлена вниз.

pub mod quadrant;

pub use quadrant::{quadrant, Quadrant};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Идентификатор окна X11
pub type WindowId = u64;

/// Допуск при проверке соприкосновения краёв (поглощает округления WM)
pub const ADJACENCY_TOLERANCE: i64 = 5;

/// Прямоугольник окна в пикселях экрана
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Прямоугольник на весь экран
    pub fn full_screen(screen: ScreenSize) -> Self {
        Self::new(0, 0, screen.width, screen.height)
    }

    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Окно выше, чем шире
    pub fn is_tall(&self) -> bool {
        self.height > self.width
    }

    /// Точка внутри прямоугольника, границы включительно с обеих сторон
    pub fn contains(&self, px: i32, py: i32) -> bool {
        let (px, py) = (px as i64, py as i64);
        (self.x as i64..=self.right()).contains(&px) && (self.y as i64..=self.bottom()).contains(&py)
    }

    /// Пересечение с ненулевой площадью
    pub fn intersects(&self, other: &Rect) -> bool {
        (self.x as i64) < other.right()
            && (other.x as i64) < self.right()
            && (self.y as i64) < other.bottom()
            && (other.y as i64) < self.bottom()
    }

    pub fn is_adjacent_to(&self, other: &Rect) -> bool {
        adjacent(self, other)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}x{})", self.x, self.y, self.width, self.height)
    }
}

/// Окна соприкасаются краями (с допуском) и их проекции на перпендикулярную ось перекрываются.
pub fn adjacent(a: &Rect, b: &Rect) -> bool {
    let touches = |edge: i64, other_edge: i64| (edge - other_edge).abs() < ADJACENCY_TOLERANCE;

    // b слева или справа от a
    let horizontal = (touches(b.right(), a.x as i64) || touches(b.x as i64, a.right()))
        && ((a.y as i64) < b.bottom() && a.bottom() > b.y as i64);

    // b сверху или снизу от a
    let vertical = (touches(b.bottom(), a.y as i64) || touches(b.y as i64, a.bottom()))
        && ((a.x as i64) < b.right() && a.right() > b.x as i64);

    horizontal || vertical
}

/// Координаты курсора
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Размер экрана, запрашивается заново перед каждой раскладкой
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Строго шире, чем выше
    pub fn is_wide(&self) -> bool {
        self.width > self.height
    }
}

impl fmt::Display for ScreenSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_inclusive_on_all_edges() {
        let rect = Rect::new(10, 20, 100, 50);

        assert!(rect.contains(10, 20));
        assert!(rect.contains(110, 70));
        assert!(rect.contains(60, 45));
        assert!(!rect.contains(9, 20));
        assert!(!rect.contains(111, 70));
        assert!(!rect.contains(50, 71));
    }

    #[test]
    fn test_adjacent_side_by_side() {
        let left = Rect::new(0, 0, 960, 1080);
        let right = Rect::new(960, 0, 960, 1080);

        assert!(adjacent(&left, &right));
        assert!(adjacent(&right, &left));
    }

    #[test]
    fn test_adjacent_within_tolerance() {
        let top = Rect::new(0, 0, 500, 300);
        let gap_of_four = Rect::new(100, 304, 200, 200);
        let gap_of_five = Rect::new(100, 305, 200, 200);

        assert!(adjacent(&top, &gap_of_four));
        assert!(!adjacent(&top, &gap_of_five));
    }

    #[test]
    fn test_adjacent_requires_overlapping_projection() {
        let a = Rect::new(0, 0, 100, 100);
        // касаются только углом
        let corner = Rect::new(100, 100, 100, 100);
        // общий край, но по вертикали не перекрываются
        let shifted = Rect::new(100, 200, 100, 100);

        assert!(!adjacent(&a, &corner));
        assert!(!adjacent(&a, &shifted));
    }

    #[test]
    fn test_adjacent_is_symmetric() {
        let rects = [
            Rect::new(0, 0, 960, 540),
            Rect::new(960, 0, 960, 540),
            Rect::new(0, 540, 960, 540),
            Rect::new(962, 543, 958, 537),
            Rect::new(400, 300, 10, 10),
            Rect::new(0, 0, 1920, 1080),
            Rect::new(1915, 0, 5, 5),
        ];

        for a in &rects {
            for b in &rects {
                assert_eq!(adjacent(a, b), adjacent(b, a), "{} vs {}", a, b);
            }
        }
    }

    #[test]
    fn test_intersects_ignores_shared_edges() {
        let left = Rect::new(0, 0, 960, 1080);
        let right = Rect::new(960, 0, 960, 1080);
        let overlapping = Rect::new(959, 0, 10, 10);

        assert!(!left.intersects(&right));
        assert!(left.intersects(&overlapping));
        assert!(right.intersects(&overlapping));
    }

    #[test]
    fn test_screen_aspect() {
        assert!(ScreenSize::new(1920, 1080).is_wide());
        assert!(!ScreenSize::new(1080, 1080).is_wide());
        assert!(Rect::new(0, 0, 500, 1000).is_tall());
        assert!(!Rect::new(0, 0, 1000, 1000).is_tall());
    }
}
