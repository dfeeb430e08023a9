use serde::{Deserialize, Serialize};
use std::fmt;

/// Четверть экрана, в которой находится курсор
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Quadrant {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Quadrant {
    pub fn is_top(self) -> bool {
        matches!(self, Quadrant::TopLeft | Quadrant::TopRight)
    }

    pub fn is_left(self) -> bool {
        matches!(self, Quadrant::TopLeft | Quadrant::BottomLeft)
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Quadrant::TopLeft => "top-left",
            Quadrant::TopRight => "top-right",
            Quadrant::BottomLeft => "bottom-left",
            Quadrant::BottomRight => "bottom-right",
        };
        f.write_str(name)
    }
}

/// Определить четверть экрана по координатам курсора.
///
/// Экран делится по `width / 2` и `height / 2` (целочисленно); пиксель на
/// середине относится к правой/нижней половине.
pub fn quadrant(x: i32, y: i32, screen_width: u32, screen_height: u32) -> Quadrant {
    let mid_x = (screen_width / 2) as i64;
    let mid_y = (screen_height / 2) as i64;
    let right = x as i64 >= mid_x;
    let bottom = y as i64 >= mid_y;

    match (right, bottom) {
        (false, false) => Quadrant::TopLeft,
        (true, false) => Quadrant::TopRight,
        (false, true) => Quadrant::BottomLeft,
        (true, true) => Quadrant::BottomRight,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quadrant_corners() {
        assert_eq!(quadrant(0, 0, 1920, 1080), Quadrant::TopLeft);
        assert_eq!(quadrant(1919, 0, 1920, 1080), Quadrant::TopRight);
        assert_eq!(quadrant(0, 1079, 1920, 1080), Quadrant::BottomLeft);
        assert_eq!(quadrant(1919, 1079, 1920, 1080), Quadrant::BottomRight);
    }

    #[test]
    fn test_midpoint_goes_right_and_bottom() {
        assert_eq!(quadrant(960, 540, 1920, 1080), Quadrant::BottomRight);
        assert_eq!(quadrant(959, 539, 1920, 1080), Quadrant::TopLeft);
        assert_eq!(quadrant(960, 539, 1920, 1080), Quadrant::TopRight);
        assert_eq!(quadrant(959, 540, 1920, 1080), Quadrant::BottomLeft);
    }

    #[test]
    fn test_odd_screen_uses_floor_division() {
        // 1001 / 2 == 500
        assert_eq!(quadrant(500, 0, 1001, 1001), Quadrant::TopRight);
        assert_eq!(quadrant(499, 500, 1001, 1001), Quadrant::BottomLeft);
    }

    #[test]
    fn test_quadrant_is_total_and_consistent() {
        let (w, h) = (37u32, 23u32);
        for x in 0..w as i32 {
            for y in 0..h as i32 {
                let q = quadrant(x, y, w, h);
                assert_eq!(q.is_left(), x < (w / 2) as i32);
                assert_eq!(q.is_top(), y < (h / 2) as i32);
            }
        }
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Quadrant::TopLeft.to_string(), "top-left");
        assert_eq!(Quadrant::BottomRight.to_string(), "bottom-right");
    }
}
