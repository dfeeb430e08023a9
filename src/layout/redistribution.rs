use super::{Placement, Placements};
use crate::geometry::{Rect, ScreenSize};
use crate::registry::WindowRegistry;
use tracing::debug;

/// Максимум колонок в сетке для пяти и более окон
const MAX_GRID_COLUMNS: usize = 3;

/// Раскладка после закрытия окна: все окна заново, только по их количеству.
pub fn plan_redistribution(registry: &WindowRegistry, screen: ScreenSize) -> Placements {
    let rects = redistribution_rects(registry.len(), screen);
    debug!("Перераспределение {} окон на экране {}", registry.len(), screen);

    registry
        .iter()
        .zip(rects)
        .map(|(window, rect)| Placement::new(window.id, rect))
        .collect()
}

/// Прямоугольники для `count` окон в порядке реестра.
pub fn redistribution_rects(count: usize, screen: ScreenSize) -> Vec<Rect> {
    let ScreenSize { width, height } = screen;

    match count {
        0 => Vec::new(),
        1 => vec![Rect::full_screen(screen)],
        2 => {
            if screen.is_wide() {
                let half = width / 2;
                vec![
                    Rect::new(0, 0, half, height),
                    Rect::new(half as i32, 0, half, height),
                ]
            } else {
                let half = height / 2;
                vec![
                    Rect::new(0, 0, width, half),
                    Rect::new(0, half as i32, width, half),
                ]
            }
        }
        3 | 4 => {
            let (half_w, half_h) = (width / 2, height / 2);
            let quadrants = [
                Rect::new(0, 0, half_w, half_h),
                Rect::new(half_w as i32, 0, half_w, half_h),
                Rect::new(0, half_h as i32, half_w, half_h),
                Rect::new(half_w as i32, half_h as i32, half_w, half_h),
            ];
            quadrants[..count].to_vec()
        }
        _ => grid_rects(count, screen),
    }
}

fn grid_rects(count: usize, screen: ScreenSize) -> Vec<Rect> {
    let cols = count.min(MAX_GRID_COLUMNS);
    let rows = count.div_ceil(cols);
    let cell_width = screen.width / cols as u32;
    let cell_height = screen.height / rows as u32;
    let filled_in_last_row = count % cols;

    (0..count)
        .map(|i| {
            let (row, col) = (i / cols, i % cols);

            // последнее окно неполного ряда растягивается на пустые колонки
            let width = if filled_in_last_row != 0 && row == rows - 1 && col == filled_in_last_row - 1 {
                cell_width * (cols - filled_in_last_row + 1) as u32
            } else {
                cell_width
            };

            Rect::new(
                (col as u32 * cell_width) as i32,
                (row as u32 * cell_height) as i32,
                width,
                cell_height,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TrackedWindow;

    fn assert_no_overlap(rects: &[Rect]) {
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                assert!(!a.intersects(b), "{} перекрывает {}", a, b);
            }
        }
    }

    fn total_area(rects: &[Rect]) -> u64 {
        rects.iter().map(Rect::area).sum()
    }

    #[test]
    fn test_zero_and_one_window() {
        let screen = ScreenSize::new(1920, 1080);

        assert!(redistribution_rects(0, screen).is_empty());
        assert_eq!(redistribution_rects(1, screen), vec![Rect::new(0, 0, 1920, 1080)]);
    }

    #[test]
    fn test_two_windows_follow_screen_aspect() {
        assert_eq!(
            redistribution_rects(2, ScreenSize::new(1920, 1080)),
            vec![Rect::new(0, 0, 960, 1080), Rect::new(960, 0, 960, 1080)]
        );
        assert_eq!(
            redistribution_rects(2, ScreenSize::new(1080, 1920)),
            vec![Rect::new(0, 0, 1080, 960), Rect::new(0, 960, 1080, 960)]
        );
        // квадратный экран делится на верх/низ
        assert_eq!(
            redistribution_rects(2, ScreenSize::new(1000, 1000)),
            vec![Rect::new(0, 0, 1000, 500), Rect::new(0, 500, 1000, 500)]
        );
    }

    #[test]
    fn test_three_and_four_use_quadrants() {
        let screen = ScreenSize::new(1920, 1080);
        let four = redistribution_rects(4, screen);

        assert_eq!(
            four,
            vec![
                Rect::new(0, 0, 960, 540),
                Rect::new(960, 0, 960, 540),
                Rect::new(0, 540, 960, 540),
                Rect::new(960, 540, 960, 540),
            ]
        );
        assert_eq!(redistribution_rects(3, screen), four[..3].to_vec());
    }

    #[test]
    fn test_small_counts_cover_screen_without_overlap() {
        let screen = ScreenSize::new(1920, 1080);
        let screen_area = Rect::full_screen(screen).area();

        for count in [1, 2, 4] {
            let rects = redistribution_rects(count, screen);
            assert_no_overlap(&rects);
            assert_eq!(total_area(&rects), screen_area, "count = {}", count);
        }

        let three = redistribution_rects(3, screen);
        assert_no_overlap(&three);
        assert_eq!(total_area(&three), screen_area / 4 * 3);
    }

    #[test]
    fn test_five_windows_widen_last_cell() {
        let rects = redistribution_rects(5, ScreenSize::new(1200, 900));

        assert_eq!(
            rects,
            vec![
                Rect::new(0, 0, 400, 450),
                Rect::new(400, 0, 400, 450),
                Rect::new(800, 0, 400, 450),
                Rect::new(0, 450, 400, 450),
                Rect::new(400, 450, 800, 450),
            ]
        );
    }

    #[test]
    fn test_full_last_row_is_not_widened() {
        let rects = redistribution_rects(6, ScreenSize::new(1200, 900));

        assert!(rects.iter().all(|r| r.width == 400 && r.height == 450));
        assert_eq!(rects[5], Rect::new(800, 450, 400, 450));
    }

    #[test]
    fn test_grid_never_overlaps() {
        let screen = ScreenSize::new(1366, 768);
        for count in 5..=13 {
            let rects = redistribution_rects(count, screen);
            assert_eq!(rects.len(), count);
            assert_no_overlap(&rects);
            assert!(rects.iter().all(|r| r.right() <= 1366 && r.bottom() <= 768));
        }
    }

    #[test]
    fn test_seven_windows_single_leftover_spans_row() {
        let rects = redistribution_rects(7, ScreenSize::new(1200, 900));

        assert_eq!(rects[6], Rect::new(0, 600, 1200, 300));
    }

    #[test]
    fn test_plan_follows_registry_order() {
        let mut registry = WindowRegistry::new();
        for id in [30, 10, 20] {
            registry.add(TrackedWindow::new(id, Rect::new(0, 0, 100, 100)));
        }

        let plan = plan_redistribution(&registry, ScreenSize::new(1920, 1080));
        let ids: Vec<_> = plan.iter().map(|p| p.id).collect();

        assert_eq!(ids, vec![30, 10, 20]);
        assert_eq!(plan[2].rect, Rect::new(0, 540, 960, 540));
    }
}
