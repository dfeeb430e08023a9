use super::{Placement, Placements};
use crate::geometry::{quadrant, Point, Quadrant, Rect, ScreenSize};
use crate::registry::WindowRegistry;
use smallvec::smallvec;
use tracing::{debug, warn};

/// Раскладка после добавления нового окна (последнего в реестре).
///
/// Единственное окно занимает весь экран. Иначе окно-цель (под курсором,
/// а если под курсором ничего нет, то предпоследнее) делится пополам между
/// собой и новым окном; остальные окна не трогаются.
pub fn plan_insertion(registry: &WindowRegistry, pointer: Point, screen: ScreenSize) -> Placements {
    let windows = registry.as_slice();
    let Some((new_window, existing)) = windows.split_last() else {
        return Placements::new();
    };

    if existing.is_empty() {
        debug!("Единственное окно {:#x} занимает весь экран {}", new_window.id, screen);
        return smallvec![Placement::new(new_window.id, Rect::full_screen(screen))];
    }

    // Новое окно последнее в порядке вставки, поэтому find_at вернёт его
    // только если курсор не над другим окном
    let target = match registry.find_at(pointer.x, pointer.y) {
        Some(window) if window.id != new_window.id => window,
        _ => {
            let fallback = &existing[existing.len() - 1];
            debug!(
                "Под курсором {} нет окна, используем предыдущее окно {:#x}",
                pointer, fallback.id
            );
            fallback
        }
    };

    let quadrant = quadrant(pointer.x, pointer.y, screen.width, screen.height);

    let split_size = if target.rect.is_tall() { target.rect.height } else { target.rect.width };
    if split_size < 2 {
        warn!("Окно {} слишком маленькое для деления, раскладка пропущена", target);
        return Placements::new();
    }

    let (target_rect, new_rect) = split_for_insertion(target.rect, quadrant);
    debug!(
        "Вставка: курсор {} ({}), цель {} -> {}, новое окно {:#x} -> {}",
        pointer, quadrant, target, target_rect, new_window.id, new_rect
    );

    smallvec![
        Placement::new(target.id, target_rect),
        Placement::new(new_window.id, new_rect),
    ]
}

/// Разделить прямоугольник цели пополам. Возвращает `(цель, новое окно)`.
///
/// Ориентация определяется формой цели: высокое окно делится на верх/низ,
/// широкое или квадратное на лево/право. Четверть курсора выбирает половину
/// для нового окна. Нечётный остаточный пиксель теряется.
pub fn split_for_insertion(target: Rect, quadrant: Quadrant) -> (Rect, Rect) {
    let Rect { x, y, width, height } = target;

    if target.is_tall() {
        let half = height / 2;
        let top = Rect::new(x, y, width, half);
        let bottom = Rect::new(x, y + half as i32, width, half);
        if quadrant.is_top() {
            (bottom, top)
        } else {
            (top, bottom)
        }
    } else {
        let half = width / 2;
        let left = Rect::new(x, y, half, height);
        let right = Rect::new(x + half as i32, y, half, height);
        if quadrant.is_left() {
            (right, left)
        } else {
            (left, right)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TrackedWindow;

    const SCREEN: ScreenSize = ScreenSize::new(1920, 1080);

    #[test]
    fn test_single_window_fills_screen() {
        let mut registry = WindowRegistry::new();
        registry.add(TrackedWindow::new(1, Rect::new(200, 200, 640, 480)));

        let plan = plan_insertion(&registry, Point::new(5, 5), SCREEN);

        assert_eq!(plan.as_slice(), &[Placement::new(1, Rect::new(0, 0, 1920, 1080))]);
    }

    #[test]
    fn test_empty_registry_plans_nothing() {
        let plan = plan_insertion(&WindowRegistry::new(), Point::new(0, 0), SCREEN);
        assert!(plan.is_empty());
    }

    #[test]
    fn test_wide_full_screen_target_top_left() {
        let mut registry = WindowRegistry::new();
        registry.add(TrackedWindow::new(1, Rect::new(0, 0, 1920, 1080)));
        registry.add(TrackedWindow::new(2, Rect::new(300, 300, 640, 480)));

        let plan = plan_insertion(&registry, Point::new(100, 100), SCREEN);

        assert_eq!(
            plan.as_slice(),
            &[
                Placement::new(1, Rect::new(960, 0, 960, 1080)),
                Placement::new(2, Rect::new(0, 0, 960, 1080)),
            ]
        );
    }

    #[test]
    fn test_pairing_table() {
        let wide = Rect::new(0, 0, 800, 400);
        let tall = Rect::new(0, 0, 400, 800);

        let cases = [
            // (четверть, цель, ожидаемая цель, ожидаемое новое окно)
            (Quadrant::TopLeft, tall, Rect::new(0, 400, 400, 400), Rect::new(0, 0, 400, 400)),
            (Quadrant::TopRight, tall, Rect::new(0, 400, 400, 400), Rect::new(0, 0, 400, 400)),
            (Quadrant::BottomLeft, tall, Rect::new(0, 0, 400, 400), Rect::new(0, 400, 400, 400)),
            (Quadrant::BottomRight, tall, Rect::new(0, 0, 400, 400), Rect::new(0, 400, 400, 400)),
            (Quadrant::TopLeft, wide, Rect::new(400, 0, 400, 400), Rect::new(0, 0, 400, 400)),
            (Quadrant::TopRight, wide, Rect::new(0, 0, 400, 400), Rect::new(400, 0, 400, 400)),
            (Quadrant::BottomLeft, wide, Rect::new(400, 0, 400, 400), Rect::new(0, 0, 400, 400)),
            (Quadrant::BottomRight, wide, Rect::new(0, 0, 400, 400), Rect::new(400, 0, 400, 400)),
        ];

        for (quadrant, target, expected_target, expected_new) in cases {
            let (target_rect, new_rect) = split_for_insertion(target, quadrant);
            assert_eq!(target_rect, expected_target, "{} / {}", quadrant, target);
            assert_eq!(new_rect, expected_new, "{} / {}", quadrant, target);
        }
    }

    #[test]
    fn test_split_halves_are_disjoint_and_cover_target() {
        let targets = [
            Rect::new(0, 0, 1920, 1080),
            Rect::new(960, 0, 960, 1080),
            Rect::new(100, 40, 300, 900),
            Rect::new(0, 0, 500, 500),
        ];
        let quadrants = [
            Quadrant::TopLeft,
            Quadrant::TopRight,
            Quadrant::BottomLeft,
            Quadrant::BottomRight,
        ];

        for target in targets {
            for quadrant in quadrants {
                let (a, b) = split_for_insertion(target, quadrant);
                assert!(!a.intersects(&b), "{} {}: {} / {}", target, quadrant, a, b);
                assert_eq!(a.area() + b.area(), target.area());
                for half in [a, b] {
                    assert!(half.x as i64 >= target.x as i64 && half.right() <= target.right());
                    assert!(half.y as i64 >= target.y as i64 && half.bottom() <= target.bottom());
                }
            }
        }
    }

    #[test]
    fn test_odd_width_drops_remainder_pixel() {
        let (target, new) = split_for_insertion(Rect::new(0, 0, 1001, 500), Quadrant::TopRight);

        assert_eq!(target, Rect::new(0, 0, 500, 500));
        assert_eq!(new, Rect::new(500, 0, 500, 500));
    }

    #[test]
    fn test_pointer_outside_windows_falls_back_to_previous_window() {
        let mut registry = WindowRegistry::new();
        registry.add(TrackedWindow::new(1, Rect::new(0, 0, 960, 1080)));
        registry.add(TrackedWindow::new(2, Rect::new(960, 0, 960, 1080)));
        registry.add(TrackedWindow::new(3, Rect::new(50, 50, 100, 100)));

        // курсор за пределами всех окон, но в правой нижней четверти
        let plan = plan_insertion(&registry, Point::new(5000, 5000), SCREEN);

        assert_eq!(plan[0], Placement::new(2, Rect::new(960, 0, 960, 540)));
        assert_eq!(plan[1], Placement::new(3, Rect::new(960, 540, 960, 540)));
    }

    #[test]
    fn test_new_window_under_pointer_is_never_its_own_target() {
        let mut registry = WindowRegistry::new();
        registry.add(TrackedWindow::new(1, Rect::new(0, 0, 960, 1080)));
        registry.add(TrackedWindow::new(2, Rect::new(960, 0, 960, 1080)));
        // новое окно появилось поверх пустого места за экраном
        registry.add(TrackedWindow::new(3, Rect::new(2000, 0, 400, 400)));

        let plan = plan_insertion(&registry, Point::new(2100, 100), SCREEN);

        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].id, 2);
        assert_eq!(plan[1].id, 3);
    }

    #[test]
    fn test_target_under_pointer_wins_over_fallback() {
        let mut registry = WindowRegistry::new();
        registry.add(TrackedWindow::new(1, Rect::new(0, 0, 960, 1080)));
        registry.add(TrackedWindow::new(2, Rect::new(960, 0, 960, 1080)));
        registry.add(TrackedWindow::new(3, Rect::new(0, 0, 640, 480)));

        // левая половина высокая -> деление на верх/низ, низ курсора -> новое окно снизу
        let plan = plan_insertion(&registry, Point::new(200, 900), SCREEN);

        assert_eq!(
            plan.as_slice(),
            &[
                Placement::new(1, Rect::new(0, 0, 960, 540)),
                Placement::new(3, Rect::new(0, 540, 960, 540)),
            ]
        );
    }

    #[test]
    fn test_unsplittable_target_is_skipped() {
        let mut registry = WindowRegistry::new();
        registry.add(TrackedWindow::new(1, Rect::new(0, 0, 1, 1)));
        registry.add(TrackedWindow::new(2, Rect::new(10, 10, 100, 100)));

        let plan = plan_insertion(&registry, Point::new(0, 0), SCREEN);
        assert!(plan.is_empty());
    }
}
