//! Screen layout shared by hit testing and drawing
//!
//! Answer buttons sit in a 2x2 grid in the lower half of the arena. Both the
//! tick (tap -> choice) and the renderer use these rectangles, so a button is
//! always clickable exactly where it is drawn.

use glam::Vec2;

use super::collision::Rect;
use crate::consts::CHOICE_COUNT;

const BUTTON_GAP: f32 = 16.0;
const GRID_TOP_FRACTION: f32 = 0.5;
const GRID_MARGIN: f32 = 40.0;

/// Rectangle of answer button `index` (row-major 2x2)
pub fn choice_rect(index: usize, arena: Vec2) -> Rect {
    let col = (index % 2) as f32;
    let row = (index / 2) as f32;
    let grid_w = arena.x - GRID_MARGIN * 2.0;
    let grid_h = arena.y * (1.0 - GRID_TOP_FRACTION) - GRID_MARGIN;
    let w = (grid_w - BUTTON_GAP) / 2.0;
    let h = (grid_h - BUTTON_GAP) / 2.0;
    let min = Vec2::new(
        GRID_MARGIN + col * (w + BUTTON_GAP),
        arena.y * GRID_TOP_FRACTION + row * (h + BUTTON_GAP),
    );
    Rect::new(min, min + Vec2::new(w, h))
}

/// Answer button under a point, if any
pub fn choice_at(point: Vec2, arena: Vec2) -> Option<usize> {
    (0..CHOICE_COUNT).find(|&i| choice_rect(i, arena).contains(point))
}

/// Anchor for the challenge prompt text
pub fn prompt_anchor(arena: Vec2) -> Vec2 {
    Vec2::new(arena.x * 0.5, arena.y * 0.3)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARENA: Vec2 = Vec2::new(800.0, 600.0);

    #[test]
    fn test_buttons_do_not_overlap() {
        for i in 0..CHOICE_COUNT {
            for j in (i + 1)..CHOICE_COUNT {
                assert!(!choice_rect(i, ARENA).intersects(&choice_rect(j, ARENA)));
            }
        }
    }

    #[test]
    fn test_choice_at_round_trips_centers() {
        for i in 0..CHOICE_COUNT {
            assert_eq!(choice_at(choice_rect(i, ARENA).center(), ARENA), Some(i));
        }
        assert_eq!(choice_at(Vec2::new(400.0, 100.0), ARENA), None);
        // Gap between the columns
        assert_eq!(choice_at(Vec2::new(400.0, 400.0), ARENA), None);
    }

    #[test]
    fn test_buttons_inside_arena() {
        for i in 0..CHOICE_COUNT {
            let r = choice_rect(i, ARENA);
            assert!(r.min.x >= 0.0 && r.min.y >= 0.0);
            assert!(r.max.x <= ARENA.x && r.max.y <= ARENA.y);
        }
    }
}
