use std::f32::consts::TAU;

use glam::{Vec2, Vec3, Vec4};

use super::line::LineSegment;

const RING_RADIUS: f32 = 5.0;
const OUTLINE_THICKNESS: f32 = 0.02;

const SQUARE_COUNT: usize = 20;
const SQUARE_HALF_EXTENT: f32 = 0.7;
const SQUARE_COLOR: Vec4 = Vec4::new(0.8, 1.0, 0.9, 0.1);

const ROUNDED_COUNT: usize = 10;
const ROUNDED_CORNER_RADIUS: f32 = 0.35;
/// Straight part of each side; the full side is this plus two corner radii.
const ROUNDED_SIDE_LENGTH: f32 = 0.7;
const ROUNDED_POINTS: usize = 16;
const ROUNDED_COLOR: Vec4 = Vec4::new(0.8, 1.0, 0.9, 1.0);

/// Procedural layouts for the ring of windows.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum SceneLayout {
    /// 20 square outlines, 4 segments each.
    #[default]
    Squares,
    /// 10 rounded squares, 16 segments each.
    RoundedWindows,
}

impl SceneLayout {
    /// Parses `squares` / `rounded` (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "squares" | "square" => Some(SceneLayout::Squares),
            "rounded" | "rounded-windows" | "rounded_windows" => Some(SceneLayout::RoundedWindows),
            _ => None,
        }
    }

    /// Segments per frame; constant for every layout.
    pub fn segment_count(self) -> usize {
        match self {
            SceneLayout::Squares => SQUARE_COUNT * 4,
            SceneLayout::RoundedWindows => ROUNDED_COUNT * ROUNDED_POINTS,
        }
    }
}

/// Enumerates the scene as line segments.
///
/// Each window's segments are contiguous and close back onto the window's own
/// first corner. The scene is static, so the frame index is unused.
pub fn build_frame(layout: SceneLayout, _frame_index: u64) -> Vec<LineSegment> {
    let mut out = Vec::with_capacity(layout.segment_count());
    match layout {
        SceneLayout::Squares => push_squares(&mut out),
        SceneLayout::RoundedWindows => push_rounded_windows(&mut out),
    }
    out
}

/// Center of window `i` of `count` on the XZ ring.
fn ring_position(i: usize, count: usize) -> (f32, f32) {
    let angle = i as f32 / count as f32 * TAU;
    (angle.cos() * RING_RADIUS, angle.sin() * RING_RADIUS)
}

fn push_squares(out: &mut Vec<LineSegment>) {
    let e = SQUARE_HALF_EXTENT;
    for i in 0..SQUARE_COUNT {
        let (x, z) = ring_position(i, SQUARE_COUNT);

        let a = Vec3::new(x + e, -e, z);
        let b = Vec3::new(x - e, -e, z);
        let c = Vec3::new(x - e, e, z);
        let d = Vec3::new(x + e, e, z);

        for (from, to) in [(a, b), (b, c), (c, d), (d, a)] {
            out.push(LineSegment::new(from, to, OUTLINE_THICKNESS, SQUARE_COLOR));
        }
    }
}

fn push_rounded_windows(out: &mut Vec<LineSegment>) {
    for i in 0..ROUNDED_COUNT {
        let (x, z) = ring_position(i, ROUNDED_COUNT);
        let contour = rounded_square_contour().map(|p| Vec3::new(x + p.x, p.y, z));

        // Each point connects back to its predecessor; the last segment closes the loop.
        for pair in contour.windows(2) {
            out.push(LineSegment::new(pair[1], pair[0], OUTLINE_THICKNESS, ROUNDED_COLOR));
        }
        out.push(LineSegment::new(
            contour[0],
            contour[ROUNDED_POINTS - 1],
            OUTLINE_THICKNESS,
            ROUNDED_COLOR,
        ));
    }
}

/// Circle points pushed outward per quadrant, giving a square with round corners.
fn rounded_square_contour() -> [Vec2; ROUNDED_POINTS] {
    let half_side = ROUNDED_SIDE_LENGTH * 0.5;
    std::array::from_fn(|k| {
        let angle = k as f32 / ROUNDED_POINTS as f32 * TAU;
        let p = Vec2::new(angle.cos(), angle.sin()) * ROUNDED_CORNER_RADIUS;
        Vec2::new(
            p.x + if p.x < 0.0 { -half_side } else { half_side },
            p.y + if p.y < 0.0 { -half_side } else { half_side },
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squares_layout_has_80_segments() {
        let segs = build_frame(SceneLayout::Squares, 0);
        assert_eq!(segs.len(), 80);
        assert_eq!(segs.len(), SceneLayout::Squares.segment_count());
    }

    #[test]
    fn square_edges_form_closed_contiguous_loops() {
        let segs = build_frame(SceneLayout::Squares, 0);
        for window in segs.chunks(4) {
            for k in 0..4 {
                assert_eq!(window[k].to, window[(k + 1) % 4].from);
            }
        }
    }

    #[test]
    fn squares_sit_on_the_ring() {
        let segs = build_frame(SceneLayout::Squares, 0);
        for window in segs.chunks(4) {
            let center = window.iter().fold(Vec3::ZERO, |acc, s| acc + s.from) / 4.0;
            assert!(center.y.abs() < 1e-6);
            assert!((Vec2::new(center.x, center.z).length() - RING_RADIUS).abs() < 1e-4);
            let side = (window[0].to - window[0].from).length();
            assert!((side - 1.4).abs() < 1e-5);
        }
    }

    #[test]
    fn squares_use_uniform_style() {
        let segs = build_frame(SceneLayout::Squares, 0);
        assert!(segs.iter().all(|s| s.thickness == 0.02 && s.color == SQUARE_COLOR));
    }

    #[test]
    fn build_is_stable_across_frames() {
        assert_eq!(build_frame(SceneLayout::Squares, 0), build_frame(SceneLayout::Squares, 99));
    }

    #[test]
    fn rounded_windows_close_onto_their_first_point() {
        let segs = build_frame(SceneLayout::RoundedWindows, 0);
        assert_eq!(segs.len(), 160);
        for window in segs.chunks(ROUNDED_POINTS) {
            let first_point = window[0].to;
            let closing = window[ROUNDED_POINTS - 1];
            assert_eq!(closing.from, first_point);
            assert_eq!(closing.to, window[ROUNDED_POINTS - 2].from);
        }
    }

    #[test]
    fn rounded_contour_fits_within_total_extent() {
        let limit = ROUNDED_SIDE_LENGTH * 0.5 + ROUNDED_CORNER_RADIUS + 1e-6;
        for p in rounded_square_contour() {
            assert!(p.x.abs() <= limit && p.y.abs() <= limit);
        }
    }

    #[test]
    fn layout_parsing() {
        assert_eq!(SceneLayout::parse("Squares"), Some(SceneLayout::Squares));
        assert_eq!(SceneLayout::parse(" rounded "), Some(SceneLayout::RoundedWindows));
        assert_eq!(SceneLayout::parse("spiral"), None);
    }
}
