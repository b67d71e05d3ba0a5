use croupier::geometry::{Point, Size};
use croupier::grid::ViewportClass;

pub mod view;

pub use view::{draw_table, draw_wheel};

pub const POCKET_FONT_SIZE: f64 = 12.0;
pub const CELL_FONT_SIZE: f64 = 14.0;
pub const HUB_RADIUS: f64 = 12.0;
pub const SPINDLE_RADIUS: f64 = 8.0;
pub const RADIANT_LINES: usize = 8;

/// Radii of the wheel rings, in pixels from the wheel center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelMetrics {
    pub center: f64,
    pub outside_radius: f64,
    pub inside_radius: f64,
    pub text_radius: f64,
    pub ball_track_radius: f64,
    pub ball_size: f64,
}

impl WheelMetrics {
    pub fn for_viewport(viewport: ViewportClass) -> Self {
        match viewport {
            ViewportClass::Wide => Self {
                center: 240.0,
                outside_radius: 200.0,
                inside_radius: 170.0,
                text_radius: 180.0,
                ball_track_radius: 180.0,
                ball_size: 10.0,
            },
            ViewportClass::NarrowLandscape | ViewportClass::NarrowPortrait => Self {
                center: 125.0,
                outside_radius: 100.0,
                inside_radius: 80.0,
                text_radius: 85.0,
                ball_track_radius: 85.0,
                ball_size: 6.0,
            },
        }
    }

    /// Side of the square area the wheel is drawn in.
    pub fn extent(&self) -> i32 {
        (self.center * 2.0) as i32
    }

    pub fn scale(&self) -> f64 {
        self.outside_radius / 200.0
    }
}

/// Top-left corner at which a betting canvas is drawn centered in an area,
/// pinned to the area's edge when the canvas is larger.
pub fn table_origin(canvas: Size, area_width: f64, area_height: f64) -> Point {
    Point::new(
        ((area_width - canvas.width) / 2.0).max(0.0),
        ((area_height - canvas.height) / 2.0).max(0.0),
    )
}

/// Converts a point in drawing-area coordinates to betting-canvas coordinates.
pub fn to_table(point: Point, origin: Point) -> Point {
    Point::new(point.x - origin.x, point.y - origin.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_rings_fit_inside_the_wheel_area() {
        for viewport in ViewportClass::iter() {
            let m = WheelMetrics::for_viewport(viewport);
            assert!(m.outside_radius < m.center, "{}", viewport);
            assert!(m.inside_radius < m.text_radius, "{}", viewport);
            assert!(m.text_radius < m.outside_radius, "{}", viewport);
            assert!(m.ball_track_radius + m.ball_size <= m.outside_radius, "{}", viewport);
            assert_eq!(m.extent() as f64, m.center * 2.0);
        }
    }

    #[test]
    fn test_table_origin_centers_canvas() {
        let canvas = Size::new(795.0, 270.0);
        assert_eq!(table_origin(canvas, 995.0, 370.0), Point::new(100.0, 50.0));
        assert_eq!(table_origin(canvas, 600.0, 270.0), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_to_table_round_trips_cell_centers() {
        let origin = Point::new(100.0, 50.0);
        assert_eq!(to_table(Point::new(179.5, 72.5), origin), Point::new(79.5, 22.5));
    }
}
