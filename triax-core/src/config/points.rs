//! The fixed point table
//!
//! Nine named targets (P1-P9) laid out as a 3x3 grid on the work table,
//! plus one global runtime-settable offset applied uniformly to all of
//! them. Base entries are immutable; only the offset changes.

/// Number of entries in the point table
pub const POINT_COUNT: usize = 9;

/// An XY coordinate in millimeters
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Point {
    pub x_mm: f32,
    pub y_mm: f32,
}

impl Point {
    /// Create a point
    pub const fn new(x_mm: f32, y_mm: f32) -> Self {
        Self { x_mm, y_mm }
    }
}

/// Base grid coordinates for P1-P9 (mm)
const BASE: [Point; POINT_COUNT] = [
    Point::new(120.0, 0.0),
    Point::new(240.0, 0.0),
    Point::new(360.0, 0.0),
    Point::new(360.0, 200.0),
    Point::new(240.0, 200.0),
    Point::new(120.0, 200.0),
    Point::new(120.0, 400.0),
    Point::new(240.0, 400.0),
    Point::new(360.0, 400.0),
];

/// The 9-entry point table with its global offset
#[derive(Debug, Clone, Copy, Default)]
pub struct PointTable {
    offset: Point,
}

impl PointTable {
    /// Create a table with zero offset
    pub const fn new() -> Self {
        Self {
            offset: Point::new(0.0, 0.0),
        }
    }

    /// Set the global offset (mm), applied to every entry
    pub fn set_offset(&mut self, dx_mm: f32, dy_mm: f32) {
        self.offset = Point::new(dx_mm, dy_mm);
    }

    /// Current global offset
    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Effective coordinate of point `index` (1-based, 1-9)
    pub fn get(&self, index: u8) -> Option<Point> {
        if !(1..=POINT_COUNT as u8).contains(&index) {
            return None;
        }
        let base = BASE[(index - 1) as usize];
        Some(Point::new(
            base.x_mm + self.offset.x_mm,
            base.y_mm + self.offset.y_mm,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_grid() {
        let table = PointTable::new();
        assert_eq!(table.get(1), Some(Point::new(120.0, 0.0)));
        assert_eq!(table.get(5), Some(Point::new(240.0, 200.0)));
        assert_eq!(table.get(9), Some(Point::new(360.0, 400.0)));
    }

    #[test]
    fn test_index_bounds() {
        let table = PointTable::new();
        assert_eq!(table.get(0), None);
        assert_eq!(table.get(10), None);
    }

    #[test]
    fn test_offset_applies_uniformly() {
        let mut table = PointTable::new();
        table.set_offset(2.5, -1.0);

        for n in 1..=POINT_COUNT as u8 {
            let base = BASE[(n - 1) as usize];
            let p = table.get(n).unwrap();
            assert_eq!(p.x_mm, base.x_mm + 2.5);
            assert_eq!(p.y_mm, base.y_mm - 1.0);
        }
    }

    #[test]
    fn test_offset_replaced_not_accumulated() {
        let mut table = PointTable::new();
        table.set_offset(5.0, 5.0);
        table.set_offset(1.0, 0.0);
        assert_eq!(table.get(1), Some(Point::new(121.0, 0.0)));
    }
}
