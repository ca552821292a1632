//! Grid model: continuous coordinates to canonical cells and back.

use std::collections::HashMap;

use slotmap::SlotMap;

use crate::types::{Cell, CellBounds, CellId, LatLng};

/// Owns the interning table that gives every `(i, j)` exactly one [`CellId`].
#[derive(Clone, Debug)]
pub struct Board {
    tile_width: f64,
    cells: SlotMap<CellId, Cell>,
    index: HashMap<Cell, CellId>,
}

impl Board {
    pub fn new(tile_width: f64) -> Self {
        debug_assert!(tile_width.is_finite() && tile_width > 0.0);
        Self { tile_width, cells: SlotMap::with_key(), index: HashMap::new() }
    }

    pub fn tile_width(&self) -> f64 {
        self.tile_width
    }

    /// Cell containing `point`, without interning it.
    pub fn locate(&self, point: LatLng) -> Cell {
        Cell { i: grid_index(point.lat, self.tile_width), j: grid_index(point.lng, self.tile_width) }
    }

    pub fn intern(&mut self, cell: Cell) -> CellId {
        if let Some(&id) = self.index.get(&cell) {
            return id;
        }
        let id = self.cells.insert(cell);
        self.index.insert(cell, id);
        id
    }

    /// Canonical handle for the cell containing `point`.
    pub fn cell_for_point(&mut self, point: LatLng) -> CellId {
        let cell = self.locate(point);
        self.intern(cell)
    }

    /// # Panics
    /// If `id` was issued by a different board.
    pub fn cell(&self, id: CellId) -> Cell {
        self.cells[id]
    }

    pub fn lookup(&self, cell: Cell) -> Option<CellId> {
        self.index.get(&cell).copied()
    }

    pub fn known_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn cell_bounds(&self, cell: Cell) -> CellBounds {
        let width = self.tile_width;
        CellBounds {
            lat_min: f64::from(cell.i) * width,
            lng_min: f64::from(cell.j) * width,
            lat_max: (f64::from(cell.i) + 1.0) * width,
            lng_max: (f64::from(cell.j) + 1.0) * width,
        }
    }

    /// The `(2r+1)^2` square around the cell containing `point`, row-major by `di` then `dj`.
    pub fn cells_near(&mut self, point: LatLng, radius: u32) -> Vec<CellId> {
        let origin = self.locate(point);
        let span = radius as i32;
        let mut result = Vec::with_capacity(((2 * radius + 1) * (2 * radius + 1)) as usize);
        for di in -span..=span {
            for dj in -span..=span {
                let cell = Cell { i: origin.i.saturating_add(di), j: origin.j.saturating_add(dj) };
                result.push(self.intern(cell));
            }
        }
        result
    }

    /// Whether `cell` lies in the square neighbourhood of `point`.
    pub fn is_near(&self, point: LatLng, radius: u32, cell: Cell) -> bool {
        let origin = self.locate(point);
        origin.i.abs_diff(cell.i) <= radius && origin.j.abs_diff(cell.j) <= radius
    }
}

/// Exact for points on the globe at any validated tile width. Saturates at the `i32` range
/// beyond that; NaN maps to 0.
fn grid_index(coord: f64, tile_width: f64) -> i32 {
    (coord / tile_width).floor() as i32
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;
    use crate::config::{MAX_VISIBILITY_RADIUS, min_tile_width};
    use crate::types::{MAX_LAT, MAX_LNG};

    const TILE: f64 = 1e-4;

    #[test]
    fn points_in_the_same_square_share_one_handle() {
        let mut board = Board::new(TILE);
        let first = board.cell_for_point(LatLng::new(36.989_493_795, -122.062_771_285));
        let second = board.cell_for_point(LatLng::new(36.989_41, -122.062_71));
        assert_eq!(first, second);
        assert_eq!(board.cell(first), Cell::new(369_894, -1_220_628));
        assert_eq!(board.known_cells(), 1);
    }

    #[test]
    fn negative_coordinates_floor_toward_negative_infinity() {
        let board = Board::new(TILE);
        assert_eq!(board.locate(LatLng::new(-0.000_05, -0.000_15)), Cell::new(-1, -2));
        assert_eq!(board.locate(LatLng::new(0.000_05, 0.000_15)), Cell::new(0, 1));
    }

    #[test]
    fn bounds_cover_the_cell_they_describe() {
        let board = Board::new(TILE);
        let bounds = board.cell_bounds(Cell::new(3, 5));
        assert!((bounds.lat_min - 0.0003).abs() < 1e-12);
        assert!((bounds.lng_min - 0.0005).abs() < 1e-12);
        assert!((bounds.lat_max - 0.0004).abs() < 1e-12);
        assert!((bounds.lng_max - 0.0006).abs() < 1e-12);
        assert!(bounds.contains(LatLng::new(0.000_35, 0.000_55)));
        assert!(!bounds.contains(LatLng::new(0.000_45, 0.000_55)));
    }

    #[test]
    fn neighbourhood_is_row_major_around_the_origin() {
        let mut board = Board::new(TILE);
        let ids = board.cells_near(LatLng::new(0.000_35, 0.000_55), 1);
        let cells: Vec<Cell> = ids.iter().map(|&id| board.cell(id)).collect();
        assert_eq!(
            cells,
            vec![
                Cell::new(2, 4),
                Cell::new(2, 5),
                Cell::new(2, 6),
                Cell::new(3, 4),
                Cell::new(3, 5),
                Cell::new(3, 6),
                Cell::new(4, 4),
                Cell::new(4, 5),
                Cell::new(4, 6),
            ]
        );
    }

    #[test]
    fn radius_zero_yields_only_the_origin() {
        let mut board = Board::new(TILE);
        let ids = board.cells_near(LatLng::new(0.0, 0.0), 0);
        assert_eq!(ids.len(), 1);
        assert_eq!(board.cell(ids[0]), Cell::new(0, 0));
    }

    #[test]
    fn repeated_queries_reuse_interned_cells() {
        let mut board = Board::new(TILE);
        let point = LatLng::new(36.989_5, -122.062_8);
        let first = board.cells_near(point, 8);
        let known = board.known_cells();
        let second = board.cells_near(point, 8);
        assert_eq!(first, second);
        assert_eq!(board.known_cells(), known);
    }

    #[test]
    fn is_near_matches_the_enumerated_square() {
        let mut board = Board::new(TILE);
        let point = LatLng::new(0.000_35, 0.000_55);
        let near: HashSet<Cell> =
            board.cells_near(point, 2).into_iter().map(|id| board.cell(id)).collect();
        for i in 0..8 {
            for j in 2..10 {
                let cell = Cell::new(i, j);
                assert_eq!(board.is_near(point, 2, cell), near.contains(&cell), "cell {cell}");
            }
        }
    }

    #[test]
    fn narrowest_tile_keeps_globe_edges_distinct() {
        let mut board = Board::new(min_tile_width());
        let east = board.locate(LatLng::new(MAX_LAT, MAX_LNG));
        let west = board.locate(LatLng::new(-MAX_LAT, -MAX_LNG));
        assert!(east.j > 0 && east.j < i32::MAX - MAX_VISIBILITY_RADIUS as i32, "{east}");
        assert!(west.j < 0 && west.j > i32::MIN + MAX_VISIBILITY_RADIUS as i32, "{west}");
        assert_ne!(
            board.locate(LatLng::new(0.0, MAX_LNG)),
            board.locate(LatLng::new(0.0, MAX_LNG - 2.0 * min_tile_width()))
        );

        for corner in [LatLng::new(MAX_LAT, MAX_LNG), LatLng::new(-MAX_LAT, -MAX_LNG)] {
            let ids = board.cells_near(corner, MAX_VISIBILITY_RADIUS);
            let unique: HashSet<CellId> = ids.iter().copied().collect();
            assert_eq!(unique.len(), ids.len());
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]
        #[test]
        fn neighbourhood_has_expected_size_without_duplicates(
            lat in -90.0_f64..90.0,
            lng in -180.0_f64..180.0,
            radius in 0_u32..=10
        ) {
            let mut board = Board::new(TILE);
            let ids = board.cells_near(LatLng::new(lat, lng), radius);
            let side = (2 * radius + 1) as usize;
            prop_assert_eq!(ids.len(), side * side);
            let unique: HashSet<CellId> = ids.iter().copied().collect();
            prop_assert_eq!(unique.len(), ids.len());
        }

        #[test]
        fn points_with_equal_floors_resolve_to_one_handle(
            i in -900_000_i32..900_000,
            j in -1_800_000_i32..1_800_000,
            a in 0.05_f64..0.95,
            b in 0.05_f64..0.95
        ) {
            let mut board = Board::new(TILE);
            let p1 = LatLng::new((f64::from(i) + a) * TILE, (f64::from(j) + b) * TILE);
            let p2 = LatLng::new((f64::from(i) + b) * TILE, (f64::from(j) + a) * TILE);
            let id = board.cell_for_point(p1);
            prop_assert_eq!(id, board.cell_for_point(p2));
            prop_assert_eq!(board.cell(id), Cell::new(i, j));
        }
    }
}
