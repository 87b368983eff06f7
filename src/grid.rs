use std::collections::{HashSet, VecDeque};

use crate::error::SimIssue;
use crate::types::{CellPos, Vec3};

pub type KeyId = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Solid,
    Door { locked: bool, key_id: Option<KeyId> },
    Exit,
}

impl Cell {
    pub fn is_passable(self) -> bool {
        match self {
            Cell::Empty | Cell::Exit => true,
            Cell::Door { locked, .. } => !locked,
            Cell::Solid => false,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Solid => '#',
            Cell::Door { locked: true, .. } => 'D',
            Cell::Door { locked: false, .. } => 'd',
            Cell::Exit => 'E',
        }
    }
}

/// Occupancy grid on the XZ plane. Cell `(x, z)` covers
/// `[origin.x + x*cell_size, origin.x + (x+1)*cell_size)` and likewise on Z.
#[derive(Clone, Debug)]
pub struct Grid {
    width: i32,
    height: i32,
    cell_size: f32,
    origin: Vec3,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn filled(width: i32, height: i32, cell_size: f32, origin: Vec3, cell: Cell) -> Self {
        let count = (width.max(0) as usize) * (height.max(0) as usize);
        Self {
            width,
            height,
            cell_size,
            origin,
            cells: vec![cell; count],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn in_bounds(&self, x: i32, z: i32) -> bool {
        x >= 0 && z >= 0 && x < self.width && z < self.height
    }

    pub fn is_border(&self, x: i32, z: i32) -> bool {
        x == 0 || z == 0 || x == self.width - 1 || z == self.height - 1
    }

    fn index(&self, x: i32, z: i32) -> usize {
        (z * self.width + x) as usize
    }

    pub fn get(&self, x: i32, z: i32) -> Result<Cell, SimIssue> {
        if !self.in_bounds(x, z) {
            return Err(SimIssue::OutOfBoundsQuery { x, z });
        }
        Ok(self.cells[self.index(x, z)])
    }

    pub fn cell(&self, x: i32, z: i32) -> Option<Cell> {
        self.get(x, z).ok()
    }

    /// Out-of-bounds cells are never passable.
    pub fn is_passable(&self, x: i32, z: i32) -> bool {
        self.get(x, z).map(Cell::is_passable).unwrap_or(false)
    }

    /// Generation-time writes. Runtime code mutates only through `unlock_door`.
    pub(crate) fn set(&mut self, x: i32, z: i32, cell: Cell) {
        if self.in_bounds(x, z) {
            let idx = self.index(x, z);
            self.cells[idx] = cell;
        }
    }

    pub(crate) fn force_border_solid(&mut self) {
        for x in 0..self.width {
            self.set(x, 0, Cell::Solid);
            self.set(x, self.height - 1, Cell::Solid);
        }
        for z in 0..self.height {
            self.set(0, z, Cell::Solid);
            self.set(self.width - 1, z, Cell::Solid);
        }
    }

    /// The single in-place mutation path used by door activation.
    pub fn unlock_door(&mut self, x: i32, z: i32) -> bool {
        match self.cell(x, z) {
            Some(Cell::Door { key_id, .. }) => {
                self.set(
                    x,
                    z,
                    Cell::Door {
                        locked: false,
                        key_id,
                    },
                );
                true
            }
            _ => false,
        }
    }

    pub fn cell_of_point(&self, point: Vec3) -> (i32, i32) {
        let x = ((point.x - self.origin.x) / self.cell_size).floor() as i32;
        let z = ((point.z - self.origin.z) / self.cell_size).floor() as i32;
        (x, z)
    }

    pub fn cell_center(&self, x: i32, z: i32) -> Vec3 {
        Vec3::new(
            self.origin.x + (x as f32 + 0.5) * self.cell_size,
            self.origin.y,
            self.origin.z + (z as f32 + 0.5) * self.cell_size,
        )
    }

    /// `(min_x, min_z, max_x, max_z)` in world units.
    pub fn cell_bounds(&self, x: i32, z: i32) -> (f32, f32, f32, f32) {
        let min_x = self.origin.x + x as f32 * self.cell_size;
        let min_z = self.origin.z + z as f32 * self.cell_size;
        (min_x, min_z, min_x + self.cell_size, min_z + self.cell_size)
    }

    pub fn passable_cells(&self) -> Vec<CellPos> {
        let mut out = Vec::new();
        for z in 0..self.height {
            for x in 0..self.width {
                if self.is_passable(x, z) {
                    out.push(CellPos::new(x, z));
                }
            }
        }
        out
    }

    /// 4-neighborhood flood fill over passable cells.
    pub fn reachable_from(&self, start: CellPos) -> HashSet<CellPos> {
        let mut out = HashSet::new();
        if !self.is_passable(start.x, start.z) {
            return out;
        }

        let mut queue = VecDeque::new();
        out.insert(start);
        queue.push_back(start);

        while let Some(cell) = queue.pop_front() {
            for next in cell.neighbors4() {
                if !self.is_passable(next.x, next.z) {
                    continue;
                }
                if out.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        out
    }

    pub fn rows(&self) -> Vec<String> {
        (0..self.height)
            .map(|z| {
                (0..self.width)
                    .map(|x| self.cells[self.index(x, z)].glyph())
                    .collect()
            })
            .collect()
    }

    /// Square window of glyphs centered on `center`; cells outside the grid render as spaces.
    pub fn window_rows(&self, center: CellPos, radius: i32) -> Vec<String> {
        let radius = radius.max(0);
        ((center.z - radius)..=(center.z + radius))
            .map(|z| {
                ((center.x - radius)..=(center.x + radius))
                    .map(|x| self.cell(x, z).map(Cell::glyph).unwrap_or(' '))
                    .collect()
            })
            .collect()
    }
}
