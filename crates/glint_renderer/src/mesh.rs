//! Triangle mesh with a uniform grid accelerator.
//!
//! The mesh bounds are split into equally sized cells; each cell lists the
//! triangles whose bounding box overlaps it. A query visits the cells the ray
//! crosses in order of entry distance and stops after the first cell that
//! yields a hit. Because a triangle spanning several cells may be hit inside a
//! later cell at a nearer distance than what an earlier cell reported, the
//! result is occasionally not the true nearest hit. That trade is accepted for
//! speed.

use crate::{Intersection, Triangle};
use glint_math::{Aabb, Interval, Ray, Vec3};

/// Default edge length of a grid cell, in world units.
pub const DEFAULT_CELL_SIZE: f32 = 2.0;

/// Cells are never smaller than the longest mesh extent over this.
pub const MAX_CELLS_PER_AXIS: f32 = 1024.0;

/// One grid cell: its bounds and the triangles overlapping it.
#[derive(Debug, Clone)]
pub struct Cell {
    pub bounds: Aabb,
    /// Indices into the owning mesh's triangles
    pub triangles: Vec<usize>,
}

/// A triangle soup with a uniform grid over it.
#[derive(Debug, Clone)]
pub struct Mesh {
    triangles: Vec<Triangle>,
    bounds: Aabb,
    cells: Vec<Cell>,
}

impl Mesh {
    /// Build the grid with [`DEFAULT_CELL_SIZE`].
    pub fn new(triangles: Vec<Triangle>) -> Self {
        Self::with_cell_size(triangles, DEFAULT_CELL_SIZE)
    }

    /// Build the grid with roughly `cell_size` sized cells.
    ///
    /// A cell size below [`MAX_CELLS_PER_AXIS`]-th of the longest extent is
    /// raised to it, so no axis gets more than about that many cells.
    pub fn with_cell_size(triangles: Vec<Triangle>, cell_size: f32) -> Self {
        if triangles.is_empty() {
            log::warn!("Building a mesh from zero triangles");
            return Self {
                triangles,
                bounds: Aabb::EMPTY,
                cells: Vec::new(),
            };
        }

        let tri_bounds: Vec<Aabb> = triangles.iter().map(Triangle::bounds).collect();
        let bounds = tri_bounds
            .iter()
            .fold(Aabb::EMPTY, |acc, b| Aabb::surrounding(&acc, b));

        let extent = bounds.extent();
        let min_cell_size = extent.max_element() / MAX_CELLS_PER_AXIS;
        let cell_size = if cell_size < min_cell_size {
            log::warn!(
                "Mesh cell size {} is too small for extent {}, using {}",
                cell_size,
                extent,
                min_cell_size
            );
            min_cell_size
        } else {
            cell_size.max(f32::EPSILON)
        };
        let counts = (extent / cell_size).floor() + Vec3::ONE;
        let (nx, ny, nz) = (counts.x as usize, counts.y as usize, counts.z as usize);
        let step = extent / counts;

        let mut cells = Vec::new();
        for ix in 0..nx {
            for iy in 0..ny {
                for iz in 0..nz {
                    let min = bounds.min + step * Vec3::new(ix as f32, iy as f32, iz as f32);
                    let cell_bounds = Aabb::from_corners(min, min + step);

                    let members: Vec<usize> = tri_bounds
                        .iter()
                        .enumerate()
                        .filter(|(_, b)| b.overlaps(&cell_bounds))
                        .map(|(i, _)| i)
                        .collect();

                    if !members.is_empty() {
                        cells.push(Cell {
                            bounds: cell_bounds,
                            triangles: members,
                        });
                    }
                }
            }
        }

        log::debug!(
            "Mesh grid: {} triangles, {}x{}x{} cells ({} non-empty)",
            triangles.len(),
            nx,
            ny,
            nz,
            cells.len()
        );

        Self {
            triangles,
            bounds,
            cells,
        }
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn intersect(&self, ray: &Ray, range: Interval) -> Option<Intersection<'_>> {
        let entry = self.bounds.entry_distance(ray)?;
        if entry > range.max {
            return None;
        }

        let mut order: Vec<(f32, &Cell)> = self
            .cells
            .iter()
            .filter_map(|cell| {
                let span = cell.bounds.slab(ray)?;
                span.overlaps(&range).then(|| (span.min.max(0.0), cell))
            })
            .collect();
        order.sort_unstable_by(|a, b| a.0.total_cmp(&b.0));

        let mut range = range;
        for (_, cell) in order {
            let mut nearest = None;
            for &index in &cell.triangles {
                if let Some(hit) = self.triangles[index].intersect(ray, range) {
                    range = range.with_max(hit.distance);
                    nearest = Some(hit);
                }
            }
            if nearest.is_some() {
                return nearest;
            }
        }
        None
    }

    /// Nearest hit over every triangle, without the grid.
    pub fn intersect_exhaustive(&self, ray: &Ray, range: Interval) -> Option<Intersection<'_>> {
        let mut range = range;
        let mut nearest = None;
        for tri in &self.triangles {
            if let Some(hit) = tri.intersect(ray, range) {
                range = range.with_max(hit.distance);
                nearest = Some(hit);
            }
        }
        nearest
    }
}
