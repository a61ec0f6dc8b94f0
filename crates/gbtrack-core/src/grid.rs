//! Three dimensional occupancy grid of detection cells.

use ndarray::{Array2, Array3};

use crate::detection::Detection;

/// Quantizes positions into cells over the grid extents; the depth axis
/// indexes frames. A two dimensional grid is a grid of depth one.
#[derive(Clone, Debug)]
pub struct Grid {
    /// Cell values, indexed `[depth, height, width]`.
    cells: Array3<Detection>,
    width: f64,
    height: f64,
    depth: f64,
    cell_width: f64,
    cell_height: f64,
    cell_depth: f64,
}

impl Grid {
    /// Creates a grid with every cell holding a virtual placeholder.
    pub fn new(
        width_count: usize,
        height_count: usize,
        depth_count: usize,
        width: f64,
        height: f64,
        depth: f64,
    ) -> Self {
        Self {
            cells: Array3::from_elem(
                (depth_count, height_count, width_count),
                Detection::new_virtual(),
            ),
            width,
            height,
            depth,
            cell_width: width / width_count as f64,
            cell_height: height / height_count as f64,
            cell_depth: depth / depth_count as f64,
        }
    }

    /// A single-layer grid over a 2D plane.
    pub fn new_2d(width_count: usize, height_count: usize, width: f64, height: f64) -> Self {
        Self::new(width_count, height_count, 1, width, height, 0.0)
    }

    pub fn width_count(&self) -> usize {
        self.cells.dim().2
    }

    pub fn height_count(&self) -> usize {
        self.cells.dim().1
    }

    pub fn depth_count(&self) -> usize {
        self.cells.dim().0
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn depth(&self) -> f64 {
        self.depth
    }

    /// Converts a position inside the grid extents to a cell index. Indices
    /// are clamped to the grid, so the upper extent maps to the last cell.
    pub fn position_to_index(&self, x: f64, y: f64, z: f64) -> (usize, usize, usize) {
        let clamp = |v: f64, count: usize| ((v.max(0.0) as usize).min(count - 1));
        let xi = clamp(x / self.cell_width, self.width_count());
        let yi = clamp(y / self.cell_height, self.height_count());
        let zi = if self.depth_count() > 1 {
            clamp(z / self.cell_depth, self.depth_count())
        } else {
            0
        };
        (xi, yi, zi)
    }

    /// Center position of a cell; inverts [`Grid::position_to_index`].
    pub fn cell_center(&self, xi: usize, yi: usize, zi: usize) -> (f64, f64, f64) {
        (
            (xi as f64 + 0.5) * self.cell_width,
            (yi as f64 + 0.5) * self.cell_height,
            if self.depth_count() > 1 {
                (zi as f64 + 0.5) * self.cell_depth
            } else {
                0.0
            },
        )
    }

    pub fn get(&self, xi: usize, yi: usize, zi: usize) -> &Detection {
        &self.cells[[zi, yi, xi]]
    }

    pub fn set(&mut self, xi: usize, yi: usize, zi: usize, value: Detection) {
        self.cells[[zi, yi, xi]] = value;
    }

    /// The cell containing the given position.
    pub fn get_at(&self, x: f64, y: f64, z: f64) -> &Detection {
        let (xi, yi, zi) = self.position_to_index(x, y, z);
        self.get(xi, yi, zi)
    }

    /// Stores a value in the cell containing the given position.
    pub fn set_at(&mut self, x: f64, y: f64, z: f64, value: Detection) {
        let (xi, yi, zi) = self.position_to_index(x, y, z);
        self.set(xi, yi, zi, value);
    }

    /// Convolves every depth layer with a 2D kernel, overwriting each cell's
    /// detection score with the weighted sum of the pre-convolution scores
    /// times `multiplier`. Kernel taps outside the grid are skipped.
    pub fn convolve_2d(&mut self, kernel: &Array2<f64>, multiplier: f64) {
        let (kh, kw) = kernel.dim();
        let (d, h, w) = self.cells.dim();
        let mut scores = Array3::<f64>::zeros((d, h, w));

        for z in 0..d {
            for y in 0..h {
                for x in 0..w {
                    let mut acc = 0.0;
                    for ky in 0..kh {
                        let ny = y as isize + ky as isize - (kh / 2) as isize;
                        if ny < 0 || ny >= h as isize {
                            continue;
                        }
                        for kx in 0..kw {
                            let nx = x as isize + kx as isize - (kw / 2) as isize;
                            if nx < 0 || nx >= w as isize {
                                continue;
                            }
                            acc += self.cells[[z, ny as usize, nx as usize]].score
                                * kernel[[ky, kx]];
                        }
                    }
                    scores[[z, y, x]] = acc * multiplier;
                }
            }
        }

        for (index, cell) in self.cells.indexed_iter_mut() {
            cell.score = scores[index];
        }
    }

    /// Convolves over all three axes with a 3D kernel; otherwise identical
    /// to [`Grid::convolve_2d`].
    pub fn convolve_3d(&mut self, kernel: &Array3<f64>, multiplier: f64) {
        let (kd, kh, kw) = kernel.dim();
        let (d, h, w) = self.cells.dim();
        let mut scores = Array3::<f64>::zeros((d, h, w));

        for z in 0..d {
            for y in 0..h {
                for x in 0..w {
                    let mut acc = 0.0;
                    for kz in 0..kd {
                        let nz = z as isize + kz as isize - (kd / 2) as isize;
                        if nz < 0 || nz >= d as isize {
                            continue;
                        }
                        for ky in 0..kh {
                            let ny = y as isize + ky as isize - (kh / 2) as isize;
                            if ny < 0 || ny >= h as isize {
                                continue;
                            }
                            for kx in 0..kw {
                                let nx = x as isize + kx as isize - (kw / 2) as isize;
                                if nx < 0 || nx >= w as isize {
                                    continue;
                                }
                                acc += self.cells[[nz as usize, ny as usize, nx as usize]].score
                                    * kernel[[kz, ky, kx]];
                            }
                        }
                    }
                    scores[[z, y, x]] = acc * multiplier;
                }
            }
        }

        for (index, cell) in self.cells.indexed_iter_mut() {
            cell.score = scores[index];
        }
    }
}
