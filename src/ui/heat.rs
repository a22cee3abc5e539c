use crate::data::model::Seriousness;
use crate::ui::style::interpolate_linear;

/// Heat contribution of one accident: `seriousness / 3`.
pub fn seriousness_weight(seriousness: Seriousness) -> f64 {
    interpolate_linear(&[(0.0, 0.0), (3.0, 1.0)], seriousness.code() as f64)
}

/// Weighted point density binned on a regular grid over plot bounds.
#[derive(Debug, Clone)]
pub struct HeatGrid {
    min: [f64; 2],
    cell: [f64; 2],
    cols: usize,
    rows: usize,
    weights: Vec<f64>,
}

impl HeatGrid {
    pub fn new(min: [f64; 2], max: [f64; 2], cols: usize, rows: usize) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        HeatGrid {
            min,
            cell: [
                (max[0] - min[0]) / cols as f64,
                (max[1] - min[1]) / rows as f64,
            ],
            cols,
            rows,
            weights: vec![0.0; cols * rows],
        }
    }

    fn index_of(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        let cx = (x - self.min[0]) / self.cell[0];
        let cy = (y - self.min[1]) / self.cell[1];
        if !(cx >= 0.0 && cy >= 0.0) {
            return None;
        }
        let (cx, cy) = (cx as usize, cy as usize);
        (cx < self.cols && cy < self.rows).then_some((cx, cy))
    }

    /// Returns `false` when the point lies outside the grid.
    pub fn add(&mut self, x: f64, y: f64, weight: f64) -> bool {
        match self.index_of(x, y) {
            Some((cx, cy)) => {
                self.weights[cy * self.cols + cx] += weight;
                true
            }
            None => false,
        }
    }

    /// Spread each cell over its neighbours with a linear falloff reaching
    /// zero just beyond `radius` cells.
    pub fn smoothed(&self, radius: usize) -> HeatGrid {
        if radius == 0 {
            return self.clone();
        }
        let r = radius as isize;
        let reach = radius as f64 + 1.0;
        let mut out = HeatGrid {
            weights: vec![0.0; self.weights.len()],
            ..self.clone()
        };
        for cy in 0..self.rows {
            for cx in 0..self.cols {
                let w = self.weights[cy * self.cols + cx];
                if w == 0.0 {
                    continue;
                }
                for dy in -r..=r {
                    for dx in -r..=r {
                        let d = ((dx * dx + dy * dy) as f64).sqrt();
                        if d >= reach {
                            continue;
                        }
                        let (nx, ny) = (cx as isize + dx, cy as isize + dy);
                        if nx < 0
                            || ny < 0
                            || nx >= self.cols as isize
                            || ny >= self.rows as isize
                        {
                            continue;
                        }
                        out.weights[ny as usize * self.cols + nx as usize] +=
                            w * (1.0 - d / reach);
                    }
                }
            }
        }
        out
    }

    pub fn max_weight(&self) -> f64 {
        self.weights.iter().copied().fold(0.0, f64::max)
    }

    pub fn total_weight(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Non-empty cells as `(min corner, max corner, weight)`.
    pub fn cells(&self) -> impl Iterator<Item = ([f64; 2], [f64; 2], f64)> + '_ {
        self.weights
            .iter()
            .enumerate()
            .filter(|(_, w)| **w > 0.0)
            .map(|(i, &w)| {
                let (cx, cy) = ((i % self.cols) as f64, (i / self.cols) as f64);
                let lo = [
                    self.min[0] + cx * self.cell[0],
                    self.min[1] + cy * self.cell[1],
                ];
                let hi = [lo[0] + self.cell[0], lo[1] + self.cell[1]];
                (lo, hi, w)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_scales_with_seriousness() {
        assert!((seriousness_weight(Seriousness::PropertyDamage) - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(seriousness_weight(Seriousness::Death), 1.0);
    }

    #[test]
    fn total_weight_counts_only_points_inside() {
        let mut grid = HeatGrid::new([24.8, 60.1], [25.2, 60.3], 8, 4);
        assert!(grid.add(24.96, 60.17, 0.5));
        assert!(grid.add(24.97, 60.17, 1.0));
        assert!(!grid.add(24.5, 60.17, 1.0));
        assert!(!grid.add(24.96, 60.35, 1.0));
        assert!((grid.total_weight() - 1.5).abs() < 1e-12);
        assert_eq!(grid.cells().count(), 1);
    }

    #[test]
    fn cells_report_their_bounds() {
        let mut grid = HeatGrid::new([0.0, 0.0], [4.0, 2.0], 4, 2);
        grid.add(2.5, 1.5, 1.0);
        let cells: Vec<_> = grid.cells().collect();
        assert_eq!(cells, vec![([2.0, 1.0], [3.0, 2.0], 1.0)]);
    }

    #[test]
    fn edge_points_belong_to_the_upper_cell() {
        let mut grid = HeatGrid::new([0.0, 0.0], [4.0, 2.0], 4, 2);
        assert!(grid.add(2.0, 1.0, 1.0));
        assert!(grid.add(0.0, 0.0, 1.0));
        assert!(!grid.add(4.0, 1.5, 1.0));
        assert!(!grid.add(1.5, 2.0, 1.0));
        let corners: Vec<_> = grid.cells().map(|(lo, _, _)| lo).collect();
        assert_eq!(corners, vec![[0.0, 0.0], [2.0, 1.0]]);
    }

    #[test]
    fn smoothing_spreads_but_keeps_peak_centered() {
        let mut grid = HeatGrid::new([0.0, 0.0], [5.0, 5.0], 5, 5);
        grid.add(2.5, 2.5, 1.0);
        let smooth = grid.smoothed(1);
        assert_eq!(smooth.cells().count(), 9);
        assert_eq!(smooth.max_weight(), 1.0);
        let (lo, _, w) = smooth
            .cells()
            .max_by(|a, b| a.2.total_cmp(&b.2))
            .unwrap();
        assert_eq!(lo, [2.0, 2.0]);
        assert_eq!(w, 1.0);
        assert_eq!(grid.smoothed(0).total_weight(), grid.total_weight());
    }
}
