use glam::DVec3;

/// Uniform spatial hash grid for neighbour queries within a fixed radius.
///
/// Uses counting sort for O(N) construction: count particles per cell -> prefix sum -> scatter.
pub struct SpatialHashGrid {
    inv_cell_size: f64,
    table_size: usize,
    /// cell_count[hash] = number of particles in the cell
    cell_count: Vec<u32>,
    /// cell_start[hash] = index where the cell's particles begin in sorted_indices
    cell_start: Vec<u32>,
    /// Particle indices sorted by cell hash
    sorted_indices: Vec<u32>,
}

impl SpatialHashGrid {
    /// Build a grid over `positions`.
    ///
    /// `cell_size` should be at least the query radius so that the 3x3x3
    /// block around a cell covers every candidate.
    pub fn build(positions: &[DVec3], cell_size: f64) -> Self {
        let count = positions.len();
        let table_size = (2 * count).next_power_of_two().max(64);
        let mut grid = Self {
            inv_cell_size: 1.0 / cell_size,
            table_size,
            cell_count: vec![0u32; table_size],
            cell_start: vec![0u32; table_size],
            sorted_indices: vec![0u32; count],
        };

        let hashes: Vec<usize> = positions
            .iter()
            .map(|&p| {
                let (cx, cy, cz) = grid.cell_coords(p);
                grid.hash_cell(cx, cy, cz)
            })
            .collect();

        for &h in &hashes {
            grid.cell_count[h] += 1;
        }

        for k in 1..table_size {
            grid.cell_start[k] = grid.cell_start[k - 1] + grid.cell_count[k - 1];
        }

        // Reuse the counts as scatter offsets
        grid.cell_count.iter_mut().for_each(|c| *c = 0);
        for (i, &h) in hashes.iter().enumerate() {
            let idx = grid.cell_start[h] + grid.cell_count[h];
            grid.sorted_indices[idx as usize] = i as u32;
            grid.cell_count[h] += 1;
        }

        grid
    }

    /// Visit every particle in the cell containing `pos` and its 26
    /// neighbours. Hash collisions may report a particle more than once;
    /// the caller does the distance check and any deduplication.
    pub fn query_neighbors<F: FnMut(usize)>(&self, pos: DVec3, mut callback: F) {
        let (cx, cy, cz) = self.cell_coords(pos);
        for dx in -1..=1_i64 {
            for dy in -1..=1_i64 {
                for dz in -1..=1_i64 {
                    let h = self.hash_cell(cx + dx, cy + dy, cz + dz);
                    let start = self.cell_start[h] as usize;
                    let end = start + self.cell_count[h] as usize;
                    for idx in start..end {
                        callback(self.sorted_indices[idx] as usize);
                    }
                }
            }
        }
    }

    /// Indices `j` with `|positions[j] - pos| <= radius`, ascending and unique.
    pub fn within(&self, positions: &[DVec3], pos: DVec3, radius: f64) -> Vec<usize> {
        let mut found = Vec::new();
        self.query_neighbors(pos, |j| {
            if positions[j].distance(pos) <= radius {
                found.push(j);
            }
        });
        found.sort_unstable();
        found.dedup();
        found
    }

    #[inline]
    fn hash_cell(&self, cx: i64, cy: i64, cz: i64) -> usize {
        let h = (cx as u64).wrapping_mul(73856093)
            ^ (cy as u64).wrapping_mul(19349663)
            ^ (cz as u64).wrapping_mul(83492791);
        (h % self.table_size as u64) as usize
    }

    #[inline]
    fn cell_coords(&self, pos: DVec3) -> (i64, i64, i64) {
        (
            (pos.x * self.inv_cell_size).floor() as i64,
            (pos.y * self.inv_cell_size).floor() as i64,
            (pos.z * self.inv_cell_size).floor() as i64,
        )
    }
}
