use glam::DVec3;
use log::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::constitutive::ConstitutiveLaw;
use crate::error::{require_len, Result};
use crate::grid::SpatialHashGrid;

/// Pairwise bonds of a particle set and their damage state.
///
/// Bonds are stored once per pair (`i < j`). A CSR incidence table lists the
/// bonds touching each particle so that per-particle sums are gathered in a
/// fixed order, independent of how the work is split across threads.
pub struct BondList {
    n_nodes: usize,
    pairs: Vec<[usize; 2]>,
    /// Reference bond lengths
    xi: Vec<f64>,
    /// Damage per bond in [0, 1]
    d: Vec<f64>,
    offsets: Vec<usize>,
    incident: Vec<usize>,
}

impl BondList {
    /// Bond every pair of particles no further apart than `horizon`.
    /// Coincident particles are not bonded.
    pub fn build(x: &[DVec3], horizon: f64) -> Self {
        let n_nodes = x.len();
        let grid = SpatialHashGrid::build(x, horizon);

        let mut pairs = Vec::new();
        let mut xi = Vec::new();
        for i in 0..n_nodes {
            for j in grid.within(x, x[i], horizon) {
                if j <= i {
                    continue; // avoid duplicate pairs + self
                }
                let length = x[i].distance(x[j]);
                if length > 0.0 {
                    pairs.push([i, j]);
                    xi.push(length);
                }
            }
        }

        // Counting sort of bond ids by particle
        let mut offsets = vec![0usize; n_nodes + 1];
        for &[i, j] in &pairs {
            offsets[i + 1] += 1;
            offsets[j + 1] += 1;
        }
        for k in 1..=n_nodes {
            offsets[k] += offsets[k - 1];
        }
        let mut fill = offsets.clone();
        let mut incident = vec![0usize; 2 * pairs.len()];
        for (b, &[i, j]) in pairs.iter().enumerate() {
            incident[fill[i]] = b;
            fill[i] += 1;
            incident[fill[j]] = b;
            fill[j] += 1;
        }

        debug!("built {} bonds for {} particles (horizon {:e})", pairs.len(), n_nodes, horizon);

        let n_bonds = pairs.len();
        Self {
            n_nodes,
            pairs,
            xi,
            d: vec![0.0; n_bonds],
            offsets,
            incident,
        }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[[usize; 2]] {
        &self.pairs
    }

    pub fn initial_lengths(&self) -> &[f64] {
        &self.xi
    }

    pub fn damage(&self) -> &[f64] {
        &self.d
    }

    /// Bond ids touching particle `i`.
    pub fn bonds_of(&self, i: usize) -> &[usize] {
        &self.incident[self.offsets[i]..self.offsets[i + 1]]
    }

    /// Bond stretch `(|y_j - y_i| - ξ) / ξ` with `y = x + u`.
    pub fn stretch(&self, x: &[DVec3], u: &[DVec3]) -> Result<Vec<f64>> {
        require_len("positions", self.n_nodes, x.len())?;
        require_len("displacements", self.n_nodes, u.len())?;

        let stretch_of = |b: usize| {
            let [i, j] = self.pairs[b];
            let length = ((x[j] + u[j]) - (x[i] + u[i])).length();
            (length - self.xi[b]) / self.xi[b]
        };

        #[cfg(feature = "parallel")]
        let out = (0..self.len()).into_par_iter().map(stretch_of).collect();

        #[cfg(not(feature = "parallel"))]
        let out = (0..self.len()).map(stretch_of).collect();

        Ok(out)
    }

    /// Evaluate `law` on the current stretch and store the new damage.
    ///
    /// On error the stored damage is left unchanged.
    pub fn update_damage(&mut self, law: &ConstitutiveLaw, x: &[DVec3], u: &[DVec3]) -> Result<()> {
        let stretch = self.stretch(x, u)?;
        self.d = law.calculate_bond_damage(&stretch, &self.d)?;
        Ok(())
    }

    /// Bond force density on every particle:
    /// `Σ c (1 - d) s V_j e_ij` over the bonds of `i`.
    pub fn bond_forces(
        &self,
        c: f64,
        x: &[DVec3],
        u: &[DVec3],
        cell_volume: &[f64],
    ) -> Result<Vec<DVec3>> {
        require_len("positions", self.n_nodes, x.len())?;
        require_len("displacements", self.n_nodes, u.len())?;
        require_len("cell volumes", self.n_nodes, cell_volume.len())?;

        let force_on = |i: usize| {
            let y_i = x[i] + u[i];
            let mut f = DVec3::ZERO;
            for &b in self.bonds_of(i) {
                let [p, q] = self.pairs[b];
                let j = if p == i { q } else { p };
                let dir = (x[j] + u[j]) - y_i;
                let length = dir.length();
                if length <= 0.0 {
                    continue;
                }
                let s = (length - self.xi[b]) / self.xi[b];
                f += dir / length * (c * (1.0 - self.d[b]) * s * cell_volume[j]);
            }
            f
        };

        #[cfg(feature = "parallel")]
        let out = (0..self.n_nodes).into_par_iter().map(force_on).collect();

        #[cfg(not(feature = "parallel"))]
        let out = (0..self.n_nodes).map(force_on).collect();

        Ok(out)
    }

    /// Volume-weighted mean damage of the bonds of each particle.
    /// Particles without bonds report zero.
    pub fn particle_damage(&self, cell_volume: &[f64]) -> Result<Vec<f64>> {
        require_len("cell volumes", self.n_nodes, cell_volume.len())?;

        let damage_of = |i: usize| {
            let mut weighted = 0.0;
            let mut total = 0.0;
            for &b in self.bonds_of(i) {
                let [p, q] = self.pairs[b];
                let vol = cell_volume[if p == i { q } else { p }];
                weighted += self.d[b] * vol;
                total += vol;
            }
            if total > 0.0 {
                weighted / total
            } else {
                0.0
            }
        };

        #[cfg(feature = "parallel")]
        let out = (0..self.n_nodes).into_par_iter().map(damage_of).collect();

        #[cfg(not(feature = "parallel"))]
        let out = (0..self.n_nodes).map(damage_of).collect();

        Ok(out)
    }
}
