use glam::DVec3;

use crate::bonds::BondList;
use crate::error::{require_len, require_positive, Result};
use crate::materials::Material;

/// SoA particle storage for a discretised body.
///
/// Positions come from whatever generated the discretisation; kinematics are
/// advanced by the time integrator. The core reads positions and kinematics
/// and writes per-particle damage.
pub struct ParticleSet {
    pub n_nodes: usize,
    /// Reference (initial) positions
    pub x: Vec<DVec3>,
    /// Displacements from the reference configuration
    pub u: Vec<DVec3>,
    pub v: Vec<DVec3>,
    /// Volume represented by each particle
    pub cell_volume: Vec<f64>,
    /// Interaction radius shared by all particles
    pub horizon: f64,
    pub material: Material,
    /// Per-particle damage in [0, 1], refreshed from the bond damage
    pub damage: Vec<f64>,
}

impl ParticleSet {
    /// Wrap a set of reference positions. Displacements, velocities and
    /// damage start at zero.
    pub fn new(x: Vec<DVec3>, cell_volume: Vec<f64>, horizon: f64, material: Material) -> Result<Self> {
        require_len("cell volumes", x.len(), cell_volume.len())?;
        require_positive("horizon", horizon)?;
        material.validate()?;
        for &vol in &cell_volume {
            require_positive("cell_volume", vol)?;
        }

        let n_nodes = x.len();
        Ok(Self {
            n_nodes,
            x,
            u: vec![DVec3::ZERO; n_nodes],
            v: vec![DVec3::ZERO; n_nodes],
            cell_volume,
            horizon,
            material,
            damage: vec![0.0; n_nodes],
        })
    }

    /// Current positions `x + u`.
    pub fn current_positions(&self) -> Vec<DVec3> {
        self.x.iter().zip(&self.u).map(|(&x, &u)| x + u).collect()
    }

    /// Bonds between every pair of particles within the horizon.
    pub fn build_bonds(&self) -> BondList {
        BondList::build(&self.x, self.horizon)
    }

    /// Recompute per-particle damage from the bond damage.
    pub fn refresh_damage(&mut self, bonds: &BondList) -> Result<()> {
        self.damage = bonds.particle_damage(&self.cell_volume)?;
        Ok(())
    }
}
