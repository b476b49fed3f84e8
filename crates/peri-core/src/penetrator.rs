use glam::DVec3;
use log::debug;

use crate::config::{PenetratorConfig, SimulationConfig};
use crate::contact::{calculate_contact_force, total_reaction};
use crate::error::{require_len, Result};
use crate::math::smooth_step_data;
use crate::particle::ParticleSet;

/// Family search radius as a multiple of the penetrator radius.
pub const SEARCH_RADIUS_FACTOR: f64 = 1.25;

/// Rigid penetrator with prescribed motion.
///
/// The family of candidate particles is fixed at construction from the
/// reference positions; particles that later drift into range are ignored.
#[derive(Clone, Debug)]
pub struct Penetrator {
    id: u32,
    centre: DVec3,
    radius: f64,
    search_radius: f64,
    target_displacement: f64,
    direction: DVec3,
    n_nodes: usize,
    family: Vec<usize>,
}

impl Penetrator {
    pub fn new(config: &PenetratorConfig, particles: &ParticleSet) -> Result<Self> {
        config.validate()?;
        let radius = config.radius;

        let search_radius = radius * SEARCH_RADIUS_FACTOR;
        let family = build_family(&particles.x, config.centre, search_radius);
        debug!(
            "penetrator {}: {} particles within {:e} of {:?}",
            config.id,
            family.len(),
            search_radius,
            config.centre
        );

        Ok(Self {
            id: config.id,
            centre: config.centre,
            radius,
            search_radius,
            target_displacement: config.target_displacement,
            direction: config.direction,
            n_nodes: particles.n_nodes,
            family,
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Initial centre.
    pub fn centre(&self) -> DVec3 {
        self.centre
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn search_radius(&self) -> f64 {
        self.search_radius
    }

    /// Particle indices in range at construction, ascending.
    pub fn family(&self) -> &[usize] {
        &self.family
    }

    /// Centre at step `i_time_step` of `n_time_steps`.
    ///
    /// Eases from the initial centre to `centre + target_displacement * direction`;
    /// steps past the end hold the final position.
    pub fn update_penetrator_position(&self, i_time_step: usize, n_time_steps: usize) -> DVec3 {
        let travel = smooth_step_data(i_time_step, 0, n_time_steps, 0.0, self.target_displacement);
        self.centre + self.direction * travel
    }

    /// Contact force on every particle at step `i_time_step`.
    pub fn calculate_penetrator_force(
        &self,
        particles: &ParticleSet,
        simulation: &SimulationConfig,
        i_time_step: usize,
    ) -> Result<Vec<DVec3>> {
        simulation.validate()?;
        require_len("particle set", self.n_nodes, particles.n_nodes)?;
        require_len("positions", particles.n_nodes, particles.x.len())?;
        require_len("displacements", particles.n_nodes, particles.u.len())?;
        require_len("velocities", particles.n_nodes, particles.v.len())?;
        require_len("cell volumes", particles.n_nodes, particles.cell_volume.len())?;

        let position = self.update_penetrator_position(i_time_step, simulation.n_time_steps);
        calculate_contact_force(
            &self.family,
            self.radius,
            position,
            self.leading_normal(),
            &particles.x,
            &particles.u,
            &particles.v,
            particles.material.density,
            &particles.cell_volume,
            simulation.dt,
        )
    }

    /// Unit vector along the travel, used to eject a particle sitting exactly
    /// on the centre. A zero `direction` falls back to `+y`.
    fn leading_normal(&self) -> DVec3 {
        (self.direction * self.target_displacement.signum())
            .try_normalize()
            .unwrap_or(DVec3::Y)
    }

    /// Net force the particles exert back on the penetrator.
    ///
    /// `force` must hold one entry per particle.
    pub fn reaction(&self, force: &[DVec3]) -> Result<DVec3> {
        require_len("forces", self.n_nodes, force.len())?;
        total_reaction(&self.family, force)
    }
}

/// Indices of the particles at most `search_radius` from `centre`
/// (Euclidean distance, boundary included), ascending.
pub fn build_family(x: &[DVec3], centre: DVec3, search_radius: f64) -> Vec<usize> {
    x.iter()
        .enumerate()
        .filter(|(_, xi)| xi.distance(centre) <= search_radius)
        .map(|(i, _)| i)
        .collect()
}
