//! Bond-based peridynamics core.
//!
//! Two pieces live here: the constitutive laws that turn bond stretch into
//! irreversible bond damage, and the rigid penetrator that pushes on a fixed
//! family of particles with a prescribed trajectory. Time integration and
//! particle generation belong to the caller.
pub mod bonds;
pub mod config;
pub mod constitutive;
pub mod contact;
pub mod error;
pub mod grid;
pub mod materials;
pub mod math;
pub mod particle;
pub mod penetrator;

pub use bonds::BondList;
pub use config::{LawConfig, PenetratorConfig, SetupConfig, SimulationConfig};
pub use constitutive::{ConstitutiveLaw, Linear, NonLinear, Trilinear};
pub use error::{Error, Result};
pub use materials::Material;
pub use particle::ParticleSet;
pub use penetrator::Penetrator;
