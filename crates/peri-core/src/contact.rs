use glam::DVec3;
use log::{debug, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{require_len, Error, Result};

/// Contact force between a rigid sphere (circle in 2-D) and its family of
/// particles.
///
/// Each family member is advanced by one step (`x + u + v·dt`). If that
/// predicted position lies inside the penetrator, the particle is projected
/// radially onto the surface and the force is the one that changes its
/// velocity to land exactly there:
///
/// `f = ρ V (v_required - v) / dt`, with `v_required = (y_surface - (x + u)) / dt`
///
/// A particle predicted exactly on the centre has no radial direction; it is
/// ejected along `fallback_normal`, which should be a unit vector.
///
/// The returned array spans every particle; only family members can be
/// non-zero. Forces point out of the penetrator. Slices must all hold one
/// entry per particle and every family index must be in range.
#[allow(clippy::too_many_arguments)]
pub fn calculate_contact_force(
    family: &[usize],
    radius: f64,
    position: DVec3,
    fallback_normal: DVec3,
    x: &[DVec3],
    u: &[DVec3],
    v: &[DVec3],
    density: f64,
    cell_volume: &[f64],
    dt: f64,
) -> Result<Vec<DVec3>> {
    let n_nodes = x.len();
    require_len("displacements", n_nodes, u.len())?;
    require_len("velocities", n_nodes, v.len())?;
    require_len("cell volumes", n_nodes, cell_volume.len())?;
    check_family(family, n_nodes)?;

    let contact_force = |i: usize| {
        let current = x[i] + u[i];
        let predicted = current + v[i] * dt;
        let diff = predicted - position;
        let dist = diff.length();
        if dist >= radius {
            return DVec3::ZERO;
        }
        let normal = if dist > 0.0 {
            diff / dist
        } else {
            debug!("particle {} sits on the penetrator centre; ejecting along {:?}", i, fallback_normal);
            fallback_normal
        };
        let surface = position + normal * radius;
        let v_required = (surface - current) / dt;
        density * cell_volume[i] * (v_required - v[i]) / dt
    };

    #[cfg(feature = "parallel")]
    let member_forces: Vec<DVec3> = family.par_iter().map(|&i| contact_force(i)).collect();

    #[cfg(not(feature = "parallel"))]
    let member_forces: Vec<DVec3> = family.iter().map(|&i| contact_force(i)).collect();

    let mut force = vec![DVec3::ZERO; n_nodes];
    let mut in_contact = 0usize;
    for (&i, &f) in family.iter().zip(&member_forces) {
        if f != DVec3::ZERO {
            in_contact += 1;
        }
        force[i] = f;
    }
    trace!("{} of {} family particles in contact", in_contact, family.len());

    Ok(force)
}

/// Force exerted by the particles back on the penetrator, summed in family
/// order.
pub fn total_reaction(family: &[usize], force: &[DVec3]) -> Result<DVec3> {
    check_family(family, force.len())?;
    Ok(-family.iter().fold(DVec3::ZERO, |acc, &i| acc + force[i]))
}

fn check_family(family: &[usize], n_nodes: usize) -> Result<()> {
    match family.iter().find(|&&i| i >= n_nodes) {
        Some(&i) => Err(Error::LengthMismatch {
            what: "family index range",
            expected: n_nodes,
            found: i + 1,
        }),
        None => Ok(()),
    }
}
