use glam::DVec3;
use peri_core::contact::{calculate_contact_force, total_reaction};
use peri_core::penetrator::build_family;
use peri_core::{Error, Material, ParticleSet, Penetrator, PenetratorConfig, SimulationConfig};

const CELL_VOLUME: f64 = 1.0e-6;

fn particles_at(positions: Vec<DVec3>) -> ParticleSet {
    let n = positions.len();
    ParticleSet::new(positions, vec![CELL_VOLUME; n], 0.003, Material::STEEL).unwrap()
}

fn unit_penetrator() -> PenetratorConfig {
    PenetratorConfig {
        id: 7,
        centre: DVec3::ZERO,
        radius: 1.0,
        target_displacement: 0.5,
        direction: DVec3::NEG_Y,
    }
}

#[test]
fn test_family_includes_closed_boundary() {
    let r = 1.0;
    let particles = particles_at(vec![
        DVec3::new(0.0, 0.0, 0.0),
        DVec3::new(r, 0.0, 0.0),
        DVec3::new(1.25 * r, 0.0, 0.0),
        DVec3::new(1.25 * r + 1.0e-9, 0.0, 0.0),
    ]);
    let penetrator = Penetrator::new(&unit_penetrator(), &particles).unwrap();

    assert_eq!(penetrator.search_radius(), 1.25 * r);
    assert_eq!(penetrator.family(), &[0, 1, 2]);
}

#[test]
fn test_family_uses_euclidean_distance() {
    // Offsets whose components cancel are still far away.
    let x = vec![
        DVec3::new(0.9, -0.9, 0.0),
        DVec3::new(0.0, 0.0, 1.2),
        DVec3::new(-0.7, 0.7, 0.0),
    ];
    let family = build_family(&x, DVec3::ZERO, 1.0);
    assert_eq!(family, vec![2]);
}

#[test]
fn test_family_is_fixed_at_construction() {
    let mut particles = particles_at(vec![DVec3::new(0.5, 0.0, 0.0), DVec3::new(3.0, 0.0, 0.0)]);
    let penetrator = Penetrator::new(&unit_penetrator(), &particles).unwrap();
    assert_eq!(penetrator.family(), &[0]);

    // Drag particle 1 into the penetrator: it is not in the family, so no force.
    particles.u[1] = DVec3::new(-2.9, 0.0, 0.0);
    let sim = SimulationConfig { n_time_steps: 10, dt: 1.0e-3 };
    let f = penetrator.calculate_penetrator_force(&particles, &sim, 0).unwrap();
    assert_eq!(f[1], DVec3::ZERO);
    assert_eq!(penetrator.family(), &[0]);
}

#[test]
fn test_position_endpoints() {
    let particles = particles_at(vec![DVec3::ZERO]);
    let config = PenetratorConfig {
        centre: DVec3::new(1.0, 2.0, 0.0),
        ..unit_penetrator()
    };
    let penetrator = Penetrator::new(&config, &particles).unwrap();

    assert_eq!(penetrator.update_penetrator_position(0, 100), config.centre);
    assert_eq!(
        penetrator.update_penetrator_position(100, 100),
        config.centre + config.direction * config.target_displacement
    );
    // Past the end holds the final position
    assert_eq!(
        penetrator.update_penetrator_position(250, 100),
        penetrator.update_penetrator_position(100, 100)
    );
}

#[test]
fn test_position_monotonic_along_direction() {
    let particles = particles_at(vec![DVec3::ZERO]);
    let penetrator = Penetrator::new(&unit_penetrator(), &particles).unwrap();
    let n = 200;
    let mut prev = 0.0;
    for i in 0..=n {
        let p = penetrator.update_penetrator_position(i, n);
        let travel = (p - penetrator.centre()).dot(DVec3::NEG_Y);
        assert!(travel >= prev, "travel decreased at step {}: {} < {}", i, travel, prev);
        assert!(travel <= 0.5 + 1.0e-15, "overshoot at step {}: {}", i, travel);
        prev = travel;
    }
}

#[test]
fn test_position_with_zero_steps_is_defined() {
    let particles = particles_at(vec![DVec3::ZERO]);
    let penetrator = Penetrator::new(&unit_penetrator(), &particles).unwrap();
    let p = penetrator.update_penetrator_position(0, 0);
    assert!(p.is_finite());
    assert_eq!(p, DVec3::new(0.0, -0.5, 0.0));
}

#[test]
fn test_contact_force_only_on_family() {
    let particles = particles_at(vec![
        DVec3::new(0.0, 0.5, 0.0), // inside the penetrator
        DVec3::new(0.0, 1.2, 0.0), // in the family, not touching
        DVec3::new(5.0, 0.0, 0.0), // out of range
        DVec3::new(0.3, 0.0, 0.0), // inside
    ]);
    let penetrator = Penetrator::new(&unit_penetrator(), &particles).unwrap();
    let sim = SimulationConfig { n_time_steps: 100, dt: 1.0e-3 };
    let f = penetrator.calculate_penetrator_force(&particles, &sim, 0).unwrap();

    assert_eq!(f.len(), particles.n_nodes);
    for i in 0..f.len() {
        if !penetrator.family().contains(&i) {
            assert_eq!(f[i], DVec3::ZERO, "non-family particle {} got force {:?}", i, f[i]);
        }
    }
    assert_eq!(f[1], DVec3::ZERO, "particle outside radius should feel nothing");
    assert!(f[0].y > 0.0 && f[0].x == 0.0, "particle 0 should be pushed up: {:?}", f[0]);
    assert!(f[3].x > 0.0 && f[3].y == 0.0, "particle 3 should be pushed along +x: {:?}", f[3]);
}

#[test]
fn test_contact_force_magnitude() {
    let particles = particles_at(vec![DVec3::new(0.0, 0.5, 0.0)]);
    let penetrator = Penetrator::new(&unit_penetrator(), &particles).unwrap();
    let dt = 1.0e-3;
    let sim = SimulationConfig { n_time_steps: 100, dt };
    let f = penetrator.calculate_penetrator_force(&particles, &sim, 0).unwrap();

    // Pushed 0.5 back to the surface within one step
    let expected = Material::STEEL.density * CELL_VOLUME * 0.5 / (dt * dt);
    assert!((f[0].y - expected).abs() / expected < 1.0e-9, "f = {:?}, expected {}", f[0], expected);
}

#[test]
fn test_contact_uses_current_penetrator_position() {
    let particles = particles_at(vec![DVec3::new(0.0, 0.5, 0.0)]);
    let penetrator = Penetrator::new(&unit_penetrator(), &particles).unwrap();
    let sim = SimulationConfig { n_time_steps: 100, dt: 1.0e-3 };

    let start = penetrator.calculate_penetrator_force(&particles, &sim, 0).unwrap();
    let end = penetrator.calculate_penetrator_force(&particles, &sim, 100).unwrap();
    assert!(start[0].y > 0.0);
    // By the last step the centre is at y = -0.5 and the particle sits on the surface
    assert_eq!(end[0], DVec3::ZERO);
}

#[test]
fn test_contact_accounts_for_velocity() {
    let mut particles = particles_at(vec![DVec3::new(0.0, 1.1, 0.0)]);
    let penetrator = Penetrator::new(&unit_penetrator(), &particles).unwrap();
    let sim = SimulationConfig { n_time_steps: 100, dt: 1.0e-3 };

    let at_rest = penetrator.calculate_penetrator_force(&particles, &sim, 0).unwrap();
    assert_eq!(at_rest[0], DVec3::ZERO);

    // Moving towards the centre fast enough to end the step inside
    particles.v[0] = DVec3::new(0.0, -500.0, 0.0);
    let moving = penetrator.calculate_penetrator_force(&particles, &sim, 0).unwrap();
    assert!(moving[0].y > 0.0, "approaching particle should be resisted: {:?}", moving[0]);
}

#[test]
fn test_kernel_respects_given_family() {
    let x = vec![DVec3::new(0.0, 0.5, 0.0), DVec3::new(0.0, -0.5, 0.0)];
    let zeros = vec![DVec3::ZERO; 2];
    let f = calculate_contact_force(&[1], 1.0, DVec3::ZERO, DVec3::Y, &x, &zeros, &zeros, 1000.0, &[1.0, 1.0], 1.0)
        .unwrap();
    assert_eq!(f[0], DVec3::ZERO);
    assert!(f[1].y < 0.0);
}

#[test]
fn test_kernel_rejects_misaligned_input() {
    let x = vec![DVec3::ZERO, DVec3::X];
    let zeros = vec![DVec3::ZERO; 2];
    assert!(matches!(
        calculate_contact_force(&[0], 1.0, DVec3::ZERO, DVec3::Y, &x, &zeros[..1], &zeros, 1.0, &[1.0, 1.0], 1.0),
        Err(Error::LengthMismatch { what: "displacements", .. })
    ));
    assert!(matches!(
        calculate_contact_force(&[0, 2], 1.0, DVec3::ZERO, DVec3::Y, &x, &zeros, &zeros, 1.0, &[1.0, 1.0], 1.0),
        Err(Error::LengthMismatch { .. })
    ));
}

#[test]
fn test_particle_on_centre_is_ejected_along_travel() {
    let particles = particles_at(vec![DVec3::ZERO]);
    let penetrator = Penetrator::new(&unit_penetrator(), &particles).unwrap();
    let dt = 1.0e-3;
    let sim = SimulationConfig { n_time_steps: 100, dt };
    let f = penetrator.calculate_penetrator_force(&particles, &sim, 0).unwrap();

    // Full radius of penetration, pushed out ahead of the motion (-y)
    let expected = Material::STEEL.density * CELL_VOLUME * 1.0 / (dt * dt);
    assert_eq!(f[0].x, 0.0);
    assert!(f[0].y < 0.0, "f = {:?}", f[0]);
    assert!((f[0].length() - expected).abs() / expected < 1.0e-9, "f = {:?}, expected {}", f[0], expected);
}

#[test]
fn test_reaction_opposes_particle_forces() {
    let particles = particles_at(vec![DVec3::new(0.0, 0.5, 0.0), DVec3::new(0.4, 0.0, 0.0)]);
    let penetrator = Penetrator::new(&unit_penetrator(), &particles).unwrap();
    let sim = SimulationConfig { n_time_steps: 100, dt: 1.0e-3 };
    let f = penetrator.calculate_penetrator_force(&particles, &sim, 0).unwrap();

    let reaction = penetrator.reaction(&f).unwrap();
    assert_eq!(reaction, total_reaction(penetrator.family(), &f).unwrap());
    assert!(((reaction + f[0] + f[1]).length()) < 1.0e-9 * f[0].length());
    assert!(reaction.x < 0.0 && reaction.y < 0.0);
}

#[test]
fn test_reaction_rejects_short_force_array() {
    let particles = particles_at(vec![DVec3::new(0.0, 0.5, 0.0), DVec3::new(0.4, 0.0, 0.0)]);
    let penetrator = Penetrator::new(&unit_penetrator(), &particles).unwrap();
    assert_eq!(penetrator.family(), &[0, 1]);

    assert!(matches!(
        penetrator.reaction(&[DVec3::ZERO]),
        Err(Error::LengthMismatch { what: "forces", expected: 2, found: 1 })
    ));
    assert!(matches!(
        total_reaction(penetrator.family(), &[DVec3::ZERO]),
        Err(Error::LengthMismatch { .. })
    ));
}

#[test]
fn test_default_config_moves_centre_by_target_in_plane() {
    let particles = particles_at(vec![DVec3::ZERO]);
    let config = PenetratorConfig::default();
    let penetrator = Penetrator::new(&config, &particles).unwrap();

    assert_eq!(penetrator.update_penetrator_position(0, 10), DVec3::ZERO);
    assert_eq!(
        penetrator.update_penetrator_position(10, 10),
        DVec3::new(1.0e-4, 1.0e-4, 0.0)
    );

    let moved = PenetratorConfig {
        centre: DVec3::new(0.2, 0.3, 0.0),
        ..PenetratorConfig::default()
    };
    let penetrator = Penetrator::new(&moved, &particles).unwrap();
    assert_eq!(
        penetrator.update_penetrator_position(10, 10),
        moved.centre + DVec3::new(1.0e-4, 1.0e-4, 0.0)
    );
}

#[test]
fn test_invalid_penetrator_rejected() {
    let particles = particles_at(vec![DVec3::ZERO]);
    let config = PenetratorConfig { radius: 0.0, ..unit_penetrator() };
    assert!(matches!(
        Penetrator::new(&config, &particles),
        Err(Error::InvalidConfiguration { parameter: "radius", .. })
    ));
    let config = PenetratorConfig { target_displacement: f64::NAN, ..unit_penetrator() };
    assert!(matches!(
        Penetrator::new(&config, &particles),
        Err(Error::InvalidConfiguration { parameter: "target_displacement", .. })
    ));
    let config = PenetratorConfig { centre: DVec3::new(f64::INFINITY, 0.0, 0.0), ..unit_penetrator() };
    assert!(matches!(
        Penetrator::new(&config, &particles),
        Err(Error::InvalidConfiguration { parameter: "centre", .. })
    ));

    let penetrator = Penetrator::new(&unit_penetrator(), &particles).unwrap();
    let sim = SimulationConfig { n_time_steps: 10, dt: 0.0 };
    assert!(matches!(
        penetrator.calculate_penetrator_force(&particles, &sim, 0),
        Err(Error::InvalidConfiguration { parameter: "dt", .. })
    ));
}

#[test]
fn test_force_rejects_different_particle_set() {
    let particles = particles_at(vec![DVec3::ZERO, DVec3::X]);
    let penetrator = Penetrator::new(&unit_penetrator(), &particles).unwrap();
    let other = particles_at(vec![DVec3::ZERO]);
    let sim = SimulationConfig::default();
    assert!(matches!(
        penetrator.calculate_penetrator_force(&other, &sim, 0),
        Err(Error::LengthMismatch { .. })
    ));
}
