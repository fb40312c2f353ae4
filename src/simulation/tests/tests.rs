use super::*;
use crate::domain::{Collision, ContactTarget};
use crate::error::KineticsError;
use crate::systems::backend::{BackendError, KinematicBackend};
use crate::systems::body::Particle;

fn world() -> PhysicsWorld<KinematicBackend> {
    let config = PhysicsConfig::new().with_world_radius(1.0).with_spatial_resolution(16);
    PhysicsWorld::kinematic(config).unwrap()
}

const DT: f32 = 1.0 / 60.0;

#[test]
fn ids_start_at_one_and_are_never_reused() {
    let world = world();
    let a = world.create_body(BodyKind::Plant);
    let b = world.create_body(BodyKind::Meat);
    assert_eq!(a.id(), BodyId(1));
    assert_eq!(b.id(), BodyId(2));

    b.kill(CauseOfDeath::Eaten);
    world.step(DT).unwrap();
    let c = world.create_body(BodyKind::Protozoan);
    assert_eq!(c.id(), BodyId(3));
    assert!(world.body(BodyId(2)).is_none());
}

#[test]
fn joint_becomes_live_on_next_step() {
    let world = world();
    let a = world.create_body_at(BodyKind::Protozoan, Vec2::new(0.0, 0.0), 0.03);
    let b = world.create_body_at(BodyKind::Protozoan, Vec2::new(0.05, 0.0), 0.04);

    assert!(world.join_centres(a.id(), b.id()));
    assert!(!world.join_centres(b.id(), a.id()));
    assert!(!world.are_joined(a.id(), b.id()));

    let report = world.step(DT).unwrap();
    assert_eq!(report.flush.added, 1);
    assert!(world.are_joined(b.id(), a.id()));
    assert_eq!(world.joint_count(), 1);
}

#[test]
fn killed_body_is_reaped_and_unjoined() {
    let world = world();
    let a = world.create_body_at(BodyKind::Protozoan, Vec2::new(0.0, 0.0), 0.03);
    let b = world.create_body_at(BodyKind::Protozoan, Vec2::new(0.05, 0.0), 0.04);
    world.join_centres(a.id(), b.id());
    world.step(DT).unwrap();

    b.kill(CauseOfDeath::Starvation);
    let report = world.step(DT).unwrap();
    assert_eq!(report.reaped, vec![b.id()]);
    assert_eq!(report.flush.broken, 1);
    assert!(b.core().is_disposed());
    assert_eq!(b.core().cause_of_death(), Some(CauseOfDeath::Starvation));
    assert_eq!(a.core().attached_count(), 0);

    let report = world.step(DT).unwrap();
    assert_eq!(report.flush.removed, 1);
    assert!(!world.are_joined(a.id(), b.id()));
    assert_eq!(world.body_count(), 1);
}

#[test]
fn anchored_join_faces_the_partner() {
    let world = world();
    let a = world.create_body_at(BodyKind::Protozoan, Vec2::new(0.0, 0.0), 0.03);
    let b = world.create_body_at(BodyKind::Protozoan, Vec2::new(0.1, 0.0), 0.03);
    a.core().set_angle(0.5);

    assert!(world.join_anchored(a.id(), b.id()));
    let joining = world.joints().joining(JointId::of(a.id(), b.id())).unwrap();
    assert!(joining.is_peer_to_peer());
    assert!((joining.anchor_angle_a() + 0.5).abs() < 1e-6);
    assert!((joining.anchor_angle_b() - std::f32::consts::PI).abs() < 1e-6);

    let anchor = joining.anchor_a(world.registry()).unwrap();
    assert!((anchor.x - 0.03).abs() < 1e-6);
    assert!(anchor.y.abs() < 1e-6);
}

#[test]
fn join_with_missing_body_is_refused() {
    let world = world();
    let a = world.create_body(BodyKind::Plant);
    assert!(!world.join_centres(a.id(), BodyId(99)));
}

#[test]
fn step_records_perf_and_rebuilds_spatial_index() {
    let world = world();
    let body = world.create_body_at(BodyKind::Plant, Vec2::new(0.3, -0.2), 0.02);

    let report = world.step(DT).unwrap();
    assert_eq!(report.tick, 1);
    assert!(report.step_ms >= 0.0);

    let stats = world.get_perf_stats();
    assert_eq!(stats.body_count(), 1);
    assert_eq!(stats.tick(), 1);
    let readings = stats.readings();
    let reading = |wanted: &str| {
        readings.iter().find(|(name, _)| *name == wanted).map(|(_, v)| *v)
    };
    assert_eq!(reading("Physics Step Time"), Some(stats.backend_ms()));
    assert_eq!(reading("Tick Time"), Some(stats.step_ms()));
    assert!(stats.backend_ms() <= stats.step_ms());

    let spatial = world.spatial();
    assert!(spatial.count_at(body.pos()) >= 1);
    assert_eq!(spatial.query_radius(body.pos(), 0.01), vec![body.id()]);
}

#[test]
fn perf_can_be_switched_off() {
    let world = world();
    world.create_body(BodyKind::Plant);
    world.enable_perf_metrics(false);
    world.step(DT).unwrap();
    assert_eq!(world.get_perf_stats(), PerfStats::default());
}

#[test]
fn backend_failure_is_fatal() {
    let world = world();
    let body = world.create_body_at(BodyKind::Meat, Vec2::zero(), 0.05);
    body.apply_force(Vec2::new(f32::INFINITY, 0.0));

    let err = world.step(DT).unwrap_err();
    assert!(matches!(
        err,
        KineticsError::Backend(BackendError::NumericalBlowUp { .. })
    ));
    assert_eq!(world.tick(), 0);
}

#[test]
fn kill_unknown_body_is_an_error() {
    let world = world();
    assert!(matches!(
        world.kill_body(BodyId(42), CauseOfDeath::Killed),
        Err(KineticsError::UnknownBody(BodyId(42)))
    ));
}

#[test]
fn update_hook_forgets_dead_contacts() {
    let world = world();
    let a = world.create_body(BodyKind::Protozoan);
    let b = world.create_body(BodyKind::Plant);
    a.core().add_contact(Collision::new(ContactTarget::Body(b.id()), Vec2::zero()));
    a.core().add_contact(Collision::new(ContactTarget::Boundary, Vec2::zero()));
    a.core().add_interacting(b.id());

    b.kill(CauseOfDeath::Eaten);
    world.update_bodies(DT);

    assert_eq!(a.core().contacts().len(), 1);
    assert_eq!(a.core().contacts()[0].other, ContactTarget::Boundary);
    assert!(a.core().interactions().is_empty());
}

#[test]
fn bodies_near_filters_by_distance() {
    let world = world();
    let near = world.create_body_at(BodyKind::Plant, Vec2::new(0.1, 0.0), 0.02);
    world.create_body_at(BodyKind::Plant, Vec2::new(0.5, 0.5), 0.02);
    world.step(DT).unwrap();

    let found = world.bodies_near(Vec2::zero(), 0.1);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id(), near.id());
}

#[test]
fn dispose_is_idempotent() {
    let world = world();
    let a = world.create_body(BodyKind::Plant);
    let b = world.create_body_at(BodyKind::Plant, Vec2::new(0.1, 0.0), 0.02);
    world.join_centres(a.id(), b.id());
    world.dispose();
    world.dispose();

    assert!(world.is_disposed());
    assert_eq!(world.body_count(), 0);
    assert_eq!(world.joint_count(), 0);
    assert!(a.core().is_disposed());
    assert_eq!(a.core().cause_of_death(), Some(CauseOfDeath::Disposed));
}
