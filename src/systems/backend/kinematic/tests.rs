use std::sync::Arc;

use crate::config::PhysicsConfig;
use crate::core::Vec2;
use crate::domain::{BodyId, BodyKind, CauseOfDeath, ContactTarget};
use crate::systems::backend::{BackendError, JointBackend, PhysicsBackend, WorldBoundary};
use crate::systems::body::{BodyRegistry, Particle};
use crate::systems::joints::{JointKind, Joining};

use super::{KinematicBackend, KinematicBody};

fn setup() -> (KinematicBackend, BodyRegistry<KinematicBody>) {
    let config = PhysicsConfig::new().with_world_radius(1.0).with_spatial_resolution(16);
    (KinematicBackend::new(&config), BodyRegistry::new())
}

fn spawn(
    backend: &KinematicBackend,
    bodies: &BodyRegistry<KinematicBody>,
    id: u64,
    pos: Vec2,
    radius: f32,
) -> Arc<KinematicBody> {
    let body = Arc::new(backend.new_body(BodyId(id), BodyKind::Protozoan));
    body.core().set_pos(pos);
    body.core().set_radius(radius);
    bodies.insert(body.clone());
    body
}

#[test]
fn impulse_moves_body_and_drag_slows_it() {
    let (mut backend, bodies) = setup();
    let body = spawn(&backend, &bodies, 1, Vec2::zero(), 0.05);
    body.apply_impulse(Vec2::new(body.mass(), 0.0));

    backend.step_physics(&bodies, 0.1).unwrap();
    let vel = body.core().vel();
    assert!(vel.x > 0.0 && vel.x < 1.0, "drag should take some speed off: {vel:?}");
    assert!(body.pos().x > 0.0);
    assert_eq!(body.pos().y, 0.0);
}

#[test]
fn overlapping_bodies_touch_and_separate() {
    let (mut backend, bodies) = setup();
    let a = spawn(&backend, &bodies, 1, Vec2::new(0.0, 0.0), 0.05);
    let b = spawn(&backend, &bodies, 2, Vec2::new(0.08, 0.0), 0.05);

    backend.step_physics(&bodies, 0.01).unwrap();

    assert_eq!(a.core().contacts()[0].other, ContactTarget::Body(b.id()));
    assert_eq!(b.core().contacts()[0].other, ContactTarget::Body(a.id()));
    assert!(a.pos().distance(b.pos()) >= 0.1 - 1e-5);
    assert!(!a.is_dead() && !b.is_dead());
    assert_eq!(backend.counts().contacts, 1);
}

#[test]
fn swallowed_centre_suffocates() {
    let (mut backend, bodies) = setup();
    let big = spawn(&backend, &bodies, 1, Vec2::new(0.0, 0.0), 0.1);
    let small = spawn(&backend, &bodies, 2, Vec2::new(0.02, 0.0), 0.01);

    backend.step_physics(&bodies, 0.01).unwrap();

    assert_eq!(small.core().cause_of_death(), Some(CauseOfDeath::Suffocation));
    assert!(!big.is_dead());
}

#[test]
fn joined_bodies_do_not_collide() {
    let (mut backend, bodies) = setup();
    let a = spawn(&backend, &bodies, 1, Vec2::new(0.0, 0.0), 0.05);
    let b = spawn(&backend, &bodies, 2, Vec2::new(0.08, 0.0), 0.05);
    let joining = Joining::centres(a.id(), b.id());
    a.core().register_joining(b.id(), joining.id());
    b.core().register_joining(a.id(), joining.id());
    backend.create_joint(&joining, 0.12);

    backend.step_physics(&bodies, 0.01).unwrap();
    assert!(a.core().contacts().is_empty());
}

#[test]
fn rope_pulls_stretched_pair_back() {
    let (mut backend, bodies) = setup();
    let a = spawn(&backend, &bodies, 1, Vec2::new(-0.2, 0.0), 0.03);
    let b = spawn(&backend, &bodies, 2, Vec2::new(0.2, 0.0), 0.03);
    let joining = Joining::centres(a.id(), b.id());
    backend.create_joint(&joining, 0.1);

    backend.step_physics(&bodies, 0.01).unwrap();
    assert!(a.pos().distance(b.pos()) <= 0.1 + 1e-4);
    assert!((a.pos().x + b.pos().x).abs() < 1e-4, "equal masses meet halfway");
}

#[test]
fn soft_distance_joint_only_closes_part_of_the_gap() {
    let (mut backend, bodies) = setup();
    let a = spawn(&backend, &bodies, 1, Vec2::new(-0.2, 0.0), 0.03);
    let b = spawn(&backend, &bodies, 2, Vec2::new(0.2, 0.0), 0.03);
    let joining = Joining::centres(a.id(), b.id())
        .with_kind(JointKind::Distance { damping_ratio: 0.5, frequency_hz: 2.0 });
    backend.create_joint(&joining, 0.1);

    backend.step_physics(&bodies, 0.01).unwrap();
    let dist = a.pos().distance(b.pos());
    assert!(dist < 0.4 && dist > 0.1);
}

#[test]
fn boundary_keeps_bodies_inside() {
    let (mut backend, bodies) = setup();
    backend.register_static_bodies(&WorldBoundary::disc(1.0));
    let body = spawn(&backend, &bodies, 1, Vec2::new(0.99, 0.0), 0.05);
    body.core().set_vel(Vec2::new(1.0, 0.0));

    backend.step_physics(&bodies, 0.01).unwrap();

    assert!(body.pos().length() + body.radius() <= 1.0 + 1e-5);
    assert!(body.core().vel().x < 0.0, "bounced off the wall");
    assert!(body.core().contacts().iter().any(|c| c.other == ContactTarget::Boundary));
}

#[test]
fn obstacle_pushes_body_out() {
    let (mut backend, bodies) = setup();
    backend.register_static_bodies(&WorldBoundary::default().with_obstacle(Vec2::zero(), 0.1));
    let body = spawn(&backend, &bodies, 1, Vec2::new(0.12, 0.0), 0.05);

    backend.step_physics(&bodies, 0.01).unwrap();

    assert!(body.pos().length() >= 0.15 - 1e-5);
    assert_eq!(body.core().contacts()[0].other, ContactTarget::Static(0));
    assert_eq!(backend.counts().obstacles, 1);
}

#[test]
fn sensor_tracks_bodies_in_range() {
    let (mut backend, bodies) = setup();
    let watcher = spawn(&backend, &bodies, 1, Vec2::new(0.0, 0.0), 0.02);
    let near = spawn(&backend, &bodies, 2, Vec2::new(0.15, 0.0), 0.02);
    spawn(&backend, &bodies, 3, Vec2::new(0.6, 0.0), 0.02);
    watcher.enable_ranged_interaction();
    watcher.core().set_ranged_interaction_radius(0.2);

    backend.step_physics(&bodies, 0.01).unwrap();
    assert_eq!(watcher.core().interactions(), vec![near.id()]);

    near.core().set_pos(Vec2::new(-0.7, 0.0));
    backend.step_physics(&bodies, 0.01).unwrap();
    assert!(watcher.core().interactions().is_empty());
}

#[test]
fn non_finite_state_is_fatal() {
    let (mut backend, bodies) = setup();
    let body = spawn(&backend, &bodies, 9, Vec2::zero(), 0.05);
    body.apply_force(Vec2::new(f32::NAN, 0.0));

    let err = backend.step_physics(&bodies, 0.01).unwrap_err();
    assert!(matches!(err, BackendError::NumericalBlowUp { body } if body == BodyId(9)));
}

#[test]
fn released_body_takes_its_joints_along() {
    let (mut backend, bodies) = setup();
    let a = spawn(&backend, &bodies, 1, Vec2::new(-0.1, 0.0), 0.03);
    let b = spawn(&backend, &bodies, 2, Vec2::new(0.1, 0.0), 0.03);
    let joining = Joining::centres(a.id(), b.id());
    backend.create_joint(&joining, 0.1);
    assert_eq!(backend.joint_length(joining.id()), Some(0.1));

    backend.release_body(&b);
    assert_eq!(backend.counts().joints, 0);
}
