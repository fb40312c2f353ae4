use tracing::trace;

use crate::domain::BodyId;
use crate::systems::backend::PhysicsBackend;
use crate::systems::body::Particle;
use crate::systems::joints::{JointKind, Joining};

use super::PhysicsWorld;

/// Join two live bodies. Anchored joins attach each body at the point of its
/// rim that faces the other, expressed relative to the body's own angle so
/// the anchor turns with it.
pub(super) fn join<B: PhysicsBackend>(
    world: &PhysicsWorld<B>,
    a: BodyId,
    b: BodyId,
    anchored: bool,
    kind: JointKind,
) -> bool {
    let (Some(body_a), Some(body_b)) = (world.bodies.get(a), world.bodies.get(b)) else {
        return false;
    };

    let joining = if anchored {
        let (pa, pb) = (body_a.pos(), body_b.pos());
        let angle_a = (pb - pa).angle() - body_a.angle();
        let angle_b = (pa - pb).angle() - body_b.angle();
        Joining::anchored(a, b, angle_a, angle_b)
    } else {
        Joining::centres(a, b)
    };

    let created = world.joints.create_joint(joining.with_kind(kind), &world.bodies);
    if created {
        trace!(a = %a, b = %b, anchored, "join requested");
    }
    created
}
