#![cfg(target_arch = "wasm32")]

use kinetic_engine::World;
use wasm_bindgen_test::*;

#[wasm_bindgen_test]
fn facade_steps_and_joins() {
    let world = World::new(1.0).unwrap();
    let a = world.create_body(0.0, 0.0, 0.02);
    let b = world.create_body(0.05, 0.0, 0.02);
    assert!(world.join_centres(a, b));
    world.step(1.0 / 60.0).unwrap();
    assert!(world.are_joined(a, b));
    assert_eq!(world.body_count(), 2);
    assert!(world.snapshot_json().unwrap().contains("joinings"));
}
