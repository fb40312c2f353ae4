use kinetic_engine::World;

#[test]
fn perf_smoke_step() {
    let world = World::new(2.0).unwrap();
    world.enable_perf_metrics(true);
    for i in 0..20 {
        for j in 0..10 {
            let x = -1.2 + i as f32 * 0.12;
            let y = -1.2 + j as f32 * 0.12;
            let a = world.create_body(x, y, 0.02);
            let b = world.create_body(x + 0.05, y, 0.02);
            assert!(world.join_centres(a, b));
        }
    }
    world.step(1.0 / 60.0).unwrap();
    let stats = world.get_perf_stats();
    assert!(stats.step_ms() >= 0.0);
    assert_eq!(stats.body_count(), 400);
    assert_eq!(stats.joints_added(), 200);
    assert_eq!(stats.joints_broken(), 0);
    assert_eq!(world.joint_count(), 200);
    assert_eq!(world.render_buffer().len(), 400 * 3);
    assert_eq!(world.render_ids().len(), 400);
}
