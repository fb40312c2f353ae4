use kinetic_engine::core::{Aabb, Vec2};
use kinetic_engine::spatial::SpatialHash;
use proptest::prelude::*;

#[test]
fn worked_example_point_and_box() {
    let mut hash: SpatialHash<u32> = SpatialHash::new(100, None, 10.0);
    assert_eq!(hash.chunk_of(Vec2::new(0.05, 0.05)), (50, 50));

    let aabb = Aabb::new(Vec2::new(-0.15, -0.15), Vec2::new(0.25, 0.25));
    assert!(hash.insert_box(7, aabb));
    let touched: Vec<usize> = hash.chunk_indices().collect();
    assert_eq!(touched.len(), 9);
    for i in 49..=51 {
        for j in 49..=51 {
            assert_eq!(hash.count_in_chunk(i, j), 1);
        }
    }
    assert_eq!(hash.iter().count(), 9);
}

#[test]
fn full_chunk_turns_items_away() {
    let mut hash: SpatialHash<u32> = SpatialHash::new(4, Some(2), 1.0);
    let p = Vec2::new(0.1, 0.1);
    assert!(hash.insert(1, p));
    assert!(hash.is_full(p));
    assert!(hash.insert(2, p));
    assert!(!hash.insert(3, p));
    assert_eq!(hash.count_at(p), 2);
    assert_eq!(hash.rejected(), 1);
}

proptest! {
    #[test]
    fn points_land_inside_the_grid(
        points in prop::collection::vec((-15.0f32..15.0, -15.0f32..15.0), 0..300),
        cap in 1usize..8,
    ) {
        let resolution = 100u32;
        let mut hash: SpatialHash<usize> = SpatialHash::new(resolution, Some(cap), 10.0);
        for (n, (x, y)) in points.iter().enumerate() {
            hash.insert(n, Vec2::new(*x, *y));
        }

        let limit = (resolution * resolution) as usize;
        for idx in hash.chunk_indices() {
            prop_assert!(idx < limit);
            prop_assert!(hash.count_at_index(idx) <= cap);
        }
        prop_assert_eq!(hash.size(), points.len() - hash.rejected());
    }

    #[test]
    fn clear_leaves_nothing_behind(
        boxes in prop::collection::vec((-9.0f32..9.0, -9.0f32..9.0, 0.0f32..1.0), 1..50),
    ) {
        let mut hash: SpatialHash<usize> = SpatialHash::new(32, None, 10.0);
        for (n, (x, y, r)) in boxes.iter().enumerate() {
            prop_assert!(hash.insert_box(n, Aabb::around(Vec2::new(*x, *y), *r)));
        }
        hash.clear();
        prop_assert!(hash.is_empty());
        prop_assert_eq!(hash.iter().count(), 0);
        prop_assert_eq!(hash.query_radius(Vec2::ZERO, 20.0).len(), 0);
    }
}
