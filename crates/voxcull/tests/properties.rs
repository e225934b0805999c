//! Properties that must hold for any world.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use glam::IVec3;
use parking_lot::Mutex;
use voxcull::{Aabb, GridWalk, OcclusionCuller, Point3};
use voxcull_test::{probe_grid, GridWorld};

/// Deterministic points spread over `[-range, range)` on each axis.
fn sample_points(count: usize, range: f64) -> Vec<Point3> {
    let mut state = 0x2545_f491_4f6c_dd1d_u64;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state >> 11) as f64 / (1u64 << 53) as f64 * 2.0 * range - range
    };
    (0..count)
        .map(|_| Point3::new(next(), next(), next()))
        .collect()
}

fn solid_world(half: i32) -> GridWorld {
    let mut world = GridWorld::new();
    world.fill(IVec3::splat(-half), IVec3::splat(half));
    world
}

#[test]
fn box_containing_viewer_is_visible_even_in_solid_rock() {
    let mut culler = OcclusionCuller::new(16, solid_world(12)).unwrap();
    for viewer in sample_points(64, 6.0) {
        let aabb = Aabb::new(viewer.offset(-0.3, -1.0, -0.3), viewer.offset(0.3, 0.8, 0.3));
        assert!(culler.is_visible(&aabb, viewer), "{viewer:?}");
    }
    assert_eq!(culler.stats().rays_cast, 0);
}

#[test]
fn degenerate_box_at_viewer_is_visible() {
    let mut culler = OcclusionCuller::new(16, solid_world(12)).unwrap();
    for viewer in sample_points(64, 6.0) {
        assert!(culler.is_visible(&Aabb::point(viewer), viewer), "{viewer:?}");
    }
}

#[test]
fn walk_is_symmetric() {
    let points = sample_points(80, 10.0);
    for pair in points.chunks_exact(2) {
        let (a, b) = (pair[0], pair[1]);
        let forward: HashSet<IVec3> = GridWalk::new(a, b).unwrap().collect();
        let backward: HashSet<IVec3> = GridWalk::new(b, a).unwrap().collect();
        assert_eq!(forward, backward, "{a:?} <-> {b:?}");
    }
}

#[test]
fn walk_cells_are_face_connected_and_end_at_target() {
    let points = sample_points(80, 10.0);
    for pair in points.chunks_exact(2) {
        let (a, b) = (pair[0], pair[1]);
        let cells: Vec<IVec3> = GridWalk::new(a, b).unwrap().collect();
        assert_eq!(cells.first().copied(), Some(a.cell().unwrap()));
        assert_eq!(cells.last().copied(), Some(b.cell().unwrap()));
        for step in cells.windows(2) {
            let d = (step[1] - step[0]).abs();
            assert_eq!(d.x + d.y + d.z, 1);
        }
    }
}

#[test]
fn opaque_cell_on_every_path_blocks() {
    // Viewer sealed inside a shell of opaque cells: nothing outside is visible.
    let mut world = solid_world(4);
    world.fill(IVec3::splat(-3), IVec3::splat(3));
    for x in -3..3 {
        for y in -3..3 {
            for z in -3..3 {
                world.clear(IVec3::new(x, y, z));
            }
        }
    }
    let mut culler = OcclusionCuller::new(16, world).unwrap();
    let viewer = Point3::new(0.5, 0.5, 0.5);
    for aabb in probe_grid(5, 4, 6.0) {
        assert!(!culler.is_visible(&aabb, viewer), "{aabb:?}");
    }
    let inside = Aabb::from_bounds(-2.0, -2.0, -2.0, -1.5, -1.5, -1.5);
    assert!(culler.is_visible(&inside, viewer));
}

#[test]
fn repeated_queries_agree_after_reset() {
    let mut world = GridWorld::new();
    world.fill(IVec3::new(-2, -1, 3), IVec3::new(3, 2, 4));
    let mut culler = OcclusionCuller::new(24, world).unwrap();
    let viewer = Point3::new(0.5, 0.5, 0.5);
    let boxes = probe_grid(5, 3, -0.5);

    let first: Vec<bool> = boxes.iter().map(|b| culler.is_visible(b, viewer)).collect();
    let cached: Vec<bool> = boxes.iter().map(|b| culler.is_visible(b, viewer)).collect();
    culler.reset_cache();
    assert_eq!(culler.cache().counts().visible + culler.cache().counts().blocked, 0);
    let fresh: Vec<bool> = boxes.iter().map(|b| culler.is_visible(b, viewer)).collect();

    assert_eq!(first, fresh);
    // Cache hits may only turn answers visible, never hide something.
    for (f, c) in first.iter().zip(&cached) {
        assert!(!f || *c);
    }
}

#[test]
fn shared_culler_behind_a_lock() {
    let culler = Arc::new(Mutex::new(OcclusionCuller::new(16, GridWorld::new()).unwrap()));
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let culler = Arc::clone(&culler);
            thread::spawn(move || {
                let aabb = Aabb::from_bounds(f64::from(i), 1.0, 3.0, f64::from(i) + 1.0, 2.0, 4.0);
                culler.lock().is_visible(&aabb, Point3::new(0.5, 0.5, -2.0))
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
    assert_eq!(culler.lock().stats().queries, 4);
}
