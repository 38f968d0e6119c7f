/// Integration tests that drive the world through its public surface:
/// terrain generation, meshing, streaming and block edits against the
/// headless render backend.
use cgmath::{Point3, Vector3};

use voxel_world::{
    config::{DecorationConfig, WorldConfig},
    core::StResource,
    engine_state::{
        rendering::{
            meshing::{build_mesh, ChunkNeighbors},
            share_backend, HeadlessRenderBackend,
        },
        voxels::{
            block::{block_side::BlockSide, block_type::BlockType},
            chunk::{Chunk, ChunkDimensions, ChunkState},
            raycast::EditAction,
            world::World,
        },
    },
};

fn small_config(render_distance: i32) -> WorldConfig {
    WorldConfig {
        chunk_size: 8,
        chunk_height: 128,
        render_distance,
        chunks_per_frame: 3,
        ..WorldConfig::default()
    }
}

fn new_world(config: WorldConfig) -> (World, StResource<HeadlessRenderBackend>) {
    let backend = StResource::new(HeadlessRenderBackend::default());
    let world = World::new(config, share_backend(&backend)).unwrap();
    (world, backend)
}

fn settle(world: &mut World, viewer: Point3<f32>) {
    for _ in 0..64 {
        if world.update(viewer).is_idle() {
            return;
        }
    }
    panic!("world never settled around {:?}", viewer);
}

fn raw_blocks(chunk: &Chunk) -> Vec<u8> {
    chunk.blocks().iter().map(|block| block.as_raw()).collect()
}

#[test]
fn identical_worlds_generate_identical_bytes() {
    let viewer = Point3::new(-3.0, 70.0, 11.0);
    let (mut first, _a) = new_world(small_config(1));
    let (mut second, _b) = new_world(small_config(1));
    settle(&mut first, viewer);
    settle(&mut second, viewer);

    let mut positions = first.resident_positions();
    positions.sort_by_key(|p| (p.x, p.z));
    assert_eq!(positions.len(), 9);

    for position in positions {
        let a = first.chunk(position).unwrap();
        let b = second.chunk(position).unwrap();
        assert_eq!(raw_blocks(a), raw_blocks(b), "blocks differ at {:?}", position);

        let (mesh_a, mesh_b) = (a.mesh().unwrap(), b.mesh().unwrap());
        let bytes_a: &[u8] = bytemuck::cast_slice(&mesh_a.vertices);
        let bytes_b: &[u8] = bytemuck::cast_slice(&mesh_b.vertices);
        assert_eq!(bytes_a, bytes_b, "vertices differ at {:?}", position);
        assert_eq!(mesh_a.indices, mesh_b.indices);
    }
}

#[test]
fn reloading_a_chunk_regenerates_the_same_terrain() {
    let (mut world, _backend) = new_world(small_config(0));
    settle(&mut world, Point3::new(4.0, 70.0, 4.0));
    let before = raw_blocks(world.chunk(Point3::new(0, 0, 0)).unwrap());

    settle(&mut world, Point3::new(100.0, 70.0, 4.0));
    assert!(world.chunk(Point3::new(0, 0, 0)).is_none());

    settle(&mut world, Point3::new(4.0, 70.0, 4.0));
    assert_eq!(raw_blocks(world.chunk(Point3::new(0, 0, 0)).unwrap()), before);
}

#[test]
fn resident_chunks_stay_within_the_radius_while_moving() {
    let radius = 2;
    let (mut world, backend) = new_world(small_config(radius));

    for step in 0..80 {
        let viewer = Point3::new(step as f32 * 1.7, 70.0, step as f32 * -0.9);
        world.update(viewer);
        let center = world.viewer_chunk(viewer);

        for position in world.resident_positions() {
            assert!(
                (position.x - center.x).abs() <= radius && (position.z - center.z).abs() <= radius,
                "{:?} resident outside radius of {:?}",
                position,
                center
            );
        }
        assert_eq!(world.resident_count(), 25);
    }

    // Every unloaded chunk that had been meshed gave its buffers back.
    let backend = backend.get();
    let meshed_now = world
        .resident_positions()
        .into_iter()
        .filter(|p| world.chunk(*p).is_some_and(|c| c.has_buffers()))
        .count();
    assert_eq!(backend.live_count(), meshed_now);
}

#[test]
fn a_stationary_viewer_eventually_has_every_chunk_meshed() {
    let (mut world, _backend) = new_world(small_config(2));
    let viewer = Point3::new(0.0, 70.0, 0.0);
    settle(&mut world, viewer);

    assert_eq!(world.queued_len(), 0);
    for dx in -2..=2 {
        for dz in -2..=2 {
            assert_eq!(world.chunk_state(Point3::new(dx, 0, dz)), ChunkState::Meshed);
        }
    }
    assert_eq!(world.render(), 25);
}

#[test]
fn placing_at_the_hit_makes_the_next_ray_stop_there() {
    let config = WorldConfig {
        decoration: DecorationConfig::None,
        ..small_config(1)
    };
    let (mut world, _backend) = new_world(config);
    let column = world.generator().column_height(3, 3, 128);
    let origin = Point3::new(3.0, column as f32 + 2.0, 3.0);
    settle(&mut world, origin);

    let down = Vector3::new(0.0, -1.0, 0.0);
    let hit = world.cast_ray(origin, down, 5.0).expect("surface below viewer");
    let empty = hit.empty.expect("air above the surface");
    let dimensions = world.dimensions();
    assert_eq!(hit.solid.world_position(&dimensions), Point3::new(3, column - 1, 3));
    assert_eq!(empty.world_position(&dimensions), Point3::new(3, column, 3));

    assert!(world.apply_edit(&hit, EditAction::Place(BlockType::WOOD)));
    assert_eq!(world.block_at(empty), Some(BlockType::WOOD));

    let again = world.cast_ray(origin, down, 5.0).unwrap();
    assert_eq!(again.solid, empty);

    assert!(world.apply_edit(&again, EditAction::Break));
    assert_eq!(world.block_at(empty), Some(BlockType::AIR));
    assert_eq!(world.cast_ray(origin, down, 5.0).unwrap().solid, hit.solid);
}

#[test]
fn flat_grass_slab_exposes_tops_bottoms_and_perimeter() {
    let mut chunk = Chunk::empty(Point3::new(0, 0, 0), ChunkDimensions::new(4, 1, 4));
    for x in 0..4 {
        for z in 0..4 {
            assert!(chunk.set_block(x, 0, z, BlockType::GRASS));
        }
    }

    let mesh = build_mesh(&chunk, ChunkNeighbors::none(), 0.5);
    assert_eq!(mesh.quad_count(), 48);
    assert_eq!(mesh.indices.len(), 48 * 6);

    let count = |side: BlockSide| {
        mesh.vertices
            .chunks(4)
            .filter(|quad| quad[0].normal == side.normal())
            .count()
    };
    assert_eq!(count(BlockSide::TOP), 16);
    assert_eq!(count(BlockSide::BOTTOM), 16);
    for side in [BlockSide::FRONT, BlockSide::BACK, BlockSide::LEFT, BlockSide::RIGHT] {
        assert_eq!(count(side), 4, "{:?}", side);
    }
}
