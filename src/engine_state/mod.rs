//! # Engine State Module
//!
//! The frame coordinator of the voxel engine.
//!
//! ## Key Components
//!
//! * `EngineState` - Owns the world and runs one frame at a time
//! * `rendering` - Vertex format, mesher and render backends
//! * `viewer` - Per-frame viewer input supplied by the host
//! * `voxels` - Blocks, chunks, terrain, streaming and raycasting
//!
//! ## Frame Order
//!
//! [`EngineState::frame`] runs, in order:
//!
//! 1. World update (load, unload, bounded meshing)
//! 2. Raycast from the viewer
//! 3. At most one block edit, rate-limited
//! 4. Draw submission for every meshed chunk

use log::debug;

use crate::{
    config::{ConfigError, WorldConfig},
    core::StResource,
};

use rendering::RenderBackend;
use viewer::ViewerInput;
use voxels::{
    block::block_type::BlockType,
    raycast::{EditAction, RaycastHit},
    world::{UpdateReport, World},
};

pub mod rendering;
pub mod viewer;
pub mod voxels;

/// What one frame did.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrameSummary {
    /// Streaming work done this frame.
    pub update: UpdateReport,
    /// Block under the crosshair, before any edit this frame.
    pub target: Option<RaycastHit>,
    /// Edit applied this frame, if any.
    pub edit: Option<EditAction>,
    /// Chunks submitted for drawing.
    pub drawn: usize,
}

/// The main state container for the voxel engine
///
/// Owns the world and the small amount of player state that sits on top of
/// it: the block held for placing and the edit cooldown.
///
/// # Examples
///
/// ```
/// use cgmath::{Point3, Vector3};
/// use voxel_world::{
///     config::WorldConfig,
///     core::StResource,
///     engine_state::{
///         rendering::{share_backend, HeadlessRenderBackend},
///         viewer::ViewerInput,
///         EngineState,
///     },
/// };
///
/// let config = WorldConfig { render_distance: 0, ..WorldConfig::default() };
/// let backend = StResource::new(HeadlessRenderBackend::default());
/// let mut engine = EngineState::new(config, share_backend(&backend)).unwrap();
///
/// let input = ViewerInput::looking(Point3::new(0.0, 100.0, 0.0), Vector3::new(0.0, -1.0, 0.0));
/// let summary = engine.frame(&input);
/// assert_eq!(summary.update.loaded, 1);
/// assert_eq!(summary.drawn, 1);
/// ```
pub struct EngineState {
    /// The voxel world containing all chunk data
    pub world: World,
    held_block: BlockType,
    tick: u64,
    last_edit_tick: Option<u64>,
}

impl EngineState {
    /// Creates an engine around a new world.
    ///
    /// # Arguments
    ///
    /// * `config` - World configuration
    /// * `backend` - Render backend shared with every chunk's buffers
    ///
    /// # Errors
    ///
    /// `ConfigError::Invalid` if `config` describes an unusable world.
    pub fn new(
        config: WorldConfig,
        backend: StResource<dyn RenderBackend>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            world: World::new(config, backend)?,
            held_block: BlockType::GRASS,
            tick: 0,
            last_edit_tick: None,
        })
    }

    /// The block placed by the next place action.
    pub fn held_block(&self) -> BlockType {
        self.held_block
    }

    /// Number of frames run so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Runs one frame.
    ///
    /// # Arguments
    ///
    /// * `input` - Viewer state for this frame
    ///
    /// # Returns
    ///
    /// A summary of the streaming, targeting, editing and drawing done.
    pub fn frame(&mut self, input: &ViewerInput) -> FrameSummary {
        self.tick += 1;
        self.cycle_held_block(input.scroll);

        let update = self.world.update(input.position);
        let target = self.world.cast_view_ray(input.position, input.direction);

        let edit = match target {
            Some(hit) if self.edit_ready() => self.try_edit(&hit, input),
            _ => None,
        };

        let drawn = self.world.render();

        FrameSummary {
            update,
            target,
            edit,
            drawn,
        }
    }

    fn cycle_held_block(&mut self, scroll: i32) {
        // Whole laps are no-ops, so only the remainder is stepped.
        let steps = scroll.rem_euclid(BlockType::PLACEABLE_COUNT);
        for _ in 0..steps {
            self.held_block = self.held_block.next_placeable();
        }
    }

    fn edit_ready(&self) -> bool {
        let cooldown = self.world.config().edit_cooldown_ticks;
        self.last_edit_tick
            .map_or(true, |last| self.tick - last >= cooldown)
    }

    /// Place wins over break when both are held.
    fn try_edit(&mut self, hit: &RaycastHit, input: &ViewerInput) -> Option<EditAction> {
        let action = if input.place {
            EditAction::Place(self.held_block)
        } else if input.break_block {
            EditAction::Break
        } else {
            return None;
        };

        if !self.world.apply_edit(hit, action) {
            return None;
        }
        debug!("Frame {}: applied {:?}", self.tick, action);
        self.last_edit_tick = Some(self.tick);
        Some(action)
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{Point3, Vector3};

    use super::*;
    use crate::{
        config::{DecorationConfig, NoiseConfig},
        engine_state::rendering::{share_backend, HeadlessRenderBackend},
    };

    fn engine() -> EngineState {
        let config = WorldConfig {
            chunk_size: 4,
            chunk_height: 16,
            render_distance: 1,
            chunks_per_frame: 9,
            decoration: DecorationConfig::None,
            noise: NoiseConfig {
                amplitude: 0.0,
                base_height: 8.0,
                ..NoiseConfig::default()
            },
            ..WorldConfig::default()
        };
        let backend = StResource::new(HeadlessRenderBackend::default());
        EngineState::new(config, share_backend(&backend)).unwrap()
    }

    fn looking_down() -> ViewerInput {
        ViewerInput::looking(Point3::new(1.0, 10.0, 1.0), Vector3::new(0.0, -1.0, 0.0))
    }

    #[test]
    fn scroll_cycles_the_held_block() {
        let mut engine = engine();
        let mut input = looking_down();
        input.scroll = 2;
        engine.frame(&input);
        assert_eq!(engine.held_block(), BlockType::SNOW);
        input.scroll = -3;
        engine.frame(&input);
        assert_eq!(engine.held_block(), BlockType::BEDROCK);
    }

    #[test]
    fn extreme_scroll_wraps_without_stepping_every_lap() {
        let mut engine = engine();
        let mut input = looking_down();

        input.scroll = i32::MIN;
        engine.frame(&input);
        assert_eq!(engine.held_block(), BlockType::GRASS);

        input.scroll = i32::MAX;
        engine.frame(&input);
        assert_eq!(engine.held_block(), BlockType::GRASS.previous_placeable());

        input.scroll = -(BlockType::PLACEABLE_COUNT * 1000) + 1;
        engine.frame(&input);
        assert_eq!(engine.held_block(), BlockType::GRASS);
    }

    #[test]
    fn invalid_configs_do_not_build_an_engine() {
        let config = WorldConfig {
            chunks_per_frame: 0,
            ..WorldConfig::default()
        };
        let backend = StResource::new(HeadlessRenderBackend::default());
        let built = EngineState::new(config, share_backend(&backend));
        assert!(matches!(built, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn edits_are_rate_limited() {
        let mut engine = engine();
        let mut input = looking_down();
        input.break_block = true;

        let first = engine.frame(&input);
        assert_eq!(first.edit, Some(EditAction::Break));

        let mut applied = 1;
        for _ in 0..14 {
            if engine.frame(&input).edit.is_some() {
                applied += 1;
            }
        }
        assert_eq!(applied, 1);
        assert_eq!(engine.frame(&input).edit, Some(EditAction::Break));
    }

    #[test]
    fn place_wins_over_break() {
        let mut engine = engine();
        let mut input = looking_down();
        input.place = true;
        input.break_block = true;

        let summary = engine.frame(&input);
        assert_eq!(summary.edit, Some(EditAction::Place(BlockType::GRASS)));
        let placed = summary.target.unwrap().empty.unwrap();
        assert_eq!(engine.world.block_at(placed), Some(BlockType::GRASS));
    }

    #[test]
    fn frames_without_buttons_do_not_edit() {
        let mut engine = engine();
        let summary = engine.frame(&looking_down());
        assert!(summary.target.is_some());
        assert_eq!(summary.edit, None);
        assert_eq!(summary.drawn, 9);
        assert_eq!(engine.tick(), 1);
    }
}
