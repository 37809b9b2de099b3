//! Scene bootstrap and frame driver.
//!
//! [`GameScene`] owns the ECS world, the frame schedule and the asset
//! source. Entities are staged first, loaded asynchronously in
//! [`GameScene::load`], and become live on the first frame. Each
//! [`GameScene::frame`] runs the chained systems:
//!
//! 1. `sweep_disposed_entities`
//! 2. `admit_spawned_entities`
//! 3. `advance_frame_clock`
//! 4. `update_entities`
//! 5. `present_entities`

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::ExecutorKind;
use log::{debug, info};

use crate::entities::arena;
use crate::entities::playertank::PlayerTank;
use crate::entities::{EntityId, GameEntity};
use crate::error::LoadError;
use crate::events::input::InputEvent;
use crate::resources::assetstore::AssetSource;
use crate::resources::camera::FollowCamera;
use crate::resources::frameclock::FrameClock;
use crate::resources::gameconfig::GameConfig;
use crate::resources::presenter::{Presenter, PresenterSlot};
use crate::resources::registry::{EntityRegistry, Spawner};
use crate::resources::worldtime::WorldTime;
use crate::systems::render::present_entities;
use crate::systems::spawn::admit_spawned_entities;
use crate::systems::sweep::sweep_disposed_entities;
use crate::systems::time::advance_frame_clock;
use crate::systems::update::update_entities;

/// The per-frame schedule. Systems run one after another on the calling
/// thread.
pub fn frame_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.set_executor_kind(ExecutorKind::SingleThreaded);
    schedule.add_systems(
        (
            sweep_disposed_entities,
            admit_spawned_entities,
            advance_frame_clock,
            update_entities,
            present_entities,
        )
            .chain(),
    );
    schedule
}

pub struct GameScene {
    world: World,
    schedule: Schedule,
    assets: Box<dyn AssetSource>,
    staged: Vec<Box<dyn GameEntity>>,
}

impl GameScene {
    pub fn new(
        config: GameConfig,
        assets: Box<dyn AssetSource>,
        presenter: impl Presenter + 'static,
    ) -> Self {
        let mut world = World::new();
        world.insert_resource(WorldTime::default().with_time_scale(config.time_scale));
        world.insert_resource(match config.fixed_delta {
            Some(delta) => FrameClock::fixed(delta),
            None => FrameClock::default(),
        });
        world.insert_resource(FollowCamera::new(config.camera_position, config.camera_fov));
        world.insert_resource(EntityRegistry::new());
        world.insert_non_send_resource(PresenterSlot::new(presenter));
        world.insert_resource(config);

        Self {
            world,
            schedule: frame_schedule(),
            assets,
            staged: Vec::new(),
        }
    }

    /// Stage the arena (tiles, then walls) and the player tank.
    pub fn populate(&mut self) {
        let config = self.world.resource::<GameConfig>();
        let mut entities = arena::layout(config.map_size);
        entities.push(Box::new(
            PlayerTank::new(config.player_start_position()).with_tuning(config.player),
        ));
        self.staged.extend(entities);
    }

    /// Queue an unloaded entity for the next [`GameScene::load`].
    pub fn stage(&mut self, entity: Box<dyn GameEntity>) {
        self.staged.push(entity);
    }

    pub fn staged_len(&self) -> usize {
        self.staged.len()
    }

    /// Load the asset source, then every staged entity in staging order,
    /// inserting each into the registry once loaded. The first failure stops
    /// the load; entities staged after it are dropped unloaded.
    pub async fn load(&mut self) -> Result<usize, LoadError> {
        self.assets.load().await?;

        let staged = std::mem::take(&mut self.staged);
        let count = staged.len();
        for mut entity in staged {
            entity.load(self.assets.as_ref()).await?;
            self.world.resource_mut::<EntityRegistry>().insert(entity);
        }
        info!("Loaded {count} entities");
        Ok(count)
    }

    /// Route an input event to the player tank, live or loaded and waiting
    /// for its first frame. A fire trigger spawns a bullet whose id is
    /// returned; it becomes live on the next frame.
    ///
    /// Events arriving while there is no loaded player are dropped.
    pub async fn handle_input(&mut self, event: InputEvent) -> Result<Option<EntityId>, LoadError> {
        let assets = self.assets.as_ref();
        let mut registry = self.world.resource_mut::<EntityRegistry>();
        if let Some((player, spawner)) = registry.player_and_spawner() {
            return route_input(player, spawner, event, assets).await;
        }

        let Some((index, mut entry)) = registry.detach_pending_player() else {
            debug!("input {event:?} dropped: no loaded player");
            return Ok(None);
        };
        let routed = match entry.entity.as_player_mut() {
            Some(player) => route_input(player, registry.spawner(), event, assets).await,
            None => Ok(None),
        };
        registry.reattach_pending(index, entry);
        routed
    }

    /// Run one frame timed by the frame clock.
    pub fn frame(&mut self) {
        self.schedule.run(&mut self.world);
        self.world.clear_trackers();
    }

    /// Run one frame of exactly `dt` unscaled seconds.
    pub fn step(&mut self, dt: f32) {
        let previous = self.world.resource::<FrameClock>().fixed_delta();
        self.world
            .resource_mut::<FrameClock>()
            .set_fixed_delta(Some(dt));
        self.frame();
        self.world
            .resource_mut::<FrameClock>()
            .set_fixed_delta(previous);
    }

    /// Dispose every remaining entity, live or pending.
    pub fn shutdown(&mut self) {
        let (live, pending) = self.world.resource_mut::<EntityRegistry>().drain();
        let disposed = live.len() + pending.len();
        {
            let mut presenter = self.world.non_send_resource_mut::<PresenterSlot>();
            for entry in &live {
                presenter.0.remove(entry.id);
            }
        }
        for mut entry in live.into_iter().chain(pending) {
            entry.entity.dispose();
        }
        info!("Disposed {disposed} entities on shutdown");
    }

    pub fn registry(&self) -> &EntityRegistry {
        self.world.resource::<EntityRegistry>()
    }

    pub fn camera(&self) -> &FollowCamera {
        self.world.resource::<FollowCamera>()
    }

    pub fn world_time(&self) -> &WorldTime {
        self.world.resource::<WorldTime>()
    }

    pub fn config(&self) -> &GameConfig {
        self.world.resource::<GameConfig>()
    }

    /// The player tank, live or pending, if any.
    pub fn player(&self) -> Option<&PlayerTank> {
        let registry = self.registry();
        registry
            .live()
            .chain(registry.pending())
            .find_map(|e| e.entity.as_any().downcast_ref::<PlayerTank>())
    }
}

async fn route_input(
    player: &mut PlayerTank,
    mut spawner: Spawner<'_>,
    event: InputEvent,
    assets: &dyn AssetSource,
) -> Result<Option<EntityId>, LoadError> {
    if !player.apply_input(event) {
        return Ok(None);
    }
    player.fire(&mut spawner, assets).await.map(Some)
}
