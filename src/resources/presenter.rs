//! Boundary to the rendering layer.
//!
//! The simulation never draws. It tells a [`Presenter`] when an entity's
//! mesh enters or leaves the scene, and hands it the live meshes and the
//! camera once per frame. Window handling and draw calls belong to the
//! implementation.
//!
//! The presenter lives in the world as a non-send resource
//! ([`PresenterSlot`]), so implementations are free to hold thread-bound
//! graphics handles.

use log::{debug, info, trace, warn};
use rustc_hash::FxHashSet;

use crate::components::mesh::Mesh;
use crate::entities::EntityId;
use crate::resources::camera::FollowCamera;

/// Rendering collaborator.
pub trait Presenter {
    /// An entity became live; its mesh joins the scene.
    fn add(&mut self, id: EntityId, mesh: &Mesh);

    /// An entity is about to be disposed; its mesh leaves the scene.
    fn remove(&mut self, id: EntityId);

    /// Draw the current frame.
    fn render(&mut self, scene: &[(EntityId, &Mesh)], camera: &FollowCamera);
}

/// Non-send world slot holding the active presenter.
pub struct PresenterSlot(pub Box<dyn Presenter>);

impl PresenterSlot {
    pub fn new(presenter: impl Presenter + 'static) -> Self {
        Self(Box::new(presenter))
    }
}

/// Headless presenter that only logs what it would draw.
#[derive(Debug)]
pub struct LogPresenter {
    attached: FxHashSet<EntityId>,
    frames: u64,
    report_every: u64,
}

impl Default for LogPresenter {
    fn default() -> Self {
        Self::new(60)
    }
}

impl LogPresenter {
    /// Log a summary line every `report_every` frames (0 = never).
    pub fn new(report_every: u64) -> Self {
        Self {
            attached: FxHashSet::default(),
            frames: 0,
            report_every,
        }
    }

    pub fn attached(&self) -> usize {
        self.attached.len()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Presenter for LogPresenter {
    fn add(&mut self, id: EntityId, mesh: &Mesh) {
        trace!("add {id} at {:?}", mesh.position());
        self.attached.insert(id);
    }

    fn remove(&mut self, id: EntityId) {
        if !self.attached.remove(&id) {
            warn!("remove {id}: not part of the scene");
        } else {
            debug!("remove {id}");
        }
    }

    fn render(&mut self, scene: &[(EntityId, &Mesh)], camera: &FollowCamera) {
        self.frames += 1;
        if self.report_every > 0 && self.frames % self.report_every == 0 {
            info!(
                "frame {}: {} meshes, camera at ({:.2}, {:.2}, {:.2})",
                self.frames,
                scene.len(),
                camera.position.x,
                camera.position.y,
                camera.position.z
            );
        }
    }
}
