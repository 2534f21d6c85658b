use std::cell::RefCell;
use std::rc::Rc;

use glam::Mat4;

/// World-to-view and projection transforms for one view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub view: Mat4,
    pub projection: Mat4,
}

/// Hooks of the scene renderer that draws into each bound view.
pub trait SceneRenderer {
    /// Called once per rendered frame before any view is drawn.
    fn update_scene(&mut self);

    /// Called once per view with that view's framebuffer bound.
    fn render(&mut self, camera: &Camera);

    fn enable_session(&mut self);

    fn disable_session(&mut self);
}

pub type SharedRenderer = Rc<RefCell<dyn SceneRenderer>>;

/// Renderer used when no remote client is attached; views are only cleared.
#[derive(Debug, Default)]
pub struct NullRenderer;

impl SceneRenderer for NullRenderer {
    fn update_scene(&mut self) {}

    fn render(&mut self, _camera: &Camera) {}

    fn enable_session(&mut self) {}

    fn disable_session(&mut self) {}
}

impl NullRenderer {
    pub fn shared() -> SharedRenderer {
        Rc::new(RefCell::new(NullRenderer))
    }
}
