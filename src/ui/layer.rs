//! The layer stack: ordered UI and gameplay layers.
//!
//! Regular layers sit below overlays. Ticking and drawing walk the stack
//! bottom-up; events walk it top-down so overlays (pause menu, welcome
//! screen) see input before gameplay does.

use bevy::prelude::*;

use super::draw::DrawList;
use crate::core::GameEvent;

/// An independently ticked and drawn unit of UI or gameplay logic.
///
/// The owning world is passed in explicitly. While a layer runs, the
/// [`LayerStack`] itself is taken out of the world; use [`LayerCommands`]
/// to push or pop layers.
pub trait Layer: Send + Sync + 'static {
    fn name(&self) -> &str;

    fn on_attach(&mut self, _world: &mut World) {}

    fn on_detach(&mut self, _world: &mut World) {}

    fn tick(&mut self, _world: &mut World) {}

    fn draw(&self, _frame: &mut DrawList) {}

    fn on_event(&mut self, _event: &mut GameEvent, _world: &mut World) {}
}

/// Owns every active layer.
#[derive(Resource, Default)]
pub struct LayerStack {
    layers: Vec<Box<dyn Layer>>,
    /// Index of the first overlay.
    insert_index: usize,
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a regular layer just below the overlays.
    pub fn push_layer(&mut self, layer: Box<dyn Layer>) {
        self.layers.insert(self.insert_index, layer);
        self.insert_index += 1;
    }

    /// Add an overlay on top of everything.
    pub fn push_overlay(&mut self, overlay: Box<dyn Layer>) {
        self.layers.push(overlay);
    }

    /// Remove the regular layer named `name`.
    pub fn pop_layer(&mut self, name: &str) -> Option<Box<dyn Layer>> {
        let index = self.layers[..self.insert_index]
            .iter()
            .position(|layer| layer.name() == name)?;
        self.insert_index -= 1;
        Some(self.layers.remove(index))
    }

    /// Remove the topmost overlay named `name`.
    pub fn pop_overlay(&mut self, name: &str) -> Option<Box<dyn Layer>> {
        let offset = self.layers[self.insert_index..]
            .iter()
            .rposition(|layer| layer.name() == name)?;
        Some(self.layers.remove(self.insert_index + offset))
    }

    /// Offer `event` to layers top-down, stopping once one handles it.
    pub fn dispatch(&mut self, event: &mut GameEvent, world: &mut World) {
        for layer in self.layers.iter_mut().rev() {
            if event.is_handled() {
                break;
            }
            layer.on_event(event, world);
        }
    }

    pub fn tick(&mut self, world: &mut World) {
        for layer in self.layers.iter_mut() {
            layer.tick(world);
        }
    }

    pub fn draw(&self, frame: &mut DrawList) {
        for layer in &self.layers {
            layer.draw(frame);
        }
    }

    /// Layer names bottom-up.
    pub fn names(&self) -> Vec<&str> {
        self.layers.iter().map(|layer| layer.name()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.layers.iter().any(|layer| layer.name() == name)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn overlay_count(&self) -> usize {
        self.layers.len() - self.insert_index
    }
}

/// A structural change to the stack, applied between passes.
pub enum LayerCommand {
    PushLayer(Box<dyn Layer>),
    PushOverlay(Box<dyn Layer>),
    PopLayer(String),
    PopOverlay(String),
}

/// Queue of stack changes requested by layers, systems and deferred tasks.
#[derive(Resource, Default)]
pub struct LayerCommands(Vec<LayerCommand>);

impl LayerCommands {
    pub fn push_layer(&mut self, layer: impl Layer) {
        self.0.push(LayerCommand::PushLayer(Box::new(layer)));
    }

    pub fn push_overlay(&mut self, overlay: impl Layer) {
        self.0.push(LayerCommand::PushOverlay(Box::new(overlay)));
    }

    pub fn pop_layer(&mut self, name: impl Into<String>) {
        self.0.push(LayerCommand::PopLayer(name.into()));
    }

    pub fn pop_overlay(&mut self, name: impl Into<String>) {
        self.0.push(LayerCommand::PopOverlay(name.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Apply queued [`LayerCommands`], including any queued by attach/detach hooks.
pub fn apply_layer_commands(world: &mut World) {
    loop {
        let commands = std::mem::take(&mut world.resource_mut::<LayerCommands>().0);
        if commands.is_empty() {
            break;
        }

        world.resource_scope(|world, mut stack: Mut<LayerStack>| {
            for command in commands {
                match command {
                    LayerCommand::PushLayer(mut layer) => {
                        debug!("Pushing layer '{}'", layer.name());
                        layer.on_attach(world);
                        stack.push_layer(layer);
                    }
                    LayerCommand::PushOverlay(mut overlay) => {
                        debug!("Pushing overlay '{}'", overlay.name());
                        overlay.on_attach(world);
                        stack.push_overlay(overlay);
                    }
                    LayerCommand::PopLayer(name) => match stack.pop_layer(&name) {
                        Some(mut layer) => layer.on_detach(world),
                        None => warn!("No layer named '{}' to pop", name),
                    },
                    LayerCommand::PopOverlay(name) => match stack.pop_overlay(&name) {
                        Some(mut overlay) => overlay.on_detach(world),
                        None => warn!("No overlay named '{}' to pop", name),
                    },
                }
            }
        });
    }
}
