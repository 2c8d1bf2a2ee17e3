//! Immediate-mode sprite list built by layers each frame, and the system that
//! mirrors it onto Bevy UI image nodes.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::core::GameConfig;

/// One textured quad in window pixels (origin top-left).
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    /// Texture name under `UI/`, without extension.
    pub texture: String,
    pub rect: Rect,
    pub color: Color,
}

/// Sprites to show this frame, back to front.
#[derive(Resource, Debug, Clone, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn push(&mut self, texture: impl Into<String>, rect: Rect) {
        self.push_tinted(texture, rect, Color::WHITE);
    }

    pub fn push_tinted(&mut self, texture: impl Into<String>, rect: Rect, color: Color) {
        self.commands.push(DrawCommand {
            texture: texture.into(),
            rect,
            color,
        });
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

/// Lazily loaded UI textures, keyed by name.
#[derive(Resource, Default)]
pub struct UiTextures {
    handles: HashMap<String, Handle<Image>>,
}

impl UiTextures {
    pub fn get_or_load(&mut self, name: &str, asset_server: &AssetServer) -> Handle<Image> {
        self.handles
            .entry(name.to_string())
            .or_insert_with(|| asset_server.load(format!("UI/{name}.png")))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

/// Pooled image node showing the draw command at this index.
#[derive(Component)]
pub struct LayerSprite(pub usize);

/// Sync the pooled sprite entities with this frame's [`DrawList`].
pub fn present_draw_list(
    mut commands: Commands,
    draw_list: Res<DrawList>,
    asset_server: Res<AssetServer>,
    mut textures: ResMut<UiTextures>,
    mut sprites: Query<(&LayerSprite, &mut Node, &mut ImageNode, &mut Visibility)>,
) {
    let draws = draw_list.commands();
    let mut seen = vec![false; draws.len()];

    for (sprite, mut node, mut image, mut visibility) in sprites.iter_mut() {
        let Some(draw) = draws.get(sprite.0) else {
            *visibility = Visibility::Hidden;
            continue;
        };
        seen[sprite.0] = true;

        let handle = textures.get_or_load(&draw.texture, &asset_server);
        if image.image != handle {
            image.image = handle;
        }
        image.color = draw.color;
        *node = sprite_node(draw.rect);
        *visibility = Visibility::Inherited;
    }

    for (index, draw) in draws.iter().enumerate() {
        if seen[index] {
            continue;
        }
        let mut image = ImageNode::new(textures.get_or_load(&draw.texture, &asset_server));
        image.color = draw.color;
        commands.spawn((
            LayerSprite(index),
            sprite_node(draw.rect),
            image,
            GlobalZIndex(index as i32),
            Visibility::Inherited,
        ));
    }
}

fn sprite_node(rect: Rect) -> Node {
    Node {
        position_type: PositionType::Absolute,
        left: Val::Px(rect.min.x),
        top: Val::Px(rect.min.y),
        width: Val::Px(rect.width()),
        height: Val::Px(rect.height()),
        ..default()
    }
}

/// Screen-space rect from fractions of the configured resolution.
pub fn screen_rect(config: &GameConfig, x: f32, y: f32, width: f32, height: f32) -> Rect {
    let (w, h) = config.resolution;
    Rect::new(x * w, y * h, (x + width) * w, (y + height) * h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_list_order() {
        let mut frame = DrawList::default();
        frame.push("back", Rect::new(0.0, 0.0, 10.0, 10.0));
        frame.push_tinted("front", Rect::new(2.0, 2.0, 4.0, 4.0), Color::BLACK);

        let names: Vec<_> = frame.commands().iter().map(|c| c.texture.as_str()).collect();
        assert_eq!(names, vec!["back", "front"]);
        assert_eq!(frame.commands()[1].color, Color::BLACK);

        frame.clear();
        assert!(frame.commands().is_empty());
    }

    #[test]
    fn test_screen_rect() {
        let config = GameConfig {
            resolution: (1000.0, 500.0),
            ..default()
        };
        let rect = screen_rect(&config, 0.9, 0.92, 0.05, 0.08);
        assert!((rect.min.x - 900.0).abs() < 1e-3);
        assert!((rect.min.y - 460.0).abs() < 1e-3);
        assert!((rect.width() - 50.0).abs() < 1e-3);
        assert!((rect.height() - 40.0).abs() < 1e-3);
    }
}
