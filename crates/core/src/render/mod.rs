//! Renderer agnostic output of a scene traversal.
//!
//! The core never talks to a graphics API. Walking the tree produces a flat
//! [`DrawList`] of state-stack operations and primitives that a backend
//! replays in order.

use serde::{Deserialize, Serialize};

use crate::draw::{Color, Rect, Vec2};
use crate::keys::KeyStore;
use crate::object::{DrawContext, SceneObject};
use crate::resources::ResourceTable;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RenderCommand {
    /// Saves the transform and clip state.
    PushState,
    PopState,
    Translate {
        x: f32,
        y: f32,
    },
    /// Radians, applied x then y then z.
    Rotate {
        x: f32,
        y: f32,
        z: f32,
    },
    Scale {
        x: f32,
        y: f32,
    },
    /// Intersects the clip region with `rect` in the current space.
    Clip {
        rect: Rect,
    },
    FillRect {
        rect: Rect,
        color: Color,
    },
    DrawImage {
        texture: u64,
        /// Normalised texture coordinates.
        src: Rect,
        dst: Rect,
        color: Color,
        blend: i32,
    },
    DrawText {
        font: u64,
        text: String,
        origin: Vec2,
        scale: Vec2,
        color: Color,
    },
    /// Overlay covering the whole virtual screen, used for scene fades.
    FillScreen {
        width: u32,
        height: u32,
        color: Color,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawList {
    commands: Vec<RenderCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.commands)?)
    }
}

/// Draws `obj` and its subtree.
///
/// Per node: push state, move to the pivot, rotate, scale, move back to the
/// drawing origin, optionally clip, fill the background, draw the payload,
/// then the children in order. Children inherit the transform but not the
/// draw state.
pub fn render_object(obj: &SceneObject, keys: &KeyStore, resources: &ResourceTable, out: &mut DrawList) {
    if !obj.is_visible(keys) {
        return;
    }
    let frame = obj.current_frame();
    let size = frame.pos.size();
    let align = frame.align;

    out.push(RenderCommand::PushState);
    out.push(RenderCommand::Translate {
        x: frame.pos.left + size.x * align.x,
        y: frame.pos.top + size.y * align.y,
    });
    if !frame.rotate.is_zero() {
        out.push(RenderCommand::Rotate {
            x: frame.rotate.x,
            y: frame.rotate.y,
            z: frame.rotate.z,
        });
    }
    out.push(RenderCommand::Scale {
        x: frame.scale.x,
        y: frame.scale.y,
    });
    let (x, y) = if obj.xy_as_center() {
        ((0.5 - align.x) * size.x, (0.5 - align.y) * size.y)
    } else {
        (-align.x * size.x, -align.y * size.y)
    };
    out.push(RenderCommand::Translate { x, y });

    let local = obj.local_box();
    if obj.clipping() {
        out.push(RenderCommand::Clip { rect: local });
    }
    let background = obj.background();
    if background.a > 0.0 {
        out.push(RenderCommand::FillRect {
            rect: local,
            color: background,
        });
    }

    if frame.color.a > 0.0 {
        if let Some(behavior) = obj.behavior().as_behavior() {
            let draw = DrawContext {
                frame,
                local,
                hovered: obj.is_hovered(),
                resources,
            };
            behavior.render(&draw, out);
        }
    }

    for child in obj.children() {
        child.with(|c| render_object(c, keys, resources, out));
    }
    out.push(RenderCommand::PopState);
}
