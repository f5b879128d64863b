use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::number::Number;
use super::onmouse::OnMouse;
use super::sprite::Sprite;
use super::text::Text;
use crate::draw::{DrawProperty, Rect};
use crate::render::DrawList;
use crate::resources::ResourceTable;
use crate::RhythmusError;

/// Closed set of object types the factory can build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    #[default]
    Object,
    Sprite,
    Text,
    Number,
    Button,
    OnMouse,
}

impl FromStr for ObjectKind {
    type Err = RhythmusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "object" | "" => Ok(Self::Object),
            "sprite" | "image" => Ok(Self::Sprite),
            "text" => Ok(Self::Text),
            "number" => Ok(Self::Number),
            "button" => Ok(Self::Button),
            "onmouse" => Ok(Self::OnMouse),
            other => Err(RhythmusError::msg(format!("unknown object kind `{other}`"))),
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Object => "object",
            Self::Sprite => "sprite",
            Self::Text => "text",
            Self::Number => "number",
            Self::Button => "button",
            Self::OnMouse => "onmouse",
        };
        f.write_str(name)
    }
}

/// What a payload sees while drawing itself.
pub struct DrawContext<'a> {
    /// The node's resolved state for this frame.
    pub frame: &'a DrawProperty,
    /// The node's own box in its local, already transformed, space.
    pub local: Rect,
    pub hovered: bool,
    pub resources: &'a ResourceTable,
}

/// Per-kind capabilities. Everything defaults to a no-op so payloads only
/// implement what they react to.
pub trait ObjectBehavior {
    fn update(&mut self, _delta: f32, _resources: &ResourceTable) {}

    fn render(&self, draw: &DrawContext<'_>, out: &mut DrawList);

    /// Returns whether the key was consumed.
    fn load_property(&mut self, _key: &str, _value: &str) -> bool {
        false
    }

    fn set_text(&mut self, _text: &str) {}

    fn set_number(&mut self, _number: f64) {}

    fn replay(&mut self) {}

    fn set_blend(&mut self, _blend: i32) {}

    /// Names of resources this payload draws with.
    fn resource_names(&self) -> Vec<&str> {
        Vec::new()
    }
}

/// Kind specific payload of a [`super::SceneObject`].
#[derive(Debug, Clone, PartialEq)]
pub enum Behavior {
    Object,
    Sprite(Sprite),
    Text(Text),
    Number(Number),
    /// A focusable sprite that reacts to clicks.
    Button(Sprite),
    OnMouse(OnMouse),
}

impl Behavior {
    pub fn new(kind: ObjectKind) -> Self {
        match kind {
            ObjectKind::Object => Self::Object,
            ObjectKind::Sprite => Self::Sprite(Sprite::new()),
            ObjectKind::Text => Self::Text(Text::new()),
            ObjectKind::Number => Self::Number(Number::new()),
            ObjectKind::Button => Self::Button(Sprite::new()),
            ObjectKind::OnMouse => Self::OnMouse(OnMouse::new()),
        }
    }

    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Object => ObjectKind::Object,
            Self::Sprite(_) => ObjectKind::Sprite,
            Self::Text(_) => ObjectKind::Text,
            Self::Number(_) => ObjectKind::Number,
            Self::Button(_) => ObjectKind::Button,
            Self::OnMouse(_) => ObjectKind::OnMouse,
        }
    }

    pub fn as_behavior(&self) -> Option<&dyn ObjectBehavior> {
        match self {
            Self::Object => None,
            Self::Sprite(s) | Self::Button(s) => Some(s),
            Self::Text(t) => Some(t),
            Self::Number(n) => Some(n),
            Self::OnMouse(m) => Some(m),
        }
    }

    pub fn as_behavior_mut(&mut self) -> Option<&mut dyn ObjectBehavior> {
        match self {
            Self::Object => None,
            Self::Sprite(s) | Self::Button(s) => Some(s),
            Self::Text(t) => Some(t),
            Self::Number(n) => Some(n),
            Self::OnMouse(m) => Some(m),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_builds_matching_payloads() {
        for kind in [
            ObjectKind::Object,
            ObjectKind::Sprite,
            ObjectKind::Text,
            ObjectKind::Number,
            ObjectKind::Button,
            ObjectKind::OnMouse,
        ] {
            assert_eq!(Behavior::new(kind).kind(), kind);
            assert_eq!(kind.to_string().parse::<ObjectKind>().unwrap(), kind);
        }
        assert!(Behavior::new(ObjectKind::Object).as_behavior().is_none());
        assert!("slider".parse::<ObjectKind>().is_err());
    }
}
