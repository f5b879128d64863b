use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::kind::{DrawContext, ObjectBehavior};
use crate::draw::{Rect, Vec2};
use crate::render::{DrawList, RenderCommand};
use crate::resources::ResourceTable;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn from_lr2_code(code: i32) -> Self {
        match code {
            1 => Self::Center,
            2 => Self::Right,
            _ => Self::Left,
        }
    }
}

impl FromStr for TextAlign {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "0" => Ok(Self::Left),
            "center" | "1" => Ok(Self::Center),
            "right" | "2" => Ok(Self::Right),
            _ => Err(()),
        }
    }
}

/// How text is squeezed into the object's box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextFitting {
    #[default]
    None,
    /// Shrink horizontally when wider than the box, never enlarge.
    MaxSize,
    /// Scale to fill the box exactly.
    Stretch,
}

impl FromStr for TextFitting {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "0" => Ok(Self::None),
            "maxsize" | "1" => Ok(Self::MaxSize),
            "stretch" | "2" => Ok(Self::Stretch),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Text {
    font: Option<String>,
    text: String,
    align: TextAlign,
    fitting: TextFitting,
    /// Unscaled text size, `None` until the font has been measured.
    measured: Option<Vec2>,
}

impl Text {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_font(&mut self, name: impl Into<String>) {
        self.font = Some(name.into());
        self.measured = None;
    }

    pub fn font(&self) -> Option<&str> {
        self.font.as_deref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_align(&mut self, align: TextAlign) {
        self.align = align;
    }

    pub fn align(&self) -> TextAlign {
        self.align
    }

    pub fn set_fitting(&mut self, fitting: TextFitting) {
        self.fitting = fitting;
    }

    pub fn measured(&self) -> Option<Vec2> {
        self.measured
    }

    /// Top-left origin and scale of the text inside `bounds`.
    pub fn layout(&self, bounds: Rect, size: Vec2) -> (Vec2, Vec2) {
        let (w, h) = (bounds.width(), bounds.height());
        let sx = match self.fitting {
            TextFitting::MaxSize if w > 0.0 && size.x > w => w / size.x,
            TextFitting::Stretch if w > 0.0 && size.x > 0.0 => w / size.x,
            _ => 1.0,
        };
        let sy = match self.fitting {
            TextFitting::Stretch if h > 0.0 && size.y > 0.0 => h / size.y,
            _ => 1.0,
        };
        let drawn = size.x * sx;
        let x = match self.align {
            TextAlign::Left => bounds.left,
            TextAlign::Center => bounds.left + (w - drawn) / 2.0,
            TextAlign::Right => bounds.right - drawn,
        };
        (Vec2::new(x, bounds.top), Vec2::new(sx, sy))
    }
}

impl ObjectBehavior for Text {
    fn update(&mut self, _delta: f32, resources: &ResourceTable) {
        if self.measured.is_some() {
            return;
        }
        let Some(font) = self.font.as_deref().and_then(|f| resources.ready_font(f)) else {
            return;
        };
        self.measured = Some(Vec2::new(font.text_width(&self.text), font.height));
    }

    fn render(&self, draw: &DrawContext<'_>, out: &mut DrawList) {
        if self.text.is_empty() {
            return;
        }
        let (Some(size), Some(font)) = (
            self.measured,
            self.font.as_deref().and_then(|f| draw.resources.ready_font(f)),
        ) else {
            return;
        };
        let (origin, scale) = self.layout(draw.local, size);
        out.push(RenderCommand::DrawText {
            font: font.handle,
            text: self.text.clone(),
            origin,
            scale,
            color: draw.frame.color,
        });
    }

    fn load_property(&mut self, key: &str, value: &str) -> bool {
        match key {
            "font" => self.set_font(value.trim()),
            "text" => self.set_text(value),
            "align" => self.align = value.parse().unwrap_or_default(),
            "fitting" => self.fitting = value.parse().unwrap_or_default(),
            _ => return false,
        }
        true
    }

    fn set_text(&mut self, text: &str) {
        if self.text != text {
            self.text = text.to_string();
            self.measured = None;
        }
    }

    fn resource_names(&self) -> Vec<&str> {
        self.font.as_deref().into_iter().collect()
    }
}
