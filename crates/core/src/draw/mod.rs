//! Resolved visual state of a scene object and the tween math on top of it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }
}

/// RGBA colour with nominal [0, 1] channels. Values outside that range are
/// kept as-is; skins use them for over-bright and fade tricks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Builds a colour from 0..=255 channel values.
    pub fn from_rgba8(r: i32, g: i32, b: i32, a: i32) -> Self {
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Parses `#RRGGBB`, `#RRGGBBAA` or a comma separated `r,g,b[,a]` list of
    /// floats.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Some(hex) = text.strip_prefix('#') {
            let channel = |i: usize| {
                hex.get(i..i + 2)
                    .and_then(|c| u8::from_str_radix(c, 16).ok())
                    .map(i32::from)
            };
            return match hex.len() {
                6 => Some(Self::from_rgba8(channel(0)?, channel(2)?, channel(4)?, 255)),
                8 => Some(Self::from_rgba8(
                    channel(0)?,
                    channel(2)?,
                    channel(4)?,
                    channel(6)?,
                )),
                _ => None,
            };
        }

        let parts: Vec<f32> = text
            .split(',')
            .map(|p| p.trim().parse::<f32>())
            .collect::<std::result::Result<_, _>>()
            .ok()?;
        match parts.as_slice() {
            [r, g, b] => Some(Self::new(*r, *g, *b, 1.0)),
            [r, g, b, a] => Some(Self::new(*r, *g, *b, *a)),
            _ => None,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Axis aligned box stored as edges so tweening it stays linear.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_xywh(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::new(x, y, x + w, y + h)
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width(), self.height())
    }

    /// Moves the box so its top-left corner sits at `(x, y)`.
    pub fn move_to(&mut self, x: f32, y: f32) {
        let (w, h) = (self.width(), self.height());
        *self = Self::from_xywh(x, y, w, h);
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.left += dx;
        self.right += dx;
        self.top += dy;
        self.bottom += dy;
    }

    pub fn set_width(&mut self, w: f32) {
        self.right = self.left + w;
    }

    pub fn set_height(&mut self, h: f32) {
        self.bottom = self.top + h;
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }
}

/// Fully resolved visual state of one object at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawProperty {
    pub pos: Rect,
    pub color: Color,
    /// Rotation in radians.
    pub rotate: Vec3,
    pub scale: Vec2,
    /// Pivot as a fraction of the object's own box.
    pub align: Vec2,
}

impl Default for DrawProperty {
    fn default() -> Self {
        Self {
            pos: Rect::default(),
            color: Color::WHITE,
            rotate: Vec3::default(),
            scale: Vec2::new(1.0, 1.0),
            align: Vec2::default(),
        }
    }
}

/// Remapping applied to normalised tween progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EaseType {
    /// Hold the starting state until the next frame is reached.
    None,
    Linear,
    /// Cubic acceleration.
    In,
    /// Cubic deceleration.
    #[default]
    Out,
    InOut,
}

impl EaseType {
    /// Maps the numeric code used by commands (`0` none .. `4` in-out).
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Linear),
            2 => Some(Self::In),
            3 => Some(Self::Out),
            4 => Some(Self::InOut),
            _ => None,
        }
    }

    /// Maps the LR2 `acc` column (0 linear, 1 accelerate, 2 decelerate,
    /// 3 discontinuous).
    pub fn from_lr2_code(code: i32) -> Self {
        match code {
            1 => Self::In,
            2 => Self::Out,
            3 => Self::None,
            _ => Self::Linear,
        }
    }

    /// Applies the easing curve to `r`.
    pub fn apply(self, r: f32) -> f32 {
        match self {
            Self::None => 0.0,
            Self::Linear => r,
            Self::In => r * r * r,
            Self::Out => {
                let inv = 1.0 - r;
                1.0 - inv * inv * inv
            }
            Self::InOut => {
                let t = 2.0 * r - 1.0;
                0.5 + t * t * t / 2.0
            }
        }
    }
}

impl FromStr for EaseType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(code) = s.parse::<i32>() {
            return Self::from_code(code).ok_or(());
        }
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "linear" => Ok(Self::Linear),
            "easein" | "in" => Ok(Self::In),
            "easeout" | "out" => Ok(Self::Out),
            "easeinout" | "inout" => Ok(Self::InOut),
            _ => Err(()),
        }
    }
}

impl fmt::Display for EaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Linear => "linear",
            Self::In => "easein",
            Self::Out => "easeout",
            Self::InOut => "easeinout",
        };
        f.write_str(name)
    }
}

fn lerp(a: f32, b: f32, r: f32) -> f32 {
    a * (1.0 - r) + b * r
}

/// Interpolates every field of `a` and `b` at progress `r` after remapping it
/// with `ease`. Inputs and outputs are not clamped.
pub fn interpolate(a: &DrawProperty, b: &DrawProperty, r: f32, ease: EaseType) -> DrawProperty {
    if ease == EaseType::None {
        return *a;
    }
    let r = ease.apply(r);

    DrawProperty {
        pos: Rect::new(
            lerp(a.pos.left, b.pos.left, r),
            lerp(a.pos.top, b.pos.top, r),
            lerp(a.pos.right, b.pos.right, r),
            lerp(a.pos.bottom, b.pos.bottom, r),
        ),
        color: Color::new(
            lerp(a.color.r, b.color.r, r),
            lerp(a.color.g, b.color.g, r),
            lerp(a.color.b, b.color.b, r),
            lerp(a.color.a, b.color.a, r),
        ),
        rotate: Vec3::new(
            lerp(a.rotate.x, b.rotate.x, r),
            lerp(a.rotate.y, b.rotate.y, r),
            lerp(a.rotate.z, b.rotate.z, r),
        ),
        scale: Vec2::new(lerp(a.scale.x, b.scale.x, r), lerp(a.scale.y, b.scale.y, r)),
        align: Vec2::new(lerp(a.align.x, b.align.x, r), lerp(a.align.y, b.align.y, r)),
    }
}
