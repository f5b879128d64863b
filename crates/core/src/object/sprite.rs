use serde::{Deserialize, Serialize};

use super::kind::{DrawContext, ObjectBehavior};
use crate::command::CommandArgs;
use crate::draw::Rect;
use crate::lr2::Fields;
use crate::render::{DrawList, RenderCommand};
use crate::resources::{ResourceTable, TextureInfo};

/// Sprite-sheet layout: the crop area is split into `divx * divy` cells and
/// `count` of them are cycled through every `cycle_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteSheet {
    pub divx: u32,
    pub divy: u32,
    pub count: u32,
    pub cycle_ms: f32,
}

impl Default for SpriteSheet {
    fn default() -> Self {
        Self {
            divx: 1,
            divy: 1,
            count: 1,
            cycle_ms: 0.0,
        }
    }
}

impl SpriteSheet {
    pub fn new(divx: i32, divy: i32, cycle_ms: f32) -> Self {
        let divx = divx.max(1) as u32;
        let divy = divy.max(1) as u32;
        Self {
            divx,
            divy,
            count: divx.saturating_mul(divy),
            cycle_ms,
        }
    }
}

/// Textured quad with optional sprite-sheet animation.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    image: Option<String>,
    /// Normalised texture coordinates, or pixels when `crop_in_pixels`.
    crop: Rect,
    crop_in_pixels: bool,
    sheet: SpriteSheet,
    time: f32,
    cell: u32,
    blend: i32,
}

impl Default for Sprite {
    fn default() -> Self {
        Self {
            image: None,
            crop: Rect::new(0.0, 0.0, 1.0, 1.0),
            crop_in_pixels: false,
            sheet: SpriteSheet::default(),
            time: 0.0,
            cell: 0,
            blend: 1,
        }
    }
}

impl Sprite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_image(&mut self, name: impl Into<String>) {
        self.image = Some(name.into());
        self.crop = Rect::new(0.0, 0.0, 1.0, 1.0);
        self.crop_in_pixels = false;
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Crop in image pixels.
    pub fn set_image_coord(&mut self, rect: Rect) {
        self.crop = rect;
        self.crop_in_pixels = true;
    }

    /// Crop in normalised texture coordinates.
    pub fn set_texture_coord(&mut self, rect: Rect) {
        self.crop = rect;
        self.crop_in_pixels = false;
    }

    pub fn set_sheet(&mut self, sheet: SpriteSheet) {
        self.sheet = sheet;
        self.cell = self.cell.min(sheet.count.saturating_sub(1));
    }

    pub fn sheet(&self) -> SpriteSheet {
        self.sheet
    }

    pub fn cell(&self) -> u32 {
        self.cell
    }

    pub fn blend(&self) -> i32 {
        self.blend
    }

    /// `(null),image,sx,sy,sw,sh,divx,divy,cycle,timer`
    pub fn load_lr2_src(&mut self, fields: &Fields) {
        self.set_image(format!("image{}", fields.int(1)));
        let (sx, sy, sw, sh) = (fields.int(2), fields.int(3), fields.int(4), fields.int(5));
        if sw > 0 && sh > 0 {
            self.set_image_coord(Rect::from_xywh(sx as f32, sy as f32, sw as f32, sh as f32));
        }
        self.set_sheet(SpriteSheet::new(
            fields.int(6),
            fields.int(7),
            fields.int(8) as f32,
        ));
    }

    /// Normalised source rectangle of sheet cell `cell` on `texture`.
    pub fn cell_src(&self, texture: &TextureInfo, cell: u32) -> Rect {
        let mut crop = self.crop;
        if self.crop_in_pixels {
            let w = (texture.width as f32).max(1.0);
            let h = (texture.height as f32).max(1.0);
            crop = Rect::new(crop.left / w, crop.top / h, crop.right / w, crop.bottom / h);
        }
        if self.sheet.divx > 1 || self.sheet.divy > 1 {
            let w = crop.width() / self.sheet.divx as f32;
            let h = crop.height() / self.sheet.divy as f32;
            let ix = cell % self.sheet.divx;
            let iy = cell / self.sheet.divx % self.sheet.divy;
            let left = crop.left + w * ix as f32;
            let top = crop.top + h * iy as f32;
            crop = Rect::from_xywh(left, top, w, h);
        }
        crop
    }

    pub(crate) fn draw_cell(&self, draw: &DrawContext<'_>, cell: u32, dst: Rect, out: &mut DrawList) {
        let Some(name) = self.image.as_deref() else {
            return;
        };
        let Some(texture) = draw.resources.ready_texture(name) else {
            return;
        };
        out.push(RenderCommand::DrawImage {
            texture: texture.handle,
            src: self.cell_src(texture, cell),
            dst,
            color: draw.frame.color,
            blend: self.blend,
        });
    }
}

impl ObjectBehavior for Sprite {
    fn update(&mut self, delta: f32, _resources: &ResourceTable) {
        if self.sheet.cycle_ms > 0.0 {
            self.time += delta;
            let count = self.sheet.count.max(1);
            self.cell = (self.time * count as f32 / self.sheet.cycle_ms) as u32 % count;
            self.time %= self.sheet.cycle_ms;
        }
    }

    fn render(&self, draw: &DrawContext<'_>, out: &mut DrawList) {
        self.draw_cell(draw, self.cell, draw.local, out);
    }

    fn load_property(&mut self, key: &str, value: &str) -> bool {
        let args = CommandArgs::parse(key, value);
        match key {
            "path" | "src" | "image" => self.set_image(value.trim()),
            "crop" => {
                if let (Ok(x), Ok(y), Ok(w), Ok(h)) =
                    (args.get(0), args.get(1), args.get(2), args.get(3))
                {
                    self.set_image_coord(Rect::from_xywh(x, y, w, h));
                }
            }
            "croptex" => {
                if let (Ok(l), Ok(t), Ok(r), Ok(b)) =
                    (args.get(0), args.get(1), args.get(2), args.get(3))
                {
                    self.set_texture_coord(Rect::new(l, t, r, b));
                }
            }
            "div" => {
                let divx = args.get_or(0, 1).unwrap_or(1);
                let divy = args.get_or(1, 1).unwrap_or(1);
                self.set_sheet(SpriteSheet::new(divx, divy, self.sheet.cycle_ms));
            }
            "cycle" => self.sheet.cycle_ms = args.get_or(0, 0.0).unwrap_or(0.0),
            "blend" => self.blend = args.get_or(0, 1).unwrap_or(1),
            _ => return false,
        }
        true
    }

    /// Selects a sheet cell directly; only meaningful for sheets that do not
    /// animate on their own.
    fn set_number(&mut self, number: f64) {
        if self.sheet.cycle_ms <= 0.0 {
            let last = self.sheet.count.saturating_sub(1) as f64;
            self.cell = number.clamp(0.0, last) as u32;
        }
    }

    fn replay(&mut self) {
        self.time = 0.0;
        self.cell = 0;
    }

    fn set_blend(&mut self, blend: i32) {
        self.blend = blend;
    }

    fn resource_names(&self) -> Vec<&str> {
        self.image.as_deref().into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn huge_divisors_saturate_the_cell_count() {
        let sheet = SpriteSheet::new(i32::MAX, i32::MAX, 100.0);
        assert_eq!(sheet.count, u32::MAX);

        let mut sprite = Sprite::new();
        sprite.load_lr2_src(&Fields::parse("0,1,0,0,0,0,100000,100000,100,0"));
        sprite.update(50.0, &ResourceTable::new());
        assert!(sprite.cell() < sprite.sheet().count);
    }

    fn texture() -> TextureInfo {
        TextureInfo {
            handle: 3,
            width: 200,
            height: 100,
            loaded: true,
        }
    }

    #[test]
    fn sheet_cycles_through_cells() {
        let mut sprite = Sprite::new();
        sprite.set_sheet(SpriteSheet::new(2, 2, 400.0));
        let resources = ResourceTable::new();

        sprite.update(150.0, &resources);
        assert_eq!(sprite.cell(), 1);
        sprite.update(300.0, &resources);
        assert_eq!(sprite.cell(), 0);
    }

    #[test]
    fn pixel_crop_is_normalised_per_cell() {
        let mut sprite = Sprite::new();
        sprite.set_image("image0");
        sprite.set_image_coord(Rect::from_xywh(0.0, 0.0, 200.0, 100.0));
        sprite.set_sheet(SpriteSheet::new(2, 1, 0.0));

        let src = sprite.cell_src(&texture(), 1);
        assert_eq!(src, Rect::new(0.5, 0.0, 1.0, 1.0));
    }

    #[test]
    fn number_selects_a_static_cell() {
        let mut sprite = Sprite::new();
        sprite.set_sheet(SpriteSheet::new(3, 1, 0.0));
        sprite.set_number(7.0);
        assert_eq!(sprite.cell(), 2);
        sprite.set_number(-1.0);
        assert_eq!(sprite.cell(), 0);
    }

    #[test]
    fn loads_the_lr2_source_line() {
        let mut sprite = Sprite::new();
        sprite.load_lr2_src(&Fields::parse("0,2,10,20,30,40,3,1,300,0"));
        assert_eq!(sprite.image(), Some("image2"));
        assert_eq!(sprite.sheet(), SpriteSheet::new(3, 1, 300.0));
        assert!(sprite.load_property("blend", "2"));
        assert_eq!(sprite.blend(), 2);
        assert!(!sprite.load_property("font", "x"));
    }
}
