use super::kind::{DrawContext, ObjectBehavior};
use super::sprite::Sprite;
use crate::command::CommandArgs;
use crate::draw::Rect;
use crate::lr2::Fields;
use crate::render::DrawList;
use crate::resources::ResourceTable;

/// Sprite that is only drawn while the pointer is over its hover area.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OnMouse {
    sprite: Sprite,
    /// Hover area relative to the object's top-left corner; an empty rect
    /// means the object's own box.
    hover_rect: Rect,
}

impl OnMouse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hover_rect(&self) -> Rect {
        self.hover_rect
    }

    /// `(null),image,sx,sy,sw,sh,divx,divy,cycle,timer,panel,x2,y2,w2,h2`
    pub fn load_lr2_src(&mut self, fields: &Fields) {
        self.sprite.load_lr2_src(fields);
        self.hover_rect = Rect::from_xywh(
            fields.int(11) as f32,
            fields.int(12) as f32,
            fields.int(13) as f32,
            fields.int(14) as f32,
        );
    }

    /// Whether `(x, y)`, relative to the object's top-left corner, hits the
    /// hover area of an object `size` wide.
    pub fn hit(&self, x: f32, y: f32, size: (f32, f32)) -> bool {
        if self.hover_rect.width() <= 0.0 || self.hover_rect.height() <= 0.0 {
            return x >= 0.0 && y >= 0.0 && x <= size.0 && y <= size.1;
        }
        self.hover_rect.contains(x, y)
    }
}

impl ObjectBehavior for OnMouse {
    fn update(&mut self, delta: f32, resources: &ResourceTable) {
        self.sprite.update(delta, resources);
    }

    fn render(&self, draw: &DrawContext<'_>, out: &mut DrawList) {
        if draw.hovered {
            self.sprite.render(draw, out);
        }
    }

    fn load_property(&mut self, key: &str, value: &str) -> bool {
        if key == "hover" {
            let args = CommandArgs::parse(key, value);
            if let (Ok(x), Ok(y), Ok(w), Ok(h)) = (args.get(0), args.get(1), args.get(2), args.get(3)) {
                self.hover_rect = Rect::from_xywh(x, y, w, h);
            }
            return true;
        }
        self.sprite.load_property(key, value)
    }

    fn replay(&mut self) {
        self.sprite.replay();
    }

    fn set_blend(&mut self, blend: i32) {
        self.sprite.set_blend(blend);
    }

    fn resource_names(&self) -> Vec<&str> {
        self.sprite.resource_names()
    }
}
