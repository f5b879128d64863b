//! LR2 skin compatibility: positional `#SRC_*` / `#DST_*` lines mapped onto
//! scene objects and animation frames.

use crate::command::parse_number;
use crate::context::EngineContext;
use crate::draw::{Color, DrawProperty, EaseType, Rect, Vec2, Vec3};
use crate::keys::VisibilityFlag;
use crate::object::{Behavior, SceneObject, TextAlign, TextFitting};

/// Comma separated LR2 fields with the loader's lenient number rules:
/// missing or non-numeric fields read as zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    values: Vec<String>,
}

impl Fields {
    pub fn parse(line: &str) -> Self {
        Self {
            values: line.split(',').map(|v| v.trim().to_string()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn int(&self, index: usize) -> i32 {
        self.values
            .get(index)
            .and_then(|v| parse_number(v).ok())
            .map(|v| v as i32)
            .unwrap_or(0)
    }

    pub fn text(&self, index: usize) -> &str {
        self.values.get(index).map(String::as_str).unwrap_or("")
    }
}

/// Pivot for an LR2 centre code, laid out like a numeric keypad. `0` is the
/// centre as well.
pub fn center_align(code: i32) -> Option<Vec2> {
    let (x, y) = match code {
        0 | 5 => (0.5, 0.5),
        1 => (0.0, 1.0),
        2 => (0.5, 1.0),
        3 => (1.0, 1.0),
        4 => (0.0, 0.5),
        6 => (1.0, 0.5),
        7 => (0.0, 0.0),
        8 => (0.5, 0.0),
        9 => (1.0, 0.0),
        _ => return None,
    };
    Some(Vec2::new(x, y))
}

/// Field layout of a `#DST_*` line.
mod dst {
    pub const TIME: usize = 1;
    pub const X: usize = 2;
    pub const Y: usize = 3;
    pub const W: usize = 4;
    pub const H: usize = 5;
    pub const ACC: usize = 6;
    pub const A: usize = 7;
    pub const R: usize = 8;
    pub const G: usize = 9;
    pub const B: usize = 10;
    pub const BLEND: usize = 11;
    pub const ANGLE: usize = 13;
    pub const CENTER: usize = 14;
    pub const LOOP: usize = 15;
    pub const TIMER: usize = 16;
    pub const OP1: usize = 17;
}

/// The draw state described by one `#DST_*` line.
pub fn draw_property(fields: &Fields) -> DrawProperty {
    let pos = Rect::from_xywh(
        fields.int(dst::X) as f32,
        fields.int(dst::Y) as f32,
        fields.int(dst::W) as f32,
        fields.int(dst::H) as f32,
    );
    DrawProperty {
        pos,
        color: Color::from_rgba8(
            fields.int(dst::R),
            fields.int(dst::G),
            fields.int(dst::B),
            fields.int(dst::A),
        ),
        rotate: Vec3::new(0.0, 0.0, (fields.int(dst::ANGLE) as f32).to_radians()),
        scale: Vec2::new(1.0, 1.0),
        align: center_align(fields.int(dst::CENTER)).unwrap_or(Vec2::new(0.5, 0.5)),
    }
}

/// Appends the keyframe of one `#DST_*` line to the object's open animation.
///
/// The first line of an object also carries its loop start, its timer and
/// option visibility flags. An object whose first line starts later than
/// zero stays invisible in place until then.
pub fn add_frame_by_lr2_command(obj: &mut SceneObject, fields: &Fields, _ctx: &EngineContext) {
    let fresh = obj.animations().is_empty();
    let first = obj
        .animations()
        .back()
        .map_or(true, |ani| ani.frames().is_empty());

    let prop = draw_property(fields);
    let time = fields.int(dst::TIME) as f32;
    let ease = EaseType::from_lr2_code(fields.int(dst::ACC));
    let ani = obj.open_animation();
    ani.add_frame(prop, time, ease);
    if first && time > 0.0 {
        ani.hold_until_first_frame();
    }

    let loop_start = fields.int(dst::LOOP);
    if loop_start > 0 {
        ani.set_loop(loop_start as f32);
    }

    if fresh && time > 0.0 {
        obj.set_current_frame(DrawProperty {
            color: Color {
                a: 0.0,
                ..prop.color
            },
            ..prop
        });
    }

    if first {
        obj.set_visibility_flag(0, VisibilityFlag::from_lr2_timer(fields.int(dst::TIMER)));
        for i in 0..3 {
            obj.set_visibility_flag(i + 1, VisibilityFlag::from_lr2_op(fields.int(dst::OP1 + i)));
        }
        obj.set_blend(fields.int(dst::BLEND));
    }
}

/// Applies a `#SRC_*` line to an object according to its kind.
pub fn load_src(obj: &mut SceneObject, fields: &Fields, ctx: &mut EngineContext) {
    match obj.behavior_mut() {
        Behavior::Sprite(sprite) => sprite.load_lr2_src(fields),
        Behavior::Button(sprite) => {
            sprite.load_lr2_src(fields);
            let sheet = sprite.sheet();
            sprite.set_sheet(crate::object::SpriteSheet {
                cycle_ms: 0.0,
                ..sheet
            });
            load_button_src(obj, fields, ctx);
        }
        Behavior::OnMouse(onmouse) => {
            onmouse.load_lr2_src(fields);
            add_panel_commands(obj, fields.int(10), ctx);
        }
        Behavior::Text(text) => {
            text.set_font(format!("font{}", fields.int(1)));
            text.set_align(TextAlign::from_lr2_code(fields.int(3)));
            text.set_fitting(TextFitting::MaxSize);
            let slot = fields.int(2);
            obj.set_resource_key(format!("S{slot}"));
            obj.add_command(format!("Text{slot}"), "refresh", ctx);
            obj.refresh(ctx);
        }
        Behavior::Number(number) => {
            let slot = number.load_lr2_src(fields);
            obj.set_resource_key(format!("N{slot}"));
            obj.add_command(format!("Number{slot}"), "refresh", ctx);
            obj.refresh(ctx);
        }
        Behavior::Object => {
            tracing::debug!(object = obj.name(), "source line on a plain object ignored");
        }
    }
}

/// `(null),image,sx,sy,sw,sh,divx,divy,cycle,timer,type,click,panel,plusonly`
fn load_button_src(obj: &mut SceneObject, fields: &Fields, ctx: &mut EngineContext) {
    obj.set_focusable(fields.int(11) != 0);
    add_panel_commands(obj, fields.int(12), ctx);

    let button = fields.int(10);
    let reverse = if fields.int(13) == -1 { "R" } else { "" };
    obj.add_command("Click", format!("sendevent:Click{button}{reverse}"), ctx);
    obj.set_resource_key(format!("button{button}"));
    obj.add_command(format!("Number{}", button + 1000), "refresh", ctx);
}

/// Opening panel `panel` makes the object clickable, closing it disables it.
fn add_panel_commands(obj: &mut SceneObject, panel: i32, ctx: &mut EngineContext) {
    if panel < 0 && panel != -1 {
        return;
    }
    let panel = panel.max(0);
    obj.add_command(format!("Panel{panel}"), "focusable:1", ctx);
    obj.add_command(format!("Panel{panel}Off"), "focusable:0", ctx);
}
