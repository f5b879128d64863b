use std::collections::HashMap;

use super::{CommandArgs, CommandFn};
use crate::context::EngineContext;
use crate::draw::{Color, Rect, Vec2, Vec3};
use crate::lr2;
use crate::object::SceneObject;
use crate::{Result, RhythmusError};

pub(super) fn build_table() -> HashMap<&'static str, CommandFn> {
    let mut table: HashMap<&'static str, CommandFn> = HashMap::new();

    // geometry
    table.insert("x", set_x);
    table.insert("y", set_y);
    table.insert("w", set_w);
    table.insert("h", set_h);
    table.insert("pos", set_pos);
    table.insert("size", set_size);
    table.insert("move", move_pos);
    table.insert("rect", set_rect);

    // appearance
    table.insert("opacity", set_opacity);
    table.insert("alpha", set_opacity);
    table.insert("color", set_color);
    table.insert("rgb", set_color);
    table.insert("scale", set_scale);
    table.insert("rotate", set_rotate);
    table.insert("rotatez", set_rotate_z);
    table.insert("align", set_align);
    table.insert("center", set_center);

    // tween timing
    table.insert("acc", set_ease);
    table.insert("ease", set_ease);
    table.insert("time", add_time);
    table.insert("delta", add_delta);
    table.insert("sleep", add_delta);
    table.insert("loop", set_loop);
    table.insert("repeat", set_repeat);
    table.insert("next", next_batch);
    table.insert("stop", stop);
    table.insert("hurry", hurry);
    table.insert("replay", replay);
    table.insert("pause", pause);
    table.insert("resume", resume);
    table.insert("finish", set_finish);

    // object state
    table.insert("show", show);
    table.insert("hide", hide);
    table.insert("focusable", set_focusable);
    table.insert("clip", set_clip);
    table.insert("background", set_background);
    table.insert("zindex", set_zindex);
    table.insert("sendevent", send_event);

    // kind specific
    table.insert("text", set_text);
    table.insert("number", set_number);
    table.insert("refresh", refresh);
    table.insert("blend", set_blend);

    table
}

fn set_x(obj: &mut SceneObject, args: &CommandArgs, ctx: &mut EngineContext) -> Result<()> {
    let x: f32 = args.get(0)?;
    let pos = &mut obj.destination_mut(ctx).pos;
    let top = pos.top;
    pos.move_to(x, top);
    Ok(())
}

fn set_y(obj: &mut SceneObject, args: &CommandArgs, ctx: &mut EngineContext) -> Result<()> {
    let y: f32 = args.get(0)?;
    let pos = &mut obj.destination_mut(ctx).pos;
    let left = pos.left;
    pos.move_to(left, y);
    Ok(())
}

fn set_w(obj: &mut SceneObject, args: &CommandArgs, ctx: &mut EngineContext) -> Result<()> {
    let w: f32 = args.get(0)?;
    obj.destination_mut(ctx).pos.set_width(w);
    Ok(())
}

fn set_h(obj: &mut SceneObject, args: &CommandArgs, ctx: &mut EngineContext) -> Result<()> {
    let h: f32 = args.get(0)?;
    obj.destination_mut(ctx).pos.set_height(h);
    Ok(())
}

fn set_pos(obj: &mut SceneObject, args: &CommandArgs, ctx: &mut EngineContext) -> Result<()> {
    let (x, y): (f32, f32) = (args.get(0)?, args.get(1)?);
    obj.destination_mut(ctx).pos.move_to(x, y);
    Ok(())
}

fn set_size(obj: &mut SceneObject, args: &CommandArgs, ctx: &mut EngineContext) -> Result<()> {
    let (w, h): (f32, f32) = (args.get(0)?, args.get(1)?);
    let pos = &mut obj.destination_mut(ctx).pos;
    pos.set_width(w);
    pos.set_height(h);
    Ok(())
}

fn move_pos(obj: &mut SceneObject, args: &CommandArgs, ctx: &mut EngineContext) -> Result<()> {
    let (dx, dy): (f32, f32) = (args.get(0)?, args.get_or(1, 0.0)?);
    obj.destination_mut(ctx).pos.translate(dx, dy);
    Ok(())
}

fn set_rect(obj: &mut SceneObject, args: &CommandArgs, ctx: &mut EngineContext) -> Result<()> {
    let rect = Rect::from_xywh(args.get(0)?, args.get(1)?, args.get(2)?, args.get(3)?);
    obj.destination_mut(ctx).pos = rect;
    Ok(())
}

fn set_opacity(obj: &mut SceneObject, args: &CommandArgs, ctx: &mut EngineContext) -> Result<()> {
    let a: f32 = args.get(0)?;
    obj.destination_mut(ctx).color.a = a;
    Ok(())
}

fn set_color(obj: &mut SceneObject, args: &CommandArgs, ctx: &mut EngineContext) -> Result<()> {
    let (r, g, b): (f32, f32, f32) = (args.get(0)?, args.get(1)?, args.get(2)?);
    let color = &mut obj.destination_mut(ctx).color;
    let a = args.get_or(3, color.a)?;
    *color = Color::new(r, g, b, a);
    Ok(())
}

fn set_scale(obj: &mut SceneObject, args: &CommandArgs, ctx: &mut EngineContext) -> Result<()> {
    let sx: f32 = args.get(0)?;
    let sy = args.get_or(1, sx)?;
    obj.destination_mut(ctx).scale = Vec2::new(sx, sy);
    Ok(())
}

/// `rotate:z` or `rotate:x,y,z`, in degrees.
fn set_rotate(obj: &mut SceneObject, args: &CommandArgs, ctx: &mut EngineContext) -> Result<()> {
    let degrees = if args.len() == 1 {
        Vec3::new(0.0, 0.0, args.get(0)?)
    } else {
        Vec3::new(args.get(0)?, args.get(1)?, args.get(2)?)
    };
    obj.destination_mut(ctx).rotate = Vec3::new(
        degrees.x.to_radians(),
        degrees.y.to_radians(),
        degrees.z.to_radians(),
    );
    Ok(())
}

fn set_rotate_z(obj: &mut SceneObject, args: &CommandArgs, ctx: &mut EngineContext) -> Result<()> {
    let z: f32 = args.get(0)?;
    obj.destination_mut(ctx).rotate.z = z.to_radians();
    Ok(())
}

fn set_align(obj: &mut SceneObject, args: &CommandArgs, ctx: &mut EngineContext) -> Result<()> {
    let ax: f32 = args.get(0)?;
    let ay = args.get_or(1, ax)?;
    obj.destination_mut(ctx).align = Vec2::new(ax, ay);
    Ok(())
}

fn set_center(obj: &mut SceneObject, args: &CommandArgs, ctx: &mut EngineContext) -> Result<()> {
    let code: i32 = args.get(0)?;
    if let Some(align) = lr2::center_align(code) {
        obj.destination_mut(ctx).align = align;
    }
    Ok(())
}

fn set_ease(obj: &mut SceneObject, args: &CommandArgs, _ctx: &mut EngineContext) -> Result<()> {
    obj.set_ease(args.get(0)?);
    Ok(())
}

fn add_time(obj: &mut SceneObject, args: &CommandArgs, ctx: &mut EngineContext) -> Result<()> {
    obj.add_time_frame(args.get(0)?, ctx);
    Ok(())
}

fn add_delta(obj: &mut SceneObject, args: &CommandArgs, ctx: &mut EngineContext) -> Result<()> {
    obj.add_delta_frame(args.get(0)?, ctx);
    Ok(())
}

fn set_loop(obj: &mut SceneObject, args: &CommandArgs, _ctx: &mut EngineContext) -> Result<()> {
    let start: f32 = args.get_or(0, 0.0)?;
    match obj.back_animation_mut() {
        Some(ani) => ani.set_loop(start),
        None => tracing::debug!(object = obj.name(), "loop without animation ignored"),
    }
    Ok(())
}

fn set_repeat(obj: &mut SceneObject, args: &CommandArgs, _ctx: &mut EngineContext) -> Result<()> {
    let repeat: bool = args.get_or(0, true)?;
    match obj.back_animation_mut() {
        Some(ani) if repeat => ani.set_loop(0.0),
        Some(ani) => ani.delete_loop(),
        None => tracing::debug!(object = obj.name(), "repeat without animation ignored"),
    }
    Ok(())
}

fn next_batch(obj: &mut SceneObject, _args: &CommandArgs, _ctx: &mut EngineContext) -> Result<()> {
    obj.close_batch();
    Ok(())
}

fn stop(obj: &mut SceneObject, _args: &CommandArgs, _ctx: &mut EngineContext) -> Result<()> {
    obj.stop();
    Ok(())
}

fn hurry(obj: &mut SceneObject, _args: &CommandArgs, _ctx: &mut EngineContext) -> Result<()> {
    obj.hurry_tween();
    Ok(())
}

fn replay(obj: &mut SceneObject, _args: &CommandArgs, _ctx: &mut EngineContext) -> Result<()> {
    obj.replay();
    Ok(())
}

fn pause(obj: &mut SceneObject, _args: &CommandArgs, _ctx: &mut EngineContext) -> Result<()> {
    obj.pause();
    Ok(())
}

fn resume(obj: &mut SceneObject, _args: &CommandArgs, _ctx: &mut EngineContext) -> Result<()> {
    obj.resume();
    Ok(())
}

fn set_finish(obj: &mut SceneObject, args: &CommandArgs, _ctx: &mut EngineContext) -> Result<()> {
    let event = args.raw().to_string();
    match obj.back_animation_mut() {
        Some(ani) => ani.set_command(event),
        None => tracing::debug!(object = obj.name(), "finish without animation ignored"),
    }
    Ok(())
}

fn show(obj: &mut SceneObject, _args: &CommandArgs, _ctx: &mut EngineContext) -> Result<()> {
    obj.show();
    Ok(())
}

fn hide(obj: &mut SceneObject, _args: &CommandArgs, _ctx: &mut EngineContext) -> Result<()> {
    obj.hide();
    Ok(())
}

fn set_focusable(obj: &mut SceneObject, args: &CommandArgs, _ctx: &mut EngineContext) -> Result<()> {
    obj.set_focusable(args.get_or(0, true)?);
    Ok(())
}

fn set_clip(obj: &mut SceneObject, args: &CommandArgs, _ctx: &mut EngineContext) -> Result<()> {
    obj.set_clipping(args.get_or(0, true)?);
    Ok(())
}

fn set_background(obj: &mut SceneObject, args: &CommandArgs, _ctx: &mut EngineContext) -> Result<()> {
    let color = Color::parse(args.raw())
        .ok_or_else(|| RhythmusError::msg(format!("`{}` is not a colour", args.raw())))?;
    obj.set_background(color);
    Ok(())
}

fn set_zindex(obj: &mut SceneObject, args: &CommandArgs, _ctx: &mut EngineContext) -> Result<()> {
    obj.set_draw_order(args.get(0)?);
    Ok(())
}

fn send_event(_obj: &mut SceneObject, args: &CommandArgs, ctx: &mut EngineContext) -> Result<()> {
    let name: String = args.get(0)?;
    ctx.events.send(name);
    Ok(())
}

fn set_text(obj: &mut SceneObject, args: &CommandArgs, _ctx: &mut EngineContext) -> Result<()> {
    obj.set_text(args.raw());
    Ok(())
}

fn set_number(obj: &mut SceneObject, args: &CommandArgs, _ctx: &mut EngineContext) -> Result<()> {
    obj.set_number(args.get(0)?);
    Ok(())
}

fn refresh(obj: &mut SceneObject, _args: &CommandArgs, ctx: &mut EngineContext) -> Result<()> {
    obj.refresh(ctx);
    Ok(())
}

fn set_blend(obj: &mut SceneObject, args: &CommandArgs, _ctx: &mut EngineContext) -> Result<()> {
    obj.set_blend(args.get(0)?);
    Ok(())
}
