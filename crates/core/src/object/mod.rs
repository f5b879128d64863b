//! Scene objects: a tree of nodes, each with a FIFO of tween batches, a
//! table of event commands and a kind specific payload.

mod kind;
mod number;
mod onmouse;
mod sprite;
mod text;

pub use kind::{Behavior, DrawContext, ObjectBehavior, ObjectKind};
pub use number::{format_number, Number, NumberFormatter};
pub use onmouse::OnMouse;
pub use sprite::{Sprite, SpriteSheet};
pub use text::{Text, TextAlign, TextFitting};

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::animation::Animation;
use crate::command::{self, CommandArgs, FromArg, Instruction};
use crate::context::EngineContext;
use crate::draw::{Color, DrawProperty, EaseType, Rect};
use crate::focus::{self, FocusLink};
use crate::keys::{KeyStore, VisibilityFlag};
use crate::lr2::{self, Fields};

/// Process unique object identity. Used for event subscriptions, focus
/// tracking and parent links instead of pointers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(u64);

impl ObjectId {
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Shared handle for objects that live outside the tree that draws them.
pub type ObjectHandle = Rc<RefCell<SceneObject>>;

/// A child entry. Owned children are destroyed with their parent; fixed
/// children belong to someone else and are only referenced.
#[derive(Debug, Clone)]
pub enum ChildRef {
    Owned(Box<SceneObject>),
    Fixed(ObjectHandle),
}

impl ChildRef {
    pub fn is_owned(&self) -> bool {
        matches!(self, Self::Owned(_))
    }

    pub fn with<R>(&self, f: impl FnOnce(&SceneObject) -> R) -> R {
        match self {
            Self::Owned(obj) => f(obj),
            Self::Fixed(handle) => f(&handle.borrow()),
        }
    }

    pub fn with_mut<R>(&mut self, f: impl FnOnce(&mut SceneObject) -> R) -> R {
        match self {
            Self::Owned(obj) => f(obj),
            Self::Fixed(handle) => f(&mut handle.borrow_mut()),
        }
    }

    pub fn id(&self) -> ObjectId {
        self.with(SceneObject::id)
    }
}

const MAX_VISIBILITY_FLAGS: usize = 4;

#[derive(Debug)]
pub struct SceneObject {
    id: ObjectId,
    name: String,
    parent: Option<ObjectId>,
    children: Vec<ChildRef>,
    ani: VecDeque<Animation>,
    /// Set by `next` and at the start of event commands: the next mutation
    /// opens a new animation instead of editing the back one.
    batch_closed: bool,
    ease: Option<EaseType>,
    current_frame: DrawProperty,
    commands: HashMap<String, String>,
    draw_order: i32,
    display: bool,
    focusable: bool,
    hovered: bool,
    focused: bool,
    dragging: bool,
    clipping: bool,
    background: Color,
    visibility: [Option<VisibilityFlag>; MAX_VISIBILITY_FLAGS],
    set_xy_as_center: bool,
    propagate: bool,
    resource_key: Option<String>,
    behavior: Behavior,
    focus_link: Option<FocusLink>,
}

impl Default for SceneObject {
    fn default() -> Self {
        Self::create(ObjectKind::Object)
    }
}

impl SceneObject {
    /// Object factory.
    pub fn create(kind: ObjectKind) -> Self {
        Self {
            id: ObjectId::next(),
            name: String::new(),
            parent: None,
            children: Vec::new(),
            ani: VecDeque::new(),
            batch_closed: false,
            ease: None,
            current_frame: DrawProperty::default(),
            commands: HashMap::new(),
            draw_order: 0,
            display: true,
            focusable: kind == ObjectKind::Button,
            hovered: false,
            focused: false,
            dragging: false,
            clipping: false,
            background: Color::TRANSPARENT,
            visibility: Default::default(),
            set_xy_as_center: false,
            propagate: false,
            resource_key: None,
            behavior: Behavior::new(kind),
            focus_link: None,
        }
    }

    pub fn named(kind: ObjectKind, name: impl Into<String>) -> Self {
        let mut obj = Self::create(kind);
        obj.name = name.into();
        obj
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    pub fn kind(&self) -> ObjectKind {
        self.behavior.kind()
    }

    pub fn behavior(&self) -> &Behavior {
        &self.behavior
    }

    pub fn behavior_mut(&mut self) -> &mut Behavior {
        &mut self.behavior
    }

    // ----- tree ---------------------------------------------------------

    /// Adds a child the object owns and returns its id.
    pub fn add_child(&mut self, mut child: SceneObject) -> ObjectId {
        child.parent = Some(self.id);
        let id = child.id;
        self.children.push(ChildRef::Owned(Box::new(child)));
        id
    }

    /// Adds a child owned elsewhere; the tree only keeps a reference to it.
    pub fn add_fixed_child(&mut self, child: ObjectHandle) -> ObjectId {
        let id = {
            let mut obj = child.borrow_mut();
            obj.parent = Some(self.id);
            obj.id
        };
        self.children.push(ChildRef::Fixed(child));
        id
    }

    /// Detaches a direct child and hands it back to the caller. Its event
    /// subscriptions stay in place so it can be attached elsewhere; call
    /// [`SceneObject::unsubscribe_commands`] before dropping it.
    pub fn remove_child(&mut self, id: ObjectId) -> Option<ChildRef> {
        let index = self.children.iter().position(|c| c.id() == id)?;
        let child = self.children.remove(index);
        if let ChildRef::Fixed(handle) = &child {
            handle.borrow_mut().parent = None;
        }
        Some(child)
    }

    /// Removes a direct child. An owned child is destroyed together with its
    /// event subscriptions, a fixed child is only unlinked.
    pub fn delete_child(&mut self, id: ObjectId, ctx: &mut EngineContext) -> bool {
        match self.remove_child(id) {
            Some(ChildRef::Owned(child)) => {
                child.unsubscribe_commands(ctx);
                true
            }
            Some(ChildRef::Fixed(_)) => true,
            None => false,
        }
    }

    pub fn children(&self) -> &[ChildRef] {
        &self.children
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// First object in this subtree (self included) named `name`.
    pub fn find_by_name(&self, name: &str) -> Option<ObjectId> {
        if self.name == name {
            return Some(self.id);
        }
        self.children
            .iter()
            .find_map(|child| child.with(|c| c.find_by_name(name)))
    }

    /// Runs `f` on the object `id` in this subtree, if present.
    pub fn with_descendant_mut<R>(
        &mut self,
        id: ObjectId,
        f: impl FnOnce(&mut SceneObject) -> R,
    ) -> Option<R> {
        let mut f = Some(f);
        self.visit_mut(id, &mut f)
    }

    fn visit_mut<R, F>(&mut self, id: ObjectId, f: &mut Option<F>) -> Option<R>
    where
        F: FnOnce(&mut SceneObject) -> R,
    {
        if self.id == id {
            return f.take().map(|f| f(self));
        }
        for child in &mut self.children {
            if let Some(result) = child.with_mut(|c| c.visit_mut(id, f)) {
                return Some(result);
            }
        }
        None
    }

    // ----- animation queue ----------------------------------------------

    /// Advances tweens, fires completion commands, updates the payload and
    /// then every child.
    pub fn update(&mut self, delta: f32, ctx: &mut EngineContext) {
        let mut remaining = delta;
        let mut fired = Vec::new();
        while remaining > 0.0 {
            let Some(front) = self.ani.front_mut() else {
                break;
            };
            if let Some(command) = front.update(&mut remaining, &mut self.current_frame) {
                fired.push(command);
            }
            if front.is_finished() {
                self.ani.pop_front();
            } else {
                remaining = 0.0;
            }
        }
        if self.ani.is_empty() {
            self.batch_closed = false;
        }

        for event in fired {
            tracing::trace!(object = %self.name, %event, "animation finished");
            self.run_command_by_name(&event, ctx);
        }

        if let Some(behavior) = self.behavior.as_behavior_mut() {
            behavior.update(delta, &ctx.resources);
        }

        for child in &mut self.children {
            child.with_mut(|c| c.update(delta, ctx));
        }
    }

    pub fn animations(&self) -> &VecDeque<Animation> {
        &self.ani
    }

    pub fn push_animation(&mut self, animation: Animation) {
        self.ani.push_back(animation);
        self.batch_closed = false;
    }

    pub fn back_animation_mut(&mut self) -> Option<&mut Animation> {
        self.ani.back_mut()
    }

    /// The back animation, creating an empty one if the queue is empty.
    pub fn open_animation(&mut self) -> &mut Animation {
        if self.ani.is_empty() {
            self.ani.push_back(Animation::new());
        }
        let back = self.ani.len() - 1;
        &mut self.ani[back]
    }

    pub fn current_frame(&self) -> &DrawProperty {
        &self.current_frame
    }

    pub fn set_current_frame(&mut self, frame: DrawProperty) {
        self.current_frame = frame;
    }

    pub fn is_tweening(&self) -> bool {
        !self.ani.is_empty()
    }

    /// State the object ends up in once its queue drains.
    pub fn destination(&self) -> DrawProperty {
        self.ani
            .back()
            .and_then(Animation::last_frame)
            .map(|frame| frame.draw_prop)
            .unwrap_or(self.current_frame)
    }

    fn frame_ease(&self, ctx: &EngineContext) -> EaseType {
        self.ease.unwrap_or(ctx.config.animation.default_ease)
    }

    /// Re-opens the batch if it was closed by pushing a new animation that
    /// starts at the previous destination.
    fn open_batch(&mut self, ctx: &EngineContext) {
        if self.batch_closed {
            self.batch_closed = false;
            if !self.ani.is_empty() {
                let start = self.destination();
                let ease = self.frame_ease(ctx);
                self.ani.push_back(Animation::starting_at(start, ease));
            }
        }
    }

    /// The frame state mutating commands write to: the current state when
    /// nothing is queued, otherwise the last frame of the open animation.
    pub fn destination_mut(&mut self, ctx: &EngineContext) -> &mut DrawProperty {
        self.open_batch(ctx);
        match self.ani.back_mut().and_then(Animation::last_frame_mut) {
            Some(frame) => &mut frame.draw_prop,
            None => &mut self.current_frame,
        }
    }

    /// Adds a frame at absolute `time` within the open animation, copying
    /// the current destination.
    pub fn add_time_frame(&mut self, time: f32, ctx: &EngineContext) {
        let ease = self.frame_ease(ctx);
        if self.ani.is_empty() || self.batch_closed {
            let start = self.destination();
            self.push_animation(Animation::starting_at(start, ease));
        }
        if let Some(ani) = self.ani.back_mut() {
            if let Some(last) = ani.last_frame().copied() {
                ani.add_frame(last.draw_prop, time, ease);
            }
        }
    }

    /// Holds the destination for `delta` more milliseconds.
    pub fn add_delta_frame(&mut self, delta: f32, ctx: &EngineContext) {
        if self.ani.is_empty() || self.batch_closed {
            let start = self.destination();
            let ease = self.frame_ease(ctx);
            self.push_animation(Animation::starting_at(start, ease));
        }
        if let Some(ani) = self.ani.back_mut() {
            ani.duplicate_frame(delta);
        }
    }

    pub fn set_ease(&mut self, ease: EaseType) {
        self.ease = Some(ease);
        if let Some(frame) = self.ani.back_mut().and_then(Animation::last_frame_mut) {
            frame.ease_type = ease;
        }
    }

    pub fn close_batch(&mut self) {
        self.batch_closed = !self.ani.is_empty();
    }

    pub fn stop(&mut self) {
        self.ani.clear();
        self.batch_closed = false;
    }

    pub fn hurry_tween(&mut self) {
        if let Some(front) = self.ani.front_mut() {
            front.hurry_tween();
        }
    }

    pub fn replay(&mut self) {
        self.ani.iter_mut().for_each(Animation::replay);
        if let Some(behavior) = self.behavior.as_behavior_mut() {
            behavior.replay();
        }
    }

    pub fn pause(&mut self) {
        self.ani.iter_mut().for_each(Animation::pause);
    }

    pub fn resume(&mut self) {
        self.ani.iter_mut().for_each(Animation::resume);
    }

    // ----- commands -----------------------------------------------------

    /// Runs a command batch such as `x:10;time:200;x:50`.
    pub fn run_command(&mut self, text: &str, ctx: &mut EngineContext) {
        command::run_batch(self, text, ctx);
    }

    /// Registers `text` to run when `event` is delivered and subscribes to
    /// the event.
    pub fn add_command(&mut self, event: impl Into<String>, text: impl Into<String>, ctx: &mut EngineContext) {
        let event = event.into();
        ctx.events.subscribe(event.clone(), self.id);
        self.commands.insert(event, text.into());
    }

    /// Subscribes every registered command of this subtree on the bus.
    pub fn subscribe_commands(&self, ctx: &mut EngineContext) {
        for event in self.commands.keys() {
            ctx.events.subscribe(event.clone(), self.id);
        }
        for child in &self.children {
            child.with(|c| c.subscribe_commands(ctx));
        }
    }

    /// Drops the subscriptions of this object and its owned descendants.
    /// Fixed children keep theirs.
    pub fn unsubscribe_commands(&self, ctx: &mut EngineContext) {
        ctx.events.unsubscribe_all(self.id);
        for child in &self.children {
            if let ChildRef::Owned(obj) = child {
                obj.unsubscribe_commands(ctx);
            }
        }
    }

    /// Clones the object and subscribes the copy's commands, so the copy
    /// reacts to the same events as the original.
    pub fn clone_in(&self, ctx: &mut EngineContext) -> SceneObject {
        let copy = self.clone();
        copy.subscribe_commands(ctx);
        copy
    }

    pub fn command(&self, event: &str) -> Option<&str> {
        self.commands.get(event).map(String::as_str)
    }

    /// Runs the command registered for `event` in a fresh batch. With
    /// `propagate` set the same text also runs on every descendant.
    pub fn run_command_by_name(&mut self, event: &str, ctx: &mut EngineContext) {
        let Some(text) = self.commands.get(event).cloned() else {
            return;
        };
        tracing::debug!(object = %self.name, %event, "running event command");
        self.close_batch();
        self.run_command(&text, ctx);
        if self.propagate {
            for child in &mut self.children {
                child.with_mut(|c| c.run_propagated(&text, ctx));
            }
        }
    }

    fn run_propagated(&mut self, text: &str, ctx: &mut EngineContext) {
        self.close_batch();
        self.run_command(text, ctx);
        for child in &mut self.children {
            child.with_mut(|c| c.run_propagated(text, ctx));
        }
    }

    /// Activation by pointer or key.
    pub fn click(&mut self, ctx: &mut EngineContext) {
        self.run_command_by_name("Click", ctx);
    }

    // ----- property loading -----------------------------------------------

    pub fn load_properties<'a>(
        &mut self,
        properties: impl IntoIterator<Item = (&'a str, &'a str)>,
        ctx: &mut EngineContext,
    ) {
        for (key, value) in properties {
            self.load_property(key, value, ctx);
        }
    }

    /// Applies one `(key, value)` pair from a skin or metrics file.
    /// Unrecognised keys are ignored.
    pub fn load_property(&mut self, key: &str, value: &str, ctx: &mut EngineContext) {
        if let Some(event) = key.strip_prefix("On").filter(|e| !e.is_empty()) {
            self.add_command(event, value, ctx);
            return;
        }

        match key {
            "name" => self.name = value.trim().to_string(),
            "pos" => {
                let args = CommandArgs::parse(key, value);
                let frame = self.destination_mut(ctx);
                if let (Ok(x), Ok(y)) = (args.get(0), args.get(1)) {
                    match (args.get(2), args.get(3)) {
                        (Ok(w), Ok(h)) => frame.pos = Rect::from_xywh(x, y, w, h),
                        _ => frame.pos.move_to(x, y),
                    }
                }
            }
            "focus" => {
                self.focusable = bool::from_arg(value).unwrap_or(false);
                self.track_focus(ctx.focus.link());
            }
            "clipping" => self.clipping = bool::from_arg(value).unwrap_or(false),
            "propagate" => self.propagate = bool::from_arg(value).unwrap_or(false),
            "xy_center" => self.set_xy_as_center = bool::from_arg(value).unwrap_or(false),
            "visible" => {
                let flags = value.split(',').filter_map(VisibilityFlag::parse);
                for (index, flag) in flags.take(MAX_VISIBILITY_FLAGS).enumerate() {
                    self.visibility[index] = Some(flag);
                }
            }
            "resource" => self.resource_key = Some(value.trim().to_string()),
            "command" => self.run_command(value, ctx),
            "lr2src" => lr2::load_src(self, &Fields::parse(value), ctx),
            "lr2dst" => {
                for line in value.split('|').filter(|l| !l.trim().is_empty()) {
                    lr2::add_frame_by_lr2_command(self, &Fields::parse(line), ctx);
                }
            }
            _ => {
                let consumed = self
                    .behavior
                    .as_behavior_mut()
                    .is_some_and(|b| b.load_property(key, value));
                if consumed {
                    return;
                }
                if command::lookup(key).is_some() {
                    let instruction = Instruction {
                        name: key.to_string(),
                        args: CommandArgs::parse(key, value),
                    };
                    command::run_instruction(self, &instruction, ctx);
                } else {
                    tracing::trace!(object = %self.name, key, "unrecognised property ignored");
                }
            }
        }
    }

    // ----- state ----------------------------------------------------------

    pub fn show(&mut self) {
        self.display = true;
    }

    pub fn hide(&mut self) {
        self.display = false;
    }

    pub fn is_displayed(&self) -> bool {
        self.display
    }

    /// Displayed and every visibility flag holds.
    pub fn is_visible(&self, keys: &KeyStore) -> bool {
        self.display
            && self
                .visibility
                .iter()
                .flatten()
                .all(|flag| flag.evaluate(keys))
    }

    pub fn set_visibility_flag(&mut self, index: usize, flag: Option<VisibilityFlag>) {
        if let Some(slot) = self.visibility.get_mut(index) {
            *slot = flag;
        }
    }

    pub fn visibility_flags(&self) -> impl Iterator<Item = &VisibilityFlag> {
        self.visibility.iter().flatten()
    }

    pub fn set_focusable(&mut self, focusable: bool) {
        self.focusable = focusable;
    }

    pub fn is_focusable(&self) -> bool {
        self.focusable
    }

    pub fn set_clipping(&mut self, clipping: bool) {
        self.clipping = clipping;
    }

    pub fn clipping(&self) -> bool {
        self.clipping
    }

    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn set_draw_order(&mut self, order: i32) {
        self.draw_order = order;
    }

    pub fn draw_order(&self) -> i32 {
        self.draw_order
    }

    pub fn set_xy_as_center(&mut self, center: bool) {
        self.set_xy_as_center = center;
    }

    pub fn xy_as_center(&self) -> bool {
        self.set_xy_as_center
    }

    pub fn set_propagate(&mut self, propagate: bool) {
        self.propagate = propagate;
    }

    pub fn set_resource_key(&mut self, key: impl Into<String>) {
        self.resource_key = Some(key.into());
    }

    pub fn resource_key(&self) -> Option<&str> {
        self.resource_key.as_deref()
    }

    pub fn set_text(&mut self, text: &str) {
        if let Some(behavior) = self.behavior.as_behavior_mut() {
            behavior.set_text(text);
        }
    }

    pub fn set_number(&mut self, number: f64) {
        if let Some(behavior) = self.behavior.as_behavior_mut() {
            behavior.set_number(number);
        }
    }

    pub fn set_blend(&mut self, blend: i32) {
        if let Some(behavior) = self.behavior.as_behavior_mut() {
            behavior.set_blend(blend);
        }
    }

    /// Re-reads the bound key store value into the payload.
    pub fn refresh(&mut self, ctx: &EngineContext) {
        let Some(key) = self.resource_key.as_deref() else {
            return;
        };
        match &mut self.behavior {
            Behavior::Object => {}
            Behavior::Text(text) => text.set_text(&ctx.keys.text(key)),
            other => {
                let number = ctx.keys.number(key);
                if let Some(behavior) = other.as_behavior_mut() {
                    behavior.set_number(number);
                }
            }
        }
    }

    /// Resource names used anywhere in this subtree.
    pub fn resource_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .behavior
            .as_behavior()
            .map(|b| b.resource_names().into_iter().map(str::to_string).collect())
            .unwrap_or_default();
        for child in &self.children {
            names.extend(child.with(SceneObject::resource_names));
        }
        names
    }

    // ----- pointer / focus ------------------------------------------------

    /// Registers with a focus tracker so the tracker forgets this object when
    /// it is dropped.
    pub fn track_focus(&mut self, link: FocusLink) {
        self.focus_link = Some(link);
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    /// Offset of the child coordinate space from the parent's origin.
    pub fn local_origin(&self) -> (f32, f32) {
        let pos = &self.current_frame.pos;
        if self.set_xy_as_center {
            (pos.left + pos.width() * 0.5, pos.top + pos.height() * 0.5)
        } else {
            (pos.left, pos.top)
        }
    }

    /// The object's box in its own coordinate space.
    pub fn local_box(&self) -> Rect {
        let size = self.current_frame.pos.size();
        if self.set_xy_as_center {
            Rect::from_xywh(-size.x * 0.5, -size.y * 0.5, size.x, size.y)
        } else {
            Rect::from_xywh(0.0, 0.0, size.x, size.y)
        }
    }

    fn hit_local(&self, x: f32, y: f32) -> bool {
        let bounds = self.local_box();
        match &self.behavior {
            Behavior::OnMouse(onmouse) => onmouse.hit(
                x - bounds.left,
                y - bounds.top,
                (bounds.width(), bounds.height()),
            ),
            _ => bounds.contains(x, y),
        }
    }

    /// Top-most interactive object under `(x, y)` in parent space. Later
    /// children are above earlier ones. Rotation and scale are ignored.
    pub fn pick(&self, x: f32, y: f32, keys: &KeyStore) -> Option<ObjectId> {
        if !self.is_visible(keys) {
            return None;
        }
        let (ox, oy) = self.local_origin();
        let (lx, ly) = (x - ox, y - oy);
        for child in self.children.iter().rev() {
            if let Some(id) = child.with(|c| c.pick(lx, ly, keys)) {
                return Some(id);
            }
        }
        let interactive = self.focusable || matches!(self.behavior, Behavior::OnMouse(_));
        (interactive && self.hit_local(lx, ly)).then_some(self.id)
    }
}

impl Clone for SceneObject {
    /// Deep-copies owned children and shares fixed ones. The copy gets a
    /// fresh id and is neither attached to a parent, focus tracked nor
    /// subscribed to events; see [`SceneObject::clone_in`].
    fn clone(&self) -> Self {
        let id = ObjectId::next();
        let mut children = self.children.clone();
        for child in &mut children {
            if let ChildRef::Owned(obj) = child {
                obj.parent = Some(id);
            }
        }
        Self {
            id,
            name: self.name.clone(),
            parent: None,
            children,
            ani: self.ani.clone(),
            batch_closed: self.batch_closed,
            ease: self.ease,
            current_frame: self.current_frame,
            commands: self.commands.clone(),
            draw_order: self.draw_order,
            display: self.display,
            focusable: self.focusable,
            hovered: false,
            focused: false,
            dragging: false,
            clipping: self.clipping,
            background: self.background,
            visibility: self.visibility.clone(),
            set_xy_as_center: self.set_xy_as_center,
            propagate: self.propagate,
            resource_key: self.resource_key.clone(),
            behavior: self.behavior.clone(),
            focus_link: None,
        }
    }
}

impl Drop for SceneObject {
    fn drop(&mut self) {
        if let Some(link) = &self.focus_link {
            focus::release(link, self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationFrame;
    use crate::focus::FocusTracker;

    fn at_x(x: f32) -> DrawProperty {
        DrawProperty {
            pos: Rect::from_xywh(x, 0.0, 10.0, 10.0),
            ..DrawProperty::default()
        }
    }

    fn single_frame(prop: DrawProperty, time: f32) -> Animation {
        let mut ani = Animation::new();
        ani.add_frame(prop, time, EaseType::Linear);
        ani
    }

    fn frame_x(frame: &AnimationFrame) -> f32 {
        frame.draw_prop.pos.left
    }

    #[test]
    fn leftover_time_seeds_the_next_animation() {
        let mut ctx = EngineContext::default();
        let mut obj = SceneObject::create(ObjectKind::Object);
        obj.set_current_frame(at_x(0.0));
        obj.push_animation(single_frame(at_x(100.0), 100.0));
        obj.push_animation(single_frame(at_x(200.0), 50.0));

        obj.update(120.0, &mut ctx);

        assert_eq!(obj.animations().len(), 1);
        let b = &obj.animations()[0];
        assert!(!b.is_finished());
        assert!((b.frame_time() - 20.0).abs() < 1e-4);
        // 20/50 of the way from A's end state to B's frame
        assert!((obj.current_frame().pos.left - 140.0).abs() < 1e-3);
    }

    #[test]
    fn one_update_never_spends_more_than_its_delta() {
        let mut ctx = EngineContext::default();
        let mut obj = SceneObject::create(ObjectKind::Object);
        for i in 1..=5 {
            obj.push_animation(single_frame(at_x(i as f32), 10.0));
        }
        obj.update(35.0, &mut ctx);
        assert_eq!(obj.animations().len(), 2);
        assert!((obj.animations()[0].frame_time() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn commands_build_a_tween_that_eases_out() {
        let mut ctx = EngineContext::default();
        let mut obj = SceneObject::create(ObjectKind::Object);
        obj.set_current_frame(DrawProperty {
            pos: Rect::from_xywh(0.0, 0.0, 10.0, 10.0),
            ..DrawProperty::default()
        });

        obj.run_command("pos:100,50", &mut ctx);
        obj.run_command("time:500", &mut ctx);
        obj.run_command("pos:200,50", &mut ctx);

        let frames = obj.animations()[0].frames();
        assert_eq!(frames.len(), 2);
        assert_eq!((frames[0].time, frame_x(&frames[0])), (0.0, 100.0));
        assert_eq!((frames[1].time, frame_x(&frames[1])), (500.0, 200.0));

        obj.update(250.0, &mut ctx);
        // ease-out at 0.5 is 0.875
        assert!((obj.current_frame().pos.left - 187.5).abs() < 1e-3);
        assert_eq!(obj.current_frame().pos.top, 50.0);
    }

    #[test]
    fn a_bad_command_only_skips_itself() {
        let mut ctx = EngineContext::default();
        let mut obj = SceneObject::create(ObjectKind::Object);
        obj.run_command("x:10;y:hello;w:30;bogus:1", &mut ctx);

        let pos = obj.current_frame().pos;
        assert_eq!(pos.left, 10.0);
        assert_eq!(pos.top, 0.0);
        assert_eq!(pos.width(), 30.0);
    }

    #[test]
    fn missing_arguments_are_skipped() {
        let mut ctx = EngineContext::default();
        let mut obj = SceneObject::create(ObjectKind::Object);
        obj.run_command("pos:5;opacity:0.5", &mut ctx);
        assert_eq!(obj.current_frame().pos.left, 0.0);
        assert_eq!(obj.current_frame().color.a, 0.5);
    }

    #[test]
    fn tween_controls_on_an_empty_queue_are_noops() {
        let mut ctx = EngineContext::default();
        let mut obj = SceneObject::create(ObjectKind::Object);
        obj.run_command("loop:0;repeat:1;hurry;pause;resume;replay;stop;finish:Done", &mut ctx);
        assert!(!obj.is_tweening());
    }

    #[test]
    fn event_commands_open_a_new_batch() {
        let mut ctx = EngineContext::default();
        let mut obj = SceneObject::create(ObjectKind::Object);
        obj.load_property("OnFade", "opacity:0;time:300;opacity:1", &mut ctx);
        obj.run_command("time:100;x:50", &mut ctx);

        assert!(ctx.events.is_subscribed("Fade", obj.id()));
        obj.run_command_by_name("Fade", &mut ctx);

        let queue = obj.animations();
        assert_eq!(queue.len(), 2);
        let fade = queue[1].frames();
        assert_eq!(fade[0].draw_prop.color.a, 0.0);
        assert_eq!(fade[0].draw_prop.pos.left, 50.0);
        assert_eq!(fade[1].draw_prop.color.a, 1.0);
        assert_eq!(fade[1].time, 300.0);
    }

    #[test]
    fn next_closes_the_batch() {
        let mut ctx = EngineContext::default();
        let mut obj = SceneObject::create(ObjectKind::Object);
        obj.run_command("time:100;x:50;next;time:100;x:80", &mut ctx);
        assert_eq!(obj.animations().len(), 2);
        assert_eq!(obj.destination().pos.left, 80.0);
    }

    #[test]
    fn completion_command_fires_after_the_tween() {
        let mut ctx = EngineContext::default();
        let mut obj = SceneObject::create(ObjectKind::Object);
        obj.load_property("OnDone", "hide", &mut ctx);
        obj.run_command("time:100;x:10;finish:Done", &mut ctx);

        obj.update(60.0, &mut ctx);
        assert!(obj.is_displayed());
        obj.update(60.0, &mut ctx);
        assert!(!obj.is_displayed());
        assert!(!obj.is_tweening());
    }

    #[test]
    fn ease_applies_to_new_frames() {
        let mut ctx = EngineContext::default();
        let mut obj = SceneObject::create(ObjectKind::Object);
        obj.run_command("acc:linear;time:100;x:100", &mut ctx);
        obj.update(50.0, &mut ctx);
        assert!((obj.current_frame().pos.left - 50.0).abs() < 1e-3);
    }

    #[test]
    fn propagate_runs_the_event_on_descendants() {
        let mut ctx = EngineContext::default();
        let mut root = SceneObject::create(ObjectKind::Object);
        let mut child = SceneObject::create(ObjectKind::Object);
        child.add_child(SceneObject::named(ObjectKind::Object, "grandchild"));
        let child_id = root.add_child(child);
        root.load_property("propagate", "1", &mut ctx);
        root.load_property("OnHideAll", "hide", &mut ctx);

        root.run_command_by_name("HideAll", &mut ctx);

        assert!(!root.is_displayed());
        let grandchild = root.find_by_name("grandchild").unwrap();
        assert_eq!(root.with_descendant_mut(child_id, |c| c.is_displayed()), Some(false));
        assert_eq!(root.with_descendant_mut(grandchild, |c| c.is_displayed()), Some(false));
    }

    #[test]
    fn dropping_a_parent_destroys_owned_children_only() {
        let tracker = FocusTracker::new();

        let mut owned = SceneObject::create(ObjectKind::Button);
        owned.track_focus(tracker.link());
        let owned_id = owned.id();

        let fixed: ObjectHandle = Rc::new(RefCell::new(SceneObject::create(ObjectKind::Button)));
        fixed.borrow_mut().track_focus(tracker.link());
        let fixed_id = fixed.borrow().id();

        let mut parent = SceneObject::create(ObjectKind::Object);
        parent.add_child(owned);
        parent.add_fixed_child(fixed.clone());
        assert_eq!(Rc::strong_count(&fixed), 2);

        tracker.set_focused(Some(owned_id));
        tracker.set_hovered(Some(fixed_id));
        drop(parent);

        assert_eq!(tracker.focused(), None);
        assert_eq!(tracker.hovered(), Some(fixed_id));
        assert_eq!(Rc::strong_count(&fixed), 1);
        assert!(fixed.borrow().is_focusable());
    }

    #[test]
    fn deleting_a_fixed_child_only_unlinks_it() {
        let mut ctx = EngineContext::default();
        let fixed: ObjectHandle = Rc::new(RefCell::new(SceneObject::create(ObjectKind::Object)));
        fixed.borrow_mut().add_command("Load", "show", &mut ctx);
        let fixed_id = fixed.borrow().id();
        let mut parent = SceneObject::create(ObjectKind::Object);
        let id = parent.add_fixed_child(fixed.clone());
        assert_eq!(fixed.borrow().parent(), Some(parent.id()));

        assert!(parent.delete_child(id, &mut ctx));
        assert_eq!(parent.child_count(), 0);
        assert_eq!(fixed.borrow().parent(), None);
        assert!(ctx.events.is_subscribed("Load", fixed_id));
        assert!(!parent.delete_child(id, &mut ctx));
    }

    #[test]
    fn deleting_an_owned_child_drops_its_subscriptions() {
        let mut ctx = EngineContext::default();
        let mut child = SceneObject::create(ObjectKind::Object);
        child.add_command("Start", "hide", &mut ctx);
        let mut grandchild = SceneObject::create(ObjectKind::Object);
        grandchild.add_command("Start", "show", &mut ctx);
        child.add_child(grandchild);

        let mut parent = SceneObject::create(ObjectKind::Object);
        parent.add_command("Start", "x:1", &mut ctx);
        let id = parent.add_child(child);
        assert_eq!(ctx.events.subscribers("Start").len(), 3);

        assert!(parent.delete_child(id, &mut ctx));
        assert_eq!(ctx.events.subscribers("Start"), &[parent.id()]);
    }

    #[test]
    fn clone_in_subscribes_the_copy() {
        let mut ctx = EngineContext::default();
        let mut original = SceneObject::create(ObjectKind::Object);
        original.add_command("Hide", "hide", &mut ctx);
        original.add_child({
            let mut child = SceneObject::create(ObjectKind::Object);
            child.add_command("Hide", "hide", &mut ctx);
            child
        });

        let plain = original.clone();
        assert_eq!(plain.command("Hide"), Some("hide"));
        assert!(!ctx.events.is_subscribed("Hide", plain.id()));

        let copy = original.clone_in(&mut ctx);
        assert!(ctx.events.is_subscribed("Hide", original.id()));
        assert!(ctx.events.is_subscribed("Hide", copy.id()));
        let child_id = copy.children()[0].id();
        assert!(ctx.events.is_subscribed("Hide", child_id));
    }

    #[test]
    fn clone_copies_owned_and_shares_fixed_children() {
        let fixed: ObjectHandle = Rc::new(RefCell::new(SceneObject::create(ObjectKind::Object)));
        let mut parent = SceneObject::named(ObjectKind::Object, "panel");
        let owned_id = parent.add_child(SceneObject::create(ObjectKind::Sprite));
        parent.add_fixed_child(fixed.clone());

        let copy = parent.clone();
        assert_ne!(copy.id(), parent.id());
        assert_eq!(copy.name(), "panel");
        assert!(copy.children()[0].is_owned());
        assert_ne!(copy.children()[0].id(), owned_id);
        assert_eq!(copy.children()[0].with(SceneObject::parent), Some(copy.id()));
        assert!(!copy.children()[1].is_owned());
        assert_eq!(Rc::strong_count(&fixed), 3);
    }

    #[test]
    fn properties_configure_the_object() {
        let mut ctx = EngineContext::default();
        let mut obj = SceneObject::create(ObjectKind::Text);
        obj.load_properties(
            [
                ("name", "title"),
                ("pos", "10,20,100,30"),
                ("zindex", "3"),
                ("clipping", "true"),
                ("background", "#FF0000"),
                ("visible", "op1,!op2"),
                ("align", "center"),
                ("font", "ui"),
                ("text", "hello"),
                ("unknown", "1"),
            ],
            &mut ctx,
        );

        assert_eq!(obj.name(), "title");
        assert_eq!(obj.current_frame().pos, Rect::from_xywh(10.0, 20.0, 100.0, 30.0));
        assert_eq!(obj.draw_order(), 3);
        assert!(obj.clipping());
        assert_eq!(obj.background(), Color::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(obj.visibility_flags().count(), 2);
        match obj.behavior() {
            Behavior::Text(text) => {
                assert_eq!(text.align(), TextAlign::Center);
                assert_eq!(text.text(), "hello");
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn visibility_follows_the_key_store() {
        let mut ctx = EngineContext::default();
        let mut obj = SceneObject::create(ObjectKind::Object);
        obj.load_property("visible", "op1,!op2", &mut ctx);
        assert!(!obj.is_visible(&ctx.keys));
        ctx.keys.set_bool("op1", true);
        assert!(obj.is_visible(&ctx.keys));
        ctx.keys.set_bool("op2", true);
        assert!(!obj.is_visible(&ctx.keys));
    }

    #[test]
    fn refresh_reads_the_bound_key() {
        let mut ctx = EngineContext::default();
        ctx.keys.set_text("S1", "Song Title");
        let mut obj = SceneObject::create(ObjectKind::Text);
        obj.set_resource_key("S1");
        obj.run_command("refresh", &mut ctx);
        match obj.behavior() {
            Behavior::Text(text) => assert_eq!(text.text(), "Song Title"),
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn pick_finds_the_topmost_interactive_child() {
        let keys = KeyStore::new();
        let mut root = SceneObject::create(ObjectKind::Object);
        root.set_current_frame(at_x(100.0));

        let mut below = SceneObject::create(ObjectKind::Button);
        below.set_current_frame(at_x(0.0));
        let mut above = SceneObject::create(ObjectKind::Button);
        above.set_current_frame(at_x(5.0));
        let below_id = root.add_child(below);
        let above_id = root.add_child(above);

        assert_eq!(root.pick(108.0, 5.0, &keys), Some(above_id));
        assert_eq!(root.pick(102.0, 5.0, &keys), Some(below_id));
        assert_eq!(root.pick(50.0, 5.0, &keys), None);
    }
}
