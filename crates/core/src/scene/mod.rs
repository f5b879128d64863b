//! A scene: the root of an object tree plus the scene-level timing around
//! it (fades, delayed scene events, input gating) and the pointer focus
//! state machine.

use serde::{Deserialize, Serialize};

use crate::context::EngineContext;
use crate::draw::Color;
use crate::event::EventMessage;
use crate::lr2::{self, Fields};
use crate::object::{ObjectId, ObjectKind, SceneObject};
use crate::render::{self, DrawList, RenderCommand};
use crate::resources::ResourceCommit;
use crate::timeline::{EventQueue, SceneClock};
use crate::Result;

/// Sent to subscribers when the scene starts.
pub const EVENT_LOAD: &str = "Load";
/// Fired once `#SCENETIME` has elapsed.
pub const EVENT_SCENE_TIMEOUT: &str = "SceneTimeout";
/// Fired when the scene has finished, after its fade-out.
pub const EVENT_SCENE_CHANGE: &str = "SceneChange";

/// Scene-wide settings read from the LR2 header lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeParameter {
    pub gamemode: String,
    pub title: String,
    pub maker: String,
    pub preview: String,
    pub fade_in_ms: f32,
    pub fade_out_ms: f32,
    /// Scene timeout; zero disables it.
    pub next_scene_ms: f32,
    /// Pointer input is ignored until this long after the scene starts.
    pub begin_input_ms: f32,
    /// `#IMAGE` paths in declaration order; the n-th one is `image{n}`.
    pub images: Vec<String>,
    /// `#LR2FONT` paths in declaration order; the n-th one is `font{n}`.
    pub fonts: Vec<String>,
}

/// One object of a [`SceneDescription`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectDescription {
    #[serde(default)]
    pub kind: ObjectKind,
    /// `(key, value)` pairs in load order.
    #[serde(default)]
    pub properties: Vec<(String, String)>,
    #[serde(default)]
    pub children: Vec<ObjectDescription>,
}

/// Serialised form of a scene as produced by skin loaders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    pub name: String,
    /// Scene level lines such as `#FADEIN` or `#SRC_IMAGE`, in load order.
    #[serde(default)]
    pub properties: Vec<(String, String)>,
    #[serde(default)]
    pub objects: Vec<ObjectDescription>,
    /// Resources already produced by the loaders.
    #[serde(default)]
    pub resources: Vec<ResourceCommit>,
}

impl SceneDescription {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

/// Black full-screen fade. A positive duration fades in, a negative one
/// fades out and holds black once done.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Fade {
    time_ms: f32,
    duration_ms: f32,
}

impl Fade {
    fn is_active(&self) -> bool {
        self.duration_ms != 0.0
    }

    fn update(&mut self, delta: f32) {
        if !self.is_active() {
            return;
        }
        self.time_ms += delta;
        if self.duration_ms > 0.0 && self.time_ms > self.duration_ms {
            *self = Self::default();
        }
    }

    fn alpha(&self) -> Option<f32> {
        if !self.is_active() {
            return None;
        }
        let alpha = if self.duration_ms > 0.0 {
            1.0 - self.time_ms / self.duration_ms
        } else {
            self.time_ms / -self.duration_ms
        };
        Some(alpha.min(1.0))
    }
}

#[derive(Debug)]
pub struct Scene {
    name: String,
    root: SceneObject,
    theme: ThemeParameter,
    scheduled: EventQueue,
    clock: SceneClock,
    fade: Fade,
    input_available_ms: f32,
    /// Previous property key and the object the last `#SRC_*` line created.
    prev_key: String,
    last_src: Option<ObjectId>,
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            root: SceneObject::named(ObjectKind::Object, name.clone()),
            name,
            theme: ThemeParameter::default(),
            scheduled: EventQueue::new(),
            clock: SceneClock::default(),
            fade: Fade::default(),
            input_available_ms: 0.0,
            prev_key: String::new(),
            last_src: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &SceneObject {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut SceneObject {
        &mut self.root
    }

    pub fn theme(&self) -> &ThemeParameter {
        &self.theme
    }

    pub fn time_ms(&self) -> f32 {
        self.clock.time_ms
    }

    /// Builds a scene from its description.
    pub fn from_description(desc: &SceneDescription, ctx: &mut EngineContext) -> Self {
        let mut scene = Self::new(desc.name.clone());
        for commit in &desc.resources {
            ctx.resources.apply(commit.clone());
        }
        for (key, value) in &desc.properties {
            scene.load_property(key, value, ctx);
        }
        for object in &desc.objects {
            let obj = build_object(object, ctx);
            scene.root.add_child(obj);
        }
        tracing::debug!(
            scene = %scene.name,
            objects = scene.root.child_count(),
            "scene description loaded"
        );
        scene
    }

    /// Checks that every resource the tree draws with is known.
    pub fn resolve_resources(&self, ctx: &EngineContext) -> Result<()> {
        let names = self.root.resource_names();
        ctx.resources.resolve(names.iter().map(String::as_str))
    }

    /// Applies one scene level line. LR2 `#SRC_*` lines create objects,
    /// `#DST_*` lines animate the most recent one, header lines fill the
    /// theme parameters and anything else goes to the root object.
    pub fn load_property(&mut self, key: &str, value: &str, ctx: &mut EngineContext) {
        let fields = Fields::parse(value);
        if let Some(kind) = key.strip_prefix("#SRC_") {
            self.load_src(key, kind, &fields, ctx);
        } else if key.starts_with("#DST_") {
            match self.last_src {
                Some(id) => {
                    self.root
                        .with_descendant_mut(id, |obj| lr2::add_frame_by_lr2_command(obj, &fields, ctx));
                }
                None => tracing::warn!(key, "destination line without a source line ignored"),
            }
        } else {
            match key {
                "#INFORMATION" => {
                    self.theme.gamemode = fields.text(0).to_string();
                    self.theme.title = fields.text(1).to_string();
                    self.theme.maker = fields.text(2).to_string();
                    self.theme.preview = fields.text(3).to_string();
                }
                "#STARTINPUT" | "#IGNOREINPUT" => self.theme.begin_input_ms = fields.int(0) as f32,
                "#FADEIN" => self.theme.fade_in_ms = fields.int(0) as f32,
                "#FADEOUT" => self.theme.fade_out_ms = fields.int(0) as f32,
                "#SCENETIME" => self.theme.next_scene_ms = fields.int(0) as f32,
                "#IMAGE" => self.theme.images.push(fields.text(0).to_string()),
                "#LR2FONT" => self.theme.fonts.push(fields.text(0).to_string()),
                _ => self.root.load_property(key, value, ctx),
            }
        }
        self.prev_key = key.to_string();
    }

    fn load_src(&mut self, key: &str, kind: &str, fields: &Fields, ctx: &mut EngineContext) {
        // consecutive source lines of one type describe the same object
        let reuse = self.prev_key == key && self.last_src.is_some();
        let id = match self.last_src {
            Some(id) if reuse => id,
            _ => {
                let obj = match kind {
                    "IMAGE" => SceneObject::create(ObjectKind::Sprite),
                    "TEXT" => SceneObject::create(ObjectKind::Text),
                    "NUMBER" => SceneObject::create(ObjectKind::Number),
                    "BUTTON" => SceneObject::create(ObjectKind::Button),
                    "ONMOUSE" => SceneObject::create(ObjectKind::OnMouse),
                    other => SceneObject::named(ObjectKind::Object, other),
                };
                let id = self.root.add_child(obj);
                self.last_src = Some(id);
                id
            }
        };
        self.root
            .with_descendant_mut(id, |obj| lr2::load_src(obj, fields, ctx));
    }

    /// Starts the scene clock, announces `Load` and arms the scene timeout
    /// and fade-in.
    pub fn start(&mut self, ctx: &mut EngineContext) {
        self.clock.reset();
        self.scheduled.clear();
        if self.theme.next_scene_ms > 0.0 {
            self.scheduled
                .queue_event(EVENT_SCENE_TIMEOUT, self.theme.next_scene_ms);
        }
        let begin_input = if self.theme.begin_input_ms > 0.0 {
            self.theme.begin_input_ms
        } else {
            ctx.config.input.begin_input_time_ms
        };
        self.input_available_ms = self.clock.time_ms + begin_input;
        if self.theme.fade_in_ms > 0.0 {
            self.trigger_fade_in(self.theme.fade_in_ms);
        }
        ctx.events.post(EventMessage::at(EVENT_LOAD, self.clock.time_ms));
        tracing::info!(scene = %self.name, "scene started");
    }

    /// Schedules `name` to be sent once the scene clock reaches `at_ms`.
    /// Times already passed fire on the next update.
    pub fn schedule_event(&mut self, name: impl Into<String>, at_ms: f32) {
        self.scheduled
            .queue_event(name, at_ms - self.clock.time_ms);
    }

    /// Fades out if configured and then fires `SceneChange`.
    pub fn finish(&mut self, ctx: &mut EngineContext) {
        if self.theme.fade_out_ms > 0.0 {
            self.trigger_fade_out(self.theme.fade_out_ms);
            self.scheduled
                .queue_event(EVENT_SCENE_CHANGE, self.theme.fade_out_ms);
        } else {
            ctx.events.post(EventMessage::at(EVENT_SCENE_CHANGE, self.clock.time_ms));
        }
    }

    pub fn trigger_fade_in(&mut self, duration_ms: f32) {
        if !self.fade.is_active() {
            self.fade = Fade {
                time_ms: 0.0,
                duration_ms,
            };
        }
    }

    pub fn trigger_fade_out(&mut self, duration_ms: f32) {
        if !self.fade.is_active() {
            self.fade = Fade {
                time_ms: 0.0,
                duration_ms: -duration_ms,
            };
        }
    }

    /// Opacity of the black fade overlay, if one is running.
    pub fn fade_alpha(&self) -> Option<f32> {
        self.fade.alpha()
    }

    pub fn is_input_available(&self) -> bool {
        self.clock.time_ms >= self.input_available_ms
    }

    /// Advances one frame: applies resource commits, fires due scene events,
    /// delivers pending events, then updates the object tree. Returns the
    /// events delivered this frame.
    pub fn update(&mut self, delta: f32, ctx: &mut EngineContext) -> Vec<EventMessage> {
        if let Err(err) = ctx.apply_commits() {
            tracing::warn!(%err, "resource commits skipped this frame");
        }
        self.clock.advance(delta);
        for event in self.scheduled.update(delta) {
            ctx.events.post(EventMessage::at(event.name, self.clock.time_ms));
        }
        let delivered = self.dispatch_events(ctx);
        self.root.update(delta, ctx);
        self.fade.update(delta);
        delivered
    }

    /// Delivers every pending event to its subscribers. Events raised while
    /// delivering wait for the next call.
    pub fn dispatch_events(&mut self, ctx: &mut EngineContext) -> Vec<EventMessage> {
        let messages = ctx.events.drain();
        for message in &messages {
            let subscribers = ctx.events.subscribers(&message.name).to_vec();
            tracing::debug!(
                event = %message.name,
                subscribers = subscribers.len(),
                "delivering event"
            );
            for id in subscribers {
                self.root
                    .with_descendant_mut(id, |obj| obj.run_command_by_name(&message.name, ctx));
            }
        }
        messages
    }

    pub fn render(&self, ctx: &EngineContext) -> DrawList {
        let mut out = DrawList::new();
        render::render_object(&self.root, &ctx.keys, &ctx.resources, &mut out);
        if let Some(alpha) = self.fade_alpha() {
            out.push(RenderCommand::FillScreen {
                width: ctx.config.render.width,
                height: ctx.config.render.height,
                color: Color { a: alpha, ..Color::BLACK },
            });
        }
        out
    }

    // ----- pointer ------------------------------------------------------

    /// Updates hover state: `MouseOut` on the object left, `MouseOver` on
    /// the one entered, `Drag` on the object being dragged.
    pub fn pointer_move(&mut self, x: f32, y: f32, ctx: &mut EngineContext) {
        if !self.is_input_available() {
            return;
        }
        let hit = self.root.pick(x, y, &ctx.keys);
        let previous = ctx.focus.hovered();
        if hit != previous {
            if let Some(id) = previous {
                self.root.with_descendant_mut(id, |obj| {
                    obj.set_hovered(false);
                    obj.run_command_by_name("MouseOut", ctx);
                });
            }
            if let Some(id) = hit {
                let link = ctx.focus.link();
                self.root.with_descendant_mut(id, |obj| {
                    obj.track_focus(link);
                    obj.set_hovered(true);
                    obj.run_command_by_name("MouseOver", ctx);
                });
            }
            ctx.focus.set_hovered(hit);
        }
        if let Some(id) = ctx.focus.dragging() {
            self.root
                .with_descendant_mut(id, |obj| obj.run_command_by_name("Drag", ctx));
        }
    }

    /// Moves focus to the object under the pointer (`Blur` / `Focus`) and
    /// starts dragging it.
    pub fn pointer_down(&mut self, x: f32, y: f32, ctx: &mut EngineContext) {
        if !self.is_input_available() {
            return;
        }
        let hit = self.root.pick(x, y, &ctx.keys);
        let previous = ctx.focus.focused();
        if hit != previous {
            if let Some(id) = previous {
                self.root.with_descendant_mut(id, |obj| {
                    obj.set_focused(false);
                    obj.run_command_by_name("Blur", ctx);
                });
            }
            if let Some(id) = hit {
                let link = ctx.focus.link();
                self.root.with_descendant_mut(id, |obj| {
                    obj.track_focus(link);
                    obj.set_focused(true);
                    obj.run_command_by_name("Focus", ctx);
                });
            }
            ctx.focus.set_focused(hit);
        }
        if let Some(id) = hit {
            self.root.with_descendant_mut(id, |obj| obj.set_dragging(true));
        }
        ctx.focus.set_dragging(hit);
    }

    /// Ends a drag with `Drop`; releasing over the pressed object clicks it.
    pub fn pointer_up(&mut self, x: f32, y: f32, ctx: &mut EngineContext) {
        let Some(id) = ctx.focus.dragging() else {
            return;
        };
        ctx.focus.set_dragging(None);
        let hit = self.root.pick(x, y, &ctx.keys);
        self.root.with_descendant_mut(id, |obj| {
            obj.set_dragging(false);
            obj.run_command_by_name("Drop", ctx);
            if hit == Some(id) {
                obj.click(ctx);
            }
        });
    }
}

fn build_object(desc: &ObjectDescription, ctx: &mut EngineContext) -> SceneObject {
    let mut obj = SceneObject::create(desc.kind);
    for (key, value) in &desc.properties {
        obj.load_property(key, value, ctx);
    }
    for child in &desc.children {
        obj.add_child(build_object(child, ctx));
    }
    obj
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::Rect;

    fn names(events: &[EventMessage]) -> Vec<&str> {
        events.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn source_and_destination_lines_build_objects() {
        let mut ctx = EngineContext::default();
        let mut scene = Scene::new("select");
        scene.load_property("#DST_IMAGE", "0,0,0,0,10,10", &mut ctx);
        assert_eq!(scene.root().child_count(), 0);

        scene.load_property("#SRC_IMAGE", "0,1,0,0,0,0,1,1,0,0", &mut ctx);
        scene.load_property("#DST_IMAGE", "0,0,0,0,10,10,0,255,255,255,255", &mut ctx);
        scene.load_property("#DST_IMAGE", "0,500,100,0,10,10,0,255,255,255,255", &mut ctx);
        scene.load_property("#SRC_TEXT", "0,0,1,0", &mut ctx);

        let root = scene.root();
        assert_eq!(root.child_count(), 2);
        let sprite_frames = root.children()[0].with(|c| c.animations()[0].frames().len());
        assert_eq!(sprite_frames, 2);
        assert_eq!(root.children()[1].with(SceneObject::kind), ObjectKind::Text);
    }

    #[test]
    fn serial_source_lines_reuse_the_object() {
        let mut ctx = EngineContext::default();
        let mut scene = Scene::new("play");
        scene.load_property("#SRC_IMAGE", "0,1,0,0,0,0,1,1,0,0", &mut ctx);
        scene.load_property("#SRC_IMAGE", "0,2,0,0,0,0,1,1,0,0", &mut ctx);
        assert_eq!(scene.root().child_count(), 1);

        scene.load_property("#DST_IMAGE", "0,0", &mut ctx);
        scene.load_property("#SRC_IMAGE", "0,3,0,0,0,0,1,1,0,0", &mut ctx);
        assert_eq!(scene.root().child_count(), 2);
    }

    #[test]
    fn header_lines_fill_the_theme() {
        let mut ctx = EngineContext::default();
        let mut scene = Scene::new("decide");
        for (key, value) in [
            ("#INFORMATION", "7,Decide,someone,preview.png"),
            ("#FADEIN", "300"),
            ("#FADEOUT", "500,"),
            ("#SCENETIME", "3000"),
            ("#STARTINPUT", "1000"),
            ("#IMAGE", "bg.png"),
        ] {
            scene.load_property(key, value, &mut ctx);
        }
        let theme = scene.theme();
        assert_eq!(theme.title, "Decide");
        assert_eq!(theme.fade_in_ms, 300.0);
        assert_eq!(theme.fade_out_ms, 500.0);
        assert_eq!(theme.next_scene_ms, 3000.0);
        assert_eq!(theme.begin_input_ms, 1000.0);
        assert_eq!(theme.images, vec!["bg.png"]);
    }

    #[test]
    fn scene_timeout_fires_after_scenetime() {
        let mut ctx = EngineContext::default();
        let mut scene = Scene::new("title");
        scene.load_property("#SCENETIME", "1000", &mut ctx);
        scene.start(&mut ctx);

        assert_eq!(names(&scene.update(600.0, &mut ctx)), vec![EVENT_LOAD]);
        assert!(scene.update(300.0, &mut ctx).is_empty());
        assert_eq!(names(&scene.update(200.0, &mut ctx)), vec![EVENT_SCENE_TIMEOUT]);
    }

    #[test]
    fn load_event_runs_subscribed_commands() {
        let mut ctx = EngineContext::default();
        let mut scene = Scene::new("title");
        let mut obj = SceneObject::create(ObjectKind::Object);
        obj.load_property("OnLoad", "x:50", &mut ctx);
        let id = scene.root_mut().add_child(obj);

        scene.start(&mut ctx);
        scene.update(0.0, &mut ctx);

        let x = scene
            .root_mut()
            .with_descendant_mut(id, |o| o.current_frame().pos.left);
        assert_eq!(x, Some(50.0));
    }

    #[test]
    fn fades_overlay_the_scene() {
        let mut ctx = EngineContext::default();
        let mut scene = Scene::new("result");
        scene.load_property("#FADEIN", "200", &mut ctx);
        scene.load_property("#FADEOUT", "100", &mut ctx);
        scene.start(&mut ctx);

        scene.update(50.0, &mut ctx);
        assert_eq!(scene.fade_alpha(), Some(0.75));
        let overlay = scene.render(&ctx).commands().last().cloned();
        assert_eq!(
            overlay,
            Some(RenderCommand::FillScreen {
                width: 640,
                height: 480,
                color: Color::new(0.0, 0.0, 0.0, 0.75)
            })
        );

        scene.update(200.0, &mut ctx);
        assert_eq!(scene.fade_alpha(), None);

        scene.finish(&mut ctx);
        scene.update(50.0, &mut ctx);
        assert_eq!(scene.fade_alpha(), Some(0.5));
        let delivered = scene.update(60.0, &mut ctx);
        assert_eq!(names(&delivered), vec![EVENT_SCENE_CHANGE]);
        assert_eq!(scene.fade_alpha(), Some(1.0));
    }

    #[test]
    fn fade_overlay_covers_the_configured_screen() {
        let mut config = crate::config::EngineConfig::default();
        config.render.width = 1280;
        config.render.height = 720;
        let ctx = EngineContext::new(config);
        let mut scene = Scene::new("result");
        scene.trigger_fade_out(100.0);

        match scene.render(&ctx).commands().last() {
            Some(RenderCommand::FillScreen { width, height, .. }) => {
                assert_eq!((*width, *height), (1280, 720));
            }
            other => panic!("expected a fade overlay, got {other:?}"),
        }
    }

    #[test]
    fn scheduled_events_fire_at_scene_time() {
        let mut ctx = EngineContext::default();
        let mut scene = Scene::new("play");
        scene.start(&mut ctx);
        scene.update(40.0, &mut ctx);
        scene.schedule_event("Late", 100.0);
        scene.schedule_event("Early", 50.0);

        let delivered = scene.update(20.0, &mut ctx);
        assert_eq!(names(&delivered), vec!["Early"]);
        assert_eq!(delivered[0].time_ms, Some(60.0));
        assert!(scene.update(20.0, &mut ctx).is_empty());
        assert_eq!(names(&scene.update(20.0, &mut ctx)), vec!["Late"]);
    }

    #[test]
    fn finishing_without_fade_changes_scene_at_once() {
        let mut ctx = EngineContext::default();
        let mut scene = Scene::new("result");
        scene.finish(&mut ctx);
        assert_eq!(names(&scene.update(0.0, &mut ctx)), vec![EVENT_SCENE_CHANGE]);
    }

    fn button_scene(ctx: &mut EngineContext) -> (Scene, ObjectId) {
        let mut scene = Scene::new("menu");
        let mut button = SceneObject::create(ObjectKind::Button);
        button.set_current_frame(crate::draw::DrawProperty {
            pos: Rect::from_xywh(10.0, 10.0, 50.0, 20.0),
            ..Default::default()
        });
        button.load_property("OnMouseOver", "opacity:0.5", ctx);
        button.load_property("OnMouseOut", "opacity:1", ctx);
        button.load_property("OnClick", "sendevent:Start", ctx);
        let id = scene.root_mut().add_child(button);
        (scene, id)
    }

    #[test]
    fn pointer_hover_and_click() {
        let mut ctx = EngineContext::default();
        let (mut scene, id) = button_scene(&mut ctx);
        scene.start(&mut ctx);
        scene.update(0.0, &mut ctx);

        scene.pointer_move(20.0, 15.0, &mut ctx);
        assert_eq!(ctx.focus.hovered(), Some(id));
        let alpha = |scene: &mut Scene| {
            scene
                .root_mut()
                .with_descendant_mut(id, |o| o.current_frame().color.a)
        };
        assert_eq!(alpha(&mut scene), Some(0.5));

        scene.pointer_down(20.0, 15.0, &mut ctx);
        assert_eq!(ctx.focus.focused(), Some(id));
        scene.pointer_up(21.0, 16.0, &mut ctx);
        assert_eq!(ctx.focus.dragging(), None);
        assert_eq!(names(&scene.update(16.0, &mut ctx)), vec!["Start"]);

        scene.pointer_move(200.0, 200.0, &mut ctx);
        assert_eq!(ctx.focus.hovered(), None);
        assert_eq!(alpha(&mut scene), Some(1.0));
    }

    #[test]
    fn input_is_ignored_before_the_start_time() {
        let mut ctx = EngineContext::default();
        let (mut scene, _) = button_scene(&mut ctx);
        scene.load_property("#STARTINPUT", "500", &mut ctx);
        scene.start(&mut ctx);

        scene.pointer_move(20.0, 15.0, &mut ctx);
        assert_eq!(ctx.focus.hovered(), None);

        scene.update(500.0, &mut ctx);
        scene.pointer_move(20.0, 15.0, &mut ctx);
        assert!(ctx.focus.hovered().is_some());
    }

    #[test]
    fn descriptions_load_from_json() {
        let json = r##"{
            "name": "demo",
            "properties": [["#FADEIN", "100"]],
            "resources": [
                {"type": "texture", "name": "bg", "info": {"handle": 1, "width": 64, "height": 64, "loaded": true}}
            ],
            "objects": [
                {
                    "kind": "sprite",
                    "properties": [["name", "background"], ["src", "bg"], ["pos", "0,0,64,64"]],
                    "children": [{"properties": [["name", "label"]]}]
                }
            ]
        }"##;
        let mut ctx = EngineContext::default();
        let desc = SceneDescription::from_json_str(json).unwrap();
        let scene = Scene::from_description(&desc, &mut ctx);

        assert_eq!(scene.theme().fade_in_ms, 100.0);
        assert!(scene.root().find_by_name("label").is_some());
        assert!(scene.resolve_resources(&ctx).is_ok());
        let images = scene
            .render(&ctx)
            .commands()
            .iter()
            .filter(|c| matches!(c, RenderCommand::DrawImage { .. }))
            .count();
        assert_eq!(images, 1);
    }
}
