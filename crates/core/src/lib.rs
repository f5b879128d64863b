//! Core library of the Rhythmus scene engine.
//!
//! A scene is a tree of [`SceneObject`]s. Each object owns a queue of
//! keyframe [`Animation`]s, a table of event-bound command strings and an
//! optional drawable payload (sprite, text, number, ...). Per frame the host
//! calls [`Scene::update`] with the elapsed milliseconds and
//! [`Scene::render`] to get a renderer agnostic [`DrawList`]. All outside
//! state (event bus, key/value store, resources, focus) lives in an
//! [`EngineContext`] that is passed in explicitly.

pub mod animation;
pub mod command;
pub mod commit;
pub mod config;
pub mod context;
pub mod draw;
pub mod error;
pub mod event;
pub mod focus;
pub mod keys;
pub mod lr2;
pub mod object;
pub mod render;
pub mod resources;
pub mod scene;
pub mod timeline;

pub use animation::{Animation, AnimationFrame};
pub use command::{command_names, CommandArgs};
pub use commit::{CommitQueue, CommitSender};
pub use config::EngineConfig;
pub use context::EngineContext;
pub use draw::{Color, DrawProperty, EaseType, Rect, Vec2, Vec3};
pub use error::{Result, RhythmusError};
pub use event::{EventBus, EventMessage};
pub use focus::FocusTracker;
pub use keys::{KeyStore, KeyValue, VisibilityFlag};
pub use object::{ObjectId, ObjectKind, SceneObject};
pub use render::{DrawList, RenderCommand};
pub use resources::{FontInfo, ResourceCommit, ResourceTable, TextureInfo};
pub use scene::{ObjectDescription, Scene, SceneDescription, ThemeParameter};
pub use timeline::{EventQueue, SceneClock, ScheduledEvent};
