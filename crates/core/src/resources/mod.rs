use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Result, RhythmusError};

/// Metrics of a texture produced by the image loader.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TextureInfo {
    /// Backend handle; opaque to the core.
    pub handle: u64,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub loaded: bool,
}

/// Glyph metrics of a font produced by the font rasteriser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontInfo {
    pub handle: u64,
    /// Line height in pixels.
    pub height: f32,
    /// Advance used for glyphs without an explicit entry.
    pub advance: f32,
    #[serde(default)]
    pub glyph_advances: HashMap<char, f32>,
    #[serde(default)]
    pub loaded: bool,
}

impl Default for FontInfo {
    fn default() -> Self {
        Self {
            handle: 0,
            height: 16.0,
            advance: 8.0,
            glyph_advances: HashMap::new(),
            loaded: false,
        }
    }
}

impl FontInfo {
    pub fn text_width(&self, text: &str) -> f32 {
        text.chars()
            .map(|c| self.glyph_advances.get(&c).copied().unwrap_or(self.advance))
            .sum()
    }
}

/// Resource state handed over by loader threads through a
/// [`crate::commit::CommitQueue`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResourceCommit {
    Texture { name: String, info: TextureInfo },
    Font { name: String, info: FontInfo },
    Unload { name: String },
}

/// Registry of drawable resources referenced by scene objects by name.
#[derive(Debug, Default)]
pub struct ResourceTable {
    textures: HashMap<String, TextureInfo>,
    fonts: HashMap<String, FontInfo>,
}

impl ResourceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_texture(&mut self, name: impl Into<String>, info: TextureInfo) {
        self.textures.insert(name.into(), info);
    }

    pub fn register_font(&mut self, name: impl Into<String>, info: FontInfo) {
        self.fonts.insert(name.into(), info);
    }

    pub fn apply(&mut self, commit: ResourceCommit) {
        match commit {
            ResourceCommit::Texture { name, info } => self.register_texture(name, info),
            ResourceCommit::Font { name, info } => self.register_font(name, info),
            ResourceCommit::Unload { name } => {
                self.textures.remove(&name);
                self.fonts.remove(&name);
            }
        }
    }

    pub fn texture(&self, name: &str) -> Option<&TextureInfo> {
        self.textures.get(name)
    }

    pub fn font(&self, name: &str) -> Option<&FontInfo> {
        self.fonts.get(name)
    }

    /// Loaded texture, or `None` while the loader is still working on it.
    pub fn ready_texture(&self, name: &str) -> Option<&TextureInfo> {
        self.texture(name).filter(|t| t.loaded)
    }

    pub fn ready_font(&self, name: &str) -> Option<&FontInfo> {
        self.font(name).filter(|f| f.loaded)
    }

    /// Checks that every name is known, loaded or not.
    pub fn resolve<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Result<()> {
        for name in names {
            if !self.textures.contains_key(name) && !self.fonts.contains_key(name) {
                return Err(RhythmusError::msg(format!(
                    "unknown resource `{name}` referenced by scene"
                )));
            }
        }
        Ok(())
    }
}
