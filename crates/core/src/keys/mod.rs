use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Value stored in a [`KeyStore`] cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl KeyValue {
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
            Self::Text(s) => !s.is_empty(),
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Bool(b) => f64::from(u8::from(*b)),
            Self::Int(i) => *i as f64,
            Self::Float(f) => *f,
            Self::Text(s) => s.trim().parse().unwrap_or(0.0),
        }
    }

    pub fn to_text(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

/// Shared game state cells (option flags, timers, numbers, strings) read by
/// scene objects through keys instead of raw pointers.
#[derive(Debug, Default, Clone)]
pub struct KeyStore {
    values: HashMap<String, KeyValue>,
}

impl KeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: KeyValue) {
        self.values.insert(key.into(), value);
    }

    pub fn set_bool(&mut self, key: impl Into<String>, value: bool) {
        self.set(key, KeyValue::Bool(value));
    }

    pub fn set_int(&mut self, key: impl Into<String>, value: i64) {
        self.set(key, KeyValue::Int(value));
    }

    pub fn set_float(&mut self, key: impl Into<String>, value: f64) {
        self.set(key, KeyValue::Float(value));
    }

    pub fn set_text(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.set(key, KeyValue::Text(value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&KeyValue> {
        self.values.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<KeyValue> {
        self.values.remove(key)
    }

    /// Missing keys read as false.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).map(KeyValue::is_truthy).unwrap_or(false)
    }

    pub fn number(&self, key: &str) -> f64 {
        self.get(key).map(KeyValue::as_f64).unwrap_or(0.0)
    }

    pub fn text(&self, key: &str) -> String {
        self.get(key).map(KeyValue::to_text).unwrap_or_default()
    }
}

/// Condition gating an object's visibility, resolved against the
/// [`KeyStore`] at render time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityFlag {
    pub key: String,
    pub negate: bool,
}

impl VisibilityFlag {
    pub fn new(key: impl Into<String>, negate: bool) -> Self {
        Self {
            key: key.into(),
            negate,
        }
    }

    /// Parses `key` or `!key`.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        match text.strip_prefix('!') {
            Some("") => None,
            Some(key) => Some(Self::new(key, true)),
            None if text.is_empty() => None,
            None => Some(Self::new(text, false)),
        }
    }

    /// LR2 option number: 0 is "always", negative numbers negate.
    pub fn from_lr2_op(op: i32) -> Option<Self> {
        match op {
            0 => None,
            op => Some(Self::new(format!("op{}", op.unsigned_abs()), op < 0)),
        }
    }

    /// LR2 timer number: 0 is the always-running scene timer.
    pub fn from_lr2_timer(timer: i32) -> Option<Self> {
        match timer {
            0 => None,
            timer => Some(Self::new(format!("timer{timer}"), false)),
        }
    }

    pub fn evaluate(&self, keys: &KeyStore) -> bool {
        keys.flag(&self.key) != self.negate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_are_false() {
        let keys = KeyStore::new();
        assert!(!keys.flag("op1"));
        assert_eq!(keys.number("score"), 0.0);
        assert_eq!(keys.text("S1"), "");
    }

    #[test]
    fn flags_follow_their_cells() {
        let mut keys = KeyStore::new();
        let flag = VisibilityFlag::from_lr2_op(-12).unwrap();
        assert!(flag.negate);
        assert!(flag.evaluate(&keys));

        keys.set_bool("op12", true);
        assert!(!flag.evaluate(&keys));

        // The owner of the cell going away only flips the flag back.
        keys.remove("op12");
        assert!(flag.evaluate(&keys));
    }

    #[test]
    fn zero_codes_mean_always_visible() {
        assert!(VisibilityFlag::from_lr2_op(0).is_none());
        assert!(VisibilityFlag::from_lr2_timer(0).is_none());
        assert_eq!(VisibilityFlag::parse("!panel1").map(|f| f.negate), Some(true));
    }
}
