//! The skin command language.
//!
//! A command batch is text like `x:10;time:500;x:200`. Each `name:value`
//! pair is looked up in a process-wide table and run against one
//! [`SceneObject`]. Unknown names are ignored and a failing command only
//! skips itself, never the rest of the batch.

mod handlers;

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::context::EngineContext;
use crate::draw::EaseType;
use crate::object::SceneObject;
use crate::{Result, RhythmusError};

/// Handler signature shared by every command.
pub type CommandFn = fn(&mut SceneObject, &CommandArgs, &mut EngineContext) -> Result<()>;

/// Typed, bounds-checked access to the comma separated value of a command.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandArgs {
    command: String,
    raw: String,
    values: Vec<String>,
}

impl CommandArgs {
    pub fn parse(command: impl Into<String>, raw: &str) -> Self {
        let raw = raw.trim();
        let values = if raw.is_empty() {
            Vec::new()
        } else {
            raw.split(',').map(|v| v.trim().to_string()).collect()
        };
        Self {
            command: command.into(),
            raw: raw.to_string(),
            values,
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Unsplit value, for commands whose argument may contain commas.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get<T: FromArg>(&self, index: usize) -> Result<T> {
        let text = self
            .values
            .get(index)
            .ok_or_else(|| RhythmusError::MissingArgument {
                command: self.command.clone(),
                index,
            })?;
        T::from_arg(text)
    }

    /// Like [`CommandArgs::get`] but an absent argument yields `default`.
    pub fn get_or<T: FromArg>(&self, index: usize, default: T) -> Result<T> {
        match self.values.get(index) {
            Some(text) => T::from_arg(text),
            None => Ok(default),
        }
    }
}

/// Conversion from one positional argument.
pub trait FromArg: Sized {
    fn from_arg(text: &str) -> Result<Self>;
}

impl FromArg for f64 {
    fn from_arg(text: &str) -> Result<Self> {
        parse_number(text)
    }
}

impl FromArg for f32 {
    fn from_arg(text: &str) -> Result<Self> {
        parse_number(text).map(|v| v as f32)
    }
}

impl FromArg for i32 {
    fn from_arg(text: &str) -> Result<Self> {
        parse_number(text).map(|v| v as i32)
    }
}

impl FromArg for String {
    fn from_arg(text: &str) -> Result<Self> {
        Ok(text.to_string())
    }
}

impl FromArg for bool {
    fn from_arg(text: &str) -> Result<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" => Ok(true),
            "false" | "no" | "off" => Ok(false),
            other => parse_number(other).map(|v| v != 0.0),
        }
    }
}

impl FromArg for EaseType {
    fn from_arg(text: &str) -> Result<Self> {
        text.parse().map_err(|_| RhythmusError::InvalidNumber {
            text: text.to_string(),
        })
    }
}

/// atoi-style number parsing: surrounding whitespace is ignored, empty text
/// reads as zero and trailing garbage after a numeric prefix is dropped.
/// Text without any numeric prefix is an error.
pub fn parse_number(text: &str) -> Result<f64> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(0.0);
    }

    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let mut digits = 0;
    let mut seen_dot = false;
    while let Some(&b) = bytes.get(end) {
        match b {
            b'0'..=b'9' => digits += 1,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }

    if digits == 0 {
        return Err(RhythmusError::InvalidNumber {
            text: text.to_string(),
        });
    }
    text[..end]
        .trim_end_matches('.')
        .parse()
        .map_err(|_| RhythmusError::InvalidNumber {
            text: text.to_string(),
        })
}

/// One parsed `name:value` pair of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub name: String,
    pub args: CommandArgs,
}

/// Splits a batch on `;` and each entry on its first `:`. Names are
/// lowercased; empty entries are dropped.
pub fn parse_batch(text: &str) -> Vec<Instruction> {
    text.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (name, value) = entry.split_once(':').unwrap_or((entry, ""));
            let name = name.trim().to_ascii_lowercase();
            Instruction {
                args: CommandArgs::parse(name.clone(), value),
                name,
            }
        })
        .collect()
}

pub fn command_table() -> &'static HashMap<&'static str, CommandFn> {
    static TABLE: OnceLock<HashMap<&'static str, CommandFn>> = OnceLock::new();
    TABLE.get_or_init(handlers::build_table)
}

pub fn lookup(name: &str) -> Option<CommandFn> {
    command_table().get(name).copied()
}

/// Registered command names, sorted.
pub fn command_names() -> Vec<&'static str> {
    let mut names: Vec<_> = command_table().keys().copied().collect();
    names.sort_unstable();
    names
}

/// Runs a whole batch against `object`.
pub fn run_batch(object: &mut SceneObject, text: &str, ctx: &mut EngineContext) {
    for instruction in parse_batch(text) {
        run_instruction(object, &instruction, ctx);
    }
}

/// Runs a single instruction, logging instead of propagating failures.
pub fn run_instruction(object: &mut SceneObject, instruction: &Instruction, ctx: &mut EngineContext) {
    let Some(handler) = lookup(&instruction.name) else {
        tracing::debug!(
            object = object.name(),
            command = %instruction.name,
            "unknown command ignored"
        );
        return;
    };
    if let Err(err) = handler(object, &instruction.args, ctx) {
        tracing::warn!(
            object = object.name(),
            command = %instruction.name,
            value = instruction.args.raw(),
            %err,
            "command skipped"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batches_split_on_semicolon_and_first_colon() {
        let batch = parse_batch(" X:10 ; text:a:b;; hide ");
        let names: Vec<_> = batch.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["x", "text", "hide"]);
        assert_eq!(batch[1].args.raw(), "a:b");
        assert!(batch[2].args.is_empty());
    }

    #[test]
    fn missing_arguments_are_reported() {
        let args = CommandArgs::parse("pos", "10");
        assert_eq!(args.get::<i32>(0).unwrap(), 10);
        assert!(matches!(
            args.get::<i32>(1),
            Err(RhythmusError::MissingArgument { index: 1, .. })
        ));
        assert_eq!(args.get_or::<f32>(1, 4.0).unwrap(), 4.0);
    }

    #[test]
    fn numbers_parse_like_atoi() {
        assert_eq!(parse_number("").unwrap(), 0.0);
        assert_eq!(parse_number(" 12px").unwrap(), 12.0);
        assert_eq!(parse_number("-3.5e").unwrap(), -3.5);
        assert_eq!(parse_number("7.").unwrap(), 7.0);
        assert!(parse_number("hello").is_err());
        assert!(parse_number("-").is_err());
    }

    #[test]
    fn typed_arguments() {
        let args = CommandArgs::parse("acc", "easein,1,off");
        assert_eq!(args.get::<EaseType>(0).unwrap(), EaseType::In);
        assert!(args.get::<bool>(1).unwrap());
        assert!(!args.get::<bool>(2).unwrap());
        assert!(CommandArgs::parse("acc", "bogus").get::<EaseType>(0).is_err());
    }

    #[test]
    fn table_knows_the_core_commands() {
        for name in ["x", "scale", "opacity", "acc", "time", "loop", "repeat", "show", "hide", "replay", "pause"] {
            assert!(lookup(name).is_some(), "{name}");
        }
        assert!(lookup("wobble").is_none());
    }
}
