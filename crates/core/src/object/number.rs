use super::kind::{DrawContext, ObjectBehavior};
use super::sprite::Sprite;
use super::text::{Text, TextAlign};
use crate::draw::Rect;
use crate::lr2::Fields;
use crate::render::DrawList;
use crate::resources::ResourceTable;

/// Formats `value` with a small printf subset: an optional leading `+`
/// (prints a plus sign for non-negative values), then `%d`, `%Nd`, `%0Nd`,
/// `%.Mf` or `%N.Mf`, with literal text allowed around the conversion.
pub fn format_number(format: &str, value: f64) -> String {
    let (plus, body) = match format.strip_prefix('+') {
        Some(rest) => (value >= 0.0, rest),
        None => (false, format),
    };
    let mut out = String::new();
    if plus {
        out.push('+');
    }

    let Some(start) = body.find('%') else {
        out.push_str(body);
        return out;
    };
    out.push_str(&body[..start]);
    let rest = &body[start + 1..];
    let Some(end) = rest.find(|c: char| c == 'd' || c == 'i' || c == 'f') else {
        out.push_str(&(value.trunc() as i64).to_string());
        return out;
    };

    let (width_text, precision) = match rest[..end].split_once('.') {
        Some((w, p)) => (w, p.parse::<usize>().unwrap_or(0)),
        None => (&rest[..end], 6),
    };
    let zero = width_text.starts_with('0');
    let width = width_text.trim_start_matches('0').parse::<usize>().unwrap_or(0);

    let number = match (&rest[end..end + 1], zero) {
        ("f", true) => format!("{value:0width$.precision$}"),
        ("f", false) => format!("{value:width$.precision$}"),
        (_, true) => format!("{:0width$}", value.trunc() as i64),
        (_, false) => format!("{:width$}", value.trunc() as i64),
    };
    out.push_str(&number);
    out.push_str(&rest[end + 1..]);
    out
}

/// Number value with an optional change tween and its formatted text.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberFormatter {
    format: String,
    target: f64,
    from: f64,
    display: f64,
    change_ms: f32,
    remaining_ms: f32,
    dirty: bool,
    text: String,
}

impl Default for NumberFormatter {
    fn default() -> Self {
        Self {
            format: "%d".to_string(),
            target: 0.0,
            from: 0.0,
            display: 0.0,
            change_ms: 0.0,
            remaining_ms: 0.0,
            dirty: true,
            text: String::new(),
        }
    }
}

impl NumberFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_number(&mut self, number: f64) {
        self.from = self.display;
        self.target = number;
        self.remaining_ms = self.change_ms;
        self.dirty = true;
    }

    pub fn set_format(&mut self, format: impl Into<String>) {
        self.format = format.into();
        self.dirty = true;
    }

    /// Duration over which the displayed value counts towards a new number.
    pub fn set_change_time(&mut self, ms: f32) {
        self.change_ms = ms.max(0.0);
    }

    /// Advances the change tween and reformats. Returns whether the text
    /// changed this tick.
    pub fn update(&mut self, delta: f32) -> bool {
        if !self.dirty {
            return false;
        }
        self.remaining_ms -= delta;
        if self.remaining_ms <= 0.0 || self.change_ms <= 0.0 {
            self.display = self.target;
            self.dirty = false;
        } else {
            let r = 1.0 - self.remaining_ms / self.change_ms;
            self.display = self.from + (self.target - self.from) * f64::from(r);
        }
        self.text = format_number(&self.format, self.display);
        true
    }

    pub fn number(&self) -> f64 {
        self.target
    }

    pub fn display(&self) -> f64 {
        self.display
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A number drawn either through a font or, when an image is set, through a
/// sheet of digit cells (`0`..`9`, blank).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Number {
    formatter: NumberFormatter,
    text: Text,
    digits: Sprite,
    digit_align: TextAlign,
}

impl Number {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn formatter(&self) -> &NumberFormatter {
        &self.formatter
    }

    pub fn text(&self) -> &Text {
        &self.text
    }

    /// `(null),image,sx,sy,sw,sh,divx,divy,cycle,timer,num,align,keta`.
    /// Returns the number slot the object reads from.
    pub fn load_lr2_src(&mut self, fields: &Fields) -> i32 {
        self.digits.load_lr2_src(fields);
        self.digit_align = match fields.int(11) {
            1 => TextAlign::Left,
            2 => TextAlign::Center,
            _ => TextAlign::Right,
        };
        let keta = fields.int(12);
        if keta > 0 {
            self.formatter.set_format(format!("%{keta}d"));
        }
        fields.int(10)
    }

    fn render_digits(&self, draw: &DrawContext<'_>, out: &mut DrawList) {
        let text = self.formatter.text();
        let cell_w = draw.local.width();
        let count = text.chars().count() as f32;
        let start = match self.digit_align {
            TextAlign::Left => draw.local.left,
            TextAlign::Center => draw.local.left + (cell_w - cell_w * count) / 2.0,
            TextAlign::Right => draw.local.right - cell_w * count,
        };
        for (i, c) in text.chars().enumerate() {
            let Some(digit) = c.to_digit(10) else {
                continue;
            };
            let left = start + cell_w * i as f32;
            let dst = Rect::from_xywh(left, draw.local.top, cell_w, draw.local.height());
            self.digits.draw_cell(draw, digit, dst, out);
        }
    }
}

impl ObjectBehavior for Number {
    fn update(&mut self, delta: f32, resources: &ResourceTable) {
        if self.formatter.update(delta) {
            let text = self.formatter.text().to_string();
            self.text.set_text(&text);
        }
        self.text.update(delta, resources);
    }

    fn render(&self, draw: &DrawContext<'_>, out: &mut DrawList) {
        if self.digits.image().is_some() {
            self.render_digits(draw, out);
        } else {
            self.text.render(draw, out);
        }
    }

    fn load_property(&mut self, key: &str, value: &str) -> bool {
        match key {
            "format" => self.formatter.set_format(value.trim()),
            "number" => {
                if let Ok(number) = crate::command::parse_number(value) {
                    self.formatter.set_number(number);
                }
            }
            "change" | "changetime" => {
                if let Ok(ms) = crate::command::parse_number(value) {
                    self.formatter.set_change_time(ms as f32);
                }
            }
            "path" | "src" | "image" | "crop" | "croptex" | "div" => {
                return self.digits.load_property(key, value)
            }
            _ => return self.text.load_property(key, value),
        }
        true
    }

    fn set_number(&mut self, number: f64) {
        self.formatter.set_number(number);
    }

    fn set_blend(&mut self, blend: i32) {
        self.digits.set_blend(blend);
    }

    fn resource_names(&self) -> Vec<&str> {
        let mut names = self.text.resource_names();
        names.extend(self.digits.resource_names());
        names
    }
}
