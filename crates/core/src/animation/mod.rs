//! Keyframe tweens.
//!
//! An [`Animation`] is one batch of keyframes with its own clock. Scene
//! objects keep a FIFO of them and hand leftover time from a finished batch
//! to the next one, see [`crate::object::SceneObject::update`].

use serde::{Deserialize, Serialize};

use crate::draw::{interpolate, DrawProperty, EaseType};

/// One keyframe. `time` is absolute milliseconds inside its animation and
/// `ease_type` shapes the segment that starts at this frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationFrame {
    pub draw_prop: DrawProperty,
    pub time: f32,
    pub ease_type: EaseType,
}

impl AnimationFrame {
    pub fn new(draw_prop: DrawProperty, time: f32, ease_type: EaseType) -> Self {
        Self {
            draw_prop,
            time,
            ease_type,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Animation {
    frames: Vec<AnimationFrame>,
    frame_time: f32,
    current_frame_index: Option<usize>,
    /// State of the owner when this animation first ran; the segment before
    /// `frames[0]` tweens away from it.
    origin: Option<DrawProperty>,
    /// Leave the owner untouched until `frames[0]` instead of tweening from
    /// `origin`.
    hold_lead_in: bool,
    repeat: bool,
    repeat_start_time: f32,
    paused: bool,
    finished: bool,
    command: Option<String>,
}

impl Animation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts an animation holding `draw_prop` at time zero.
    pub fn starting_at(draw_prop: DrawProperty, ease_type: EaseType) -> Self {
        let mut ani = Self::new();
        ani.add_frame(draw_prop, 0.0, ease_type);
        ani
    }

    /// Appends a keyframe. A frame whose time does not move past the current
    /// last frame replaces that frame instead of being appended.
    pub fn add_frame(&mut self, draw_prop: DrawProperty, time: f32, ease_type: EaseType) {
        let frame = AnimationFrame::new(draw_prop, time, ease_type);
        match self.frames.last_mut() {
            Some(last) if last.time >= time => *last = frame,
            _ => self.frames.push(frame),
        }
    }

    /// Holds the last state for `extra` more milliseconds.
    pub fn duplicate_frame(&mut self, extra: f32) {
        if let Some(last) = self.frames.last().copied() {
            self.add_frame(last.draw_prop, last.time + extra, last.ease_type);
        }
    }

    /// Advances the clock by up to `budget` milliseconds and writes the
    /// resolved state into `out`.
    ///
    /// On return `budget` holds the time this animation did not use: zero
    /// unless the animation just finished, in which case it is the overshoot
    /// past the last frame. The completion command is returned once, on the
    /// update that finishes the animation.
    pub fn update(&mut self, budget: &mut f32, out: &mut DrawProperty) -> Option<String> {
        if self.finished {
            return None;
        }
        let Some(last) = self.frames.last().copied() else {
            self.finished = true;
            return self.command.clone();
        };
        if self.origin.is_none() {
            self.origin = Some(*out);
        }
        if self.paused {
            *budget = 0.0;
            return None;
        }

        self.frame_time += *budget;

        if self.repeat {
            *budget = 0.0;
            let loop_span = last.time - self.repeat_start_time;
            if self.frame_time > last.time {
                self.frame_time = if loop_span <= 0.0 {
                    last.time
                } else {
                    self.repeat_start_time + (self.frame_time - last.time) % loop_span
                };
            }
            self.resolve(out);
            return None;
        }

        if self.frame_time >= last.time {
            *budget = self.frame_time - last.time;
            self.frame_time = last.time;
            self.current_frame_index = Some(self.frames.len() - 1);
            *out = last.draw_prop;
            self.finished = true;
            return self.command.clone();
        }

        *budget = 0.0;
        self.resolve(out);
        None
    }

    fn resolve(&mut self, out: &mut DrawProperty) {
        let index = self
            .frames
            .iter()
            .rposition(|frame| self.frame_time >= frame.time);
        self.current_frame_index = index;

        match index {
            None if self.hold_lead_in => {}
            None => {
                let first = &self.frames[0];
                if let Some(origin) = self.origin {
                    if first.time > 0.0 {
                        let r = self.frame_time / first.time;
                        *out = interpolate(&origin, &first.draw_prop, r, first.ease_type);
                    }
                }
            }
            Some(i) if i + 1 < self.frames.len() => {
                let from = &self.frames[i];
                let to = &self.frames[i + 1];
                let span = to.time - from.time;
                let r = if span > 0.0 {
                    (self.frame_time - from.time) / span
                } else {
                    1.0
                };
                *out = interpolate(&from.draw_prop, &to.draw_prop, r, from.ease_type);
            }
            Some(i) => *out = self.frames[i].draw_prop,
        }
    }

    /// Rewinds to the beginning, clearing the pause and finished states.
    pub fn replay(&mut self) {
        self.frame_time = 0.0;
        self.current_frame_index = None;
        self.paused = false;
        self.finished = false;
    }

    /// Jumps to the final frame. The next update finishes the animation and
    /// hands its whole budget onwards.
    pub fn hurry_tween(&mut self) {
        if let Some(last) = self.frames.last() {
            self.repeat = false;
            self.paused = false;
            self.frame_time = last.time;
            self.current_frame_index = Some(self.frames.len() - 1);
        }
    }

    /// Makes the time before the first keyframe a no-op for the owner.
    pub fn hold_until_first_frame(&mut self) {
        self.hold_lead_in = true;
    }

    pub fn set_loop(&mut self, start_time: f32) {
        self.repeat = true;
        self.repeat_start_time = start_time;
    }

    pub fn delete_loop(&mut self) {
        self.repeat = false;
        self.repeat_start_time = 0.0;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn set_command(&mut self, command: impl Into<String>) {
        self.command = Some(command.into());
    }

    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }

    pub fn frames(&self) -> &[AnimationFrame] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&AnimationFrame> {
        self.frames.last()
    }

    pub fn last_frame_mut(&mut self) -> Option<&mut AnimationFrame> {
        self.frames.last_mut()
    }

    /// Time of the last keyframe.
    pub fn duration(&self) -> f32 {
        self.frames.last().map(|f| f.time).unwrap_or(0.0)
    }

    pub fn frame_time(&self) -> f32 {
        self.frame_time
    }

    pub fn current_frame_index(&self) -> Option<usize> {
        self.current_frame_index
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_repeating(&self) -> bool {
        self.repeat
    }

    pub fn repeat_start_time(&self) -> f32 {
        self.repeat_start_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::Rect;

    fn at_x(x: f32) -> DrawProperty {
        DrawProperty {
            pos: Rect::from_xywh(x, 0.0, 10.0, 10.0),
            ..DrawProperty::default()
        }
    }

    #[test]
    fn increasing_times_append() {
        let mut ani = Animation::new();
        ani.add_frame(at_x(0.0), 0.0, EaseType::Linear);
        ani.add_frame(at_x(1.0), 10.0, EaseType::Linear);
        ani.add_frame(at_x(2.0), 20.0, EaseType::Linear);
        assert_eq!(ani.frames().len(), 3);
    }

    #[test]
    fn non_increasing_time_overwrites_last_frame() {
        let mut ani = Animation::new();
        ani.add_frame(at_x(0.0), 0.0, EaseType::Linear);
        ani.add_frame(at_x(1.0), 0.0, EaseType::Out);
        assert_eq!(ani.frames().len(), 1);
        assert_eq!(ani.frames()[0].draw_prop, at_x(1.0));

        ani.add_frame(at_x(2.0), 100.0, EaseType::Linear);
        ani.add_frame(at_x(3.0), 50.0, EaseType::Linear);
        assert_eq!(ani.frames().len(), 2);
        assert_eq!(ani.frames()[1].time, 50.0);
        assert_eq!(ani.frames()[1].draw_prop, at_x(3.0));
    }

    #[test]
    fn duplicate_frame_holds_the_last_state() {
        let mut ani = Animation::starting_at(at_x(5.0), EaseType::Linear);
        ani.duplicate_frame(300.0);
        assert_eq!(ani.frames().len(), 2);
        assert_eq!(ani.frames()[1].time, 300.0);
        assert_eq!(ani.frames()[1].draw_prop, at_x(5.0));
    }

    #[test]
    fn interpolates_between_frames() {
        let mut ani = Animation::new();
        ani.add_frame(at_x(0.0), 0.0, EaseType::Linear);
        ani.add_frame(at_x(100.0), 200.0, EaseType::Linear);

        let mut out = DrawProperty::default();
        let mut budget = 50.0;
        assert!(ani.update(&mut budget, &mut out).is_none());
        assert_eq!(budget, 0.0);
        assert!((out.pos.left - 25.0).abs() < 1e-4);
        assert_eq!(ani.current_frame_index(), Some(0));
    }

    #[test]
    fn finishing_returns_leftover_and_command() {
        let mut ani = Animation::new();
        ani.add_frame(at_x(0.0), 0.0, EaseType::Linear);
        ani.add_frame(at_x(100.0), 100.0, EaseType::Linear);
        ani.set_command("Done");

        let mut out = DrawProperty::default();
        let mut budget = 130.0;
        let fired = ani.update(&mut budget, &mut out);
        assert_eq!(fired.as_deref(), Some("Done"));
        assert!(ani.is_finished());
        assert!((budget - 30.0).abs() < 1e-4);
        assert_eq!(out, at_x(100.0));

        let mut again = 10.0;
        assert!(ani.update(&mut again, &mut out).is_none());
        assert_eq!(again, 10.0);
    }

    #[test]
    fn repeat_wraps_into_the_loop_window() {
        let mut ani = Animation::new();
        ani.add_frame(at_x(0.0), 0.0, EaseType::Linear);
        ani.add_frame(at_x(1000.0), 1000.0, EaseType::Linear);
        ani.set_loop(200.0);

        let mut out = DrawProperty::default();
        let mut budget = 1300.0;
        assert!(ani.update(&mut budget, &mut out).is_none());
        assert_eq!(budget, 0.0);
        assert!((ani.frame_time() - 500.0).abs() < 1e-3);
        assert!((out.pos.left - 500.0).abs() < 1e-2);
        assert!(!ani.is_finished());
    }

    #[test]
    fn degenerate_loop_clamps_to_the_end() {
        let mut ani = Animation::new();
        ani.add_frame(at_x(0.0), 0.0, EaseType::Linear);
        ani.add_frame(at_x(10.0), 100.0, EaseType::Linear);
        ani.set_loop(100.0);

        let mut out = DrawProperty::default();
        let mut budget = 250.0;
        ani.update(&mut budget, &mut out);
        assert_eq!(ani.frame_time(), 100.0);
        assert_eq!(out, at_x(10.0));
        assert!(!ani.is_finished());
    }

    #[test]
    fn leading_segment_tweens_from_the_origin() {
        let mut ani = Animation::new();
        ani.add_frame(at_x(100.0), 50.0, EaseType::Linear);

        let mut out = at_x(0.0);
        let mut budget = 20.0;
        ani.update(&mut budget, &mut out);
        assert_eq!(budget, 0.0);
        assert_eq!(ani.current_frame_index(), None);
        assert!((out.pos.left - 40.0).abs() < 1e-4);
    }

    #[test]
    fn held_lead_in_leaves_the_owner_alone() {
        let mut ani = Animation::new();
        ani.add_frame(at_x(100.0), 1000.0, EaseType::Linear);
        ani.hold_until_first_frame();

        let mut out = at_x(0.0);
        let mut budget = 500.0;
        ani.update(&mut budget, &mut out);
        assert_eq!(out, at_x(0.0));

        let mut budget = 500.0;
        ani.update(&mut budget, &mut out);
        assert_eq!(out, at_x(100.0));
        assert!(ani.is_finished());
    }

    #[test]
    fn paused_animation_swallows_time() {
        let mut ani = Animation::new();
        ani.add_frame(at_x(0.0), 0.0, EaseType::Linear);
        ani.add_frame(at_x(100.0), 100.0, EaseType::Linear);
        ani.pause();

        let mut out = DrawProperty::default();
        let mut budget = 500.0;
        ani.update(&mut budget, &mut out);
        assert_eq!(budget, 0.0);
        assert_eq!(ani.frame_time(), 0.0);
        assert!(!ani.is_finished());
    }

    #[test]
    fn replay_and_hurry_control_the_clock() {
        let mut ani = Animation::new();
        ani.add_frame(at_x(0.0), 0.0, EaseType::Linear);
        ani.add_frame(at_x(100.0), 100.0, EaseType::Linear);
        ani.set_loop(0.0);
        ani.hurry_tween();
        assert!(!ani.is_repeating());

        let mut out = DrawProperty::default();
        let mut budget = 16.0;
        ani.update(&mut budget, &mut out);
        assert!(ani.is_finished());
        assert_eq!(budget, 16.0);

        ani.replay();
        assert!(!ani.is_finished());
        assert_eq!(ani.frame_time(), 0.0);
    }

    #[test]
    fn empty_animation_finishes_without_using_time() {
        let mut ani = Animation::new();
        let mut out = DrawProperty::default();
        let mut budget = 40.0;
        ani.update(&mut budget, &mut out);
        assert!(ani.is_finished());
        assert_eq!(budget, 40.0);
    }
}
