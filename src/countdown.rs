use std::time::{Duration, Instant};

use crate::render::Rgba;
use crate::surface::{Region, Surface};

pub const INITIAL_SECONDS: u32 = 5;
pub const CLICK_STEP: u32 = 5;
pub const FLOOR_SECONDS: u32 = 1;
pub const TARGET_FPS: u32 = 60;

const BUTTON_WIDTH: f32 = 200.0;
const BUTTON_HEIGHT: f32 = 80.0;
const BUTTON_TOP: f32 = 100.0;
const BUTTON_MARGIN: f32 = 100.0;

const DIGIT_SIZE: f32 = 200.0;
const LABEL_SIZE: f32 = 40.0;
const LABEL_INSET: f32 = 20.0;
const OUTLINE_THICKNESS: f32 = 2.0;

// Monospace advance width as a fraction of the font size, used to center the
// digits without a measuring pass.
const GLYPH_ADVANCE: f32 = 0.6;

const BACKGROUND: Rgba = Rgba::rgb(253, 249, 0);
const DIGIT_COLOR: Rgba = Rgba::rgb(230, 41, 55);
const ADD_COLOR: Rgba = Rgba::rgb(0, 228, 48);
const SUB_COLOR: Rgba = Rgba::rgb(230, 41, 55);
const OUTLINE_COLOR: Rgba = Rgba::BLACK;
const LABEL_COLOR: Rgba = Rgba::BLACK;

/// Loop state. `Terminated` is terminal; there is no way back to `Running`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Terminated,
}

/// Button geometry, fixed once the window size is known.
///
/// The add button sits at the top-right, subtract at the top-left. The two
/// never overlap for any window wide enough to hold them; if they ever did,
/// add wins the hit test (see [`Countdown::apply_click`]).
#[derive(Clone, Copy, Debug)]
pub struct Layout {
    pub add: Region,
    pub subtract: Region,
    width: f32,
    height: f32,
}

impl Layout {
    pub fn new(width: u32, height: u32) -> Self {
        let w = width as f32;
        let h = height as f32;
        let add = Region::new(
            w - BUTTON_MARGIN - BUTTON_WIDTH,
            BUTTON_TOP,
            BUTTON_WIDTH,
            BUTTON_HEIGHT,
        );
        let subtract = Region::new(BUTTON_MARGIN, BUTTON_TOP, BUTTON_WIDTH, BUTTON_HEIGHT);
        Self {
            add,
            subtract,
            width: w,
            height: h,
        }
    }
}

/// The countdown loop controller: owns the remaining-seconds counter, the
/// tick timestamp and the button layout, and drives one frame at a time.
pub struct Countdown {
    remaining: u32,
    last_tick: Duration,
    state: LoopState,
    layout: Layout,
}

impl Countdown {
    pub fn new(layout: Layout, initial_seconds: u32, now: Duration) -> Self {
        Self {
            remaining: initial_seconds,
            last_tick: now,
            state: LoopState::Running,
            layout,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Decrement once per elapsed whole second. The tick timestamp resets to
    /// `now`, so drift never accumulates across ticks.
    fn tick(&mut self, now: Duration) {
        if now.saturating_sub(self.last_tick) >= Duration::from_secs(1) {
            self.remaining = self.remaining.saturating_sub(1);
            self.last_tick = now;
        }
        if self.remaining == 0 {
            self.state = LoopState::Terminated;
        }
    }

    /// A click lands on at most one button per frame; add takes priority
    /// over subtract when both regions match.
    fn apply_click(&mut self, x: f32, y: f32) {
        if self.layout.add.contains(x, y) {
            self.remaining += CLICK_STEP;
        } else if self.layout.subtract.contains(x, y) {
            self.remaining = self.remaining.saturating_sub(CLICK_STEP).max(FLOOR_SECONDS);
        }
    }

    /// Run one loop iteration at monotonic time `now`.
    ///
    /// The frame that observes the counter hitting zero terminates without
    /// issuing any draw calls; the last rendered frame is the one showing 1.
    pub fn frame<S: Surface>(&mut self, now: Duration, surface: &mut S) -> LoopState {
        if self.state == LoopState::Terminated {
            return self.state;
        }

        self.tick(now);
        if self.state == LoopState::Terminated {
            return self.state;
        }

        let (px, py) = surface.pointer_position();
        if surface.primary_button_just_pressed() {
            self.apply_click(px, py);
        }

        self.draw(surface);
        self.state
    }

    fn draw<S: Surface>(&self, surface: &mut S) {
        surface.begin_frame();
        surface.clear(BACKGROUND);

        let digits = self.remaining.to_string();
        let text_width = digits.len() as f32 * GLYPH_ADVANCE * DIGIT_SIZE;
        surface.draw_text(
            &digits,
            self.layout.width / 2.0 - text_width / 2.0,
            self.layout.height / 2.0 - DIGIT_SIZE / 2.0,
            DIGIT_SIZE,
            DIGIT_COLOR,
        );

        self.draw_button(surface, self.layout.add, ADD_COLOR, "+5 sec");
        self.draw_button(surface, self.layout.subtract, SUB_COLOR, "-5 sec");

        surface.end_frame();
    }

    fn draw_button<S: Surface>(&self, surface: &mut S, region: Region, fill: Rgba, label: &str) {
        surface.fill_region(region, fill);
        surface.outline_region(region, OUTLINE_THICKNESS, OUTLINE_COLOR);
        surface.draw_text(
            label,
            region.x + LABEL_INSET,
            region.y + LABEL_INSET,
            LABEL_SIZE,
            LABEL_COLOR,
        );
    }
}

/// Drive the countdown loop to completion on `surface`.
///
/// Returns when the counter runs out or the surface reports a close request.
pub fn run<S: Surface>(surface: &mut S) {
    surface.set_target_frame_rate(TARGET_FPS);

    let (width, height) = surface.size();
    let mut countdown = Countdown::new(Layout::new(width, height), INITIAL_SECONDS, Duration::ZERO);
    log::info!("countdown started: {INITIAL_SECONDS}s, surface {width}x{height}");

    let start = Instant::now();
    while !surface.should_close() {
        if countdown.frame(start.elapsed(), surface) == LoopState::Terminated {
            log::info!("countdown reached zero");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    enum Call {
        BeginFrame,
        EndFrame,
        Clear(Rgba),
        Text(String, f32, f32),
        Fill(Region),
        Outline(Region),
    }

    struct FakeSurface {
        width: u32,
        height: u32,
        pointer: (f32, f32),
        pressed: bool,
        close: bool,
        fps: Option<u32>,
        calls: Vec<Call>,
    }

    impl FakeSurface {
        fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                pointer: (0.0, 0.0),
                pressed: false,
                close: false,
                fps: None,
                calls: Vec::new(),
            }
        }

        fn frames(&self) -> usize {
            self.calls.iter().filter(|c| **c == Call::EndFrame).count()
        }
    }

    impl Surface for FakeSurface {
        fn size(&self) -> (u32, u32) {
            (self.width, self.height)
        }

        fn should_close(&mut self) -> bool {
            self.close
        }

        fn begin_frame(&mut self) {
            self.calls.push(Call::BeginFrame);
        }

        fn end_frame(&mut self) {
            self.calls.push(Call::EndFrame);
        }

        fn clear(&mut self, color: Rgba) {
            self.calls.push(Call::Clear(color));
        }

        fn draw_text(&mut self, text: &str, x: f32, y: f32, _size: f32, _color: Rgba) {
            self.calls.push(Call::Text(text.to_string(), x, y));
        }

        fn fill_region(&mut self, region: Region, _color: Rgba) {
            self.calls.push(Call::Fill(region));
        }

        fn outline_region(&mut self, region: Region, _thickness: f32, _color: Rgba) {
            self.calls.push(Call::Outline(region));
        }

        fn pointer_position(&self) -> (f32, f32) {
            self.pointer
        }

        fn primary_button_just_pressed(&self) -> bool {
            self.pressed
        }

        fn set_target_frame_rate(&mut self, fps: u32) {
            self.fps = Some(fps);
        }
    }

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    fn center(region: Region) -> (f32, f32) {
        (region.x + region.width / 2.0, region.y + region.height / 2.0)
    }

    fn new_countdown() -> (Countdown, FakeSurface) {
        let surface = FakeSurface::new(2160, 1080);
        let countdown = Countdown::new(Layout::new(2160, 1080), 5, Duration::ZERO);
        (countdown, surface)
    }

    #[test]
    fn test_decrements_once_per_whole_second() {
        let (mut countdown, mut surface) = new_countdown();
        // 60 fps for just under a second: no tick yet
        for i in 1..60 {
            countdown.frame(secs(i as f64 / 60.0), &mut surface);
        }
        assert_eq!(countdown.remaining(), 5);
        // crossing the 1s boundary ticks exactly once
        countdown.frame(secs(1.0), &mut surface);
        assert_eq!(countdown.remaining(), 4);
        countdown.frame(secs(1.5), &mut surface);
        assert_eq!(countdown.remaining(), 4);
        countdown.frame(secs(2.0), &mut surface);
        assert_eq!(countdown.remaining(), 3);
    }

    #[test]
    fn test_tick_cadence_is_frame_rate_independent() {
        // The same 3.5s of wall clock at 30 and at 240 fps must produce the
        // same decrement count, and each decrement lands within one frame of
        // the same wall-clock instant.
        let mut ticks_30 = Vec::new();
        let mut ticks_240 = Vec::new();

        for (fps, ticks) in [(30u32, &mut ticks_30), (240u32, &mut ticks_240)] {
            let mut surface = FakeSurface::new(2160, 1080);
            let mut countdown = Countdown::new(Layout::new(2160, 1080), 5, Duration::ZERO);
            let dt = 1.0 / fps as f64;
            let mut prev = countdown.remaining();
            let mut frame = 0u32;
            while (frame as f64) * dt <= 3.5 {
                let now = secs(frame as f64 * dt);
                countdown.frame(now, &mut surface);
                if countdown.remaining() != prev {
                    prev = countdown.remaining();
                    ticks.push(now);
                }
                frame += 1;
            }
        }

        assert_eq!(ticks_30.len(), 3);
        assert_eq!(ticks_240.len(), 3);
        for (a, b) in ticks_30.iter().zip(ticks_240.iter()) {
            let delta = a.abs_diff(*b);
            assert!(delta <= secs(1.0 / 30.0 + 1e-9), "tick instants diverged by {delta:?}");
        }
    }

    #[test]
    fn test_add_click_adds_five() {
        let (mut countdown, mut surface) = new_countdown();
        surface.pointer = center(Layout::new(2160, 1080).add);
        surface.pressed = true;
        countdown.frame(secs(0.1), &mut surface);
        assert_eq!(countdown.remaining(), 10);
        assert_eq!(countdown.state(), LoopState::Running);
    }

    #[test]
    fn test_subtract_click_clamps_at_one() {
        let layout = Layout::new(2160, 1080);
        let mut surface = FakeSurface::new(2160, 1080);
        let mut countdown = Countdown::new(layout, 3, Duration::ZERO);
        surface.pointer = center(layout.subtract);
        surface.pressed = true;
        countdown.frame(secs(0.1), &mut surface);
        assert_eq!(countdown.remaining(), 1);
    }

    #[test]
    fn test_remaining_never_below_one_while_running() {
        let layout = Layout::new(2160, 1080);
        let mut surface = FakeSurface::new(2160, 1080);
        let mut countdown = Countdown::new(layout, 5, Duration::ZERO);
        surface.pointer = center(layout.subtract);
        surface.pressed = true;
        for i in 0..10 {
            countdown.frame(secs(0.01 * i as f64), &mut surface);
            assert_eq!(countdown.state(), LoopState::Running);
            assert!(countdown.remaining() >= 1);
        }
        assert_eq!(countdown.remaining(), 1);
    }

    #[test]
    fn test_held_press_fires_once() {
        // Edge semantics live in the surface: pressed is reported true for a
        // single frame even if the physical button stays down.
        let (mut countdown, mut surface) = new_countdown();
        surface.pointer = center(Layout::new(2160, 1080).add);
        surface.pressed = true;
        countdown.frame(secs(0.1), &mut surface);
        surface.pressed = false; // held, no new edge
        countdown.frame(secs(0.2), &mut surface);
        countdown.frame(secs(0.3), &mut surface);
        assert_eq!(countdown.remaining(), 10);
    }

    #[test]
    fn test_add_wins_when_regions_overlap() {
        // Defined tie-break, not an accident of the default geometry.
        let overlapping = Layout {
            add: Region::new(100.0, 100.0, 200.0, 80.0),
            subtract: Region::new(100.0, 100.0, 200.0, 80.0),
            width: 800.0,
            height: 600.0,
        };
        let mut surface = FakeSurface::new(800, 600);
        let mut countdown = Countdown::new(overlapping, 5, Duration::ZERO);
        surface.pointer = (150.0, 120.0);
        surface.pressed = true;
        countdown.frame(secs(0.1), &mut surface);
        assert_eq!(countdown.remaining(), 10);
    }

    #[test]
    fn test_click_outside_both_regions_is_ignored() {
        let (mut countdown, mut surface) = new_countdown();
        surface.pointer = (1080.0, 900.0);
        surface.pressed = true;
        countdown.frame(secs(0.1), &mut surface);
        assert_eq!(countdown.remaining(), 5);
    }

    #[test]
    fn test_natural_expiry_terminates_without_terminal_draw() {
        let (mut countdown, mut surface) = new_countdown();
        let mut t = 0.0;
        while countdown.state() == LoopState::Running {
            countdown.frame(secs(t), &mut surface);
            t += 1.0 / 60.0;
            assert!(t < 6.0, "countdown failed to expire");
        }
        // 5 rendered seconds: frames drawn up to and including remaining == 1,
        // then the terminal frame draws nothing.
        let frames_before = surface.frames();
        countdown.frame(secs(t), &mut surface);
        countdown.frame(secs(t + 1.0), &mut surface);
        assert_eq!(countdown.state(), LoopState::Terminated);
        assert_eq!(surface.frames(), frames_before);
    }

    #[test]
    fn test_add_click_midway_extends_countdown() {
        let (mut countdown, mut surface) = new_countdown();
        surface.pointer = center(Layout::new(2160, 1080).add);

        let dt: f64 = 1.0 / 60.0;
        let mut t: f64 = 0.0;
        let mut frame = 0u32;
        while countdown.state() == LoopState::Running && t < 20.0 {
            surface.pressed = (t - 0.5).abs() < dt / 2.0; // single click at t=0.5s
            countdown.frame(secs(t), &mut surface);
            if surface.pressed {
                assert_eq!(countdown.remaining(), 10);
            }
            frame += 1;
            t = frame as f64 * dt;
        }
        // Ticks stay on the whole-second boundaries from t=0, so ten more
        // seconds run out at t=10.
        assert_eq!(countdown.state(), LoopState::Terminated);
        assert!((t - 10.0).abs() < 0.1, "expired at t={t}");
    }

    #[test]
    fn test_draw_order_and_content() {
        let (mut countdown, mut surface) = new_countdown();
        countdown.frame(secs(0.1), &mut surface);

        assert_eq!(surface.calls.first(), Some(&Call::BeginFrame));
        assert_eq!(surface.calls.get(1), Some(&Call::Clear(BACKGROUND)));
        assert_eq!(surface.calls.last(), Some(&Call::EndFrame));

        let layout = Layout::new(2160, 1080);
        assert!(surface.calls.contains(&Call::Fill(layout.add)));
        assert!(surface.calls.contains(&Call::Outline(layout.add)));
        assert!(surface.calls.contains(&Call::Fill(layout.subtract)));
        assert!(surface.calls.contains(&Call::Outline(layout.subtract)));

        let texts: Vec<&str> = surface
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Text(s, _, _) => Some(s.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["5", "+5 sec", "-5 sec"]);
    }

    #[test]
    fn test_digits_centered_horizontally() {
        let (mut countdown, mut surface) = new_countdown();
        countdown.frame(secs(0.1), &mut surface);

        let Some(Call::Text(_, x, _)) = surface
            .calls
            .iter()
            .find(|c| matches!(c, Call::Text(s, _, _) if s == "5"))
        else {
            panic!("digits not drawn");
        };
        let expected = 2160.0 / 2.0 - (1.0 * GLYPH_ADVANCE * DIGIT_SIZE) / 2.0;
        assert!((x - expected).abs() < f32::EPSILON);
    }

    #[test]
    fn test_layout_derives_from_window_size() {
        let layout = Layout::new(1920, 1080);
        assert_eq!(layout.subtract, Region::new(100.0, 100.0, 200.0, 80.0));
        assert_eq!(layout.add, Region::new(1620.0, 100.0, 200.0, 80.0));
    }

    #[test]
    fn test_run_stops_on_close_request() {
        let mut surface = FakeSurface::new(800, 600);
        surface.close = true;
        run(&mut surface);
        assert_eq!(surface.fps, Some(TARGET_FPS));
        assert_eq!(surface.frames(), 0);
    }
}
