//! Deterministic simulation of a carousel on a virtual clock.
//!
//! [`SimulatedHost`] stands in for a browser page: it keeps the rendered
//! state (offset, widths, highlighted dot, play/pause affordance), a set of
//! pending timers, and a pending transition end. Time only moves when
//! [`Simulation::advance`] is called, so every run is reproducible.
//!
//! Browser behavior modelled:
//!
//! - an animated render that moves the tape reports its end after the
//!   configured transition duration
//! - an instant render cancels a pending transition end
//! - while the page is hidden animations never report their end (this is
//!   what the fallback unlock exists for); timers keep running
//!
//! Scripts are JSON arrays of [`Step`]s:
//!
//! ```json
//! [{"click": "next"}, {"wait": 600}, {"click": {"dot": 3}}, {"swipe": {"from": 300, "to": 200}},
//!  {"key": "ArrowLeft"}, {"resize": 640}, "hide", {"wait": 1200}, "show", "focus", "transition_end"]
//! ```

use crate::carousel::{Carousel, CarouselError, Navigation};
use crate::config::CarouselConfig;
use crate::host::{CarouselHost, Motion, TimerId, TimerKind};
use crate::input::{Control, Input};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Script error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Carousel error: {0}")]
    Carousel(#[from] CarouselError),
}

/// Everything the page currently shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderState {
    pub offset: f64,
    pub motion: Motion,
    pub track_width: f64,
    pub slide_width: f64,
    pub dot: Option<usize>,
    pub playing: bool,
}

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    kind: TimerKind,
    due_ms: u64,
    period_ms: u64,
}

/// Something the virtual page delivers to the carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    TransitionEnd,
    Timer(TimerId, TimerKind),
}

/// A [`CarouselHost`] backed by a virtual clock.
#[derive(Debug, Clone)]
pub struct SimulatedHost {
    now_ms: u64,
    width: f64,
    transition_ms: u64,
    visible: bool,
    next_id: u64,
    timers: BTreeMap<TimerId, PendingTimer>,
    transition_due: Option<u64>,
    state: RenderState,
}

impl SimulatedHost {
    pub fn new(width: f64, transition: Duration) -> Self {
        Self {
            now_ms: 0,
            width,
            transition_ms: duration_ms(transition),
            visible: true,
            next_id: 0,
            timers: BTreeMap::new(),
            transition_due: None,
            state: RenderState {
                offset: 0.0,
                motion: Motion::Animated,
                track_width: 0.0,
                slide_width: 0.0,
                dot: None,
                playing: false,
            },
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Change the frame width. The carousel only notices on a resize input.
    pub fn set_viewport_width(&mut self, width: f64) {
        self.width = width;
    }

    /// Hiding the page drops any animation completion that was pending.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if !visible {
            self.transition_due = None;
        }
    }

    /// Armed timers of one kind.
    pub fn timers_of(&self, kind: TimerKind) -> Vec<TimerId> {
        self.timers
            .iter()
            .filter(|(_, t)| t.kind == kind)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn timer_count(&self) -> usize {
        self.timers.len()
    }

    pub fn transition_pending(&self) -> bool {
        self.transition_due.is_some()
    }

    /// Pop the earliest event due at or before `until_ms`, moving the clock to it.
    ///
    /// A transition end due at the same instant as a timer is delivered first.
    /// Repeating timers are re-armed one period later, or dropped once that
    /// would run past the end of the clock.
    pub fn next_event(&mut self, until_ms: u64) -> Option<SimEvent> {
        let timer = self
            .timers
            .iter()
            .min_by_key(|(id, t)| (t.due_ms, **id))
            .map(|(id, t)| (*id, *t))
            .filter(|(_, t)| t.due_ms <= until_ms);
        let transition = self.transition_due.filter(|due| *due <= until_ms);

        match (transition, timer) {
            (Some(due), Some((_, t))) if due <= t.due_ms => self.fire_transition(due),
            (Some(due), None) => self.fire_transition(due),
            (_, Some((id, t))) => {
                self.now_ms = t.due_ms;
                match t.due_ms.checked_add(t.period_ms) {
                    Some(next) if t.kind.repeats() => {
                        if let Some(pending) = self.timers.get_mut(&id) {
                            pending.due_ms = next;
                        }
                    }
                    _ => {
                        self.timers.remove(&id);
                    }
                }
                Some(SimEvent::Timer(id, t.kind))
            }
            (None, None) => None,
        }
    }

    fn fire_transition(&mut self, due: u64) -> Option<SimEvent> {
        self.now_ms = due;
        self.transition_due = None;
        Some(SimEvent::TransitionEnd)
    }
}

impl CarouselHost for SimulatedHost {
    fn viewport_width(&self) -> f64 {
        self.width
    }

    fn render_width(&mut self, track_width: f64, slide_width: f64) {
        self.state.track_width = track_width;
        self.state.slide_width = slide_width;
    }

    fn render_position(&mut self, offset: f64, motion: Motion) {
        let moved = offset != self.state.offset;
        self.state.offset = offset;
        self.state.motion = motion;
        match motion {
            Motion::Animated if moved && self.visible => {
                self.transition_due = Some(self.now_ms.saturating_add(self.transition_ms));
            }
            Motion::Animated => {}
            Motion::Instant => self.transition_due = None,
        }
    }

    fn set_motion(&mut self, motion: Motion) {
        self.state.motion = motion;
    }

    fn highlight_dot(&mut self, real_index: usize) {
        self.state.dot = Some(real_index);
    }

    fn show_autoplay(&mut self, playing: bool) {
        self.state.playing = playing;
    }

    fn schedule(&mut self, kind: TimerKind, after: Duration) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        let period_ms = duration_ms(after).max(1);
        self.timers.insert(
            id,
            PendingTimer {
                kind,
                due_ms: self.now_ms.saturating_add(period_ms),
                period_ms,
            },
        );
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.timers.remove(&id);
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

// ============================================================================
// Scripts
// ============================================================================

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Let virtual time pass, delivering timers and transition ends.
    Wait(u64),
    Click(Control),
    Key(String),
    /// A single-finger swipe from `from` to `to` (client X).
    Swipe { from: f64, to: f64 },
    /// Set the frame width and fire a resize.
    Resize(f64),
    Hide,
    Show,
    Focus,
    /// Deliver a transition end immediately, whether or not one is pending.
    TransitionEnd,
}

/// Parse a JSON script.
pub fn parse_script(json: &str) -> Result<Vec<Step>, SimError> {
    Ok(serde_json::from_str(json)?)
}

/// Read and parse a JSON script file.
pub fn load_script(path: &Path) -> Result<Vec<Step>, SimError> {
    let content = std::fs::read_to_string(path)?;
    parse_script(&content)
}

/// One row of a simulation trace, recorded after each delivered event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEntry {
    pub at_ms: u64,
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigation: Option<Navigation>,
    pub index: usize,
    pub real_index: usize,
    pub locked: bool,
    pub autoplay: bool,
    pub offset: f64,
}

/// A carousel running on a [`SimulatedHost`], with a trace of what happened.
#[derive(Debug)]
pub struct Simulation {
    carousel: Carousel<SimulatedHost>,
    trace: Vec<TraceEntry>,
}

impl Simulation {
    pub fn new(slides: usize, width: f64, config: &CarouselConfig) -> Result<Self, SimError> {
        let host = SimulatedHost::new(width, config.transition.duration());
        let carousel = Carousel::new(host, slides, config)?;
        let mut sim = Self {
            carousel,
            trace: Vec::new(),
        };
        sim.record("init", None);
        Ok(sim)
    }

    pub fn carousel(&self) -> &Carousel<SimulatedHost> {
        &self.carousel
    }

    pub fn carousel_mut(&mut self) -> &mut Carousel<SimulatedHost> {
        &mut self.carousel
    }

    pub fn host(&self) -> &SimulatedHost {
        self.carousel.host()
    }

    pub fn trace(&self) -> &[TraceEntry] {
        &self.trace
    }

    pub fn into_trace(self) -> Vec<TraceEntry> {
        self.trace
    }

    /// Deliver a page event now.
    pub fn input(&mut self, input: Input) -> Option<Navigation> {
        let label = input_label(&input);
        let response = self.carousel.handle(input);
        self.record(&label, response.navigation);
        response.navigation
    }

    /// Move the clock forward `ms`, delivering everything that falls due.
    pub fn advance(&mut self, ms: u64) {
        let until = self.host().now_ms().saturating_add(ms);
        while let Some(event) = self.carousel.host_mut().next_event(until) {
            match event {
                SimEvent::TransitionEnd => {
                    self.carousel.transition_end();
                    self.record("transitionend", None);
                }
                SimEvent::Timer(id, kind) => {
                    let navigation = self.carousel.on_timer(id);
                    self.record(timer_label(kind), navigation);
                }
            }
        }
        self.carousel.host_mut().now_ms = until;
    }

    /// Let a pending animation run to completion.
    pub fn finish_transition(&mut self) {
        let ms = self.host().transition_ms;
        self.advance(ms);
    }

    /// Apply one scripted step.
    pub fn step(&mut self, step: &Step) {
        match step {
            Step::Wait(ms) => self.advance(*ms),
            Step::Click(control) => {
                self.input(Input::Click(*control));
            }
            Step::Key(key) => {
                self.input(Input::Key(key.clone()));
            }
            Step::Swipe { from, to } => {
                self.input(Input::TouchStart(vec![*from]));
                self.input(Input::TouchMove(vec![*to]));
                self.input(Input::TouchEnd);
            }
            Step::Resize(width) => {
                self.carousel.host_mut().set_viewport_width(*width);
                self.input(Input::Resize);
            }
            Step::Hide => {
                self.carousel.host_mut().set_visible(false);
                self.input(Input::VisibilityChange { visible: false });
            }
            Step::Show => {
                self.carousel.host_mut().set_visible(true);
                self.input(Input::VisibilityChange { visible: true });
            }
            Step::Focus => {
                self.input(Input::Focus);
            }
            Step::TransitionEnd => {
                self.input(Input::TransitionEnd);
            }
        }
    }

    /// Apply every step in order.
    pub fn run(&mut self, steps: &[Step]) {
        for step in steps {
            self.step(step);
        }
    }

    fn record(&mut self, event: &str, navigation: Option<Navigation>) {
        let entry = TraceEntry {
            at_ms: self.host().now_ms(),
            event: event.to_string(),
            navigation,
            index: self.carousel.current_index(),
            real_index: self.carousel.real_index(),
            locked: self.carousel.is_locked(),
            autoplay: self.carousel.autoplay(),
            offset: self.host().state().offset,
        };
        self.trace.push(entry);
    }
}

/// Run a script against a fresh carousel and return its trace.
pub fn simulate(
    slides: usize,
    width: f64,
    config: &CarouselConfig,
    steps: &[Step],
) -> Result<Vec<TraceEntry>, SimError> {
    let mut sim = Simulation::new(slides, width, config)?;
    sim.run(steps);
    Ok(sim.into_trace())
}

fn input_label(input: &Input) -> String {
    match input {
        Input::Click(Control::Previous) => "click previous".to_string(),
        Input::Click(Control::Next) => "click next".to_string(),
        Input::Click(Control::Dot(i)) => format!("click dot {i}"),
        Input::Click(Control::PlayPause) => "click play/pause".to_string(),
        Input::Key(key) => format!("key {key}"),
        Input::TouchStart(_) => "touchstart".to_string(),
        Input::TouchMove(_) => "touchmove".to_string(),
        Input::TouchEnd => "touchend".to_string(),
        Input::Resize => "resize".to_string(),
        Input::VisibilityChange { visible: true } => "visible".to_string(),
        Input::VisibilityChange { visible: false } => "hidden".to_string(),
        Input::Focus => "focus".to_string(),
        Input::TransitionEnd => "transitionend".to_string(),
    }
}

fn timer_label(kind: TimerKind) -> &'static str {
    match kind {
        TimerKind::Autoplay => "autoplay tick",
        TimerKind::FallbackUnlock => "fallback unlock",
        TimerKind::RestoreTransition => "restore animation",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sim(slides: usize) -> Simulation {
        Simulation::new(slides, 800.0, &CarouselConfig::default()).unwrap()
    }

    #[test]
    fn animated_move_reports_end_after_duration() {
        let mut s = sim(3);
        s.input(Input::Click(Control::Next));
        assert!(s.host().transition_pending());
        s.advance(599);
        assert!(s.carousel().is_locked());
        s.advance(1);
        assert!(!s.carousel().is_locked());
        assert_eq!(s.host().now_ms(), 600);
    }

    #[test]
    fn instant_render_cancels_pending_end() {
        let mut s = sim(3);
        s.input(Input::Click(Control::Next));
        s.input(Input::Resize);
        assert!(!s.host().transition_pending());
    }

    #[test]
    fn hidden_page_never_reports_transition_end() {
        let mut s = sim(3);
        s.step(&Step::Hide);
        s.input(Input::Click(Control::Next));
        assert!(!s.host().transition_pending());
        s.advance(999);
        assert!(s.carousel().is_locked());
        s.advance(1);
        assert!(!s.carousel().is_locked());
        assert_eq!(s.trace().last().unwrap().event, "fallback unlock");
    }

    #[test]
    fn autoplay_ticks_every_interval() {
        let mut s = sim(4);
        s.advance(5000);
        assert_eq!(s.carousel().current_index(), 2);
        s.advance(5000);
        assert_eq!(s.carousel().current_index(), 3);
        let ticks = s
            .trace()
            .iter()
            .filter(|e| e.event == "autoplay tick")
            .count();
        assert_eq!(ticks, 2);
    }

    #[test]
    fn repeating_timer_is_rearmed() {
        let mut host = SimulatedHost::new(800.0, Duration::from_millis(600));
        let id = host.schedule(TimerKind::Autoplay, Duration::from_millis(100));
        assert_eq!(host.next_event(100), Some(SimEvent::Timer(id, TimerKind::Autoplay)));
        assert_eq!(host.next_event(150), None);
        assert_eq!(host.next_event(200), Some(SimEvent::Timer(id, TimerKind::Autoplay)));
        assert_eq!(host.timer_count(), 1);
    }

    #[test]
    fn one_shot_timer_is_removed_after_firing() {
        let mut host = SimulatedHost::new(800.0, Duration::from_millis(600));
        let id = host.schedule(TimerKind::FallbackUnlock, Duration::from_millis(10));
        assert_eq!(
            host.next_event(50),
            Some(SimEvent::Timer(id, TimerKind::FallbackUnlock))
        );
        assert_eq!(host.timer_count(), 0);
    }

    #[test]
    fn transition_end_precedes_timer_due_at_same_time() {
        let mut host = SimulatedHost::new(800.0, Duration::from_millis(600));
        host.schedule(TimerKind::FallbackUnlock, Duration::from_millis(600));
        host.render_position(800.0, Motion::Animated);
        assert_eq!(host.next_event(600), Some(SimEvent::TransitionEnd));
    }

    #[test]
    fn parse_script_steps() {
        let steps = parse_script(
            r#"[{"click": "next"}, {"wait": 600}, {"click": {"dot": 2}},
                {"swipe": {"from": 300, "to": 200}}, {"key": "ArrowLeft"},
                {"resize": 640}, "hide", "show", "focus", "transition_end"]"#,
        )
        .unwrap();
        assert_eq!(steps.len(), 10);
        assert_eq!(steps[0], Step::Click(Control::Next));
        assert_eq!(steps[2], Step::Click(Control::Dot(2)));
        assert_eq!(
            steps[3],
            Step::Swipe {
                from: 300.0,
                to: 200.0
            }
        );
        assert_eq!(steps[5], Step::Resize(640.0));
        assert_eq!(steps[6], Step::Hide);
    }

    #[test]
    fn parse_script_rejects_unknown_step() {
        assert!(matches!(parse_script(r#"["jump"]"#), Err(SimError::Json(_))));
    }

    #[test]
    fn simulate_records_init_and_every_input() {
        let steps = vec![Step::Click(Control::Next), Step::Wait(600)];
        let trace = simulate(3, 800.0, &CarouselConfig::default(), &steps).unwrap();
        let events: Vec<&str> = trace.iter().map(|e| e.event.as_str()).collect();
        assert_eq!(events, vec!["init", "click next", "transitionend"]);
        assert_eq!(trace[1].navigation, Some(Navigation::Started { from: 1, to: 2 }));
        assert_eq!(trace[2].offset, 1600.0);
    }

    #[test]
    fn waiting_past_the_end_of_time_saturates() {
        let mut config = CarouselConfig::default();
        config.autoplay.enabled = false;
        let steps = vec![Step::Wait(u64::MAX), Step::Wait(1), Step::Click(Control::Next)];
        let trace = simulate(3, 800.0, &config, &steps).unwrap();
        let last = trace.last().unwrap();
        assert_eq!(last.at_ms, u64::MAX);
        assert_eq!(last.navigation, Some(Navigation::Started { from: 1, to: 2 }));
    }

    #[test]
    fn timer_due_beyond_the_clock_saturates() {
        let mut host = SimulatedHost::new(800.0, Duration::from_millis(600));
        host.now_ms = u64::MAX - 5;
        let id = host.schedule(TimerKind::Autoplay, Duration::from_millis(u64::MAX));
        assert_eq!(host.timers[&id].due_ms, u64::MAX);
        assert_eq!(host.next_event(u64::MAX), Some(SimEvent::Timer(id, TimerKind::Autoplay)));
        assert_eq!(host.timer_count(), 0);
        assert_eq!(host.next_event(u64::MAX), None);
    }

    #[test]
    fn simulate_rejects_zero_slides() {
        let result = simulate(0, 800.0, &CarouselConfig::default(), &[]);
        assert!(matches!(result, Err(SimError::Carousel(CarouselError::NoSlides))));
    }
}
