//! Browser binding (feature `web`).
//!
//! [`mount`] attaches a [`Carousel`] to markup following the contract in
//! [`crate::markup`]. Pages that only ship the real slides still work: the
//! boundary clones and the dot buttons are created when missing.
//!
//! Event wiring:
//!
//! | Event | Target | Input |
//! |-------|--------|-------|
//! | `click` | carousel root (delegated) | [`Input::Click`] |
//! | `keydown` | window | [`Input::Key`], default prevented when a move started |
//! | `touchstart` / `touchmove` | frame (passive) | [`Input::TouchStart`] / [`Input::TouchMove`] |
//! | `touchend` | frame | [`Input::TouchEnd`] |
//! | `resize` | window | [`Input::Resize`] |
//! | `visibilitychange` | document | [`Input::VisibilityChange`] |
//! | `focus` | window | [`Input::Focus`] |
//! | `transitionend` | tape | [`Input::TransitionEnd`] |
//!
//! Timers are gloo `Timeout`/`Interval` handles owned by the host; dropping a
//! handle clears the browser timer.

use crate::carousel::{Carousel, CarouselError};
use crate::config::CarouselConfig;
use crate::host::{self, CarouselHost, Motion, TimerId, TimerKind};
use crate::input::{self, Control, Input, Response};
use crate::markup;
use gloo::events::{EventListener, EventListenerOptions};
use gloo::timers::callback::{Interval, Timeout};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, KeyboardEvent, Node, TouchEvent,
    VisibilityState, Window,
};

#[derive(Error, Debug)]
pub enum WebError {
    #[error("no browser window or document")]
    NoWindow,
    #[error("carousel markup is missing `{0}`")]
    MissingElement(&'static str),
    #[error("DOM error: {0}")]
    Dom(String),
    #[error(transparent)]
    Carousel(#[from] CarouselError),
}

impl From<JsValue> for WebError {
    fn from(value: JsValue) -> Self {
        WebError::Dom(format!("{value:?}"))
    }
}

type Shared = Rc<RefCell<Carousel<WebHost>>>;

/// Back-reference from timer callbacks to the carousel that owns the host.
///
/// Filled in right after construction; weak so timers never keep a
/// carousel alive.
type Link = Rc<RefCell<Weak<RefCell<Carousel<WebHost>>>>>;

enum Armed {
    Once(#[allow(dead_code)] Timeout),
    Repeating(#[allow(dead_code)] Interval),
}

/// [`CarouselHost`] over live DOM elements.
pub struct WebHost {
    frame: HtmlElement,
    tape: HtmlElement,
    images: Vec<HtmlElement>,
    dots: Vec<Element>,
    play_button: Option<Element>,
    transition: String,
    timers: HashMap<TimerId, Armed>,
    next_id: u64,
    link: Link,
}

impl WebHost {
    fn motion_css(&self, motion: Motion) -> &str {
        match motion {
            Motion::Animated => &self.transition,
            Motion::Instant => "none",
        }
    }

    /// Forget a one-shot timer the browser has just run.
    fn fired(&mut self, id: TimerId) {
        if matches!(self.timers.get(&id), Some(Armed::Once(_))) {
            self.timers.remove(&id);
        }
    }
}

fn set_style(element: &HtmlElement, property: &str, value: &str) {
    if let Err(err) = element.style().set_property(property, value) {
        warn!(?err, property, "style update failed");
    }
}

fn to_millis(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}

impl CarouselHost for WebHost {
    fn viewport_width(&self) -> f64 {
        f64::from(self.frame.offset_width())
    }

    fn render_width(&mut self, track_width: f64, slide_width: f64) {
        set_style(&self.tape, "width", &format!("{track_width}px"));
        for image in &self.images {
            set_style(image, "width", &format!("{slide_width}px"));
            set_style(image, "height", "100%");
        }
    }

    fn render_position(&mut self, offset: f64, motion: Motion) {
        set_style(&self.tape, "transition", self.motion_css(motion));
        set_style(&self.tape, "transform", &host::translate_x(offset));
    }

    fn set_motion(&mut self, motion: Motion) {
        set_style(&self.tape, "transition", self.motion_css(motion));
    }

    fn highlight_dot(&mut self, real_index: usize) {
        for (i, dot) in self.dots.iter().enumerate() {
            if let Err(err) = dot
                .class_list()
                .toggle_with_force("dot-filled", i == real_index)
            {
                warn!(?err, dot = i, "dot update failed");
            }
        }
    }

    fn show_autoplay(&mut self, playing: bool) {
        if let Some(button) = &self.play_button {
            button.set_inner_html(&markup::play_icon(playing).into_string());
            if let Err(err) = button.set_attribute("aria-label", markup::play_label(playing)) {
                warn!(?err, "play button update failed");
            }
        }
    }

    fn schedule(&mut self, kind: TimerKind, after: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let link = Rc::clone(&self.link);
        let millis = to_millis(after);
        let armed = if kind.repeats() {
            Armed::Repeating(Interval::new(millis, move || deliver(&link, id)))
        } else {
            Armed::Once(Timeout::new(millis, move || deliver(&link, id)))
        };
        self.timers.insert(id, armed);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.timers.remove(&id);
    }
}

fn deliver(link: &Link, id: TimerId) {
    let Some(shared) = link.borrow().upgrade() else {
        return;
    };
    let Ok(mut carousel) = shared.try_borrow_mut() else {
        warn!(%id, "timer fired while carousel busy");
        return;
    };
    carousel.host_mut().fired(id);
    carousel.on_timer(id);
}

fn dispatch(carousel: &Shared, input: Input) -> Response {
    match carousel.try_borrow_mut() {
        Ok(mut carousel) => carousel.handle(input),
        Err(_) => {
            warn!(?input, "event dropped: carousel busy");
            Response::default()
        }
    }
}

// ============================================================================
// DOM lookups
// ============================================================================

fn find(root: &Element, selector: &'static str) -> Result<HtmlElement, WebError> {
    root.query_selector(selector)?
        .ok_or(WebError::MissingElement(selector))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| WebError::MissingElement(selector))
}

fn find_all(root: &Element, selector: &str) -> Result<Vec<Element>, WebError> {
    let list = root.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

fn make_clone(image: &Element) -> Result<Element, WebError> {
    let clone = image
        .clone_node_with_deep(true)?
        .dyn_into::<Element>()
        .map_err(|_| WebError::MissingElement("img"))?;
    clone.class_list().add_1("clone")?;
    clone.set_attribute("alt", "")?;
    clone.set_attribute("aria-hidden", "true")?;
    Ok(clone)
}

/// Wrap the real slides in boundary clones unless the markup already has
/// them. Returns the number of real slides.
fn prepare_tape(tape: &HtmlElement) -> Result<usize, WebError> {
    let real = find_all(tape, "img:not(.clone)")?;
    let (Some(first), Some(last)) = (real.first(), real.last()) else {
        return Err(CarouselError::NoSlides.into());
    };
    if find_all(tape, "img.clone")?.is_empty() {
        let first_clone = make_clone(first)?;
        let last_clone = make_clone(last)?;
        let anchor: &Node = first;
        tape.append_child(&first_clone)?;
        tape.insert_before(&last_clone, Some(anchor))?;
        debug!(slides = real.len(), "added boundary clones");
    }
    Ok(real.len())
}

/// One dot per real slide, generated when the dots box is empty.
fn prepare_dots(root: &Element, count: usize) -> Result<Vec<Element>, WebError> {
    let dots_box = find(root, ".dots-box")?;
    if find_all(&dots_box, ".dot")?.is_empty() {
        dots_box.set_inner_html(&markup::render_dots(count).into_string());
    }
    find_all(&dots_box, ".dot")
}

fn touch_positions(event: &Event) -> Vec<f64> {
    let Some(event) = event.dyn_ref::<TouchEvent>() else {
        return Vec::new();
    };
    let touches = event.touches();
    (0..touches.length())
        .filter_map(|i| touches.item(i))
        .map(|touch| f64::from(touch.client_x()))
        .collect()
}

// ============================================================================
// Mounting
// ============================================================================

/// A carousel attached to the page. Dropping it detaches every listener and
/// clears every timer.
pub struct Mounted {
    carousel: Shared,
    _listeners: Vec<EventListener>,
}

impl Mounted {
    pub fn carousel(&self) -> &Rc<RefCell<Carousel<WebHost>>> {
        &self.carousel
    }
}

/// Attach a carousel to the `.carousel` element `root`.
pub fn mount(root: &Element, config: &CarouselConfig) -> Result<Mounted, WebError> {
    let window = web_sys::window().ok_or(WebError::NoWindow)?;
    let document = window.document().ok_or(WebError::NoWindow)?;

    let frame = find(root, ".frame")?;
    let tape = find(root, ".tape")?;
    let count = prepare_tape(&tape)?;
    let dots = prepare_dots(root, count)?;
    let images = find_all(&tape, "img")?
        .into_iter()
        .filter_map(|image| image.dyn_into::<HtmlElement>().ok())
        .collect();
    let play_button = root.query_selector(".play-btn")?;

    let link: Link = Rc::new(RefCell::new(Weak::new()));
    let host = WebHost {
        frame: frame.clone(),
        tape: tape.clone(),
        images,
        dots,
        play_button,
        transition: config.transition.to_css(),
        timers: HashMap::new(),
        next_id: 0,
        link: Rc::clone(&link),
    };
    let carousel: Shared = Rc::new(RefCell::new(Carousel::new(host, count, config)?));
    *link.borrow_mut() = Rc::downgrade(&carousel);

    let listeners = install_listeners(root, &window, &document, &frame, &tape, &carousel);
    debug!(slides = count, "carousel mounted");
    Ok(Mounted {
        carousel,
        _listeners: listeners,
    })
}

/// Mount every `.carousel` element in the document.
pub fn mount_all(config: &CarouselConfig) -> Result<Vec<Mounted>, WebError> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or(WebError::NoWindow)?;
    let roots = document.query_selector_all(".carousel")?;
    (0..roots.length())
        .filter_map(|i| roots.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .map(|root| mount(&root, config))
        .collect()
}

/// JavaScript entry point: mount every carousel with stock settings for the
/// lifetime of the page.
#[wasm_bindgen(js_name = mountCarousels)]
pub fn mount_carousels() -> Result<(), JsValue> {
    let mounted =
        mount_all(&CarouselConfig::default()).map_err(|err| JsValue::from_str(&err.to_string()))?;
    std::mem::forget(mounted);
    Ok(())
}

fn install_listeners(
    root: &Element,
    window: &Window,
    document: &Document,
    frame: &HtmlElement,
    tape: &HtmlElement,
    carousel: &Shared,
) -> Vec<EventListener> {
    let mut listeners = Vec::new();

    let shared = Rc::clone(carousel);
    listeners.push(EventListener::new(root, "click", move |event: &Event| {
        let Some(target) = event
            .target()
            .and_then(|target| target.dyn_into::<Element>().ok())
        else {
            return;
        };
        let Ok(Some(element)) = target.closest(input::CONTROL_SELECTOR) else {
            return;
        };
        let class_attr = element.get_attribute("class").unwrap_or_default();
        let data_index = element.get_attribute("data-index");
        if let Some(control) = Control::from_classes(&class_attr, data_index.as_deref()) {
            dispatch(&shared, Input::Click(control));
        }
    }));

    let shared = Rc::clone(carousel);
    listeners.push(EventListener::new_with_options(
        window,
        "keydown",
        EventListenerOptions::enable_prevent_default(),
        move |event: &Event| {
            let Some(key_event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if dispatch(&shared, Input::Key(key_event.key())).prevent_default {
                event.prevent_default();
            }
        },
    ));

    let shared = Rc::clone(carousel);
    listeners.push(EventListener::new(frame, "touchstart", move |event: &Event| {
        dispatch(&shared, Input::TouchStart(touch_positions(event)));
    }));

    let shared = Rc::clone(carousel);
    listeners.push(EventListener::new(frame, "touchmove", move |event: &Event| {
        dispatch(&shared, Input::TouchMove(touch_positions(event)));
    }));

    let shared = Rc::clone(carousel);
    listeners.push(EventListener::new(frame, "touchend", move |_event: &Event| {
        dispatch(&shared, Input::TouchEnd);
    }));

    let shared = Rc::clone(carousel);
    listeners.push(EventListener::new(window, "resize", move |_event: &Event| {
        dispatch(&shared, Input::Resize);
    }));

    let shared = Rc::clone(carousel);
    let doc = document.clone();
    listeners.push(EventListener::new(
        document,
        "visibilitychange",
        move |_event: &Event| {
            let visible = doc.visibility_state() == VisibilityState::Visible;
            dispatch(&shared, Input::VisibilityChange { visible });
        },
    ));

    let shared = Rc::clone(carousel);
    listeners.push(EventListener::new(window, "focus", move |_event: &Event| {
        dispatch(&shared, Input::Focus);
    }));

    let shared = Rc::clone(carousel);
    let tape_target: EventTarget = tape.clone().into();
    listeners.push(EventListener::new(tape, "transitionend", move |event: &Event| {
        // Transitions of nested elements bubble up; only the tape's own count.
        if event.target().is_some_and(|target| target == tape_target) {
            dispatch(&shared, Input::TransitionEnd);
        }
    }));

    listeners
}
