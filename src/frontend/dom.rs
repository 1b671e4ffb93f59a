use gloo_events::EventListener;
use gloo_timers::callback::Interval;
use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    window, Document, Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, NodeList, Window,
};

use super::error::{InteractionError, Result};
use crate::motion::MotionLayers;
use crate::scroll::FrameGate;

pub fn browser_window() -> Result<Window> {
    window().ok_or(InteractionError::Unavailable("window"))
}

pub fn browser_document() -> Result<Document> {
    browser_window()?
        .document()
        .ok_or(InteractionError::Unavailable("document"))
}

fn node_list_elements(list: NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|index| list.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn select_all(document: &Document, selector: &str) -> Vec<Element> {
    document
        .query_selector_all(selector)
        .map(node_list_elements)
        .unwrap_or_default()
}

pub fn select_all_in(root: &Element, selector: &str) -> Vec<Element> {
    root.query_selector_all(selector)
        .map(node_list_elements)
        .unwrap_or_default()
}

pub fn select_html(document: &Document, selector: &str) -> Vec<HtmlElement> {
    select_all(document, selector)
        .into_iter()
        .filter_map(|element| element.dyn_into::<HtmlElement>().ok())
        .collect()
}

pub fn select_one(document: &Document, selector: &'static str) -> Result<HtmlElement> {
    document
        .query_selector(selector)
        .ok()
        .flatten()
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
        .ok_or(InteractionError::MissingElement(selector))
}

pub fn viewport_size() -> (f64, f64) {
    let Some(win) = window() else {
        return (1280.0, 720.0);
    };

    let width = win
        .inner_width()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(1280.0);
    let height = win
        .inner_height()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(720.0);

    (width, height)
}

pub fn prefers_reduced_motion() -> bool {
    window()
        .and_then(|w| {
            w.match_media("(prefers-reduced-motion: reduce)")
                .ok()
                .flatten()
        })
        .map(|mq| mq.matches())
        .unwrap_or(false)
}

pub fn set_style(element: &HtmlElement, property: &str, value: &str) {
    let style = element.style();
    let _ = if value.is_empty() {
        style.remove_property(property).map(|_| ())
    } else {
        style.set_property(property, value)
    };
}

pub fn set_class(element: &Element, class: &str, on: bool) {
    let classes = element.class_list();
    let _ = if on {
        classes.add_1(class)
    } else {
        classes.remove_1(class)
    };
}

#[derive(Default)]
pub struct Guards {
    listeners: Vec<EventListener>,
    observers: Vec<ObserverGuard>,
    intervals: Vec<Interval>,
    frames: Vec<FrameLoop>,
}

impl Guards {
    pub fn listen(&mut self, listener: EventListener) {
        self.listeners.push(listener);
    }

    pub fn observe(&mut self, observer: ObserverGuard) {
        self.observers.push(observer);
    }

    pub fn every(&mut self, interval: Interval) {
        self.intervals.push(interval);
    }

    pub fn animate(&mut self, frame_loop: FrameLoop) {
        self.frames.push(frame_loop);
    }

    pub fn absorb(&mut self, other: Guards) {
        self.listeners.extend(other.listeners);
        self.observers.extend(other.observers);
        self.intervals.extend(other.intervals);
        self.frames.extend(other.frames);
    }

    pub fn len(&self) -> usize {
        self.listeners.len() + self.observers.len() + self.intervals.len() + self.frames.len()
    }
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

pub struct FrameLoop {
    frame_id: Rc<Cell<Option<i32>>>,
    callback: FrameCallback,
}

impl FrameLoop {
    pub fn start(mut tick: impl FnMut(f64) + 'static) -> Result<Self> {
        let window = browser_window()?;
        let frame_id = Rc::new(Cell::new(None));
        let callback: FrameCallback = Rc::new(RefCell::new(None));

        let slot = Rc::downgrade(&callback);
        let next_frame_id = frame_id.clone();
        let loop_window = window.clone();
        *callback.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(move |timestamp: f64| {
            tick(timestamp);

            let Some(slot) = slot.upgrade() else {
                return;
            };
            let slot = slot.borrow();
            if let Some(next) = slot.as_ref() {
                next_frame_id.set(
                    loop_window
                        .request_animation_frame(next.as_ref().unchecked_ref())
                        .ok(),
                );
            }
        }));

        if let Some(first) = callback.borrow().as_ref() {
            frame_id.set(Some(
                window.request_animation_frame(first.as_ref().unchecked_ref())?,
            ));
        }

        Ok(Self { frame_id, callback })
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        if let (Some(id), Some(win)) = (self.frame_id.take(), window()) {
            let _ = win.cancel_animation_frame(id);
        }
        self.callback.borrow_mut().take();
    }
}

#[derive(Clone)]
pub struct FrameCoalescer {
    inner: Rc<CoalescerInner>,
}

struct CoalescerInner {
    gate: Rc<RefCell<FrameGate>>,
    frame_id: Cell<Option<i32>>,
    callback: Closure<dyn FnMut(f64)>,
}

impl FrameCoalescer {
    pub fn new(mut work: impl FnMut() + 'static) -> Self {
        let gate = Rc::new(RefCell::new(FrameGate::default()));
        let frame_gate = gate.clone();
        let callback = Closure::<dyn FnMut(f64)>::new(move |_timestamp: f64| {
            frame_gate.borrow_mut().begin_frame();
            work();
        });

        Self {
            inner: Rc::new(CoalescerInner {
                gate,
                frame_id: Cell::new(None),
                callback,
            }),
        }
    }

    pub fn request(&self) {
        if !self.inner.gate.borrow_mut().request() {
            return;
        }

        let scheduled = window().and_then(|win| {
            win.request_animation_frame(self.inner.callback.as_ref().unchecked_ref())
                .ok()
        });
        match scheduled {
            Some(id) => self.inner.frame_id.set(Some(id)),
            None => self.inner.gate.borrow_mut().begin_frame(),
        }
    }
}

impl Drop for CoalescerInner {
    fn drop(&mut self) {
        if let (Some(id), Some(win)) = (self.frame_id.take(), window()) {
            if self.gate.borrow().is_pending() {
                let _ = win.cancel_animation_frame(id);
            }
        }
    }
}

type IntersectionCallback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

pub struct ObserverGuard {
    observer: IntersectionObserver,
    _callback: IntersectionCallback,
}

impl Drop for ObserverGuard {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

pub fn observe_intersections(
    targets: &[Element],
    threshold: f64,
    root_margin: Option<&str>,
    mut on_entry: impl FnMut(&IntersectionObserverEntry, &IntersectionObserver) + 'static,
) -> Result<ObserverGuard> {
    let callback = IntersectionCallback::new(
        move |entries: js_sys::Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                if let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() {
                    on_entry(&entry, &observer);
                }
            }
        },
    );

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(threshold));
    if let Some(margin) = root_margin {
        options.set_root_margin(margin);
    }

    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
    for target in targets {
        observer.observe(target);
    }

    Ok(ObserverGuard {
        observer,
        _callback: callback,
    })
}

#[derive(Clone, Default)]
pub struct TransformStore {
    entries: Rc<RefCell<Vec<(HtmlElement, MotionLayers)>>>,
}

impl TransformStore {
    pub fn update(&self, element: &HtmlElement, edit: impl FnOnce(&mut MotionLayers)) {
        let mut entries = self.entries.borrow_mut();
        let index = match entries.iter().position(|(known, _)| known == element) {
            Some(index) => index,
            None => {
                entries.push((element.clone(), MotionLayers::default()));
                entries.len() - 1
            }
        };

        let layers = &mut entries[index].1;
        edit(layers);
        set_style(element, "transform", &layers.compose().to_css());
    }
}
