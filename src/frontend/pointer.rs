use gloo_events::EventListener;
use std::{cell::RefCell, rc::Rc};
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, MouseEvent};

use super::dom::{self, FrameCoalescer, FrameLoop, Guards, TransformStore};
use super::error::{InteractionError, Result};
use crate::config::InteractionConfig;
use crate::contract;
use crate::motion::{self, CardRect, CursorTrail, TiltStyle};

fn place(element: &HtmlElement, x: f64, y: f64) {
    dom::set_style(element, "left", &format!("{x}px"));
    dom::set_style(element, "top", &format!("{y}px"));
}

pub fn install_cursor(config: &InteractionConfig) -> Result<Guards> {
    let (viewport_width, _) = dom::viewport_size();
    if !motion::cursor_enabled(viewport_width, config.cursor_min_viewport_px) {
        return Err(InteractionError::Disabled("viewport too narrow for custom cursor"));
    }

    let document = dom::browser_document()?;
    let cursor = dom::select_one(&document, contract::CURSOR)?;
    let follower = dom::select_one(&document, contract::CURSOR_FOLLOWER)?;

    let trail = Rc::new(RefCell::new(CursorTrail::new(
        config.cursor_ease,
        config.follower_ease,
    )));

    let mut guards = Guards::default();

    {
        let trail = trail.clone();
        guards.listen(EventListener::new(&document, "mousemove", move |event| {
            if let Some(event) = event.dyn_ref::<MouseEvent>() {
                trail
                    .borrow_mut()
                    .record_pointer(f64::from(event.client_x()), f64::from(event.client_y()));
            }
        }));
    }

    guards.animate(FrameLoop::start(move |_| {
        let (dot, ring) = trail.borrow_mut().frame();
        place(&cursor, dot.x, dot.y);
        place(&follower, ring.x, ring.y);
    })?);

    Ok(guards)
}

pub fn install_tilt(
    config: &InteractionConfig,
    transforms: TransformStore,
    reduced_motion: bool,
) -> Result<Guards> {
    if reduced_motion {
        return Err(InteractionError::Disabled("reduced motion"));
    }

    let document = dom::browser_document()?;
    let cards = dom::select_html(&document, contract::PROJECT_CARD);
    if cards.is_empty() {
        return Err(InteractionError::MissingElement(contract::PROJECT_CARD));
    }

    let style = TiltStyle {
        divisor: config.tilt_divisor,
        perspective_px: config.tilt_perspective_px,
        lift_px: config.tilt_lift_px,
    };

    let mut guards = Guards::default();
    for card in cards {
        let pointer: Rc<RefCell<Option<(f64, f64)>>> = Rc::new(RefCell::new(None));

        let frame = {
            let card = card.clone();
            let pointer = pointer.clone();
            let transforms = transforms.clone();
            FrameCoalescer::new(move || {
                let Some((x, y)) = *pointer.borrow() else {
                    return;
                };
                let rect = card.get_bounding_client_rect();
                let tilt = motion::tilt_for_pointer(
                    x,
                    y,
                    CardRect {
                        left: rect.left(),
                        top: rect.top(),
                        width: rect.width(),
                        height: rect.height(),
                    },
                    style,
                );
                transforms.update(&card, |layers| layers.tilt = Some(tilt));
            })
        };

        {
            let pointer = pointer.clone();
            guards.listen(EventListener::new(&card, "mousemove", move |event| {
                if let Some(event) = event.dyn_ref::<MouseEvent>() {
                    *pointer.borrow_mut() =
                        Some((f64::from(event.client_x()), f64::from(event.client_y())));
                    frame.request();
                }
            }));
        }

        {
            let transforms = transforms.clone();
            let target = card.clone();
            guards.listen(EventListener::new(&card, "mouseleave", move |_| {
                pointer.borrow_mut().take();
                transforms.update(&target, |layers| layers.tilt = None);
            }));
        }
    }

    Ok(guards)
}
