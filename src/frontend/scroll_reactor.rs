use gloo_events::EventListener;
use std::{cell::RefCell, rc::Rc};
use web_sys::{Document, Element, HtmlElement, Window};

use super::dom::{self, FrameCoalescer, Guards, TransformStore};
use super::error::Result;
use super::overlay::OverlayHandle;
use crate::config::InteractionConfig;
use crate::contract;
use crate::motion;
use crate::scroll::{ScrollMetrics, ScrollReactor, ScrollUpdate, SectionBounds};
use crate::telemetry::Logger;

struct ParallaxTarget {
    element: HtmlElement,
    speed: f64,
}

struct ScrollView {
    window: Window,
    document: Document,
    nav: Option<HtmlElement>,
    sections: Vec<HtmlElement>,
    section_links: Vec<Element>,
    parallax: Vec<ParallaxTarget>,
    transforms: TransformStore,
    overlay: OverlayHandle,
    reactor: ScrollReactor,
}

impl ScrollView {
    fn metrics(&self) -> ScrollMetrics {
        let (document_height, viewport_height) = self
            .document
            .document_element()
            .map(|root| (f64::from(root.scroll_height()), f64::from(root.client_height())))
            .unwrap_or((0.0, 0.0));

        ScrollMetrics {
            scroll_y: self.window.scroll_y().unwrap_or(0.0),
            document_height,
            viewport_height,
        }
    }

    fn section_bounds(&self) -> Vec<SectionBounds> {
        self.sections
            .iter()
            .map(|section| SectionBounds {
                top: f64::from(section.offset_top()),
                height: f64::from(section.offset_height()),
            })
            .collect()
    }

    fn refresh(&mut self) {
        let metrics = self.metrics();
        let bounds = self.section_bounds();
        let update = self.reactor.update(metrics, &bounds);
        self.apply(&update);
    }

    fn apply(&self, update: &ScrollUpdate) {
        if update.scrolled_changed {
            if let Some(nav) = self.nav.as_ref() {
                dom::set_class(nav, contract::CLASS_SCROLLED, update.scrolled);
            }
        }

        if let Some(index) = update.highlight {
            self.highlight(index);
        }

        for target in &self.parallax {
            let offset = motion::parallax_offset(update.scroll_y, target.speed);
            self.transforms
                .update(&target.element, |layers| layers.parallax_y = offset);
        }

        self.overlay.set_progress(update.progress);
    }

    fn highlight(&self, index: usize) {
        let Some(section_id) = self.sections.get(index).map(|section| section.id()) else {
            return;
        };
        let wanted = format!("#{section_id}");

        for link in &self.section_links {
            dom::set_class(link, contract::CLASS_ACTIVE, false);
        }
        for link in &self.section_links {
            if link.get_attribute("href").as_deref() == Some(wanted.as_str()) {
                dom::set_class(link, contract::CLASS_ACTIVE, true);
            }
        }
    }
}

pub fn install(
    config: &InteractionConfig,
    overlay: OverlayHandle,
    transforms: TransformStore,
    reduced_motion: bool,
    logger: Logger,
) -> Result<Guards> {
    let window = dom::browser_window()?;
    let document = dom::browser_document()?;

    let nav = dom::select_one(&document, contract::MAIN_NAV).ok();
    let parallax = if reduced_motion {
        Vec::new()
    } else {
        dom::select_html(&document, contract::PARALLAX)
            .into_iter()
            .map(|element| {
                let speed = motion::parallax_speed(
                    element.dataset().get(contract::PARALLAX_KEY).as_deref(),
                );
                ParallaxTarget { element, speed }
            })
            .collect()
    };

    let view = ScrollView {
        nav,
        sections: dom::select_html(&document, contract::SECTIONS_WITH_ID),
        section_links: dom::select_all(&document, contract::NAV_SECTION_LINKS),
        parallax,
        transforms,
        overlay,
        reactor: ScrollReactor::new(config.nav_threshold_px, config.section_offset_px),
        window: window.clone(),
        document,
    };

    logger.debug(
        "scroll_reactor_ready",
        serde_json::json!({
            "has_nav": view.nav.is_some(),
            "sections": view.sections.len(),
            "parallax": view.parallax.len(),
        }),
    );

    let view = Rc::new(RefCell::new(view));
    view.borrow_mut().refresh();

    let frame = {
        let view = view.clone();
        FrameCoalescer::new(move || view.borrow_mut().refresh())
    };

    let mut guards = Guards::default();
    guards.listen(EventListener::new(&window, "scroll", move |_| frame.request()));
    Ok(guards)
}
