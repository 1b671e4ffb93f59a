use gloo_timers::callback::Timeout;
use std::{cell::RefCell, rc::Rc};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlImageElement};

use super::dom::{self, Guards};
use super::error::{InteractionError, Result};
use crate::config::InteractionConfig;
use crate::contract;
use crate::counter::{CounterAnimation, StatTarget, StatsTrigger};
use crate::reveal::{self, RevealTracker};
use crate::telemetry::Logger;

pub fn install_reveal(config: &InteractionConfig, logger: Logger) -> Result<Guards> {
    let document = dom::browser_document()?;
    let mut targets = dom::select_all(&document, contract::SECTIONS);
    targets.extend(dom::select_all(&document, contract::REVEAL_CARDS));
    if targets.is_empty() {
        return Ok(Guards::default());
    }

    let tracker = Rc::new(RefCell::new(RevealTracker::new(targets.len())));
    let step_ms = config.stagger_step_ms;
    let observed = targets.clone();

    let observer = dom::observe_intersections(
        &targets,
        config.reveal_threshold,
        Some(config.reveal_root_margin.as_str()),
        move |entry, observer| {
            let target = entry.target();
            let Some(index) = observed.iter().position(|known| known == &target) else {
                return;
            };
            if !tracker.borrow_mut().observe(index, entry.is_intersecting()) {
                return;
            }

            dom::set_class(&target, contract::CLASS_ANIMATE_IN, true);
            let children = dom::select_all_in(&target, contract::STAGGER_CHILDREN);
            let delays = reveal::stagger_delays(children.len(), step_ms);
            for (child, delay) in children.into_iter().zip(delays) {
                Timeout::new(delay, move || {
                    dom::set_class(&child, contract::CLASS_ANIMATE_IN, true);
                })
                .forget();
            }
            observer.unobserve(&target);

            logger.debug(
                "element_revealed",
                serde_json::json!({
                    "index": index,
                    "revealed": tracker.borrow().entered_count(),
                }),
            );
        },
    )?;

    let mut guards = Guards::default();
    guards.observe(observer);
    Ok(guards)
}

fn run_counter_step(stat: Element, mut animation: CounterAnimation, interval_ms: u32) {
    let Some(frame) = animation.tick() else {
        return;
    };
    stat.set_text_content(Some(&frame));

    if !animation.is_finished() {
        Timeout::new(interval_ms, move || {
            run_counter_step(stat, animation, interval_ms);
        })
        .forget();
    }
}

pub fn install_stats(
    config: &InteractionConfig,
    reduced_motion: bool,
    logger: Logger,
) -> Result<Guards> {
    let document = dom::browser_document()?;
    let region = dom::select_one(&document, contract::HERO_STATS)?;
    if reduced_motion {
        return Err(InteractionError::Disabled("reduced motion"));
    }

    let trigger = Rc::new(RefCell::new(StatsTrigger::default()));
    let steps = config.stat_steps;
    let interval_ms = config.stat_interval_ms;

    let observer = dom::observe_intersections(
        &[region.into()],
        config.stats_threshold,
        None,
        move |entry, observer| {
            if !entry.is_intersecting() || !trigger.borrow_mut().fire() {
                return;
            }
            observer.unobserve(&entry.target());

            let Ok(document) = dom::browser_document() else {
                return;
            };
            let mut animated = 0usize;
            for stat in dom::select_all(&document, contract::STAT_NUMBER) {
                let text = stat.text_content().unwrap_or_default();
                let Some(target) = StatTarget::parse(&text) else {
                    continue;
                };
                animated += 1;
                run_counter_step(stat, CounterAnimation::new(target, steps), interval_ms);
            }

            logger.debug("stats_counting", serde_json::json!({ "counters": animated }));
        },
    )?;

    let mut guards = Guards::default();
    guards.observe(observer);
    Ok(guards)
}

pub fn install_lazy_images(config: &InteractionConfig) -> Result<Guards> {
    let document = dom::browser_document()?;
    let images = dom::select_all(&document, contract::LAZY_IMAGES);
    if images.is_empty() {
        return Ok(Guards::default());
    }

    let breakpoint = config.mobile_breakpoint_px;
    let observer = dom::observe_intersections(&images, 0.0, None, move |entry, observer| {
        if !entry.is_intersecting() {
            return;
        }
        let target = entry.target();
        observer.unobserve(&target);

        let src = target.get_attribute(contract::DATA_SRC);
        let mobile_src = target.get_attribute(contract::DATA_SRC_MOBILE);
        let (viewport_width, _) = dom::viewport_size();
        let Some(chosen) = reveal::lazy_image_source(
            src.as_deref(),
            mobile_src.as_deref(),
            viewport_width,
            breakpoint,
        ) else {
            return;
        };

        if let Some(image) = target.dyn_ref::<HtmlImageElement>() {
            image.set_src(chosen);
        } else {
            let _ = target.set_attribute("src", chosen);
        }
        let _ = target.remove_attribute(contract::DATA_SRC);
        let _ = target.remove_attribute(contract::DATA_SRC_MOBILE);
        dom::set_class(&target, contract::CLASS_LOADED, true);
    })?;

    let mut guards = Guards::default();
    guards.observe(observer);
    Ok(guards)
}
