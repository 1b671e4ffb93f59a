use gloo_timers::callback::{Interval, Timeout};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use super::dom::{self, Guards, TransformStore};
use super::error::Result;
use crate::config::InteractionConfig;
use crate::contract;
use crate::motion::DriftRange;

fn unit_samples() -> [f64; 3] {
    [
        js_sys::Math::random(),
        js_sys::Math::random(),
        js_sys::Math::random(),
    ]
}

pub fn install_floating(
    document: &Document,
    transforms: TransformStore,
    reduced_motion: bool,
) -> Result<Guards> {
    let mut guards = Guards::default();

    for (selector, range) in [
        (contract::FLOATING_ELEMENT, DriftRange::FLOATING_ELEMENT),
        (contract::FLOATING_CARD, DriftRange::FLOATING_CARD),
    ] {
        for (index, element) in dom::select_html(document, selector).into_iter().enumerate() {
            if reduced_motion {
                dom::set_style(&element, "animation", "none");
                continue;
            }

            let transforms = transforms.clone();
            guards.every(Interval::new(range.interval_ms(index), move || {
                let drift = range.sample(unit_samples());
                transforms.update(&element, |layers| layers.drift = drift);
            }));
        }
    }

    Ok(guards)
}

pub fn install_page_polish(
    document: &Document,
    config: &InteractionConfig,
    reduced_motion: bool,
) -> Result<Guards> {
    if reduced_motion {
        if let Some(root) = document
            .document_element()
            .and_then(|root| root.dyn_into::<HtmlElement>().ok())
        {
            dom::set_style(&root, "--ease-smooth", "ease");
        }
    }

    for (index, item) in dom::select_html(document, contract::TECH_GRID_ITEMS)
        .iter()
        .enumerate()
    {
        let delay = index as f64 * 0.05;
        dom::set_style(item, "animation-delay", &format!("{delay}s"));
    }

    if let Some(body) = document.body() {
        dom::set_style(&body, "opacity", "0");
        Timeout::new(config.fade_in_delay_ms, move || {
            dom::set_style(&body, "transition", "opacity 0.5s ease");
            dom::set_style(&body, "opacity", "1");
        })
        .forget();
    }

    Ok(Guards::default())
}
