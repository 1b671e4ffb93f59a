use gloo_events::EventListener;
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{console, PerformanceEntry};

use super::dom::{self, Guards};
use super::error::Result;
use crate::config::PageProfile;
use crate::telemetry::Logger;

const HEADLINE_STYLE: &str = "font-size: 24px; font-weight: bold; color: #D4634A;";
const BODY_STYLE: &str = "font-size: 14px; color: #1A2332;";
const FOOTNOTE_STYLE: &str = "font-size: 12px; color: #64748B;";

#[derive(Serialize)]
struct PaintTiming {
    name: String,
    start_ms: f64,
}

fn styled(text: &str, style: &str) {
    console::log_2(
        &JsValue::from_str(&format!("%c{text}")),
        &JsValue::from_str(style),
    );
}

pub fn print_banner(page: PageProfile) {
    match page {
        PageProfile::Home => {
            styled("Hey there! 👋", HEADLINE_STYLE);
            styled("Like what you see? Let's build something together!", BODY_STYLE);
            styled("Say hello through the contact form below.", FOOTNOTE_STYLE);
        }
        PageProfile::NotFound => {
            styled("404 - Page Not Found", HEADLINE_STYLE);
            styled("Looks like this page got lost! Head back to safety:", BODY_STYLE);
            styled("/", &format!("{FOOTNOTE_STYLE} font-style: italic;"));
        }
    }
}

fn paint_timings() -> Vec<PaintTiming> {
    let Some(performance) = dom::browser_window().ok().and_then(|w| w.performance()) else {
        return Vec::new();
    };

    performance
        .get_entries_by_type("paint")
        .iter()
        .filter_map(|entry| entry.dyn_into::<PerformanceEntry>().ok())
        .map(|entry| PaintTiming {
            name: entry.name(),
            start_ms: entry.start_time(),
        })
        .collect()
}

fn report_load(page: PageProfile, logger: Logger) {
    let load_ms = dom::browser_window()
        .ok()
        .and_then(|w| w.performance())
        .map(|performance| performance.now())
        .unwrap_or(0.0);
    let paints = serde_json::to_value(paint_timings()).unwrap_or_default();

    logger.info(
        "page_loaded",
        serde_json::json!({
            "page": page,
            "load_ms": (load_ms * 100.0).round() / 100.0,
            "paint": paints,
        }),
    );
}

pub fn install_load_timing(page: PageProfile, logger: Logger) -> Result<Guards> {
    let window = dom::browser_window()?;
    let document = dom::browser_document()?;

    let mut guards = Guards::default();
    if document.ready_state() == "complete" {
        report_load(page, logger);
    } else {
        guards.listen(EventListener::once(&window, "load", move |_| {
            report_load(page, logger);
        }));
    }
    Ok(guards)
}
