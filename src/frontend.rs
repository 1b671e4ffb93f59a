mod decor;
mod diagnostics;
mod dom;
mod error;
mod handlers;
mod observers;
mod overlay;
mod pointer;
mod scroll_reactor;

use gloo_events::EventListener;
use serde_json::json;
use std::cell::RefCell;
use web_sys::Document;

use crate::config::InteractionConfig;
use crate::telemetry::Logger;
use dom::{Guards, TransformStore};
use error::Result;
use overlay::{Overlay, OverlayHandle};

thread_local! {
    static ACTIVE_PAGE: RefCell<Option<PageInteractions>> = const { RefCell::new(None) };
}

fn body_data(document: &Document, key: &str) -> Option<String> {
    document
        .body()
        .and_then(|body| body.get_attribute(&format!("data-{key}")))
}

pub struct PageInteractions {
    guards: Guards,
    overlay: Option<yew::AppHandle<Overlay>>,
    logger: Logger,
}

impl PageInteractions {
    pub fn start(document: &Document, config: InteractionConfig) -> Self {
        let logger = Logger::new(config.log_level);
        let reduced_motion = dom::prefers_reduced_motion();
        let transforms = TransformStore::default();
        let overlay_handle = OverlayHandle::new(config.toast);

        let mut page = Self {
            guards: Guards::default(),
            overlay: None,
            logger,
        };

        page.overlay = page.install("overlay", overlay::mount(document, overlay_handle.clone()));

        let scroll = scroll_reactor::install(
            &config,
            overlay_handle.clone(),
            transforms.clone(),
            reduced_motion,
            logger,
        );
        page.attach("scroll_reactor", scroll);
        page.attach("reveal", observers::install_reveal(&config, logger));
        page.attach("stats", observers::install_stats(&config, reduced_motion, logger));
        page.attach("lazy_images", observers::install_lazy_images(&config));
        page.attach("cursor", pointer::install_cursor(&config));
        page.attach(
            "tilt",
            pointer::install_tilt(&config, transforms.clone(), reduced_motion),
        );

        let menu = page
            .install("menu", handlers::install_menu(document))
            .map(|(menu, guards)| {
                page.guards.absorb(guards);
                menu
            });
        page.attach(
            "smooth_scroll",
            handlers::install_smooth_scroll(document, &config),
        );
        page.attach(
            "email_copy",
            handlers::install_email_copy(document, overlay_handle, logger),
        );
        page.attach(
            "contact_form",
            handlers::install_contact_form(document, &config),
        );
        page.attach(
            "keyboard",
            handlers::install_keyboard(document, &config, menu, logger),
        );
        page.attach(
            "project_links",
            handlers::install_project_link_log(document, logger),
        );

        page.attach(
            "floating",
            decor::install_floating(document, transforms, reduced_motion),
        );
        page.attach(
            "page_polish",
            decor::install_page_polish(document, &config, reduced_motion),
        );
        page.attach(
            "load_timing",
            diagnostics::install_load_timing(config.page, logger),
        );

        logger.info(
            "interactions_started",
            json!({
                "page": config.page,
                "reduced_motion": reduced_motion,
                "handles": page.guards.len(),
            }),
        );
        page
    }

    fn install<T>(&self, feature: &'static str, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => {
                self.logger
                    .debug("feature_installed", json!({ "feature": feature }));
                Some(value)
            }
            Err(error) => {
                self.logger.info(
                    "feature_skipped",
                    json!({ "feature": feature, "reason": error.to_string() }),
                );
                None
            }
        }
    }

    fn attach(&mut self, feature: &'static str, result: Result<Guards>) {
        if let Some(guards) = self.install(feature, result) {
            self.guards.absorb(guards);
        }
    }

    pub fn stop(self) {
        let Self {
            guards,
            overlay,
            logger,
        } = self;
        drop(guards);
        if let Some(overlay) = overlay {
            overlay.destroy();
        }
        logger.debug("interactions_stopped", json!({}));
    }
}

pub fn run() {
    console_error_panic_hook::set_once();

    let Ok(document) = dom::browser_document() else {
        return;
    };
    let config = InteractionConfig::from_lookup(|key| body_data(&document, key));
    diagnostics::print_banner(config.page);

    let page = PageInteractions::start(&document, config);
    ACTIVE_PAGE.with(|slot| {
        if let Some(previous) = slot.borrow_mut().replace(page) {
            previous.stop();
        }
    });

    if let Ok(window) = dom::browser_window() {
        EventListener::once(&window, "pagehide", |_| {
            let page = ACTIVE_PAGE.with(|slot| slot.borrow_mut().take());
            if let Some(page) = page {
                page.stop();
            }
        })
        .forget();
    }
}
