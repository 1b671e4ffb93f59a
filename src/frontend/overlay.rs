use gloo_timers::callback::Timeout;
use std::{cell::RefCell, rc::Rc};
use web_sys::Document;
use yew::prelude::*;

use super::error::{InteractionError, Result};
use crate::toast::{ToastQueue, ToastTiming};

const OVERLAY_STYLES: &str = r#"
.scroll-progress {
  position: fixed;
  top: 0;
  left: 0;
  height: 3px;
  background: linear-gradient(90deg, var(--color-terracotta) 0%, var(--color-coral) 100%);
  z-index: 10001;
  transition: width 0.1s ease;
  pointer-events: none;
}

.toast-stack {
  position: fixed;
  right: 40px;
  bottom: 40px;
  display: flex;
  flex-direction: column;
  align-items: flex-end;
  gap: 12px;
  z-index: 10000;
  pointer-events: none;
}

.toast {
  padding: 16px 24px;
  background: var(--color-navy, #1A2332);
  color: var(--color-white, #FFFFFF);
  font-family: var(--font-mono, 'Space Mono', monospace);
  font-size: 0.875rem;
  font-weight: 700;
  border-radius: 8px;
  box-shadow: var(--shadow-xl, 0 20px 40px rgba(26, 35, 50, 0.2));
  animation: slideInRight 0.3s ease forwards;
}

.toast.is-leaving {
  animation: slideOutRight 0.3s ease forwards;
}

.animate-in {
  animation: fadeInUp 0.8s var(--ease-smooth, ease) backwards;
}

@keyframes slideInRight {
  from { opacity: 0; transform: translateX(100px); }
  to { opacity: 1; transform: translateX(0); }
}

@keyframes slideOutRight {
  from { opacity: 1; transform: translateX(0); }
  to { opacity: 0; transform: translateX(100px); }
}

@keyframes fadeInUp {
  from { opacity: 0; transform: translateY(40px); }
  to { opacity: 1; transform: translateY(0); }
}
"#;

pub enum OverlayAction {
    Progress(f64),
    Notify { message: String, now: f64 },
    Advance(f64),
}

#[derive(Clone, PartialEq)]
struct OverlayState {
    progress: f64,
    toasts: ToastQueue,
}

impl Reducible for OverlayState {
    type Action = OverlayAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            OverlayAction::Progress(progress) => {
                if progress == next.progress {
                    return self;
                }
                next.progress = progress;
            }
            OverlayAction::Notify { message, now } => {
                next.toasts.advance(now);
                next.toasts.push(message, now);
            }
            OverlayAction::Advance(now) => next.toasts.advance(now),
        }
        Rc::new(next)
    }
}

struct OverlayBridge {
    timing: ToastTiming,
    dispatch: RefCell<Option<Callback<OverlayAction>>>,
    pending: RefCell<Vec<OverlayAction>>,
}

/// Handle the rest of the page uses to drive the overlay. Actions sent
/// before the component has mounted are queued and replayed.
#[derive(Clone)]
pub struct OverlayHandle {
    bridge: Rc<OverlayBridge>,
}

impl PartialEq for OverlayHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.bridge, &other.bridge)
    }
}

impl OverlayHandle {
    pub fn new(timing: ToastTiming) -> Self {
        Self {
            bridge: Rc::new(OverlayBridge {
                timing,
                dispatch: RefCell::new(None),
                pending: RefCell::new(Vec::new()),
            }),
        }
    }

    fn attach(&self, callback: Callback<OverlayAction>) {
        let queued: Vec<OverlayAction> = self.bridge.pending.borrow_mut().drain(..).collect();
        *self.bridge.dispatch.borrow_mut() = Some(callback.clone());
        for action in queued {
            callback.emit(action);
        }
    }

    fn send(&self, action: OverlayAction) {
        let callback = self.bridge.dispatch.borrow().clone();
        match callback {
            Some(callback) => callback.emit(action),
            None => {
                let mut pending = self.bridge.pending.borrow_mut();
                if matches!(action, OverlayAction::Progress(_)) {
                    pending.retain(|queued| !matches!(queued, OverlayAction::Progress(_)));
                }
                pending.push(action);
            }
        }
    }

    pub fn set_progress(&self, percent: f64) {
        self.send(OverlayAction::Progress(percent));
    }

    pub fn notify(&self, message: impl Into<String>) {
        self.send(OverlayAction::Notify {
            message: message.into(),
            now: js_sys::Date::now(),
        });

        let timing = self.bridge.timing;
        for delay in [
            timing.exit_ms,
            timing.display_ms,
            timing.display_ms.saturating_add(timing.exit_ms),
        ] {
            let handle = self.clone();
            Timeout::new(delay, move || {
                handle.send(OverlayAction::Advance(js_sys::Date::now()));
            })
            .forget();
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct OverlayProps {
    pub handle: OverlayHandle,
}

#[function_component(Overlay)]
pub fn overlay(props: &OverlayProps) -> Html {
    let timing = props.handle.bridge.timing;
    let state = use_reducer(move || OverlayState {
        progress: 0.0,
        toasts: ToastQueue::new(timing),
    });

    {
        let handle = props.handle.clone();
        let dispatcher = state.dispatcher();
        use_effect_with((), move |_| {
            handle.attach(Callback::from(move |action: OverlayAction| {
                dispatcher.dispatch(action)
            }));
            || ()
        });
    }

    let progress_style = format!("width: {:.2}%;", state.progress);

    html! {
        <>
            <style>{OVERLAY_STYLES}</style>
            <div class="scroll-progress" style={progress_style} aria-hidden="true"></div>
            <div class="toast-stack" role="status" aria-live="polite">
                { for state.toasts.iter().map(|toast| html! {
                    <div
                        key={toast.id.to_string()}
                        class={classes!("toast", toast.is_leaving().then_some("is-leaving"))}
                    >
                        {toast.message.clone()}
                    </div>
                }) }
            </div>
        </>
    }
}

pub fn mount(document: &Document, handle: OverlayHandle) -> Result<yew::AppHandle<Overlay>> {
    let body = document
        .body()
        .ok_or(InteractionError::MissingElement("body"))?;
    let root = document.create_element("div")?;
    root.set_class_name("interaction-overlay");
    body.append_child(&root)?;

    Ok(yew::Renderer::<Overlay>::with_root_and_props(root, OverlayProps { handle }).render())
}
