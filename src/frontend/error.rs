use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum InteractionError {
    #[error("missing element: {0}")]
    MissingElement(&'static str),

    #[error("browser API unavailable: {0}")]
    Unavailable(&'static str),

    #[error("disabled: {0}")]
    Disabled(&'static str),

    #[error("javascript error: {0}")]
    Js(String),
}

impl From<JsValue> for InteractionError {
    fn from(value: JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

pub type Result<T> = std::result::Result<T, InteractionError>;
