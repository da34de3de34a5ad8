use thiserror::Error;
use wasm_bindgen::JsValue;

/// Browser-side failures while setting up or running the stage. None of these
/// reach the user; they are logged and the page keeps whatever it has drawn.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("no window available")]
    NoWindow,
    #[error("2d context unavailable")]
    NoContext,
    #[error("failed to load image {0}")]
    ImageLoad(String),
    #[error("javascript error: {0}")]
    Js(String),
}

impl From<JsValue> for StageError {
    fn from(v: JsValue) -> Self {
        StageError::Js(v.as_string().unwrap_or_else(|| format!("{:?}", v)))
    }
}
