use thiserror::Error;

/// Failures raised while wiring effects to the page.
///
/// None of these surface to the visitor: the entry point logs them and the
/// affected effect simply does not appear.
#[derive(Debug, Error)]
pub enum FxError {
    #[error("element not found: {0}")]
    MissingElement(String),
    #[error("{0} context unavailable")]
    Context(&'static str),
    #[error("shader: {0}")]
    Shader(String),
    #[error("js: {0}")]
    Js(String),
}

pub type FxResult<T> = Result<T, FxError>;

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for FxError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        FxError::Js(format!("{value:?}"))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<FxError> for wasm_bindgen::JsValue {
    fn from(err: FxError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}
