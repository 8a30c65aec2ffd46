//! Failure taxonomy for surface initialization and shader builds.
//!
//! Everything here is raised synchronously from the attach path; teardown
//! never fails. Shader and link failures carry the driver-reported info log
//! verbatim so a caller supplying a custom fragment source sees the real
//! diagnostic instead of a silent black canvas.

use std::fmt;

use thiserror::Error;

/// Which stage of the shader pair a compile diagnostic belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    /// The host environment could not produce a usable rendering context or
    /// DOM surface. Not retried; the overlay stays unrendered.
    #[error("rendering context unavailable: {0}")]
    Initialization(String),

    /// A shader source failed to compile. `log` is the driver info log.
    #[error("{stage} shader failed to compile: {log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    /// Both stages compiled but the program failed to link.
    #[error("shader program failed to link: {log}")]
    ProgramLink { log: String },
}

impl RenderError {
    /// Stable kind name, exposed as the JS `Error.name` at the boundary so
    /// callers can branch on kind rather than parsing the message.
    pub fn kind(&self) -> &'static str {
        match self {
            RenderError::Initialization(_) => "InitializationError",
            RenderError::ShaderCompile { .. } => "ShaderCompileError",
            RenderError::ProgramLink { .. } => "ProgramLinkError",
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl From<RenderError> for wasm_bindgen::JsValue {
    fn from(err: RenderError) -> Self {
        let js = js_sys::Error::new(&err.to_string());
        js.set_name(err.kind());
        js.into()
    }
}

/// Best-effort text for a thrown JS value when mapping it into
/// [`RenderError::Initialization`].
#[cfg(target_arch = "wasm32")]
pub(crate) fn js_text(value: &wasm_bindgen::JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_error_carries_stage_and_log() {
        let err = RenderError::ShaderCompile {
            stage: ShaderStage::Fragment,
            log: "ERROR: 0:3: 'foo' : undeclared identifier".into(),
        };
        let text = err.to_string();
        assert!(text.contains("fragment"));
        assert!(text.contains("undeclared identifier"));
        assert_eq!(err.kind(), "ShaderCompileError");
    }

    #[test]
    fn link_error_carries_log() {
        let err = RenderError::ProgramLink {
            log: "varying mismatch".into(),
        };
        assert!(err.to_string().contains("varying mismatch"));
        assert_eq!(err.kind(), "ProgramLinkError");
    }

    #[test]
    fn initialization_kind() {
        let err = RenderError::Initialization("webgl2 unsupported".into());
        assert_eq!(err.kind(), "InitializationError");
        assert!(err.to_string().contains("webgl2 unsupported"));
    }
}
