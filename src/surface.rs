//! Context & surface management: the style-isolated shadow host, the canvas,
//! WebGL2 context acquisition, and viewport/DPI handling.

use wasm_bindgen::JsCast;
use web_sys::{
    Document, HtmlCanvasElement, HtmlElement, ShadowRoot, ShadowRootInit, ShadowRootMode,
    WebGl2RenderingContext as GL, WebGlUniformLocation, WebglLoseContext,
};

use crate::dpr;
use crate::error::{js_text, RenderError};

/// Fixed overlay styling for the shadow host: full viewport, stacked above
/// page content, transparent to pointer input.
const HOST_STYLE: &str = "
:host {
  display: block;
  position: fixed;
  top: 0;
  bottom: 0;
  left: 0;
  right: 0;
  z-index: 999;
  pointer-events: none;
}
";

/// Attribute on the host element overriding the platform device pixel ratio.
const DPR_ATTRIBUTE: &str = "dpr";

/// Return the host's shadow root, attaching an open one on first use.
/// `attachShadow` throws when called twice on the same element, so the root
/// is reused across detach/attach cycles.
pub(crate) fn ensure_shadow(host: &HtmlElement) -> Result<ShadowRoot, RenderError> {
    if let Some(existing) = host.shadow_root() {
        return Ok(existing);
    }
    host.attach_shadow(&ShadowRootInit::new(ShadowRootMode::Open))
        .map_err(|e| RenderError::Initialization(js_text(&e)))
}

/// Inject the fixed overlay style into the shadow scope.
pub(crate) fn inject_style(document: &Document, shadow: &ShadowRoot) -> Result<(), RenderError> {
    let style = document
        .create_element("style")
        .map_err(|e| RenderError::Initialization(js_text(&e)))?;
    style.set_text_content(Some(HOST_STYLE));
    shadow
        .append_child(&style)
        .map_err(|e| RenderError::Initialization(js_text(&e)))?;
    Ok(())
}

/// Create the canvas and append it to the shadow root.
pub(crate) fn create_canvas(
    document: &Document,
    shadow: &ShadowRoot,
) -> Result<HtmlCanvasElement, RenderError> {
    let canvas = document
        .create_element("canvas")
        .map_err(|e| RenderError::Initialization(js_text(&e)))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| RenderError::Initialization("canvas element of unexpected type".into()))?;
    shadow
        .append_child(&canvas)
        .map_err(|e| RenderError::Initialization(js_text(&e)))?;
    Ok(canvas)
}

/// Acquire the WebGL2 context bound 1:1 to the canvas.
pub(crate) fn acquire_context(canvas: &HtmlCanvasElement) -> Result<GL, RenderError> {
    canvas
        .get_context("webgl2")
        .map_err(|e| RenderError::Initialization(js_text(&e)))?
        .ok_or_else(|| RenderError::Initialization("WebGL2 not supported".into()))?
        .dyn_into::<GL>()
        .map_err(|_| RenderError::Initialization("WebGL2 context of unexpected type".into()))
}

/// Recompute the backing buffer as CSS size x device pixel ratio, reconfigure
/// the GL viewport to the full backing buffer, and refresh the `resolution`
/// uniform. Assumes the surface's program is active.
pub(crate) fn resize(
    host: &HtmlElement,
    canvas: &HtmlCanvasElement,
    gl: &GL,
    resolution: Option<&WebGlUniformLocation>,
) {
    let platform = web_sys::window()
        .map(|w| w.device_pixel_ratio())
        .unwrap_or(1.0);
    let ratio = dpr::resolve(host.get_attribute(DPR_ATTRIBUTE).as_deref(), platform);

    canvas.set_width((host.client_width() as f64 * ratio) as u32);
    canvas.set_height((host.client_height() as f64 * ratio) as u32);

    let width = gl.drawing_buffer_width();
    let height = gl.drawing_buffer_height();
    gl.viewport(0, 0, width, height);
    gl.uniform2f(resolution, width as f32, height as f32);
}

/// Ask the driver to release the context's GPU memory immediately instead of
/// waiting for garbage collection. Missing extension support is a tolerated
/// degradation, not a teardown failure.
pub(crate) fn lose_context(gl: &GL) {
    if let Ok(Some(ext)) = gl.get_extension("WEBGL_lose_context") {
        ext.unchecked_into::<WebglLoseContext>().lose_context();
    }
}

/// Remove the canvas and any remaining shadow content.
pub(crate) fn clear(shadow: &ShadowRoot, canvas: &HtmlCanvasElement) {
    let _ = shadow.remove_child(canvas);
    shadow.set_inner_html("");
}
