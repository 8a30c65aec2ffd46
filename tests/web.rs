#![cfg(target_arch = "wasm32")]

//! In-browser integration tests; run with `wasm-pack test --headless`.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;

use snowfall_overlay::SnowfallOverlay;

wasm_bindgen_test_configure!(run_in_browser);

/// Await the next animation frame, returning its timestamp.
async fn next_frame() -> f64 {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let cb = Closure::once_into_js(move |timestamp: f64| {
            resolve
                .call1(&JsValue::NULL, &JsValue::from(timestamp))
                .unwrap();
        });
        web_sys::window()
            .unwrap()
            .request_animation_frame(cb.unchecked_ref())
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap().as_f64().unwrap()
}

fn make_host(width: u32, height: u32) -> web_sys::HtmlElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let host = document
        .create_element("div")
        .unwrap()
        .dyn_into::<web_sys::HtmlElement>()
        .unwrap();
    host.set_attribute(
        "style",
        &format!("display:block;width:{width}px;height:{height}px;"),
    )
    .unwrap();
    document.body().unwrap().append_child(&host).unwrap();
    host
}

fn canvas_count(host: &web_sys::HtmlElement) -> u32 {
    host.shadow_root()
        .map(|shadow| shadow.query_selector_all("canvas").unwrap().length())
        .unwrap_or(0)
}

#[wasm_bindgen_test]
fn attach_is_idempotent() {
    let host = make_host(80, 60);
    let mut overlay = SnowfallOverlay::new(host.clone());

    overlay.on_attach().unwrap();
    overlay.on_attach().unwrap();

    assert!(overlay.is_active());
    assert_eq!(canvas_count(&host), 1);
    overlay.on_detach();
}

#[wasm_bindgen_test]
fn detach_empties_the_shadow_root() {
    let host = make_host(80, 60);
    let mut overlay = SnowfallOverlay::new(host.clone());

    overlay.on_attach().unwrap();
    overlay.on_detach();

    assert!(!overlay.is_active());
    assert_eq!(canvas_count(&host), 0);
    assert_eq!(host.shadow_root().unwrap().child_nodes().length(), 0);

    // Detach with nothing attached is a no-op.
    overlay.on_detach();
}

#[wasm_bindgen_test]
fn reattach_after_detach_works() {
    let host = make_host(80, 60);
    let mut overlay = SnowfallOverlay::new(host.clone());

    overlay.on_attach().unwrap();
    overlay.on_detach();
    overlay.on_attach().unwrap();

    assert_eq!(canvas_count(&host), 1);
    overlay.on_detach();
}

#[wasm_bindgen_test]
fn dpr_attribute_scales_the_backing_buffer() {
    let host = make_host(100, 50);
    host.set_attribute("dpr", "2").unwrap();
    let mut overlay = SnowfallOverlay::new(host.clone());

    overlay.on_attach().unwrap();

    let canvas = host
        .shadow_root()
        .unwrap()
        .query_selector("canvas")
        .unwrap()
        .unwrap()
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .unwrap();
    assert_eq!(canvas.width(), 200);
    assert_eq!(canvas.height(), 100);

    // The resolution uniform must hold the backing-buffer size, not the CSS
    // size. The program is still active, so read it back from the context.
    let gl = canvas
        .get_context("webgl2")
        .unwrap()
        .unwrap()
        .dyn_into::<web_sys::WebGl2RenderingContext>()
        .unwrap();
    let program = gl
        .get_parameter(web_sys::WebGl2RenderingContext::CURRENT_PROGRAM)
        .unwrap()
        .dyn_into::<web_sys::WebGlProgram>()
        .unwrap();
    let location = gl.get_uniform_location(&program, "resolution").unwrap();
    let resolution = gl
        .get_uniform(&program, &location)
        .dyn_into::<js_sys::Float32Array>()
        .unwrap();
    assert_eq!(resolution.get_index(0), 200.0);
    assert_eq!(resolution.get_index(1), 100.0);

    overlay.on_detach();
}

#[wasm_bindgen_test]
async fn frame_loop_ticks_until_detach_and_not_after() {
    let host = make_host(80, 60);
    let mut overlay = SnowfallOverlay::new(host.clone());
    overlay.on_attach().unwrap();

    // The loop registered its callback before ours, so each awaited frame
    // means at least one more tick has run.
    next_frame().await;
    let early_count = overlay.frame_count();
    let early_time = overlay.last_frame_time();
    assert!(early_count >= 1);

    next_frame().await;
    let later_count = overlay.frame_count();
    let later_time = overlay.last_frame_time();
    assert!(later_count > early_count);
    assert!(later_time >= early_time);

    overlay.on_detach();
    let frozen = overlay.frame_count();
    next_frame().await;
    next_frame().await;
    assert_eq!(overlay.frame_count(), frozen);
}

#[wasm_bindgen_test]
fn custom_fragment_shader_is_accepted() {
    let host = make_host(80, 60);
    let mut overlay = SnowfallOverlay::new(host.clone());
    overlay.set_fragment_shader(
        "uniform float time; uniform vec2 resolution; \
         void main() { gl_FragColor = vec4(1.0, 0.0, 0.0, 1.0); }"
            .into(),
    );

    overlay.on_attach().unwrap();
    assert!(overlay.is_active());
    overlay.on_detach();
}

#[wasm_bindgen_test]
fn broken_fragment_shader_fails_attach_cleanly() {
    let host = make_host(80, 60);
    let mut overlay = SnowfallOverlay::new(host.clone());
    overlay.set_fragment_shader("this is not glsl".into());

    let err = overlay.on_attach().unwrap_err();
    let err: js_sys::Error = err.dyn_into().unwrap();
    assert_eq!(err.name(), "ShaderCompileError");

    // The abort left no half-built surface behind.
    assert!(!overlay.is_active());
    assert_eq!(canvas_count(&host), 0);
}
