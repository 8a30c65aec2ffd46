//! Lifecycle controller: the exported overlay component.
//!
//! `SnowfallOverlay` wraps a host element and reacts to the host's lifecycle
//! signals through `onAttach` / `onDetach` / `onResize`. A custom-element
//! shim on the JS side typically forwards `connectedCallback` and
//! `disconnectedCallback` here.

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, HtmlElement, ShadowRoot, WebGl2RenderingContext as GL, Window};

use crate::error::RenderError;
use crate::pipeline::Pipeline;
use crate::scheduler::{FrameLoop, ResizeSubscription};
use crate::shaders::ShaderSource;
use crate::surface;

/// Live rendering state; exists exactly while the overlay is attached and
/// initialized.
struct Active {
    shadow: ShadowRoot,
    canvas: HtmlCanvasElement,
    gl: GL,
    pipeline: Rc<Pipeline>,
    frames: FrameLoop,
    resize: ResizeSubscription,
}

/// Full-viewport animated snowfall surface rendered behind pointer input.
#[wasm_bindgen]
pub struct SnowfallOverlay {
    host: HtmlElement,
    fragment_override: Option<String>,
    active: Option<Active>,
    /// Diagnostic counters, accumulated over the component's lifetime so
    /// they stay readable after a detach.
    frames_drawn: Rc<Cell<u32>>,
    last_frame_time: Rc<Cell<f64>>,
}

#[wasm_bindgen]
impl SnowfallOverlay {
    /// Create an overlay bound to `host`. Nothing renders until `onAttach`.
    #[wasm_bindgen(constructor)]
    pub fn new(host: HtmlElement) -> SnowfallOverlay {
        SnowfallOverlay {
            host,
            fragment_override: None,
            active: None,
            frames_drawn: Rc::new(Cell::new(0)),
            last_frame_time: Rc::new(Cell::new(0.0)),
        }
    }

    /// Replace the default snow effect with caller-supplied fragment GLSL.
    /// Takes effect on the next `onAttach`; the vertex stage is fixed.
    #[wasm_bindgen(js_name = setFragmentShader)]
    pub fn set_fragment_shader(&mut self, source: String) {
        self.fragment_override = Some(source);
    }

    /// Mount notification. Idempotent: a second attach without an intervening
    /// detach is a no-op, guarding against spurious re-attachment signals.
    ///
    /// Fails synchronously with an `InitializationError`,
    /// `ShaderCompileError` or `ProgramLinkError` (as the JS `Error.name`);
    /// on failure no partially-initialized surface is left behind.
    #[wasm_bindgen(js_name = onAttach)]
    pub fn on_attach(&mut self) -> Result<(), JsValue> {
        if self.active.is_some() {
            return Ok(());
        }
        self.active = Some(self.init()?);
        Ok(())
    }

    /// Unmount notification. Always releases everything, even after a failed
    /// or absent initialization; steps touching absent resources are skipped.
    #[wasm_bindgen(js_name = onDetach)]
    pub fn on_detach(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };
        // Exact reverse of the init order.
        active.frames.cancel();
        active.resize.unsubscribe();
        active.pipeline.release(&active.gl);
        surface::lose_context(&active.gl);
        surface::clear(&active.shadow, &active.canvas);
    }

    /// Force a viewport reconfiguration outside the window resize signal.
    #[wasm_bindgen(js_name = onResize)]
    pub fn on_resize(&self) {
        if let Some(active) = &self.active {
            surface::resize(
                &self.host,
                &active.canvas,
                &active.gl,
                active.pipeline.resolution(),
            );
        }
    }

    /// Whether the overlay currently owns a rendering context.
    #[wasm_bindgen(js_name = isActive)]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Frames drawn over the component's lifetime.
    #[wasm_bindgen(js_name = frameCount)]
    pub fn frame_count(&self) -> u32 {
        self.frames_drawn.get()
    }

    /// Timestamp handed to the most recent frame, 0 before the first one.
    #[wasm_bindgen(js_name = lastFrameTime)]
    pub fn last_frame_time(&self) -> f64 {
        self.last_frame_time.get()
    }
}

impl SnowfallOverlay {
    /// Strict initialization order: shadow root, style, canvas, context,
    /// program (activated, geometry uploaded), clear, initial resize, resize
    /// subscription, first frame. Any failure unwinds what was built so far.
    fn init(&self) -> Result<Active, RenderError> {
        let window =
            web_sys::window().ok_or_else(|| RenderError::Initialization("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| RenderError::Initialization("no document".into()))?;

        let shadow = surface::ensure_shadow(&self.host)?;
        surface::inject_style(&document, &shadow)?;
        let canvas = surface::create_canvas(&document, &shadow)?;

        let gl = match surface::acquire_context(&canvas) {
            Ok(gl) => gl,
            Err(err) => {
                surface::clear(&shadow, &canvas);
                return Err(err);
            }
        };

        let source = match &self.fragment_override {
            Some(body) => ShaderSource::with_fragment(body),
            None => ShaderSource::default_effect(),
        };
        let pipeline = match Pipeline::build(&gl, &source) {
            Ok(pipeline) => Rc::new(pipeline),
            Err(err) => {
                surface::lose_context(&gl);
                surface::clear(&shadow, &canvas);
                return Err(err);
            }
        };

        gl.clear_color(0.0, 0.0, 0.0, 0.0);
        gl.clear(GL::COLOR_BUFFER_BIT);

        surface::resize(&self.host, &canvas, &gl, pipeline.resolution());

        let resize = match self.subscribe_resize(&window, &canvas, &gl, &pipeline) {
            Ok(subscription) => subscription,
            Err(err) => {
                pipeline.release(&gl);
                surface::lose_context(&gl);
                surface::clear(&shadow, &canvas);
                return Err(err);
            }
        };

        let frame_gl = gl.clone();
        let frame_pipeline = Rc::clone(&pipeline);
        let frames_drawn = Rc::clone(&self.frames_drawn);
        let last_frame_time = Rc::clone(&self.last_frame_time);
        let frames = match FrameLoop::start(window, move |timestamp| {
            frames_drawn.set(frames_drawn.get() + 1);
            last_frame_time.set(timestamp);
            frame_pipeline.draw(&frame_gl, timestamp)
        }) {
            Ok(frames) => frames,
            Err(err) => {
                resize.unsubscribe();
                pipeline.release(&gl);
                surface::lose_context(&gl);
                surface::clear(&shadow, &canvas);
                return Err(err);
            }
        };

        Ok(Active {
            shadow,
            canvas,
            gl,
            pipeline,
            frames,
            resize,
        })
    }

    fn subscribe_resize(
        &self,
        window: &Window,
        canvas: &HtmlCanvasElement,
        gl: &GL,
        pipeline: &Rc<Pipeline>,
    ) -> Result<ResizeSubscription, RenderError> {
        let host = self.host.clone();
        let canvas = canvas.clone();
        let gl = gl.clone();
        let pipeline = Rc::clone(pipeline);
        ResizeSubscription::subscribe(window, move || {
            surface::resize(&host, &canvas, &gl, pipeline.resolution());
        })
    }
}
