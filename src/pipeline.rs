//! Shader pipeline builder: compiles and links the shader pair, caches the
//! attribute/uniform handles, and owns the static quad buffer.

use web_sys::{
    WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader, WebGlUniformLocation,
};

use crate::error::{RenderError, ShaderStage};
use crate::geometry;
use crate::shaders::ShaderSource;

/// A linked program plus its resolved handles, valid for as long as the
/// owning surface's context is. Exactly one per live surface.
pub(crate) struct Pipeline {
    program: WebGlProgram,
    buffer: WebGlBuffer,
    time: Option<WebGlUniformLocation>,
    resolution: Option<WebGlUniformLocation>,
}

impl Pipeline {
    /// Compile both stages, link, activate the program and upload the quad.
    ///
    /// Fragment is compiled first, matching the attach order. Attribute and
    /// uniform locations are resolved once here; they cannot change while the
    /// program is alive.
    pub fn build(gl: &GL, source: &ShaderSource) -> Result<Self, RenderError> {
        let fragment = compile(gl, ShaderStage::Fragment, source.fragment())?;
        let vertex = compile(gl, ShaderStage::Vertex, source.vertex())?;

        let program = gl
            .create_program()
            .ok_or_else(|| RenderError::Initialization("could not create program".into()))?;
        gl.attach_shader(&program, &fragment);
        gl.attach_shader(&program, &vertex);
        gl.link_program(&program);

        // The shader objects are no longer needed once the program holds them.
        gl.delete_shader(Some(&fragment));
        gl.delete_shader(Some(&vertex));

        if !gl
            .get_program_parameter(&program, GL::LINK_STATUS)
            .as_bool()
            .unwrap_or(false)
        {
            let log = gl.get_program_info_log(&program).unwrap_or_default();
            gl.delete_program(Some(&program));
            return Err(RenderError::ProgramLink { log });
        }

        gl.use_program(Some(&program));

        let position = gl.get_attrib_location(&program, "position") as u32;
        let time = gl.get_uniform_location(&program, "time");
        let resolution = gl.get_uniform_location(&program, "resolution");

        let buffer = upload_geometry(gl, position)?;

        Ok(Self {
            program,
            buffer,
            time,
            resolution,
        })
    }

    pub fn resolution(&self) -> Option<&WebGlUniformLocation> {
        self.resolution.as_ref()
    }

    /// Draw one frame: update the time uniform with the host-supplied
    /// timestamp and draw the quad with the active program.
    pub fn draw(&self, gl: &GL, timestamp: f64) {
        gl.uniform1f(self.time.as_ref(), timestamp as f32);
        gl.draw_arrays(GL::TRIANGLES, 0, geometry::VERTEX_COUNT);
    }

    /// Release GPU objects. Safe to call with a context that has already been
    /// lost; the calls become no-ops there.
    pub fn release(&self, gl: &GL) {
        gl.delete_buffer(Some(&self.buffer));
        gl.delete_program(Some(&self.program));
    }
}

fn compile(gl: &GL, stage: ShaderStage, source: &str) -> Result<WebGlShader, RenderError> {
    let kind = match stage {
        ShaderStage::Vertex => GL::VERTEX_SHADER,
        ShaderStage::Fragment => GL::FRAGMENT_SHADER,
    };
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| RenderError::Initialization("could not create shader object".into()))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if !gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        return Err(RenderError::ShaderCompile { stage, log });
    }
    Ok(shader)
}

/// Upload the fixed full-viewport quad and bind it to `position`. Tightly
/// packed, no normalization, never mutated afterwards.
fn upload_geometry(gl: &GL, position: u32) -> Result<WebGlBuffer, RenderError> {
    let buffer = gl
        .create_buffer()
        .ok_or_else(|| RenderError::Initialization("could not create vertex buffer".into()))?;
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));

    // `Float32Array::view` aliases wasm memory; the view is consumed before
    // anything can reallocate, so the unsafe block is sound.
    unsafe {
        let view = js_sys::Float32Array::view(&geometry::QUAD);
        gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &view, GL::STATIC_DRAW);
    }

    gl.enable_vertex_attrib_array(position);
    gl.vertex_attrib_pointer_with_i32(position, geometry::VERTEX_COMPONENTS, GL::FLOAT, false, 0, 0);

    Ok(buffer)
}
