//! Static full-viewport quad geometry.
//!
//! Two tightly packed triangles covering clip space [-1,1] on both axes.
//! Uploaded once per program and never mutated.

/// Components per vertex (x, y in clip space).
pub const VERTEX_COMPONENTS: i32 = 2;

/// Vertices per draw call.
pub const VERTEX_COUNT: i32 = 6;

/// Quad vertex data, two triangles:
/// (-1,-1) (-1,1) (1,-1) and (1,-1) (1,1) (-1,1).
pub const QUAD: [f32; 12] = [
    -1.0, -1.0, -1.0, 1.0, 1.0, -1.0, //
    1.0, -1.0, 1.0, 1.0, -1.0, 1.0,
];
