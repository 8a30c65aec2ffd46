//! Shader source assembly.
//!
//! The vertex stage and the precision header are fixed. The fragment stage
//! defaults to the snowfall effect but can be replaced wholesale by caller
//! supplied GLSL before the surface is attached. Sources are immutable once a
//! program has been built from them.

/// Prefixed to both compiled stages.
pub const PRECISION_HEADER: &str = "precision highp float;\n";

/// Fixed vertex stage: passes clip-space positions straight through and hands
/// them to the fragment stage as a varying.
pub const DEFAULT_VERTEX: &str = r#"
uniform float time;
uniform vec2 resolution;
varying vec4 vPos;
attribute vec4 position;

void main(){
  vPos = position;
  gl_Position = position;
}
"#;

/// Default fragment stage: three layered drifting snow fields.
pub const SNOW_FRAGMENT: &str = r#"
uniform float time;
uniform vec2 resolution;
varying vec4 vPos;

vec2 rand2(vec2 p) {
  return fract(sin(vec2(dot(p, vec2(12.234, 83.734)), dot(p, vec2(327.9, 982.42)) )* 23232.54));
}

float snow(vec2 uv, float m, float wind) {
  vec2 st = uv * m;
  float t = time * .01 / m;

  st += vec2(t * 1.2 * wind, t * 2.4);

  vec2 i_st = floor(st);
  vec2 f_st = fract(st);
  vec2 r_st = rand2(i_st / m);

  vec2 p = .5 + (vec2(sin(t * 13. + length(i_st)), cos(length(i_st))) * r_st) * .4;

  float c = 1. - smoothstep(.09 - .05 * r_st.x, .1, length(f_st - p));

  return c;
}

void main() {
  vec2 uv = vPos.xy *.5;
  float aspect = resolution.x / resolution.y;
  uv.x *= aspect;

  float col = 0.;

  col += snow(uv, 10., 1.);
  col += snow(uv, 12.5, 1.4);
  col += snow(uv, 25., -.9);

  gl_FragColor = vec4(.7, .8, .95, .9) * col;
}
"#;

/// A vertex/fragment source pair ready for compilation.
///
/// The fragment body may be overridden; the vertex stage never is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    vertex: String,
    fragment: String,
}

impl ShaderSource {
    /// The built-in snowfall effect.
    pub fn default_effect() -> Self {
        Self::assemble(SNOW_FRAGMENT)
    }

    /// Replace the fragment body with caller-supplied GLSL. The body is used
    /// verbatim, prefixed only by [`PRECISION_HEADER`].
    pub fn with_fragment(body: &str) -> Self {
        Self::assemble(body)
    }

    fn assemble(fragment_body: &str) -> Self {
        Self {
            vertex: format!("{PRECISION_HEADER}{DEFAULT_VERTEX}"),
            fragment: format!("{PRECISION_HEADER}{fragment_body}"),
        }
    }

    pub fn vertex(&self) -> &str {
        &self.vertex
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }
}

impl Default for ShaderSource {
    fn default() -> Self {
        Self::default_effect()
    }
}
