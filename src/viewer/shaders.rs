//! WGSL sources for the event viewer.
//!
//! Markers are screen-aligned quads whose fragment stage cuts out the marker
//! symbol. The symbol cut-outs are assembled into one `switch` over the
//! instance's shape id, with one case per symbol the scene uses.

use crate::config::MarkerSymbol;

/// Uniform block shared by both pipelines.
const UNIFORMS: &str = r#"struct Uniforms {
    view_proj: mat4x4<f32>,
    viewport: vec2<f32>,
    _padding: vec2<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;
"#;

impl MarkerSymbol {
    /// WGSL statements that discard fragments outside the symbol.
    ///
    /// `uv` spans [-1, 1] across the marker quad.
    pub fn wgsl_cutout(self) -> &'static str {
        match self {
            MarkerSymbol::Circle => r#"            if length(uv) > 1.0 {
                discard;
            }"#,
            MarkerSymbol::CircleOpen => r#"            let dist = length(uv);
            if dist > 1.0 || dist < 0.7 {
                discard;
            }"#,
            MarkerSymbol::Square => r#"            // full quad"#,
            MarkerSymbol::SquareOpen => r#"            let edge = max(abs(uv.x), abs(uv.y));
            if edge < 0.7 {
                discard;
            }"#,
            MarkerSymbol::Diamond => r#"            if abs(uv.x) + abs(uv.y) > 1.0 {
                discard;
            }"#,
            MarkerSymbol::DiamondOpen => r#"            let manhattan = abs(uv.x) + abs(uv.y);
            if manhattan > 1.0 || manhattan < 0.65 {
                discard;
            }"#,
            MarkerSymbol::Cross => r#"            let arm = abs(uv);
            if min(arm.x, arm.y) > 0.25 {
                discard;
            }"#,
            MarkerSymbol::X => r#"            let diag = abs(vec2<f32>(uv.x + uv.y, uv.x - uv.y)) * 0.70710678;
            if min(diag.x, diag.y) > 0.25 {
                discard;
            }"#,
        }
    }
}

/// Marker shader with cut-outs for `symbols`.
///
/// Shape ids not in `symbols` draw as full squares.
pub fn marker_shader(symbols: &[MarkerSymbol]) -> String {
    let mut cases = String::new();
    for symbol in MarkerSymbol::ALL.iter().filter(|s| symbols.contains(s)) {
        cases.push_str(&format!(
            "        case {}u: {{\n{}\n        }}\n",
            symbol.shape_id(),
            symbol.wgsl_cutout()
        ));
    }

    format!(
        r#"{UNIFORMS}
struct VertexOutput {{
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
    @location(1) uv: vec2<f32>,
    @location(2) @interpolate(flat) shape: u32,
}};

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) position: vec3<f32>,
    @location(1) size: f32,
    @location(2) color: vec4<f32>,
    @location(3) shape: u32,
) -> VertexOutput {{
    var quad_vertices = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>( 1.0,  1.0),
    );
    let quad_pos = quad_vertices[vertex_index];

    var clip_pos = uniforms.view_proj * vec4<f32>(position, 1.0);
    let offset = quad_pos * size / uniforms.viewport;
    clip_pos.x += offset.x * clip_pos.w;
    clip_pos.y += offset.y * clip_pos.w;

    var out: VertexOutput;
    out.clip_position = clip_pos;
    out.color = color;
    out.uv = quad_pos;
    out.shape = shape;
    return out;
}}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {{
    let uv = in.uv;
    switch in.shape {{
{cases}        default: {{}}
    }}
    return in.color;
}}
"#
    )
}

/// Thick line shader. Each instance is one segment expanded to a
/// screen-space quad of constant pixel width.
pub fn line_shader() -> String {
    format!(
        r#"{UNIFORMS}
struct VertexOutput {{
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
}};

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) start: vec3<f32>,
    @location(1) width: f32,
    @location(2) end: vec3<f32>,
    @location(3) color: vec4<f32>,
) -> VertexOutput {{
    // x selects the endpoint, y the side of the segment
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(0.0, -1.0),
        vec2<f32>(0.0,  1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(0.0,  1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(1.0,  1.0),
    );
    let corner = corners[vertex_index];

    let clip_a = uniforms.view_proj * vec4<f32>(start, 1.0);
    let clip_b = uniforms.view_proj * vec4<f32>(end, 1.0);
    let screen_a = clip_a.xy / max(clip_a.w, 0.0001) * uniforms.viewport * 0.5;
    let screen_b = clip_b.xy / max(clip_b.w, 0.0001) * uniforms.viewport * 0.5;

    var dir = screen_b - screen_a;
    if length(dir) < 0.0001 {{
        dir = vec2<f32>(1.0, 0.0);
    }}
    let normal = normalize(vec2<f32>(-dir.y, dir.x)) * width * 0.5;
    let offset = normal * corner.y * 2.0 / uniforms.viewport;

    var clip_pos = select(clip_a, clip_b, corner.x > 0.5);
    clip_pos.x += offset.x * clip_pos.w;
    clip_pos.y += offset.y * clip_pos.w;

    var out: VertexOutput;
    out.clip_position = clip_pos;
    out.color = color;
    return out;
}}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {{
    return in.color;
}}
"#
    )
}
