/// Uniform block shared by every pipeline.
const UNIFORMS: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    inv_view_proj: mat4x4<f32>,
    eye: vec4<f32>,
    // x: ground half extent, y: checker cell size
    ground: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;
"#;

/// Full-screen gradient sky, reconstructed from the inverse view-projection.
const SKY_BODY: &str = r#"
struct SkyOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) ndc: vec2<f32>,
};

@vertex
fn vs_sky(@builtin(vertex_index) index: u32) -> SkyOutput {
    let uv = vec2<f32>(f32((index << 1u) & 2u), f32(index & 2u));
    let ndc = uv * 2.0 - 1.0;
    var out: SkyOutput;
    out.clip_position = vec4<f32>(ndc, 1.0, 1.0);
    out.ndc = ndc;
    return out;
}

@fragment
fn fs_sky(in: SkyOutput) -> @location(0) vec4<f32> {
    let far = uniforms.inv_view_proj * vec4<f32>(in.ndc, 1.0, 1.0);
    let dir = normalize(far.xyz / far.w - uniforms.eye.xyz);
    let horizon = vec3<f32>(0.78, 0.86, 0.94);
    let zenith = vec3<f32>(0.24, 0.45, 0.80);
    let below = vec3<f32>(0.32, 0.38, 0.30);
    var color = mix(horizon, zenith, pow(clamp(dir.y, 0.0, 1.0), 0.6));
    if (dir.y < 0.0) {
        color = mix(horizon, below, clamp(-dir.y * 4.0, 0.0, 1.0));
    }
    return vec4<f32>(color, 1.0);
}
"#;

/// Checkered ground plane that fades into the horizon colour.
const GROUND_BODY: &str = r#"
struct GroundOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world: vec3<f32>,
};

@vertex
fn vs_ground(@location(0) position: vec3<f32>) -> GroundOutput {
    var out: GroundOutput;
    out.clip_position = uniforms.view_proj * vec4<f32>(position, 1.0);
    out.world = position;
    return out;
}

@fragment
fn fs_ground(in: GroundOutput) -> @location(0) vec4<f32> {
    let cell = floor(in.world.xz / uniforms.ground.y);
    let parity = (i32(cell.x) + i32(cell.y)) & 1;
    var color = vec3<f32>(0.30, 0.45, 0.22);
    if (parity == 1) {
        color = vec3<f32>(0.26, 0.40, 0.19);
    }
    let fade = clamp(length(in.world.xz) / uniforms.ground.x, 0.0, 1.0);
    color = mix(color, vec3<f32>(0.78, 0.86, 0.94), fade * fade * 0.6);
    return vec4<f32>(color, 1.0);
}
"#;

/// Instanced, vertex-coloured tree meshes with simple directional lighting.
const TREE_BODY: &str = r#"
struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) color: vec3<f32>,
};

struct InstanceInput {
    @location(3) model_0: vec4<f32>,
    @location(4) model_1: vec4<f32>,
    @location(5) model_2: vec4<f32>,
    @location(6) model_3: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_normal: vec3<f32>,
    @location(1) color: vec3<f32>,
};

@vertex
fn vs_tree(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);
    let world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_normal = normalize(world_normal);
    out.color = vertex.color;
    return out;
}

@fragment
fn fs_tree(in: VertexOutput) -> @location(0) vec4<f32> {
    let light_dir = normalize(vec3<f32>(0.3, 1.0, 0.5));
    let ambient = 0.35;
    let diffuse = max(dot(in.world_normal, light_dir), 0.0);
    let lighting = ambient + diffuse * 0.65;
    return vec4<f32>(in.color * lighting, 1.0);
}
"#;

pub fn sky_shader() -> String {
    format!("{UNIFORMS}{SKY_BODY}")
}

pub fn ground_shader() -> String {
    format!("{UNIFORMS}{GROUND_BODY}")
}

pub fn tree_shader() -> String {
    format!("{UNIFORMS}{TREE_BODY}")
}
