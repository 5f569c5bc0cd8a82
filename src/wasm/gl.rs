//! WebGL2 renderer for the 3D scene. Every visual class is one instanced
//! draw: the swarm, the splatter droplets, and one draw per emoji texture.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Float32Array, Uint16Array};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, Document, HtmlCanvasElement, MouseEvent, WebGl2RenderingContext as GL,
    WebGlBuffer, WebGlProgram, WebGlShader, WebGlTexture, WebGlUniformLocation,
    WebGlVertexArrayObject, Window,
};

use super::{by_id, listen, render, viewport};
use crate::error::{FxError, FxResult};
use crate::frame::{Effect, FrameDriver, FrameTick, Liveness};
use crate::instance::IconBatch;
use crate::mesh::{quad, uv_sphere, Mesh};
use crate::pointer::PointerState;
use crate::scene::{Scene, SceneConfig};

const FALLING_ICONS: [&str; 7] = ["🌸", "🐰", "⭐", "❤️", "☁️", "🎀", "🍬"];
const TRAIL_ICONS: [&str; 4] = ["✨", "⭐", "🌸", "💫"];

const SWARM_OPACITY: f32 = 0.8;
const MAX_PIXEL_RATIO: f64 = 2.0;

const LOC_POSITION: u32 = 0;
// A mat4 attribute occupies four consecutive locations.
const LOC_MODEL: u32 = 1;
const LOC_COLOR: u32 = 5;
const LOC_UV: u32 = 6;

const VERTEX_SRC: &str = r#"#version 300 es
layout(location = 0) in vec3 a_position;
layout(location = 1) in mat4 a_model;
layout(location = 5) in vec4 a_color;
layout(location = 6) in vec2 a_uv;
uniform mat4 u_view_proj;
out vec4 v_color;
out vec2 v_uv;
void main() {
    v_color = a_color;
    v_uv = a_uv;
    gl_Position = u_view_proj * a_model * vec4(a_position, 1.0);
}
"#;

const FRAGMENT_SRC: &str = r#"#version 300 es
precision mediump float;
in vec4 v_color;
in vec2 v_uv;
uniform float u_opacity;
uniform bool u_textured;
uniform sampler2D u_texture;
out vec4 o_color;
void main() {
    vec4 c = v_color;
    if (u_textured) {
        c *= texture(u_texture, v_uv);
    }
    c.a *= u_opacity;
    if (c.a <= 0.003) {
        discard;
    }
    o_color = c;
}
"#;

struct MeshBuffers {
    positions: WebGlBuffer,
    uvs: Option<WebGlBuffer>,
    indices: WebGlBuffer,
    index_count: i32,
}

/// One instanced draw: a VAO binding a mesh to its own transform and colour
/// buffers.
struct Group {
    vao: WebGlVertexArrayObject,
    transforms: WebGlBuffer,
    colors: WebGlBuffer,
    texture: Option<WebGlTexture>,
}

struct Uniforms {
    view_proj: Option<WebGlUniformLocation>,
    opacity: Option<WebGlUniformLocation>,
    textured: Option<WebGlUniformLocation>,
    texture: Option<WebGlUniformLocation>,
}

struct SceneRenderer {
    gl: GL,
    program: WebGlProgram,
    uniforms: Uniforms,
    sphere: MeshBuffers,
    quad: MeshBuffers,
    swarm: Group,
    droplets: Group,
    falling: Vec<Group>,
    trail: Vec<Group>,
    scratch: Vec<f32>,
}

impl SceneRenderer {
    fn new(gl: GL, document: &Document, scene: &Scene) -> FxResult<Self> {
        let program = link_program(&gl, VERTEX_SRC, FRAGMENT_SRC)?;
        let uniforms = Uniforms {
            view_proj: gl.get_uniform_location(&program, "u_view_proj"),
            opacity: gl.get_uniform_location(&program, "u_opacity"),
            textured: gl.get_uniform_location(&program, "u_textured"),
            texture: gl.get_uniform_location(&program, "u_texture"),
        };

        let sphere = upload_mesh(&gl, &uv_sphere(1.0, 8, 8))?;
        let quad = upload_mesh(&gl, &quad(1.0))?;

        let swarm = make_group(&gl, &sphere, 3, None)?;
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&swarm.colors));
        let colors = Float32Array::from(scene.swarm().colors().as_slice());
        gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &colors, GL::STATIC_DRAW);

        let droplets = make_group(&gl, &sphere, 4, None)?;
        let falling = FALLING_ICONS
            .iter()
            .map(|icon| {
                let texture = emoji_texture(&gl, document, icon, 64)?;
                make_group(&gl, &quad, 4, Some(texture))
            })
            .collect::<FxResult<Vec<_>>>()?;
        let trail = TRAIL_ICONS
            .iter()
            .map(|icon| {
                let texture = emoji_texture(&gl, document, icon, 32)?;
                make_group(&gl, &quad, 4, Some(texture))
            })
            .collect::<FxResult<Vec<_>>>()?;
        gl.bind_vertex_array(None);

        gl.enable(GL::BLEND);
        gl.blend_func(GL::SRC_ALPHA, GL::ONE_MINUS_SRC_ALPHA);
        gl.disable(GL::DEPTH_TEST);
        gl.clear_color(0.0, 0.0, 0.0, 0.0);

        Ok(Self {
            gl,
            program,
            uniforms,
            sphere,
            quad,
            swarm,
            droplets,
            falling,
            trail,
            scratch: Vec::new(),
        })
    }

    fn resize(&self, width: i32, height: i32) {
        self.gl.viewport(0, 0, width, height);
    }

    fn draw(&mut self, scene: &Scene) {
        let gl = &self.gl;
        gl.clear(GL::COLOR_BUFFER_BIT);
        gl.use_program(Some(&self.program));
        let view_proj = scene.camera().view_projection().to_cols_array();
        gl.uniform_matrix4fv_with_f32_array(self.uniforms.view_proj.as_ref(), false, &view_proj);
        gl.uniform1i(self.uniforms.texture.as_ref(), 0);

        self.set_material(SWARM_OPACITY, None);
        let swarm = scene.swarm_instances();
        if swarm.needs_upload() {
            upload_dynamic(gl, &self.swarm.transforms, swarm.as_slice());
        }
        self.draw_group(&self.swarm, &self.sphere, swarm.len());

        let (droplets, tints) = scene.droplets();
        if !droplets.is_empty() {
            upload_dynamic(gl, &self.droplets.transforms, droplets.as_slice());
            upload_dynamic(gl, &self.droplets.colors, tints);
            self.set_material(1.0, None);
            self.draw_group(&self.droplets, &self.sphere, droplets.len());
        }

        let mut scratch = std::mem::take(&mut self.scratch);
        for (group, batch) in self.falling.iter().zip(scene.falling_batches()) {
            self.draw_sprites(group, batch, &mut scratch);
        }
        for (group, batch) in self.trail.iter().zip(scene.trail_batches()) {
            self.draw_sprites(group, batch, &mut scratch);
        }
        self.scratch = scratch;
        gl.bind_vertex_array(None);
    }

    fn draw_sprites(&self, group: &Group, batch: &IconBatch, scratch: &mut Vec<f32>) {
        if batch.is_empty() {
            return;
        }
        scratch.clear();
        scratch.extend(batch.opacity.iter().flat_map(|&a| [1.0, 1.0, 1.0, a]));
        upload_dynamic(&self.gl, &group.transforms, batch.transforms.as_slice());
        upload_dynamic(&self.gl, &group.colors, scratch);
        self.set_material(1.0, group.texture.as_ref());
        self.draw_group(group, &self.quad, batch.len());
    }

    fn set_material(&self, opacity: f32, texture: Option<&WebGlTexture>) {
        let gl = &self.gl;
        gl.uniform1f(self.uniforms.opacity.as_ref(), opacity);
        gl.uniform1i(self.uniforms.textured.as_ref(), texture.is_some() as i32);
        if let Some(texture) = texture {
            gl.active_texture(GL::TEXTURE0);
            gl.bind_texture(GL::TEXTURE_2D, Some(texture));
        }
    }

    fn draw_group(&self, group: &Group, mesh: &MeshBuffers, instances: usize) {
        if instances == 0 {
            return;
        }
        self.gl.bind_vertex_array(Some(&group.vao));
        self.gl.draw_elements_instanced_with_i32(
            GL::TRIANGLES,
            mesh.index_count,
            GL::UNSIGNED_SHORT,
            0,
            instances as i32,
        );
    }
}

fn compile_shader(gl: &GL, kind: u32, source: &str) -> FxResult<WebGlShader> {
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| FxError::Shader("unable to create shader".into()))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    if gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let info = gl
            .get_shader_info_log(&shader)
            .unwrap_or_else(|| "unknown shader error".into());
        Err(FxError::Shader(info))
    }
}

fn link_program(gl: &GL, vertex: &str, fragment: &str) -> FxResult<WebGlProgram> {
    let vs = compile_shader(gl, GL::VERTEX_SHADER, vertex)?;
    let fs = compile_shader(gl, GL::FRAGMENT_SHADER, fragment)?;
    let program = gl
        .create_program()
        .ok_or_else(|| FxError::Shader("unable to create program".into()))?;
    gl.attach_shader(&program, &vs);
    gl.attach_shader(&program, &fs);
    gl.link_program(&program);
    if gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let info = gl
            .get_program_info_log(&program)
            .unwrap_or_else(|| "unknown link error".into());
        log::error!("program link failed: {info}");
        Err(FxError::Shader(info))
    }
}

fn create_buffer(gl: &GL) -> FxResult<WebGlBuffer> {
    gl.create_buffer()
        .ok_or_else(|| FxError::Shader("unable to create buffer".into()))
}

fn upload_mesh(gl: &GL, mesh: &Mesh) -> FxResult<MeshBuffers> {
    let positions = create_buffer(gl)?;
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(&positions));
    gl.buffer_data_with_array_buffer_view(
        GL::ARRAY_BUFFER,
        &Float32Array::from(mesh.positions.as_slice()),
        GL::STATIC_DRAW,
    );

    let uvs = if mesh.uvs.is_empty() {
        None
    } else {
        let buffer = create_buffer(gl)?;
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
        gl.buffer_data_with_array_buffer_view(
            GL::ARRAY_BUFFER,
            &Float32Array::from(mesh.uvs.as_slice()),
            GL::STATIC_DRAW,
        );
        Some(buffer)
    };

    let indices = create_buffer(gl)?;
    gl.bind_buffer(GL::ELEMENT_ARRAY_BUFFER, Some(&indices));
    gl.buffer_data_with_array_buffer_view(
        GL::ELEMENT_ARRAY_BUFFER,
        &Uint16Array::from(mesh.indices.as_slice()),
        GL::STATIC_DRAW,
    );

    Ok(MeshBuffers {
        positions,
        uvs,
        indices,
        index_count: mesh.indices.len() as i32,
    })
}

fn make_group(
    gl: &GL,
    mesh: &MeshBuffers,
    color_size: i32,
    texture: Option<WebGlTexture>,
) -> FxResult<Group> {
    let vao = gl
        .create_vertex_array()
        .ok_or_else(|| FxError::Shader("unable to create vertex array".into()))?;
    gl.bind_vertex_array(Some(&vao));

    gl.bind_buffer(GL::ARRAY_BUFFER, Some(&mesh.positions));
    gl.enable_vertex_attrib_array(LOC_POSITION);
    gl.vertex_attrib_pointer_with_i32(LOC_POSITION, 3, GL::FLOAT, false, 0, 0);

    if let Some(uvs) = &mesh.uvs {
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(uvs));
        gl.enable_vertex_attrib_array(LOC_UV);
        gl.vertex_attrib_pointer_with_i32(LOC_UV, 2, GL::FLOAT, false, 0, 0);
    }
    gl.bind_buffer(GL::ELEMENT_ARRAY_BUFFER, Some(&mesh.indices));

    let transforms = create_buffer(gl)?;
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(&transforms));
    for column in 0..4 {
        let loc = LOC_MODEL + column;
        gl.enable_vertex_attrib_array(loc);
        gl.vertex_attrib_pointer_with_i32(loc, 4, GL::FLOAT, false, 64, column as i32 * 16);
        gl.vertex_attrib_divisor(loc, 1);
    }

    let colors = create_buffer(gl)?;
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(&colors));
    gl.enable_vertex_attrib_array(LOC_COLOR);
    gl.vertex_attrib_pointer_with_i32(LOC_COLOR, color_size, GL::FLOAT, false, 0, 0);
    gl.vertex_attrib_divisor(LOC_COLOR, 1);

    Ok(Group {
        vao,
        transforms,
        colors,
        texture,
    })
}

fn upload_dynamic(gl: &GL, buffer: &WebGlBuffer, data: &[f32]) {
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(buffer));
    gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &Float32Array::from(data), GL::DYNAMIC_DRAW);
}

/// Rasterises `emoji` on an offscreen canvas and uploads it as a texture.
fn emoji_texture(gl: &GL, document: &Document, emoji: &str, size: u32) -> FxResult<WebGlTexture> {
    let canvas = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| FxError::Context("offscreen canvas"))?;
    canvas.set_width(size);
    canvas.set_height(size);
    let ctx = canvas
        .get_context("2d")?
        .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
        .ok_or(FxError::Context("2d"))?;
    let half = size as f64 / 2.0;
    ctx.set_font(&format!("{}px serif", size as f64 * 0.8));
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.set_fill_style_str("white");
    ctx.fill_text(emoji, half, half)?;

    let texture = gl
        .create_texture()
        .ok_or_else(|| FxError::Shader("unable to create texture".into()))?;
    gl.bind_texture(GL::TEXTURE_2D, Some(&texture));
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, GL::LINEAR as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MAG_FILTER, GL::LINEAR as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE as i32);
    gl.tex_image_2d_with_u32_and_u32_and_html_canvas_element(
        GL::TEXTURE_2D,
        0,
        GL::RGBA as i32,
        GL::RGBA,
        GL::UNSIGNED_BYTE,
        &canvas,
    )?;
    Ok(texture)
}

struct SwarmView {
    scene: Scene,
    renderer: SceneRenderer,
}

impl Effect for SwarmView {
    fn update(&mut self, tick: &FrameTick) {
        self.scene.advance(tick);
    }

    fn render(&mut self) {
        self.renderer.draw(&self.scene);
        self.scene.mark_uploaded();
    }
}

/// Sizes the drawing buffer to the viewport at up to 2x pixel density and
/// returns the CSS aspect ratio plus the buffer size.
fn fit_canvas(window: &Window, canvas: &HtmlCanvasElement) -> (f32, i32, i32) {
    let (w, h) = viewport(window);
    let ratio = window.device_pixel_ratio().clamp(1.0, MAX_PIXEL_RATIO) as f32;
    let (bw, bh) = ((w * ratio) as i32, (h * ratio) as i32);
    canvas.set_width(bw.max(1) as u32);
    canvas.set_height(bh.max(1) as u32);
    let aspect = if h > 0.0 { w / h } else { 1.0 };
    (aspect, bw.max(1), bh.max(1))
}

fn client_pointer(window: &Window, event: &web_sys::Event) -> Option<PointerState> {
    let event = event.dyn_ref::<MouseEvent>()?;
    let (w, h) = viewport(window);
    Some(PointerState::from_client(
        event.client_x() as f32,
        event.client_y() as f32,
        w,
        h,
    ))
}

/// Mounts the 3D scene on `<canvas id="swarm">`.
pub fn mount(window: &Window, document: &Document, liveness: Liveness) -> FxResult<()> {
    let canvas: HtmlCanvasElement = by_id(document, "swarm")?;
    let gl = canvas
        .get_context("webgl2")?
        .and_then(|ctx| ctx.dyn_into::<GL>().ok())
        .ok_or(FxError::Context("webgl2"))?;

    let (aspect, bw, bh) = fit_canvas(window, &canvas);
    let scene = Scene::new(SceneConfig::default(), aspect, SmallRng::from_entropy());
    let renderer = SceneRenderer::new(gl, document, &scene)?;
    renderer.resize(bw, bh);
    let driver = Rc::new(RefCell::new(FrameDriver::new(
        SwarmView { scene, renderer },
        liveness,
    )));

    {
        let driver = driver.clone();
        let window_ = window.clone();
        listen(window, "resize", move |_| {
            let (aspect, bw, bh) = fit_canvas(&window_, &canvas);
            let mut driver = driver.borrow_mut();
            let view = driver.effect_mut();
            view.scene.resize(aspect);
            view.renderer.resize(bw, bh);
        })?;
    }
    {
        let driver = driver.clone();
        let window_ = window.clone();
        listen(window, "mousemove", move |event| {
            if let Some(pointer) = client_pointer(&window_, &event) {
                driver.borrow_mut().effect_mut().scene.pointer_moved(pointer);
            }
        })?;
    }
    {
        let driver = driver.clone();
        let window_ = window.clone();
        listen(window, "mouseup", move |event| {
            if let Some(ndc) = client_pointer(&window_, &event).and_then(|p| p.ndc()) {
                driver.borrow_mut().effect_mut().scene.pointer_released(ndc);
            }
        })?;
    }
    if let Some(root) = document.document_element() {
        let driver = driver.clone();
        listen(&root, "mouseleave", move |_| {
            driver.borrow_mut().effect_mut().scene.pointer_left();
        })?;
    }

    render::start(driver)
}
