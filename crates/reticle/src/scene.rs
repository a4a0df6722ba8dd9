//! The demo scene: a quad anchored to the crosshair, tinted by its
//! distance from the window center.

use std::rc::Rc;

use glcore::{
    Buffer, BufferTarget, GlApi, GlError, Program, Shader, ShaderStage, UniformValue, VertexArray,
    NULL_HANDLE,
};

pub const CLEAR_COLOR: [f32; 4] = [0.0, 0.2, 0.2, 0.0];

const VERTEX_SHADER: &str = r#"
#version 450 core

layout (location = 0) in vec3 vertex_offset;

uniform vec2 crosshair_position;

void main() {
    gl_Position = vec4(crosshair_position + vertex_offset.xy, vertex_offset.z, 1.0);
}
"#;

const FRAGMENT_SHADER: &str = r#"
#version 450 core

uniform vec4 quad_tint;

out vec4 color;

void main() {
    color = quad_tint;
}
"#;

// Quad corners as (x, y, z), indexed into two triangles.
const QUAD_VERTICES: [f32; 12] = [
    -0.2, -0.2, 0.0, // bottom left
    0.2, -0.2, 0.0, // bottom right
    -0.2, 0.2, 0.0, // top left
    0.2, 0.2, 0.0, // top right
];
const QUAD_INDICES: [u32; 6] = [0, 1, 3, 3, 2, 0];

pub struct Scene {
    gl: Rc<dyn GlApi>,
    program: Program,
    vao: VertexArray,
    _vertex_buffer: Buffer,
    _index_buffer: Buffer,
    index_count: i32,
}

impl Scene {
    /// Compiles the shader pair, links the program, and uploads the quad.
    pub fn build(gl: Rc<dyn GlApi>) -> Result<Self, GlError> {
        let mut program = Program::create(Rc::clone(&gl))?;
        program.add_shader(Shader::compile(
            Rc::clone(&gl),
            ShaderStage::Vertex,
            VERTEX_SHADER,
        )?);
        program.add_shader(Shader::compile(
            Rc::clone(&gl),
            ShaderStage::Fragment,
            FRAGMENT_SHADER,
        )?);
        program.build()?;

        let vao = VertexArray::create(Rc::clone(&gl))?;
        vao.bind();
        // Creation binds each buffer, so the attribute pointer and the
        // element-array binding both land in the VAO while it is bound.
        let vertex_buffer =
            Buffer::from_f32s(Rc::clone(&gl), BufferTarget::Array, &QUAD_VERTICES, false)?;
        vao.float_attribute(0, 3, 3 * std::mem::size_of::<f32>() as i32, 0);
        let index_buffer = Buffer::from_u32s(
            Rc::clone(&gl),
            BufferTarget::ElementArray,
            &QUAD_INDICES,
            false,
        )?;
        vao.unbind();

        Ok(Self {
            gl,
            program,
            vao,
            _vertex_buffer: vertex_buffer,
            _index_buffer: index_buffer,
            index_count: QUAD_INDICES.len() as i32,
        })
    }

    /// Draws one frame's worth of quad at the crosshair position.
    pub fn draw(&self, crosshair: (f32, f32)) -> Result<(), GlError> {
        self.program.uniform_set(
            "crosshair_position",
            UniformValue::Vec2([crosshair.0, crosshair.1]),
        )?;
        self.program
            .uniform_set("quad_tint", UniformValue::Vec4(center_tint(crosshair)))?;

        self.program.activate()?;
        self.vao.bind();
        self.gl.draw_indexed_triangles(self.index_count);
        self.vao.unbind();
        self.gl.use_program(NULL_HANDLE);
        Ok(())
    }
}

/// Maps a cursor position in window pixels to [-1, 1] clip coordinates
/// with the y axis pointing up. Width normalizes x and height normalizes
/// y.
pub fn normalize_cursor(x: f64, y: f64, width: u32, height: u32) -> (f32, f32) {
    let w = width.max(1) as f64;
    let h = height.max(1) as f64;
    let nx = ((x / w) - 0.5) * 2.0;
    let ny = ((y / h) - 0.5) * -2.0;
    (nx.clamp(-1.0, 1.0) as f32, ny.clamp(-1.0, 1.0) as f32)
}

/// Blends the quad tint from the center hue out to the edge hue by the
/// crosshair's distance from the window center.
pub fn center_tint(crosshair: (f32, f32)) -> [f32; 4] {
    const CENTER: [f32; 4] = [1.0, 0.5, 0.2, 1.0];
    const EDGE: [f32; 4] = [0.2, 0.6, 1.0, 1.0];

    let distance =
        (crosshair.0.powi(2) + crosshair.1.powi(2)).sqrt() / std::f32::consts::SQRT_2;
    let t = distance.clamp(0.0, 1.0);

    let mut tint = [0.0; 4];
    for (slot, (center, edge)) in tint.iter_mut().zip(CENTER.iter().zip(EDGE.iter())) {
        *slot = center + (edge - center) * t;
    }
    tint
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_normalization_covers_the_corners() {
        assert_eq!(normalize_cursor(0.0, 0.0, 640, 480), (-1.0, 1.0));
        assert_eq!(normalize_cursor(640.0, 480.0, 640, 480), (1.0, -1.0));
        assert_eq!(normalize_cursor(320.0, 240.0, 640, 480), (0.0, 0.0));
    }

    #[test]
    fn cursor_normalization_uses_width_for_x_and_height_for_y() {
        // A wide window: x must come from the 800, y from the 200.
        let (nx, ny) = normalize_cursor(600.0, 100.0, 800, 200);
        assert!((nx - 0.5).abs() < 1e-6);
        assert!(ny.abs() < 1e-6);

        let (nx, ny) = normalize_cursor(800.0, 0.0, 800, 200);
        assert_eq!((nx, ny), (1.0, 1.0));
    }

    #[test]
    fn cursor_normalization_clamps_outside_positions() {
        let (nx, ny) = normalize_cursor(-50.0, 900.0, 640, 480);
        assert_eq!((nx, ny), (-1.0, -1.0));
    }

    #[test]
    fn tint_is_the_center_hue_at_the_center() {
        assert_eq!(center_tint((0.0, 0.0)), [1.0, 0.5, 0.2, 1.0]);
    }

    #[test]
    fn tint_reaches_the_edge_hue_in_the_corner() {
        let tint = center_tint((1.0, 1.0));
        for (got, expected) in tint.iter().zip([0.2, 0.6, 1.0, 1.0]) {
            assert!((got - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn tint_interpolates_monotonically() {
        let near = center_tint((0.1, 0.0));
        let far = center_tint((0.9, 0.0));
        // The red channel fades with distance, the blue channel grows.
        assert!(near[0] > far[0]);
        assert!(near[2] < far[2]);
    }
}
