//! Top-level orchestrator: owns the mesh, camera, textures and frame buffer,
//! and wires the vertex stage and rasterizer together once per frame.

use std::path::Path;

use crate::camera::{Camera, InputSnapshot};
use crate::framebuffer::FrameBuffer;
use crate::math::Vec3;
use crate::mesh::{self, Mesh};
use crate::rasterizer::{self, RasterSettings};
use crate::shader::{Material, ShadingMode};
use crate::texture::{self, Texture};
use crate::vertex_stage;

const ROTATION_SPEED_RADIANS_PER_SECOND: f32 = 1.0;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Mesh(#[from] mesh::LoadError),
    #[error(transparent)]
    Texture(#[from] texture::TextureError),
}

pub struct Engine {
    framebuffer: FrameBuffer,
    camera: Camera,
    mesh: Mesh,
    diffuse: Texture,
    normal: Texture,
    gloss: Texture,
    specular: Texture,
    settings: RasterSettings,
    rotation_enabled: bool,
}

impl Engine {
    pub fn new(
        width: u32,
        height: u32,
        mesh_path: impl AsRef<Path>,
        diffuse_path: impl AsRef<Path>,
        normal_path: impl AsRef<Path>,
        gloss_path: impl AsRef<Path>,
        specular_path: impl AsRef<Path>,
    ) -> Result<Self, EngineError> {
        let mesh = Mesh::from_obj(mesh_path)?;
        let diffuse = Texture::from_file(diffuse_path)?;
        let normal = Texture::from_file(normal_path)?;
        let gloss = Texture::from_file(gloss_path)?;
        let specular = Texture::from_file(specular_path)?;

        let aspect_ratio = width as f32 / height as f32;
        let camera = Camera::new(Vec3::new(0.0, 5.0, -64.0), aspect_ratio);

        Ok(Self {
            framebuffer: FrameBuffer::new(width, height),
            camera,
            mesh,
            diffuse,
            normal,
            gloss,
            specular,
            settings: RasterSettings::default(),
            rotation_enabled: true,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.framebuffer.resize(width, height);
        self.camera.set_aspect_ratio(width as f32 / height as f32);
    }

    pub fn update(&mut self, dt: f32, input: &InputSnapshot) {
        self.camera.update(input);
        if self.rotation_enabled {
            self.mesh.advance_rotation(ROTATION_SPEED_RADIANS_PER_SECOND, dt);
        }
    }

    pub fn render(&mut self) {
        self.framebuffer.clear();

        vertex_stage::transform_mesh(
            &mut self.mesh,
            &self.camera,
            self.framebuffer.width() as f32,
            self.framebuffer.height() as f32,
        );

        let material = Material {
            diffuse: &self.diffuse,
            normal: &self.normal,
            gloss: &self.gloss,
            specular: &self.specular,
        };
        rasterizer::render_mesh(&self.mesh, &material, &self.settings, &mut self.framebuffer);
    }

    /// Returns the rendered frame as bytes (ARGB8888 format).
    pub fn frame_buffer(&self) -> &[u8] {
        self.framebuffer.as_bytes()
    }

    pub fn save_screenshot(&self, path: impl AsRef<Path>) -> image::ImageResult<()> {
        let width = self.framebuffer.width();
        let height = self.framebuffer.height();
        let mut image = image::RgbImage::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let packed = self.framebuffer.color_at(x, y);
                let r = ((packed >> 16) & 0xFF) as u8;
                let g = ((packed >> 8) & 0xFF) as u8;
                let b = (packed & 0xFF) as u8;
                image.put_pixel(x, y, image::Rgb([r, g, b]));
            }
        }
        image.save(path)
    }

    pub fn toggle_depth_view(&mut self) {
        self.settings.depth_view_enabled = !self.settings.depth_view_enabled;
    }

    pub fn toggle_rotation(&mut self) {
        self.rotation_enabled = !self.rotation_enabled;
    }

    pub fn toggle_normal_mapping(&mut self) {
        self.settings.normal_mapping_enabled = !self.settings.normal_mapping_enabled;
    }

    pub fn cycle_shading_mode(&mut self) {
        self.settings.shading_mode = self.settings.shading_mode.next();
    }

    pub fn shading_mode(&self) -> ShadingMode {
        self.settings.shading_mode
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }
}
