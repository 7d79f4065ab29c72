use derive_builder::Builder;

use crate::{
    render::canvas::{Canvas, FrameBuffer},
    scene::{Scene, camera::Camera},
    shading::integrator::{Integrator, LightingMode},
};

#[derive(PartialEq, Debug, Clone, Builder)]
/// The renderer calculates each pixel color using the integrator and camera.
pub struct Renderer {
    integrator: Integrator,
    camera: Camera,
    #[builder(default = "false")]
    use_progress_bar: bool,
}

impl Renderer {
    const PROGRESS_TEMPLATE: &'static str = "{spinner:.green} [{elapsed_precise}] {wide_bar:.cyan/blue} pixels shaded: {human_pos}/{human_len} {percent}% ({eta})";

    pub fn new(integrator: Integrator, camera: Camera) -> Self {
        Self {
            integrator,
            camera,
            use_progress_bar: false,
        }
    }

    fn progress_bar(&self, pixel_count: u64) -> indicatif::ProgressBar {
        if !self.use_progress_bar {
            return indicatif::ProgressBar::hidden();
        }
        let pb = indicatif::ProgressBar::new(pixel_count);
        match indicatif::ProgressStyle::with_template(Self::PROGRESS_TEMPLATE) {
            Ok(style) => pb.with_style(style),
            Err(_) => pb,
        }
    }

    /// Renders one frame, one primary ray per pixel.
    pub fn render(&self) -> Canvas {
        let mut canvas = self.camera.canvas();
        let viewport = self.camera.viewport();

        self.scene().log_statistics();
        log::info!(
            "rendering {}x{} image, lighting mode {}, shadows {}",
            canvas.width(),
            canvas.height(),
            self.integrator.lighting_mode(),
            if self.integrator.shadows_enabled() { "on" } else { "off" }
        );

        let pixel_count = canvas.width() as u64 * canvas.height() as u64;
        let now = std::time::Instant::now();
        canvas.set_each_pixel(
            |x: usize, y: usize| self.integrator.color_at(&viewport.ray_for_pixel(x, y)),
            self.progress_bar(pixel_count),
        );

        let elapsed = now.elapsed();
        log::info!("render time: {:?}", elapsed);
        log::debug!(
            "rays per second: {}",
            (pixel_count as f64 / elapsed.as_secs_f64()).round()
        );
        canvas
    }

    /// Renders a frame straight into `target`.
    pub fn render_to<B: FrameBuffer + ?Sized>(&self, target: &mut B) {
        self.render().blit(target);
    }

    /// Switches to the next lighting mode and returns it.
    pub fn cycle_lighting_mode(&mut self) -> LightingMode {
        let mode = self.integrator.lighting_mode().next();
        self.integrator.set_lighting_mode(mode);
        log::info!("lighting mode: {mode}");
        mode
    }

    /// Flips shadow casting and returns the new state.
    pub fn toggle_shadows(&mut self) -> bool {
        let enabled = !self.integrator.shadows_enabled();
        self.integrator.set_shadows_enabled(enabled);
        log::info!("shadows {}", if enabled { "enabled" } else { "disabled" });
        enabled
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn integrator(&self) -> &Integrator {
        &self.integrator
    }

    pub fn scene(&self) -> &Scene {
        self.integrator.scene()
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        self.integrator.scene_mut()
    }

    pub fn use_progress_bar(&self) -> bool {
        self.use_progress_bar
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use super::*;
    use crate::{
        math::{color::Color, point::Point, tuple::Tuple},
        render::canvas::RgbBuffer,
        scene::{
            SceneBuilder,
            light::Light,
            object::{material::Material, primitive::sphere::Sphere},
        },
    };

    fn sphere_in_front() -> Renderer {
        let scene = SceneBuilder::default()
            .material(Material::solid_color(Color::new(0.25, 0.5, 1.)))
            .shape(Sphere::new(Point::new(0., 0., 5.), 1., 0))
            .light(Light::point(Point::new(0., 0., 0.), 1., Color::white()))
            .build()
            .unwrap();
        let integrator = crate::shading::integrator::IntegratorBuilder::default()
            .scene(scene)
            .lighting_mode(LightingMode::Brdf)
            .build()
            .unwrap();

        RendererBuilder::default()
            .integrator(integrator)
            .camera(Camera::new(Point::zero(), FRAC_PI_2, 9, 9))
            .build()
            .unwrap()
    }

    #[test]
    fn center_pixel_sees_sphere_and_corner_sees_nothing() {
        let canvas = sphere_in_front().render();

        assert_eq!(canvas.width(), 9);
        assert_eq!(canvas.pixel_at(4, 4), Color::new(0.25, 0.5, 1.));
        assert_eq!(canvas.pixel_at(0, 0), Color::black());
    }

    #[test]
    fn render_to_frame_buffer() {
        let renderer = sphere_in_front();
        let mut buffer = RgbBuffer::new(9, 9);

        renderer.render_to(&mut buffer);
        let center = (9 * 4 + 4) * 3;
        assert_eq!(&buffer.bytes()[center..center + 3], &[63, 127, 255]);
    }

    #[test]
    fn cycling_returns_to_start_after_four_steps() {
        let mut renderer = sphere_in_front();
        let start = renderer.integrator().lighting_mode();

        let modes: Vec<_> = (0..4).map(|_| renderer.cycle_lighting_mode()).collect();
        assert_eq!(modes.last(), Some(&start));
        assert_eq!(modes[0], LightingMode::Combined);
    }

    #[test]
    fn toggle_shadows_flips_state() {
        let mut renderer = sphere_in_front();

        assert!(!renderer.toggle_shadows());
        assert!(renderer.toggle_shadows());
    }
}
