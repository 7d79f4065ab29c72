use std::{fs::File, path::PathBuf};

use clap::Parser;
use lightray::{
    render::{canvas::ImageFormat, renderer::RendererBuilder},
    scene::{
        Scene,
        camera::{Camera, CameraBuilder, Orientation},
        demo::DemoScene,
        io::yaml::{self, YamlSceneConfig},
    },
    shading::integrator::{IntegratorBuilder, LightingMode},
};

/// Brute-force ray caster
/// Renders scenes from yaml files or one of the built-in demo scenes
/// Supports spheres, planes, triangles, triangle meshes and .obj models
#[derive(Parser, Debug)]
#[command(about, long_about = None)]
struct Args {
    /// The scene file to render
    #[clap(conflicts_with = "demo")]
    scene_file: Option<PathBuf>,

    /// Built-in scene to render when no scene file is given
    #[clap(short, long)]
    demo: Option<DemoScene>,

    /// The format of the output image
    #[clap(short = 'f', long, default_value = "png")]
    image_format: ImageFormat,

    /// The output path of the rendered image.
    /// By default it's `./<scene_filename>.<image_format>`
    #[clap(short, long)]
    output_path: Option<PathBuf>,

    /// Width (in pixels) of the output image.
    #[clap(long, help = format!("Width (in pixels) of the output image.
Overrides the one in the scene file. If not specified anywhere, defaults to {}", Camera::DEFAULT_WIDTH))]
    width: Option<usize>,

    /// Height (in pixels) of the output image.
    #[clap(long, help = format!("Height (in pixels) of the output image.
Overrides the one in the scene file. If not specified anywhere, defaults to {}", Camera::DEFAULT_HEIGHT))]
    height: Option<usize>,

    /// Vertical field of view of the camera in radians.
    /// Overrides the one in the scene file
    #[clap(long)]
    fov: Option<f64>,

    /// Camera pitch in radians, overrides the scene orientation
    #[clap(long, allow_hyphen_values = true)]
    pitch: Option<f64>,

    /// Camera yaw in radians, overrides the scene orientation
    #[clap(long, allow_hyphen_values = true)]
    yaw: Option<f64>,

    /// How light contributions are combined.
    /// Overrides the one in the scene file
    #[clap(short, long)]
    lighting_mode: Option<LightingMode>,

    /// Enable or disable shadow rays.
    /// Overrides the one in the scene file
    #[clap(long)]
    shadows: Option<bool>,

    /// Hide the progress bar
    #[clap(short, long)]
    quiet: bool,
}

struct Loaded {
    scene: Scene,
    camera: Camera,
    config: Option<YamlSceneConfig>,
}

fn load(args: &Args) -> Result<Loaded, String> {
    match &args.scene_file {
        Some(path) => {
            let config =
                yaml::parse_file(path).map_err(|e| format!("Failed to parse scene: {}", e))?;
            let scene = config
                .scene_builder
                .build()
                .map_err(|e| format!("Invalid scene: {}", e))?;
            let camera = config
                .camera_builder
                .build()
                .map_err(|e| format!("Invalid camera: {}", e))?;
            Ok(Loaded {
                scene,
                camera,
                config: Some(config),
            })
        }
        None => {
            let demo = args.demo.unwrap_or_default();
            log::info!("rendering demo scene {demo}");
            let (scene, camera) = demo
                .build()
                .map_err(|e| format!("Failed to build demo scene: {}", e))?;
            Ok(Loaded {
                scene,
                camera,
                config: None,
            })
        }
    }
}

fn apply_camera_overrides(camera: &Camera, args: &Args) -> Result<Camera, String> {
    let orientation = camera.orientation();
    CameraBuilder::default()
        .origin(camera.origin())
        .field_of_view(args.fov.unwrap_or(camera.field_of_view()))
        .target_width(args.width.unwrap_or(camera.target_width()))
        .target_height(args.height.unwrap_or(camera.target_height()))
        .orientation(Orientation::new(
            args.pitch.unwrap_or(orientation.total_pitch),
            args.yaw.unwrap_or(orientation.total_yaw),
        ))
        .build()
        .map_err(|e| format!("Invalid camera: {}", e))
}

fn default_output_path(args: &Args) -> PathBuf {
    let stem = match &args.scene_file {
        Some(path) => path
            .file_stem()
            .map_or_else(|| "scene".into(), |stem| stem.to_string_lossy().into_owned()),
        None => args.demo.unwrap_or_default().to_string(),
    };
    let mut path = PathBuf::from(stem);
    path.set_extension(args.image_format.to_string());
    path
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let Loaded {
        scene,
        camera,
        config,
    } = load(&args)?;
    let camera = apply_camera_overrides(&camera, &args)?;

    let mut integrator_builder = IntegratorBuilder::default();
    integrator_builder.scene(scene);
    if let Some(config) = &config {
        if let Some(mode) = config.lighting_mode {
            integrator_builder.lighting_mode(mode);
        }
        if let Some(shadows) = config.shadows_enabled {
            integrator_builder.shadows_enabled(shadows);
        }
        if let Some(bias) = config.shadow_bias {
            integrator_builder.shadow_bias(bias);
        }
    }
    if let Some(mode) = args.lighting_mode {
        integrator_builder.lighting_mode(mode);
    }
    if let Some(shadows) = args.shadows {
        integrator_builder.shadows_enabled(shadows);
    }
    let integrator = integrator_builder
        .build()
        .map_err(|e| format!("Failed to set up integrator: {}", e))?;

    let renderer = RendererBuilder::default()
        .integrator(integrator)
        .camera(camera)
        .use_progress_bar(!args.quiet)
        .build()
        .map_err(|e| format!("Failed to set up renderer: {}", e))?;
    let canvas = renderer.render();

    let output_path = args
        .output_path
        .clone()
        .unwrap_or_else(|| default_output_path(&args));
    let file = File::create(&output_path)
        .map_err(|e| format!("Failed to create {:?}: {}", output_path, e))?;
    canvas
        .save_to_file(file, args.image_format)
        .map_err(|e| format!("Failed to save image: {}", e))?;
    log::info!("image saved to {:?}", output_path);
    Ok(())
}
