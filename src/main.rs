//! Paddock viewer
//!
//! Keys: W/S forward/back, A/D strafe, Q/E pan, U/Z raise/lower the eye,
//! P toggles the animation, `[` / `]` turn the whole scene. Moving the pointer
//! sideways pans the view.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use paddock::{FrameRecorder, SceneConfig, SceneState};

#[derive(Parser)]
#[command(name = "paddock")]
#[command(about = "An animated dog and sheep in a cube-built paddock", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON scene config; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Window width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Window height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Start with the animation running
    #[arg(short, long)]
    animate: bool,

    /// Image for texture unit A (the ground)
    #[arg(long, value_name = "FILE")]
    grass: Option<PathBuf>,

    /// Image for texture unit B (the sky)
    #[arg(long, value_name = "FILE")]
    sky: Option<PathBuf>,

    /// Compose one frame at this many seconds and print its draw list instead
    /// of opening a window
    #[arg(long, value_name = "SECONDS")]
    headless: Option<f64>,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn scene_config(&self) -> paddock::Result<SceneConfig> {
        let mut config = match &self.config {
            Some(path) => SceneConfig::load(path)?,
            None => SceneConfig::default(),
        };

        if let Some(width) = self.width {
            config.window.width = width;
        }
        if let Some(height) = self.height {
            config.window.height = height;
        }
        if self.animate {
            config.animation.enabled = true;
        }
        if let Some(grass) = &self.grass {
            config.textures.ground = Some(grass.clone());
        }
        if let Some(sky) = &self.sky {
            config.textures.sky = Some(sky.clone());
        }
        config.camera.aspect = config.window.width as f32 / config.window.height.max(1) as f32;
        Ok(config)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logger; RUST_LOG still wins over the flags
    let default_filter = match (cli.verbose, cli.quiet) {
        (0, true) => "error",
        (0, false) => "warn",
        (1, _) => "info",
        (2, _) => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let result = cli.scene_config().and_then(|config| match cli.headless {
        Some(seconds) => {
            print_frame(&config, seconds);
            Ok(())
        }
        None => paddock::run(config),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn print_frame(config: &SceneConfig, seconds: f64) {
    let scene = SceneState::from_config(config);
    let mut recorder = FrameRecorder::new();
    scene.render(seconds, &mut recorder);

    println!("frame at {seconds:.3}s: {} draws", recorder.draws.len());
    for primitive in &recorder.draws {
        let origin = primitive.model_matrix().w_axis;
        println!(
            "{:<16} {:<12} {:?} at ({:.3}, {:.3}, {:.3})",
            primitive.label,
            format!("{:?}", primitive.material),
            primitive.variant,
            origin.x,
            origin.y,
            origin.z
        );
    }
}
