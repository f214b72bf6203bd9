//! Headless frame driver.
//!
//! Runs one environment for a fixed number of simulated seconds with
//! synthetic frame timestamps, feeding the adaptive quality controller and
//! the speed control the same way an interactive host would.
//!
//! ```text
//! motes-harness [--preset ID | --config PATH] [--seconds S] [--fps F]
//!               [--seed N] [--speed PRESET] [--interact X,Y,Z] [--mode TAG]
//! ```
//!
//! `--mode` runs the environment's layout under another behavior; unknown
//! tags fall back to flocking.

use glam::Vec3;
use log::info;
use motes::{
    AdaptiveQualityController, EnvironmentConfig, Session, SpeedControl, SpeedPreset,
};
use std::error::Error;
use std::path::Path;

struct Options {
    preset: String,
    config: Option<String>,
    seconds: f32,
    fps: f32,
    seed: u32,
    speed: SpeedPreset,
    interaction: Option<Vec3>,
    mode: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            preset: "sphere".to_string(),
            config: None,
            seconds: 10.0,
            fps: 72.0,
            seed: 42,
            speed: SpeedPreset::Normal,
            interaction: None,
            mode: None,
        }
    }
}

fn parse_args() -> Result<Options, Box<dyn Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut options = Options::default();
    let mut iter = args.iter();

    while let Some(flag) = iter.next() {
        let mut value = || {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("missing value for {}", flag))
        };
        match flag.as_str() {
            "--preset" => options.preset = value()?,
            "--config" => options.config = Some(value()?),
            "--seconds" => options.seconds = value()?.parse()?,
            "--fps" => options.fps = value()?.parse()?,
            "--seed" => options.seed = value()?.parse()?,
            "--mode" => options.mode = Some(value()?),
            "--speed" => {
                let name = value()?;
                options.speed = SpeedPreset::parse(&name)
                    .ok_or_else(|| format!("unknown speed preset '{}'", name))?;
            }
            "--interact" => {
                let raw = value()?;
                let parts = raw
                    .split(',')
                    .map(str::parse::<f32>)
                    .collect::<Result<Vec<_>, _>>()?;
                if parts.len() != 3 {
                    return Err(format!("--interact expects X,Y,Z, got '{}'", raw).into());
                }
                options.interaction = Some(Vec3::new(parts[0], parts[1], parts[2]));
            }
            "--help" | "-h" => {
                println!(
                    "usage: motes-harness [--preset ID | --config PATH] [--seconds S] [--fps F] \
                     [--seed N] [--speed PRESET] [--interact X,Y,Z] [--mode TAG]"
                );
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument '{}'", other).into()),
        }
    }

    if !options.fps.is_finite() || options.fps <= 0.0 || !options.seconds.is_finite() || options.seconds < 0.0 {
        return Err("--fps must be positive and --seconds non-negative".into());
    }
    Ok(options)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let options = parse_args()?;

    let mut session = Session::new(options.seed);
    let id = match &options.config {
        Some(path) => {
            let path = Path::new(path);
            let config = match path.extension().and_then(|ext| ext.to_str()) {
                Some("yaml") | Some("yml") => EnvironmentConfig::load_yaml(path)?,
                _ => EnvironmentConfig::load_json(path)?,
            };
            session.register(config)?.id().to_string()
        }
        None => options.preset.clone(),
    };
    session.switch_environment_with_mode(&id, options.mode.as_deref())?;

    let mut quality = match session.current_environment() {
        Some(environment) => {
            AdaptiveQualityController::from_performance(&environment.config().performance)
        }
        None => return Err(format!("environment '{}' is not active", id).into()),
    };

    let mut speed = SpeedControl::new();
    speed.set_preset(options.speed);

    let frame_ms = 1000.0 / options.fps as f64;
    let delta = 1.0 / options.fps;
    let total_frames = (options.seconds * options.fps).round() as usize;
    let report_every = (options.fps.round() as usize).max(1);

    println!("Environment: {} ({} frames at {:.0} fps)", id, total_frames, options.fps);

    for frame in 0..total_frames {
        speed.update(delta);
        session.update(delta * speed.current_speed(), options.interaction);

        if let Some(active) = quality.on_frame(frame as f64 * frame_ms, session.system_mut()) {
            info!("Adaptive quality: {} active particles", active);
        }

        if (frame + 1) % report_every == 0 {
            if let Some(system) = session.system() {
                let mean_radius = system
                    .active_particles()
                    .iter()
                    .map(|p| p.position.length())
                    .sum::<f32>()
                    / system.active_count().max(1) as f32;
                info!(
                    "t={:6.2}s active={:5} speed={:.2}x mean|r|={:.3}",
                    system.time(),
                    system.active_count(),
                    speed.current_speed(),
                    mean_radius
                );
            }
        }
    }

    if let Some(system) = session.system() {
        println!(
            "Done: t={:.2}s, {} of {} particles active",
            system.time(),
            system.active_count(),
            system.allocated_count()
        );
    }
    session.dispose();
    Ok(())
}
