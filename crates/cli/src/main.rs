use std::path::PathBuf;
use std::process;

use clap::Parser;

use spoiler_core::blurring::infrastructure::blurrer_factory::create_blurrer;
use spoiler_core::pipeline::generate_frames_use_case::{seeded_rng, GenerateFramesUseCase};
use spoiler_core::pipeline::pipeline_logger::LogPipelineLogger;
use spoiler_core::pipeline::render_spoiler_use_case::{RenderPaths, RenderSpoilerUseCase};
use spoiler_core::shared::spoiler_config::SpoilerConfig;
use spoiler_core::video::infrastructure::ffmpeg_cli_encoder::FfmpegCliEncoder;
use spoiler_core::video::infrastructure::image_file_reader::ImageFileReader;
use spoiler_core::video::infrastructure::image_file_writer::ImageFileWriter;

/// Turn a still image into a blurred, shimmering spoiler video.
#[derive(Parser, Debug)]
#[command(name = "spoiler")]
struct Cli {
    /// Source image file.
    input: PathBuf,

    /// Output video file [default: spoiler.mp4].
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory for intermediate frames (wiped before rendering) [default: frames].
    #[arg(long)]
    frames_dir: Option<PathBuf>,

    /// JSON config file; defaults to the user config dir when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Frames per second.
    #[arg(long)]
    fps: Option<u32>,

    /// Clip length in seconds.
    #[arg(long)]
    duration: Option<u32>,

    /// Gaussian blur sigma in pixels.
    #[arg(long)]
    blur_sigma: Option<f64>,

    /// Fraction of pixels that seed a shimmer dot (0.0-1.0).
    #[arg(long)]
    dot_density: Option<f64>,

    /// Dot square size in pixels.
    #[arg(long)]
    dot_size: Option<u32>,

    /// Brightness oscillations over the whole clip.
    #[arg(long)]
    shimmer_speed: Option<f64>,

    /// Opacity of the black overlay (0.0-1.0).
    #[arg(long)]
    darken: Option<f64>,

    /// RNG seed for reproducible dot placement.
    #[arg(long)]
    seed: Option<u64>,

    /// Keep the frames directory after encoding.
    #[arg(long)]
    keep_frames: bool,

    /// ffmpeg binary to invoke.
    #[arg(long)]
    ffmpeg: Option<String>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    validate(&cli, &config)?;

    let encoder = FfmpegCliEncoder::with_binary(&config.ffmpeg);
    if !encoder.is_available() {
        log::warn!(
            "{} did not respond to -version; encoding will likely fail",
            config.ffmpeg
        );
    }

    let (mut rng, seed) = seeded_rng(config.seed);
    log::info!("Using seed {seed}");

    let generator = GenerateFramesUseCase::new(
        Box::new(ImageFileReader::new()),
        create_blurrer(config.blur_sigma),
        Box::new(ImageFileWriter::new()),
        Box::new(LogPipelineLogger::new(config.fps as usize)),
    );
    let mut use_case =
        RenderSpoilerUseCase::new(generator, Box::new(encoder), config.fps, config.keep_frames);

    let paths = RenderPaths {
        source: cli.input,
        frames_dir: config.frames_dir.clone(),
        output: config.output.clone(),
    };
    use_case.execute(&paths, &config.shimmer_settings(), &mut rng)?;
    Ok(())
}

/// Defaults, then the config file, then command-line flags.
fn resolve_config(cli: &Cli) -> Result<SpoilerConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => SpoilerConfig::from_file(path)?,
        None => SpoilerConfig::load()?,
    };
    apply_overrides(&mut config, cli);
    Ok(config)
}

fn apply_overrides(config: &mut SpoilerConfig, cli: &Cli) {
    if let Some(output) = &cli.output {
        config.output = output.clone();
    }
    if let Some(frames_dir) = &cli.frames_dir {
        config.frames_dir = frames_dir.clone();
    }
    if let Some(fps) = cli.fps {
        config.fps = fps;
    }
    if let Some(duration) = cli.duration {
        config.duration_secs = duration;
    }
    if let Some(sigma) = cli.blur_sigma {
        config.blur_sigma = sigma;
    }
    if let Some(density) = cli.dot_density {
        config.dot_density = density;
    }
    if let Some(size) = cli.dot_size {
        config.dot_size = size;
    }
    if let Some(speed) = cli.shimmer_speed {
        config.shimmer_speed = speed;
    }
    if let Some(darken) = cli.darken {
        config.darken_fraction = darken;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if cli.keep_frames {
        config.keep_frames = true;
    }
    if let Some(ffmpeg) = &cli.ffmpeg {
        config.ffmpeg = ffmpeg.clone();
    }
}

fn validate(cli: &Cli, config: &SpoilerConfig) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(format!("Input file not found: {}", cli.input.display()).into());
    }
    config.validate()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("spoiler").chain(args.iter().copied()))
    }

    #[test]
    fn test_flags_override_config() {
        let cli = parse(&[
            "in.png",
            "--fps",
            "24",
            "--duration",
            "2",
            "--darken",
            "0.5",
            "--seed",
            "9",
            "--keep-frames",
            "-o",
            "out.mp4",
        ]);
        let mut config = SpoilerConfig::default();
        apply_overrides(&mut config, &cli);
        assert_eq!(config.fps, 24);
        assert_eq!(config.total_frames(), 48);
        assert_eq!(config.darken_fraction, 0.5);
        assert_eq!(config.seed, Some(9));
        assert!(config.keep_frames);
        assert_eq!(config.output, PathBuf::from("out.mp4"));
    }

    #[test]
    fn test_absent_flags_keep_config_values() {
        let cli = parse(&["in.png"]);
        let mut config = SpoilerConfig {
            fps: 12,
            seed: Some(3),
            keep_frames: true,
            ..SpoilerConfig::default()
        };
        let before = config.clone();
        apply_overrides(&mut config, &cli);
        assert_eq!(config, before);
    }

    #[test]
    fn test_explicit_config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spoiler.json");
        std::fs::write(&path, r#"{ "dot_size": 3, "fps": 10 }"#).unwrap();
        let cli = parse(&["in.png", "--config", path.to_str().unwrap(), "--fps", "20"]);

        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.dot_size, 3);
        assert_eq!(config.fps, 20);
    }

    #[test]
    fn test_validate_rejects_missing_input() {
        let cli = parse(&["/nonexistent/in.png"]);
        let err = validate(&cli, &SpoilerConfig::default()).unwrap_err();
        assert!(err.to_string().contains("Input file not found"));
    }

    #[test]
    fn test_validate_rejects_bad_darken() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        std::fs::write(&input, b"x").unwrap();
        let cli = parse(&[input.to_str().unwrap()]);
        let config = SpoilerConfig {
            darken_fraction: 2.0,
            ..SpoilerConfig::default()
        };
        assert!(validate(&cli, &config).is_err());
    }
}
