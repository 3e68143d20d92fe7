use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use edgeview_core::{
    EdgeThresholds, EngineConfig, EngineSlot, FrameRateMeter, PixelView, ProcessingMode,
};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "edgeview")]
#[command(about = "Run a still image through the edgeview frame engine")]
#[command(version)]
struct Args {
    /// Input image (PNG or JPEG)
    input: PathBuf,

    /// Output image; format follows the extension
    output: PathBuf,

    /// Rendering to produce
    #[arg(short, long, value_enum, default_value_t = Mode::Edges)]
    mode: Mode,

    /// JSON engine configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Lower hysteresis threshold (overrides config)
    #[arg(long)]
    low: Option<u8>,

    /// Upper hysteresis threshold (overrides config)
    #[arg(long)]
    high: Option<u8>,

    /// Number of times to process the frame, for timing
    #[arg(short = 'n', long, default_value = "1")]
    iterations: u32,

    /// Log level (debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    Raw,
    Gray,
    Edges,
}

impl From<Mode> for ProcessingMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Raw => ProcessingMode::Raw,
            Mode::Gray => ProcessingMode::Grayscale,
            Mode::Edges => ProcessingMode::EdgeMap,
        }
    }
}

fn load_config(args: &Args) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .map_err(|e| format!("Cannot read config '{}': {}", path.display(), e))?;
            EngineConfig::from_json(&json)?
        }
        None => EngineConfig::default(),
    };

    if args.low.is_some() || args.high.is_some() {
        let low = args.low.unwrap_or(config.thresholds.low());
        let high = args.high.unwrap_or(config.thresholds.high());
        config = config.with_thresholds(EdgeThresholds::new(low, high)?);
    }

    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    let config = load_config(&args)?;
    let mode = ProcessingMode::from(args.mode);

    let image = image::open(&args.input)
        .map_err(|e| format!("Cannot open '{}': {}", args.input.display(), e))?
        .to_rgba8();
    let (width, height) = image.dimensions();
    info!("Loaded {} ({}x{})", args.input.display(), width, height);

    let slot = EngineSlot::initialized(config);
    let input = PixelView::rgba(width, height, image.as_raw())?;
    let mut display = vec![0u8; input.data().len()];
    let mut meter = FrameRateMeter::default();

    for i in 0..args.iterations.max(1) {
        let report = slot.process_into(input, &mut display, width, height, mode)?;
        meter.record_frame();
        debug!("Frame {}: {:.3} ms", i + 1, report.elapsed_ms);
    }

    let output = image::RgbaImage::from_raw(width, height, display)
        .ok_or("output buffer does not match image size")?;
    output
        .save(&args.output)
        .map_err(|e| format!("Cannot write '{}': {}", args.output.display(), e))?;

    info!("Mode: {}", mode);
    info!("Resolution: {}x{}", width, height);
    info!("Processing: {:.3} ms", slot.last_processing_time_ms());
    if meter.samples() > 0 {
        info!("FPS: {:.1}", meter.fps());
    }
    info!("Wrote {}", args.output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["edgeview", "in.png", "out.png"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_defaults() {
        let args = args(&[]);
        assert!(matches!(args.mode, Mode::Edges));
        assert_eq!(args.iterations, 1);
        assert_eq!(load_config(&args).unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_threshold_overrides() {
        let config = load_config(&args(&["--low", "10", "--high", "40"])).unwrap();
        assert_eq!(config.thresholds, EdgeThresholds::new(10, 40).unwrap());

        let config = load_config(&args(&["--high", "200"])).unwrap();
        assert_eq!(config.thresholds, EdgeThresholds::new(50, 200).unwrap());
    }

    #[test]
    fn test_inverted_overrides_rejected() {
        assert!(load_config(&args(&["--low", "200", "--high", "100"])).is_err());
    }

    #[test]
    fn test_mode_mapping() {
        assert_eq!(ProcessingMode::from(Mode::Gray), ProcessingMode::Grayscale);
        assert!(matches!(args(&["-m", "raw"]).mode, Mode::Raw));
    }
}
