// Visage command line interface
// Drive the lip-sync controller from speech marks or a synthesis backend

mod config;

use bytes::Bytes;
use clap::{Parser, Subcommand};
use config::CliConfig;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use visage_core::MarkerSequence;
use visage_me::{
    AnimationDriver, AnimationState, LipSyncController, SimulatedAudioBackend, SimulatedTrack, Viseme,
};
use visage_spk::{parse_speech_marks, HttpSynthesisClient, SynthesisClient, SynthesisRequest};

/// Upper bound on simulated frames, so a track without a duration still terminates
const MAX_FRAMES: usize = 100_000;

#[derive(Parser)]
#[command(name = "visage")]
#[command(about = "Visage - viseme lip-sync for talking avatars", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    /// Configuration file (toml, yaml or json)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a speech marks file against a simulated audio clock
    Simulate {
        /// File with one JSON speech mark per line
        #[arg(long)]
        marks: PathBuf,

        /// Audio length in milliseconds (default: last mark plus 300ms)
        #[arg(long)]
        duration_ms: Option<u64>,

        /// Frames per second
        #[arg(long, default_value = "60")]
        fps: u32,
    },

    /// Synthesize text and play it back in real time
    Speak {
        /// Text to speak
        #[arg(long, short)]
        text: String,

        /// Voice id (see `visage voices`)
        #[arg(long, short)]
        voice: Option<String>,

        /// Frames per second
        #[arg(long, default_value = "60")]
        fps: u32,

        /// Silence after the last mark, in milliseconds
        #[arg(long, default_value = "300")]
        tail_ms: u64,
    },

    /// List available voices
    Voices,
}

/// Reports body animation cross-fades to the log
struct LoggingAnimation;

impl AnimationDriver for LoggingAnimation {
    fn transition(&mut self, to: AnimationState, fade: Duration) {
        info!("Animation -> {:?} (fade {:?})", to, fade);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .map_err(|e| anyhow::anyhow!("Invalid log level '{}': {}", cli.log_level, e))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = CliConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Simulate { marks, duration_ms, fps } => {
            simulate(config, &marks, duration_ms, fps)?;
        }
        Commands::Speak { text, voice, fps, tail_ms } => {
            speak(config, text, voice, fps, tail_ms).await?;
        }
        Commands::Voices => {
            list_voices(&config);
        }
    }

    Ok(())
}

fn frame_interval(fps: u32) -> anyhow::Result<f64> {
    if fps == 0 || fps > 1000 {
        return Err(anyhow::anyhow!("FPS must be between 1 and 1000, got {}", fps));
    }
    Ok(1000.0 / fps as f64)
}

fn estimated_duration(markers: &MarkerSequence, tail_ms: u64) -> u64 {
    markers.last().map(|m| m.time_ms).unwrap_or(0) + tail_ms
}

fn controller_for(config: &CliConfig, duration_ms: u64) -> anyhow::Result<(LipSyncController, SimulatedAudioBackend)> {
    let backend = SimulatedAudioBackend::new().with_duration(duration_ms as f64);
    let mut controller = LipSyncController::new(config.lipsync.clone(), backend.clone())?.with_configured_surfaces();
    controller.set_animation_driver(LoggingAnimation);
    controller.on_speaking_ended(|id| info!("Speaking ended: {}", id));
    controller.on_playback_error(|id, e| error!("Playback failed for {}: {}", id, e));
    Ok((controller, backend))
}

fn head_weight(controller: &LipSyncController, viseme: Option<Viseme>) -> f32 {
    let (Some(viseme), Some(surface)) = (viseme, controller.surfaces().next()) else {
        return 0.0;
    };
    surface.weight(viseme.morph_target()).unwrap_or(0.0)
}

fn viseme_label(viseme: Option<Viseme>) -> String {
    viseme.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn current_track(backend: &SimulatedAudioBackend) -> anyhow::Result<SimulatedTrack> {
    backend
        .last_track()
        .ok_or_else(|| anyhow::anyhow!("No audio track was opened"))
}

fn simulate(config: CliConfig, marks: &Path, duration_ms: Option<u64>, fps: u32) -> anyhow::Result<()> {
    let step = frame_interval(fps)?;
    let text = std::fs::read_to_string(marks)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", marks.display(), e))?;
    let markers = parse_speech_marks(&text)?;
    let duration = duration_ms.unwrap_or_else(|| estimated_duration(&markers, 300));

    println!("{} markers, {}ms of audio at {} fps", markers.len(), duration, fps);

    let (mut controller, backend) = controller_for(&config, duration)?;
    controller.start_speaking_with_duration(Bytes::new(), markers, Some(duration as f64))?;
    let track = current_track(&backend)?;

    for _ in 0..MAX_FRAMES {
        let at = track.position_ms();
        let viseme = controller.frame();
        let weight = head_weight(&controller, viseme);
        println!("{:>9.1}ms  {:<12} {:.3}", at, viseme_label(viseme), weight);

        if !controller.is_speaking() {
            break;
        }
        track.advance(step);
    }

    Ok(())
}

async fn speak(config: CliConfig, text: String, voice: Option<String>, fps: u32, tail_ms: u64) -> anyhow::Result<()> {
    let step = frame_interval(fps)?;
    let client = HttpSynthesisClient::new(config.speech.clone())?;

    let mut request = SynthesisRequest::new(text);
    if let Some(voice) = voice {
        request = request.with_voice(voice);
    }

    info!("Requesting speech from {} backend", client.name());
    let result = client.synthesize(&request).await?;
    let duration = estimated_duration(&result.markers, tail_ms);
    println!(
        "Received {} bytes of audio, {} markers (~{}ms)",
        result.audio.len(),
        result.markers.len(),
        duration
    );

    let (mut controller, backend) = controller_for(&config, duration)?;
    controller.start_speaking(result.audio, result.markers)?;
    let track = current_track(&backend)?;

    let mut ticker = tokio::time::interval(Duration::from_secs_f64(step / 1000.0));
    let mut last_tick = Instant::now();
    let mut shown = None;

    loop {
        ticker.tick().await;
        let now = Instant::now();
        track.advance(now.duration_since(last_tick).as_secs_f64() * 1000.0);
        last_tick = now;

        let viseme = controller.frame();
        if viseme != shown {
            println!("{:>9.1}ms  {}", track.position_ms(), viseme_label(viseme));
            shown = viseme;
        }
        if !controller.is_speaking() {
            break;
        }
    }

    Ok(())
}

fn list_voices(config: &CliConfig) {
    for voice in &config.speech.voices {
        let marker = if voice.id == config.speech.default_voice { "*" } else { " " };
        println!("{} {:<10} {}", marker, voice.id, voice.name);
    }
}
