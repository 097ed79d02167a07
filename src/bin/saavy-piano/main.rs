//! saavy-piano - terminal piano with practice and auto-play
//!
//! Run with: cargo run -- --song "Ode to Joy" --autoplay

mod app;
mod audio;
mod ui;

use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::Arc,
};

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use saavy_piano::{
    dsp::OscillatorWaveform,
    synth::{SilentToneSource, ToneSource},
    Keyboard, Piano, PianoConfig, PianoError,
};

use app::App;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Waveform {
    Sine,
    Triangle,
    Sawtooth,
    Square,
}

impl From<Waveform> for OscillatorWaveform {
    fn from(value: Waveform) -> Self {
        match value {
            Waveform::Sine => OscillatorWaveform::Sine,
            Waveform::Triangle => OscillatorWaveform::Triangle,
            Waveform::Sawtooth => OscillatorWaveform::Saw,
            Waveform::Square => OscillatorWaveform::Square,
        }
    }
}

#[derive(Parser)]
#[command(name = "saavy-piano")]
#[command(about = "Terminal piano with free play, guided practice and auto-play")]
struct Cli {
    /// Song to select at startup
    #[arg(long)]
    song: Option<String>,

    /// Start auto-play immediately (the first song if none is given)
    #[arg(long)]
    autoplay: bool,

    /// Auto-play speed multiplier
    #[arg(long, default_value_t = 1.0)]
    speed: f64,

    /// Stop at the end of a song instead of looping
    #[arg(long)]
    no_loop: bool,

    /// Start with sound off
    #[arg(long)]
    muted: bool,

    /// Oscillator shape of the piano voice
    #[arg(long, value_enum, default_value_t = Waveform::Sine)]
    waveform: Waveform,

    /// Maximum simultaneously sounding tones
    #[arg(long, default_value_t = 32)]
    voices: usize,

    /// Where log output goes (the terminal is busy with the UI)
    #[arg(long, default_value = "saavy-piano.log")]
    log_file: PathBuf,

    /// Print the song catalog and exit
    #[arg(long)]
    list_songs: bool,
}

fn init_logging(path: &Path) -> EyreResult<()> {
    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let keyboard = Arc::new(Keyboard::standard()?);

    if cli.list_songs {
        for (id, song) in keyboard.songs.iter() {
            println!(
                "F{}  {:<24} {:>3} notes  {:>3.0} bpm",
                id.0 + 1,
                song.name(),
                song.len(),
                song.tempo()
            );
        }
        return Ok(());
    }

    init_logging(&cli.log_file)?;
    log::info!("saavy-piano v{}", env!("CARGO_PKG_VERSION"));

    let mut config = PianoConfig {
        initial_speed: cli.speed,
        looping: !cli.no_loop,
        max_voices: cli.voices,
        ..PianoConfig::default()
    };
    config.tone.waveform = cli.waveform.into();
    config.validate()?;

    // No audio device is not fatal: the piano runs silent
    let (engine, feeds, tones): (_, _, Box<dyn ToneSource>) = match audio::start(&config) {
        Ok((engine, feeds, tones)) => (Some(engine), Some(feeds), Box::new(tones)),
        Err(err) => {
            let err = PianoError::AudioUnavailable(format!("{err:#}"));
            log::error!("{err}; running without sound");
            (None, None, Box::new(SilentToneSource))
        }
    };

    let mut piano = Piano::new(keyboard, tones, config)?;
    piano.set_muted(cli.muted);
    if let Some(name) = &cli.song {
        piano.select_song(name)?;
    }
    if cli.autoplay {
        piano.toggle_autoplay();
    }

    let sample_rate = engine.as_ref().map(|e| e.sample_rate);

    let mut terminal = ratatui::init();
    let result = App::new(piano, feeds, sample_rate).run(&mut terminal);
    ratatui::restore();

    // Stream stays open until the UI is gone
    drop(engine);
    result
}
