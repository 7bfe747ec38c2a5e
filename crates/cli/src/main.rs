use std::path::{Path, PathBuf};
use std::process;
use clap::{ArgGroup, Parser};

use lexless_core::audio::domain::excision_engine::ExcisionEngine;
use lexless_core::config::LexlessConfig;
use lexless_core::diarization::domain::speaker_diarizer::SpeakerDiarizer;
use lexless_core::diarization::infrastructure::command_diarizer::{
    CommandDiarizer, DiarizationProgress,
};
use lexless_core::diarization::infrastructure::json_segments_diarizer::JsonSegmentsDiarizer;
use lexless_core::diarization::infrastructure::rttm_diarizer::RttmDiarizer;
use lexless_core::media::domain::audio_reader::AudioReader;
use lexless_core::media::infrastructure::wav_audio_writer::WavAudioWriter;
use lexless_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use lexless_core::pipeline::remove_interviewer_use_case::RemoveInterviewerUseCase;

/// Remove the interviewer's speech from a recorded interview.
#[derive(Parser)]
#[command(name = "lexless")]
#[command(group(
    ArgGroup::new("speaker_source")
        .required(true)
        .args(["rttm", "segments", "diarize_cmd"])
))]
struct Cli {
    /// Input audio file.
    input: PathBuf,

    /// Speaker segments as an RTTM file.
    #[arg(long)]
    rttm: Option<PathBuf>,

    /// Speaker segments as a JSON array of {start, end, speaker}.
    #[arg(long)]
    segments: Option<PathBuf>,

    /// External diarization command printing RTTM to stdout.
    /// `{audio}` and `{num_speakers}` are substituted.
    #[arg(long)]
    diarize_cmd: Option<String>,

    /// Config file (default: <config dir>/lexless/config.json).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output name substituted into the filename pattern
    /// (default: the input file name).
    #[arg(long)]
    output: Option<String>,

    /// Interviewer detection method: duration, first or manual.
    #[arg(long)]
    method: Option<String>,

    /// Expected number of speakers.
    #[arg(long)]
    num_speakers: Option<usize>,

    /// Speaker label to remove (required with --method manual).
    #[arg(long)]
    target_speaker: Option<String>,

    /// Fade length in seconds at each cut.
    #[arg(long)]
    fade: Option<f64>,

    /// Processing sample rate in Hz (default: the input's own rate for
    /// WAV input, the configured rate when decoding with ffmpeg).
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Skip peak normalization.
    #[arg(long)]
    no_normalize: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    if !cli.input.exists() {
        return Err(format!("Input file not found: {}", cli.input.display()).into());
    }

    let config = resolve_config(&cli)?;
    let output = config.output_path_for(&cli.input, cli.output.as_deref());
    if is_same_file(&output, &cli.input) {
        return Err(format!(
            "Output would overwrite the input file: {}",
            output.display()
        )
        .into());
    }

    let selector = config.interviewer_selector()?;
    let diarizer = build_diarizer(&cli)?;

    let mut use_case = RemoveInterviewerUseCase::new(
        build_reader(),
        Box::new(WavAudioWriter::new(config.output.bit_depth)),
        diarizer,
        selector,
    )
    .with_engine(ExcisionEngine::new(config.processing.transition_smooth))
    .with_normalize(config.output.normalize_audio)
    .with_logger(Box::new(StdoutPipelineLogger::new()));
    if let Some(rate) = decode_rate(&cli, &config) {
        use_case = use_case.with_sample_rate(rate);
    }

    let report = use_case.run(&cli.input, &output)?;

    if report.output_empty() {
        log::warn!("Output is empty: {}", report.output_path.display());
    } else if report.nothing_removed() {
        log::info!("Nothing was removed; output matches the input");
    }
    log::info!("Output written to {}", report.output_path.display());
    Ok(())
}

/// Config file values with command-line overrides applied.
fn resolve_config(cli: &Cli) -> Result<LexlessConfig, Box<dyn std::error::Error>> {
    resolve_config_from(cli, LexlessConfig::load_or_default(cli.config.as_deref())?)
}

fn resolve_config_from(
    cli: &Cli,
    mut config: LexlessConfig,
) -> Result<LexlessConfig, Box<dyn std::error::Error>> {
    if let Some(ref method) = cli.method {
        config.speaker.detection_method = method.clone();
    }
    if let Some(n) = cli.num_speakers {
        config.speaker.num_speakers = n;
    }
    if let Some(ref target) = cli.target_speaker {
        config.speaker.target_speaker = Some(target.clone());
    }
    if let Some(fade) = cli.fade {
        config.processing.transition_smooth = fade;
    }
    if let Some(rate) = cli.sample_rate {
        config.processing.sample_rate = rate;
    }
    if cli.no_normalize {
        config.output.normalize_audio = false;
    }

    config.validate()?;
    Ok(config)
}

fn build_diarizer(cli: &Cli) -> Result<Box<dyn SpeakerDiarizer>, Box<dyn std::error::Error>> {
    if let Some(ref path) = cli.rttm {
        return Ok(Box::new(RttmDiarizer::new(path)));
    }
    if let Some(ref path) = cli.segments {
        return Ok(Box::new(JsonSegmentsDiarizer::new(path)));
    }
    let command_line = cli.diarize_cmd.as_deref().unwrap_or_default();
    let diarizer =
        CommandDiarizer::from_command_line(command_line)?.with_progress(Box::new(diarize_progress));
    Ok(Box::new(diarizer))
}

#[cfg(feature = "ffmpeg")]
fn build_reader() -> Box<dyn AudioReader> {
    Box::new(lexless_core::media::infrastructure::ffmpeg_audio_reader::FfmpegAudioReader)
}

#[cfg(not(feature = "ffmpeg"))]
fn build_reader() -> Box<dyn AudioReader> {
    Box::new(lexless_core::media::infrastructure::wav_audio_reader::WavAudioReader)
}

/// The ffmpeg reader resamples to the configured rate.
#[cfg(feature = "ffmpeg")]
fn decode_rate(cli: &Cli, config: &LexlessConfig) -> Option<u32> {
    Some(cli.sample_rate.unwrap_or(config.processing.sample_rate))
}

/// WAV input is decoded at its own rate unless one is asked for.
#[cfg(not(feature = "ffmpeg"))]
fn decode_rate(cli: &Cli, _config: &LexlessConfig) -> Option<u32> {
    cli.sample_rate
}

fn diarize_progress(update: DiarizationProgress) {
    eprint!("\r{}", progress_line(update));
    if let DiarizationProgress::Finished { .. } = update {
        eprintln!();
    }
}

fn progress_line(update: DiarizationProgress) -> String {
    let clock = |elapsed: std::time::Duration| {
        let secs = elapsed.as_secs();
        format!("{}m {:02}s", secs / 60, secs % 60)
    };
    match update {
        DiarizationProgress::Running {
            elapsed,
            fraction: Some(f),
        } => format!(
            "Identifying speakers... ~{:.0}% ({})",
            f * 100.0,
            clock(elapsed)
        ),
        DiarizationProgress::Running {
            elapsed,
            fraction: None,
        } => format!("Identifying speakers... {}", clock(elapsed)),
        DiarizationProgress::Finished { elapsed } => {
            format!("Identifying speakers... done ({})", clock(elapsed))
        }
    }
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_running_line_shows_estimate_and_clock() {
        let line = progress_line(DiarizationProgress::Running {
            elapsed: Duration::from_secs(75),
            fraction: Some(0.42),
        });
        assert_eq!(line, "Identifying speakers... ~42% (1m 15s)");
    }

    #[test]
    fn test_finished_line_reports_done() {
        let line = progress_line(DiarizationProgress::Finished {
            elapsed: Duration::from_secs(5),
        });
        assert_eq!(line, "Identifying speakers... done (0m 05s)");
    }

    #[test]
    fn test_sample_rate_flag_overrides_config() {
        let cli = Cli::parse_from([
            "lexless",
            "in.wav",
            "--rttm",
            "in.rttm",
            "--sample-rate",
            "16000",
        ]);
        let config = resolve_config_from(&cli, LexlessConfig::default()).unwrap();
        assert_eq!(decode_rate(&cli, &config), Some(16000));
    }

    #[cfg(not(feature = "ffmpeg"))]
    #[test]
    fn test_wav_input_decoded_at_native_rate_without_flag() {
        let cli = Cli::parse_from(["lexless", "in.wav", "--rttm", "in.rttm"]);
        let config = resolve_config_from(&cli, LexlessConfig::default()).unwrap();
        assert_eq!(decode_rate(&cli, &config), None);
    }
}
