use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};

use crossbeam_channel::RecvTimeoutError;

use super::diarization_error::DiarizationError;
use super::rttm::parse_rttm;
use crate::diarization::domain::speaker_diarizer::{DiarizationRequest, SpeakerDiarizer};
use crate::diarization::domain::speech_segment::SpeechSegment;
use crate::shared::constants::DIARIZATION_RUNTIME_FACTOR;

pub const AUDIO_PLACEHOLDER: &str = "{audio}";
pub const NUM_SPEAKERS_PLACEHOLDER: &str = "{num_speakers}";

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);
const MAX_ESTIMATE: f64 = 0.99;

/// Reported while the external program runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DiarizationProgress {
    /// `fraction` is an estimate, `None` when the audio duration is unknown.
    Running {
        elapsed: Duration,
        fraction: Option<f64>,
    },
    /// The program exited, successfully or not. Always the last report.
    Finished { elapsed: Duration },
}

pub type ProgressFn = Box<dyn Fn(DiarizationProgress) + Send>;

/// Runs an external diarization program and parses its stdout as RTTM.
///
/// Arguments may contain `{audio}` and `{num_speakers}`, which are
/// substituted per request. The program is only started when
/// [`SpeakerDiarizer::diarize`] is called.
pub struct CommandDiarizer {
    program: String,
    args: Vec<String>,
    poll_interval: Duration,
    progress: Option<ProgressFn>,
}

impl CommandDiarizer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            poll_interval: DEFAULT_POLL_INTERVAL,
            progress: None,
        }
    }

    /// Split a whitespace-separated command line. No shell quoting is applied.
    pub fn from_command_line(command_line: &str) -> Result<Self, DiarizationError> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or(DiarizationError::EmptyCommand)?;
        Ok(Self::new(program, parts.collect()))
    }

    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments with placeholders filled in for `request`.
    pub fn expand_args(&self, request: &DiarizationRequest<'_>) -> Vec<String> {
        let audio = request.audio_path.to_string_lossy();
        let speakers = request.num_speakers.to_string();
        self.args
            .iter()
            .map(|arg| {
                arg.replace(AUDIO_PLACEHOLDER, &audio)
                    .replace(NUM_SPEAKERS_PLACEHOLDER, &speakers)
            })
            .collect()
    }

    fn run(&self, request: &DiarizationRequest<'_>) -> Result<Output, DiarizationError> {
        let spawn_error = |source| DiarizationError::Spawn {
            program: self.program.clone(),
            source,
        };

        let child = Command::new(&self.program)
            .args(self.expand_args(request))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;
        log::info!("Started diarization: {}", self.program);

        let (done_tx, done_rx) = crossbeam_channel::bounded(1);
        std::thread::spawn(move || {
            let _ = done_tx.send(child.wait_with_output());
        });

        let started = Instant::now();
        let expected = request.audio_duration * DIARIZATION_RUNTIME_FACTOR;
        loop {
            match done_rx.recv_timeout(self.poll_interval) {
                Ok(result) => {
                    self.report(DiarizationProgress::Finished {
                        elapsed: started.elapsed(),
                    });
                    return result.map_err(spawn_error);
                }
                Err(RecvTimeoutError::Timeout) => {
                    let elapsed = started.elapsed();
                    let fraction = (expected > 0.0)
                        .then(|| (elapsed.as_secs_f64() / expected).min(MAX_ESTIMATE));
                    self.report(DiarizationProgress::Running { elapsed, fraction });
                }
                Err(RecvTimeoutError::Disconnected) => {
                    self.report(DiarizationProgress::Finished {
                        elapsed: started.elapsed(),
                    });
                    return Err(spawn_error(std::io::Error::other(
                        "diarization worker exited without a result",
                    )));
                }
            }
        }
    }

    fn report(&self, update: DiarizationProgress) {
        if let Some(ref progress) = self.progress {
            progress(update);
        }
    }
}

impl SpeakerDiarizer for CommandDiarizer {
    fn diarize(
        &self,
        request: &DiarizationRequest<'_>,
    ) -> Result<Vec<SpeechSegment>, Box<dyn std::error::Error>> {
        let output = self.run(request)?;
        if !output.status.success() {
            return Err(DiarizationError::CommandFailed {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(parse_rttm(&stdout)?)
    }
}
