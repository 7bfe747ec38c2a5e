use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::diarization::domain::interviewer_selector::{
    InterviewerSelector, SelectionError, SelectionPolicy,
};
use crate::media::infrastructure::wav_audio_writer::WavBitDepth;
use crate::shared::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_DETECTION_METHOD, DEFAULT_FILENAME_PATTERN,
    DEFAULT_NUM_SPEAKERS, DEFAULT_SAMPLE_RATE, ORIGINAL_NAME_PLACEHOLDER, OUTPUT_EXTENSION,
};
use crate::shared::output_name;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("invalid config value: {0}")]
    Invalid(String),
    #[error(transparent)]
    Selection(#[from] SelectionError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeakerConfig {
    /// `duration`, `first` or `manual`.
    pub detection_method: String,
    pub num_speakers: usize,
    pub target_speaker: Option<String>,
}

impl Default for SpeakerConfig {
    fn default() -> Self {
        Self {
            detection_method: DEFAULT_DETECTION_METHOD.to_string(),
            num_speakers: DEFAULT_NUM_SPEAKERS,
            target_speaker: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Fade length in seconds at each cut.
    pub transition_smooth: f64,
    pub sample_rate: u32,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            transition_smooth: crate::audio::domain::excision_engine::DEFAULT_FADE_DURATION,
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub normalize_audio: bool,
    /// `float32` or `pcm16`.
    pub bit_depth: WavBitDepth,
    pub filename_pattern: String,
    /// Defaults to the current directory.
    pub directory: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            normalize_audio: true,
            bit_depth: WavBitDepth::Float32,
            filename_pattern: DEFAULT_FILENAME_PATTERN.to_string(),
            directory: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexlessConfig {
    pub speaker: SpeakerConfig,
    pub processing: ProcessingConfig,
    pub output: OutputConfig,
}

impl LexlessConfig {
    /// `<config dir>/lexless/config.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Read and validate a config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `explicit` if given, else the default location when it exists,
    /// else built-in defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        fs::write(path, json).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.processing.sample_rate == 0 {
            return Err(ConfigError::Invalid(
                "processing.sample_rate must be greater than 0".to_string(),
            ));
        }
        let fade = self.processing.transition_smooth;
        if !fade.is_finite() || fade < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "processing.transition_smooth must be a non-negative number, got {fade}"
            )));
        }
        if self.speaker.num_speakers == 0 {
            return Err(ConfigError::Invalid(
                "speaker.num_speakers must be at least 1".to_string(),
            ));
        }
        if !self.output.filename_pattern.contains(ORIGINAL_NAME_PLACEHOLDER) {
            return Err(ConfigError::Invalid(format!(
                "output.filename_pattern must contain {ORIGINAL_NAME_PLACEHOLDER}"
            )));
        }
        self.selection_policy()?;
        Ok(())
    }

    pub fn selection_policy(&self) -> Result<SelectionPolicy, SelectionError> {
        self.speaker.detection_method.parse()
    }

    /// Build the selector the speaker section describes.
    pub fn interviewer_selector(&self) -> Result<InterviewerSelector, SelectionError> {
        InterviewerSelector::new(
            self.selection_policy()?,
            self.speaker.target_speaker.clone(),
            self.speaker.num_speakers,
        )
    }

    /// Output path for `source`, named after `title` when given, else after
    /// the source file stem.
    pub fn output_path_for(&self, source: &Path, title: Option<&str>) -> PathBuf {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        output_name::output_path(
            self.output.directory.as_deref(),
            &self.output.filename_pattern,
            title.unwrap_or(&stem),
            OUTPUT_EXTENSION,
        )
    }
}
