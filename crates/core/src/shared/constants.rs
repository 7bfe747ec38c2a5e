/// Sample rate audio is decoded to before processing.
pub const DEFAULT_SAMPLE_RATE: u32 = 22050;

/// Expected speaker count for an interview (host plus guest).
pub const DEFAULT_NUM_SPEAKERS: usize = 2;

pub const DEFAULT_DETECTION_METHOD: &str = "duration";

pub const ORIGINAL_NAME_PLACEHOLDER: &str = "{original_name}";
pub const DEFAULT_FILENAME_PATTERN: &str = "{original_name}_clean";
pub const OUTPUT_EXTENSION: &str = "wav";

/// Used when a source name sanitizes down to nothing.
pub const FALLBACK_OUTPUT_NAME: &str = "audio";

pub const CONFIG_DIR_NAME: &str = "lexless";
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Rough diarization cost: seconds of processing per second of audio.
pub const DIARIZATION_RUNTIME_FACTOR: f64 = 2.0;
