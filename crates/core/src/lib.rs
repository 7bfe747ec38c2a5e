pub mod audio;
pub mod config;
pub mod diarization;
pub mod media;
pub mod pipeline;
pub mod shared;
