pub mod command_diarizer;
pub mod diarization_error;
pub mod json_segments_diarizer;
mod rttm;
pub mod rttm_diarizer;

pub use rttm::parse_rttm;
