pub mod interviewer_selector;
pub mod speaker_diarizer;
pub mod speech_segment;
