pub mod audio_buffer;
pub mod deletion_plan;
pub mod excision_engine;
pub mod fade_curve;
pub mod normalizer;
pub mod segment_merger;
