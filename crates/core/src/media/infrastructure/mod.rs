#[cfg(feature = "ffmpeg")]
pub mod ffmpeg_audio_reader;
pub mod media_error;
pub mod wav_audio_reader;
pub mod wav_audio_writer;
