use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::audio::domain::excision_engine::ExcisionEngine;
use crate::audio::domain::normalizer::{Normalization, PeakNormalizer};
use crate::audio::domain::segment_merger::SegmentMerger;
use crate::diarization::domain::interviewer_selector::{InterviewerSelector, SelectionWarning};
use crate::diarization::domain::speaker_diarizer::{DiarizationRequest, SpeakerDiarizer};
use crate::media::domain::audio_reader::AudioReader;
use crate::media::domain::audio_writer::AudioWriter;
use crate::pipeline::pipeline_logger::{NullPipelineLogger, PipelineLogger};

/// What one run did.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub output_path: PathBuf,
    pub segments_found: usize,
    pub interviewer: Option<String>,
    /// Seconds of audio actually cut, after merging and clamping.
    pub removed_seconds: f64,
    pub original_duration: f64,
    pub new_duration: f64,
    pub output_samples: usize,
    pub normalization: Option<Normalization>,
    pub warnings: Vec<SelectionWarning>,
}

impl RunReport {
    /// True when nothing is left, i.e. the whole recording was removed
    /// or the input was already empty.
    pub fn output_empty(&self) -> bool {
        self.output_samples == 0
    }

    /// True when the selection produced nothing to cut.
    pub fn nothing_removed(&self) -> bool {
        self.removed_seconds == 0.0
    }
}

/// Decode, diarize, select the interviewer, cut their speech, normalize and
/// encode.
pub struct RemoveInterviewerUseCase {
    reader: Box<dyn AudioReader>,
    writer: Box<dyn AudioWriter>,
    diarizer: Box<dyn SpeakerDiarizer>,
    selector: InterviewerSelector,
    merger: SegmentMerger,
    engine: ExcisionEngine,
    /// Decode rate; `None` decodes at the source file's own rate.
    sample_rate: Option<u32>,
    normalize: bool,
    logger: Box<dyn PipelineLogger>,
}

impl RemoveInterviewerUseCase {
    pub fn new(
        reader: Box<dyn AudioReader>,
        writer: Box<dyn AudioWriter>,
        diarizer: Box<dyn SpeakerDiarizer>,
        selector: InterviewerSelector,
    ) -> Self {
        Self {
            reader,
            writer,
            diarizer,
            selector,
            merger: SegmentMerger::new(),
            engine: ExcisionEngine::default(),
            sample_rate: None,
            normalize: true,
            logger: Box::new(NullPipelineLogger),
        }
    }

    pub fn with_engine(mut self, engine: ExcisionEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = Some(sample_rate);
        self
    }

    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn with_logger(mut self, logger: Box<dyn PipelineLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn run(
        &mut self,
        source_path: &Path,
        output_path: &Path,
    ) -> Result<RunReport, Box<dyn std::error::Error>> {
        // 1. Decode
        self.logger.stage("Decoding audio");
        let started = Instant::now();
        let sample_rate = match self.sample_rate {
            Some(rate) => rate,
            None => self.reader.audio_metadata(source_path)?.0,
        };
        let audio = self.reader.read_audio(source_path, sample_rate)?;
        self.logger.timing("decode", elapsed_ms(started));
        let original_duration = audio.duration();
        self.logger.info(&format!(
            "Original duration: {original_duration:.2}s at {} Hz",
            audio.sample_rate()
        ));

        // 2. Diarize
        self.logger.stage("Identifying speakers");
        let started = Instant::now();
        let request = DiarizationRequest {
            audio_path: source_path,
            audio_duration: original_duration,
            num_speakers: self.selector.expected_speakers(),
        };
        let segments = self.diarizer.diarize(&request)?;
        self.logger.timing("diarize", elapsed_ms(started));
        self.logger.metric("segments", segments.len() as f64);
        self.logger
            .info(&format!("Found {} speech segments", segments.len()));

        // 3. Select and merge
        let selection = self.selector.select(&segments);
        for warning in &selection.warnings {
            self.logger.warn(&warning.to_string());
        }
        match &selection.speaker {
            Some(speaker) => self.logger.info(&format!(
                "Interviewer: {speaker} ({} segments)",
                selection.ranges.len()
            )),
            None => self.logger.info("No speech found; nothing to remove"),
        }
        self.logger.info(&format!(
            "Total time to remove: {:.2}s",
            selection.total_duration()
        ));
        let plan = self.merger.merge(&selection.ranges);
        self.logger.info(&format!(
            "Merged into {} ranges covering {:.2}s",
            plan.len(),
            plan.total_duration()
        ));

        // 4. Excise
        self.logger.stage("Removing interviewer segments");
        let started = Instant::now();
        let sample_rate = audio.sample_rate();
        let channels = audio.channels();
        let excision = self.engine.excise(audio, &plan);
        self.logger.timing("excise", elapsed_ms(started));
        let removed_seconds = if sample_rate > 0 {
            excision.removed_samples() as f64 / (sample_rate as f64 * channels as f64)
        } else {
            0.0
        };
        self.logger.metric("removed_seconds", removed_seconds);
        self.logger
            .info(&format!("Removed {removed_seconds:.2}s of audio"));
        if excision.removed_everything() {
            self.logger
                .warn("Every sample was removed; the output is empty");
        }

        // 5. Normalize
        let mut audio = excision.into_audio();
        let mut normalization = None;
        if self.normalize {
            let (normalized, outcome) = PeakNormalizer::normalize(audio);
            audio = normalized;
            if let Normalization::Scaled { gain } = outcome {
                self.logger.metric("normalization_gain", gain as f64);
            }
            normalization = Some(outcome);
        }

        // 6. Encode
        self.logger.stage("Writing output");
        let started = Instant::now();
        self.writer.write_audio(output_path, &audio)?;
        self.logger.timing("encode", elapsed_ms(started));
        let new_duration = audio.duration();
        self.logger
            .info(&format!("New duration: {new_duration:.2}s"));
        self.logger
            .info(&format!("Saved to {}", output_path.display()));
        self.logger.summary();

        Ok(RunReport {
            output_path: output_path.to_path_buf(),
            segments_found: segments.len(),
            interviewer: selection.speaker,
            removed_seconds,
            original_duration,
            new_duration,
            output_samples: audio.len(),
            normalization,
            warnings: selection.warnings,
        })
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::domain::audio_buffer::AudioBuffer;
    use crate::diarization::domain::interviewer_selector::SelectionPolicy;
    use crate::diarization::domain::speech_segment::SpeechSegment;
    use approx::assert_relative_eq;
    use std::sync::{Arc, Mutex};

    // ─── Stubs ───

    struct StubAudioReader {
        audio: AudioBuffer,
        requested_rate: Arc<Mutex<Option<u32>>>,
    }

    impl AudioReader for StubAudioReader {
        fn read_audio(
            &self,
            _: &Path,
            target_sample_rate: u32,
        ) -> Result<AudioBuffer, Box<dyn std::error::Error>> {
            *self.requested_rate.lock().unwrap() = Some(target_sample_rate);
            Ok(self.audio.clone())
        }

        fn audio_metadata(&self, _: &Path) -> Result<(u32, u16), Box<dyn std::error::Error>> {
            Ok((self.audio.sample_rate(), self.audio.channels()))
        }
    }

    struct StubAudioWriter {
        written: Arc<Mutex<Option<AudioBuffer>>>,
    }

    impl AudioWriter for StubAudioWriter {
        fn write_audio(
            &self,
            _: &Path,
            audio: &AudioBuffer,
        ) -> Result<(), Box<dyn std::error::Error>> {
            *self.written.lock().unwrap() = Some(audio.clone());
            Ok(())
        }
    }

    struct StubDiarizer {
        segments: Vec<SpeechSegment>,
        seen: Arc<Mutex<Option<(f64, usize)>>>,
    }

    impl SpeakerDiarizer for StubDiarizer {
        fn diarize(
            &self,
            request: &DiarizationRequest<'_>,
        ) -> Result<Vec<SpeechSegment>, Box<dyn std::error::Error>> {
            *self.seen.lock().unwrap() = Some((request.audio_duration, request.num_speakers));
            Ok(self.segments.clone())
        }
    }

    struct FailingDiarizer;

    impl SpeakerDiarizer for FailingDiarizer {
        fn diarize(
            &self,
            _: &DiarizationRequest<'_>,
        ) -> Result<Vec<SpeechSegment>, Box<dyn std::error::Error>> {
            Err("model crashed".into())
        }
    }

    struct RecordingLogger {
        infos: Arc<Mutex<Vec<String>>>,
    }

    impl PipelineLogger for RecordingLogger {
        fn stage(&mut self, _: &str) {}
        fn timing(&mut self, _: &str, _: f64) {}
        fn metric(&mut self, _: &str, _: f64) {}
        fn info(&mut self, message: &str) {
            self.infos.lock().unwrap().push(message.to_string());
        }
        fn warn(&mut self, _: &str) {}
    }

    struct Harness {
        written: Arc<Mutex<Option<AudioBuffer>>>,
        requested_rate: Arc<Mutex<Option<u32>>>,
        seen: Arc<Mutex<Option<(f64, usize)>>>,
        use_case: RemoveInterviewerUseCase,
    }

    fn harness(audio: AudioBuffer, segments: Vec<SpeechSegment>, policy: SelectionPolicy) -> Harness {
        let written = Arc::new(Mutex::new(None));
        let requested_rate = Arc::new(Mutex::new(None));
        let seen = Arc::new(Mutex::new(None));
        let use_case = RemoveInterviewerUseCase::new(
            Box::new(StubAudioReader {
                audio,
                requested_rate: requested_rate.clone(),
            }),
            Box::new(StubAudioWriter {
                written: written.clone(),
            }),
            Box::new(StubDiarizer {
                segments,
                seen: seen.clone(),
            }),
            InterviewerSelector::new(policy, None, 2).unwrap(),
        )
        .with_engine(ExcisionEngine::new(0.0));
        Harness {
            written,
            requested_rate,
            seen,
            use_case,
        }
    }

    fn seg(start: f64, end: f64, speaker: &str) -> SpeechSegment {
        SpeechSegment::new(start, end, speaker).unwrap()
    }

    fn interview() -> Vec<SpeechSegment> {
        vec![seg(0.0, 10.0, "A"), seg(10.0, 12.0, "B"), seg(12.0, 20.0, "A")]
    }

    fn level(value: f32) -> AudioBuffer {
        AudioBuffer::mono(vec![value; 200], 10)
    }

    #[test]
    fn test_interviewer_segments_removed() {
        let mut h = harness(level(1.0), interview(), SelectionPolicy::Duration);
        let report = h
            .use_case
            .run(Path::new("in.wav"), Path::new("out.wav"))
            .unwrap();

        assert_eq!(report.interviewer.as_deref(), Some("B"));
        assert_eq!(report.segments_found, 3);
        assert_relative_eq!(report.removed_seconds, 2.0);
        assert_relative_eq!(report.original_duration, 20.0);
        assert_relative_eq!(report.new_duration, 18.0);
        assert!(!report.output_empty());

        let written = h.written.lock().unwrap();
        assert_eq!(written.as_ref().unwrap().len(), 180);
    }

    #[test]
    fn test_collaborators_receive_run_parameters() {
        let mut h = harness(level(1.0), interview(), SelectionPolicy::Duration);
        h.use_case = h.use_case.with_sample_rate(16000);
        h.use_case
            .run(Path::new("in.wav"), Path::new("out.wav"))
            .unwrap();

        assert_eq!(*h.requested_rate.lock().unwrap(), Some(16000));
        let (duration, speakers) = h.seen.lock().unwrap().unwrap();
        assert_relative_eq!(duration, 20.0);
        assert_eq!(speakers, 2);
    }

    #[test]
    fn test_no_segments_leaves_audio_intact() {
        let mut h = harness(level(1.0), vec![], SelectionPolicy::Duration);
        let report = h
            .use_case
            .run(Path::new("in.wav"), Path::new("out.wav"))
            .unwrap();

        assert_eq!(report.interviewer, None);
        assert!(report.nothing_removed());
        assert_eq!(h.written.lock().unwrap().as_ref(), Some(&level(1.0)));
    }

    #[test]
    fn test_sole_speaker_empties_output_with_warning() {
        let segments = vec![seg(0.0, 20.0, "A")];
        let mut h = harness(level(1.0), segments, SelectionPolicy::Duration);
        let report = h
            .use_case
            .run(Path::new("in.wav"), Path::new("out.wav"))
            .unwrap();

        assert!(report.output_empty());
        assert!(report
            .warnings
            .iter()
            .any(|w| matches!(w, SelectionWarning::SoleSpeaker { .. })));
        assert_eq!(report.normalization, Some(Normalization::Silent));
        assert!(h.written.lock().unwrap().as_ref().unwrap().is_empty());
    }

    #[test]
    fn test_output_is_normalized() {
        let mut h = harness(level(0.5), interview(), SelectionPolicy::Duration);
        let report = h
            .use_case
            .run(Path::new("in.wav"), Path::new("out.wav"))
            .unwrap();

        let written = h.written.lock().unwrap();
        assert_eq!(written.as_ref().unwrap().peak(), 1.0);
        match report.normalization {
            Some(Normalization::Scaled { gain }) => assert_relative_eq!(gain, 2.0),
            other => panic!("unexpected normalization: {other:?}"),
        }
    }

    #[test]
    fn test_normalization_can_be_disabled() {
        let mut h = harness(level(0.5), interview(), SelectionPolicy::Duration);
        h.use_case = h.use_case.with_normalize(false);
        let report = h
            .use_case
            .run(Path::new("in.wav"), Path::new("out.wav"))
            .unwrap();

        assert_eq!(report.normalization, None);
        assert_eq!(h.written.lock().unwrap().as_ref().unwrap().peak(), 0.5);
    }

    #[test]
    fn test_first_policy_removes_opening_speaker() {
        let mut h = harness(level(1.0), interview(), SelectionPolicy::First);
        let report = h
            .use_case
            .run(Path::new("in.wav"), Path::new("out.wav"))
            .unwrap();

        assert_eq!(report.interviewer.as_deref(), Some("A"));
        assert_eq!(h.written.lock().unwrap().as_ref().unwrap().len(), 20);
    }

    #[test]
    fn test_diarizer_error_propagates_without_writing() {
        let written = Arc::new(Mutex::new(None));
        let mut use_case = RemoveInterviewerUseCase::new(
            Box::new(StubAudioReader {
                audio: level(1.0),
                requested_rate: Arc::new(Mutex::new(None)),
            }),
            Box::new(StubAudioWriter {
                written: written.clone(),
            }),
            Box::new(FailingDiarizer),
            InterviewerSelector::new(SelectionPolicy::Duration, None, 2).unwrap(),
        );

        let err = use_case
            .run(Path::new("in.wav"), Path::new("out.wav"))
            .unwrap_err();
        assert_eq!(err.to_string(), "model crashed");
        assert!(written.lock().unwrap().is_none());
    }

    #[test]
    fn test_decodes_at_native_rate_by_default() {
        let audio = AudioBuffer::mono(vec![1.0; 441], 44100);
        let mut h = harness(audio, vec![], SelectionPolicy::Duration);
        let report = h
            .use_case
            .run(Path::new("in.wav"), Path::new("out.wav"))
            .unwrap();

        assert_eq!(*h.requested_rate.lock().unwrap(), Some(44100));
        assert_relative_eq!(report.original_duration, 0.01);
    }

    #[test]
    fn test_removes_interviewer_from_44k_wav_file() {
        use crate::media::infrastructure::wav_audio_reader::WavAudioReader;
        use crate::media::infrastructure::wav_audio_writer::WavAudioWriter;

        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("interview.wav");
        let output = dir.path().join("clean.wav");
        WavAudioWriter::default()
            .write_audio(&input, &AudioBuffer::mono(vec![0.5; 88200], 44100))
            .unwrap();

        let mut use_case = RemoveInterviewerUseCase::new(
            Box::new(WavAudioReader),
            Box::new(WavAudioWriter::default()),
            Box::new(StubDiarizer {
                segments: vec![seg(0.0, 1.5, "A"), seg(1.5, 2.0, "B")],
                seen: Arc::new(Mutex::new(None)),
            }),
            InterviewerSelector::new(SelectionPolicy::Duration, None, 2).unwrap(),
        )
        .with_engine(ExcisionEngine::new(0.0));

        let report = use_case.run(&input, &output).unwrap();
        assert_eq!(report.interviewer.as_deref(), Some("B"));
        assert_relative_eq!(report.removed_seconds, 0.5);

        let written = WavAudioReader.read_audio(&output, 44100).unwrap();
        assert_eq!(written.len(), 66150);
        assert_eq!(written.peak(), 1.0);
    }

    #[test]
    fn test_time_to_remove_logged_before_cutting() {
        let infos = Arc::new(Mutex::new(Vec::new()));
        let segments = vec![seg(0.0, 10.0, "A"), seg(10.0, 11.0, "B"), seg(11.0, 12.5, "B")];
        let mut h = harness(level(1.0), segments, SelectionPolicy::Duration);
        h.use_case = h.use_case.with_logger(Box::new(RecordingLogger {
            infos: infos.clone(),
        }));
        h.use_case
            .run(Path::new("in.wav"), Path::new("out.wav"))
            .unwrap();

        let infos = infos.lock().unwrap();
        assert!(infos.contains(&"Total time to remove: 2.50s".to_string()));
        assert!(infos.contains(&"Merged into 1 ranges covering 2.50s".to_string()));
    }
}
