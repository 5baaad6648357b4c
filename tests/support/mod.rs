//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use voice_relay::convert::{ConversionError, FormatConverter};
use voice_relay::language::Language;
use voice_relay::scratch::ScratchDir;
use voice_relay::stt::{SpeechRecognizer, Transcription};
use voice_relay::translate::{TranslateError, TranslationChain, Translator};
use voice_relay::transport::{ChatId, ChatTransport, FileLocation, Keyboard, TransportError};
use voice_relay::{DirectionStore, VoicePipeline};

/// Fresh scratch directory under the system temp dir.
pub fn scratch_root() -> PathBuf {
    std::env::temp_dir().join(format!("voice-relay-it-{}", uuid::Uuid::new_v4()))
}

/// Number of regular files directly under `dir`; zero if it does not exist.
pub fn file_count(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| entries.filter_map(|e| e.ok()).filter(|e| e.path().is_file()).count())
        .unwrap_or(0)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sent {
    pub chat: ChatId,
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

/// Records replies and serves a canned voice payload.
#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<Sent>>,
    pub fail_download: bool,
    pub downloads: AtomicUsize,
}

impl RecordingTransport {
    pub fn failing_download() -> Self {
        Self {
            fail_download: true,
            ..Self::default()
        }
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|s| s.text.clone()).collect()
    }

    pub fn last(&self) -> Option<Sent> {
        self.sent.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn resolve_file(&self, file_id: &str) -> Result<FileLocation, TransportError> {
        Ok(FileLocation {
            file_id: file_id.to_string(),
            path: format!("voice/{}.oga", file_id),
            size: Some(4),
        })
    }

    async fn download_to(
        &self,
        _location: &FileLocation,
        destination: &Path,
    ) -> Result<(), TransportError> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        // Leave a partial file behind so cleanup on failure is observable.
        tokio::fs::write(destination, b"Ogg").await?;
        if self.fail_download {
            return Err(TransportError::Other("connection reset".into()));
        }
        tokio::fs::write(destination, b"OggS").await?;
        Ok(())
    }

    async fn send_message(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), TransportError> {
        self.sent.lock().unwrap().push(Sent {
            chat,
            text: text.to_string(),
            keyboard: keyboard.cloned(),
        });
        Ok(())
    }
}

/// Writes one second of 16 kHz mono silence, or fails like a broken decoder.
pub struct FakeConverter {
    pub fail: bool,
}

#[async_trait]
impl FormatConverter for FakeConverter {
    async fn convert(&self, input: &Path, output: &Path) -> Result<(), ConversionError> {
        assert!(input.exists(), "compressed input missing during conversion");
        if self.fail {
            // Partial output must still be cleaned up.
            tokio::fs::write(output, b"RIFF").await?;
            return Err(ConversionError::DecoderFailed {
                status: "exit status: 1".into(),
                stderr: "Invalid data found when processing input".into(),
            });
        }
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16_000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(output, spec)
            .map_err(|e| ConversionError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
        for _ in 0..16_000 {
            writer
                .write_sample(0i16)
                .map_err(|e| ConversionError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
        }
        writer
            .finalize()
            .map_err(|e| ConversionError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
        Ok(())
    }
}

/// Returns a fixed transcription and records what it was asked.
pub struct ScriptedRecognizer {
    pub outcome: Transcription,
    pub locales: Mutex<Vec<String>>,
    /// Files present in the scratch directory at recognition time.
    pub files_seen: Mutex<Vec<usize>>,
    pub scratch: PathBuf,
}

impl ScriptedRecognizer {
    pub fn new(outcome: Transcription, scratch: &Path) -> Self {
        Self {
            outcome,
            locales: Mutex::new(Vec::new()),
            files_seen: Mutex::new(Vec::new()),
            scratch: scratch.to_path_buf(),
        }
    }
}

#[async_trait]
impl SpeechRecognizer for ScriptedRecognizer {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn recognize(&self, waveform: &[u8], locale: &str) -> Transcription {
        assert!(waveform.starts_with(b"RIFF"));
        self.locales.lock().unwrap().push(locale.to_string());
        self.files_seen.lock().unwrap().push(file_count(&self.scratch));
        self.outcome.clone()
    }
}

pub enum Reply {
    Echo,
    Fixed(&'static str),
    Empty,
    Fail,
}

/// Translator with a canned behaviour and a call counter.
pub struct ScriptedTranslator {
    pub name: &'static str,
    pub reply: Reply,
    pub calls: AtomicUsize,
}

impl ScriptedTranslator {
    pub fn new(name: &'static str, reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            name,
            reply,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Translator for ScriptedTranslator {
    fn name(&self) -> &str {
        self.name
    }

    async fn translate(
        &self,
        text: &str,
        _source: Language,
        _target: Language,
    ) -> Result<String, TranslateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.reply {
            Reply::Echo => Ok(text.to_string()),
            Reply::Fixed(s) => Ok(s.to_string()),
            Reply::Empty => Ok("   ".to_string()),
            Reply::Fail => Err(TranslateError::Provider("quota exceeded".into())),
        }
    }
}

pub fn chain(providers: &[&Arc<ScriptedTranslator>]) -> TranslationChain {
    TranslationChain::new(
        providers
            .iter()
            .map(|p| Arc::clone(p) as Arc<dyn Translator>)
            .collect(),
    )
}

/// Everything a test needs to drive and inspect one pipeline.
pub struct Harness {
    pub pipeline: VoicePipeline,
    pub transport: Arc<RecordingTransport>,
    pub recognizer: Arc<ScriptedRecognizer>,
    pub directions: Arc<DirectionStore>,
    pub scratch: PathBuf,
}

impl Harness {
    pub fn new(
        transport: RecordingTransport,
        converter_fails: bool,
        transcription: Transcription,
        translator: TranslationChain,
    ) -> Self {
        let scratch = scratch_root();
        let transport = Arc::new(transport);
        let recognizer = Arc::new(ScriptedRecognizer::new(transcription, &scratch));
        let directions = Arc::new(DirectionStore::new());
        let pipeline = VoicePipeline::builder()
            .directions(directions.clone())
            .transport(transport.clone())
            .scratch(ScratchDir::new(scratch.clone()))
            .converter(Arc::new(FakeConverter {
                fail: converter_fails,
            }))
            .recognizer(recognizer.clone())
            .translator(translator)
            .build()
            .expect("pipeline");
        Self {
            pipeline,
            transport,
            recognizer,
            directions,
            scratch,
        }
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.scratch);
    }
}
