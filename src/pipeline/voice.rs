//! Voice message coordinator.

use super::stage::{AbortReason, PipelineOutcome, PipelineReport, PipelineStage};
use crate::acquisition::AudioAcquirer;
use crate::convert::{FormatConverter, WAVEFORM_EXTENSION};
use crate::direction::{DirectionStore, UserId};
use crate::language::Direction;
use crate::messages;
use crate::scratch::{ScratchDir, ScratchFile};
use crate::stt::{SpeechRecognizer, Transcription};
use crate::transport::{ChatId, ChatTransport, VoiceNote};
use crate::translate::{TranslationChain, TranslationOutcome};
use crate::{Error, ErrorContext, Result};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Early exit from the acquire → convert → recognize segment.
struct Abort {
    stage: PipelineStage,
    reason: AbortReason,
}

impl Abort {
    fn new(stage: PipelineStage, reason: AbortReason) -> Self {
        Self { stage, reason }
    }
}

/// Runs one voice message through acquisition, conversion, recognition and
/// translation, sending the replies along the way.
///
/// Stages run strictly in order. Both audio artifacts are released before
/// translation starts, on every path.
pub struct VoicePipeline {
    directions: Arc<DirectionStore>,
    transport: Arc<dyn ChatTransport>,
    acquirer: AudioAcquirer,
    scratch: ScratchDir,
    converter: Arc<dyn FormatConverter>,
    recognizer: Arc<dyn SpeechRecognizer>,
    translator: TranslationChain,
}

impl VoicePipeline {
    pub fn builder() -> VoicePipelineBuilder {
        VoicePipelineBuilder::new()
    }

    pub fn directions(&self) -> &Arc<DirectionStore> {
        &self.directions
    }

    pub fn transport(&self) -> &Arc<dyn ChatTransport> {
        &self.transport
    }

    pub fn translator(&self) -> &TranslationChain {
        &self.translator
    }

    pub fn scratch(&self) -> &ScratchDir {
        &self.scratch
    }

    pub async fn run(&self, user: UserId, chat: ChatId, voice: &VoiceNote) -> PipelineReport {
        let span = info_span!(
            "voice_pipeline",
            correlation_id = %Uuid::new_v4(),
            user_id = %user,
            file_id = %voice.file_id,
        );
        async {
            let started = Instant::now();
            let report = self.run_stages(user, chat, voice).await;
            match &report.outcome {
                PipelineOutcome::Completed(outcome) => info!(
                    translated = outcome.is_translated(),
                    duration_ms = started.elapsed().as_millis() as u64,
                    "voice message processed"
                ),
                PipelineOutcome::Aborted(reason) => info!(
                    stage = %report.stage,
                    reason = reason.label(),
                    duration_ms = started.elapsed().as_millis() as u64,
                    "voice message aborted"
                ),
            }
            report
        }
        .instrument(span)
        .await
    }

    async fn run_stages(&self, user: UserId, chat: ChatId, voice: &VoiceNote) -> PipelineReport {
        debug!(stage = %PipelineStage::AwaitingDirection, "entering stage");
        let Some(direction) = self.directions.get(user) else {
            let reason = AbortReason::NoDirection;
            self.reply(chat, &reason.user_message()).await;
            return PipelineReport::aborted(PipelineStage::AwaitingDirection, reason);
        };
        self.reply(chat, messages::VOICE_ACCEPTED).await;

        let transcript = match self.transcribe(voice, direction).await {
            Ok(text) => text,
            Err(abort) => {
                self.reply(chat, &abort.reason.user_message()).await;
                return PipelineReport::aborted(abort.stage, abort.reason);
            }
        };
        self.reply(chat, &messages::recognized_text(&transcript)).await;

        debug!(stage = %PipelineStage::Translating, "entering stage");
        let outcome = self.translator.translate(&transcript, direction).await;

        debug!(stage = %PipelineStage::Responding, "entering stage");
        self.reply(chat, &compose_translation_reply(&outcome)).await;

        PipelineReport {
            stage: PipelineStage::Done,
            transcript: Some(transcript),
            outcome: PipelineOutcome::Completed(outcome),
        }
    }

    /// Acquire, convert and recognize. Audio artifacts are released before
    /// this returns, whatever the result.
    async fn transcribe(&self, voice: &VoiceNote, direction: Direction) -> std::result::Result<String, Abort> {
        debug!(stage = %PipelineStage::Acquiring, "entering stage");
        let mut compressed = self.acquirer.acquire(voice).await.map_err(|e| {
            error!(error = %e, "voice acquisition failed");
            Abort::new(PipelineStage::Acquiring, AbortReason::Acquisition(e.to_string()))
        })?;
        let mut waveform = self.scratch.claim(&voice.file_id, WAVEFORM_EXTENSION);

        let result = self
            .convert_and_recognize(&compressed, &waveform, direction)
            .await;

        release(&mut compressed).await;
        release(&mut waveform).await;
        result
    }

    async fn convert_and_recognize(
        &self,
        compressed: &ScratchFile,
        waveform: &ScratchFile,
        direction: Direction,
    ) -> std::result::Result<String, Abort> {
        debug!(stage = %PipelineStage::Converting, "entering stage");
        self.converter
            .convert(compressed.path(), waveform.path())
            .await
            .map_err(|e| {
                error!(error = %e, "audio conversion failed");
                Abort::new(PipelineStage::Converting, AbortReason::Conversion(e.to_string()))
            })?;
        let audio = tokio::fs::read(waveform.path()).await.map_err(|e| {
            error!(error = %e, "converted audio unreadable");
            Abort::new(PipelineStage::Converting, AbortReason::Conversion(e.to_string()))
        })?;

        debug!(stage = %PipelineStage::Recognizing, "entering stage");
        let locale = direction.source.locale();
        let transcription = match self.recognizer.recognize(&audio, locale).await {
            Transcription::Recognized(text) => Transcription::from_text(text),
            other => other,
        };
        debug!(outcome = transcription.outcome_label(), "recognition finished");
        match transcription {
            Transcription::Recognized(text) => {
                info!(recognizer = self.recognizer.name(), locale, chars = text.len(), "speech recognized");
                Ok(text)
            }
            Transcription::Unintelligible => {
                info!(recognizer = self.recognizer.name(), locale, "no intelligible speech");
                Err(Abort::new(PipelineStage::Recognizing, AbortReason::Unintelligible))
            }
            Transcription::ServiceError(detail) => {
                error!(recognizer = self.recognizer.name(), locale, error = %detail, "speech service failed");
                Err(Abort::new(PipelineStage::Recognizing, AbortReason::Recognition(detail)))
            }
        }
    }

    async fn reply(&self, chat: ChatId, text: &str) {
        if let Err(e) = self.transport.send_message(chat, text, None).await {
            warn!(chat_id = %chat, error = %e, "failed to send reply");
        }
    }
}

/// Final reply once translation has been attempted.
pub fn compose_translation_reply(outcome: &TranslationOutcome) -> String {
    match outcome {
        TranslationOutcome::Translated { text, provider } => messages::translation(provider, text),
        TranslationOutcome::Unavailable => messages::TRANSLATION_UNAVAILABLE.to_string(),
    }
}

async fn release(file: &mut ScratchFile) {
    if let Err(e) = file.release().await {
        warn!(path = %file.path().display(), error = %e, "failed to delete audio artifact");
    }
}

pub struct VoicePipelineBuilder {
    directions: Option<Arc<DirectionStore>>,
    transport: Option<Arc<dyn ChatTransport>>,
    scratch: Option<ScratchDir>,
    converter: Option<Arc<dyn FormatConverter>>,
    recognizer: Option<Arc<dyn SpeechRecognizer>>,
    translator: Option<TranslationChain>,
}

impl VoicePipelineBuilder {
    pub fn new() -> Self {
        Self {
            directions: None,
            transport: None,
            scratch: None,
            converter: None,
            recognizer: None,
            translator: None,
        }
    }
    pub fn directions(mut self, directions: Arc<DirectionStore>) -> Self {
        self.directions = Some(directions);
        self
    }
    pub fn transport(mut self, transport: Arc<dyn ChatTransport>) -> Self {
        self.transport = Some(transport);
        self
    }
    pub fn scratch(mut self, scratch: ScratchDir) -> Self {
        self.scratch = Some(scratch);
        self
    }
    pub fn converter(mut self, converter: Arc<dyn FormatConverter>) -> Self {
        self.converter = Some(converter);
        self
    }
    pub fn recognizer(mut self, recognizer: Arc<dyn SpeechRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }
    pub fn translator(mut self, translator: TranslationChain) -> Self {
        self.translator = Some(translator);
        self
    }

    pub fn build(self) -> Result<VoicePipeline> {
        let missing = |part: &str| {
            Error::configuration_with_context(
                format!("Voice pipeline requires a {}", part),
                ErrorContext::new().with_source("voice_pipeline_builder"),
            )
        };
        let transport = self.transport.ok_or_else(|| missing("chat transport"))?;
        let scratch = self.scratch.ok_or_else(|| missing("scratch directory"))?;
        let converter = self.converter.ok_or_else(|| missing("format converter"))?;
        let recognizer = self.recognizer.ok_or_else(|| missing("speech recognizer"))?;
        let translator = self.translator.ok_or_else(|| missing("translation chain"))?;
        if translator.is_empty() {
            return Err(missing("non-empty translation chain"));
        }
        Ok(VoicePipeline {
            directions: self.directions.unwrap_or_default(),
            acquirer: AudioAcquirer::new(transport.clone(), scratch.clone()),
            transport,
            scratch,
            converter,
            recognizer,
            translator,
        })
    }
}

impl Default for VoicePipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
