//! Pipeline states and terminal outcomes.

use crate::messages;
use crate::translate::TranslationOutcome;
use std::fmt;

/// Where a voice message is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    AwaitingDirection,
    Acquiring,
    Converting,
    Recognizing,
    Translating,
    Responding,
    Done,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::AwaitingDirection => "awaiting_direction",
            PipelineStage::Acquiring => "acquiring",
            PipelineStage::Converting => "converting",
            PipelineStage::Recognizing => "recognizing",
            PipelineStage::Translating => "translating",
            PipelineStage::Responding => "responding",
            PipelineStage::Done => "done",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a voice message stopped before a translation was attempted.
///
/// `Unintelligible` is a normal outcome rather than a failure, but it ends
/// the pipeline the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    NoDirection,
    Acquisition(String),
    Conversion(String),
    Unintelligible,
    Recognition(String),
}

impl AbortReason {
    /// The single final reply for this outcome.
    pub fn user_message(&self) -> String {
        match self {
            AbortReason::NoDirection => messages::SELECT_DIRECTION_FOR_VOICE.to_string(),
            AbortReason::Acquisition(_) => messages::ACQUISITION_FAILED.to_string(),
            AbortReason::Conversion(_) => messages::CONVERSION_FAILED.to_string(),
            AbortReason::Unintelligible => messages::SPEECH_UNINTELLIGIBLE.to_string(),
            AbortReason::Recognition(detail) => messages::recognition_failed(detail),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AbortReason::NoDirection => "no_direction",
            AbortReason::Acquisition(_) => "acquisition_failure",
            AbortReason::Conversion(_) => "conversion_failure",
            AbortReason::Unintelligible => "unintelligible",
            AbortReason::Recognition(_) => "recognition_service_error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Translation was attempted; the outcome may still be `Unavailable`.
    Completed(TranslationOutcome),
    Aborted(AbortReason),
}

/// Summary of one pipeline invocation, mostly for logs and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    /// Last stage entered.
    pub stage: PipelineStage,
    pub transcript: Option<String>,
    pub outcome: PipelineOutcome,
}

impl PipelineReport {
    pub(crate) fn aborted(stage: PipelineStage, reason: AbortReason) -> Self {
        Self {
            stage,
            transcript: None,
            outcome: PipelineOutcome::Aborted(reason),
        }
    }

    pub fn abort_reason(&self) -> Option<&AbortReason> {
        match &self.outcome {
            PipelineOutcome::Aborted(reason) => Some(reason),
            PipelineOutcome::Completed(_) => None,
        }
    }

    pub fn translation(&self) -> Option<&TranslationOutcome> {
        match &self.outcome {
            PipelineOutcome::Completed(outcome) => Some(outcome),
            PipelineOutcome::Aborted(_) => None,
        }
    }
}
