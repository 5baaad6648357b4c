//! 语音处理流水线：获取 → 转码 → 识别 → 翻译 → 回复，并保证临时文件清理。
//!
//! # Voice Pipeline
//!
//! ```text
//! AwaitingDirection → Acquiring → Converting → Recognizing → Translating → Responding → Done
//!        │                │            │             │
//!        └────────────────┴────────────┴─────────────┴──→ Aborted(reason)
//! ```
//!
//! Each invocation sends exactly one final reply. Two intermediate replies may
//! precede it: the "accepted" notice once the direction check passes, and the
//! recognised transcript before translation begins.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`VoicePipeline`] | Stage coordinator |
//! | [`VoicePipelineBuilder`] | Wires collaborators into a pipeline |
//! | [`PipelineStage`] | Lifecycle states |
//! | [`AbortReason`] | Terminal outcomes that stop before translation |
//! | [`PipelineReport`] | What happened, for logs and tests |

mod stage;
mod voice;

pub use stage::{AbortReason, PipelineOutcome, PipelineReport, PipelineStage};
pub use voice::{compose_translation_reply, VoicePipeline, VoicePipelineBuilder};
