//! Fetches a voice payload from the chat transport into the scratch directory.

use crate::scratch::{ScratchDir, ScratchFile};
use crate::transport::{ChatTransport, TransportError, VoiceNote};
use std::sync::Arc;
use tracing::debug;

/// Container extension of voice notes as received.
pub const COMPRESSED_EXTENSION: &str = "ogg";

pub struct AudioAcquirer {
    transport: Arc<dyn ChatTransport>,
    scratch: ScratchDir,
}

impl AudioAcquirer {
    pub fn new(transport: Arc<dyn ChatTransport>, scratch: ScratchDir) -> Self {
        Self { transport, scratch }
    }

    /// Downloads `voice` to `<scratch>/<file_id>.ogg`.
    ///
    /// The returned guard owns the file. On error any partially written file
    /// has already been removed by the guard going out of scope.
    pub async fn acquire(&self, voice: &VoiceNote) -> Result<ScratchFile, TransportError> {
        self.scratch.ensure().await?;
        let location = self.transport.resolve_file(&voice.file_id).await?;

        let file = self.scratch.claim(&voice.file_id, COMPRESSED_EXTENSION);
        self.transport.download_to(&location, file.path()).await?;
        debug!(
            file_id = %voice.file_id,
            path = %file.path().display(),
            remote = %location.path,
            "voice payload acquired"
        );
        Ok(file)
    }
}
