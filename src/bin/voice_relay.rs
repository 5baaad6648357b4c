//! voice-relay - Telegram bot that transcribes and translates voice messages.
//!
//! Configuration comes from the environment (see `RelayConfig`); the only
//! required values are `TELEGRAM_BOT_TOKEN` and the speech provider key.

use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use voice_relay::config::RelayConfig;
use voice_relay::convert::{check_ffmpeg_binary, FfmpegConverter};
use voice_relay::scratch::ScratchDir;
use voice_relay::stt::recognizer_from_config;
use voice_relay::telegram::{TelegramTransport, UpdatePoller};
use voice_relay::translate::providers_from_names;
use voice_relay::{Relay, TranslationChain, VoicePipeline};

const POLL_RETRY_DELAY: Duration = Duration::from_secs(3);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = RelayConfig::from_env().context("failed to load configuration")?;

    if let Err(e) = check_ffmpeg_binary(&config.ffmpeg_path).await {
        warn!(ffmpeg = %config.ffmpeg_path, error = %e, "ffmpeg unavailable; voice messages will fail to convert");
    }

    let transport = Arc::new(TelegramTransport::new(
        config.token(),
        config.telegram_api_url.as_str(),
        config.http_timeout(),
    )?);
    let http = reqwest::Client::builder()
        .timeout(config.http_timeout())
        .build()
        .context("failed to create translation HTTP client")?;
    let translator = TranslationChain::new(providers_from_names(&config.translators, http)?);
    let recognizer = recognizer_from_config(&config)?;

    let pipeline = VoicePipeline::builder()
        .transport(transport.clone())
        .scratch(ScratchDir::new(config.scratch_dir.clone()))
        .converter(Arc::new(FfmpegConverter::new(config.ffmpeg_path.clone())))
        .recognizer(recognizer.clone())
        .translator(translator.clone())
        .build()?;
    let relay = Relay::new(pipeline);

    info!(
        recognizer = recognizer.name(),
        translators = ?translator.provider_names(),
        scratch_dir = %config.scratch_dir.display(),
        "voice relay started"
    );

    let mut poller = UpdatePoller::new(transport, config.poll_timeout());
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown requested");
                break;
            }
            batch = poller.next_batch() => match batch {
                Ok(messages) => {
                    for message in messages {
                        let relay = relay.clone();
                        tokio::spawn(async move {
                            relay.handle(message).await;
                        });
                    }
                }
                Err(e) => {
                    error!(error = %e, "polling for updates failed");
                    tokio::time::sleep(POLL_RETRY_DELAY).await;
                }
            }
        }
    }

    Ok(())
}
