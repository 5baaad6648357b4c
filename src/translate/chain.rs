//! Ordered provider fallback.

use super::Translator;
use crate::language::Direction;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Result of running text through the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationOutcome {
    Translated { text: String, provider: String },
    /// Every provider failed or returned nothing.
    Unavailable,
}

impl TranslationOutcome {
    pub fn is_translated(&self) -> bool {
        matches!(self, TranslationOutcome::Translated { .. })
    }
}

/// Tries providers strictly in priority order; the first non-empty answer wins.
///
/// There is no retry and no comparison between providers. A provider that
/// does not support the pair is treated like one that is down.
#[derive(Clone)]
pub struct TranslationChain {
    providers: Vec<Arc<dyn Translator>>,
}

impl TranslationChain {
    pub fn new(providers: Vec<Arc<dyn Translator>>) -> Self {
        Self { providers }
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub async fn translate(&self, text: &str, direction: Direction) -> TranslationOutcome {
        for provider in &self.providers {
            let started = Instant::now();
            match provider
                .translate(text, direction.source, direction.target)
                .await
            {
                Ok(translated) if !translated.trim().is_empty() => {
                    info!(
                        provider = provider.name(),
                        direction = %direction,
                        duration_ms = started.elapsed().as_millis() as u64,
                        "translation succeeded"
                    );
                    return TranslationOutcome::Translated {
                        text: translated.trim().to_string(),
                        provider: provider.name().to_string(),
                    };
                }
                Ok(_) => {
                    debug!(provider = provider.name(), direction = %direction, "provider returned empty translation");
                }
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        direction = %direction,
                        error = %e,
                        "translator failed, trying next one"
                    );
                }
            }
        }
        warn!(direction = %direction, "all translation providers exhausted");
        TranslationOutcome::Unavailable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::{Direction, Language};
    use crate::translate::TranslateError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Behaviour {
        Fail,
        Empty,
        Return(&'static str),
    }

    struct Scripted {
        name: &'static str,
        behaviour: Behaviour,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn new(name: &'static str, behaviour: Behaviour) -> Arc<Self> {
            Arc::new(Self {
                name,
                behaviour,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Translator for Scripted {
        fn name(&self) -> &str {
            self.name
        }

        async fn translate(
            &self,
            _text: &str,
            _source: Language,
            _target: Language,
        ) -> Result<String, TranslateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.behaviour {
                Behaviour::Fail => Err(TranslateError::Provider("boom".into())),
                Behaviour::Empty => Ok(String::new()),
                Behaviour::Return(s) => Ok(s.to_string()),
            }
        }
    }

    fn chain_of(providers: &[&Arc<Scripted>]) -> TranslationChain {
        TranslationChain::new(
            providers
                .iter()
                .map(|p| Arc::clone(p) as Arc<dyn Translator>)
                .collect(),
        )
    }

    const EN_RU: Direction = Direction::new(Language::En, Language::Ru);

    #[tokio::test]
    async fn falls_through_failure_and_empty_to_first_success() {
        let a = Scripted::new("A", Behaviour::Fail);
        let b = Scripted::new("B", Behaviour::Empty);
        let c = Scripted::new("C", Behaviour::Return("bonjour"));
        let d = Scripted::new("D", Behaviour::Return("never"));
        let chain = chain_of(&[&a, &b, &c, &d]);

        let outcome = chain.translate("hello", EN_RU).await;

        assert_eq!(
            outcome,
            TranslationOutcome::Translated {
                text: "bonjour".into(),
                provider: "C".into()
            }
        );
        assert_eq!((a.calls(), b.calls(), c.calls(), d.calls()), (1, 1, 1, 0));
    }

    #[tokio::test]
    async fn first_provider_success_short_circuits() {
        let a = Scripted::new("A", Behaviour::Return("privet"));
        let b = Scripted::new("B", Behaviour::Return("zdravstvuy"));
        let chain = chain_of(&[&a, &b]);

        let outcome = chain.translate("hi", EN_RU).await;
        assert!(matches!(outcome, TranslationOutcome::Translated { ref provider, .. } if provider == "A"));
        assert_eq!(b.calls(), 0);
    }

    #[tokio::test]
    async fn exhausted_chain_is_unavailable() {
        let a = Scripted::new("A", Behaviour::Fail);
        let b = Scripted::new("B", Behaviour::Return("   "));
        let chain = chain_of(&[&a, &b]);

        assert_eq!(chain.translate("hi", EN_RU).await, TranslationOutcome::Unavailable);
        assert_eq!((a.calls(), b.calls()), (1, 1));
    }

    #[tokio::test]
    async fn empty_chain_is_unavailable() {
        let chain = TranslationChain::new(Vec::new());
        assert!(chain.is_empty());
        assert_eq!(chain.translate("hi", EN_RU).await, TranslationOutcome::Unavailable);
    }
}
