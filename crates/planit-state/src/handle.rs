//! The active provider, swappable at runtime.

use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::watch;

use crate::StateProvider;

/// Shared slot holding the provider every caller should use.
///
/// Replacing the provider bumps a generation counter that subscribers can
/// watch to reload their data.
pub struct StateHandle {
    provider: RwLock<Arc<dyn StateProvider>>,
    generation: watch::Sender<u64>,
}

impl StateHandle {
    #[must_use]
    pub fn new(provider: Arc<dyn StateProvider>) -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            provider: RwLock::new(provider),
            generation,
        }
    }

    /// The provider in use right now.
    #[must_use]
    pub fn provider(&self) -> Arc<dyn StateProvider> {
        Arc::clone(&self.provider.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Swap in `provider` and notify subscribers.
    pub fn replace(&self, provider: Arc<dyn StateProvider>) {
        *self.provider.write().unwrap_or_else(PoisonError::into_inner) = provider;
        self.generation.send_modify(|generation| *generation += 1);
        tracing::debug!("state provider replaced");
    }

    /// Receiver that changes whenever the provider is replaced.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.generation.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStateProvider;
    use crate::CourseProvider;
    use planit_core::entities::Course;

    #[tokio::test]
    async fn replace_switches_provider_and_notifies() {
        let handle = StateHandle::new(Arc::new(MemoryStateProvider::new()));
        let mut rx = handle.subscribe();

        let seeded = MemoryStateProvider::new();
        seeded
            .set_courses(&[Course {
                code: "104031".into(),
                ..Course::default()
            }])
            .await
            .unwrap();
        assert_eq!(handle.provider().course_count().await.unwrap(), 0);

        handle.replace(Arc::new(seeded));
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), 1);
        assert_eq!(handle.provider().course_count().await.unwrap(), 1);
    }
}
