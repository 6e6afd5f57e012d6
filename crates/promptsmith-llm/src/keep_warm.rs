//! Detached model preloading.
//!
//! Before a generation the refiner asks the server to load the model so
//! the real call does not pay the cold-start cost. The preload is fire and
//! forget: it runs on its own task, gives up after [`KEEP_WARM_TIMEOUT`],
//! and its outcome only ever reaches the debug log.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::backend::GenerationBackend;

/// Upper bound on how long a preload may run.
pub const KEEP_WARM_TIMEOUT: Duration = Duration::from_secs(2);

/// Spawn a best-effort preload of `model`.
///
/// Must be called from within a tokio runtime. The returned handle may be
/// dropped; the task keeps running detached.
pub fn spawn_keep_warm(
    backend: Arc<dyn GenerationBackend>,
    model: String,
    keep_alive: String,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::time::timeout(KEEP_WARM_TIMEOUT, backend.preload(&model, &keep_alive)).await {
            Ok(Ok(())) => debug!(model = %model, "keep-warm preload finished"),
            Ok(Err(e)) => debug!(model = %model, error = %e, "keep-warm preload failed"),
            Err(_) => debug!(model = %model, "keep-warm preload timed out"),
        }
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tokio::sync::mpsc;

    use super::*;
    use crate::error::{ProviderError, Result};
    use crate::types::{ChatRequest, GenerateRequest, StreamChunk};

    struct PreloadProbe {
        calls: Mutex<Vec<(String, String)>>,
        delay: Duration,
        fail: bool,
    }

    impl PreloadProbe {
        fn new(delay: Duration, fail: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                delay,
                fail,
            })
        }
    }

    #[async_trait]
    impl GenerationBackend for PreloadProbe {
        fn name(&self) -> &str {
            "probe"
        }
        fn base_url(&self) -> &str {
            "http://probe"
        }
        async fn generate(&self, _req: &GenerateRequest) -> Result<String> {
            unreachable!("keep-warm never generates")
        }
        async fn generate_stream(
            &self,
            _req: &GenerateRequest,
            _tx: mpsc::Sender<StreamChunk>,
        ) -> Result<()> {
            unreachable!("keep-warm never streams")
        }
        async fn chat_stream(&self, _req: &ChatRequest, _tx: mpsc::Sender<StreamChunk>) -> Result<()> {
            unreachable!("keep-warm never chats")
        }
        async fn preload(&self, model: &str, keep_alive: &str) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push((model.to_string(), keep_alive.to_string()));
            tokio::time::sleep(self.delay).await;
            if self.fail {
                Err(ProviderError::RequestFailed("connection refused".into()))
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn preload_receives_model_and_keep_alive() {
        let probe = PreloadProbe::new(Duration::ZERO, false);
        spawn_keep_warm(probe.clone(), "qwen2.5:7b".into(), "30m".into())
            .await
            .unwrap();
        let calls = probe.calls.lock().unwrap();
        assert_eq!(calls.as_slice(), &[("qwen2.5:7b".to_string(), "30m".to_string())]);
    }

    #[tokio::test]
    async fn failure_is_swallowed() {
        let probe = PreloadProbe::new(Duration::ZERO, true);
        let handle = spawn_keep_warm(probe, "m".into(), "30m".into());
        assert!(handle.await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_preload_is_abandoned_after_timeout() {
        let probe = PreloadProbe::new(Duration::from_secs(60), false);
        let started = tokio::time::Instant::now();
        spawn_keep_warm(probe, "m".into(), "30m".into())
            .await
            .unwrap();
        assert!(started.elapsed() >= KEEP_WARM_TIMEOUT);
        assert!(started.elapsed() < Duration::from_secs(60));
    }
}
