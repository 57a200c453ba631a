//! BoxCompletionClient -- object-safe dynamic dispatch wrapper for CompletionClient.
//!
//! 1. Define an object-safe `CompletionClientDyn` trait with boxed futures
//! 2. Blanket-impl `CompletionClientDyn` for all `T: CompletionClient`
//! 3. `BoxCompletionClient` wraps `Box<dyn CompletionClientDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use chatrelay_types::error::CompletionError;

use super::client::CompletionClient;

/// Object-safe version of [`CompletionClient`] with boxed futures.
///
/// Method names differ from [`CompletionClient`] so that `BoxCompletionClient`,
/// which implements both traits, has no ambiguous calls.
pub trait CompletionClientDyn: Send + Sync {
    fn name_dyn(&self) -> &str;

    fn model_dyn(&self) -> &str;

    fn complete_boxed<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, CompletionError>> + Send + 'a>>;
}

impl<T: CompletionClient> CompletionClientDyn for T {
    fn name_dyn(&self) -> &str {
        self.name()
    }

    fn model_dyn(&self) -> &str {
        self.model()
    }

    fn complete_boxed<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, CompletionError>> + Send + 'a>> {
        Box::pin(self.complete(prompt))
    }
}

/// Type-erased completion client for runtime selection.
///
/// Since `CompletionClient` uses RPITIT, it cannot be used as a trait object
/// directly. `BoxCompletionClient` is itself a `CompletionClient`, so the relay
/// can be pinned to it while tests swap in a double.
pub struct BoxCompletionClient {
    inner: Box<dyn CompletionClientDyn>,
}

impl BoxCompletionClient {
    /// Wrap a concrete `CompletionClient` in a type-erased box.
    pub fn new<T: CompletionClient + 'static>(client: T) -> Self {
        Self {
            inner: Box::new(client),
        }
    }
}

impl CompletionClient for BoxCompletionClient {
    fn name(&self) -> &str {
        self.inner.name_dyn()
    }

    fn model(&self) -> &str {
        self.inner.model_dyn()
    }

    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.inner.complete_boxed(prompt).await
    }
}
