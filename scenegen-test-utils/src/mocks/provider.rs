//! Mock implementation of the image provider for testing

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use scenegen_core::error::GenerationError;
use scenegen_core::generation::{GeneratedImage, ImageProvider};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Build a `data:image/png;base64,...` URI from raw bytes
pub fn png_data_uri(bytes: &[u8]) -> String {
    format!("data:image/png;base64,{}", BASE64.encode(bytes))
}

/// Mock image provider with configurable behavior
///
/// Counts invocations so tests can assert that the cache-aside service does
/// not re-invoke the provider on a hit, and supports an artificial delay for
/// exercising concurrent callers.
///
/// # Examples
///
/// ```rust
/// use scenegen_test_utils::MockImageProvider;
/// use scenegen_core::generation::ImageProvider;
///
/// # async fn example() {
/// let provider = MockImageProvider::new();
/// provider.succeed_with_png(b"fake image bytes");
///
/// let image = provider.generate("a spooky playground", 1024, 1792).await.unwrap();
/// assert!(image.url.starts_with("data:image/png;base64,"));
/// assert_eq!(provider.call_count(), 1);
/// # }
/// ```
pub struct MockImageProvider {
    behavior: Mutex<MockBehavior>,
    calls: AtomicUsize,
}

#[derive(Debug, Clone)]
struct MockBehavior {
    result: MockResult,
    delay: Duration,
}

#[derive(Debug, Clone)]
enum MockResult {
    Success { id: String, url: String },
    Failure(MockFailure),
}

#[derive(Debug, Clone)]
enum MockFailure {
    Auth,
    RateLimited,
    Provider { status: u16, message: String },
    EmptyResult,
}

impl From<MockFailure> for GenerationError {
    fn from(failure: MockFailure) -> Self {
        match failure {
            MockFailure::Auth => Self::Auth,
            MockFailure::RateLimited => Self::RateLimited,
            MockFailure::Provider { status, message } => Self::Provider { status, message },
            MockFailure::EmptyResult => Self::EmptyResult,
        }
    }
}

impl MockImageProvider {
    /// Create a mock that succeeds with a small placeholder payload
    pub fn new() -> Self {
        Self {
            behavior: Mutex::new(MockBehavior {
                result: MockResult::Success {
                    id: "mock-image".to_string(),
                    url: png_data_uri(b"mock image bytes"),
                },
                delay: Duration::ZERO,
            }),
            calls: AtomicUsize::new(0),
        }
    }

    /// Succeed with a data URI built from the given bytes
    pub fn succeed_with_png(&self, bytes: &[u8]) {
        self.set_result(MockResult::Success {
            id: "mock-image".to_string(),
            url: png_data_uri(bytes),
        });
    }

    /// Succeed with an arbitrary id and url (may be a non-embedded url to
    /// force cache write failures)
    pub fn succeed_with_content(&self, id: &str, url: &str) {
        self.set_result(MockResult::Success {
            id: id.to_string(),
            url: url.to_string(),
        });
    }

    /// Fail every generation with an auth error
    pub fn fail_auth(&self) {
        self.set_result(MockResult::Failure(MockFailure::Auth));
    }

    /// Fail every generation with a rate limit error
    pub fn fail_rate_limited(&self) {
        self.set_result(MockResult::Failure(MockFailure::RateLimited));
    }

    /// Fail every generation with a provider error
    pub fn fail_provider(&self, status: u16, message: &str) {
        self.set_result(MockResult::Failure(MockFailure::Provider {
            status,
            message: message.to_string(),
        }));
    }

    /// Fail every generation with an empty result
    pub fn fail_empty(&self) {
        self.set_result(MockResult::Failure(MockFailure::EmptyResult));
    }

    /// Delay each generation, to widen race windows in concurrency tests
    pub fn set_delay(&self, delay: Duration) {
        self.behavior.lock().unwrap().delay = delay;
    }

    /// Number of `generate` invocations so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn set_result(&self, result: MockResult) {
        self.behavior.lock().unwrap().result = result;
    }
}

impl Default for MockImageProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageProvider for MockImageProvider {
    async fn generate(
        &self,
        _query: &str,
        width: u32,
        height: u32,
    ) -> Result<GeneratedImage, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let behavior = self.behavior.lock().unwrap().clone();
        if behavior.delay > Duration::ZERO {
            tokio::time::sleep(behavior.delay).await;
        }

        match behavior.result {
            MockResult::Success { id, url } => Ok(GeneratedImage {
                id,
                url,
                width,
                height,
            }),
            MockResult::Failure(failure) => Err(failure.into()),
        }
    }
}
