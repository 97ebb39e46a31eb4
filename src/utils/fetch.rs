//! Byte fetching capability used by bootstrap and `wget`.
//!
//! [`Fetcher`] is the seam between the shell and the network. The shell
//! suspends once per call; nothing else touches the session meanwhile.
//! [`MemoryFetcher`] serves bytes from a map, and on wasm32 [`WebFetcher`]
//! goes through the browser Fetch API with a timeout race.

use std::collections::HashMap;

use crate::core::error::FetchError;

/// Source of remote bytes.
#[allow(async_fn_in_trait)]
pub trait Fetcher {
    /// Fetch the resource at `url`, resolving to its body bytes.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

// =============================================================================
// In-memory fetcher
// =============================================================================

/// Fetcher answering from an in-memory url → bytes map.
#[derive(Clone, Debug, Default)]
pub struct MemoryFetcher {
    resources: HashMap<String, Vec<u8>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration of a resource.
    pub fn with(mut self, url: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(url, bytes);
        self
    }

    pub fn insert(&mut self, url: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.resources.insert(url.into(), bytes.into());
    }
}

impl Fetcher for MemoryFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.resources
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(url.to_string()))
    }
}

// =============================================================================
// Browser fetcher
// =============================================================================

#[cfg(target_arch = "wasm32")]
pub use web::WebFetcher;

#[cfg(target_arch = "wasm32")]
mod web {
    use js_sys::{Array, Promise, Uint8Array};
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, RequestMode, Response};

    use super::Fetcher;
    use crate::config::{FETCH_TIMEOUT_MS, WGET_PROXY_ENDPOINT};
    use crate::core::error::FetchError;

    /// Result of a promise race with timeout.
    enum RaceResult {
        Completed(JsValue),
        TimedOut,
        Error(String),
    }

    /// Race a promise against a timeout using `Promise.race`.
    async fn race_with_timeout(promise: Promise, timeout_ms: i32) -> RaceResult {
        let Some(window) = web_sys::window() else {
            return RaceResult::Error("Window not available".to_string());
        };

        // Resolves to undefined when the timer fires
        let timeout_promise = Promise::new(&mut |resolve, _| {
            let _ =
                window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, timeout_ms);
        });

        let race_array = Array::new();
        race_array.push(&promise);
        race_array.push(&timeout_promise);

        match JsFuture::from(Promise::race(&race_array)).await {
            Ok(result) if result.is_undefined() => RaceResult::TimedOut,
            Ok(result) => RaceResult::Completed(result),
            Err(e) => RaceResult::Error(e.as_string().unwrap_or_else(|| "Unknown error".to_string())),
        }
    }

    /// Fetcher backed by the browser Fetch API.
    ///
    /// Absolute `http(s)` URLs are routed through the backend's `wget` proxy
    /// to sidestep CORS; relative paths (bootstrap assets) are fetched as-is.
    #[derive(Clone, Debug)]
    pub struct WebFetcher {
        proxy: Option<String>,
    }

    impl WebFetcher {
        /// Fetcher using the default proxy endpoint.
        pub fn new() -> Self {
            Self {
                proxy: Some(WGET_PROXY_ENDPOINT.to_string()),
            }
        }

        /// Fetcher that requests every URL directly.
        pub fn direct() -> Self {
            Self { proxy: None }
        }

        fn request_url(&self, url: &str) -> String {
            let absolute = url.starts_with("http://") || url.starts_with("https://");
            match &self.proxy {
                Some(endpoint) if absolute => format!(
                    "{}?url={}",
                    endpoint,
                    String::from(js_sys::encode_uri_component(url))
                ),
                _ => url.to_string(),
            }
        }
    }

    impl Default for WebFetcher {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Fetcher for WebFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            let window = web_sys::window().ok_or(FetchError::NoWindow)?;

            let opts = RequestInit::new();
            opts.set_method("GET");
            opts.set_mode(RequestMode::Cors);

            let request = Request::new_with_str_and_init(&self.request_url(url), &opts)
                .map_err(|_| FetchError::RequestCreationFailed)?;

            match race_with_timeout(window.fetch_with_request(&request), FETCH_TIMEOUT_MS).await {
                RaceResult::TimedOut => Err(FetchError::Timeout),
                RaceResult::Error(msg) => Err(FetchError::NetworkError(msg)),
                RaceResult::Completed(result) => {
                    let resp: Response = result
                        .dyn_into()
                        .map_err(|_| FetchError::ResponseReadFailed)?;

                    if !resp.ok() {
                        return Err(FetchError::HttpError(resp.status()));
                    }

                    let buffer = JsFuture::from(
                        resp.array_buffer()
                            .map_err(|_| FetchError::ResponseReadFailed)?,
                    )
                    .await
                    .map_err(|_| FetchError::ResponseReadFailed)?;

                    Ok(Uint8Array::new(&buffer).to_vec())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_fetcher() {
        let fetcher = MemoryFetcher::new().with("motd.txt", "welcome\n");
        assert_eq!(fetcher.fetch("motd.txt").await.unwrap(), b"welcome\n");
        assert_eq!(
            fetcher.fetch("missing").await,
            Err(FetchError::NotFound("missing".to_string()))
        );
    }
}
