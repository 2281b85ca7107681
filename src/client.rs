//! Blocking HTTP client with a fixed delay between requests

use anyhow::{bail, Context, Result};
use std::cell::Cell;
use std::thread;
use std::time::Duration;

/// Pause between successive requests to the search site.
pub const REQUEST_DELAY: Duration = Duration::from_secs(2);

/// Issues one GET and returns the body. Both pipeline stages fetch
/// through this seam, so tests can substitute canned pages.
pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<String>;
}

/// Flat-delay pacing: a full sleep before every request except the first.
/// The pause is unconditional, not measured against the time since the
/// last request.
struct Throttle {
    delay: Duration,
    primed: Cell<bool>,
}

impl Throttle {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            primed: Cell::new(false),
        }
    }

    fn pause(&self) {
        if self.primed.replace(true) {
            thread::sleep(self.delay);
        }
    }
}

/// Blocking reqwest client plus the throttle. Sharing one instance
/// across both stages paces the whole run.
pub struct PatentClient {
    client: reqwest::blocking::Client,
    throttle: Throttle,
}

impl PatentClient {
    pub fn new() -> Result<Self> {
        Self::with_delay(REQUEST_DELAY)
    }

    pub fn with_delay(delay: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("Mozilla/5.0 (compatible; PatentScraper/0.1)")
            .build()?;
        Ok(Self {
            client,
            throttle: Throttle::new(delay),
        })
    }
}

impl Fetch for PatentClient {
    fn fetch(&self, url: &str) -> Result<String> {
        self.throttle.pause();
        let response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("Failed to fetch: {}", url))?;
        let status = response.status();
        if !status.is_success() {
            bail!("{} returned HTTP {}", url, status);
        }
        response
            .text()
            .with_context(|| format!("Failed to read response from: {}", url))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Fetch;
    use anyhow::{bail, Result};
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Canned fetcher for pipeline tests. Serves bodies by URL, records
    /// every request, and fails URLs with no canned body.
    pub(crate) struct FakeFetcher {
        pages: HashMap<String, String>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeFetcher {
        pub(crate) fn new() -> Self {
            Self {
                pages: HashMap::new(),
                calls: RefCell::new(Vec::new()),
            }
        }

        pub(crate) fn page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }

        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }
    }

    impl Fetch for FakeFetcher {
        fn fetch(&self, url: &str) -> Result<String> {
            self.calls.borrow_mut().push(url.to_string());
            match self.pages.get(url) {
                Some(body) => Ok(body.clone()),
                None => bail!("{} returned HTTP 500 Internal Server Error", url),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_first_pause_is_free() {
        let throttle = Throttle::new(Duration::from_millis(100));
        let start = Instant::now();
        throttle.pause();
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[test]
    fn test_later_pauses_sleep_the_full_delay() {
        let throttle = Throttle::new(Duration::from_millis(50));
        throttle.pause();
        let start = Instant::now();
        throttle.pause();
        assert!(start.elapsed() >= Duration::from_millis(50));
    }
}
