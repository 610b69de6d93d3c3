//! Rendered extraction through a short-lived headless browser session.
//!
//! Each render task owns one dedicated browser process and one page; the
//! session is never reused or pooled. The lifecycle is strictly ordered:
//! launch (retried once), page setup with the fetcher's User-Agent,
//! request interception, navigation, best-effort consent dismissal, then
//! selector evaluation. The process is torn down on every exit path.

pub mod consent;
pub mod intercept;

pub use consent::ConsentOutcome;
pub use intercept::should_abort;

use chromiumoxide::Page;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::fetch::{
    self, ContinueRequestParams, EventRequestPaused, FailRequestParams,
};
use chromiumoxide::cdp::browser_protocol::network::ErrorReason;
use futures_util::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::{Duration, sleep, timeout};

use pluck_core::{AppConfig, Error};

const LAUNCH_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Post-navigation settle window, approximating a network-quiescence wait.
const SETTLE_DELAY: Duration = Duration::from_millis(1_000);

/// Render a page in a dedicated browser session and extract the trimmed
/// text of every element matching `selector`, in document order.
///
/// The session's browser process is terminated before this returns, on
/// success and on every error path. If the driving future is cancelled
/// or panics mid-task, the session's drop handler reaps the process
/// instead.
pub async fn render_extract(
    config: &AppConfig, url: &str, selector: &str,
) -> Result<Vec<String>, Error> {
    let session = BrowserSession::launch(config).await?;
    let result = session.drive(url, selector).await;
    session.close().await;
    result
}

/// An ephemeral browser session bound to exactly one render task.
pub struct BrowserSession {
    page: Page,
    nav_timeout: Duration,
    inner: Option<SessionInner>,
}

/// Everything teardown needs, taken as a unit by `close` or by drop.
struct SessionInner {
    browser: Browser,
    handler_task: JoinHandle<()>,
    intercept_task: JoinHandle<()>,
}

impl BrowserSession {
    /// Launch an isolated headless browser and prepare a page for the
    /// task. A failed launch is retried once after a short fixed delay;
    /// the second failure is fatal for the task.
    pub async fn launch(config: &AppConfig) -> Result<Self, Error> {
        match Self::try_launch(config).await {
            Ok(session) => Ok(session),
            Err(first) => {
                tracing::warn!(error = %first, "browser launch failed, retrying once");
                sleep(LAUNCH_RETRY_DELAY).await;
                Self::try_launch(config).await
            }
        }
    }

    async fn try_launch(config: &AppConfig) -> Result<Self, Error> {
        // Sandboxing is off for constrained container environments; GPU
        // and /dev/shm are disabled for the same reason.
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage");
        if let Some(path) = &config.browser_executable {
            builder = builder.chrome_executable(path);
        }
        let browser_config = builder.build().map_err(Error::Browser)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| Error::Browser(format!("launch failed: {e}")))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        match Self::setup_page(&browser, config).await {
            Ok((page, intercept_task)) => Ok(Self {
                page,
                nav_timeout: config.nav_timeout(),
                inner: Some(SessionInner { browser, handler_task, intercept_task }),
            }),
            Err(e) => {
                // The process is already live; reap it before propagating.
                teardown(browser, handler_task, None).await;
                Err(e)
            }
        }
    }

    async fn setup_page(
        browser: &Browser, config: &AppConfig,
    ) -> Result<(Page, JoinHandle<()>), Error> {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| Error::Browser(format!("failed to open page: {e}")))?;

        // Same User-Agent as the plain fetcher, so the fingerprint is
        // consistent across strategies.
        page.set_user_agent(config.user_agent.as_str())
            .await
            .map_err(|e| Error::Browser(format!("failed to set user agent: {e}")))?;

        page.execute(fetch::EnableParams::default())
            .await
            .map_err(|e| Error::Browser(format!("failed to enable interception: {e}")))?;

        let mut paused = page
            .event_listener::<EventRequestPaused>()
            .await
            .map_err(|e| Error::Browser(format!("failed to listen for requests: {e}")))?;

        let intercept_page = page.clone();
        let intercept_task = tokio::spawn(async move {
            while let Some(event) = paused.next().await {
                let request_id = event.request_id.clone();
                let url = event.request.url.clone();
                if intercept::should_abort(&event.resource_type, &url) {
                    tracing::debug!(url, "aborting blocked request");
                    let _ = intercept_page
                        .execute(FailRequestParams::new(request_id, ErrorReason::Aborted))
                        .await;
                } else {
                    let _ = intercept_page.execute(ContinueRequestParams::new(request_id)).await;
                }
            }
        });

        Ok((page, intercept_task))
    }

    async fn drive(&self, url: &str, selector: &str) -> Result<Vec<String>, Error> {
        self.navigate(url).await?;

        // Best-effort: a surviving consent wall degrades the extraction,
        // it does not fail the task.
        let outcome = consent::dismiss(&self.page).await;
        tracing::debug!(?outcome, "consent dismissal finished");

        self.extract_text(selector).await
    }

    async fn navigate(&self, url: &str) -> Result<(), Error> {
        timeout(self.nav_timeout, async {
            self.page
                .goto(url)
                .await
                .map_err(|e| Error::Browser(format!("navigation failed: {e}")))?;
            let _ = self.page.wait_for_navigation().await;
            Ok::<(), Error>(())
        })
        .await
        .map_err(|_| {
            Error::Browser(format!("navigation timed out after {}ms", self.nav_timeout.as_millis()))
        })??;

        sleep(SETTLE_DELAY).await;
        Ok(())
    }

    async fn extract_text(&self, selector: &str) -> Result<Vec<String>, Error> {
        let elements = self
            .page
            .find_elements(selector)
            .await
            .map_err(|e| Error::Extract(format!("selector evaluation failed: {e}")))?;

        let mut values = Vec::with_capacity(elements.len());
        for element in elements {
            let text = element
                .inner_text()
                .await
                .map_err(|e| Error::Extract(format!("text retrieval failed: {e}")))?;
            values.push(text.unwrap_or_default().trim().to_string());
        }
        Ok(values)
    }

    /// Terminate the browser process. Consumes the session; callers run
    /// this on every exit path.
    pub async fn close(mut self) {
        if let Some(inner) = self.inner.take() {
            teardown(inner.browser, inner.handler_task, Some(inner.intercept_task)).await;
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        // Only reached when the driving future was cancelled or panicked
        // before `close`; the normal path has already emptied `inner`.
        if let Some(inner) = self.inner.take() {
            if let Ok(handle) = tokio::runtime::Handle::try_current() {
                handle.spawn(async move {
                    teardown(inner.browser, inner.handler_task, Some(inner.intercept_task)).await;
                });
            }
        }
    }
}

async fn teardown(
    mut browser: Browser, handler_task: JoinHandle<()>, intercept_task: Option<JoinHandle<()>>,
) {
    if let Some(task) = intercept_task {
        task.abort();
    }
    if let Err(e) = browser.close().await {
        tracing::debug!(error = %e, "browser close failed, killing process");
        let _ = browser.kill().await;
    }
    let _ = browser.wait().await;
    handler_task.abort();
}
