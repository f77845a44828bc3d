//! Chromium discovery, download and launch
//!
//! `BrowserSession` owns the launched browser, its CDP handler task and the
//! profile directory, and tears all three down when dropped.

use anyhow::{Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfigBuilder, HeadlessMode};
use chromiumoxide::fetcher::{BrowserFetcher, BrowserFetcherOptions};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;
use tokio::task::{self, JoinHandle};
use tracing::{error, info, trace, warn};

use crate::utils::constants::{BROWSER_REQUEST_TIMEOUT_SECS, CHROME_USER_AGENT};

/// Find Chrome/Chromium on this machine.
///
/// `CHROMIUM_PATH` wins when it points at an existing file; otherwise the
/// usual install locations are probed, then `which`.
pub fn find_browser_executable() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("CHROMIUM_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            info!("Using browser from CHROMIUM_PATH: {}", path.display());
            return Ok(path);
        }
        warn!(
            "CHROMIUM_PATH points to a missing file: {}",
            path.display()
        );
    }

    let candidates: &[&str] = if cfg!(target_os = "windows") {
        &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files\Chromium\Application\chrome.exe",
        ]
    } else if cfg!(target_os = "macos") {
        &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "/opt/homebrew/bin/chromium",
        ]
    } else {
        &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
            "/usr/local/bin/chromium",
            "/opt/google/chrome/chrome",
        ]
    };

    if let Some(path) = candidates.iter().map(PathBuf::from).find(|p| p.exists()) {
        info!("Found browser at: {}", path.display());
        return Ok(path);
    }

    if !cfg!(target_os = "windows") {
        for cmd in ["chromium", "chromium-browser", "google-chrome", "chrome"] {
            if let Ok(output) = Command::new("which").arg(cmd).output()
                && output.status.success()
            {
                let found = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !found.is_empty() {
                    info!("Found browser using 'which': {}", found);
                    return Ok(PathBuf::from(found));
                }
            }
        }
    }

    Err(anyhow::anyhow!("Chrome/Chromium executable not found"))
}

/// Download a managed Chromium into the user cache directory.
pub async fn download_managed_browser() -> Result<PathBuf> {
    let cache_dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("coffee_harvest")
        .join("chromium");

    info!("Downloading managed Chromium into {}", cache_dir.display());
    std::fs::create_dir_all(&cache_dir).context("Failed to create browser cache directory")?;

    let fetcher = BrowserFetcher::new(
        BrowserFetcherOptions::builder()
            .with_path(&cache_dir)
            .build()
            .context("Failed to build fetcher options")?,
    );
    let revision = fetcher.fetch().await.context("Failed to fetch browser")?;

    info!("Downloaded Chromium to: {}", revision.folder_path.display());
    Ok(revision.executable_path)
}

/// Chrome profile location for one session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDir {
    pub path: PathBuf,
    /// Removed on shutdown; never true for a caller-supplied directory
    pub owned: bool,
}

impl ProfileDir {
    /// Use `chrome_data_dir` as is, or a per-process temp dir the session owns
    #[must_use]
    pub fn resolve(chrome_data_dir: Option<PathBuf>) -> Self {
        match chrome_data_dir {
            Some(path) => Self { path, owned: false },
            None => Self {
                path: std::env::temp_dir()
                    .join(format!("coffee_harvest_chrome_{}", std::process::id())),
                owned: true,
            },
        }
    }
}

/// A launched browser plus everything that must die with it
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    /// Owned profile directory still to be removed
    user_data_dir: Option<PathBuf>,
}

impl BrowserSession {
    /// Find (or download) Chromium and launch it.
    ///
    /// # Arguments
    /// * `headless` - Run without a window
    /// * `chrome_data_dir` - Profile directory, left in place on shutdown; a
    ///   per-process temp dir that is removed on shutdown when `None`
    pub async fn launch(headless: bool, chrome_data_dir: Option<PathBuf>) -> Result<Self> {
        let chrome_path = match find_browser_executable() {
            Ok(path) => path,
            Err(e) => {
                warn!("{e}; falling back to a managed download");
                download_managed_browser().await?
            }
        };

        let profile = ProfileDir::resolve(chrome_data_dir);
        std::fs::create_dir_all(&profile.path).context("Failed to create user data directory")?;

        let mut builder = BrowserConfigBuilder::default()
            .request_timeout(Duration::from_secs(BROWSER_REQUEST_TIMEOUT_SECS))
            .window_size(1920, 1080)
            .user_data_dir(profile.path.clone())
            .chrome_executable(chrome_path);

        builder = if headless {
            builder.headless_mode(HeadlessMode::default())
        } else {
            builder.with_head()
        };

        let config = builder
            .arg(format!("--user-agent={CHROME_USER_AGENT}"))
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-infobars")
            .arg("--disable-notifications")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--no-sandbox")
            .arg("--disable-extensions")
            .arg("--disable-background-networking")
            .arg("--disable-dev-shm-usage")
            .arg("--mute-audio")
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build browser config: {e}"))?;

        info!("Launching browser (headless: {})", headless);
        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("Failed to launch browser")?;

        let handler = task::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    let msg = e.to_string();
                    // chromiumoxide cannot decode some newer CDP events; those
                    // failures do not affect the session.
                    if msg.contains("data did not match any variant of untagged enum Message")
                        || msg.contains("Failed to deserialize WS response")
                    {
                        trace!("Ignoring undecodable CDP message: {}", msg);
                    } else {
                        error!("Browser handler error: {:?}", e);
                    }
                }
            }
            info!("Browser handler task completed");
        });

        Ok(Self {
            browser,
            handler,
            user_data_dir: profile.owned.then_some(profile.path),
        })
    }

    /// Open a blank tab
    pub async fn new_page(&self) -> Result<Page> {
        self.browser
            .new_page("about:blank")
            .await
            .context("Failed to create blank page")
    }

    /// Close the browser and wait for the process to exit.
    pub async fn shutdown(mut self) -> Result<()> {
        if let Err(e) = self.browser.close().await {
            warn!("Browser close failed: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            warn!("Waiting for browser exit failed: {}", e);
        }
        self.handler.abort();
        self.cleanup_user_data_dir();
        Ok(())
    }

    /// Remove the profile directory. Only safe once Chrome has exited.
    fn cleanup_user_data_dir(&mut self) {
        if let Some(path) = self.user_data_dir.take() {
            trace!("Removing browser profile {}", path.display());
            if let Err(e) = std::fs::remove_dir_all(&path) {
                warn!(
                    "Failed to remove browser profile {}: {}",
                    path.display(),
                    e
                );
            }
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler.abort();
        // Chrome is still running here; Browser's own Drop kills it afterwards
        if let Some(path) = self.user_data_dir.take() {
            warn!(
                "BrowserSession dropped without shutdown; leaving profile at {}",
                path.display()
            );
        }
    }
}
