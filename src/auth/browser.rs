use async_trait::async_trait;

/// Presents the authorization URL to the user.
///
/// The default implementation opens the system browser; tests substitute a
/// launcher that follows the redirect itself.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self, url: &str) -> std::io::Result<()>;
}

/// Opens URLs with the platform's default browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

#[async_trait]
impl BrowserLauncher for SystemBrowser {
    async fn launch(&self, url: &str) -> std::io::Result<()> {
        let url = url.to_string();
        tokio::task::spawn_blocking(move || webbrowser::open(&url))
            .await
            .map_err(std::io::Error::other)?
    }
}

/// Prints the URL instead of opening a browser, for headless sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrintUrl;

#[async_trait]
impl BrowserLauncher for PrintUrl {
    async fn launch(&self, url: &str) -> std::io::Result<()> {
        eprintln!("Open this URL to authorize:\n{url}");
        Ok(())
    }
}
