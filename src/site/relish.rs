use super::OrderSite;
use crate::config::{Credentials, Selectors, Settings};
use crate::{Error, Result};
use async_trait::async_trait;
use eoka::{Browser, Page};
use tracing::{debug, info};

/// Read the visible text of the first element matching a selector.
const LABEL_TEXT_JS: &str = r#"(() => {
    const el = document.querySelector(arguments[0]);
    return el ? el.innerText : null;
})()"#;

/// Relish schedule page driven through a headless browser.
pub struct RelishSite {
    browser: Browser,
    page: Page,
    login_url: String,
    schedule_url: String,
    selectors: Selectors,
    element_timeout_ms: u64,
    render_delay_ms: u64,
}

impl RelishSite {
    /// Launch a browser and open a blank page.
    pub async fn launch(settings: &Settings) -> Result<Self> {
        let browser_settings = &settings.browser;
        let stealth = eoka::StealthConfig {
            headless: browser_settings.headless,
            proxy: browser_settings.proxy.clone(),
            user_agent: browser_settings.user_agent.clone(),
            viewport_width: browser_settings
                .viewport
                .map(|v| v.width)
                .unwrap_or(1280),
            viewport_height: browser_settings
                .viewport
                .map(|v| v.height)
                .unwrap_or(720),
            ..Default::default()
        };

        debug!(
            "Launching browser (headless: {}, proxy: {:?})",
            browser_settings.headless, browser_settings.proxy
        );
        let browser = Browser::launch_with_config(stealth).await?;
        let page = browser.new_page("about:blank").await?;

        Ok(Self {
            browser,
            page,
            login_url: settings.login_url.clone(),
            schedule_url: settings.schedule_url.clone(),
            selectors: settings.selectors.clone(),
            element_timeout_ms: settings.element_timeout_ms(),
            render_delay_ms: settings.render_delay_ms(),
        })
    }

    /// Get a reference to the page.
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Wait for a field, fill it, then click its submit control.
    async fn fill_and_submit(
        &self,
        step: &'static str,
        field: &str,
        value: &str,
        submit: &str,
    ) -> Result<()> {
        debug!("wait for {} before clicking {}", field, submit);
        self.page
            .wait_for(field, self.element_timeout_ms)
            .await
            .map_err(|e| Error::login(step, e))?;
        self.page
            .fill(field, value)
            .await
            .map_err(|e| Error::login(step, e))?;
        self.page
            .click(submit)
            .await
            .map_err(|e| Error::login(step, e))?;
        Ok(())
    }
}

#[async_trait]
impl OrderSite for RelishSite {
    async fn login(&mut self, credentials: &Credentials) -> Result<()> {
        info!("Navigating to: {}", self.login_url);
        self.page
            .goto(&self.login_url)
            .await
            .map_err(|e| Error::login("open login page", e))?;
        self.page.wait(self.render_delay_ms).await;

        let selectors = &self.selectors;
        self.fill_and_submit(
            "email",
            &selectors.email_field,
            &credentials.email,
            &selectors.email_submit,
        )
        .await?;
        self.fill_and_submit(
            "password",
            &selectors.password_field,
            &credentials.password,
            &selectors.password_submit,
        )
        .await?;

        // Submitting may land on an interstitial instead of the schedule.
        self.page.wait(self.render_delay_ms).await;
        info!("Navigating to: {}", self.schedule_url);
        self.page
            .goto(&self.schedule_url)
            .await
            .map_err(|e| Error::login("open schedule page", e))?;
        Ok(())
    }

    async fn read_status(&mut self) -> Result<String> {
        let selector = &self.selectors.status_label;
        debug!("check order status: {}", selector);

        self.page
            .wait_for(selector, self.element_timeout_ms)
            .await
            .map_err(|e| Error::StatusLabel(format!("'{}' not found: {}", selector, e)))?;

        let quoted = serde_json::to_string(selector)
            .map_err(|e| Error::StatusLabel(e.to_string()))?;
        let js = LABEL_TEXT_JS.replace("arguments[0]", &quoted);
        let text: Option<String> = self
            .page
            .evaluate(&js)
            .await
            .map_err(|e| Error::StatusLabel(format!("failed to read '{}': {}", selector, e)))?;

        text.ok_or_else(|| Error::StatusLabel(format!("'{}' disappeared", selector)))
    }

    async fn reload(&mut self) -> Result<()> {
        debug!("reloading page");
        self.page.reload().await?;
        Ok(())
    }

    async fn close(self) -> Result<()> {
        self.browser.close().await?;
        Ok(())
    }
}
