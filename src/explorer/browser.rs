//! chromiumoxide によるブラウザセッション

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::ScraperConfig;
use crate::error::ScraperError;
use crate::traits::ExplorerSession;
use crate::types::ContractPage;

/// 一覧テーブル
const TABLE_SELECTOR: &str = ".table";
/// 一覧テーブル1列目のリンク
const LISTING_LINK_SELECTOR: &str = "table.table tbody tr td:first-child a";
/// ソースコード表示領域
const EDITOR_SELECTOR: &str = "#editor";
/// コントラクト名の見出し候補
const CONTRACT_NAME_SELECTOR: &str =
    "div.d-flex.justify-content-between h6, div.h6.mb-3, .card-header .h6";

/// 要素出現確認のインターバル（ミリ秒）
const ELEMENT_POLL_INTERVAL_MS: u64 = 250;

pub struct ChromeSession {
    config: ScraperConfig,
    browser: Option<Browser>,
    listing_page: Option<Page>,
}

impl ChromeSession {
    pub fn new(config: ScraperConfig) -> Self {
        Self {
            config,
            browser: None,
            listing_page: None,
        }
    }

    fn get_browser(&self) -> Result<&Browser, ScraperError> {
        self.browser
            .as_ref()
            .ok_or_else(|| ScraperError::BrowserInit("Browser not initialized".to_string()))
    }

    /// 要素が現れるまで待機
    async fn wait_for_element(
        &self,
        page: &Page,
        selector: &str,
    ) -> Result<Element, ScraperError> {
        let timeout = self.config.render_timeout;
        let start = Instant::now();

        loop {
            match page.find_element(selector).await {
                Ok(element) => {
                    debug!("{} present after {:?}", selector, start.elapsed());
                    return Ok(element);
                }
                Err(e) => {
                    if start.elapsed() >= timeout {
                        return Err(ScraperError::Timeout(format!(
                            "{} not present within {:?}: {}",
                            selector, timeout, e
                        )));
                    }
                }
            }

            sleep(Duration::from_millis(ELEMENT_POLL_INTERVAL_MS)).await;
        }
    }

    async fn open(&self, page: &Page, url: &str) -> Result<(), ScraperError> {
        debug!("Navigating to {}", url);
        page.goto(url)
            .await
            .map_err(|e| ScraperError::Navigation(format!("{}: {}", url, e)))?;
        sleep(self.config.delay).await;
        Ok(())
    }

    async fn read_contract_page(
        &self,
        page: &Page,
        address: &str,
    ) -> Result<ContractPage, ScraperError> {
        self.open(page, &self.config.detail_url(address)).await?;

        let editor = self.wait_for_element(page, EDITOR_SELECTOR).await?;
        let source_text = editor
            .inner_text()
            .await
            .map_err(|e| ScraperError::JavaScript(format!("editor text: {}", e)))?
            .unwrap_or_default();

        // コントラクト名は取得できなくても続行する
        let mut name_candidates = Vec::new();
        match page.find_elements(CONTRACT_NAME_SELECTOR).await {
            Ok(elements) => {
                for element in elements {
                    if let Ok(Some(text)) = element.inner_text().await {
                        name_candidates.push(text);
                    }
                }
            }
            Err(e) => debug!("Contract name elements not found: {}", e),
        }

        Ok(ContractPage {
            source_text,
            name_candidates,
        })
    }

    /// デバッグ用スクリーンショット
    async fn log_screenshot(&self, page: &Page, address: &str) {
        match page
            .screenshot(ScreenshotParams::builder().full_page(true).build())
            .await
        {
            Ok(screenshot) => {
                use base64::Engine;
                let encoded = base64::engine::general_purpose::STANDARD.encode(&screenshot);
                info!("Screenshot for {}: data:image/png;base64,{}", address, encoded);
            }
            Err(e) => debug!("Failed to take screenshot for {}: {}", address, e),
        }
    }
}

#[async_trait]
impl ExplorerSession for ChromeSession {
    async fn initialize(&mut self) -> Result<(), ScraperError> {
        info!("Initializing browser...");

        let chrome_path = std::env::var("CHROME_PATH")
            .or_else(|_| std::env::var("CHROMIUM_PATH"))
            .ok();

        let (width, height) = self.config.window_size;
        let mut builder = BrowserConfig::builder()
            .window_size(width, height)
            .no_sandbox()
            .request_timeout(Duration::from_secs(60))
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            .arg(format!("--user-agent={}", self.config.user_agent));

        if let Some(path) = chrome_path {
            builder = builder.chrome_executable(path);
        }

        if !self.config.headless {
            builder = builder.with_head();
        }

        let browser_config = builder
            .build()
            .map_err(|e| ScraperError::BrowserInit(e.to_string()))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| ScraperError::BrowserInit(e.to_string()))?;

        // ブラウザイベントハンドラをバックグラウンドで実行
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                debug!("Browser event: {:?}", event);
            }
        });

        self.browser = Some(browser);
        info!("Browser initialized successfully");
        Ok(())
    }

    async fn listing_links(&mut self, page_no: u32) -> Result<Vec<String>, ScraperError> {
        if self.listing_page.is_none() {
            let page = self
                .get_browser()?
                .new_page("about:blank")
                .await
                .map_err(|e| ScraperError::BrowserInit(e.to_string()))?;
            self.listing_page = Some(page);
        }
        let page = self
            .listing_page
            .as_ref()
            .ok_or_else(|| ScraperError::BrowserInit("Listing page not opened".to_string()))?;

        self.open(page, &self.config.listing_url(page_no)).await?;
        self.wait_for_element(page, TABLE_SELECTOR).await?;

        let links = page
            .find_elements(LISTING_LINK_SELECTOR)
            .await
            .map_err(|e| ScraperError::ElementNotFound(format!("listing links: {}", e)))?;

        let mut hrefs = Vec::with_capacity(links.len());
        for link in links {
            let href = link
                .attribute("href")
                .await
                .map_err(|e| ScraperError::JavaScript(format!("href: {}", e)))?;
            if let Some(href) = href {
                hrefs.push(href);
            }
        }

        debug!("Listing page {} has {} links", page_no, hrefs.len());
        Ok(hrefs)
    }

    async fn contract_page(&mut self, address: &str) -> Result<ContractPage, ScraperError> {
        // 試行ごとに新しいページで開く
        let page = self
            .get_browser()?
            .new_page("about:blank")
            .await
            .map_err(|e| ScraperError::BrowserInit(e.to_string()))?;

        let result = self.read_contract_page(&page, address).await;

        if result.is_err() && self.config.debug {
            self.log_screenshot(&page, address).await;
        }

        if let Err(e) = page.close().await {
            debug!("Failed to close page: {}", e);
        }

        result
    }

    async fn close(&mut self) -> Result<(), ScraperError> {
        info!("Closing browser...");

        if let Some(page) = self.listing_page.take() {
            if let Err(e) = page.close().await {
                debug!("Failed to close listing page: {}", e);
            }
        }

        if let Some(mut browser) = self.browser.take() {
            if let Err(e) = browser.close().await {
                warn!("Failed to close browser: {}", e);
            }
            // 子プロセスを回収する
            if let Err(e) = browser.wait().await {
                warn!("Failed to wait for browser exit: {}", e);
            }
        }

        info!("Browser closed");
        Ok(())
    }
}
