use std::time::Duration;

use crate::error::ScraperError;
use crate::source::LineNumberHeuristic;

/// 未使用の API 設定（フローでは呼び出さない）
pub const API_KEY: &str = "";
pub const API_URL: &str = "https://api.etherscan.io/api";

pub const EXPLORER_BASE_URL: &str = "https://etherscan.io";
pub const MAX_PAGES: u32 = 10;
pub const PAGE_SIZE: u32 = 100;
/// リクエスト間の待機（秒）
pub const DELAY_SECS: f64 = 2.0;
/// 描画待機のタイムアウト（秒）
pub const RENDER_TIMEOUT_SECS: u64 = 10;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// 詳細ページ取得のリトライ設定
///
/// 失敗した試行 `n`（1始まり）の後、`backoff_step * n` 待って再試行する。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_step: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// `attempt`回目（1始まり）の失敗後の待機時間。最終試行の後は `None`
    pub fn backoff_after(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts {
            return None;
        }
        Some(self.backoff_step * attempt)
    }
}

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub base_url: String,
    pub max_pages: u32,
    pub page_size: u32,
    pub delay: Duration,
    pub render_timeout: Duration,
    pub retry: RetryPolicy,
    pub line_numbers: LineNumberHeuristic,
    pub headless: bool,
    /// 失敗時にスクリーンショットをログ出力する
    pub debug: bool,
    pub user_agent: String,
    pub window_size: (u32, u32),
    pub api_key: String,
    pub api_url: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: EXPLORER_BASE_URL.to_string(),
            max_pages: MAX_PAGES,
            page_size: PAGE_SIZE,
            delay: Duration::from_secs_f64(DELAY_SECS),
            render_timeout: Duration::from_secs(RENDER_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
            line_numbers: LineNumberHeuristic::default(),
            headless: true,
            debug: false,
            user_agent: USER_AGENT.to_string(),
            window_size: (1920, 1080),
            api_key: API_KEY.to_string(),
            api_url: API_URL.to_string(),
        }
    }
}

impl ScraperConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// 秒数（小数可）で待機時間を指定する。負数・NaN・範囲外はエラー
    pub fn with_delay_secs(self, secs: f64) -> Result<Self, ScraperError> {
        let delay = Duration::try_from_secs_f64(secs)
            .map_err(|e| ScraperError::InvalidConfig(format!("delay {}: {}", secs, e)))?;
        Ok(self.with_delay(delay))
    }

    pub fn with_render_timeout(mut self, timeout: Duration) -> Self {
        self.render_timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// 一覧ページのURL
    pub fn listing_url(&self, page: u32) -> String {
        format!(
            "{}/contractsVerified/{}?ps={}",
            self.base_url.trim_end_matches('/'),
            page,
            self.page_size
        )
    }

    /// コントラクト詳細ページ（ソースコードタブ）のURL
    pub fn detail_url(&self, address: &str) -> String {
        format!(
            "{}/address/{}#code",
            self.base_url.trim_end_matches('/'),
            address
        )
    }

    pub fn validate(&self) -> Result<(), ScraperError> {
        if self.page_size == 0 {
            return Err(ScraperError::InvalidConfig("page_size must be > 0".into()));
        }
        if self.retry.max_attempts == 0 {
            return Err(ScraperError::InvalidConfig(
                "retry.max_attempts must be > 0".into(),
            ));
        }
        if self.line_numbers.threshold > self.line_numbers.window {
            return Err(ScraperError::InvalidConfig(format!(
                "line number threshold {} exceeds window {}",
                self.line_numbers.threshold, self.line_numbers.window
            )));
        }
        Ok(())
    }
}
