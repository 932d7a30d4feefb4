use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("ブラウザ初期化エラー: {0}")]
    BrowserInit(String),

    #[error("ナビゲーションエラー: {0}")]
    Navigation(String),

    #[error("タイムアウト: {0}")]
    Timeout(String),

    #[error("要素が見つかりません: {0}")]
    ElementNotFound(String),

    #[error("JavaScript実行エラー: {0}")]
    JavaScript(String),

    #[error("ファイル操作エラー: {0}")]
    FileIO(#[from] std::io::Error),

    #[error("CSV書き込みエラー: {0}")]
    Csv(#[from] csv::Error),

    #[error("設定エラー: {0}")]
    InvalidConfig(String),

    #[error("{address}: {attempts}回試行して失敗 ({last_error})")]
    RetriesExhausted {
        address: String,
        attempts: u32,
        last_error: String,
    },
}

impl ScraperError {
    /// ページ読み込み・描画待ちに起因するエラーか
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ScraperError::Navigation(_)
                | ScraperError::Timeout(_)
                | ScraperError::ElementNotFound(_)
                | ScraperError::JavaScript(_)
        )
    }
}
