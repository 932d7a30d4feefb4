use async_trait::async_trait;

use crate::error::ScraperError;
use crate::types::ContractPage;

/// エクスプローラーのページを読むブラウザセッション
#[async_trait]
pub trait ExplorerSession: Send {
    /// ブラウザ初期化
    async fn initialize(&mut self) -> Result<(), ScraperError>;

    /// 一覧ページを開き、テーブル1列目のリンク href を返す
    async fn listing_links(&mut self, page: u32) -> Result<Vec<String>, ScraperError>;

    /// 詳細ページを新たに開き、ソース表示とコントラクト名候補を読む
    async fn contract_page(&mut self, address: &str) -> Result<ContractPage, ScraperError>;

    /// リソース解放
    async fn close(&mut self) -> Result<(), ScraperError>;
}
