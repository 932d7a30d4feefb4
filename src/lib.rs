//! 検証済みコントラクトのソースコードスクレイパー
//!
//! - Etherscan の検証済みコントラクト一覧からアドレスを収集
//! - 詳細ページのソース表示を取得（リトライ付き）
//! - 行番号を除去し、Solidity ソースだけを `.sol` と CSV に保存
//!
//! # 使用例
//!
//! ```rust,ignore
//! use verified_contracts_scraper::{ScrapeRequest, ScraperConfig, ScraperService};
//! use tower::Service;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut service = ScraperService::new();
//!
//!     let request = ScrapeRequest::new("./contracts_20241215_093000", "20241215_093000")
//!         .with_config(ScraperConfig::new().with_max_pages(1));
//!
//!     let summary = service.call(request).await.unwrap();
//!     println!("Saved {} contracts to {:?}", summary.persisted.len(), summary.csv_path);
//! }
//! ```

pub mod config;
pub mod error;
pub mod explorer;
pub mod persist;
pub mod service;
pub mod source;
pub mod traits;
pub mod types;

// 主要な型をリエクスポート
pub use config::{RetryPolicy, ScraperConfig};
pub use error::ScraperError;
pub use explorer::ChromeSession;
pub use persist::RunOutput;
pub use service::{run_scrape, ScrapeRequest, ScraperService};
pub use source::{classify, clean_source_code, Classification, LineNumberHeuristic};
pub use traits::ExplorerSession;
pub use types::{ContractOutcome, ContractPage, ContractRecord, RunSummary};
