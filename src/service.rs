use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::time::sleep;
use tower::Service;
use tracing::{error, info, warn};

use crate::config::ScraperConfig;
use crate::error::ScraperError;
use crate::explorer::{fetch_contract_page, harvest_addresses, ChromeSession};
use crate::persist::{contract_name, RunOutput};
use crate::source::classify;
use crate::traits::ExplorerSession;
use crate::types::{ContractOutcome, RunSummary};

/// 1アドレス分の処理（取得 → 整形 → 判定 → 保存）
pub async fn process_address<S>(
    session: &mut S,
    config: &ScraperConfig,
    output: &mut RunOutput,
    address: &str,
) -> ContractOutcome
where
    S: ExplorerSession + ?Sized,
{
    let page = match fetch_contract_page(session, address, &config.retry).await {
        Ok(page) => page,
        Err(e) => {
            return ContractOutcome::Failed {
                address: address.to_string(),
                reason: e.to_string(),
            }
        }
    };

    let source_code = config.line_numbers.clean(&page.source_text);
    let classification = classify(&source_code);
    if !classification.is_accepted() {
        info!(
            "Skipping {}: Not a Solidity file ({:?})",
            address, classification
        );
        return ContractOutcome::Rejected {
            address: address.to_string(),
        };
    }

    let name = contract_name(&page.name_candidates);
    match output.persist(address, &name, &source_code) {
        Ok(record) => ContractOutcome::Persisted(record),
        Err(e) => {
            error!("Error saving contract {}: {}", address, e);
            ContractOutcome::Failed {
                address: address.to_string(),
                reason: e.to_string(),
            }
        }
    }
}

/// 一覧の収集から保存までを順番に実行する
///
/// CSV はアドレス収集の後に `output_dir` へ作成するので、セッションの初期化に
/// 失敗した場合は何も書かれない。エラーを返すのは初期化と出力先作成の失敗のみ。
/// セッションは成功・失敗にかかわらず閉じる。
pub async fn run_scrape<S>(
    session: &mut S,
    config: &ScraperConfig,
    output_dir: &Path,
    timestamp: &str,
) -> Result<RunSummary, ScraperError>
where
    S: ExplorerSession + ?Sized,
{
    config.validate()?;

    if let Err(e) = session.initialize().await {
        let _ = session.close().await;
        return Err(e);
    }

    let addresses = harvest_addresses(session, config).await;
    info!("Collected {} addresses", addresses.len());

    let mut output = match RunOutput::create(output_dir, timestamp) {
        Ok(output) => output,
        Err(e) => {
            let _ = session.close().await;
            return Err(e);
        }
    };

    let mut summary = RunSummary {
        csv_path: output.csv_path().to_path_buf(),
        output_dir: output.dir().to_path_buf(),
        ..Default::default()
    };

    for address in &addresses {
        info!("Fetching source code for {}...", address);
        let outcome = process_address(session, config, &mut output, address).await;
        if let ContractOutcome::Failed { reason, .. } = &outcome {
            warn!("Giving up on {}: {}", address, reason);
        }
        summary.record(outcome);
        sleep(config.delay).await;
    }
    summary.addresses = addresses;

    if let Err(e) = session.close().await {
        warn!("Failed to close session: {}", e);
    }

    info!(
        "Done. persisted={}, rejected={}, failed={}",
        summary.persisted.len(),
        summary.rejected.len(),
        summary.failed.len()
    );
    info!("Results saved to {:?}", summary.csv_path);
    info!("Contract source files saved in directory: {:?}", summary.output_dir);

    Ok(summary)
}

/// スクレイピングリクエスト
#[derive(Debug, Clone)]
pub struct ScrapeRequest {
    pub config: ScraperConfig,
    /// ソースファイルと CSV の出力先
    pub output_dir: PathBuf,
    /// CSV ファイル名に使うタイムスタンプ
    pub timestamp: String,
}

impl ScrapeRequest {
    pub fn new(output_dir: impl Into<PathBuf>, timestamp: impl Into<String>) -> Self {
        Self {
            config: ScraperConfig::default(),
            output_dir: output_dir.into(),
            timestamp: timestamp.into(),
        }
    }

    pub fn with_config(mut self, config: ScraperConfig) -> Self {
        self.config = config;
        self
    }
}

/// tower::Serviceを実装したスクレイパーサービス
#[derive(Debug, Clone, Default)]
pub struct ScraperService {}

impl ScraperService {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Service<ScrapeRequest> for ScraperService {
    type Response = RunSummary;
    type Error = ScraperError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: ScrapeRequest) -> Self::Future {
        info!(
            "Scrape request received: pages={}, output={:?}",
            req.config.max_pages, req.output_dir
        );

        Box::pin(async move {
            let mut session = ChromeSession::new(req.config.clone());
            run_scrape(&mut session, &req.config, &req.output_dir, &req.timestamp).await
        })
    }
}
