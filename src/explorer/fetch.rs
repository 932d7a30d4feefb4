//! 詳細ページの取得（リトライ付き）

use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::config::RetryPolicy;
use crate::error::ScraperError;
use crate::traits::ExplorerSession;
use crate::types::ContractPage;

/// 詳細ページを取得する
///
/// 失敗した場合はページを開き直して再試行する。試行間の待機は
/// `RetryPolicy` に従って線形に伸びる（デフォルト 2秒, 4秒）。
pub async fn fetch_contract_page<S>(
    session: &mut S,
    address: &str,
    retry: &RetryPolicy,
) -> Result<ContractPage, ScraperError>
where
    S: ExplorerSession + ?Sized,
{
    let mut last_error = None;

    for attempt in 1..=retry.max_attempts {
        match session.contract_page(address).await {
            Ok(page) => return Ok(page),
            Err(e) => {
                // ページ読み込み以外のエラーも再試行するが、目立つように出す
                if e.is_retryable() {
                    warn!("Attempt {} failed for {}: {}", attempt, address, e);
                } else {
                    error!("Attempt {} failed for {}: {}", attempt, address, e);
                }
                last_error = Some(e);
            }
        }

        if let Some(backoff) = retry.backoff_after(attempt) {
            info!("Retrying {} in {:?}", address, backoff);
            sleep(backoff).await;
        }
    }

    warn!("All attempts failed for {}", address);
    Err(ScraperError::RetriesExhausted {
        address: address.to_string(),
        attempts: retry.max_attempts,
        last_error: last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no attempt made".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::explorer::fake::FakeSession;

    fn no_wait() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            backoff_step: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_first_attempt_succeeds() {
        let mut session = FakeSession::new().with_page("0xabc", "contract A {}", &["A"]);

        let page = fetch_contract_page(&mut session, "0xabc", &no_wait())
            .await
            .unwrap();

        assert_eq!(page.source_text, "contract A {}");
        assert_eq!(session.requests_for("0xabc"), 1);
    }

    #[tokio::test]
    async fn test_recovers_on_third_attempt() {
        let mut session = FakeSession::new()
            .with_timeout("0xabc")
            .with_timeout("0xabc")
            .with_page("0xabc", "contract A {}", &[]);

        let page = fetch_contract_page(&mut session, "0xabc", &no_wait()).await;

        assert!(page.is_ok());
        assert_eq!(session.requests_for("0xabc"), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_three_attempts() {
        let mut session = FakeSession::new()
            .with_timeout("0xabc")
            .with_timeout("0xabc")
            .with_timeout("0xabc")
            .with_page("0xabc", "contract A {}", &[]);

        let err = fetch_contract_page(&mut session, "0xabc", &no_wait())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ScraperError::RetriesExhausted { attempts: 3, .. }
        ));
        assert_eq!(session.requests_for("0xabc"), 3);
    }

    #[tokio::test]
    async fn test_backoff_is_applied_between_attempts() {
        let retry = RetryPolicy {
            max_attempts: 2,
            backoff_step: Duration::from_millis(20),
        };
        let mut session = FakeSession::new();

        let start = std::time::Instant::now();
        let result = fetch_contract_page(&mut session, "0xabc", &retry).await;

        assert!(result.is_err());
        assert!(start.elapsed() >= Duration::from_millis(20));
        assert_eq!(session.requests_for("0xabc"), 2);
    }
}
