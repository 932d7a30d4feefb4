//! 一覧ページからのアドレス収集

use tokio::time::sleep;
use tracing::{error, info};

use crate::config::ScraperConfig;
use crate::traits::ExplorerSession;

/// リンク先からアドレスを取り出す
///
/// `address` を含む href の最後の `/address/` 以降、`#` の手前までを取り、
/// `0x` で始まる場合のみ返す。
pub fn address_from_href(href: &str) -> Option<&str> {
    if !href.contains("address") {
        return None;
    }

    let tail = href.rsplit("/address/").next()?;
    let address = tail.split('#').next()?;

    address.starts_with("0x").then_some(address)
}

/// 1ページ目から `max_pages` ページまで順にアドレスを集める
///
/// ページ取得中にエラーが起きた時点で残りのページは諦め、
/// それまでに集めたアドレスを返す。重複は除去しない。
pub async fn harvest_addresses<S>(session: &mut S, config: &ScraperConfig) -> Vec<String>
where
    S: ExplorerSession + ?Sized,
{
    let mut addresses = Vec::new();

    for page in 1..=config.max_pages {
        info!("Scraping page {}...", page);

        let links = match session.listing_links(page).await {
            Ok(links) => links,
            Err(e) => {
                error!("Error during scraping page {}: {}", page, e);
                break;
            }
        };

        for href in &links {
            if let Some(address) = address_from_href(href) {
                info!("Found address: {}", address);
                addresses.push(address.to_string());
            }
        }

        sleep(config.delay).await;
    }

    addresses
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::explorer::fake::FakeSession;

    fn config(max_pages: u32) -> ScraperConfig {
        ScraperConfig::new()
            .with_max_pages(max_pages)
            .with_delay(Duration::ZERO)
    }

    #[test]
    fn test_address_from_href() {
        assert_eq!(
            address_from_href("https://etherscan.io/address/0xdAC17F958D2ee523a2206206994597C13D831ec7#code"),
            Some("0xdAC17F958D2ee523a2206206994597C13D831ec7")
        );
        assert_eq!(address_from_href("/address/0xabc"), Some("0xabc"));
        assert_eq!(address_from_href("https://etherscan.io/token/0xabc"), None);
        assert_eq!(address_from_href("https://etherscan.io/address/ens.eth"), None);
        assert_eq!(address_from_href("/addresses?page=2"), None);
    }

    #[tokio::test]
    async fn test_harvest_keeps_order_and_duplicates() {
        let mut session = FakeSession::new()
            .with_listing(1, &["/address/0x01#code", "/token/0x99", "/address/0x02"])
            .with_listing(2, &["/address/0x01#code"]);

        let addresses = harvest_addresses(&mut session, &config(2)).await;

        assert_eq!(addresses, vec!["0x01", "0x02", "0x01"]);
        assert_eq!(session.visited_listings, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_harvest_aborts_on_page_error() {
        let mut session = FakeSession::new()
            .with_listing(1, &["/address/0xa1"])
            .with_listing(2, &["/address/0xa2"])
            .with_broken_listing(3)
            .with_listing(4, &["/address/0xa4"]);

        let addresses = harvest_addresses(&mut session, &config(10)).await;

        assert_eq!(addresses, vec!["0xa1", "0xa2"]);
        assert_eq!(session.visited_listings, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_harvest_zero_pages() {
        let mut session = FakeSession::new().with_listing(1, &["/address/0xa1"]);
        let addresses = harvest_addresses(&mut session, &config(0)).await;
        assert!(addresses.is_empty());
        assert!(session.visited_listings.is_empty());
    }
}
