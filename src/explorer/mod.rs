//! Etherscan スクレイパーモジュール
//!
//! 検証済みコントラクト一覧からアドレスを集め、詳細ページのソース表示を取得する

mod browser;
mod fetch;
mod harvest;

#[cfg(test)]
pub(crate) mod fake;

pub use browser::ChromeSession;
pub use fetch::fetch_contract_page;
pub use harvest::{address_from_href, harvest_addresses};
