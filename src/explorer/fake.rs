//! テスト用のインメモリセッション

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;

use crate::error::ScraperError;
use crate::traits::ExplorerSession;
use crate::types::ContractPage;

#[derive(Default)]
pub(crate) struct FakeSession {
    listings: HashMap<u32, Vec<String>>,
    broken_listings: Vec<u32>,
    pages: HashMap<String, VecDeque<Result<ContractPage, String>>>,
    fail_initialize: bool,
    pub visited_listings: Vec<u32>,
    pub page_requests: Vec<String>,
    pub initialized: bool,
    pub closed: bool,
}

impl FakeSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listing(mut self, page: u32, hrefs: &[&str]) -> Self {
        self.listings
            .insert(page, hrefs.iter().map(|h| h.to_string()).collect());
        self
    }

    pub fn with_broken_listing(mut self, page: u32) -> Self {
        self.broken_listings.push(page);
        self
    }

    pub fn with_page(mut self, address: &str, source_text: &str, names: &[&str]) -> Self {
        let page = ContractPage {
            source_text: source_text.to_string(),
            name_candidates: names.iter().map(|n| n.to_string()).collect(),
        };
        self.pages
            .entry(address.to_string())
            .or_default()
            .push_back(Ok(page));
        self
    }

    pub fn with_timeout(mut self, address: &str) -> Self {
        self.pages
            .entry(address.to_string())
            .or_default()
            .push_back(Err(format!("#editor not present for {}", address)));
        self
    }

    pub fn with_failing_initialize(mut self) -> Self {
        self.fail_initialize = true;
        self
    }

    pub fn requests_for(&self, address: &str) -> usize {
        self.page_requests.iter().filter(|a| *a == address).count()
    }
}

#[async_trait]
impl ExplorerSession for FakeSession {
    async fn initialize(&mut self) -> Result<(), ScraperError> {
        if self.fail_initialize {
            return Err(ScraperError::BrowserInit("chrome not found".into()));
        }
        self.initialized = true;
        Ok(())
    }

    async fn listing_links(&mut self, page: u32) -> Result<Vec<String>, ScraperError> {
        self.visited_listings.push(page);
        if self.broken_listings.contains(&page) {
            return Err(ScraperError::Timeout(format!("listing page {}", page)));
        }
        Ok(self.listings.get(&page).cloned().unwrap_or_default())
    }

    async fn contract_page(&mut self, address: &str) -> Result<ContractPage, ScraperError> {
        self.page_requests.push(address.to_string());
        match self.pages.get_mut(address).and_then(|q| q.pop_front()) {
            Some(Ok(page)) => Ok(page),
            Some(Err(message)) => Err(ScraperError::Timeout(message)),
            None => Err(ScraperError::Timeout(format!("no page for {}", address))),
        }
    }

    async fn close(&mut self) -> Result<(), ScraperError> {
        self.closed = true;
        Ok(())
    }
}
