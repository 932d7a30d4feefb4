//! ソースファイルと CSV インデックスの書き出し

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};
use tracing::{debug, info};

use crate::error::ScraperError;
use crate::types::ContractRecord;

pub const UNKNOWN_CONTRACT_NAME: &str = "Unknown Contract";
pub const SOURCE_EXTENSION: &str = "sol";
pub const CSV_HEADER: [&str; 5] = [
    "ContractAddress",
    "ContractName",
    "CompilerVersion",
    "SourceCode",
    "SolFile",
];

/// 実行ごとのタイムスタンプ（例: 20241215_093000）
pub fn run_timestamp<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%Y%m%d_%H%M%S").to_string()
}

pub fn run_dir_name(timestamp: &str) -> String {
    format!("contracts_{}", timestamp)
}

pub fn csv_file_name(timestamp: &str) -> String {
    format!("VerifiedContractsSource-{}.csv", timestamp)
}

/// `root` 配下に `contracts_<timestamp>` を作成する
pub fn create_run_dir(root: &Path, timestamp: &str) -> Result<PathBuf, ScraperError> {
    let dir = root.join(run_dir_name(timestamp));
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// 空でない最初の候補をコントラクト名とする
pub fn contract_name(candidates: &[String]) -> String {
    candidates
        .iter()
        .map(|c| c.trim())
        .find(|c| !c.is_empty())
        .unwrap_or(UNKNOWN_CONTRACT_NAME)
        .to_string()
}

/// 英数字と `-` `_` `.` 以外を取り除く
pub fn sanitize_filename(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect()
}

pub fn source_filename(address: &str, name: &str) -> String {
    sanitize_filename(&format!("{}_{}.{}", address, name, SOURCE_EXTENSION))
}

/// 1回の実行の出力先（ソースファイル群と CSV インデックス）
///
/// CSV は実行中ずっと開いたままにし、1行ごとに flush する。
pub struct RunOutput {
    dir: PathBuf,
    csv_path: PathBuf,
    writer: csv::Writer<File>,
}

impl RunOutput {
    /// `dir` に CSV を作成してヘッダーを書く
    pub fn create(dir: impl Into<PathBuf>, timestamp: &str) -> Result<Self, ScraperError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join(csv_file_name(timestamp));
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&csv_path)?;
        writer.write_record(CSV_HEADER)?;
        writer.flush()?;

        info!("CSV index created: {:?}", csv_path);
        Ok(Self {
            dir,
            csv_path,
            writer,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    /// ソースファイルを書き、CSV に1行追加する
    pub fn persist(
        &mut self,
        address: &str,
        name: &str,
        source_code: &str,
    ) -> Result<ContractRecord, ScraperError> {
        let sol_file = source_filename(address, name);
        fs::write(self.dir.join(&sol_file), source_code)?;
        info!("Saved cleaned Solidity code to {}", sol_file);

        let record = ContractRecord {
            address: address.to_string(),
            contract_name: name.to_string(),
            compiler_version: String::new(),
            source_code: source_code.to_string(),
            sol_file,
        };

        self.writer.serialize(&record)?;
        self.writer.flush()?;
        debug!("Appended index row for {}", address);

        Ok(record)
    }
}
