//! コントラクト関連の型定義

use std::path::PathBuf;

use serde::Serialize;

/// CSV インデックスの1行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractRecord {
    #[serde(rename = "ContractAddress")]
    pub address: String,
    #[serde(rename = "ContractName")]
    pub contract_name: String,
    /// 予約済み（常に空）
    #[serde(rename = "CompilerVersion")]
    pub compiler_version: String,
    #[serde(rename = "SourceCode")]
    pub source_code: String,
    #[serde(rename = "SolFile")]
    pub sol_file: String,
}

/// 詳細ページから読み取った生データ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractPage {
    /// コード表示領域の描画テキスト
    pub source_text: String,
    /// コントラクト名候補の見出しテキスト（ページ上の出現順）
    pub name_candidates: Vec<String>,
}

/// アドレスごとの最終状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractOutcome {
    Persisted(ContractRecord),
    Rejected { address: String },
    Failed { address: String, reason: String },
}

/// 1回の実行結果
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub addresses: Vec<String>,
    pub persisted: Vec<ContractRecord>,
    pub rejected: Vec<String>,
    pub failed: Vec<String>,
    pub csv_path: PathBuf,
    pub output_dir: PathBuf,
}

impl RunSummary {
    pub fn record(&mut self, outcome: ContractOutcome) {
        match outcome {
            ContractOutcome::Persisted(record) => self.persisted.push(record),
            ContractOutcome::Rejected { address } => self.rejected.push(address),
            ContractOutcome::Failed { address, .. } => self.failed.push(address),
        }
    }
}
