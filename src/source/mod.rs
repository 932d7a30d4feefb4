//! 抽出テキストの整形と判定
//!
//! 行番号付きで描画されたソースから行番号を取り除き、
//! 結果が Solidity ソースか（JSON メタデータ等ではないか）を判定する

mod classify;
mod clean;

pub use classify::{classify, is_solidity_code, Classification};
pub use clean::{clean_source_code, LineNumberHeuristic};
