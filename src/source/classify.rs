//! Solidity ソースかどうかの判定

use serde::de::IgnoredAny;

/// 判定結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Solidity ソース
    Solidity,
    /// JSON として解析できた（マルチファイルのメタデータ等）
    Json,
    /// 目印となるトークンがない
    Unrecognized,
}

impl Classification {
    pub fn is_accepted(self) -> bool {
        matches!(self, Classification::Solidity)
    }
}

const SOLIDITY_MARKERS: [&str; 2] = ["pragma solidity", "contract"];

pub fn classify(text: &str) -> Classification {
    // 値の範囲やサロゲートは検証せず、構文として JSON かだけを見る
    if serde_json::from_str::<IgnoredAny>(text).is_ok() {
        return Classification::Json;
    }

    if SOLIDITY_MARKERS.iter().any(|marker| text.contains(marker)) {
        Classification::Solidity
    } else {
        Classification::Unrecognized
    }
}

pub fn is_solidity_code(text: &str) -> bool {
    classify(text).is_accepted()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_is_rejected() {
        let bundle = r#"{"language":"Solidity","sources":{}}"#;
        assert_eq!(classify(bundle), Classification::Json);
        assert!(!is_solidity_code(bundle));
    }

    #[test]
    fn test_json_rejected_even_with_markers() {
        let text = r#"{"content": "pragma solidity ^0.8.0; contract A {}"}"#;
        assert_eq!(classify(text), Classification::Json);
        assert_eq!(classify(r#"["contract"]"#), Classification::Json);
        assert_eq!(classify("42"), Classification::Json);
        // f64 の範囲外の数値や対になっていないサロゲートも JSON として扱う
        assert_eq!(classify(r#"{"contract": 1e400}"#), Classification::Json);
        assert_eq!(classify(r#"{"contract": "\ud800"}"#), Classification::Json);
    }

    #[test]
    fn test_markers_accept() {
        assert!(is_solidity_code("pragma solidity ^0.8.0;\ncontract Foo {}"));
        assert!(is_solidity_code("pragma solidity >=0.4.22;"));
        assert!(is_solidity_code("library X {} // contract"));
        // "contract" は単純な部分一致
        assert!(is_solidity_code("abstractcontracts"));
    }

    #[test]
    fn test_no_marker_rejected() {
        assert_eq!(classify("library Math { }"), Classification::Unrecognized);
        assert_eq!(classify(""), Classification::Unrecognized);
        assert_eq!(classify("Contract Foo"), Classification::Unrecognized);
    }

    #[test]
    fn test_broken_json_with_marker_is_accepted() {
        assert!(is_solidity_code(r#"{"contract": "#));
    }
}
