//! ディスカバリーキー
//!
//! デプロイ時にしか決まらない値（関数名、CloudFrontのドメイン名）を
//! SSM Parameter Storeに公開する際のパラメータ名。
//!
//! 文法:
//! ```text
//! key     := "/e2e" ("/" segment)+
//! segment := [A-Za-z0-9_.-]+
//! ```
//! 先頭のセグメントは環境名、以降は構成要素のパス。

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use super::construct_path::ConstructPath;

/// キーのプレフィックス
pub const DISCOVERY_KEY_PREFIX: &str = "/e2e";

/// Parameter Storeのパラメータ名の最大長
pub const MAX_KEY_LENGTH: usize = 1011;

/// Parameter Storeの階層の最大深さ
pub const MAX_KEY_DEPTH: usize = 15;

/// ディスカバリーキーのエラー型
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryKeyError {
    /// サニタイズ後に空になったセグメント
    #[error("Segment '{segment}' of '{path}' contains no valid parameter name characters")]
    EmptySegment { path: String, segment: String },

    /// 階層が深すぎる
    #[error("Parameter name '{key}' exceeds {} levels", MAX_KEY_DEPTH)]
    TooDeep { key: String },

    /// パラメータ名が長すぎる
    #[error("Parameter name '{key}' exceeds {} characters", MAX_KEY_LENGTH)]
    TooLong { key: String },
}

/// 検証済みのディスカバリーキー
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DiscoveryKey(String);

/// パラメータ名として許可される文字かどうか
fn is_valid_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')
}

impl DiscoveryKey {
    /// 構成要素のパスからキーを作成
    ///
    /// 各セグメントから許可されない文字を取り除く。
    pub fn for_path(path: &ConstructPath) -> Result<Self, DiscoveryKeyError> {
        let mut key = String::from(DISCOVERY_KEY_PREFIX);

        for segment in path.segments() {
            let sanitized: String = segment.chars().filter(|c| is_valid_key_char(*c)).collect();
            if sanitized.is_empty() {
                return Err(DiscoveryKeyError::EmptySegment {
                    path: path.to_string(),
                    segment: segment.clone(),
                });
            }
            key.push('/');
            key.push_str(&sanitized);
        }

        // プレフィックス分を含めた階層数
        if path.segments().len() + 1 > MAX_KEY_DEPTH {
            return Err(DiscoveryKeyError::TooDeep { key });
        }
        if key.len() > MAX_KEY_LENGTH {
            return Err(DiscoveryKeyError::TooLong { key });
        }

        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DiscoveryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_for_function_path() {
        let path = ConstructPath::root("Dev").child("Api").child("SumFunction");
        let key = DiscoveryKey::for_path(&path).unwrap();
        assert_eq!(key.as_str(), "/e2e/Dev/Api/SumFunction");
    }

    #[test]
    fn test_key_for_url_path() {
        let path = ConstructPath::root("Prod")
            .child("Api")
            .child("ProductApi")
            .child("url");
        let key = DiscoveryKey::for_path(&path).unwrap();
        assert_eq!(key.to_string(), "/e2e/Prod/Api/ProductApi/url");
    }

    #[test]
    fn test_invalid_characters_are_removed() {
        let path = ConstructPath::root("Dev").child("My Api!").child("url:v1");
        let key = DiscoveryKey::for_path(&path).unwrap();
        assert_eq!(key.as_str(), "/e2e/Dev/MyApi/urlv1");
    }

    #[test]
    fn test_segment_reducing_to_empty_is_rejected() {
        let path = ConstructPath::root("Dev").child("$$$");
        let err = DiscoveryKey::for_path(&path).unwrap_err();
        assert_eq!(
            err,
            DiscoveryKeyError::EmptySegment {
                path: "Dev/$$$".to_string(),
                segment: "$$$".to_string(),
            }
        );
    }

    #[test]
    fn test_too_deep_key_is_rejected() {
        let mut path = ConstructPath::root("Dev");
        for i in 0..14 {
            path = path.child(format!("L{i}"));
        }
        // /e2e + 15セグメント = 16階層
        assert!(matches!(
            DiscoveryKey::for_path(&path),
            Err(DiscoveryKeyError::TooDeep { .. })
        ));

        let mut path = ConstructPath::root("Dev");
        for i in 0..13 {
            path = path.child(format!("L{i}"));
        }
        assert!(DiscoveryKey::for_path(&path).is_ok());
    }

    #[test]
    fn test_too_long_key_is_rejected() {
        let path = ConstructPath::root("Dev").child("a".repeat(1100));
        assert!(matches!(
            DiscoveryKey::for_path(&path),
            Err(DiscoveryKeyError::TooLong { .. })
        ));
    }

    #[test]
    fn test_key_serializes_as_plain_string() {
        let path = ConstructPath::root("Dev").child("Api");
        let key = DiscoveryKey::for_path(&path).unwrap();
        assert_eq!(serde_json::to_value(&key).unwrap(), "/e2e/Dev/Api");
    }
}
