//! リソースタグ
//!
//! AWSのタグで許可される文字だけを残すサニタイズ処理と、
//! サニタイズ済みのキー/値ペアを提供する。
//! 許可文字: https://docs.aws.amazon.com/tag-editor/latest/userguide/tagging.html

use serde::Serialize;
use thiserror::Error;

/// タグのエラー型
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    /// サニタイズ結果が空文字列になった
    #[error("The valid tag for '{raw}' is an empty string.")]
    Empty { raw: String },
}

/// タグとして許可される文字かどうか
fn is_valid_tag_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '_' | '.' | ':' | '/' | '=' | '+' | '@' | '-'
                // \f \n \r \t \v
                | '\u{000c}' | '\n' | '\r' | '\t' | '\u{000b}'
                | '\u{0020}'
                | '\u{00a0}'
                | '\u{1680}'
                | '\u{2000}'..='\u{200a}'
                | '\u{2028}'
                | '\u{2029}'
                | '\u{202f}'
                | '\u{205f}'
                | '\u{3000}'
                | '\u{feff}'
        )
}

/// 許可されない文字を取り除いたタグ文字列を返す
///
/// 取り除いた結果が空になる場合は`TagError::Empty`を返す。
/// 既に有効な文字列に対しては何も変更しない。
pub fn to_valid_tag(tag: &str) -> Result<String, TagError> {
    let valid_tag: String = tag.chars().filter(|c| is_valid_tag_char(*c)).collect();

    if valid_tag.is_empty() {
        return Err(TagError::Empty {
            raw: tag.to_string(),
        });
    }

    Ok(valid_tag)
}

/// サニタイズ済みのタグ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    key: String,
    value: String,
}

impl Tag {
    /// キーと値の両方をサニタイズしてタグを作成
    pub fn new(key: &str, value: &str) -> Result<Self, TagError> {
        Ok(Self {
            key: to_valid_tag(key)?,
            value: to_valid_tag(value)?,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_tag_is_unchanged() {
        assert_eq!(to_valid_tag("Valid.Tag-1").unwrap(), "Valid.Tag-1");
        assert_eq!(to_valid_tag("a_b:c/d=e+f@g").unwrap(), "a_b:c/d=e+f@g");
    }

    #[test]
    fn test_sanitizing_is_idempotent() {
        let once = to_valid_tag("Prod!#Stage$%").unwrap();
        let twice = to_valid_tag(&once).unwrap();
        assert_eq!(once, "ProdStage");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_invalid_characters_are_removed() {
        assert_eq!(to_valid_tag("api(v1)*").unwrap(), "apiv1");
        assert_eq!(to_valid_tag("日本語Dev").unwrap(), "Dev");
    }

    #[test]
    fn test_allowed_whitespace_is_kept() {
        assert_eq!(to_valid_tag("my app").unwrap(), "my app");
        assert_eq!(to_valid_tag("a\u{00a0}b").unwrap(), "a\u{00a0}b");
        assert_eq!(to_valid_tag("a\u{2005}b").unwrap(), "a\u{2005}b");
        assert_eq!(to_valid_tag("a\u{3000}b").unwrap(), "a\u{3000}b");
        assert_eq!(to_valid_tag("a\tb\nc").unwrap(), "a\tb\nc");
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let err = to_valid_tag("").unwrap_err();
        assert_eq!(err, TagError::Empty { raw: String::new() });
    }

    #[test]
    fn test_input_reducing_to_empty_is_rejected() {
        let err = to_valid_tag("!#$%^&*()").unwrap_err();
        assert_eq!(
            err.to_string(),
            "The valid tag for '!#$%^&*()' is an empty string."
        );
    }

    #[test]
    fn test_tag_new_sanitizes_key_and_value() {
        let tag = Tag::new("Environment", "Dev!").unwrap();
        assert_eq!(tag.key(), "Environment");
        assert_eq!(tag.value(), "Dev");

        assert!(Tag::new("App", "???").is_err());
        assert!(Tag::new("", "api").is_err());
    }

    #[test]
    fn test_tag_serializes_as_cloudformation_pair() {
        let tag = Tag::new("App", "api").unwrap();
        let json = serde_json::to_value(&tag).unwrap();
        assert_eq!(json, serde_json::json!({ "Key": "App", "Value": "api" }));
    }
}
