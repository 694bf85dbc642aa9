/// レスポンスボディのコンテンツハッシュ
///
/// ETagとして使う。SHA-512ダイジェストをパディングなしのbase64urlで表現する。
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use sha2::{Digest, Sha512};

/// ボディのコンテンツハッシュを計算
pub fn content_hash(body: &str) -> String {
    let digest = Sha512::digest(body.as_bytes());
    URL_SAFE_NO_PAD.encode(digest)
}

/// If-None-MatchヘッダーがETagに一致するかどうか
///
/// カンマ区切りの複数指定、弱いバリデーター（`W/`）、引用符、`*`を受け付ける。
pub fn matches_if_none_match(if_none_match: &str, etag: &str) -> bool {
    if_none_match.split(',').map(str::trim).any(|candidate| {
        if candidate == "*" {
            return true;
        }
        let candidate = candidate.strip_prefix("W/").unwrap_or(candidate);
        candidate.trim_matches('"') == etag
    })
}
