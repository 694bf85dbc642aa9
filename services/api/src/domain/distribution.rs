//! CloudFrontディストリビューションの定義
//!
//! REST APIの前段に置くキャッシュ/エッジ配信レイヤー。

use super::construct_path::ConstructPath;
use super::rest_api::HttpMethod;

/// 1日（秒）
pub const ONE_DAY_SECS: u64 = 86_400;

/// 1年（秒）
pub const ONE_YEAR_SECS: u64 = 31_536_000;

/// キャッシュキーに含める要素の選択方法（Cookie/ヘッダー/クエリ文字列）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheKeyBehavior {
    /// 含めない
    None,
    /// すべて含める
    All,
}

impl CacheKeyBehavior {
    /// CloudFrontのビヘイビア名（`none` | `all`）
    pub fn behavior(&self) -> &'static str {
        match self {
            CacheKeyBehavior::None => "none",
            CacheKeyBehavior::All => "all",
        }
    }
}

/// キャッシュポリシー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachePolicyDefinition {
    pub id: String,
    pub cookie_behavior: CacheKeyBehavior,
    pub header_behavior: CacheKeyBehavior,
    pub query_string_behavior: CacheKeyBehavior,
    pub enable_accept_encoding_brotli: bool,
    pub enable_accept_encoding_gzip: bool,
    pub min_ttl_secs: u64,
    pub default_ttl_secs: u64,
    pub max_ttl_secs: u64,
}

/// CORS設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsDefinition {
    pub allow_credentials: bool,
    pub allow_headers: Vec<String>,
    pub allow_methods: Vec<HttpMethod>,
    pub allow_origins: Vec<String>,
    /// オリジンが返したCORSヘッダーを上書きする
    pub origin_override: bool,
}

/// レスポンスヘッダーポリシー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHeadersPolicyDefinition {
    pub id: String,
    pub cors: CorsDefinition,
}

/// オリジンに転送するメソッド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowedMethods {
    All,
}

impl AllowedMethods {
    pub fn methods(&self) -> Vec<HttpMethod> {
        match self {
            AllowedMethods::All => vec![
                HttpMethod::Get,
                HttpMethod::Head,
                HttpMethod::Options,
                HttpMethod::Put,
                HttpMethod::Patch,
                HttpMethod::Post,
                HttpMethod::Delete,
            ],
        }
    }
}

/// キャッシュするメソッド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachedMethods {
    GetHead,
}

impl CachedMethods {
    pub fn methods(&self) -> Vec<HttpMethod> {
        match self {
            CachedMethods::GetHead => vec![HttpMethod::Get, HttpMethod::Head],
        }
    }
}

/// ビューワープロトコルポリシー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerProtocolPolicy {
    RedirectToHttps,
}

impl ViewerProtocolPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewerProtocolPolicy::RedirectToHttps => "redirect-to-https",
        }
    }
}

/// デフォルトビヘイビア
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BehaviorDefinition {
    pub allowed_methods: AllowedMethods,
    pub cached_methods: CachedMethods,
    /// CloudFrontでの圧縮（オリジン側で圧縮済みなら不要）
    pub compress: bool,
    pub viewer_protocol_policy: ViewerProtocolPolicy,
}

/// ディストリビューション
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionDefinition {
    pub path: ConstructPath,
    /// オリジンのREST API
    pub origin: ConstructPath,
    /// オリジンのステージ名（オリジンパスになる）
    pub origin_stage: String,
    pub cache_policy: CachePolicyDefinition,
    pub response_headers_policy: ResponseHeadersPolicyDefinition,
    pub default_behavior: BehaviorDefinition,
}
