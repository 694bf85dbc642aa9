// 公開APIクライアント（E2E用）
//
// CloudFront経由で `GET /product?a=..&b=..` を呼び出す。
// 一時的なエラーは指数バックオフで最大3回再試行する。

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::ETAG;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use thiserror::Error;
use tracing::{debug, error, instrument};
use url::Url;

/// 最大再試行回数
const MAX_RETRIES: u32 = 3;

/// リクエストタイムアウト（秒）
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// 接続タイムアウト（秒）
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// APIクライアントのエラー型
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductApiError {
    /// ベースURLが不正
    #[error("不正なURL: {0}")]
    InvalidUrl(String),

    /// クライアントの構築に失敗
    #[error("HTTPクライアントの構築に失敗: {0}")]
    ClientBuild(String),

    /// ネットワークエラー
    #[error("ネットワークエラー: {0}")]
    NetworkError(String),

    /// 再試行回数超過
    #[error("再試行回数超過: {0}")]
    RetryExhausted(String),
}

/// `GET /product` のレスポンス
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductResponse {
    pub status: u16,
    pub etag: Option<String>,
    pub body: String,
}

/// 公開API呼び出しトレイト（テスト用の抽象化）
#[async_trait]
pub trait ProductApi: Send + Sync {
    /// `base_url`のAPIで`a * b`を計算する
    async fn get_product(
        &self,
        base_url: &str,
        a: f64,
        b: f64,
    ) -> Result<ProductResponse, ProductApiError>;
}

/// `{base_url}/product?a=..&b=..` を組み立てる
pub fn product_url(base_url: &str, a: f64, b: f64) -> Result<Url, ProductApiError> {
    let mut url =
        Url::parse(base_url).map_err(|e| ProductApiError::InvalidUrl(format!("{base_url}: {e}")))?;

    url.path_segments_mut()
        .map_err(|_| ProductApiError::InvalidUrl(base_url.to_string()))?
        .pop_if_empty()
        .push("product");

    url.query_pairs_mut()
        .append_pair("a", &a.to_string())
        .append_pair("b", &b.to_string());

    Ok(url)
}

/// reqwestを使用した実装
#[derive(Clone)]
pub struct HttpProductApi {
    /// HTTPクライアント（再試行ミドルウェア付き）
    client: ClientWithMiddleware,
}

impl std::fmt::Debug for HttpProductApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProductApi").finish_non_exhaustive()
    }
}

impl HttpProductApi {
    pub fn new() -> Result<Self, ProductApiError> {
        let base_client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ProductApiError::ClientBuild(e.to_string()))?;

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(MAX_RETRIES);

        let client = ClientBuilder::new(base_client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self { client })
    }
}

#[async_trait]
impl ProductApi for HttpProductApi {
    #[instrument(skip(self))]
    async fn get_product(
        &self,
        base_url: &str,
        a: f64,
        b: f64,
    ) -> Result<ProductResponse, ProductApiError> {
        let url = product_url(base_url, a, b)?;
        debug!(url = %url, "productリクエスト");

        let response = self.client.get(url).send().await.map_err(|e| {
            error!(error = %e, "productリクエスト失敗");
            if e.is_timeout() || e.is_connect() {
                ProductApiError::NetworkError(e.to_string())
            } else {
                ProductApiError::RetryExhausted(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let etag = response
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
            .await
            .map_err(|e| ProductApiError::NetworkError(e.to_string()))?;

        Ok(ProductResponse { status, etag, body })
    }
}
