// productハンドラー
//
// API GatewayのLambdaプロキシ統合で呼ばれ、クエリ文字列 `a`, `b` の積を返す。
// レスポンスはCloudFrontで60秒キャッシュされ、ボディのSHA-512をETagとして付与する。

use lambda_http::http::header::{
    CACHE_CONTROL, CONTENT_TYPE, ETAG, HeaderValue, IF_NONE_MATCH,
};
use lambda_http::http::{self, StatusCode};
use lambda_http::{Body, Request, RequestExt, Response};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::{ParameterError, ProductParameters, content_hash, matches_if_none_match};

/// レスポンスのCache-Control
pub const CACHE_CONTROL_VALUE: &str = "public, max-age=60";

/// クライアントエラーのレスポンスボディ
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'static str,
    message: &'a str,
}

/// 2つの数値の積を計算するハンドラー
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductHandler;

impl ProductHandler {
    pub fn new() -> Self {
        Self
    }

    /// リクエストを処理してレスポンスを生成
    ///
    /// クライアントの入力ミスはErrではなく400レスポンスとして返す。
    pub fn handle(&self, request: &Request) -> Result<Response<Body>, http::Error> {
        let query = request.query_string_parameters();
        let a = query.first("a");
        let b = query.first("b");

        info!(a = ?a, b = ?b, "リクエスト受信");

        let result = ProductParameters::from_query(a, b).and_then(|params| params.product());
        let result = match result {
            Ok(result) => result,
            Err(err) => return Self::bad_request(&err),
        };

        let body = serde_json::to_string(&result).unwrap_or_else(|_| String::from("{}"));
        let etag = content_hash(&body);

        let not_modified = request
            .headers()
            .get(IF_NONE_MATCH)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| matches_if_none_match(v, &etag));

        let builder = Response::builder()
            .header(CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL_VALUE))
            .header(ETAG, etag.as_str());

        if not_modified {
            debug!(etag = %etag, "ETag一致");
            return builder.status(StatusCode::NOT_MODIFIED).body(Body::Empty);
        }

        info!(product = result.product, "計算完了");

        builder
            .status(StatusCode::OK)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(Body::Text(body))
    }

    fn bad_request(err: &ParameterError) -> Result<Response<Body>, http::Error> {
        warn!(error = %err, "不正なクエリパラメータ");

        let message = err.to_string();
        let body = serde_json::to_string(&ErrorBody {
            error: "bad_request",
            message: &message,
        })
        .unwrap_or_else(|_| String::from("{}"));

        Response::builder()
            .status(StatusCode::BAD_REQUEST)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(Body::Text(body))
    }
}
