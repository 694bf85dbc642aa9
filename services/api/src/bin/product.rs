/// product Lambdaエントリポイント
///
/// API Gateway（Lambdaプロキシ統合）経由の `GET /product?a=..&b=..` を処理する。
use api::application::ProductHandler;
use api::infrastructure::{init_logging, invocation_span};
use lambda_http::{run, service_fn, Body, Error, Request, RequestExt, Response};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 構造化ログを初期化
    init_logging();

    info!("product Lambda関数を初期化");

    run(service_fn(handler)).await
}

async fn handler(request: Request) -> Result<Response<Body>, Error> {
    let span = match request.lambda_context_ref() {
        Some(context) => invocation_span(&context.request_id, &context.invoked_function_arn),
        None => invocation_span("", ""),
    };
    let _guard = span.enter();

    Ok(ProductHandler::new().handle(&request)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn request(a: &str, b: &str) -> Request {
        Request::default().with_query_string_parameters(HashMap::from([
            ("a".to_string(), a.to_string()),
            ("b".to_string(), b.to_string()),
        ]))
    }

    #[tokio::test]
    async fn test_handler_returns_product() {
        let response = handler(request("4", "3")).await.unwrap();
        assert_eq!(response.status(), 200);
        match response.body() {
            Body::Text(text) => assert_eq!(text, r#"{"product":12}"#),
            _ => panic!("予期しないBody型"),
        }
    }

    #[tokio::test]
    async fn test_handler_without_context() {
        let response = handler(request("x", "3")).await.unwrap();
        assert_eq!(response.status(), 400);
    }
}
