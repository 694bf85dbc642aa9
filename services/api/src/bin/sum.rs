/// sum Lambdaエントリポイント
///
/// JSONイベント `{"a": 4, "b": 3}` を受け取り、`{"sum": 7}` を返す。
///
/// # ローカル実行
/// ```bash
/// cargo lambda watch
/// cargo lambda invoke sum --data-file events/sum/sum7.json
/// ```
use api::application::SumHandler;
use api::domain::{SumEvent, SumResult};
use api::infrastructure::{init_logging, invocation_span};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 構造化ログを初期化
    init_logging();

    info!("sum Lambda関数を初期化");

    lambda_runtime::run(service_fn(handler)).await
}

async fn handler(event: LambdaEvent<SumEvent>) -> Result<SumResult, Error> {
    let (payload, context) = event.into_parts();

    let span = invocation_span(&context.request_id, &context.invoked_function_arn);
    let _guard = span.enter();

    Ok(SumHandler::new().handle(payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lambda_runtime::Context;

    #[tokio::test]
    async fn test_handler_returns_sum() {
        let event = LambdaEvent::new(SumEvent { a: 4.0, b: 3.0 }, Context::default());
        let result = handler(event).await.unwrap();
        assert_eq!(serde_json::to_string(&result).unwrap(), r#"{"sum":7}"#);
    }

    #[tokio::test]
    async fn test_handler_with_fixture() {
        let payload: SumEvent =
            serde_json::from_str(include_str!("../../events/sum/sum12.json")).unwrap();
        let result = handler(LambdaEvent::new(payload, Context::default()))
            .await
            .unwrap();
        assert_eq!(result.sum, 12.0);
    }
}
