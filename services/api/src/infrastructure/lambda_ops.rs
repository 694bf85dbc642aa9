//! Lambda操作モジュール
//!
//! E2Eテストで使用するLambda関数の同期呼び出しを提供する。

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_lambda::Client as LambdaClient;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::{InvocationType, LogType};
use thiserror::Error;
use tracing::{debug, error};

/// Lambda操作のエラー型
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FunctionInvokerError {
    /// AWS SDK エラー
    #[error("AWS Lambda APIエラー: {0}")]
    AwsSdkError(String),
}

/// 同期呼び出しの結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationOutput {
    /// 呼び出しのHTTPステータスコード（成功時は200）
    pub status_code: i32,
    /// 関数内でエラーが発生した場合のエラー種別
    pub function_error: Option<String>,
    /// レスポンスペイロード
    pub payload: Vec<u8>,
}

impl InvocationOutput {
    /// 成功結果を作成
    pub fn success(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            status_code: 200,
            function_error: None,
            payload: payload.into(),
        }
    }
}

/// Lambda呼び出しトレイト（テスト用の抽象化）
#[async_trait]
pub trait FunctionInvoker: Send + Sync {
    /// 関数をRequestResponseで呼び出す（ログの末尾は取得しない）
    async fn invoke(
        &self,
        function_name: &str,
        payload: &[u8],
    ) -> Result<InvocationOutput, FunctionInvokerError>;
}

/// 実際のAWS Lambda SDKを使用した実装
pub struct AwsFunctionInvoker {
    client: LambdaClient,
}

impl AwsFunctionInvoker {
    pub fn new(client: LambdaClient) -> Self {
        Self { client }
    }

    /// 読み込み済みのSDK設定からクライアントを作成
    pub fn from_sdk_config(config: &SdkConfig) -> Self {
        Self::new(LambdaClient::new(config))
    }
}

#[async_trait]
impl FunctionInvoker for AwsFunctionInvoker {
    async fn invoke(
        &self,
        function_name: &str,
        payload: &[u8],
    ) -> Result<InvocationOutput, FunctionInvokerError> {
        debug!(function_name = %function_name, "Lambda関数を呼び出し");

        let output = self
            .client
            .invoke()
            .function_name(function_name)
            .invocation_type(InvocationType::RequestResponse)
            .log_type(LogType::None)
            .payload(Blob::new(payload))
            .send()
            .await
            .map_err(|err| {
                error!(function_name = %function_name, error = %err, "Lambda呼び出し失敗");
                FunctionInvokerError::AwsSdkError(err.to_string())
            })?;

        Ok(InvocationOutput {
            status_code: output.status_code(),
            function_error: output.function_error().map(str::to_string),
            payload: output
                .payload()
                .map(|blob| blob.as_ref().to_vec())
                .unwrap_or_default(),
        })
    }
}
