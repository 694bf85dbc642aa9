//! SSM Parameter Store操作モジュール
//!
//! E2Eテストで使用するディスカバリーパラメータの読み取りを提供する。
//! 関数名やAPIのURLはデプロイ時にしか決まらないため、スタックが
//! `/e2e/<Env>/...` に公開した値をここから取得する。

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_ssm::Client as SsmClient;
use thiserror::Error;
use tracing::{debug, error};

use crate::domain::DiscoveryKey;

/// パラメータ取得のエラー型
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterStoreError {
    /// AWS SDK エラー
    #[error("AWS SSM APIエラー: {0}")]
    AwsSdkError(String),
    /// パラメータに値がない
    #[error("パラメータ '{0}' に値がありません")]
    EmptyValue(String),
}

/// パラメータ読み取りトレイト（テスト用の抽象化）
#[async_trait]
pub trait ParameterStore: Send + Sync {
    /// ディスカバリーキーの値を取得する
    async fn get_parameter(&self, key: &DiscoveryKey) -> Result<String, ParameterStoreError>;
}

/// 実際のAWS SSM SDKを使用した実装
pub struct AwsParameterStore {
    client: SsmClient,
}

impl AwsParameterStore {
    pub fn new(client: SsmClient) -> Self {
        Self { client }
    }

    /// 読み込み済みのSDK設定からクライアントを作成
    pub fn from_sdk_config(config: &SdkConfig) -> Self {
        Self::new(SsmClient::new(config))
    }
}

#[async_trait]
impl ParameterStore for AwsParameterStore {
    async fn get_parameter(&self, key: &DiscoveryKey) -> Result<String, ParameterStoreError> {
        debug!(name = %key, "パラメータ取得");

        let output = self
            .client
            .get_parameter()
            .name(key.as_str())
            .send()
            .await
            .map_err(|err| {
                error!(name = %key, error = %err, "パラメータ取得失敗");
                ParameterStoreError::AwsSdkError(err.to_string())
            })?;

        output
            .parameter()
            .and_then(|p| p.value())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ParameterStoreError::EmptyValue(key.to_string()))
    }
}
