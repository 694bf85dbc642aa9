/// デプロイ定義の構築エラー
///
/// いずれのエラーも定義パス全体を中断する（部分的なスタックは返さない）。
use thiserror::Error;

use super::environment_resolver::ConfigError;
use crate::domain::{DiscoveryKeyError, Environment, TagError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositionError {
    /// 設定変数が不足している
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// 解決済みの設定に空のフィールドがある
    #[error("The {environment} {field} is empty.")]
    IncompleteConfig {
        environment: Environment,
        field: &'static str,
    },

    /// タグ値が空になった
    #[error(transparent)]
    Tag(#[from] TagError),

    /// ディスカバリーキーを作れない
    #[error(transparent)]
    DiscoveryKey(#[from] DiscoveryKeyError),

    /// サービス名が空（スタック名に使える文字が残らない場合を含む）
    #[error("The service name must contain at least one of [A-Za-z0-9-].")]
    EmptyServiceName,

    /// 同じ環境が複数回指定された
    #[error("The {0} environment is listed more than once.")]
    DuplicateEnvironment(Environment),
}
