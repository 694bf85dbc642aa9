/// デプロイ先環境の分類
///
/// 1つの環境が1つのデプロイメントユニット（スタック）に対応する。
/// 環境名は設定変数の検索キー、タグ値、ディスカバリーキーの先頭セグメントとして使われる。
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// 未知の環境名が指定された場合のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown environment '{0}'. Expected one of: Dev, Stage, Prod")]
pub struct UnknownEnvironment(pub String);

/// デプロイ先環境
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Environment {
    /// 開発環境: ローカルデバッグを優先（minifyなし、インラインのデバッグ情報）
    Dev,
    /// ステージング環境
    Stage,
    /// 本番環境
    Prod,
}

impl Environment {
    /// 全環境（定義順: Dev, Stage, Prod）
    pub const ALL: [Environment; 3] = [Environment::Dev, Environment::Stage, Environment::Prod];

    /// 環境名（"Dev" | "Stage" | "Prod"）
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Dev => "Dev",
            Environment::Stage => "Stage",
            Environment::Prod => "Prod",
        }
    }

    /// 環境変数名に使うプレフィックス（例: CDK_DEV_ACCOUNT の "DEV"）
    pub fn variable_prefix(&self) -> &'static str {
        match self {
            Environment::Dev => "DEV",
            Environment::Stage => "STAGE",
            Environment::Prod => "PROD",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = UnknownEnvironment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Dev" => Ok(Environment::Dev),
            "Stage" => Ok(Environment::Stage),
            "Prod" => Ok(Environment::Prod),
            other => Err(UnknownEnvironment(other.to_string())),
        }
    }
}
