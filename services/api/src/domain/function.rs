// Lambda関数の定義
//
// 全関数に共通のデフォルト値（ランタイム、メモリ、タイムアウト、トレーシング、
// 環境変数）はここで決め、各スタックは関数ごとの差分だけを指定する。

use std::collections::BTreeMap;

use super::build_options::BuildOptions;
use super::construct_path::ConstructPath;
use super::environment::Environment;

/// カスタムランタイム（Rustバイナリ用）
pub const DEFAULT_RUNTIME: &str = "provided.al2023";

/// カスタムランタイムのハンドラー名（バイナリ名は常にbootstrap）
pub const DEFAULT_HANDLER: &str = "bootstrap";

/// デフォルトのメモリサイズ（MB）
pub const DEFAULT_MEMORY_SIZE_MB: u32 = 256;

/// デフォルトのタイムアウト（秒）
pub const DEFAULT_TIMEOUT_SECS: u32 = 10;

/// CPUアーキテクチャ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Architecture {
    Arm64,
}

impl Architecture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Architecture::Arm64 => "arm64",
        }
    }
}

/// X-Rayトレーシングモード
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracingMode {
    Active,
}

impl TracingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TracingMode::Active => "Active",
        }
    }
}

/// Lambda関数の定義
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDefinition {
    /// 構成要素のパス
    pub path: ConstructPath,
    /// 関数の説明
    pub description: String,
    /// ビルド対象のバイナリ名（`src/bin/<binary>.rs`）
    pub binary: String,
    pub runtime: String,
    pub handler: String,
    pub architecture: Architecture,
    pub memory_size_mb: u32,
    pub timeout_secs: u32,
    pub tracing: TracingMode,
    /// 関数の環境変数
    pub environment: BTreeMap<String, String>,
    /// ビルドオプション
    pub build: BuildOptions,
}

impl FunctionDefinition {
    /// 共通のデフォルト値で関数を定義
    pub fn with_defaults(
        path: ConstructPath,
        binary: impl Into<String>,
        description: impl Into<String>,
        environment: Environment,
        service_name: &str,
        build: &BuildOptions,
    ) -> Self {
        Self {
            path,
            description: description.into(),
            binary: binary.into(),
            runtime: DEFAULT_RUNTIME.to_string(),
            handler: DEFAULT_HANDLER.to_string(),
            architecture: Architecture::Arm64,
            memory_size_mb: DEFAULT_MEMORY_SIZE_MB,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            tracing: TracingMode::Active,
            environment: default_environment_variables(environment, service_name),
            build: build.clone(),
        }
    }

    /// アセットバケット内のコードのキー
    pub fn asset_key(&self) -> String {
        format!("{}/bootstrap.zip", self.binary)
    }
}

/// 関数に渡す共通の環境変数
fn default_environment_variables(
    environment: Environment,
    service_name: &str,
) -> BTreeMap<String, String> {
    let log_level = match environment {
        Environment::Dev => "debug",
        Environment::Stage | Environment::Prod => "info",
    };

    BTreeMap::from([
        ("ENVIRONMENT".to_string(), environment.to_string()),
        ("SERVICE_NAME".to_string(), service_name.to_string()),
        ("RUST_LOG".to_string(), log_level.to_string()),
    ])
}
