/// Lambdaバイナリのビルドオプション
///
/// Devはローカルデバッグ優先（minifyなし、デバッグ情報をバイナリに含める）。
/// Stage/Prodはコールドスタート短縮のため成果物を小さくする
/// （シンボルを削除し、デバッグ情報は別ファイルに分離してエラー監視ツールへアップロードする）。
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::environment::Environment;

/// デバッグ情報（ソースマップ）の出力方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMapMode {
    /// バイナリに含める
    Inline,
    /// 別ファイルに分離する
    External,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildOptions {
    /// シンボルを削除して成果物を小さくする
    pub minify: bool,
    /// デバッグ情報の出力方法
    pub source_map_mode: SourceMapMode,
    /// ビルド設定ファイルのパス
    pub type_config_path: PathBuf,
}

impl BuildOptions {
    /// 環境に応じたビルドオプションを作成
    pub fn for_environment(environment: Environment, type_config_path: impl AsRef<Path>) -> Self {
        let type_config_path = type_config_path.as_ref().to_path_buf();
        match environment {
            Environment::Dev => Self {
                minify: false,
                source_map_mode: SourceMapMode::Inline,
                type_config_path,
            },
            Environment::Stage | Environment::Prod => Self {
                minify: true,
                source_map_mode: SourceMapMode::External,
                type_config_path,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dev_favors_debugging() {
        let options = BuildOptions::for_environment(Environment::Dev, "Cargo.toml");
        assert!(!options.minify);
        assert_eq!(options.source_map_mode, SourceMapMode::Inline);
        assert_eq!(options.type_config_path, PathBuf::from("Cargo.toml"));
    }

    #[test]
    fn test_stage_and_prod_favor_small_artifacts() {
        for env in [Environment::Stage, Environment::Prod] {
            let options = BuildOptions::for_environment(env, "Cargo.toml");
            assert!(options.minify, "{env} should minify");
            assert_eq!(options.source_map_mode, SourceMapMode::External);
        }
    }

    #[test]
    fn test_serializes_camel_case() {
        let options = BuildOptions::for_environment(Environment::Prod, "services/api/Cargo.toml");
        let json = serde_json::to_value(&options).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "minify": true,
                "sourceMapMode": "external",
                "typeConfigPath": "services/api/Cargo.toml"
            })
        );
    }
}
