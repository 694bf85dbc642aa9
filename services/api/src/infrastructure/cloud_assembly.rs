//! クラウドアセンブリの出力
//!
//! 各デプロイメントユニットのテンプレート（`<Env>-<Stack>.template.json`）と、
//! スタック一覧・関数アセット一覧を記録した`manifest.json`をディレクトリに書き出す。
//! 外部のビルド/デプロイ手順はマニフェストのビルドオプションに従ってバイナリを作る。

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use super::template::{RenderError, TemplateRenderer};
use crate::domain::{AppDefinition, BuildOptions, Tag};

/// マニフェストのファイル名
pub const MANIFEST_FILE: &str = "manifest.json";

/// マニフェストのフォーマットバージョン
pub const MANIFEST_VERSION: &str = "1";

/// クラウドアセンブリのエラー型
#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("'{path}' の書き込みに失敗: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("JSONのシリアライズに失敗: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// マニフェストのスタック情報
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StackManifest {
    pub stack_name: String,
    pub environment: String,
    pub account: String,
    pub region: String,
    pub template_file: String,
    pub tags: Vec<Tag>,
}

/// マニフェストの関数アセット情報
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetManifest {
    pub stack_name: String,
    pub binary: String,
    /// アセットバケット内のキー
    pub object_key: String,
    pub build: BuildOptions,
}

/// クラウドアセンブリのマニフェスト
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssemblyManifest {
    pub version: String,
    pub renderer: String,
    pub stacks: Vec<StackManifest>,
    pub assets: Vec<AssetManifest>,
}

/// クラウドアセンブリの書き出し
pub struct CloudAssembly;

impl CloudAssembly {
    /// テンプレートの出力ファイル名
    pub fn template_file(stack_name: &str) -> String {
        format!("{stack_name}.template.json")
    }

    /// `dir`にアセンブリを書き出してマニフェストを返す
    ///
    /// すべてのテンプレートを生成してからファイルを書き込むため、
    /// レンダリングに失敗した場合は何も書き込まれない。
    pub fn write(
        dir: &Path,
        app: &AppDefinition,
        renderer: &dyn TemplateRenderer,
    ) -> Result<AssemblyManifest, AssemblyError> {
        let mut templates = Vec::new();
        let mut stacks = Vec::new();
        let mut assets = Vec::new();

        for unit in app.units() {
            let stack_name = unit.stack_name();
            let template_file = Self::template_file(&stack_name);
            templates.push((template_file.clone(), renderer.render(unit)?));

            stacks.push(StackManifest {
                stack_name: stack_name.clone(),
                environment: unit.environment.to_string(),
                account: unit.config.account().to_string(),
                region: unit.config.region().to_string(),
                template_file,
                tags: unit.tags.clone(),
            });

            assets.extend(unit.functions().into_iter().map(|function| AssetManifest {
                stack_name: stack_name.clone(),
                binary: function.binary.clone(),
                object_key: function.asset_key(),
                build: function.build.clone(),
            }));
        }

        let manifest = AssemblyManifest {
            version: MANIFEST_VERSION.to_string(),
            renderer: renderer.name().to_string(),
            stacks,
            assets,
        };

        fs::create_dir_all(dir).map_err(|source| AssemblyError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        for (file, template) in &templates {
            write_json(&dir.join(file), template)?;
        }
        write_json(&dir.join(MANIFEST_FILE), &manifest)?;

        info!(
            dir = %dir.display(),
            stacks = manifest.stacks.len(),
            assets = manifest.assets.len(),
            "クラウドアセンブリを出力"
        );

        Ok(manifest)
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), AssemblyError> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    fs::write(path, json).map_err(|source| AssemblyError::Io {
        path: path.to_path_buf(),
        source,
    })
}
