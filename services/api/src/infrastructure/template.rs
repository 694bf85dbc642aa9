//! テンプレートレンダラー
//!
//! ドメインのデプロイメントユニットをIaCテンプレート（JSON）に変換する境界。
//! リソース記述そのものは特定のバックエンドに依存しない。

use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::DeploymentUnit;

/// レンダリングのエラー型
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// 論理IDが空になった
    #[error("{resource_type} の論理IDが空です")]
    EmptyLogicalId { resource_type: String },

    /// 論理IDが重複した
    #[error("論理ID '{logical_id}' が重複しています")]
    DuplicateLogicalId { logical_id: String },

    /// 参照先のリソースが定義されていない
    #[error("'{path}' を参照していますが、定義されていません")]
    UnresolvedReference { path: String },
}

/// テンプレートレンダラートレイト
pub trait TemplateRenderer {
    /// バックエンド名（マニフェストに記録する）
    fn name(&self) -> &'static str;

    /// 1ユニット分のテンプレートを生成
    fn render(&self, unit: &DeploymentUnit) -> Result<Value, RenderError>;
}

/// 論理IDの重複を検出するリソースマップ
#[derive(Debug, Default)]
pub struct ResourceMap {
    resources: Map<String, Value>,
}

impl ResourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// リソースを追加（空・重複した論理IDはエラー）
    pub fn insert(&mut self, logical_id: String, resource: Value) -> Result<(), RenderError> {
        if logical_id.is_empty() {
            return Err(RenderError::EmptyLogicalId {
                resource_type: resource["Type"].as_str().unwrap_or_default().to_string(),
            });
        }
        if self.resources.contains_key(&logical_id) {
            return Err(RenderError::DuplicateLogicalId { logical_id });
        }
        self.resources.insert(logical_id, resource);
        Ok(())
    }

    pub fn contains(&self, logical_id: &str) -> bool {
        self.resources.contains_key(logical_id)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.resources)
    }
}
