//! デプロイメントユニット
//!
//! 1回の定義パスで構築され、以降は変更されない不変のリソース記述。
//! 特定のIaCバックエンドには依存せず、テンプレートへの変換は
//! `infrastructure::TemplateRenderer`の実装が担う。

use super::construct_path::ConstructPath;
use super::discovery_key::DiscoveryKey;
use super::distribution::DistributionDefinition;
use super::environment::Environment;
use super::environment_config::EnvironmentConfig;
use super::function::FunctionDefinition;
use super::rest_api::RestApiDefinition;
use super::tag::Tag;

/// ディスカバリーパラメータに公開する値
///
/// どちらもデプロイ後にしか確定しないため、参照先の構成要素パスで表す。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterValue {
    /// Lambda関数の物理名
    FunctionName(ConstructPath),
    /// ディストリビューションの公開URL（`https://<domain>`）
    DistributionUrl(ConstructPath),
}

/// ディスカバリーストアに公開するパラメータ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryParameter {
    pub path: ConstructPath,
    pub key: DiscoveryKey,
    pub value: ParameterValue,
}

/// 公開API一式（Lambda関数 + REST API + CDN + URLパラメータ）
#[derive(Debug, Clone, PartialEq)]
pub struct ApiUnit {
    pub path: ConstructPath,
    pub function: FunctionDefinition,
    pub rest_api: RestApiDefinition,
    pub distribution: DistributionDefinition,
    pub url_parameter: DiscoveryParameter,
}

/// 1環境分のデプロイメントユニット（スタック）
#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentUnit {
    pub path: ConstructPath,
    pub environment: Environment,
    pub config: EnvironmentConfig,
    /// ユニット内の全リソースに付与するタグ
    pub tags: Vec<Tag>,
    pub function: FunctionDefinition,
    pub function_parameter: DiscoveryParameter,
    pub api: ApiUnit,
}

impl DeploymentUnit {
    /// スタック名（例: `Dev-Api`）
    pub fn stack_name(&self) -> String {
        self.path.segments().join("-")
    }

    /// ユニット内の全Lambda関数
    pub fn functions(&self) -> Vec<&FunctionDefinition> {
        vec![&self.function, &self.api.function]
    }

    /// ユニット内の全ディスカバリーパラメータ
    pub fn parameters(&self) -> Vec<&DiscoveryParameter> {
        vec![&self.function_parameter, &self.api.url_parameter]
    }
}

/// アプリケーション全体（環境ごとに1ユニット）
#[derive(Debug, Clone, PartialEq)]
pub struct AppDefinition {
    units: Vec<DeploymentUnit>,
}

impl AppDefinition {
    pub fn new(units: Vec<DeploymentUnit>) -> Self {
        Self { units }
    }

    /// 定義順（Dev, Stage, Prod）のユニット
    pub fn units(&self) -> &[DeploymentUnit] {
        &self.units
    }

    /// 環境でユニットを検索
    pub fn unit(&self, environment: Environment) -> Option<&DeploymentUnit> {
        self.units.iter().find(|u| u.environment == environment)
    }
}
