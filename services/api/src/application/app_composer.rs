// アプリケーション全体の定義
//
// Dev → Stage → Prod の順に、設定の解決・ビルドオプションの決定・スタックの作成を行う。
// 最初のエラーで中断し、部分的なアプリケーションは返さない。

use std::path::{Path, PathBuf};

use tracing::info;

use super::composition_error::CompositionError;
use super::environment_resolver::EnvironmentResolver;
use super::stack_factory::StackFactory;
use crate::domain::{AppDefinition, BuildOptions, ConstructPath, Environment};
use crate::infrastructure::ConfigVariables;

/// デフォルトのサービス名
pub const DEFAULT_SERVICE_NAME: &str = "api";

/// 全環境分のデプロイメントユニットを組み立てる
#[derive(Debug, Clone)]
pub struct AppComposer {
    factory: StackFactory,
}

impl Default for AppComposer {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE_NAME)
    }
}

impl AppComposer {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            factory: StackFactory::new(service_name),
        }
    }

    /// 全環境を定義する
    pub fn compose(
        &self,
        variables: &ConfigVariables,
        type_config_path: impl AsRef<Path>,
    ) -> Result<AppDefinition, CompositionError> {
        self.compose_environments(variables, type_config_path, &Environment::ALL)
    }

    /// 指定した環境だけを定義する（順序は引数のまま）
    pub fn compose_environments(
        &self,
        variables: &ConfigVariables,
        type_config_path: impl AsRef<Path>,
        environments: &[Environment],
    ) -> Result<AppDefinition, CompositionError> {
        // 1環境につき1ユニット
        for (i, environment) in environments.iter().enumerate() {
            if environments[..i].contains(environment) {
                return Err(CompositionError::DuplicateEnvironment(*environment));
            }
        }

        let resolver = EnvironmentResolver::new(variables);
        let type_config_path: PathBuf = type_config_path.as_ref().to_path_buf();

        let units = environments
            .iter()
            .map(|&environment| {
                let config = resolver.resolve(environment)?;
                let build = BuildOptions::for_environment(environment, &type_config_path);
                let stage = ConstructPath::root(environment.as_str());
                self.factory.create(&stage, environment, &config, &build)
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            service = %self.factory.service_name(),
            stacks = units.len(),
            "アプリケーションを定義"
        );

        Ok(AppDefinition::new(units))
    }
}
