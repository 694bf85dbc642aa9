// 1環境分のデプロイメントユニット（スタック）の構築
//
// 設定の検証 → sum関数 → 関数名のディスカバリーパラメータ → API一式 → タグ
// の順で組み立てる。設定に不備があれば何も定義せずにエラーを返す。

use tracing::{debug, info};

use super::api_composer::ApiComposer;
use super::composition_error::CompositionError;
use crate::domain::{
    BuildOptions, ConstructPath, DeploymentUnit, DiscoveryKey, DiscoveryParameter, Environment,
    EnvironmentConfig, FunctionDefinition, ParameterValue, Tag,
};

/// sum関数の構成要素ID
pub const SUM_FUNCTION_ID: &str = "SumFunction";

/// スタックIDを作成（例: `api` → `Api`）
///
/// スタック名に使えない文字（英数字と`-`以外）は取り除き、先頭を大文字にする。
pub fn stack_id(service_name: &str) -> String {
    let cleaned: String = service_name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    let mut chars = cleaned.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// スタックのパス（例: `Dev/Api`）
pub fn stack_path(stage: &ConstructPath, service_name: &str) -> ConstructPath {
    stage.child(stack_id(service_name))
}

/// sum関数名のディスカバリーキー（例: `/e2e/Dev/Api/SumFunction`）
pub fn sum_function_key(stack: &ConstructPath) -> Result<DiscoveryKey, CompositionError> {
    Ok(DiscoveryKey::for_path(&stack.child(SUM_FUNCTION_ID))?)
}

/// デプロイメントユニットを作成する
#[derive(Debug, Clone)]
pub struct StackFactory {
    service_name: String,
}

impl StackFactory {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// `stage`の下に1環境分のスタックを構築
    pub fn create(
        &self,
        stage: &ConstructPath,
        environment: Environment,
        config: &EnvironmentConfig,
        build: &BuildOptions,
    ) -> Result<DeploymentUnit, CompositionError> {
        // 何かを定義する前に検証する
        if let Some(field) = config.first_missing_field() {
            return Err(CompositionError::IncompleteConfig { environment, field });
        }
        if stack_id(&self.service_name).is_empty() {
            return Err(CompositionError::EmptyServiceName);
        }

        let path = stack_path(stage, &self.service_name);

        let function = FunctionDefinition::with_defaults(
            path.child(SUM_FUNCTION_ID),
            "sum",
            "Calculates the sum of 2 numbers.",
            environment,
            &self.service_name,
            build,
        );

        // 関数名はデプロイ時に決まるため、E2Eテスト用に公開する
        let function_parameter = DiscoveryParameter {
            path: path.child("SumFunctionParameter"),
            key: sum_function_key(&path)?,
            value: ParameterValue::FunctionName(function.path.clone()),
        };

        let api = ApiComposer::new().compose(&path, environment, &self.service_name, build)?;

        let tags = vec![
            Tag::new("Environment", environment.as_str())?,
            Tag::new("App", &self.service_name)?,
        ];

        let unit = DeploymentUnit {
            path,
            environment,
            config: config.clone(),
            tags,
            function,
            function_parameter,
            api,
        };

        info!(
            environment = %environment,
            stack = %unit.stack_name(),
            account = %config.account(),
            region = %config.region(),
            "スタックを定義"
        );
        debug!(
            function_key = %unit.function_parameter.key,
            url_key = %unit.api.url_parameter.key,
            "ディスカバリーパラメータ"
        );

        Ok(unit)
    }
}
