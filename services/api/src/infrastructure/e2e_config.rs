/// E2Eテストの接続設定
///
/// 対象環境（E2E_ENVIRONMENT）と、その環境にアクセスするための
/// AWSプロファイル/リージョン（E2E_<ENV>_PROFILE, E2E_<ENV>_REGION）を保持する。
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use thiserror::Error;

use super::config::ConfigVariables;
use crate::domain::{Environment, UnknownEnvironment};

/// AWS SDKの最大試行回数
pub const MAX_SDK_ATTEMPTS: u32 = 3;

/// 対象環境を指定する変数名
pub const E2E_ENVIRONMENT_VAR: &str = "E2E_ENVIRONMENT";

/// E2E設定のエラー型
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum E2eConfigError {
    #[error(
        "The '{0}' environment variable isn't defined. Please set it via the '.env.e2e' file in the project directory."
    )]
    MissingEnvVar(String),

    #[error(transparent)]
    UnknownEnvironment(#[from] UnknownEnvironment),
}

/// E2E接続設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct E2eConfig {
    environment: Environment,
    /// AWS SSOプロファイル名
    profile: String,
    region: String,
}

/// 環境ごとのプロファイル変数名
pub fn profile_variable(environment: Environment) -> String {
    format!("E2E_{}_PROFILE", environment.variable_prefix())
}

/// 環境ごとのリージョン変数名
pub fn region_variable(environment: Environment) -> String {
    format!("E2E_{}_REGION", environment.variable_prefix())
}

fn require(vars: &ConfigVariables, name: &str) -> Result<String, E2eConfigError> {
    vars.get(name)
        .map(str::to_string)
        .ok_or_else(|| E2eConfigError::MissingEnvVar(name.to_string()))
}

impl E2eConfig {
    /// 設定変数から読み込む
    ///
    /// `environment`を指定した場合はE2E_ENVIRONMENTより優先する。
    pub fn from_variables(
        vars: &ConfigVariables,
        environment: Option<Environment>,
    ) -> Result<Self, E2eConfigError> {
        let environment = match environment {
            Some(environment) => environment,
            None => require(vars, E2E_ENVIRONMENT_VAR)?.parse()?,
        };

        let profile = require(vars, &profile_variable(environment))?;
        let region = require(vars, &region_variable(environment))?;

        Ok(Self {
            environment,
            profile,
            region,
        })
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// プロファイルとリージョンを指定してAWS SDK設定を読み込む
    pub async fn load_sdk_config(&self) -> SdkConfig {
        aws_config::defaults(BehaviorVersion::latest())
            .profile_name(&self.profile)
            .region(Region::new(self.region.clone()))
            .retry_config(RetryConfig::standard().with_max_attempts(MAX_SDK_ATTEMPTS))
            .load()
            .await
    }
}
