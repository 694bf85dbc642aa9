/// 環境ごとのデプロイ先の解決
///
/// アカウントとリージョンをそれぞれ2段階で検索する:
/// 1. 環境ごとの上書き変数（CDK_DEV_ACCOUNT など）
/// 2. 共通のデフォルト変数（CDK_DEFAULT_ACCOUNT など）
///
/// どちらもなければ設定エラー。黙ってデフォルト値を使うことはない。
use std::fmt;

use thiserror::Error;

use crate::domain::{Environment, EnvironmentConfig};
use crate::infrastructure::ConfigVariables;

/// 共通のデフォルトアカウント変数
pub const DEFAULT_ACCOUNT_VAR: &str = "CDK_DEFAULT_ACCOUNT";

/// 共通のデフォルトリージョン変数
pub const DEFAULT_REGION_VAR: &str = "CDK_DEFAULT_REGION";

/// 解決対象の設定項目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    Account,
    Region,
}

impl Setting {
    fn as_str(&self) -> &'static str {
        match self {
            Setting::Account => "account",
            Setting::Region => "region",
        }
    }

    fn suffix(&self) -> &'static str {
        match self {
            Setting::Account => "ACCOUNT",
            Setting::Region => "REGION",
        }
    }

    fn fallback_variable(&self) -> &'static str {
        match self {
            Setting::Account => DEFAULT_ACCOUNT_VAR,
            Setting::Region => DEFAULT_REGION_VAR,
        }
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 設定エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// 上書き変数もデフォルト変数も設定されていない
    #[error(
        "The {environment} {setting} isn't defined. Please set {variable} or {fallback} via the '.env' file in the project directory."
    )]
    Missing {
        environment: Environment,
        setting: Setting,
        variable: String,
        fallback: &'static str,
    },
}

/// 環境ごとの上書き変数名（例: CDK_STAGE_REGION）
pub fn override_variable(environment: Environment, setting: Setting) -> String {
    format!("CDK_{}_{}", environment.variable_prefix(), setting.suffix())
}

/// 設定変数からデプロイ先を解決する
#[derive(Debug, Clone, Copy)]
pub struct EnvironmentResolver<'a> {
    variables: &'a ConfigVariables,
}

impl<'a> EnvironmentResolver<'a> {
    pub fn new(variables: &'a ConfigVariables) -> Self {
        Self { variables }
    }

    /// 環境のアカウントとリージョンを解決
    pub fn resolve(&self, environment: Environment) -> Result<EnvironmentConfig, ConfigError> {
        let account = self.lookup(environment, Setting::Account)?;
        let region = self.lookup(environment, Setting::Region)?;
        Ok(EnvironmentConfig::new(account, region))
    }

    fn lookup(&self, environment: Environment, setting: Setting) -> Result<String, ConfigError> {
        let variable = override_variable(environment, setting);
        let fallback = setting.fallback_variable();

        self.variables
            .get(&variable)
            .or_else(|| self.variables.get(fallback))
            .map(str::to_string)
            .ok_or(ConfigError::Missing {
                environment,
                setting,
                variable,
                fallback,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults_only() -> ConfigVariables {
        ConfigVariables::from_pairs([
            ("CDK_DEFAULT_ACCOUNT", "012345678901"),
            ("CDK_DEFAULT_REGION", "us-east-1"),
        ])
    }

    fn overrides_only() -> ConfigVariables {
        ConfigVariables::from_pairs([
            ("CDK_DEV_ACCOUNT", "123456789010"),
            ("CDK_DEV_REGION", "eu-west-1"),
            ("CDK_STAGE_ACCOUNT", "123456789011"),
            ("CDK_STAGE_REGION", "eu-west-2"),
            ("CDK_PROD_ACCOUNT", "123456789012"),
            ("CDK_PROD_REGION", "eu-west-3"),
        ])
    }

    #[test]
    fn test_override_variable_names() {
        assert_eq!(
            override_variable(Environment::Dev, Setting::Account),
            "CDK_DEV_ACCOUNT"
        );
        assert_eq!(
            override_variable(Environment::Stage, Setting::Region),
            "CDK_STAGE_REGION"
        );
        assert_eq!(
            override_variable(Environment::Prod, Setting::Account),
            "CDK_PROD_ACCOUNT"
        );
    }

    #[test]
    fn test_defaults_apply_to_every_environment() {
        let vars = defaults_only();
        let resolver = EnvironmentResolver::new(&vars);

        for env in Environment::ALL {
            let config = resolver.resolve(env).unwrap();
            assert_eq!(config, EnvironmentConfig::new("012345678901", "us-east-1"));
        }
    }

    #[test]
    fn test_overrides_are_used_per_environment() {
        let vars = overrides_only();
        let resolver = EnvironmentResolver::new(&vars);

        assert_eq!(
            resolver.resolve(Environment::Dev).unwrap(),
            EnvironmentConfig::new("123456789010", "eu-west-1")
        );
        assert_eq!(
            resolver.resolve(Environment::Stage).unwrap(),
            EnvironmentConfig::new("123456789011", "eu-west-2")
        );
        assert_eq!(
            resolver.resolve(Environment::Prod).unwrap(),
            EnvironmentConfig::new("123456789012", "eu-west-3")
        );
    }

    #[test]
    fn test_overrides_take_precedence_over_defaults() {
        let vars = defaults_only()
            .with("CDK_STAGE_ACCOUNT", "999999999999")
            .with("CDK_PROD_REGION", "ap-northeast-1");
        let resolver = EnvironmentResolver::new(&vars);

        assert_eq!(
            resolver.resolve(Environment::Dev).unwrap(),
            EnvironmentConfig::new("012345678901", "us-east-1")
        );
        assert_eq!(
            resolver.resolve(Environment::Stage).unwrap(),
            EnvironmentConfig::new("999999999999", "us-east-1")
        );
        assert_eq!(
            resolver.resolve(Environment::Prod).unwrap(),
            EnvironmentConfig::new("012345678901", "ap-northeast-1")
        );
    }

    #[test]
    fn test_missing_account() {
        let vars = overrides_only().without("CDK_DEV_ACCOUNT");
        let err = EnvironmentResolver::new(&vars)
            .resolve(Environment::Dev)
            .unwrap_err();

        assert_eq!(
            err,
            ConfigError::Missing {
                environment: Environment::Dev,
                setting: Setting::Account,
                variable: "CDK_DEV_ACCOUNT".to_string(),
                fallback: "CDK_DEFAULT_ACCOUNT",
            }
        );
        assert_eq!(
            err.to_string(),
            "The Dev account isn't defined. Please set CDK_DEV_ACCOUNT or CDK_DEFAULT_ACCOUNT via the '.env' file in the project directory."
        );
    }

    #[test]
    fn test_missing_region() {
        let vars = overrides_only().without("CDK_PROD_REGION");
        let err = EnvironmentResolver::new(&vars)
            .resolve(Environment::Prod)
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "The Prod region isn't defined. Please set CDK_PROD_REGION or CDK_DEFAULT_REGION via the '.env' file in the project directory."
        );
    }

    #[test]
    fn test_blank_override_falls_back_to_default() {
        let vars = defaults_only().with("CDK_DEV_ACCOUNT", "");
        let config = EnvironmentResolver::new(&vars)
            .resolve(Environment::Dev)
            .unwrap();
        assert_eq!(config.account(), "012345678901");
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let vars = overrides_only();
        let resolver = EnvironmentResolver::new(&vars);
        assert_eq!(
            resolver.resolve(Environment::Stage),
            resolver.resolve(Environment::Stage)
        );
    }
}
