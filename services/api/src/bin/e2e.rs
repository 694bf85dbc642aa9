/// デプロイ済み環境に対するE2Eシナリオの実行
///
/// # 環境変数（.env.e2e）
/// - E2E_ENVIRONMENT: 対象環境（Dev/Stage/Prod、`--environment`で上書き可能）
/// - E2E_{DEV,STAGE,PROD}_PROFILE: AWS SSOプロファイル名
/// - E2E_{DEV,STAGE,PROD}_REGION: AWSリージョン
///
/// # ローカル実行
/// ```bash
/// aws sso login --profile <profile>
/// cargo run --bin e2e -- --environment Dev
/// ```
use api::application::{DEFAULT_SERVICE_NAME, E2eRunner};
use api::domain::Environment;
use api::infrastructure::{
    init_cli_logging, AwsFunctionInvoker, AwsParameterStore, ConfigVariables, E2eConfig,
    HttpProductApi,
};
use clap::Parser;
use tracing::{error, info};

/// コマンドライン引数
#[derive(Parser, Debug)]
#[command(name = "e2e")]
#[command(about = "デプロイ済み環境に対してE2Eシナリオを実行")]
struct CliArgs {
    /// 対象環境（E2E_ENVIRONMENTより優先される）
    #[arg(long, short = 'e')]
    environment: Option<Environment>,

    /// サービス名
    #[arg(long, default_value = DEFAULT_SERVICE_NAME)]
    service_name: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_cli_logging();

    let args = CliArgs::parse();
    let config = E2eConfig::from_variables(&ConfigVariables::from_env(), args.environment)
        .inspect_err(|err| error!(error = %err, "E2E設定の読み込みに失敗"))?;

    info!(
        environment = %config.environment(),
        profile = %config.profile(),
        region = %config.region(),
        "E2Eシナリオを開始"
    );

    let sdk_config = config.load_sdk_config().await;
    let runner = E2eRunner::new(
        config.environment(),
        args.service_name,
        AwsParameterStore::from_sdk_config(&sdk_config),
        AwsFunctionInvoker::from_sdk_config(&sdk_config),
        HttpProductApi::new()?,
    );

    let outcomes = runner.run_all().await;
    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();

    info!(
        passed = outcomes.len() - failed,
        failed = failed,
        "E2Eシナリオ完了"
    );

    if failed > 0 {
        return Err(format!("{failed} 件のシナリオが失敗").into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_without_environment() {
        let args = CliArgs::parse_from(["e2e"]);
        assert_eq!(args.environment, None);
        assert_eq!(args.service_name, "api");
    }

    #[test]
    fn test_parse_environment() {
        let args = CliArgs::parse_from(["e2e", "-e", "Prod"]);
        assert_eq!(args.environment, Some(Environment::Prod));
    }
}
