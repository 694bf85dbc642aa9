/// デプロイ定義の生成（synth）
///
/// 設定変数から全環境（Dev/Stage/Prod）のデプロイメントユニットを組み立て、
/// CloudFormationテンプレートとマニフェストを出力ディレクトリに書き出す。
///
/// # 環境変数
/// - CDK_DEFAULT_ACCOUNT / CDK_DEFAULT_REGION: 共通のデプロイ先
/// - CDK_{DEV,STAGE,PROD}_{ACCOUNT,REGION}: 環境ごとの上書き
///
/// # ローカル実行
/// ```bash
/// cargo run --bin synth -- --output cdk.out
///
/// # 1環境だけ
/// cargo run --bin synth -- --output cdk.out --environment Stage
/// ```
use std::path::PathBuf;

use api::application::{AppComposer, DEFAULT_SERVICE_NAME};
use api::domain::Environment;
use api::infrastructure::{init_cli_logging, CloudAssembly, CloudFormationRenderer, ConfigVariables};
use clap::Parser;
use tracing::{error, info};

/// コマンドライン引数
#[derive(Parser, Debug)]
#[command(name = "synth")]
#[command(about = "全環境のCloudFormationテンプレートを生成")]
struct CliArgs {
    /// 出力ディレクトリ
    #[arg(long, short = 'o', default_value = "cdk.out")]
    output: PathBuf,

    /// 対象環境（省略時は全環境）
    #[arg(long, short = 'e')]
    environment: Option<Environment>,

    /// サービス名（スタックIDとAppタグになる）
    #[arg(long, default_value = DEFAULT_SERVICE_NAME)]
    service_name: String,

    /// ビルド設定ファイルのパス
    #[arg(long, default_value = "Cargo.toml")]
    type_config: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_cli_logging();

    let args = CliArgs::parse();
    let variables = ConfigVariables::from_env();

    let environments = match args.environment {
        Some(environment) => vec![environment],
        None => Environment::ALL.to_vec(),
    };

    let composer = AppComposer::new(args.service_name);
    let app = composer
        .compose_environments(&variables, &args.type_config, &environments)
        .inspect_err(|err| error!(error = %err, "デプロイ定義の構築に失敗"))?;

    let manifest = CloudAssembly::write(&args.output, &app, &CloudFormationRenderer::new())
        .inspect_err(|err| error!(error = %err, "クラウドアセンブリの出力に失敗"))?;

    for stack in &manifest.stacks {
        info!(
            stack = %stack.stack_name,
            account = %stack.account,
            region = %stack.region,
            template = %stack.template_file,
            "テンプレート出力"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let args = CliArgs::parse_from(["synth"]);
        assert_eq!(args.output, PathBuf::from("cdk.out"));
        assert_eq!(args.environment, None);
        assert_eq!(args.service_name, "api");
    }

    #[test]
    fn test_parse_environment() {
        let args = CliArgs::parse_from(["synth", "--output", "out", "--environment", "Stage"]);
        assert_eq!(args.output, PathBuf::from("out"));
        assert_eq!(args.environment, Some(Environment::Stage));
    }

    #[test]
    fn test_rejects_unknown_environment() {
        assert!(CliArgs::try_parse_from(["synth", "--environment", "Test"]).is_err());
    }
}
