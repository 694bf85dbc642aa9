// E2Eシナリオの実行
//
// デプロイ済みの環境に対して、ディスカバリーパラメータから呼び出し先を取得し、
// sum関数の直接呼び出しと公開APIのproduct計算を検証する。

use thiserror::Error;
use tracing::{info, warn};

use super::api_composer::api_url_key;
use super::composition_error::CompositionError;
use super::stack_factory::{stack_path, sum_function_key};
use crate::domain::{
    ConstructPath, Environment, ProductResult, SumEvent, SumResult, content_hash,
};
use crate::infrastructure::{
    FunctionInvoker, FunctionInvokerError, ParameterStore, ParameterStoreError, ProductApi,
    ProductApiError,
};

/// sumシナリオのイベント
pub const SUM7_EVENT: &str = include_str!("../../events/sum/sum7.json");
pub const SUM12_EVENT: &str = include_str!("../../events/sum/sum12.json");

/// E2E実行のエラー型
#[derive(Debug, Error)]
pub enum E2eError {
    #[error(transparent)]
    Composition(#[from] CompositionError),

    #[error(transparent)]
    Parameter(#[from] ParameterStoreError),

    #[error(transparent)]
    Invoke(#[from] FunctionInvokerError),

    #[error(transparent)]
    Api(#[from] ProductApiError),

    /// 関数呼び出しのステータスが200以外、または関数エラー
    #[error("Invocation of '{function_name}' failed: status={status_code}, error={function_error:?}")]
    InvocationFailed {
        function_name: String,
        status_code: i32,
        function_error: Option<String>,
    },

    /// APIが成功以外のステータスを返した
    #[error("Invalid response '{body}' (status={status}).")]
    InvalidResponse { status: u16, body: String },

    /// ETagがボディのハッシュと一致しない
    #[error("ETag mismatch: expected {expected}, got {actual:?}")]
    EtagMismatch {
        expected: String,
        actual: Option<String>,
    },

    /// ペイロードを解釈できない
    #[error("Unexpected payload: {0}")]
    Payload(String),

    /// 期待値と異なる
    #[error("{scenario}: expected {expected}, got {actual}")]
    Unexpected {
        scenario: String,
        expected: f64,
        actual: f64,
    },
}

/// シナリオの結果
#[derive(Debug)]
pub struct ScenarioOutcome {
    pub name: String,
    pub result: Result<(), E2eError>,
}

/// E2Eシナリオの実行者
pub struct E2eRunner<P, F, A> {
    environment: Environment,
    service_name: String,
    parameters: P,
    invoker: F,
    api: A,
}

impl<P, F, A> E2eRunner<P, F, A>
where
    P: ParameterStore,
    F: FunctionInvoker,
    A: ProductApi,
{
    pub fn new(
        environment: Environment,
        service_name: impl Into<String>,
        parameters: P,
        invoker: F,
        api: A,
    ) -> Self {
        Self {
            environment,
            service_name: service_name.into(),
            parameters,
            invoker,
            api,
        }
    }

    fn stack(&self) -> ConstructPath {
        stack_path(
            &ConstructPath::root(self.environment.as_str()),
            &self.service_name,
        )
    }

    /// sum関数を直接呼び出す
    pub async fn calculate_sum(&self, event: &SumEvent) -> Result<SumResult, E2eError> {
        let key = sum_function_key(&self.stack())?;
        let function_name = self.parameters.get_parameter(&key).await?;

        let payload = serde_json::to_vec(event).map_err(|e| E2eError::Payload(e.to_string()))?;
        let output = self.invoker.invoke(&function_name, &payload).await?;

        if output.status_code != 200 || output.function_error.is_some() {
            return Err(E2eError::InvocationFailed {
                function_name,
                status_code: output.status_code,
                function_error: output.function_error,
            });
        }

        serde_json::from_slice(&output.payload).map_err(|e| E2eError::Payload(e.to_string()))
    }

    /// 公開APIでproductを計算する
    pub async fn calculate_product(&self, a: f64, b: f64) -> Result<ProductResult, E2eError> {
        let key = api_url_key(&self.stack())?;
        let api_url = self.parameters.get_parameter(&key).await?;

        let response = self.api.get_product(&api_url, a, b).await?;

        if !(200..300).contains(&response.status) {
            return Err(E2eError::InvalidResponse {
                status: response.status,
                body: response.body,
            });
        }

        let expected = content_hash(&response.body);
        let actual = response.etag.as_deref().map(|v| v.trim_matches('"'));
        if actual != Some(expected.as_str()) {
            return Err(E2eError::EtagMismatch {
                expected,
                actual: response.etag,
            });
        }

        serde_json::from_str(&response.body).map_err(|e| E2eError::Payload(e.to_string()))
    }

    /// 全シナリオを実行する
    ///
    /// 1つのシナリオが失敗しても残りのシナリオは実行する。
    pub async fn run_all(&self) -> Vec<ScenarioOutcome> {
        let mut outcomes = Vec::new();

        for (name, event, expected) in [
            ("sum(4, 3) = 7", SUM7_EVENT, 7.0),
            ("sum(8, 4) = 12", SUM12_EVENT, 12.0),
        ] {
            let result = self.check_sum(name, event, expected).await;
            outcomes.push(Self::record(name, result));
        }

        for (name, a, b, expected) in [
            ("product(4, 3) = 12", 4.0, 3.0, 12.0),
            ("product(8, 4) = 32", 8.0, 4.0, 32.0),
        ] {
            let result = self.check_product(name, a, b, expected).await;
            outcomes.push(Self::record(name, result));
        }

        outcomes
    }

    async fn check_sum(&self, name: &str, event: &str, expected: f64) -> Result<(), E2eError> {
        let event: SumEvent =
            serde_json::from_str(event).map_err(|e| E2eError::Payload(e.to_string()))?;
        let result = self.calculate_sum(&event).await?;
        Self::expect(name, expected, result.sum)
    }

    async fn check_product(
        &self,
        name: &str,
        a: f64,
        b: f64,
        expected: f64,
    ) -> Result<(), E2eError> {
        let result = self.calculate_product(a, b).await?;
        Self::expect(name, expected, result.product)
    }

    fn expect(name: &str, expected: f64, actual: f64) -> Result<(), E2eError> {
        if expected == actual {
            Ok(())
        } else {
            Err(E2eError::Unexpected {
                scenario: name.to_string(),
                expected,
                actual,
            })
        }
    }

    fn record(name: &str, result: Result<(), E2eError>) -> ScenarioOutcome {
        match &result {
            Ok(()) => info!(scenario = %name, "シナリオ成功"),
            Err(err) => warn!(scenario = %name, error = %err, "シナリオ失敗"),
        }
        ScenarioOutcome {
            name: name.to_string(),
            result,
        }
    }
}
