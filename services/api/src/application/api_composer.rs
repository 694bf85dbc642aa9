// 公開API一式の構築
//
// product関数、REST API、CloudFrontディストリビューション、リクエスト検証、
// /productリソース、ドキュメント、URLのディスカバリーパラメータを
// 固定の順序で組み立てる。ここではI/Oは発生せず、不変の記述を返すだけ。

use tracing::debug;

use super::composition_error::CompositionError;
use crate::domain::distribution::{
    AllowedMethods, BehaviorDefinition, CacheKeyBehavior, CachePolicyDefinition, CachedMethods,
    CorsDefinition, ONE_DAY_SECS, ONE_YEAR_SECS, ResponseHeadersPolicyDefinition,
    ViewerProtocolPolicy,
};
use crate::domain::rest_api::{
    ApiResourceDefinition, DocumentationLocation, DocumentationPart, EndpointType, HttpMethod,
    LoggingLevel, MethodDefinition, MethodResponse, ModelDefinition, QueryParameter,
    RequestValidatorDefinition, StageDefinition,
};
use crate::domain::{
    ApiUnit, BuildOptions, ConstructPath, DiscoveryKey, DiscoveryParameter,
    DistributionDefinition, Environment, FunctionDefinition, ParameterValue, RestApiDefinition,
};

/// API一式の構成要素ID
pub const API_CONSTRUCT_ID: &str = "ProductApi";

/// productリソースのパス
pub const PRODUCT_PATH_PART: &str = "product";

/// デフォルトステージ名
pub const STAGE_NAME: &str = "default";

/// 圧縮するペイロードの最小サイズ（1 KiB）
pub const MINIMUM_COMPRESSION_SIZE: u32 = 1024;

const PARAMETER_VALIDATOR_ID: &str = "ParameterRequestValidator";
const RESPONSE_MODEL_ID: &str = "ProductGetResponseModel";

/// URLのディスカバリーキーの末尾セグメント
const URL_KEY_SEGMENT: &str = "url";

/// API一式のパス
pub fn api_path(scope: &ConstructPath) -> ConstructPath {
    scope.child(API_CONSTRUCT_ID)
}

/// 公開URLのディスカバリーキー（例: `/e2e/Dev/Api/ProductApi/url`）
pub fn api_url_key(scope: &ConstructPath) -> Result<DiscoveryKey, CompositionError> {
    Ok(DiscoveryKey::for_path(&api_path(scope).child(URL_KEY_SEGMENT))?)
}

/// 公開API一式を組み立てる
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiComposer;

impl ApiComposer {
    pub fn new() -> Self {
        Self
    }

    /// `scope`の下にAPI一式を構築
    pub fn compose(
        &self,
        scope: &ConstructPath,
        environment: Environment,
        service_name: &str,
        build: &BuildOptions,
    ) -> Result<ApiUnit, CompositionError> {
        let path = api_path(scope);

        // 1. Lambda関数
        let function = self.create_function(&path, environment, service_name, build);

        // 2. REST API（リソースツリーは5で追加）
        let mut rest_api = self.create_rest_api(&path);

        // 3. CloudFrontディストリビューション
        let distribution = self.create_distribution(&path, &rest_api);

        // 4. パラメータ検証用のリクエストバリデーター（1つだけ）
        rest_api.request_validators.push(RequestValidatorDefinition {
            id: PARAMETER_VALIDATOR_ID.to_string(),
            validate_request_body: false,
            validate_request_parameters: true,
        });

        // 5. /product リソース
        let (model, resource) = self.create_product_routes(&function);
        rest_api.models.push(model);
        rest_api.resources.push(resource);

        // 6. ドキュメント
        rest_api.documentation = self.create_documentation();

        // 7. 公開URLのディスカバリーパラメータ
        //    ドメイン名はデプロイ後にしか決まらず、環境ごとに異なるためE2E用に公開する
        let url_parameter = DiscoveryParameter {
            path: path.child("UrlParameter"),
            key: api_url_key(scope)?,
            value: ParameterValue::DistributionUrl(distribution.path.clone()),
        };

        debug!(
            path = %path,
            url_key = %url_parameter.key,
            "API一式を構築"
        );

        Ok(ApiUnit {
            path,
            function,
            rest_api,
            distribution,
            url_parameter,
        })
    }

    fn create_function(
        &self,
        path: &ConstructPath,
        environment: Environment,
        service_name: &str,
        build: &BuildOptions,
    ) -> FunctionDefinition {
        FunctionDefinition::with_defaults(
            path.child("Function"),
            "product",
            "Calculates the product of 2 numbers behind the REST API.",
            environment,
            service_name,
            build,
        )
    }

    fn create_rest_api(&self, path: &ConstructPath) -> RestApiDefinition {
        RestApiDefinition {
            path: path.child("RestApi"),
            name: API_CONSTRUCT_ID.to_string(),
            endpoint_type: EndpointType::Regional,
            minimum_compression_size: MINIMUM_COMPRESSION_SIZE,
            cloud_watch_role: true,
            stage: StageDefinition {
                name: STAGE_NAME.to_string(),
                logging_level: LoggingLevel::Info,
                tracing_enabled: true,
            },
            request_validators: Vec::new(),
            models: Vec::new(),
            resources: Vec::new(),
            documentation: Vec::new(),
        }
    }

    fn create_distribution(
        &self,
        path: &ConstructPath,
        rest_api: &RestApiDefinition,
    ) -> DistributionDefinition {
        let cache_policy = CachePolicyDefinition {
            id: "CachePolicy".to_string(),
            cookie_behavior: CacheKeyBehavior::None,
            header_behavior: CacheKeyBehavior::None,
            query_string_behavior: CacheKeyBehavior::All,
            enable_accept_encoding_brotli: true,
            enable_accept_encoding_gzip: true,
            min_ttl_secs: 0,
            default_ttl_secs: ONE_DAY_SECS,
            max_ttl_secs: ONE_YEAR_SECS,
        };

        // CORSの単純リクエスト
        // https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS#simple_requests
        let response_headers_policy = ResponseHeadersPolicyDefinition {
            id: "ResponseHeadersPolicy".to_string(),
            cors: CorsDefinition {
                allow_credentials: false,
                allow_headers: ["Accept", "Accept-Language", "Content-Language", "Content-Type", "Range"]
                    .into_iter()
                    .map(String::from)
                    .collect(),
                allow_methods: vec![HttpMethod::Get, HttpMethod::Head, HttpMethod::Post],
                allow_origins: vec!["*".to_string()],
                origin_override: false,
            },
        };

        DistributionDefinition {
            path: path.child("Distribution"),
            origin: rest_api.path.clone(),
            origin_stage: rest_api.stage.name.clone(),
            cache_policy,
            response_headers_policy,
            default_behavior: BehaviorDefinition {
                allowed_methods: AllowedMethods::All,
                cached_methods: CachedMethods::GetHead,
                // API Gatewayで圧縮済み
                compress: false,
                viewer_protocol_policy: ViewerProtocolPolicy::RedirectToHttps,
            },
        }
    }

    /// GET /product とそのレスポンスモデル
    ///
    /// リクエストパラメータはリクエストごとに検証されるが、レスポンスモデルは
    /// OpenAPIエクスポート用の宣言でレスポンスの検証には使われない。
    fn create_product_routes(
        &self,
        function: &FunctionDefinition,
    ) -> (ModelDefinition, ApiResourceDefinition) {
        let model = ModelDefinition {
            id: RESPONSE_MODEL_ID.to_string(),
            content_type: "application/json".to_string(),
            schema: serde_json::json!({
                "$schema": "http://json-schema.org/draft-04/schema#",
                "title": "ProductGetResponse",
                "type": "object",
                "properties": {
                    "product": { "type": "number" }
                },
                "required": ["product"],
                "additionalProperties": false
            }),
        };

        let method = MethodDefinition {
            http_method: HttpMethod::Get,
            function: function.path.clone(),
            request_validator: Some(PARAMETER_VALIDATOR_ID.to_string()),
            query_parameters: vec![
                QueryParameter {
                    name: "a".to_string(),
                    required: true,
                },
                QueryParameter {
                    name: "b".to_string(),
                    required: true,
                },
            ],
            responses: vec![MethodResponse {
                status_code: 200,
                model: Some(RESPONSE_MODEL_ID.to_string()),
            }],
        };

        let resource = ApiResourceDefinition {
            path_part: PRODUCT_PATH_PART.to_string(),
            methods: vec![method],
        };

        (model, resource)
    }

    fn create_documentation(&self) -> Vec<DocumentationPart> {
        let path = format!("/{PRODUCT_PATH_PART}");

        vec![
            DocumentationPart {
                id: "ApiDoc".to_string(),
                location: DocumentationLocation::Api,
                description: "An API that calculates the product of 2 numbers.".to_string(),
            },
            DocumentationPart {
                id: "ProductGetDoc".to_string(),
                location: DocumentationLocation::Method {
                    path: path.clone(),
                    method: HttpMethod::Get,
                },
                description: "Calculates the product of 2 numbers.".to_string(),
            },
            DocumentationPart {
                id: "ProductGetADoc".to_string(),
                location: DocumentationLocation::QueryParameter {
                    path: path.clone(),
                    method: HttpMethod::Get,
                    name: "a".to_string(),
                },
                description: "The first number.".to_string(),
            },
            DocumentationPart {
                id: "ProductGetBDoc".to_string(),
                location: DocumentationLocation::QueryParameter {
                    path: path.clone(),
                    method: HttpMethod::Get,
                    name: "b".to_string(),
                },
                description: "The second number.".to_string(),
            },
            DocumentationPart {
                id: "ProductGetResponseDoc".to_string(),
                location: DocumentationLocation::Response {
                    path,
                    method: HttpMethod::Get,
                    status_code: 200,
                },
                description: "The calculation has been performed successfully.".to_string(),
            },
        ]
    }
}
