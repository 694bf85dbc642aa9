//! REST APIの定義
//!
//! API Gatewayのリソースツリー、リクエスト検証、レスポンスモデル、
//! ドキュメントを値オブジェクトとして表す。

use serde_json::Value;

use super::construct_path::ConstructPath;

/// エンドポイント種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointType {
    Regional,
}

impl EndpointType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointType::Regional => "REGIONAL",
        }
    }
}

/// ステージのメソッドログレベル
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggingLevel {
    Info,
}

impl LoggingLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoggingLevel::Info => "INFO",
        }
    }
}

/// HTTPメソッド
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Head,
    Options,
    Put,
    Patch,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// デプロイステージ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageDefinition {
    pub name: String,
    pub logging_level: LoggingLevel,
    pub tracing_enabled: bool,
}

/// リクエストバリデーター
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestValidatorDefinition {
    pub id: String,
    pub validate_request_body: bool,
    pub validate_request_parameters: bool,
}

/// レスポンスモデル（JSON Schema draft-04）
///
/// OpenAPIエクスポートに含まれるが、レスポンスの検証には使われない。
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDefinition {
    pub id: String,
    pub content_type: String,
    pub schema: Value,
}

/// クエリパラメータ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParameter {
    pub name: String,
    pub required: bool,
}

/// メソッドレスポンス
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodResponse {
    pub status_code: u16,
    /// レスポンスモデルのID（`application/json`）
    pub model: Option<String>,
}

/// メソッド（Lambdaプロキシ統合）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDefinition {
    pub http_method: HttpMethod,
    /// 統合先のLambda関数
    pub function: ConstructPath,
    /// リクエストバリデーターのID
    pub request_validator: Option<String>,
    pub query_parameters: Vec<QueryParameter>,
    pub responses: Vec<MethodResponse>,
}

/// ルート直下のリソース
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResourceDefinition {
    pub path_part: String,
    pub methods: Vec<MethodDefinition>,
}

impl ApiResourceDefinition {
    /// リソースパス（例: `/product`）
    pub fn resource_path(&self) -> String {
        format!("/{}", self.path_part)
    }
}

/// ドキュメントの対象箇所
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentationLocation {
    Api,
    Method {
        path: String,
        method: HttpMethod,
    },
    QueryParameter {
        path: String,
        method: HttpMethod,
        name: String,
    },
    Response {
        path: String,
        method: HttpMethod,
        status_code: u16,
    },
}

/// ドキュメントパーツ
///
/// OpenAPIエクスポートに含まれる。公開前にドキュメントのバージョンを発行する必要がある。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentationPart {
    pub id: String,
    pub location: DocumentationLocation,
    pub description: String,
}

impl DocumentationPart {
    /// ドキュメントパーツのプロパティ（JSON）
    ///
    /// API全体は`info.description`、それ以外は`description`に説明を置く。
    pub fn properties(&self) -> Value {
        match self.location {
            DocumentationLocation::Api => {
                serde_json::json!({ "info": { "description": self.description } })
            }
            _ => serde_json::json!({ "description": self.description }),
        }
    }
}

/// REST API
#[derive(Debug, Clone, PartialEq)]
pub struct RestApiDefinition {
    pub path: ConstructPath,
    pub name: String,
    pub endpoint_type: EndpointType,
    /// この値以上のペイロードを圧縮する（バイト）
    pub minimum_compression_size: u32,
    /// CloudWatch Logs出力用のロールを作成する
    pub cloud_watch_role: bool,
    pub stage: StageDefinition,
    pub request_validators: Vec<RequestValidatorDefinition>,
    pub models: Vec<ModelDefinition>,
    pub resources: Vec<ApiResourceDefinition>,
    pub documentation: Vec<DocumentationPart>,
}

impl RestApiDefinition {
    /// パスでリソースを検索
    pub fn resource(&self, path_part: &str) -> Option<&ApiResourceDefinition> {
        self.resources.iter().find(|r| r.path_part == path_part)
    }
}
