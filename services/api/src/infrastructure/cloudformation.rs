//! CloudFormationテンプレートの生成
//!
//! デプロイメントユニット1つを1スタック分のテンプレートに変換する。
//! 論理IDはスタック配下の構成要素パスから導出する（例: `ProductApiRestApi`）。
//!
//! 関数コードはデプロイ前に`AssetsBucket`パラメータのバケットへ
//! `<binary>/bootstrap.zip`としてアップロードされている前提。

use std::collections::BTreeMap;

use serde_json::{Value, json};
use tracing::debug;

use super::template::{RenderError, ResourceMap, TemplateRenderer};
use crate::domain::rest_api::{
    ApiResourceDefinition, DocumentationLocation, HttpMethod, MethodDefinition,
};
use crate::domain::{
    ConstructPath, DeploymentUnit, DiscoveryParameter, DistributionDefinition,
    FunctionDefinition, ParameterValue, RestApiDefinition, Tag,
};

/// テンプレートのフォーマットバージョン
pub const TEMPLATE_FORMAT_VERSION: &str = "2010-09-09";

/// 関数コードを置くバケットのパラメータ名
pub const ASSETS_BUCKET_PARAMETER: &str = "AssetsBucket";

/// ビルドオプションを記録するメタデータキー
pub const BUILD_METADATA_KEY: &str = "aws:asset:build";

/// CloudFrontのオリジンID
const ORIGIN_ID: &str = "RestApiOrigin";

fn reference(logical_id: &str) -> Value {
    json!({ "Ref": logical_id })
}

fn get_att(logical_id: &str, attribute: &str) -> Value {
    json!({ "Fn::GetAtt": [logical_id, attribute] })
}

fn join(parts: Vec<Value>) -> Value {
    json!({ "Fn::Join": ["", parts] })
}

fn managed_policy(name: &str) -> Value {
    join(vec![
        json!("arn:"),
        reference("AWS::Partition"),
        json!(format!(":iam::aws:policy/{name}")),
    ])
}

fn service_role(service: &str, managed_policies: &[&str], tags: &Value) -> Value {
    json!({
        "Type": "AWS::IAM::Role",
        "Properties": {
            "AssumeRolePolicyDocument": {
                "Statement": [{
                    "Action": "sts:AssumeRole",
                    "Effect": "Allow",
                    "Principal": { "Service": service }
                }],
                "Version": "2012-10-17"
            },
            "ManagedPolicyArns": managed_policies.iter().map(|p| managed_policy(p)).collect::<Vec<_>>(),
            "Tags": tags
        }
    })
}

/// パスの末尾部分から論理IDの断片を作る（英数字のみ、先頭大文字）
fn pascal_fragment(raw: &str) -> String {
    let cleaned: String = raw.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    let mut chars = cleaned.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase(),
        None => String::new(),
    }
}

/// CloudFormationレンダラー
#[derive(Debug, Clone, Copy, Default)]
pub struct CloudFormationRenderer;

impl CloudFormationRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateRenderer for CloudFormationRenderer {
    fn name(&self) -> &'static str {
        "cloudformation"
    }

    fn render(&self, unit: &DeploymentUnit) -> Result<Value, RenderError> {
        let mut builder = StackTemplate::new(unit);

        for function in unit.functions() {
            builder.add_function(function)?;
        }
        builder.add_rest_api(&unit.api.rest_api)?;
        builder.add_distribution(&unit.api.distribution)?;
        for parameter in unit.parameters() {
            builder.add_parameter(parameter)?;
        }

        let template = builder.finish();
        debug!(
            stack = %unit.stack_name(),
            resources = template["Resources"].as_object().map(|r| r.len()).unwrap_or_default(),
            "テンプレートを生成"
        );
        Ok(template)
    }
}

/// 1スタック分のテンプレートの組み立て
struct StackTemplate<'a> {
    unit: &'a DeploymentUnit,
    tags: Value,
    resources: ResourceMap,
    outputs: serde_json::Map<String, Value>,
}

impl<'a> StackTemplate<'a> {
    fn new(unit: &'a DeploymentUnit) -> Self {
        Self {
            unit,
            tags: json!(unit.tags),
            resources: ResourceMap::new(),
            outputs: serde_json::Map::new(),
        }
    }

    fn logical_id(&self, path: &ConstructPath) -> String {
        path.logical_id_within(&self.unit.path)
    }

    /// 定義済みのリソースを参照する論理ID
    fn resolve(&self, path: &ConstructPath) -> Result<String, RenderError> {
        let logical_id = self.logical_id(path);
        if self.resources.contains(&logical_id) {
            Ok(logical_id)
        } else {
            Err(RenderError::UnresolvedReference {
                path: path.to_string(),
            })
        }
    }

    /// タグのマップ形式（SSMパラメータ用）
    fn tag_map(&self) -> Value {
        let map: BTreeMap<&str, &str> = self
            .unit
            .tags
            .iter()
            .map(|tag: &Tag| (tag.key(), tag.value()))
            .collect();
        json!(map)
    }

    fn add_function(&mut self, function: &FunctionDefinition) -> Result<(), RenderError> {
        let logical_id = self.logical_id(&function.path);
        let role_id = format!("{logical_id}ServiceRole");

        self.resources.insert(
            role_id.clone(),
            service_role(
                "lambda.amazonaws.com",
                &[
                    "service-role/AWSLambdaBasicExecutionRole",
                    "AWSXRayDaemonWriteAccess",
                ],
                &self.tags,
            ),
        )?;

        self.resources.insert(
            logical_id,
            json!({
                "Type": "AWS::Lambda::Function",
                "Properties": {
                    "Architectures": [function.architecture.as_str()],
                    "Code": {
                        "S3Bucket": reference(ASSETS_BUCKET_PARAMETER),
                        "S3Key": function.asset_key()
                    },
                    "Description": function.description,
                    "Environment": { "Variables": function.environment },
                    "Handler": function.handler,
                    "MemorySize": function.memory_size_mb,
                    "Role": get_att(&role_id, "Arn"),
                    "Runtime": function.runtime,
                    "Tags": self.tags,
                    "Timeout": function.timeout_secs,
                    "TracingConfig": { "Mode": function.tracing.as_str() }
                },
                "DependsOn": [role_id],
                "Metadata": {
                    "aws:cdk:path": function.path.to_string(),
                    BUILD_METADATA_KEY: {
                        "binary": function.binary,
                        "options": function.build
                    }
                }
            }),
        )
    }

    fn add_rest_api(&mut self, api: &RestApiDefinition) -> Result<(), RenderError> {
        let api_id = self.logical_id(&api.path);

        self.resources.insert(
            api_id.clone(),
            json!({
                "Type": "AWS::ApiGateway::RestApi",
                "Properties": {
                    "EndpointConfiguration": { "Types": [api.endpoint_type.as_str()] },
                    "MinimumCompressionSize": api.minimum_compression_size,
                    "Name": api.name,
                    "Tags": self.tags
                }
            }),
        )?;

        let mut stage_dependencies = Vec::new();
        if api.cloud_watch_role {
            let role_id = format!("{api_id}CloudWatchRole");
            let account_id = format!("{api_id}Account");
            self.resources.insert(
                role_id.clone(),
                service_role(
                    "apigateway.amazonaws.com",
                    &["service-role/AmazonAPIGatewayPushToCloudWatchLogs"],
                    &self.tags,
                ),
            )?;
            self.resources.insert(
                account_id.clone(),
                json!({
                    "Type": "AWS::ApiGateway::Account",
                    "Properties": { "CloudWatchRoleArn": get_att(&role_id, "Arn") },
                    "DependsOn": [api_id]
                }),
            )?;
            stage_dependencies.push(account_id);
        }

        for validator in &api.request_validators {
            self.resources.insert(
                format!("{api_id}{}", validator.id),
                json!({
                    "Type": "AWS::ApiGateway::RequestValidator",
                    "Properties": {
                        "RestApiId": reference(&api_id),
                        "ValidateRequestBody": validator.validate_request_body,
                        "ValidateRequestParameters": validator.validate_request_parameters
                    }
                }),
            )?;
        }

        for model in &api.models {
            self.resources.insert(
                format!("{api_id}{}", model.id),
                json!({
                    "Type": "AWS::ApiGateway::Model",
                    "Properties": {
                        "ContentType": model.content_type,
                        "Name": model.id,
                        "RestApiId": reference(&api_id),
                        "Schema": model.schema
                    }
                }),
            )?;
        }

        let mut method_ids = Vec::new();
        for resource in &api.resources {
            method_ids.extend(self.add_api_resource(api, &api_id, resource)?);
        }

        for part in &api.documentation {
            self.resources.insert(
                format!("{api_id}{}", part.id),
                json!({
                    "Type": "AWS::ApiGateway::DocumentationPart",
                    "Properties": {
                        "Location": documentation_location(&part.location),
                        "Properties": part.properties().to_string(),
                        "RestApiId": reference(&api_id)
                    }
                }),
            )?;
        }

        let deployment_id = format!("{api_id}Deployment");
        self.resources.insert(
            deployment_id.clone(),
            json!({
                "Type": "AWS::ApiGateway::Deployment",
                "Properties": {
                    "Description": format!("Automatically created by the {} stack", self.unit.stack_name()),
                    "RestApiId": reference(&api_id)
                },
                "DependsOn": method_ids
            }),
        )?;

        let stage_id = format!("{api_id}Stage{}", pascal_fragment(&api.stage.name));
        self.resources.insert(
            stage_id,
            json!({
                "Type": "AWS::ApiGateway::Stage",
                "Properties": {
                    "DeploymentId": reference(&deployment_id),
                    "MethodSettings": [{
                        "DataTraceEnabled": false,
                        "HttpMethod": "*",
                        "LoggingLevel": api.stage.logging_level.as_str(),
                        "ResourcePath": "/*"
                    }],
                    "RestApiId": reference(&api_id),
                    "StageName": api.stage.name,
                    "Tags": self.tags,
                    "TracingEnabled": api.stage.tracing_enabled
                },
                "DependsOn": stage_dependencies
            }),
        )?;

        self.outputs.insert(
            format!("{api_id}Endpoint"),
            json!({
                "Value": join(vec![
                    json!("https://"),
                    reference(&api_id),
                    json!(".execute-api."),
                    reference("AWS::Region"),
                    json!("."),
                    reference("AWS::URLSuffix"),
                    json!(format!("/{}/", api.stage.name)),
                ])
            }),
        );

        Ok(())
    }

    /// ルート直下のリソースとそのメソッド（メソッドの論理IDを返す）
    fn add_api_resource(
        &mut self,
        api: &RestApiDefinition,
        api_id: &str,
        resource: &ApiResourceDefinition,
    ) -> Result<Vec<String>, RenderError> {
        let resource_id = format!("{api_id}{}", pascal_fragment(&resource.path_part));

        self.resources.insert(
            resource_id.clone(),
            json!({
                "Type": "AWS::ApiGateway::Resource",
                "Properties": {
                    "ParentId": get_att(api_id, "RootResourceId"),
                    "PathPart": resource.path_part,
                    "RestApiId": reference(api_id)
                }
            }),
        )?;

        let mut method_ids = Vec::new();
        for method in &resource.methods {
            let method_id = format!(
                "{resource_id}{}",
                pascal_fragment(method.http_method.as_str())
            );
            self.add_method(api, api_id, &resource_id, resource, &method_id, method)?;
            method_ids.push(method_id);
        }
        Ok(method_ids)
    }

    fn add_method(
        &mut self,
        api: &RestApiDefinition,
        api_id: &str,
        resource_id: &str,
        resource: &ApiResourceDefinition,
        method_id: &str,
        method: &MethodDefinition,
    ) -> Result<(), RenderError> {
        let function_id = self.resolve(&method.function)?;

        let request_parameters: serde_json::Map<String, Value> = method
            .query_parameters
            .iter()
            .map(|p| {
                (
                    format!("method.request.querystring.{}", p.name),
                    Value::Bool(p.required),
                )
            })
            .collect();

        let method_responses: Vec<Value> = method
            .responses
            .iter()
            .map(|response| {
                let mut value = json!({ "StatusCode": response.status_code.to_string() });
                if let Some(model) = &response.model {
                    value["ResponseModels"] =
                        json!({ "application/json": reference(&format!("{api_id}{model}")) });
                }
                value
            })
            .collect();

        let mut properties = json!({
            "AuthorizationType": "NONE",
            "HttpMethod": method.http_method.as_str(),
            "Integration": {
                "IntegrationHttpMethod": "POST",
                "Type": "AWS_PROXY",
                "Uri": join(vec![
                    json!("arn:"),
                    reference("AWS::Partition"),
                    json!(":apigateway:"),
                    reference("AWS::Region"),
                    json!(":lambda:path/2015-03-31/functions/"),
                    get_att(&function_id, "Arn"),
                    json!("/invocations"),
                ])
            },
            "MethodResponses": method_responses,
            "RequestParameters": request_parameters,
            "ResourceId": reference(resource_id),
            "RestApiId": reference(api_id)
        });
        if let Some(validator) = &method.request_validator {
            properties["RequestValidatorId"] = reference(&format!("{api_id}{validator}"));
        }

        self.resources.insert(
            method_id.to_string(),
            json!({ "Type": "AWS::ApiGateway::Method", "Properties": properties }),
        )?;

        // API GatewayからLambdaを呼び出す権限（デプロイ済みステージのみ）
        self.resources.insert(
            format!("{method_id}Permission"),
            json!({
                "Type": "AWS::Lambda::Permission",
                "Properties": {
                    "Action": "lambda:InvokeFunction",
                    "FunctionName": get_att(&function_id, "Arn"),
                    "Principal": "apigateway.amazonaws.com",
                    "SourceArn": join(vec![
                        json!("arn:"),
                        reference("AWS::Partition"),
                        json!(":execute-api:"),
                        reference("AWS::Region"),
                        json!(":"),
                        reference("AWS::AccountId"),
                        json!(":"),
                        reference(api_id),
                        json!(format!(
                            "/{}/{}{}",
                            api.stage.name,
                            method.http_method.as_str(),
                            resource.resource_path()
                        )),
                    ])
                }
            }),
        )
    }

    fn add_distribution(&mut self, distribution: &DistributionDefinition) -> Result<(), RenderError> {
        let distribution_id = self.logical_id(&distribution.path);
        let api_id = self.resolve(&distribution.origin)?;
        let stack_name = self.unit.stack_name();

        let cache = &distribution.cache_policy;
        let cache_id = format!("{distribution_id}{}", cache.id);
        let cache_key = json!({
            "CookiesConfig": { "CookieBehavior": cache.cookie_behavior.behavior() },
            "EnableAcceptEncodingBrotli": cache.enable_accept_encoding_brotli,
            "EnableAcceptEncodingGzip": cache.enable_accept_encoding_gzip,
            "HeadersConfig": { "HeaderBehavior": cache.header_behavior.behavior() },
            "QueryStringsConfig": { "QueryStringBehavior": cache.query_string_behavior.behavior() }
        });

        self.resources.insert(
            cache_id.clone(),
            json!({
                "Type": "AWS::CloudFront::CachePolicy",
                "Properties": {
                    "CachePolicyConfig": {
                        "DefaultTTL": cache.default_ttl_secs,
                        "MaxTTL": cache.max_ttl_secs,
                        "MinTTL": cache.min_ttl_secs,
                        "Name": format!("{stack_name}-{cache_id}"),
                        "ParametersInCacheKeyAndForwardedToOrigin": cache_key
                    }
                }
            }),
        )?;

        let headers = &distribution.response_headers_policy;
        let headers_id = format!("{distribution_id}{}", headers.id);
        let cors = &headers.cors;
        self.resources.insert(
            headers_id.clone(),
            json!({
                "Type": "AWS::CloudFront::ResponseHeadersPolicy",
                "Properties": {
                    "ResponseHeadersPolicyConfig": {
                        "CorsConfig": {
                            "AccessControlAllowCredentials": cors.allow_credentials,
                            "AccessControlAllowHeaders": { "Items": cors.allow_headers },
                            "AccessControlAllowMethods": {
                                "Items": cors.allow_methods.iter().map(HttpMethod::as_str).collect::<Vec<_>>()
                            },
                            "AccessControlAllowOrigins": { "Items": cors.allow_origins },
                            "OriginOverride": cors.origin_override
                        },
                        "Name": format!("{stack_name}-{headers_id}")
                    }
                }
            }),
        )?;

        let behavior = &distribution.default_behavior;
        self.resources.insert(
            distribution_id.clone(),
            json!({
                "Type": "AWS::CloudFront::Distribution",
                "Properties": {
                    "DistributionConfig": {
                        "DefaultCacheBehavior": {
                            "AllowedMethods": behavior.allowed_methods.methods().iter().map(HttpMethod::as_str).collect::<Vec<_>>(),
                            "CachePolicyId": reference(&cache_id),
                            "CachedMethods": behavior.cached_methods.methods().iter().map(HttpMethod::as_str).collect::<Vec<_>>(),
                            "Compress": behavior.compress,
                            "ResponseHeadersPolicyId": reference(&headers_id),
                            "TargetOriginId": ORIGIN_ID,
                            "ViewerProtocolPolicy": behavior.viewer_protocol_policy.as_str()
                        },
                        "Enabled": true,
                        "HttpVersion": "http2",
                        "IPV6Enabled": true,
                        "Origins": [{
                            "CustomOriginConfig": {
                                "OriginProtocolPolicy": "https-only",
                                "OriginSSLProtocols": ["TLSv1.2"]
                            },
                            "DomainName": join(vec![
                                reference(&api_id),
                                json!(".execute-api."),
                                reference("AWS::Region"),
                                json!("."),
                                reference("AWS::URLSuffix"),
                            ]),
                            "Id": ORIGIN_ID,
                            "OriginPath": format!("/{}", distribution.origin_stage)
                        }]
                    },
                    "Tags": self.tags
                }
            }),
        )?;

        self.outputs.insert(
            format!("{distribution_id}Url"),
            json!({ "Value": distribution_url(&distribution_id) }),
        );

        Ok(())
    }

    fn add_parameter(&mut self, parameter: &DiscoveryParameter) -> Result<(), RenderError> {
        let value = match &parameter.value {
            ParameterValue::FunctionName(path) => reference(&self.resolve(path)?),
            ParameterValue::DistributionUrl(path) => distribution_url(&self.resolve(path)?),
        };

        let logical_id = self.logical_id(&parameter.path);
        let tags = self.tag_map();

        self.resources.insert(
            logical_id,
            json!({
                "Type": "AWS::SSM::Parameter",
                "Properties": {
                    "Name": parameter.key.as_str(),
                    "Tags": tags,
                    "Type": "String",
                    "Value": value
                }
            }),
        )
    }

    fn finish(self) -> Value {
        json!({
            "AWSTemplateFormatVersion": TEMPLATE_FORMAT_VERSION,
            "Description": format!(
                "{} ({} / {})",
                self.unit.stack_name(),
                self.unit.config.account(),
                self.unit.config.region()
            ),
            "Parameters": {
                ASSETS_BUCKET_PARAMETER: {
                    "Type": "String",
                    "Description": "S3 bucket holding the Lambda bootstrap archives"
                }
            },
            "Resources": self.resources.into_value(),
            "Outputs": self.outputs
        })
    }
}

/// ディストリビューションの公開URL（`https://<domain>`）
fn distribution_url(distribution_id: &str) -> Value {
    join(vec![json!("https://"), get_att(distribution_id, "DomainName")])
}

fn documentation_location(location: &DocumentationLocation) -> Value {
    match location {
        DocumentationLocation::Api => json!({ "Type": "API" }),
        DocumentationLocation::Method { path, method } => json!({
            "Method": method.as_str(),
            "Path": path,
            "Type": "METHOD"
        }),
        DocumentationLocation::QueryParameter { path, method, name } => json!({
            "Method": method.as_str(),
            "Name": name,
            "Path": path,
            "Type": "QUERY_PARAMETER"
        }),
        DocumentationLocation::Response {
            path,
            method,
            status_code,
        } => json!({
            "Method": method.as_str(),
            "Path": path,
            "StatusCode": status_code.to_string(),
            "Type": "RESPONSE"
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::StackFactory;
    use crate::domain::{BuildOptions, Environment, EnvironmentConfig};

    fn unit() -> DeploymentUnit {
        let build = BuildOptions::for_environment(Environment::Prod, "Cargo.toml");
        StackFactory::new("api")
            .create(
                &ConstructPath::root("Dev"),
                Environment::Dev,
                &EnvironmentConfig::new("012345678901", "us-east-1"),
                &build,
            )
            .unwrap()
    }

    fn template() -> Value {
        CloudFormationRenderer::new().render(&unit()).unwrap()
    }

    /// `expected`のすべてのフィールドが`actual`に含まれるか（配列は完全一致）
    fn is_subset(expected: &Value, actual: &Value) -> bool {
        match (expected, actual) {
            (Value::Object(expected), Value::Object(actual)) => expected
                .iter()
                .all(|(k, v)| actual.get(k).is_some_and(|a| is_subset(v, a))),
            _ => expected == actual,
        }
    }

    fn resources_of_type<'a>(template: &'a Value, resource_type: &str) -> Vec<&'a Value> {
        template["Resources"]
            .as_object()
            .unwrap()
            .values()
            .filter(|r| r["Type"] == resource_type)
            .collect()
    }

    fn count_with_properties(template: &Value, resource_type: &str, properties: Value) -> usize {
        resources_of_type(template, resource_type)
            .into_iter()
            .filter(|r| is_subset(&properties, &r["Properties"]))
            .count()
    }

    fn has_resource_properties(template: &Value, resource_type: &str, properties: Value) -> bool {
        count_with_properties(template, resource_type, properties) > 0
    }

    // ==================== 全体構造 テスト ====================

    #[test]
    fn test_template_skeleton() {
        let template = template();
        assert_eq!(template["AWSTemplateFormatVersion"], "2010-09-09");
        assert_eq!(template["Parameters"]["AssetsBucket"]["Type"], "String");
        assert!(template["Outputs"]["ProductApiDistributionUrl"].is_object());
        assert!(template["Outputs"]["ProductApiRestApiEndpoint"].is_object());
    }

    #[test]
    fn test_logical_ids() {
        let template = template();
        let resources = template["Resources"].as_object().unwrap();
        for id in [
            "SumFunction",
            "SumFunctionServiceRole",
            "SumFunctionParameter",
            "ProductApiFunction",
            "ProductApiRestApi",
            "ProductApiRestApiProduct",
            "ProductApiRestApiProductGet",
            "ProductApiRestApiStageDefault",
            "ProductApiDistribution",
            "ProductApiUrlParameter",
        ] {
            assert!(resources.contains_key(id), "{id} がありません");
        }
    }

    // ==================== Lambda テスト ====================

    #[test]
    fn test_lambda_functions() {
        let template = template();
        assert_eq!(resources_of_type(&template, "AWS::Lambda::Function").len(), 2);
        assert!(has_resource_properties(
            &template,
            "AWS::Lambda::Function",
            json!({
                "Handler": "bootstrap",
                "Runtime": "provided.al2023",
                "Architectures": ["arm64"],
                "MemorySize": 256,
                "Timeout": 10,
                "TracingConfig": { "Mode": "Active" },
                "Code": { "S3Key": "sum/bootstrap.zip" }
            })
        ));
        assert!(has_resource_properties(
            &template,
            "AWS::Lambda::Function",
            json!({ "Code": { "S3Key": "product/bootstrap.zip" } })
        ));
    }

    #[test]
    fn test_function_build_metadata() {
        let template = template();
        let metadata = &template["Resources"]["SumFunction"]["Metadata"]["aws:asset:build"];
        assert_eq!(metadata["binary"], "sum");
        assert_eq!(metadata["options"]["minify"], true);
        assert_eq!(metadata["options"]["sourceMapMode"], "external");
    }

    #[test]
    fn test_function_environment_variables() {
        let template = template();
        assert!(has_resource_properties(
            &template,
            "AWS::Lambda::Function",
            json!({
                "Environment": {
                    "Variables": { "ENVIRONMENT": "Dev", "SERVICE_NAME": "api", "RUST_LOG": "debug" }
                }
            })
        ));
    }

    // ==================== REST API テスト ====================

    #[test]
    fn test_rest_api() {
        assert!(has_resource_properties(
            &template(),
            "AWS::ApiGateway::RestApi",
            json!({
                "EndpointConfiguration": { "Types": ["REGIONAL"] },
                "MinimumCompressionSize": 1024
            })
        ));
    }

    #[test]
    fn test_default_stage() {
        assert!(has_resource_properties(
            &template(),
            "AWS::ApiGateway::Stage",
            json!({
                "StageName": "default",
                "MethodSettings": [{
                    "DataTraceEnabled": false,
                    "HttpMethod": "*",
                    "LoggingLevel": "INFO",
                    "ResourcePath": "/*"
                }],
                "TracingEnabled": true
            })
        ));
    }

    #[test]
    fn test_cloud_watch_role_and_account() {
        let template = template();
        assert_eq!(resources_of_type(&template, "AWS::ApiGateway::Account").len(), 1);
        assert_eq!(
            template["Resources"]["ProductApiRestApiStageDefault"]["DependsOn"],
            json!(["ProductApiRestApiAccount"])
        );
    }

    #[test]
    fn test_single_parameter_validator() {
        assert_eq!(
            count_with_properties(
                &template(),
                "AWS::ApiGateway::RequestValidator",
                json!({ "ValidateRequestBody": false, "ValidateRequestParameters": true })
            ),
            1
        );
    }

    #[test]
    fn test_product_resource() {
        assert!(has_resource_properties(
            &template(),
            "AWS::ApiGateway::Resource",
            json!({ "PathPart": "product" })
        ));
    }

    #[test]
    fn test_product_method() {
        let template = template();
        assert!(has_resource_properties(
            &template,
            "AWS::ApiGateway::Method",
            json!({
                "HttpMethod": "GET",
                "AuthorizationType": "NONE",
                "RequestParameters": {
                    "method.request.querystring.a": true,
                    "method.request.querystring.b": true
                },
                "RequestValidatorId": { "Ref": "ProductApiRestApiParameterRequestValidator" },
                "Integration": { "Type": "AWS_PROXY", "IntegrationHttpMethod": "POST" },
                "MethodResponses": [{
                    "StatusCode": "200",
                    "ResponseModels": {
                        "application/json": { "Ref": "ProductApiRestApiProductGetResponseModel" }
                    }
                }]
            })
        ));
        assert_eq!(
            template["Resources"]["ProductApiRestApiDeployment"]["DependsOn"],
            json!(["ProductApiRestApiProductGet"])
        );
    }

    #[test]
    fn test_lambda_permission_targets_product_function() {
        assert!(has_resource_properties(
            &template(),
            "AWS::Lambda::Permission",
            json!({
                "Action": "lambda:InvokeFunction",
                "FunctionName": { "Fn::GetAtt": ["ProductApiFunction", "Arn"] },
                "Principal": "apigateway.amazonaws.com"
            })
        ));
    }

    #[test]
    fn test_response_model() {
        assert!(has_resource_properties(
            &template(),
            "AWS::ApiGateway::Model",
            json!({
                "ContentType": "application/json",
                "Schema": { "title": "ProductGetResponse", "required": ["product"] }
            })
        ));
    }

    #[test]
    fn test_documentation_parts() {
        let template = template();
        assert_eq!(
            resources_of_type(&template, "AWS::ApiGateway::DocumentationPart").len(),
            5
        );
        assert!(has_resource_properties(
            &template,
            "AWS::ApiGateway::DocumentationPart",
            json!({
                "Location": { "Type": "QUERY_PARAMETER", "Path": "/product", "Method": "GET", "Name": "a" },
                "Properties": r#"{"description":"The first number."}"#
            })
        ));
        assert!(has_resource_properties(
            &template,
            "AWS::ApiGateway::DocumentationPart",
            json!({ "Location": { "Type": "RESPONSE", "StatusCode": "200" } })
        ));
    }

    // ==================== CloudFront テスト ====================

    #[test]
    fn test_cache_policy() {
        assert!(has_resource_properties(
            &template(),
            "AWS::CloudFront::CachePolicy",
            json!({
                "CachePolicyConfig": {
                    "DefaultTTL": 86400,
                    "MaxTTL": 31536000,
                    "MinTTL": 0,
                    "ParametersInCacheKeyAndForwardedToOrigin": {
                        "CookiesConfig": { "CookieBehavior": "none" },
                        "EnableAcceptEncodingBrotli": true,
                        "EnableAcceptEncodingGzip": true,
                        "HeadersConfig": { "HeaderBehavior": "none" },
                        "QueryStringsConfig": { "QueryStringBehavior": "all" }
                    }
                }
            })
        ));
    }

    #[test]
    fn test_response_headers_policy() {
        assert!(has_resource_properties(
            &template(),
            "AWS::CloudFront::ResponseHeadersPolicy",
            json!({
                "ResponseHeadersPolicyConfig": {
                    "CorsConfig": {
                        "AccessControlAllowCredentials": false,
                        "AccessControlAllowHeaders": {
                            "Items": ["Accept", "Accept-Language", "Content-Language", "Content-Type", "Range"]
                        },
                        "AccessControlAllowMethods": { "Items": ["GET", "HEAD", "POST"] },
                        "AccessControlAllowOrigins": { "Items": ["*"] },
                        "OriginOverride": false
                    }
                }
            })
        ));
    }

    #[test]
    fn test_distribution() {
        let template = template();
        assert!(has_resource_properties(
            &template,
            "AWS::CloudFront::Distribution",
            json!({
                "DistributionConfig": {
                    "DefaultCacheBehavior": {
                        "AllowedMethods": ["GET", "HEAD", "OPTIONS", "PUT", "PATCH", "POST", "DELETE"],
                        "CachedMethods": ["GET", "HEAD"],
                        "Compress": false,
                        "ViewerProtocolPolicy": "redirect-to-https"
                    }
                }
            })
        ));

        let origin = &template["Resources"]["ProductApiDistribution"]["Properties"]
            ["DistributionConfig"]["Origins"][0];
        assert_eq!(origin["OriginPath"], "/default");
        assert_eq!(
            origin["DomainName"]["Fn::Join"][1][0],
            json!({ "Ref": "ProductApiRestApi" })
        );
    }

    // ==================== SSM / タグ テスト ====================

    #[test]
    fn test_discovery_parameters() {
        let template = template();
        assert!(has_resource_properties(
            &template,
            "AWS::SSM::Parameter",
            json!({
                "Name": "/e2e/Dev/Api/SumFunction",
                "Value": { "Ref": "SumFunction" }
            })
        ));
        assert!(has_resource_properties(
            &template,
            "AWS::SSM::Parameter",
            json!({
                "Name": "/e2e/Dev/Api/ProductApi/url",
                "Value": {
                    "Fn::Join": ["", ["https://", { "Fn::GetAtt": ["ProductApiDistribution", "DomainName"] }]]
                }
            })
        ));
    }

    #[test]
    fn test_tags_on_taggable_resources() {
        let template = template();
        let list = json!([
            { "Key": "Environment", "Value": "Dev" },
            { "Key": "App", "Value": "api" }
        ]);
        for resource_type in [
            "AWS::Lambda::Function",
            "AWS::IAM::Role",
            "AWS::ApiGateway::RestApi",
            "AWS::ApiGateway::Stage",
            "AWS::CloudFront::Distribution",
        ] {
            for resource in resources_of_type(&template, resource_type) {
                assert_eq!(resource["Properties"]["Tags"], list, "{resource_type}");
            }
        }
        for resource in resources_of_type(&template, "AWS::SSM::Parameter") {
            assert_eq!(
                resource["Properties"]["Tags"],
                json!({ "Environment": "Dev", "App": "api" })
            );
        }
    }

    // ==================== エラー テスト ====================

    #[test]
    fn test_unresolved_function_reference() {
        let mut unit = unit();
        unit.api.rest_api.resources[0].methods[0].function =
            ConstructPath::root("Dev").child("Api").child("Missing");

        assert_eq!(
            CloudFormationRenderer::new().render(&unit),
            Err(RenderError::UnresolvedReference {
                path: "Dev/Api/Missing".to_string()
            })
        );
    }

    #[test]
    fn test_duplicate_logical_id() {
        let mut unit = unit();
        unit.function.path = unit.api.function.path.clone();

        assert!(matches!(
            CloudFormationRenderer::new().render(&unit),
            Err(RenderError::DuplicateLogicalId { .. })
        ));
    }

    #[test]
    fn test_render_is_deterministic() {
        assert_eq!(template(), template());
    }
}
