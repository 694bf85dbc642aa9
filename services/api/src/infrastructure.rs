// Infrastructure layer modules
pub mod api_client;
pub mod cloud_assembly;
pub mod cloudformation;
pub mod config;
pub mod e2e_config;
pub mod lambda_ops;
pub mod logging;
pub mod ssm_ops;
pub mod template;

// Re-exports
pub use api_client::{HttpProductApi, ProductApi, ProductApiError, ProductResponse};
pub use cloud_assembly::{AssemblyError, AssemblyManifest, CloudAssembly};
pub use cloudformation::CloudFormationRenderer;
pub use config::ConfigVariables;
pub use e2e_config::{E2eConfig, E2eConfigError};
pub use lambda_ops::{AwsFunctionInvoker, FunctionInvoker, FunctionInvokerError, InvocationOutput};
pub use logging::{init_cli_logging, init_logging, invocation_span};
pub use ssm_ops::{AwsParameterStore, ParameterStore, ParameterStoreError};
pub use template::{RenderError, TemplateRenderer};
