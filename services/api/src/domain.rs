// Domain layer modules
pub mod build_options;
pub mod calculation;
pub mod construct_path;
pub mod content_hash;
pub mod deployment;
pub mod discovery_key;
pub mod distribution;
pub mod environment;
pub mod environment_config;
pub mod function;
pub mod rest_api;
pub mod tag;

// Re-exports
pub use build_options::{BuildOptions, SourceMapMode};
pub use calculation::{ParameterError, ProductParameters, ProductResult, SumEvent, SumResult};
pub use construct_path::ConstructPath;
pub use content_hash::{content_hash, matches_if_none_match};
pub use deployment::{AppDefinition, ApiUnit, DeploymentUnit, DiscoveryParameter, ParameterValue};
pub use discovery_key::{DiscoveryKey, DiscoveryKeyError};
pub use distribution::DistributionDefinition;
pub use environment::{Environment, UnknownEnvironment};
pub use environment_config::EnvironmentConfig;
pub use function::FunctionDefinition;
pub use rest_api::RestApiDefinition;
pub use tag::{Tag, TagError, to_valid_tag};
