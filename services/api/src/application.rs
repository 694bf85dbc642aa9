// アプリケーション層モジュール
pub mod api_composer;
pub mod app_composer;
pub mod composition_error;
pub mod e2e_runner;
pub mod environment_resolver;
pub mod product_handler;
pub mod stack_factory;
pub mod sum_handler;

// 再エクスポート
pub use api_composer::{ApiComposer, api_url_key};
pub use app_composer::{AppComposer, DEFAULT_SERVICE_NAME};
pub use composition_error::CompositionError;
pub use e2e_runner::{E2eError, E2eRunner, ScenarioOutcome};
pub use environment_resolver::{ConfigError, EnvironmentResolver, Setting};
pub use product_handler::ProductHandler;
pub use stack_factory::{StackFactory, stack_path, sum_function_key};
pub use sum_handler::SumHandler;
