use serde_json::Map;
use serde_json::Value;

use railforge_core::config::Config;
use railforge_core::credential::ApiKey;
use railforge_core::envelope::DesignRequest;
use railforge_core::envelope::GenerateArgs;
use railforge_core::envelope::GenerateRequest;
use railforge_core::envelope::TaskEnvelope;
use railforge_core::task_registry::TaskId;

use crate::contracts::ToolResult;
use crate::executor::GeneratorExecutor;
use crate::request::build_exec_request;

/// Caller-facing entry point: builds envelopes, folds every validation
/// error into a failure result, and hands well-formed requests to the
/// executor. One child process per call, nothing shared across calls.
pub struct GeneratorBridge<E> {
    config: Config,
    credential: Option<ApiKey>,
    executor: E,
}

impl<E: GeneratorExecutor> GeneratorBridge<E> {
    pub fn new(config: Config, credential: Option<ApiKey>, executor: E) -> Self {
        Self {
            config,
            credential,
            executor,
        }
    }

    pub fn generate(&self, args: GenerateArgs) -> ToolResult {
        let envelope = match GenerateRequest::build(args, &self.config.output) {
            Ok(envelope) => envelope,
            Err(err) => return ToolResult::failure(err.message()),
        };
        self.invoke(&envelope)
    }

    pub fn design(&self, description: &str) -> ToolResult {
        let envelope = match DesignRequest::build(description, self.credential.as_ref()) {
            Ok(envelope) => envelope,
            Err(err) => return ToolResult::failure(err.message()),
        };
        self.invoke(&envelope)
    }

    /// Dispatch by wire task name. Names outside the registry are an
    /// explicit error, not a fallthrough, and launch nothing.
    pub fn handle(&self, tool_name: &str, arguments: &Map<String, Value>) -> ToolResult {
        match TaskId::parse(tool_name) {
            Some(TaskId::GenerateRailsApp) => self.generate(generate_args(arguments)),
            Some(TaskId::DesignRailsApp) => {
                let description = arguments
                    .get("description")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                self.design(description)
            }
            None => ToolResult::failure(format!("Unknown tool: {tool_name}")),
        }
    }

    fn invoke(&self, envelope: &TaskEnvelope) -> ToolResult {
        let request =
            build_exec_request(&self.config.generator, envelope, self.credential.as_ref());
        self.executor.invoke(&request)
    }
}

fn generate_args(arguments: &Map<String, Value>) -> GenerateArgs {
    GenerateArgs {
        description: arguments
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string),
        specification: arguments.get("specification").cloned(),
        output_path: arguments
            .get("output_path")
            .and_then(Value::as_str)
            .map(str::to_string),
        use_ai: arguments.get("use_ai").and_then(Value::as_bool),
    }
}
