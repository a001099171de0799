use std::io::Write;
use std::process::Command;
use std::process::Stdio;

use serde_json::Map;
use serde_json::Value;

use crate::contracts::ToolResult;
use crate::request::ExecRequest;

pub trait GeneratorExecutor {
    fn invoke(&self, request: &ExecRequest) -> ToolResult;
}

impl GeneratorExecutor for Box<dyn GeneratorExecutor> {
    fn invoke(&self, request: &ExecRequest) -> ToolResult {
        self.as_ref().invoke(request)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RuntimeGeneratorExecutor;

#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedGeneratorExecutor;

impl GeneratorExecutor for RuntimeGeneratorExecutor {
    fn invoke(&self, request: &ExecRequest) -> ToolResult {
        match run_generator(request) {
            Ok(result) => result,
            Err(err) => ToolResult::failure(format!("Tool execution failed: {err}")),
        }
    }
}

/// One blocking invocation: spawn, feed stdin, drain both streams, decode.
/// Exit is terminal; there is no retry.
fn run_generator(request: &ExecRequest) -> std::io::Result<ToolResult> {
    let mut command = Command::new(&request.program);
    command
        .args(&request.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(cwd) = &request.cwd {
        command.current_dir(cwd);
    }
    for (name, value) in &request.env {
        command.env(name, value);
    }

    let mut child = command.spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(request.payload.as_bytes())?;
    }
    let output = child.wait_with_output()?;

    if !output.status.success() {
        let stderr_text = String::from_utf8_lossy(&output.stderr);
        return Ok(ToolResult::failure(format!(
            "Tool failed: {}",
            stderr_text.trim()
        )));
    }

    let stdout_text = String::from_utf8_lossy(&output.stdout);
    match serde_json::from_str::<Value>(&stdout_text) {
        Ok(response) => Ok(ToolResult::from_response(response)),
        Err(err) => Ok(ToolResult::failure(format!("Invalid JSON response: {err}"))),
    }
}

impl GeneratorExecutor for SimulatedGeneratorExecutor {
    fn invoke(&self, request: &ExecRequest) -> ToolResult {
        let Ok(payload) = serde_json::from_str::<Value>(&request.payload) else {
            return ToolResult::failure("Invalid JSON response: request payload is not JSON");
        };
        let tool = payload
            .get("tool")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let params = payload.get("params").cloned().unwrap_or(Value::Null);

        match tool.as_str() {
            "generate_rails_app" => {
                let output_path = params
                    .get("output_path")
                    .and_then(Value::as_str)
                    .unwrap_or("./generated_app");
                let mut response = Map::new();
                response.insert("success".to_string(), Value::Bool(true));
                response.insert(
                    "app_path".to_string(),
                    Value::String(output_path.to_string()),
                );
                response.insert("entities_created".to_string(), Value::from(0));
                response.insert("features_generated".to_string(), Value::from(0));
                response.insert("simulated".to_string(), Value::Bool(true));
                ToolResult::Success(Value::Object(response))
            }
            "design_rails_app" => {
                let mut response = Map::new();
                response.insert("success".to_string(), Value::Bool(true));
                response.insert(
                    "name".to_string(),
                    Value::String("Simulated application".to_string()),
                );
                response.insert("entities".to_string(), Value::Array(Vec::new()));
                response.insert("relationships".to_string(), Value::Array(Vec::new()));
                response.insert("simulated".to_string(), Value::Bool(true));
                ToolResult::Success(Value::Object(response))
            }
            other => ToolResult::failure(format!("Unknown tool: {other}")),
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;
    use serde_json::Value;

    use super::*;

    fn write_stub(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("stub_generator.sh");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write stub");
        let mut perms = fs::metadata(&path).expect("stub metadata").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).expect("chmod stub");
        path
    }

    fn request_for(program: &Path, payload: &str) -> ExecRequest {
        ExecRequest {
            cwd: None,
            program: program.display().to_string(),
            args: Vec::new(),
            env: Vec::new(),
            payload: payload.to_string(),
        }
    }

    const GENERATE_PAYLOAD: &str =
        r#"{"tool":"generate_rails_app","params":{"description":"todo app","output_path":"/tmp/test","use_ai":false}}"#;

    #[test]
    fn zero_exit_json_output_is_decoded_as_the_result() {
        let dir = tempfile::tempdir().expect("tempdir");
        let stub = write_stub(
            dir.path(),
            r#"cat >/dev/null
echo '{"success": true, "app_path": "/tmp/x"}'"#,
        );

        let result = RuntimeGeneratorExecutor.invoke(&request_for(&stub, GENERATE_PAYLOAD));
        assert!(result.is_success());
        assert_eq!(
            result.into_value().get("app_path"),
            Some(&Value::String("/tmp/x".to_string()))
        );
    }

    #[test]
    fn non_zero_exit_surfaces_the_error_stream() {
        let dir = tempfile::tempdir().expect("tempdir");
        let stub = write_stub(
            dir.path(),
            r#"cat >/dev/null
echo boom >&2
exit 1"#,
        );

        let result = RuntimeGeneratorExecutor.invoke(&request_for(&stub, GENERATE_PAYLOAD));
        let error = result.error().expect("failure");
        assert!(error.starts_with("Tool failed:"));
        assert!(error.contains("boom"));
    }

    #[test]
    fn non_json_output_is_a_decode_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let stub = write_stub(
            dir.path(),
            r#"cat >/dev/null
echo not json"#,
        );

        let result = RuntimeGeneratorExecutor.invoke(&request_for(&stub, GENERATE_PAYLOAD));
        assert!(result
            .error()
            .expect("failure")
            .starts_with("Invalid JSON response:"));
    }

    #[test]
    fn missing_executable_is_a_launch_failure_not_a_fault() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("no_such_generator.sh");

        let result = RuntimeGeneratorExecutor.invoke(&request_for(&missing, GENERATE_PAYLOAD));
        assert!(result
            .error()
            .expect("failure")
            .starts_with("Tool execution failed:"));
    }

    #[test]
    fn payload_reaches_the_child_on_stdin() {
        let dir = tempfile::tempdir().expect("tempdir");
        let stub = write_stub(
            dir.path(),
            r#"payload=$(cat)
printf '{"success": true, "echo": %s}' "$payload""#,
        );

        let result = RuntimeGeneratorExecutor.invoke(&request_for(&stub, GENERATE_PAYLOAD));
        let value = result.into_value();
        let echoed = value.get("echo").expect("echoed payload");
        assert_eq!(
            echoed.get("tool"),
            Some(&Value::String("generate_rails_app".to_string()))
        );
    }

    #[test]
    fn env_overlay_is_visible_to_the_child() {
        let dir = tempfile::tempdir().expect("tempdir");
        let stub = write_stub(
            dir.path(),
            r#"cat >/dev/null
printf '{"success": true, "key": "%s"}' "$RAILFORGE_STUB_KEY""#,
        );

        let mut request = request_for(&stub, GENERATE_PAYLOAD);
        request.env.push((
            "RAILFORGE_STUB_KEY".to_string(),
            "sk-overlay".to_string(),
        ));

        let result = RuntimeGeneratorExecutor.invoke(&request);
        assert_eq!(
            result.into_value().get("key"),
            Some(&Value::String("sk-overlay".to_string()))
        );
    }

    #[test]
    fn simulated_generate_is_deterministic() {
        let request = ExecRequest {
            cwd: None,
            program: "ruby".to_string(),
            args: Vec::new(),
            env: Vec::new(),
            payload: GENERATE_PAYLOAD.to_string(),
        };
        let first = SimulatedGeneratorExecutor.invoke(&request);
        let second = SimulatedGeneratorExecutor.invoke(&request);
        assert_eq!(first, second);
        assert_eq!(
            first.into_value().get("app_path"),
            Some(&Value::String("/tmp/test".to_string()))
        );
    }

    #[test]
    fn simulated_executor_rejects_unknown_tools() {
        let request = ExecRequest {
            cwd: None,
            program: "ruby".to_string(),
            args: Vec::new(),
            env: Vec::new(),
            payload: r#"{"tool":"deploy_rails_app","params":{}}"#.to_string(),
        };
        let result = SimulatedGeneratorExecutor.invoke(&request);
        assert_eq!(result.error(), Some("Unknown tool: deploy_rails_app"));
    }
}
