use std::path::PathBuf;

use railforge_core::config::GeneratorConfig;
use railforge_core::credential::ApiKey;
use railforge_core::credential::API_KEY_ENV;
use railforge_core::envelope::TaskEnvelope;

/// A fully-resolved generator launch: program, transport argument, the
/// credential overlay for the child environment, and the request JSON
/// destined for the child's stdin.
#[derive(Debug, Clone)]
pub struct ExecRequest {
    pub cwd: Option<PathBuf>,
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
    pub payload: String,
}

/// Pure assembly, no I/O. The overlay is scoped to the child process;
/// the caller's environment is never touched.
pub fn build_exec_request(
    config: &GeneratorConfig,
    envelope: &TaskEnvelope,
    credential: Option<&ApiKey>,
) -> ExecRequest {
    let mut env = Vec::new();
    if let Some(key) = credential {
        env.push((API_KEY_ENV.to_string(), key.expose().to_string()));
    }

    ExecRequest {
        cwd: None,
        program: config.program.clone(),
        args: vec![config.script.clone(), config.transport_arg.clone()],
        env,
        payload: envelope.to_wire().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use railforge_core::config::OutputConfig;
    use railforge_core::envelope::GenerateArgs;
    use railforge_core::envelope::GenerateRequest;
    use serde_json::Value;

    use super::*;

    fn envelope() -> TaskEnvelope {
        GenerateRequest::build(
            GenerateArgs {
                description: Some("todo app".to_string()),
                ..GenerateArgs::default()
            },
            &OutputConfig::default(),
        )
        .expect("envelope")
    }

    #[test]
    fn request_invokes_the_script_in_json_transport_mode() {
        let request = build_exec_request(&GeneratorConfig::default(), &envelope(), None);
        assert_eq!(request.program, "ruby");
        assert_eq!(
            request.args,
            vec!["./rails_bdd_tool.rb".to_string(), "json".to_string()]
        );
        assert!(request.env.is_empty());
    }

    #[test]
    fn payload_is_the_wire_envelope() {
        let request = build_exec_request(&GeneratorConfig::default(), &envelope(), None);
        let payload: Value = serde_json::from_str(&request.payload).expect("payload json");
        assert_eq!(
            payload.get("tool"),
            Some(&Value::String("generate_rails_app".to_string()))
        );
    }

    #[test]
    fn credential_overlays_the_child_environment_only() {
        let ambient_before = std::env::var(API_KEY_ENV).ok();
        let key = ApiKey::new("sk-test");
        let request = build_exec_request(&GeneratorConfig::default(), &envelope(), Some(&key));
        assert_eq!(
            request.env,
            vec![(API_KEY_ENV.to_string(), "sk-test".to_string())]
        );
        // assembly overlays the child environment, not this process
        assert_eq!(std::env::var(API_KEY_ENV).ok(), ambient_before);
    }
}
