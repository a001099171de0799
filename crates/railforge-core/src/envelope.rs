use serde_json::Map;
use serde_json::Value;

use crate::config::OutputConfig;
use crate::credential::ApiKey;
use crate::task_registry::TaskId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeError {
    MissingInput,
    MissingDescription,
    MissingCredential,
}

impl EnvelopeError {
    pub fn message(self) -> &'static str {
        match self {
            Self::MissingInput => "Either description or specification is required",
            Self::MissingDescription => "Description is required",
            Self::MissingCredential => "ANTHROPIC_API_KEY is required for AI design",
        }
    }
}

/// Exactly one of the two generate inputs; supplying both is not
/// representable once selection has happened.
#[derive(Debug, Clone, PartialEq)]
pub enum AppInput {
    Description(String),
    Specification(Value),
}

impl AppInput {
    /// A present description wins; the specification is ignored so the
    /// envelope parameters carry a single input key.
    pub fn select(
        description: Option<String>,
        specification: Option<Value>,
    ) -> Result<Self, EnvelopeError> {
        if let Some(description) = description.filter(|text| !text.trim().is_empty()) {
            return Ok(Self::Description(description));
        }
        match specification {
            Some(specification) => Ok(Self::Specification(specification)),
            None => Err(EnvelopeError::MissingInput),
        }
    }

    pub fn param_key(&self) -> &'static str {
        match self {
            Self::Description(_) => "description",
            Self::Specification(_) => "specification",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateArgs {
    pub description: Option<String>,
    pub specification: Option<Value>,
    pub output_path: Option<String>,
    pub use_ai: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub input: AppInput,
    pub output_path: String,
    pub use_ai: bool,
}

impl GenerateRequest {
    pub fn build(args: GenerateArgs, defaults: &OutputConfig) -> Result<TaskEnvelope, EnvelopeError> {
        let input = AppInput::select(args.description, args.specification)?;
        Ok(TaskEnvelope::Generate(Self {
            input,
            output_path: args
                .output_path
                .unwrap_or_else(|| defaults.generation_dir.clone()),
            use_ai: args.use_ai.unwrap_or(true),
        }))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DesignRequest {
    pub description: String,
}

impl DesignRequest {
    /// Fails without a resolvable credential before any process exists;
    /// the key itself travels in the exec request environment, never in
    /// the envelope.
    pub fn build(
        description: &str,
        credential: Option<&ApiKey>,
    ) -> Result<TaskEnvelope, EnvelopeError> {
        if credential.is_none() {
            return Err(EnvelopeError::MissingCredential);
        }
        if description.trim().is_empty() {
            return Err(EnvelopeError::MissingDescription);
        }
        Ok(TaskEnvelope::Design(Self {
            description: description.to_string(),
        }))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskEnvelope {
    Generate(GenerateRequest),
    Design(DesignRequest),
}

impl TaskEnvelope {
    pub fn task_id(&self) -> TaskId {
        match self {
            Self::Generate(_) => TaskId::GenerateRailsApp,
            Self::Design(_) => TaskId::DesignRailsApp,
        }
    }

    pub fn params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        match self {
            Self::Generate(request) => {
                match &request.input {
                    AppInput::Description(description) => {
                        params.insert(
                            "description".to_string(),
                            Value::String(description.clone()),
                        );
                    }
                    AppInput::Specification(specification) => {
                        params.insert("specification".to_string(), specification.clone());
                    }
                }
                params.insert(
                    "output_path".to_string(),
                    Value::String(request.output_path.clone()),
                );
                params.insert("use_ai".to_string(), Value::Bool(request.use_ai));
            }
            Self::Design(request) => {
                params.insert(
                    "description".to_string(),
                    Value::String(request.description.clone()),
                );
            }
        }
        params
    }

    /// The request JSON written to the generator's stdin.
    pub fn to_wire(&self) -> Value {
        let mut wire = Map::new();
        wire.insert(
            "tool".to_string(),
            Value::String(self.task_id().as_str().to_string()),
        );
        wire.insert("params".to_string(), Value::Object(self.params()));
        Value::Object(wire)
    }
}
