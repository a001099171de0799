use serde::Serialize;
use serde::Serializer;
use serde_json::Map;
use serde_json::Value;

/// Outcome of one generator call: the collaborator's response verbatim on
/// success, or a failure message. Exactly one shape, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolResult {
    Success(Value),
    Failure {
        error: String,
        /// The collaborator's verbatim response when it reported the
        /// failure itself; absent for failures detected on this side of
        /// the process boundary.
        response: Option<Value>,
    },
}

impl ToolResult {
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            error: message.into(),
            response: None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure { error, .. } => Some(error),
        }
    }

    /// Decode of parsed collaborator output. Only an object that says
    /// `"success": false` is a failure; everything else passes through
    /// verbatim, since the collaborator owns the success contract.
    pub fn from_response(value: Value) -> Self {
        let reported_failure = value
            .as_object()
            .and_then(|object| object.get("success"))
            .and_then(Value::as_bool)
            == Some(false);
        if !reported_failure {
            return Self::Success(value);
        }

        let error = value
            .as_object()
            .and_then(|object| object.get("error"))
            .and_then(Value::as_str)
            .unwrap_or("tool reported failure without an error message")
            .to_string();
        Self::Failure {
            error,
            response: Some(value),
        }
    }

    /// The caller-facing JSON. Collaborator responses are re-emitted
    /// verbatim; locally-detected failures take the two-field shape.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Success(value) => value.clone(),
            Self::Failure { response: Some(response), .. } => response.clone(),
            Self::Failure { error, response: None } => {
                let mut object = Map::new();
                object.insert("success".to_string(), Value::Bool(false));
                object.insert("error".to_string(), Value::String(error.clone()));
                Value::Object(object)
            }
        }
    }

    pub fn into_value(self) -> Value {
        self.to_value()
    }
}

impl Serialize for ToolResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_value().serialize(serializer)
    }
}
