use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub generator: GeneratorConfig,
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GeneratorConfig {
    pub program: String,
    pub script: String,
    pub transport_arg: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            program: "ruby".to_string(),
            script: "./rails_bdd_tool.rb".to_string(),
            transport_arg: "json".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    pub generation_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            generation_dir: "./generated_app".to_string(),
        }
    }
}
