use std::env;
use std::fs;
use std::io;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use railforge_core::config::Config;
use railforge_core::credential::resolve_api_key;
use railforge_core::envelope::GenerateArgs;
use railforge_exec::bridge::GeneratorBridge;
use railforge_exec::contracts::ToolResult;
use railforge_exec::executor::GeneratorExecutor;
use railforge_exec::executor::RuntimeGeneratorExecutor;
use railforge_exec::executor::SimulatedGeneratorExecutor;
use serde_json::Map;
use serde_json::Value;

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let Some(command) = args.next() else {
        print_help();
        return Ok(());
    };

    match command.as_str() {
        "--help" | "-h" | "help" => {
            print_help();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("railforge {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "generate" => run_generate(args.collect::<Vec<_>>()),
        "design" => run_design(args.collect::<Vec<_>>()),
        "call" => run_call(args.collect::<Vec<_>>()),
        _ => {
            print_help();
            Err(format!("unknown command: {command}").into())
        }
    }
}

struct GenerateCommand {
    description: Option<String>,
    spec_file: Option<PathBuf>,
    output_path: Option<String>,
    use_ai: bool,
    api_key: Option<String>,
    simulate: bool,
}

fn parse_generate_args(args: Vec<String>) -> Result<GenerateCommand, Box<dyn std::error::Error>> {
    let mut command = GenerateCommand {
        description: None,
        spec_file: None,
        output_path: None,
        use_ai: true,
        api_key: None,
        simulate: false,
    };
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--output" => {
                let Some(value) = args.get(i + 1) else {
                    return Err("--output requires a path".into());
                };
                command.output_path = Some(value.clone());
                i += 2;
            }
            "--spec" => {
                let Some(value) = args.get(i + 1) else {
                    return Err("--spec requires a file path".into());
                };
                command.spec_file = Some(PathBuf::from(value));
                i += 2;
            }
            "--api-key" => {
                let Some(value) = args.get(i + 1) else {
                    return Err("--api-key requires a value".into());
                };
                command.api_key = Some(value.clone());
                i += 2;
            }
            "--no-ai" => {
                command.use_ai = false;
                i += 1;
            }
            "--simulate" => {
                command.simulate = true;
                i += 1;
            }
            other if other.starts_with("--") => {
                return Err(format!("unsupported argument: {other}").into());
            }
            _ => {
                if command.description.is_some() {
                    return Err("generate takes a single description".into());
                }
                command.description = Some(args[i].clone());
                i += 1;
            }
        }
    }
    Ok(command)
}

fn run_generate(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let command = parse_generate_args(args)?;
    let specification = match &command.spec_file {
        Some(path) => Some(load_specification(path)?),
        None => None,
    };
    let output_path = command.output_path.clone().unwrap_or_else(|| {
        format!("./generated_{}", chrono::Utc::now().timestamp())
    });

    let bridge = build_bridge(command.api_key.as_deref(), command.simulate)?;
    eprintln!("> Generating Rails application...");
    let result = bridge.generate(GenerateArgs {
        description: command.description,
        specification,
        output_path: Some(output_path),
        use_ai: Some(command.use_ai),
    });
    emit(result)
}

fn run_design(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let mut description = None;
    let mut api_key = None;
    let mut simulate = false;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--api-key" => {
                let Some(value) = args.get(i + 1) else {
                    return Err("--api-key requires a value".into());
                };
                api_key = Some(value.clone());
                i += 2;
            }
            "--simulate" => {
                simulate = true;
                i += 1;
            }
            other if other.starts_with("--") => {
                return Err(format!("unsupported argument: {other}").into());
            }
            _ => {
                if description.is_some() {
                    return Err("design takes a single description".into());
                }
                description = Some(args[i].clone());
                i += 1;
            }
        }
    }
    let Some(description) = description else {
        return Err("design requires a description".into());
    };

    let bridge = build_bridge(api_key.as_deref(), simulate)?;
    eprintln!("> Designing application architecture...");
    emit(bridge.design(&description))
}

fn run_call(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let mut api_key = None;
    let mut simulate = false;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--api-key" => {
                let Some(value) = args.get(i + 1) else {
                    return Err("--api-key requires a value".into());
                };
                api_key = Some(value.clone());
                i += 2;
            }
            "--simulate" => {
                simulate = true;
                i += 1;
            }
            other => {
                return Err(format!("unsupported argument: {other}").into());
            }
        }
    }

    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    let request: Value = serde_json::from_str(&input)
        .map_err(|err| format!("request is not valid JSON: {err}"))?;
    let tool = request
        .get("tool")
        .and_then(Value::as_str)
        .unwrap_or("generate_rails_app")
        .to_string();
    let params = request
        .get("params")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_else(Map::new);

    let bridge = build_bridge(api_key.as_deref(), simulate)?;
    emit(bridge.handle(&tool, &params))
}

fn build_bridge(
    api_key: Option<&str>,
    simulate: bool,
) -> Result<GeneratorBridge<Box<dyn GeneratorExecutor>>, Box<dyn std::error::Error>> {
    let config = load_config()?;
    let credential = resolve_api_key(api_key);
    let executor: Box<dyn GeneratorExecutor> = if simulate {
        eprintln!("> Simulated execution: no generator process will run");
        Box::new(SimulatedGeneratorExecutor)
    } else {
        Box::new(RuntimeGeneratorExecutor)
    };
    Ok(GeneratorBridge::new(config, credential, executor))
}

fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    let Some(base) = dirs::config_dir() else {
        return Ok(Config::default());
    };
    let path = base.join("railforge").join("config.toml");
    if !path.exists() {
        return Ok(Config::default());
    }
    let text = fs::read_to_string(&path)?;
    let config = toml::from_str(&text)
        .map_err(|err| format!("parse {}: {err}", path.display()))?;
    Ok(config)
}

fn load_specification(path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)
        .map_err(|err| format!("read {}: {err}", path.display()))?;
    let is_json = path
        .extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));
    let value = if is_json {
        serde_json::from_str(&text).map_err(|err| format!("parse {}: {err}", path.display()))?
    } else {
        serde_yaml::from_str(&text).map_err(|err| format!("parse {}: {err}", path.display()))?
    };
    Ok(value)
}

/// Result JSON goes to stdout; everything else this binary prints stays
/// on stderr. The exit code mirrors the result shape.
fn emit(result: ToolResult) -> Result<(), Box<dyn std::error::Error>> {
    let success = result.is_success();
    println!("{}", serde_json::to_string_pretty(&result.into_value())?);
    if !success {
        std::process::exit(1);
    }
    Ok(())
}

fn print_help() {
    println!("railforge {}", env!("CARGO_PKG_VERSION"));
    println!("Usage:");
    println!("  railforge generate <description> [--spec FILE] [--output PATH] [--no-ai] [--api-key KEY] [--simulate]");
    println!("  railforge design <description> [--api-key KEY] [--simulate]");
    println!("  railforge call [--api-key KEY] [--simulate]   (request JSON on stdin)");
    println!("  railforge --help");
    println!("  railforge --version");
}
