//! typematch CLI: loads case configs and evaluates JSON values against them.
//!
//! Subcommands:
//! - `eval <config> <json> [--trace]`: evaluate a JSON value, print the action
//! - `check <config>`: validate config loads without errors
//! - `info`: print registered matcher names
//!
//! Set `RUST_LOG` (e.g. `RUST_LOG=typematcher=trace`) to see per-arm logs.

use std::process;

use typematcher::{Case, CaseConfig, MatchError, Registry, RegistryBuilder, Value};

type Action = serde_json::Value;

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "eval" => cmd_eval(&args[2..]),
        "check" => cmd_check(&args[2..]),
        "info" => cmd_info(),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("error: unknown command \"{other}\"");
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

/// Installs a stderr subscriber only when `RUST_LOG` is set.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var_os("RUST_LOG").is_none() {
        return;
    }
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(EnvFilter::from_default_env())
        .init();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Commands
// ═══════════════════════════════════════════════════════════════════════════════

fn cmd_eval(args: &[String]) -> Result<(), String> {
    let opts = parse_eval_args(args)?;

    let config = load_config(&opts.config_path)?;
    let case = build_registry()
        .load_case(config)
        .map_err(|e| format!("config load failed: {e}"))?;
    tracing::debug!(path = %opts.config_path, arms = case.len(), "loaded case config");
    let input = parse_input(&opts.input)?;

    if opts.trace {
        for step in &case.evaluate_with_trace(&input).steps {
            println!("{step}");
        }
    }
    println!("{}", render(evaluate(&case, &input)));

    Ok(())
}

fn cmd_check(args: &[String]) -> Result<(), String> {
    let config_path = args
        .first()
        .ok_or_else(|| String::from("check requires a config file path"))?;

    let config = load_config(config_path)?;
    let case = build_registry()
        .load_case(config)
        .map_err(|e| format!("config invalid: {e}"))?;

    println!("Config valid ({} arms)", case.len());
    for index in case.unreachable_arms() {
        println!("  warning: arm {index} is unreachable");
    }
    Ok(())
}

#[allow(clippy::unnecessary_wraps)] // Uniform return type for all commands
fn cmd_info() -> Result<(), String> {
    let registry = build_registry();

    println!("Registered matchers:");
    for name in registry.matcher_names() {
        println!("  {name}");
    }

    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Registry assembly (composition root)
// ═══════════════════════════════════════════════════════════════════════════════

fn build_registry() -> Registry {
    typematcher_test::register(RegistryBuilder::new()).build()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Config and input loading
// ═══════════════════════════════════════════════════════════════════════════════

fn load_config(path: &str) -> Result<CaseConfig<Action>, String> {
    let content =
        std::fs::read_to_string(path).map_err(|e| format!("failed to read \"{path}\": {e}"))?;

    let is_json = std::path::Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        serde_json::from_str(&content).map_err(|e| format!("JSON parse error: {e}"))
    } else {
        serde_yaml::from_str(&content).map_err(|e| format!("YAML parse error: {e}"))
    }
}

/// Parses the input argument; the bare word `undefined` is the absent value.
fn parse_input(raw: &str) -> Result<Value, String> {
    if raw.trim() == "undefined" {
        return Ok(Value::Undefined);
    }
    serde_json::from_str::<serde_json::Value>(raw)
        .map(Value::from)
        .map_err(|e| format!("invalid JSON input: {e}"))
}

/// Evaluates `input`, attaching it to a no-match error.
fn evaluate(case: &Case<Value, Action>, input: &Value) -> Result<Action, MatchError> {
    case.evaluate(input).map_err(|e| e.with_value(input))
}

fn render(result: Result<Action, MatchError>) -> String {
    match result {
        Ok(action) => action.to_string(),
        Err(e) => format!("error: {e}"),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Argument parsing
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, PartialEq)]
struct EvalArgs {
    config_path: String,
    input: String,
    trace: bool,
}

fn parse_eval_args(args: &[String]) -> Result<EvalArgs, String> {
    let mut positional = Vec::new();
    let mut trace = false;

    for arg in args {
        match arg.as_str() {
            "--trace" => trace = true,
            flag if flag.starts_with("--") => {
                return Err(format!("unexpected argument \"{flag}\""));
            }
            _ => positional.push(arg.clone()),
        }
    }

    match <[String; 2]>::try_from(positional) {
        Ok([config_path, input]) => Ok(EvalArgs {
            config_path,
            input,
            trace,
        }),
        Err(_) => Err("eval requires a config file path and a JSON input".into()),
    }
}

fn print_usage() {
    eprintln!(
        "Usage: typematch <command> [options]

Commands:
  eval <config> <json> [--trace]   Evaluate a JSON value against a case config
  check <config>                   Validate config
  info                             Print registered matcher names
  help                             Show this help"
    );
}
