//! openrouter-generate: 单次生成命令行工具
//!
//! Usage:
//!   openrouter-generate [OPTIONS] [--] <prompt>  Generate a completion (cached)
//!   openrouter-generate cache-path [--model <id>] Print the cache file location
//!
//! Reads the key from OPENROUTER_API_KEY. Set RUST_LOG=debug for cache/retry logs.

use openrouter_engine::client::config;
use openrouter_engine::{GenerationParams, OpenRouterEngine};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        print_usage();
        std::process::exit(1);
    }

    match args[0].as_str() {
        "help" | "--help" | "-h" => print_usage(),
        "version" | "--version" | "-V" => {
            println!("openrouter-generate {}", env!("CARGO_PKG_VERSION"))
        }
        "cache-path" => cmd_cache_path(&args[1..]),
        _ => cmd_generate(&args),
    }
}

fn print_usage() {
    println!(
        r#"openrouter-generate: one-shot OpenRouter completion with local caching

USAGE:
    openrouter-generate [OPTIONS] [--] <PROMPT>
    openrouter-generate cache-path [--model <ID>]

OPTIONS:
    --model <ID>            Model id (default: {model})
    --system <TEXT>         System prompt override
    --temperature <F>       Sampling temperature
    --max-tokens <N>        Maximum output tokens
    --top-p <F>             Nucleus sampling
    --site-url <URL>        HTTP-Referer header
    --site-name <NAME>      X-Title header

Use `--` before a prompt that starts with `-` or names a subcommand.

ENVIRONMENT:
    OPENROUTER_API_KEY      API key (required)
    RUST_LOG                Log filter, e.g. openrouter_engine=debug"#,
        model = config::DEFAULT_MODEL
    );
}

fn flag_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .take_while(|a| a.as_str() != "--")
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}

fn parse_value<T: std::str::FromStr>(name: &str, raw: Option<&str>) -> Result<Option<T>, String> {
    match raw {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| format!("invalid value for {name}: {raw}")),
    }
}

const VALUED_FLAGS: [&str; 7] = [
    "--model",
    "--system",
    "--temperature",
    "--max-tokens",
    "--top-p",
    "--site-url",
    "--site-name",
];

#[derive(Debug, Default, PartialEq)]
struct GenerateArgs {
    prompt: String,
    model: Option<String>,
    system: Option<String>,
    site_url: Option<String>,
    site_name: Option<String>,
    params: GenerationParams,
}

/// Flags may come before or after the prompt; everything after `--` is prompt text.
fn parse_generate_args(args: &[String]) -> Result<GenerateArgs, String> {
    let mut out = GenerateArgs::default();
    let mut prompt: Option<String> = None;
    let mut raw: Vec<(&str, &str)> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        if arg == "--" {
            let rest = args[i + 1..].join(" ");
            if prompt.is_some() || rest.is_empty() {
                return Err("expected exactly one prompt".into());
            }
            prompt = Some(rest);
            break;
        }
        if arg.starts_with("--") {
            if !VALUED_FLAGS.contains(&arg) {
                return Err(format!("unknown option: {arg}"));
            }
            let value = args
                .get(i + 1)
                .ok_or_else(|| format!("missing value for {arg}"))?;
            raw.push((arg, value.as_str()));
            i += 2;
            continue;
        }
        if prompt.is_some() {
            return Err(format!("unexpected argument: {arg}"));
        }
        prompt = Some(arg.to_string());
        i += 1;
    }

    out.prompt = prompt.ok_or_else(|| "missing prompt".to_string())?;
    let get = |name: &str| raw.iter().rev().find(|(k, _)| *k == name).map(|(_, v)| *v);
    out.model = get("--model").map(str::to_string);
    out.system = get("--system").map(str::to_string);
    out.site_url = get("--site-url").map(str::to_string);
    out.site_name = get("--site-name").map(str::to_string);
    out.params.temperature = parse_value("--temperature", get("--temperature"))?;
    out.params.max_tokens = parse_value("--max-tokens", get("--max-tokens"))?;
    out.params.top_p = parse_value("--top-p", get("--top-p"))?;
    Ok(out)
}

fn cmd_cache_path(args: &[String]) {
    let model = flag_value(args, "--model").unwrap_or(config::DEFAULT_MODEL);
    let dir = config::app_cache_dir(config::DEFAULT_APP_NAME);
    println!(
        "{}",
        config::cache_path(&dir, config::DEFAULT_CACHE_PROVIDER, model).display()
    );
}

fn cmd_generate(args: &[String]) {
    let parsed = match parse_generate_args(args) {
        Ok(parsed) => parsed,
        Err(msg) => {
            eprintln!("Error: {msg}");
            print_usage();
            std::process::exit(2);
        }
    };

    let mut builder = OpenRouterEngine::builder();
    if let Some(model) = parsed.model {
        builder = builder.model(model);
    }
    if let Some(url) = parsed.site_url {
        builder = builder.site_url(url);
    }
    if let Some(name) = parsed.site_name {
        builder = builder.site_name(name);
    }

    let engine = match builder.build() {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    match engine.generate_detailed(&parsed.prompt, parsed.system.as_deref(), &parsed.params) {
        Ok(generation) => {
            if generation.cached {
                eprintln!("(cached)");
            }
            println!("{}", generation.text);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
