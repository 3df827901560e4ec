//! caption-bridge CLI：调用远程描述/翻译服务、解析双语文本的命令行工具
//!
//! Usage:
//!   caption-bridge-cli health <url>                       Check service health
//!   caption-bridge-cli translate <url> <text>             Translate text
//!   caption-bridge-cli caption <url> <image> [prompt]     Caption a JPEG image
//!   caption-bridge-cli parse <text>                       Parse a bilingual caption locally
//!   caption-bridge-cli clear-cache <url> [service]        Clear service caches
//!   caption-bridge-cli cleanup-memory <url> <service>     Free service memory

use anyhow::{bail, Context};
use caption_bridge::types::{CaptionRequest, GenerationParams, TranslationRequest};
use caption_bridge::{parse_bilingual_caption, ServiceClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "caption_bridge=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let result = match args[1].as_str() {
        "health" => cmd_health(&args[2..]),
        "translate" => cmd_translate(&args[2..]),
        "caption" => cmd_caption(&args[2..]),
        "parse" => cmd_parse(&args[2..]),
        "clear-cache" => cmd_clear_cache(&args[2..]),
        "cleanup-memory" => cmd_cleanup_memory(&args[2..]),
        "version" | "--version" | "-V" => {
            cmd_version();
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"caption-bridge-cli: 图像描述服务命令行工具

USAGE:
    caption-bridge-cli <COMMAND> [ARGS]

COMMANDS:
    health <url>                      Check service health
    translate <url> <text>            Translate text (Chinese <-> English)
    caption <url> <image> [prompt]    Caption a JPEG image
    parse <text>                      Parse a bilingual caption without a service
    clear-cache <url> [service]       Clear one or all service caches
    cleanup-memory <url> <service>    Free memory held by a service
    version                           Show version information
    help                              Show this help message

ENVIRONMENT:
    CAPTION_BRIDGE_TIMEOUT_SECS       Request timeout in seconds (default 60)
    CAPTION_BRIDGE_USER               User name sent with each request
    CAPTION_BRIDGE_IP                 Client IP sent with each request
    CAPTION_BRIDGE_PROXY_URL          HTTP(S) proxy
    CAPTION_BRIDGE_DOWNGRADE_HTTPS    Rewrite https:// base URLs to http://
    RUST_LOG                          Log filter (e.g. caption_bridge=debug)"#
    );
}

fn cmd_version() {
    println!("caption-bridge-cli {}", env!("CARGO_PKG_VERSION"));
}

fn require<'a>(args: &'a [String], idx: usize, usage: &str) -> anyhow::Result<&'a str> {
    match args.get(idx) {
        Some(v) => Ok(v.as_str()),
        None => bail!("Usage: caption-bridge-cli {usage}"),
    }
}

fn client() -> anyhow::Result<ServiceClient> {
    ServiceClient::new().context("failed to build client from environment")
}

fn cmd_health(args: &[String]) -> anyhow::Result<()> {
    let url = require(args, 0, "health <url>")?;
    let status = client()?.health_check(url)?;
    println!("{}", serde_json::to_string_pretty(&status)?);
    if !status.is_healthy() {
        bail!("service reports unhealthy status");
    }
    Ok(())
}

fn cmd_translate(args: &[String]) -> anyhow::Result<()> {
    let usage = "translate <url> <text>";
    let url = require(args, 0, usage)?;
    let text = require(args, 1, usage)?;
    let translated = client()?.translate(url, &TranslationRequest::new(text))?;
    println!("{translated}");
    Ok(())
}

fn cmd_caption(args: &[String]) -> anyhow::Result<()> {
    let usage = "caption <url> <image> [prompt]";
    let url = require(args, 0, usage)?;
    let path = require(args, 1, usage)?;
    let image = std::fs::read(path).with_context(|| format!("cannot read {path}"))?;

    let params = match args.get(2) {
        Some(prompt) => GenerationParams::new(prompt.as_str()),
        None => GenerationParams::default(),
    };
    let result = client()?.generate_caption(url, &CaptionRequest::new(image, params))?;

    println!("English: {}", result.english);
    println!("Chinese: {}", result.chinese);
    Ok(())
}

fn cmd_parse(args: &[String]) -> anyhow::Result<()> {
    if args.is_empty() {
        bail!("Usage: caption-bridge-cli parse <text>");
    }
    let result = parse_bilingual_caption(&args.join(" "));
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn cmd_clear_cache(args: &[String]) -> anyhow::Result<()> {
    let url = require(args, 0, "clear-cache <url> [service]")?;
    let service = args.get(1).map(String::as_str);
    let cleared = client()?.clear_cache(url, service)?;
    println!(
        "Cleared {} entries from: {}",
        cleared.cleared_count,
        if cleared.cleared_services.is_empty() {
            "-".to_string()
        } else {
            cleared.cleared_services.join(", ")
        }
    );
    Ok(())
}

fn cmd_cleanup_memory(args: &[String]) -> anyhow::Result<()> {
    let usage = "cleanup-memory <url> <service>";
    let url = require(args, 0, usage)?;
    let service = require(args, 1, usage)?;
    let freed = client()?.cleanup_memory(url, service)?;
    println!(
        "Freed: {}{}",
        freed.freed_memory,
        if freed.cleanup_details.is_empty() {
            String::new()
        } else {
            format!(" ({})", freed.cleanup_details)
        }
    );
    Ok(())
}
