// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Livetap CLI
//!
//! Runs the local collector, or taps a single call through a hooked page.

use std::env;
use std::process::ExitCode;

use anyhow::Context;
use livetap::http::headers;
use livetap::{
    Collector, CollectorConfig, FetchInput, InterceptionHook, Page, PageConfig, RequestInit,
    TapConfig,
};
use reqwest::Method;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("livetap=info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    let result = match args[1].as_str() {
        "serve" => {
            let port = match args.get(2).map(|p| p.parse::<u16>()) {
                None => livetap::config::DEFAULT_COLLECTOR_PORT,
                Some(Ok(port)) => port,
                Some(Err(e)) => {
                    eprintln!("Invalid port '{}': {}", args[2], e);
                    return ExitCode::from(1);
                }
            };
            serve(port).await
        }
        "tap" => {
            if args.len() < 4 {
                eprintln!("Usage: livetap tap <page-url> <target-url> [json-body]");
                return ExitCode::from(1);
            }
            tap(&args[2], &args[3], args.get(4).map(String::as_str)).await
        }
        "--help" | "-h" | "help" => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        "--version" | "-v" | "version" => {
            println!("livetap {}", livetap::VERSION);
            return ExitCode::SUCCESS;
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            return ExitCode::from(1);
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"Livetap - Live chat response tap

USAGE:
    livetap <COMMAND> [OPTIONS]

COMMANDS:
    serve [port]                             Run the local collector (default port 8000)
    tap <page-url> <target-url> [json-body]  Fetch a target through a hooked page
    help                                     Show this help message
    version                                  Show version information

EXAMPLES:
    livetap serve
    livetap tap "https://www.youtube.com/watch?v=VIDEO" \
        "https://www.youtube.com/youtubei/v1/live_chat/get_live_chat?prettyPrint=false" \
        '{{"context":{{}}}}'

Set RUST_LOG to change log verbosity (default: livetap=info).
"#
    );
}

async fn serve(port: u16) -> anyhow::Result<()> {
    let config = CollectorConfig::new().port(port);
    let collector = Collector::bind(&config)
        .await
        .context("failed to start collector")?;
    collector.run().await?;
    Ok(())
}

async fn tap(page_url: &str, target: &str, body: Option<&str>) -> anyhow::Result<()> {
    let page = Page::new(PageConfig::default())?;
    page.set_url(page_url)
        .with_context(|| format!("invalid page url {}", page_url))?;

    let hook = InterceptionHook::install(&page, &TapConfig::default())?;
    if !hook.matches(target) {
        println!("Note: target does not match the live chat pattern, it will not be relayed");
    }

    let input = match body {
        Some(body) => FetchInput::with_init(
            target,
            RequestInit::new()
                .method(Method::POST)
                .header(headers::CONTENT_TYPE, "application/json")
                .body(body.to_string()),
        ),
        None => FetchInput::target(target),
    };

    let response = page.fetch(input).await.context("fetch failed")?;

    println!("\n=== Response ===");
    println!("Status: {} {}", response.status_code(), response.status_text());
    println!("URL: {}", response.url());
    println!("Type: {}", response.response_type());
    println!("Redirected: {}", response.redirected());
    println!("Content-Type: {:?}", response.content_type());
    println!("Time: {}ms", response.response_time_ms);

    let text = response.text().await.context("reading body failed")?;
    println!("\n=== Body ({} bytes) ===", text.len());
    println!("{}", text);

    hook.settled().await;
    Ok(())
}
