use std::path::Path;

use anyhow::Context;

use mail_triage::config::TriageConfig;
use mail_triage::pipeline::processor::TriagePipeline;
use mail_triage::pipeline::types::{InputDocument, SourceKind};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let mut file: Option<String> = None;
    let mut as_json = false;
    let mut text_parts: Vec<String> = Vec::new();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--file" => file = Some(args.next().unwrap_or_else(|| usage())),
            "--json" => as_json = true,
            "--help" | "-h" => usage(),
            _ => text_parts.push(arg),
        }
    }

    let config = TriageConfig::from_env()?;

    eprintln!("mail-triage v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Strategy: {:?}", config.strategy());
    eprintln!("   Audit log: {}", config.audit_path.display());

    let input = match (file, text_parts.is_empty()) {
        (Some(path), _) => {
            let extension = Path::new(&path)
                .extension()
                .and_then(|ext| ext.to_str())
                .unwrap_or("");
            let kind = SourceKind::from_extension(extension)?;
            let bytes = std::fs::read(&path).with_context(|| format!("reading {path}"))?;
            InputDocument::from_bytes(bytes, kind)
        }
        (None, false) => InputDocument::text(text_parts.join(" ")),
        (None, true) => usage(),
    };

    let pipeline = TriagePipeline::from_config(&config)?;
    let result = pipeline.classify_email(input).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Category: {}", result.category);
        println!("Suggested reply: {}", result.suggested_reply);
    }

    Ok(())
}

fn usage() -> ! {
    eprintln!("Usage: mail-triage [--json] (--file <path.txt|path.pdf> | <email text>)");
    std::process::exit(2);
}
