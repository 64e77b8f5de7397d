// ABOUTME: CLI binary for the scour article extractor.
// ABOUTME: Fetches a URL or reads a file and prints the extracted article as HTML or JSON.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use scour::{Document, Fetcher, HttpFetcher};

const DISPLAY_CSS: &str = "
#article {
    margin: 0 auto;
    max-width: 705px;
    min-width: 225px;
    font-family: Georgia, 'Times New Roman', serif;
    font-size: 19px;
    line-height: 29px;
}

#article p {
    font-size: 19px;
    line-height: 29px;
    margin: 19px 0px 19px 0px;
}

h1.articleTitle {
    text-align: center;
}
";

#[derive(Parser, Debug)]
#[command(name = "scour")]
#[command(about = "Extract the readable article from a web page")]
struct Args {
    /// URL to fetch and extract
    #[arg()]
    url: Option<String>,

    /// HTML file to extract from instead of fetching
    #[arg(long = "file")]
    file: Option<PathBuf>,

    /// URL context when using --file, for link resolution
    #[arg(long = "url")]
    url_context: Option<String>,

    /// Output format: html (default), json, or full (standalone page)
    #[arg(short = 'f', long = "format", default_value = "html")]
    format: String,

    /// Output file path (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Print debug logging to stderr
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn full_page(title: &str, article: &str) -> String {
    format!(
        "<html><head><title>{title}</title><style type=\"text/css\">{css}</style></head>\
         <body><h1 class=\"articleTitle\">{title}</h1>{article}</body></html>",
        title = escape_html(title),
        css = DISPLAY_CSS,
        article = article,
    )
}

fn main() -> ExitCode {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    if args.url.is_some() && args.file.is_some() {
        eprintln!("error: pass either a URL or --file, not both");
        return ExitCode::from(1);
    }

    let page_url = args.url_context.clone().or_else(|| args.url.clone());

    let html = if let Some(path) = &args.file {
        match fs::read_to_string(path) {
            Ok(html) => html,
            Err(err) => {
                eprintln!("error reading {:?}: {}", path, err);
                return ExitCode::from(1);
            }
        }
    } else if let Some(url) = &args.url {
        match HttpFetcher::default().urlread(url) {
            Ok(html) => html,
            Err(err) => {
                eprintln!("error fetching {}: {:#}", url, err);
                return ExitCode::from(1);
            }
        }
    } else {
        eprintln!("error: either a URL or --file is required");
        return ExitCode::from(1);
    };

    let mut builder = Document::builder();
    if let Some(url) = &page_url {
        builder = builder.url(url.as_str());
    }
    let doc = builder.build(html);

    let summary = match doc.summary() {
        Ok(summary) => summary,
        Err(err) => {
            eprintln!("error: {}", err);
            return ExitCode::from(1);
        }
    };

    let rendered = match args.format.to_lowercase().as_str() {
        "json" => {
            let value = serde_json::json!({
                "title": doc.title(),
                "short_title": doc.short_title(),
                "confidence": summary.confidence,
                "html": summary.html,
            });
            match serde_json::to_string_pretty(&value) {
                Ok(rendered) => rendered,
                Err(err) => {
                    eprintln!("error rendering JSON: {}", err);
                    return ExitCode::from(1);
                }
            }
        }
        "full" => full_page(&doc.title(), summary.html.as_deref().unwrap_or("")),
        _ => summary.html.clone().unwrap_or_default(),
    };

    if let Some(path) = &args.output {
        if let Err(err) = fs::write(path, rendered) {
            eprintln!("error writing {:?}: {}", path, err);
            return ExitCode::from(1);
        }
    } else {
        println!("{}", rendered);
    }

    ExitCode::SUCCESS
}
