//! axquery - query HTML documents by accessibility role and state

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use axquery::{AttrValue, Document, ElementRef, Query, Tables};

#[derive(Parser)]
#[command(name = "axquery")]
#[command(version, about = "Query HTML documents by ARIA role and state", long_about = None)]
#[command(after_help = "EXAMPLES:
    axquery page.html                    List the role of every element
    axquery page.html button             Elements with role button or a sub-role
    axquery page.html ':expanded'        Elements whose aria-expanded is truthy
    axquery page.html '[level=\"2\"]'      Second-level headings
    axquery page.html heading --attr level --json")]
struct Cli {
    /// HTML file to load
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Accessibility selector: a role, `:state` or `[name="value"]`
    #[arg(value_name = "SELECTOR")]
    selector: Option<String>,

    /// Print only the first match
    #[arg(long, requires = "selector")]
    first: bool,

    /// Print the typed value of `aria-<KEY>` for each match
    #[arg(long, value_name = "KEY")]
    attr: Option<String>,

    /// JSON table configuration
    #[arg(long, value_name = "JSON")]
    tables: Option<PathBuf>,

    /// Also match elements that are not rendered
    #[arg(long)]
    include_hidden: bool,

    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// One reported element.
#[derive(Serialize)]
struct Report<'a> {
    tag: &'a str,
    role: Option<String>,
    id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    attr: Option<AttrValue>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: &Cli) -> axquery::Result<()> {
    let custom = match &cli.tables {
        Some(path) => Some(Tables::from_json(&std::fs::read_to_string(path)?)?),
        None => None,
    };
    let tables = custom.as_ref().unwrap_or(Tables::builtin());
    let query = Query::new(tables).include_hidden(cli.include_hidden);

    let doc = Document::open(&cli.input)?;

    let elements = match &cli.selector {
        Some(selector) if cli.first => query
            .query_selector(doc.root(), selector)?
            .into_iter()
            .collect(),
        Some(selector) => query.query_selector_all(doc.root(), selector)?,
        None => doc.elements().collect(),
    };

    let mut reports = Vec::with_capacity(elements.len());
    for el in &elements {
        let entry = report(&query, el, cli.attr.as_deref())?;
        // Without a selector only elements with a role are listed.
        if cli.selector.is_none() && entry.role.is_none() {
            continue;
        }
        reports.push(entry);
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            print_report(report);
        }
    }
    Ok(())
}

fn report<'a>(
    query: &Query<'_>,
    el: &ElementRef<'a>,
    attr: Option<&str>,
) -> axquery::Result<Report<'a>> {
    Ok(Report {
        tag: el.tag_name(),
        role: query.get_role(el)?,
        id: el.element_id(),
        attr: attr.map(|key| query.get_attribute(el, key)),
    })
}

fn print_report(report: &Report<'_>) {
    let mut line = report.tag.to_string();
    if let Some(role) = &report.role {
        line.push_str(&format!(" role={role}"));
    }
    if let Some(id) = report.id {
        line.push_str(&format!(" id={id}"));
    }
    if let Some(value) = &report.attr {
        line.push_str(&format!(" value={value}"));
    }
    println!("{line}");
}
