//! Command line arguments and the configuration derived from them.

use crate::ir::OutputFormat;
use crate::loader::SchemaSource;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Browse a SchemaSpy XML schema: search, reference and graph views.
#[derive(Debug, Parser)]
#[command(name = "omop-schema-viz")]
#[command(about = "Search, reference and graph views over a database schema XML")]
pub struct Args {
    /// Schema location: a file path, or an http(s) URL. URLs ending in `/`
    /// get `schema.xml` appended.
    #[arg(short, long, default_value = "schema.xml")]
    pub source: String,

    /// HTTP request timeout (ms).
    #[arg(long, default_value_t = 30_000)]
    pub timeout_ms: u64,

    /// Write output to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render the page for a route path (`/`, `/reference/`, `/graph/`).
    Render {
        path: String,
        /// Search query to submit on the search page.
        #[arg(short, long)]
        query: Option<String>,
        /// Node to select on the graph page.
        #[arg(short, long)]
        node: Option<String>,
    },
    /// Print the tables and columns matching a query.
    Search {
        query: String,
        /// Print hits as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print the schema graph.
    Graph {
        /// svg or json
        #[arg(short, long, default_value = "svg", value_parser = parse_format)]
        format: OutputFormat,
    },
    /// Look up an element by name and print it as JSON (`null` if absent).
    Lookup { name: String },
}

fn parse_format(s: &str) -> Result<OutputFormat, String> {
    OutputFormat::from_str(s).ok_or_else(|| format!("invalid format {s:?}, expected svg or json"))
}

#[derive(Debug, Clone)]
pub struct Config {
    pub source: SchemaSource,
    pub timeout: Duration,
    pub output: Option<PathBuf>,
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        Self {
            source: SchemaSource::parse(&args.source),
            timeout: Duration::from_millis(args.timeout_ms),
            output: args.output.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["omop-schema-viz", "render", "/"]).unwrap();
        let config = Config::from(&args);
        assert_eq!(config.source, SchemaSource::File(PathBuf::from("schema.xml")));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.output.is_none());
        assert!(matches!(args.command, Command::Render { ref path, query: None, node: None } if path == "/"));
    }

    #[test]
    fn test_url_source_and_search() {
        let args = Args::try_parse_from([
            "omop-schema-viz",
            "--source",
            "https://example.org/",
            "--timeout-ms",
            "500",
            "search",
            "patient",
            "--json",
        ])
        .unwrap();
        let config = Config::from(&args);
        assert_eq!(config.source, SchemaSource::Url("https://example.org/".into()));
        assert_eq!(config.timeout, Duration::from_millis(500));
        assert!(matches!(args.command, Command::Search { ref query, json: true } if query == "patient"));
    }

    #[test]
    fn test_graph_format() {
        let args = Args::try_parse_from(["omop-schema-viz", "graph", "--format", "json"]).unwrap();
        assert!(matches!(args.command, Command::Graph { format: OutputFormat::Json }));

        assert!(Args::try_parse_from(["omop-schema-viz", "graph", "--format", "png"]).is_err());
    }
}
