#[cfg(not(target_arch = "wasm32"))]
use omop_schema_viz::{
    config::{Args, Command, Config},
    ir::{GraphEvent, GraphIR, OutputFormat},
    layout::LayoutEngine,
    loader::Loader,
    query,
    router::{Event, Router},
    search::{self, Hit, SearchEvent},
    svg::SvgRenderer,
};

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    use clap::Parser;
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    // Logs go to stderr; stdout carries the rendered output.
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = Config::from(&args);
    let loader = Loader::new(config.source.clone()).with_timeout(config.timeout);

    let output = match args.command {
        Command::Render { path, query, node } => {
            let activation = Router::default().activate(&path, &loader).await?;
            let mut model = activation.model();
            if let Some(query) = query {
                model = model
                    .apply(Event::Search(SearchEvent::QueryChanged(query)))
                    .apply(Event::Search(SearchEvent::Submitted));
            }
            if let Some(node) = node {
                model = model.apply(Event::Graph(GraphEvent::NodeClicked(node)));
            }
            model.render()
        }
        Command::Search { query, json } => {
            let schema = loader.load().await?;
            let hits = search::search(&schema, &query);
            if json {
                serde_json::to_string_pretty(&hits)?
            } else {
                hits.iter().map(format_hit).collect()
            }
        }
        Command::Graph { format } => {
            let schema = loader.load().await?;
            let ir = GraphIR::from_schema(&schema);
            match format {
                OutputFormat::Svg => {
                    let layout = LayoutEngine::default().layout(&ir);
                    SvgRenderer::default().render(&ir, &layout)
                }
                OutputFormat::Json => ir.to_json()?,
            }
        }
        Command::Lookup { name } => {
            let schema = loader.load().await?;
            serde_json::to_string_pretty(&query::find_by_name(&schema, &name))?
        }
    };

    match &config.output {
        Some(path) => std::fs::write(path, &output)
            .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path.display(), e))?,
        None => println!("{}", output.trim_end()),
    }

    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn format_hit(hit: &Hit<'_>) -> String {
    let kind = match hit {
        Hit::Table { .. } => "table",
        Hit::Column { .. } => "column",
    };
    format!("{}\t{}\t{}\n", kind, hit.name(), hit.remarks().unwrap_or(""))
}

#[cfg(target_arch = "wasm32")]
fn main() {}
