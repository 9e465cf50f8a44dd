//! Route table and the per-route init/render pair.
//!
//! Each activation loads the schema from scratch; nothing is shared
//! between routes.

use crate::ast::Schema;
use crate::error::Error;
use crate::html;
use crate::ir::{GraphEvent, GraphIR, GraphState};
use crate::loader::Loader;
use crate::search::{SearchEvent, SearchState};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("No route for {0}")]
    NotFound(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Search,
    Reference,
    Graph,
}

pub struct Router {
    routes: Vec<(String, Route)>,
}

impl Default for Router {
    fn default() -> Self {
        let mut router = Router::new();
        router.append("/", Route::Search);
        router.append("/reference/", Route::Reference);
        router.append("/graph/", Route::Graph);
        router
    }
}

/// Drop query string and fragment, and make `/x` and `/x/` equivalent.
fn normalize(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or("");
    let mut normalized = String::from("/");
    normalized.push_str(path.trim_matches('/'));
    if normalized.len() > 1 {
        normalized.push('/');
    }
    normalized
}

impl Router {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    pub fn append(&mut self, path: &str, route: Route) {
        self.routes.push((normalize(path), route));
    }

    pub fn resolve(&self, path: &str) -> Result<Route, RouteError> {
        let wanted = normalize(path);
        self.routes
            .iter()
            .find(|(p, _)| *p == wanted)
            .map(|(_, route)| *route)
            .ok_or_else(|| RouteError::NotFound(path.to_string()))
    }

    /// Resolve `path` and run its initializer.
    pub async fn activate(&self, path: &str, loader: &Loader) -> Result<Activation, Error> {
        let route = self.resolve(path)?;
        debug!(path, ?route, "activating route");
        let schema = loader.load().await?;
        Ok(Activation { route, schema })
    }
}

/// A mounted route: the document it loaded lives as long as this value.
#[derive(Debug)]
pub struct Activation {
    pub route: Route,
    pub schema: Schema,
}

impl Activation {
    pub fn model(&self) -> ViewModel<'_> {
        ViewModel::initial(self.route, &self.schema)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Search(SearchEvent),
    Graph(GraphEvent),
}

#[derive(Debug, Clone)]
pub enum ViewModel<'a> {
    Search {
        schema: &'a Schema,
        state: SearchState<'a>,
    },
    Reference {
        schema: &'a Schema,
    },
    Graph {
        schema: &'a Schema,
        ir: GraphIR,
        state: GraphState,
    },
}

impl<'a> ViewModel<'a> {
    pub fn initial(route: Route, schema: &'a Schema) -> Self {
        match route {
            Route::Search => ViewModel::Search {
                schema,
                state: SearchState::default(),
            },
            Route::Reference => ViewModel::Reference { schema },
            Route::Graph => ViewModel::Graph {
                schema,
                ir: GraphIR::from_schema(schema),
                state: GraphState::default(),
            },
        }
    }

    /// Apply one event, producing the next model. Events meant for another
    /// view leave the model unchanged.
    pub fn apply(self, event: Event) -> Self {
        match (self, event) {
            (ViewModel::Search { schema, state }, Event::Search(event)) => ViewModel::Search {
                schema,
                state: state.update(schema, event),
            },
            (ViewModel::Graph { schema, ir, state }, Event::Graph(event)) => ViewModel::Graph {
                schema,
                ir,
                state: state.update(schema, event),
            },
            (model, event) => {
                debug!(?event, "event ignored by this view");
                model
            }
        }
    }

    pub fn render(&self) -> String {
        match self {
            ViewModel::Search { state, .. } => html::render_search(state),
            ViewModel::Reference { schema } => html::render_reference(schema),
            ViewModel::Graph { schema, ir, state } => {
                html::render_graph(schema, ir, state.selection(schema))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::SchemaSource;
    use crate::parser::parse_schema;
    use crate::query;
    use std::collections::BTreeSet;
    use std::io::Write;

    const SCHEMA: &str = r#"
        <database>
            <tables>
                <table name="PATIENT" remarks="Clinical patient record">
                    <column name="birth_date" remarks="Date of birth"/>
                    <primaryKey column="birth_date" sequenceNumberInPK="1"/>
                </table>
                <table name="visit">
                    <column name="visit_id"/>
                </table>
            </tables>
        </database>
    "#;

    fn loader_for(text: &str) -> (tempfile::NamedTempFile, Loader) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        let loader = Loader::new(SchemaSource::File(file.path().to_path_buf()));
        (file, loader)
    }

    #[test]
    fn test_resolve_default_routes() {
        let router = Router::default();
        assert_eq!(router.resolve("/").unwrap(), Route::Search);
        assert_eq!(router.resolve("/reference/").unwrap(), Route::Reference);
        assert_eq!(router.resolve("/reference").unwrap(), Route::Reference);
        assert_eq!(router.resolve("/reference/#visit").unwrap(), Route::Reference);
        assert_eq!(router.resolve("/graph/?node=visit").unwrap(), Route::Graph);
        assert_eq!(router.resolve("?q=x").unwrap(), Route::Search);
    }

    #[test]
    fn test_resolve_unknown() {
        let router = Router::default();
        assert!(matches!(router.resolve("/admin/"), Err(RouteError::NotFound(_))));
        assert!(Router::new().resolve("/").is_err());
    }

    #[test]
    fn test_search_transitions_through_model() {
        let schema = parse_schema(SCHEMA).unwrap();
        let model = ViewModel::initial(Route::Search, &schema)
            .apply(Event::Search(SearchEvent::QueryChanged("patient".into())))
            .apply(Event::Search(SearchEvent::Submitted));

        match &model {
            ViewModel::Search { state, .. } => {
                assert_eq!(state.hits.len(), 1);
                assert_eq!(state.hits[0].name(), "PATIENT");
            }
            _ => panic!("expected search model"),
        }
        assert!(model.render().contains(r##"href="/reference/#PATIENT""##));
    }

    #[test]
    fn test_foreign_event_ignored() {
        let schema = parse_schema(SCHEMA).unwrap();
        let model = ViewModel::initial(Route::Reference, &schema)
            .apply(Event::Graph(GraphEvent::NodeClicked("visit".into())));
        assert!(matches!(model, ViewModel::Reference { .. }));
    }

    #[test]
    fn test_graph_click_shows_detail() {
        let schema = parse_schema(SCHEMA).unwrap();
        let model = ViewModel::initial(Route::Graph, &schema)
            .apply(Event::Graph(GraphEvent::NodeClicked("birth_date".into())));
        let html = model.render();
        assert!(html.contains(r#"<h3 id="birth_date">"#));
        assert!(html.contains("sequence number in primary key"));
    }

    #[test]
    fn test_reference_and_graph_enumerate_same_tables() {
        let schema = parse_schema(SCHEMA).unwrap();

        let reference: BTreeSet<&str> =
            query::tables(&schema).iter().map(|t| t.name.as_str()).collect();
        let ir = GraphIR::from_schema(&schema);
        let graph: BTreeSet<&str> = ir.table_names().collect();
        assert_eq!(reference, graph);

        let html = ViewModel::initial(Route::Reference, &schema).render();
        for name in &graph {
            assert!(html.contains(&format!(r#"<h2 id="{name}">"#)));
        }
    }

    #[test]
    fn test_demo_schema_views_agree() {
        let schema = parse_schema(include_str!("../demos/schema.xml")).unwrap();
        assert_eq!(schema.tables.len(), 2);

        let reference = ViewModel::initial(Route::Reference, &schema).render();
        let graph = ViewModel::initial(Route::Graph, &schema).render();
        for table in query::tables(&schema) {
            assert!(reference.contains(&format!(r#"<h2 id="{}">"#, table.name)));
            assert!(graph.contains(&format!(r#"data-name="{}""#, table.name)));
        }
    }

    #[tokio::test]
    async fn test_activate_loads_schema() {
        let (_file, loader) = loader_for(SCHEMA);
        let activation = Router::default().activate("/reference/", &loader).await.unwrap();
        assert_eq!(activation.route, Route::Reference);
        assert_eq!(activation.schema.tables.len(), 2);
        assert!(activation.model().render().contains(r#"<h2 id="visit">"#));
    }

    #[tokio::test]
    async fn test_activate_unknown_route_does_not_load() {
        let loader = Loader::new(SchemaSource::File("/nonexistent/schema.xml".into()));
        let err = Router::default().activate("/nope/", &loader).await.unwrap_err();
        assert!(matches!(err, Error::Route(RouteError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_activate_parse_failure() {
        let (_file, loader) = loader_for("<database>");
        let err = Router::default().activate("/", &loader).await.unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_irregular_attributes_still_render_every_view() {
        let schema = parse_schema(
            r#"<db><table name="t">
                <column remarks="no name"/>
                <column name="id"/>
                <primaryKey column="id" sequenceNumberInPK=""/>
            </table></db>"#,
        )
        .unwrap();

        let reference = ViewModel::initial(Route::Reference, &schema).render();
        assert!(reference.contains(r#"<h2 id="t">"#));
        assert!(!reference.contains("sequence number in primary key"));

        let search = ViewModel::initial(Route::Search, &schema)
            .apply(Event::Search(SearchEvent::QueryChanged("no name".into())))
            .apply(Event::Search(SearchEvent::Submitted));
        match &search {
            ViewModel::Search { state, .. } => assert_eq!(state.hits.len(), 1),
            _ => panic!("expected search model"),
        }

        let graph = ViewModel::initial(Route::Graph, &schema).render();
        assert!(graph.contains(r#"data-name="t""#));
    }
}
