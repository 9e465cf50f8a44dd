use crate::ast::Schema;
use crate::query::{self, SchemaElement};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Table,
    Column,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeShape {
    Diamond,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Json,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "svg" => Some(Self::Svg),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Node-link structure consumed by the graph view.
#[derive(Debug, Clone, Serialize)]
pub struct GraphIR {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Node {
    /// `table` for tables, `table.column` for columns, with `\` and `.`
    /// inside each name escaped by a backslash
    pub id: String,
    /// Element name; what a click resolves through the name lookup
    pub name: String,
    pub kind: NodeKind,
    pub shape: NodeShape,
    /// Owning table id for column nodes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Link {
    pub source: String,
    pub target: String,
}

/// Escape the id separator so `table.column` ids never collide with a
/// table whose own name contains a dot.
fn escape_id(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for c in name.chars() {
        if matches!(c, '\\' | '.') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl GraphIR {
    pub fn from_schema(schema: &Schema) -> Self {
        let mut nodes = Vec::new();
        let mut links = Vec::new();

        for table in query::tables(schema) {
            let table_id = escape_id(&table.name);
            nodes.push(Node {
                id: table_id.clone(),
                name: table.name.clone(),
                kind: NodeKind::Table,
                shape: NodeShape::Diamond,
                table: None,
            });

            for column in table.columns() {
                let id = format!("{}.{}", table_id, escape_id(&column.name));
                links.push(Link {
                    source: table_id.clone(),
                    target: id.clone(),
                });
                nodes.push(Node {
                    id,
                    name: column.name.clone(),
                    kind: NodeKind::Column,
                    shape: NodeShape::Default,
                    table: Some(table_id.clone()),
                });
            }
        }

        GraphIR { nodes, links }
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Table)
            .map(|n| n.name.as_str())
    }

    /// Column nodes belonging to `table_id`, in document order.
    pub fn columns_of<'a>(&'a self, table_id: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes
            .iter()
            .filter(move |n| n.table.as_deref() == Some(table_id))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Events produced by the graph view.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphEvent {
    NodeClicked(String),
    Cleared,
}

/// Graph view model: which element the detail panel shows, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphState {
    pub selected: Option<String>,
}

impl GraphState {
    pub fn update(&self, schema: &Schema, event: GraphEvent) -> GraphState {
        match event {
            GraphEvent::NodeClicked(name) => GraphState {
                selected: query::find_by_name(schema, &name).map(|e| e.name().to_string()),
            },
            GraphEvent::Cleared => GraphState::default(),
        }
    }

    /// Resolve the selection back to its schema element.
    pub fn selection<'a>(&self, schema: &'a Schema) -> Option<SchemaElement<'a>> {
        self.selected
            .as_deref()
            .and_then(|name| query::find_by_name(schema, name))
    }
}
