//! Typed schema model built from the parsed XML tree.

use crate::dom::{Document, Element};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    pub tables: Vec<Table>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub name: String,
    pub remarks: Option<String>,
    /// Direct children in document order
    pub items: Vec<TableItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TableItem {
    Column(Column),
    Index(Index),
    PrimaryKey(PrimaryKeyEntry),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub remarks: Option<String>,
    #[serde(rename = "type")]
    pub typ: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Index {
    pub name: String,
    pub unique: bool,
    pub columns: Vec<IndexColumn>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexColumn {
    pub name: String,
    pub ascending: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryKeyEntry {
    pub column: String,
    /// `None` when the attribute is absent or not a positive integer
    pub sequence_number_in_pk: Option<u32>,
}

impl Table {
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.items.iter().filter_map(|item| match item {
            TableItem::Column(c) => Some(c),
            _ => None,
        })
    }

    pub fn indices(&self) -> impl Iterator<Item = &Index> {
        self.items.iter().filter_map(|item| match item {
            TableItem::Index(i) => Some(i),
            _ => None,
        })
    }

    pub fn primary_keys(&self) -> impl Iterator<Item = &PrimaryKeyEntry> {
        self.items.iter().filter_map(|item| match item {
            TableItem::PrimaryKey(pk) => Some(pk),
            _ => None,
        })
    }
}

impl Schema {
    /// Collect every `table` element below the root, in document order.
    ///
    /// Tables may sit directly under the root or inside wrapper elements
    /// such as SchemaSpy's `<tables>`; only a table's direct children are
    /// interpreted. Missing attributes read as empty or absent values, so
    /// any well-formed document yields a schema.
    pub fn from_document(document: &Document) -> Self {
        let mut tables = Vec::new();
        let mut pending: Vec<&Element> = document.root.children.iter().rev().collect();
        while let Some(element) = pending.pop() {
            if element.name == "table" {
                tables.push(convert_table(element));
            } else {
                pending.extend(element.children.iter().rev());
            }
        }
        Schema { tables }
    }
}

fn text(element: &Element, attr: &str) -> String {
    element.attr(attr).unwrap_or_default().to_string()
}

fn optional(element: &Element, attr: &str) -> Option<String> {
    element.attr(attr).map(str::to_string)
}

fn flag(element: &Element, attr: &str) -> bool {
    element.attr(attr) == Some("true")
}

fn convert_table(element: &Element) -> Table {
    let items = element
        .children
        .iter()
        .filter_map(|child| match child.name.as_str() {
            "column" => Some(TableItem::Column(convert_column(child))),
            "index" => Some(TableItem::Index(convert_index(child))),
            "primaryKey" => Some(TableItem::PrimaryKey(convert_primary_key(child))),
            _ => None,
        })
        .collect();

    Table {
        name: text(element, "name"),
        remarks: optional(element, "remarks"),
        items,
    }
}

fn convert_column(element: &Element) -> Column {
    Column {
        name: text(element, "name"),
        remarks: optional(element, "remarks"),
        typ: optional(element, "type"),
    }
}

fn convert_index(element: &Element) -> Index {
    let columns = element
        .children_named("column")
        .map(|c| IndexColumn {
            name: text(c, "name"),
            ascending: flag(c, "ascending"),
        })
        .collect();

    Index {
        name: text(element, "name"),
        unique: flag(element, "unique"),
        columns,
    }
}

/// Anything but a positive integer leaves the position unknown.
fn convert_primary_key(element: &Element) -> PrimaryKeyEntry {
    let sequence_number_in_pk = element
        .attr("sequenceNumberInPK")
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .filter(|n| *n >= 1);

    PrimaryKeyEntry {
        column: text(element, "column"),
        sequence_number_in_pk,
    }
}
