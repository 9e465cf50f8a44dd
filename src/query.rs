//! Fixed-shape traversals over the typed schema.

use crate::ast::{Column, Index, IndexColumn, PrimaryKeyEntry, Schema, Table, TableItem};
use serde::Serialize;

/// A reference to any named element of the schema.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "element", rename_all = "camelCase")]
pub enum SchemaElement<'a> {
    Table(&'a Table),
    Column(&'a Column),
    Index(&'a Index),
    IndexColumn(&'a IndexColumn),
}

impl<'a> SchemaElement<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            SchemaElement::Table(t) => &t.name,
            SchemaElement::Column(c) => &c.name,
            SchemaElement::Index(i) => &i.name,
            SchemaElement::IndexColumn(c) => &c.name,
        }
    }

    pub fn remarks(&self) -> Option<&'a str> {
        match self {
            SchemaElement::Table(t) => t.remarks.as_deref(),
            SchemaElement::Column(c) => c.remarks.as_deref(),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SchemaElement::Table(_) => "table",
            SchemaElement::Column(_) => "column",
            SchemaElement::Index(_) => "index",
            SchemaElement::IndexColumn(_) => "index column",
        }
    }
}

/// All tables, in document order.
pub fn tables(schema: &Schema) -> &[Table] {
    &schema.tables
}

/// Every column that is a direct child of a table, in document order.
/// Index column references are not included.
pub fn columns(schema: &Schema) -> impl Iterator<Item = &Column> {
    schema.tables.iter().flat_map(|t| t.columns())
}

fn item_elements(item: &TableItem) -> Box<dyn Iterator<Item = SchemaElement<'_>> + '_> {
    match item {
        TableItem::Column(c) => Box::new(std::iter::once(SchemaElement::Column(c))),
        TableItem::Index(i) => Box::new(
            std::iter::once(SchemaElement::Index(i))
                .chain(i.columns.iter().map(SchemaElement::IndexColumn)),
        ),
        TableItem::PrimaryKey(_) => Box::new(std::iter::empty()),
    }
}

/// Walk every named element in document order.
pub fn elements(schema: &Schema) -> impl Iterator<Item = SchemaElement<'_>> {
    schema.tables.iter().flat_map(|table| {
        std::iter::once(SchemaElement::Table(table)).chain(table.items.iter().flat_map(item_elements))
    })
}

/// First element anywhere in the schema whose name equals `name`.
pub fn find_by_name<'a>(schema: &'a Schema, name: &str) -> Option<SchemaElement<'a>> {
    elements(schema).find(|e| e.name() == name)
}

/// Sequence number of `column_name` within the primary key, if it is part of it.
pub fn pk_sequence<'a, I>(entries: I, column_name: &str) -> Option<u32>
where
    I: IntoIterator<Item = &'a PrimaryKeyEntry>,
{
    entries
        .into_iter()
        .find(|pk| pk.column == column_name)
        .and_then(|pk| pk.sequence_number_in_pk)
}
