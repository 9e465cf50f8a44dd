//! HTML for the search, reference and graph pages.

use crate::ast::{Column, Index, Schema, Table};
use crate::ir::GraphIR;
use crate::layout::LayoutEngine;
use crate::query::{self, SchemaElement};
use crate::search::{Hit, SearchState};
use crate::svg::{SvgRenderer, escape_xml};
use std::fmt::Write;

const TITLE: &str = "omop-schema-viz";

fn page(out: &mut String, body: impl FnOnce(&mut String)) {
    writeln!(out, "<!DOCTYPE html>").unwrap();
    writeln!(out, r#"<html><head><meta charset="utf-8"><title>{TITLE}</title></head><body>"#).unwrap();
    header(out);
    body(out);
    writeln!(out, "</body></html>").unwrap();
}

fn header(out: &mut String) {
    writeln!(
        out,
        r#"<nav class="navbar"><a class="navbar-brand" href="/">{TITLE}</a><ul class="nav">
<li><a href="/">Home</a></li>
<li><a href="/reference/">Reference</a></li>
<li><a href="/graph/">Graph</a></li>
</ul></nav>"#
    )
    .unwrap();
}

fn badge(out: &mut String, variant: &str, text: &str) {
    write!(
        out,
        r#"<span class="badge badge-{}">{}</span>"#,
        variant,
        escape_xml(text)
    )
    .unwrap();
}

fn remarks(out: &mut String, remarks: Option<&str>) {
    if let Some(text) = remarks {
        writeln!(out, r#"<div class="remarks">{}</div>"#, escape_xml(text)).unwrap();
    }
}

pub fn render_search(state: &SearchState<'_>) -> String {
    let mut out = String::new();
    page(&mut out, |out| {
        writeln!(
            out,
            r#"<form method="get" action="/"><label for="q">Recherche</label>
<input type="text" id="q" name="q" placeholder="filtre" value="{}">
<small class="text-muted">Filtrer les tables ou colonnes.</small>
<button type="submit">Submit</button></form>"#,
            escape_xml(&state.query)
        )
        .unwrap();
        writeln!(out, r#"<div class="hits">"#).unwrap();
        for hit in &state.hits {
            render_hit(out, hit);
        }
        writeln!(out, "</div>").unwrap();
    });
    out
}

fn render_hit(out: &mut String, hit: &Hit<'_>) {
    write!(out, "<div>").unwrap();
    match hit {
        Hit::Table { .. } => badge(out, "primary", "Table"),
        Hit::Column { .. } => badge(out, "secondary", "Column"),
    }
    let name = escape_xml(hit.name());
    write!(out, r##" <a href="/reference/#{name}">{name}</a>"##).unwrap();
    if let Some(text) = hit.remarks() {
        write!(out, r#" <small class="text-muted">{}</small>"#, escape_xml(text)).unwrap();
    }
    writeln!(out, "</div>").unwrap();
}

pub fn render_reference(schema: &Schema) -> String {
    let mut out = String::new();
    page(&mut out, |out| {
        for table in query::tables(schema) {
            render_table(out, table);
        }
    });
    out
}

fn render_table(out: &mut String, table: &Table) {
    writeln!(out, r#"<section class="card table">"#).unwrap();
    write!(out, r#"<h2 id="{}">"#, escape_xml(&table.name)).unwrap();
    badge(out, "primary", "Table");
    writeln!(out, " {}</h2>", escape_xml(&table.name)).unwrap();
    remarks(out, table.remarks.as_deref());

    for column in table.columns() {
        render_column(out, column, query::pk_sequence(table.primary_keys(), &column.name));
    }
    for index in table.indices() {
        render_index(out, index);
    }
    writeln!(out, "</section>").unwrap();
}

fn render_column(out: &mut String, column: &Column, pk: Option<u32>) {
    writeln!(out, r#"<div class="column">"#).unwrap();
    write!(out, r#"<h3 id="{}">"#, escape_xml(&column.name)).unwrap();
    badge(out, "secondary", "Column");
    if let Some(seq) = pk {
        write!(
            out,
            r#" <span class="badge badge-info" title="sequence number in primary key">{seq}</span>"#
        )
        .unwrap();
    }
    write!(out, " {}", escape_xml(&column.name)).unwrap();
    if let Some(typ) = &column.typ {
        write!(out, r#" <small class="type">{}</small>"#, escape_xml(typ)).unwrap();
    }
    writeln!(out, "</h3>").unwrap();
    remarks(out, column.remarks.as_deref());
    writeln!(out, "</div>").unwrap();
}

fn render_index(out: &mut String, index: &Index) {
    writeln!(out, r#"<div class="card index">"#).unwrap();
    write!(out, "<h4>").unwrap();
    badge(out, "success", "Index");
    if index.unique {
        write!(out, " ").unwrap();
        badge(out, "warning", "unique");
    }
    writeln!(out, " {}</h4>", escape_xml(&index.name)).unwrap();
    writeln!(out, "<ul>").unwrap();
    for column in &index.columns {
        write!(out, "<li>{} ", escape_xml(&column.name)).unwrap();
        if column.ascending {
            badge(out, "success", "ascending");
        } else {
            badge(out, "danger", "descending");
        }
        writeln!(out, "</li>").unwrap();
    }
    writeln!(out, "</ul></div>").unwrap();
}

/// Detail panel for the element selected in the graph view.
pub fn render_detail(schema: &Schema, element: Option<SchemaElement<'_>>) -> String {
    let mut out = String::new();
    writeln!(out, r#"<aside class="detail">"#).unwrap();
    match element {
        Some(SchemaElement::Table(table)) => render_table(&mut out, table),
        Some(SchemaElement::Column(column)) => {
            // A column's PK badge comes from the table that owns it.
            let pk = query::tables(schema)
                .iter()
                .find(|t| t.columns().any(|c| std::ptr::eq(c, column)))
                .and_then(|t| query::pk_sequence(t.primary_keys(), &column.name));
            render_column(&mut out, column, pk);
        }
        Some(SchemaElement::Index(index)) => render_index(&mut out, index),
        Some(element @ SchemaElement::IndexColumn(_)) => {
            write!(out, "<h3>").unwrap();
            badge(&mut out, "secondary", element.kind());
            writeln!(out, " {}</h3>", escape_xml(element.name())).unwrap();
        }
        None => {}
    }
    writeln!(out, "</aside>").unwrap();
    out
}

pub fn render_graph(
    schema: &Schema,
    ir: &GraphIR,
    selected: Option<SchemaElement<'_>>,
) -> String {
    let layout = LayoutEngine::default().layout(ir);
    let svg = SvgRenderer::default().render_with_selection(ir, &layout, selected.map(|e| e.name()));
    let detail = render_detail(schema, selected);

    let mut out = String::new();
    page(&mut out, |out| {
        writeln!(out, r#"<div class="graph">"#).unwrap();
        out.push_str(&svg);
        writeln!(out, "</div>").unwrap();
        out.push_str(&detail);
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{GraphEvent, GraphState};
    use crate::parser::parse_schema;
    use crate::search::SearchEvent;

    const SCHEMA: &str = r#"
        <database>
            <tables>
                <table name="visit" remarks="Visit **occurrence**">
                    <column name="visit_id" type="int4" remarks="Key"/>
                    <column name="person_id" type="int4"/>
                    <index name="idx_visit" unique="true">
                        <column name="visit_id" ascending="true"/>
                        <column name="person_id" ascending="false"/>
                    </index>
                    <primaryKey column="visit_id" sequenceNumberInPK="1"/>
                </table>
            </tables>
        </database>
    "#;

    #[test]
    fn test_reference_anchors_and_badges() {
        let schema = parse_schema(SCHEMA).unwrap();
        let html = render_reference(&schema);
        assert!(html.contains(r#"<h2 id="visit">"#));
        assert!(html.contains(r#"<h3 id="visit_id">"#));
        assert!(html.contains(r#"title="sequence number in primary key">1</span>"#));
        assert!(html.contains("badge-warning\">unique"));
        assert!(html.contains("badge-danger\">descending"));
        assert!(html.contains("Visit **occurrence**"));
    }

    #[test]
    fn test_reference_pk_badge_only_on_pk_columns() {
        let schema = parse_schema(SCHEMA).unwrap();
        let html = render_reference(&schema);
        assert_eq!(html.matches("sequence number in primary key").count(), 1);
    }

    #[test]
    fn test_search_page_links_to_reference() {
        let schema = parse_schema(SCHEMA).unwrap();
        let state = SearchState::default()
            .update(&schema, SearchEvent::QueryChanged("Key".into()))
            .update(&schema, SearchEvent::Submitted);
        let html = render_search(&state);
        assert!(html.contains(r##"<a href="/reference/#visit_id">visit_id</a>"##));
        assert!(html.contains(r#"value="Key""#));
        assert!(html.contains("badge-secondary\">Column"));
    }

    #[test]
    fn test_search_page_escapes_query() {
        let state = SearchState {
            query: "<script>".into(),
            hits: Vec::new(),
        };
        let html = render_search(&state);
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("value=\"<script>\""));
    }

    #[test]
    fn test_graph_page_with_selection() {
        let schema = parse_schema(SCHEMA).unwrap();
        let ir = GraphIR::from_schema(&schema);
        let state = GraphState::default().update(&schema, GraphEvent::NodeClicked("visit_id".into()));
        let html = render_graph(&schema, &ir, state.selection(&schema));
        assert!(html.contains("<svg"));
        assert!(html.contains(r#"<aside class="detail">"#));
        assert!(html.contains(r#"<h3 id="visit_id">"#));
        assert!(html.contains("sequence number in primary key"));
    }

    #[test]
    fn test_detail_empty_without_selection() {
        let schema = parse_schema(SCHEMA).unwrap();
        let html = render_detail(&schema, None);
        assert_eq!(html, "<aside class=\"detail\">\n</aside>\n");
    }
}
