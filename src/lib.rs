pub mod ast;
pub mod dom;
pub mod error;
pub mod html;
pub mod ir;
pub mod layout;
pub mod lexer;
pub mod measure;
pub mod parser;
pub mod query;
pub mod search;
pub mod svg;

#[cfg(not(target_arch = "wasm32"))]
pub mod config;
#[cfg(not(target_arch = "wasm32"))]
pub mod loader;
#[cfg(not(target_arch = "wasm32"))]
pub mod router;

use wasm_bindgen::prelude::*;

pub use error::Error;
use ir::GraphIR;
use layout::LayoutEngine;
use parser::parse_schema;
use svg::SvgRenderer;

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&e.to_string()).into()
}

/// Search tables and columns of the schema XML; returns the hits as JSON.
#[wasm_bindgen(js_name = "searchSchema")]
pub fn search_schema(xml: &str, query: &str) -> Result<String, JsValue> {
    let schema = parse_schema(xml).map_err(js_error)?;
    let hits = search::search(&schema, query);
    serde_json::to_string(&hits).map_err(js_error)
}

/// Render the full reference page for the schema XML.
#[wasm_bindgen(js_name = "renderReference")]
pub fn render_reference(xml: &str) -> Result<String, JsValue> {
    let schema = parse_schema(xml).map_err(js_error)?;
    Ok(html::render_reference(&schema))
}

/// `{nodes, links}` for a force-graph widget.
#[wasm_bindgen(js_name = "graphJson")]
pub fn graph_json(xml: &str) -> Result<String, JsValue> {
    let schema = parse_schema(xml).map_err(js_error)?;
    GraphIR::from_schema(&schema).to_json().map_err(js_error)
}

#[wasm_bindgen(js_name = "graphSvg")]
pub fn graph_svg(xml: &str) -> Result<String, JsValue> {
    let schema = parse_schema(xml).map_err(js_error)?;
    let ir = GraphIR::from_schema(&schema);
    let layout = LayoutEngine::default().layout(&ir);
    Ok(SvgRenderer::default().render(&ir, &layout))
}

/// Resolve a clicked node name to its element, as JSON (`null` when absent).
#[wasm_bindgen(js_name = "lookupElement")]
pub fn lookup_element(xml: &str, name: &str) -> Result<String, JsValue> {
    let schema = parse_schema(xml).map_err(js_error)?;
    serde_json::to_string(&query::find_by_name(&schema, name)).map_err(js_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    const XML: &str = r#"<database><tables>
        <table name="PATIENT" remarks="Clinical patient record">
            <column name="birth_date" remarks="Date of birth"/>
        </table>
    </tables></database>"#;

    #[test]
    fn test_search_schema_json() {
        let json: serde_json::Value =
            serde_json::from_str(&search_schema(XML, "patient").unwrap()).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["kind"], "table");
        assert_eq!(json[0]["name"], "PATIENT");
    }

    #[test]
    fn test_lookup_element_json() {
        let found: serde_json::Value =
            serde_json::from_str(&lookup_element(XML, "birth_date").unwrap()).unwrap();
        assert_eq!(found["kind"], "column");
        assert_eq!(found["element"]["remarks"], "Date of birth");

        assert_eq!(lookup_element(XML, "nothing").unwrap(), "null");
    }

    #[test]
    fn test_graph_exports() {
        assert!(graph_svg(XML).unwrap().contains("PATIENT"));
        let json: serde_json::Value = serde_json::from_str(&graph_json(XML).unwrap()).unwrap();
        assert_eq!(json["links"][0]["target"], "PATIENT.birth_date");
    }
}
