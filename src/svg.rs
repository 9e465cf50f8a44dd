use crate::ir::{GraphIR, Node, NodeShape};
use crate::layout::{Layout, LayoutLink, LayoutNode};
use crate::measure::TextMetrics;
use std::collections::HashMap;
use std::fmt::Write;

pub struct SvgRenderer {
    metrics: TextMetrics,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            metrics: TextMetrics::default(),
        }
    }
}

impl SvgRenderer {
    pub fn render(&self, ir: &GraphIR, layout: &Layout) -> String {
        self.render_with_selection(ir, layout, None)
    }

    /// Render the graph, highlighting the nodes named `selected`.
    pub fn render_with_selection(
        &self,
        ir: &GraphIR,
        layout: &Layout,
        selected: Option<&str>,
    ) -> String {
        let mut svg = String::new();

        writeln!(
            &mut svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            layout.width, layout.height, layout.width, layout.height
        )
        .unwrap();

        writeln!(
            &mut svg,
            r#"<style>
  .link {{ stroke: #999; stroke-width: 1; }}
  .table-node {{ fill: #0d6efd; stroke: #084298; stroke-width: 1.5; }}
  .column-node {{ fill: #6c757d; }}
  .selected {{ fill: #ffc107; }}
  .table-label {{ font-family: sans-serif; font-size: 13px; font-weight: bold; }}
  .column-label {{ font-family: sans-serif; font-size: 11px; fill: #333; }}
</style>"#
        )
        .unwrap();

        let node_map: HashMap<&str, &Node> = ir.nodes.iter().map(|n| (n.id.as_str(), n)).collect();

        // Links first (behind nodes)
        for link in &layout.links {
            self.render_link(&mut svg, link);
        }

        for node in &layout.nodes {
            if let Some(ir_node) = node_map.get(node.id.as_str()) {
                let is_selected = selected == Some(ir_node.name.as_str());
                self.render_node(&mut svg, node, ir_node, is_selected);
            }
        }

        writeln!(&mut svg, "</svg>").unwrap();
        svg
    }

    fn render_node(&self, svg: &mut String, layout: &LayoutNode, node: &Node, selected: bool) {
        let (x, y, r) = (layout.x, layout.y, layout.radius);
        let selected_class = if selected { " selected" } else { "" };

        writeln!(
            svg,
            r#"<g class="node" data-id="{}" data-name="{}">"#,
            escape_xml(&node.id),
            escape_xml(&node.name)
        )
        .unwrap();

        match node.shape {
            NodeShape::Diamond => {
                writeln!(
                    svg,
                    r#"<polygon class="table-node{}" points="{},{} {},{} {},{} {},{}" />"#,
                    selected_class,
                    x,
                    y - r,
                    x + r,
                    y,
                    x,
                    y + r,
                    x - r,
                    y
                )
                .unwrap();
                writeln!(
                    svg,
                    r#"<text class="table-label" x="{}" y="{}" text-anchor="middle">{}</text>"#,
                    x,
                    y + r + self.metrics.line_height,
                    escape_xml(&node.name)
                )
                .unwrap();
            }
            NodeShape::Default => {
                writeln!(
                    svg,
                    r#"<circle class="column-node{}" cx="{}" cy="{}" r="{}" />"#,
                    selected_class, x, y, r
                )
                .unwrap();
                writeln!(
                    svg,
                    r#"<text class="column-label" x="{}" y="{}">{}</text>"#,
                    x + r + self.metrics.label_gap,
                    y + 4.0,
                    escape_xml(&node.name)
                )
                .unwrap();
            }
        }

        writeln!(svg, "</g>").unwrap();
    }

    fn render_link(&self, svg: &mut String, link: &LayoutLink) {
        let (x1, y1) = link.from_point;
        let (x2, y2) = link.to_point;
        writeln!(
            svg,
            r#"<line class="link" x1="{}" y1="{}" x2="{}" y2="{}" />"#,
            x1, y1, x2, y2
        )
        .unwrap();
    }
}

pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
