//! Deterministic cluster layout for the schema graph.
//!
//! Each table becomes a cluster: the table node in the middle and its
//! column nodes evenly spaced on a ring around it. Clusters are placed on
//! a grid, row by row.

use crate::ir::{GraphIR, Node, NodeKind};
use crate::measure::TextMetrics;
use std::collections::HashMap;
use std::f64::consts::PI;

/// A positioned node; `x`/`y` is the centre.
#[derive(Debug, Clone)]
pub struct LayoutNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

#[derive(Debug, Clone)]
pub struct LayoutLink {
    pub source: String,
    pub target: String,
    pub from_point: (f64, f64),
    pub to_point: (f64, f64),
}

#[derive(Debug, Clone)]
pub struct Layout {
    pub nodes: Vec<LayoutNode>,
    pub links: Vec<LayoutLink>,
    pub width: f64,
    pub height: f64,
}

pub struct LayoutEngine {
    metrics: TextMetrics,
    cluster_gap: f64,
    margin: f64,
    /// Clusters per row; `None` picks roughly a square grid
    columns_per_row: Option<usize>,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self {
            metrics: TextMetrics::default(),
            cluster_gap: 40.0,
            margin: 40.0,
            columns_per_row: None,
        }
    }
}

impl LayoutEngine {
    pub fn with_columns_per_row(mut self, n: usize) -> Self {
        self.columns_per_row = Some(n.max(1));
        self
    }

    pub fn layout(&self, ir: &GraphIR) -> Layout {
        let tables: Vec<&Node> = ir
            .nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Table)
            .collect();

        let per_row = self
            .columns_per_row
            .unwrap_or_else(|| (tables.len() as f64).sqrt().ceil().max(1.0) as usize);

        let mut nodes = Vec::new();
        let mut y = self.margin;
        let mut max_width: f64 = 0.0;

        for row in tables.chunks(per_row) {
            let mut x = self.margin;
            let mut row_height: f64 = 0.0;

            for table in row {
                let columns: Vec<&Node> = ir.columns_of(&table.id).collect();
                let labels: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
                let extent = self.metrics.cluster_extent(&table.name, &labels);
                let (cx, cy) = (x + extent, y + extent);

                nodes.push(LayoutNode {
                    id: table.id.clone(),
                    x: cx,
                    y: cy,
                    radius: self.metrics.table_radius,
                });

                let ring = self.metrics.ring_radius(columns.len());
                for (i, column) in columns.iter().enumerate() {
                    let angle = -PI / 2.0 + 2.0 * PI * i as f64 / columns.len() as f64;
                    nodes.push(LayoutNode {
                        id: column.id.clone(),
                        x: cx + ring * angle.cos(),
                        y: cy + ring * angle.sin(),
                        radius: self.metrics.column_radius,
                    });
                }

                x += extent * 2.0 + self.cluster_gap;
                row_height = row_height.max(extent * 2.0);
            }

            max_width = max_width.max(x - self.cluster_gap + self.margin);
            y += row_height + self.cluster_gap;
        }

        let height = if tables.is_empty() {
            self.margin * 2.0
        } else {
            y - self.cluster_gap + self.margin
        };
        let width = max_width.max(self.margin * 2.0);

        let positions: HashMap<&str, &LayoutNode> =
            nodes.iter().map(|n| (n.id.as_str(), n)).collect();

        let links = ir
            .links
            .iter()
            .filter_map(|link| {
                let from = positions.get(link.source.as_str())?;
                let to = positions.get(link.target.as_str())?;
                Some(LayoutLink {
                    source: link.source.clone(),
                    target: link.target.clone(),
                    from_point: (from.x, from.y),
                    to_point: (to.x, to.y),
                })
            })
            .collect();

        Layout {
            nodes,
            links,
            width,
            height,
        }
    }
}
