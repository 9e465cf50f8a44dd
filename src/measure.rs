use std::f64::consts::PI;
use unicode_width::UnicodeWidthStr;

pub struct TextMetrics {
    pub char_width: f64,
    pub line_height: f64,
    pub label_gap: f64,
    pub table_radius: f64,
    pub column_radius: f64,
    pub ring_spacing: f64,
    pub min_ring_radius: f64,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            char_width: 7.0,
            line_height: 16.0,
            label_gap: 4.0,
            table_radius: 14.0,
            column_radius: 5.0,
            ring_spacing: 28.0,
            min_ring_radius: 60.0,
        }
    }
}

impl TextMetrics {
    pub fn text_width(&self, text: &str) -> f64 {
        let width = UnicodeWidthStr::width(text);
        width as f64 * self.char_width
    }

    /// Radius of the ring the column nodes of a table sit on.
    pub fn ring_radius(&self, column_count: usize) -> f64 {
        let circumference = column_count as f64 * self.ring_spacing;
        (circumference / (2.0 * PI)).max(self.min_ring_radius)
    }

    /// Half the side of the square a table cluster occupies.
    pub fn cluster_extent(&self, table_label: &str, column_labels: &[&str]) -> f64 {
        let ring = self.ring_radius(column_labels.len());
        let widest_column = column_labels
            .iter()
            .map(|l| self.text_width(l))
            .fold(0.0, f64::max);
        let table_label = self.text_width(table_label) / 2.0;

        let column_extent = if column_labels.is_empty() {
            0.0
        } else {
            ring + self.column_radius + self.label_gap + widest_column
        };

        column_extent
            .max(table_label)
            .max(self.table_radius + self.line_height)
    }
}
