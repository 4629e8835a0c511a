//! Stream-mode table detection over positioned text spans.
//!
//! Tables are located from text alignment alone, without relying on ruled
//! lines: spans are grouped into rows by baseline, column edges are X
//! positions that repeat across rows, and maximal runs of well-aligned
//! rows become table regions.

use std::collections::{HashMap, HashSet};

use crate::model::{Table, TableRow};

use super::layout::TextSpan;
use super::options::TableOptions;

/// X positions are bucketed to this granularity when counting edges.
const EDGE_BUCKET: f32 = 5.0;

/// Tolerance when matching a span to a column edge, in points.
const ALIGN_TOLERANCE: f32 = 5.0;

/// Detects tables in the spans of a single page.
pub struct TableDetector {
    options: TableOptions,
}

/// A row of spans sharing a baseline.
#[derive(Debug, Clone)]
struct SpanRow {
    spans: Vec<TextSpan>,
}

impl TableDetector {
    /// Create a detector with default thresholds.
    pub fn new() -> Self {
        Self::with_options(TableOptions::default())
    }

    /// Create a detector with custom thresholds.
    pub fn with_options(options: TableOptions) -> Self {
        Self { options }
    }

    /// Detect tables in the given spans, in top-to-bottom page order.
    pub fn detect(&self, spans: &[TextSpan]) -> Vec<Table> {
        if spans.len() < self.options.min_rows * self.options.min_columns {
            return vec![];
        }

        let rows = self.group_into_rows(spans);
        log::debug!("table detector: {} spans in {} rows", spans.len(), rows.len());
        if rows.len() < self.options.min_rows {
            return vec![];
        }

        let columns = self.detect_columns(&rows);
        log::debug!("table detector: column edges at {:?}", columns);
        if columns.len() < self.options.min_columns {
            return vec![];
        }

        let mut tables = Vec::new();
        for (start, end) in self.find_regions(&rows, &columns) {
            let region = &rows[start..=end];

            // Re-derive edges from the region alone; surrounding prose
            // pollutes the page-wide histogram.
            let region_columns = self.detect_columns(region);
            if region_columns.len() < self.options.min_columns {
                continue;
            }
            if region_columns.len() > self.options.max_columns {
                log::debug!(
                    "table detector: rejecting region with {} columns",
                    region_columns.len()
                );
                continue;
            }
            if self.is_list_pattern(region, &region_columns) {
                log::debug!("table detector: rejecting list-like region");
                continue;
            }

            let right_edge = region
                .iter()
                .flat_map(|r| r.spans.iter())
                .map(|s| s.x + s.width)
                .fold(0.0_f32, f32::max);

            tables.push(self.build_table(region, &region_columns, right_edge));
        }

        tables
    }

    /// Group spans into baseline rows, top of page first.
    fn group_into_rows(&self, spans: &[TextSpan]) -> Vec<SpanRow> {
        let mut sorted: Vec<TextSpan> = spans.to_vec();
        // PDF Y grows upward: descending Y is top-to-bottom reading order.
        sorted.sort_by(|a, b| {
            b.y.partial_cmp(&a.y)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
        });

        let mut rows: Vec<SpanRow> = Vec::new();
        let mut current: Vec<TextSpan> = Vec::new();
        let mut current_y: Option<f32> = None;

        for span in sorted {
            let tolerance = span.font_size * self.options.row_tolerance_factor;
            match current_y {
                Some(y) if (span.y - y).abs() <= tolerance => current.push(span),
                _ => {
                    if !current.is_empty() {
                        rows.push(SpanRow {
                            spans: std::mem::take(&mut current),
                        });
                    }
                    current_y = Some(span.y);
                    current.push(span);
                }
            }
        }
        if !current.is_empty() {
            rows.push(SpanRow { spans: current });
        }

        rows
    }

    /// Find X positions where span left edges align across rows.
    fn detect_columns(&self, rows: &[SpanRow]) -> Vec<f32> {
        if rows.is_empty() {
            return vec![];
        }

        // Rows with a single span carry no column signal; only fall back
        // to them when multi-span rows are too few.
        let multi: Vec<&SpanRow> = rows.iter().filter(|r| r.spans.len() >= 2).collect();
        let counted: Vec<&SpanRow> = if multi.len() >= self.options.min_rows {
            multi
        } else {
            rows.iter().collect()
        };

        let mut edge_counts: HashMap<i32, usize> = HashMap::new();
        for row in &counted {
            let mut row_buckets: HashSet<i32> = HashSet::new();
            for span in &row.spans {
                row_buckets.insert((span.x / EDGE_BUCKET).round() as i32);
            }
            for bucket in row_buckets {
                *edge_counts.entry(bucket).or_insert(0) += 1;
            }
        }

        let min_occurrences =
            ((counted.len() as f32 * self.options.min_alignment_ratio) as usize).max(2);

        let mut edges: Vec<f32> = edge_counts
            .iter()
            .filter(|(_, count)| **count >= min_occurrences)
            .map(|(bucket, _)| *bucket as f32 * EDGE_BUCKET)
            .collect();
        edges.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        // Merge edges closer than the minimum column gap.
        let mut merged: Vec<f32> = Vec::new();
        for edge in edges {
            match merged.last() {
                Some(&last) if edge - last < self.options.min_column_gap => {}
                _ => merged.push(edge),
            }
        }
        merged
    }

    /// Maximal runs of consecutive rows that align with the column edges.
    fn find_regions(&self, rows: &[SpanRow], columns: &[f32]) -> Vec<(usize, usize)> {
        let mut regions = Vec::new();
        let mut run_start: Option<usize> = None;

        for (i, row) in rows.iter().enumerate() {
            if self.alignment_score(row, columns) >= self.options.min_alignment_ratio {
                run_start.get_or_insert(i);
            } else if let Some(start) = run_start.take() {
                if i - start >= self.options.min_rows {
                    regions.push((start, i - 1));
                }
            }
        }
        if let Some(start) = run_start {
            if rows.len() - start >= self.options.min_rows {
                regions.push((start, rows.len() - 1));
            }
        }

        regions
    }

    /// Fraction of a row's spans whose left edge sits on a column edge.
    fn alignment_score(&self, row: &SpanRow, columns: &[f32]) -> f32 {
        if row.spans.is_empty() || columns.is_empty() {
            return 0.0;
        }
        let aligned = row
            .spans
            .iter()
            .filter(|s| columns.iter().any(|c| (s.x - c).abs() <= ALIGN_TOLERANCE))
            .count();
        aligned as f32 / row.spans.len() as f32
    }

    /// Numbered and bulleted lists produce two aligned "columns" (marker
    /// and body) that are not tables. Reject regions dominated by
    /// list markers in the leftmost position.
    fn is_list_pattern(&self, rows: &[SpanRow], columns: &[f32]) -> bool {
        if columns.len() < 2 || rows.is_empty() {
            return false;
        }

        let mut bullets = 0;
        let mut numbers = 0;
        for row in rows {
            let first = row
                .spans
                .iter()
                .min_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
            if let Some(span) = first {
                let text = span.text.trim();
                if is_bullet_marker(text) {
                    bullets += 1;
                } else if is_number_marker(text) {
                    numbers += 1;
                }
            }
        }

        let bullet_ratio = bullets as f32 / rows.len() as f32;
        if bullet_ratio >= 0.5 {
            return true;
        }
        // Numbered first columns occur in real tables; only reject the
        // two-column case.
        let marker_ratio = (bullets + numbers) as f32 / rows.len() as f32;
        columns.len() == 2 && marker_ratio >= 0.5
    }

    /// Assemble the model table, assigning each span to its column.
    fn build_table(&self, rows: &[SpanRow], columns: &[f32], right_edge: f32) -> Table {
        let mut table = Table::new();

        for row in rows {
            let mut cells: Vec<Vec<&str>> = vec![Vec::new(); columns.len()];
            for span in &row.spans {
                let col = column_for(span.x, columns, right_edge);
                cells[col].push(span.text.trim());
            }
            table.add_row(TableRow::new(
                cells.into_iter().map(|parts| parts.join(" ")).collect(),
            ));
        }

        table
    }
}

impl Default for TableDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Which column interval an X position falls into.
fn column_for(x: f32, columns: &[f32], right_edge: f32) -> usize {
    for (i, &start) in columns.iter().enumerate() {
        let end = columns.get(i + 1).copied().unwrap_or(right_edge + 100.0);
        // Spans may start slightly before their column edge.
        if x >= start - 10.0 && x < end - 10.0 {
            return i;
        }
    }

    // Closest edge wins when nothing matched.
    columns
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            (x - **a)
                .abs()
                .partial_cmp(&(x - **b).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Bullet characters that mark list items, not table cells.
fn is_bullet_marker(text: &str) -> bool {
    matches!(
        text.trim(),
        "-" | "–" | "—" | "•" | "·" | "*" | "○" | "▪" | "◦" | "▸" | "►" | "■" | "●" | "□" | "◆"
    )
}

/// Numbered list markers: "1.", "12)", "a.", bare numbers.
fn is_number_marker(text: &str) -> bool {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return false;
    }

    if let Some(pos) = cleaned.find(|c: char| !c.is_ascii_digit()) {
        let prefix = &cleaned[..pos];
        let suffix = &cleaned[pos..];
        if !prefix.is_empty() && (suffix == "." || suffix == ")") {
            return true;
        }
    }

    if cleaned.parse::<u32>().is_ok() {
        return true;
    }

    let chars: Vec<char> = cleaned.chars().collect();
    chars.len() == 2 && chars[0].is_alphabetic() && (chars[1] == '.' || chars[1] == ')')
}
