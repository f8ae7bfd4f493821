//! Multi-level grouping (Division > Province > Area and similar).
//!
//! Rows are sorted level by level and flattened into an emission order of
//! data lines and subtotal lines. Each data line records which levels it
//! opens and how many lines the opened label covers, so every renderer can
//! place merged label cells without recomputing anything.

use crate::collate::natural_cmp;
use crate::models::{ReportRow, Totals};
use crate::normalize::UNKNOWN_KEY;

#[derive(Debug, Clone)]
pub struct HierarchyOptions {
    /// Grouping fields, outermost first.
    pub levels: Vec<String>,
    /// Extra sort keys applied below the deepest level.
    pub tie_break: Vec<String>,
    pub sum_fields: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RowLine {
    pub row: ReportRow,
    /// `starts[l]` is true when this row is the first of its level-`l` group.
    pub starts: Vec<bool>,
    /// Lines covered by the level-`l` label, counting nested subtotal lines
    /// but not the group's own subtotal. Only meaningful where `starts[l]`.
    pub spans: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct SubtotalLine {
    pub level: usize,
    /// Labels from the outermost level down to `level`.
    pub path: Vec<String>,
    pub totals: Totals,
}

#[derive(Debug, Clone)]
pub enum Line {
    Row(RowLine),
    Subtotal(SubtotalLine),
}

#[derive(Debug, Clone)]
pub struct TopGroup {
    pub label: String,
    pub totals: Totals,
}

#[derive(Debug, Clone)]
pub struct Hierarchy {
    pub levels: Vec<String>,
    pub sum_fields: Vec<String>,
    pub lines: Vec<Line>,
    pub top: Vec<TopGroup>,
    /// Summed directly over every row.
    pub grand: Totals,
}

impl Hierarchy {
    pub fn grand_total(&self) -> f64 {
        self.grand.primary()
    }

    /// Grand totals derived from the outermost groups instead of the rows.
    pub fn grand_from_groups(&self) -> Totals {
        let mut t = Totals::zero(self.sum_fields.len());
        for g in &self.top {
            t.merge(&g.totals);
        }
        t
    }

    pub fn rows(&self) -> impl Iterator<Item = &RowLine> {
        self.lines.iter().filter_map(|l| match l {
            Line::Row(r) => Some(r),
            Line::Subtotal(_) => None,
        })
    }

    pub fn subtotals(&self) -> impl Iterator<Item = &SubtotalLine> {
        self.lines.iter().filter_map(|l| match l {
            Line::Subtotal(s) => Some(s),
            Line::Row(_) => None,
        })
    }
}

pub fn label_of(row: &ReportRow, field: &str) -> String {
    row.text(field)
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| UNKNOWN_KEY.to_string())
}

/// Sort `rows` level by level and lay out data and subtotal lines.
///
/// A group gets a subtotal line when it has more than one direct child:
/// subgroups at every level but the last, rows at the last. An outer group
/// whose rows all sit under one inner group is therefore closed only by the
/// inner group's subtotal, even when it holds several rows.
pub fn aggregate(mut rows: Vec<ReportRow>, options: &HierarchyOptions) -> Hierarchy {
    let sort_fields: Vec<&String> = options.levels.iter().chain(&options.tie_break).collect();
    rows.sort_by(|a, b| {
        sort_fields
            .iter()
            .map(|f| natural_cmp(&label_of(a, f), &label_of(b, f)))
            .find(|o| o.is_ne())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut grand = Totals::zero(options.sum_fields.len());
    for row in &rows {
        grand.add_row(row, &options.sum_fields);
    }

    let mut emitter = Emitter {
        options,
        lines: Vec::new(),
        path: Vec::new(),
    };
    let top = if options.levels.is_empty() {
        emitter.emit_rows(&rows);
        Vec::new()
    } else {
        emitter.emit_level(&rows, 0)
    };
    log::debug!(
        "aggregated {} rows into {} lines across {} levels",
        rows.len(),
        emitter.lines.len(),
        options.levels.len()
    );

    Hierarchy {
        levels: options.levels.clone(),
        sum_fields: options.sum_fields.clone(),
        lines: emitter.lines,
        top,
        grand,
    }
}

struct Emitter<'a> {
    options: &'a HierarchyOptions,
    lines: Vec<Line>,
    path: Vec<String>,
}

impl Emitter<'_> {
    fn emit_rows(&mut self, rows: &[ReportRow]) -> Totals {
        let depth = self.options.levels.len();
        let mut totals = Totals::zero(self.options.sum_fields.len());
        for row in rows {
            totals.add_row(row, &self.options.sum_fields);
            self.lines.push(Line::Row(RowLine {
                row: row.clone(),
                starts: vec![false; depth],
                spans: vec![1; depth],
            }));
        }
        totals
    }

    /// Emits every group at `level` within `rows`, returning each group's
    /// label and totals in order.
    fn emit_level(&mut self, rows: &[ReportRow], level: usize) -> Vec<TopGroup> {
        let options = self.options;
        let field = &options.levels[level];
        let leaf = level + 1 == options.levels.len();
        let mut groups = Vec::new();

        for run in runs(rows, field) {
            let label = label_of(&run[0], field);
            self.path.push(label.clone());
            let start = self.lines.len();

            let (totals, children) = if leaf {
                (self.emit_rows(run), run.len())
            } else {
                let nested = self.emit_level(run, level + 1);
                let mut t = Totals::zero(options.sum_fields.len());
                for g in &nested {
                    t.merge(&g.totals);
                }
                (t, nested.len())
            };

            let span = self.lines.len() - start;
            if let Some(Line::Row(first)) = self.lines.get_mut(start) {
                first.starts[level] = true;
                first.spans[level] = span;
            }
            if children > 1 {
                self.lines.push(Line::Subtotal(SubtotalLine {
                    level,
                    path: self.path.clone(),
                    totals: totals.clone(),
                }));
            }

            self.path.pop();
            groups.push(TopGroup { label, totals });
        }
        groups
    }
}

/// Split sorted rows into consecutive runs sharing a label.
fn runs<'r>(rows: &'r [ReportRow], field: &str) -> Vec<&'r [ReportRow]> {
    let mut out = Vec::new();
    let mut start = 0;
    for i in 1..=rows.len() {
        let boundary = i == rows.len()
            || natural_cmp(&label_of(&rows[start], field), &label_of(&rows[i], field)).is_ne();
        if boundary {
            out.push(&rows[start..i]);
            start = i;
        }
    }
    out
}
