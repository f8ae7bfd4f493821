//! The laid-out grid every renderer walks.
//!
//! Grouped and hierarchical reports are turned into a `Sheet` once, with all
//! numbers already formatted. The HTML table, CSV, print document and
//! terminal table only differ in how they write the same cells.

use serde_json::Value;

use crate::fmt::{amount, amount_value, NegativeStyle};
use crate::grouping::GroupedReport;
use crate::hierarchy::{Hierarchy, Line};
use crate::models::{ReportRow, Totals};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Amount,
}

#[derive(Debug, Clone)]
pub struct Column {
    pub header: String,
    pub field: String,
    pub kind: ColumnKind,
}

impl Column {
    pub fn text(header: &str, field: &str) -> Self {
        Self { header: header.to_string(), field: field.to_string(), kind: ColumnKind::Text }
    }

    pub fn amount(header: &str, field: &str) -> Self {
        Self { header: header.to_string(), field: field.to_string(), kind: ColumnKind::Amount }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub text: String,
    pub rowspan: usize,
    pub colspan: usize,
    pub numeric: bool,
}

impl Cell {
    fn plain(text: impl Into<String>, numeric: bool) -> Self {
        Self { text: text.into(), rowspan: 1, colspan: 1, numeric }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Cell(Cell),
    /// Occupied by a label cell from a row above.
    Covered,
    /// Occupied by a label cell to the left.
    Merged,
}

impl Slot {
    /// Text as it appears in flat outputs; merged positions are blank.
    pub fn flat_text(&self) -> &str {
        match self {
            Slot::Cell(c) => &c.text,
            Slot::Covered | Slot::Merged => "",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Data,
    Subtotal { level: usize },
    GrandTotal,
}

#[derive(Debug, Clone)]
pub struct SheetRow {
    pub kind: RowKind,
    /// Position among data rows, used for striping.
    pub index: usize,
    pub slots: Vec<Slot>,
}

#[derive(Debug, Clone, Default)]
pub struct SheetMeta {
    pub title: String,
    pub filters: Vec<(String, String)>,
    pub currency: String,
}

#[derive(Debug, Clone)]
pub struct Sheet {
    pub meta: SheetMeta,
    pub columns: Vec<Column>,
    pub rows: Vec<SheetRow>,
    /// Formatted designated grand total.
    pub grand_total: String,
}

#[derive(Debug, Clone)]
pub struct Layout {
    /// One label column per grouping level, outermost first.
    pub group_columns: Vec<Column>,
    pub detail_columns: Vec<Column>,
    pub style: NegativeStyle,
}

impl Layout {
    fn columns(&self) -> Vec<Column> {
        self.group_columns.iter().chain(&self.detail_columns).cloned().collect()
    }
}

struct SheetBuilder<'a> {
    layout: &'a Layout,
    columns: Vec<Column>,
    sum_fields: &'a [String],
    rows: Vec<SheetRow>,
    data_rows: usize,
}

impl<'a> SheetBuilder<'a> {
    fn new(layout: &'a Layout, sum_fields: &'a [String]) -> Self {
        Self {
            layout,
            columns: layout.columns(),
            sum_fields,
            rows: Vec::new(),
            data_rows: 0,
        }
    }

    /// Number of text columns before the first amount column; total labels
    /// stretch across these.
    fn lead(&self) -> usize {
        self.columns
            .iter()
            .take_while(|c| c.kind == ColumnKind::Text)
            .count()
            .max(1)
    }

    fn detail_slots(&self, row: &ReportRow) -> Vec<Slot> {
        self.layout
            .detail_columns
            .iter()
            .map(|c| match c.kind {
                ColumnKind::Text => Slot::Cell(Cell::plain(row.text_or_empty(&c.field), false)),
                ColumnKind::Amount => Slot::Cell(Cell::plain(
                    amount_value(row.get(&c.field).unwrap_or(&Value::Null), self.layout.style),
                    true,
                )),
            })
            .collect()
    }

    fn push_data(&mut self, slots: Vec<Slot>) {
        self.rows.push(SheetRow { kind: RowKind::Data, index: self.data_rows, slots });
        self.data_rows += 1;
    }

    /// A total row: `skip` covered slots, a label spanning to the first
    /// amount column, then the sums.
    fn push_total(&mut self, kind: RowKind, skip: usize, label: String, totals: &Totals) {
        let lead = self.lead();
        let mut slots = vec![Slot::Covered; skip];
        let span = lead.saturating_sub(skip).max(1);
        slots.push(Slot::Cell(Cell { text: label, rowspan: 1, colspan: span, numeric: false }));
        slots.extend(std::iter::repeat(Slot::Merged).take(span - 1));
        for column in self.columns.iter().skip(skip + span) {
            let sum = self
                .sum_fields
                .iter()
                .position(|f| *f == column.field)
                .map(|i| totals.sums[i]);
            let slot = match (column.kind, sum) {
                (ColumnKind::Amount, Some(v)) => Cell::plain(amount(v, self.layout.style), true),
                _ => Cell::plain("", column.kind == ColumnKind::Amount),
            };
            slots.push(Slot::Cell(slot));
        }
        self.rows.push(SheetRow { kind, index: self.data_rows, slots });
    }

    fn finish(mut self, meta: SheetMeta, grand: &Totals) -> Sheet {
        self.push_total(RowKind::GrandTotal, 0, "Grand Total".to_string(), grand);
        Sheet {
            meta,
            grand_total: amount(grand.primary(), self.layout.style),
            columns: self.columns,
            rows: self.rows,
        }
    }
}

impl Sheet {
    /// Single-level grouped report: label column merged over each group's
    /// members, optional subtotal after each group.
    pub fn from_grouped(report: &GroupedReport, layout: &Layout, meta: SheetMeta) -> Sheet {
        let mut b = SheetBuilder::new(layout, &report.sum_fields);
        for group in &report.groups {
            for (i, member) in group.members.iter().enumerate() {
                let mut slots = Vec::new();
                for _ in &layout.group_columns {
                    if i == 0 {
                        slots.push(Slot::Cell(Cell {
                            text: group.label.clone(),
                            rowspan: group.members.len(),
                            colspan: 1,
                            numeric: false,
                        }));
                    } else {
                        slots.push(Slot::Covered);
                    }
                }
                slots.extend(b.detail_slots(member));
                b.push_data(slots);
            }
            if report.shows_subtotal(group) {
                b.push_total(RowKind::Subtotal { level: 0 }, 0, format!("Total {}", group.label), &group.totals);
            }
        }
        b.finish(meta, &report.grand)
    }

    pub fn from_hierarchy(h: &Hierarchy, layout: &Layout, meta: SheetMeta) -> Sheet {
        let mut b = SheetBuilder::new(layout, &h.sum_fields);
        for line in &h.lines {
            match line {
                Line::Row(r) => {
                    let mut slots = Vec::new();
                    for (level, field) in h.levels.iter().enumerate() {
                        if r.starts[level] {
                            slots.push(Slot::Cell(Cell {
                                text: crate::hierarchy::label_of(&r.row, field),
                                rowspan: r.spans[level],
                                colspan: 1,
                                numeric: false,
                            }));
                        } else {
                            slots.push(Slot::Covered);
                        }
                    }
                    slots.extend(b.detail_slots(&r.row));
                    b.push_data(slots);
                }
                Line::Subtotal(s) => {
                    let label = format!("Total {}", s.path.last().map(String::as_str).unwrap_or(""));
                    b.push_total(RowKind::Subtotal { level: s.level }, s.level, label, &s.totals);
                }
            }
        }
        b.finish(meta, &h.grand)
    }

    pub fn data_rows(&self) -> impl Iterator<Item = &SheetRow> {
        self.rows.iter().filter(|r| r.kind == RowKind::Data)
    }

    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.header.as_str()).collect()
    }
}
