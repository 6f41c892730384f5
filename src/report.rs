//! Reporter: nested results mappings rendered as indented text or JSON.
//!
//! Tables print like a data frame preview, head and tail rows with an
//! ellipsis between them. Histograms of persistence lengths are drawn
//! with `#` bars.

use std::collections::BTreeMap;
use std::fmt::{self, Write as _};

use serde::Serialize;

use crate::config::ReportFormat;
use crate::error::{Error, Result};

/// Rows shown from each end of a table by default
pub const DEFAULT_PREVIEW_ROWS: usize = 5;
/// Width of the longest histogram bar
const HISTOGRAM_WIDTH: usize = 40;

pub type ResultsMap = BTreeMap<String, ResultValue>;

/// One value of a results mapping
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResultValue {
    Number(f64),
    Integer(i64),
    Bool(bool),
    Text(String),
    List(Vec<ResultValue>),
    Map(ResultsMap),
    Table(Table),
}

impl ResultValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ResultValue::Number(x) => Some(*x),
            ResultValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ResultsMap> {
        match self {
            ResultValue::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl From<f64> for ResultValue {
    fn from(x: f64) -> Self {
        ResultValue::Number(x)
    }
}

impl From<i64> for ResultValue {
    fn from(i: i64) -> Self {
        ResultValue::Integer(i)
    }
}

impl From<usize> for ResultValue {
    fn from(n: usize) -> Self {
        ResultValue::Integer(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<bool> for ResultValue {
    fn from(b: bool) -> Self {
        ResultValue::Bool(b)
    }
}

impl From<&str> for ResultValue {
    fn from(s: &str) -> Self {
        ResultValue::Text(s.to_owned())
    }
}

impl From<String> for ResultValue {
    fn from(s: String) -> Self {
        ResultValue::Text(s)
    }
}

impl From<Vec<f64>> for ResultValue {
    fn from(xs: Vec<f64>) -> Self {
        ResultValue::List(xs.into_iter().map(ResultValue::Number).collect())
    }
}

impl From<Vec<usize>> for ResultValue {
    fn from(xs: Vec<usize>) -> Self {
        ResultValue::List(xs.into_iter().map(ResultValue::from).collect())
    }
}

impl From<ResultsMap> for ResultValue {
    fn from(m: ResultsMap) -> Self {
        ResultValue::Map(m)
    }
}

impl From<Table> for ResultValue {
    fn from(t: Table) -> Self {
        ResultValue::Table(t)
    }
}

/// Key for a tuple-indexed entry, rendered `(a, b)`
pub fn tuple_key(a: impl fmt::Display, b: impl fmt::Display) -> String {
    format!("({a}, {b})")
}

/// Column-named rows of values; every row has one value per column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<ResultValue>>,
}

impl Table {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<ResultValue>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::invalid(
                "row",
                format!("{} values for {} columns", row.len(), self.columns.len()),
            ));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<ResultValue>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Numeric cells of a column; missing column gives an empty vector
    pub fn numeric_column(&self, name: &str) -> Vec<f64> {
        match self.column_index(name) {
            Some(j) => self.rows.iter().filter_map(|r| r.get(j)?.as_number()).collect(),
            None => Vec::new(),
        }
    }

    /// Frame-style preview with at most `preview` rows from each end
    pub fn render(&self, preview: usize) -> String {
        let n = self.rows.len();
        let shown: Vec<usize> = if n <= 2 * preview {
            (0..n).collect()
        } else {
            (0..preview).chain(n - preview..n).collect()
        };

        let index_width = n.saturating_sub(1).to_string().len().max(1);
        let cells: Vec<Vec<String>> = shown
            .iter()
            .map(|&i| self.rows[i].iter().map(format_scalar).collect())
            .collect();
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(j, c)| {
                cells
                    .iter()
                    .map(|row| row[j].chars().count())
                    .chain(std::iter::once(c.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        let _ = write!(out, "{:index_width$}", "");
        for (c, w) in self.columns.iter().zip(widths.iter().copied()) {
            let _ = write!(out, "  {c:>w$}");
        }
        out.push('\n');

        for (k, (&i, row)) in shown.iter().zip(&cells).enumerate() {
            if n > 2 * preview && k == preview {
                let _ = write!(out, "{:index_width$}", "..");
                for &w in &widths {
                    let _ = write!(out, "  {:>w$}", "...");
                }
                out.push('\n');
            }
            let _ = write!(out, "{i:<index_width$}");
            for (cell, w) in row.iter().zip(widths.iter().copied()) {
                let _ = write!(out, "  {cell:>w$}");
            }
            out.push('\n');
        }
        let _ = write!(out, "\n[{} rows x {} columns]", n, self.columns.len());
        out
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(DEFAULT_PREVIEW_ROWS))
    }
}

fn format_number(x: f64) -> String {
    if x.is_nan() {
        "nan".to_owned()
    } else if x == f64::INFINITY {
        "inf".to_owned()
    } else if x == f64::NEG_INFINITY {
        "-inf".to_owned()
    } else {
        format!("{x:.6}")
    }
}

fn format_scalar(v: &ResultValue) -> String {
    match v {
        ResultValue::Number(x) => format_number(*x),
        ResultValue::Integer(i) => i.to_string(),
        ResultValue::Bool(true) => "True".to_owned(),
        ResultValue::Bool(false) => "False".to_owned(),
        ResultValue::Text(s) => s.clone(),
        ResultValue::List(xs) => {
            let inner: Vec<String> = xs.iter().map(format_scalar).collect();
            format!("[{}]", inner.join(", "))
        }
        ResultValue::Map(m) => format!("{{{} entries}}", m.len()),
        ResultValue::Table(t) => format!("<table {}x{}>", t.len(), t.columns.len()),
    }
}

fn render_value(out: &mut String, key: &str, value: &ResultValue, depth: usize, preview: usize) {
    let pad = "  ".repeat(depth);
    match value {
        ResultValue::Map(map) => {
            let _ = writeln!(out, "{pad}{key}:");
            for (k, v) in map {
                render_value(out, k, v, depth + 1, preview);
            }
        }
        ResultValue::Table(table) => {
            let _ = writeln!(out, "{pad}{key}:");
            for line in table.render(preview).lines() {
                let _ = writeln!(out, "{pad}  {line}");
            }
        }
        scalar => {
            let _ = writeln!(out, "{pad}{key}: {}", format_scalar(scalar));
        }
    }
}

/// Indented `key: value` lines, nested maps one level deeper
pub fn render_text(results: &ResultsMap) -> String {
    render_text_with_preview(results, DEFAULT_PREVIEW_ROWS)
}

pub fn render_text_with_preview(results: &ResultsMap, preview: usize) -> String {
    let mut out = String::new();
    for (k, v) in results {
        render_value(&mut out, k, v, 0, preview);
    }
    out
}

/// Pretty JSON; non-finite numbers become `null`
pub fn render_json(results: &ResultsMap) -> Result<String> {
    Ok(serde_json::to_string_pretty(results)?)
}

pub fn render(results: &ResultsMap, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(render_text(results)),
        ReportFormat::Json => render_json(results),
    }
}

/// Text histogram with `bins` equal-width bins over the finite values
pub fn histogram(values: &[f64], bins: usize) -> String {
    let finite: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return "(no finite values)\n".to_owned();
    }
    let lo = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = if hi > lo { (hi - lo) / bins as f64 } else { 1.0 };

    let mut counts = vec![0usize; bins];
    for x in &finite {
        let k = (((x - lo) / width) as usize).min(bins - 1);
        counts[k] += 1;
    }
    let peak = counts.iter().copied().max().unwrap_or(1).max(1);

    let mut out = String::new();
    for (k, count) in counts.iter().enumerate() {
        let start = lo + k as f64 * width;
        let bar = "#".repeat(count * HISTOGRAM_WIDTH / peak);
        let _ = writeln!(
            out,
            "[{:>9.4}, {:>9.4}) | {:<bar_width$} {}",
            start,
            start + width,
            bar,
            count,
            bar_width = HISTOGRAM_WIDTH
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ResultsMap {
        let mut inner = ResultsMap::new();
        inner.insert("bottleneck".into(), 0.25.into());
        inner.insert("betti".into(), vec![3usize, 1].into());
        let mut root = ResultsMap::new();
        root.insert(tuple_key(3, "sphere"), inner.into());
        root.insert("failed".into(), f64::NAN.into());
        root
    }

    #[test]
    fn test_text_rendering_nests() {
        let text = render_text(&sample());
        assert!(text.contains("(3, sphere):\n  betti: [3, 1]\n  bottleneck: 0.250000\n"));
        assert!(text.contains("failed: nan"));
    }

    #[test]
    fn test_json_nan_is_null() {
        let json = render_json(&sample()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed["failed"].is_null());
        assert_eq!(parsed["(3, sphere)"]["bottleneck"], 0.25);
    }

    #[test]
    fn test_table_truncates() {
        let mut t = Table::new(["Group", "Rank"]);
        for i in 0..20 {
            t.push_row(vec![format!("H^{i}").into(), (i as i64).into()]).unwrap();
        }
        assert!(t.push_row(vec![1.0.into()]).is_err());
        // The short row was refused, so every stored row is full width
        assert_eq!(t.len(), 20);
        assert!(t.rows().iter().all(|r| r.len() == t.columns().len()));
        let text = t.render(2);
        assert!(text.contains("H^0"));
        assert!(text.contains("H^19"));
        assert!(!text.contains("H^10"));
        assert!(text.contains("..."));
        assert!(text.ends_with("[20 rows x 2 columns]"));
        assert_eq!(t.numeric_column("Rank").len(), 20);
        assert!(t.numeric_column("Missing").is_empty());
    }

    #[test]
    fn test_histogram_counts_everything() {
        let values = [0.0, 0.1, 0.2, 0.9, 1.0, f64::INFINITY];
        let h = histogram(&values, 4);
        assert_eq!(h.lines().count(), 4);
        let total: usize = h
            .lines()
            .filter_map(|l| l.split_whitespace().last()?.parse::<usize>().ok())
            .sum();
        assert_eq!(total, 5);
    }
}
