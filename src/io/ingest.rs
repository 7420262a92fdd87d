//! Workbook ingest and normalization.
//!
//! This module turns the two freight sheets into a clean, joined set of
//! `(carrier, price, lead time)` records that are safe to score.
//!
//! - **values sheet**: header row; carrier and price columns are required
//! - **lead-time sheet**: no header; column A is the carrier, column B the days
//!
//! Rows that cannot be used are skipped and counted; a missing sheet or
//! required column stops the load.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::domain::{Cell, JoinedQuote, SourceSpec};
use crate::error::LoadError;
use crate::io::workbook::{CalamineWorkbook, SheetTable, Workbook};

/// Row counts from a load, for the run summary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// Data rows in the values sheet (header excluded).
    pub values_rows: usize,
    /// Values rows with a carrier and a usable price.
    pub values_kept: usize,
    pub lead_time_rows: usize,
    pub lead_times_kept: usize,
    /// Carriers found in only one of the two sheets.
    pub unmatched: Vec<String>,
    /// Carrier names repeated within a sheet (first occurrence kept).
    pub duplicates: Vec<String>,
}

/// Loader output: the joined quotes plus what the resolver needs from the values sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedBook {
    pub source: PathBuf,
    pub values_sheet: String,
    pub lead_time_sheet: String,
    /// Values-sheet header names, trimmed, in column order.
    pub values_columns: Vec<String>,
    pub carrier_column: usize,
    pub price_column: usize,
    /// Joined quotes in values-sheet order.
    pub quotes: Vec<JoinedQuote>,
    pub report: LoadReport,
}

/// Open `path` with `calamine` and load it.
pub fn load_book(path: &Path, spec: &SourceSpec) -> Result<LoadedBook, LoadError> {
    let mut workbook = CalamineWorkbook::open(path)?;
    load_from_workbook(&mut workbook, path, spec)
}

/// Load, clean, and join the two sheets of an already-open workbook.
pub fn load_from_workbook<W: Workbook>(
    workbook: &mut W,
    path: &Path,
    spec: &SourceSpec,
) -> Result<LoadedBook, LoadError> {
    let values = workbook
        .sheet(&spec.values_sheet)
        .map_err(|reason| LoadError::parse(path, reason))?;
    let lead_times = workbook
        .sheet(&spec.lead_time_sheet)
        .map_err(|reason| LoadError::parse(path, reason))?;

    let mut report = LoadReport::default();
    let priced = parse_values(&values, spec, &mut report).map_err(|reason| LoadError::parse(path, reason))?;
    let lead_map = parse_lead_times(&lead_times, &mut report);

    let quotes = join(priced.rows, &lead_map, &mut report);
    if quotes.is_empty() {
        return Err(LoadError::EmptyAfterFiltering {
            path: path.to_path_buf(),
            values_kept: report.values_kept,
            lead_times_kept: report.lead_times_kept,
        });
    }

    info!(
        source = %path.display(),
        carriers = quotes.len(),
        values_kept = report.values_kept,
        lead_times_kept = report.lead_times_kept,
        "loaded freight quotes"
    );

    Ok(LoadedBook {
        source: path.to_path_buf(),
        values_sheet: values.name,
        lead_time_sheet: lead_times.name,
        values_columns: priced.columns,
        carrier_column: priced.carrier_idx,
        price_column: priced.price_idx,
        quotes,
        report,
    })
}

struct PricedRow {
    carrier: String,
    price: f64,
    row: Vec<Cell>,
}

struct ParsedValues {
    columns: Vec<String>,
    carrier_idx: usize,
    price_idx: usize,
    rows: Vec<PricedRow>,
}

fn parse_values(sheet: &SheetTable, spec: &SourceSpec, report: &mut LoadReport) -> Result<ParsedValues, String> {
    let mut rows = sheet.rows.iter();
    let header = rows
        .next()
        .ok_or_else(|| format!("sheet `{}` is empty (expected a header row)", sheet.name))?;

    let columns: Vec<String> = header
        .iter()
        .map(|c| c.as_text().map(|s| s.trim_start_matches('\u{feff}').to_string()).unwrap_or_default())
        .collect();
    let header_map = build_header_map(&columns);

    let carrier_idx = find_column(&header_map, &spec.carrier_column, &sheet.name)?;
    let price_idx = find_column(&header_map, &spec.price_column, &sheet.name)?;

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for (idx, row) in rows.enumerate() {
        // +2: 1-based, after the header row.
        let line = idx + 2;
        report.values_rows += 1;

        let Some(carrier) = row.get(carrier_idx).and_then(Cell::as_text) else {
            debug!(line, "values row without carrier name skipped");
            continue;
        };
        let Some(price) = row.get(price_idx).and_then(Cell::as_f64) else {
            debug!(line, carrier = %carrier, "values row with non-numeric price skipped");
            continue;
        };
        if price <= spec.min_price {
            debug!(line, carrier = %carrier, price, min_price = spec.min_price, "price at or below threshold skipped");
            continue;
        }
        if !seen.insert(carrier.clone()) {
            warn!(line, carrier = %carrier, "duplicate carrier in values sheet; keeping first row");
            report.duplicates.push(carrier);
            continue;
        }

        report.values_kept += 1;
        out.push(PricedRow {
            carrier,
            price,
            row: row.clone(),
        });
    }

    Ok(ParsedValues {
        columns,
        carrier_idx,
        price_idx,
        rows: out,
    })
}

/// Headerless two-column sheet -> carrier name to lead time (days), plus first-seen order.
fn parse_lead_times(sheet: &SheetTable, report: &mut LoadReport) -> LeadTimes {
    let mut lead = LeadTimes::default();
    for (idx, row) in sheet.rows.iter().enumerate() {
        let line = idx + 1;
        report.lead_time_rows += 1;

        let Some(days) = row.get(1).and_then(Cell::as_f64) else {
            continue;
        };
        let Some(carrier) = row.first().and_then(Cell::as_text) else {
            debug!(line, "lead-time row without carrier name skipped");
            continue;
        };
        if days <= 0.0 {
            debug!(line, carrier = %carrier, days, "non-positive lead time skipped");
            continue;
        }
        if lead.days.contains_key(&carrier) {
            warn!(line, carrier = %carrier, "duplicate carrier in lead-time sheet; keeping first row");
            report.duplicates.push(carrier);
            continue;
        }

        report.lead_times_kept += 1;
        lead.order.push(carrier.clone());
        lead.days.insert(carrier, days);
    }
    lead
}

#[derive(Default)]
struct LeadTimes {
    days: HashMap<String, f64>,
    order: Vec<String>,
}

/// Inner join on carrier name, in values-sheet order.
fn join(priced: Vec<PricedRow>, lead: &LeadTimes, report: &mut LoadReport) -> Vec<JoinedQuote> {
    let mut matched = HashSet::new();
    let mut quotes = Vec::with_capacity(priced.len());

    for row in priced {
        match lead.days.get(&row.carrier) {
            Some(&days) => {
                matched.insert(row.carrier.clone());
                quotes.push(JoinedQuote {
                    carrier_name: row.carrier,
                    price: row.price,
                    lead_time_days: days,
                    values_row: row.row,
                });
            }
            None => {
                debug!(carrier = %row.carrier, "carrier has no lead time; dropped");
                report.unmatched.push(row.carrier);
            }
        }
    }

    for carrier in &lead.order {
        if !matched.contains(carrier) {
            debug!(carrier = %carrier, "carrier has no usable price; dropped");
            report.unmatched.push(carrier.clone());
        }
    }

    quotes
}

fn build_header_map(columns: &[String]) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for (idx, name) in columns.iter().enumerate() {
        // First column wins when a header is repeated.
        map.entry(normalize_header_name(name)).or_insert(idx);
    }
    map
}

fn normalize_header_name(name: &str) -> String {
    name.trim().trim_start_matches('\u{feff}').to_lowercase()
}

fn find_column(header_map: &HashMap<String, usize>, name: &str, sheet: &str) -> Result<usize, String> {
    header_map
        .get(&normalize_header_name(name))
        .copied()
        .ok_or_else(|| format!("missing required column `{name}` in sheet `{sheet}`"))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::io::workbook::MemoryWorkbook;

    pub(crate) fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    pub(crate) fn num(v: f64) -> Cell {
        Cell::Number(v)
    }

    /// Values sheet with a payment column, lead-time sheet with a stray header line.
    pub(crate) fn sample_workbook() -> MemoryWorkbook {
        MemoryWorkbook::new(vec![
            SheetTable::new(
                "DADOS 1",
                vec![
                    vec![text("TRANSPORTADORA"), text("VALOR"), text("Cond. Pagamento")],
                    vec![text(" Rapido Sul "), num(1200.0), text("30 dias")],
                    vec![text("Expresso Norte"), text("950.5"), Cell::Empty],
                    vec![text("Translog"), text("a combinar"), text("15 dias")],
                    vec![text("Carga Leve"), num(0.0), text("avista")],
                    vec![text("Sem Prazo"), num(700.0), text("28 dias")],
                ],
            ),
            SheetTable::new(
                "DADOS 3",
                vec![
                    vec![text("TRANSPORTADORA"), text("PRAZO")],
                    vec![text("Rapido Sul"), num(5.0)],
                    vec![text("Expresso Norte  "), num(8.0)],
                    vec![text("Translog"), num(3.0)],
                    vec![text("Carga Leve"), num(2.0)],
                ],
            ),
        ])
    }

    fn load(wb: &mut MemoryWorkbook, spec: &SourceSpec) -> Result<LoadedBook, LoadError> {
        load_from_workbook(wb, Path::new("dados.xlsx"), spec)
    }

    #[test]
    fn joins_trimmed_names_and_drops_unusable_rows() {
        let book = load(&mut sample_workbook(), &SourceSpec::default()).unwrap();

        let names: Vec<&str> = book.quotes.iter().map(|q| q.carrier_name.as_str()).collect();
        assert_eq!(names, vec!["Rapido Sul", "Expresso Norte"]);
        assert_eq!(book.quotes[0].price, 1200.0);
        assert_eq!(book.quotes[0].lead_time_days, 5.0);
        assert_eq!(book.quotes[1].price, 950.5);
        assert_eq!(book.quotes[1].lead_time_days, 8.0);
    }

    #[test]
    fn report_counts_rows_and_unmatched_carriers() {
        let book = load(&mut sample_workbook(), &SourceSpec::default()).unwrap();

        assert_eq!(book.report.values_rows, 5);
        // Translog (text price) and Carga Leve (zero price) are dropped.
        assert_eq!(book.report.values_kept, 3);
        assert_eq!(book.report.lead_time_rows, 5);
        assert_eq!(book.report.lead_times_kept, 4);
        assert_eq!(book.report.unmatched, vec!["Sem Prazo", "Translog", "Carga Leve"]);
    }

    #[test]
    fn every_joined_carrier_exists_in_both_sheets() {
        let mut wb = sample_workbook();
        let book = load(&mut wb, &SourceSpec::default()).unwrap();

        let mut names_in = |sheet: &str, col: usize| -> HashSet<String> {
            wb.sheet(sheet)
                .unwrap()
                .rows
                .iter()
                .filter_map(|r| r.get(col).and_then(Cell::as_text))
                .collect()
        };
        let values = names_in("DADOS 1", 0);
        let lead = names_in("DADOS 3", 0);
        for q in &book.quotes {
            assert!(values.contains(&q.carrier_name));
            assert!(lead.contains(&q.carrier_name));
        }
    }

    #[test]
    fn price_threshold_is_exclusive_and_configurable() {
        let spec = SourceSpec {
            min_price: 1000.0,
            ..SourceSpec::default()
        };
        let book = load(&mut sample_workbook(), &spec).unwrap();
        let names: Vec<&str> = book.quotes.iter().map(|q| q.carrier_name.as_str()).collect();
        assert_eq!(names, vec!["Rapido Sul"]);

        let spec = SourceSpec {
            min_price: 1200.0,
            ..SourceSpec::default()
        };
        assert!(matches!(
            load(&mut sample_workbook(), &spec),
            Err(LoadError::EmptyAfterFiltering { values_kept: 0, .. })
        ));
    }

    #[test]
    fn header_matching_ignores_case_and_bom() {
        let mut wb = MemoryWorkbook::new(vec![
            SheetTable::new(
                "DADOS 1",
                vec![
                    vec![text("\u{feff}transportadora "), text("Valor")],
                    vec![text("A"), num(10.0)],
                ],
            ),
            SheetTable::new("DADOS 3", vec![vec![text("A"), num(1.0)]]),
        ]);
        let book = load(&mut wb, &SourceSpec::default()).unwrap();
        assert_eq!(book.quotes.len(), 1);
        assert_eq!(book.values_columns[0], "transportadora");
    }

    #[test]
    fn missing_price_column_is_a_parse_failure() {
        let mut wb = MemoryWorkbook::new(vec![
            SheetTable::new("DADOS 1", vec![vec![text("TRANSPORTADORA"), text("PRECO")]]),
            SheetTable::new("DADOS 3", vec![]),
        ]);
        match load(&mut wb, &SourceSpec::default()) {
            Err(LoadError::ParseFailure { reason, .. }) => {
                assert!(reason.contains("missing required column `VALOR`"), "{reason}");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn missing_sheet_is_a_parse_failure() {
        let mut wb = MemoryWorkbook::new(vec![SheetTable::new(
            "DADOS 1",
            vec![vec![text("TRANSPORTADORA"), text("VALOR")]],
        )]);
        assert!(matches!(
            load(&mut wb, &SourceSpec::default()),
            Err(LoadError::ParseFailure { .. })
        ));
    }

    #[test]
    fn empty_values_sheet_is_a_parse_failure() {
        let mut wb = MemoryWorkbook::new(vec![
            SheetTable::new("DADOS 1", vec![]),
            SheetTable::new("DADOS 3", vec![]),
        ]);
        assert!(matches!(
            load(&mut wb, &SourceSpec::default()),
            Err(LoadError::ParseFailure { .. })
        ));
    }

    #[test]
    fn no_overlap_is_empty_after_filtering() {
        let mut wb = MemoryWorkbook::new(vec![
            SheetTable::new(
                "DADOS 1",
                vec![vec![text("TRANSPORTADORA"), text("VALOR")], vec![text("A"), num(10.0)]],
            ),
            SheetTable::new("DADOS 3", vec![vec![text("B"), num(2.0)]]),
        ]);
        match load(&mut wb, &SourceSpec::default()) {
            Err(LoadError::EmptyAfterFiltering {
                values_kept,
                lead_times_kept,
                ..
            }) => {
                assert_eq!(values_kept, 1);
                assert_eq!(lead_times_kept, 1);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn duplicates_keep_first_occurrence() {
        let mut wb = MemoryWorkbook::new(vec![
            SheetTable::new(
                "DADOS 1",
                vec![
                    vec![text("TRANSPORTADORA"), text("VALOR")],
                    vec![text("A"), num(10.0)],
                    vec![text("A "), num(5.0)],
                ],
            ),
            SheetTable::new(
                "DADOS 3",
                vec![vec![text("A"), num(2.0)], vec![text("A"), num(9.0)]],
            ),
        ]);
        let book = load(&mut wb, &SourceSpec::default()).unwrap();
        assert_eq!(book.quotes.len(), 1);
        assert_eq!(book.quotes[0].price, 10.0);
        assert_eq!(book.quotes[0].lead_time_days, 2.0);
        assert_eq!(book.report.duplicates, vec!["A", "A"]);
    }

    #[test]
    fn non_positive_lead_times_are_skipped() {
        let mut wb = MemoryWorkbook::new(vec![
            SheetTable::new(
                "DADOS 1",
                vec![
                    vec![text("TRANSPORTADORA"), text("VALOR")],
                    vec![text("A"), num(10.0)],
                    vec![text("B"), num(10.0)],
                ],
            ),
            SheetTable::new(
                "DADOS 3",
                vec![vec![text("A"), num(0.0)], vec![text("B"), text(" 4 ")]],
            ),
        ]);
        let book = load(&mut wb, &SourceSpec::default()).unwrap();
        assert_eq!(book.quotes.len(), 1);
        assert_eq!(book.quotes[0].carrier_name, "B");
        assert_eq!(book.quotes[0].lead_time_days, 4.0);
    }

    #[test]
    fn reads_xlsx_file_from_disk() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/quotes.xlsx");
        let book = load_book(&path, &SourceSpec::default()).unwrap();

        assert_eq!(book.values_sheet, "DADOS 1");
        assert_eq!(book.values_columns, vec!["TRANSPORTADORA", "VALOR", "Cond. Pagamento"]);
        let names: Vec<&str> = book.quotes.iter().map(|q| q.carrier_name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(book.quotes[0].price, 100.0);
        assert_eq!(book.quotes[1].price, 200.0);
        assert!(book.quotes.iter().all(|q| q.lead_time_days == 5.0));
        assert_eq!(book.report.unmatched, vec!["C"]);

        let resolved = crate::terms::resolve_terms(&book, &crate::domain::PaymentConfig::default());
        let terms: Vec<&str> = resolved.iter().map(|q| q.payment_terms.as_str()).collect();
        assert_eq!(terms, vec!["30 dias", "-"]);
    }
}
