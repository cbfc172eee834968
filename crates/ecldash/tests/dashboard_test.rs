//! Full-pipeline test: real template-width workbooks through to figures.

use approx::assert_relative_eq;
use ecldash::pipeline::{dashboard_figures, segment_changes};
use ecldash_data::AppConfig;
use ecldash_transform::{DashboardView, ReportingQuarter, Selection};
use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

/// Column positions used by the fixture, matching the template ranges.
const ECL_TOTAL: u16 = 58;
const ECL_MORTGAGES: u16 = 60;
const STAGING_S2: u16 = 110;
const STAGING_S3: u16 = 111;
const COVERAGE_TOTAL: u16 = 141;
const TRAILER_FIRST: u16 = 195;

struct FirmRow {
    name: &'static str,
    ecl_total: f64,
    ecl_mortgages: f64,
    s2: f64,
    s3: f64,
    coverage: f64,
}

fn write_quarter_workbook(dir: &TempDir, token: &str, firms: &[FirmRow]) {
    let path = dir.path().join(format!("{token}.xlsx"));
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    // Banner rows anchor the sheet range at the origin.
    sheet.write_string(0, 0, "ECL disclosure extract").unwrap();
    sheet.write_string(1, 0, token).unwrap();
    sheet.write_string(2, 0, "Firm").unwrap();
    // Irrelevant filler row above the portfolio header.
    sheet.write_string(3, ECL_TOTAL, "n/a").unwrap();

    // Sparse portfolio header.
    sheet.write_string(4, ECL_TOTAL, "Total").unwrap();
    sheet.write_string(4, ECL_MORTGAGES, "Mortgages").unwrap();
    sheet.write_string(4, STAGING_S2, "Total").unwrap();
    sheet.write_string(4, COVERAGE_TOTAL, "Total").unwrap();

    // Sub-metric header; unlabeled metric columns are dropped downstream.
    sheet.write_string(5, ECL_TOTAL, "Total").unwrap();
    sheet.write_string(5, ECL_MORTGAGES, "Total").unwrap();
    sheet.write_string(5, STAGING_S2, "S2").unwrap();
    sheet.write_string(5, STAGING_S3, "S3").unwrap();
    sheet.write_string(5, COVERAGE_TOTAL, "Total").unwrap();
    sheet.write_string(5, TRAILER_FIRST, "Impairment charge").unwrap();
    sheet.write_string(5, TRAILER_FIRST + 1, "Exposure").unwrap();

    for (offset, firm) in firms.iter().enumerate() {
        let row = 6 + offset as u32;
        sheet.write_string(row, 0, firm.name).unwrap();
        sheet.write_number(row, ECL_TOTAL, firm.ecl_total).unwrap();
        sheet
            .write_number(row, ECL_MORTGAGES, firm.ecl_mortgages)
            .unwrap();
        sheet.write_number(row, STAGING_S2, firm.s2).unwrap();
        sheet.write_number(row, STAGING_S3, firm.s3).unwrap();
        sheet.write_number(row, COVERAGE_TOTAL, firm.coverage).unwrap();
        sheet.write_string(row, TRAILER_FIRST, "-").unwrap();
        sheet.write_number(row, TRAILER_FIRST + 1, 9_999.0).unwrap();
    }

    workbook.save(&path).unwrap();
}

fn fixture_config(dir: &TempDir) -> AppConfig {
    write_quarter_workbook(
        dir,
        "4Q19",
        &[
            FirmRow {
                name: "Alpha",
                ecl_total: 100.0,
                ecl_mortgages: 40.0,
                s2: 10.0,
                s3: 2.0,
                coverage: 1.5,
            },
            FirmRow {
                name: "Beta",
                ecl_total: 200.0,
                ecl_mortgages: 90.0,
                s2: 12.0,
                s3: 3.0,
                coverage: 1.8,
            },
        ],
    );
    write_quarter_workbook(
        dir,
        "4Q20",
        &[
            FirmRow {
                name: "Alpha",
                ecl_total: 120.0,
                ecl_mortgages: 44.0,
                s2: 11.0,
                s3: 2.5,
                coverage: 1.6,
            },
            FirmRow {
                name: "Beta",
                ecl_total: 190.0,
                ecl_mortgages: 81.0,
                s2: 15.0,
                s3: 3.3,
                coverage: 1.7,
            },
        ],
    );

    let toml = format!(
        r#"
        [segments.UK]
        data_dir = "{}"
        firms = ["Alpha", "Beta"]
        dates = ["4Q19", "4Q20"]
        "#,
        dir.path().display()
    );
    AppConfig::from_toml(&toml).unwrap()
}

fn quarters() -> Vec<ReportingQuarter> {
    vec!["4Q19".parse().unwrap(), "4Q20".parse().unwrap()]
}

#[test]
fn ecl_changes_match_hand_computed_values() {
    let dir = TempDir::new().unwrap();
    let config = fixture_config(&dir);
    let segment = config.segment("UK").unwrap();

    let selection = Selection::firms(vec!["Alpha".into(), "Beta".into()]);
    let changes = segment_changes(segment, &quarters(), &selection, DashboardView::Ecl).unwrap();

    let pair = changes.column("2020-Q4 vs 2019-Q4").unwrap().f64().unwrap();
    let firms = changes.column("firm").unwrap().str().unwrap();
    let portfolios = changes.column("portfolio").unwrap().str().unwrap();

    let mut seen = 0;
    for row in 0..changes.height() {
        match (firms.get(row), portfolios.get(row)) {
            (Some("Alpha"), Some("Total")) => {
                assert_relative_eq!(pair.get(row).unwrap(), 0.20);
                seen += 1;
            }
            (Some("Beta"), Some("Total")) => {
                assert_relative_eq!(pair.get(row).unwrap(), -0.05);
                seen += 1;
            }
            (Some("Beta"), Some("Mortgages")) => {
                assert_relative_eq!(pair.get(row).unwrap(), -0.10, epsilon = 1e-12);
                seen += 1;
            }
            _ => {}
        }
    }
    assert_eq!(seen, 3);
}

#[test]
fn dashboard_builds_one_figure_set_per_view() {
    let dir = TempDir::new().unwrap();
    let config = fixture_config(&dir);
    let segment = config.segment("UK").unwrap();

    let selection = Selection::firms(vec!["Alpha".into(), "Beta".into()]);
    let views = dashboard_figures(segment, &quarters(), &selection, &DashboardView::WEB).unwrap();

    assert_eq!(views.len(), 3);
    for view_figures in &views {
        assert_eq!(view_figures.figures.len(), 1, "one pair, one figure");
        let figure = &view_figures.figures[0];
        assert!(figure
            .layout
            .title
            .ends_with("2020-Q4 vs 2019-Q4"));
        assert!(!figure.data.is_empty());
    }

    let ecl = &views[0].figures[0];
    let total = ecl
        .data
        .iter()
        .find(|trace| trace.name == "Total")
        .unwrap();
    assert_eq!(total.x, vec!["Alpha", "Beta"]);
    assert_relative_eq!(total.y[0].unwrap(), 0.20);
    assert_relative_eq!(total.y[1].unwrap(), -0.05);
}

#[test]
fn firm_absent_from_data_yields_empty_changes() {
    let dir = TempDir::new().unwrap();
    let config = fixture_config(&dir);
    let segment = config.segment("UK").unwrap();

    let selection = Selection::firms(vec!["Gamma".into()]);
    let changes = segment_changes(segment, &quarters(), &selection, DashboardView::Ecl).unwrap();
    assert_eq!(changes.height(), 0);
}
