//! Income and expense reports (CSV and PDF)

use chrono::NaiveDate;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{Transaction, TransactionKind};

pub const CSV_HEADER: [&str; 5] = ["Type", "Date", "Category", "Amount", "Note"];

/// Column headers of the PDF transaction tables
const PDF_HEADER: [&str; 4] = ["Date", "Category", "Amount", "Note"];

// A4 portrait, in millimetres
const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;
const COLUMN_X: [f32; 4] = [0.0, 32.0, 82.0, 112.0];
const NOTE_MAX_CHARS: usize = 40;

/// Output format of a transaction report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Csv,
    Pdf,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Pdf => "pdf",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Pdf => "application/pdf",
        }
    }
}

/// Attachment name for a report covering `[start, end]`
pub fn report_filename(start: NaiveDate, end: NaiveDate, format: ReportFormat) -> String {
    format!(
        "financial_report_{}_to_{}.{}",
        start.format("%Y%m%d"),
        end.format("%Y%m%d"),
        format.extension()
    )
}

fn check_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if start > end {
        return Err(Error::InvalidData(format!(
            "Report start date {} is after end date {}",
            start, end
        )));
    }
    Ok(())
}

impl Database {
    /// Render every income then every expense dated within `[start, end]`
    pub fn transactions_csv(&self, start: NaiveDate, end: NaiveDate) -> Result<String> {
        check_range(start, end)?;

        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record(CSV_HEADER)?;

        for kind in [TransactionKind::Income, TransactionKind::Expense] {
            for tx in self.list_transactions_in_range(kind, start, end)? {
                wtr.write_record([
                    kind.label().to_string(),
                    tx.date.to_string(),
                    tx.category,
                    format!("{:.2}", tx.amount),
                    tx.note.unwrap_or_default(),
                ])?;
            }
        }

        let bytes = wtr.into_inner().map_err(|e| Error::Io(e.into_error()))?;
        String::from_utf8(bytes)
            .map_err(|e| Error::InvalidData(format!("Report is not valid UTF-8: {}", e)))
    }

    /// Render an A4 PDF for `[start, end]`: title and period, a totals
    /// block, then an income table and an expense table.
    pub fn transactions_pdf(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<u8>> {
        check_range(start, end)?;

        let incomes = self.list_transactions_in_range(TransactionKind::Income, start, end)?;
        let expenses = self.list_transactions_in_range(TransactionKind::Expense, start, end)?;
        let total_income: f64 = incomes.iter().map(|t| t.amount).sum();
        let total_expenses: f64 = expenses.iter().map(|t| t.amount).sum();

        let mut pdf = PdfWriter::new("Financial Report")?;
        pdf.text("Financial Report", 16.0, true, 10.0);
        pdf.text(&format!("Period: {} to {}", start, end), 12.0, false, 12.0);

        pdf.text("Summary", 14.0, true, 8.0);
        pdf.text(&format!("Total Income: {:.2}", total_income), 12.0, false, 6.0);
        pdf.text(&format!("Total Expenses: {:.2}", total_expenses), 12.0, false, 6.0);
        pdf.text(
            &format!("Net Balance: {:.2}", total_income - total_expenses),
            12.0,
            false,
            12.0,
        );

        pdf.table("Income Transactions", &incomes);
        pdf.table("Expense Transactions", &expenses);

        pdf.finish()
    }
}

fn pdf_error(e: impl std::fmt::Display) -> Error {
    Error::Pdf(e.to_string())
}

/// Top-to-bottom text layout that starts a new page when the cursor reaches
/// the bottom margin
struct PdfWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
}

impl PdfWriter {
    fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(pdf_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_HEIGHT - MARGIN,
        })
    }

    fn reserve(&mut self, height: f32) {
        if self.y - height < MARGIN {
            let (page, layer) = self
                .doc
                .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT - MARGIN;
        }
    }

    fn text(&mut self, text: &str, size: f32, bold: bool, advance: f32) {
        self.reserve(advance);
        let font = if bold { &self.bold } else { &self.regular };
        self.layer
            .use_text(text, size, Mm(MARGIN), Mm(self.y - size * 0.35), font);
        self.y -= advance;
    }

    fn row(&mut self, cells: [&str; 4], bold: bool) {
        const ROW_HEIGHT: f32 = 6.0;
        const SIZE: f32 = 9.0;

        self.reserve(ROW_HEIGHT);
        let font = if bold { &self.bold } else { &self.regular };
        for (x, cell) in COLUMN_X.iter().zip(cells) {
            self.layer
                .use_text(cell, SIZE, Mm(MARGIN + x), Mm(self.y - SIZE * 0.35), font);
        }
        self.y -= ROW_HEIGHT;
    }

    fn table(&mut self, title: &str, rows: &[Transaction]) {
        self.text(title, 14.0, true, 8.0);
        self.row(PDF_HEADER, true);

        if rows.is_empty() {
            self.row(["-", "No transactions", "", ""], false);
        }
        for tx in rows {
            let date = tx.date.to_string();
            let amount = format!("{:.2}", tx.amount);
            let note = truncate(tx.note.as_deref().unwrap_or(""), NOTE_MAX_CHARS);
            self.row([date.as_str(), tx.category.as_str(), amount.as_str(), note.as_str()], false);
        }
        self.y -= 6.0;
    }

    fn finish(self) -> Result<Vec<u8>> {
        self.doc.save_to_bytes().map_err(pdf_error)
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewTransaction;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_report_filename() {
        assert_eq!(
            report_filename(d("2024-01-01"), d("2024-03-31"), ReportFormat::Csv),
            "financial_report_20240101_to_20240331.csv"
        );
        assert_eq!(
            report_filename(d("2024-01-01"), d("2024-03-31"), ReportFormat::Pdf),
            "financial_report_20240101_to_20240331.pdf"
        );
    }

    #[test]
    fn test_csv_lists_income_before_expenses() {
        let db = Database::in_memory().unwrap();
        db.create_transaction(
            TransactionKind::Expense,
            &NewTransaction {
                amount: 12.5,
                category: "Food".to_string(),
                date: d("2024-02-01"),
                note: Some("lunch, with team".to_string()),
            },
        )
        .unwrap();
        db.create_transaction(
            TransactionKind::Income,
            &NewTransaction {
                amount: 3000.0,
                category: "Salary".to_string(),
                date: d("2024-02-15"),
                note: None,
            },
        )
        .unwrap();
        db.create_transaction(
            TransactionKind::Income,
            &NewTransaction {
                amount: 1.0,
                category: "Outside".to_string(),
                date: d("2024-03-01"),
                note: None,
            },
        )
        .unwrap();

        let csv = db
            .transactions_csv(d("2024-02-01"), d("2024-02-29"))
            .unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Type,Date,Category,Amount,Note",
                "Income,2024-02-15,Salary,3000.00,",
                "Expense,2024-02-01,Food,12.50,\"lunch, with team\"",
            ]
        );
    }

    #[test]
    fn test_csv_rejects_inverted_range() {
        let db = Database::in_memory().unwrap();
        let result = db.transactions_csv(d("2024-02-02"), d("2024-02-01"));
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_pdf_report_renders_document() {
        let db = Database::in_memory().unwrap();
        db.create_transaction(
            TransactionKind::Income,
            &NewTransaction {
                amount: 3000.0,
                category: "Salary".to_string(),
                date: d("2024-02-15"),
                note: None,
            },
        )
        .unwrap();
        db.create_transaction(
            TransactionKind::Expense,
            &NewTransaction {
                amount: 12.5,
                category: "Food".to_string(),
                date: d("2024-02-01"),
                note: Some("a very long note that will not fit in the note column".to_string()),
            },
        )
        .unwrap();

        let pdf = db
            .transactions_pdf(d("2024-02-01"), d("2024-02-29"))
            .unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[test]
    fn test_pdf_report_spills_onto_more_pages() {
        let db = Database::in_memory().unwrap();
        let empty = db
            .transactions_pdf(d("2024-01-01"), d("2024-12-31"))
            .unwrap();
        assert!(empty.starts_with(b"%PDF"));

        for day in 0..120 {
            db.create_transaction(
                TransactionKind::Expense,
                &NewTransaction {
                    amount: 1.0 + day as f64,
                    category: "Misc".to_string(),
                    date: d("2024-01-01") + chrono::Days::new(day),
                    note: None,
                },
            )
            .unwrap();
        }

        let full = db
            .transactions_pdf(d("2024-01-01"), d("2024-12-31"))
            .unwrap();
        assert!(full.starts_with(b"%PDF"));
        assert!(full.len() > empty.len());
    }

    #[test]
    fn test_pdf_rejects_inverted_range() {
        let db = Database::in_memory().unwrap();
        let result = db.transactions_pdf(d("2024-02-02"), d("2024-02-01"));
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééééé", 6), "ééé...");
    }

    #[test]
    fn test_report_format_metadata() {
        assert_eq!(ReportFormat::Csv.content_type(), "text/csv");
        assert_eq!(ReportFormat::Pdf.content_type(), "application/pdf");
    }
}
