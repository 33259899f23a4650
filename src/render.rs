//! Schedule rendering: template-ready rows, a plain-text table and the HTML
//! preview block.

use serde::{Deserialize, Serialize};

use crate::format::{DateStyle, format_currency, format_date};
use crate::schedule::PaymentRecord;

const HEADERS: [&str; 4] = ["№ п/п", "Платеж (руб)", "Дата платежа", "Остаток (руб)"];

/// A [`PaymentRecord`] with every field already formatted for a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRow {
    /// Sequence number.
    pub number: String,
    /// Amount in whole currency units.
    pub payment: String,
    /// Due date, `DD.MM.YYYY`.
    pub date: String,
    /// Remaining balance in whole currency units.
    pub remaining: String,
}

impl From<&PaymentRecord> for PaymentRow {
    fn from(record: &PaymentRecord) -> Self {
        PaymentRow {
            number: record.sequence_number.to_string(),
            payment: format_currency(record.amount),
            date: format_date(record.due_date, DateStyle::Short),
            remaining: format_currency(record.remaining_balance),
        }
    }
}

/// Formats every record of a schedule, keeping the order.
pub fn payment_rows(records: &[PaymentRecord]) -> Vec<PaymentRow> {
    records.iter().map(PaymentRow::from).collect()
}

#[derive(Clone, Copy)]
enum Align {
    Right,
    Center,
}

fn pad(text: &str, width: usize, align: Align) -> String {
    match align {
        Align::Right => format!("{text:>width$}"),
        Align::Center => format!("{text:^width$}"),
    }
}

/// Renders the schedule as a fixed-width text table.
///
/// Numbers and dates are centered, amounts right-aligned.
pub fn render_text_table(records: &[PaymentRecord]) -> String {
    const ALIGN: [Align; 4] = [Align::Center, Align::Right, Align::Center, Align::Right];

    let rows: Vec<[String; 4]> = payment_rows(records)
        .into_iter()
        .map(|row| [row.number, row.payment, row.date, row.remaining])
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = HEADERS
        .iter()
        .zip(widths)
        .map(|(h, w)| pad(h, w, Align::Center))
        .collect();
    out.push_str(&header.join(" | "));
    out.push('\n');

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("-+-"));
    out.push('\n');

    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .zip(widths)
            .zip(ALIGN)
            .map(|((cell, w), align)| pad(cell, w, align))
            .collect();
        out.push_str(&cells.join(" | "));
        out.push('\n');
    }
    out
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Renders the on-page schedule preview. An empty schedule renders nothing.
pub fn render_html_table(records: &[PaymentRecord]) -> String {
    if records.is_empty() {
        return String::new();
    }

    let mut html = String::from(
        "<div style=\"margin-top: 40px; page-break-before: always;\">\n\
         <h3>График платежей</h3>\n\
         <table border=\"1\" cellpadding=\"8\" cellspacing=\"0\" \
         style=\"width: 100%; border-collapse: collapse; font-size: 14px;\">\n\
         <thead>\n<tr style=\"background-color: #f8f9fa;\">\n",
    );
    for header in HEADERS {
        html.push_str(&format!(
            "<th style=\"text-align: center; padding: 10px;\">{}</th>\n",
            escape_html(header)
        ));
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");

    for row in payment_rows(records) {
        html.push_str("<tr>\n");
        for (cell, align) in [
            (&row.number, "center"),
            (&row.payment, "right"),
            (&row.date, "center"),
            (&row.remaining, "right"),
        ] {
            html.push_str(&format!(
                "<td style=\"text-align: {align}; padding: 8px;\">{}</td>\n",
                escape_html(cell)
            ));
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</tbody>\n</table>\n</div>\n");
    html
}
