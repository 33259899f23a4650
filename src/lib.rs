//! `installment_contract` prepares real estate purchase contracts paid in
//! installments.
//!
//! It computes the payment schedule printed in the contract (a down payment
//! followed by monthly payments due on the 1st), formats amounts and dates in
//! the contract's `ru-RU` style, and flattens a submitted purchase form into the
//! record a document template is filled with.
//!
//! ## Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use installment_contract::{compute_schedule, render_text_table};
//! use rust_decimal_macros::dec;
//!
//! let start = NaiveDate::from_ymd_opt(2025, 9, 10).unwrap();
//! // 100 m² at 50,000 per m², 1,000,000 down, four months.
//! let schedule = compute_schedule(dec!(1_000_000), dec!(50_000), dec!(100), 4, start).unwrap();
//!
//! assert_eq!(schedule.len(), 5);
//! assert_eq!(schedule[1].due_date, NaiveDate::from_ymd_opt(2025, 10, 1).unwrap());
//! println!("{}", render_text_table(&schedule));
//! ```

pub mod contract;
pub mod error;
pub mod format;
pub mod render;
pub mod schedule;

pub use contract::{ContractForm, ContractInputs, ContractKind, DOWNLOAD_FILE_NAME, DocumentData};
pub use error::{ContractError, Result};
pub use format::{
    DateStyle, format_currency, format_date, format_number, initial_payment_percent, short_name,
};
pub use render::{PaymentRow, payment_rows, render_html_table, render_text_table};
pub use schedule::{
    PaymentRecord, ScheduleInput, ScheduleSummary, compute_schedule, first_installment_date,
};
