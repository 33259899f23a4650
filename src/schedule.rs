//! Installment schedule engine.
//!
//! Turns a purchase price, a down payment and an installment period into the
//! ordered list of payments printed in the contract: the down payment on the
//! contract date, followed by one payment per month due on the 1st.

use chrono::{Datelike, Months, NaiveDate};
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ContractError, Result};
use crate::format::round_half_up;

/// Contracts signed after this day of the month start paying one cycle later.
pub const BILLING_CUTOFF_DAY: u32 = 15;

/// One row of the payment schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// 1-based position in the schedule; the down payment is number 1.
    pub sequence_number: u32,
    /// Amount due. Monthly amounts are whole currency units, the down payment
    /// is kept as entered.
    pub amount: Decimal,
    pub due_date: NaiveDate,
    /// Unpaid part of the installment amount once this payment is made.
    pub remaining_balance: Decimal,
}

/// Everything the engine needs, captured once per computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleInput {
    /// Lump sum due on the contract date.
    pub down_payment: Decimal,
    /// Price of one square metre.
    pub price_per_unit_area: Decimal,
    /// Area of the property in square metres.
    pub total_area: Decimal,
    /// Number of monthly installments after the down payment.
    pub installment_months: u32,
    /// Contract date; the down payment falls due on it.
    pub start_date: NaiveDate,
}

impl ScheduleInput {
    /// Price per square metre times the area.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the product does not fit a `Decimal`.
    pub fn total_price(&self) -> Result<Decimal> {
        total_price(self.price_per_unit_area, self.total_area)
    }

    /// Part of the total price left after the down payment.
    pub fn installment_amount(&self) -> Result<Decimal> {
        installment_amount(self.total_price()?, self.down_payment)
    }

    /// Computes the schedule for this input. See [`compute_schedule`].
    pub fn compute(&self) -> Result<Vec<PaymentRecord>> {
        compute_schedule(
            self.down_payment,
            self.price_per_unit_area,
            self.total_area,
            self.installment_months,
            self.start_date,
        )
    }
}

/// Aggregate figures of a computed schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    /// Price per square metre times the area.
    pub total_price: Decimal,
    /// Total price less the down payment.
    pub installment_amount: Decimal,
    /// Rounded regular monthly payment; the last month may differ.
    pub monthly_payment: Decimal,
    /// Due date of the first monthly payment.
    pub first_due_date: NaiveDate,
    /// Sum of every payment in the schedule, down payment included.
    pub total_paid: Decimal,
}

impl ScheduleSummary {
    /// Summarises `records` produced for `input`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `input.installment_months` is zero or the
    /// figures overflow.
    pub fn new(input: &ScheduleInput, records: &[PaymentRecord]) -> Result<Self> {
        let installment_amount = input.installment_amount()?;
        let total_paid = records
            .iter()
            .try_fold(Decimal::ZERO, |sum, r| sum.checked_add(r.amount))
            .ok_or_else(|| overflow("total paid"))?;

        Ok(Self {
            total_price: input.total_price()?,
            installment_amount,
            monthly_payment: monthly_payment(installment_amount, input.installment_months)?,
            first_due_date: first_installment_date(input.start_date)?,
            total_paid,
        })
    }
}

fn overflow(what: &str) -> ContractError {
    ContractError::InvalidInput(format!("{what} is out of range"))
}

/// Price per square metre times the area, rejecting products too large for a
/// `Decimal`.
pub fn total_price(price_per_unit_area: Decimal, total_area: Decimal) -> Result<Decimal> {
    price_per_unit_area
        .checked_mul(total_area)
        .ok_or_else(|| overflow("total price"))
}

/// Total price less the down payment.
pub fn installment_amount(total_price: Decimal, down_payment: Decimal) -> Result<Decimal> {
    total_price
        .checked_sub(down_payment)
        .ok_or_else(|| overflow("installment amount"))
}

/// Returns `date` moved `months` calendar months forward, clamping the day to
/// the length of the target month.
pub fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or(ContractError::DateOutOfRange)
}

/// Returns the 1st of the month `date` falls in.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Due date of the first monthly installment.
///
/// Contracts dated up to and including the 15th pay from the 1st of the next
/// month; later dates skip a month and pay from the 1st of the month after.
pub fn first_installment_date(start_date: NaiveDate) -> Result<NaiveDate> {
    let offset = if start_date.day() > BILLING_CUTOFF_DAY { 2 } else { 1 };
    add_months(first_of_month(start_date), offset)
}

fn monthly_payment(installment_amount: Decimal, installment_months: u32) -> Result<Decimal> {
    if installment_months == 0 {
        return Err(ContractError::InvalidInput(
            "installment period must be at least one month".to_string(),
        ));
    }
    Ok(round_half_up(installment_amount / Decimal::from(installment_months)))
}

/// Builds the payment schedule of an installment contract.
///
/// The result holds `installment_months + 1` records: the down payment dated
/// `start_date`, then one record per month. Every monthly payment is the
/// rounded even share of the installment amount except the last, which pays
/// whatever is left so the schedule ends at exactly zero.
///
/// Negative amounts and a down payment above the total price are passed
/// through as given.
///
/// # Errors
///
/// Returns `InvalidInput` if `installment_months` is zero or the figures
/// overflow, and `DateOutOfRange` if the last due date cannot be represented.
pub fn compute_schedule(
    down_payment: Decimal,
    price_per_unit_area: Decimal,
    total_area: Decimal,
    installment_months: u32,
    start_date: NaiveDate,
) -> Result<Vec<PaymentRecord>> {
    let total_price = total_price(price_per_unit_area, total_area)?;
    let installment_amount = installment_amount(total_price, down_payment)?;
    let monthly_payment = monthly_payment(installment_amount, installment_months)?;
    let first_due_date = first_installment_date(start_date)?;
    let last_due_date = add_months(first_due_date, installment_months - 1)?;

    if [price_per_unit_area, total_area, down_payment]
        .iter()
        .any(|v| v.is_sign_negative() && !v.is_zero())
    {
        warn!(
            "negative contract figures: price per unit {price_per_unit_area}, \
             area {total_area}, down payment {down_payment}"
        );
    }
    if down_payment > total_price {
        warn!("down payment {down_payment} exceeds total price {total_price}");
    }
    debug!(
        "schedule: total {total_price}, installment amount {installment_amount}, \
         {installment_months} x {monthly_payment} from {first_due_date} to {last_due_date}"
    );

    let mut records = Vec::with_capacity(installment_months as usize + 1);
    records.push(PaymentRecord {
        sequence_number: 1,
        amount: down_payment,
        due_date: start_date,
        remaining_balance: installment_amount,
    });

    let mut remaining = installment_amount;
    for i in 0..installment_months {
        let due_date = add_months(first_due_date, i)?;
        let record = if i == installment_months - 1 {
            PaymentRecord {
                sequence_number: i + 2,
                amount: remaining,
                due_date,
                remaining_balance: Decimal::ZERO,
            }
        } else {
            remaining = remaining
                .checked_sub(monthly_payment)
                .ok_or_else(|| overflow("remaining balance"))?;
            PaymentRecord {
                sequence_number: i + 2,
                amount: monthly_payment,
                due_date,
                remaining_balance: remaining.max(Decimal::ZERO),
            }
        };
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_compute_schedule_happy_path() {
        // 5,000,000 total: 100 m² at 50,000.
        let records = compute_schedule(dec!(1000000), dec!(50000), dec!(100), 4, date(2025, 9, 10)).unwrap();

        let expected = [
            (1, dec!(1000000), date(2025, 9, 10), dec!(4000000)),
            (2, dec!(1000000), date(2025, 10, 1), dec!(3000000)),
            (3, dec!(1000000), date(2025, 11, 1), dec!(2000000)),
            (4, dec!(1000000), date(2025, 12, 1), dec!(1000000)),
            (5, dec!(1000000), date(2026, 1, 1), dec!(0)),
        ];
        assert_eq!(records.len(), expected.len());
        for (record, (number, amount, due, remaining)) in records.iter().zip(expected) {
            assert_eq!(record.sequence_number, number);
            assert_eq!(record.amount, amount);
            assert_eq!(record.due_date, due);
            assert_eq!(record.remaining_balance, remaining);
        }
    }

    #[rstest]
    #[case(date(2025, 9, 10), date(2025, 10, 1))]
    #[case(date(2025, 9, 15), date(2025, 10, 1))]
    #[case(date(2025, 9, 16), date(2025, 11, 1))]
    #[case(date(2025, 9, 20), date(2025, 11, 1))]
    #[case(date(2025, 9, 1), date(2025, 10, 1))]
    #[case(date(2025, 11, 30), date(2026, 1, 1))]
    #[case(date(2025, 12, 31), date(2026, 2, 1))]
    #[case(date(2025, 12, 15), date(2026, 1, 1))]
    fn test_first_installment_date(#[case] start: NaiveDate, #[case] expected: NaiveDate) {
        assert_eq!(first_installment_date(start).unwrap(), expected);
    }

    #[test]
    fn test_last_payment_absorbs_rounding() {
        // 1,000,000 over 3 months: 333,333 + 333,333 + 333,334.
        let records = compute_schedule(dec!(0), dec!(1000000), dec!(1), 3, date(2025, 1, 5)).unwrap();

        let monthly: Vec<Decimal> = records[1..].iter().map(|r| r.amount).collect();
        assert_eq!(monthly, vec![dec!(333333), dec!(333333), dec!(333334)]);
        assert_eq!(records[1].remaining_balance, dec!(666667));
        assert_eq!(records[2].remaining_balance, dec!(333334));
        assert_eq!(records.last().unwrap().remaining_balance, Decimal::ZERO);
    }

    #[test]
    fn test_down_payment_kept_unrounded() {
        let records = compute_schedule(dec!(1000.75), dec!(2000), dec!(1.5), 2, date(2025, 3, 3)).unwrap();

        assert_eq!(records[0].amount, dec!(1000.75));
        assert_eq!(records[0].remaining_balance, dec!(1999.25));
        let total: Decimal = records.iter().map(|r| r.amount).sum();
        assert_eq!(total, dec!(3000));
    }

    #[test]
    fn test_single_month_pays_everything() {
        let records = compute_schedule(dec!(100), dec!(1000), dec!(1), 1, date(2025, 6, 20)).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].amount, dec!(900));
        assert_eq!(records[1].due_date, date(2025, 8, 1));
        assert_eq!(records[1].remaining_balance, Decimal::ZERO);
    }

    #[test]
    fn test_zero_months_error() {
        let result = compute_schedule(dec!(100), dec!(1000), dec!(1), 0, date(2025, 6, 20));
        assert!(matches!(result, Err(ContractError::InvalidInput(_))));
    }

    #[test]
    fn test_remaining_balance_clamped_at_zero() {
        // round(10 / 12) = 1, so the running balance dips below zero before the
        // last month settles it.
        let records = compute_schedule(dec!(0), dec!(10), dec!(1), 12, date(2025, 1, 1)).unwrap();

        assert!(records.iter().all(|r| r.remaining_balance >= Decimal::ZERO));
        assert_eq!(records[12].amount, dec!(-1));
        let total: Decimal = records.iter().map(|r| r.amount).sum();
        assert_eq!(total, dec!(10));
    }

    #[test]
    fn test_oversized_down_payment_passes_through() {
        let records = compute_schedule(dec!(2000), dec!(1000), dec!(1), 2, date(2025, 1, 1)).unwrap();

        assert_eq!(records[0].remaining_balance, dec!(-1000));
        assert_eq!(records[1].amount, dec!(-500));
        assert_eq!(records[2].amount, dec!(-500));
        assert_eq!(records[2].remaining_balance, Decimal::ZERO);
    }

    #[test]
    fn test_period_beyond_calendar_range_error() {
        let result = compute_schedule(dec!(0), dec!(1), dec!(1), u32::MAX, date(2025, 9, 10));
        assert!(matches!(result, Err(ContractError::DateOutOfRange)));
    }

    #[test]
    fn test_overflowing_total_price_error() {
        let result = compute_schedule(dec!(0), dec!(100_000_000_000_000_000), dec!(100_000_000_000_000_000), 12, date(2025, 9, 10));
        assert!(matches!(result, Err(ContractError::InvalidInput(_))));

        let result = compute_schedule(Decimal::MIN, Decimal::MAX, dec!(1), 12, date(2025, 9, 10));
        assert!(matches!(result, Err(ContractError::InvalidInput(_))));
    }

    #[test]
    fn test_schedule_summary() {
        let input = ScheduleInput {
            down_payment: dec!(1000000),
            price_per_unit_area: dec!(50000),
            total_area: dec!(100),
            installment_months: 4,
            start_date: date(2025, 9, 20),
        };
        let records = input.compute().unwrap();
        let summary = ScheduleSummary::new(&input, &records).unwrap();

        assert_eq!(summary.total_price, dec!(5000000));
        assert_eq!(summary.installment_amount, dec!(4000000));
        assert_eq!(summary.monthly_payment, dec!(1000000));
        assert_eq!(summary.first_due_date, date(2025, 11, 1));
        assert_eq!(summary.total_paid, dec!(5000000));
    }
}
