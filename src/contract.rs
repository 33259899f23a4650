//! Contract assembly boundary.
//!
//! A [`ContractForm`] is the raw form as the user filled it in. It is parsed
//! exactly once into typed [`ContractInputs`] for the schedule engine, and
//! flattened into [`DocumentData`], the record a contract template is filled
//! with.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ContractError, Result};
use crate::format::{
    DateStyle, format_number, format_optional_date, initial_payment_percent, short_name,
};
use crate::render::{PaymentRow, payment_rows};
use crate::schedule::{PaymentRecord, compute_schedule, installment_amount, total_price};

/// File name the finished contract is offered under.
pub const DOWNLOAD_FILE_NAME: &str = "договор.docx";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractKind {
    /// Paid in full on signing.
    Cash,
    /// Down payment plus monthly installments.
    Installment,
}

impl ContractKind {
    /// Template document the contract is filled into.
    pub fn template_name(self) -> &'static str {
        match self {
            ContractKind::Cash => "template.docx",
            ContractKind::Installment => "template-installment.docx",
        }
    }
}

impl FromStr for ContractKind {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "cash" => Ok(ContractKind::Cash),
            "installment" => Ok(ContractKind::Installment),
            other => Err(ContractError::Parse {
                field: "contract",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ContractKind::Cash => write!(f, "cash"),
            ContractKind::Installment => write!(f, "installment"),
        }
    }
}

/// The purchase form as submitted: every field is the text the user typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractForm {
    /// `cash` or `installment`.
    pub contract: String,
    /// Buyer's full name, surname first.
    pub fullname: String,
    /// `YYYY-MM-DD`, may be empty.
    pub birthdate: String,
    pub phone_number: String,
    pub passport: String,
    /// `YYYY-MM-DD`, may be empty.
    pub passport_issue_date: String,
    pub passport_issued_by: String,
    pub passport_division_code: String,
    pub registration_address: String,
    pub building: String,
    pub construction_number: String,
    pub floor: String,
    pub rooms: String,
    /// Free-form area description copied into the contract text.
    pub area: String,
    /// Area in square metres used for the price.
    pub total_area: String,
    pub price_per_square: String,
    /// Down payment; ignored for cash contracts.
    pub initial_payment: String,
    /// Number of months; ignored for cash contracts.
    pub installment_period: String,
    /// Contract date, `YYYY-MM-DD`.
    pub current_date: String,
}

/// Typed figures of a contract, validated at the form boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractInputs {
    /// Cash or installment contract.
    pub kind: ContractKind,
    /// Area of the property in square metres.
    pub total_area: Decimal,
    /// Price of one square metre.
    pub price_per_unit_area: Decimal,
    /// Zero for cash contracts.
    pub down_payment: Decimal,
    /// Zero for cash contracts.
    pub installment_months: u32,
    /// Contract date.
    pub start_date: NaiveDate,
}

impl ContractInputs {
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

    /// Payment schedule of an installment contract.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for cash contracts, which have no schedule.
    pub fn schedule(&self) -> Result<Vec<PaymentRecord>> {
        if self.kind != ContractKind::Installment {
            return Err(ContractError::InvalidInput(
                "cash contracts have no payment schedule".to_string(),
            ));
        }
        compute_schedule(
            self.down_payment,
            self.price_per_unit_area,
            self.total_area,
            self.installment_months,
            self.start_date,
        )
    }
}

/// Values substituted into the contract template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentData {
    #[serde(rename = "isCashContract")]
    pub is_cash_contract: bool,
    pub fullname: String,
    /// Surname followed by initials.
    pub shortname: String,
    /// `DD.MM.YYYY` or empty.
    pub birthdate: String,
    pub phone_number: String,
    pub passport: String,
    pub passport_issue_date: String,
    pub passport_issued_by: String,
    pub passport_division_code: String,
    pub registration_address: String,
    pub building: String,
    pub construction_number: String,
    pub floor: String,
    pub rooms: String,
    /// Period as typed on the form; empty for cash contracts.
    pub installment_period: String,
    pub price_per_square: String,
    pub area: String,
    pub initial_payment: String,
    /// Down payment share of the price, rounded up.
    pub initial_payment_percent: u32,
    /// Total price.
    pub price: String,
    /// Contract date in the long style.
    pub current_date: String,
    /// Schedule rows; present only for installment contracts.
    #[serde(rename = "paymentTable", skip_serializing_if = "Option::is_none", default)]
    pub payment_table: Option<Vec<PaymentRow>>,
}

fn parse_amount(field: &'static str, value: &str) -> Result<Decimal> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(Decimal::ZERO);
    }
    Decimal::from_str(value).map_err(|_| ContractError::Parse {
        field,
        value: value.to_string(),
    })
}

fn parse_months(value: &str) -> Result<u32> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(0);
    }
    value.parse().map_err(|_| ContractError::Parse {
        field: "installment_period",
        value: value.to_string(),
    })
}

fn parse_date(field: &'static str, value: &str) -> Result<Option<NaiveDate>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ContractError::Parse {
            field,
            value: value.to_string(),
        })
}

impl ContractForm {
    /// Reads a form from its JSON object; absent fields are left empty.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Contract type chosen on the form.
    pub fn kind(&self) -> Result<ContractKind> {
        self.contract.parse()
    }

    /// Parses the figures the schedule engine works from.
    ///
    /// Empty numeric fields read as zero. Cash contracts ignore the down
    /// payment and installment period.
    ///
    /// # Errors
    ///
    /// `Parse` for malformed fields or a missing contract date, and
    /// `InvalidInput` for an installment contract without a positive period.
    pub fn inputs(&self) -> Result<ContractInputs> {
        let kind = self.kind()?;
        let start_date = parse_date("current_date", &self.current_date)?.ok_or_else(|| {
            ContractError::Parse {
                field: "current_date",
                value: self.current_date.clone(),
            }
        })?;

        let (down_payment, installment_months) = match kind {
            ContractKind::Cash => (Decimal::ZERO, 0),
            ContractKind::Installment => {
                let months = parse_months(&self.installment_period)?;
                if months == 0 {
                    return Err(ContractError::InvalidInput(
                        "installment contracts need a positive installment period".to_string(),
                    ));
                }
                (parse_amount("initial_payment", &self.initial_payment)?, months)
            }
        };

        Ok(ContractInputs {
            kind,
            total_area: parse_amount("total_area", &self.total_area)?,
            price_per_unit_area: parse_amount("price_per_square", &self.price_per_square)?,
            down_payment,
            installment_months,
            start_date,
        })
    }

    /// Builds the template record, including the payment table for
    /// installment contracts.
    pub fn document_data(&self) -> Result<DocumentData> {
        let inputs = self.inputs()?;
        let total_price = inputs.total_price()?;

        let payment_table = match inputs.kind {
            ContractKind::Cash => None,
            ContractKind::Installment => Some(payment_rows(&inputs.schedule()?)),
        };
        debug!(
            "document data for {} contract, total price {total_price}",
            inputs.kind
        );

        Ok(DocumentData {
            is_cash_contract: inputs.kind == ContractKind::Cash,
            fullname: self.fullname.clone(),
            shortname: short_name(&self.fullname),
            birthdate: format_optional_date(parse_date("birthdate", &self.birthdate)?, DateStyle::Short),
            phone_number: self.phone_number.clone(),
            passport: self.passport.clone(),
            passport_issue_date: format_optional_date(
                parse_date("passport_issue_date", &self.passport_issue_date)?,
                DateStyle::Short,
            ),
            passport_issued_by: self.passport_issued_by.clone(),
            passport_division_code: self.passport_division_code.clone(),
            registration_address: self.registration_address.clone(),
            building: self.building.clone(),
            construction_number: self.construction_number.clone(),
            floor: self.floor.clone(),
            rooms: self.rooms.clone(),
            installment_period: match inputs.kind {
                ContractKind::Cash => String::new(),
                ContractKind::Installment => self.installment_period.trim().to_string(),
            },
            price_per_square: format_number(inputs.price_per_unit_area),
            area: self.area.clone(),
            initial_payment: format_number(inputs.down_payment),
            initial_payment_percent: initial_payment_percent(total_price, inputs.down_payment),
            price: format_number(total_price),
            current_date: format_optional_date(Some(inputs.start_date), DateStyle::Long),
            payment_table,
        })
    }
}
