use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use installment_contract::{
    ContractForm, DOWNLOAD_FILE_NAME, ScheduleInput, ScheduleSummary, payment_rows,
    render_html_table, render_text_table,
};
use log::{LevelFilter, error, info};
use rust_decimal::Decimal;
use simple_logger::SimpleLogger;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Html,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "contract-schedule", version, about = "Installment schedules and contract data")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the payment schedule preview.
    Schedule {
        /// Price per square metre.
        #[arg(long)]
        price_per_square: Decimal,

        /// Total area in square metres.
        #[arg(long)]
        total_area: Decimal,

        /// Down payment due on the contract date.
        #[arg(long, default_value_t = Decimal::ZERO)]
        initial_payment: Decimal,

        /// Installment period in months.
        #[arg(long)]
        months: u32,

        /// Contract date (YYYY-MM-DD).
        #[arg(long)]
        start_date: NaiveDate,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Build the template record of a contract from a JSON form.
    Document {
        /// JSON file with the submitted form fields.
        #[arg(long)]
        form: PathBuf,

        /// Write the record here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn schedule(input: ScheduleInput, format: OutputFormat) -> Result<String> {
    let records = input.compute().context("computing payment schedule")?;
    let summary = ScheduleSummary::new(&input, &records)?;
    info!(
        "{} payments, monthly {} from {}",
        records.len(),
        summary.monthly_payment,
        summary.first_due_date
    );

    Ok(match format {
        OutputFormat::Text => render_text_table(&records),
        OutputFormat::Html => render_html_table(&records),
        OutputFormat::Json => serde_json::to_string_pretty(&payment_rows(&records))?,
    })
}

fn document(form: &Path, output: Option<&Path>) -> Result<()> {
    let raw = fs::read_to_string(form).with_context(|| format!("reading {}", form.display()))?;
    let form = ContractForm::from_json(&raw).context("parsing contract form")?;
    let kind = form.kind()?;
    let data = form.document_data().context("assembling contract data")?;
    let json = serde_json::to_string_pretty(&data)?;

    info!("template {} -> {}", kind.template_name(), DOWNLOAD_FILE_NAME);
    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            info!("contract data written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Schedule {
            price_per_square,
            total_area,
            initial_payment,
            months,
            start_date,
            format,
        } => {
            let input = ScheduleInput {
                down_payment: initial_payment,
                price_per_unit_area: price_per_square,
                total_area,
                installment_months: months,
                start_date,
            };
            print!("{}", schedule(input, format)?);
            Ok(())
        }
        Command::Document { form, output } => document(&form, output.as_deref()),
    }
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    if let Err(e) = SimpleLogger::new().with_level(level).init() {
        eprintln!("logger setup failed: {e}");
    }

    if let Err(e) = run(cli) {
        error!("Ошибка при генерации документа: {e:#}");
        std::process::exit(1);
    }
}
