use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use lending::{
    late_payment_interest, CalculatorConfig, Currency, Frequency, LoanCalculation,
    LoanParameters, LoanResult, ZeroRatePolicy,
};
use log::{error, info};
use simple_logger::SimpleLogger;
use std::process;

/// Simulates a fixed-payment loan and prints its amortization schedule
#[derive(Parser)]
#[command(name = "loan-sim", version, allow_negative_numbers = true)]
struct Cli {
    /// Amount borrowed
    #[arg(long)]
    principal: f64,

    /// Interest per month, in percent (2.5 means 2.5%)
    #[arg(long)]
    rate: f64,

    /// Number of payments
    #[arg(long)]
    term: u32,

    /// Payment cadence: daily, weekly, biweekly or monthly
    #[arg(long, default_value = "monthly")]
    frequency: Frequency,

    /// ISO code of the currency used to print amounts
    #[arg(long, default_value = "USD")]
    currency: Currency,

    /// Repay a 0% loan in equal installments instead of skipping the simulation
    #[arg(long)]
    zero_rate_straight_line: bool,

    /// Due date of the first payment (YYYY-MM-DD)
    #[arg(long)]
    first_due: Option<NaiveDate>,

    /// Days a payment is overdue, to estimate late-payment interest
    #[arg(long, requires = "late_rate")]
    late_days: Option<u32>,

    /// Late-payment interest per day, in percent
    #[arg(long, requires = "late_days")]
    late_rate: Option<f64>,

    #[arg(long, value_enum, default_value = "warn")]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = SimpleLogger::new().with_level(cli.log_level.into()).init() {
        eprintln!("could not start logger: {}", e);
    }

    if let Err(e) = run(&cli) {
        error!("{}", e);
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> LoanResult<()> {
    let config = CalculatorConfig {
        zero_rate: if cli.zero_rate_straight_line {
            ZeroRatePolicy::StraightLine
        } else {
            ZeroRatePolicy::Incomplete
        },
    };
    let params = LoanParameters::new(cli.principal, cli.rate, cli.term, cli.frequency);
    let loan = params.calculate_with(&config)?;
    info!(
        "simulated {} {} payments of {}",
        loan.period_count(),
        cli.frequency,
        loan.periodic_payment
    );

    if loan.schedule.is_empty() {
        println!("Not enough information to simulate: principal, rate and term must be non-zero.");
        return Ok(());
    }

    print_summary(&loan, cli.currency);
    let dates = match cli.first_due {
        Some(first_due) => Some(loan.due_dates(first_due)?),
        None => None,
    };
    print_schedule(&loan, cli.currency, dates.as_deref());

    if let (Some(days), Some(rate)) = (cli.late_days, cli.late_rate) {
        let interest = late_payment_interest(loan.periodic_payment, rate, days)?;
        println!();
        println!(
            "Late-payment interest on one installment after {} days at {}% daily: {}",
            days,
            rate,
            cli.currency.format(interest)
        );
    }
    Ok(())
}

fn print_summary(loan: &LoanCalculation, currency: Currency) {
    let params = &loan.parameters;
    println!("Principal:        {}", currency.format(params.principal));
    println!("Rate:             {}% monthly", params.nominal_rate_percent);
    println!("Term:             {} {} payments", params.term_periods, params.frequency);
    println!("Payment:          {}", currency.format(loan.periodic_payment));
    println!("Total payment:    {}", currency.format(loan.total_payment));
    println!("Total interest:   {}", currency.format(loan.total_interest));
    println!();
}

fn print_schedule(loan: &LoanCalculation, currency: Currency, dates: Option<&[NaiveDate]>) {
    let date_header = if dates.is_some() { format!("{:>12}", "due") } else { String::new() };
    println!(
        "{:>6}{}{:>18}{:>18}{:>18}{:>18}",
        "period", date_header, "payment", "principal", "interest", "balance"
    );
    for (i, row) in loan.schedule.iter().enumerate() {
        let due = match dates.and_then(|d| d.get(i)) {
            Some(date) => format!("{:>12}", date.to_string()),
            None => String::new(),
        };
        println!(
            "{:>6}{}{:>18}{:>18}{:>18}{:>18}",
            row.period,
            due,
            currency.format(row.payment),
            currency.format(row.principal_portion),
            currency.format(row.interest_portion),
            currency.format(row.balance)
        );
    }
}

// public types are Send + Sync + Unpin and can cross threads
#[cfg(test)]
fn is_normal<T: Sized + Send + Sync + Unpin>() {}

#[test]
fn normal_types() {
    is_normal::<LoanParameters>();
    is_normal::<LoanCalculation>();
    is_normal::<lending::AmortizationRow>();
    is_normal::<lending::LoanError>();
    is_normal::<Frequency>();
    is_normal::<Currency>();
}

#[test]
fn cli_parses_flags() {
    let cli = Cli::parse_from([
        "loan-sim",
        "--principal",
        "5000000",
        "--rate",
        "2.5",
        "--term",
        "12",
        "--frequency",
        "weekly",
        "--currency",
        "cop",
        "--first-due",
        "2024-03-01",
    ]);
    assert_eq!(cli.principal, 5_000_000.);
    assert_eq!(cli.frequency, Frequency::Weekly);
    assert_eq!(cli.currency, Currency::COP);
    assert_eq!(cli.first_due, NaiveDate::from_ymd_opt(2024, 3, 1));
    assert!(!cli.zero_rate_straight_line);

    assert!(Cli::try_parse_from([
        "loan-sim", "--principal", "1", "--rate", "1", "--term", "1", "--frequency", "yearly",
    ])
    .is_err());
}
