//! Loan simulation for small lenders: fixed-payment amortization schedules
//! with sub-monthly payment cadences, due dates and late-payment interest.

pub mod currency;
pub mod error;
pub mod frequency;
pub mod loan;

pub use currency::Currency;
pub use error::{LoanError, LoanResult};
pub use frequency::Frequency;
pub use loan::{
    compute_amortization, late_payment_interest, AmortizationRow, CalculatorConfig,
    LoanCalculation, LoanParameters, ZeroRatePolicy, MAX_TERM_PERIODS,
};
