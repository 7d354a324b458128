use crate::error::{LoanError, LoanResult};
use crate::frequency::Frequency;
use chrono::NaiveDate;
use log::{debug, trace, warn};
use std::fmt;

/// Longest schedule accepted, in payment periods (a century of weekly payments
/// is about 5,200, of daily payments 36,500).
pub const MAX_TERM_PERIODS: u32 = 100_000;

/// Largest balance left after the final payment, relative to the principal.
const RESIDUAL_TOLERANCE: f64 = 1e-6;

/// How a 0% nominal rate is treated.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ZeroRatePolicy {
    /// A 0% rate means the simulation is not filled in yet: zero result, no schedule.
    #[default]
    Incomplete,
    /// A 0% rate is an interest-free loan repaid in equal principal installments.
    StraightLine,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalculatorConfig {
    pub zero_rate: ZeroRatePolicy,
}

#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoanParameters {
    pub principal: f64,
    /// Interest per nominal month, in percent (2.5 means 2.5%).
    pub nominal_rate_percent: f64,
    pub term_periods: u32,
    pub frequency: Frequency,
}

#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AmortizationRow {
    pub period: u32,
    pub payment: f64,
    pub principal_portion: f64,
    pub interest_portion: f64,
    pub balance: f64,
    pub cumulative_principal: f64,
    pub cumulative_interest: f64,
}

impl AmortizationRow {
    fn is_finite(&self) -> bool {
        [
            self.payment,
            self.principal_portion,
            self.interest_portion,
            self.balance,
            self.cumulative_principal,
            self.cumulative_interest,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

impl fmt::Display for AmortizationRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "period {}, payment {:.4}, principal {:.4}, interest {:.4}, ending balance {:.4}",
            self.period, self.payment, self.principal_portion, self.interest_portion, self.balance
        )
    }
}

#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoanCalculation {
    pub parameters: LoanParameters,
    pub periodic_payment: f64,
    pub total_payment: f64,
    pub total_interest: f64,
    pub schedule: Vec<AmortizationRow>,
}

impl LoanParameters {
    pub fn new(
        principal: f64,
        nominal_rate_percent: f64,
        term_periods: u32,
        frequency: Frequency,
    ) -> Self {
        Self {
            principal,
            nominal_rate_percent,
            term_periods,
            frequency,
        }
    }

    /// Rate applied once per payment period, as a decimal.
    pub fn periodic_rate(&self) -> f64 {
        (self.nominal_rate_percent / 100.) / self.frequency.factor()
    }

    pub fn validate(&self) -> LoanResult<()> {
        if !self.principal.is_finite() {
            return Err(LoanError::invalid("principal", "must be a finite number"));
        }
        if self.principal < 0. {
            return Err(LoanError::invalid("principal", "must not be negative"));
        }
        if !self.nominal_rate_percent.is_finite() {
            return Err(LoanError::invalid(
                "nominal_rate_percent",
                "must be a finite number",
            ));
        }
        if self.nominal_rate_percent < 0. {
            return Err(LoanError::invalid(
                "nominal_rate_percent",
                "must not be negative",
            ));
        }
        if self.term_periods > MAX_TERM_PERIODS {
            return Err(LoanError::InvalidInput {
                field: "term_periods".into(),
                reason: format!("must not exceed {} periods", MAX_TERM_PERIODS),
            });
        }
        Ok(())
    }

    pub fn calculate(&self) -> LoanResult<LoanCalculation> {
        self.calculate_with(&CalculatorConfig::default())
    }

    pub fn calculate_with(&self, config: &CalculatorConfig) -> LoanResult<LoanCalculation> {
        self.validate()?;

        let zero_rate_incomplete =
            self.nominal_rate_percent == 0. && config.zero_rate == ZeroRatePolicy::Incomplete;
        if self.principal == 0. || self.term_periods == 0 || zero_rate_incomplete {
            debug!("not enough information to simulate {:?}", self);
            return Ok(LoanCalculation::empty(*self));
        }

        let rate = self.periodic_rate();
        let pmt_amount = get_pmt_amount(self.principal, rate, self.term_periods)?;
        let total_payment = pmt_amount * self.term_periods as f64;
        if !total_payment.is_finite() {
            return Err(LoanError::Computation(format!(
                "total payment overflows for payment {} over {} periods",
                pmt_amount, self.term_periods
            )));
        }
        debug!(
            "{} loan: periodic rate {}, payment {}, total {}",
            self.frequency, rate, pmt_amount, total_payment
        );

        Ok(LoanCalculation {
            parameters: *self,
            periodic_payment: pmt_amount,
            total_payment,
            total_interest: total_payment - self.principal,
            schedule: add_scheduled_pmts(self.principal, rate, self.term_periods, pmt_amount)?,
        })
    }
}

/// Computes the fixed payment and amortization schedule of a loan with the
/// default [`CalculatorConfig`].
pub fn compute_amortization(
    principal: f64,
    nominal_rate_percent: f64,
    term_periods: u32,
    frequency: Frequency,
) -> LoanResult<LoanCalculation> {
    LoanParameters::new(principal, nominal_rate_percent, term_periods, frequency).calculate()
}

/// Simple interest owed on an overdue installment at a daily rate in percent.
pub fn late_payment_interest(
    overdue_amount: f64,
    daily_rate_percent: f64,
    days_late: u32,
) -> LoanResult<f64> {
    if !overdue_amount.is_finite() || overdue_amount < 0. {
        return Err(LoanError::invalid(
            "overdue_amount",
            "must be a finite, non-negative number",
        ));
    }
    if !daily_rate_percent.is_finite() || daily_rate_percent < 0. {
        return Err(LoanError::invalid(
            "daily_rate_percent",
            "must be a finite, non-negative number",
        ));
    }
    let interest = overdue_amount * (daily_rate_percent / 100.) * days_late as f64;
    if !interest.is_finite() {
        return Err(LoanError::Computation(format!(
            "late interest overflows for {} over {} days",
            overdue_amount, days_late
        )));
    }
    Ok(interest)
}

impl LoanCalculation {
    fn empty(parameters: LoanParameters) -> Self {
        Self {
            parameters,
            periodic_payment: 0.,
            total_payment: 0.,
            total_interest: 0.,
            schedule: Vec::new(),
        }
    }

    pub fn period_count(&self) -> usize {
        self.schedule.len()
    }

    /// The row for a 1-based `period`.
    pub fn row(&self, period: u32) -> Option<&AmortizationRow> {
        period
            .checked_sub(1)
            .and_then(|index| self.schedule.get(index as usize))
    }

    pub fn row_info(&self, period: u32) -> String {
        match self.row(period) {
            Some(row) => row.to_string(),
            None => "No payment information.".to_string(),
        }
    }

    pub fn show_amortization(&self) {
        for row in &self.schedule {
            println!("{}", row);
        }
    }

    /// Due date of every row, the first falling on `first_due`.
    pub fn due_dates(&self, first_due: NaiveDate) -> LoanResult<Vec<NaiveDate>> {
        let mut dates = Vec::with_capacity(self.schedule.len());
        let mut due = first_due;
        for i in 0..self.schedule.len() {
            if i > 0 {
                due = self.parameters.frequency.next_due_date(&due)?;
            }
            dates.push(due);
        }
        Ok(dates)
    }
}

fn get_pmt_amount(principal: f64, rate: f64, term_periods: u32) -> LoanResult<f64> {
    if rate == 0. {
        return Ok(principal / term_periods as f64);
    }

    // 1 - (1 + r)^-n, without rounding r away for tiny rates
    let denominator = -(-(term_periods as f64) * rate.ln_1p()).exp_m1();
    if denominator == 0. || !denominator.is_finite() {
        return Err(LoanError::Computation(format!(
            "annuity factor vanishes for periodic rate {} over {} periods",
            rate, term_periods
        )));
    }

    let pmt_amount = (principal * rate) / denominator;
    if !pmt_amount.is_finite() {
        return Err(LoanError::Computation(format!(
            "payment is not finite for principal {} at periodic rate {}",
            principal, rate
        )));
    }
    // (1 + r)^-n below epsilon leaves nothing of the payment for principal
    if pmt_amount - principal * rate <= 0. {
        return Err(LoanError::Computation(format!(
            "payment {} does not amortize principal {} at periodic rate {} over {} periods",
            pmt_amount, principal, rate, term_periods
        )));
    }
    Ok(pmt_amount)
}

fn add_scheduled_pmts(
    principal: f64,
    rate: f64,
    term_periods: u32,
    pmt_amount: f64,
) -> LoanResult<Vec<AmortizationRow>> {
    let mut sched_pmt = Vec::with_capacity(term_periods as usize);

    let mut balance = principal;
    let mut cumulative_principal = 0.;
    let mut cumulative_interest = 0.;

    for period in 1..=term_periods {
        let interest = balance * rate;
        let principal_portion = pmt_amount - interest;

        balance -= principal_portion;
        if balance < 0. {
            if period < term_periods {
                warn!(
                    "balance went negative ({}) before the final period, at period {}",
                    balance, period
                );
            } else {
                debug!("clamping final balance {} to zero", balance);
            }
            balance = 0.;
        }
        cumulative_principal += principal_portion;
        cumulative_interest += interest;

        let row = AmortizationRow {
            period,
            payment: pmt_amount,
            principal_portion,
            interest_portion: interest,
            balance,
            cumulative_principal,
            cumulative_interest,
        };
        if !row.is_finite() {
            return Err(LoanError::Computation(format!(
                "schedule value is not finite at period {}",
                period
            )));
        }
        trace!("{}", row);
        sched_pmt.push(row);
    }

    if balance > principal * RESIDUAL_TOLERANCE {
        return Err(LoanError::Computation(format!(
            "balance {} remains after {} periods",
            balance, term_periods
        )));
    }
    Ok(sched_pmt)
}
