use crate::error::LoanError;
use std::{fmt, str::FromStr};

/// Currency used to present amounts. Callers choose it; nothing in this crate
/// detects it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Currency {
    #[default]
    USD,
    COP,
    MXN,
    BRL,
    ARS,
    CLP,
    PEN,
    EUR,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::COP => "COP",
            Currency::MXN => "MXN",
            Currency::BRL => "BRL",
            Currency::ARS => "ARS",
            Currency::CLP => "CLP",
            Currency::PEN => "PEN",
            Currency::EUR => "EUR",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::BRL => "R$",
            Currency::PEN => "S/",
            Currency::EUR => "€",
            _ => "$",
        }
    }

    /// Formats `amount` in whole units with `.` grouping, e.g. `$5.000.000`.
    pub fn format(&self, amount: f64) -> String {
        let rounded = round(amount, 0.);
        if !rounded.is_finite() {
            return format!("{}{}", self.symbol(), amount);
        }
        let sign = if rounded < 0. { "-" } else { "" };
        format!(
            "{}{}{}",
            sign,
            self.symbol(),
            group_thousands(&format!("{:.0}", rounded.abs()))
        )
    }
}

pub(crate) fn round(amt: f64, dec: f64) -> f64 {
    if amt == 0. {
        0.
    } else {
        (amt * 10_f64.powf(dec)).round() / 10_f64.powf(dec)
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = LoanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::USD),
            "COP" => Ok(Currency::COP),
            "MXN" => Ok(Currency::MXN),
            "BRL" => Ok(Currency::BRL),
            "ARS" => Ok(Currency::ARS),
            "CLP" => Ok(Currency::CLP),
            "PEN" => Ok(Currency::PEN),
            "EUR" => Ok(Currency::EUR),
            _ => Err(LoanError::UnknownCurrency(s.to_string())),
        }
    }
}
