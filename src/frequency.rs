use crate::error::{LoanError, LoanResult};
use chrono::NaiveDate;
use std::{fmt, str::FromStr};

/// Payment cadence of a loan.
///
/// Rates are always quoted per month; the cadence only decides how that
/// monthly rate is divided down to a per-payment rate.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Frequency {
    Daily,
    Weekly,
    Biweekly,
    #[default]
    Monthly,
}

impl Frequency {
    pub const ALL: [Frequency; 4] = [
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Biweekly,
        Frequency::Monthly,
    ];

    /// Number of payments of this cadence in one nominal month.
    pub fn factor(&self) -> f64 {
        match self {
            Frequency::Daily => 30.,
            Frequency::Weekly => 52. / 12.,
            Frequency::Biweekly => 26. / 12.,
            Frequency::Monthly => 1.,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Biweekly => "biweekly",
            Frequency::Monthly => "monthly",
        }
    }

    /// The due date one period after `date`. Monthly steps keep the day of
    /// month where possible and fall back to the last day of shorter months.
    pub fn next_due_date(&self, date: &NaiveDate) -> LoanResult<NaiveDate> {
        let next = match self {
            Frequency::Daily => date.checked_add_days(chrono::Days::new(1)),
            Frequency::Weekly => date.checked_add_days(chrono::Days::new(7)),
            Frequency::Biweekly => date.checked_add_days(chrono::Days::new(14)),
            Frequency::Monthly => date.checked_add_months(chrono::Months::new(1)),
        };
        next.ok_or(LoanError::DateOutOfRange(*date))
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = LoanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "biweekly" => Ok(Frequency::Biweekly),
            "monthly" => Ok(Frequency::Monthly),
            _ => Err(LoanError::UnknownFrequency(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Frequency;
    use crate::error::LoanError;
    use chrono::NaiveDate;
    use test_log::test;

    #[test]
    fn test_factor() {
        assert_eq!(Frequency::Daily.factor(), 30.);
        assert_eq!(Frequency::Weekly.factor(), 52. / 12.);
        assert_eq!(Frequency::Biweekly.factor(), 26. / 12.);
        assert_eq!(Frequency::Monthly.factor(), 1.);

        // every sub-monthly cadence divides the monthly rate down
        for freq in Frequency::ALL {
            assert!(freq.factor() >= 1., "{freq} factor below one");
        }
    }

    #[test]
    fn test_parse_tags() {
        for freq in Frequency::ALL {
            assert_eq!(freq.to_string().parse::<Frequency>(), Ok(freq));
        }
        assert_eq!(" Weekly ".parse::<Frequency>(), Ok(Frequency::Weekly));
        assert_eq!("BIWEEKLY".parse::<Frequency>(), Ok(Frequency::Biweekly));
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        assert_eq!(
            "fortnightly".parse::<Frequency>(),
            Err(LoanError::UnknownFrequency("fortnightly".to_string()))
        );
        assert!("".parse::<Frequency>().is_err());
    }

    #[test]
    fn test_next_due_date() {
        let begin_date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();

        assert_eq!(
            Frequency::Daily.next_due_date(&begin_date),
            Ok(NaiveDate::from_ymd_opt(2024, 2, 2).unwrap())
        );
        assert_eq!(
            Frequency::Weekly.next_due_date(&begin_date),
            Ok(NaiveDate::from_ymd_opt(2024, 2, 8).unwrap())
        );
        assert_eq!(
            Frequency::Biweekly.next_due_date(&begin_date),
            Ok(NaiveDate::from_ymd_opt(2024, 2, 15).unwrap())
        );
        assert_eq!(
            Frequency::Monthly.next_due_date(&begin_date),
            Ok(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
        );

        // leap day and year rollover
        let begin_date = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
        assert_eq!(
            Frequency::Daily.next_due_date(&begin_date),
            Ok(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
        );
        let begin_date = NaiveDate::from_ymd_opt(2023, 12, 25).unwrap();
        assert_eq!(
            Frequency::Weekly.next_due_date(&begin_date),
            Ok(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        );

        // month end clamps to the shorter month
        let begin_date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(
            Frequency::Monthly.next_due_date(&begin_date),
            Ok(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
        );
        let begin_date = NaiveDate::from_ymd_opt(2023, 1, 31).unwrap();
        assert_eq!(
            Frequency::Monthly.next_due_date(&begin_date),
            Ok(NaiveDate::from_ymd_opt(2023, 2, 28).unwrap())
        );
    }

    #[test]
    fn test_next_due_date_out_of_range() {
        assert_eq!(
            Frequency::Daily.next_due_date(&NaiveDate::MAX),
            Err(LoanError::DateOutOfRange(NaiveDate::MAX))
        );
    }
}
