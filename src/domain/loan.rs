use super::ports::Identifiable;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A loan as held by the loan store.
///
/// Loans are created at seed time and never mutated afterwards.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Loan {
    pub id: i64,
    pub name: String,
    /// Yearly interest as a percentage, e.g. `10` for 10%.
    #[serde(with = "rust_decimal::serde::float")]
    pub interest_rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub principal: Decimal,
    pub due_date: NaiveDate,
}

impl Loan {
    /// Principal plus interest: the most that may ever be paid against this loan.
    pub fn total_due(&self) -> Decimal {
        self.principal + self.principal * self.interest_rate / Decimal::ONE_HUNDRED
    }
}

impl Identifiable for Loan {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Optional constraints for loan listings. Absent fields impose nothing and
/// present ones are AND-combined.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LoanFilter {
    /// Case-insensitive substring of the loan name.
    pub name: Option<String>,
    /// Upper bound (inclusive) on the interest rate.
    pub interest_rate: Option<Decimal>,
    /// Upper bound (inclusive) on the principal.
    pub principal: Option<Decimal>,
    /// Upper bound (inclusive) on the due date.
    pub due_date: Option<NaiveDate>,
}

impl LoanFilter {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.interest_rate.is_none()
            && self.principal.is_none()
            && self.due_date.is_none()
    }

    pub fn matches(&self, loan: &Loan) -> bool {
        if let Some(name) = &self.name
            && !loan.name.to_lowercase().contains(&name.to_lowercase())
        {
            return false;
        }
        if let Some(rate) = self.interest_rate
            && loan.interest_rate > rate
        {
            return false;
        }
        if let Some(principal) = self.principal
            && loan.principal > principal
        {
            return false;
        }
        if let Some(due_date) = self.due_date
            && loan.due_date > due_date
        {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn loan() -> Loan {
        Loan {
            id: 1,
            name: "Tom's Loan".to_string(),
            interest_rate: dec!(5.0),
            principal: dec!(10000.0),
            due_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        }
    }

    #[test]
    fn test_total_due() {
        let loan = Loan {
            principal: dec!(500),
            interest_rate: dec!(10),
            ..loan()
        };
        assert_eq!(loan.total_due(), dec!(550));
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = LoanFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&loan()));
    }

    #[test]
    fn test_name_filter_is_case_insensitive_substring() {
        let filter = LoanFilter {
            name: Some("tom".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&loan()));

        let filter = LoanFilter {
            name: Some("LOAN".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&loan()));

        let filter = LoanFilter {
            name: Some("Chris".to_string()),
            ..Default::default()
        };
        assert!(!filter.matches(&loan()));
    }

    #[test]
    fn test_upper_bounds_are_inclusive() {
        let exact = LoanFilter {
            interest_rate: Some(dec!(5)),
            principal: Some(dec!(10000)),
            due_date: NaiveDate::from_ymd_opt(2025, 3, 1),
            ..Default::default()
        };
        assert!(exact.matches(&loan()));

        let below_rate = LoanFilter {
            interest_rate: Some(dec!(4.99)),
            ..Default::default()
        };
        assert!(!below_rate.matches(&loan()));

        let below_principal = LoanFilter {
            principal: Some(dec!(9999.99)),
            ..Default::default()
        };
        assert!(!below_principal.matches(&loan()));

        let earlier_date = LoanFilter {
            due_date: NaiveDate::from_ymd_opt(2025, 2, 28),
            ..Default::default()
        };
        assert!(!earlier_date.matches(&loan()));
    }

    #[test]
    fn test_constraints_are_and_combined() {
        let filter = LoanFilter {
            name: Some("tom".to_string()),
            principal: Some(dec!(100)),
            ..Default::default()
        };
        assert!(!filter.matches(&loan()));
    }

    #[test]
    fn test_loan_json_uses_plain_numbers() {
        let json = serde_json::to_value(loan()).unwrap();
        assert_eq!(json["interest_rate"], serde_json::json!(5.0));
        assert_eq!(json["principal"], serde_json::json!(10000.0));
        assert_eq!(json["due_date"], "2025-03-01");
    }
}
