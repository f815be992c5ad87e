//! Financial context model
//!
//! Describes how the client pays for the property. Step applicability is
//! evaluated against this context.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the purchase is paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Paid with the client's own funds
    #[default]
    Cash,
    /// Financed with a mortgage loan
    Mortgage,
    /// Financed through a housing leasing contract
    Leasing,
}

impl PaymentMethod {
    /// Returns true if a financial institution takes part in the purchase
    pub fn is_financed(&self) -> bool {
        matches!(self, Self::Mortgage | Self::Leasing)
    }

    /// Parse payment method from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cash" => Some(Self::Cash),
            "mortgage" | "loan" => Some(Self::Mortgage),
            "leasing" => Some(Self::Leasing),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cash => write!(f, "Cash"),
            Self::Mortgage => write!(f, "Mortgage"),
            Self::Leasing => write!(f, "Leasing"),
        }
    }
}

/// Financial situation of the client at the time of a change
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialContext {
    #[serde(default)]
    pub payment_method: PaymentMethod,

    /// A housing subsidy covers part of the price
    #[serde(default)]
    pub has_subsidy: bool,

    /// Severance funds are transferred towards the price
    #[serde(default)]
    pub uses_severance_funds: bool,
}

impl FinancialContext {
    /// Context of a purchase paid with the given method and no extra funding
    pub fn paid_with(payment_method: PaymentMethod) -> Self {
        Self {
            payment_method,
            ..Self::default()
        }
    }

    /// Returns true if a financial institution takes part in the purchase
    pub fn is_financed(&self) -> bool {
        self.payment_method.is_financed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_financed() {
        assert!(!FinancialContext::paid_with(PaymentMethod::Cash).is_financed());
        assert!(FinancialContext::paid_with(PaymentMethod::Mortgage).is_financed());
        assert!(FinancialContext::paid_with(PaymentMethod::Leasing).is_financed());
    }

    #[test]
    fn test_parse() {
        assert_eq!(PaymentMethod::parse("Loan"), Some(PaymentMethod::Mortgage));
        assert_eq!(PaymentMethod::parse("barter"), None);
    }

    #[test]
    fn test_defaults_from_json() {
        let ctx: FinancialContext = serde_json::from_str(r#"{"hasSubsidy": true}"#).unwrap();
        assert_eq!(ctx.payment_method, PaymentMethod::Cash);
        assert!(ctx.has_subsidy);
        assert!(!ctx.uses_severance_funds);
    }
}
