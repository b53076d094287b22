//! [`Price`]-related definitions.

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;

/// Price in Nepalese rupees.
///
/// Parsed from the numeric string a listing form submits, preserving the
/// arbitrary precision of the input. Never negative.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Price(Decimal);

impl Price {
    /// Creates a new [`Price`] if the given `amount` is not negative.
    #[must_use]
    pub fn new(amount: Decimal) -> Option<Self> {
        (!amount.is_sign_negative()).then_some(Self(amount))
    }

    /// Returns a human-readable label of this [`Price`] in the South Asian
    /// numbering system ("2 Crore 50 Lakh", "20,000").
    #[must_use]
    pub fn label(&self) -> String {
        let amount = self.0;
        if amount.is_zero() {
            return "0".to_owned();
        }

        let crore = Decimal::new(10_000_000, 0);
        let lakh = Decimal::new(100_000, 0);
        let thousand = Decimal::new(1_000, 0);

        if amount >= crore {
            let crores = (amount / crore).trunc().normalize();
            let remainder = amount - crores * crore;
            let mut label = format!("{crores} Crore");
            if remainder >= lakh {
                let lakhs = (remainder / lakh).trunc().normalize();
                label.push_str(&format!(" {lakhs} Lakh"));
            }
            return label;
        }

        if amount >= lakh {
            let lakhs = (amount / lakh).trunc().normalize();
            let remainder = amount - lakhs * lakh;
            let mut label = format!("{lakhs} Lakh");
            if remainder >= thousand {
                let thousands = (remainder / thousand).trunc().normalize();
                label.push_str(&format!(" {thousands} Thousand"));
            }
            return label;
        }

        let plain = amount.normalize().to_string();
        match plain.split_once('.') {
            Some((int, frac)) => format!("{}.{frac}", group_digits(int)),
            None => group_digits(&plain),
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Price {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s.trim()).map_err(|_| "not a number")?;
        Self::new(amount).ok_or("negative amount")
    }
}

/// Groups the given integer `digits` the South Asian way: the last three
/// together, then pairs ("1234567" becomes "12,34,567").
fn group_digits(digits: &str) -> String {
    let len = digits.len();
    if len <= 3 {
        return digits.to_owned();
    }

    let (head, tail) = digits.split_at(len - 3);
    let mut groups = Vec::new();
    let mut i = head.len();
    while i > 2 {
        groups.push(&head[i - 2..i]);
        i -= 2;
    }
    groups.push(&head[..i]);

    let mut out = String::with_capacity(len + len / 2);
    for group in groups.iter().rev() {
        out.push_str(group);
        out.push(',');
    }
    out.push_str(tail);
    out
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use super::Price;

    fn price(s: &str) -> Price {
        s.parse().unwrap()
    }

    #[test]
    fn from_str() {
        assert!(Price::from_str("25000000").is_ok());
        assert!(Price::from_str("123.45").is_ok());
        assert!(Price::from_str("0").is_ok());
        assert!(Price::from_str(" 5000 ").is_ok());

        assert!(Price::from_str("-1").is_err());
        assert!(Price::from_str("abc").is_err());
        assert!(Price::from_str("").is_err());
        assert!(Price::from_str("12,000").is_err());
    }

    #[test]
    fn to_string_preserves_input() {
        assert_eq!(price("5000000").to_string(), "5000000");
        assert_eq!(price("123.450").to_string(), "123.450");
    }

    #[test]
    fn ordering() {
        assert!(price("20000") < price("5000000"));
        assert!(price("10000") <= price("10000"));
        assert!(price("10000.5") > price("10000"));
    }

    #[test]
    fn label() {
        assert_eq!(price("0").label(), "0");
        assert_eq!(price("123").label(), "123");
        assert_eq!(price("20000").label(), "20,000");
        assert_eq!(price("99999").label(), "99,999");
        assert_eq!(price("150000").label(), "1 Lakh 50 Thousand");
        assert_eq!(price("5000000").label(), "50 Lakh");
        assert_eq!(price("25000000").label(), "2 Crore 50 Lakh");
        assert_eq!(price("12345678").label(), "1 Crore 23 Lakh");
        assert_eq!(price("10000000").label(), "1 Crore");
    }
}
