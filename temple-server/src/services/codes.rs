//! Sequential business codes
//!
//! - `CUST00001`, `DEV00001`: global sequence, 5 digits
//! - `BK20250001`, `QT20250001`, `PAY20250001`: per-year sequence, 4 digits
//!
//! The next code is the highest existing numeric suffix plus one. A sequence
//! that outgrows its width keeps counting with more digits.

/// Code scheme for one table
#[derive(Debug, Clone, Copy)]
pub struct CodeScheme {
    pub prefix: &'static str,
    pub yearly: bool,
    pub width: usize,
}

pub const CUSTOMER: CodeScheme = CodeScheme {
    prefix: "CUST",
    yearly: false,
    width: 5,
};

pub const DEVOTEE: CodeScheme = CodeScheme {
    prefix: "DEV",
    yearly: false,
    width: 5,
};

pub const BOOKING: CodeScheme = CodeScheme {
    prefix: "BK",
    yearly: true,
    width: 4,
};

pub const QUOTATION: CodeScheme = CodeScheme {
    prefix: "QT",
    yearly: true,
    width: 4,
};

pub const PAYMENT: CodeScheme = CodeScheme {
    prefix: "PAY",
    yearly: true,
    width: 4,
};

impl CodeScheme {
    /// Fixed part of the code for the given year (`BK2025`, `CUST`)
    pub fn stem(&self, year: i32) -> String {
        if self.yearly {
            format!("{}{}", self.prefix, year)
        } else {
            self.prefix.to_string()
        }
    }

    /// Next code after `last`, the highest existing code with the same stem
    pub fn next(&self, year: i32, last: Option<&str>) -> String {
        let stem = self.stem(year);
        let next = last
            .and_then(|code| code.strip_prefix(stem.as_str()))
            .and_then(|suffix| suffix.parse::<u64>().ok())
            .map_or(1, |n| n + 1);
        format!("{stem}{next:0width$}", width = self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_codes() {
        assert_eq!(CUSTOMER.next(2025, None), "CUST00001");
        assert_eq!(DEVOTEE.next(2025, None), "DEV00001");
        assert_eq!(BOOKING.next(2025, None), "BK20250001");
        assert_eq!(QUOTATION.next(2025, None), "QT20250001");
        assert_eq!(PAYMENT.next(2025, None), "PAY20250001");
    }

    #[test]
    fn test_increment() {
        assert_eq!(CUSTOMER.next(2025, Some("CUST00041")), "CUST00042");
        assert_eq!(BOOKING.next(2025, Some("BK20250009")), "BK20250010");
    }

    #[test]
    fn test_yearly_sequence_restarts() {
        // the lookup only ever returns same-stem codes, but a stale one must not leak
        assert_eq!(BOOKING.next(2026, Some("BK20250123")), "BK20260001");
        assert_eq!(BOOKING.stem(2026), "BK2026");
        assert_eq!(CUSTOMER.stem(2026), "CUST");
    }

    #[test]
    fn test_overflow_widens() {
        assert_eq!(BOOKING.next(2025, Some("BK20259999")), "BK202510000");
        assert_eq!(CUSTOMER.next(2025, Some("CUST99999")), "CUST100000");
    }

    #[test]
    fn test_garbage_suffix_restarts_at_one() {
        assert_eq!(CUSTOMER.next(2025, Some("CUSTXYZ")), "CUST00001");
    }
}
