//! CAS registry number helpers.
//!
//! A CAS RN has the shape `NNNNNNN-NN-N`: two to seven digits, two digits
//! and a single check digit. The check digit is the weighted sum of the
//! other digits (rightmost weight 1) modulo 10.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static CAS_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{2,7}-\d{2}-\d$").expect("CAS shape pattern is valid")
});

/// Outcome of validating a CAS registry number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CasValidation {
    pub cas_number: String,
    pub normalized: String,
    pub format_valid: bool,
    pub checksum_valid: bool,
    pub errors: Vec<String>,
}

impl CasValidation {
    pub fn new(cas_number: &str) -> Self {
        let normalized = normalize_cas_key(cas_number);
        let mut errors = Vec::new();

        let format_valid = is_cas_shaped(&normalized);
        if !format_valid {
            errors.push("Invalid format: expected 2-7 digits, 2 digits and a check digit (e.g. 75-07-0)".to_string());
        }

        let checksum_valid = format_valid && cas_check_digit_valid(&normalized);
        if format_valid && !checksum_valid {
            errors.push("Check digit verification failed".to_string());
        }

        Self {
            cas_number: cas_number.to_string(),
            normalized,
            format_valid,
            checksum_valid,
            errors,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.format_valid && self.checksum_valid
    }
}

/// CAS keys are exact strings apart from surrounding whitespace.
pub fn normalize_cas_key(cas_number: &str) -> String {
    cas_number.trim().to_string()
}

/// Whole-string CAS shape check. Does not verify the check digit.
pub fn is_cas_shaped(value: &str) -> bool {
    CAS_SHAPE.is_match(value)
}

/// Computes the expected check digit from the leading digits of a
/// CAS-shaped value.
pub fn cas_check_digit(cas_number: &str) -> Option<u32> {
    if !is_cas_shaped(cas_number) {
        return None;
    }

    let digits: Vec<u32> = cas_number.chars().filter_map(|c| c.to_digit(10)).collect();
    let (_, body) = digits.split_last()?;

    let sum: u32 = body
        .iter()
        .rev()
        .enumerate()
        .map(|(i, d)| d * (i as u32 + 1))
        .sum();

    Some(sum % 10)
}

pub fn cas_check_digit_valid(cas_number: &str) -> bool {
    let expected = cas_check_digit(cas_number);
    let actual = cas_number.chars().last().and_then(|c| c.to_digit(10));
    expected.is_some() && expected == actual
}
