// src/normalize/numwords.rs

use thiserror::Error;

const ONES: [&str; 20] = [
    "zero",
    "one",
    "two",
    "three",
    "four",
    "five",
    "six",
    "seven",
    "eight",
    "nine",
    "ten",
    "eleven",
    "twelve",
    "thirteen",
    "fourteen",
    "fifteen",
    "sixteen",
    "seventeen",
    "eighteen",
    "nineteen",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

/// Short-scale group names, lowest first. `u64::MAX` tops out in the quintillions.
const SCALES: [&str; 7] = [
    "",
    "thousand",
    "million",
    "billion",
    "trillion",
    "quadrillion",
    "quintillion",
];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NumberWordError {
    #[error("{0:?} is not a run of ASCII digits")]
    NotDigits(String),

    #[error("{0} is too large to spell out")]
    OutOfRange(String),
}

/// Spell out a run of ASCII digits as English cardinal words.
///
/// Leading zeros are ignored ("007" → "seven"). Groups are separated by
/// spaces only, never commas.
pub fn cardinal(digits: &str) -> Result<String, NumberWordError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NumberWordError::NotDigits(digits.to_string()));
    }
    let n: u64 = digits
        .parse()
        .map_err(|_| NumberWordError::OutOfRange(digits.to_string()))?;
    Ok(spell(n))
}

fn spell(n: u64) -> String {
    if n == 0 {
        return ONES[0].to_string();
    }

    // split into base-1000 groups, least significant first
    let mut groups = Vec::with_capacity(SCALES.len());
    let mut rest = n;
    while rest > 0 {
        groups.push((rest % 1000) as usize);
        rest /= 1000;
    }

    let mut parts: Vec<String> = Vec::new();
    for (scale, &group) in groups.iter().enumerate().rev() {
        if group == 0 {
            continue;
        }
        let words = spell_group(group);
        if SCALES[scale].is_empty() {
            parts.push(words);
        } else {
            parts.push(format!("{} {}", words, SCALES[scale]));
        }
    }
    parts.join(" ")
}

/// 1..=999
fn spell_group(n: usize) -> String {
    let hundreds = n / 100;
    let rem = n % 100;
    match (hundreds, rem) {
        (0, r) => spell_below_hundred(r),
        (h, 0) => format!("{} hundred", ONES[h]),
        (h, r) => format!("{} hundred and {}", ONES[h], spell_below_hundred(r)),
    }
}

fn spell_below_hundred(n: usize) -> String {
    if n < 20 {
        return ONES[n].to_string();
    }
    match (TENS[n / 10], n % 10) {
        (tens, 0) => tens.to_string(),
        (tens, units) => format!("{}-{}", tens, ONES[units]),
    }
}
