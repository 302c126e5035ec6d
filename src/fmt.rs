use crate::error::{ReckonError, Result};

/// Currency conventions for reading and printing amounts. Amounts live as
/// integer cents everywhere else in the crate.
#[derive(Debug, Clone, PartialEq)]
pub struct MoneyFormat {
    pub symbol: String,
    pub decimal_separator: char,
    pub group_separator: char,
}

impl Default for MoneyFormat {
    fn default() -> Self {
        Self {
            symbol: "$".to_string(),
            decimal_separator: '.',
            group_separator: ',',
        }
    }
}

/// Hundredths of a cent: the finest precision a split share is shown with.
const SUB_CENT_SCALE: u64 = 100;

fn take_sign(s: &str) -> (bool, &str) {
    if let Some(rest) = s.strip_prefix('-') {
        (true, rest.trim_start())
    } else if let Some(rest) = s.strip_prefix('+') {
        (false, rest.trim_start())
    } else {
        (false, s)
    }
}

impl MoneyFormat {
    /// Parse a human-entered amount into cents: `$1,234.50`, `-12.00`,
    /// `$-3`, `(500.00)`. Fractions beyond the cent are rounded half-up on
    /// the magnitude, so `0.005` is one cent and `-0.005` is minus one.
    pub fn parse(&self, text: &str) -> Result<i64> {
        let invalid = || ReckonError::InvalidAmount(text.to_string());

        let mut s = text.trim();
        let parenthesized = match s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
            Some(inner) => {
                s = inner.trim();
                true
            }
            None => false,
        };

        let (sign_before, rest) = take_sign(s);
        let rest = if self.symbol.is_empty() {
            rest
        } else {
            rest.strip_prefix(self.symbol.as_str())
                .map(str::trim_start)
                .unwrap_or(rest)
        };
        let (sign_after, rest) = if sign_before {
            (false, rest)
        } else {
            take_sign(rest)
        };
        if parenthesized && (sign_before || sign_after) {
            return Err(invalid());
        }
        let negative = parenthesized || sign_before || sign_after;

        let (int_part, frac_part) = rest
            .split_once(self.decimal_separator)
            .unwrap_or((rest, ""));
        let int_digits: String = int_part
            .chars()
            .filter(|c| *c != self.group_separator)
            .collect();
        if int_digits.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_digits.chars().all(|c| c.is_ascii_digit())
            || !frac_part.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let whole: i64 = if int_digits.is_empty() {
            0
        } else {
            int_digits.parse().map_err(|_| invalid())?
        };
        let mut frac = frac_part.bytes().map(|b| i64::from(b - b'0'));
        let tenths = frac.next().unwrap_or(0);
        let hundredths = frac.next().unwrap_or(0);
        let round_up = frac.next().is_some_and(|d| d >= 5);

        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(tenths * 10 + hundredths + i64::from(round_up)))
            .ok_or_else(invalid)?;
        Ok(if negative { -cents } else { cents })
    }

    /// Format cents with thousands separators: $1,234.56
    pub fn format(&self, cents: i64) -> String {
        self.render(cents < 0, cents.unsigned_abs(), "")
    }

    /// Format a possibly fractional number of cents. Sub-cent digits are
    /// kept to a hundredth of a cent: 1000 / 3 cents prints as $3.3333.
    pub fn format_share(&self, minor_units: f64) -> String {
        let scaled = (minor_units * SUB_CENT_SCALE as f64).round() as i64;
        let abs = scaled.unsigned_abs();
        let sub_cent = abs % SUB_CENT_SCALE;
        let extra = if sub_cent == 0 {
            String::new()
        } else {
            format!("{sub_cent:02}").trim_end_matches('0').to_string()
        };
        self.render(scaled < 0, abs / SUB_CENT_SCALE, &extra)
    }

    fn render(&self, negative: bool, abs_cents: u64, extra_digits: &str) -> String {
        let int_part = (abs_cents / 100).to_string();
        let dec_part = abs_cents % 100;

        let mut with_commas = String::new();
        for (i, c) in int_part.chars().rev().enumerate() {
            if i > 0 && i % 3 == 0 {
                with_commas.push(self.group_separator);
            }
            with_commas.push(c);
        }
        let with_commas: String = with_commas.chars().rev().collect();

        let sign = if negative { "-" } else { "" };
        format!(
            "{sign}{}{with_commas}{}{dec_part:02}{extra_digits}",
            self.symbol, self.decimal_separator
        )
    }
}
