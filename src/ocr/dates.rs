//! Date-like token parsing and normalization (spec.md §4.2 step 5).
//! Grounded on the teacher's `enhanced_ocr` date-pattern table, replacing
//! its single en-US date assumption with the explicit ambiguous-token
//! disambiguation spec.md specifies.

use chrono::{Datelike, NaiveDate, Utc};

/// A date parsed from an OCR/barcode token, normalized to a calendar
/// date. `render_mm_dd_yyyy`/`render_yyyymmdd` are the two external
/// representations spec.md calls out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedDate(pub NaiveDate);

impl NormalizedDate {
    pub fn render_mm_dd_yyyy(&self) -> String {
        self.0.format("%m/%d/%Y").to_string()
    }

    pub fn render_yyyymmdd(&self) -> String {
        self.0.format("%Y%m%d").to_string()
    }
}

/// Parse a token of the form `D[D]/D[D]/D[D][DD]` (or `-`/`.` separated).
/// Two-digit years > 30 map to 19xx, else 20xx. If the first numeric
/// component is > 12, the token is treated as DD/MM/YYYY, else
/// MM/DD/YYYY.
pub fn parse_date_token(token: &str) -> Option<NormalizedDate> {
    let parts: Vec<&str> = token.split(|c| c == '/' || c == '-' || c == '.').collect();
    if parts.len() != 3 {
        return None;
    }
    let a: u32 = parts[0].parse().ok()?;
    let b: u32 = parts[1].parse().ok()?;
    let mut year: i32 = parts[2].parse().ok()?;

    if parts[2].len() <= 2 {
        year = if year > 30 { 1900 + year } else { 2000 + year };
    }

    let (month, day) = if a > 12 { (b, a) } else { (a, b) };
    NaiveDate::from_ymd_opt(year, month, day).map(NormalizedDate)
}

/// Parse an 8-digit AAMVA-style date token. YYYYMMDD if the first four
/// digits are > "1900", else MMDDYYYY (spec.md §4.3).
pub fn parse_aamva_date8(token: &str) -> Option<NormalizedDate> {
    if token.len() != 8 || !token.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let first_four: i32 = token[0..4].parse().ok()?;
    if first_four > 1900 {
        let year: i32 = token[0..4].parse().ok()?;
        let month: u32 = token[4..6].parse().ok()?;
        let day: u32 = token[6..8].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day).map(NormalizedDate)
    } else {
        let month: u32 = token[0..2].parse().ok()?;
        let day: u32 = token[2..4].parse().ok()?;
        let year: i32 = token[4..8].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day).map(NormalizedDate)
    }
}

/// Classify a date as a DOB or expiration candidate per spec.md §4.2:
/// dates >= today are expiration candidates; dates with year in
/// [1900, today-16yrs] are DOB candidates. Neither, neither is set.
pub enum DateRole {
    Expiration,
    DateOfBirth,
    Ambiguous,
}

pub fn classify_date_role(date: &NormalizedDate) -> DateRole {
    let today = Utc::now().date_naive();
    if date.0 >= today {
        return DateRole::Expiration;
    }
    let sixteen_years_ago = NaiveDate::from_ymd_opt(today.year() - 16, today.month(), today.day())
        .unwrap_or(today);
    if date.0.year() >= 1900 && date.0 <= sixteen_years_ago {
        DateRole::DateOfBirth
    } else {
        DateRole::Ambiguous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mm_dd_yyyy_when_first_le_12() {
        let d = parse_date_token("05/10/2030").unwrap();
        assert_eq!(d.render_mm_dd_yyyy(), "05/10/2030");
    }

    #[test]
    fn dd_mm_yyyy_when_first_gt_12() {
        let d = parse_date_token("25/12/1990").unwrap();
        assert_eq!(d.render_mm_dd_yyyy(), "12/25/1990");
    }

    #[test]
    fn two_digit_year_above_30_is_1900s() {
        let d = parse_date_token("01/01/85").unwrap();
        assert_eq!(d.render_yyyymmdd(), "19850101");
    }

    #[test]
    fn two_digit_year_at_or_below_30_is_2000s() {
        let d = parse_date_token("01/01/25").unwrap();
        assert_eq!(d.render_yyyymmdd(), "20250101");
    }

    #[test]
    fn aamva_date8_yyyymmdd_branch() {
        let d = parse_aamva_date8("20300510").unwrap();
        assert_eq!(d.render_mm_dd_yyyy(), "05/10/2030");
    }

    #[test]
    fn aamva_date8_mmddyyyy_branch() {
        let d = parse_aamva_date8("02141990").unwrap();
        assert_eq!(d.render_mm_dd_yyyy(), "02/14/1990");
    }

    #[test]
    fn round_trip_stability() {
        let original = "05/10/2030";
        let parsed = parse_date_token(original).unwrap();
        let rendered = parsed.render_mm_dd_yyyy();
        let reparsed = parse_date_token(&rendered).unwrap();
        assert_eq!(parsed, reparsed);
    }
}
