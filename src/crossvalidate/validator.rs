//! Cross Validator (spec.md §4.4): front-vs-back field comparison,
//! match-score aggregation, and the manual-review routing rule.

use crate::config::Config;
use crate::models::{BackIdData, CrossValidationReport, FieldName, OcrFields};

use super::authority_table;
use super::similarity::address_similarity;
use crate::ocr::dates::parse_date_token;

struct Tally {
    total: u32,
    matches: u32,
    discrepancies: Vec<String>,
}

impl Tally {
    fn new() -> Self {
        Self { total: 0, matches: 0, discrepancies: Vec::new() }
    }

    fn check(&mut self, label: &str, a: Option<&str>, b: Option<&str>, is_match: impl FnOnce(&str, &str) -> bool) -> bool {
        match (a, b) {
            (Some(a), Some(b)) => {
                self.total += 1;
                let matched = is_match(a, b);
                if matched {
                    self.matches += 1;
                } else {
                    self.discrepancies.push(format!("{label} mismatch: '{a}' vs '{b}'"));
                }
                matched
            }
            _ => true, // missing side is a vacuous match; does not count toward totalChecks
        }
    }

    /// Same vacuous-on-missing rule as `check`, but over values already
    /// parsed to a comparable form (e.g. height in inches) rather than
    /// raw strings — a present-but-unparseable value on either side is
    /// just as vacuous as a genuinely absent field, never a match.
    fn check_numeric<T>(&mut self, label: &str, a: Option<T>, b: Option<T>, within: impl FnOnce(&T, &T) -> bool) -> bool
    where
        T: std::fmt::Display,
    {
        match (a, b) {
            (Some(a), Some(b)) => {
                self.total += 1;
                let matched = within(&a, &b);
                if matched {
                    self.matches += 1;
                } else {
                    self.discrepancies.push(format!("{label} mismatch: '{a}' vs '{b}'"));
                }
                matched
            }
            _ => true,
        }
    }
}

pub fn cross_validate(front: &OcrFields, back: &BackIdData, config: &Config) -> CrossValidationReport {
    let back_fields = &back.merged;
    let mut tally = Tally::new();

    let id_number_match = tally.check(
        "document_number",
        front.get(FieldName::DocumentNumber),
        back_fields.get(FieldName::DocumentNumber),
        |a, b| normalize_id(a) == normalize_id(b),
    );

    let expiry_match = tally.check(
        "expiration_date",
        front.get(FieldName::ExpirationDate),
        back_fields.get(FieldName::ExpirationDate),
        dates_equal,
    );

    let authority_match = tally.check(
        "issuing_authority",
        front.get(FieldName::IssuingAuthority),
        back_fields.get(FieldName::State),
        authority_table::matches,
    );

    let name_match = {
        let first_ok = tally.check(
            "first_name",
            front.get(FieldName::FirstName),
            back_fields.get(FieldName::FirstName),
            |a, b| a.trim().eq_ignore_ascii_case(b.trim()),
        );
        let last_ok = tally.check(
            "last_name",
            front.get(FieldName::LastName),
            back_fields.get(FieldName::LastName),
            |a, b| a.trim().eq_ignore_ascii_case(b.trim()),
        );
        first_ok && last_ok
    };

    let dob_match = tally.check(
        "date_of_birth",
        front.get(FieldName::DateOfBirth),
        back_fields.get(FieldName::DateOfBirth),
        dates_equal,
    );

    let address_match = tally.check(
        "address",
        front.get(FieldName::Address),
        back_fields.get(FieldName::Address),
        |a, b| address_similarity(a, b) > config.address_similarity_pass,
    );

    let gender_match = tally.check(
        "sex",
        front.get(FieldName::Sex),
        back_fields.get(FieldName::Sex),
        |a, b| {
            a.chars().next().map(|c| c.to_ascii_uppercase())
                == b.chars().next().map(|c| c.to_ascii_uppercase())
        },
    );

    let height_match = tally.check_numeric(
        "height",
        front.get(FieldName::Height).and_then(height_to_inches),
        back_fields.get(FieldName::Height).and_then(height_to_inches),
        |a, b| (*a as f32 - *b as f32).abs() <= config.height_tolerance_in,
    );

    let weight_match = tally.check(
        "weight",
        front.get(FieldName::Weight),
        back_fields.get(FieldName::Weight),
        |a, b| {
            let (wa, wb) = (extract_digits(a), extract_digits(b));
            match (wa, wb) {
                (Some(wa), Some(wb)) => (wa - wb).abs() <= config.weight_tolerance_lbs,
                _ => false,
            }
        },
    );

    let middle_name_match = tally.check(
        "middle_name",
        front.get(FieldName::MiddleName),
        back_fields.get(FieldName::MiddleName),
        |a, b| {
            let (a, b) = (a.trim().to_lowercase(), b.trim().to_lowercase());
            let initials_agree = a.chars().next() == b.chars().next();
            a == b || a.starts_with(&b) || b.starts_with(&a) || (initials_agree && (a.len() == 1 || b.len() == 1))
        },
    );

    let vehicle_class_match = tally.check(
        "vehicle_class",
        front.get(FieldName::VehicleClass),
        back_fields.get(FieldName::VehicleClass),
        |a, b| a.trim().to_uppercase() == b.trim().to_uppercase(),
    );

    let discriminator_match = tally.check(
        "document_discriminator",
        front.get(FieldName::DocumentDiscriminator),
        back_fields.get(FieldName::DocumentDiscriminator),
        |a, b| a == b,
    );

    let eye_color_match = tally.check(
        "eye_color",
        front.get(FieldName::EyeColor),
        back_fields.get(FieldName::EyeColor),
        |a, b| {
            let (a, b) = (a.trim().to_uppercase(), b.trim().to_uppercase());
            a == b || a.contains(&b) || b.contains(&a)
        },
    );

    if tally.total == 0 {
        return CrossValidationReport::empty_extraction_failure();
    }

    let match_score = tally.matches as f32 / tally.total as f32;
    let requires_manual_review = false;
    let overall_consistency =
        match_score >= config.cross_validation_threshold && tally.discrepancies.is_empty() && !requires_manual_review;

    CrossValidationReport {
        match_score,
        overall_consistency,
        id_number_match,
        expiry_match,
        authority_match,
        name_match,
        dob_match,
        address_match,
        height_match,
        gender_match,
        eye_color_match,
        weight_match,
        middle_name_match,
        vehicle_class_match,
        discriminator_match,
        discrepancies: tally.discrepancies,
        requires_manual_review,
        manual_review_reason: None,
    }
}

fn normalize_id(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect::<String>().to_uppercase()
}

fn dates_equal(a: &str, b: &str) -> bool {
    match (parse_date_token(a), parse_date_token(b)) {
        (Some(da), Some(db)) => da.render_yyyymmdd() == db.render_yyyymmdd(),
        _ => false,
    }
}

/// Parse a height string to total inches, robust to both the AAMVA
/// rendered form (`5'-11"`) and loose front-OCR free text (`5'9"`): split
/// on non-digit separators into digit groups, `[feet, inches]` resolves
/// directly, and a lone `FII`-concatenated group (e.g. `511`) resolves by
/// taking its first digit as feet and the rest as inches.
fn height_to_inches(s: &str) -> Option<u32> {
    let groups: Vec<&str> = s
        .split(|c: char| !c.is_ascii_digit())
        .filter(|g| !g.is_empty())
        .collect();
    match groups.as_slice() {
        [feet, inches] => {
            let feet: u32 = feet.parse().ok()?;
            let inches: u32 = inches.parse().ok()?;
            Some(feet * 12 + inches)
        }
        [single] if single.len() == 3 => {
            let feet: u32 = single[..1].parse().ok()?;
            let inches: u32 = single[1..].parse().ok()?;
            Some(feet * 12 + inches)
        }
        _ => None,
    }
}

fn extract_digits(s: &str) -> Option<i32> {
    let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Pdf417Payload;

    fn back_with(fields: &[(FieldName, &str)]) -> BackIdData {
        let mut merged = OcrFields::new("");
        for (f, v) in fields {
            merged.set(*f, *v, 0.9);
        }
        BackIdData {
            pdf417: Some(Pdf417Payload {
                raw_text: String::new(),
                parsed: merged.clone(),
                confidence: 0.9,
                validation: crate::models::ValidationTag::Valid,
            }),
            ocr: None,
            merged,
            verification_codes: Vec::new(),
            security_features: Vec::new(),
        }
    }

    #[test]
    fn s1_happy_path_scores_above_point_nine() {
        let mut front = OcrFields::new("");
        front.set(FieldName::DocumentNumber, "D1234567", 0.9);
        front.set(FieldName::ExpirationDate, "05/10/2030", 0.9);
        front.set(FieldName::FirstName, "JANE", 0.9);
        front.set(FieldName::LastName, "DOE", 0.9);
        front.set(FieldName::DateOfBirth, "02/14/1990", 0.9);
        front.set(FieldName::IssuingAuthority, "CALIFORNIA", 0.9);

        let back = back_with(&[
            (FieldName::DocumentNumber, "D1234567"),
            (FieldName::ExpirationDate, "05/10/2030"),
            (FieldName::FirstName, "JANE"),
            (FieldName::LastName, "DOE"),
            (FieldName::DateOfBirth, "02/14/1990"),
            (FieldName::State, "CA"),
        ]);

        let report = cross_validate(&front, &back, &Config::default());
        assert!(report.match_score >= 0.9, "score was {}", report.match_score);
        assert!(report.overall_consistency);
    }

    #[test]
    fn s2_id_mismatch_is_not_consistent() {
        let mut front = OcrFields::new("");
        front.set(FieldName::DocumentNumber, "D1234567", 0.9);
        let back = back_with(&[(FieldName::DocumentNumber, "X9999999")]);
        let report = cross_validate(&front, &back, &Config::default());
        assert!(!report.overall_consistency);
        assert!(!report.id_number_match);
    }

    #[test]
    fn s3_no_comparable_fields_routes_to_manual_review() {
        let front = OcrFields::new("");
        let back = BackIdData::default();
        let report = cross_validate(&front, &back, &Config::default());
        assert_eq!(report.match_score, 0.6);
        assert!(report.requires_manual_review);
    }

    #[test]
    fn matches_never_exceeds_total_checks() {
        let mut front = OcrFields::new("");
        front.set(FieldName::DocumentNumber, "ABC", 0.9);
        front.set(FieldName::Weight, "180", 0.9);
        let back = back_with(&[(FieldName::DocumentNumber, "XYZ"), (FieldName::Weight, "300")]);
        let report = cross_validate(&front, &back, &Config::default());
        assert!(report.match_score >= 0.0 && report.match_score <= 1.0);
    }

    #[test]
    fn height_within_tolerance_matches() {
        let mut front = OcrFields::new("");
        front.set(FieldName::DocumentNumber, "D1234567", 0.9);
        front.set(FieldName::Height, "5'9\"", 0.9);
        let back = back_with(&[(FieldName::DocumentNumber, "D1234567"), (FieldName::Height, "5'-10\"")]);
        let report = cross_validate(&front, &back, &Config::default());
        assert!(report.height_match);
    }

    #[test]
    fn height_unparseable_on_either_side_is_vacuous_not_a_match() {
        let mut front = OcrFields::new("");
        front.set(FieldName::DocumentNumber, "D1234567", 0.9);
        front.set(FieldName::Height, "tall", 0.9);
        let back = back_with(&[(FieldName::DocumentNumber, "D1234567"), (FieldName::Height, "5'10\"")]);
        let report = cross_validate(&front, &back, &Config::default());
        assert!(report.height_match);
        assert!(report.overall_consistency);
    }
}
