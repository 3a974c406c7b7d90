//! Issuing-authority equivalence table (spec.md §4.4): canonical state
//! names mapped to the postal codes, abbreviations, and DMV-domain
//! fragments that should be treated as the same authority.

const STATES: &[(&str, &[&str])] = &[
    ("california", &["ca", "calif", "dmv.ca.gov"]),
    ("new york", &["ny", "dmv.ny.gov"]),
    ("texas", &["tx", "dmv.texas.gov", "txdmv"]),
    ("florida", &["fl", "flhsmv.gov", "flhsmv"]),
    ("washington", &["wa", "dol.wa.gov"]),
    ("illinois", &["il", "ildmv"]),
    ("ohio", &["oh", "bmv.ohio.gov"]),
    ("pennsylvania", &["pa", "dmv.pa.gov"]),
    ("michigan", &["mi", "michigan.gov/sos"]),
    ("georgia", &["ga", "dds.ga.gov"]),
    ("arizona", &["az", "azdot.gov"]),
    ("nevada", &["nv", "dmvnv.com"]),
];

fn canonical_for(token: &str) -> Option<&'static str> {
    let needle = token.trim().to_lowercase();
    for (canonical, variants) in STATES {
        if *canonical == needle || variants.contains(&needle.as_str()) {
            return Some(canonical);
        }
    }
    None
}

/// Match if both sides map into the same canonical entry, OR a
/// bidirectional substring check succeeds (spec.md §4.4). Symmetric by
/// construction: `matches(a, b) == matches(b, a)` (testable property 5).
pub fn matches(a: &str, b: &str) -> bool {
    let (a, b) = (a.trim().to_lowercase(), b.trim().to_lowercase());
    if a.is_empty() || b.is_empty() {
        return false;
    }
    match (canonical_for(&a), canonical_for(&b)) {
        (Some(ca), Some(cb)) if ca == cb => return true,
        _ => {}
    }
    a.contains(&b) || b.contains(&a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_equivalence_matches_abbreviation() {
        assert!(matches("California", "CA"));
        assert!(matches("ca", "california"));
    }

    #[test]
    fn domain_fragment_matches_canonical() {
        assert!(matches("dmv.ca.gov", "California"));
    }

    #[test]
    fn unrelated_authorities_do_not_match() {
        assert!(!matches("Texas", "Ohio"));
    }

    #[test]
    fn equivalence_is_symmetric() {
        let pairs = [("California", "CA"), ("Texas", "Ohio"), ("ny", "New York")];
        for (a, b) in pairs {
            assert_eq!(matches(a, b), matches(b, a));
        }
    }
}
