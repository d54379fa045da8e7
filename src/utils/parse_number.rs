/// Parse an optional float from form input; blanks and garbage become `None`.
/// A decimal comma is accepted ("-21,25").
pub fn parse_optional_f64(value: Option<&str>) -> Option<f64> {
    value.and_then(|v| {
        let t = v.trim();
        if t.is_empty() {
            None
        } else {
            t.replace(',', ".").parse::<f64>().ok().filter(|n| n.is_finite())
        }
    })
}

/// Parse an optional integer from a string
pub fn parse_optional_int(value: Option<&str>) -> Option<i64> {
    value.and_then(|v| {
        let t = v.trim();
        if t.is_empty() {
            None
        } else {
            t.parse::<i64>().ok()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floats() {
        assert_eq!(parse_optional_f64(Some(" -21,25 ")), Some(-21.25));
        assert_eq!(parse_optional_f64(Some("")), None);
        assert_eq!(parse_optional_f64(Some("NaN")), None);
        assert_eq!(parse_optional_f64(None), None);
    }

    #[test]
    fn ints() {
        assert_eq!(parse_optional_int(Some("42")), Some(42));
        assert_eq!(parse_optional_int(Some("4.2")), None);
    }
}
