use crate::geo::{Position, ViewportFit};

/// Hand-tuned views for the states where the network operates.
static STATE_VIEWS: &[(&str, ViewportFit)] = &[
    ("SP", ViewportFit { center: Position::new(-22.1, -47.9), zoom: 7 }),
    ("MG", ViewportFit { center: Position::new(-19.0, -44.0), zoom: 6 }),
    ("RJ", ViewportFit { center: Position::new(-22.9, -43.1), zoom: 8 }),
    ("ES", ViewportFit { center: Position::new(-20.3, -40.3), zoom: 8 }),
    ("GO", ViewportFit { center: Position::new(-16.7, -49.3), zoom: 7 }),
    ("DF", ViewportFit { center: Position::new(-15.8, -47.9), zoom: 10 }),
];

pub fn state_view(state: &str) -> Option<ViewportFit> {
    let code = state.trim();
    STATE_VIEWS
        .iter()
        .find(|(uf, _)| uf.eq_ignore_ascii_case(code))
        .map(|(_, view)| *view)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_and_unknown_states() {
        assert_eq!(state_view("df").map(|v| v.zoom), Some(10));
        assert!(state_view("BA").is_none());
    }
}
