use regex::Regex;
use std::sync::OnceLock;

// 4 uppercase letters, 6-7 digits each optionally preceded by whitespace,
// then an optional dash-digit tail, also possibly whitespace-separated.
// Scanned PDFs routinely split the token across spaces and line breaks.
const CONTAINER_PATTERN: &str = r"[A-Z]{4}(?:\s*\d){6,7}(?:\s*-\s*\d)?";

fn container_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(CONTAINER_PATTERN).expect("container pattern compiles"))
}

/// Find the first container token in manifest text and normalize it by
/// deleting all interior whitespace. No match is not an error; the empty
/// string signals the absence to the operator.
pub fn find_container_id(text: &str) -> String {
    container_regex()
        .find(text)
        .map(|token| {
            token
                .as_str()
                .chars()
                .filter(|character| !character.is_whitespace())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::find_container_id;

    #[test]
    fn normalizes_embedded_whitespace() {
        let text = "Contenedor asignado: MSDU 1234567 salida 12/03/24";
        assert_eq!(find_container_id(text), "MSDU1234567");
    }

    #[test]
    fn keeps_dash_digit_tail() {
        let text = "Unidad TCLU 7 6 5 4 3 2 - 1 en patio";
        assert_eq!(find_container_id(text), "TCLU765432-1");
    }

    #[test]
    fn tolerates_line_breaks_inside_the_token() {
        let text = "MSDU\n123\n4567 registrado";
        assert_eq!(find_container_id(text), "MSDU1234567");
    }

    #[test]
    fn returns_first_match_only() {
        let text = "MSDU 1111111 luego TCLU 2222222";
        assert_eq!(find_container_id(text), "MSDU1111111");
    }

    #[test]
    fn empty_when_absent() {
        assert_eq!(find_container_id("sin contenedor en este registro"), "");
        assert_eq!(find_container_id(""), "");
    }
}
