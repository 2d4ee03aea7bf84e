use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters escaped in query-string values.
///
/// Everything except ASCII alphanumerics and `- _ . ! ~ * ' ( )`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub(crate) fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_reserved() {
        assert_eq!(encode_component("a b&c=d"), "a%20b%26c%3Dd");
        assert_eq!(encode_component("50%"), "50%25");
        assert_eq!(encode_component("x,y/z?"), "x%2Cy%2Fz%3F");
    }

    #[test]
    fn test_encode_keeps_unreserved() {
        assert_eq!(encode_component("it's-(ok)_~*!."), "it's-(ok)_~*!.");
    }

    #[test]
    fn test_encode_utf8() {
        assert_eq!(encode_component("café"), "caf%C3%A9");
    }
}
