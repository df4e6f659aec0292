/// The delimiter found in the input
pub const INPUT_DELIMITER: char = ',';
/// What every input delimiter is turned into
pub const OUTPUT_DELIMITER: char = ';';
const OUTPUT_DELIMITER_STR: &str = ";";

const INPUT_BYTE: u8 = INPUT_DELIMITER as u8;
const OUTPUT_BYTE: u8 = OUTPUT_DELIMITER as u8;

/// Replaces every comma with a semicolon. The csv structure is ignored, commas inside quoted
/// fields are replaced too.
pub fn replace_delimiter(text: &str) -> String {
    text.replace(INPUT_DELIMITER, OUTPUT_DELIMITER_STR)
}

/// Same as [`replace_delimiter`] but in place over raw bytes, returns how many bytes were
/// replaced.
///
/// Safe on UTF-8 since `,` is ascii and can't appear inside a multi-byte sequence.
pub fn replace_delimiter_bytes(bytes: &mut [u8]) -> usize {
    let mut replaced = 0;
    for byte in bytes.iter_mut().filter(|b| **b == INPUT_BYTE) {
        *byte = OUTPUT_BYTE;
        replaced += 1;
    }
    replaced
}

pub fn count_delimiters(text: &str) -> usize {
    text.matches(INPUT_DELIMITER).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::{Fake, Faker};

    #[test]
    fn test_replace_simple_rows() {
        assert_eq!(replace_delimiter("a,b,c\n1,2,3\n"), "a;b;c\n1;2;3\n");
    }

    #[test]
    fn test_replace_is_not_csv_aware() {
        assert_eq!(
            replace_delimiter("name,quote\n\"Doe, John\",\"a,b\"\r\n"),
            "name;quote\n\"Doe; John\";\"a;b\"\r\n"
        );
    }

    #[test]
    fn test_existing_semicolons_are_kept() {
        assert_eq!(replace_delimiter("a;b,c;;,"), "a;b;c;;;");
    }

    #[test]
    fn test_no_commas() {
        assert_eq!(replace_delimiter("hello world\n"), "hello world\n");
        assert_eq!(replace_delimiter(""), "");
    }

    #[test]
    fn test_output_constants_agree() {
        assert_eq!(OUTPUT_DELIMITER_STR.chars().collect::<Vec<_>>(), [OUTPUT_DELIMITER]);
        assert_eq!(replace_delimiter(","), OUTPUT_DELIMITER_STR);
    }

    #[test]
    fn test_bytes_match_text() {
        let text = "é,ü,€\n,,";
        let mut bytes = text.as_bytes().to_vec();
        let replaced = replace_delimiter_bytes(&mut bytes);

        assert_eq!(replaced, count_delimiters(text));
        assert_eq!(String::from_utf8(bytes).unwrap(), replace_delimiter(text));
    }

    #[test]
    fn test_fuzz_substitution() {
        for _ in 0..50 {
            let fields: Vec<String> = (0..(1..20).fake::<usize>())
                .map(|_| Faker.fake::<String>())
                .collect();
            let text = fields.join(",");

            let res = replace_delimiter(&text);

            assert!(!res.contains(INPUT_DELIMITER));
            assert_eq!(res.chars().count(), text.chars().count());
            for (before, after) in text.chars().zip(res.chars()) {
                if before == INPUT_DELIMITER {
                    assert_eq!(after, OUTPUT_DELIMITER);
                } else {
                    assert_eq!(after, before);
                }
            }

            // once there are no commas left, another pass changes nothing
            assert_eq!(replace_delimiter(&res), res);
        }
    }
}
