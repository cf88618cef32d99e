//! Text <-> Morse conversion.
//!
//! Characters inside a word are separated by a single space, words by
//! [`WORD_SEPARATOR`]. Characters outside the table are dropped when encoding
//! and unknown symbols are dropped when decoding; neither is an error.

/// Separator between encoded words.
pub const WORD_SEPARATOR: &str = " / ";
/// Separator between encoded characters of one word.
pub const CHAR_SEPARATOR: char = ' ';

const TABLE: [(char, &str); 51] = [
    ('A', ".-"),
    ('B', "-..."),
    ('C', "-.-."),
    ('D', "-.."),
    ('E', "."),
    ('F', "..-."),
    ('G', "--."),
    ('H', "...."),
    ('I', ".."),
    ('J', ".---"),
    ('K', "-.-"),
    ('L', ".-.."),
    ('M', "--"),
    ('N', "-."),
    ('O', "---"),
    ('P', ".--."),
    ('Q', "--.-"),
    ('R', ".-."),
    ('S', "..."),
    ('T', "-"),
    ('U', "..-"),
    ('V', "...-"),
    ('W', ".--"),
    ('X', "-..-"),
    ('Y', "-.--"),
    ('Z', "--.."),
    ('0', "-----"),
    ('1', ".----"),
    ('2', "..---"),
    ('3', "...--"),
    ('4', "....-"),
    ('5', "....."),
    ('6', "-...."),
    ('7', "--..."),
    ('8', "---.."),
    ('9', "----."),
    ('&', ".-..."),
    ('\'', ".----."),
    ('@', ".--.-."),
    (')', "-.--.-"),
    ('(', "-.--."),
    (':', "---..."),
    (',', "--..--"),
    ('=', "-...-"),
    ('!', "-.-.--"),
    ('.', ".-.-.-"),
    ('-', "-....-"),
    ('+', ".-.-."),
    ('"', ".-..-."),
    ('?', "..--.."),
    ('/', "-..-."),
];

/// Morse symbol for `c`, if it is in the alphabet. Lowercase letters map to
/// their uppercase symbol.
pub fn encode_char(c: char) -> Option<&'static str> {
    let c = c.to_ascii_uppercase();
    TABLE.iter().find(|(k, _)| *k == c).map(|(_, m)| *m)
}

/// Character for one Morse symbol.
pub fn decode_symbol(symbol: &str) -> Option<char> {
    TABLE.iter().find(|(_, m)| *m == symbol).map(|(c, _)| *c)
}

/// Encode one word, dropping unsupported characters. May return an empty string.
pub fn encode_word(word: &str) -> String {
    word.chars()
        .filter_map(encode_char)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn encode(text: &str) -> String {
    text.split(' ')
        .map(encode_word)
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(WORD_SEPARATOR)
}

pub fn decode(morse: &str) -> String {
    morse
        .split(WORD_SEPARATOR)
        .filter(|w| !w.trim().is_empty())
        .map(|w| {
            w.split(CHAR_SEPARATOR)
                .filter_map(|s| decode_symbol(s.trim()))
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encodes_instruction_text() {
        assert_eq!(encode("mov ax"), "-- --- ...- / .- -..-");
        assert_eq!(encode("HLT"), ".... .-.. -");
    }

    #[test]
    fn decodes_instruction_text() {
        assert_eq!(decode("-- --- ...- / .- -..-"), "MOV AX");
        assert_eq!(decode("-....- .----"), "-1");
    }

    #[test]
    fn unsupported_characters_are_dropped() {
        assert_eq!(encode("a#b"), ".- -...");
        assert_eq!(encode("### hi"), ".... ..");
        assert_eq!(decode(".- ...---... -..."), "AB");
    }

    #[test]
    fn spacing_collapses() {
        assert_eq!(decode(&encode("add   ax  ,  1")), "ADD AX , 1");
    }

    #[test]
    fn blank_input() {
        assert_eq!(encode(""), "");
        assert_eq!(decode(""), "");
        assert_eq!(decode("   "), "");
    }

    #[test]
    fn every_symbol_is_unique() {
        for (i, (c, m)) in TABLE.iter().enumerate() {
            assert_eq!(decode_symbol(m), Some(*c));
            assert!(TABLE[i + 1..].iter().all(|(c2, m2)| c2 != c && m2 != m));
        }
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(words in prop::collection::vec("[A-Za-z0-9,:.+-]{1,8}", 1..6)) {
            let text = words.join(" ");
            prop_assert_eq!(decode(&encode(&text)), text.to_uppercase());
        }
    }
}
