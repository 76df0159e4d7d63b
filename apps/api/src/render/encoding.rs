//! WinAnsi encoding for the base-14 fonts.
//!
//! Characters outside the code page become `?`. Bengali digits are folded to
//! ASCII digits so dates and edition numbers stay readable.

const REPLACEMENT: u8 = b'?';

pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(|c| win_ansi_byte(c).unwrap_or(REPLACEMENT)).collect()
}

/// Number of characters in `text` that have no WinAnsi code.
pub fn count_unmappable(text: &str) -> usize {
    text.chars().filter(|c| win_ansi_byte(*c).is_none()).count()
}

fn win_ansi_byte(c: char) -> Option<u8> {
    let byte = match c {
        ' '..='~' => c as u8,
        '\t' | '\n' | '\r' => b' ',
        '\u{a0}'..='\u{ff}' => c as u32 as u8,
        '\u{09e6}'..='\u{09ef}' => b'0' + (c as u32 - 0x09e6) as u8,
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8a,
        '‹' => 0x8b,
        'Œ' => 0x8c,
        'Ž' => 0x8e,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9a,
        '›' => 0x9b,
        'œ' => 0x9c,
        'ž' => 0x9e,
        'Ÿ' => 0x9f,
        _ => return None,
    };
    Some(byte)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_passes_through() {
        assert_eq!(encode_win_ansi("Dhaka 2024"), b"Dhaka 2024".to_vec());
    }

    #[test]
    fn test_latin1_and_punctuation() {
        assert_eq!(encode_win_ansi("café"), vec![b'c', b'a', b'f', 0xe9]);
        assert_eq!(encode_win_ansi("“—”"), vec![0x93, 0x97, 0x94]);
    }

    #[test]
    fn test_bengali_digits_fold_to_ascii() {
        assert_eq!(encode_win_ansi("২০২৪"), b"2024".to_vec());
    }

    #[test]
    fn test_unmappable_replaced() {
        assert_eq!(encode_win_ansi("ক"), vec![b'?']);
        assert_eq!(count_unmappable("কখ a ১"), 2);
    }
}
