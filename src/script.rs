/// Returns true if `text` contains any character from the Arabic Unicode
/// blocks (Arabic, Arabic Supplement, Arabic Extended-A).
pub fn looks_arabic(text: &str) -> bool {
    text.chars().any(is_arabic_char)
}

fn is_arabic_char(c: char) -> bool {
    matches!(c,
        '\u{0600}'..='\u{06FF}' | '\u{0750}'..='\u{077F}' | '\u{08A0}'..='\u{08FF}')
}
