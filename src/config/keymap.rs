//! Key notation parsing for command bindings

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Parse a key notation string into a KeyEvent
///
/// Supported formats:
/// - Single characters: "a", "H", ";", "0"
/// - Control keys: "<C-r>", "<C-s>"
/// - Alt keys: "<A-w>" or "<M-w>"
/// - Special keys: "<CR>", "<Esc>", "<Tab>", "<BS>", "<Space>"
/// - Function keys: "<F1>" through "<F12>"
pub fn parse_key_notation(s: &str) -> Option<KeyEvent> {
    let s = s.trim();

    if s.is_empty() {
        return None;
    }

    // Handle special notation <...>
    if s.starts_with('<') && s.ends_with('>') && s.len() > 2 {
        let inner = &s[1..s.len() - 1];
        return parse_special_notation(inner);
    }

    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(char_to_key_event(c)),
        _ => None,
    }
}

/// Parse special notation (content inside < >)
fn parse_special_notation(inner: &str) -> Option<KeyEvent> {
    let inner_lower = inner.to_lowercase();

    if let Some((prefix, key)) = inner_lower.split_once('-') {
        let mut chars = key.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            let modifiers = match prefix {
                "c" => KeyModifiers::CONTROL,
                "a" | "m" => KeyModifiers::ALT,
                "s" => return Some(KeyEvent::new(KeyCode::Char(c.to_ascii_uppercase()), KeyModifiers::SHIFT)),
                _ => return None,
            };
            return Some(KeyEvent::new(KeyCode::Char(c), modifiers));
        }
        return None;
    }

    // Function keys: <F1> through <F12>
    if let Some(n) = inner_lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
        if (1..=12).contains(&n) {
            return Some(KeyEvent::new(KeyCode::F(n), KeyModifiers::NONE));
        }
    }

    let code = match inner_lower.as_str() {
        "cr" | "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "bs" | "backspace" => KeyCode::Backspace,
        "del" | "delete" => KeyCode::Delete,
        "space" => KeyCode::Char(' '),
        _ => return None,
    };
    Some(KeyEvent::new(code, KeyModifiers::NONE))
}

/// Convert a single character to a KeyEvent
fn char_to_key_event(c: char) -> KeyEvent {
    // Uppercase letters need SHIFT modifier for proper matching
    if c.is_ascii_uppercase() {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::SHIFT)
    } else {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_alt() {
        let key = parse_key_notation("<A-w>").unwrap();
        assert_eq!(key.code, KeyCode::Char('w'));
        assert_eq!(key.modifiers, KeyModifiers::ALT);

        let key = parse_key_notation("<M-W>").unwrap();
        assert_eq!(key.code, KeyCode::Char('w'));
        assert_eq!(key.modifiers, KeyModifiers::ALT);
    }

    #[test]
    fn test_parse_control_and_shift() {
        let key = parse_key_notation("<C-t>").unwrap();
        assert_eq!(key.code, KeyCode::Char('t'));
        assert_eq!(key.modifiers, KeyModifiers::CONTROL);

        let key = parse_key_notation("<S-p>").unwrap();
        assert_eq!(key.code, KeyCode::Char('P'));
        assert_eq!(key.modifiers, KeyModifiers::SHIFT);
    }

    #[test]
    fn test_parse_single_char() {
        let key = parse_key_notation("H").unwrap();
        assert_eq!(key.code, KeyCode::Char('H'));
        assert_eq!(key.modifiers, KeyModifiers::SHIFT);
        assert!(parse_key_notation("ab").is_none());
        assert!(parse_key_notation("").is_none());
    }

    #[test]
    fn test_parse_named_and_function_keys() {
        assert_eq!(parse_key_notation("<CR>").unwrap().code, KeyCode::Enter);
        assert_eq!(parse_key_notation("<Space>").unwrap().code, KeyCode::Char(' '));
        assert_eq!(parse_key_notation("<F12>").unwrap().code, KeyCode::F(12));
        assert!(parse_key_notation("<F13>").is_none());
        assert!(parse_key_notation("<X-w>").is_none());
        assert!(parse_key_notation("<bogus>").is_none());
    }
}
