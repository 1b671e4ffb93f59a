#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShortcutStyle {
    AltLetter,
    PlainLetter,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShortcutAction {
    CloseMenu,
    ScrollTo(&'static str),
    Navigate(&'static str),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyChord {
    pub key: String,
    pub code: String,
    pub alt: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl KeyChord {
    fn key_letter(&self) -> Option<char> {
        single_letter(&self.key)
    }

    /// Layout position rather than the typed character; macOS Option
    /// rewrites `key` (Option+H is "˙").
    fn code_letter(&self) -> Option<char> {
        single_letter(self.code.strip_prefix("Key")?)
    }
}

fn single_letter(value: &str) -> Option<char> {
    let mut chars = value.chars();
    let first = chars.next()?;
    if chars.next().is_some() || !first.is_ascii_alphabetic() {
        return None;
    }
    Some(first.to_ascii_lowercase())
}

pub fn is_editable_target(tag_name: &str, content_editable: bool) -> bool {
    content_editable
        || matches!(
            tag_name.to_ascii_uppercase().as_str(),
            "INPUT" | "TEXTAREA" | "SELECT"
        )
}

fn letter_destination(style: ShortcutStyle, letter: char) -> Option<ShortcutAction> {
    match (style, letter) {
        (ShortcutStyle::AltLetter, 'h') => Some(ShortcutAction::ScrollTo("home")),
        (ShortcutStyle::AltLetter, 'w') => Some(ShortcutAction::ScrollTo("work")),
        (ShortcutStyle::AltLetter, 'c') => Some(ShortcutAction::ScrollTo("contact")),
        (ShortcutStyle::PlainLetter, 'h') => Some(ShortcutAction::Navigate("/")),
        (ShortcutStyle::PlainLetter, 'w') => Some(ShortcutAction::Navigate("/#work")),
        (ShortcutStyle::PlainLetter, 'c') => Some(ShortcutAction::Navigate("/#contact")),
        _ => None,
    }
}

pub fn resolve(
    style: ShortcutStyle,
    chord: &KeyChord,
    focus_is_editable: bool,
    menu_open: bool,
) -> Option<ShortcutAction> {
    if chord.key == "Escape" {
        return menu_open.then_some(ShortcutAction::CloseMenu);
    }

    if focus_is_editable || chord.ctrl || chord.meta {
        return None;
    }

    let letter = match style {
        ShortcutStyle::AltLetter if chord.alt => chord.code_letter()?,
        ShortcutStyle::PlainLetter if !chord.alt => chord.key_letter()?,
        _ => return None,
    };
    letter_destination(style, letter)
}

#[cfg(test)]
mod tests {
    use super::*;

    impl KeyChord {
        fn plain(key: &str) -> Self {
            Self {
                key: key.to_string(),
                ..Self::default()
            }
        }

        fn alt(key: &str, code: &str) -> Self {
            Self {
                key: key.to_string(),
                code: code.to_string(),
                alt: true,
                ..Self::default()
            }
        }
    }

    #[test]
    fn plain_letters_navigate_case_insensitively() {
        let style = ShortcutStyle::PlainLetter;

        assert_eq!(
            resolve(style, &KeyChord::plain("H"), false, false),
            Some(ShortcutAction::Navigate("/"))
        );
        assert_eq!(
            resolve(style, &KeyChord::plain("w"), false, false),
            Some(ShortcutAction::Navigate("/#work"))
        );
        assert_eq!(resolve(style, &KeyChord::alt("w", "KeyW"), false, false), None);
    }

    #[test]
    fn alt_letters_scroll_in_page() {
        let style = ShortcutStyle::AltLetter;

        assert_eq!(
            resolve(style, &KeyChord::alt("c", "KeyC"), false, false),
            Some(ShortcutAction::ScrollTo("contact"))
        );
        assert_eq!(resolve(style, &KeyChord::plain("c"), false, false), None);
    }

    #[test]
    fn alt_letters_resolve_from_the_physical_key_on_macos() {
        let style = ShortcutStyle::AltLetter;

        for (typed, code, target) in [
            ("˙", "KeyH", "home"),
            ("∑", "KeyW", "work"),
            ("ç", "KeyC", "contact"),
        ] {
            assert_eq!(
                resolve(style, &KeyChord::alt(typed, code), false, false),
                Some(ShortcutAction::ScrollTo(target)),
                "Option+{code} typed {typed}"
            );
        }
        assert_eq!(resolve(style, &KeyChord::alt("h", "Digit1"), false, false), None);
    }

    #[test]
    fn letters_are_ignored_while_typing() {
        let typing = is_editable_target("textarea", false);
        assert!(typing);

        let chord = KeyChord::plain("h");
        assert_eq!(resolve(ShortcutStyle::PlainLetter, &chord, typing, false), None);
        assert!(is_editable_target("DIV", true));
        assert!(!is_editable_target("BUTTON", false));
    }

    #[test]
    fn browser_shortcuts_are_not_hijacked() {
        let chord = KeyChord {
            key: "w".to_string(),
            ctrl: true,
            ..KeyChord::default()
        };
        assert_eq!(resolve(ShortcutStyle::PlainLetter, &chord, false, false), None);
    }

    #[test]
    fn escape_closes_only_an_open_menu_even_while_typing() {
        let escape = KeyChord::plain("Escape");

        assert_eq!(
            resolve(ShortcutStyle::AltLetter, &escape, true, true),
            Some(ShortcutAction::CloseMenu)
        );
        assert_eq!(resolve(ShortcutStyle::AltLetter, &escape, false, false), None);
    }
}
