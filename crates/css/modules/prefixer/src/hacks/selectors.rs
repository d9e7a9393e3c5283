//! Pseudo-classes and pseudo-elements whose prefixed names differ from the
//! standard ones.

use crate::handlers::SelectorHack;

pub struct Placeholder;

impl Placeholder {
    pub const NAMES: &[&str] = &["::placeholder"];
}

impl SelectorHack for Placeholder {
    fn extra_possible(&self) -> &'static [&'static str] {
        &["-moz- old", "-ms- old"]
    }

    fn prefixed(&self, _name: &str, prefix: &str) -> String {
        match prefix {
            "-webkit-" => "::-webkit-input-placeholder".to_owned(),
            "-ms-" => "::-ms-input-placeholder".to_owned(),
            "-ms- old" => ":-ms-input-placeholder".to_owned(),
            "-moz- old" => ":-moz-placeholder".to_owned(),
            _ => format!("::{prefix}placeholder"),
        }
    }
}

pub struct PlaceholderShown;

impl PlaceholderShown {
    pub const NAMES: &[&str] = &[":placeholder-shown"];
}

impl SelectorHack for PlaceholderShown {
    fn prefixed(&self, _name: &str, prefix: &str) -> String {
        match prefix {
            "-moz-" => ":-moz-placeholder".to_owned(),
            "-ms-" => ":-ms-input-placeholder".to_owned(),
            _ => format!(":{prefix}placeholder-shown"),
        }
    }
}

pub struct Fullscreen;

impl Fullscreen {
    pub const NAMES: &[&str] = &[":fullscreen"];
}

impl SelectorHack for Fullscreen {
    fn prefixed(&self, _name: &str, prefix: &str) -> String {
        match prefix {
            "-webkit-" => ":-webkit-full-screen".to_owned(),
            "-moz-" => ":-moz-full-screen".to_owned(),
            _ => format!(":{prefix}fullscreen"),
        }
    }
}

pub struct FileSelectorButton;

impl FileSelectorButton {
    pub const NAMES: &[&str] = &["::file-selector-button"];
}

impl SelectorHack for FileSelectorButton {
    fn prefixed(&self, _name: &str, prefix: &str) -> String {
        if prefix == "-webkit-" {
            "::-webkit-file-upload-button".to_owned()
        } else {
            format!("::{prefix}file-selector-button")
        }
    }
}

pub struct Autofill;

impl Autofill {
    pub const NAMES: &[&str] = &[":autofill"];
}

impl SelectorHack for Autofill {
    fn prefixed(&self, _name: &str, prefix: &str) -> String {
        if prefix == "-webkit-" {
            ":-webkit-autofill".to_owned()
        } else {
            format!(":{prefix}autofill")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_spellings() {
        assert_eq!(Placeholder.prefixed("::placeholder", "-moz-"), "::-moz-placeholder");
        assert_eq!(Placeholder.prefixed("::placeholder", "-moz- old"), ":-moz-placeholder");
        assert_eq!(
            Placeholder.prefixed("::placeholder", "-webkit-"),
            "::-webkit-input-placeholder"
        );
    }

    #[test]
    fn fullscreen_uses_the_old_name() {
        assert_eq!(Fullscreen.prefixed(":fullscreen", "-webkit-"), ":-webkit-full-screen");
        assert_eq!(Fullscreen.prefixed(":fullscreen", "-ms-"), ":-ms-fullscreen");
    }
}
