//! Splitting of space- and comma-separated lists.
//!
//! Separators inside quotes, escapes and parentheses are ignored.

/// Split `text` on any of `separators`, honoring quotes and parentheses.
///
/// With `last` set, a trailing empty item is kept (`"a,"` gives `["a", ""]`).
pub fn split(text: &str, separators: &[char], last: bool) -> Vec<String> {
    let mut array = Vec::new();
    let mut current = String::new();
    let mut split_here = false;

    let mut depth = 0_usize;
    let mut quote: Option<char> = None;
    let mut escape = false;

    for letter in text.chars() {
        if escape {
            escape = false;
        } else if letter == '\\' {
            escape = true;
        } else if let Some(open) = quote {
            if letter == open {
                quote = None;
            }
        } else if letter == '"' || letter == '\'' {
            quote = Some(letter);
        } else if letter == '(' {
            depth = depth.saturating_add(1);
        } else if letter == ')' {
            depth = depth.saturating_sub(1);
        } else if depth == 0 && separators.contains(&letter) {
            split_here = true;
        }

        if split_here {
            if !current.is_empty() {
                array.push(current.trim().to_owned());
            }
            current.clear();
            split_here = false;
        } else {
            current.push(letter);
        }
    }

    if last || !current.is_empty() {
        array.push(current.trim().to_owned());
    }
    array
}

/// Split on whitespace: `margin` values, selector compounds.
pub fn space(text: &str) -> Vec<String> {
    split(text, &[' ', '\n', '\t'], false)
}

/// Split on commas: selector lists, transition lists.
pub fn comma(text: &str) -> Vec<String> {
    split(text, &[','], true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_ignores_nested_separators() {
        assert_eq!(
            comma("a, rgba(0, 0, 0, .5) 1s, \"x,y\""),
            vec!["a", "rgba(0, 0, 0, .5) 1s", "\"x,y\""]
        );
    }

    #[test]
    fn space_collapses_runs() {
        assert_eq!(space("  1px   solid\tred "), vec!["1px", "solid", "red"]);
    }
}
