//! Parenthesized structure of `@supports` conditions.

/// Text runs and parenthesized groups, in source order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Piece {
    Text(String),
    Group(Vec<Piece>),
}

impl Piece {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Group(_) => None,
        }
    }
}

fn close(stack: &mut Vec<Vec<Piece>>) {
    if let Some(group) = stack.pop()
        && let Some(parent) = stack.last_mut()
    {
        parent.push(Piece::Group(group));
    }
}

/// Split `text` on parentheses. Every group is followed by a text run,
/// which may be empty.
pub fn parse(text: &str) -> Vec<Piece> {
    let mut stack = vec![vec![Piece::Text(String::new())]];
    for letter in text.chars() {
        match letter {
            '(' => stack.push(vec![Piece::Text(String::new())]),
            ')' if stack.len() > 1 => {
                close(&mut stack);
                if let Some(parent) = stack.last_mut() {
                    parent.push(Piece::Text(String::new()));
                }
            }
            _ => {
                if let Some(current) = stack.last_mut() {
                    match current.last_mut() {
                        Some(Piece::Text(run)) => run.push(letter),
                        _ => current.push(Piece::Text(letter.to_string())),
                    }
                }
            }
        }
    }
    while stack.len() > 1 {
        close(&mut stack);
    }
    stack.pop().unwrap_or_default()
}

pub fn stringify(pieces: &[Piece]) -> String {
    let mut out = String::new();
    for piece in pieces {
        match piece {
            Piece::Text(text) => out.push_str(text),
            Piece::Group(inner) => {
                out.push('(');
                out.push_str(&stringify(inner));
                out.push(')');
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_groups_print_back_unchanged() {
        let source = "(display: flex) and (not (display: grid))";
        let pieces = parse(source);
        assert_eq!(stringify(&pieces), source);
        assert_eq!(
            pieces.get(1),
            Some(&Piece::Group(vec![Piece::Text("display: flex".to_owned())]))
        );
    }

    #[test]
    fn unbalanced_input_does_not_lose_text() {
        assert_eq!(stringify(&parse("(a: b")), "(a: b)");
        assert_eq!(stringify(&parse("a) b")), "a) b");
    }
}
