use crate::vendor::{note, remove_note};

/// Which flexbox draft a prefix speaks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlexSpec {
    /// `display: box`, `box-pack`, `box-orient`.
    Old2009,
    /// `display: flexbox`, `flex-pack`, `flex-item-align`.
    Tweener2012,
    Final,
}

/// The draft behind a plan prefix and the bare vendor to write.
///
/// An explicit note wins (`final -moz-`, `-ms- 2012`); otherwise `-moz-`
/// means 2009, `-ms-` 2012 and `-webkit-` the final syntax.
pub fn flex_spec(prefix: &str) -> (Option<FlexSpec>, &str) {
    let vendor = remove_note(prefix);
    let spec = match note(prefix) {
        Some("2009") => Some(FlexSpec::Old2009),
        Some("2012") => Some(FlexSpec::Tweener2012),
        Some("final") => Some(FlexSpec::Final),
        _ => match vendor {
            "-moz-" => Some(FlexSpec::Old2009),
            "-ms-" => Some(FlexSpec::Tweener2012),
            "-webkit-" => Some(FlexSpec::Final),
            _ => None,
        },
    };
    (spec, vendor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notes_override_the_vendor_default() {
        assert_eq!(flex_spec("-webkit- 2009"), (Some(FlexSpec::Old2009), "-webkit-"));
        assert_eq!(flex_spec("-webkit-"), (Some(FlexSpec::Final), "-webkit-"));
        assert_eq!(flex_spec("final -moz-"), (Some(FlexSpec::Final), "-moz-"));
        assert_eq!(flex_spec("-moz-"), (Some(FlexSpec::Old2009), "-moz-"));
        assert_eq!(flex_spec("-ms-"), (Some(FlexSpec::Tweener2012), "-ms-"));
        assert_eq!(flex_spec("-o-"), (None, "-o-"));
    }
}
