//! Feature quirks, registered by every name they answer to.
//!
//! Names shared by two hacks (`box-direction`) resolve to the one
//! registered last.

pub mod declarations;
pub mod flex_spec;
pub mod flexbox;
pub mod gradient;
pub mod grid;
pub mod grid_areas;
pub mod grid_utils;
pub mod selectors;
pub mod values;

use crate::handlers::{declaration, selector, value};
use crate::handlers::{DeclarationHack, SelectorHack, ValueHack};
use declarations::*;
use flexbox::*;
use grid::*;
use once_cell::sync::Lazy;
use selectors::*;
use std::collections::HashMap;
use values::*;

type Registry<T> = HashMap<&'static str, &'static T>;

fn register<T: ?Sized>(registry: &mut Registry<T>, names: &[&'static str], hack: &'static T) {
    for name in names {
        registry.insert(name, hack);
    }
}

static DECLARATIONS: Lazy<Registry<dyn DeclarationHack>> = Lazy::new(|| {
    let mut registry: Registry<dyn DeclarationHack> = HashMap::new();
    register(&mut registry, Flex::NAMES, &Flex);
    register(&mut registry, Order::NAMES, &Order);
    register(&mut registry, Filter::NAMES, &Filter);
    register(&mut registry, GridEnd::NAMES, &GridEnd);
    register(&mut registry, Animation::NAMES, &Animation);
    register(&mut registry, FlexFlow::NAMES, &FlexFlow);
    register(&mut registry, FlexGrow::NAMES, &FlexGrow);
    register(&mut registry, FlexWrap::NAMES, &FlexWrap);
    register(&mut registry, GridArea::NAMES, &GridArea);
    register(&mut registry, PlaceSelf::NAMES, &PlaceSelf);
    register(&mut registry, GridStart::NAMES, &GridStart);
    register(&mut registry, AlignSelf::NAMES, &AlignSelf);
    register(&mut registry, Appearance::NAMES, &Appearance);
    register(&mut registry, FlexBasis::NAMES, &FlexBasis);
    register(&mut registry, MaskBorder::NAMES, &MaskBorder);
    register(&mut registry, MaskComposite::NAMES, &MaskComposite);
    register(&mut registry, AlignItems::NAMES, &AlignItems);
    register(&mut registry, UserSelect::NAMES, &UserSelect);
    register(&mut registry, FlexShrink::NAMES, &FlexShrink);
    register(&mut registry, BreakProps::NAMES, &BreakProps);
    register(&mut registry, WritingMode::NAMES, &WritingMode);
    register(&mut registry, BorderImage::NAMES, &BorderImage);
    register(&mut registry, AlignContent::NAMES, &AlignContent);
    register(&mut registry, BorderRadius::NAMES, &BorderRadius);
    register(&mut registry, BlockLogical::NAMES, &BlockLogical);
    register(&mut registry, GridTemplate::NAMES, &GridTemplate);
    register(&mut registry, InlineLogical::NAMES, &InlineLogical);
    register(&mut registry, GridRowAlign::NAMES, &GridRowAlign);
    register(&mut registry, TransformDecl::NAMES, &TransformDecl);
    register(&mut registry, FlexDirection::NAMES, &FlexDirection);
    register(&mut registry, ImageRendering::NAMES, &ImageRendering);
    register(&mut registry, BackdropFilter::NAMES, &BackdropFilter);
    register(&mut registry, BackgroundClip::NAMES, &BackgroundClip);
    register(&mut registry, TextDecoration::NAMES, &TextDecoration);
    register(&mut registry, JustifyContent::NAMES, &JustifyContent);
    register(&mut registry, BackgroundSize::NAMES, &BackgroundSize);
    register(&mut registry, GridRowColumn::NAMES, &GridRowColumn);
    register(&mut registry, GridRowsColumns::NAMES, &GridRowsColumns);
    register(&mut registry, GridColumnAlign::NAMES, &GridColumnAlign);
    register(&mut registry, PrintColorAdjust::NAMES, &PrintColorAdjust);
    register(&mut registry, OverscrollBehavior::NAMES, &OverscrollBehavior);
    register(&mut registry, GridTemplateAreas::NAMES, &GridTemplateAreas);
    register(&mut registry, TextEmphasisPosition::NAMES, &TextEmphasisPosition);
    register(&mut registry, TextDecorationSkipInk::NAMES, &TextDecorationSkipInk);
    registry
});

static VALUES: Lazy<Registry<dyn ValueHack>> = Lazy::new(|| {
    let mut registry: Registry<dyn ValueHack> = HashMap::new();
    register(&mut registry, gradient::Gradient::NAMES, &gradient::Gradient);
    register(&mut registry, Intrinsic::NAMES, &Intrinsic);
    register(&mut registry, Pixelated::NAMES, &Pixelated);
    register(&mut registry, ImageSet::NAMES, &ImageSet);
    register(&mut registry, CrossFade::NAMES, &CrossFade);
    register(&mut registry, DisplayFlex::NAMES, &DisplayFlex);
    register(&mut registry, DisplayGrid::NAMES, &DisplayGrid);
    register(&mut registry, FilterValue::NAMES, &FilterValue);
    registry
});

static SELECTORS: Lazy<Registry<dyn SelectorHack>> = Lazy::new(|| {
    let mut registry: Registry<dyn SelectorHack> = HashMap::new();
    register(&mut registry, Fullscreen::NAMES, &Fullscreen);
    register(&mut registry, Placeholder::NAMES, &Placeholder);
    register(&mut registry, PlaceholderShown::NAMES, &PlaceholderShown);
    register(&mut registry, FileSelectorButton::NAMES, &FileSelectorButton);
    register(&mut registry, Autofill::NAMES, &Autofill);
    registry
});

/// The declaration quirk for an unprefixed property name.
pub fn declaration(name: &str) -> &'static dyn DeclarationHack {
    DECLARATIONS.get(name).copied().unwrap_or(&declaration::Plain)
}

/// The value quirk for a value feature name.
pub fn value(name: &str) -> &'static dyn ValueHack {
    VALUES.get(name).copied().unwrap_or(&value::Plain)
}

/// The selector quirk for a selector feature name.
pub fn selector(name: &str) -> &'static dyn SelectorHack {
    SELECTORS.get(name).copied().unwrap_or(&selector::Plain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_registrations_win() {
        assert_eq!(declaration("box-direction").normalize("box-direction"), "flex-direction");
        assert_eq!(declaration("flex-item-align").normalize("flex-item-align"), "align-self");
    }

    #[test]
    fn unknown_names_fall_back_to_plain() {
        assert_eq!(declaration("color").prefixed("color", "-webkit-"), "-webkit-color");
        assert_eq!(selector("::selection").prefixed("::selection", "-moz-"), "::-moz-selection");
    }
}
