
//! Find out which view a channel belongs to.

use exr::meta::attribute::Text;
use crate::diagnostic::{Diagnostic, Diagnostics};
use crate::meta::Views;
use super::layer::first_segment;


/// Determine the view of a channel from its full name.
///
/// A single-view header puts every channel into that view.
/// In a multi-view header, the first name segment selects the view.
/// Names without a view prefix belong to the default view.
/// A prefix that is not a declared view is reported, and the default view is used.
/// Without a view declaration, no channel has a view.
pub fn resolve_view(views: &Views, full_name: &Text, diagnostics: &mut impl Diagnostics) -> Option<Text> {
    match views {
        Views::None => None,
        Views::Single(view) => Some(view.clone()),

        Views::Multi(set) => {
            let name = full_name.as_slice();
            let default = set.default_view();

            match first_segment(name) {
                None if !set.contains(name) => Some(default.clone()),

                Some(candidate) if !set.contains(candidate) => {
                    diagnostics.report(Diagnostic::UndeclaredView {
                        full_name: full_name.clone(),
                        fallback: default.clone(),
                    });

                    Some(default.clone())
                },

                Some(candidate) => Some(Text::from_slice_unchecked(candidate)),
                None => Some(full_name.clone()),
            }
        }
    }
}
