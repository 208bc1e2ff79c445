
//! Classify channels by their names.
//! Each channel name is decomposed into an optional view,
//! an optional (possibly nested) layer, and a channel label with a role.
//!
//! For example, in a file declaring the views `left` and `right`,
//! the channel `right.window.depth` belongs to the view `right`,
//! the layer `window`, and has the label `depth`, which is a data channel.

pub mod role;
pub mod view;
pub mod layer;

use exr::meta::attribute::Text;
use crate::diagnostic::Diagnostics;
use crate::meta::{HeaderMetadata, Views};

pub use self::role::{Role, classify_role, lookup_role, CHANNEL_ROLES};
pub use self::view::resolve_view;
pub use self::layer::resolve_layer;


/// The decomposition of one channel name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelDescriptor {

    /// The complete original channel name.
    pub full_name: Text,

    /// The view of the channel, if the file declares views.
    pub view: Option<Text>,

    /// The layer path, or `None` for the default layer.
    pub layer: Option<Text>,

    /// The last segment of the full name.
    /// Becomes the channel name inside a split output.
    pub label: Text,

    /// What the samples represent.
    pub role: Role,
}


/// Decompose a channel name of the specified header.
/// Never fails: ambiguous names are resolved by fallbacks, which are reported as diagnostics.
pub fn classify_channel(header: &HeaderMetadata, full_name: &Text, diagnostics: &mut impl Diagnostics) -> ChannelDescriptor {
    classify_with_views(&header.views, full_name, diagnostics)
}

/// Decompose a channel name, given only the view declaration.
pub fn classify_with_views(views: &Views, full_name: &Text, diagnostics: &mut impl Diagnostics) -> ChannelDescriptor {
    let view = resolve_view(views, full_name, diagnostics);
    let layer = resolve_layer(view.as_ref(), full_name);

    let (_, label) = layer::split_last_segment(full_name.as_slice());
    let label = Text::from_slice_unchecked(label);
    let role = classify_role(&label, diagnostics);

    ChannelDescriptor { full_name: full_name.clone(), view, layer, label, role }
}

/// Decompose all channels of the header, sorted by full name.
pub fn classify_channels(header: &HeaderMetadata, diagnostics: &mut impl Diagnostics) -> Vec<ChannelDescriptor> {
    header.channel_names()
        .map(|name| classify_channel(header, name, diagnostics))
        .collect()
}


#[cfg(test)]
mod test {
    use super::*;
    use crate::diagnostic::Diagnostic;
    use crate::meta::{BaseAttributes, PixelFormat};
    use exr::meta::attribute::SampleType;

    fn stereo_header(channels: &[&str]) -> HeaderMetadata {
        let views = Views::declare(vec![ Text::from("left"), Text::from("right") ]);

        channels.iter().fold(
            HeaderMetadata::new(BaseAttributes::new((2, 2))).with_views(views),
            |header, &name| header.with_channel(name, PixelFormat::new(SampleType::F16))
        )
    }

    fn descriptor(view: Option<&str>, layer: Option<&str>, label: &str, role: Role) -> (Option<Text>, Option<Text>, Text, Role) {
        (view.map(Text::from), layer.map(Text::from), Text::from(label), role)
    }

    fn parts(channel: &ChannelDescriptor) -> (Option<Text>, Option<Text>, Text, Role) {
        (channel.view.clone(), channel.layer.clone(), channel.label.clone(), channel.role)
    }

    #[test]
    fn stereo_channels(){
        let header = stereo_header(&["R", "car.R", "right.B", "right.window.depth"]);
        let mut diagnostics: Vec<Diagnostic> = Vec::new();

        let classify = |name: &str, diagnostics: &mut Vec<Diagnostic>|
            parts(&classify_channel(&header, &Text::from(name), diagnostics));

        assert_eq!(classify("R", &mut diagnostics), descriptor(Some("left"), None, "R", Role::Red));
        assert_eq!(classify("right.B", &mut diagnostics), descriptor(Some("right"), None, "B", Role::Blue));
        assert_eq!(classify("right.window.depth", &mut diagnostics), descriptor(Some("right"), Some("window"), "depth", Role::Data));
        assert!(diagnostics.is_empty(), "unexpected diagnostics {:?}", diagnostics);

        assert_eq!(classify("car.R", &mut diagnostics), descriptor(Some("left"), Some("car"), "R", Role::Red));
        assert_eq!(diagnostics.len(), 1, "car is not a declared view");
    }

    #[test]
    fn keeps_original_casing(){
        let header = HeaderMetadata::new(BaseAttributes::new((1, 1)))
            .with_channel("Beauty.Red", PixelFormat::new(SampleType::F32));

        let channel = classify_channel(&header, &Text::from("Beauty.Red"), &mut crate::diagnostic::IgnoreDiagnostics);
        assert_eq!(channel.label, Text::from("Red"));
        assert_eq!(channel.layer, Some(Text::from("Beauty")));
        assert_eq!(channel.role, Role::Red);
        assert_eq!(channel.view, None);
    }

    #[test]
    fn unknown_label_reported_once(){
        let header = HeaderMetadata::new(BaseAttributes::new((1, 1)));
        let mut diagnostics: Vec<Diagnostic> = Vec::new();

        let channel = classify_channel(&header, &Text::from("foobar"), &mut diagnostics);
        assert_eq!(channel.role, Role::Data);
        assert_eq!(channel.layer, None);
        assert_eq!(diagnostics, vec![ Diagnostic::UnknownChannel { channel: Text::from("foobar") } ]);
    }

    #[test]
    fn all_channels_sorted(){
        let header = stereo_header(&["right.R", "G", "B"]);
        let names: Vec<String> = classify_channels(&header, &mut crate::diagnostic::IgnoreDiagnostics)
            .into_iter().map(|channel| channel.full_name.to_string()).collect();

        assert_eq!(names, vec!["B", "G", "right.R"]);
    }
}
