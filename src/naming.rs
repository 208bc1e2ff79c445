
//! Derive output file names from channel descriptors.

use std::path::Path;
use exr::meta::attribute::Text;
use crate::channel::ChannelDescriptor;


/// The base name of outputs that contain channels without view and layer.
pub const DEFAULT_LAYER_NAME: &str = "default_layer";

/// The extension of every output file.
pub const EXTENSION: &str = "exr";


/// Decode a channel, layer, or view name, which OpenEXR stores as UTF-8 bytes.
/// Invalid sequences are replaced, so the result is always a valid file name component.
pub fn decode_name(name: &Text) -> String {
    String::from_utf8_lossy(name.as_slice()).into_owned()
}

/// The view and layer of the channel, joined by a dot,
/// or `default_layer` if the channel has neither.
/// Channels with equal base names are written to the same output.
pub fn output_base_name(channel: &ChannelDescriptor) -> String {
    let components: Vec<String> = channel.view.iter()
        .chain(channel.layer.iter())
        .map(decode_name)
        .collect();

    if components.is_empty() { DEFAULT_LAYER_NAME.to_string() }
    else { components.join(".") }
}

/// How the file name of an output is composed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TargetName<'s> {

    /// Append the channel label, for outputs that contain a single channel.
    pub per_channel: bool,

    /// Prepend the file stem of the input, separated by an underscore.
    pub input_stem: Option<&'s str>,
}

/// The file name of the output that receives this channel,
/// for example `left.car.exr`, `left.car.R.exr`, or `beauty_left.car.exr`.
pub fn target_file_name(channel: &ChannelDescriptor, name: TargetName<'_>) -> String {
    let base = output_base_name(channel);

    let file_name = if name.per_channel { format!("{}.{}.{}", base, decode_name(&channel.label), EXTENSION) }
        else { format!("{}.{}", base, EXTENSION) };

    match name.input_stem {
        Some(stem) => format!("{}_{}", stem, file_name),
        None => file_name,
    }
}

/// The file name of the input, without directories and without the extension.
/// Returns `None` for paths without a file name.
pub fn input_stem(path: &Path) -> Option<String> {
    path.file_stem().map(|stem| stem.to_string_lossy().into_owned())
}


#[cfg(test)]
mod test {
    use super::*;
    use crate::channel::classify_with_views;
    use crate::diagnostic::IgnoreDiagnostics;
    use crate::meta::Views;

    fn stereo(name: &str) -> ChannelDescriptor {
        let views = Views::declare(vec![ Text::from("left"), Text::from("right") ]);
        classify_with_views(&views, &Text::from(name), &mut IgnoreDiagnostics)
    }

    fn plain(name: &str) -> ChannelDescriptor {
        classify_with_views(&Views::None, &Text::from(name), &mut IgnoreDiagnostics)
    }

    #[test]
    fn base_names(){
        assert_eq!(output_base_name(&stereo("car.G")), "left.car");
        assert_eq!(output_base_name(&plain("window.depth")), "window");
        assert_eq!(output_base_name(&stereo("right.window.depth")), "right.window");
        assert_eq!(output_base_name(&stereo("R")), "left");
        assert_eq!(output_base_name(&plain("R")), "default_layer");
    }

    #[test]
    fn file_names(){
        let channel = stereo("right.window.depth");

        assert_eq!(target_file_name(&channel, TargetName::default()), "right.window.exr");
        assert_eq!(target_file_name(&channel, TargetName { per_channel: true, input_stem: None }), "right.window.depth.exr");

        assert_eq!(
            target_file_name(&channel, TargetName { per_channel: true, input_stem: Some("shot010") }),
            "shot010_right.window.depth.exr"
        );
    }

    #[test]
    fn utf8_names(){
        let layer = Text::from_slice_unchecked("café.R".as_bytes());
        let channel = classify_with_views(&Views::None, &layer, &mut IgnoreDiagnostics);
        assert_eq!(output_base_name(&channel), "café");

        let label = Text::from_slice_unchecked("window.tiefe_ß".as_bytes());
        let channel = classify_with_views(&Views::None, &label, &mut IgnoreDiagnostics);
        assert_eq!(target_file_name(&channel, TargetName { per_channel: true, input_stem: None }), "window.tiefe_ß.exr");

        assert_eq!(decode_name(&Text::from_slice_unchecked(&[ b'a', 0xff ])), "a\u{fffd}");
    }

    #[test]
    fn stems(){
        assert_eq!(input_stem(Path::new("renders/shot010.exr")), Some("shot010".to_string()));
        assert_eq!(input_stem(Path::new("renders/shot.010.exr")), Some("shot.010".to_string()));
        assert_eq!(input_stem(Path::new("/")), None);
    }
}
