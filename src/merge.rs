
//! Combine single-layer files into one multi-layer file.
//! The layer of each input is recovered from its file name,
//! which reverses the naming used when splitting.

use std::path::Path;
use exr::meta::attribute::Text;
use crate::codec::{PixelBuffer, PixelMap};
use crate::diagnostic::{Diagnostic, Diagnostics};
use crate::meta::{project_header, HeaderMetadata, PixelFormat, Views};
use crate::naming::DEFAULT_LAYER_NAME;


/// Collects the channels of all merge inputs into one header and one pixel map.
#[derive(Debug, Clone)]
pub struct MergeAssembler {
    header: HeaderMetadata,
    pixels: PixelMap,
}

/// The channel name inside the merged file, `{layer}.{channel}`,
/// or only the channel for an empty layer.
pub fn qualified_channel_name(layer: &str, channel: &Text) -> Text {
    if layer.is_empty() { return channel.clone(); }

    let mut bytes = Vec::with_capacity(layer.len() + 1 + channel.as_slice().len());
    bytes.extend_from_slice(layer.as_bytes());
    bytes.push(b'.');
    bytes.extend_from_slice(channel.as_slice());
    Text::from_slice_unchecked(&bytes)
}

/// The dot separated components of the file name, without the extension.
fn file_name_components(input: &Path) -> Vec<String> {
    let file_name = input.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let without_extension = match file_name.rfind('.') {
        Some(dot_index) => &file_name[.. dot_index],
        None => file_name.as_str(),
    };

    if without_extension.is_empty() { return Vec::new(); }
    without_extension.split('.').map(str::to_string).collect()
}


impl MergeAssembler {

    /// Start a merge, using the header of the first input as a template.
    /// The merged file declares the specified views.
    pub fn new(template: &HeaderMetadata, views: Views) -> Self {
        MergeAssembler {
            header: project_header(template).with_views(views),
            pixels: PixelMap::new(),
        }
    }

    /// The view declaration of the merged file.
    pub fn views(&self) -> &Views {
        &self.header.views
    }

    /// Find the layer that the channels of an input belong to, in the merged file.
    ///
    /// The file name components are used as the layer path, dropping
    /// a leading `default_layer`, and a trailing component naming the only channel of the input.
    /// If views are declared, the first component is the view.
    /// Inputs of the default view have no view prefix in the merged file.
    pub fn layer_designation(
        &self, input: &Path, input_header: &HeaderMetadata,
        diagnostics: &mut impl Diagnostics
    ) -> String
    {
        let mut components = file_name_components(input);

        if components.first().map(String::as_str) == Some(DEFAULT_LAYER_NAME) {
            components.remove(0);
        }

        let only_channel = match input_header.channels.len() {
            1 => input_header.channel_names().next(),
            _ => None,
        };

        let names_only_channel = match (only_channel, components.last()) {
            (Some(channel), Some(last)) => last.as_bytes() == channel.as_slice(),
            _ => false,
        };

        if names_only_channel { components.pop(); }

        if let Some(default_view) = self.header.views.default_view() {
            if let Some(first) = components.first().cloned() {
                let declared = self.header.views.is_declared(first.as_bytes());

                if !declared {
                    diagnostics.report(Diagnostic::MergeViewMismatch {
                        input: input.to_path_buf(),
                        component: first.clone(),
                        fallback: default_view.clone(),
                    });
                }

                if !declared || first.as_bytes() == default_view.as_slice() {
                    components.remove(0);
                }
            }
        }

        components.join(".")
    }

    /// Add one channel to the merged file.
    /// Replaces any channel with the same name that was added before.
    pub fn insert(&mut self, name: Text, format: PixelFormat, pixels: PixelBuffer) {
        self.header.channels.insert(name.clone(), format);
        self.pixels.insert(name, pixels);
    }

    /// Add all channels of an input, in the layer derived from its file name.
    /// Returns the layer the channels were put into.
    pub fn add_input(
        &mut self, input: &Path, input_header: &HeaderMetadata, mut pixels: PixelMap,
        diagnostics: &mut impl Diagnostics
    ) -> String
    {
        let layer = self.layer_designation(input, input_header, diagnostics);

        for (channel, format) in &input_header.channels {
            if let Some(samples) = pixels.remove(channel) {
                self.insert(qualified_channel_name(&layer, channel), *format, samples);
            }
        }

        layer
    }

    /// Number of channels in the merged file so far.
    pub fn channel_count(&self) -> usize {
        self.header.channels.len()
    }

    /// The merged header and all pixels.
    pub fn finish(self) -> (HeaderMetadata, PixelMap) {
        (self.header, self.pixels)
    }
}
