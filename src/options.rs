
//! Configuration values for splitting and merging.

use std::path::PathBuf;
use exr::meta::attribute::Text;
use crate::group::OutputShape;


/// How to split a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOptions {

    /// Write every channel to its own file, instead of one file per layer.
    /// Data channels are then written as grayscale rgb images.
    pub split_channels: bool,

    /// Prepend the file name of the input to each output file name.
    pub prefix: bool,

    /// Only process channels whose full name starts with one of these prefixes.
    /// An empty list processes all channels.
    pub layer_filter: Vec<String>,

    /// The outputs are written into this directory.
    pub output_directory: PathBuf,
}

/// How to merge files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOptions {

    /// Treat the first file name component as one of these views.
    /// The first view is the default view.
    pub views: Vec<Text>,
}


impl Default for SplitOptions {
    fn default() -> Self {
        SplitOptions {
            split_channels: false,
            prefix: false,
            layer_filter: Vec::new(),
            output_directory: PathBuf::from("."),
        }
    }
}

impl SplitOptions {

    /// Write one file per channel.
    pub fn with_split_channels(self, split_channels: bool) -> Self {
        SplitOptions { split_channels, ..self }
    }

    /// Prepend the input file name to the output file names.
    pub fn with_prefix(self, prefix: bool) -> Self {
        SplitOptions { prefix, ..self }
    }

    /// Only process channels starting with one of the prefixes.
    pub fn with_layer_filter(self, prefixes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        SplitOptions { layer_filter: prefixes.into_iter().map(Into::into).collect(), ..self }
    }

    /// Write the outputs into this directory.
    pub fn with_output_directory(self, directory: impl Into<PathBuf>) -> Self {
        SplitOptions { output_directory: directory.into(), ..self }
    }

    /// Whether the channel passes the layer filter.
    pub fn accepts(&self, full_name: &Text) -> bool {
        self.layer_filter.is_empty() || self.layer_filter.iter()
            .any(|prefix| full_name.as_slice().starts_with(prefix.as_bytes()))
    }

    /// Per-channel outputs are grayscale images.
    pub fn output_shape(&self) -> OutputShape {
        if self.split_channels { OutputShape::Grayscale } else { OutputShape::AsIs }
    }
}

impl MergeOptions {

    /// Declare the views of the merged file.
    pub fn with_views(self, views: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        MergeOptions {
            views: views.into_iter()
                .map(|view| Text::from_slice_unchecked(view.as_ref().as_bytes()))
                .collect(),

            ..self
        }
    }
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn filter_by_prefix(){
        let options = SplitOptions::default().with_layer_filter(vec!["car", "right.window"]);

        assert!(options.accepts(&Text::from("car.R")));
        assert!(options.accepts(&Text::from("cargo.R")), "prefixes are not split at dots");
        assert!(options.accepts(&Text::from("right.window.Z")));
        assert!(!options.accepts(&Text::from("right.car.R")));
        assert!(SplitOptions::default().accepts(&Text::from("anything")));
    }

    #[test]
    fn shape_follows_split_mode(){
        assert_eq!(SplitOptions::default().output_shape(), OutputShape::AsIs);
        assert_eq!(SplitOptions::default().with_split_channels(true).output_shape(), OutputShape::Grayscale);
    }

    #[test]
    fn views_keep_order(){
        let options = MergeOptions::default().with_views(["right", "left"]);
        assert_eq!(options.views, vec![ Text::from("right"), Text::from("left") ]);
    }
}
