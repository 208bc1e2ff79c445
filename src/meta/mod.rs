
//! Describes the meta data of a container, as far as splitting and merging is concerned.
//! The view declaration and the channel table are modelled explicitly,
//! all other attributes are passed through untouched.

pub mod projection;

use std::collections::BTreeMap;
use std::fmt;
use smallvec::SmallVec;
use exr::compression::Compression;
use exr::math::Vec2;
use exr::meta::attribute::{IntegerBounds, LineOrder, SampleType, Text};
use exr::meta::header::{ImageAttributes, LayerAttributes};

pub use self::projection::{project_header, PROVENANCE_COMMENT};


/// Maps the full name of each channel to its pixel format.
/// Sorted by name, which is also the order in which OpenEXR stores channels.
pub type ChannelTable = BTreeMap<Text, PixelFormat>;


/// The complete meta data of a single-part container.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderMetadata {

    /// Attributes that are not interpreted by the channel classifier.
    pub attributes: BaseAttributes,

    /// The `view` or `multiView` attribute, if any.
    pub views: Views,

    /// The `comments` attribute.
    pub comments: Option<Text>,

    /// All channels of the container.
    pub channels: ChannelTable,
}

/// Attributes that pass through splitting and merging without modification.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseAttributes {

    /// The resolution of the pixel data. All channels share this resolution,
    /// except for subsampled channels.
    pub size: Vec2<usize>,

    /// How the pixel data is compressed. Reused when writing outputs.
    pub compression: Compression,

    /// In which order the pixel blocks are stored.
    pub line_order: LineOrder,

    /// Attributes that are shared by all parts of a file, like the display window.
    pub image: ImageAttributes,

    /// Per-part attributes, like the owner or the capture date.
    /// The view, multi view and comments attributes are never stored here,
    /// see `HeaderMetadata::views` and `HeaderMetadata::comments`.
    pub layer: LayerAttributes,
}

/// The format of the samples of one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFormat {

    /// U32, F16 or F32.
    pub sample_type: SampleType,

    /// Whether lossy compression should quantize this channel linearly.
    pub quantize_linearly: bool,

    /// How many pixels share one sample, horizontally and vertically.
    pub sampling: Vec2<usize>,
}

/// Which views a container holds.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Views {

    /// The container does not distinguish views.
    #[default]
    None,

    /// The container is restricted to a single view.
    /// Every channel belongs to this view.
    Single(Text),

    /// The container holds multiple views.
    Multi(ViewSet),
}

/// An ordered, non-empty list of distinct view names.
/// The first view is the default view, whose channels have no view prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSet {
    views: SmallVec<[Text; 2]>,
}


impl HeaderMetadata {

    /// A header without views, comments, or channels.
    pub fn new(attributes: BaseAttributes) -> Self {
        HeaderMetadata {
            attributes,
            views: Views::None,
            comments: None,
            channels: ChannelTable::new(),
        }
    }

    /// Replace the view declaration.
    pub fn with_views(self, views: Views) -> Self {
        HeaderMetadata { views, ..self }
    }

    /// Add a channel, replacing any channel with the same name.
    pub fn with_channel(mut self, name: impl Into<Text>, format: PixelFormat) -> Self {
        self.channels.insert(name.into(), format);
        self
    }

    /// The full names of all channels, sorted.
    pub fn channel_names(&self) -> impl '_ + Iterator<Item = &Text> {
        self.channels.keys()
    }
}

impl BaseAttributes {

    /// Attributes for an image of the specified resolution,
    /// with the display window covering exactly the pixels.
    pub fn new(size: impl Into<Vec2<usize>>) -> Self {
        let size = size.into();

        BaseAttributes {
            size,
            compression: Compression::RLE,
            line_order: LineOrder::Increasing,
            image: ImageAttributes::new(IntegerBounds::from_dimensions(size)),
            layer: LayerAttributes::default(),
        }
    }
}

impl PixelFormat {

    /// Full resolution samples of the specified type.
    pub fn new(sample_type: SampleType) -> Self {
        PixelFormat {
            sample_type,
            quantize_linearly: false,
            sampling: Vec2(1, 1),
        }
    }

    /// The number of samples stored for an image of the specified resolution.
    pub fn sample_count(&self, size: Vec2<usize>) -> usize {
        let Vec2(x_sampling, y_sampling) = self.sampling;
        (size.0 / x_sampling.max(1)) * (size.1 / y_sampling.max(1))
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sample_type = match self.sample_type {
            SampleType::U32 => "UINT",
            SampleType::F16 => "HALF",
            SampleType::F32 => "FLOAT",
        };

        write!(formatter, "{} ({}, {})", sample_type, self.sampling.0, self.sampling.1)?;
        if self.quantize_linearly { write!(formatter, " linear")?; }
        Ok(())
    }
}

impl Views {

    /// Interpret the raw `view` and `multiView` attributes.
    /// A single view wins if both are present.
    /// An empty view list declares no views.
    pub fn from_attributes(view: Option<Text>, multi_view: Option<Vec<Text>>) -> Self {
        match (view, multi_view) {
            (Some(view), _) => Views::Single(view),
            (None, Some(views)) => ViewSet::new(views).map_or(Views::None, Views::Multi),
            (None, None) => Views::None,
        }
    }

    /// Declare views by name: no names declare no views,
    /// one name declares a single-view container,
    /// more names declare a multi-view container.
    pub fn declare(names: impl IntoIterator<Item = Text>) -> Self {
        match ViewSet::new(names) {
            None => Views::None,
            Some(set) if set.len() == 1 => Views::Single(set.views[0].clone()),
            Some(set) => Views::Multi(set),
        }
    }

    /// The view that unprefixed channels belong to.
    pub fn default_view(&self) -> Option<&Text> {
        match self {
            Views::None => None,
            Views::Single(view) => Some(view),
            Views::Multi(views) => Some(views.default_view()),
        }
    }

    /// Whether the name is exactly one of the declared views.
    pub fn is_declared(&self, name: &[u8]) -> bool {
        match self {
            Views::None => false,
            Views::Single(view) => view.as_slice() == name,
            Views::Multi(views) => views.contains(name),
        }
    }

    /// Whether no view is declared.
    pub fn is_none(&self) -> bool {
        matches!(self, Views::None)
    }
}

impl ViewSet {

    /// Removes duplicate views, keeping the first occurrence.
    /// Returns `None` if there are no views.
    pub fn new(views: impl IntoIterator<Item = Text>) -> Option<Self> {
        let mut distinct: SmallVec<[Text; 2]> = SmallVec::new();

        for view in views {
            if !distinct.contains(&view) {
                distinct.push(view);
            }
        }

        if distinct.is_empty() { None }
        else { Some(ViewSet { views: distinct }) }
    }

    /// The first view.
    pub fn default_view(&self) -> &Text {
        &self.views[0]
    }

    /// Find the declared view with exactly this name.
    pub fn find(&self, name: &[u8]) -> Option<&Text> {
        self.views.iter().find(|view| view.as_slice() == name)
    }

    /// Whether the name is exactly one of the views.
    pub fn contains(&self, name: &[u8]) -> bool {
        self.find(name).is_some()
    }

    /// All views, default view first.
    pub fn iter(&self) -> impl '_ + Iterator<Item = &Text> {
        self.views.iter()
    }

    /// Number of distinct views. Never zero.
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Always false, as a view set cannot be empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The raw list of names, as stored in the `multiView` attribute.
    pub fn to_vec(&self) -> Vec<Text> {
        self.views.to_vec()
    }
}
