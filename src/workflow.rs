
//! Split, list, and merge files, driving the classifier through a `Codec`.
//! Inputs are processed one after another, in the order they were passed.

use std::fmt;
use std::path::{Path, PathBuf};
use exr::meta::attribute::Text;
use crate::channel::{classify_channel, ChannelDescriptor};
use crate::codec::{Codec, InputContainer, OutputContainer, PixelMap};
use crate::diagnostic::{Diagnostic, Diagnostics};
use crate::error::{Error, Result, UnitResult};
use crate::group::{group_channels, output_header, split_per_channel, OutputGroup};
use crate::merge::MergeAssembler;
use crate::meta::Views;
use crate::naming::{decode_name, input_stem, TargetName};
use crate::options::{MergeOptions, SplitOptions};


/// One output that a split would produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerListing {

    /// The output base name, like `left.car`.
    pub base_name: String,

    /// The layer of the channels, or `None` for the default layer.
    pub layer: Option<Text>,

    /// The channel labels, sorted.
    pub channels: Vec<Text>,
}


/// Open an input, reporting incomplete files.
pub fn open_input<C: Codec>(codec: &C, path: &Path, diagnostics: &mut impl Diagnostics) -> Result<C::Input> {
    let input = codec.open_input(path)?;

    if !input.is_complete() {
        diagnostics.report(Diagnostic::IncompleteInput { input: input.path().to_path_buf() });
    }

    Ok(input)
}

fn classify_filtered(input: &impl InputContainer, options: &SplitOptions, diagnostics: &mut impl Diagnostics) -> Vec<ChannelDescriptor> {
    let header = input.header();

    header.channel_names()
        .filter(|name| options.accepts(name))
        .map(|name| classify_channel(header, name, diagnostics))
        .collect()
}

/// Write each layer of the input to a separate file in the output directory.
/// Returns the paths of all written files, in the order they were written.
pub fn split_file(
    codec: &impl Codec, path: &Path, options: &SplitOptions,
    diagnostics: &mut impl Diagnostics
) -> Result<Vec<PathBuf>>
{
    let input = open_input(codec, path, diagnostics)?;
    let channels = classify_filtered(&input, options, diagnostics);

    let groups = if options.split_channels { split_per_channel(channels) }
        else { group_channels(channels) };

    let stem = if options.prefix { input_stem(path) } else { None };
    let target = TargetName { per_channel: options.split_channels, input_stem: stem.as_deref() };

    let mut outputs = Vec::with_capacity(groups.len());

    for (index, group) in groups.iter().enumerate() {
        let file_name = group.target_file_name(target);
        log::info!("{}/{} - Saving {} channels to {}", index + 1, groups.len(), group.len(), file_name);

        let output_path = options.output_directory.join(&file_name);
        write_group(codec, &input, group, options, &output_path)?;
        outputs.push(output_path);
    }

    Ok(outputs)
}

fn write_group(
    codec: &impl Codec, input: &impl InputContainer, group: &OutputGroup,
    options: &SplitOptions, output_path: &Path
) -> UnitResult
{
    let plan = group.plan(options.output_shape());
    let header = output_header(input.header(), &plan)?;

    let mut pixels = PixelMap::new();
    for (name, source) in &plan {
        pixels.insert(name.clone(), input.read_channel(source)?);
    }

    codec.open_output(output_path, header)?.write_pixels(pixels)
}

/// Describe the layers of the input without writing anything.
/// Only the layer filter of the options is used.
pub fn list_file(
    codec: &impl Codec, path: &Path, options: &SplitOptions,
    diagnostics: &mut impl Diagnostics
) -> Result<Vec<LayerListing>>
{
    let input = open_input(codec, path, diagnostics)?;
    let channels = classify_filtered(&input, options, diagnostics);

    Ok(group_channels(channels).iter().map(LayerListing::from).collect())
}

/// Merge the files into one file. The last path is the output,
/// all other paths are inputs, of which there must be at least two.
/// The header of the first input is used as a template for the merged header.
pub fn merge_files(
    codec: &impl Codec, images: &[impl AsRef<Path>], options: &MergeOptions,
    diagnostics: &mut impl Diagnostics
) -> UnitResult
{
    let (output, inputs) = match images.split_last() {
        Some((output, inputs)) if inputs.len() >= 2 => (output.as_ref(), inputs),
        _ => return Err(Error::usage("merging requires at least two inputs and one output image")),
    };

    let views = Views::declare(options.views.iter().cloned());

    match &views {
        Views::None => {},
        Views::Single(view) => log::info!("Using view {}", decode_name(view)),
        Views::Multi(set) => log::info!(
            "Using views {}",
            set.iter().map(decode_name).collect::<Vec<_>>().join(", ")
        ),
    }

    let mut assembler: Option<MergeAssembler> = None;

    for (index, path) in inputs.iter().enumerate() {
        let path = path.as_ref();
        log::info!("{}/{} - Merging {}", index + 1, inputs.len(), path.display());

        let input = open_input(codec, path, diagnostics)?;
        let header = input.header();

        let pixels = header.channel_names()
            .map(|name| Ok((name.clone(), input.read_channel(name)?)))
            .collect::<Result<PixelMap>>()?;

        assembler.get_or_insert_with(|| MergeAssembler::new(header, views.clone()))
            .add_input(input.path(), header, pixels, diagnostics);
    }

    let (header, pixels) = assembler
        .ok_or_else(|| Error::usage("no inputs to merge"))?
        .finish();

    codec.open_output(output, header)?.write_pixels(pixels)
}


impl From<&OutputGroup> for LayerListing {
    fn from(group: &OutputGroup) -> Self {
        LayerListing {
            base_name: group.base_name().to_string(),
            layer: group.layer().cloned(),
            channels: group.sorted_labels(),
        }
    }
}

impl fmt::Display for LayerListing {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let channels: Vec<String> = self.channels.iter().map(decode_name).collect();
        write!(formatter, "Layer: {}, Channels: ({})", self.base_name, channels.join(","))
    }
}
