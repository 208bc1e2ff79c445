
//! Partition the channels of an input into the outputs they are written to,
//! and plan which channels each output contains.

use std::collections::BTreeMap;
use smallvec::SmallVec;
use exr::meta::attribute::Text;
use crate::channel::{ChannelDescriptor, Role};
use crate::error::{Error, Result};
use crate::meta::{project_header, HeaderMetadata};
use crate::naming::{output_base_name, target_file_name, TargetName};


/// Channels that are written to the same output file.
/// Never empty. All channels share the same base name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputGroup {
    base_name: String,
    channels: SmallVec<[ChannelDescriptor; 4]>,
}

/// How the channels of a group are arranged in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputShape {

    /// Every channel is written under its label.
    #[default]
    AsIs,

    /// The output is an rgb image.
    /// Data channels are copied into each of the `R`, `G`, and `B` channels,
    /// so that they can be viewed as a grayscale image.
    Grayscale,
}

/// Maps each channel of an output to the input channel its samples come from.
/// Multiple output channels may share the same source.
pub type OutputPlan = BTreeMap<Text, Text>;

/// The channels that data channels are copied into, for grayscale outputs.
pub const GRAYSCALE_CHANNELS: [&str; 3] = ["R", "G", "B"];


/// Group the channels by their output base name.
/// The groups are sorted by base name, and the channels in each group by full name,
/// so the result does not depend on the order of the input.
pub fn group_channels(channels: impl IntoIterator<Item = ChannelDescriptor>) -> Vec<OutputGroup> {
    let mut keyed: Vec<(String, ChannelDescriptor)> = channels.into_iter()
        .map(|channel| (output_base_name(&channel), channel))
        .collect();

    keyed.sort_by(|(base, channel), (other_base, other)|
        base.cmp(other_base).then_with(|| channel.full_name.cmp(&other.full_name))
    );

    let mut groups: Vec<OutputGroup> = Vec::new();

    for (base_name, channel) in keyed {
        match groups.last_mut() {
            Some(group) if group.base_name == base_name => group.channels.push(channel),
            _ => groups.push(OutputGroup::single(base_name, channel)),
        }
    }

    groups
}

/// Put every channel into its own group, keeping the input order.
pub fn split_per_channel(channels: impl IntoIterator<Item = ChannelDescriptor>) -> Vec<OutputGroup> {
    channels.into_iter()
        .map(|channel| OutputGroup::single(output_base_name(&channel), channel))
        .collect()
}


impl OutputGroup {

    fn single(base_name: String, channel: ChannelDescriptor) -> Self {
        OutputGroup { base_name, channels: smallvec::smallvec![ channel ] }
    }

    /// The output base name shared by all channels of this group.
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// The channels of this group. Never empty.
    pub fn channels(&self) -> &[ChannelDescriptor] {
        &self.channels
    }

    /// The first channel, which is used to name the output.
    pub fn first(&self) -> &ChannelDescriptor {
        &self.channels[0]
    }

    /// The layer shared by all channels of this group.
    pub fn layer(&self) -> Option<&Text> {
        self.first().layer.as_ref()
    }

    /// Number of channels. Never zero.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Always false, as a group cannot be empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The labels of all channels, sorted.
    pub fn sorted_labels(&self) -> Vec<Text> {
        let mut labels: Vec<Text> = self.channels.iter().map(|channel| channel.label.clone()).collect();
        labels.sort();
        labels
    }

    /// The file name of the output.
    pub fn target_file_name(&self, name: TargetName<'_>) -> String {
        target_file_name(self.first(), name)
    }

    /// Decide which input channel supplies each channel of the output.
    /// Channels with equal labels overwrite each other in full name order.
    pub fn plan(&self, shape: OutputShape) -> OutputPlan {
        let mut plan = OutputPlan::new();

        for channel in &self.channels {
            match (shape, channel.role) {
                (OutputShape::Grayscale, Role::Data) => {
                    for slot in GRAYSCALE_CHANNELS {
                        plan.insert(Text::from(slot), channel.full_name.clone());
                    }
                },

                _ => { plan.insert(channel.label.clone(), channel.full_name.clone()); },
            }
        }

        plan
    }
}

/// The header of an output, containing the planned channels
/// with the pixel format of their source channels.
pub fn output_header(input: &HeaderMetadata, plan: &OutputPlan) -> Result<HeaderMetadata> {
    let mut header = project_header(input);

    for (name, source) in plan {
        let format = input.channels.get(source)
            .ok_or_else(|| Error::MissingChannel(source.clone()))?;

        header.channels.insert(name.clone(), *format);
    }

    Ok(header)
}


#[cfg(test)]
mod test {
    use super::*;
    use crate::channel::classify_with_views;
    use crate::diagnostic::IgnoreDiagnostics;
    use crate::meta::{BaseAttributes, PixelFormat, Views};
    use exr::meta::attribute::SampleType;

    fn classify(views: &Views, names: &[&str]) -> Vec<ChannelDescriptor> {
        names.iter()
            .map(|&name| classify_with_views(views, &Text::from(name), &mut IgnoreDiagnostics))
            .collect()
    }

    fn qualified(groups: &[OutputGroup]) -> Vec<Vec<String>> {
        groups.iter()
            .map(|group| group.channels().iter()
                .map(|channel| format!("{}.{}", group.base_name(), channel.label))
                .collect()
            )
            .collect()
    }

    #[test]
    fn groups_by_base_name(){
        let stereo = Views::declare(vec![ Text::from("left"), Text::from("right") ]);
        let groups = group_channels(classify(&stereo, &["car.G", "window.G", "car.R"]));
        assert_eq!(qualified(&groups), vec![ vec!["left.car.G", "left.car.R"], vec!["left.window.G"] ]);

        let groups = group_channels(classify(&Views::None, &["car.window.G", "window.G", "car.R"]));
        assert_eq!(qualified(&groups), vec![ vec!["car.R"], vec!["car.window.G"], vec!["window.G"] ]);
    }

    #[test]
    fn default_layer_group(){
        let groups = group_channels(classify(&Views::None, &["R", "G", "car.R"]));
        let names: Vec<&str> = groups.iter().map(OutputGroup::base_name).collect();
        assert_eq!(names, vec!["car", "default_layer"]);
        assert_eq!(groups[1].sorted_labels(), vec![ Text::from("G"), Text::from("R") ]);
    }

    #[test]
    fn grouping_ignores_input_order(){
        let names = ["car.R", "B", "car.G", "window.Z", "G", "car.B", "R"];
        let expected = group_channels(classify(&Views::None, &names));

        let mut reversed = names;
        reversed.reverse();
        assert_eq!(group_channels(classify(&Views::None, &reversed)), expected);

        let total: usize = expected.iter().map(OutputGroup::len).sum();
        assert_eq!(total, names.len(), "every channel must be in exactly one group");
    }

    #[test]
    fn per_channel_keeps_order(){
        let groups = split_per_channel(classify(&Views::None, &["car.R", "B"]));
        assert_eq!(qualified(&groups), vec![ vec!["car.R"], vec!["default_layer.B"] ]);
    }

    #[test]
    fn grayscale_broadcasts_data(){
        let groups = split_per_channel(classify(&Views::None, &["window.depth", "window.R"]));

        let depth = groups[0].plan(OutputShape::Grayscale);
        let sources: Vec<(String, String)> = depth.iter().map(|(name, source)| (name.to_string(), source.to_string())).collect();
        assert_eq!(sources, vec![
            ("B".to_string(), "window.depth".to_string()),
            ("G".to_string(), "window.depth".to_string()),
            ("R".to_string(), "window.depth".to_string()),
        ]);

        let red = groups[1].plan(OutputShape::Grayscale);
        assert_eq!(red.len(), 1, "color channels are not broadcast");
    }

    #[test]
    fn as_is_keeps_labels(){
        let groups = group_channels(classify(&Views::None, &["window.depth", "window.R"]));
        let plan = groups[0].plan(OutputShape::AsIs);
        assert_eq!(plan.keys().cloned().collect::<Vec<_>>(), vec![ Text::from("R"), Text::from("depth") ]);
    }

    #[test]
    fn header_uses_source_format(){
        let input = HeaderMetadata::new(BaseAttributes::new((2, 2)))
            .with_channel("window.depth", PixelFormat::new(SampleType::F32));

        let groups = split_per_channel(classify(&Views::None, &["window.depth"]));
        let header = output_header(&input, &groups[0].plan(OutputShape::Grayscale)).unwrap();

        assert_eq!(header.channels.len(), 3);
        assert!(header.channels.values().all(|format| format.sample_type == SampleType::F32));
        assert!(header.comments.is_some(), "outputs are marked as processed");
    }

    #[test]
    fn header_rejects_unknown_source(){
        let input = HeaderMetadata::new(BaseAttributes::new((2, 2)));
        let groups = split_per_channel(classify(&Views::None, &["R"]));

        match output_header(&input, &groups[0].plan(OutputShape::AsIs)) {
            Err(Error::MissingChannel(name)) => assert_eq!(name, Text::from("R")),
            other => panic!("expected missing channel, got {:?}", other),
        }
    }
}
