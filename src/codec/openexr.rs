
//! Read and write OpenEXR files using the `exr` crate.

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind};
use std::path::{Path, PathBuf};
use smallvec::SmallVec;
use exr::block::UncompressedBlock;
use exr::block::reader::ChunksReader;
use exr::image::{AnyChannel, AnyChannels, Blocks, Encoding, FlatSamples, Image, Layer};
use exr::image::write::WritableImage;
use exr::math::Vec2;
use exr::meta::MetaData;
use exr::meta::attribute::Text;
use exr::meta::header::Header;
use crate::error::{CodecError, Error, Result, UnitResult};
use crate::meta::{BaseAttributes, ChannelTable, HeaderMetadata, PixelFormat, Views};
use super::{sample_count_of, sample_type_of, zeroed_samples, Codec, InputContainer, OutputContainer, PixelBuffer, PixelMap};


/// Opens OpenEXR files. Only the first part of multi-part files is used.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExrCodec {

    /// Reject files with invalid attributes instead of skipping those attributes.
    pub pedantic: bool,
}

/// An OpenEXR file whose pixels have been decoded.
#[derive(Debug)]
pub struct ExrInput {
    path: PathBuf,
    header: HeaderMetadata,
    pixels: PixelMap,
    complete: bool,
}

/// An OpenEXR file that will be created when its pixels are written.
#[derive(Debug)]
pub struct ExrOutput {
    path: PathBuf,
    header: HeaderMetadata,
}


impl ExrCodec {

    /// Read only the meta data of all parts of the file.
    pub fn read_meta_data(&self, path: &Path) -> Result<MetaData> {
        if !self.is_valid_container(path) {
            return Err(Error::not_container(path, "file identifier missing"));
        }

        MetaData::read_from_file(path, self.pedantic).map_err(|error| match error {
            CodecError::NotSupported(message) => Error::NotSupported(message),
            other => Error::not_container(path, other.to_string()),
        })
    }
}

impl Codec for ExrCodec {
    type Input = ExrInput;
    type Output = ExrOutput;

    fn is_valid_container(&self, path: &Path) -> bool {
        File::open(path).ok()
            .and_then(|file| exr::meta::magic_number::is_exr(&mut BufReader::new(file)).ok())
            .unwrap_or(false)
    }

    fn open_input(&self, path: &Path) -> Result<ExrInput> {
        let meta_data = self.read_meta_data(path)?;

        let first = meta_data.headers.first()
            .ok_or_else(|| Error::not_container(path, "no headers"))?;

        if meta_data.headers.len() > 1 {
            log::warn!(
                "{} contains {} parts, only the first part is used",
                path.display(), meta_data.headers.len()
            );
        }

        if first.deep {
            return Err(Error::unsupported("deep data"));
        }

        let header = header_metadata(first);
        let (pixels, complete) = decode_first_part(path, first, &header, self.pedantic)?;

        Ok(ExrInput { path: path.to_path_buf(), header, pixels, complete })
    }

    fn open_output(&self, path: &Path, header: HeaderMetadata) -> Result<ExrOutput> {
        Ok(ExrOutput { path: path.to_path_buf(), header })
    }
}

impl InputContainer for ExrInput {
    fn path(&self) -> &Path { &self.path }
    fn is_complete(&self) -> bool { self.complete }
    fn header(&self) -> &HeaderMetadata { &self.header }

    fn read_channel(&self, name: &Text) -> Result<PixelBuffer> {
        let format = self.header.channels.get(name)
            .ok_or_else(|| Error::MissingChannel(name.clone()))?;

        Ok(match self.pixels.get(name) {
            Some(samples) => samples.clone(),
            None => zeroed_samples(*format, self.header.attributes.size),
        })
    }
}

impl OutputContainer for ExrOutput {
    fn write_pixels(self, mut pixels: PixelMap) -> UnitResult {
        let ExrOutput { path, header } = self;
        let attributes = &header.attributes;

        let channels = header.channels.iter()
            .map(|(name, format)| {
                let sample_data = pixels.remove(name)
                    .ok_or_else(|| Error::MissingChannel(name.clone()))?;

                let matches_format = sample_type_of(&sample_data) == format.sample_type
                    && sample_count_of(&sample_data) == format.sample_count(attributes.size);

                if !matches_format {
                    return Err(Error::MismatchedPixels(name.clone()));
                }

                Ok(AnyChannel {
                    name: name.clone(),
                    sample_data,
                    quantize_linearly: format.quantize_linearly,
                    sampling: format.sampling,
                })
            })
            .collect::<Result<SmallVec<[AnyChannel<FlatSamples>; 4]>>>()?;

        if !pixels.is_empty() {
            log::debug!("{} channels without a header entry are not written", pixels.len());
        }

        let encoding = Encoding {
            compression: attributes.compression,
            blocks: Blocks::ScanLines,
            line_order: attributes.line_order,
        };

        let layer = Layer::new(attributes.size, layer_attributes(&header), encoding, AnyChannels::sort(channels));
        let image = Image { attributes: attributes.image.clone(), layer_data: layer };

        let file = BufWriter::new(File::create(&path)?);

        if let Err(error) = image.write().to_buffered(file) {
            std::fs::remove_file(&path).ok();
            return Err(error.into());
        }

        Ok(())
    }
}


/// Lift views and comments out of the attributes of the first part.
fn header_metadata(header: &Header) -> HeaderMetadata {
    let mut layer = header.own_attributes.clone();
    let view = layer.view_name.take();
    let multi_view = layer.multi_view_names.take();
    let comments = layer.comments.take();

    let channels: ChannelTable = header.channels.list.iter()
        .map(|channel| (channel.name.clone(), PixelFormat {
            sample_type: channel.sample_type,
            quantize_linearly: channel.quantize_linearly,
            sampling: channel.sampling,
        }))
        .collect();

    HeaderMetadata {
        attributes: BaseAttributes {
            size: header.layer_size,
            compression: header.compression,
            line_order: header.line_order,
            image: header.shared_attributes.clone(),
            layer,
        },

        views: Views::from_attributes(view, multi_view),
        comments,
        channels,
    }
}

/// Put views and comments back into the layer attributes.
fn layer_attributes(header: &HeaderMetadata) -> exr::meta::header::LayerAttributes {
    let mut layer = header.attributes.layer.clone();
    layer.comments = header.comments.clone();

    match &header.views {
        Views::None => {},
        Views::Single(view) => layer.view_name = Some(view.clone()),
        Views::Multi(views) => layer.multi_view_names = Some(views.to_vec()),
    }

    layer
}

/// Decode the blocks of the first part one after another.
/// Blocks that are missing or cannot be decoded stay zero,
/// and the pixels are reported as incomplete.
fn decode_first_part(path: &Path, first: &Header, header: &HeaderMetadata, pedantic: bool) -> Result<(PixelMap, bool)> {
    let size = header.attributes.size;
    let mut pixels: PixelMap = header.channels.iter()
        .map(|(name, format)| (name.clone(), zeroed_samples(*format, size)))
        .collect();

    let file = BufReader::new(File::open(path)?);

    let chunks = match exr::block::read(file, pedantic).and_then(|reader| reader.all_chunks(pedantic)) {
        Ok(chunks) => chunks,

        Err(error) if is_missing_data(&error) => {
            log::debug!("reading the offset tables of {} failed: {}", path.display(), error);
            return Ok((pixels, false));
        },

        Err(error) => return Err(error.into()),
    };

    let meta_data = chunks.meta_data().clone();
    let mut complete = true;

    for chunk in chunks {
        let decoded = chunk.and_then(|chunk| UncompressedBlock::decompress_chunk(chunk, &meta_data, pedantic));

        let block = match decoded {
            Ok(block) => block,

            Err(error) if is_missing_data(&error) => {
                log::debug!("skipping a block of {}: {}", path.display(), error);
                complete = false;
                continue;
            },

            Err(error) => return Err(error.into()),
        };

        // other parts and smaller mip map levels are not split
        if block.index.layer != 0 || block.index.level != Vec2(0, 0) { continue; }

        insert_block(&mut pixels, first, &block)?;
    }

    Ok((pixels, complete))
}

/// Invalid bytes and early ends of the file, as they happen while a file is still being written.
fn is_missing_data(error: &CodecError) -> bool {
    match error {
        CodecError::Invalid(_) => true,
        CodecError::Io(error) => error.kind() == ErrorKind::UnexpectedEof,
        _ => false,
    }
}

/// Copy each line of the block to its position in the channel buffer.
fn insert_block(pixels: &mut PixelMap, header: &Header, block: &UncompressedBlock) -> UnitResult {
    let width = header.layer_size.0;

    for line in block.lines(&header.channels) {
        let channel = match header.channels.list.get(line.location.channel) {
            Some(channel) => channel,
            None => continue,
        };

        let Vec2(x_sampling, y_sampling) = channel.sampling;
        let Vec2(x, y) = line.location.position;

        let start = (y / y_sampling.max(1)) * (width / x_sampling.max(1)) + x / x_sampling.max(1);
        let range = start .. start + line.location.sample_count;

        match pixels.get_mut(&channel.name) {
            Some(FlatSamples::F16(samples)) => if let Some(slice) = samples.get_mut(range) { line.read_samples_into_slice(slice)?; },
            Some(FlatSamples::F32(samples)) => if let Some(slice) = samples.get_mut(range) { line.read_samples_into_slice(slice)?; },
            Some(FlatSamples::U32(samples)) => if let Some(slice) = samples.get_mut(range) { line.read_samples_into_slice(slice)?; },
            None => {},
        }
    }

    Ok(())
}


#[cfg(test)]
mod test {
    use super::*;
    use exr::meta::attribute::SampleType;

    #[test]
    fn attributes_round_trip(){
        let header = HeaderMetadata::new(BaseAttributes::new((4, 4)))
            .with_views(Views::declare(vec![ Text::from("left"), Text::from("right") ]));

        let mut with_comment = header.clone();
        with_comment.comments = Some(Text::from("hello"));

        let layer = layer_attributes(&with_comment);
        assert_eq!(layer.multi_view_names, Some(vec![ Text::from("left"), Text::from("right") ]));
        assert_eq!(layer.view_name, None);
        assert_eq!(layer.comments, Some(Text::from("hello")));
    }

    #[test]
    fn write_and_read(){
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("small.exr");
        let codec = ExrCodec::default();

        let header = HeaderMetadata::new(BaseAttributes::new((2, 2)))
            .with_views(Views::Single(Text::from("left")))
            .with_channel("car.R", PixelFormat::new(SampleType::F32));

        let mut pixels = PixelMap::new();
        pixels.insert(Text::from("car.R"), FlatSamples::F32(vec![ 0.0, 0.25, 0.5, 1.0 ]));

        codec.open_output(&path, header).unwrap().write_pixels(pixels).unwrap();
        assert!(codec.is_valid_container(&path));

        let input = codec.open_input(&path).unwrap();
        assert!(input.is_complete());
        assert_eq!(input.header().views, Views::Single(Text::from("left")));
        assert_eq!(input.header().attributes.size, exr::math::Vec2(2, 2));

        let samples = input.read_channel(&Text::from("car.R")).unwrap();
        assert_eq!(samples, FlatSamples::F32(vec![ 0.0, 0.25, 0.5, 1.0 ]));

        match input.read_channel(&Text::from("car.G")) {
            Err(Error::MissingChannel(name)) => assert_eq!(name, Text::from("car.G")),
            other => panic!("expected missing channel, got {:?}", other),
        }
    }

    #[test]
    fn missing_pixels_fail_the_write(){
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("missing.exr");

        let header = HeaderMetadata::new(BaseAttributes::new((1, 1)))
            .with_channel("R", PixelFormat::new(SampleType::F16));

        let output = ExrCodec::default().open_output(&path, header).unwrap();
        assert!(!path.exists(), "nothing is created before writing");

        assert!(matches!(output.write_pixels(PixelMap::new()), Err(Error::MissingChannel(_))));
        assert!(!path.exists(), "failed writes leave no file behind");
    }

    #[test]
    fn mismatched_pixels_fail_the_write(){
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("mismatched.exr");
        let codec = ExrCodec::default();

        let header = HeaderMetadata::new(BaseAttributes::new((2, 1)))
            .with_channel("R", PixelFormat::new(SampleType::F16));

        let mut wrong_type = PixelMap::new();
        wrong_type.insert(Text::from("R"), FlatSamples::F32(vec![ 0.0, 1.0 ]));

        let result = codec.open_output(&path, header.clone()).unwrap().write_pixels(wrong_type);
        assert!(matches!(result, Err(Error::MismatchedPixels(_))), "{:?}", result);

        let mut wrong_count = PixelMap::new();
        wrong_count.insert(Text::from("R"), zeroed_samples(PixelFormat::new(SampleType::F16), Vec2(3, 1)));

        let result = codec.open_output(&path, header).unwrap().write_pixels(wrong_count);
        assert!(matches!(result, Err(Error::MismatchedPixels(_))), "{:?}", result);
        assert!(!path.exists());
    }

    #[test]
    fn truncated_scan_lines_keep_decoded_pixels(){
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("partial.exr");
        let codec = ExrCodec::default();

        let mut attributes = BaseAttributes::new((16, 16));
        attributes.compression = exr::compression::Compression::Uncompressed;

        let header = HeaderMetadata::new(attributes).with_channel("Y", PixelFormat::new(SampleType::F32));
        let mut pixels = PixelMap::new();
        pixels.insert(Text::from("Y"), FlatSamples::F32(vec![ 0.5; 16 * 16 ]));
        codec.open_output(&path, header).unwrap().write_pixels(pixels).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[.. bytes.len() - 16]).unwrap();

        let input = codec.open_input(&path).unwrap();
        assert!(!input.is_complete());

        match input.read_channel(&Text::from("Y")).unwrap() {
            FlatSamples::F32(samples) => {
                assert_eq!(samples.len(), 16 * 16);
                assert_eq!(samples[0], 0.5, "the first line is intact");
                assert_eq!(samples[14 * 16], 0.5, "the second to last line is intact");
                assert_eq!(samples[16 * 16 - 1], 0.0, "the last line is missing");
            },

            other => panic!("expected f32 samples, got {:?}", other),
        }
    }

    #[test]
    fn missing_data_errors(){
        assert!(is_missing_data(&CodecError::Invalid("offset table".into())));
        assert!(is_missing_data(&CodecError::Io(std::io::ErrorKind::UnexpectedEof.into())));
        assert!(!is_missing_data(&CodecError::Io(std::io::ErrorKind::PermissionDenied.into())));
        assert!(!is_missing_data(&CodecError::NotSupported("deep data".into())));
    }

    #[test]
    fn rejects_other_files(){
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("notes.exr");
        std::fs::write(&path, b"not an image").unwrap();

        let codec = ExrCodec::default();
        assert!(!codec.is_valid_container(&path));
        assert!(matches!(codec.open_input(&path), Err(Error::NotContainer { .. })));
        assert!(matches!(codec.open_input(&directory.path().join("absent.exr")), Err(Error::NotContainer { .. })));
    }
}
