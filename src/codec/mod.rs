
//! The boundary to the binary container format.
//! Splitting and merging only see headers and flat pixel buffers,
//! decoding and encoding is left to the implementations of these traits.

pub mod openexr;

use std::collections::BTreeMap;
use std::path::Path;
use half::f16;
use exr::math::Vec2;
use exr::meta::attribute::{SampleType, Text};
use crate::error::{Result, UnitResult};
use crate::meta::{HeaderMetadata, PixelFormat};

pub use self::openexr::{ExrCodec, ExrInput, ExrOutput};


/// All samples of one channel, in row major order.
pub type PixelBuffer = exr::image::FlatSamples;

/// The samples of multiple channels, by channel name.
pub type PixelMap = BTreeMap<Text, PixelBuffer>;


/// Opens containers for reading and creates containers for writing.
pub trait Codec {

    /// A container opened for reading.
    type Input: InputContainer;

    /// A container opened for writing.
    type Output: OutputContainer;

    /// Whether the file exists and looks like a container of this format.
    fn is_valid_container(&self, path: &Path) -> bool;

    /// Open a container. Fails with `Error::NotContainer` if the file
    /// cannot be opened or is not in the format of this codec.
    fn open_input(&self, path: &Path) -> Result<Self::Input>;

    /// Prepare a container that will contain exactly the channels of the header.
    /// Nothing is written to the file system before the pixels are written.
    fn open_output(&self, path: &Path, header: HeaderMetadata) -> Result<Self::Output>;
}

/// A container opened for reading. The file is closed when this value is dropped.
pub trait InputContainer {

    /// Where the container was opened from.
    fn path(&self) -> &Path;

    /// False if some of the pixel data is missing,
    /// for example because the file is still being written.
    /// Pixels that could be decoded keep their values, missing pixels are read as zeroes.
    fn is_complete(&self) -> bool;

    /// The meta data of the container.
    fn header(&self) -> &HeaderMetadata;

    /// All samples of the channel with exactly this name.
    fn read_channel(&self, name: &Text) -> Result<PixelBuffer>;
}

/// A container prepared for writing.
pub trait OutputContainer {

    /// Write the samples of every channel declared in the header.
    /// Fails without creating a file if a channel is missing or has pixels of another format.
    /// Can only be called once.
    fn write_pixels(self, pixels: PixelMap) -> UnitResult;
}


/// Samples of the specified format, all zero.
pub fn zeroed_samples(format: PixelFormat, size: Vec2<usize>) -> PixelBuffer {
    let count = format.sample_count(size);

    match format.sample_type {
        SampleType::F16 => PixelBuffer::F16(vec![ f16::ZERO; count ]),
        SampleType::F32 => PixelBuffer::F32(vec![ 0.0; count ]),
        SampleType::U32 => PixelBuffer::U32(vec![ 0; count ]),
    }
}

/// The sample type of the buffer.
pub fn sample_type_of(samples: &PixelBuffer) -> SampleType {
    match samples {
        PixelBuffer::F16(_) => SampleType::F16,
        PixelBuffer::F32(_) => SampleType::F32,
        PixelBuffer::U32(_) => SampleType::U32,
    }
}

/// Number of samples in the buffer.
pub fn sample_count_of(samples: &PixelBuffer) -> usize {
    match samples {
        PixelBuffer::F16(samples) => samples.len(),
        PixelBuffer::F32(samples) => samples.len(),
        PixelBuffer::U32(samples) => samples.len(),
    }
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn zeroes_match_format(){
        let half = zeroed_samples(PixelFormat::new(SampleType::F16), Vec2(3, 2));
        assert_eq!(sample_type_of(&half), SampleType::F16);
        assert_eq!(sample_count_of(&half), 6);

        let mut subsampled = PixelFormat::new(SampleType::U32);
        subsampled.sampling = Vec2(2, 1);

        let samples = zeroed_samples(subsampled, Vec2(4, 2));
        assert_eq!(samples, PixelBuffer::U32(vec![ 0; 4 ]));
    }
}
