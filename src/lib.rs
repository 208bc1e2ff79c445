
//! Split multi-layer, multi-view OpenEXR files into single-layer, single-view files,
//! and merge such files back into one file.
//!
//! The channel names of a file are decomposed into view, layer, and channel label
//! (see the `channel` module). Channels of the same view and layer are grouped
//! into one output (see the `group` module), which is named after its view and layer
//! (see the `naming` module). Merging reverses this naming (see the `merge` module).
//!
//! Reading and writing files is done through the `codec` module,
//! which uses the `exr` crate.
//!
//! ```no_run
//! use exrsplit::prelude::*;
//! use std::path::Path;
//!
//! let options = SplitOptions::default().with_output_directory("layers");
//! let outputs = split_file(&ExrCodec::default(), Path::new("render.exr"), &options, &mut LogDiagnostics)
//!     .expect("splitting failed");
//!
//! println!("wrote {} files", outputs.len());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod diagnostic;
pub mod meta;
pub mod channel;
pub mod naming;
pub mod group;
pub mod merge;
pub mod codec;
pub mod options;
pub mod workflow;


/// Export the most important items from `exrsplit`.
/// _Note: This includes a type called `Result`, possibly overwriting the default `std::Result` type usage._
pub mod prelude {

    // main operations
    pub use crate::workflow::{split_file, list_file, merge_files, LayerListing};
    pub use crate::options::{SplitOptions, MergeOptions};
    pub use crate::codec::{Codec, InputContainer, OutputContainer, ExrCodec, PixelBuffer, PixelMap};

    // core data types
    pub use crate::channel::{classify_channel, ChannelDescriptor, Role};
    pub use crate::group::{group_channels, split_per_channel, OutputGroup, OutputShape};
    pub use crate::meta::{HeaderMetadata, PixelFormat, Views, ViewSet, project_header};
    pub use crate::merge::MergeAssembler;
    pub use crate::naming::{decode_name, output_base_name, target_file_name};

    // secondary data types
    pub use crate::diagnostic::{Diagnostic, Diagnostics, LogDiagnostics, IgnoreDiagnostics};
    pub use crate::error::{Error, Result, UnitResult};

    // re-export external stuff
    pub use exr::meta::attribute::Text;
}
