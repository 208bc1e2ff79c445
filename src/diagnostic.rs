
//! Non-fatal events that happen while resolving channel names.
//! The core never prints anything, it only reports to a `Diagnostics` sink.

use std::fmt;
use std::path::PathBuf;
use exr::meta::attribute::Text;
use crate::naming::decode_name;


/// An informational event. Each one has a documented fallback,
/// so processing always continues after it was reported.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {

    /// The last segment of a channel name is not in the channel type table.
    /// The channel is treated as data.
    UnknownChannel {

        /// The unrecognized last segment, with original casing.
        channel: Text,
    },

    /// The first segment of a channel name in a multi-view file
    /// is not one of the declared views. The channel is put into the default view.
    UndeclaredView {

        /// The complete channel name.
        full_name: Text,

        /// The default view that was used instead.
        fallback: Text,
    },

    /// The first component of a merge input file name is not one of the requested views.
    /// The input is treated as part of the default view.
    MergeViewMismatch {

        /// The merge input.
        input: PathBuf,

        /// The first file name component, which was expected to be a view.
        component: String,

        /// The default view that was used instead.
        fallback: Text,
    },

    /// The container could be opened, but not all of its pixels are present.
    IncompleteInput {

        /// The affected file.
        input: PathBuf,
    },
}

/// Receives the diagnostics of an operation.
pub trait Diagnostics {

    /// Called once for each event, in the order of discovery.
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Collects all diagnostics, for inspecting them later.
impl Diagnostics for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Forwards to another sink.
impl<D: Diagnostics + ?Sized> Diagnostics for &mut D {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic)
    }
}

/// Discards all diagnostics.
#[derive(Debug, Default, Clone, Copy)]
pub struct IgnoreDiagnostics;

impl Diagnostics for IgnoreDiagnostics {
    fn report(&mut self, _: Diagnostic) {}
}

/// Writes every diagnostic to the `log` facade as a warning.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn report(&mut self, diagnostic: Diagnostic) {
        log::warn!("{}", diagnostic);
    }
}


impl fmt::Display for Diagnostic {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnknownChannel { channel } =>
                write!(formatter, "unknown channel name {} set as data", decode_name(channel)),

            Diagnostic::UndeclaredView { full_name, fallback } => write!(
                formatter, "channel {} does not start with a valid view, falling back to default view {}",
                decode_name(full_name), decode_name(fallback)
            ),

            Diagnostic::MergeViewMismatch { input, component, fallback } => write!(
                formatter, "{} first component is {}, which is not a valid view. Putting in default view {}",
                input.display(), component, decode_name(fallback)
            ),

            Diagnostic::IncompleteInput { input } => write!(
                formatter, "{} seems incomplete (corrupted or still being written)",
                input.display()
            ),
        }
    }
}
