use std::path::PathBuf;
use clap::ArgMatches;
use log::{debug, Level};
use exrsplit::options::{MergeOptions, SplitOptions};

/// What to do with the images.
#[derive(Debug, Clone)]
pub enum Mode {
    Split(SplitOptions),
    List(SplitOptions),
    Merge(MergeOptions),
}

pub fn parse_mode(options: &ArgMatches) -> Mode {
    if options.get_flag("merge") {
        let views: Vec<&String> = options.get_many::<String>("view").unwrap_or_default().collect();
        return Mode::Merge(MergeOptions::default().with_views(views));
    }

    let layers: Vec<String> = options.get_many::<String>("layer")
        .unwrap_or_default().cloned().collect();

    let split = SplitOptions::default()
        .with_split_channels(options.get_flag("split-channels"))
        .with_prefix(options.get_flag("prefix"))
        .with_layer_filter(layers);

    if options.get_flag("list") {
        return Mode::List(split);
    }

    match options.get_one::<PathBuf>("output-dir") {
        Some(directory) => Mode::Split(split.with_output_directory(directory.clone())),
        None => Mode::Split(split),
    }
}

pub fn images(options: &ArgMatches) -> Vec<PathBuf> {
    options.get_many::<PathBuf>("images")
        .unwrap_or_default().cloned().collect()
}

/// Set up logging options
pub fn setup_logger(options: &ArgMatches) {
    let log_level = if options.get_flag("debug") {
        Level::Debug
    } else if options.get_flag("trace") {
        Level::Trace
    } else if options.get_flag("warn") {
        Level::Warn
    } else {
        Level::Info
    };

    if let Err(error) = simple_logger::init_with_level(log_level) {
        eprintln!("could not initialize logging: {}", error);
        return;
    }

    debug!("Log level: {}", log_level);
}
