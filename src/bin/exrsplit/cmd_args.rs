use std::path::PathBuf;
use clap::{value_parser, Arg, ArgAction, Command};

#[rustfmt::skip]
pub fn create_cmd_args() -> Command {
    Command::new("exrsplit")
        .about("Split multi-layer, multi-view OpenEXR images into single-layer images, or merge them back")
        .arg(Arg::new("images")
            .help("Input images. When merging, the header is taken from the first image and the last image is the output")
            .value_parser(value_parser!(PathBuf))
            .action(ArgAction::Append)
            .num_args(1..)
            .required(true))
        .arg(Arg::new("merge")
            .short('m')
            .long("merge")
            .action(ArgAction::SetTrue)
            .help_heading("MODE")
            .help("Merge multiple OpenEXR images")
            .conflicts_with("list"))
        .arg(Arg::new("list")
            .short('l')
            .long("list")
            .action(ArgAction::SetTrue)
            .help_heading("MODE")
            .help("List layers of the images"))
        .arg(Arg::new("split-channels")
            .short('s')
            .long("split-channels")
            .action(ArgAction::SetTrue)
            .help_heading("SPLITTING")
            .help("Create a file for each channel instead of each layer")
            .long_help("Create a file for each channel instead of each layer.\nData channels (eg. depth, shadows or mask) are saved as grayscale images."))
        .arg(Arg::new("prefix")
            .short('p')
            .long("prefix")
            .action(ArgAction::SetTrue)
            .help_heading("SPLITTING")
            .help("Prefix the image file name to the output file names"))
        .arg(Arg::new("layer")
            .long("layer")
            .action(ArgAction::Append)
            .value_name("NAME")
            .help_heading("SPLITTING")
            .help("Split only channels starting with this name. Can be repeated"))
        .arg(Arg::new("output-dir")
            .long("output-dir")
            .value_name("DIR")
            .value_parser(value_parser!(PathBuf))
            .default_value(".")
            .help_heading("SPLITTING")
            .help("Directory to write split images into"))
        .arg(Arg::new("view")
            .long("view")
            .action(ArgAction::Append)
            .value_name("NAME")
            .help_heading("MERGING")
            .help("Treat the first file name component as this view instead of a layer. Can be repeated")
            .long_help("Treat the first file name component as this view instead of a layer.\nCan be repeated, the first view is the default view."))
        .arg(Arg::new("debug")
            .long("debug")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display debug information and higher"))
        .arg(Arg::new("trace")
            .long("trace")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display very verbose information"))
        .arg(Arg::new("warn")
            .long("warn")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display only warnings and errors"))
}
