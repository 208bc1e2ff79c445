use std::process::exit;
use log::error;
use exrsplit::prelude::*;

use crate::cmd_options::Mode;

mod cmd_args;
mod cmd_options;

fn main() {
    let options = cmd_args::create_cmd_args()
        .try_get_matches()
        .unwrap_or_else(|error| {
            if !error.use_stderr() { error.exit() }

            let _ = error.print();
            exit(1);
        });

    cmd_options::setup_logger(&options);

    if let Err(error) = run(&options) {
        error!("{}", error);
        exit(1);
    }
}

fn run(options: &clap::ArgMatches) -> UnitResult {
    let codec = ExrCodec::default();
    let images = cmd_options::images(options);

    match cmd_options::parse_mode(options) {
        Mode::Merge(merge) => merge_files(&codec, images.as_slice(), &merge, &mut LogDiagnostics),

        Mode::List(list) => {
            for image in &images {
                let listings = list_file(&codec, image, &list, &mut LogDiagnostics)?;

                for (index, listing) in listings.iter().enumerate() {
                    println!("{}/{} - {}", index + 1, listings.len(), listing);
                }
            }

            Ok(())
        },

        Mode::Split(split) => {
            for image in &images {
                split_file(&codec, image, &split, &mut LogDiagnostics)?;
            }

            Ok(())
        },
    }
}
