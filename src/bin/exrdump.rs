//! Check OpenEXR images and print their channels.

use std::path::PathBuf;
use clap::{value_parser, Arg, ArgAction, Command};
use exrsplit::prelude::*;

#[rustfmt::skip]
fn create_cmd_args() -> Command {
    Command::new("exrdump")
        .about("Verify OpenEXR images and dump their headers")
        .arg(Arg::new("targets")
            .help("Input images")
            .value_parser(value_parser!(PathBuf))
            .action(ArgAction::Append)
            .num_args(1..)
            .required(true))
        .arg(Arg::new("all")
            .short('a')
            .long("all")
            .action(ArgAction::SetTrue)
            .help("Display all header information"))
}

fn main() {
    let options = create_cmd_args().get_matches();
    let show_all = options.get_flag("all");
    let codec = ExrCodec::default();

    for target in options.get_many::<PathBuf>("targets").unwrap_or_default() {
        println!("{}:", target.display());

        if !codec.is_valid_container(target) {
            println!("Invalid EXR image");
            continue;
        }

        let input = match codec.open_input(target) {
            Ok(input) => input,
            Err(error) => {
                println!("Invalid EXR image: {}", error);
                continue;
            }
        };

        if !input.is_complete() {
            println!("EXR file isn't complete (corrupted or some program is still writing to the file?)");
            continue;
        }

        dump(input.header(), show_all);
    }
}

fn dump(header: &HeaderMetadata, show_all: bool) {
    let attributes = &header.attributes;

    if show_all {
        println!("size - {} x {}", attributes.size.0, attributes.size.1);
        println!("compression - {:?}", attributes.compression);
        println!("lineOrder - {:?}", attributes.line_order);
        println!("image attributes - {:#?}", attributes.image);
        println!("layer attributes - {:#?}", attributes.layer);

        if let Some(comments) = &header.comments {
            println!("comments - {}", decode_name(comments));
        }
    }

    println!("Channels:");
    for (name, format) in &header.channels {
        println!("{} - {}", decode_name(name), format);
    }

    match &header.views {
        Views::None => {},
        Views::Single(view) => println!("view: {}", decode_name(view)),

        Views::Multi(views) => {
            let names: Vec<String> = views.iter().map(decode_name).collect();
            println!("multiView: {}", names.join(", "));
        },
    }
}
