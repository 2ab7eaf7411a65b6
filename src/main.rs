mod core;
mod renderer;
mod takgame;
mod view;

use crate::core::config::ConfigOverrides;
use crate::core::errors::AppError;

use clap::{App, Arg};
use log::info;

fn main() -> Result<(), AppError> {
    let matches = App::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .help("Sets a custom config file")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("debug-file")
                .short("d")
                .long("debug-file")
                .value_name("Debug file")
                .help("Output debug to a file")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("server")
                .short("s")
                .long("server")
                .value_name("URL")
                .help("Game server base url")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("size")
                .long("size")
                .value_name("N")
                .help("Default board size (3-8)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("white")
                .long("white")
                .value_name("TYPE")
                .possible_values(&["human", "computer"])
                .help("Default player type for white")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("black")
                .long("black")
                .value_name("TYPE")
                .possible_values(&["human", "computer"])
                .help("Default player type for black")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("v")
                .short("v")
                .multiple(true)
                .help("Sets the level of verbosity"),
        )
        .get_matches();

    core::logger::init_logger(
        matches.value_of("debug-file"),
        core::logger::get_logger_level_by_verbosity(matches.occurrences_of("v")),
    )?;

    let mut app_config = core::config::get_app_config(matches.value_of("config"))?;

    app_config.apply_overrides(&ConfigOverrides {
        server_url: matches.value_of("server"),
        size: matches.value_of("size"),
        white_type: matches.value_of("white"),
        black_type: matches.value_of("black"),
    })?;

    info!("starting with {:?}", &app_config);

    renderer::render_app(&app_config)?;

    Ok(())
}
