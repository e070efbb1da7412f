extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate failure;
extern crate image;
extern crate log;
extern crate mandeltiles;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use failure::{err_msg, Error};
use image::png::PNGEncoder;
use image::ColorType;
use log::info;
use mandeltiles::{ConsoleLog, Dispatcher, Framebuffer, ImageParams, Palette, RenderConfig};
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

/// Reads `xmin:xmax:ymin:ymax`.
fn parse_rect(s: &str) -> Option<(f64, f64, f64, f64)> {
    let parts: Vec<f64> = s
        .split(':')
        .map(f64::from_str)
        .collect::<Result<_, _>>()
        .ok()?;
    match parts.as_slice() {
        [x_min, x_max, y_min, y_max] => Some((*x_min, *x_max, *y_min, *y_max)),
        _ => None,
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const RECT: &str = "rect";
const TASKS: &str = "tasks";
const ITERATIONS: &str = "iterations";
const MODE: &str = "mode";
const TILE: &str = "tile";
const PALETTE: &str = "palette";
const QUIET: &str = "quiet";

fn max_threads() -> usize {
    num_cpus::get() * 4
}

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = max_threads();

    App::new("mandeltiles")
        .version("0.1.0")
        .about("Multi-threaded Mandelbrot renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .default_value("mandelbrot.png")
                .help("Output PNG file"),
        )
        .arg(
            Arg::with_name(SIZE)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("512x512")
                .validator(|s| validate_pair::<usize>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image, WIDTHxHEIGHT"),
        )
        .arg(
            Arg::with_name(RECT)
                .long(RECT)
                .short("r")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-2.0:2.0:-2.0:2.0")
                .validator(|s| match parse_rect(&s) {
                    Some(_) => Ok(()),
                    None => Err("Could not parse viewport, expected xmin:xmax:ymin:ymax".to_string()),
                })
                .help("Window of the complex plane to draw, xmin:xmax:ymin:ymax"),
        )
        .arg(
            Arg::with_name(TASKS)
                .long(TASKS)
                .short("t")
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of worker threads [default: number of CPUs]"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("1000")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        1_000_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 1000000",
                    )
                })
                .help("Iteration budget per pixel"),
        )
        .arg(
            Arg::with_name(MODE)
                .long(MODE)
                .short("m")
                .takes_value(true)
                .possible_values(&["rows", "tiles"])
                .default_value("tiles")
                .help("Give each thread a block of rows, or let threads pull tiles"),
        )
        .arg(
            Arg::with_name(TILE)
                .long(TILE)
                .takes_value(true)
                .default_value("8x8")
                .validator(|s| validate_pair::<usize>(&s, 'x', "Could not parse tile size"))
                .help("Tile size in tile mode, WIDTHxHEIGHT; must divide the image size"),
        )
        .arg(
            Arg::with_name(PALETTE)
                .long(PALETTE)
                .short("p")
                .takes_value(true)
                .possible_values(&["banded", "smooth"])
                .default_value("banded")
                .help("Color mapping"),
        )
        .arg(
            Arg::with_name(QUIET)
                .long(QUIET)
                .short("q")
                .help("Do not report per-thread timings"),
        )
        .get_matches()
}

fn value<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str, Error> {
    matches
        .value_of(name)
        .ok_or_else(|| format_err!("Missing value for --{}", name))
}

fn config(matches: &ArgMatches) -> Result<RenderConfig, Error> {
    let (width, height) =
        parse_pair(value(matches, SIZE)?, 'x').ok_or_else(|| err_msg("Error parsing image dimensions"))?;
    let (x_min, x_max, y_min, y_max) =
        parse_rect(value(matches, RECT)?).ok_or_else(|| err_msg("Error parsing viewport"))?;
    let (tile_width, tile_height) =
        parse_pair(value(matches, TILE)?, 'x').ok_or_else(|| err_msg("Error parsing tile size"))?;
    let threads = match matches.value_of(TASKS) {
        Some(t) => usize::from_str(t)?,
        None => num_cpus::get(),
    };

    Ok(RenderConfig {
        width,
        height,
        x_min,
        x_max,
        y_min,
        y_max,
        iterations: u32::from_str(value(matches, ITERATIONS)?)?,
        threads,
        tiled: value(matches, MODE)? == "tiles",
        tile_width,
        tile_height,
        palette: Palette::from_str(value(matches, PALETTE)?).map_err(err_msg)?,
    })
}

fn write_image(outfile: &str, pixels: &[u8], bounds: (usize, usize)) -> Result<(), Error> {
    let output = File::create(Path::new(outfile))?;
    let encoder = PNGEncoder::new(output);
    encoder.encode(pixels, bounds.0 as u32, bounds.1 as u32, ColorType::RGB(8))?;
    Ok(())
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let params = ImageParams::new(config(matches)?)?;
    let mut framebuffer = Framebuffer::new(params.width(), params.height());

    let console = ConsoleLog::stdout();
    let dispatcher = if matches.is_present(QUIET) {
        Dispatcher::new(&params)
    } else {
        Dispatcher::new(&params).with_log(&console)
    };
    dispatcher.render(&mut framebuffer);

    let outfile = value(matches, OUTPUT)?;
    write_image(outfile, framebuffer.as_bytes(), (params.width(), params.height()))?;
    info!("Wrote {}", outfile);
    Ok(())
}

fn main() {
    env_logger::init();
    let matches = args();
    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
