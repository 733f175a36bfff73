//Enable more cargo lint tests
#![warn(rust_2018_idioms)]

use huffman::compression::compress::compress;
use huffman::compression::decompress::{decompress, test_integrity};
use huffman::tools::cli::{hufopts_init, Mode, Verbosity};
use huffman::tools::timer::Timer;
use huffman::HuffError;

use log::{error, info, LevelFilter};
use simplelog::{Config, TermLogger, TerminalMode};

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() -> Result<(), HuffError> {
    // Available log levels are Error, Warn, Info, Debug, Trace. The real level is set from
    // the command line once the options are parsed.
    if let Err(e) = TermLogger::init(
        LevelFilter::Trace,
        Config::default(),
        TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    ) {
        eprintln!("Could not start the logger: {}", e);
    }

    let options = hufopts_init();
    let mut timer = Timer::new();
    let quiet = options.verbose == Verbosity::Quiet;

    //----- Figure how what we need to do and go do it
    let result = match options.op_mode {
        Mode::Zip => compress(&options, &mut timer).map(|stats| {
            if let (Some(stats), false) = (stats, quiet) {
                println!(
                    "{}: {} -> {} bytes, ratio {:.4}, encode {:?}, total {:?}",
                    options.origin,
                    stats.original,
                    stats.compressed,
                    stats.ratio(),
                    timer.phase("encode").unwrap_or_default(),
                    timer.elapsed()
                );
            }
        }),
        Mode::Unzip => decompress(&options, &mut timer).map(|bytes| {
            if !quiet {
                println!(
                    "{}: {} bytes, decode {:?}, total {:?}",
                    options.origin,
                    bytes,
                    timer.phase("decode").unwrap_or_default(),
                    timer.elapsed()
                );
            }
        }),
        Mode::Test => test_integrity(&options, &mut timer).map(|bytes| {
            if !quiet {
                println!("{}: ok, {} bytes", options.origin, bytes);
            }
        }),
    };
    timer.report();

    match &result {
        Ok(()) => info!("Done.\n"),
        Err(e) => error!("{}", e),
    }
    result
}
