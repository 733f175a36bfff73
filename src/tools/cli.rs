use clap::Parser;
use log::info;
use std::{fmt::Display, fmt::Formatter};

/// Suffix added to compressed files.
pub const SUFFIX: &str = ".huf";

/// Verbosity of user information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Warnings,
    Info,
    Debug,
    Trace,
}

/// Zip, Unzip, Test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Zip,
    Unzip,
    Test,
}
impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug)]
pub struct HufOpts {
    /// File to read
    pub origin: String,
    /// File to write, derived from origin when not given
    pub destination: Option<String>,
    /// Silently overwrite existing files with the same name
    pub force_overwrite: bool,
    /// Compress/Decompress/Test
    pub op_mode: Mode,
    /// Verbosity of user information
    pub verbose: Verbosity,
}

impl HufOpts {
    pub fn new() -> Self {
        Self {
            origin: String::new(),
            destination: None,
            force_overwrite: false,
            op_mode: Mode::Zip,
            verbose: Verbosity::Warnings,
        }
    }

    /// Where output goes. Compression appends ".huf"; decompression strips it, or appends
    /// ".out" when the origin has no such suffix. Test mode writes nothing.
    pub fn output_path(&self) -> Option<String> {
        if let Some(dest) = &self.destination {
            return Some(dest.clone());
        }
        match self.op_mode {
            Mode::Zip => Some(format!("{}{}", self.origin, SUFFIX)),
            Mode::Unzip => match self.origin.strip_suffix(SUFFIX) {
                Some(stem) if !stem.is_empty() => Some(stem.to_string()),
                _ => Some(format!("{}.out", self.origin)),
            },
            Mode::Test => None,
        }
    }
}

impl Default for HufOpts {
    fn default() -> Self {
        Self::new()
    }
}

/// Command Line Interpretation - uses external CLAP crate.
#[derive(Parser, Debug)]
#[clap(
    version,
    about = "A static Huffman file compressor",
    long_about = "
    Counts the bytes of the input, builds a Huffman code from the counts and writes the
    packed bitstream together with the code table and symbol count, so a single file is
    enough to restore the original."
)]
pub struct Args {
    /// File to process
    #[clap()]
    origin: String,

    /// Output file (default: origin + .huf, or origin without .huf when decompressing)
    #[clap()]
    destination: Option<String>,

    /// Perform compression on the input file (default)
    #[clap(short = 'z', long = "compress", conflicts_with_all = &["decompress", "test"])]
    compress: bool,

    /// Perform decompression on the input file
    #[clap(short = 'd', long = "decompress", conflicts_with = "test")]
    decompress: bool,

    /// Test compressed file integrity (writes nothing, so takes no output file)
    #[clap(short = 't', long = "test", conflicts_with = "destination")]
    test: bool,

    /// Overwrite existing output file
    #[clap(short = 'f', long = "force")]
    force: bool,

    /// Suppress all output, including the result line
    #[clap(short = 'q', long = "quiet")]
    quiet: bool,

    /// Be verbose (a 2nd -v gives more)
    #[clap(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

impl From<Args> for HufOpts {
    fn from(args: Args) -> Self {
        let op_mode = match (args.compress, args.decompress, args.test) {
            (_, true, _) => Mode::Unzip,
            (_, _, true) => Mode::Test,
            _ => Mode::Zip,
        };
        let verbose = match (args.quiet, args.verbose) {
            (true, _) => Verbosity::Quiet,
            (false, 0) => Verbosity::Warnings,
            (false, 1) => Verbosity::Info,
            (false, 2) => Verbosity::Debug,
            _ => Verbosity::Trace,
        };
        HufOpts {
            origin: args.origin,
            destination: args.destination,
            force_overwrite: args.force,
            op_mode,
            verbose,
        }
    }
}

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parse the process arguments, set the log level and return the options.
pub fn hufopts_init() -> HufOpts {
    let opts = HufOpts::from(Args::parse());
    set_log_level(opts.verbose);

    info!("huffman, a static Huffman file compressor. Version {}", VERSION);
    info!("Operational mode set to {}", opts.op_mode);
    info!("Getting input from the file {}", opts.origin);
    if let Some(out) = opts.output_path() {
        info!("Sending output to the file {}", out);
    }
    if opts.force_overwrite {
        info!("Forcing file overwriting")
    };
    opts
}

/// Set the log level
pub fn set_log_level(verbose: Verbosity) {
    match verbose {
        Verbosity::Quiet => log::set_max_level(log::LevelFilter::Off),
        Verbosity::Warnings => log::set_max_level(log::LevelFilter::Warn),
        Verbosity::Info => log::set_max_level(log::LevelFilter::Info),
        Verbosity::Debug => log::set_max_level(log::LevelFilter::Debug),
        Verbosity::Trace => log::set_max_level(log::LevelFilter::Trace),
    };
}
