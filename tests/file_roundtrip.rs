use std::fs;
use std::path::PathBuf;

use huffman::compression::compress::compress;
use huffman::compression::decompress::{decompress, test_integrity};
use huffman::tools::cli::{HufOpts, Mode};
use huffman::tools::timer::Timer;
use huffman::HuffError;

/// A scratch directory unique to one test, removed on drop.
struct Scratch(PathBuf);

impl Scratch {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("huffman-{}-{}", std::process::id(), name));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        Scratch(dir)
    }

    fn path(&self, file: &str) -> String {
        self.0.join(file).to_string_lossy().into_owned()
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

fn opts(mode: Mode, origin: &str, destination: Option<&str>) -> HufOpts {
    HufOpts {
        origin: origin.to_string(),
        destination: destination.map(str::to_string),
        op_mode: mode,
        ..HufOpts::new()
    }
}

#[test]
fn compress_decompress_file_test() {
    let scratch = Scratch::new("roundtrip");
    let original = scratch.path("alice.txt");
    let text = "Alice was beginning to get very tired of sitting by her sister on the bank, \
                and of having nothing to do: once or twice she had peeped into the book her \
                sister was reading, but it had no pictures or conversations in it.\n"
        .repeat(20);
    fs::write(&original, &text).unwrap();

    let stats = compress(&opts(Mode::Zip, &original, None), &mut Timer::new())
        .unwrap()
        .unwrap();
    let packed = format!("{}.huf", original);
    assert_eq!(stats.original, text.len() as u64);
    assert_eq!(stats.compressed, fs::metadata(&packed).unwrap().len());
    assert!(stats.ratio() > 0.3);

    let restored = scratch.path("restored.txt");
    let bytes = decompress(&opts(Mode::Unzip, &packed, Some(&restored)), &mut Timer::new()).unwrap();
    assert_eq!(bytes, text.len() as u64);
    assert_eq!(fs::read_to_string(&restored).unwrap(), text);

    assert_eq!(
        test_integrity(&opts(Mode::Test, &packed, None), &mut Timer::new()).unwrap(),
        text.len() as u64
    );
}

#[test]
fn fixed_fixture_ratio_test() {
    let scratch = Scratch::new("ratio");
    let original = scratch.path("fixture.bin");
    // a: 500, b: 250, c: 250 -> codes 0, 10, 11 -> 1500 bits = 188 payload bytes.
    // The header is 16 bytes and the code table 6 + 3 * 3 = 15 bytes.
    let mut data = vec![b'a'; 500];
    data.extend(vec![b'b'; 250]);
    data.extend(vec![b'c'; 250]);
    fs::write(&original, &data).unwrap();

    let stats = compress(&opts(Mode::Zip, &original, None), &mut Timer::new())
        .unwrap()
        .unwrap();
    assert_eq!(stats.original, 1000);
    assert_eq!(stats.compressed, 219);
    assert!((stats.ratio() - 0.781).abs() < 1e-12);
}

#[test]
fn empty_input_writes_nothing_test() {
    let scratch = Scratch::new("empty");
    let original = scratch.path("empty.txt");
    fs::write(&original, b"").unwrap();

    let stats = compress(&opts(Mode::Zip, &original, None), &mut Timer::new()).unwrap();
    assert!(stats.is_none());
    assert!(!std::path::Path::new(&format!("{}.huf", original)).exists());
}

#[test]
fn single_symbol_file_test() {
    let scratch = Scratch::new("single");
    let original = scratch.path("zeros.bin");
    fs::write(&original, vec![0_u8; 4096]).unwrap();

    compress(&opts(Mode::Zip, &original, None), &mut Timer::new()).unwrap();
    let restored = scratch.path("zeros.out");
    decompress(
        &opts(Mode::Unzip, &format!("{}.huf", original), Some(&restored)),
        &mut Timer::new(),
    )
    .unwrap();
    assert_eq!(fs::read(&restored).unwrap(), vec![0_u8; 4096]);
}

#[test]
fn missing_file_test() {
    let scratch = Scratch::new("missing");
    let result = compress(
        &opts(Mode::Zip, &scratch.path("nope.txt"), None),
        &mut Timer::new(),
    );
    assert!(matches!(result, Err(HuffError::Io(_))));
}

#[test]
fn no_overwrite_without_force_test() {
    let scratch = Scratch::new("force");
    let original = scratch.path("data.txt");
    let packed = scratch.path("data.txt.huf");
    fs::write(&original, b"some data to squeeze").unwrap();
    fs::write(&packed, b"keep me").unwrap();

    let result = compress(&opts(Mode::Zip, &original, None), &mut Timer::new());
    assert!(matches!(result, Err(HuffError::Io(_))));
    assert_eq!(fs::read(&packed).unwrap(), b"keep me");

    let mut forced = opts(Mode::Zip, &original, None);
    forced.force_overwrite = true;
    compress(&forced, &mut Timer::new()).unwrap();
    assert_ne!(fs::read(&packed).unwrap(), b"keep me");
}

#[test]
fn no_overwrite_on_decompress_without_force_test() {
    let scratch = Scratch::new("force-unzip");
    let original = scratch.path("notes.txt");
    let packed = scratch.path("notes.txt.huf");
    fs::write(&original, b"notes worth keeping, notes worth keeping").unwrap();
    compress(&opts(Mode::Zip, &original, None), &mut Timer::new()).unwrap();
    fs::write(&original, b"keep me").unwrap();

    let result = decompress(&opts(Mode::Unzip, &packed, None), &mut Timer::new());
    assert!(matches!(result, Err(HuffError::Io(_))));
    assert_eq!(fs::read(&original).unwrap(), b"keep me");

    let mut forced = opts(Mode::Unzip, &packed, None);
    forced.force_overwrite = true;
    decompress(&forced, &mut Timer::new()).unwrap();
    assert_eq!(
        fs::read(&original).unwrap(),
        b"notes worth keeping, notes worth keeping"
    );
}

#[test]
fn corrupt_file_test() {
    let scratch = Scratch::new("corrupt");
    let bogus = scratch.path("bogus.huf");
    fs::write(&bogus, b"this is not compressed").unwrap();

    let result = test_integrity(&opts(Mode::Test, &bogus, None), &mut Timer::new());
    assert!(matches!(result, Err(HuffError::InvalidArtifact(_))));
}
