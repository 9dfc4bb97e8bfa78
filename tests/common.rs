use std::path::Path;

use csv::ReaderBuilder;
use misol::{
    avec::{SliceSource, WeatherStation},
    config::Config,
};

mod support;

use support::{Recorder, from_hex, init_logger};

const PATH: &str = "fixtures/frames.csv";

#[test]
fn decode_slice_fixture() {
    init_logger();
    let (stream, expected) = load(PATH);
    let mut recorder = Recorder::default();

    let station = misol::avec::decode_slice(&stream, &Config::default(), &mut recorder).unwrap();

    assert_eq!(recorder.0, expected);
    assert_eq!(station.diagnostics().frames_decoded, 4);
    assert_eq!(station.diagnostics().checksum_mismatches, 0);
}

#[cfg(feature = "std")]
#[test]
fn decode_reader_fixture() {
    init_logger();
    let (stream, expected) = load(PATH);
    let mut recorder = Recorder::default();

    let mut cursor = std::io::Cursor::new(stream);
    let station =
        misol::avec::decode_reader(&mut cursor, &Config::default(), &mut recorder).unwrap();

    assert_eq!(recorder.0, expected);
    assert_eq!(station.diagnostics().frames_decoded, 4);
}

#[test]
fn decode_fixture_across_polls() {
    init_logger();
    let (stream, expected) = load(PATH);

    // No chunk ends between a basic frame and its pressure extension.
    for chunk in [11, 13, 16, 19, 30, 64] {
        let mut recorder = Recorder::default();
        let mut station = WeatherStation::new(&Config::default()).unwrap();

        for r in stream.chunks(chunk) {
            station.poll(&mut SliceSource::new(r), &mut recorder);
        }

        assert_eq!(recorder.0, expected, "chunk of {chunk} bytes");
    }
}

#[test]
fn decode_fixture_in_single_poll() {
    let (stream, expected) = load(PATH);

    for chunk in [1, 5, 17, 21] {
        let mut recorder = Recorder::default();
        let mut station = WeatherStation::new(&Config::default()).unwrap();
        let mut source = SliceSource::with_chunk(&stream, chunk);

        let decoded = station.poll(&mut source, &mut recorder);

        assert_eq!(decoded, 4);
        assert!(source.remaining().is_empty());
        assert_eq!(recorder.0, expected, "chunk of {chunk} bytes");
    }
}

#[test]
fn decode_fixture_fed_directly() {
    let (stream, expected) = load(PATH);
    let mut recorder = Recorder::default();
    let mut station = WeatherStation::new(&Config::default()).unwrap();

    let decoded = station.feed(&stream, &mut recorder);

    assert_eq!(decoded, 4);
    assert_eq!(recorder.0, expected);
}

/// Read a fixture of one frame per row: the frame in hex, then every value
/// it is expected to forward as `key=value`.
fn load(path: impl AsRef<Path>) -> (Vec<u8>, Vec<String>) {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_path(path)
        .unwrap();

    let mut stream = vec![];
    let mut expected = vec![];

    for record in reader.records() {
        let record = record.unwrap();
        let mut fields = record.iter();
        stream.extend(from_hex(fields.next().unwrap()));
        expected.extend(fields.map(|f| f.to_string()));
    }

    (stream, expected)
}
