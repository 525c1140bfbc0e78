use std::io::Cursor;
use std::sync::Arc;

use filehash_analysis::{ActionKind, FileAnalysis, StreamDispatcher};
use filehash_core::{HashAlgorithm, ResultsSchema};

fn attach_all(source: &str) -> FileAnalysis {
    let mut fa = FileAnalysis::new(source, Arc::new(ResultsSchema::action_results()));
    for kind in ActionKind::ALL {
        fa.add_action(kind.into()).unwrap();
    }
    fa
}

#[test]
fn report_lists_every_digest() {
    let content = b"The quick brown fox jumps over the lazy dog";
    let mut fa = attach_all("fox.txt");
    StreamDispatcher::new(5)
        .run(Cursor::new(&content[..]), &mut fa)
        .unwrap();

    let report = fa.report();
    assert_eq!(report.source, "fox.txt");
    assert_eq!(report.bytes_seen, content.len() as u64);
    assert_eq!(report.missing_bytes, 0);
    assert_eq!(
        report.results.get("md5").map(String::as_str),
        Some("9e107d9d372bb6826bd81d3542a419d6")
    );
    assert_eq!(
        report.results.get("sha1").map(String::as_str),
        Some("2fd4e1c67a2d28fced849ee1bb76e7391b93eb12")
    );
    assert_eq!(
        report.results.get("sha256").map(String::as_str),
        Some("d7a8fbb307d7809469ca9abcb0082e4f8d5651e46d3cdb762d02d0bf37c9e592")
    );
}

#[test]
fn report_serializes_to_json() {
    let mut fa = attach_all("abc");
    StreamDispatcher::default()
        .run(Cursor::new(b"abc".to_vec()), &mut fa)
        .unwrap();

    let json = serde_json::to_value(fa.report()).unwrap();
    assert_eq!(json["source"], "abc");
    assert_eq!(json["bytes_seen"], 3);
    assert_eq!(
        json["results"]["sha256"],
        HashAlgorithm::Sha256.digest_bytes(b"abc").to_hex()
    );
    assert!(json["file_id"].is_string());
    assert!(json["analyzed_at"].is_string());
}

#[test]
fn empty_input_has_no_results() {
    let mut fa = attach_all("empty");
    let read = StreamDispatcher::default()
        .run(Cursor::new(Vec::new()), &mut fa)
        .unwrap();

    assert_eq!(read, 0);
    let report = fa.report();
    assert!(report.results.is_empty());
    assert!(fa.is_done());
}

#[test]
fn gap_does_not_invalidate_digest() {
    let mut fa = attach_all("gappy");
    fa.data_in(0, b"abc");
    fa.gap(3, 4);
    fa.data_in(7, b"def");
    fa.end_of_file();

    let report = fa.report();
    assert_eq!(report.missing_bytes, 4);
    assert_eq!(
        report.results.get("sha1"),
        Some(&HashAlgorithm::Sha1.digest_bytes(b"abcdef").to_hex())
    );
}
