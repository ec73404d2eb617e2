use std::path::Path;

use wenetspeech_prep::processing::manifest::{count_entries, EntryReader, EntryWriter};
use wenetspeech_prep::processing::{combine, pieces, split};

fn write_cuts(path: &Path, nb: usize) -> Vec<String> {
    let entries: Vec<String> = (0..nb)
        .map(|x| format!(r#"{{"id": "cut-{:05}", "duration": {}.5}}"#, x, x % 17))
        .collect();
    let mut w = EntryWriter::create(path).unwrap();
    for e in &entries {
        w.write(e).unwrap();
    }
    w.finish().unwrap();
    entries
}

fn read_all(path: &Path) -> Vec<String> {
    EntryReader::open(path)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap()
}

#[test]
fn split_then_combine() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("cuts_L_raw.jsonl.gz");
    let original = write_cuts(&src, 103);

    let split_dir = dir.path().join("L_split_10");
    let written = split(&src, 10, &split_dir).unwrap();
    assert_eq!(written.len(), 10);

    let sizes: Vec<usize> = written.iter().map(|p| count_entries(p).unwrap()).collect();
    assert_eq!(sizes.iter().sum::<usize>(), 103);
    assert!(sizes.iter().all(|s| *s == 10 || *s == 11));

    let found = pieces(&split_dir, "cuts_L_raw").unwrap();
    assert_eq!(found, written);

    let dst = dir.path().join("cuts_L.jsonl.gz");
    assert_eq!(combine(&found, &dst).unwrap(), 103);
    assert_eq!(read_all(&dst), original);
}

#[test]
fn single_piece() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("cuts_L_raw.jsonl.gz");
    let original = write_cuts(&src, 5);
    let written = split(&src, 1, &dir.path().join("L_split_1")).unwrap();
    assert_eq!(written.len(), 1);
    assert!(written[0].ends_with("cuts_L_raw.00000001.jsonl.gz"));
    assert_eq!(read_all(&written[0]), original);
}

#[test]
fn more_pieces_than_entries() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("cuts_L_raw.jsonl.gz");
    write_cuts(&src, 3);
    assert!(split(&src, 4, &dir.path().join("L_split_4")).is_err());
}
