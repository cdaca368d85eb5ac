//! Synthetic training files survive a trip through `.npz` archives and
//! `.npy` directories.

use tessel_core::{keys, ArraySource, SourceError};
use tessel_npy::{discover, read_npy_file, NpyDir, NpzFile, TrainingFile};
use tessel_test_utils::ExampleFileBuilder;

fn file_names(found: &[TrainingFile]) -> Vec<String> {
    found
        .iter()
        .map(|f| {
            let path = match f {
                TrainingFile::Npz(f) => f.path(),
                TrainingFile::Dir(d) => d.root(),
            };
            path.file_name().unwrap().to_string_lossy().into_owned()
        })
        .collect()
}

#[test]
fn npz_round_trip_preserves_every_array() {
    let tmp = tempfile::tempdir().unwrap();
    let file = ExampleFileBuilder::new("mem", 12).pos_len(7).build();

    let npz = NpzFile::create(tmp.path().join("data.npz"), &file, keys::ALL).unwrap();
    let reopened = NpzFile::open(npz.path()).unwrap();
    for key in keys::ALL {
        assert_eq!(reopened.array(key).unwrap(), file.array(key).unwrap(), "{key}");
    }
    let mut stored = reopened.keys().unwrap();
    stored.sort();
    let mut expected: Vec<String> = keys::ALL.iter().map(|k| k.to_string()).collect();
    expected.sort();
    assert_eq!(stored, expected);
    assert!(reopened.name().ends_with("data.npz"));
}

#[test]
fn npz_missing_array_is_reported_by_name() {
    let tmp = tempfile::tempdir().unwrap();
    let file = ExampleFileBuilder::new("mem", 4).build();
    let npz = NpzFile::create(tmp.path().join("partial.npz"), &file, [keys::GLOBAL_INPUT]).unwrap();
    match npz.array(keys::VALUE_TARGETS) {
        Err(SourceError::MissingArray { name }) => assert_eq!(name, keys::VALUE_TARGETS),
        other => panic!("expected MissingArray, got {other:?}"),
    }
}

#[test]
fn npz_open_rejects_missing_file() {
    let tmp = tempfile::tempdir().unwrap();
    assert!(matches!(
        NpzFile::open(tmp.path().join("absent.npz")),
        Err(SourceError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound
    ));
}

#[test]
fn corrupt_npz_is_an_error_not_a_panic() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("broken.npz");
    std::fs::write(&path, b"PK\x03\x04 definitely not a zip").unwrap();
    let npz = NpzFile::open(&path).unwrap();
    assert!(npz.array(keys::GLOBAL_INPUT).is_err());
}

#[test]
fn directory_round_trip_preserves_every_array() {
    let tmp = tempfile::tempdir().unwrap();
    let file = ExampleFileBuilder::new("mem", 12).pos_len(7).build();

    let dir = NpyDir::create(tmp.path().join("shard-000")).unwrap();
    dir.write_all(&file, keys::ALL).unwrap();

    let reopened = NpyDir::open(dir.root()).unwrap();
    for key in keys::ALL {
        assert_eq!(reopened.array(key).unwrap(), file.array(key).unwrap(), "{key}");
    }
    assert!(reopened.name().ends_with("shard-000"));
}

#[test]
fn directory_missing_array_is_reported_by_name() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = NpyDir::create(tmp.path()).unwrap();
    match dir.array(keys::VALUE_TARGETS) {
        Err(SourceError::MissingArray { name }) => assert_eq!(name, keys::VALUE_TARGETS),
        other => panic!("expected MissingArray, got {other:?}"),
    }
}

#[test]
fn dotted_keys_keep_their_full_name() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = NpyDir::create(tmp.path()).unwrap();
    assert_eq!(dir.path_for("a.b"), tmp.path().join("a.b.npy"));

    let file = ExampleFileBuilder::new("mem", 2).build();
    let array = file.array(keys::GLOBAL_INPUT).unwrap();
    dir.write_array("a.b", &array).unwrap();
    dir.write_array("a.c", &file.array(keys::GLOBAL_TARGETS).unwrap())
        .unwrap();
    assert_eq!(dir.array("a.b").unwrap(), array);
}

#[test]
fn open_rejects_non_directory() {
    let tmp = tempfile::tempdir().unwrap();
    assert!(matches!(
        NpyDir::open(tmp.path().join("absent")),
        Err(SourceError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound
    ));
}

#[test]
fn discover_lists_archives_and_array_directories_in_order() {
    let tmp = tempfile::tempdir().unwrap();
    let file = ExampleFileBuilder::new("mem", 2).build();
    for name in ["b", "d"] {
        NpyDir::create(tmp.path().join(name))
            .unwrap()
            .write_all(&file, [keys::GLOBAL_INPUT])
            .unwrap();
    }
    for name in ["c.npz", "a.npz"] {
        NpzFile::create(tmp.path().join(name), &file, [keys::GLOBAL_INPUT]).unwrap();
    }
    std::fs::create_dir(tmp.path().join("empty")).unwrap();
    std::fs::write(tmp.path().join("stray.txt"), b"x").unwrap();

    let found = discover(tmp.path()).unwrap();
    assert_eq!(file_names(&found), vec!["a.npz", "b", "c.npz", "d"]);
    assert!(matches!(found[0], TrainingFile::Npz(_)));
    assert!(matches!(found[1], TrainingFile::Dir(_)));
    for f in &found {
        assert_eq!(f.array(keys::GLOBAL_INPUT).unwrap(), file.array(keys::GLOBAL_INPUT).unwrap());
    }
}

#[test]
fn single_file_helpers_agree() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = NpyDir::create(tmp.path()).unwrap();
    let file = ExampleFileBuilder::new("mem", 3).build();
    let packed = file.array(keys::BINARY_INPUT).unwrap();
    dir.write_array(keys::BINARY_INPUT, &packed).unwrap();
    assert_eq!(read_npy_file(dir.path_for(keys::BINARY_INPUT)).unwrap(), packed);
}
