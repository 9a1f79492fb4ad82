//! Custom assertions over the output tree

use bl_replays::npy::decode_f64_table;
use std::path::Path;

/// Read a note table back as `[note id, accuracy, spawn time]` rows
pub fn read_rows(path: &Path) -> Vec<[f64; 3]> {
    let bytes = std::fs::read(path)
        .unwrap_or_else(|e| panic!("missing note table {}: {e}", path.display()));
    let table = decode_f64_table(&bytes)
        .unwrap_or_else(|e| panic!("invalid note table {}: {e}", path.display()));
    assert_eq!(table.cols, 3, "note tables have three columns");
    (0..table.rows)
        .map(|i| {
            let row = table.row(i).unwrap_or_else(|| panic!("row {i} out of range"));
            [row[0], row[1], row[2]]
        })
        .collect()
}

/// Sorted file names inside `dir`
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap_or_else(|e| panic!("cannot list {}: {e}", dir.display()))
        .map(|entry| {
            entry
                .unwrap_or_else(|e| panic!("bad dir entry: {e}"))
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    names.sort();
    names
}

/// Assert two accuracies agree to within float32 precision
pub fn assert_accuracy(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "accuracy {actual} != {expected}"
    );
}
