// Copyright 2025 Hearing Model Contributors
// SPDX-License-Identifier: Apache-2.0

//! License headers across the workspace sources

use std::fs;
use std::path::{Path, PathBuf};

const HEADER: &str = "// Copyright 2025 Hearing Model Contributors\n\
                      // SPDX-License-Identifier: Apache-2.0\n";

fn rust_sources(dir: &Path, found: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for path in entries.flatten().map(|e| e.path()) {
        if path.is_dir() {
            if path.file_name().is_some_and(|n| n == "target") {
                continue;
            }
            rust_sources(&path, found);
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            found.push(path);
        }
    }
}

#[test]
fn test_every_source_carries_header() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let mut sources = Vec::new();
    for dir in ["src", "tests", "crates"] {
        rust_sources(&root.join(dir), &mut sources);
    }
    assert!(!sources.is_empty());

    let missing: Vec<_> = sources
        .iter()
        .filter(|path| {
            !fs::read_to_string(path)
                .map(|text| text.starts_with(HEADER))
                .unwrap_or(false)
        })
        .collect();
    assert!(missing.is_empty(), "missing license header: {:?}", missing);
}
