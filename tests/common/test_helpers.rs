/// Common test helper functions
use std::fs;
use std::path::{Path, PathBuf};

/// Create `files` files spread over two nested directories plus `empty_dirs`
/// empty directories under `root`. Returns the file paths.
#[allow(dead_code)]
pub fn populate_tree(root: &Path, files: usize, empty_dirs: usize) -> Vec<PathBuf> {
    fs::create_dir_all(root.join("docs/private")).unwrap();

    let mut created = Vec::new();
    for i in 0..files {
        let dir = match i % 3 {
            0 => root.to_path_buf(),
            1 => root.join("docs"),
            _ => root.join("docs/private"),
        };
        let path = dir.join(format!("item{}.dat", i));
        fs::write(&path, format!("sensitive payload {}", i)).unwrap();
        created.push(path);
    }

    for i in 0..empty_dirs {
        fs::create_dir_all(root.join(format!("empty{}", i))).unwrap();
    }

    created
}

/// Count regular files below `root`
#[allow(dead_code)]
pub fn count_files(root: &Path) -> usize {
    let mut count = 0;
    if let Ok(entries) = fs::read_dir(root) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                count += count_files(&path);
            } else {
                count += 1;
            }
        }
    }
    count
}
