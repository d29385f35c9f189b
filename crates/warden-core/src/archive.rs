//! Post-run archival and cleanup wrappers.
//!
//! Caller-invoked steps outside the engine: compress a finished working
//! directory for storage, or empty it down to a retained allow-list.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Zip the working directory into `<dirname>.zip` next to it and return
/// the archive path.
pub fn compress_directory(directory: &Path) -> anyhow::Result<PathBuf> {
    let name = directory
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("directory has no usable name: {}", directory.display()))?;
    let archive_path = directory.with_file_name(format!("{name}.zip"));

    let mut archive = ZipWriter::new(File::create(&archive_path)?);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for path in walk(directory)? {
        let relative = path.strip_prefix(directory)?.to_string_lossy().into_owned();
        archive.start_file(relative, options)?;
        let mut contents = Vec::new();
        File::open(&path)?.read_to_end(&mut contents)?;
        archive.write_all(&contents)?;
    }
    archive.finish()?;

    Ok(archive_path)
}

/// Delete everything inside `directory` except entries named in
/// `files_to_keep`. The directory itself survives.
pub fn empty_directory(directory: &Path, files_to_keep: &[&str]) -> std::io::Result<()> {
    for entry in std::fs::read_dir(directory)? {
        let path = entry?.path();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        if files_to_keep.contains(&name) {
            continue;
        }
        if path.is_dir() {
            std::fs::remove_dir_all(&path)?;
        } else {
            std::fs::remove_file(&path)?;
        }
    }
    Ok(())
}

/// Depth-first file listing, sorted for deterministic archive layout.
fn walk(root: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_dir() {
                stack.push(path);
            } else {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}
