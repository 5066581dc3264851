//! Archive extraction into the staging directory.

use std::io::{Read, Write};
use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use tracing::{debug, info};

use crate::fs::{remove_path, replace_with_tmp, unique_temp_path};
use crate::layout::StagingLayout;

/// What the extract step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractOutcome {
    AlreadyExtracted,
    Extracted { entries: usize },
}

/// Unzip the staged archive unless its source tree already exists.
pub fn extract_archive(layout: &StagingLayout) -> anyhow::Result<ExtractOutcome> {
    if layout.extracted_dir.exists() {
        info!(
            dir = %layout.extracted_dir.display(),
            "archive already extracted"
        );
        return Ok(ExtractOutcome::AlreadyExtracted);
    }

    let data = std::fs::read(&layout.archive)
        .with_context(|| format!("Failed to read archive: {}", layout.archive.display()))?;

    info!(archive = %layout.archive.display(), "extracting archive");
    let tmp = unique_temp_path(&layout.extracted_dir)?;
    let result = unzip_into_place(&data, &tmp, &layout.extracted_dir);
    if tmp.exists() {
        let _ = remove_path(&tmp);
    }
    let entries = result?;

    Ok(ExtractOutcome::Extracted { entries })
}

/// Unzip into `tmp`, then move the expected top-level tree to `dst`.
/// `dst` only ever appears fully extracted.
fn unzip_into_place(data: &[u8], tmp: &Path, dst: &Path) -> anyhow::Result<usize> {
    let entries = unzip(data, tmp)?;

    let root = dst
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Extract path has no filename: {}", dst.display()))?;
    let extracted = tmp.join(root);
    if !extracted.is_dir() {
        anyhow::bail!("Archive did not contain {}", dst.display());
    }

    replace_with_tmp(&extracted, dst)?;
    Ok(entries)
}

/// Extract a zip archive into `dest`, returning the number of entries written.
fn unzip(data: &[u8], dest: &Path) -> anyhow::Result<usize> {
    std::fs::create_dir_all(dest)
        .with_context(|| format!("Failed to create extract directory: {}", dest.display()))?;

    let cursor = std::io::Cursor::new(data);
    let mut archive = zip::ZipArchive::new(cursor).context("Failed to read zip archive")?;

    let mut written = 0;
    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .with_context(|| format!("Failed to read zip entry {}", i))?;

        let outpath = match file.enclosed_name() {
            Some(path) => dest.join(path),
            None => {
                debug!(entry = file.name(), "skipping entry with unsafe path");
                continue;
            }
        };

        if file.is_dir() {
            std::fs::create_dir_all(&outpath)
                .with_context(|| format!("Failed to create directory: {}", outpath.display()))?;
        } else {
            if let Some(parent) = outpath.parent() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create parent directory: {}", parent.display())
                })?;
            }

            let mut buffer = Vec::new();
            file.read_to_end(&mut buffer)
                .with_context(|| format!("Failed to read zip entry: {}", file.name()))?;

            let mut outfile = std::fs::File::create(&outpath)
                .with_context(|| format!("Failed to create file: {}", outpath.display()))?;
            outfile
                .write_all(&buffer)
                .with_context(|| format!("Failed to write file: {}", outpath.display()))?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Some(mode) = file.unix_mode() {
                    std::fs::set_permissions(&outpath, std::fs::Permissions::from_mode(mode))
                        .ok();
                }
            }
        }
        written += 1;
    }

    Ok(written)
}
