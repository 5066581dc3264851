//! Recursive copy and removal of directory trees.
//!
//! Application bundles contain relative symlinks (macOS frameworks in
//! particular), so copies recreate symlinks instead of following them.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

/// Copy `src` to `dst`, which must not exist yet.
///
/// `src` may be a file, a directory, or a symlink. Directories are copied
/// recursively; symlinks are recreated with the same target on unix.
pub fn copy_tree(src: &Path, dst: &Path) -> anyhow::Result<()> {
    let meta = fs::symlink_metadata(src)
        .with_context(|| format!("Failed to stat {}", src.display()))?;
    let ty = meta.file_type();

    if ty.is_symlink() {
        copy_symlink(src, dst)
    } else if ty.is_dir() {
        fs::create_dir_all(dst)
            .with_context(|| format!("Failed to create directory: {}", dst.display()))?;
        for entry in fs::read_dir(src)
            .with_context(|| format!("Failed to read directory: {}", src.display()))?
        {
            let entry = entry
                .with_context(|| format!("Failed to read directory entry in {}", src.display()))?;
            copy_tree(&entry.path(), &dst.join(entry.file_name()))?;
        }
        fs::set_permissions(dst, meta.permissions())
            .with_context(|| format!("Failed to set permissions on {}", dst.display()))?;
        Ok(())
    } else {
        fs::copy(src, dst).with_context(|| {
            format!("Failed to copy {} to {}", src.display(), dst.display())
        })?;
        Ok(())
    }
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> anyhow::Result<()> {
    let target = fs::read_link(src)
        .with_context(|| format!("Failed to read symlink: {}", src.display()))?;
    std::os::unix::fs::symlink(&target, dst)
        .with_context(|| format!("Failed to create symlink: {}", dst.display()))
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> anyhow::Result<()> {
    // Follow the link; Windows symlinks need elevated privileges to create.
    if src.is_dir() {
        fs::create_dir_all(dst)
            .with_context(|| format!("Failed to create directory: {}", dst.display()))?;
        for entry in fs::read_dir(src)? {
            let entry = entry?;
            copy_tree(&entry.path(), &dst.join(entry.file_name()))?;
        }
        Ok(())
    } else {
        fs::copy(src, dst)
            .with_context(|| format!("Failed to copy {} to {}", src.display(), dst.display()))?;
        Ok(())
    }
}

/// Remove a file, symlink, or directory tree. Returns whether anything was removed.
pub fn remove_path(path: &Path) -> anyhow::Result<bool> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to stat {}", path.display()));
        }
    };

    if meta.is_dir() {
        fs::remove_dir_all(path)
            .with_context(|| format!("Failed to remove directory: {}", path.display()))?;
    } else {
        fs::remove_file(path)
            .with_context(|| format!("Failed to remove file: {}", path.display()))?;
    }
    Ok(true)
}

/// A path next to `dst` that does not exist yet, for staging a replacement.
pub fn unique_temp_path(dst: &Path) -> anyhow::Result<PathBuf> {
    let parent = dst
        .parent()
        .ok_or_else(|| anyhow::anyhow!("Destination path has no parent: {}", dst.display()))?;
    let base = dst
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Destination path has no filename: {}", dst.display()))?;

    for attempt in 0u32..1000 {
        let name = if attempt == 0 {
            format!(".{}.tmp.{}", base.to_string_lossy(), std::process::id())
        } else {
            format!(
                ".{}.tmp.{}.{}",
                base.to_string_lossy(),
                std::process::id(),
                attempt
            )
        };
        let candidate = parent.join(name);
        if fs::symlink_metadata(&candidate).is_err() {
            return Ok(candidate);
        }
    }

    anyhow::bail!(
        "Failed to allocate a unique temp path for {}",
        dst.display()
    );
}

/// Move the fully built `tmp` over `dst`. Returns whether `dst` existed.
///
/// `tmp` must be a sibling of `dst` so the rename stays on one filesystem.
pub fn replace_with_tmp(tmp: &Path, dst: &Path) -> anyhow::Result<bool> {
    let replaced = remove_path(dst).with_context(|| {
        format!("Failed to remove existing destination: {}", dst.display())
    })?;
    fs::rename(tmp, dst).with_context(|| {
        format!(
            "Failed to move temp path {} into destination {}",
            tmp.display(),
            dst.display()
        )
    })?;
    Ok(replaced)
}

/// Copy `src` over `dst` through a temp sibling. `dst` is untouched when
/// the copy fails.
pub fn replace_tree(src: &Path, dst: &Path) -> anyhow::Result<bool> {
    let tmp = unique_temp_path(dst)?;
    if let Err(err) = copy_tree(src, &tmp) {
        let _ = remove_path(&tmp);
        return Err(err);
    }
    replace_with_tmp(&tmp, dst)
}
