//! Fetching and converting NameNode images with the `hdfs` command line.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::SystemTime;

use color_eyre::eyre::{Context, Result, bail, eyre};
use tracing::{debug, info};

const IMAGE_PREFIX: &str = "fsimage_";

/// Download the latest fsimage into `dir` and return its path.
pub fn fetch_image(dir: &Path) -> Result<PathBuf> {
    eprintln!("Fetching fsimage from HDFS");
    run(Command::new("hdfs")
        .arg("dfsadmin")
        .arg("-fetchImage")
        .arg(dir))?;

    newest_image(dir)?.ok_or_else(|| {
        eyre!(
            "Failed fetching fsimage from HDFS: no {IMAGE_PREFIX}* file in {}",
            dir.display()
        )
    })
}

/// Convert a binary fsimage to XML under `dir`, returning the XML path.
pub fn convert_image(image: &Path, dir: &Path) -> Result<PathBuf> {
    let xml = xml_path(image, dir)?;
    eprintln!("Converting {} to XML", image.display());
    run(Command::new("hdfs")
        .arg("oiv")
        .arg("-i")
        .arg(image)
        .arg("-o")
        .arg(&xml)
        .arg("-p")
        .arg("XML"))?;
    info!("Converted image written to {}", xml.display());
    Ok(xml)
}

/// `<dir>/<image basename>.xml`
fn xml_path(image: &Path, dir: &Path) -> Result<PathBuf> {
    let name = image
        .file_name()
        .ok_or_else(|| eyre!("Image path has no file name: {}", image.display()))?;
    let mut xml = name.to_os_string();
    xml.push(".xml");
    Ok(dir.join(xml))
}

/// Most recently modified `fsimage_*` file in `dir`, ignoring checksums.
fn newest_image(dir: &Path) -> Result<Option<PathBuf>> {
    let entries = std::fs::read_dir(dir).with_context(|| format!("Cannot list {}", dir.display()))?;

    let mut newest: Option<(SystemTime, PathBuf)> = None;
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if !is_image_name(entry.file_name().as_os_str()) {
            continue;
        }
        let modified = entry.metadata()?.modified()?;
        debug!(path = %path.display(), "found fetched image");
        if newest.as_ref().is_none_or(|(time, _)| modified > *time) {
            newest = Some((modified, path));
        }
    }

    Ok(newest.map(|(_, path)| path))
}

fn is_image_name(name: &OsStr) -> bool {
    name.to_str()
        .is_some_and(|name| name.starts_with(IMAGE_PREFIX) && !name.ends_with(".md5"))
}

fn run(command: &mut Command) -> Result<()> {
    debug!(?command, "running");
    let status = command
        .status()
        .with_context(|| format!("Failed to run {:?}", command.get_program()))?;
    if !status.success() {
        bail!("{:?} exited with {status}", command.get_program());
    }
    Ok(())
}
