use std::{process::Stdio, thread};

use crate::{Error, PackageManager};

/// Number of header lines printed before the package table
const HEADER_LINES: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPackage {
    pub name: String,
    pub version: String,
}

/// Parse the columns output of `<package manager> list`.
///
/// The first two lines are the table header. Every other line is split on whitespace into a
/// name and a version; lines with fewer than two fields are skipped.
pub fn parse_package_list(text: &str) -> Vec<InstalledPackage> {
    text.lines()
        .skip(HEADER_LINES)
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let name = fields.next()?;
            let version = fields.next()?;
            Some(InstalledPackage {
                name: name.to_string(),
                version: version.to_string(),
            })
        })
        .collect()
}

/// Query the installed packages on a background thread.
///
/// The worker only runs the command and parses its output; the result is handed back
/// through the returned one-shot receiver.
pub fn list_installed(
    manager: &PackageManager,
) -> oneshot::Receiver<Result<Vec<InstalledPackage>, Error>> {
    let (tx, rx) = oneshot::channel();
    let manager = manager.clone();
    thread::spawn(move || {
        let result = run_list(&manager);
        if let Err(e) = &result {
            tracing::warn!(error = %e, "listing installed packages");
        }
        let _ = tx.send(result);
    });
    rx
}

#[tracing::instrument]
fn run_list(manager: &PackageManager) -> Result<Vec<InstalledPackage>, Error> {
    let output = manager
        .command("list", ["--format=columns"])
        .stdin(Stdio::null())
        .output()?;

    if !output.status.success() {
        return Err(Error::ListFailed {
            status: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let packages = parse_package_list(&String::from_utf8_lossy(&output.stdout));
    tracing::debug!(count = packages.len(), "packages listed");
    Ok(packages)
}
