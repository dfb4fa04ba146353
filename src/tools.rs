//! Invocations of the external tools the build depends on.
//!
//! Downloads go through `curl`, archives are unpacked by `unzip`, `tar`,
//! `7z` or `unrar`, and web font conversion runs a short fontTools program
//! under the configured Python interpreter. Every call blocks until the
//! child process exits.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, Output};
use std::time::Duration;

use log::debug;

use crate::archive::ArchiveKind;
use crate::error::{Error, Result};

/// Seconds allowed for establishing a connection before a download fails.
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// fontTools program writing `.woff` and `.woff2` siblings for every font
/// passed on the command line. Originals are left untouched.
pub const CONVERTER_SCRIPT: &str = r#"
import sys
from os.path import splitext
from fontTools.ttLib import TTFont, sfnt

sfnt.USE_ZOPFLI = True
for source in sys.argv[1:]:
    stem = splitext(source)[0]
    for flavor in ("woff", "woff2"):
        target = "%s.%s" % (stem, flavor)
        print("%s => %s" % (source, target))
        font = TTFont(source, recalcBBoxes=False, recalcTimestamp=False)
        for tag in font.keys():
            if hasattr(font[tag], "compile"):
                font[tag].compile(font)
        font.flavor = flavor
        font.save(target, reorderTables=False)
"#;

/// Python modules the converter imports.
pub const CONVERTER_MODULES: &[&str] = &["fontTools", "brotli", "zopfli"];

/// Download `url` to `dest` with `curl`, removing any partial file on failure.
pub fn download(url: &str, dest: &Path, timeout: Duration) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut cmd = Command::new("curl");
    cmd.args(["--fail", "--location", "--silent", "--show-error"])
        .args(["--retry", "3"])
        .args(["--connect-timeout", &CONNECT_TIMEOUT_SECS.to_string()])
        .args(["--max-time", &timeout.as_secs().max(1).to_string()])
        .arg("--output")
        .arg(dest)
        .arg(url);

    let result = run(&mut cmd).and_then(|output| {
        if output.status.success() {
            Ok(())
        } else {
            Err(describe_failure("curl", &output))
        }
    });

    match result {
        Ok(()) if dest.is_file() => Ok(()),
        Ok(()) => Err(Error::Download {
            url: url.to_string(),
            message: "transfer finished without producing a file".to_string(),
        }),
        Err(message) => {
            let _ = fs::remove_file(dest);
            Err(Error::Download {
                url: url.to_string(),
                message,
            })
        }
    }
}

/// Unpack `archive` into `dest_dir` with the tool matching its kind.
pub fn extract(archive: &Path, kind: ArchiveKind, dest_dir: &Path) -> Result<()> {
    let mut cmd = match kind {
        ArchiveKind::Zip => {
            let mut cmd = Command::new("unzip");
            cmd.args(["-q", "-o"]).arg(archive).arg("-d").arg(dest_dir);
            cmd
        }
        ArchiveKind::TarGz | ArchiveKind::TarBz2 | ArchiveKind::Tar => {
            let flags = match kind {
                ArchiveKind::TarGz => "-xzf",
                ArchiveKind::TarBz2 => "-xjf",
                _ => "-xf",
            };
            let mut cmd = Command::new("tar");
            cmd.arg(flags).arg(archive).arg("-C").arg(dest_dir);
            cmd
        }
        ArchiveKind::SevenZip => {
            let mut cmd = Command::new("7z");
            cmd.args(["x", "-y"])
                .arg(format!("-o{}", dest_dir.display()))
                .arg(archive);
            cmd
        }
        ArchiveKind::Rar => {
            let mut cmd = Command::new("unrar");
            cmd.args(["x", "-o+", "-inul"])
                .arg(archive)
                .arg(format!("{}/", dest_dir.display()));
            cmd
        }
    };

    let program = extractor_program(kind);
    let output = run(&mut cmd).map_err(|message| Error::Extraction {
        archive: archive.display().to_string(),
        message,
    })?;
    if !output.status.success() {
        return Err(Error::Extraction {
            archive: archive.display().to_string(),
            message: describe_failure(program, &output),
        });
    }
    Ok(())
}

/// Name of the program that unpacks a given archive kind.
pub fn extractor_program(kind: ArchiveKind) -> &'static str {
    match kind {
        ArchiveKind::Zip => "unzip",
        ArchiveKind::TarGz | ArchiveKind::TarBz2 | ArchiveKind::Tar => "tar",
        ArchiveKind::SevenZip => "7z",
        ArchiveKind::Rar => "unrar",
    }
}

/// Run the conversion program in `dir` over `fonts` (file names relative to
/// `dir`).
pub fn convert_fonts(python: &Path, dir: &Path, fonts: &[String]) -> Result<()> {
    let mut cmd = Command::new(python);
    cmd.arg("-c")
        .arg(CONVERTER_SCRIPT)
        .args(fonts)
        .current_dir(dir);

    let output = run(&mut cmd).map_err(|message| Error::Conversion {
        dir: dir.display().to_string(),
        message,
    })?;
    for line in String::from_utf8_lossy(&output.stdout).lines() {
        debug!("{}", line);
    }
    if !output.status.success() {
        return Err(Error::Conversion {
            dir: dir.display().to_string(),
            message: describe_failure(&python.display().to_string(), &output),
        });
    }
    Ok(())
}

/// Whether `program` can be started at all. The exit status is ignored:
/// several archivers exit non-zero when asked for their usage text.
pub fn program_available(program: &Path, probe_args: &[&str]) -> bool {
    match Command::new(program).args(probe_args).output() {
        Ok(_) => true,
        Err(e) => {
            debug!("{} unavailable: {}", program.display(), e);
            false
        }
    }
}

/// Whether `python` can import `module`.
pub fn python_module_available(python: &Path, module: &str) -> bool {
    Command::new(python)
        .arg("-c")
        .arg(format!("import {}", module))
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

fn run(cmd: &mut Command) -> std::result::Result<Output, String> {
    debug!("Running: {:?}", cmd);
    cmd.output().map_err(|e| {
        let program = cmd.get_program().to_string_lossy().into_owned();
        if e.kind() == ErrorKind::NotFound {
            format!("'{}' is not installed or not on PATH", program)
        } else {
            format!("failed to run '{}': {}", program, e)
        }
    })
}

fn describe_failure(program: &str, output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        format!("{} exited with {}", program, output.status)
    } else {
        format!("{} exited with {}: {}", program, output.status, stderr)
    }
}
