//! Reading documents and writing locked/unlocked output.

use anyhow::{Context, Result};
use getrandom::fill;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Extension appended to locked containers.
pub const LOCKED_EXT: &str = "locked";
const PDF_EXT: &str = "pdf";
const UNLOCKED_EXT: &str = "unlocked";

/// A file on disk holding a document or a container.
#[derive(Clone, Debug)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    /// Creates a new Storage instance with the given path.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Returns `true` if the file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Loads the entire file into memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn load(&self) -> Result<Vec<u8>> {
        fs::read(&self.path).with_context(|| format!("failed to read {}", self.path.display()))
    }

    /// Saves data using an atomic write.
    ///
    /// Data goes to a uniquely named temporary file in the same directory,
    /// is fsynced, then renamed over the target. The parent directory is
    /// fsynced afterwards so the rename survives a crash. Readers see either
    /// the old file or the complete new one.
    ///
    /// On Unix the file is created with mode `0600`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, data: &[u8]) -> Result<()> {
        if let Some(parent) = self.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = self.random_tmp_path()?;

        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut tmp_file = options
            .open(&tmp_path)
            .context("failed to create temporary file")?;

        if let Err(e) = tmp_file.write_all(data).and_then(|_| tmp_file.sync_all()) {
            drop(tmp_file);
            let _ = fs::remove_file(&tmp_path);
            return Err(e).context("failed to write temporary file");
        }
        drop(tmp_file);

        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e).with_context(|| format!("failed to replace {}", self.path.display()));
        }

        #[cfg(unix)]
        {
            if let Some(parent) = self.parent() {
                File::open(parent)?.sync_all()?;
            }
        }

        Ok(())
    }

    /// Returns the path to the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent(&self) -> Option<&Path> {
        self.path.parent().filter(|p| !p.as_os_str().is_empty())
    }

    /// Generates a unique temporary path next to the target.
    ///
    /// Format: `filename.tmp.<randomhex>`
    fn random_tmp_path(&self) -> Result<PathBuf> {
        let mut buf = [0u8; 8]; // 64 bit entropy
        fill(&mut buf).map_err(|_| anyhow::anyhow!("OS random generator unavailable"))?;

        let rand_string = buf.iter().map(|b| format!("{:02x}", b)).collect::<String>();

        let file_name = self
            .path
            .file_name()
            .context("output path has no file name")?
            .to_string_lossy();

        let tmp_name = format!("{}.tmp.{}", file_name, rand_string);

        Ok(self.path.with_file_name(tmp_name))
    }
}

/// Default output path when locking `input`.
///
/// `report.pdf` becomes `report.locked`; any other name gets `.locked`
/// appended, so `notes.txt` becomes `notes.txt.locked`.
pub fn locked_path(input: &Path) -> PathBuf {
    if has_extension(input, PDF_EXT) {
        input.with_extension(LOCKED_EXT)
    } else {
        append_extension(input, LOCKED_EXT)
    }
}

/// Default output path when unlocking `input`.
///
/// `report.locked` becomes `report.pdf`, `notes.txt.locked` becomes
/// `notes.txt`, and a name without `.locked` gets `.unlocked` appended.
pub fn unlocked_path(input: &Path) -> PathBuf {
    if !has_extension(input, LOCKED_EXT) {
        return append_extension(input, UNLOCKED_EXT);
    }

    let stripped = input.with_extension("");
    if stripped.extension().is_some() {
        stripped
    } else {
        stripped.with_extension(PDF_EXT)
    }
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .is_some_and(|e| e.to_string_lossy().eq_ignore_ascii_case(ext))
}

fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}
