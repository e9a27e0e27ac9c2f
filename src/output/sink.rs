//! Artifact destinations.
//!
//! This abstraction lets the generator write to the filesystem in normal
//! runs and to memory in tests.

use std::collections::{BTreeMap, HashSet};
use std::fs::{self, File};
use std::io::{self, BufWriter, ErrorKind, Write};
use std::path::PathBuf;

/// Destination for output artifacts.
pub trait ArtifactSink {
    /// Writer for one artifact.
    type Writer: Write;

    /// Creates the artifact `name` and returns a writer for it.
    fn create(&mut self, name: &str) -> io::Result<Self::Writer>;

    /// Completes an artifact.
    ///
    /// Consumes the writer so that the artifact is closed on return.
    fn finish(&mut self, name: &str, writer: Self::Writer) -> io::Result<()>;

    /// Removes whatever `create` left behind for an artifact that could not
    /// be completed. Its writer has already been dropped.
    fn discard(&mut self, name: &str) -> io::Result<()>;
}

/// Writes artifacts as files, optionally under a directory.
///
/// The directory is not created; if it is missing every artifact fails to
/// open.
#[derive(Debug, Clone, Default)]
pub struct DirectorySink {
    dir: Option<PathBuf>,
}

impl DirectorySink {
    /// Creates a sink writing into `dir`, or the working directory if `None`.
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    /// Path an artifact named `name` is written to.
    pub fn path_for(&self, name: &str) -> PathBuf {
        match &self.dir {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        }
    }
}

impl ArtifactSink for DirectorySink {
    type Writer = BufWriter<File>;

    fn create(&mut self, name: &str) -> io::Result<Self::Writer> {
        let path = self.path_for(name);
        let file = File::create(&path).map_err(|e| {
            io::Error::new(e.kind(), format!("{}: {}", path.display(), e))
        })?;
        Ok(BufWriter::new(file))
    }

    fn finish(&mut self, _name: &str, mut writer: Self::Writer) -> io::Result<()> {
        writer.flush()
    }

    fn discard(&mut self, name: &str) -> io::Result<()> {
        match fs::remove_file(self.path_for(name)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// Collects artifacts in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    artifacts: BTreeMap<String, Vec<u8>>,
    failing: HashSet<String>,
    discarded: Vec<String>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `create` fail for the artifact `name`.
    pub fn fail_on(&mut self, name: impl Into<String>) {
        self.failing.insert(name.into());
    }

    /// Returns all finished artifacts, ordered by name.
    pub fn artifacts(&self) -> &BTreeMap<String, Vec<u8>> {
        &self.artifacts
    }

    /// Returns the bytes of one artifact.
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.artifacts.get(name).map(Vec::as_slice)
    }

    /// Returns the names passed to `discard`, in order.
    pub fn discarded(&self) -> &[String] {
        &self.discarded
    }

    /// Returns the number of finished artifacts.
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Returns true if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

impl ArtifactSink for MemorySink {
    type Writer = Vec<u8>;

    fn create(&mut self, name: &str) -> io::Result<Self::Writer> {
        if self.failing.contains(name) {
            return Err(io::Error::new(
                ErrorKind::PermissionDenied,
                format!("{name}: refused by sink"),
            ));
        }
        Ok(Vec::new())
    }

    fn finish(&mut self, name: &str, writer: Self::Writer) -> io::Result<()> {
        self.artifacts.insert(name.to_string(), writer);
        Ok(())
    }

    fn discard(&mut self, name: &str) -> io::Result<()> {
        self.artifacts.remove(name);
        self.discarded.push(name.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_roundtrip() {
        let mut sink = MemorySink::new();
        let mut w = sink.create("a.pgm").unwrap();
        w.write_all(b"hello").unwrap();
        sink.finish("a.pgm", w).unwrap();

        assert_eq!(sink.get("a.pgm"), Some(&b"hello"[..]));
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_memory_sink_failure() {
        let mut sink = MemorySink::new();
        sink.fail_on("bad.pgm");
        assert!(sink.create("bad.pgm").is_err());
        assert!(sink.create("good.pgm").is_ok());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_directory_sink_paths() {
        assert_eq!(
            DirectorySink::new(None).path_for("x-00001.pgm"),
            PathBuf::from("x-00001.pgm")
        );
        assert_eq!(
            DirectorySink::new(Some(PathBuf::from("frames"))).path_for("x-00001.pgm"),
            PathBuf::from("frames").join("x-00001.pgm")
        );
    }

    #[test]
    fn test_directory_sink_writes_files() {
        let name = format!("pgm_pan_sink_{}.pgm", std::process::id());
        let mut sink = DirectorySink::new(Some(std::env::temp_dir()));
        let mut w = sink.create(&name).unwrap();
        w.write_all(b"P5\n").unwrap();
        sink.finish(&name, w).unwrap();

        let path = sink.path_for(&name);
        let written = std::fs::read(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(written.unwrap(), b"P5\n");
    }

    #[test]
    fn test_directory_sink_discard_removes_partial_file() {
        let name = format!("pgm_pan_partial_{}.pgm", std::process::id());
        let mut sink = DirectorySink::new(Some(std::env::temp_dir()));
        let mut w = sink.create(&name).unwrap();
        w.write_all(b"P5\n4 4\n").unwrap();
        drop(w);
        let path = sink.path_for(&name);
        assert!(path.exists());

        sink.discard(&name).unwrap();
        assert!(!path.exists());
        // Discarding a missing artifact is not an error.
        sink.discard(&name).unwrap();
    }

    #[test]
    fn test_memory_sink_discard() {
        let mut sink = MemorySink::new();
        let w = sink.create("a.pgm").unwrap();
        sink.finish("a.pgm", w).unwrap();
        sink.discard("a.pgm").unwrap();

        assert!(sink.is_empty());
        assert_eq!(sink.discarded(), &["a.pgm".to_string()]);
    }

    #[test]
    fn test_directory_sink_missing_dir_fails() {
        let mut sink = DirectorySink::new(Some(std::env::temp_dir().join("pgm_pan_no_such_dir")));
        assert!(sink.create("f.pgm").is_err());
    }
}
