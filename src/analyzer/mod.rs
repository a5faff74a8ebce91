//! Single-pass directory analysis.
//!
//! The walk is synchronous and depth-first. Unreadable entries and subtrees are
//! reported to a [`WalkObserver`] and skipped; only a failure on the root itself
//! aborts the analysis.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::types::{AnalysisResult, FileRecord, SizeBucket, SizeHistogram};

mod classify;

pub use classify::{
    file_extension, format_size, EXTENSION_LIMIT, FIVE_MB, FIVE_TWELVE_MB, GB, HIDDEN_EXTENSION,
    HUNDRED_MB, KB, LONG_EXTENSION, MB, NO_EXTENSION,
};

/// The walk could not proceed at all (root missing or unreadable).
#[derive(Debug, Error)]
#[error("error walking directory {root}: {source}")]
pub struct WalkError {
    pub root: String,
    #[source]
    pub source: io::Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// A directory could not be read; nothing below it was visited.
    SkippedSubtree,
    /// A non-directory entry could not be accessed.
    SkippedEntry,
    /// The file was accessible but its size could not be read.
    MetadataUnavailable,
}

/// Non-fatal problem encountered during a walk.
#[derive(Debug, Clone)]
pub struct WalkWarning {
    pub path: PathBuf,
    pub kind: WarningKind,
    pub message: String,
}

/// Receives the warnings of a walk.
pub trait WalkObserver {
    fn warning(&mut self, warning: WalkWarning);
}

/// Logs warnings through `tracing` and counts them.
#[derive(Debug, Default)]
pub struct TracingObserver {
    warnings: usize,
}

impl TracingObserver {
    pub fn warnings(&self) -> usize {
        self.warnings
    }
}

impl WalkObserver for TracingObserver {
    fn warning(&mut self, warning: WalkWarning) {
        self.warnings += 1;
        match warning.kind {
            WarningKind::SkippedSubtree | WarningKind::SkippedEntry => warn!(
                "Access error for {}: {}. Skipping...",
                warning.path.display(),
                warning.message
            ),
            WarningKind::MetadataUnavailable => warn!(
                "Cannot get info for {}: {}. Skipping...",
                warning.path.display(),
                warning.message
            ),
        }
    }
}

/// Discards all warnings.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl WalkObserver for NullObserver {
    fn warning(&mut self, _warning: WalkWarning) {}
}

impl WalkObserver for Vec<WalkWarning> {
    fn warning(&mut self, warning: WalkWarning) {
        self.push(warning);
    }
}

/// Largest file-list capacity reserved up front. Bigger hints are clamped.
pub const MAX_INITIAL_CAPACITY: usize = 1_000_000;

#[derive(Debug, Clone)]
pub struct AnalyzerOptions {
    /// Capacity hint for the file list. Only affects allocation and is
    /// clamped to [`MAX_INITIAL_CAPACITY`].
    pub initial_capacity: usize,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self { initial_capacity: 128_000 }
    }
}

/// One item produced by a [`Traversal`].
#[derive(Debug)]
enum Step {
    Dir(PathBuf),
    File { path: PathBuf, size: io::Result<u64> },
    /// Symlinks, sockets, devices.
    Other,
    Failure { depth: usize, path: Option<PathBuf>, error: io::Error },
}

/// Depth-first source of [`Step`]s that can abandon the directory it is
/// currently listing.
trait Traversal {
    fn next_step(&mut self) -> Option<Step>;
    fn skip_current_dir(&mut self);
}

/// Sorted, non-following walk over the real filesystem.
struct DirWalk {
    inner: walkdir::IntoIter,
}

impl DirWalk {
    fn new(root: &str) -> Self {
        Self { inner: WalkDir::new(root).follow_links(false).sort_by_file_name().into_iter() }
    }
}

impl Traversal for DirWalk {
    fn next_step(&mut self) -> Option<Step> {
        let step = match self.inner.next()? {
            Ok(entry) => {
                let file_type = entry.file_type();
                if file_type.is_dir() {
                    Step::Dir(entry.into_path())
                } else if file_type.is_file() {
                    let size = entry.metadata().map(|md| md.len()).map_err(io::Error::from);
                    Step::File { path: entry.into_path(), size }
                } else {
                    Step::Other
                }
            }
            Err(err) => Step::Failure {
                depth: err.depth(),
                path: err.path().map(Path::to_path_buf),
                error: err.into(),
            },
        };
        Some(step)
    }

    fn skip_current_dir(&mut self) {
        self.inner.skip_current_dir();
    }
}

/// What the walk does after visiting one entry.
#[derive(Debug)]
enum Visit {
    Continue,
    SkipSubtree,
    Abort(WalkError),
}

#[derive(Debug)]
struct Accumulator {
    files: Vec<FileRecord>,
    histogram: SizeHistogram,
    total_size: u64,
}

impl Accumulator {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            files: Vec::with_capacity(capacity.min(MAX_INITIAL_CAPACITY)),
            histogram: SizeHistogram::default(),
            total_size: 0,
        }
    }

    fn add(&mut self, path: &Path, size: u64) {
        self.total_size = self.total_size.saturating_add(size);
        self.histogram.record(SizeBucket::classify(size));
        let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        self.files.push(FileRecord { path: to_slash(path), size, extension: file_extension(&name) });
    }

    fn finish(self, root: &str) -> AnalysisResult {
        AnalysisResult {
            file_count: self.files.len(),
            files: self.files,
            size_histogram: self.histogram,
            total_size: self.total_size,
            scanned_path: root.to_string(),
        }
    }
}

/// Walks a directory tree and aggregates per-file metadata.
///
/// Each call to [`Analyzer::analyze`] builds an independent result, so separate
/// analyzers can run concurrently on overlapping trees.
pub struct Analyzer<O = TracingObserver> {
    options: AnalyzerOptions,
    observer: O,
}

impl Analyzer<TracingObserver> {
    pub fn new(options: AnalyzerOptions) -> Self {
        Self { options, observer: TracingObserver::default() }
    }
}

impl<O: WalkObserver> Analyzer<O> {
    pub fn with_observer<P: WalkObserver>(self, observer: P) -> Analyzer<P> {
        Analyzer { options: self.options, observer }
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn into_observer(self) -> O {
        self.observer
    }

    /// Analyzes the tree rooted at `root`.
    ///
    /// Assumes `root` was validated by the caller. Zero-byte files and
    /// non-regular entries are ignored; symlinks below the root are not
    /// followed.
    ///
    /// # Errors
    ///
    /// Returns [`WalkError`] when the root itself cannot be accessed or listed.
    /// No partial result is produced in that case.
    pub fn analyze(&mut self, root: &str) -> Result<AnalysisResult, WalkError> {
        self.run(root, &mut DirWalk::new(root))
    }

    fn run<T: Traversal>(&mut self, root: &str, walk: &mut T) -> Result<AnalysisResult, WalkError> {
        info!("Starting analysis for path: {}", root);
        let started = Instant::now();

        let mut acc = Accumulator::with_capacity(self.options.initial_capacity);
        // A listing failure is reported right after its directory was yielded.
        let mut entered: Option<PathBuf> = None;

        while let Some(step) = walk.next_step() {
            let last_dir = entered.take();
            let visit = match step {
                Step::Dir(path) => {
                    entered = Some(path);
                    Visit::Continue
                }
                // Links, sockets and devices are not files.
                Step::Other => Visit::Continue,
                Step::File { path, size } => self.record_file(path, size, &mut acc),
                Step::Failure { depth, path, error } => {
                    self.walk_error(root, depth, path, last_dir.as_deref(), error)
                }
            };
            match visit {
                Visit::Continue => {}
                Visit::SkipSubtree => walk.skip_current_dir(),
                Visit::Abort(err) => {
                    debug!("Walk of {} aborted after {:?}", root, started.elapsed());
                    return Err(err);
                }
            }
        }

        info!("Walk finished in {:?}. Found {} file entries.", started.elapsed(), acc.files.len());
        Ok(acc.finish(root))
    }

    fn record_file(&mut self, path: PathBuf, size: io::Result<u64>, acc: &mut Accumulator) -> Visit {
        match size {
            Ok(0) => {}
            Ok(size) => acc.add(&path, size),
            Err(err) => self.observer.warning(WalkWarning {
                path,
                kind: WarningKind::MetadataUnavailable,
                message: err.to_string(),
            }),
        }
        Visit::Continue
    }

    fn walk_error(
        &mut self,
        root: &str,
        depth: usize,
        path: Option<PathBuf>,
        last_dir: Option<&Path>,
        error: io::Error,
    ) -> Visit {
        // Depth 0 means the root itself: nothing else can be walked.
        if depth == 0 {
            return Visit::Abort(WalkError { root: root.to_string(), source: error });
        }

        // Only the directory being listed may be skipped. Any other failing
        // path (including a symlink to a directory) loses just that entry.
        let listing_failed = path.is_some() && path.as_deref() == last_dir;
        self.observer.warning(WalkWarning {
            path: path.unwrap_or_default(),
            kind: if listing_failed { WarningKind::SkippedSubtree } else { WarningKind::SkippedEntry },
            message: error.to_string(),
        });

        if listing_failed {
            Visit::SkipSubtree
        } else {
            Visit::Continue
        }
    }
}

/// Analyzes `root` with default options, logging warnings through `tracing`.
pub fn analyze_directory(root: &str) -> Result<AnalysisResult, WalkError> {
    Analyzer::new(AnalyzerOptions::default()).analyze(root)
}

fn to_slash(path: &Path) -> String {
    let s = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        s.into_owned()
    } else {
        s.replace(std::path::MAIN_SEPARATOR, "/")
    }
}
