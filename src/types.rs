use serde::{Deserialize, Serialize};

/// A regular, non-empty file seen during a walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Full path with `/` separators.
    #[serde(rename = "name")]
    pub path: String,
    pub size: u64,
    /// Normalized extension such as `.txt`, or one of the sentinels
    /// `<no ext>`, `<hidden>`, `<long ext>`.
    #[serde(rename = "ext")]
    pub extension: String,
}

/// One of the seven disjoint size ranges. Thresholds are strict lower bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeBucket {
    UpTo1Kb,
    Over1Kb,
    Over1Mb,
    Over5Mb,
    Over100Mb,
    Over512Mb,
    Over1Gb,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeHistogram {
    #[serde(rename = "countLess1KB")]
    pub up_to_1kb: u64,
    #[serde(rename = "countMore1KB")]
    pub over_1kb: u64,
    #[serde(rename = "countMore1MB")]
    pub over_1mb: u64,
    #[serde(rename = "countMore5MB")]
    pub over_5mb: u64,
    #[serde(rename = "countMore100MB")]
    pub over_100mb: u64,
    #[serde(rename = "countMore512MB")]
    pub over_512mb: u64,
    #[serde(rename = "countMore1GB")]
    pub over_1gb: u64,
}

impl SizeHistogram {
    pub fn record(&mut self, bucket: SizeBucket) {
        let counter = match bucket {
            SizeBucket::UpTo1Kb => &mut self.up_to_1kb,
            SizeBucket::Over1Kb => &mut self.over_1kb,
            SizeBucket::Over1Mb => &mut self.over_1mb,
            SizeBucket::Over5Mb => &mut self.over_5mb,
            SizeBucket::Over100Mb => &mut self.over_100mb,
            SizeBucket::Over512Mb => &mut self.over_512mb,
            SizeBucket::Over1Gb => &mut self.over_1gb,
        };
        *counter += 1;
    }

    /// Sum over all buckets.
    pub fn total(&self) -> u64 {
        self.up_to_1kb
            + self.over_1kb
            + self.over_1mb
            + self.over_5mb
            + self.over_100mb
            + self.over_512mb
            + self.over_1gb
    }
}

/// Result of a single directory analysis.
///
/// `file_count == files.len() == size_histogram.total()` and `total_size` is
/// the sum of all file sizes. `files` keeps walk order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub files: Vec<FileRecord>,
    #[serde(rename = "sizeCounts")]
    pub size_histogram: SizeHistogram,
    #[serde(rename = "totalSize")]
    pub total_size: u64,
    #[serde(rename = "fileCount")]
    pub file_count: usize,
    #[serde(rename = "scannedPath")]
    pub scanned_path: String,
}

// Query string of GET /api/analyze
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeQuery {
    pub dir: Option<String>,
}
