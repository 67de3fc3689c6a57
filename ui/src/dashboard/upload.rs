//! Upload queue: the files waiting to be sent for analysis.

use api::UploadFile;

use crate::core::config::{DashboardConfig, FileKind};

/// A file picked or dropped by the user, already read into memory.
#[derive(Debug, Clone, PartialEq)]
pub struct FileHandle {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl FileHandle {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueuedFile {
    pub name: String,
    pub kind: FileKind,
    pub bytes: Vec<u8>,
}

impl QueuedFile {
    pub fn size_label(&self) -> String {
        let size = self.bytes.len() as f64;
        if size >= 1_048_576.0 {
            format!("{:.1} MB", size / 1_048_576.0)
        } else {
            format!("{:.1} KB", size / 1024.0)
        }
    }
}

/// Outcome of one `add_files` call, by file name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddReport {
    pub added: Vec<String>,
    pub rejected: Vec<String>,
    pub duplicates: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadQueue {
    files: Vec<QueuedFile>,
}

impl UploadQueue {
    /// Accept supported files whose names are not already queued.
    pub fn add_files(&mut self, candidates: Vec<FileHandle>, config: &DashboardConfig) -> AddReport {
        let mut report = AddReport::default();
        for candidate in candidates {
            let Some(kind) = config.accepts(&candidate.name) else {
                report.rejected.push(candidate.name);
                continue;
            };
            if self.files.iter().any(|queued| queued.name == candidate.name) {
                report.duplicates.push(candidate.name);
                continue;
            }
            report.added.push(candidate.name.clone());
            self.files.push(QueuedFile {
                name: candidate.name,
                kind,
                bytes: candidate.bytes,
            });
        }
        report
    }

    pub fn remove_file(&mut self, index: usize) -> Option<QueuedFile> {
        (index < self.files.len()).then(|| self.files.remove(index))
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn files(&self) -> &[QueuedFile] {
        &self.files
    }

    pub fn meets_minimum(&self, config: &DashboardConfig) -> bool {
        !self.files.is_empty() && self.files.len() >= config.min_files
    }

    /// Request parts, one per queued file, in queue order.
    pub fn to_upload(&self) -> Vec<UploadFile> {
        self.files
            .iter()
            .map(|file| UploadFile::new(file.name.clone(), file.kind.mime(), file.bytes.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(name: &str) -> FileHandle {
        FileHandle::new(name, b"date,horse,odds\n".to_vec())
    }

    #[test]
    fn same_name_twice_is_queued_once() {
        let config = DashboardConfig::default();
        let mut queue = UploadQueue::default();
        queue.add_files(vec![handle("tips.csv")], &config);
        let report = queue.add_files(vec![handle("tips.csv")], &config);
        assert_eq!(queue.len(), 1);
        assert_eq!(report.duplicates, vec!["tips.csv"]);
    }

    #[test]
    fn duplicates_within_one_batch_are_dropped() {
        let config = DashboardConfig::default();
        let mut queue = UploadQueue::default();
        let report = queue.add_files(vec![handle("a.csv"), handle("a.csv")], &config);
        assert_eq!(report.added, vec!["a.csv"]);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn unsupported_types_are_rejected() {
        let config = DashboardConfig::default();
        let mut queue = UploadQueue::default();
        let report = queue.add_files(vec![handle("notes.txt"), handle("book.xlsx")], &config);
        assert_eq!(report.rejected, vec!["notes.txt"]);
        assert_eq!(queue.files()[0].kind, FileKind::Xlsx);
    }

    #[test]
    fn remove_out_of_range_is_noop() {
        let config = DashboardConfig::default();
        let mut queue = UploadQueue::default();
        queue.add_files(vec![handle("a.csv"), handle("b.csv")], &config);
        assert!(queue.remove_file(5).is_none());
        assert_eq!(queue.remove_file(0).unwrap().name, "a.csv");
        assert_eq!(queue.files()[0].name, "b.csv");
    }

    #[test]
    fn minimum_count_policy() {
        let config = DashboardConfig {
            min_files: 3,
            ..DashboardConfig::default()
        };
        let mut queue = UploadQueue::default();
        assert!(!queue.meets_minimum(&config));
        queue.add_files(vec![handle("a.csv"), handle("b.csv")], &config);
        assert!(!queue.meets_minimum(&config));
        queue.add_files(vec![handle("c.csv")], &config);
        assert!(queue.meets_minimum(&config));
        assert!(queue.to_upload().iter().all(|f| f.mime == "text/csv"));
    }
}
