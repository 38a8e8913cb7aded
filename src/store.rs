use std::fs;
use std::path::PathBuf;

use anyhow::Context as _;
use chrono::NaiveDate;
use log::warn;

use crate::document::Document;

/// Read-only view of the flat post collection.
///
/// Posts are stored one per file as `YYYY-MM-DD-slug.md`; the filename prefix
/// fixes the scan order and, together with the front matter date, the output
/// URL. Anything not matching the convention is skipped.
#[derive(Debug, Clone)]
pub(crate) struct DocumentStore {
    post_dir: PathBuf,
}

impl DocumentStore {
    pub fn new(post_dir: PathBuf) -> Self {
        Self { post_dir }
    }

    /// Lazy iterator over the collection, newest filename first. Each call
    /// rescans the directory, so the sequence is restartable.
    pub fn iter(&self) -> anyhow::Result<Documents> {
        let name_pattern =
            regex::Regex::new(r"^(\d{4}-\d{2}-\d{2})-(.+)\.(?:md|markdown)$").unwrap();

        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.post_dir)
            .with_context(|| format!("while reading {:?}", self.post_dir))?
        {
            let entry = entry?;
            if !entry.metadata()?.is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().to_string();
            let Some(caps) = name_pattern.captures(&file_name) else {
                warn!("{file_name:?} does not match the post naming convention. skipping...");
                continue;
            };
            let Ok(date) = NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d") else {
                warn!("{file_name:?} has an impossible date in its name. skipping...");
                continue;
            };
            entries.push((date, entry.path()));
        }

        // newest first; same-day posts by filename, also descending
        entries.sort_by(|a, b| b.cmp(a));

        Ok(Documents { entries, next: 0 })
    }

    /// All valid documents, ordered by descending front matter date. Fails on
    /// the first malformed document.
    pub fn list_documents(&self) -> anyhow::Result<Vec<Document>> {
        let mut documents = self.iter()?.collect::<anyhow::Result<Vec<_>>>()?;
        documents.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.slug.cmp(&a.slug)));
        Ok(documents)
    }
}

/// Iterator returned by [`DocumentStore::iter`]. Files are read and parsed
/// one at a time, on `next`.
pub(crate) struct Documents {
    entries: Vec<(NaiveDate, PathBuf)>,
    next: usize,
}

impl Iterator for Documents {
    type Item = anyhow::Result<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        let (name_date, path) = self.entries.get(self.next)?.clone();
        self.next += 1;
        Some(read_document(&path, name_date))
    }
}

fn read_document(path: &PathBuf, name_date: NaiveDate) -> anyhow::Result<Document> {
    let raw = fs::read_to_string(path).with_context(|| format!("while reading {:?}", path))?;
    let document = Document::parse(&raw, path).with_context(|| format!("while parsing {:?}", path))?;
    if document.date != name_date {
        // the declared date wins; the filename only orders the scan
        warn!(
            "{:?}: front matter date {} differs from the filename date {}",
            path, document.date, name_date
        );
    }
    Ok(document)
}
