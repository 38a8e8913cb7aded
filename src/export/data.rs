use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;

/// The hand-off file for the rendering pipeline: every document in
/// publication order, plus the tag index.
#[derive(Serialize, Debug)]
pub(super) struct Manifest<'a> {
    pub blog_name: &'a str,
    pub blog_url: &'a str,
    pub generated: NaiveDate,
    pub documents: Vec<DocumentEntry<'a>>,
    /// tag -> positions in `documents`
    pub tags: BTreeMap<&'a str, Vec<usize>>,
}

#[derive(Serialize, Debug)]
pub(super) struct DocumentEntry<'a> {
    pub layout: &'a str,
    pub title: &'a str,
    pub date: NaiveDate,
    pub tags: &'a [String],
    pub summary: String,
    pub url: String,
    pub source: &'a Path,
    pub body: &'a str,
}
