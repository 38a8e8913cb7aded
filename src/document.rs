use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub(crate) enum ParseError {
    #[error("document has no front matter block")]
    MissingFrontMatter,
    #[error("front matter block is missing its closing `---`")]
    UnterminatedFrontMatter,
    #[error("invalid front matter line: {0:?}")]
    InvalidLine(String),
    #[error("invalid list syntax: {0:?}")]
    InvalidList(String),
    #[error("invalid date {value:?}: {source}")]
    InvalidDate {
        value: String,
        source: chrono::ParseError,
    },
    #[error("duplicate front matter key: {0}")]
    DuplicateKey(String),
    #[error("missing required front matter key: {0}")]
    MissingKey(&'static str),
}

/// One article: parsed front matter plus the untouched markdown body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Document {
    pub layout: String,
    pub title: String,
    pub date: NaiveDate,
    pub tags: Vec<String>,
    pub summary: Option<String>,
    pub permalink: Option<String>,
    pub slug: String,
    pub source: PathBuf,
    pub body: String,
}

const DEFAULT_LAYOUT: &str = "post";

impl Document {
    /// Splits the leading front matter block from `raw` and parses it.
    ///
    /// The block is delimited by `---` lines (pandoc/Jekyll style) and holds
    /// simple `key: value` pairs. A document without a block, or with an
    /// unterminated block, is rejected as a whole; no partial document is
    /// ever produced.
    pub fn parse(raw: &str, source: &Path) -> Result<Document, ParseError> {
        let header_pattern =
            regex::RegexBuilder::new(r"\A---[ \t]*\r?\n(.*?)^---[ \t]*(?:\r?\n(.*))?\z")
                .multi_line(true)
                .dot_matches_new_line(true)
                .build()
                .unwrap();

        let caps = match header_pattern.captures(raw) {
            Some(caps) => caps,
            None if raw.starts_with("---") => return Err(ParseError::UnterminatedFrontMatter),
            None => return Err(ParseError::MissingFrontMatter),
        };

        let mut layout = None;
        let mut title = None;
        let mut date = None;
        let mut tags = None;
        let mut summary = None;
        let mut permalink = None;

        for line in caps[1].lines() {
            if line.trim().is_empty() {
                continue;
            }
            let (name, value) = line
                .split_once(':')
                .ok_or_else(|| ParseError::InvalidLine(line.to_string()))?;

            let name = name.trim();
            let value = value.trim();
            match name {
                "layout" => set_scalar(&mut layout, name, value)?,
                "title" => set_scalar(&mut title, name, value)?,
                "summary" => set_scalar(&mut summary, name, value)?,
                "permalink" => set_scalar(&mut permalink, name, value)?,
                "date" => {
                    if date.is_some() {
                        return Err(ParseError::DuplicateKey(name.to_string()));
                    }
                    date = Some(NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(
                        |source| ParseError::InvalidDate {
                            value: value.to_string(),
                            source,
                        },
                    )?);
                }
                "tags" => {
                    if tags.is_some() {
                        return Err(ParseError::DuplicateKey(name.to_string()));
                    }
                    tags = Some(parse_list(value)?);
                }
                // unknown keys are tolerated, same as unknown markdown extensions
                _ => {}
            }
        }

        Ok(Document {
            layout: layout.unwrap_or_else(|| DEFAULT_LAYOUT.to_string()),
            title: title.ok_or(ParseError::MissingKey("title"))?,
            date: date.ok_or(ParseError::MissingKey("date"))?,
            tags: tags.unwrap_or_default(),
            summary,
            permalink,
            slug: slug_of(source),
            source: source.to_path_buf(),
            body: caps.get(2).map_or("", |m| m.as_str()).to_string(),
        })
    }

    /// Output path of the rendered page: the `permalink` override when the
    /// author gave one, otherwise the date-partitioned path from the
    /// publication date and the storage filename's slug.
    pub fn url(&self) -> String {
        match &self.permalink {
            Some(permalink) => permalink.clone(),
            None => format!("/{}/{}.html", self.date.format("%Y/%m/%d"), self.slug),
        }
    }
}

/// Canonical serialization: quoted scalars, bracketed tag list, body verbatim.
/// For any parse-produced document, `Document::parse` of this output
/// reproduces the document exactly. (List items are written bare, so a
/// hand-built tag containing a comma has no parseable spelling.)
impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "---")?;
        writeln!(f, "layout: {}", self.layout)?;
        writeln!(f, "title: \"{}\"", self.title)?;
        writeln!(f, "date: {}", self.date.format("%Y-%m-%d"))?;
        writeln!(f, "tags: [{}]", self.tags.join(", "))?;
        if let Some(summary) = &self.summary {
            writeln!(f, "summary: \"{}\"", summary)?;
        }
        if let Some(permalink) = &self.permalink {
            writeln!(f, "permalink: {}", permalink)?;
        }
        writeln!(f, "---")?;
        write!(f, "{}", self.body)
    }
}

fn set_scalar(slot: &mut Option<String>, name: &str, value: &str) -> Result<(), ParseError> {
    if slot.is_some() {
        return Err(ParseError::DuplicateKey(name.to_string()));
    }
    *slot = Some(unquote(value).to_string());
    Ok(())
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// `[a, b]` is the canonical form; a bare `a, b` is tolerated. An opening
/// bracket without its closing one is malformed.
fn parse_list(value: &str) -> Result<Vec<String>, ParseError> {
    let inner = if let Some(rest) = value.strip_prefix('[') {
        rest.strip_suffix(']')
            .ok_or_else(|| ParseError::InvalidList(value.to_string()))?
    } else if value.ends_with(']') {
        return Err(ParseError::InvalidList(value.to_string()));
    } else {
        value
    };

    Ok(inner
        .split(',')
        .map(|item| unquote(item.trim()).to_string())
        .filter(|item| !item.is_empty())
        .collect())
}

/// Filename stem with the `YYYY-MM-DD-` prefix stripped when present.
fn slug_of(source: &Path) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let prefix = regex::Regex::new(r"^\d{4}-\d{2}-\d{2}-").unwrap();
    prefix.replace(&stem, "").to_string()
}
