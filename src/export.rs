use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::BufWriter;

use anyhow::Context as _;
use log::info;

use crate::context::Context;
use crate::feed;
use crate::store::DocumentStore;

use data::{DocumentEntry, Manifest};

mod data;
pub(crate) mod utils;

/// One build pass: list the collection, then hand it to the external
/// renderer as `manifest.json` and emit the Atom feed. With `check_only`
/// the collection is validated and nothing is written.
pub(crate) fn run(ctx: &Context, check_only: bool) -> anyhow::Result<()> {
    let store = DocumentStore::new(ctx.post_dir.clone());
    let documents = store.list_documents()?;
    info!("{} documents in {:?}", documents.len(), ctx.post_dir);

    if check_only {
        info!("check finished, nothing written");
        return Ok(());
    }

    // tag -> positions in the date-ordered document list
    let mut tags: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (idx, document) in documents.iter().enumerate() {
        for tag in document.tags.iter() {
            tags.entry(tag).or_default().push(idx);
        }
    }

    let manifest = Manifest {
        blog_name: &ctx.blog_name,
        blog_url: &ctx.blog_url,
        generated: chrono::Local::now().date_naive(),
        documents: documents
            .iter()
            .map(|document| DocumentEntry {
                layout: &document.layout,
                title: &document.title,
                date: document.date,
                tags: &document.tags,
                summary: document
                    .summary
                    .clone()
                    .unwrap_or_else(|| utils::excerpt(&document.body)),
                url: document.url(),
                source: &document.source,
                body: &document.body,
            })
            .collect(),
        tags,
    };

    fs::create_dir_all(&ctx.out_dir)
        .with_context(|| format!("while creating {:?}", ctx.out_dir))?;

    let manifest_path = ctx.out_dir.join("manifest.json");
    let fd = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&manifest_path)?;
    serde_json::to_writer_pretty(BufWriter::new(fd), &manifest)
        .with_context(|| format!("while writing {:?}", manifest_path))?;
    info!("wrote {:?}", manifest_path);

    feed::write_feed(ctx, &documents)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn context(posts: &Path, out: &Path) -> Context {
        Context {
            post_dir: posts.to_path_buf(),
            out_dir: out.to_path_buf(),
            blog_name: "Field Notes".to_string(),
            blog_url: "https://blog.example".to_string(),
        }
    }

    fn post(dir: &Path, name: &str, header_tail: &str, body: &str) {
        fs::write(dir.join(name), format!("---\n{header_tail}---\n{body}")).unwrap();
    }

    #[test]
    fn writes_manifest_and_feed() {
        let posts = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        post(
            posts.path(),
            "2024-05-07-first.md",
            "title: First\ndate: 2024-05-07\ntags: [a, b]\n",
            "hello\n",
        );
        post(
            posts.path(),
            "2024-06-01-second.md",
            "title: Second\ndate: 2024-06-01\ntags: [b]\nsummary: written by hand\n",
            "world\n",
        );

        run(&context(posts.path(), out.path()), false).unwrap();

        let manifest: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.path().join("manifest.json")).unwrap())
                .unwrap();

        assert_eq!(manifest["blog_name"], "Field Notes");
        let documents = manifest["documents"].as_array().unwrap();
        assert_eq!(documents.len(), 2);
        // newest first
        assert_eq!(documents[0]["title"], "Second");
        assert_eq!(documents[0]["summary"], "written by hand");
        assert_eq!(documents[1]["title"], "First");
        // no summary authored: excerpt of the body
        assert_eq!(documents[1]["summary"], "hello");
        assert_eq!(documents[1]["url"], "/2024/05/07/first.html");
        // tag index points into the document list
        assert_eq!(manifest["tags"]["a"], serde_json::json!([1]));
        assert_eq!(manifest["tags"]["b"], serde_json::json!([0, 1]));

        assert!(out.path().join("feed.xml").exists());
    }

    #[test]
    fn check_mode_writes_nothing() {
        let posts = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        post(
            posts.path(),
            "2024-05-07-first.md",
            "title: First\ndate: 2024-05-07\n",
            "hello\n",
        );

        run(&context(posts.path(), out.path()), true).unwrap();

        assert!(!out.path().join("manifest.json").exists());
        assert!(!out.path().join("feed.xml").exists());
    }

    #[test]
    fn check_mode_still_rejects_malformed_posts() {
        let posts = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        fs::write(
            posts.path().join("2024-05-07-bad.md"),
            "---\ntitle: bad\ndate: not a date\n---\n",
        )
        .unwrap();

        assert!(run(&context(posts.path(), out.path()), true).is_err());
    }
}
