use std::fs::OpenOptions;
use std::io::BufWriter;

use anyhow::Context as _;
use atom_syndication::{Entry, Feed, FixedDateTime, Link, Text};
use chrono::{NaiveDate, NaiveTime};
use log::info;

use crate::context::Context;
use crate::document::Document;
use crate::export::utils::excerpt;

const FEED_ENTRIES: usize = 20;

/// Atom feed of the newest posts, written to `out_dir/feed.xml`. Built from
/// metadata only; bodies are left to the rendering pipeline.
pub(crate) fn write_feed(ctx: &Context, documents: &[Document]) -> anyhow::Result<()> {
    let base = ctx.blog_url.trim_end_matches('/');

    let mut feed = Feed::default();
    feed.set_title(Text::plain(ctx.blog_name.clone()));
    feed.set_id(format!("{base}/"));
    feed.set_links(vec![link(format!("{base}/"))]);
    if let Some(newest) = documents.first() {
        feed.set_updated(midnight(newest.date));
    }

    feed.set_entries(
        documents
            .iter()
            .take(FEED_ENTRIES)
            .map(|document| {
                let url = format!("{base}{}", document.url());
                let mut entry = Entry::default();
                entry.set_title(Text::plain(document.title.clone()));
                entry.set_id(url.clone());
                entry.set_updated(midnight(document.date));
                entry.set_links(vec![link(url)]);
                let summary = document
                    .summary
                    .clone()
                    .unwrap_or_else(|| excerpt(&document.body));
                if !summary.is_empty() {
                    entry.set_summary(Some(Text::plain(summary)));
                }
                entry
            })
            .collect::<Vec<_>>(),
    );

    let path = ctx.out_dir.join("feed.xml");
    let fd = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&path)?;
    feed.write_to(BufWriter::new(fd))
        .with_context(|| format!("while writing {:?}", path))?;
    info!("wrote {:?}", path);

    Ok(())
}

fn midnight(date: NaiveDate) -> FixedDateTime {
    date.and_time(NaiveTime::MIN).and_utc().fixed_offset()
}

fn link(href: String) -> Link {
    let mut link = Link::default();
    link.set_href(href);
    link
}
