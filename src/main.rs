use std::path::PathBuf;

use anyhow::bail;
use clap::{command, value_parser, Arg, ArgAction};

use context::Context;

mod context;
mod document;
mod export;
mod feed;
mod store;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let matches = command!()
        .args(&[
            Arg::new("post_dir")
                .help("Directory path of posts")
                .value_parser(value_parser!(PathBuf))
                .default_value("posts"),
            Arg::new("out_dir")
                .help("Directory path of output (manifest.json and feed.xml)")
                .value_parser(value_parser!(PathBuf))
                .default_value("out"),
            Arg::new("check")
                .long("check")
                .action(ArgAction::SetTrue)
                .help("Parse and validate the posts without writing anything"),
        ])
        .get_matches();

    let post_dir: &PathBuf = matches.get_one("post_dir").unwrap();
    if !post_dir.exists() || !post_dir.is_dir() {
        bail!("post_dir must be a directory.");
    }
    let out_dir: &PathBuf = matches.get_one("out_dir").unwrap();
    if out_dir.exists() && !out_dir.is_dir() {
        bail!("if out_dir exists, it must be directory.");
    }

    Context::init(
        post_dir.to_owned(),
        out_dir.to_owned(),
        std::env::var("BLOG_NAME").unwrap_or("".to_string()),
        std::env::var("BLOG_URL").unwrap_or("".to_string()),
    );

    export::run(Context::instance(), matches.get_flag("check"))
}
