use std::{path::PathBuf, sync::OnceLock};

#[derive(Debug)]
pub(crate) struct Context {
    pub post_dir: PathBuf,
    pub out_dir: PathBuf,

    pub blog_name: String,
    pub blog_url: String,
}

static CONTEXT: OnceLock<Context> = OnceLock::new();

impl Context {
    pub fn init(post_dir: PathBuf, out_dir: PathBuf, blog_name: String, blog_url: String) {
        CONTEXT
            .set(Self {
                post_dir,
                out_dir,
                blog_name,
                blog_url,
            })
            .unwrap();
    }

    pub fn instance() -> &'static Context {
        CONTEXT.get().unwrap()
    }
}
