//! Post content commands.
//!
//! # Usage
//!
//! ```bash
//! lantern-cli content check
//! lantern-cli content show hello-world --dir crates/site/content/posts
//! ```
//!
//! # Environment Variables
//!
//! - `LANTERN_CONTENT_DIR` - Post directory used when `--dir` is not given

use std::path::PathBuf;

use lantern_site::config::DEFAULT_CONTENT_DIR;
use lantern_site::content::{Post, PostLoader};

use crate::error::CliError;

/// Validate every post in the directory.
///
/// Fails on the first invalid file, naming it.
pub fn check(dir: Option<PathBuf>) -> Result<(), CliError> {
    let loader = PostLoader::new(resolve_dir(dir));

    tracing::info!("Checking posts in {}", loader.dir().display());
    let posts = loader.list_posts()?;

    #[allow(clippy::print_stdout)]
    {
        for post in &posts {
            println!("{}  {}  {}", post.meta.date, post.meta.slug, post.meta.title);
        }
    }

    tracing::info!("{} posts OK", posts.len());
    Ok(())
}

/// Print the metadata of one post.
pub fn show(slug: &str, dir: Option<PathBuf>) -> Result<(), CliError> {
    let loader = PostLoader::new(resolve_dir(dir));

    let post = loader
        .get_post_by_slug(slug)?
        .ok_or_else(|| CliError::PostNotFound(slug.to_owned()))?;

    #[allow(clippy::print_stdout)]
    {
        println!("{}", describe(&post));
    }

    Ok(())
}

/// `--dir`, then `LANTERN_CONTENT_DIR`, then the default directory.
fn resolve_dir(dir: Option<PathBuf>) -> PathBuf {
    dir.or_else(|| {
        std::env::var("LANTERN_CONTENT_DIR")
            .ok()
            .filter(|d| !d.is_empty())
            .map(PathBuf::from)
    })
    .unwrap_or_else(|| PathBuf::from(DEFAULT_CONTENT_DIR))
}

fn describe(post: &Post) -> String {
    let meta = &post.meta;
    format!(
        "title:        {}\nslug:         {}\ndate:         {}\ndescription:  {}\ntags:         {}\nreading time: {} min",
        meta.title,
        meta.slug,
        meta.date,
        meta.description,
        meta.tags.join(", "),
        post.reading_time_minutes,
    )
}
