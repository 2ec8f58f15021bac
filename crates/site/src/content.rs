//! Markdown post content.
//!
//! Posts are `.mdx` files with YAML frontmatter in a single directory:
//!
//! ```markdown
//! ---
//! title: Hello, world
//! date: 2026-03-01
//! description: The first post.
//! tags: [meta, intro]
//! slug: hello-world
//! ---
//!
//! Body in Markdown. Inline components such as `<Callout>` are kept as raw HTML.
//! ```
//!
//! The file name must be `{slug}.mdx`, and slugs are limited to ASCII letters,
//! digits, `-` and `_` so the same slug works in page and API paths. Every
//! field is required; a file with a
//! missing or mistyped field is an error naming that file, never silently
//! skipped. The site loads the whole directory once at startup into a
//! [`ContentStore`], so bad content stops the server from booting.

use std::cmp::Ordering;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use comrak::{Options, markdown_to_html};
use gray_matter::{Matter, ParsedEntity, engine::YAML};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// File extension for post files.
pub const POST_EXTENSION: &str = "mdx";

/// Longest accepted slug.
pub const MAX_SLUG_LENGTH: usize = 200;

/// Average reading speed used for the reading-time estimate.
const WORDS_PER_MINUTE: usize = 200;

/// Errors raised while loading content.
#[derive(Debug, Error)]
pub enum ContentError {
    /// Directory or file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Frontmatter is not valid YAML.
    #[error("Failed to parse frontmatter in {file}: {message}")]
    Parse { file: String, message: String },

    /// A required field is absent or blank.
    #[error("Invalid frontmatter in {file}: missing '{field}'.")]
    MissingField { file: String, field: &'static str },

    /// A field has the wrong type.
    #[error("Invalid frontmatter in {file}: '{field}' must be {expected}.")]
    InvalidField {
        file: String,
        field: &'static str,
        expected: &'static str,
    },

    /// Frontmatter slug differs from the file name.
    #[error("Slug mismatch in {file}: expected '{expected}', found '{found}'.")]
    SlugMismatch {
        file: String,
        expected: String,
        found: String,
    },
}

/// Validated post frontmatter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostMeta {
    pub title: String,
    /// ISO-8601 date string; listings sort on it lexicographically.
    pub date: String,
    pub description: String,
    pub tags: Vec<String>,
    pub slug: String,
}

/// A rendered post.
#[derive(Debug, Clone)]
pub struct Post {
    pub meta: PostMeta,
    pub content_html: String,
    pub reading_time_minutes: usize,
}

/// Reads posts from a directory on demand.
#[derive(Debug, Clone)]
pub struct PostLoader {
    dir: PathBuf,
}

impl PostLoader {
    /// Create a loader for `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory this loader reads.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load and validate every `.mdx` file, newest first.
    ///
    /// # Errors
    ///
    /// Returns the first `ContentError` encountered; one bad file fails the
    /// whole listing.
    pub fn list_posts(&self) -> Result<Vec<Post>, ContentError> {
        let entries = std::fs::read_dir(&self.dir).map_err(|source| ContentError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|source| ContentError::Io {
                    path: self.dir.clone(),
                    source,
                })?
                .path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == POST_EXTENSION) {
                paths.push(path);
            }
        }

        // Deterministic order for equal dates
        paths.sort();

        let mut posts = paths
            .iter()
            .map(|path| {
                let file = file_label(path);
                let post = parse_post(&file, &read_file(path)?)?;
                let stem = path
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_default();
                check_slug(file, &stem, post)
            })
            .collect::<Result<Vec<_>, _>>()?;

        posts.sort_by(|a, b| compare_dates_desc(&a.meta.date, &b.meta.date));

        Ok(posts)
    }

    /// Load `{slug}.mdx`.
    ///
    /// Returns `Ok(None)` if the file does not exist or the slug is not a
    /// valid slug.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::SlugMismatch` if the file's frontmatter names a
    /// different slug, or any other validation error for the file.
    pub fn get_post_by_slug(&self, slug: &str) -> Result<Option<Post>, ContentError> {
        if !is_valid_slug(slug) {
            return Ok(None);
        }

        let path = self.dir.join(format!("{slug}.{POST_EXTENSION}"));
        let source = match std::fs::read_to_string(&path) {
            Ok(source) => source,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(ContentError::Io { path, source }),
        };

        let file = file_label(&path);
        let post = parse_post(&file, &source)?;

        check_slug(file, slug, post).map(Some)
    }
}

/// All posts, loaded once and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    posts: Arc<Vec<Post>>,
}

impl ContentStore {
    /// Load and validate every post in `dir`.
    ///
    /// # Errors
    ///
    /// Returns the first `ContentError` encountered.
    pub fn load(dir: &Path) -> Result<Self, ContentError> {
        let posts = PostLoader::new(dir).list_posts()?;

        for post in &posts {
            tracing::info!(slug = %post.meta.slug, "Loaded post");
        }

        Ok(Self::from_posts(posts))
    }

    /// Build a store from already-loaded posts (assumed sorted).
    #[must_use]
    pub fn from_posts(posts: Vec<Post>) -> Self {
        Self {
            posts: Arc::new(posts),
        }
    }

    /// All posts, newest first.
    #[must_use]
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Find a post by slug.
    #[must_use]
    pub fn get_post(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.meta.slug == slug)
    }

    /// Whether a post with this slug exists.
    #[must_use]
    pub fn contains(&self, slug: &str) -> bool {
        self.get_post(slug).is_some()
    }

    /// Number of posts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// Whether there are no posts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

// =============================================================================
// Parsing
// =============================================================================

fn read_file(path: &Path) -> Result<String, ContentError> {
    std::fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn file_label(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

/// ASCII letters, digits, `-` and `_`, up to [`MAX_SLUG_LENGTH`].
///
/// Such a slug is always a single path component, so it is safe to join onto
/// the content directory.
#[must_use]
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= MAX_SLUG_LENGTH
        && slug
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

fn check_slug(file: String, expected: &str, post: Post) -> Result<Post, ContentError> {
    if post.meta.slug == expected {
        Ok(post)
    } else {
        Err(ContentError::SlugMismatch {
            file,
            expected: expected.to_owned(),
            found: post.meta.slug,
        })
    }
}

/// Parse and validate one post file.
///
/// # Errors
///
/// Returns a `ContentError` naming `file` if the frontmatter is unparseable
/// or any field is missing or mistyped.
pub fn parse_post(file: &str, source: &str) -> Result<Post, ContentError> {
    let matter = Matter::<YAML>::new();
    let parsed: ParsedEntity<Value> = matter.parse(source).map_err(|e| ContentError::Parse {
        file: file.to_owned(),
        message: e.to_string(),
    })?;

    let data = match parsed.data {
        Some(Value::Object(map)) => map,
        Some(Value::Null) | None => Map::new(),
        Some(_) => {
            return Err(ContentError::Parse {
                file: file.to_owned(),
                message: "frontmatter must be a mapping".to_owned(),
            });
        }
    };

    let meta = PostMeta {
        title: required_string(file, &data, "title")?,
        date: required_string(file, &data, "date")?,
        description: required_string(file, &data, "description")?,
        tags: required_string_array(file, &data, "tags")?,
        slug: required_string(file, &data, "slug")?,
    };

    if !is_valid_slug(&meta.slug) {
        return Err(ContentError::InvalidField {
            file: file.to_owned(),
            field: "slug",
            expected: "letters, digits, '-' or '_'",
        });
    }

    Ok(Post {
        meta,
        content_html: render_markdown(&parsed.content),
        reading_time_minutes: reading_time_minutes(&parsed.content),
    })
}

fn required_string(
    file: &str,
    data: &Map<String, Value>,
    field: &'static str,
) -> Result<String, ContentError> {
    match data.get(field) {
        None | Some(Value::Null) => Err(ContentError::MissingField {
            file: file.to_owned(),
            field,
        }),
        Some(Value::String(s)) if s.trim().is_empty() => Err(ContentError::MissingField {
            file: file.to_owned(),
            field,
        }),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ContentError::InvalidField {
            file: file.to_owned(),
            field,
            expected: "a string",
        }),
    }
}

fn required_string_array(
    file: &str,
    data: &Map<String, Value>,
    field: &'static str,
) -> Result<Vec<String>, ContentError> {
    let invalid = || ContentError::InvalidField {
        file: file.to_owned(),
        field,
        expected: "a string array",
    };

    match data.get(field) {
        None | Some(Value::Null) => Err(ContentError::MissingField {
            file: file.to_owned(),
            field,
        }),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_owned).ok_or_else(invalid))
            .collect(),
        Some(_) => Err(invalid()),
    }
}

/// Newest first by plain string comparison of ISO dates.
fn compare_dates_desc(a: &str, b: &str) -> Ordering {
    b.cmp(a)
}

/// Minutes to read at 200 words per minute, at least one.
#[must_use]
pub fn reading_time_minutes(markdown: &str) -> usize {
    markdown
        .split_whitespace()
        .count()
        .div_ceil(WORDS_PER_MINUTE)
        .max(1)
}

/// Render markdown to HTML with GitHub Flavored Markdown support.
fn render_markdown(content: &str) -> String {
    let mut options = Options::default();

    // Enable GFM extensions
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.footnotes = true;
    options.extension.header_ids = Some(String::new());

    // Component tags in posts pass through as raw HTML
    options.render.r#unsafe = true;

    markdown_to_html(content, &options)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn post_source(slug: &str, date: &str, title: &str) -> String {
        format!(
            "---\ntitle: {title}\ndate: {date}\ndescription: About {slug}\ntags: [rust, web]\nslug: {slug}\n---\n\n# {title}\n\nSome *body* text.\n"
        )
    }

    fn write(dir: &TempDir, name: &str, contents: &str) {
        fs::write(dir.path().join(name), contents).unwrap();
    }

    #[test]
    fn test_list_posts_sorted_newest_first() {
        let dir = TempDir::new().unwrap();
        write(&dir, "older.mdx", &post_source("older", "2025-01-10", "Older"));
        write(&dir, "newer.mdx", &post_source("newer", "2026-02-01", "Newer"));
        write(&dir, "middle.mdx", &post_source("middle", "2025-11-30", "Middle"));

        let posts = PostLoader::new(dir.path()).list_posts().unwrap();
        let slugs: Vec<_> = posts.iter().map(|p| p.meta.slug.as_str()).collect();

        assert_eq!(slugs, vec!["newer", "middle", "older"]);
    }

    #[test]
    fn test_list_posts_ignores_other_extensions() {
        let dir = TempDir::new().unwrap();
        write(&dir, "post.mdx", &post_source("post", "2026-01-01", "Post"));
        write(&dir, "notes.md", "not a post");
        write(&dir, "draft.txt", "not a post");

        let posts = PostLoader::new(dir.path()).list_posts().unwrap();
        assert_eq!(posts.len(), 1);
    }

    #[test]
    fn test_missing_title_names_file() {
        let dir = TempDir::new().unwrap();
        write(&dir, "good.mdx", &post_source("good", "2026-01-01", "Good"));
        write(
            &dir,
            "broken.mdx",
            "---\ndate: 2026-01-02\ndescription: d\ntags: []\nslug: broken\n---\nBody\n",
        );

        let err = PostLoader::new(dir.path()).list_posts().unwrap_err();

        assert!(matches!(
            err,
            ContentError::MissingField { ref file, field: "title" } if file == "broken.mdx"
        ));
        assert_eq!(
            err.to_string(),
            "Invalid frontmatter in broken.mdx: missing 'title'."
        );
    }

    #[test]
    fn test_blank_field_is_missing() {
        let err = parse_post(
            "blank.mdx",
            "---\ntitle: \"  \"\ndate: 2026-01-01\ndescription: d\ntags: []\nslug: blank\n---\n",
        )
        .unwrap_err();
        assert!(matches!(err, ContentError::MissingField { field: "title", .. }));
    }

    #[test]
    fn test_tags_must_be_string_array() {
        let err = parse_post(
            "tags.mdx",
            "---\ntitle: T\ndate: 2026-01-01\ndescription: d\ntags: rust\nslug: tags\n---\n",
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid frontmatter in tags.mdx: 'tags' must be a string array."
        );

        let err = parse_post(
            "tags.mdx",
            "---\ntitle: T\ndate: 2026-01-01\ndescription: d\ntags: [rust, 3]\nslug: tags\n---\n",
        )
        .unwrap_err();
        assert!(matches!(err, ContentError::InvalidField { field: "tags", .. }));
    }

    #[test]
    fn test_missing_frontmatter() {
        let err = parse_post("plain.mdx", "# Just markdown\n").unwrap_err();
        assert!(matches!(err, ContentError::MissingField { field: "title", .. }));
    }

    #[test]
    fn test_get_post_by_slug() {
        let dir = TempDir::new().unwrap();
        write(&dir, "hello.mdx", &post_source("hello", "2026-01-01", "Hello"));

        let loader = PostLoader::new(dir.path());
        let post = loader.get_post_by_slug("hello").unwrap().unwrap();

        assert_eq!(post.meta.title, "Hello");
        assert_eq!(post.meta.tags, vec!["rust", "web"]);
        assert!(post.content_html.contains("<em>body</em>"));
    }

    #[test]
    fn test_get_post_by_slug_missing_is_none() {
        let dir = TempDir::new().unwrap();
        let loader = PostLoader::new(dir.path());
        assert!(loader.get_post_by_slug("nope").unwrap().is_none());
    }

    #[test]
    fn test_get_post_by_slug_rejects_traversal() {
        let dir = TempDir::new().unwrap();
        let loader = PostLoader::new(dir.path().join("posts"));
        fs::create_dir(dir.path().join("posts")).unwrap();
        write(&dir, "secret.mdx", &post_source("secret", "2026-01-01", "Secret"));

        assert!(loader.get_post_by_slug("../secret").unwrap().is_none());
        assert!(loader.get_post_by_slug("a/b").unwrap().is_none());
        assert!(loader.get_post_by_slug("").unwrap().is_none());
    }

    #[test]
    fn test_get_post_by_slug_mismatch() {
        let dir = TempDir::new().unwrap();
        write(&dir, "alpha.mdx", &post_source("beta", "2026-01-01", "Alpha"));

        let err = PostLoader::new(dir.path())
            .get_post_by_slug("alpha")
            .unwrap_err();
        assert!(matches!(
            err,
            ContentError::SlugMismatch { ref expected, ref found, .. }
                if expected == "alpha" && found == "beta"
        ));
    }

    #[test]
    fn test_list_posts_rejects_file_name_mismatch() {
        let dir = TempDir::new().unwrap();
        write(&dir, "alpha.mdx", &post_source("beta", "2026-01-02", "Alpha file"));
        write(&dir, "beta.mdx", &post_source("beta", "2026-01-01", "Beta file"));

        let err = ContentStore::load(dir.path()).unwrap_err();

        assert!(matches!(
            err,
            ContentError::SlugMismatch { ref file, ref expected, ref found }
                if file == "alpha.mdx" && expected == "alpha" && found == "beta"
        ));
    }

    #[test]
    fn test_list_posts_rejects_mismatch_without_collision() {
        let dir = TempDir::new().unwrap();
        write(&dir, "alpha.mdx", &post_source("beta", "2026-01-02", "Alpha file"));

        let err = PostLoader::new(dir.path()).list_posts().unwrap_err();
        assert!(matches!(err, ContentError::SlugMismatch { .. }));
    }

    #[test]
    fn test_slug_charset_enforced_at_load() {
        let dir = TempDir::new().unwrap();
        write(&dir, "rust-1.85.mdx", &post_source("rust-1.85", "2026-01-01", "Rust"));

        let err = ContentStore::load(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            ContentError::InvalidField { ref file, field: "slug", .. } if file == "rust-1.85.mdx"
        ));
    }

    #[test]
    fn test_is_valid_slug() {
        assert!(is_valid_slug("hello-world"));
        assert!(is_valid_slug("post_2026"));

        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("rust-1.85"));
        assert!(!is_valid_slug("has space"));
        assert!(!is_valid_slug(&"a".repeat(MAX_SLUG_LENGTH + 1)));
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = PostLoader::new(dir.path().join("absent"))
            .list_posts()
            .unwrap_err();
        assert!(matches!(err, ContentError::Io { .. }));
    }

    #[test]
    fn test_component_markup_survives() {
        let post = parse_post(
            "c.mdx",
            "---\ntitle: T\ndate: 2026-01-01\ndescription: d\ntags: []\nslug: c\n---\n\n<Callout>Heads up</Callout>\n",
        )
        .unwrap();
        assert!(post.content_html.contains("<Callout>"));
    }

    #[test]
    fn test_reading_time() {
        assert_eq!(reading_time_minutes(""), 1);
        assert_eq!(reading_time_minutes(&"word ".repeat(200)), 1);
        assert_eq!(reading_time_minutes(&"word ".repeat(201)), 2);
    }

    #[test]
    fn test_store_lookup() {
        let dir = TempDir::new().unwrap();
        write(&dir, "one.mdx", &post_source("one", "2026-01-01", "One"));

        let store = ContentStore::load(dir.path()).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.contains("one"));
        assert!(store.get_post("two").is_none());
    }
}
