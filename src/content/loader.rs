//! Content loader - lists and reads markup files from a content directory

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{ContentError, FrontMatterParser, RawSource, YamlFrontMatter};

/// Extensions recognised as markup, in lookup preference order
pub const MARKUP_EXTENSIONS: [&str; 2] = ["mdx", "md"];

/// Loads markup sources from a single flat directory
pub struct ContentLoader {
    dir: PathBuf,
    parser: Box<dyn FrontMatterParser>,
}

impl ContentLoader {
    /// Create a loader using the default front-matter parser
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self::with_parser(dir, YamlFrontMatter)
    }

    /// Create a loader with a custom front-matter parser
    pub fn with_parser<P, F>(dir: P, parser: F) -> Self
    where
        P: AsRef<Path>,
        F: FrontMatterParser + 'static,
    {
        Self {
            dir: dir.as_ref().to_path_buf(),
            parser: Box::new(parser),
        }
    }

    /// Directory this loader reads from
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Slugs of every markup file in the directory, sorted by file name
    ///
    /// A missing directory is an error; an empty one is not.
    pub fn list_content_identifiers(&self) -> Result<Vec<String>, ContentError> {
        Ok(self.entries()?.into_iter().map(|(slug, _)| slug).collect())
    }

    /// Raw bytes of the markup file for `identifier`
    pub fn fetch_content(&self, identifier: &str) -> Result<Vec<u8>, ContentError> {
        let path = self.resolve(identifier)?;
        fs::read(&path).map_err(|e| ContentError::io(path, e))
    }

    /// Fetch one source and split it into front-matter and body
    pub fn load_source(&self, identifier: &str) -> Result<RawSource, ContentError> {
        let path = self.resolve(identifier)?;
        self.load_path(identifier, path)
    }

    /// Load every source in the directory
    ///
    /// Fails as a whole if any single file cannot be read.
    pub fn load_sources(&self) -> Result<Vec<RawSource>, ContentError> {
        let mut sources: Vec<RawSource> = Vec::new();
        for (slug, path) in self.entries()? {
            sources.push(self.load_path(&slug, path)?);
        }
        tracing::debug!("Loaded {} sources from {:?}", sources.len(), self.dir);
        Ok(sources)
    }

    fn load_path(&self, identifier: &str, path: PathBuf) -> Result<RawSource, ContentError> {
        let bytes = fs::read(&path).map_err(|e| ContentError::io(&path, e))?;
        let text = String::from_utf8(bytes).map_err(|_| ContentError::Encoding {
            path: path.clone(),
        })?;

        let (front_matter, body) =
            self.parser
                .parse(&text)
                .map_err(|e| ContentError::FrontMatter {
                    identifier: identifier.to_string(),
                    message: e.to_string(),
                })?;
        let body = body.to_string();

        Ok(RawSource {
            slug: identifier.to_string(),
            path,
            front_matter,
            body,
        })
    }

    /// Locate the file behind an identifier
    fn resolve(&self, identifier: &str) -> Result<PathBuf, ContentError> {
        let not_found = || ContentError::NotFound {
            identifier: identifier.to_string(),
        };

        if identifier.is_empty()
            || identifier.contains(['/', '\\'])
            || identifier == "."
            || identifier == ".."
        {
            return Err(not_found());
        }

        for ext in MARKUP_EXTENSIONS {
            let candidate = self.dir.join(format!("{}.{}", identifier, ext));
            if candidate.is_file() {
                return Ok(candidate);
            }
        }

        // upper-case extensions
        self.entries()?
            .into_iter()
            .find(|(slug, _)| slug == identifier)
            .map(|(_, path)| path)
            .ok_or_else(not_found)
    }

    /// (slug, path) for each markup file, sorted by file name
    ///
    /// When two files share a slug the preferred extension wins.
    fn entries(&self) -> Result<Vec<(String, PathBuf)>, ContentError> {
        fs::metadata(&self.dir).map_err(|e| ContentError::io(&self.dir, e))?;

        let mut entries: Vec<(String, PathBuf)> = Vec::new();
        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(&self.dir).to_path_buf();
                ContentError::io(path, e.into())
            })?;

            if !entry.file_type().is_file() {
                continue;
            }
            let Some(slug) = markup_slug(entry.path()) else {
                continue;
            };
            let path = entry.into_path();

            match entries.iter_mut().find(|(s, _)| *s == slug) {
                Some((_, kept)) => {
                    let skipped = if extension_rank(&path) < extension_rank(kept) {
                        std::mem::replace(kept, path)
                    } else {
                        path
                    };
                    tracing::warn!("Skipping {:?}: slug {:?} is already taken", skipped, slug);
                }
                None => entries.push((slug, path)),
            }
        }
        Ok(entries)
    }
}

fn extension_rank(path: &Path) -> usize {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(|e| {
            MARKUP_EXTENSIONS
                .iter()
                .position(|m| m.eq_ignore_ascii_case(e))
        })
        .unwrap_or(MARKUP_EXTENSIONS.len())
}

/// Slug of a markup file, `None` for anything else
pub fn markup_slug(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    if !MARKUP_EXTENSIONS.contains(&ext.as_str()) {
        return None;
    }
    path.file_stem()?.to_str().map(str::to_string)
}
