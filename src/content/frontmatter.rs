//! Front-matter parsing

use anyhow::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Splits a content file into metadata and body
pub trait FrontMatterParser {
    /// Returns (front_matter, remaining_content)
    fn parse<'a>(&self, content: &'a str) -> Result<(FrontMatter, &'a str)>;
}

/// The default parser: YAML between `---` fences
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlFrontMatter;

impl FrontMatterParser for YamlFrontMatter {
    fn parse<'a>(&self, content: &'a str) -> Result<(FrontMatter, &'a str)> {
        FrontMatter::parse(content)
    }
}

/// Front-matter data from a post or page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    #[serde(rename = "publishedDate", alias = "published_date")]
    pub published_date: Option<String>,

    /// Additional custom fields, in file order
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str)> {
        let content = content.trim_start_matches('\u{feff}').trim_start();

        if content.starts_with("---") {
            return Ok(Self::parse_yaml(content));
        }

        Ok((FrontMatter::default(), content))
    }

    fn parse_yaml(content: &str) -> (Self, &str) {
        let rest = &content[3..];
        let rest = rest.trim_start_matches(['\n', '\r']);

        let Some((yaml_end, body_start)) = find_closing_fence(rest) else {
            return (FrontMatter::default(), content);
        };

        let yaml_content = &rest[..yaml_end];
        let remaining = &rest[body_start..];
        let remaining = remaining.trim_start_matches(['\n', '\r']);

        if yaml_content.trim().is_empty() {
            return (FrontMatter::default(), remaining);
        }

        // A `---` thematic break followed by prose is not front-matter
        if !yaml_content.lines().any(looks_like_yaml_key) {
            return (FrontMatter::default(), content);
        }

        match serde_yaml::from_str::<FrontMatter>(yaml_content) {
            Ok(fm) => (fm, remaining),
            Err(e) => {
                tracing::warn!(
                    "Failed to parse YAML front-matter, treating as content: {}",
                    e
                );
                (FrontMatter::default(), content)
            }
        }
    }

    /// A string field from the extra metadata
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(|v| v.as_str())
    }
}

/// (end of the YAML block, start of the body) for the fence closing the block
fn find_closing_fence(rest: &str) -> Option<(usize, usize)> {
    if rest.starts_with("---") {
        return Some((0, 3));
    }
    rest.find("\n---").map(|pos| (pos, pos + 4))
}

/// `key: value` or `key:` with a plain identifier key
fn looks_like_yaml_key(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return false;
    }
    let Some(colon_pos) = trimmed.find(':') else {
        return false;
    };
    let key = &trimmed[..colon_pos];
    let is_valid_key = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        && !matches!(key, "http" | "https" | "ftp");
    if !is_valid_key {
        return false;
    }
    let after_colon = &trimmed[colon_pos + 1..];
    after_colon.is_empty() || after_colon.starts_with(' ')
}
