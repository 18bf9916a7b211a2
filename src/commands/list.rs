//! List site content

use anyhow::Result;

use crate::content::PostRecord;
use crate::helpers::format_display_date;
use crate::Site;

/// List posts in homepage order, as text or as the JSON homepage records
pub fn run(site: &Site, json: bool) -> Result<()> {
    let posts = site.homepage_posts()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&posts)?);
        return Ok(());
    }

    println!("Posts ({}):", posts.len());
    for post in &posts {
        println!("  {}", format_line(post));
    }
    Ok(())
}

fn format_line(post: &PostRecord) -> String {
    format!(
        "{} - {} - {} [{}]",
        format_display_date(&post.published_date),
        post.readtime,
        post.title,
        post.url
    )
}
