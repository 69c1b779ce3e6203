//! `robots.txt` sitemap directive lookup.

const SITEMAP_DIRECTIVE: &str = "Sitemap:";

/// Extract the sitemap address declared in a robots file.
///
/// Only the first line starting with `Sitemap:` (case-sensitive, no leading
/// whitespace) is considered. An empty value on that line yields `None`.
pub fn sitemap_from_robots(robots_txt: &str) -> Option<String> {
    let line = robots_txt
        .lines()
        .find(|line| line.starts_with(SITEMAP_DIRECTIVE))?;

    let value = &line[SITEMAP_DIRECTIVE.len()..];
    let value = value.strip_prefix(' ').unwrap_or(value);

    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
