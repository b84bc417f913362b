//! Container metadata tags.
//!
//! [`Tags`] is an owned snapshot of a container's metadata dictionary, taken
//! from the engine in its native order. Lookups are exact-key matches and
//! return the value exactly as stored. A missing key is an ordinary outcome
//! (`None`), never an error and never an empty string.
//!
//! The named accessors on [`MediaFile`](crate::MediaFile) (`title`, `author`,
//! `year`, ...) resolve through short fallback chains, because different
//! muxers store the same concept under different keys (`author` in ASF,
//! `artist` in ID3 and MP4, `date` instead of `year` in Vorbis comments).

/// Ordered key/value snapshot of a metadata dictionary.
///
/// # Example
///
/// ```
/// use mediascope::Tags;
///
/// let tags: Tags = [("title", "Big Buck Bunny"), ("artist", "Blender")]
///     .into_iter()
///     .collect();
/// assert_eq!(tags.get("title"), Some("Big Buck Bunny"));
/// assert_eq!(tags.get("genre"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags {
    entries: Vec<(String, String)>,
}

impl Tags {
    /// An empty tag set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. A later entry with the same key shadows nothing: the
    /// first one wins on lookup, matching the engine's dictionary semantics.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Exact-key lookup.
    pub fn get(&self, key: &str) -> Option<&str> {
        resolve(self, key)
    }

    /// Number of tags.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when the container carries no tags.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in engine order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Tags {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// Look up a single tag.
pub fn resolve<'a>(tags: &'a Tags, name: &str) -> Option<&'a str> {
    tags.entries
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

/// Look up the first tag of `names` that is present.
pub fn resolve_first<'a>(tags: &'a Tags, names: &[&str]) -> Option<&'a str> {
    names.iter().find_map(|name| resolve(tags, name))
}

pub(crate) const TITLE: &[&str] = &["title"];
pub(crate) const AUTHOR: &[&str] = &["author", "artist"];
pub(crate) const COPYRIGHT: &[&str] = &["copyright"];
pub(crate) const COMMENT: &[&str] = &["comment"];
pub(crate) const ALBUM: &[&str] = &["album"];
pub(crate) const GENRE: &[&str] = &["genre"];
pub(crate) const YEAR: &[&str] = &["year", "date"];
pub(crate) const TRACK: &[&str] = &["track"];

/// Leading integer of a track tag (`"3"`, `"3/12"`, `" 07 "`).
pub(crate) fn parse_track_number(value: &str) -> Option<u32> {
    let digits: String = value
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// Leading four-digit year of a date tag (`"2008"`, `"2008-05-20"`).
pub(crate) fn parse_year(value: &str) -> Option<i32> {
    let trimmed = value.trim();
    let year = trimmed.get(..4)?;
    if !year.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if trimmed[4..].starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    year.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Tags {
        [
            ("title", "Sintel"),
            ("artist", "Blender Foundation"),
            ("date", "2010-09-27"),
            ("comment", ""),
            ("Title", "shadowed by case"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn missing_key_is_none() {
        assert_eq!(resolve(&sample(), "genre"), None);
    }

    #[test]
    fn empty_value_is_present() {
        assert_eq!(resolve(&sample(), "comment"), Some(""));
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let tags = sample();
        assert_eq!(resolve(&tags, "title"), Some("Sintel"));
        assert_eq!(resolve(&tags, "Title"), Some("shadowed by case"));
        assert_eq!(resolve(&tags, "TITLE"), None);
    }

    #[test]
    fn fallback_chain_takes_first_present() {
        let tags = sample();
        assert_eq!(resolve_first(&tags, AUTHOR), Some("Blender Foundation"));
        assert_eq!(resolve_first(&tags, YEAR), Some("2010-09-27"));
        assert_eq!(resolve_first(&tags, TRACK), None);
    }

    #[test]
    fn first_duplicate_wins() {
        let mut tags = Tags::new();
        tags.insert("album", "first");
        tags.insert("album", "second");
        assert_eq!(tags.get("album"), Some("first"));
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn track_numbers() {
        assert_eq!(parse_track_number("3/12"), Some(3));
        assert_eq!(parse_track_number(" 07 "), Some(7));
        assert_eq!(parse_track_number("A1"), None);
    }

    #[test]
    fn years() {
        assert_eq!(parse_year("2010-09-27"), Some(2010));
        assert_eq!(parse_year("1999"), Some(1999));
        assert_eq!(parse_year("20100"), None);
        assert_eq!(parse_year("99"), None);
    }
}
