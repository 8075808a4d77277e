//! Document identity derived from the storage path.
//!
//! Published essays are named `<YYYY>-<MM>-<DD>-<slug>.<ext>`; the date and
//! slug together form the [`DocumentId`]. File names without the date
//! prefix resolve to an undated identity whose slug is the file stem.
//!
//! | Path                          | date         | slug          |
//! |-------------------------------|--------------|---------------|
//! | `_posts/2018-02-09-a.md`      | `2018-02-09` | `a`           |
//! | `_posts/2018-02-09-on-ink.md` | `2018-02-09` | `on-ink`      |
//! | `_drafts/on-ink.md`           | none         | `on-ink`      |

use crate::{document::Metadata, error::ErrorKind};
use chrono::NaiveDate;
use compact_str::CompactString;
use regex::Regex;
use std::{fmt, str::FromStr, sync::LazyLock};

/// `YYYY-MM-DD-` prefix followed by the rest of a file name or identifier.
static DATE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<y>[0-9]{4})-(?P<m>[0-9]{2})-(?P<d>[0-9]{2})(?:-(?P<rest>.*))?$").unwrap()
});

static SLUG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").unwrap());

// ============================================================================
// Slug
// ============================================================================

/// URL-safe token: non-empty, lowercase ASCII letters, digits and hyphens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slug(CompactString);

impl Slug {
    pub fn parse(text: &str) -> Result<Self, ErrorKind> {
        if SLUG.is_match(text) {
            Ok(Self(CompactString::new(text)))
        } else {
            Err(ErrorKind::InvalidSlug(text.to_owned()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// DocumentId
// ============================================================================

/// Canonical identity of a document: publication date plus slug.
///
/// Drafts may be undated. Displayed as `2018-02-09-slug`, or just `slug`
/// when there is no date.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId {
    date: Option<NaiveDate>,
    slug: Slug,
}

impl DocumentId {
    pub const fn new(date: Option<NaiveDate>, slug: Slug) -> Self {
        Self { date, slug }
    }

    pub const fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub const fn slug(&self) -> &Slug {
        &self.slug
    }

    pub const fn is_dated(&self) -> bool {
        self.date.is_some()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.date {
            Some(date) => write!(f, "{date}-{}", self.slug),
            None => write!(f, "{}", self.slug),
        }
    }
}

/// Parses the display form back, e.g. `2018-02-09-on-ink` or `on-ink`.
impl FromStr for DocumentId {
    type Err = ErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match DATE_PREFIX.captures(s) {
            Some(caps) if caps.name("rest").is_some() => {
                let date = calendar_date(&caps["y"], &caps["m"], &caps["d"])?;
                Ok(Self::new(Some(date), Slug::parse(&caps["rest"])?))
            }
            _ => Ok(Self::new(None, Slug::parse(s)?)),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for DocumentId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Slug {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Derive the identity of the document stored at `path`.
///
/// Only the final path component is inspected; both `/` and `\` separate
/// components. The final extension, if any, is dropped and the stem is read
/// the same way [`DocumentId::from_str`] reads an identifier, so the
/// displayed identity always parses back to itself.
///
/// # Errors
///
/// - [`ErrorKind::InvalidDateInPath`] if the name has a date prefix that is
///   not a real calendar date.
/// - [`ErrorKind::InvalidSlug`] if the slug is empty or has characters
///   outside `[a-z0-9-]`.
pub fn resolve_identity(path: &str) -> Result<DocumentId, ErrorKind> {
    let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let stem = file_name.rsplit_once('.').map_or(file_name, |(stem, _)| stem);
    stem.parse()
}

/// Check that metadata embedded in the document agrees with its identity.
///
/// A `date` key must start with a valid `YYYY-MM-DD` that equals the date
/// from the file name (undated identities accept any valid date). A `slug`
/// key must equal the derived slug.
pub fn check_consistency(id: &DocumentId, metadata: &Metadata) -> Result<(), ErrorKind> {
    if let Some(raw) = metadata.get("date") {
        let declared = leading_date(raw).ok_or_else(|| ErrorKind::InconsistentMetadata {
            key: "date",
            reason: format!("`{raw}` does not start with a YYYY-MM-DD date"),
        })?;
        if let Some(date) = id.date()
            && date != declared
        {
            return Err(ErrorKind::InconsistentMetadata {
                key: "date",
                reason: format!("`{raw}` does not match {date}"),
            });
        }
    }

    if let Some(slug) = metadata.get("slug")
        && slug != id.slug().as_str()
    {
        return Err(ErrorKind::InconsistentMetadata {
            key: "slug",
            reason: format!("`{slug}` does not match `{}`", id.slug()),
        });
    }

    Ok(())
}

/// Parse the `YYYY-MM-DD` at the start of a metadata date such as
/// `2018-02-09 10:30:00 -0500`.
fn leading_date(raw: &str) -> Option<NaiveDate> {
    let (head, tail) = raw.split_at_checked(10)?;
    if !(tail.is_empty() || tail.starts_with([' ', 'T'])) {
        return None;
    }
    let caps = DATE_PREFIX.captures(head)?;
    calendar_date(&caps["y"], &caps["m"], &caps["d"]).ok()
}

fn calendar_date(year: &str, month: &str, day: &str) -> Result<NaiveDate, ErrorKind> {
    // The regex guarantees ASCII digits of fixed width.
    let (Ok(y), Ok(m), Ok(d)) = (year.parse::<i32>(), month.parse::<u32>(), day.parse::<u32>())
    else {
        return Err(ErrorKind::InvalidDateInPath(format!(
            "{year}-{month}-{day} is not numeric"
        )));
    };

    if !(1..=12).contains(&m) {
        return Err(ErrorKind::InvalidDateInPath(format!(
            "month {month} is out of range"
        )));
    }
    NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| {
        ErrorKind::InvalidDateInPath(format!("day {day} does not exist in {year}-{month}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_resolve_dated_path() {
        let id = resolve_identity("_posts/2018-02-09-on-reading-slowly.md").unwrap();
        assert_eq!(id.date(), Some(ymd(2018, 2, 9)));
        assert_eq!(id.slug().as_str(), "on-reading-slowly");
        assert_eq!(id.to_string(), "2018-02-09-on-reading-slowly");
    }

    #[test]
    fn test_round_trip_dates_and_slugs() {
        let cases = [
            (2018, 2, 9, "a"),
            (2024, 2, 29, "leap-day"),
            (1999, 12, 31, "y2k-eve"),
            (2000, 1, 1, "0"),
            (2021, 6, 30, "a-b-c-2021"),
        ];
        for (y, m, d, slug) in cases {
            for ext in ["md", "markdown", "html"] {
                let path = format!("posts/{y:04}-{m:02}-{d:02}-{slug}.{ext}");
                let id = resolve_identity(&path).unwrap();
                assert_eq!(id.date(), Some(ymd(y, m, d)), "{path}");
                assert_eq!(id.slug().as_str(), slug, "{path}");
            }
        }
    }

    #[test]
    fn test_path_without_prefix_directory() {
        let id = resolve_identity("2018-02-09-a.md").unwrap();
        assert_eq!(id.to_string(), "2018-02-09-a");
    }

    #[test]
    fn test_windows_separators() {
        let id = resolve_identity(r"_posts\2018-02-09-a.md").unwrap();
        assert_eq!(id.slug().as_str(), "a");
    }

    #[test]
    fn test_only_final_extension_is_dropped() {
        let id = resolve_identity("_posts/2018-02-09-notes.v2.md");
        assert_eq!(id, Err(ErrorKind::InvalidSlug("notes.v2".into())));
    }

    #[test]
    fn test_undated_path() {
        let id = resolve_identity("_drafts/half-finished.md").unwrap();
        assert_eq!(id.date(), None);
        assert_eq!(id.slug().as_str(), "half-finished");
        assert_eq!(id.to_string(), "half-finished");
    }

    #[test]
    fn test_undated_path_without_extension() {
        let id = resolve_identity("_drafts/notes").unwrap();
        assert_eq!(id.slug().as_str(), "notes");
    }

    #[test]
    fn test_dated_path_without_extension() {
        let id = resolve_identity("_drafts/2018-02-09-a").unwrap();
        assert_eq!(id.date(), Some(ymd(2018, 2, 9)));
        assert_eq!(id.slug().as_str(), "a");
        assert_eq!(id.to_string().parse::<DocumentId>().unwrap(), id);
    }

    #[test]
    fn test_bare_date_is_an_undated_slug() {
        let id = resolve_identity("_drafts/2018-02-09.md").unwrap();
        assert!(!id.is_dated());
        assert_eq!(id.to_string().parse::<DocumentId>().unwrap(), id);
    }

    #[test]
    fn test_invalid_month() {
        for path in ["2018-00-09-a.md", "2018-13-09-a.md"] {
            assert!(matches!(
                resolve_identity(path),
                Err(ErrorKind::InvalidDateInPath(_))
            ));
        }
    }

    #[test]
    fn test_invalid_day() {
        for path in [
            "2018-02-00-a.md",
            "2018-01-32-a.md",
            "2018-04-31-a.md",
            "2023-02-29-a.md",
            "1900-02-29-a.md",
            "2024-02-30-a.md",
        ] {
            assert!(
                matches!(resolve_identity(path), Err(ErrorKind::InvalidDateInPath(_))),
                "{path}"
            );
        }
    }

    #[test]
    fn test_leap_years() {
        assert!(resolve_identity("2024-02-29-a.md").is_ok());
        assert!(resolve_identity("2000-02-29-a.md").is_ok());
    }

    #[test]
    fn test_invalid_slugs() {
        assert_eq!(
            resolve_identity("2018-02-09-.md"),
            Err(ErrorKind::InvalidSlug(String::new()))
        );
        assert_eq!(
            resolve_identity("2018-02-09-Upper.md"),
            Err(ErrorKind::InvalidSlug("Upper".into()))
        );
        assert_eq!(
            resolve_identity("2018-02-09-with space.md"),
            Err(ErrorKind::InvalidSlug("with space".into()))
        );
        assert_eq!(
            resolve_identity("_drafts/Notes_On_Ink.md"),
            Err(ErrorKind::InvalidSlug("Notes_On_Ink".into()))
        );
    }

    #[test]
    fn test_document_id_from_str() {
        let id: DocumentId = "2018-02-09-on-ink".parse().unwrap();
        assert_eq!(id, resolve_identity("x/2018-02-09-on-ink.md").unwrap());

        let draft: DocumentId = "on-ink".parse().unwrap();
        assert_eq!(draft.date(), None);

        assert!("2018-13-09-a".parse::<DocumentId>().is_err());
        assert!("Not A Slug".parse::<DocumentId>().is_err());
    }

    #[test]
    fn test_ordering_of_ids() {
        let a: DocumentId = "2018-02-09-a".parse().unwrap();
        let b: DocumentId = "2018-02-09-b".parse().unwrap();
        let later: DocumentId = "2019-01-01-a".parse().unwrap();
        assert!(a < b);
        assert!(b < later);
    }

    #[test]
    fn test_consistent_metadata() {
        let id = resolve_identity("2018-02-09-on-ink.md").unwrap();
        let meta: Metadata = [("date", "2018-02-09 10:30:00 -0500"), ("slug", "on-ink")]
            .into_iter()
            .collect();
        assert!(check_consistency(&id, &meta).is_ok());

        let iso: Metadata = [("date", "2018-02-09T10:30:00Z")].into_iter().collect();
        assert!(check_consistency(&id, &iso).is_ok());
    }

    #[test]
    fn test_mismatched_date() {
        let id = resolve_identity("2018-02-09-on-ink.md").unwrap();
        let meta: Metadata = [("date", "2018-02-10")].into_iter().collect();
        assert!(matches!(
            check_consistency(&id, &meta),
            Err(ErrorKind::InconsistentMetadata { key: "date", .. })
        ));
    }

    #[test]
    fn test_unparsable_date() {
        let id = resolve_identity("_drafts/on-ink.md").unwrap();
        for raw in ["yesterday", "2018-02-30", "2018-02-091"] {
            let meta: Metadata = [("date", raw)].into_iter().collect();
            assert!(
                matches!(
                    check_consistency(&id, &meta),
                    Err(ErrorKind::InconsistentMetadata { key: "date", .. })
                ),
                "{raw}"
            );
        }
    }

    #[test]
    fn test_undated_identity_accepts_any_valid_date() {
        let id = resolve_identity("_drafts/on-ink.md").unwrap();
        let meta: Metadata = [("date", "2030-01-01")].into_iter().collect();
        assert!(check_consistency(&id, &meta).is_ok());
    }

    #[test]
    fn test_mismatched_slug() {
        let id = resolve_identity("2018-02-09-on-ink.md").unwrap();
        let meta: Metadata = [("slug", "on-paper")].into_iter().collect();
        assert!(matches!(
            check_consistency(&id, &meta),
            Err(ErrorKind::InconsistentMetadata { key: "slug", .. })
        ));
    }
}
