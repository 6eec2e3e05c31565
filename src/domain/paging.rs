//! Paging window and name filter for list queries.

/// Default page size when none (or a non-positive one) is requested.
pub const DEFAULT_TAKE: i64 = 50;

/// Largest page a caller may request.
pub const MAX_TAKE: i64 = 200;

/// An offset/limit window over an ordered result set.
///
/// Construct through [`Paging::new`] to get normalised bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub skip: i64,
    pub take: i64,
}

impl Paging {
    /// Normalises raw bounds: negative `skip` becomes 0, non-positive `take`
    /// becomes [`DEFAULT_TAKE`], and `take` is capped at [`MAX_TAKE`].
    pub fn new(skip: Option<i64>, take: Option<i64>) -> Self {
        let skip = skip.unwrap_or(0).max(0);
        let take = match take.unwrap_or(DEFAULT_TAKE) {
            t if t <= 0 => DEFAULT_TAKE,
            t => t.min(MAX_TAKE),
        };
        Self { skip, take }
    }

    /// Applies the window to an already ordered iterator.
    pub fn apply<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.skip as usize)
            .take(self.take as usize)
            .collect()
    }
}

impl Default for Paging {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Trims a name filter, treating blank input as "no filter".
pub fn normalize_filter(name: Option<&str>) -> Option<String> {
    name.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Case-insensitive substring match used by in-memory searches.
pub fn matches_filter(value: &str, filter: Option<&str>) -> bool {
    match filter {
        Some(f) => value.to_lowercase().contains(&f.to_lowercase()),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(Paging::default(), Paging { skip: 0, take: 50 });
    }

    #[test]
    fn test_normalization() {
        assert_eq!(Paging::new(Some(-5), Some(10)), Paging { skip: 0, take: 10 });
        assert_eq!(Paging::new(Some(3), Some(0)), Paging { skip: 3, take: 50 });
        assert_eq!(Paging::new(None, Some(-1)).take, 50);
        assert_eq!(Paging::new(None, Some(500)).take, 200);
        assert_eq!(Paging::new(None, Some(200)).take, 200);
    }

    #[test]
    fn test_apply_window() {
        let page = Paging::new(Some(2), Some(2)).apply(1..=10);
        assert_eq!(page, vec![3, 4]);

        let past_end = Paging::new(Some(20), None).apply(1..=10);
        assert!(past_end.is_empty());
    }

    #[test]
    fn test_filter_helpers() {
        assert_eq!(normalize_filter(Some("  ")), None);
        assert_eq!(normalize_filter(Some(" pcb ")), Some("pcb".to_string()));
        assert_eq!(normalize_filter(None), None);

        assert!(matches_filter("Main PCB", Some("pcb")));
        assert!(matches_filter("Main PCB", None));
        assert!(!matches_filter("Resistor", Some("cap")));
    }
}
