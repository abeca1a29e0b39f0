use crate::types::Bucket;
use std::collections::HashSet;

/// Built-in EMTAK codes that put an organization in the matching table.
pub const DEFAULT_ACTIVITY_CODES: &[&str] = &[
    "58211", "58291", "58292", "62011", "62012", "62021", "62022", "62031", "62091", "62099",
    "63111", "63121",
];

/// Fixed set of activity codes. Membership is exact string equality: no
/// trimming, no case folding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityAllowList {
    codes: HashSet<String>,
}

impl Default for ActivityAllowList {
    fn default() -> Self {
        Self::new(DEFAULT_ACTIVITY_CODES.iter().map(|c| c.to_string()))
    }
}

impl ActivityAllowList {
    pub fn new<I>(codes: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            codes: codes.into_iter().collect(),
        }
    }

    pub fn contains(&self, activity_code: &str) -> bool {
        self.codes.contains(activity_code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn classify(&self, activity_code: &str) -> Bucket {
        if self.contains(activity_code) {
            Bucket::Matching
        } else {
            Bucket::NonMatching
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::NOT_FOUND;

    fn allow_list() -> ActivityAllowList {
        ActivityAllowList::new(vec!["62011".to_string(), "A1b".to_string()])
    }

    #[test]
    fn test_member_is_matching() {
        assert_eq!(allow_list().classify("62011"), Bucket::Matching);
        assert_eq!(allow_list().classify("A1b"), Bucket::Matching);
    }

    #[test]
    fn test_membership_is_exact() {
        let list = allow_list();
        assert_eq!(list.classify(" 62011"), Bucket::NonMatching);
        assert_eq!(list.classify("62011 "), Bucket::NonMatching);
        assert_eq!(list.classify("a1b"), Bucket::NonMatching);
        assert_eq!(list.classify("6201"), Bucket::NonMatching);
    }

    #[test]
    fn test_not_found_is_never_matching() {
        assert_eq!(ActivityAllowList::default().classify(NOT_FOUND), Bucket::NonMatching);
        assert_eq!(allow_list().classify(""), Bucket::NonMatching);
    }

    #[test]
    fn test_default_list_is_populated() {
        let list = ActivityAllowList::default();
        assert!(!list.is_empty());
        assert!(list.contains("62011"));
    }
}
