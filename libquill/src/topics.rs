//! Topic search

use crate::types::Topic;

/// Topics whose title contains `query`, ignoring case, in their original order.
/// An empty query matches everything.
pub fn filter_topics<'a>(topics: &'a [Topic], query: &str) -> Vec<&'a Topic> {
    let needle = query.to_lowercase();
    topics
        .iter()
        .filter(|topic| topic.title.to_lowercase().contains(&needle))
        .collect()
}

/// Find a topic by its url (the `/topic/:term` segment)
pub fn find_by_url<'a>(topics: &'a [Topic], url: &str) -> Option<&'a Topic> {
    topics.iter().find(|topic| topic.url == url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topics() -> Vec<Topic> {
        ["SQL basics", "Self-improvement", "Rust"]
            .iter()
            .map(|title| Topic {
                uuid: String::new(),
                title: title.to_string(),
                description: String::new(),
                url: title.to_lowercase().replace(' ', "-"),
            })
            .collect()
    }

    #[test]
    fn test_empty_query_returns_all() {
        let topics = topics();
        assert_eq!(filter_topics(&topics, "").len(), 3);
    }

    #[test]
    fn test_no_match_returns_empty() {
        let topics = topics();
        assert!(filter_topics(&topics, "gardening").is_empty());
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let mut topics = topics();
        topics[0].title = "sql basics".to_string();

        let found = filter_topics(&topics, "SQL");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "sql basics");
    }

    #[test]
    fn test_substring_keeps_order() {
        let topics = topics();
        let found: Vec<&str> = filter_topics(&topics, "s")
            .into_iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(found, vec!["SQL basics", "Self-improvement", "Rust"]);
    }

    #[test]
    fn test_find_by_url() {
        let topics = topics();
        assert_eq!(find_by_url(&topics, "rust").unwrap().title, "Rust");
        assert!(find_by_url(&topics, "go").is_none());
    }
}
