//! Article Prioritizer — deterministic front-page ordering.
//!
//! Ordering rules, first differentiating rule wins:
//! 1. breaking news before everything else
//! 2. higher numeric priority first
//! 3. more recent `published_at` first
//!
//! Ties keep their input order (`sort_by` is stable).

use std::cmp::Ordering;

use crate::models::Article;

/// Comparator implementing the front-page ordering. `Less` means `a` goes first.
pub fn compare_articles(a: &Article, b: &Article) -> Ordering {
    b.is_breaking
        .cmp(&a.is_breaking)
        .then_with(|| b.priority.cmp(&a.priority))
        .then_with(|| b.published_at.cmp(&a.published_at))
}

/// Returns the articles in front-page order. Idempotent.
pub fn prioritize(mut articles: Vec<Article>) -> Vec<Article> {
    articles.sort_by(compare_articles);
    articles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::article::fixtures::article;

    fn titles(articles: &[Article]) -> Vec<&str> {
        articles.iter().map(|a| a.title.as_str()).collect()
    }

    #[test]
    fn test_breaking_beats_numeric_priority() {
        let input = vec![
            article("p99-a", 99, false, 0),
            article("p99-b", 99, false, 1),
            article("breaking", 10, true, 0),
            article("p99-c", 99, false, 2),
            article("p99-d", 99, false, 3),
        ];
        let ordered = prioritize(input);
        assert_eq!(ordered[0].title, "breaking");
    }

    #[test]
    fn test_priority_then_recency() {
        let input = vec![
            article("old-high", 80, false, 0),
            article("low", 20, false, 100),
            article("new-high", 80, false, 50),
        ];
        let ordered = prioritize(input);
        assert_eq!(titles(&ordered), vec!["new-high", "old-high", "low"]);
    }

    #[test]
    fn test_full_ties_preserve_input_order() {
        let input = vec![
            article("first", 50, false, 10),
            article("second", 50, false, 10),
            article("third", 50, false, 10),
        ];
        let ordered = prioritize(input);
        assert_eq!(titles(&ordered), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_prioritize_is_idempotent() {
        let input = vec![
            article("a", 30, false, 5),
            article("b", 90, false, 1),
            article("c", 10, true, 0),
            article("d", 90, false, 1),
            article("e", 60, true, 9),
        ];
        let once = prioritize(input);
        let twice = prioritize(once.clone());
        assert_eq!(once, twice);
        assert_eq!(titles(&once), vec!["e", "c", "b", "d", "a"]);
    }

    #[test]
    fn test_every_breaking_precedes_every_non_breaking() {
        let input: Vec<Article> = (0..20)
            .map(|i| article(&format!("a{i}"), (i * 7) % 100, i % 3 == 0, i as i64))
            .collect();
        let ordered = prioritize(input);
        let first_regular = ordered
            .iter()
            .position(|a| !a.is_breaking)
            .unwrap_or(ordered.len());
        assert!(ordered[first_regular..].iter().all(|a| !a.is_breaking));
    }

    #[test]
    fn test_empty_input() {
        assert!(prioritize(vec![]).is_empty());
    }
}
