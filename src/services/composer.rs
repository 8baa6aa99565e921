//! Builds the paged top-artist feed from per-artist event groups.
//!
//! Every artist's first event is placed before any artist's second event, and
//! the flat list is then cut into pages of [`PAGE_SIZE`].

use crate::models::{Event, FeedEvent};

/// Events per presentation page
pub const PAGE_SIZE: usize = 2;

/// Two-pass round robin over groups.
///
/// Pass one takes element 0 of every group, pass two takes element 1 of every
/// group that has one. Empty groups and short groups are passed over.
pub fn interleave<T: Clone>(groups: &[Vec<T>]) -> Vec<T> {
    let firsts = groups.iter().filter_map(|group| group.first());
    let seconds = groups.iter().filter_map(|group| group.get(1));

    firsts.chain(seconds).cloned().collect()
}

/// Splits items into consecutive pages; the last page may be short
pub fn paginate<T: Clone>(items: &[T], page_size: usize) -> Vec<Vec<T>> {
    items
        .chunks(page_size.max(1))
        .map(<[T]>::to_vec)
        .collect()
}

/// Interleaves, caps at `cap` items and pages the feed for display
pub fn compose_feed(groups: &[Vec<Event>], cap: usize) -> Vec<Vec<FeedEvent>> {
    let mut ordered = interleave(groups);
    ordered.truncate(cap);

    let feed: Vec<FeedEvent> = ordered.iter().map(FeedEvent::from).collect();
    paginate(&feed, PAGE_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn groups() -> Vec<Vec<&'static str>> {
        vec![vec!["A1", "A2"], vec!["B1"], vec!["C1", "C2"]]
    }

    fn event(id: &str, artist: &str, date: Option<NaiveDate>) -> Event {
        Event {
            event_id: id.to_string(),
            name: format!("{} live", artist),
            artist_name: artist.to_string(),
            url: format!("https://tickets.example/{}", id),
            image_url: "https://img/x.jpg".to_string(),
            date,
            location: "Austin, Texas".to_string(),
        }
    }

    #[test]
    fn test_interleave_round_robin() {
        assert_eq!(interleave(&groups()), vec!["A1", "B1", "C1", "A2", "C2"]);
    }

    #[test]
    fn test_paginate_pairs_with_short_tail() {
        let flat = interleave(&groups());
        assert_eq!(
            paginate(&flat, PAGE_SIZE),
            vec![vec!["A1", "B1"], vec!["C1", "A2"], vec!["C2"]]
        );
    }

    #[test]
    fn test_interleave_irregular_groups() {
        let groups = vec![vec!["A1"], vec![], vec!["C1", "C2"], vec!["D1"]];
        assert_eq!(interleave(&groups), vec!["A1", "C1", "D1", "C2"]);
    }

    #[test]
    fn test_interleave_ignores_beyond_second() {
        let groups = vec![vec!["A1", "A2", "A3"]];
        assert_eq!(interleave(&groups), vec!["A1", "A2"]);
    }

    #[test]
    fn test_interleave_empty() {
        let groups: Vec<Vec<&str>> = Vec::new();
        assert!(interleave(&groups).is_empty());
        assert!(paginate(&interleave(&groups), PAGE_SIZE).is_empty());
    }

    #[test]
    fn test_no_second_event_before_all_first_events() {
        let groups = vec![
            vec!["A1", "A2"],
            vec!["B1", "B2"],
            vec!["C1"],
            vec!["D1", "D2"],
        ];
        let flat = interleave(&groups);
        let last_first = flat.iter().rposition(|e| e.ends_with('1')).unwrap();
        let first_second = flat.iter().position(|e| e.ends_with('2')).unwrap();
        assert!(last_first < first_second);
    }

    #[test]
    fn test_compose_feed_formats_and_pages() {
        let groups = vec![
            vec![
                event("a1", "Muse", NaiveDate::from_ymd_opt(2025, 8, 9)),
                event("a2", "Muse", None),
            ],
            vec![event("b1", "Blur", NaiveDate::from_ymd_opt(2025, 9, 1))],
        ];

        let pages = compose_feed(&groups, 16);

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0][0].event_id, "a1");
        assert_eq!(pages[0][0].date, "August 9, 2025");
        assert_eq!(pages[0][1].event_id, "b1");
        assert_eq!(pages[1].len(), 1);
        assert_eq!(pages[1][0].event_id, "a2");
        assert_eq!(pages[1][0].date, "TBA");
    }

    #[test]
    fn test_compose_feed_cap_drops_second_events_first() {
        let groups = vec![
            vec![event("a1", "Muse", None), event("a2", "Muse", None)],
            vec![event("b1", "Blur", None), event("b2", "Blur", None)],
            vec![event("c1", "Cher", None)],
        ];

        let pages = compose_feed(&groups, 4);
        let ids: Vec<&str> = pages
            .iter()
            .flatten()
            .map(|e| e.event_id.as_str())
            .collect();
        assert_eq!(ids, vec!["a1", "b1", "c1", "a2"]);
    }
}
