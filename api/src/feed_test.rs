use super::*;

fn product(id: u32) -> Product {
    serde_json::from_value(serde_json::json!({"id": id, "name": format!("Part {id}")})).unwrap()
}

fn page(ids: std::ops::Range<u32>) -> Vec<Product> {
    ids.map(product).collect()
}

fn ids(feed: &ProductFeed) -> Vec<String> {
    feed.visible().iter().map(|p| p.id.clone()).collect()
}

// =============================================================
// Browsing
// =============================================================

#[test]
fn default_query_is_newest_first() {
    let q = ProductFeed::new().query();
    assert_eq!(q.limit, 12);
    assert_eq!(q.offset, 0);
    assert_eq!(q.orderby, "");
    assert_eq!(q.order, SortOrder::Desc);
}

#[test]
fn price_order_sets_orderby() {
    let mut feed = ProductFeed::new();
    let filters = FeedFilters {
        price_order: Some(SortOrder::Asc),
        locations: vec!["Bandung".into(), "Depok".into()],
        condition: Condition::Used,
        ..FeedFilters::default()
    };
    feed.set_filters(filters);
    let q = feed.query();
    assert_eq!(q.orderby, "price");
    assert_eq!(q.order, SortOrder::Asc);
    assert_eq!(q.location, "Bandung,Depok");
    assert_eq!(q.condition, "used");
}

#[test]
fn full_pages_accumulate_with_dedupe() {
    let mut feed = ProductFeed::new();
    feed.apply_page(0, page(0..12));
    assert!(feed.has_more());

    let q = feed.next_page().unwrap();
    assert_eq!(q.offset, 12);
    // Overlapping page: ids 10 and 11 are already shown.
    feed.apply_page(12, page(10..22));
    assert_eq!(feed.visible().len(), 22);
    assert!(feed.has_more());
}

#[test]
fn short_page_ends_the_feed() {
    let mut feed = ProductFeed::new();
    feed.apply_page(0, page(0..12));
    feed.next_page();
    feed.apply_page(12, page(12..15));
    assert!(!feed.has_more());
    assert!(feed.next_page().is_none());
    assert_eq!(feed.offset(), 12);
}

#[test]
fn empty_first_page_clears_list() {
    let mut feed = ProductFeed::new();
    feed.apply_page(0, page(0..5));
    feed.set_filters(FeedFilters { category: "9".into(), ..FeedFilters::default() });
    feed.apply_page(0, Vec::new());
    assert!(feed.visible().is_empty());
    assert!(!feed.has_more());
}

#[test]
fn stale_page_is_dropped() {
    let mut feed = ProductFeed::new();
    feed.apply_page(0, page(0..12));
    feed.next_page();
    feed.set_filters(FeedFilters { category: "3".into(), ..FeedFilters::default() });
    // The offset-12 page for the old filters lands after the rewind.
    feed.apply_page(12, page(100..112));
    assert_eq!(ids(&feed), page(0..12).into_iter().map(|p| p.id).collect::<Vec<_>>());
}

// =============================================================
// Filters
// =============================================================

#[test]
fn filter_change_rewinds_but_keeps_items() {
    let mut feed = ProductFeed::new();
    feed.apply_page(0, page(0..12));
    feed.next_page();
    feed.apply_page(12, page(12..14));
    assert!(!feed.has_more());

    assert!(feed.set_filters(FeedFilters { category: "7".into(), ..FeedFilters::default() }));
    assert_eq!(feed.offset(), 0);
    assert!(feed.has_more());
    assert_eq!(feed.visible().len(), 14);

    feed.apply_page(0, page(50..53));
    assert_eq!(feed.visible().len(), 3);
}

#[test]
fn identical_filters_are_not_a_change() {
    let mut feed = ProductFeed::new();
    feed.apply_page(0, page(0..12));
    feed.next_page();
    assert!(!feed.set_filters(FeedFilters::default()));
    assert_eq!(feed.offset(), 12);
}

#[test]
fn toggle_location_adds_and_removes() {
    let mut filters = FeedFilters::default();
    filters.toggle_location("Bogor");
    filters.toggle_location("Bekasi");
    filters.toggle_location("Bogor");
    assert_eq!(filters.locations, vec!["Bekasi".to_owned()]);
    filters.toggle_location("Bekasi");
    assert!(filters.is_empty());
}

// =============================================================
// Search
// =============================================================

#[test]
fn search_clears_filters_and_overrides_list() {
    let mut feed = ProductFeed::new();
    feed.set_filters(FeedFilters { category: "2".into(), ..FeedFilters::default() });
    feed.apply_page(0, page(0..12));

    assert_eq!(feed.begin_search("  brake ").as_deref(), Some("brake"));
    assert!(feed.filters().is_empty());
    assert!(feed.visible().is_empty());

    feed.apply_search("brake", page(200..203));
    assert_eq!(feed.visible().len(), 3);
    assert!(feed.next_page().is_none());
}

#[test]
fn outdated_search_results_are_ignored() {
    let mut feed = ProductFeed::new();
    feed.begin_search("oil");
    feed.begin_search("oil filter");
    feed.apply_search("oil", page(0..4));
    assert!(feed.visible().is_empty());
}

#[test]
fn new_search_text_hides_previous_results() {
    let mut feed = ProductFeed::new();
    feed.begin_search("oil");
    feed.apply_search("oil", page(0..4));
    assert_eq!(feed.visible().len(), 4);

    feed.begin_search("brake");
    assert!(feed.visible().is_empty());

    // Repeating the active text keeps what is shown.
    feed.apply_search("brake", page(10..12));
    feed.begin_search(" brake ");
    assert_eq!(feed.visible().len(), 2);
}

#[test]
fn blank_search_returns_to_browsing() {
    let mut feed = ProductFeed::new();
    feed.apply_page(0, page(0..12));
    feed.next_page();
    feed.begin_search("pad");
    feed.apply_search("pad", page(300..301));

    assert_eq!(feed.begin_search("   "), None);
    assert_eq!(feed.search_text(), None);
    assert_eq!(feed.offset(), 0);
    assert!(feed.has_more());
    assert_eq!(feed.visible().len(), 12);
}

#[test]
fn browsing_page_during_search_is_dropped() {
    let mut feed = ProductFeed::new();
    feed.begin_search("pad");
    feed.apply_page(0, page(0..12));
    feed.clear_search();
    assert!(feed.visible().is_empty());
}
