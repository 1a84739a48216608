use omnijump_core::config::Config;
use omnijump_core::model::ShortcutEntry;
use omnijump_core::resolver::Resolver;
use omnijump_core::shortcut_table::ShortcutTable;

fn resolver() -> Resolver {
    Resolver::from_config(&Config::default()).unwrap()
}

fn table() -> ShortcutTable {
    ShortcutTable::from_entries(vec![
        ShortcutEntry::new("@home", "https://intranet.example.com/"),
        ShortcutEntry::new("@gh", "https://github.com"),
        ShortcutEntry::new("@todo", "https://app.todoist.com/app/task/ABC123"),
        ShortcutEntry::new("@docs", "https://docs.example.com/start"),
    ])
}

#[test]
fn typed_keyword_resolves_with_and_without_marker() {
    let resolver = resolver();
    let table = table();

    for entry in table.entries() {
        let expected = resolver.transformer().transform(&entry.destination);
        assert_eq!(
            resolver.resolve_typed_input(&table, entry.bare_keyword()),
            Some(expected.clone())
        );
        assert_eq!(
            resolver.resolve_typed_input(&table, &entry.keyword),
            Some(expected)
        );
    }
}

#[test]
fn typed_task_link_is_transformed() {
    assert_eq!(
        resolver().resolve_typed_input(&table(), "todo"),
        Some("todoist://task?id=ABC123".to_string())
    );
}

#[test]
fn unknown_typed_text_falls_back_to_first_entry() {
    assert_eq!(
        resolver().resolve_typed_input(&table(), "nothing-like-this"),
        Some("https://intranet.example.com/".to_string())
    );
}

#[test]
fn unknown_typed_text_with_empty_table_is_no_match() {
    let empty = ShortcutTable::default();
    assert_eq!(resolver().resolve_typed_input(&empty, "gh"), None);
}

#[test]
fn search_query_matching_keyword_redirects() {
    let resolver = resolver();
    let table = table();

    for url in [
        "https://www.google.com/search?q=%40gh",
        "https://www.bing.com/search?q=@gh&form=QBLH",
        "https://duckduckgo.com/?q=+%40gh+",
    ] {
        assert_eq!(
            resolver.resolve_navigated_url(&table, url),
            Some("https://github.com".to_string()),
            "url: {url}"
        );
    }
}

#[test]
fn search_query_without_marker_or_on_other_paths_is_ignored() {
    let resolver = resolver();
    let table = table();

    assert_eq!(
        resolver.resolve_navigated_url(&table, "https://www.google.com/search?q=gh"),
        None
    );
    assert_eq!(
        resolver.resolve_navigated_url(&table, "https://www.google.com/maps?q=%40gh"),
        None
    );
}

#[test]
fn bare_marker_address_goes_to_default_route() {
    let resolver = resolver();
    let table = table();

    for url in ["@", "http://@/", "https://@/"] {
        assert_eq!(
            resolver.resolve_navigated_url(&table, url),
            Some("https://intranet.example.com/".to_string()),
            "url: {url}"
        );
    }
    assert_eq!(
        resolver.resolve_navigated_url(&ShortcutTable::default(), "@"),
        None
    );
}

#[test]
fn task_links_are_redirected_to_app_scheme() {
    assert_eq!(
        resolver().resolve_navigated_url(
            &ShortcutTable::default(),
            "https://app.todoist.com/app/task/Z9"
        ),
        Some("todoist://task?id=Z9".to_string())
    );
}

#[test]
fn keyword_in_address_path_redirects() {
    let resolver = resolver();
    let table = table();

    for url in [
        "http://@gh/",
        "https://@gh/",
        "https://search.local/@gh",
        "https://search.local/%40GH/",
    ] {
        assert_eq!(
            resolver.resolve_navigated_url(&table, url),
            Some("https://github.com".to_string()),
            "url: {url}"
        );
    }
}

#[test]
fn first_keyword_in_index_order_wins() {
    let table = ShortcutTable::from_entries(vec![
        ShortcutEntry::new("@b", "https://first.example.com"),
        ShortcutEntry::new("@a/@b", "https://second.example.com"),
    ]);

    assert_eq!(
        resolver().resolve_navigated_url(&table, "https://x.example.com/@a/@b"),
        Some("https://first.example.com".to_string())
    );
}

#[test]
fn ordinary_and_malformed_urls_are_no_match() {
    let resolver = resolver();
    let table = table();

    for url in [
        "",
        "https://github.com/rust-lang/rust",
        "not a url",
        "https://example.com/%FF%FE",
        "https://x.com/%zz/@gh",
    ] {
        assert_eq!(resolver.resolve_navigated_url(&table, url), None, "url: {url}");
    }
}

#[test]
fn suggestions_filter_on_bare_keyword() {
    let resolver = resolver();
    let table = table();

    let all = resolver.suggestions(&table, "");
    assert_eq!(all.len(), 4);
    assert_eq!(all[0].content, "home");
    assert_eq!(
        all[0].description,
        "Go to: https://intranet.example.com/ (@home)"
    );

    let filtered = resolver.suggestions(&table, "o");
    let contents: Vec<&str> = filtered.iter().map(|s| s.content.as_str()).collect();
    assert_eq!(contents, vec!["home", "todo", "docs"]);
}
