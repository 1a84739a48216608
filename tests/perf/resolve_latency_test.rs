use std::time::Instant;

use crate::model::ShortcutEntry;
use crate::resolver::Resolver;
use crate::shortcut_table::ShortcutTable;
use crate::url_transform::UrlTransformer;

fn p95_ms(samples: &mut [f64]) -> f64 {
    samples.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let last = samples.len().saturating_sub(1);
    let idx = ((last as f64) * 0.95).round() as usize;
    samples[idx.min(last)]
}

#[test]
fn unmatched_navigation_p95_under_25ms() {
    let entries: Vec<ShortcutEntry> = (0..2_000)
        .map(|i| {
            ShortcutEntry::new(
                &format!("@kw{i:05}"),
                &format!("https://intranet.example.com/pages/{i:05}"),
            )
        })
        .collect();
    let table = ShortcutTable::from_entries(entries);
    let resolver = Resolver::new(
        '@',
        crate::config::Config::default().search_engines,
        UrlTransformer::new("app.todoist.com", "todoist").unwrap(),
    );
    let url = "https://www.example.org/articles/some%20long%20path/index.html?ref=home";

    for _ in 0..30 {
        let _ = resolver.resolve_navigated_url(&table, url);
    }

    let mut batch_p95 = Vec::with_capacity(5);
    for _ in 0..5 {
        let mut samples = Vec::with_capacity(40);
        for _ in 0..40 {
            let start = Instant::now();
            let resolved = resolver.resolve_navigated_url(&table, url);
            samples.push(start.elapsed().as_secs_f64() * 1000.0);
            assert!(resolved.is_none());
        }
        batch_p95.push(p95_ms(&mut samples));
    }

    batch_p95.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let median_p95 = batch_p95[batch_p95.len() / 2];

    assert!(
        median_p95 <= 25.0,
        "median batch p95 too high: {median_p95:.3}ms (budget 25.0ms); batches={batch_p95:?}",
    );
}
