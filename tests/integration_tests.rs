use booth_search::*;
use std::process::Command;
use tempfile::TempDir;
use url::Url;

const SEARCH_PAGE: &str = include_str!("fixtures/search_page.html");

fn binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_booth-search"))
}

#[test]
fn test_search_url_query_is_recoverable() {
    let raw = build_search_url("ja", "vrchat 衣装", "popular", 1).unwrap();
    let parsed = Url::parse(&raw).unwrap();

    assert_eq!(parsed.host_str(), Some("booth.pm"));
    assert!(parsed.path().contains("/ja/search/"));
    assert!(raw.contains(&urlencoding::encode("vrchat 衣装").into_owned()));

    let decoded = urlencoding::decode(parsed.path()).unwrap();
    assert!(decoded.contains("vrchat 衣装"));

    let query: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();
    assert!(query.contains(&("sort".to_string(), "popular".to_string())));
    assert!(query.contains(&("order".to_string(), "desc".to_string())));
    assert!(query.contains(&("page".to_string(), "1".to_string())));
}

#[test]
fn test_extract_fixture_page() {
    let listings = extract_listings_from_html(SEARCH_PAGE);

    assert_eq!(
        listings,
        vec![
            Listing {
                title: "Cat Hoodie".to_string(),
                url: "https://booth.pm/ja/items/7587937".to_string(),
                image: "https://booth.pximg.net/c/300x300/cat.jpg".to_string(),
                shop: "Micare Sewing".to_string(),
                price: "¥ 1,200".to_string(),
            },
            Listing {
                title: "Winter Coat".to_string(),
                url: "https://booth.pm/ja/items/5001234?from=search".to_string(),
                image: "https://booth.pximg.net/c/300x300/coat.jpg".to_string(),
                shop: "Coat Shop".to_string(),
                price: "1,500 JPY".to_string(),
            },
            Listing {
                title: "6000000".to_string(),
                url: "https://booth.pm/ja/items/6000000".to_string(),
                ..Default::default()
            },
        ]
    );
}

#[test]
fn test_fixture_urls_are_unique() {
    let listings = extract_listings_from_html(SEARCH_PAGE);
    let mut urls: Vec<&str> = listings.iter().map(|listing| listing.url.as_str()).collect();
    urls.sort_unstable();
    urls.dedup();

    assert_eq!(urls.len(), listings.len());
}

#[test]
fn test_binary_extracts_saved_page_as_json() {
    let dir = TempDir::new().unwrap();
    let page = dir.path().join("page.html");
    std::fs::write(&page, SEARCH_PAGE).unwrap();

    let output = binary().arg("--input").arg(&page).output().unwrap();

    assert!(output.status.success());
    let listings: Vec<Listing> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listings.len(), 3);
    assert_eq!(listings[0].shop, "Micare Sewing");

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("[\n  {\n    \"title\""));
}

#[test]
fn test_binary_jsonl_format() {
    let dir = TempDir::new().unwrap();
    let page = dir.path().join("page.html");
    std::fs::write(&page, SEARCH_PAGE).unwrap();

    let output = binary()
        .args(["--format", "jsonl", "--input"])
        .arg(&page)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    let last: Listing = serde_json::from_str(lines[2]).unwrap();
    assert_eq!(last.title, "6000000");
}

#[test]
fn test_binary_empty_page_prints_empty_array() {
    let dir = TempDir::new().unwrap();
    let page = dir.path().join("empty.html");
    std::fs::write(&page, "<html><body><p>No results</p></body></html>").unwrap();

    let output = binary().arg("--input").arg(&page).output().unwrap();

    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "[]\n");
}

#[test]
fn test_binary_reads_saved_page_with_invalid_utf8() {
    let dir = TempDir::new().unwrap();
    let page = dir.path().join("latin1.html");
    let mut bytes = SEARCH_PAGE.as_bytes().to_vec();
    bytes.extend_from_slice(b"<p>caf\xe9 \xff</p>");
    std::fs::write(&page, &bytes).unwrap();

    let output = binary().arg("--input").arg(&page).output().unwrap();

    assert!(output.status.success());
    let listings: Vec<Listing> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listings.len(), 3);
}

#[test]
fn test_binary_missing_input_is_io_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.html");

    let output = binary().arg("--input").arg(&missing).output().unwrap();

    assert_eq!(output.status.code(), Some(3));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_binary_rejects_unknown_sort() {
    let output = binary().args(["--sort", "cheapest"]).output().unwrap();

    assert_eq!(output.status.code(), Some(2));
}
