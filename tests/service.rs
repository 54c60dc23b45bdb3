//! Behaviour of `LinkService` over the in-memory store, including
//! concurrent creation and resolution.

use std::sync::Arc;

use link_redirector::generator::AlphanumericGenerator;
use link_redirector::{LinkError, LinkService, MemoryLinkStore};
use tokio::task::JoinSet;

const CONCURRENCY: usize = 32;

fn service() -> LinkService {
    LinkService::new(Arc::new(MemoryLinkStore::new()))
}

#[tokio::test]
async fn validation() {
    let service = service();
    assert_eq!(service.create("not-a-url", None).await, Err(LinkError::InvalidUrl));
    assert_eq!(service.create("ftp://x.com", None).await, Err(LinkError::InvalidUrl));

    let created = service.create("https://x.com", None).await.unwrap();
    assert_eq!(created.url, "https://x.com");
    assert_eq!(created.code.len(), 7);
    assert!(created.code.bytes().all(|b| b.is_ascii_alphanumeric()));
}

#[tokio::test]
async fn custom_code_round_trip() {
    let service = service();
    let created = service.create("https://x.com", Some("abc123")).await.unwrap();
    assert_eq!(created.code, "abc123");
    assert_eq!(service.resolve("abc123").await.unwrap(), "https://x.com");
}

#[tokio::test]
async fn empty_custom_code_generates_one() {
    let service = service();
    let created = service.create("https://x.com", Some("")).await.unwrap();
    assert_eq!(created.code.len(), 7);
}

#[tokio::test]
async fn not_found() {
    let service = service();
    assert_eq!(service.resolve("doesnotexist").await, Err(LinkError::NotFound));
    assert_eq!(service.stats("doesnotexist").await, Err(LinkError::NotFound));
}

#[tokio::test]
async fn deletion() {
    let service = service();
    let created = service.create("https://x.com", None).await.unwrap();
    service.remove(&created.code).await.unwrap();
    assert_eq!(service.resolve(&created.code).await, Err(LinkError::NotFound));
    assert_eq!(service.remove(&created.code).await, Err(LinkError::NotFound));
}

#[tokio::test]
async fn deleted_code_can_be_reused() {
    let service = service();
    service.create("https://old.com", Some("abc123")).await.unwrap();
    service.resolve("abc123").await.unwrap();
    service.remove("abc123").await.unwrap();

    service.create("https://new.com", Some("abc123")).await.unwrap();
    let link = service.stats("abc123").await.unwrap();
    assert_eq!(link.url, "https://new.com");
    assert_eq!(link.clicks, 0);
    assert_eq!(link.last_clicked, None);
}

#[tokio::test]
async fn stats_do_not_count() {
    let service = service();
    service.create("https://x.com", Some("abc123")).await.unwrap();
    service.resolve("abc123").await.unwrap();

    let first = service.stats("abc123").await.unwrap();
    let second = service.stats("abc123").await.unwrap();
    assert_eq!(first.clicks, 1);
    assert_eq!(first.clicks, second.clicks);
    assert_eq!(first.last_clicked, second.last_clicked);
    assert!(first.last_clicked.unwrap() >= first.created_at);
}

#[tokio::test]
async fn resolve_link_returns_counted_link() {
    let service = service();
    service.create("https://x.com", Some("abc123")).await.unwrap();
    let link = service.resolve_link("abc123").await.unwrap();
    assert_eq!(link.clicks, 1);
    assert!(link.last_clicked.is_some());
}

#[tokio::test]
async fn listing_is_newest_first() {
    let service = service();
    for code in ["link01", "link02", "link03"] {
        service.create("https://x.com", Some(code)).await.unwrap();
    }
    let links = service.list().await.unwrap();
    let codes: Vec<&str> = links.iter().map(|link| link.code.as_str()).collect();
    assert_eq!(codes, ["link03", "link02", "link01"]);
    assert!(links.windows(2).all(|pair| pair[0].created_at >= pair[1].created_at));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_custom_code_has_one_winner() {
    let service = service();

    let mut set = JoinSet::new();
    for i in 0..CONCURRENCY {
        let service = service.clone();
        set.spawn(async move {
            let url = format!("https://x.com/{i}");
            service.create(&url, Some("shared")).await
        });
    }

    let mut winners = 0;
    while let Some(result) = set.join_next().await {
        match result.unwrap() {
            Ok(created) => {
                assert_eq!(created.code, "shared");
                winners += 1;
            }
            Err(err) => assert_eq!(err, LinkError::CodeTaken),
        }
    }
    assert_eq!(winners, 1);
    assert_eq!(service.list().await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_resolutions_are_all_counted() {
    let service = service();
    service.create("https://x.com", Some("abc123")).await.unwrap();
    service.resolve("abc123").await.unwrap();
    let before = service.stats("abc123").await.unwrap().clicks;

    let mut set = JoinSet::new();
    for _ in 0..CONCURRENCY {
        let service = service.clone();
        set.spawn(async move { service.resolve("abc123").await });
    }
    while let Some(result) = set.join_next().await {
        assert_eq!(result.unwrap().unwrap(), "https://x.com");
    }

    let after = service.stats("abc123").await.unwrap().clicks;
    assert_eq!(after, before + CONCURRENCY as i64);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_generated_codes_are_distinct() {
    // A 6 character code from a seeded source keeps the run reproducible.
    let service = service().with_generator(Arc::new(AlphanumericGenerator::seeded(1, 6)));

    let mut set = JoinSet::new();
    for _ in 0..CONCURRENCY {
        let service = service.clone();
        set.spawn(async move { service.create("https://x.com", None).await });
    }
    let mut codes = Vec::new();
    while let Some(result) = set.join_next().await {
        codes.push(result.unwrap().unwrap().code);
    }
    codes.sort();
    codes.dedup();
    assert_eq!(codes.len(), CONCURRENCY);
}
