// tests/providers_arxiv.rs
use research_pipeline::ingest::providers::arxiv::ArxivProvider;
use research_pipeline::{Source, SourceProvider};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FEED: &str = include_str!("fixtures/arxiv_feed.xml");

#[tokio::test]
async fn feed_entries_become_arxiv_records_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/query"))
        .and(query_param("search_query", "all:graph neural"))
        .and(query_param("start", "0"))
        .and(query_param("max_results", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FEED))
        .expect(1)
        .mount(&server)
        .await;

    let provider = ArxivProvider::new(reqwest::Client::new())
        .with_endpoint(format!("{}/api/query", server.uri()));
    let out = provider.fetch("graph neural", 3).await.expect("arxiv ok");

    assert_eq!(out.len(), 3);
    assert!(out.iter().all(|r| r.source == Source::Arxiv));
    let titles: Vec<&str> = out.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "How Powerful are Graph Neural Networks?",
            "Semi-Supervised Classification with Graph Convolutional Networks",
            "Graph Attention Networks",
        ]
    );
    assert_eq!(out[0].url, "http://arxiv.org/abs/1810.00826v3");
    assert_eq!(out[0].published, "2018-10-01T17:32:23Z");
    assert!(out[0].summary.starts_with("Graph Neural Networks (GNNs)"));
    assert!(out[0].summary.ends_with("learning of graphs."));
}

#[tokio::test]
async fn server_error_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let provider = ArxivProvider::new(reqwest::Client::new()).with_endpoint(server.uri());
    assert!(provider.fetch("q", 1).await.is_err());
}

#[tokio::test]
async fn malformed_feed_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<feed><entry>"))
        .mount(&server)
        .await;

    let provider = ArxivProvider::new(reqwest::Client::new()).with_endpoint(server.uri());
    assert!(provider.fetch("q", 1).await.is_err());
}
