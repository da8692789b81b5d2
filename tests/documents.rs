//! End-to-end document building against canned OpenAlex data.

use mockito::{Matcher, Server};
use rustopenalex::config::OpenAlexConfig;
use rustopenalex::mock::{MockCall, MockClient, MockFailure};
use rustopenalex::openalex::OpenAlexClient;
use rustopenalex::{AuthorDocumentBuilder, OpenAlexError, WorkDocumentBuilder};
use serde_json::{json, Value};
use std::sync::Arc;

fn jane_doe() -> Value {
    json!({
        "id": "https://openalex.org/A123",
        "display_name": "Jane Doe",
        "cited_by_count": 57
    })
}

fn jane_doe_works() -> Vec<Value> {
    vec![
        json!({
            "id": "https://openalex.org/W1",
            "title": "X",
            "abstract": "Y",
            "primary_location": {"source": {"display_name": "Journal of X"}},
            "authorships": [
                {"author": {"display_name": "Jane Doe"}},
                {"author": {"display_name": "Max Mustermann"}}
            ]
        }),
        json!({
            "id": "https://openalex.org/W2",
            "title": "Z",
            "authorships": [{"author": {"display_name": "Jane Doe"}}]
        }),
    ]
}

#[tokio::test]
async fn author_documents_end_to_end() {
    let mock = Arc::new(
        MockClient::new()
            .with_authors(
                "Jane Doe",
                vec![
                    jane_doe(),
                    json!({"id": "https://openalex.org/A999", "display_name": "Jane Doe-Smith", "cited_by_count": 1}),
                ],
            )
            .with_author_works("A123", jane_doe_works()),
    );

    let documents = AuthorDocumentBuilder::new(mock.clone())
        .build("Jane Doe", 1)
        .await
        .expect("build should succeed");

    assert_eq!(documents.len(), 2);

    assert_eq!(documents[0].text(), "X Y");
    assert_eq!(
        Value::Object(documents[0].metadata().clone()),
        json!({
            "title": "X",
            "author": "Jane Doe",
            "last_known_institution": "",
            "cited_by_count": 57,
            "authors": ["Jane Doe", "Max Mustermann"],
            "venue": "Journal of X"
        })
    );

    assert_eq!(documents[1].text(), "Z");
    assert_eq!(documents[1].get_str("title"), Some("Z"));
    assert_eq!(documents[1].get_str("venue"), Some(""));
    assert_eq!(documents[1].get_str("last_known_institution"), Some(""));

    // Only the first author was expanded.
    assert_eq!(
        mock.calls(),
        vec![
            MockCall::SearchAuthors("Jane Doe".to_string()),
            MockCall::WorksByAuthor("A123".to_string()),
        ]
    );
}

#[tokio::test]
async fn work_documents_end_to_end() {
    let mock = Arc::new(
        MockClient::new()
            .with_search("LLMs", vec![json!({"id": "https://openalex.org/W9", "title": "T"})])
            .with_work(
                "W9",
                json!({
                    "id": "https://openalex.org/W9",
                    "title": "T",
                    "abstract": "",
                    "authorships": [{"author": {"display_name": "A"}}]
                }),
            ),
    );

    let documents = WorkDocumentBuilder::new(mock)
        .build("LLMs", 1)
        .await
        .expect("build should succeed");

    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].text(), "T");
    assert_eq!(
        Value::Object(documents[0].metadata().clone()),
        json!({"title": "T", "authors": ["A"], "venue": ""})
    );
}

#[tokio::test]
async fn search_failure_returns_no_documents() {
    let mock = Arc::new(MockClient::new().fail_on(
        MockCall::SearchAuthors("Jane Doe".to_string()),
        MockFailure::Status(503),
    ));

    let result = AuthorDocumentBuilder::new(mock.clone()).build("Jane Doe", 10).await;
    let err = result.expect_err("search failure must abort the build");
    assert!(err.is_upstream());
    assert_eq!(mock.calls().len(), 1);
}

#[tokio::test]
async fn malformed_work_discards_earlier_documents() {
    let mut works = jane_doe_works();
    works.push(json!({"id": "https://openalex.org/W3", "authorships": []}));

    let mock = Arc::new(
        MockClient::new()
            .with_authors("Jane Doe", vec![jane_doe()])
            .with_author_works("A123", works),
    );

    let err = AuthorDocumentBuilder::new(mock)
        .build("Jane Doe", 10)
        .await
        .expect_err("missing title must abort the build");
    assert!(matches!(err, OpenAlexError::MalformedRecord { .. }));
}

#[tokio::test]
async fn http_client_end_to_end() {
    let mut server = Server::new_async().await;

    let search = server
        .mock("GET", "/works")
        .match_query(Matcher::UrlEncoded("search".to_string(), "LLMs".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "meta": {"count": 2, "page": 1, "per_page": 25},
                "results": [
                    {"id": "https://openalex.org/W9", "title": "T"},
                    {"id": "https://openalex.org/W10", "title": "Ignored"}
                ]
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let detail = server
        .mock("GET", "/works/W9")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": "https://openalex.org/W9",
                "title": "T",
                "abstract_inverted_index": {"Scaling": [0], "laws": [1]},
                "primary_location": {"source": {"display_name": "NeurIPS"}},
                "authorships": [{"author": {"display_name": "A"}}]
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let config = OpenAlexConfig {
        max_retries: 0,
        ..OpenAlexConfig::default().with_base_url(server.url())
    };
    let client = OpenAlexClient::new(config).expect("client should build");

    let documents = WorkDocumentBuilder::new(Arc::new(client))
        .build("LLMs", 1)
        .await
        .expect("build should succeed");

    search.assert_async().await;
    detail.assert_async().await;

    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].text(), "T Scaling laws");
    assert_eq!(documents[0].get_str("venue"), Some("NeurIPS"));
}

#[tokio::test]
async fn http_client_non_json_search_is_unexpected() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/authors")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("definitely not json")
        .create_async()
        .await;

    let config = OpenAlexConfig::default().with_base_url(server.url());
    let client = OpenAlexClient::new(config).expect("client should build");

    let err = AuthorDocumentBuilder::new(Arc::new(client))
        .build_default("Jane Doe")
        .await
        .expect_err("non-JSON body must fail");
    assert!(matches!(err, OpenAlexError::Unexpected(_)));
    assert!(!err.is_upstream());
}
