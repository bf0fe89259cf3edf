//! Integration tests for pipeline execution.

#[cfg(test)]
mod tests {
    use crate::components::{ExpanderRegistry, ExtractorRegistry};
    use crate::config::PipelineConfig;
    use crate::core::{Link, Payload};
    use crate::engine::Pipeline;
    use crate::errors::{HarvestError, ResolutionError};
    use crate::events::{CollectingEventSink, EventKind};
    use crate::fetch::{CannedResponseFetcher, FetchChain, FetchStrategyKind};
    use crate::sites::demo;
    use crate::sites::records::CocktailRecord;
    use crate::testing::{
        fixture_config, listing_markup, recipe_markup, seed_store, EmptyFetcher,
        FailingExtractor, FailingFetcher, RecordingFetcher, StaticExpander, StaticExtractor, LISTING_PAGE_TYPE,
    };
    use pretty_assertions::assert_eq;
    use std::path::Path;
    use std::sync::Arc;

    const LIST_URL: &str = "https://example.test/list";
    const PAGE_2_URL: &str = "https://example.test/list/page/2";
    const NODE_SCHEMA: &str = "application/vnd.tests.node+json";

    fn item_url(name: &str) -> String {
        format!("https://example.test/items/{}", name.to_lowercase())
    }

    fn seed_catalog(root: &Path) {
        let (a, b, c, d) = (item_url("A"), item_url("B"), item_url("C"), item_url("D"));
        seed_store(
            root,
            LIST_URL,
            &listing_markup(&[("A", a.as_str()), ("B", b.as_str()), ("C", c.as_str())], Some(PAGE_2_URL)),
        )
        .unwrap();
        seed_store(root, PAGE_2_URL, &listing_markup(&[("D", d.as_str())], None)).unwrap();
        for name in ["A", "B", "C", "D"] {
            let ingredient = format!("1 oz {name} liqueur");
            seed_store(root, &item_url(name), &recipe_markup(name, &[ingredient.as_str()])).unwrap();
        }
    }

    fn record(payload: &Payload) -> CocktailRecord {
        serde_json::from_str(payload.content().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_end_to_end_from_persistent_store() {
        let dir = tempfile::tempdir().unwrap();
        seed_catalog(dir.path());

        let events = Arc::new(CollectingEventSink::new());
        let pipeline = Pipeline::builder(fixture_config(dir.path()))
            .event_sink(events.clone())
            .build()
            .unwrap();

        let results = pipeline.run_from(LIST_URL, LISTING_PAGE_TYPE).await.unwrap();

        let hrefs: Vec<&str> = results.iter().map(|p| p.link().href()).collect();
        assert_eq!(
            hrefs,
            vec![
                "https://example.test/items/a",
                "https://example.test/items/b",
                "https://example.test/items/c",
                "https://example.test/items/d",
            ]
        );
        for (payload, name) in results.iter().zip(["A", "B", "C", "D"]) {
            assert!(payload.is_complete());
            let record = record(payload);
            assert_eq!(record.name.as_deref(), Some(name));
            assert_eq!(record.ingredients, vec![format!("1 oz {name} liqueur")]);
        }

        assert_eq!(events.events_of_kind(EventKind::Fetched).len(), 6);
        assert_eq!(events.events_of_kind(EventKind::Expanded).len(), 2);
        assert_eq!(events.events_of_kind(EventKind::Completed).len(), 4);
        assert_eq!(events.events()[0].kind, EventKind::Fetched);
        assert_eq!(events.events()[0].href, LIST_URL);
    }

    #[tokio::test]
    async fn test_structured_write_through() {
        let html = tempfile::tempdir().unwrap();
        let json = tempfile::tempdir().unwrap();
        seed_catalog(html.path());

        let config = fixture_config(html.path()).with_structured_root_dir(json.path().to_string_lossy());
        let pipeline = Pipeline::new(config).unwrap();
        pipeline.run_from(LIST_URL, LISTING_PAGE_TYPE).await.unwrap();

        assert!(json.path().join("example-test-list.demo-all-cocktails.json").exists());
        assert!(json.path().join("example-test-items-a.demo-cocktail.json").exists());
    }

    #[tokio::test]
    async fn test_terminal_payload_is_returned_verbatim() {
        let store = Arc::new(RecordingFetcher::new(Arc::new(EmptyFetcher)));
        let pipeline = Pipeline::builder(demo::config())
            .fetch_chain(FetchChain::new().with_strategy(FetchStrategyKind::PersistentStore, store.clone()))
            .build()
            .unwrap();

        let terminal = Payload::complete(
            Link::external("https://example.test/done", "item"),
            r#"{"name":"Done"}"#,
            "application/json",
        );
        assert_eq!(pipeline.handle(terminal.clone()).await.unwrap(), vec![terminal]);
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_falls_back_to_network_once() {
        let href = "https://example.test/items/negroni";
        let store = Arc::new(RecordingFetcher::new(Arc::new(EmptyFetcher)));
        let network = Arc::new(RecordingFetcher::new(Arc::new(
            CannedResponseFetcher::new().with_response(href, recipe_markup("Negroni", &["1 oz Gin"])),
        )));

        let pipeline = Pipeline::builder(demo::config())
            .fetch_chain(
                FetchChain::new()
                    .with_strategy(FetchStrategyKind::PersistentStore, store.clone())
                    .with_strategy(FetchStrategyKind::Network, network.clone()),
            )
            .build()
            .unwrap();

        let results = pipeline.run_from(href, demo::COCKTAIL_PAGE_TYPE).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(record(&results[0]).name.as_deref(), Some("Negroni"));
        assert_eq!(store.call_count(href), 1);
        assert_eq!(network.call_count(href), 1);
    }

    #[tokio::test]
    async fn test_exhaustion_fails_the_run() {
        let href = "https://example.test/missing";
        let store = Arc::new(RecordingFetcher::new(Arc::new(EmptyFetcher)));
        let network = Arc::new(RecordingFetcher::new(Arc::new(EmptyFetcher)));

        let pipeline = Pipeline::builder(demo::config())
            .fetch_chain(
                FetchChain::new()
                    .with_strategy(FetchStrategyKind::PersistentStore, store.clone())
                    .with_strategy(FetchStrategyKind::Network, network.clone()),
            )
            .build()
            .unwrap();

        let err = pipeline.run_from(href, demo::COCKTAIL_PAGE_TYPE).await.unwrap_err();
        match err {
            HarvestError::FetchExhausted(e) => {
                assert_eq!(e.href, href);
                assert_eq!(e.attempted, vec!["persistent-store", "network"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(store.call_count(href), 1);
        assert_eq!(network.call_count(href), 1);
    }

    #[tokio::test]
    async fn test_failing_fetch_strategy_aborts_the_run() {
        let href = "https://example.test/items/negroni";
        let canned = Arc::new(RecordingFetcher::new(Arc::new(
            CannedResponseFetcher::new().with_response(href, recipe_markup("Negroni", &["1 oz Gin"])),
        )));

        let pipeline = Pipeline::builder(demo::config())
            .fetch_chain(
                FetchChain::new()
                    .with_strategy(FetchStrategyKind::Network, Arc::new(FailingFetcher::new("connection reset")))
                    .with_strategy(FetchStrategyKind::CannedResponse, canned.clone()),
            )
            .build()
            .unwrap();

        let err = pipeline.run_from(href, demo::COCKTAIL_PAGE_TYPE).await.unwrap_err();
        assert_eq!(err.kind(), "NetworkError");
        assert!(err.to_string().contains("connection reset"));
        assert!(canned.calls().is_empty());
    }

    #[test]
    fn test_oversized_network_timeout_is_rejected_at_build() {
        let mut config = fixture_config(Path::new("/tmp/harvest-unused"))
            .with_fetch_sequence([FetchStrategyKind::Network]);
        config.network.timeout_seconds = 1e20;

        let err = Pipeline::new(config).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("network.timeout_seconds"));
    }

    #[tokio::test]
    async fn test_terminal_extraction_ends_the_branch() {
        let href = "https://example.test/leaf";
        let config = PipelineConfig::new()
            .with_fetch_sequence([FetchStrategyKind::CannedResponse])
            .with_extractor("leaf", "tests::Terminal")
            .with_expander(NODE_SCHEMA, "tests::Tree");
        let pipeline = Pipeline::builder(config)
            .extractors(
                ExtractorRegistry::new()
                    .with("tests::Terminal", |_| Box::new(StaticExtractor::terminal("application/json"))),
            )
            .expanders(ExpanderRegistry::new().with("tests::Tree", |_| Box::new(tree())))
            .canned_responses(Arc::new(CannedResponseFetcher::new().with_response(href, "<p>leaf</p>")))
            .build()
            .unwrap();

        let results = pipeline.run_from(href, "leaf").await.unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].is_complete());
        assert_eq!(results[0].content(), Some("<p>leaf</p>"));
        assert_eq!(results[0].content_type(), Some("application/json"));
    }

    #[tokio::test]
    async fn test_unknown_page_type_names_the_tag() {
        let canned = Arc::new(CannedResponseFetcher::new().with_response(LIST_URL, "<p>?</p>"));
        let pipeline = Pipeline::builder(demo::config())
            .canned_responses(canned)
            .build()
            .unwrap();

        let err = pipeline.run_from(LIST_URL, "unknown_page").await.unwrap_err();
        match err {
            HarvestError::Resolution(e) => {
                assert_eq!(e, ResolutionError::unmapped("extractor", "unknown_page"));
                assert_eq!(e.tag(), "unknown_page");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    fn node(href: &str) -> Payload {
        Payload::extracted(Link::external(href, "node"), "{}", NODE_SCHEMA)
    }

    fn leaf(href: &str) -> Payload {
        Payload::complete(Link::external(href, "leaf"), "{}", "application/json")
    }

    fn tree() -> StaticExpander {
        StaticExpander::new()
            .with_children("root", vec![node("child1"), node("child2"), node("next")])
            .with_children("child1", vec![leaf("child1/a"), node("child1/deep")])
            .with_children("child1/deep", vec![leaf("child1/deep/a")])
            .with_children("child2", vec![leaf("child2/a")])
            .with_children("next", vec![leaf("next/a"), leaf("next/b")])
    }

    fn tree_pipeline() -> Pipeline {
        let config = PipelineConfig::new()
            .with_extractor("node", "tests::StaticExtractor")
            .with_expander(NODE_SCHEMA, "tests::Tree");
        Pipeline::builder(config)
            .extractors(
                ExtractorRegistry::new()
                    .with("tests::StaticExtractor", |_| Box::new(StaticExtractor::new(NODE_SCHEMA))),
            )
            .expanders(ExpanderRegistry::new().with("tests::Tree", |_| Box::new(tree())))
            .fetch_chain(FetchChain::new().with_strategy(FetchStrategyKind::PersistentStore, Arc::new(EmptyFetcher)))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_results_are_depth_first() {
        let results = tree_pipeline().handle(node("root")).await.unwrap();
        let hrefs: Vec<&str> = results.iter().map(|p| p.link().href()).collect();
        assert_eq!(
            hrefs,
            vec!["child1/a", "child1/deep/a", "child2/a", "next/a", "next/b"]
        );
    }

    #[tokio::test]
    async fn test_empty_expansion_yields_nothing() {
        let results = tree_pipeline().handle(node("barren")).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_payload_is_an_error() {
        let malformed = Payload::from_parts(
            Link::external("https://example.test/odd", "node"),
            Some("<p>".to_string()),
            None,
            false,
        );
        let err = tree_pipeline().handle(malformed).await.unwrap_err();
        match err {
            HarvestError::PipelineState(e) => {
                assert_eq!(e.href, "https://example.test/odd");
                assert!(e.has_content);
                assert_eq!(e.content_type, None);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_unclassified_content_type_is_an_error() {
        let odd = Payload::fetched(Link::external("https://example.test/odd", "node"), "%PDF", "application/pdf");
        let err = tree_pipeline().handle(odd).await.unwrap_err();
        assert_eq!(err.kind(), "PipelineStateError");
    }

    #[tokio::test]
    async fn test_collaborator_error_aborts_without_partial_results() {
        let dir = tempfile::tempdir().unwrap();
        seed_catalog(dir.path());

        let extractors = ExtractorRegistry::builtin().with("tests::Failing", |_| Box::new(FailingExtractor));
        let config = fixture_config(dir.path()).with_extractor(demo::COCKTAIL_PAGE_TYPE, "tests::Failing");
        let pipeline = Pipeline::builder(config).extractors(extractors).build().unwrap();

        let err = pipeline.run_from(LIST_URL, LISTING_PAGE_TYPE).await.unwrap_err();
        match err {
            HarvestError::Validation(e) => assert_eq!(e.href, "https://example.test/items/a"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_demo_catalog_harvest() {
        let canned = Arc::new(demo::canned_fetcher());
        let pipeline = Pipeline::builder(demo::config())
            .canned_responses(canned.clone())
            .build()
            .unwrap();

        let results = pipeline.run_from(demo::ENTRY_URL, demo::LISTING_PAGE_TYPE).await.unwrap();
        let names: Vec<String> = results.iter().filter_map(|p| record(p).name).collect();
        assert_eq!(
            names,
            vec!["Manhattan", "Margarita", "Negroni", "Old Fashioned", "Paper Plane"]
        );
        assert_eq!(canned.requests().len(), 8);
    }
}
