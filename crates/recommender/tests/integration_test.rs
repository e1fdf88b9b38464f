//! Integration tests for the recommendation engine.
//!
//! These tests build a small catalog with real-looking titles and ratings
//! and check the end-to-end guarantees of `recommend`.

use data_loader::{Catalog, MovieRecord, RatingRecord};
use recommender::{EngineConfig, RecommendQuery, RecommendationEngine};
use similarity::{HybridScorer, SimilaritySignal};
use std::sync::Arc;

fn create_test_catalog() -> Catalog {
    let movies = vec![
        MovieRecord::new(1, "Toy Story (1995)", "Animation|Children|Comedy"),
        MovieRecord::new(2, "A Bug's Life (1998)", "Animation|Children|Comedy"),
        MovieRecord::new(3, "Heat (1995)", "Action|Crime|Thriller"),
        MovieRecord::new(4, "Babe (1995)", "Children|Drama"),
        MovieRecord::new(5, "Shrek (2001)", "Adventure|Animation|Children|Comedy|Fantasy"),
        MovieRecord::new(6, "Casino (1995)", "Crime|Drama"),
        MovieRecord::new(7, "Chicken Run (2000)", "Animation|Children|Comedy"),
        MovieRecord::new(8, "Babylon 5", "Sci-Fi"),
        // Single rating: outside the reduced collaborative matrix
        MovieRecord::new(9, "Antz (1998)", "Adventure|Animation|Children|Comedy|Fantasy"),
    ];

    // Eight active users rate movies 1-7 with some structure
    let mut ratings = Vec::new();
    for user in 1..=8u32 {
        let family_fan = user <= 5;
        for movie in 1..=7u32 {
            let family = matches!(movie, 1 | 2 | 4 | 5 | 7);
            let rating = match (family_fan, family) {
                (true, true) => 4.0 + (user % 2) as f32 * 0.5,
                (false, false) => 4.5,
                _ => 2.0 + (movie % 3) as f32 * 0.5,
            };
            ratings.push(RatingRecord::new(user, movie, rating));
        }
    }
    ratings.push(RatingRecord::new(42, 9, 3.0));

    Catalog::from_records(movies, ratings).unwrap()
}

fn create_test_config() -> EngineConfig {
    EngineConfig::default()
        .with_top_users(8)
        .with_top_movies(7)
        .with_latent_factors(3)
}

fn build_engine() -> RecommendationEngine {
    RecommendationEngine::build(create_test_catalog(), create_test_config()).unwrap()
}

#[test]
fn test_content_row_self_similarity_is_zero() {
    let engine = build_engine();
    for i in 0..engine.catalog().len() {
        assert_eq!(engine.content_model().similarity_row(i)[i], 0.0);
    }
}

#[test]
fn test_collaborative_similarity_is_symmetric() {
    let engine = build_engine();
    let model = engine.collaborative_model();

    assert_eq!(model.latent_factors(), 3);
    for &a in model.movie_ids() {
        for &b in model.movie_ids() {
            assert_eq!(model.similarity(a, b), model.similarity(b, a));
        }
    }
}

#[test]
fn test_recommend_never_returns_query_movie() {
    let engine = build_engine();
    for title in engine.catalog().titles() {
        let result = engine.recommend_detailed(&RecommendQuery::new(title.clone()).with_limit(20));
        let matched = result.matched.expect("exact titles always resolve");
        assert!(result.recommendations.iter().all(|r| r.title != matched.title));
    }
}

#[test]
fn test_output_bounded_by_limit() {
    let engine = build_engine();
    for limit in [0, 1, 3, 100] {
        let titles = engine.recommend(&RecommendQuery::new("Toy Story").with_limit(limit));
        assert!(titles.len() <= limit);
    }
}

#[test]
fn test_low_confidence_returns_empty() {
    let engine = build_engine();
    assert!(engine.resolve("qqqq zzzz").is_none());
    assert!(engine.recommend(&RecommendQuery::new("qqqq zzzz")).is_empty());
}

#[test]
fn test_toy_story_scenario() {
    let engine = build_engine();
    let result = engine.recommend_detailed(&RecommendQuery::new("Toy Story").with_limit(1));

    assert_eq!(result.recommendations.len(), 1);
    let top = &result.recommendations[0];
    assert_ne!(top.title, "Toy Story (1995)");

    let query_index = engine.catalog().index_of_title("Toy Story (1995)").unwrap();
    let top_index = engine.catalog().index_of(top.movie_id).unwrap();
    assert!(engine.content_model().similarity(query_index, top_index) > 0.0);
}

#[test]
fn test_lowercase_query_without_year_resolves() {
    let engine = build_engine();
    let matched = engine.resolve("toy story").unwrap();

    assert_eq!(matched.title, "Toy Story (1995)");
    assert!(matched.score >= 60);
}

#[test]
fn test_min_rating_above_all_averages_is_empty() {
    let engine = build_engine();
    let result = engine.recommend_detailed(&RecommendQuery::new("Toy Story").with_min_rating(4.6));

    assert!(result.matched.is_some());
    assert!(result.recommendations.is_empty());
}

#[test]
fn test_year_min_removes_only_older_or_undated() {
    let engine = build_engine();
    let unfiltered = engine.recommend(&RecommendQuery::new("Toy Story").with_limit(100));
    let filtered = engine.recommend(
        &RecommendQuery::new("Toy Story")
            .with_year_min(1998)
            .with_limit(100),
    );

    let catalog = engine.catalog();
    let year_of = |title: &String| catalog.movie(catalog.index_of_title(title).unwrap()).unwrap().year;

    let expected: Vec<String> = unfiltered
        .into_iter()
        .filter(|t| year_of(t).is_some_and(|y| y >= 1998))
        .collect();
    assert_eq!(filtered, expected);
    assert!(filtered.contains(&"A Bug's Life (1998)".to_string()));
    assert!(!filtered.contains(&"Babylon 5".to_string()));
}

#[test]
fn test_low_activity_movie_scores_content_only() {
    let engine = build_engine();
    let catalog = engine.catalog();
    assert!(!engine.collaborative_model().contains(9));

    let query_index = catalog.index_of_title("Shrek (2001)").unwrap();
    let antz_index = catalog.index_of(9).unwrap();
    let ranked = HybridScorer::new(catalog, engine.content_model(), engine.collaborative_model())
        .with_weights(engine.config().weights())
        .rank(query_index);

    let antz = ranked.iter().find(|c| c.movie_id == 9).unwrap();
    let content = engine.content_model().similarity(query_index, antz_index);
    assert_eq!(antz.signal, SimilaritySignal::ContentOnly { content });
    assert_eq!(antz.score, content);

    let bugs_life = ranked.iter().find(|c| c.movie_id == 2).unwrap();
    assert!(matches!(bugs_life.signal, SimilaritySignal::Blended { .. }));
}

#[test]
fn test_precompute_gives_same_results() {
    let lazy = build_engine();
    let eager = RecommendationEngine::build(
        create_test_catalog(),
        create_test_config().with_precompute_content(true),
    )
    .unwrap();

    for title in ["Toy Story", "heat", "babe", "Antz"] {
        let query = RecommendQuery::new(title).with_limit(20);
        assert_eq!(lazy.recommend(&query), eager.recommend(&query));
    }
}

#[test]
fn test_concurrent_queries_share_engine() {
    let engine = Arc::new(build_engine());
    let expected = engine.recommend(&RecommendQuery::new("Toy Story"));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || engine.recommend(&RecommendQuery::new("Toy Story")))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn test_degenerate_catalog_builds() {
    let catalog = Catalog::from_records(
        vec![MovieRecord::new(1, "Lonely (2000)", "Drama")],
        vec![RatingRecord::new(1, 1, 4.0)],
    )
    .unwrap();
    let engine = RecommendationEngine::build(catalog, EngineConfig::default()).unwrap();

    assert_eq!(engine.collaborative_model().latent_factors(), 1);
    assert!(engine.recommend(&RecommendQuery::new("Lonely")).is_empty());
    assert_eq!(engine.random_title(), Some("Lonely (2000)"));
}
