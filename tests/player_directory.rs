mod common;

use common::{player, setup};

#[tokio::test]
async fn search_is_case_insensitive_and_sorted() {
    let (store, svc) = setup();
    for name in ["Jordan Bell", "Mike", "jordan pickett", "Michael Jordan"] {
        player(&store, name);
    }

    let hits = svc.players.search("JORDAN", 10).await.unwrap();
    let names: Vec<&str> = hits.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Jordan Bell", "Michael Jordan", "jordan pickett"]);
}

#[tokio::test]
async fn empty_search_matches_everyone_up_to_the_limit() {
    let (store, svc) = setup();
    for name in ["Dee", "Cal", "Bo", "Al"] {
        player(&store, name);
    }

    let hits = svc.players.search("", 3).await.unwrap();
    let names: Vec<&str> = hits.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Al", "Bo", "Cal"]);
}

#[tokio::test]
async fn non_positive_limit_still_returns_a_row() {
    let (store, svc) = setup();
    player(&store, "Solo");
    assert_eq!(svc.players.search("", 0).await.unwrap().len(), 1);
}
