mod common;

use std::collections::HashSet;

use common::{days_from_today, game_input, player, setup};

#[tokio::test]
async fn hosted_and_attended_never_overlap() {
    let (store, svc) = setup();
    let me = player(&store, "Me");
    let friend = player(&store, "Friend");
    let court = store.add_court("Court", 40.0, -74.0);

    let mine = svc
        .games
        .create(game_input(me.player_id, court.court_id, days_from_today(2)))
        .await
        .unwrap();
    let theirs = svc
        .games
        .create(game_input(friend.player_id, court.court_id, days_from_today(1)))
        .await
        .unwrap();
    // Re-confirming my own game must not list it as attended.
    svc.rsvps.upsert(me.player_id, mine.game_id, "confirmed").await.unwrap();
    svc.rsvps.upsert(me.player_id, theirs.game_id, "maybe").await.unwrap();

    let view = svc.queries.player_games(me.player_id, false, true).await.unwrap();

    let hosted: HashSet<i64> = view.hosted.iter().map(|g| g.game.game_id).collect();
    let attended: HashSet<i64> = view.attended.iter().map(|g| g.game.game_id).collect();
    assert_eq!(hosted, HashSet::from([mine.game_id]));
    assert_eq!(attended, HashSet::from([theirs.game_id]));
    assert!(hosted.is_disjoint(&attended));
}

#[tokio::test]
async fn games_are_enriched_with_court_and_host() {
    let (store, svc) = setup();
    let me = player(&store, "Me");
    let friend = player(&store, "Friend");
    let court_a = store.add_court("A", 40.0, -74.0);
    let court_b = store.add_court("B", 40.1, -74.1);

    svc.games
        .create(game_input(me.player_id, court_a.court_id, days_from_today(2)))
        .await
        .unwrap();
    let theirs = svc
        .games
        .create(game_input(friend.player_id, court_b.court_id, days_from_today(3)))
        .await
        .unwrap();
    svc.rsvps.upsert(me.player_id, theirs.game_id, "confirmed").await.unwrap();

    let view = svc.queries.player_games(me.player_id, false, false).await.unwrap();

    let hosted = &view.hosted[0];
    assert_eq!(hosted.court.as_ref().map(|c| c.name.as_str()), Some("A"));
    assert_eq!(hosted.host.as_ref().map(|h| h.name.as_str()), Some("Me"));
    let attended = &view.attended[0];
    assert_eq!(attended.court.as_ref().map(|c| c.court_id), Some(court_b.court_id));
    assert_eq!(attended.host.as_ref().map(|h| h.player_id), Some(friend.player_id));
}

#[tokio::test]
async fn declined_games_only_when_requested() {
    let (store, svc) = setup();
    let me = player(&store, "Me");
    let friend = player(&store, "Friend");
    let court = store.add_court("Court", 40.0, -74.0);
    let game = svc
        .games
        .create(game_input(friend.player_id, court.court_id, days_from_today(2)))
        .await
        .unwrap();
    svc.rsvps.upsert(me.player_id, game.game_id, "declined").await.unwrap();

    let without = svc.queries.player_games(me.player_id, false, false).await.unwrap();
    assert!(without.attended.is_empty());

    let with = svc.queries.player_games(me.player_id, false, true).await.unwrap();
    assert_eq!(with.attended.len(), 1);
}

#[tokio::test]
async fn upcoming_filter_drops_past_games_and_orders_by_date() {
    let (store, svc) = setup();
    let me = player(&store, "Me");
    let court = store.add_court("Court", 40.0, -74.0);
    for days in [9, -4, 0, 3] {
        svc.games
            .create(game_input(me.player_id, court.court_id, days_from_today(days)))
            .await
            .unwrap();
    }

    let all = svc.queries.player_games(me.player_id, false, false).await.unwrap();
    let dates: Vec<_> = all.hosted.iter().map(|g| g.game.game_date).collect();
    assert_eq!(
        dates,
        [-4, 0, 3, 9].map(days_from_today).to_vec()
    );

    let upcoming = svc.queries.player_games(me.player_id, true, false).await.unwrap();
    let dates: Vec<_> = upcoming.hosted.iter().map(|g| g.game.game_date).collect();
    assert_eq!(dates, [0, 3, 9].map(days_from_today).to_vec());
}

#[tokio::test]
async fn unknown_player_has_no_games() {
    let (_store, svc) = setup();
    let view = svc.queries.player_games(12_345, true, true).await.unwrap();
    assert!(view.hosted.is_empty());
    assert!(view.attended.is_empty());
}

#[tokio::test]
async fn upcoming_games_filters_and_caps() {
    let (store, svc) = setup();
    let alice = player(&store, "Alice");
    let bob = player(&store, "Bob");
    let court_a = store.add_court("A", 40.0, -74.0);
    let court_b = store.add_court("B", 40.1, -74.1);

    let schedule = [
        (alice.player_id, court_a.court_id, 5),
        (alice.player_id, court_b.court_id, 1),
        (bob.player_id, court_a.court_id, 2),
        (bob.player_id, court_b.court_id, -1),
    ];
    for (host, court, days) in schedule {
        svc.games
            .create(game_input(host, court, days_from_today(days)))
            .await
            .unwrap();
    }

    let all = svc.queries.upcoming_games(20, None, None).await.unwrap();
    let dates: Vec<_> = all.iter().map(|g| g.game_date).collect();
    assert_eq!(dates, [1, 2, 5].map(days_from_today).to_vec());

    let capped = svc.queries.upcoming_games(2, None, None).await.unwrap();
    assert_eq!(capped.len(), 2);
    assert_eq!(capped[0].game_date, days_from_today(1));

    let at_a = svc
        .queries
        .upcoming_games(20, Some(court_a.court_id), None)
        .await
        .unwrap();
    assert!(at_a.iter().all(|g| g.court_id == court_a.court_id));
    assert_eq!(at_a.len(), 2);

    let by_bob = svc
        .queries
        .upcoming_games(20, None, Some(bob.player_id))
        .await
        .unwrap();
    assert_eq!(by_bob.len(), 1);
    assert_eq!(by_bob[0].game_date, days_from_today(2));

    let none = svc
        .queries
        .upcoming_games(20, Some(court_b.court_id), Some(bob.player_id))
        .await
        .unwrap();
    assert!(none.is_empty());
}
