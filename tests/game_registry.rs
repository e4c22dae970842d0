mod common;

use common::{days_from_today, game_input, player, setup, token_for};
use courtside_server::db::models::{GameChanges, RsvpStatus};
use courtside_server::db::Store;
use courtside_server::error::AppError;
use courtside_server::game::registry::CreateGameInput;

#[tokio::test]
async fn create_confirms_the_host() {
    let (store, svc) = setup();
    let host = player(&store, "Host");
    let court = store.add_court("Court", 40.0, -74.0);

    let game = svc
        .games
        .create(game_input(host.player_id, court.court_id, days_from_today(5)))
        .await
        .unwrap();

    assert_eq!(game.host_id, host.player_id);
    assert_eq!(game.court_id, court.court_id);
    assert_eq!(game.confirmed_count, 1);
    let rsvps = store.rsvps_of(host.player_id);
    assert_eq!(rsvps.len(), 1);
    assert_eq!(rsvps[0].game_id, game.game_id);
    assert_eq!(rsvps[0].status, RsvpStatus::Confirmed);
}

#[tokio::test]
async fn create_with_unknown_court_persists_nothing() {
    let (store, svc) = setup();
    let host = player(&store, "Host");

    let res = svc
        .games
        .create(game_input(host.player_id, 4_242, days_from_today(5)))
        .await;

    assert!(matches!(res, Err(AppError::NotFound(ref m)) if m == "Court not found"));
    assert_eq!(store.game_count(), 0);
    assert_eq!(store.rsvp_count(), 0);
}

#[tokio::test]
async fn create_with_unknown_host_fails() {
    let (store, svc) = setup();
    let court = store.add_court("Court", 40.0, -74.0);

    let res = svc
        .games
        .create(game_input(4_242, court.court_id, days_from_today(5)))
        .await;

    assert!(matches!(res, Err(AppError::NotFound(ref m)) if m == "Host not found"));
    assert_eq!(store.game_count(), 0);
}

#[tokio::test]
async fn create_requires_all_fields() {
    let (store, svc) = setup();
    let res = svc.games.create(CreateGameInput::default()).await;
    assert!(matches!(res, Err(AppError::Validation(_))));
    assert_eq!(store.game_count(), 0);
}

#[tokio::test]
async fn host_can_update_whitelisted_fields() {
    let (store, svc) = setup();
    let host = player(&store, "Host");
    let court = store.add_court("Court", 40.0, -74.0);
    let other_court = store.add_court("Other", 40.1, -74.1);
    let game = svc
        .games
        .create(game_input(host.player_id, court.court_id, days_from_today(5)))
        .await
        .unwrap();

    let token = token_for(host.user_id);
    let changes = GameChanges {
        court_id: Some(other_court.court_id),
        players_needed: Some(6),
        notes: Some(Some("half court".into())),
        ..Default::default()
    };
    let updated = svc
        .games
        .update(game.game_id, Some(&token), changes)
        .await
        .unwrap();

    assert_eq!(updated.court_id, other_court.court_id);
    assert_eq!(updated.players_needed, 6);
    assert_eq!(updated.notes.as_deref(), Some("half court"));
    assert_eq!(updated.game_date, game.game_date);
    assert_eq!(store.game(game.game_id).await.unwrap().unwrap(), updated);
}

#[tokio::test]
async fn non_host_update_is_forbidden_and_changes_nothing() {
    let (store, svc) = setup();
    let host = player(&store, "Host");
    let intruder = player(&store, "Intruder");
    let court = store.add_court("Court", 40.0, -74.0);
    let game = svc
        .games
        .create(game_input(host.player_id, court.court_id, days_from_today(5)))
        .await
        .unwrap();
    let before = store.game(game.game_id).await.unwrap().unwrap();

    let token = token_for(intruder.user_id);
    let changes = GameChanges {
        skill_level: Some("pro".into()),
        ..Default::default()
    };
    let res = svc.games.update(game.game_id, Some(&token), changes).await;

    assert!(matches!(res, Err(AppError::Forbidden(_))));
    assert_eq!(store.game(game.game_id).await.unwrap().unwrap(), before);
}

#[tokio::test]
async fn update_error_cases() {
    let (store, svc) = setup();
    let host = player(&store, "Host");
    let court = store.add_court("Court", 40.0, -74.0);
    let game = svc
        .games
        .create(game_input(host.player_id, court.court_id, days_from_today(5)))
        .await
        .unwrap();
    let token = token_for(host.user_id);
    let some_change = || GameChanges {
        game_time: Some("07:00".into()),
        ..Default::default()
    };

    let unauthenticated = svc.games.update(game.game_id, None, some_change()).await;
    assert!(matches!(unauthenticated, Err(AppError::Unauthorized(_))));

    let garbage = svc.games.update(game.game_id, Some("not-a-jwt"), some_change()).await;
    assert!(matches!(garbage, Err(AppError::Unauthorized(_))));

    let stranger = token_for(uuid::Uuid::new_v4());
    let no_profile = svc.games.update(game.game_id, Some(&stranger), some_change()).await;
    assert!(matches!(no_profile, Err(AppError::NotFound(ref m)) if m == "Player profile not found"));

    let missing = svc.games.update(game.game_id + 100, Some(&token), some_change()).await;
    assert!(matches!(missing, Err(AppError::NotFound(ref m)) if m == "Game not found"));

    let empty = svc
        .games
        .update(game.game_id, Some(&token), GameChanges::default())
        .await;
    assert!(matches!(empty, Err(AppError::Validation(_))));

    let bad_court = GameChanges {
        court_id: Some(court.court_id + 100),
        ..Default::default()
    };
    let res = svc.games.update(game.game_id, Some(&token), bad_court).await;
    assert!(matches!(res, Err(AppError::NotFound(_))));

    assert_eq!(store.game(game.game_id).await.unwrap().unwrap(), game);
}

#[tokio::test]
async fn host_delete_removes_the_game() {
    let (store, svc) = setup();
    let host = player(&store, "Host");
    let court = store.add_court("Court", 40.0, -74.0);
    let game = svc
        .games
        .create(game_input(host.player_id, court.court_id, days_from_today(5)))
        .await
        .unwrap();
    let token = token_for(host.user_id);

    svc.games.delete(game.game_id, Some(&token)).await.unwrap();

    assert!(store.game(game.game_id).await.unwrap().is_none());
    let again = svc.games.delete(game.game_id, Some(&token)).await;
    assert!(matches!(again, Err(AppError::NotFound(_))));
    let update = svc
        .games
        .update(
            game.game_id,
            Some(&token),
            GameChanges {
                notes: Some(Some("x".into())),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(update, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn non_host_delete_is_forbidden() {
    let (store, svc) = setup();
    let host = player(&store, "Host");
    let other = player(&store, "Other");
    let court = store.add_court("Court", 40.0, -74.0);
    let game = svc
        .games
        .create(game_input(host.player_id, court.court_id, days_from_today(5)))
        .await
        .unwrap();

    let res = svc
        .games
        .delete(game.game_id, Some(&token_for(other.user_id)))
        .await;

    assert!(matches!(res, Err(AppError::Forbidden(_))));
    assert!(store.game(game.game_id).await.unwrap().is_some());
}

#[tokio::test]
async fn host_can_clear_notes() {
    let (store, svc) = setup();
    let host = player(&store, "Host");
    let court = store.add_court("Court", 40.0, -74.0);
    let game = svc
        .games
        .create(game_input(host.player_id, court.court_id, days_from_today(5)))
        .await
        .unwrap();
    assert!(game.notes.is_some());

    let token = token_for(host.user_id);
    let changes = GameChanges {
        notes: Some(None),
        ..Default::default()
    };
    let updated = svc.games.update(game.game_id, Some(&token), changes).await.unwrap();

    assert_eq!(updated.notes, None);
    assert_eq!(updated.skill_level, game.skill_level);
}
