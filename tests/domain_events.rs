mod common;

use common::{days_from_today, game_input, player, setup, token_for};
use courtside_server::db::models::GameChanges;
use courtside_server::metrics::{recorded, DomainEvent, METRICS};

// Single test in this binary: the counters are process-global.
#[tokio::test]
async fn game_and_rsvp_mutations_are_counted() {
    let (store, svc) = setup();
    let host = player(&store, "Host");
    let guest = player(&store, "Guest");
    let court = store.add_court("Court", 40.0, -74.0);
    let token = token_for(host.user_id);

    let game = svc
        .games
        .create(game_input(host.player_id, court.court_id, days_from_today(2)))
        .await
        .unwrap();
    svc.rsvps.upsert(guest.player_id, game.game_id, "maybe").await.unwrap();
    svc.rsvps.upsert(guest.player_id, game.game_id, "confirmed").await.unwrap();
    svc.games
        .update(
            game.game_id,
            Some(&token),
            GameChanges {
                players_needed: Some(4),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    // Rejected mutations are not events.
    let intruder = token_for(guest.user_id);
    assert!(svc.games.delete(game.game_id, Some(&intruder)).await.is_err());
    assert!(svc.rsvps.upsert(guest.player_id, game.game_id, "later").await.is_err());

    svc.games.delete(game.game_id, Some(&token)).await.unwrap();

    assert_eq!(recorded(DomainEvent::GameCreated), 1);
    assert_eq!(recorded(DomainEvent::RsvpCast), 2);
    assert_eq!(recorded(DomainEvent::GameUpdated), 1);
    assert_eq!(recorded(DomainEvent::GameDeleted), 1);

    let exported = METRICS
        .registry
        .gather()
        .into_iter()
        .find(|f| f.get_name() == "courtside_domain_events_total")
        .expect("registered on the /metrics registry");
    assert_eq!(exported.get_metric().len(), 4);
}
