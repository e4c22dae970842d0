//! Prometheus metrics exposed at `/metrics`: per-request HTTP metrics from
//! the middleware plus a counter of domain events.

use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use once_cell::sync::Lazy;
use prometheus::{IntCounterVec, Opts};

const NAMESPACE: &str = "courtside";

/// Something a player did that changed game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainEvent {
    GameCreated,
    GameUpdated,
    GameDeleted,
    RsvpCast,
}

impl DomainEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            DomainEvent::GameCreated => "game_created",
            DomainEvent::GameUpdated => "game_updated",
            DomainEvent::GameDeleted => "game_deleted",
            DomainEvent::RsvpCast => "rsvp_cast",
        }
    }
}

/// `courtside_domain_events_total{event="..."}`
pub static DOMAIN_EVENTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("domain_events_total", "Games created/updated/deleted and RSVPs cast")
            .namespace(NAMESPACE),
        &["event"],
    )
    .expect("domain event counter")
});

/// Global Prometheus middleware handle; its registry also carries
/// [`DOMAIN_EVENTS`].
pub static METRICS: Lazy<PrometheusMetrics> = Lazy::new(|| {
    let metrics = PrometheusMetricsBuilder::new(NAMESPACE)
        .endpoint("/metrics")
        .build()
        .expect("metrics builder");
    metrics
        .registry
        .register(Box::new(DOMAIN_EVENTS.clone()))
        .expect("register domain event counter");
    metrics
});

pub fn record(event: DomainEvent) {
    DOMAIN_EVENTS.with_label_values(&[event.as_str()]).inc();
}

/// Current value of the counter for `event`.
pub fn recorded(event: DomainEvent) -> u64 {
    DOMAIN_EVENTS.with_label_values(&[event.as_str()]).get()
}
