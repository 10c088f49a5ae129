use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("geminibar.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("geminibar.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("geminibar.client.request_duration_seconds");

pub(crate) static SESSION_ASKS: Counter = Counter::new("geminibar.session.asks");
pub(crate) static SESSION_ASK_FAILURES: Counter = Counter::new("geminibar.session.ask_failures");
pub(crate) static SESSION_NOT_CONFIGURED: Counter =
    Counter::new("geminibar.session.not_configured");
pub(crate) static SESSION_HANDLES_CREATED: Counter =
    Counter::new("geminibar.session.handles_created");

pub(crate) static CREDENTIAL_SAVES: Counter = Counter::new("geminibar.credential.saves");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&SESSION_ASKS);
    collector.register_counter(&SESSION_ASK_FAILURES);
    collector.register_counter(&SESSION_NOT_CONFIGURED);
    collector.register_counter(&SESSION_HANDLES_CREATED);

    collector.register_counter(&CREDENTIAL_SAVES);
}
