use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("tarmac.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("tarmac.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("tarmac.client.request_duration_seconds");

pub(crate) static CHAT_SUBMISSIONS: Counter = Counter::new("tarmac.chat.submissions");
pub(crate) static CHAT_IGNORED: Counter = Counter::new("tarmac.chat.ignored");
pub(crate) static CHAT_BUSY: Counter = Counter::new("tarmac.chat.busy");
pub(crate) static CHAT_ANSWERED: Counter = Counter::new("tarmac.chat.answered");
pub(crate) static CHAT_FAILED: Counter = Counter::new("tarmac.chat.failed");
pub(crate) static CHAT_EXCHANGE_DURATION: Moments =
    Moments::new("tarmac.chat.exchange_duration_seconds");

pub(crate) static TRANSCRIPT_APPENDS: Counter = Counter::new("tarmac.transcript.appends");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&CHAT_SUBMISSIONS);
    collector.register_counter(&CHAT_IGNORED);
    collector.register_counter(&CHAT_BUSY);
    collector.register_counter(&CHAT_ANSWERED);
    collector.register_counter(&CHAT_FAILED);
    collector.register_moments(&CHAT_EXCHANGE_DURATION);

    collector.register_counter(&TRANSCRIPT_APPENDS);
}
