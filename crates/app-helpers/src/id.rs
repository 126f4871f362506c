use std::{
    sync::atomic::{AtomicU64, Ordering},
    time,
};

static LAST_TOKEN: AtomicU64 = AtomicU64::new(0);

fn now_ms() -> u64 {
    let ms = time::SystemTime::now()
        .duration_since(time::UNIX_EPOCH)
        .map(|x| x.as_millis())
        .unwrap_or_default();

    u64::try_from(ms).unwrap_or(u64::MAX)
}

/// Millisecond timestamp that never repeats and never goes backwards within the process.
///
/// Two calls in the same millisecond (or after the clock jumped back)
/// get the previous token plus one.
#[must_use]
pub fn time_token() -> u64 {
    let now = now_ms();

    let prev = LAST_TOKEN
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(now.max(last.saturating_add(1)))
        })
        .unwrap_or_else(|last| last);

    now.max(prev.saturating_add(1))
}
