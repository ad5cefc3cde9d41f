//! Bounded status polling.

use std::future::Future;

use tokio::time::{Instant, sleep, timeout_at};
use tracing::debug;

use crate::{
    purchases::{config::PollSettings, errors::PurchasesServiceError},
    twotap::{TwoTapError, models::StatusMessage},
};

/// Re-fetch `initial` until it stops reporting `still_processing`.
///
/// The delay between checks starts at `settings.interval` and doubles up to
/// `settings.max_interval`. Polling stops at `deadline`, which callers share
/// across every step of one purchase.
pub(crate) async fn poll_until_settled<T, F, Fut>(
    settings: &PollSettings,
    deadline: Instant,
    what: &'static str,
    id: &str,
    initial: T,
    mut fetch: F,
) -> Result<T, PurchasesServiceError>
where
    T: StatusMessage,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, TwoTapError>>,
{
    let poll = async {
        let mut status = initial;
        let mut delay = settings.interval;
        let mut attempt = 0_u32;

        while status.is_still_processing() {
            sleep(delay).await;

            attempt += 1;
            delay = delay.saturating_mul(2).min(settings.max_interval);

            debug!(what, id, attempt, "polling status");

            status = fetch().await?;
        }

        Ok::<T, PurchasesServiceError>(status)
    };

    timeout_at(deadline, poll)
        .await
        .map_err(|_elapsed| PurchasesServiceError::TimedOut {
            what,
            id: id.to_owned(),
        })?
}
