use tracing::{info, warn};

use crate::config;

/// Invoke the companion compute function by name, fire and forget. The
/// event-style invocation returns as soon as the call is queued; transport
/// errors and non-2xx responses are logged and swallowed.
pub async fn invoke(client: &reqwest::Client, function: &str) {
    let url = format!(
        "{}/2015-03-31/functions/{}/invocations",
        config::lambda_endpoint(),
        function
    );

    match client
        .post(&url)
        .header("X-Amz-Invocation-Type", "Event")
        .body("{}")
        .send()
        .await
    {
        Ok(resp) if resp.status().is_success() => {
            info!("Triggered {} ({})", function, resp.status());
        }
        Ok(resp) => warn!("Trigger for {} returned {}", function, resp.status()),
        Err(e) => warn!("Trigger for {} failed: {}", function, e),
    }
}
