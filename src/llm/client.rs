//! Resilient wrapper around the generation backend.
//!
//! Every attempt carries an explicit timeout; no unbounded wait is ever
//! issued. Timeouts grow linearly per attempt (5s, 10s, 15s by default)
//! while the wait between attempts stays a fixed short delay.

use std::time::{Duration, Instant};

use reqwest::Client;

use super::types::{
    BackendHealth, BackendStatus, GenerateBody, GenerateOptions, GenerateReply, GenerationFailure,
    GenerationRequest, GenerationResponse,
};

/// Ceiling applied to `max_tokens` before sending, to bound latency.
const MAX_PREDICT_CEILING: u32 = 100;

/// Probe request parameters.
const HEALTH_PROMPT: &str = "Hello";
const HEALTH_NUM_PREDICT: u32 = 10;
const HEALTH_TIMEOUT: Duration = Duration::from_secs(10);

/// Retry schedule: attempt `i` (zero-based) runs under
/// `base_timeout + i * timeout_step`; a fixed `retry_delay` separates
/// attempts.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub base_timeout: Duration,
    pub timeout_step: Duration,
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_timeout: Duration::from_secs(5),
            timeout_step: Duration::from_secs(5),
            retry_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Timeout for the zero-based attempt index. Strictly increasing as
    /// long as `timeout_step` is non-zero.
    pub fn attempt_timeout(&self, attempt: usize) -> Duration {
        self.base_timeout + self.timeout_step * attempt as u32
    }
}

#[derive(Clone)]
pub struct GenerationClient {
    base_url: String,
    client: Client,
    policy: RetryPolicy,
}

impl GenerationClient {
    pub fn new(base_url: &str, policy: RetryPolicy) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
            policy,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Calls the backend, retrying up to the policy's attempt budget.
    ///
    /// A successful attempt short-circuits. Exhaustion returns `None`;
    /// callers are expected to hold a non-network fallback. No local state
    /// is mutated; the outbound call is the only side effect.
    pub async fn generate_with_retry(
        &self,
        request: &GenerationRequest,
    ) -> Option<GenerationResponse> {
        let max_tokens = request.max_tokens.min(MAX_PREDICT_CEILING);

        for attempt in 0..self.policy.max_attempts {
            let timeout = self.policy.attempt_timeout(attempt);
            tracing::debug!(
                attempt = attempt + 1,
                max_attempts = self.policy.max_attempts,
                timeout_secs = timeout.as_secs_f64(),
                "Generation attempt"
            );

            match self.attempt(request, max_tokens, timeout).await {
                Ok(response) => return Some(response),
                Err(failure) => {
                    tracing::warn!(
                        attempt = attempt + 1,
                        max_attempts = self.policy.max_attempts,
                        "Generation attempt failed: {failure}"
                    );
                    if attempt + 1 < self.policy.max_attempts {
                        tokio::time::sleep(self.policy.retry_delay).await;
                    }
                }
            }
        }

        tracing::warn!(
            attempts = self.policy.max_attempts,
            "All generation attempts failed"
        );
        None
    }

    async fn attempt(
        &self,
        request: &GenerationRequest,
        max_tokens: u32,
        timeout: Duration,
    ) -> Result<GenerationResponse, GenerationFailure> {
        let body = GenerateBody {
            model: &request.model,
            prompt: &request.prompt,
            stream: false,
            options: GenerateOptions {
                temperature: request.temperature,
                num_predict: max_tokens,
            },
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .timeout(timeout)
            .json(&body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerationFailure::BadStatus(status.as_u16()));
        }

        let reply: GenerateReply = response
            .json()
            .await
            .map_err(classify_transport_error)?;

        Ok(GenerationResponse {
            text: reply.response,
            tokens_used: reply.eval_count,
        })
    }

    /// Single low-token probe with a short timeout, classifying timeout,
    /// connection failure, bad status and success distinctly.
    pub async fn health_check(&self, model: &str) -> BackendHealth {
        let body = GenerateBody {
            model,
            prompt: HEALTH_PROMPT,
            stream: false,
            options: GenerateOptions {
                temperature: 0.0,
                num_predict: HEALTH_NUM_PREDICT,
            },
        };

        let started = Instant::now();
        let result = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .timeout(HEALTH_TIMEOUT)
            .json(&body)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => BackendHealth {
                status: BackendStatus::Healthy,
                response_time: Some(started.elapsed().as_secs_f64()),
                message: "Generation backend is responding normally".to_string(),
            },
            Ok(response) => BackendHealth {
                status: BackendStatus::Error,
                response_time: None,
                message: format!(
                    "Generation backend returned status {}",
                    response.status().as_u16()
                ),
            },
            Err(err) if err.is_timeout() => BackendHealth {
                status: BackendStatus::Timeout,
                response_time: None,
                message: format!(
                    "Generation backend is taking too long to respond (timeout after {}s)",
                    HEALTH_TIMEOUT.as_secs()
                ),
            },
            Err(_) => BackendHealth {
                status: BackendStatus::ConnectionError,
                response_time: None,
                message: "Cannot connect to generation backend".to_string(),
            },
        }
    }
}

fn classify_transport_error(err: reqwest::Error) -> GenerationFailure {
    if err.is_timeout() {
        GenerationFailure::Timeout
    } else {
        GenerationFailure::Connection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attempt_timeouts_increase_linearly() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempt_timeout(0), Duration::from_secs(5));
        assert_eq!(policy.attempt_timeout(1), Duration::from_secs(10));
        assert_eq!(policy.attempt_timeout(2), Duration::from_secs(15));

        let timeouts: Vec<Duration> = (0..policy.max_attempts)
            .map(|i| policy.attempt_timeout(i))
            .collect();
        assert!(timeouts.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn retry_exhaustion_returns_none_after_max_attempts() {
        // Nothing listens on this port; every attempt fails with a
        // connection error and the wrapper must exhaust its budget.
        let client = GenerationClient::new(
            "http://127.0.0.1:9",
            RetryPolicy {
                max_attempts: 3,
                base_timeout: Duration::from_millis(200),
                timeout_step: Duration::from_millis(100),
                retry_delay: Duration::from_millis(1),
            },
        );
        let request = GenerationRequest {
            model: "test".to_string(),
            prompt: "hello".to_string(),
            temperature: 0.7,
            max_tokens: 500,
        };

        assert!(client.generate_with_retry(&request).await.is_none());
    }

    #[tokio::test]
    async fn health_check_reports_connection_failure_distinctly() {
        let client = GenerationClient::new("http://127.0.0.1:9", RetryPolicy::default());
        let health = client.health_check("test").await;
        assert_eq!(health.status, BackendStatus::ConnectionError);
        assert!(health.response_time.is_none());
    }
}
