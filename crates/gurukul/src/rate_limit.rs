//! Blanket per-IP rate limiting for the API surface.
//!
//! Fixed-window counting with LRU-bounded state so a scan of many
//! source addresses cannot grow memory without bound.

use std::net::{IpAddr, SocketAddr};
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use lru::LruCache;

use crate::handlers::error_body;
use crate::state::AppState;

/// Maximum number of per-IP windows kept before LRU eviction.
const MAX_TRACKED_IPS: usize = 10_000;

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: Instant,
    count: u32,
}

/// Fixed-window request counter keyed by client IP.
#[derive(Clone)]
pub struct RateLimiter {
    windows: Arc<Mutex<LruCache<IpAddr, Window>>>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        let capacity = NonZeroUsize::new(MAX_TRACKED_IPS).expect("capacity must be > 0");
        Self {
            windows: Arc::new(Mutex::new(LruCache::new(capacity))),
            max_requests,
            window,
        }
    }

    /// Records one request from `ip`. Returns false when the window's
    /// budget is already spent.
    pub fn try_acquire(&self, ip: IpAddr) -> bool {
        let mut windows = self.windows.lock().expect("rate limiter lock poisoned");
        let now = Instant::now();

        if let Some(window) = windows.get_mut(&ip) {
            if now.duration_since(window.started_at) < self.window {
                if window.count >= self.max_requests {
                    return false;
                }
                window.count += 1;
                return true;
            }
        }

        // First request, or the previous window has elapsed.
        windows.put(
            ip,
            Window {
                started_at: now,
                count: 1,
            },
        );
        true
    }
}

/// Axum middleware applying the limiter to every `/api` request.
///
/// The client address comes from the connection extension; requests
/// without one (e.g. in-process test calls) are not limited.
pub async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    if let Some(ip) = ip {
        if !state.rate_limiter.try_acquire(ip) {
            tracing::warn!(%ip, "Rate limit exceeded");
            return (
                StatusCode::TOO_MANY_REQUESTS,
                error_body("Too many requests from this IP, please try again later"),
            )
                .into_response();
        }
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(last: u8) -> IpAddr {
        IpAddr::from([127, 0, 0, last])
    }

    #[test]
    fn test_allows_up_to_max_requests() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));

        assert!(limiter.try_acquire(ip(1)));
        assert!(limiter.try_acquire(ip(1)));
        assert!(limiter.try_acquire(ip(1)));
        assert!(!limiter.try_acquire(ip(1)));
    }

    #[test]
    fn test_limits_are_per_ip() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));

        assert!(limiter.try_acquire(ip(1)));
        assert!(!limiter.try_acquire(ip(1)));
        assert!(limiter.try_acquire(ip(2)));
    }

    #[test]
    fn test_window_resets() {
        let limiter = RateLimiter::new(1, Duration::from_millis(20));

        assert!(limiter.try_acquire(ip(1)));
        assert!(!limiter.try_acquire(ip(1)));

        std::thread::sleep(Duration::from_millis(30));
        assert!(limiter.try_acquire(ip(1)));
    }
}
