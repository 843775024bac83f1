use axum::extract::{ ConnectInfo, Request, State };
use axum::middleware::Next;
use axum::response::{ IntoResponse, Response };
use log::warn;
use std::collections::HashMap;
use std::net::{ IpAddr, Ipv4Addr, SocketAddr };
use std::sync::{ Arc, Mutex };
use std::time::{ Duration, Instant };

use super::error::ApiError;

struct Window {
    started: Instant,
    count: u32,
}

struct Table {
    windows: HashMap<IpAddr, Window>,
    last_sweep: Instant,
}

/// Fixed-window request counter keyed by client IP. Expired entries are
/// swept at most once per window.
pub struct RateLimiter {
    table: Mutex<Table>,
    window: Duration,
    max_requests: u32,
    trust_forwarded_for: bool,
}

impl RateLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            table: Mutex::new(Table {
                windows: HashMap::new(),
                last_sweep: Instant::now(),
            }),
            window,
            max_requests,
            trust_forwarded_for: false,
        }
    }

    pub fn trust_forwarded_for(mut self, trust: bool) -> Self {
        self.trust_forwarded_for = trust;
        self
    }

    pub fn check(&self, ip: IpAddr) -> Result<(), Duration> {
        self.check_at(ip, Instant::now())
    }

    /// Counts one request from `ip` at `now`. On rejection returns the time
    /// left until the window resets.
    pub fn check_at(&self, ip: IpAddr, now: Instant) -> Result<(), Duration> {
        let mut table = self.table.lock().unwrap_or_else(|e| e.into_inner());

        let window = self.window;
        if now.saturating_duration_since(table.last_sweep) >= window {
            table.windows.retain(|_, w| now.saturating_duration_since(w.started) < window);
            table.last_sweep = now;
        }

        let entry = table.windows.entry(ip).or_insert(Window { started: now, count: 0 });
        if now.saturating_duration_since(entry.started) >= self.window {
            entry.started = now;
            entry.count = 0;
        }

        if entry.count >= self.max_requests {
            return Err(self.window.saturating_sub(now.saturating_duration_since(entry.started)));
        }
        entry.count += 1;
        Ok(())
    }

    #[cfg(test)]
    fn tracked_clients(&self) -> usize {
        self.table.lock().unwrap_or_else(|e| e.into_inner()).windows.len()
    }

    fn client_ip(&self, req: &Request) -> IpAddr {
        if self.trust_forwarded_for {
            let forwarded = req.headers()
                .get("x-forwarded-for")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .and_then(|v| v.trim().parse::<IpAddr>().ok());
            if let Some(ip) = forwarded {
                return ip;
            }
        }

        req.extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
    }
}

pub async fn limit(
    State(limiter): State<Arc<RateLimiter>>,
    req: Request,
    next: Next,
) -> Response {
    let ip = limiter.client_ip(&req);
    if let Err(retry_after) = limiter.check(ip) {
        warn!("Rate limit exceeded for {} on {}", ip, req.uri().path());
        return ApiError::RateLimited {
            retry_after: retry_after.as_secs().max(1),
        }.into_response();
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http;

    fn ip(last: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(10, 0, 0, last))
    }

    #[test]
    fn rejects_request_past_ceiling() {
        let limiter = RateLimiter::new(Duration::from_secs(900), 3);
        let now = Instant::now();
        for _ in 0..3 {
            assert!(limiter.check_at(ip(1), now).is_ok());
        }
        let retry = limiter.check_at(ip(1), now + Duration::from_secs(100)).unwrap_err();
        assert_eq!(retry, Duration::from_secs(800));
    }

    #[test]
    fn clients_are_counted_separately() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 1);
        let now = Instant::now();
        assert!(limiter.check_at(ip(1), now).is_ok());
        assert!(limiter.check_at(ip(2), now).is_ok());
        assert!(limiter.check_at(ip(1), now).is_err());
    }

    #[test]
    fn window_resets_after_expiry() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 1);
        let now = Instant::now();
        assert!(limiter.check_at(ip(1), now).is_ok());
        assert!(limiter.check_at(ip(1), now + Duration::from_secs(59)).is_err());
        assert!(limiter.check_at(ip(1), now + Duration::from_secs(60)).is_ok());
    }

    #[test]
    fn expired_clients_are_swept_once_per_window() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 5);
        let start = Instant::now();
        for last in 1..=50 {
            assert!(limiter.check_at(ip(last), start).is_ok());
        }
        assert_eq!(limiter.tracked_clients(), 50);

        let later = start + Duration::from_secs(61);
        assert!(limiter.check_at(ip(200), later).is_ok());
        assert_eq!(limiter.tracked_clients(), 1);

        // No second sweep until another full window has passed.
        assert!(limiter.check_at(ip(201), later + Duration::from_secs(1)).is_ok());
        assert_eq!(limiter.tracked_clients(), 2);
    }

    #[test]
    fn forwarded_for_only_when_trusted() {
        let req = http::Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(Body::empty())
            .unwrap();

        let plain = RateLimiter::new(Duration::from_secs(60), 1);
        assert_eq!(plain.client_ip(&req), IpAddr::V4(Ipv4Addr::UNSPECIFIED));

        let trusting = RateLimiter::new(Duration::from_secs(60), 1).trust_forwarded_for(true);
        assert_eq!(trusting.client_ip(&req), "203.0.113.7".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn socket_address_is_used_by_default() {
        let mut req = http::Request::builder().body(Body::empty()).unwrap();
        req.extensions_mut().insert(ConnectInfo(SocketAddr::from(([192, 168, 1, 9], 5555))));
        let limiter = RateLimiter::new(Duration::from_secs(60), 1);
        assert_eq!(limiter.client_ip(&req), ip_of([192, 168, 1, 9]));
    }

    fn ip_of(octets: [u8; 4]) -> IpAddr {
        IpAddr::from(octets)
    }
}
