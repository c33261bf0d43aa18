use std::time::Duration;

use crate::services::auth::{rate_limit_key, InMemoryRateLimiter, RateLimitDecision, RateLimiter};

#[test]
fn test_rate_limit_key() {
    assert_eq!(rate_limit_key("10.0.0.1"), "rate_limit:10.0.0.1");
}

#[test]
fn test_decision_remaining() {
    let decision = RateLimitDecision::new(3, 5, Duration::from_secs(10));
    assert!(decision.allowed);
    assert_eq!(decision.remaining(), 2);

    let decision = RateLimitDecision::new(6, 5, Duration::from_secs(10));
    assert!(!decision.allowed);
    assert_eq!(decision.remaining(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_allows_limit_then_rejects() {
    let limiter = InMemoryRateLimiter::new(3, Duration::from_secs(60));

    for expected in 1..=3 {
        let decision = limiter.hit("10.0.0.1").await.unwrap();
        assert!(decision.allowed);
        assert_eq!(decision.count, expected);
    }

    let decision = limiter.hit("10.0.0.1").await.unwrap();
    assert!(!decision.allowed);
    assert_eq!(decision.count, 4);

    let other = limiter.hit("10.0.0.2").await.unwrap();
    assert!(other.allowed);
}

#[tokio::test(start_paused = true)]
async fn test_window_is_fixed_not_sliding() {
    let limiter = InMemoryRateLimiter::new(2, Duration::from_secs(60));

    limiter.hit("client").await.unwrap();
    tokio::time::advance(Duration::from_secs(40)).await;

    let decision = limiter.hit("client").await.unwrap();
    assert_eq!(decision.reset_after, Duration::from_secs(20));

    tokio::time::advance(Duration::from_secs(21)).await;
    let decision = limiter.hit("client").await.unwrap();
    assert!(decision.allowed);
    assert_eq!(decision.count, 1);
    assert_eq!(decision.reset_after, Duration::from_secs(60));
}
