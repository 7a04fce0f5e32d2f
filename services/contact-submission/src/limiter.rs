// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Fixed window rate limiter for contact submissions.
//!
//! Each client identifier gets a window that opens with its first accepted
//! submission. Up to `max_submissions` are accepted inside the window; the
//! next submission after the window closes starts a fresh one.
//!
//! Entries are never removed, only overwritten once stale. The map lives
//! for the process lifetime and is not shared between instances.

use crate::clock::{Clock, SystemClock};
use crate::config::RateLimitConfig;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

/// Result of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitResult {
    /// Submission accepted and counted
    Allowed {
        /// Submissions left in the current window
        remaining: u32,
        /// Time until the window closes
        reset_in: Duration,
    },
    /// Submission refused; nothing was counted
    Limited {
        /// Time until the window closes
        retry_after: Duration,
    },
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

/// Per-identifier window state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitEntry {
    pub count: u32,
    pub window_expires_at: Instant,
}

/// Store that counts submissions per client identifier.
///
/// Checking and counting happen as one step so concurrent submissions
/// cannot both slip under the limit.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    async fn check_and_increment(&self, client_id: &str) -> RateLimitResult;
}

/// In-memory fixed window limiter.
pub struct FixedWindowLimiter<C: Clock = SystemClock> {
    config: RateLimitConfig,
    clock: C,
    entries: Arc<RwLock<HashMap<String, RateLimitEntry>>>,
}

impl FixedWindowLimiter<SystemClock> {
    /// Create a limiter on the system clock.
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> FixedWindowLimiter<C> {
    /// Create a limiter on an explicit clock.
    pub fn with_clock(config: RateLimitConfig, clock: C) -> Self {
        Self {
            config,
            clock,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Snapshot of the entry for `client_id`, stale or not.
    pub async fn entry(&self, client_id: &str) -> Option<RateLimitEntry> {
        self.entries.read().await.get(client_id).copied()
    }

    /// Number of identifiers seen since startup.
    pub async fn tracked_clients(&self) -> usize {
        self.entries.read().await.len()
    }

    fn open_window(&self, now: Instant) -> RateLimitEntry {
        RateLimitEntry {
            count: 1,
            window_expires_at: now + self.config.window_duration(),
        }
    }
}

#[async_trait]
impl<C: Clock> RateLimitStore for FixedWindowLimiter<C> {
    async fn check_and_increment(&self, client_id: &str) -> RateLimitResult {
        let now = self.clock.now();
        let max = self.config.max_submissions;
        if max == 0 {
            return RateLimitResult::Limited {
                retry_after: self.config.window_duration(),
            };
        }

        // Held for the whole check so the increment cannot race.
        let mut entries = self.entries.write().await;

        match entries.get_mut(client_id) {
            Some(entry) if now < entry.window_expires_at => {
                let reset_in = entry.window_expires_at - now;
                if entry.count >= max {
                    debug!(client_id, count = entry.count, ?reset_in, "Rate limit exceeded");
                    return RateLimitResult::Limited {
                        retry_after: reset_in,
                    };
                }

                entry.count += 1;
                RateLimitResult::Allowed {
                    remaining: max.saturating_sub(entry.count),
                    reset_in,
                }
            }
            _ => {
                let fresh = self.open_window(now);
                entries.insert(client_id.to_string(), fresh);
                debug!(client_id, "Opened rate limit window");
                RateLimitResult::Allowed {
                    remaining: max.saturating_sub(1),
                    reset_in: fresh.window_expires_at - now,
                }
            }
        }
    }
}
