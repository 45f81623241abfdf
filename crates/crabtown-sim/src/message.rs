//! Ephemeral message lifecycle: submit, live view, and the prune pass.
//!
//! The [`MessageBoard`] owns the ordered collection of floating messages.
//! Entries are immutable after creation; everything the renderer needs
//! beyond the record itself (opacity, float offset) is derived from
//! `(record, now)` at read time, so stale cached values cannot exist.
//!
//! Reads and removal are deliberately separate operations: the live view
//! runs every rendered frame, the prune pass runs on the 1-second
//! maintenance cadence. The prune pass builds the surviving collection
//! and swaps it in whole, so a snapshot taken around a prune never
//! observes a half-filtered list.

use chrono::Utc;
use rand::Rng;
use tracing::debug;

use crabtown_types::{AirPoint, LiveMessage, Message, MessageId};

/// Tunable parameters of the message lifecycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MessageParams {
    /// Seconds after which a message is eligible for removal.
    pub ttl_secs: f64,
    /// Maximum stored text length in characters; longer input is truncated.
    pub max_text_chars: usize,
    /// Half-extent of the horizontal square messages spawn in. Narrower
    /// than the roaming square so bubbles hang over the town center.
    pub spawn_half_extent: f32,
    /// Lower bound (inclusive) of the spawn height range.
    pub min_height: f32,
    /// Upper bound (exclusive) of the spawn height range.
    pub max_height: f32,
}

impl Default for MessageParams {
    fn default() -> Self {
        Self {
            ttl_secs: 15.0,
            max_text_chars: 100,
            spawn_half_extent: 6.0,
            min_height: 3.0,
            max_height: 5.0,
        }
    }
}

/// Owns the ordered collection of ephemeral messages.
///
/// Insertion order is the canonical display order and survives pruning.
#[derive(Debug, Clone)]
pub struct MessageBoard {
    /// Lifecycle parameters.
    params: MessageParams,
    /// Live entries, oldest first.
    entries: Vec<Message>,
}

impl MessageBoard {
    /// Create an empty board with the given parameters.
    pub const fn new(params: MessageParams) -> Self {
        Self {
            params,
            entries: Vec::new(),
        }
    }

    /// Submit a message at session time `now`.
    ///
    /// The text is trimmed; an empty or whitespace-only submission is a
    /// silent no-op (a user-experience guard, not an error) and returns
    /// `None`. Text longer than the configured maximum keeps only its
    /// first `max_text_chars` characters. The entry is appended at the
    /// end of the collection with a random spawn position in the air
    /// above the town.
    pub fn submit(
        &mut self,
        raw_text: &str,
        author: &str,
        now: f64,
        rng: &mut impl Rng,
    ) -> Option<MessageId> {
        let trimmed = raw_text.trim();
        if trimmed.is_empty() {
            return None;
        }

        let text: String = trimmed.chars().take(self.params.max_text_chars).collect();

        let h = self.params.spawn_half_extent;
        let position = AirPoint {
            x: rng.random_range(-h..h),
            y: rng.random_range(self.params.min_height..self.params.max_height),
            z: rng.random_range(-h..h),
        };

        let id = MessageId::new();
        debug!(message_id = %id, author = %author, chars = text.chars().count(), "Message submitted");

        self.entries.push(Message {
            id,
            text,
            author: author.to_owned(),
            created_secs: now,
            created_at: Utc::now(),
            position,
        });

        Some(id)
    }

    /// Remove every entry whose age meets or exceeds the TTL.
    ///
    /// Survivors keep their relative order. Calling repeatedly with
    /// non-decreasing `now` is safe and removes only the expired set.
    /// The surviving entries are collected into a fresh vector and
    /// swapped in whole. Returns the number of entries removed.
    pub fn prune(&mut self, now: f64) -> usize {
        let ttl = self.params.ttl_secs;
        let kept: Vec<Message> = self
            .entries
            .iter()
            .filter(|m| now - m.created_secs < ttl)
            .cloned()
            .collect();

        let removed = self.entries.len().saturating_sub(kept.len());
        if removed > 0 {
            debug!(removed, remaining = kept.len(), "Pruned expired messages");
        }
        self.entries = kept;
        removed
    }

    /// Produce the live view for session time `now`.
    ///
    /// Returns every still-live entry with its derived display
    /// attributes. Entries already past the TTL (prune has not caught
    /// them yet) are excluded so the renderer never sees opacity 0.
    /// Never mutates the store.
    pub fn live_view(&self, now: f64) -> Vec<LiveMessage> {
        self.entries
            .iter()
            .filter_map(|m| {
                let age = now - m.created_secs;
                let opacity = opacity_for_age(age, self.params.ttl_secs);
                if opacity <= 0.0 {
                    return None;
                }
                Some(LiveMessage {
                    id: m.id,
                    text: m.text.clone(),
                    author: m.author.clone(),
                    position: m.position,
                    age_secs: age,
                    opacity,
                    float_offset: float_offset(now, m.created_secs),
                })
            })
            .collect()
    }

    /// Number of stored entries, including any not yet pruned.
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the board holds no entries.
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The stored entries in insertion order.
    pub fn entries(&self) -> &[Message] {
        &self.entries
    }
}

/// Opacity as a function of age: `clamp(1 - age / ttl, 0, 1)`.
///
/// Non-increasing in age, exactly 0 at `age == ttl`.
fn opacity_for_age(age: f64, ttl: f64) -> f64 {
    (1.0 - age / ttl).clamp(0.0, 1.0)
}

/// Vertical display offset: a bounded oscillation seeded by the creation
/// time plus a slow upward drift proportional to age.
fn float_offset(now: f64, created_secs: f64) -> f64 {
    let age = now - created_secs;
    (now + created_secs).sin() * 0.1 + age * 0.05
}
