// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Named priority tiers and their mapping onto scheduler priority levels.

use core::fmt;

use crate::config::MAX_PRIORITIES;

/// Named priority tiers.
///
/// The tiers are spread over the scheduler's `N` priority levels. Six levels
/// give every tier its own ordinal; fewer levels collapse neighbouring tiers,
/// more levels leave ordinals without a name (build those with
/// [`TaskPriority::new`]).
///
/// | N:        | 1 | 2 | 3 | 4 | 5 | 6 | N>6 | Use                                       |
/// | --------: | - | - | - | - | - | - | :-: | :---------------------------------------- |
/// | `Idle`    | 0 | 0 | 0 | 0 | 0 | 0 |  0  | Non real-time work, tasks that never block |
/// | `Low`     | 0 | 1 | 1 | 1 | 1 | 1 |  1  | Non-critical operations                   |
/// | `Hmi`     | 0 | 1 | 1 | 1 | 1 | 2 |  2  | Normal user interface                     |
/// | `Mid`     | 0 | 1 | 1 | 2 | 2 | 3 | N/2 | Semi-critical, deadlines, little work     |
/// | `High`    | 0 | 1 | 2 | 3 | 3 | 4 | N-2 | Urgent, short deadlines, little work      |
/// | `Highest` | 0 | 1 | 2 | 3 | 4 | 5 | N-1 | Critical, must run now and be quick       |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PriorityTier {
    Idle,
    Low,
    Hmi,
    Mid,
    High,
    Highest,
}

impl PriorityTier {
    /// All tiers, lowest first.
    pub const ALL: [PriorityTier; 6] = [
        PriorityTier::Idle,
        PriorityTier::Low,
        PriorityTier::Hmi,
        PriorityTier::Mid,
        PriorityTier::High,
        PriorityTier::Highest,
    ];

    /// Returns the ordinal of this tier on a scale of `max_priorities` levels.
    ///
    /// `max_priorities` must be at least 1; `0` underflows.
    pub const fn ordinal_for(self, max_priorities: usize) -> usize {
        let n = max_priorities;
        let low = (n > 1) as usize;
        match self {
            PriorityTier::Idle => 0,
            PriorityTier::Low => low,
            PriorityTier::Hmi => low + (n > 5) as usize,
            PriorityTier::Mid => n / 2,
            PriorityTier::High => n - 1 - (n > 4) as usize,
            PriorityTier::Highest => n - 1,
        }
    }

    /// Returns the ordinal of this tier under the configured
    /// [`MAX_PRIORITIES`].
    pub const fn ordinal(self) -> usize {
        self.ordinal_for(MAX_PRIORITIES)
    }
}

/// Maps `tier` onto a scale of `max_priorities` levels.
///
/// Same as [`PriorityTier::ordinal_for`]. `max_priorities` must be at least 1.
pub const fn tier_to_ordinal(tier: PriorityTier, max_priorities: usize) -> usize {
    tier.ordinal_for(max_priorities)
}

/// Scheduler priority level.
///
/// Low numbers denote low priority tasks. Valid values are
/// `0..MAX_PRIORITIES`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskPriority(usize);

impl TaskPriority {
    /// [`PriorityTier::Idle`] on the configured scale.
    pub const IDLE: Self = Self(PriorityTier::Idle.ordinal());
    /// [`PriorityTier::Low`] on the configured scale.
    pub const LOW: Self = Self(PriorityTier::Low.ordinal());
    /// [`PriorityTier::Hmi`] on the configured scale.
    pub const HMI: Self = Self(PriorityTier::Hmi.ordinal());
    /// [`PriorityTier::Mid`] on the configured scale.
    pub const MID: Self = Self(PriorityTier::Mid.ordinal());
    /// [`PriorityTier::High`] on the configured scale.
    pub const HIGH: Self = Self(PriorityTier::High.ordinal());
    /// [`PriorityTier::Highest`] on the configured scale.
    pub const HIGHEST: Self = Self(PriorityTier::Highest.ordinal());

    /// Creates a priority from a raw level.
    ///
    /// Returns `None` if `priority` is not below [`MAX_PRIORITIES`].
    pub const fn new(priority: usize) -> Option<Self> {
        if priority >= MAX_PRIORITIES {
            return None;
        }
        Some(Self(priority))
    }

    /// Wraps a level reported by the scheduler without range checking.
    pub(crate) const fn from_raw(priority: usize) -> Self {
        Self(priority)
    }

    /// Returns the raw level passed to the scheduler.
    pub const fn get(self) -> usize {
        self.0
    }
}

impl From<PriorityTier> for TaskPriority {
    fn from(tier: PriorityTier) -> Self {
        Self(tier.ordinal())
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A raw priority level was not below [`MAX_PRIORITIES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct PriorityOverflow;

impl fmt::Display for PriorityOverflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "priority must be below {}", MAX_PRIORITIES)
    }
}

impl TryFrom<usize> for TaskPriority {
    type Error = PriorityOverflow;

    fn try_from(priority: usize) -> Result<Self, Self::Error> {
        Self::new(priority).ok_or(PriorityOverflow)
    }
}
