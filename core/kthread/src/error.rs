// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Error types for task operations.

use core::fmt;

/// Errors surfaced by the task wrappers.
///
/// The wrappers never retry a scheduler call; an error reports exactly what
/// the scheduler signalled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TaskError {
    /// The scheduler did not hand back a thread (typically out of memory).
    CreateFailed { name: &'static str },
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateFailed { name } => {
                write!(f, "Scheduler failed to create task \"{}\"", name)
            }
        }
    }
}

impl core::error::Error for TaskError {}

/// Result type for task operations.
pub type Result<T> = core::result::Result<T, TaskError>;
