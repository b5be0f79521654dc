// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Lightweight task wrappers over a platform-provided preemptive scheduler.
//!
//! The crate gives a unit of concurrent execution two shapes:
//!
//! - [`Task`]: owns exactly one scheduler thread created from a plain entry
//!   function, a [`TaskPriority`], a stack depth and an opaque parameter.
//! - [`ObjectTask`]: owns an object implementing [`Runnable`]; a fixed
//!   trampoline turns [`Runnable::run`] into the thread entry point.
//!
//! Priorities are named by [`PriorityTier`], an abstract scale re-normalized
//! onto whatever number of levels the scheduler is configured with
//! ([`config::MAX_PRIORITIES`]).
//!
//! The scheduler itself is external. The platform provides it by implementing
//! [`SchedulerIf`]:
//!
//! ```rust,ignore
//! use core::{ffi::c_void, ptr::NonNull};
//! use kthread::{RawTaskHandle, SchedulerIf, TaskFn};
//!
//! struct SchedulerImpl;
//!
//! #[crate_interface::impl_interface]
//! impl SchedulerIf for SchedulerImpl {
//!     fn create(
//!         entry: TaskFn,
//!         name: &str,
//!         stack_depth: u16,
//!         param: *mut c_void,
//!         priority: usize,
//!     ) -> Option<RawTaskHandle> {
//!         // xTaskCreate(...)
//!     }
//!     // ...
//! }
//! ```
//!
//! # Cargo Features
//!
//! Each feature mirrors a scheduler capability switch. A disabled feature
//! removes the corresponding methods from the compiled surface.
//!
//! - `task-delete`: tasks are deleted when their wrapper is dropped, and an
//!   object task whose body returns deletes itself. Without it the thread
//!   outlives the wrapper.
//! - `task-priority-get`: [`Task::priority`].
//! - `task-priority-set`: [`Task::set_priority`].
//! - `task-suspend`: [`Task::suspend`] and [`Task::resume`].
//! - `task-resume-from-isr`: [`Task::resume_from_isr`]. Implies `task-suspend`.
//!
//! All features are enabled by default. The tests covering a scheduler without
//! deletion support run with `cargo test -p kthread --no-default-features`.

#![cfg_attr(not(test), no_std)]

#[macro_use]
extern crate log;

extern crate alloc;


pub mod config;
mod error;
mod object;
mod priority;
mod sched;
mod task;

pub use self::{
    error::{Result, TaskError},
    object::{BodyState, ObjectTask, Runnable},
    priority::{PriorityOverflow, PriorityTier, TaskPriority, tier_to_ordinal},
    sched::{RawTaskHandle, SchedulerIf, TaskFn},
    task::Task,
};
