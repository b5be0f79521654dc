// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! The scheduler primitives consumed by this crate.

use core::{ffi::c_void, ptr::NonNull};

/// Opaque handle of a scheduler thread.
pub type RawTaskHandle = NonNull<c_void>;

/// Thread entry point, called by the scheduler with the creation parameter.
pub type TaskFn = extern "C" fn(*mut c_void);

/// Scheduler primitives, implemented by the platform.
///
/// Every function taking an `Option<RawTaskHandle>` treats `None` as the
/// calling task. Only [`resume_from_isr`](SchedulerIf::resume_from_isr) may be
/// called from interrupt context.
#[crate_interface::def_interface]
pub trait SchedulerIf {
    /// Creates a thread running `entry(param)` at `priority`.
    ///
    /// Returns `None` if the scheduler could not create the thread.
    fn create(
        entry: TaskFn,
        name: &str,
        stack_depth: u16,
        param: *mut c_void,
        priority: usize,
    ) -> Option<RawTaskHandle>;

    /// Deletes a thread. Deleting the calling task does not return.
    fn delete(task: Option<RawTaskHandle>);

    /// Returns the current priority of a thread.
    fn priority_get(task: Option<RawTaskHandle>) -> usize;

    /// Changes the priority of a thread.
    fn priority_set(task: Option<RawTaskHandle>, priority: usize);

    /// Suspends a thread until it is resumed.
    fn suspend(task: Option<RawTaskHandle>);

    /// Resumes a suspended thread.
    fn resume(task: Option<RawTaskHandle>);

    /// Resumes a suspended thread from an interrupt handler.
    ///
    /// Returns `true` if the handler should request a context switch.
    fn resume_from_isr(task: Option<RawTaskHandle>) -> bool;

    /// Blocks the calling task for `ticks` scheduler ticks.
    fn delay(ticks: u32);
}
