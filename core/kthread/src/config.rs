// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Build-time scheduler configuration.
//!
//! Generated by the build script from the environment:
//!
//! - `KTHREAD_MAX_PRIORITIES`: number of scheduler priority levels (default 6,
//!   must be at least 1).
//! - `KTHREAD_MINIMAL_STACK_SIZE`: minimal task stack depth in words
//!   (default 128).

include!(concat!(env!("OUT_DIR"), "/config.rs"));

/// Delay, in ticks, that blocks for as long as the scheduler supports.
pub const MAX_DELAY: u32 = u32::MAX;
