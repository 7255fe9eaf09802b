// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The ledger posting engine: account directory, financial periods,
//! voucher validation, atomic commit, and balance queries.
//!
//! Everything here is tenant-scoped: callers pass the business id explicitly
//! on every call, and lookups that cross a business boundary fail closed.

pub mod accounts;
pub mod balance;
pub mod periods;
pub mod posting;
pub mod validate;
