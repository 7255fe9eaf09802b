// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod balances;
pub mod business;
pub mod doctor;
pub mod documents;
pub mod groups;
pub mod importer;
pub mod periods;
pub mod rules;
pub mod vouchers;
