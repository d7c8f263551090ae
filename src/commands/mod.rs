// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod expenses;
pub mod incomes;
pub mod people;
pub mod recurring;
pub mod cards;
pub mod purchases;
pub mod settle;
pub mod reports;
pub mod exporter;
pub mod doctor;

/// Category used when none is given on the command line.
pub const DEFAULT_CATEGORY: &str = "Other";
