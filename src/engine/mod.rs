// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod audit;
pub mod dashboard;
pub mod expansion;
pub mod projection;
pub mod settlement;
pub mod statements;
