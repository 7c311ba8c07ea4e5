// Copyright (C) 2026 Repair Desk contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! ## Module Organization
//!
//! - `technicians`: technician records and phone lookups
//! - `orders`: service orders
//! - `accounts`: sign-in accounts and sessions

pub mod accounts;
pub mod orders;
pub mod technicians;
