// Copyright (C) 2026 Repair Desk contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write operations.
//!
//! Every mutation validates its input with the domain rules before touching
//! the database and stores timestamps through `timestamp::encode`.

pub mod accounts;
pub mod orders;
pub mod technicians;
