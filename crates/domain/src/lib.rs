// Copyright (C) 2026 Repair Desk contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod order_status;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use order_status::{OrderStatus, STATUS_PRECEDENCE};
pub use types::{Phone, ServiceOrder, Technician};
pub use validation::{validate_amount_cents, validate_order_number, validate_technician_name};
