//! Scenario tests covering gate evaluation, fail-fast execution, secret
//! gating, matrix fan-out and the built-in verification workflow

#[path = "../helpers.rs"]
mod helpers;

mod end_to_end;
mod fail_fast;
