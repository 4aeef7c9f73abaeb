//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `contacts_core` linkage.
//! - Check email arguments against the core predicate.
//!
//! Output is deterministic for quick local sanity checks.

use std::process::ExitCode;

fn main() -> ExitCode {
    println!("contacts_core ping={}", contacts_core::ping());
    println!("contacts_core version={}", contacts_core::core_version());

    let mut all_valid = true;
    for candidate in std::env::args().skip(1) {
        let valid = contacts_core::is_valid_email(&candidate);
        all_valid &= valid;
        println!("email={candidate} valid={valid}");
    }

    if all_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
