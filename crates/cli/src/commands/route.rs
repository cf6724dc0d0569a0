//! Route classification lookup.
//!
//! # Usage
//!
//! ```bash
//! orchard-cli route /admin/orders
//! # /admin/orders: admin-protected (login: /admin/login)
//! ```

use std::io::Write;

use orchard_core::AccessPolicy;

use super::CliError;

/// Describe how the standard policy treats `path`.
#[must_use]
pub fn describe(policy: &AccessPolicy, path: &str) -> String {
    let class = policy.classify(path);
    match class.required_kind() {
        Some(kind) => format!("{path}: {} (login: {})", class.as_str(), kind.login_path()),
        None => format!("{path}: {}", class.as_str()),
    }
}

pub fn run(path: &str, mut output: impl Write) -> Result<(), CliError> {
    writeln!(output, "{}", describe(&AccessPolicy::standard(), path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_protected_and_public_paths() {
        let policy = AccessPolicy::standard();
        assert_eq!(
            describe(&policy, "/admin/orders"),
            "/admin/orders: admin-protected (login: /admin/login)"
        );
        assert_eq!(describe(&policy, "/cart"), "/cart: user-protected (login: /login)");
        assert_eq!(describe(&policy, "/cartography"), "/cartography: unprotected");
        assert_eq!(describe(&policy, "/admin/login"), "/admin/login: unprotected");
    }
}
