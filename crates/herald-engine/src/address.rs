//! Email address well-formedness.

use std::sync::LazyLock;

use regex::Regex;

const ADDRESS_REGEX_STR: &str = r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$";

static ADDRESS_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(ADDRESS_REGEX_STR).unwrap());

/// Whether `address` looks like a deliverable `local@domain` address.
pub fn is_valid_address(address: &str) -> bool {
  !address.contains("..") && ADDRESS_REGEX.is_match(address)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn accepts_ordinary_addresses() {
    for ok in [
      "alice@example.com",
      "first.last+tag@mail.example.co.uk",
      "ops@localhost",
      "o'neil@example.org",
    ] {
      assert!(is_valid_address(ok), "{ok} rejected");
    }
  }

  #[test]
  fn rejects_malformed_addresses() {
    for bad in [
      "",
      "alice",
      "alice.example.com",
      "@example.com",
      "alice@",
      "alice@@example.com",
      "al ice@example.com",
      "alice@-example.com",
      "alice..b@example.com",
    ] {
      assert!(!is_valid_address(bad), "{bad:?} accepted");
    }
  }
}
