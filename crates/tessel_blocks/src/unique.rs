//! Name collision checks across a block's ports and parameters.

use crate::error::{BlockError, BlockResult};
use std::collections::HashSet;

/// Fails with [`BlockError::DuplicateName`] on the first repeated name.
///
/// Comparison is exact; `a` and `A` are different names.
pub fn check_unique<I, S>(names: I) -> BlockResult<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    for name in names {
        let name = name.as_ref();
        if !seen.insert(name.to_string()) {
            return Err(BlockError::DuplicateName {
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_name_fails() {
        assert_eq!(
            check_unique(["a", "b", "a"]),
            Err(BlockError::DuplicateName { name: "a".into() })
        );
    }

    #[test]
    fn distinct_names_pass() {
        assert!(check_unique(["a", "b", "c"]).is_ok());
        assert!(check_unique(Vec::<String>::new()).is_ok());
    }

    #[test]
    fn case_sensitive() {
        assert!(check_unique(["clk", "CLK"]).is_ok());
    }
}
