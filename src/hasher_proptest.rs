//! Property-based tests for the content hasher.
//!
//! These tests use proptest to generate random file sets and verify that
//! the hashing invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::hasher::hash_tree;
    use proptest::prelude::*;
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::TempDir;

    /// Write `files` into `dir` in the iteration order given.
    fn write_files<'a>(dir: &std::path::Path, files: impl Iterator<Item = (&'a String, &'a String)>) {
        for (name, content) in files {
            fs::write(dir.join(name), content).unwrap();
        }
    }

    fn file_set() -> impl Strategy<Value = BTreeMap<String, String>> {
        proptest::collection::btree_map("[a-z]{1,12}", "[ -~]{0,64}", 0..8)
    }

    proptest! {
        /// Property: the hash does not depend on file creation order.
        #[test]
        fn hash_is_creation_order_independent(files in file_set()) {
            let forward = TempDir::new().unwrap();
            let reverse = TempDir::new().unwrap();

            write_files(forward.path(), files.iter());
            write_files(reverse.path(), files.iter().rev());

            prop_assert_eq!(
                hash_tree(forward.path()).unwrap(),
                hash_tree(reverse.path()).unwrap()
            );
        }

        /// Property: hashing is deterministic for an unchanged tree.
        #[test]
        fn hash_is_deterministic(files in file_set()) {
            let dir = TempDir::new().unwrap();
            write_files(dir.path(), files.iter());

            prop_assert_eq!(
                hash_tree(dir.path()).unwrap(),
                hash_tree(dir.path()).unwrap()
            );
        }

        /// Property: adding a file not already present changes the hash.
        #[test]
        fn added_file_changes_hash(files in file_set(), extra in "[ -~]{1,32}") {
            let dir = TempDir::new().unwrap();
            write_files(dir.path(), files.iter());
            let before = hash_tree(dir.path()).unwrap();

            // A name outside the generated alphabet cannot collide.
            fs::write(dir.path().join("EXTRA_FILE.txt"), &extra).unwrap();
            let after = hash_tree(dir.path()).unwrap();

            prop_assert_ne!(before, after);
        }
    }
}
