//! Candidate discovery for the fixed sensitive-file layout.
//!
//! The set of files subject to the workflow is a fixed contract: one
//! well-known inventory file plus every `vault.yml` beneath the inventory
//! subtree. Discovery is read-only and its order is stable for a given tree
//! so a dry-run preview matches the real run that follows it.
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Inventory file always considered when present.
pub const INVENTORY_FILE: &str = "inventory/production.yml";

/// Subtree searched recursively for vault files.
pub const SEARCH_ROOT: &str = "inventory";

/// Exact basename that marks a file as sensitive.
pub const VAULT_BASENAME: &str = "vault.yml";

/// Collect the ordered candidate set under `root`.
///
/// The fixed inventory file comes first when it exists, followed by every
/// vault file beneath the search subtree in sorted path order. An empty
/// result means there is nothing to process at all, which callers report
/// distinctly from "everything already in the target state".
pub fn discover(root: &Path) -> Result<Vec<PathBuf>> {
    let mut candidates = Vec::new();
    let inventory = root.join(INVENTORY_FILE);
    if inventory.is_file() {
        candidates.push(inventory);
    }

    let mut matches = Vec::new();
    collect_vault_files(&root.join(SEARCH_ROOT), &mut matches)?;
    matches.sort();
    candidates.extend(matches);

    tracing::debug!(
        count = candidates.len(),
        root = %root.display(),
        "discovered candidates"
    );
    Ok(candidates)
}

fn collect_vault_files(dir: &Path, matches: &mut Vec<PathBuf>) -> Result<()> {
    if !dir.is_dir() {
        return Ok(());
    }
    for entry in fs::read_dir(dir).with_context(|| format!("read {}", dir.display()))? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_vault_files(&path, matches)?;
        } else if path.file_name().and_then(|name| name.to_str()) == Some(VAULT_BASENAME) {
            matches.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
        fs::write(path, "---\n").expect("write file");
    }

    #[test]
    fn inventory_file_leads_and_matches_are_sorted() {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path();
        touch(&root.join("inventory/production.yml"));
        touch(&root.join("inventory/host_vars/web01/vault.yml"));
        touch(&root.join("inventory/group_vars/all/vault.yml"));
        touch(&root.join("inventory/group_vars/all/vars.yml"));

        let candidates = discover(root).expect("discover");
        let expected = vec![
            root.join("inventory/production.yml"),
            root.join("inventory/group_vars/all/vault.yml"),
            root.join("inventory/host_vars/web01/vault.yml"),
        ];
        assert_eq!(candidates, expected);
    }

    #[test]
    fn missing_inventory_file_is_excluded() {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path();
        touch(&root.join("inventory/group_vars/all/vault.yml"));

        let candidates = discover(root).expect("discover");
        assert_eq!(candidates, vec![root.join("inventory/group_vars/all/vault.yml")]);
    }

    #[test]
    fn basename_match_is_exact() {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path();
        touch(&root.join("inventory/group_vars/all/vault.yaml"));
        touch(&root.join("inventory/group_vars/all/my-vault.yml"));

        let candidates = discover(root).expect("discover");
        assert!(candidates.is_empty());
    }

    #[test]
    fn empty_tree_yields_empty_set() {
        let temp = tempfile::tempdir().expect("tempdir");
        let candidates = discover(temp.path()).expect("discover");
        assert!(candidates.is_empty());
    }

    #[test]
    fn discovery_order_is_stable_across_runs() {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path();
        touch(&root.join("inventory/production.yml"));
        touch(&root.join("inventory/host_vars/db01/vault.yml"));
        touch(&root.join("inventory/host_vars/web01/vault.yml"));

        let first = discover(root).expect("discover");
        let second = discover(root).expect("discover");
        assert_eq!(first, second);
    }
}
