use std::collections::HashSet;

use super::models::Organization;

/// Organizations in `current` whose id does not appear in `previous`, in the
/// order `current` lists them.
pub fn find_new(current: &[Organization], previous: &[Organization]) -> Vec<Organization> {
    let previous_ids: HashSet<&str> = previous.iter().map(|org| org.id.as_str()).collect();

    current
        .iter()
        .filter(|org| !previous_ids.contains(org.id.as_str()))
        .cloned()
        .collect()
}
