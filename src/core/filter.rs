use crate::core::{LocationMatch, Member};

pub fn location_matches(location: Option<&str>, target: &str, mode: LocationMatch) -> bool {
    match location {
        None | Some("") => false,
        Some(location) => match mode {
            LocationMatch::CaseInsensitive => location.to_lowercase() == target.to_lowercase(),
            LocationMatch::Exact => location == target,
        },
    }
}

/// Keeps records whose location equals `target`, in input order.
pub fn filter_by_location(records: &[Member], target: &str, mode: LocationMatch) -> Vec<Member> {
    records
        .iter()
        .filter(|record| location_matches(record.location.as_deref(), target, mode))
        .cloned()
        .collect()
}
