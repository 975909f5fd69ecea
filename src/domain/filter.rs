use std::cmp::Ordering;

use crate::domain::entities::query::{Filters, SortDirection, SortSpec};
use crate::domain::entities::record::Record;
use crate::domain::entities::resource::FilterBinding;

fn binding_fields<'a>(name: &'a str, bindings: &[FilterBinding]) -> Vec<&'a str> {
    match bindings.iter().find(|binding| binding.name == name) {
        Some(binding) => binding.fields.to_vec(),
        None => vec![name],
    }
}

fn field_contains(record: &Record, field: &str, needle: &str) -> bool {
    record
        .text(field)
        .is_some_and(|value| value.to_lowercase().contains(needle))
}

pub fn matches(record: &Record, filters: &Filters, bindings: &[FilterBinding]) -> bool {
    filters.iter().all(|(name, value)| {
        let needle = value.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        binding_fields(name, bindings)
            .into_iter()
            .any(|field| field_contains(record, field, &needle))
    })
}

pub fn filter_records(
    records: &[Record],
    filters: &Filters,
    bindings: &[FilterBinding],
) -> Vec<Record> {
    records
        .iter()
        .filter(|record| matches(record, filters, bindings))
        .cloned()
        .collect()
}

pub fn sort_records(records: &[Record], sort: Option<&SortSpec>) -> Vec<Record> {
    let mut sorted = records.to_vec();
    let Some(sort) = sort else {
        return sorted;
    };

    sorted.sort_by(|left, right| {
        let ordering: Ordering = left
            .number(&sort.field)
            .total_cmp(&right.number(&sort.field));
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    sorted
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::domain::entities::resource::{ResourceKind, CREATOR_SEARCH_FILTER};

    fn record(value: Value) -> Record {
        Record::from_value(value).expect("fixture should be an object")
    }

    fn creators() -> Vec<Record> {
        vec![
            record(json!({ "id": 1, "creator_username": "SunnyDays", "region": "US", "gmv": 300 })),
            record(json!({ "id": 2, "creator_username": "moonlight", "region": "GB", "gmv": 100 })),
            record(json!({ "id": 3, "discord_username": "sunset_fan", "region": "us", "gmv": "200" })),
            record(json!({ "id": 4, "creator_username": "plain", "region": null })),
        ]
    }

    fn ids(records: &[Record]) -> Vec<String> {
        records
            .iter()
            .filter_map(|record| record.text("id"))
            .collect()
    }

    fn filters(pairs: &[(&str, &str)]) -> Filters {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn filters_are_case_insensitive_substrings() {
        let result = filter_records(&creators(), &filters(&[("region", " us ")]), &[]);
        assert_eq!(ids(&result), vec!["1", "3"]);
    }

    #[test]
    fn all_active_filters_must_match() {
        let bindings = ResourceKind::Creators.filters();
        let active = filters(&[(CREATOR_SEARCH_FILTER, "sun"), ("region", "US")]);

        let result = filter_records(&creators(), &active, bindings);

        assert_eq!(ids(&result), vec!["1", "3"]);
        for row in &result {
            assert!(matches(row, &active, bindings));
        }

        let narrower = filters(&[(CREATOR_SEARCH_FILTER, "sunny"), ("region", "us")]);
        assert_eq!(ids(&filter_records(&creators(), &narrower, bindings)), vec!["1"]);
    }

    #[test]
    fn blank_filters_are_ignored() {
        let result = filter_records(&creators(), &filters(&[("region", "   ")]), &[]);
        assert_eq!(result.len(), 4);
    }

    #[test]
    fn missing_fields_never_match_non_blank_filter() {
        let result = filter_records(&creators(), &filters(&[("region", "u")]), &[]);
        assert!(!ids(&result).contains(&"4".to_string()));
    }

    #[test]
    fn filtering_is_idempotent() {
        let bindings = ResourceKind::Creators.filters();
        let active = filters(&[(CREATOR_SEARCH_FILTER, "s")]);

        let once = filter_records(&creators(), &active, bindings);
        let twice = filter_records(&once, &active, bindings);

        assert_eq!(once, twice);
    }

    #[test]
    fn sort_treats_missing_as_zero_and_reads_numeric_strings() {
        let sort = SortSpec::new("gmv", SortDirection::Asc);
        let sorted = sort_records(&creators(), Some(&sort));
        assert_eq!(ids(&sorted), vec!["4", "2", "3", "1"]);
    }

    #[test]
    fn descending_is_reverse_of_ascending_without_ties() {
        let rows = creators();
        let asc = sort_records(&rows, Some(&SortSpec::new("gmv", SortDirection::Asc)));
        let desc = sort_records(&rows, Some(&SortSpec::new("gmv", SortDirection::Desc)));

        let mut reversed = asc.clone();
        reversed.reverse();
        assert_eq!(reversed, desc);
    }

    #[test]
    fn sort_is_stable_for_ties_and_does_not_mutate_input() {
        let rows = vec![
            record(json!({ "id": "a", "gmv": 1 })),
            record(json!({ "id": "b", "gmv": 1 })),
            record(json!({ "id": "c", "gmv": 0 })),
        ];
        let original = rows.clone();

        let desc = sort_records(&rows, Some(&SortSpec::new("gmv", SortDirection::Desc)));

        assert_eq!(ids(&desc), vec!["a", "b", "c"]);
        assert_eq!(rows, original);
    }

    #[test]
    fn no_sort_preserves_order() {
        let rows = creators();
        assert_eq!(sort_records(&rows, None), rows);
    }
}
