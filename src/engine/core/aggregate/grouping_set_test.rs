use crate::engine::core::aggregate::grouping_set::{
    GroupingMode, GroupingSet, GroupingSetSpec, MAX_GROUPING_DIMENSIONS,
};
use crate::engine::errors::ConfigurationError;

#[test]
fn rollup_produces_prefixes_most_detailed_first() {
    let sets = GroupingSetSpec::rollup(&["country", "genre", "gender"])
        .enumerate(8)
        .unwrap();
    let masks: Vec<u32> = sets.iter().map(|s| s.mask()).collect();
    assert_eq!(masks, vec![0b111, 0b011, 0b001, 0b000]);
    assert!(sets.get(3).unwrap().is_grand_total());
}

#[test]
fn rollup_and_cube_sizes_for_every_n() {
    for n in 1..=8usize {
        let names: Vec<String> = (0..n).map(|i| format!("d{i}")).collect();
        let rollup = GroupingSetSpec::new(names.clone(), GroupingMode::Rollup)
            .enumerate(8)
            .unwrap();
        let cube = GroupingSetSpec::new(names, GroupingMode::Cube)
            .enumerate(8)
            .unwrap();
        assert_eq!(rollup.len(), n + 1);
        assert_eq!(cube.len(), 1 << n);
        assert!(rollup.iter().any(|s| s.is_grand_total()));
        assert!(cube.iter().any(|s| s.is_grand_total()));
    }
}

#[test]
fn cube_is_the_power_set_in_descending_mask_order() {
    let sets = GroupingSetSpec::cube(&["country", "genre"]).enumerate(8).unwrap();
    let masks: Vec<u32> = sets.iter().map(|s| s.mask()).collect();
    assert_eq!(masks, vec![0b11, 0b10, 0b01, 0b00]);
    // stable across calls
    let again = GroupingSetSpec::cube(&["country", "genre"]).enumerate(8).unwrap();
    assert_eq!(sets, again);
}

#[test]
fn explicit_sets_are_used_as_given() {
    let spec = GroupingSetSpec::explicit(
        &["country", "genre", "gender"],
        &[&["genre"], &["country", "gender"], &[]],
    );
    let sets = spec.enumerate(8).unwrap();
    let masks: Vec<u32> = sets.iter().map(|s| s.mask()).collect();
    assert_eq!(masks, vec![0b010, 0b101, 0b000]);
}

#[test]
fn explicit_rejects_duplicates_regardless_of_member_order() {
    let spec = GroupingSetSpec::explicit(
        &["country", "genre"],
        &[&["country", "genre"], &["genre", "country"]],
    );
    assert_eq!(
        spec.enumerate(8),
        Err(ConfigurationError::DuplicateSubset(vec![
            "genre".into(),
            "country".into()
        ]))
    );
}

#[test]
fn explicit_rejects_foreign_attributes_and_empty_lists() {
    let spec = GroupingSetSpec::explicit(&["country"], &[&["genre"]]);
    assert_eq!(
        spec.enumerate(8),
        Err(ConfigurationError::ForeignSubset("genre".into()))
    );

    let spec = GroupingSetSpec::explicit(&["country"], &[]);
    assert_eq!(spec.enumerate(8), Err(ConfigurationError::EmptyExplicitSets));
}

#[test]
fn empty_duplicate_and_oversized_dimension_lists_fail() {
    assert_eq!(
        GroupingSetSpec::cube(&[]).enumerate(8),
        Err(ConfigurationError::EmptyDimensions)
    );
    assert_eq!(
        GroupingSetSpec::rollup(&["a", "b", "a"]).enumerate(8),
        Err(ConfigurationError::DuplicateDimension("a".into()))
    );
    let names: Vec<String> = (0..9).map(|i| format!("d{i}")).collect();
    assert_eq!(
        GroupingSetSpec::new(names.clone(), GroupingMode::Cube).enumerate(8),
        Err(ConfigurationError::TooManyDimensions { count: 9, max: 8 })
    );
    // configured limit never exceeds the hard ceiling
    let names: Vec<String> = (0..MAX_GROUPING_DIMENSIONS + 1)
        .map(|i| format!("d{i}"))
        .collect();
    assert!(matches!(
        GroupingSetSpec::new(names, GroupingMode::Rollup).enumerate(64),
        Err(ConfigurationError::TooManyDimensions { max, .. }) if max == MAX_GROUPING_DIMENSIONS
    ));
}

#[test]
fn group_by_is_a_single_full_set() {
    let sets = GroupingSetSpec::group_by(&["country", "genre"])
        .enumerate(8)
        .unwrap();
    assert_eq!(sets.len(), 1);
    assert_eq!(sets.get(0).unwrap().mask(), 0b11);
}

#[test]
fn grouping_id_marks_aggregated_dimensions() {
    // grouped on the first of three dimensions only
    let set = GroupingSet::from_mask(0b001);
    assert_eq!(set.grouping_id(3), 0b011);
    assert_eq!(GroupingSet::from_mask(0b111).grouping_id(3), 0);
    assert_eq!(GroupingSet::from_mask(0).grouping_id(3), 0b111);
    assert_eq!(set.members(3).collect::<Vec<_>>(), vec![0]);
    assert_eq!(GroupingSet::prefix(2).mask(), 0b11);
}
