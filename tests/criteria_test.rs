use queryfilter::{
    AllowField, BetweenFilter, CallbackFilter, Criteria, CriteriaCollection, ExactFilter, FilterValue, FixedCondition,
    FixedFilter, LeftStrictPartialFilter, Operator, OrWhereCondition, PartialFilter,
    QueryFilterError, SortCondition, SortDirection, Sorting, WhereCondition,
};

mod common;
use common::{Call, RecordingBuilder};

fn apply(criteria: impl Into<Criteria>) -> RecordingBuilder {
    let criteria: Criteria = criteria.into();
    let mut builder = RecordingBuilder::new();
    criteria.apply(&mut builder).unwrap();
    builder
}

#[test]
fn test_exact_filter_with_list_uses_where_in() {
    let builder = apply(ExactFilter::new("name").with_value(vec!["nils", "refle"]));

    assert!(builder.conditions().is_empty());
    let where_ins = builder.where_ins();
    assert_eq!(where_ins.len(), 1);
    assert_eq!(where_ins[0].column(), "name");
    assert_eq!(where_ins[0].values(), ["nils".to_string(), "refle".to_string()]);
}

#[test]
fn test_exact_filter_with_null_member_uses_equal_conditions() {
    let builder = apply(ExactFilter::new("name").with_value(vec![Some(""), None]));

    assert!(builder.where_ins().is_empty());
    let conditions = builder.conditions();
    assert_eq!(conditions.len(), 2);
    assert!(conditions.iter().all(|c| c.operator() == Operator::Equal && !c.is_or()));
    assert_eq!(conditions[0].value(), Some(""));
    assert_eq!(conditions[1].value(), None);
}

#[test]
fn test_exact_filter_single_value_and_unset() {
    let builder = apply(ExactFilter::new("name").for_column("users.name").with_value("nils"));
    let conditions = builder.conditions();
    assert_eq!(conditions.len(), 1);
    assert_eq!(conditions[0].column(), "users.name");
    assert_eq!(conditions[0].value(), Some("nils"));

    assert!(apply(ExactFilter::new("name")).calls.is_empty());
}

#[test]
fn test_partial_filter_noop_values() {
    for value in [
        FilterValue::from(""),
        FilterValue::from(vec!["", ""]),
        FilterValue::from(vec![None::<&str>]),
    ] {
        assert!(apply(PartialFilter::new("name").with_value(value)).calls.is_empty());
    }
    assert!(apply(PartialFilter::new("name")).calls.is_empty());
}

#[test]
fn test_partial_filter_list_is_one_or_group() {
    let builder = apply(PartialFilter::new("col").with_value(vec!["a", "b"]));

    let expected = vec![
        OrWhereCondition::new("col", Operator::Like, Some("%a%".to_string()))
            .unwrap()
            .into(),
        OrWhereCondition::new("col", Operator::Like, Some("%b%".to_string()))
            .unwrap()
            .into(),
    ];
    assert_eq!(builder.calls, [Call::Where(expected)]);
}

#[test]
fn test_left_strict_partial_filter_pattern() {
    let builder = apply(LeftStrictPartialFilter::new("name").with_value("ni"));
    let conditions = builder.conditions();
    assert_eq!(conditions.len(), 1);
    assert_eq!(conditions[0].operator(), Operator::Like);
    assert_eq!(conditions[0].value(), Some("ni%"));

    let builder = apply(LeftStrictPartialFilter::new("name").with_value(vec!["a", "", "b"]));
    let values: Vec<_> = builder.conditions().iter().map(|c| c.value()).collect();
    assert_eq!(values, [Some("a%"), Some("b%")]);
}

#[test]
fn test_between_filter_is_one_and_group() {
    let builder = apply(BetweenFilter::new("created_at").with_range("2020-01-01", "2020-01-31"));

    let expected = vec![
        WhereCondition::new("created_at", Operator::GreaterThanOrEqual, Some("2020-01-01".to_string()))
            .unwrap()
            .into(),
        WhereCondition::new("created_at", Operator::LessThanOrEqual, Some("2020-01-31".to_string()))
            .unwrap()
            .into(),
    ];
    assert_eq!(builder.calls, [Call::Where(expected)]);
}

#[test]
fn test_between_filter_rejects_wrong_shape() {
    let mut between = BetweenFilter::new("created_at");
    for value in [
        FilterValue::from("2020-01-01"),
        FilterValue::from(vec!["2020-01-01"]),
        FilterValue::from(vec!["a", "b", "c"]),
    ] {
        let err = between.set_value(value).unwrap_err();
        assert_eq!(err.to_string(), "Value for BetweenFilter has to be a list with two values.");
    }

    between
        .set_value(FilterValue::from(vec![Some("2020-01-01"), None]))
        .unwrap();
    assert!(apply(between).calls.is_empty());
}

#[test]
fn test_fixed_filter_splits_where_and_sort() {
    let fixed = FixedFilter::new(
        "active",
        [
            FixedCondition::from(
                WhereCondition::new("active", Operator::Equal, Some("1".to_string())).unwrap(),
            ),
            FixedCondition::from(SortCondition::new("created_at", SortDirection::Descending)),
            FixedCondition::from(
                OrWhereCondition::new("role", Operator::Equal, Some("admin".to_string())).unwrap(),
            ),
            FixedCondition::from(SortCondition::new("name", SortDirection::Ascending)),
        ],
    );
    let builder = apply(fixed);

    assert_eq!(builder.calls.len(), 3);
    let Call::Where(group) = &builder.calls[0] else {
        panic!("expected a where group first, got {:?}", builder.calls[0]);
    };
    assert_eq!(group.len(), 2);
    assert!(!group[0].is_or());
    assert!(group[1].is_or());
    assert_eq!(
        builder.sorts(),
        [("created_at", SortDirection::Descending), ("name", SortDirection::Ascending)]
    );
}

#[test]
fn test_callback_filter_receives_column_and_value() {
    let callback = CallbackFilter::new("search", |builder, column, value| {
        let Some(FilterValue::Single(term)) = value else {
            return Ok(());
        };
        builder.sort(&format!("{column}:{term}"), SortDirection::Ascending)
    })
    .for_column("users.name")
    .with_value("nils");

    let builder = apply(callback);
    assert_eq!(builder.sorts(), [("users.name:nils", SortDirection::Ascending)]);
}

#[test]
fn test_callback_filter_errors_propagate() {
    let callback = CallbackFilter::new("broken", |_, _, _| {
        Err(QueryFilterError::configuration("callback failed"))
    });

    let mut builder = RecordingBuilder::new();
    let err = Criteria::from(callback).apply(&mut builder).unwrap_err();
    assert_eq!(err.to_string(), "callback failed");
}

#[test]
fn test_allow_field_with_alias() {
    let field = AllowField::new("email").with_alias("mail");
    assert_eq!(field.name(), "email-as-mail");

    let builder = apply(field);
    assert_eq!(builder.calls, [Call::Select(vec!["email as mail".to_string()])]);
    assert_eq!(
        apply(AllowField::new("email")).calls,
        [Call::Select(vec!["email".to_string()])]
    );
}

#[test]
fn test_same_column_under_two_aliases_coexists() {
    let fields = CriteriaCollection::from_iter([
        AllowField::new("email").with_alias("mail"),
        AllowField::new("email").with_alias("contact"),
        AllowField::new("email"),
    ]);

    assert_eq!(fields.len(), 3);
    assert!(fields.has_allow_field("email-as-mail"));
    assert!(fields.has_allow_field("email-as-contact"));
    assert!(fields.has_allow_field("email"));

    let mut builder = RecordingBuilder::new();
    fields.apply_on(&mut builder).unwrap();
    assert_eq!(
        builder.calls,
        [
            Call::Select(vec!["email as mail".to_string()]),
            Call::Select(vec!["email as contact".to_string()]),
            Call::Select(vec!["email".to_string()]),
        ]
    );
}

#[test]
fn test_sorting_applies_direction_and_skips_empty_column() {
    let builder = apply(Sorting::new("street").with_direction(SortDirection::Descending));
    assert_eq!(builder.sorts(), [("street", SortDirection::Descending)]);

    assert!(apply(Sorting::new("")).calls.is_empty());
}
