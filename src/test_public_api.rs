use crate::form::FormModel as _;

#[derive(Clone, crate::form::FormModel)]
struct Budget {
    rent: Option<f64>,
}

#[test]
fn prelude_covers_the_editing_surface() {
    use crate::prelude::*;

    let mut field = NumberInput::new()
        .preset(LocalePreset::Euro)
        .range(0.0, 1000.0)
        .placeholder("0,00 €")
        .value(12.5);
    field.focus();
    let response = field.key_down(&EditKey::ArrowUp, Modifiers::none());
    assert!(response.prevent_default);

    let props: TextFieldProps = field.render();
    assert_eq!(props.display_text, "13,50 €");
    assert_eq!(props.placeholder.as_deref(), Some("0,00 €"));
    assert!(matches!(field.after_render(), Some(FocusRequest { .. })));
    assert_eq!(field.phase(), FieldPhase::FocusedIdle);
}

#[test]
fn root_exports_parse_and_format() {
    let euro = crate::LocaleConfig::new(',').with_suffix(" €");
    let text = crate::format_value(&1234.5, crate::Precision::Fixed(2), &euro);
    assert_eq!(text, "1234,50 €");
    assert_eq!(
        crate::parse_value(&text, crate::Precision::Fixed(2), None, Some(1000.0), ','),
        1000.0
    );
    assert_eq!(
        crate::parse_value_unbounded(&text, crate::Precision::Fixed(0), ','),
        1235.0
    );
}

#[test]
fn derived_models_expose_their_keys() {
    assert_eq!(Budget::FIELD_KEYS, &[crate::form::FieldKey::new("rent")]);
    let form = crate::form::NumberForm::from_model(
        "budget",
        &Budget { rent: Some(900.0) },
        crate::form::FieldDescriptor::new(),
    );
    assert!(form.is_ok_and(|form| form.values() == Ok(vec![("budget_v1".into(), Some(900.0))])));
}
