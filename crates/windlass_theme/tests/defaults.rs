use windlass_theme::{default_theme, resolve, resolve_theme, ThemeError, ThemeSpec, TokenTable, SCREENS};

#[test]
fn default_theme_resolves_without_aliases_left() {
    let table = TokenTable::from_spec(&default_theme()).unwrap();
    assert!(!table.is_empty());
    assert!(
        table.iter().all(|(_, value)| !value.starts_with("theme(")),
        "every alias in the default theme should resolve"
    );
}

#[test]
fn sizing_scopes_follow_spacing() {
    let table = TokenTable::from_spec(&default_theme()).unwrap();
    assert_eq!(table.get(&["width", "4"]), Some("1rem"));
    assert_eq!(table.get(&["height", "0.5"]), Some("0.125rem"));
    assert_eq!(table.get(&["width", "1/2"]), Some("50%"));
    assert_eq!(table.get(&["width", "screen"]), Some("100vw"));
    assert_eq!(table.get(&["height", "screen"]), Some("100vh"));
}

#[test]
fn extended_spacing_flows_into_sizing_scopes() {
    let mut extend = ThemeSpec::new();
    extend.set(&["spacing", "4"], "20px").unwrap();
    extend.set(&["spacing", "128"], "32rem").unwrap();
    extend.set(&["width", "4"], "18px").unwrap();

    let table = resolve_theme(&ThemeSpec::new(), &extend).unwrap();
    assert_eq!(table.get(&["spacing", "4"]), Some("20px"));
    assert_eq!(table.get(&["height", "4"]), Some("20px"));
    assert_eq!(table.get(&["height", "128"]), Some("32rem"));
    assert_eq!(table.get(&["width", "4"]), Some("18px"));
}

#[test]
fn replaced_spacing_rebuilds_sizing_scopes() {
    let mut overrides = ThemeSpec::new();
    overrides.set(&["spacing", "sm"], "8px").unwrap();

    let table = resolve_theme(&overrides, &ThemeSpec::new()).unwrap();
    assert_eq!(table.get(&["spacing", "sm"]), Some("8px"));
    assert_eq!(table.get(&["spacing", "4"]), None);
    assert_eq!(table.get(&["width", "sm"]), Some("8px"));
    assert_eq!(table.get(&["height", "sm"]), Some("8px"));
    assert_eq!(table.get(&["width", "4"]), None);
    assert_eq!(table.get(&["width", "full"]), Some("100%"));
}

#[test]
fn replaced_width_is_kept_as_written() {
    let mut overrides = ThemeSpec::new();
    overrides.set(&["width", "card"], "20rem").unwrap();

    let table = resolve_theme(&overrides, &ThemeSpec::new()).unwrap();
    assert_eq!(table.get(&["width", "card"]), Some("20rem"));
    assert_eq!(table.get(&["width", "4"]), None);
    assert_eq!(table.get(&["height", "4"]), Some("1rem"));
}

#[test]
fn screens_are_exposed_in_order() {
    let table = TokenTable::from_spec(&default_theme()).unwrap();
    for (name, width) in SCREENS {
        assert_eq!(table.get(&["screens", *name]), Some(*width), "screen {name}");
    }
}

#[test]
fn brand_colors_extend_the_palette() {
    let extend: ThemeSpec = toml::from_str(
        r##"
[colors.primary]
DEFAULT = "#3b82f6"
dark = "#2563eb"
light = "#60a5fa"

[colors.background]
light = "#ffffff"
dark = "#1f2937"
"##,
    )
    .unwrap();

    let table = resolve(&default_theme(), &extend).unwrap();
    assert_eq!(table.get(&["colors", "primary", "DEFAULT"]), Some("#3b82f6"));
    assert_eq!(table.get(&["colors", "background", "dark"]), Some("#1f2937"));
    assert_eq!(table.get(&["colors", "gray", "900"]), Some("#111827"));
}

#[test]
fn replacing_a_palette_group_with_a_value_fails() {
    let mut extend = ThemeSpec::new();
    extend.set(&["colors", "gray"], "#808080").unwrap();

    let err = resolve(&default_theme(), &extend).unwrap_err();
    assert!(matches!(err, ThemeError::TypeConflict { .. }));
    assert!(err.to_string().contains("theme.colors.gray"));
}
