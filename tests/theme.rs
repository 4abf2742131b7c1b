use glance::syntax::TokenStyle;
use glance::theme::{
    list_available_themes, resolve_theme, theme_background, Color, Theme, ThemeSource,
    BUILTIN_THEMES, DARK_YAML, GITHUB_DARK_YAML, GITHUB_LIGHT_YAML, LIGHT_YAML,
};

#[test]
fn test_color_from_hex_6() {
    let color = Color::from_hex("#1E1E1E").unwrap();
    assert_eq!(color, Color::rgb(0x1E, 0x1E, 0x1E));
    assert_eq!(color.a, 255);
}

#[test]
fn test_color_from_hex_8() {
    let color = Color::from_hex("#1E1E1E80").unwrap();
    assert_eq!(color.a, 0x80);
}

#[test]
fn test_color_rejects_garbage() {
    assert!(Color::from_hex("#12345").is_err());
    assert!(Color::from_hex("#GGGGGG").is_err());
    assert!(Color::from_hex("#ééé").is_err());
}

#[test]
fn test_color_hex_round_trip() {
    assert_eq!(Color::rgb(0x0D, 0x11, 0x17).to_hex(), "#0D1117");
}

#[test]
fn test_parse_builtins() {
    let cases = [
        (DARK_YAML, "Glance Dark", "#1E1E1E"),
        (LIGHT_YAML, "Glance Light", "#FFFFFF"),
        (GITHUB_DARK_YAML, "GitHub Dark", "#0D1117"),
        (GITHUB_LIGHT_YAML, "GitHub Light", "#FFFFFF"),
    ];
    for (yaml, name, background) in cases {
        let theme = Theme::from_yaml(yaml).unwrap();
        assert_eq!(theme.name, name);
        assert_eq!(theme.palette.background.to_hex(), background);
    }
}

#[test]
fn test_every_builtin_loads_by_id() {
    for builtin in BUILTIN_THEMES {
        assert!(Theme::from_builtin(builtin.id).is_ok(), "{}", builtin.id);
    }
}

#[test]
fn test_default_theme_styles() {
    let theme = Theme::default_dark();
    assert_eq!(theme.name, "Glance Dark");
    let keyword = theme.palette.style(TokenStyle::Keyword);
    assert!(keyword.bold);
    assert_eq!(keyword.color, Color::rgb(0x56, 0x9C, 0xD6));
    assert!(theme.palette.style(TokenStyle::Comment).italic);
}

#[test]
fn test_missing_token_uses_foreground() {
    let theme = Theme::from_yaml(
        "version: 1\nname: Sparse\nbackground: \"#000000\"\nforeground: \"#ABCDEF\"\ntokens:\n  keyword: { color: \"#FF0000\" }\n",
    )
    .unwrap();
    assert_eq!(theme.palette.style(TokenStyle::String).color, Color::rgb(0xAB, 0xCD, 0xEF));
    assert_eq!(theme.palette.style(TokenStyle::Keyword).color, Color::rgb(0xFF, 0, 0));
}

#[test]
fn test_unknown_theme_falls_back() {
    let theme = resolve_theme("no-such-theme");
    assert_eq!(theme, Theme::default_dark());
    assert_eq!(theme_background("no-such-theme"), "#1E1E1E");
}

#[test]
fn test_listing_includes_builtins() {
    let themes = list_available_themes();
    for builtin in BUILTIN_THEMES {
        assert!(themes.iter().any(|t| t.id == builtin.id));
    }
    let ids: std::collections::HashSet<_> = themes.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids.len(), themes.len(), "theme ids should be unique");
    assert!(themes.iter().any(|t| t.source == ThemeSource::Builtin));
}
