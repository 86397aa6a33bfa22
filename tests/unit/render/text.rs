use super::*;

#[test]
fn rejects_non_positive_size() {
    let err = TextRenderer::from_bytes(Vec::new(), 0.0).unwrap_err();
    assert!(err.is_invalid_config());
    let err = TextRenderer::from_bytes(Vec::new(), f32::NAN).unwrap_err();
    assert!(err.is_invalid_config());
}

#[test]
fn garbage_font_bytes_are_resource_errors() {
    let err = TextRenderer::from_bytes(b"definitely not a font".to_vec(), 18.0).unwrap_err();
    assert!(err.is_resource());
}

#[test]
fn missing_font_file_is_resource_error() {
    let err = TextRenderer::from_path(Path::new("target/no/such/font.ttf"), 18.0).unwrap_err();
    assert!(err.is_resource());
}

#[test]
fn brush_converts_from_color() {
    let b = TextBrushRgba8::from(Rgba8::RED);
    assert_eq!((b.r, b.g, b.b, b.a), (255, 0, 0, 255));
}

#[test]
fn system_default_uses_an_installed_font_when_present() {
    let found = TextRenderer::system_default(18.0).unwrap();
    assert_eq!(found.is_some(), system_sans_path().is_some());
    if let Some(r) = found {
        assert_eq!(r.size_px(), 18.0);
    }
}
