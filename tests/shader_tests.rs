//! Validation of the generated viewer shaders.
//!
//! Every WGSL source the renderer can build is parsed and validated with
//! naga, so shader regressions show up without a GPU.

use caloview::viewer::shaders::{line_shader, marker_shader};
use caloview::MarkerSymbol;

/// Validates WGSL code using naga.
fn validate_wgsl(code: &str) -> Result<(), String> {
    let module = naga::front::wgsl::parse_str(code)
        .map_err(|e| format!("WGSL parse error: {:?}", e))?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator
        .validate(&module)
        .map_err(|e| format!("WGSL validation error: {:?}", e))?;

    Ok(())
}

#[test]
fn test_marker_shader_all_symbols() {
    let wgsl = marker_shader(&MarkerSymbol::ALL);
    validate_wgsl(&wgsl).unwrap();
    assert_eq!(wgsl.matches("case ").count(), MarkerSymbol::ALL.len());
}

#[test]
fn test_marker_shader_each_symbol_alone() {
    for symbol in MarkerSymbol::ALL {
        let wgsl = marker_shader(&[symbol]);
        if let Err(e) = validate_wgsl(&wgsl) {
            panic!("{} marker shader is invalid: {}", symbol.name(), e);
        }
    }
}

#[test]
fn test_marker_shader_subset() {
    let wgsl = marker_shader(&[MarkerSymbol::DiamondOpen, MarkerSymbol::Cross]);
    validate_wgsl(&wgsl).unwrap();
    assert!(wgsl.contains("manhattan"));
    assert!(wgsl.contains("arm"));
    assert!(!wgsl.contains("diag"));
}

#[test]
fn test_marker_shader_without_symbols() {
    let wgsl = marker_shader(&[]);
    validate_wgsl(&wgsl).unwrap();
}

#[test]
fn test_marker_shader_ignores_duplicates() {
    let wgsl = marker_shader(&[MarkerSymbol::Circle, MarkerSymbol::Circle]);
    validate_wgsl(&wgsl).unwrap();
    assert_eq!(wgsl.matches("case ").count(), 1);
}

#[test]
fn test_line_shader() {
    let wgsl = line_shader();
    validate_wgsl(&wgsl).unwrap();
    assert!(wgsl.contains("fn vs_main"));
    assert!(wgsl.contains("fn fs_main"));
}
