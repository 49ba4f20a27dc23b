//! Expression compilation through the public API

use rstest::rstest;
use std::collections::HashMap;
use twsam_compiler::twsam::expression::{
    compile_expression, parse_expression, to_sam, ExpressionError,
};

/// Registers as the generator would hand them out, `C` onwards in first-use order
fn registers() -> impl FnMut(&str) -> String {
    let mut assigned: HashMap<String, char> = HashMap::new();
    move |name: &str| {
        let next = (b'C' + assigned.len() as u8) as char;
        assigned.entry(name.to_string()).or_insert(next).to_string()
    }
}

#[rstest]
#[case("a or b and c", "(or (name a) (and (name b) (name c)))")]
#[case("a and b or c", "(or (and (name a) (name b)) (name c))")]
#[case("1 + 2 * 3", "(+ (literal 1) (* (literal 2) (literal 3)))")]
#[case("$a < $b < $c", "(< (< (name a) (name b)) (name c))")]
#[case("not $a and $b", "(and (not (name a)) (name b))")]
#[case("$x is true", "(is (name x) (literal true))")]
#[case("8 % 3 / 2", "(/ (% (literal 8) (literal 3)) (literal 2))")]
fn test_precedence(#[case] source: &str, #[case] tree: &str) {
    assert_eq!(parse_expression(source).unwrap().to_string(), tree);
}

#[rstest]
#[case("1 + 2 * 3", "1 2 3 *+")]
#[case("$gold + 10", "C:10 +")]
#[case("$a or $b and $c", "C:D:E:*0>+0>")]
#[case("$gold >= 10 and not $cursed", "C:10 <0=D:0=*0>")]
#[case("$hp - $dmg * 2", "C:D:2 *-")]
#[case("$b + $a * $b", "C:D:C:*+")]
#[case("random(6) + 1", "r6 \\1 +")]
#[case("-1", "0 1 -")]
fn test_lowering(#[case] source: &str, #[case] sam: &str) {
    assert_eq!(to_sam(source, registers()).unwrap(), sam);
}

#[test]
fn test_numeric_locator_pushes_an_immediate() {
    assert_eq!(to_sam("$a + 1", |_| "42".to_string()).unwrap(), "42 1 +");
}

#[test]
fn test_compilation_is_deterministic() {
    let source = "random(1, $max) + $bonus * 2 >= 10 or $lucky";
    let first = compile_expression(source).unwrap();
    let second = compile_expression(source).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.render(registers()), second.render(registers()));
}

#[rstest]
#[case("")]
#[case("1 +")]
#[case("$a = 1")]
#[case("either(1, 2)")]
#[case("random(1, 2, 3)")]
#[case("1 @ 2")]
fn test_rejected(#[case] source: &str) {
    assert!(compile_expression(source).is_err());
}

#[test]
fn test_error_messages() {
    assert_eq!(
        compile_expression("random(1, 2, 3)").unwrap_err().to_string(),
        ExpressionError::Arity {
            function: "random".to_string(),
            expected: "1 or 2",
            found: 3,
        }
        .to_string()
    );
}
