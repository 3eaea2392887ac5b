// Source-level tests for the operator rewrite pass

use macaroni::parser::parse_program;
use macaroni::parser::printer::print_program;
use macaroni::rewrite::{rewrite_program, transform, ImportStyle, RewriteConfig};
use pretty_assertions::assert_eq;

const IMPORT: &str = "import { Operator } from 'macaroni';\n";

fn rewrite(source: &str) -> String {
    transform(source, &RewriteConfig::default()).expect("Parsing failed")
}

fn with_import(body: &str) -> String {
    format!("{}{}", IMPORT, body)
}

#[test]
fn test_binary_with_identifier() {
    assert_eq!(rewrite("1 + a;"), with_import("Operator.add(1, a);\n"));
}

#[test]
fn test_end_to_end_member_operands() {
    assert_eq!(
        rewrite("cat.a + cat.b"),
        with_import("Operator.add(cat.a, cat.b);\n")
    );
}

#[test]
fn test_every_binary_operator() {
    let cases = [
        ("a - b;", "Operator.subtract(a, b);"),
        ("a * b;", "Operator.multiply(a, b);"),
        ("a / b;", "Operator.divide(a, b);"),
        ("a % b;", "Operator.modulo(a, b);"),
        ("a ** b;", "Operator.power(a, b);"),
        ("a < b;", "Operator.lessThan(a, b);"),
        ("a <= b;", "Operator.lessOrEqual(a, b);"),
        ("a > b;", "Operator.greaterThan(a, b);"),
        ("a >= b;", "Operator.greaterOrEqual(a, b);"),
        ("a == b;", "Operator.looseEqual(a, b);"),
        ("a != b;", "Operator.looseNotEqual(a, b);"),
        ("a === b;", "Operator.strictEqual(a, b);"),
        ("a !== b;", "Operator.strictNotEqual(a, b);"),
        ("a & b;", "Operator.logicalAnd(a, b);"),
        ("a | b;", "Operator.logicalOr(a, b);"),
        ("a ^ b;", "Operator.logicalXor(a, b);"),
        ("a << b;", "Operator.leftShift(a, b);"),
        ("a >> b;", "Operator.rightShift(a, b);"),
    ];
    for (source, expected) in cases {
        assert_eq!(rewrite(source), with_import(&format!("{}\n", expected)), "{}", source);
    }
}

#[test]
fn test_operators_left_alone() {
    for source in [
        "a >>> b;",
        "a && b;",
        "a || b;",
        "a ?? b;",
        "typeof a;",
        "void a;",
        "a in b;",
        "a instanceof B;",
        "a = b;",
        "a >>>= 1;",
        "a ||= b;",
    ] {
        assert_eq!(rewrite(source), format!("{}\n", source), "{}", source);
    }
}

#[test]
fn test_nested_operators_are_rewritten_inside_out() {
    assert_eq!(
        rewrite("a + b * c;"),
        with_import("Operator.add(a, Operator.multiply(b, c));\n")
    );
    assert_eq!(
        rewrite("(a + 1) * 2 < limit;"),
        with_import("Operator.lessThan(Operator.multiply(Operator.add(a, 1), 2), limit);\n")
    );
}

#[test]
fn test_literal_only_arithmetic_is_untouched() {
    let source = "var x = 1 + 2 * 3 - (4 / 5) ** 2;\nvar y = 0x10 << 2;\n";
    assert_eq!(rewrite(source), source);
}

#[test]
fn test_literal_subtree_kept_inside_rewritten_parent() {
    assert_eq!(
        rewrite("1 + 2 + a;"),
        with_import("Operator.add(1 + 2, a);\n")
    );
}

#[test]
fn test_string_literals_are_not_numeric_literals() {
    assert_eq!(rewrite("'a' + 'b';"), with_import("Operator.add('a', 'b');\n"));
}

#[test]
fn test_compound_assignment() {
    assert_eq!(rewrite("a += 2;"), with_import("a = Operator.add(a, 2);\n"));
    assert_eq!(
        rewrite("o.total *= rate;"),
        with_import("o.total = Operator.multiply(o.total, rate);\n")
    );
    assert_eq!(
        rewrite("m[k] <<= 1;"),
        with_import("m[k] = Operator.leftShift(m[k], 1);\n")
    );
}

#[test]
fn test_compound_assignment_value_is_rewritten_first() {
    assert_eq!(
        rewrite("a -= b * c;"),
        with_import("a = Operator.subtract(a, Operator.multiply(b, c));\n")
    );
}

#[test]
fn test_prefix_unary() {
    assert_eq!(rewrite("-a;"), with_import("Operator.negate(a);\n"));
    assert_eq!(rewrite("+o.x;"), with_import("Operator.positive(o.x);\n"));
    assert_eq!(rewrite("!flag;"), with_import("Operator.not(flag);\n"));
    assert_eq!(rewrite("~mask;"), with_import("Operator.logicalNot(mask);\n"));
}

#[test]
fn test_prefix_unary_on_other_operands_is_untouched() {
    assert_eq!(rewrite("-1;"), "-1;\n");
    assert_eq!(rewrite("!f();"), "!f();\n");
    // The operand becomes a call, which is not a plain name or property
    assert_eq!(
        rewrite("-(a + b);"),
        with_import("-Operator.add(a, b);\n")
    );
}

#[test]
fn test_prefix_update() {
    assert_eq!(rewrite("++a;"), with_import("a = Operator.increment(a);\n"));
    assert_eq!(
        rewrite("--o.n;"),
        with_import("o.n = Operator.decrement(o.n);\n")
    );
}

#[test]
fn test_postfix_update_on_name() {
    assert_eq!(
        rewrite("a++;"),
        with_import("var _temp;\n_temp = a, a = Operator.increment(_temp), _temp;\n")
    );
    assert_eq!(
        rewrite("x = a--;"),
        with_import("var _temp;\nx = (_temp = a, a = Operator.decrement(_temp), _temp);\n")
    );
}

#[test]
fn test_postfix_update_on_property() {
    assert_eq!(
        rewrite("o.count++;"),
        with_import(
            "var _temp;\n_temp = o.count, o.count = Operator.increment(_temp), _temp;\n"
        )
    );
    assert_eq!(
        rewrite("this.n++;"),
        with_import("var _temp;\n_temp = this.n, this.n = Operator.increment(_temp), _temp;\n")
    );
}

#[test]
fn test_postfix_update_captures_object_and_key_once() {
    assert_eq!(
        rewrite("f().n--;"),
        with_import(
            "var _obj, _temp;\n_obj = f(), _temp = _obj.n, _obj.n = Operator.decrement(_temp), _temp;\n"
        )
    );
    assert_eq!(
        rewrite("o[k]++;"),
        with_import(
            "var _key, _temp;\n_key = k, _temp = o[_key], o[_key] = Operator.increment(_temp), _temp;\n"
        )
    );
    assert_eq!(
        rewrite("o['k']++;"),
        with_import("var _temp;\n_temp = o['k'], o['k'] = Operator.increment(_temp), _temp;\n")
    );
}

#[test]
fn test_hidden_names_avoid_existing_identifiers() {
    assert_eq!(
        rewrite("var _temp = 1;\n_temp++;"),
        with_import(
            "var _temp2;\nvar _temp = 1;\n_temp2 = _temp, _temp = Operator.increment(_temp2), _temp2;\n"
        )
    );
}

#[test]
fn test_each_postfix_gets_its_own_name() {
    assert_eq!(
        rewrite("a++;\nb++;"),
        with_import(
            "var _temp, _temp2;\n_temp = a, a = Operator.increment(_temp), _temp;\n_temp2 = b, b = Operator.increment(_temp2), _temp2;\n"
        )
    );
}

#[test]
fn test_hidden_names_hoisted_into_enclosing_function() {
    let source = "function f(a) {\n  return a++;\n}\n";
    assert_eq!(
        rewrite(source),
        with_import(
            "function f(a) {\n  var _temp;\n  return _temp = a, a = Operator.increment(_temp), _temp;\n}\n"
        )
    );
}

#[test]
fn test_unit_directive_stays_first() {
    assert_eq!(
        rewrite("'use strict';\na++;"),
        "'use strict';\nimport { Operator } from 'macaroni';\nvar _temp;\n_temp = a, a = Operator.increment(_temp), _temp;\n"
    );
}

#[test]
fn test_function_directive_stays_first() {
    let source = "function f() {\n  'use strict';\n  x++;\n}\n";
    assert_eq!(
        rewrite(source),
        with_import(
            "function f() {\n  'use strict';\n  var _temp;\n  _temp = x, x = Operator.increment(_temp), _temp;\n}\n"
        )
    );
}

#[test]
fn test_lazy_import_goes_after_directives() {
    let config = RewriteConfig::default().with_import_style(ImportStyle::Lazy);
    assert_eq!(
        transform("'use strict';\nvar n = a + b;", &config).unwrap(),
        "'use strict';\nconst { Operator } = require('macaroni');\nvar n = Operator.add(a, b);\n"
    );
}

#[test]
fn test_destructuring_assignment_is_untouched() {
    assert_eq!(rewrite("[a, b] = pair;"), "[a, b] = pair;\n");
    assert_eq!(rewrite("({ a } = o);"), "({ a } = o);\n");
}

#[test]
fn test_no_rewrite_means_no_import() {
    let source = "import x from 'x';\nvar a = b;\nf(a);\n";
    assert_eq!(rewrite(source), source);
}

#[test]
fn test_import_placed_after_last_import() {
    let source = "import a from 'a';\nimport { b } from 'b';\nvar c = a + b;\n";
    assert_eq!(
        rewrite(source),
        "import a from 'a';\nimport { b } from 'b';\nimport { Operator } from 'macaroni';\nvar c = Operator.add(a, b);\n"
    );
}

#[test]
fn test_import_inserted_once_for_many_rewrites() {
    let mut program = parse_program("a + b;\nc * d;\n-e;\nf++;").unwrap();
    let outcome = rewrite_program(&mut program, &RewriteConfig::default());
    assert_eq!(outcome.rewrites, 4);
    assert!(outcome.import_inserted);
    let imports = program.body.iter().filter(|s| s.is_import()).count();
    assert_eq!(imports, 1);
    assert_eq!(outcome.hidden_names, ["_temp"]);
}

#[test]
fn test_lazy_import_style() {
    let config = RewriteConfig::default().with_import_style(ImportStyle::Lazy);
    assert_eq!(
        transform("a + b;", &config).unwrap(),
        "const { Operator } = require('macaroni');\nOperator.add(a, b);\n"
    );
}

#[test]
fn test_lazy_import_goes_after_existing_imports() {
    let config = RewriteConfig::default().with_import_style(ImportStyle::Lazy);
    assert_eq!(
        transform("import x from 'x';\nx - 1;", &config).unwrap(),
        "import x from 'x';\nconst { Operator } = require('macaroni');\nOperator.subtract(x, 1);\n"
    );
}

#[test]
fn test_skip_import() {
    let config = RewriteConfig::default().with_skip_import(true);
    assert_eq!(transform("a + b;", &config).unwrap(), "Operator.add(a, b);\n");
}

#[test]
fn test_custom_runtime_binding_and_module() {
    let config = RewriteConfig::from_toml_str(
        "runtimeBinding = \"Ops\"\nruntimeModule = \"@acme/ops\"",
    )
    .unwrap();
    assert_eq!(
        transform("a % b;", &config).unwrap(),
        "import { Ops } from '@acme/ops';\nOps.modulo(a, b);\n"
    );
}

#[test]
fn test_rewriting_output_again_changes_nothing() {
    let once = rewrite("var x = a++ + b * c;\nx -= 1;\n");
    let mut program = parse_program(&once).unwrap();
    let outcome = rewrite_program(&mut program, &RewriteConfig::default());
    assert_eq!(outcome.rewrites, 0);
    assert!(!outcome.import_inserted);
    assert_eq!(print_program(&program), once);
}

#[test]
fn test_rewrites_reach_every_statement_kind() {
    let source = "\
for (let i = 0; i < n; i++) {
  if (x == y) {
    total += i;
  } else {
    while (!done) {
      done = check(a - b);
    }
  }
}
";
    let expected = "\
import { Operator } from 'macaroni';
var _temp;
for (let i = 0; Operator.lessThan(i, n); _temp = i, i = Operator.increment(_temp), _temp) {
  if (Operator.looseEqual(x, y)) {
    total = Operator.add(total, i);
  } else {
    while (Operator.not(done)) {
      done = check(Operator.subtract(a, b));
    }
  }
}
";
    assert_eq!(rewrite(source), expected);
}

#[test]
fn test_deeply_nested_input_is_a_parse_error() {
    let source = format!("x = {}a + 1{};", "(".repeat(300), ")".repeat(300));
    let err = transform(&source, &RewriteConfig::default()).unwrap_err();
    assert_eq!(err.message, "Nesting too deep");

    let terms: Vec<String> = (0..20_000).map(|i| format!("a{}", i)).collect();
    let chain = format!("x + {};", terms.join(" + "));
    assert!(transform(&chain, &RewriteConfig::default()).is_err());
}

#[test]
fn test_unicode_identifiers_are_rewritten() {
    let expected = with_import("var é = Operator.add(naïve, 1);\n");
    assert_eq!(rewrite("var é = naïve + 1;"), expected);
}
