mod common;

#[cfg(test)]
mod resolver_tests {
    use crate::common::{self, run_ok, static_errors};
    use pretty_assertions::assert_eq;

    #[test]
    fn reading_local_in_its_own_initializer() {
        assert_eq!(
            static_errors("var a = \"outer\";\n{\n  var a = a;\n}"),
            vec!["[line 3] Error at 'a': Can't read local variable in its own initializer."]
        );
    }

    #[test]
    fn global_initializer_may_read_previous_global() {
        assert_eq!(run_ok("var a = 1;\nvar a = a + 1;\nprint a;"), "2\n");
    }

    #[test]
    fn redeclaration_in_local_scope() {
        assert_eq!(
            static_errors("{\n  var a = 1;\n  var a = 2;\n}"),
            vec!["[line 3] Error at 'a': Already a variable with this name in this scope."]
        );
    }

    #[test]
    fn duplicate_parameters() {
        assert_eq!(
            static_errors("fun f(a, a) {}"),
            vec!["[line 1] Error at 'a': Already a variable with this name in this scope."]
        );
    }

    #[test]
    fn top_level_redeclaration_is_allowed() {
        assert_eq!(run_ok("var a = 1;\nvar a = 2;\nprint a;"), "2\n");
    }

    #[test]
    fn return_outside_function() {
        assert_eq!(
            static_errors("return 1;"),
            vec!["[line 1] Error at 'return': Can't return from top-level code."]
        );
    }

    #[test]
    fn return_value_from_initializer() {
        assert_eq!(
            static_errors("class A {\n  init() {\n    return 1;\n  }\n}"),
            vec!["[line 3] Error at 'return': Can't return a value from an initializer."]
        );
    }

    #[test]
    fn bare_return_in_initializer_is_allowed() {
        assert_eq!(
            run_ok("class A {\n  init() {\n    this.x = 1;\n    return;\n    this.x = 2;\n  }\n}\nprint A().x;"),
            "1\n"
        );
    }

    #[test]
    fn this_outside_class() {
        assert_eq!(
            static_errors("print this;"),
            vec!["[line 1] Error at 'this': Can't use 'this' outside of a class."]
        );
        assert_eq!(
            static_errors("fun f() { return this; }"),
            vec!["[line 1] Error at 'this': Can't use 'this' outside of a class."]
        );
    }

    #[test]
    fn super_outside_class() {
        assert_eq!(
            static_errors("super.foo();"),
            vec!["[line 1] Error at 'super': Can't use 'super' outside of a class."]
        );
    }

    #[test]
    fn super_without_superclass() {
        assert_eq!(
            static_errors("class A {\n  m() { super.m(); }\n}"),
            vec!["[line 2] Error at 'super': Can't use 'super' in a class with no superclass."]
        );
    }

    #[test]
    fn class_inheriting_from_itself() {
        assert_eq!(
            static_errors("class A < A {}"),
            vec!["[line 1] Error at 'A': A class can't inherit from itself."]
        );
    }

    #[test]
    fn every_static_error_is_reported() {
        assert_eq!(
            static_errors("return 1;\nprint this;\n{\n  var b = 1;\n  var b = 2;\n}"),
            vec![
                "[line 1] Error at 'return': Can't return from top-level code.",
                "[line 2] Error at 'this': Can't use 'this' outside of a class.",
                "[line 5] Error at 'b': Already a variable with this name in this scope.",
            ]
        );
    }

    #[test]
    fn static_errors_withhold_execution() {
        let (output, result) = common::run("print \"before\";\nreturn;");

        assert_eq!(output, "");
        assert!(result.is_err());
    }

    #[test]
    fn lexical_and_syntax_errors_are_reported_together() {
        assert_eq!(
            static_errors("var x = @;"),
            vec![
                "[line 1] Error: Unexpected character: @",
                "[line 1] Error at ';': Expect expression.",
            ]
        );
    }

    #[test]
    fn closures_bind_to_declaration_scope() {
        let source = r#"
var a = "global";
{
  fun showA() {
    print a;
  }

  showA();
  var a = "block";
  showA();
}
"#;

        assert_eq!(run_ok(source), "global\nglobal\n");
    }

    #[test]
    fn shadowing_resolves_to_innermost() {
        let source = r#"
var a = "global";
{
  var a = "outer";
  {
    var a = "inner";
    print a;
  }
  print a;
}
print a;
"#;

        assert_eq!(run_ok(source), "inner\nouter\nglobal\n");
    }

    #[test]
    fn functions_may_recurse_and_reference_later_globals() {
        let source = r#"
fun fib(n) {
  if (n < 2) return n;
  return fib(n - 1) + fib(n - 2);
}

fun callLater() {
  return later;
}

var later = "defined afterwards";
print fib(10);
print callLater();
"#;

        assert_eq!(run_ok(source), "55\ndefined afterwards\n");
    }

    #[test]
    fn local_function_can_recurse() {
        let source = r#"
{
  fun count(n) {
    if (n > 0) count(n - 1);
    print n;
  }
  count(2);
}
"#;

        assert_eq!(run_ok(source), "0\n1\n2\n");
    }
}
