mod common;

#[cfg(test)]
mod classes_tests {
    use crate::common::{run_ok, runtime_error, session};
    use pretty_assertions::assert_eq;
    use rox::ast::Ident;
    use rox::value::Value;

    #[test]
    fn class_and_instance_printing() {
        let source = r#"
class Bagel {}
print Bagel;
print Bagel();
"#;

        assert_eq!(run_ok(source), "Bagel\nBagel instance\n");
    }

    #[test]
    fn fields_are_created_on_assignment() {
        let source = r#"
class Box {}
var box = Box();
box.value = 1;
print box.value;
box.value = "replaced";
print box.value;
"#;

        assert_eq!(run_ok(source), "1\nreplaced\n");
    }

    #[test]
    fn methods_see_this() {
        let source = r#"
class Person {
  sayName() {
    print this.name;
  }
}

var jane = Person();
jane.name = "Jane";
var method = jane.sayName;
method();
"#;

        assert_eq!(run_ok(source), "Jane\n");
    }

    #[test]
    fn bound_method_keeps_its_receiver() {
        let source = r#"
class Person {
  sayName() {
    print this.name;
  }
}

var jane = Person();
jane.name = "Jane";
var bill = Person();
bill.name = "Bill";

bill.sayName = jane.sayName;
bill.sayName();
"#;

        assert_eq!(run_ok(source), "Jane\n");
    }

    #[test]
    fn fields_shadow_methods() {
        let source = r#"
class A {
  m() { return "method"; }
}
var a = A();
print a.m();
a.m = "field";
print a.m;
"#;

        assert_eq!(run_ok(source), "method\nfield\n");
    }

    #[test]
    fn initializer_receives_arguments() {
        let source = r#"
class Point {
  init(x, y) {
    this.x = x;
    this.y = y;
  }
}
var p = Point(1, 2);
print p.x + p.y;
"#;

        assert_eq!(run_ok(source), "3\n");
    }

    #[test]
    fn class_arity_follows_initializer() {
        assert_eq!(
            runtime_error("class Point { init(x, y) {} }\nPoint(1);").1,
            "Expected 2 arguments but got 1.\n[line 2]"
        );
        assert_eq!(
            runtime_error("class Empty {}\nEmpty(1);").1,
            "Expected 0 arguments but got 1.\n[line 2]"
        );
    }

    #[test]
    fn calling_init_directly_returns_the_instance() {
        let source = r#"
class Foo {
  init() {
    this.count = 0;
  }
}
var foo = Foo();
foo.count = 5;
var again = foo.init();
print again == foo;
print foo.count;
"#;

        assert_eq!(run_ok(source), "true\n0\n");
    }

    #[test]
    fn early_return_in_initializer_still_yields_instance() {
        let source = r#"
class Foo {
  init() {
    return;
  }
}
print Foo();
print Foo().init();
"#;

        assert_eq!(run_ok(source), "Foo instance\nFoo instance\n");
    }

    #[test]
    fn methods_are_inherited() {
        let source = r#"
class Doughnut {
  cook() {
    print "Fry until golden brown.";
  }
}

class BostonCream < Doughnut {}

BostonCream().cook();
"#;

        assert_eq!(run_ok(source), "Fry until golden brown.\n");
    }

    #[test]
    fn overriding_and_super_calls() {
        let source = r#"
class Doughnut {
  cook() {
    print "Fry until golden brown.";
  }
}

class BostonCream < Doughnut {
  cook() {
    super.cook();
    print "Pipe full of custard and coat with chocolate.";
  }
}

BostonCream().cook();
"#;

        assert_eq!(
            run_ok(source),
            "Fry until golden brown.\nPipe full of custard and coat with chocolate.\n"
        );
    }

    #[test]
    fn super_is_bound_statically() {
        let source = r#"
class A {
  method() {
    print "A method";
  }
}

class B < A {
  method() {
    print "B method";
  }

  test() {
    super.method();
  }
}

class C < B {}

C().test();
"#;

        assert_eq!(run_ok(source), "A method\n");
    }

    #[test]
    fn super_method_is_bound_to_this() {
        let source = r#"
class Base {
  init(name) {
    this.name = name;
  }
  greet() {
    return "hello " + this.name;
  }
}

class Derived < Base {
  init(name) {
    super.init(name);
  }
  greet() {
    var parent = super.greet;
    return parent() + "!";
  }
}

print Derived("lox").greet();
"#;

        assert_eq!(run_ok(source), "hello lox!\n");
    }

    #[test]
    fn inherited_initializer_sets_arity() {
        assert_eq!(
            run_ok("class A { init(v) { this.v = v; } }\nclass B < A {}\nprint B(7).v;"),
            "7\n"
        );
    }

    #[test]
    fn undefined_property() {
        assert_eq!(
            runtime_error("class A {}\nvar a = A();\nprint a.missing;").1,
            "Undefined property 'missing'.\n[line 3]"
        );
    }

    #[test]
    fn undefined_super_method() {
        let source = "class A {}\nclass B < A {\n  m() { super.missing(); }\n}\nB().m();";

        assert_eq!(
            runtime_error(source).1,
            "Undefined property 'missing'.\n[line 3]"
        );
    }

    #[test]
    fn only_instances_have_properties() {
        assert_eq!(
            runtime_error("var x = 1;\nprint x.field;").1,
            "Only instances have properties.\n[line 2]"
        );
        assert_eq!(
            runtime_error("\"str\".field = 1;").1,
            "Only instances have fields.\n[line 1]"
        );
    }

    #[test]
    fn superclass_must_be_a_class() {
        assert_eq!(
            runtime_error("var NotAClass = \"nope\";\nclass Sub < NotAClass {}").1,
            "Superclass must be a class.\n[line 2]"
        );
    }

    #[test]
    fn local_classes_capture_their_scope() {
        let source = r#"
fun makeClass(greeting) {
  class Greeter {
    greet() {
      return greeting;
    }
  }
  return Greeter;
}

var G = makeClass("hi");
print G().greet();
print G;
"#;

        assert_eq!(run_ok(source), "hi\nGreeter\n");
    }

    #[test]
    fn instances_are_compared_by_identity() {
        let source = r#"
class A {}
var a = A();
var b = A();
print a == a;
print a == b;
print A == A;
"#;

        assert_eq!(run_ok(source), "true\nfalse\ntrue\n");
    }

    #[test]
    fn class_objects_expose_structure_to_the_host() {
        let (mut lox, _output) = session();

        lox.run("class Base {}\nclass Derived < Base { m() {} }\nvar d = Derived();")
            .expect("definitions");

        let globals = lox.interpreter().globals();

        let Value::Class(derived) = globals
            .borrow()
            .get(&Ident::new("Derived", 1))
            .expect("class defined")
        else {
            panic!("Derived is not a class");
        };

        assert_eq!(derived.name(), "Derived");
        assert_eq!(
            derived.superclass().map(|class| class.name().to_string()),
            Some("Base".to_string())
        );
        assert!(derived.find_method("m").is_some());
        assert!(derived.find_method("missing").is_none());

        let Value::Instance(instance) = globals
            .borrow()
            .get(&Ident::new("d", 1))
            .expect("instance defined")
        else {
            panic!("d is not an instance");
        };

        assert_eq!(instance.borrow().class().name(), "Derived");
    }

    #[test]
    fn self_referencing_instance_does_not_break_printing() {
        let source = r#"
class Node {}
var node = Node();
node.next = node;
print node.next.next;
"#;

        assert_eq!(run_ok(source), "Node instance\n");
    }
}
