use super::*;
use pretty_assertions::assert_eq;
use sift_diagnostic::{Error, TypeError};
use sift_value::{Array, Sequence};

fn session() -> Session {
    Session::new(Arc::new(sift_eval::default_registry()), MapMode::Ordered)
}

fn lines(items: &[&str]) -> Value {
    let values = items.iter().map(|s| Value::string(s)).collect();
    Value::seq(Sequence::wrap(Value::array(Array::from_values(values))))
}

#[test]
fn test_compile_reports_the_result_type() {
    let mut session = session();
    let program = session.compile("sum(int(@))", &Type::seq(Type::string())).unwrap();
    assert_eq!(program.result, Type::int());
}

#[test]
fn test_run_and_render() {
    let mut session = session();
    let program = session
        .compile("{@ -> sum(1) : @}", &Type::seq(Type::string()))
        .unwrap();
    let value = session.run(&program, lines(&["b", "a", "b"])).unwrap();
    assert_eq!(session.render(&value).unwrap(), "a\t1\nb\t2");
}

#[test]
fn test_compile_errors_surface_by_layer() {
    let mut session = session();
    let input = Type::seq(Type::string());
    assert!(matches!(session.compile("1 +", &input), Err(Error::Parse(_))));
    match session.compile("y + 1", &input) {
        Err(Error::Type(e)) => assert_eq!(e, TypeError::UndefinedVariable("y".to_string())),
        other => panic!("expected a type error, got {other:?}"),
    }
    assert!(matches!(session.compile("nope(@)", &input), Err(Error::Resolution(_))));
}

#[test]
fn test_fork_keeps_settings() {
    let session = session().with_seed(Some(7)).with_verbosity(0);
    let fork = session.fork();
    assert_eq!(fork.seed(), Some(7));
    assert_eq!(fork.map_mode(), MapMode::Ordered);
}
