use crate::{Arg, PipeError, format_cmd, quote};

#[test]
fn quote_basic() {
    assert_eq!(quote(""), "''");
    assert_eq!(quote("hello"), "hello");
    assert_eq!(quote("some/path-1.txt"), "some/path-1.txt");
    assert_eq!(quote("hello world"), "'hello world'");
    assert_eq!(quote("don't"), r#"'don'\''t'"#);
    assert_eq!(quote("a|b;c"), "'a|b;c'");
    assert_eq!(quote("$HOME"), "'$HOME'");
    assert_eq!(quote("two\nlines"), "'two\nlines'");
}

#[test]
fn format_substitutes_in_order() {
    let got = format_cmd("ls -l {} | grep {} | wc", &["foo 1".into(), "bar$baz".into()]).unwrap();
    assert_eq!(got, "ls -l 'foo 1' | grep 'bar$baz' | wc");
}

#[test]
fn format_quotes_placeholder_lookalikes() {
    // A substituted value containing "{}" is data, not a placeholder.
    let got = format_cmd("echo {} | wc {}", &["{}".into(), "-l".into()]).unwrap();
    assert_eq!(got, "echo '{}' | wc -l");
    // Only the exact "{}" token is a placeholder; surrounding braces are
    // literal text.
    assert_eq!(format_cmd("echo {{}}", &["x".into()]).unwrap(), "echo {x}");
}

#[test]
fn format_raw_passthrough() {
    let got = format_cmd("echo {} {}", &[Arg::raw("a | b"), "c d".into()]).unwrap();
    assert_eq!(got, "echo a | b 'c d'");
}

#[test]
fn format_arity_ok() {
    assert_eq!(format_cmd("f", &[]).unwrap(), "f");
    assert_eq!(format_cmd("f {}", &["x".into()]).unwrap(), "f x");
    assert_eq!(
        format_cmd("f {} {} {}", &["a".into(), "b".into(), "c".into()]).unwrap(),
        "f a b c"
    );
}

#[test]
fn format_arity_mismatch() {
    fn assert_arity(result: Result<String, PipeError>, expected: usize, got: usize) {
        match result {
            Err(PipeError::TemplateArity {
                expected: e,
                got: g,
                ..
            }) => {
                assert_eq!((e, g), (expected, got));
            }
            other => panic!("expected TemplateArity, got {:?}", other),
        }
    }
    assert_arity(format_cmd("f", &["x".into()]), 0, 1);
    assert_arity(format_cmd("f {}", &[]), 1, 0);
    assert_arity(format_cmd("f {}", &["a".into(), "b".into()]), 1, 2);
    assert_arity(format_cmd("f {} {} {}", &["a".into(), "b".into()]), 3, 2);
    assert_arity(
        format_cmd(
            "f {} {} {}",
            &["a".into(), "b".into(), "c".into(), "d".into()],
        ),
        3,
        4,
    );
}

#[test]
fn arg_from_impls() {
    assert_eq!(Arg::from("x"), Arg::Value("x".to_owned()));
    assert_eq!(Arg::from("x".to_owned()), Arg::Value("x".to_owned()));
    assert_eq!(Arg::raw("a | b"), Arg::Raw("a | b".to_owned()));
}
