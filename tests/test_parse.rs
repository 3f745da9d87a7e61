use assert_matches::assert_matches;
use flagkit::{BoxError, Duration, ErrorKind, FlagSet};
use std::net::IpAddr;

mod common;
use common::*;

#[test]
fn test_alias_and_name_set_the_same_variable() {
    let mut timeout = Duration::ZERO;

    {
        let mut flags = FlagSet::new("testing");
        flags.duration(&mut timeout, "timeout", "t", Duration::from_secs(10), "just a timeout");
        flags.parse(["-t", "20s"]).unwrap();
        assert_eq!(flags.n_flag(), 1);
        assert_eq!(flags.lookup("timeout").unwrap().value(), "20s");
        assert!(flags.lookup("t").unwrap().changed());
    }
    assert_eq!(timeout, Duration::from_secs(20));

    {
        let mut flags = FlagSet::new("testing");
        flags.duration(&mut timeout, "timeout", "t", Duration::from_secs(10), "just a timeout");
        flags.parse(["--timeout=1m30s"]).unwrap();
    }
    assert_eq!(timeout, Duration::from_secs(90));

    {
        let mut flags = FlagSet::new("testing");
        flags.duration(&mut timeout, "timeout", "t", Duration::from_secs(10), "just a timeout");
        flags.parse::<_, &str>([]).unwrap();
        assert!(flags.is_parsed());
        assert_eq!(flags.n_flag(), 0);
    }
    assert_eq!(timeout, Duration::from_secs(10));
}

#[test]
fn test_long_alias_for_short_name() {
    let mut n = 0u32;
    {
        let mut flags = FlagSet::new("testing");
        flags.uint32(&mut n, "n", "count", 3, "how many");
        flags.parse(["--count", "7"]).unwrap();
    }
    assert_eq!(n, 7);

    {
        let mut flags = FlagSet::new("testing");
        flags.uint32(&mut n, "n", "count", 3, "how many");
        flags.parse(["-n", "8"]).unwrap();
    }
    assert_eq!(n, 8);
}

#[test]
fn test_bool_flags() {
    let mut verbose = false;
    let mut color = true;

    {
        let mut flags = FlagSet::new("testing");
        flags.bool(&mut verbose, "verbose", "v", false, "log more");
        flags.bool(&mut color, "color", "", true, "use color");
        flags.parse(["-v", "--color=no"]).unwrap();
        assert_eq!(flags.n_flag(), 2);
    }
    assert!(verbose);
    assert!(!color);

    {
        let mut flags = FlagSet::new("testing");
        flags.bool(&mut verbose, "verbose", "v", false, "log more");
        flags.bool(&mut color, "color", "", true, "use color");
        flags.parse(["--verbose=f", "--color"]).unwrap();
    }
    assert!(!verbose);
    assert!(color);
}

#[test]
fn test_bad_bool() {
    let mut verbose = false;
    let mut flags = FlagSet::new("testing");
    flags.bool(&mut verbose, "verbose", "v", false, "log more");

    let result = flags.parse(["--verbose=maybe"]);
    assert_error_contains_text!(result, ["invalid value 'maybe' for '--verbose'", "invalid bool"]);
    assert_matches!(result.unwrap_err().kind(), ErrorKind::ValueValidation);
}

#[test]
fn test_bool_does_not_take_a_separate_value() {
    let mut verbose = true;
    {
        let mut flags = FlagSet::new("testing");
        flags.bool(&mut verbose, "verbose", "v", false, "log more");
        flags.parse(["--verbose", "false"]).unwrap();
        assert_eq!(flags.args(), ["false"]);
    }
    assert!(verbose);
}

#[test]
fn test_negative_values() {
    let mut offset = 0i64;
    let mut scale = 0.0f64;
    let mut delay = Duration::ZERO;
    {
        let mut flags = FlagSet::new("testing");
        flags.int64(&mut offset, "offset", "o", 0, "");
        flags.float64(&mut scale, "scale", "", 1.0, "");
        flags.duration(&mut delay, "delay", "", Duration::ZERO, "");
        flags
            .parse(["-o", "-5", "--scale", "-0.25", "--delay=-1.5s"])
            .unwrap();
    }
    assert_eq!(offset, -5);
    assert_eq!(scale, -0.25);
    assert_eq!(delay, -Duration::from_millis(1500));
}

#[test]
fn test_positional_args() {
    let mut verbose = false;
    let mut name = String::new();

    let mut flags = FlagSet::new("testing");
    flags.bool(&mut verbose, "verbose", "v", false, "");
    flags.string(&mut name, "name", "", "anon".into(), "");
    flags
        .parse(["-v", "first", "--name", "x", "second"])
        .unwrap();

    // Everything after the first positional is left alone
    assert_eq!(flags.args(), ["first", "--name", "x", "second"]);
    assert_eq!(flags.n_arg(), 4);
    assert_eq!(flags.arg(0), "first");
    assert_eq!(flags.arg(3), "second");
    assert_eq!(flags.arg(4), "");
    assert_eq!(flags.n_flag(), 1);
    assert_eq!(flags.lookup("name").unwrap().value(), "anon");
}

#[test]
fn test_double_dash_ends_flags() {
    let mut verbose = false;
    {
        let mut flags = FlagSet::new("testing");
        flags.bool(&mut verbose, "verbose", "v", false, "");
        flags.parse(["--", "-v", "file"]).unwrap();
        assert_eq!(flags.args(), ["-v", "file"]);
        assert_eq!(flags.n_flag(), 0);
    }
    assert!(!verbose);
}

#[test]
fn test_unknown_flag() {
    let mut verbose = false;
    let mut flags = FlagSet::new("testing");
    flags.bool(&mut verbose, "verbose", "v", false, "");

    let result = flags.parse(["--verbos"]);
    assert_error_contains_text!(result, ["--verbos"]);
    let err = result.unwrap_err();
    assert_matches!(err.kind(), ErrorKind::UnknownArgument);
    assert!(!err.is_help());
}

#[test]
fn test_missing_value() {
    let mut n = 0i32;
    let mut flags = FlagSet::new("testing");
    flags.int32(&mut n, "n", "", 0, "");

    let result = flags.parse(["-n"]);
    assert_error_contains_text!(result, ["-n"]);
    assert!(!result.unwrap_err().is_help());
}

#[test]
fn test_malformed_slice_leaves_value_alone() {
    let mut ids = Vec::new();
    {
        let mut flags = FlagSet::new("testing");
        flags.int64_slice(&mut ids, "ids", "", vec![1, 2, 3], ",", "just ids");

        let result = flags.parse(["--ids", "1,2,3.3,4"]);
        assert_error_contains_text!(
            result,
            ["invalid value '1,2,3.3,4' for '--ids'", "index 2", "\"3.3\""],
            not ["index 1"]
        );
        assert_matches!(result.unwrap_err().kind(), ErrorKind::ValueValidation);
        assert_eq!(flags.n_flag(), 0);
    }
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn test_malformed_duration_element() {
    let mut delays = Vec::new();
    let mut flags = FlagSet::new("testing");
    flags.duration_slice(&mut delays, "delays", "d", vec![], ",", "");

    let result = flags.parse(["-d", "1s,2day"]);
    assert_error_contains_text!(
        result,
        ["invalid element at index 1 (\"2day\"): unknown unit \"day\" in duration \"2day\""]
    );
}

#[test]
fn test_help() {
    let mut verbose = false;
    let mut flags = FlagSet::new("testing");
    flags.bool(&mut verbose, "verbose", "v", false, "log more");

    let result = flags.parse(["--help"]);
    assert_error_contains_text!(result, ["--verbose", "log more"]);
    let err = result.unwrap_err();
    assert!(err.is_help());
    assert_eq!(err.exit_code(), 0);

    let err = flags.parse(["-h"]).unwrap_err();
    assert!(err.is_help());
}

#[test]
fn test_help_names_can_be_claimed() {
    let mut host = String::new();
    {
        let mut flags = FlagSet::new("testing");
        flags.string(&mut host, "host", "h", "localhost".into(), "host to dial");
        flags.parse(["-h", "example.com"]).unwrap();

        let err = flags.parse(["--help"]).unwrap_err();
        assert!(err.is_help());
    }
    assert_eq!(host, "example.com");
}

#[test]
fn test_short_help_survives_claimed_long_help() {
    let mut topic = String::new();
    let mut flags = FlagSet::new("testing");
    flags.string(&mut topic, "help", "", String::new(), "topic to explain");

    let err = flags.parse(["-h"]).unwrap_err();
    assert!(err.is_help());

    flags.parse(["--help", "flags"]).unwrap();
    assert_eq!(flags.lookup("help").unwrap().value(), "flags");
}

#[test]
fn test_both_help_names_claimed() {
    let mut topic = String::new();
    let mut host = String::new();
    let mut flags = FlagSet::new("testing");
    flags.string(&mut topic, "help", "", String::new(), "");
    flags.string(&mut host, "h", "", String::new(), "");

    flags.parse(["-h", "example.com", "--help", "flags"]).unwrap();
    assert_eq!(flags.n_flag(), 2);
}

#[test]
fn test_visit_reports_set_flags_in_name_order() {
    let mut a = 0u64;
    let mut b = 0u64;
    let mut c = 0u64;

    let mut flags = FlagSet::new("testing");
    flags.uint64(&mut c, "charlie", "c", 0, "");
    flags.uint64(&mut a, "alpha", "a", 0, "");
    flags.uint64(&mut b, "bravo", "b", 0, "");
    flags.parse(["-c", "3", "--alpha", "1"]).unwrap();

    let mut visited = Vec::new();
    flags.visit(|flag| visited.push((flag.name().to_owned(), flag.value())));
    assert_eq!(
        visited,
        [("alpha".to_owned(), "1".to_owned()), ("charlie".to_owned(), "3".to_owned())]
    );

    let mut all = Vec::new();
    flags.visit_all(|flag| all.push(flag.name().to_owned()));
    assert_eq!(all, ["alpha", "bravo", "charlie"]);
}

#[test]
fn test_func_flag() {
    let mut seen = Vec::new();
    {
        let mut flags = FlagSet::new("testing");
        flags.func("tag", "", "a `tag` to attach", |raw: &str| -> Result<(), BoxError> {
            if raw.contains(' ') {
                return Err(format!("tag {raw:?} has a space").into());
            }
            seen.push(raw.to_owned());
            Ok(())
        });
        flags.parse(["--tag", "blue"]).unwrap();

        let result = flags.parse(["--tag", "sky blue"]);
        assert_error_contains_text!(result, ["has a space"]);
    }
    assert_eq!(seen, ["blue"]);
}

#[test]
fn test_func_flag_sees_every_occurrence() {
    let mut seen = Vec::new();
    {
        let mut flags = FlagSet::new("testing");
        flags.func("tag", "t", "a `tag` to attach", |raw: &str| -> Result<(), BoxError> {
            seen.push(raw.to_owned());
            Ok(())
        });
        assert!(flags.lookup("tag").unwrap().is_repeatable());
        flags.parse(["--tag", "a", "-t", "b", "--tag=c", "rest"]).unwrap();
        assert_eq!(flags.n_flag(), 1);
        assert_eq!(flags.args(), ["rest"]);
    }
    assert_eq!(seen, ["a", "b", "c"]);
}

#[test]
fn test_other_flags_reject_repeats() {
    let mut n = 0i64;
    let mut flags = FlagSet::new("testing");
    flags.int64(&mut n, "n", "", 0, "");
    assert!(!flags.lookup("n").unwrap().is_repeatable());

    let result = flags.parse(["-n", "1", "-n", "2"]);
    assert_error_contains_text!(result, ["-n"]);
    assert_matches!(result.unwrap_err().kind(), ErrorKind::ArgumentConflict);
}

#[test]
fn test_text_flag() {
    let mut ip: IpAddr = [0, 0, 0, 0].into();
    {
        let mut flags = FlagSet::new("testing");
        flags.text(&mut ip, "ip", "", [192, 168, 0, 100].into(), "`IP address` to parse");
        assert_eq!(flags.lookup("ip").unwrap().default_value(), "192.168.0.100");

        let err = flags.parse(["--ip", "localhost"]).unwrap_err();
        assert_matches!(err.kind(), ErrorKind::ValueValidation);

        flags.parse(["--ip=::1"]).unwrap();
    }
    assert_eq!(ip.to_string(), "::1");
}
