//! Argument guards
//!
//! Every malformed input is classified before anything reaches the
//! engine: wrong type is `TypeArgument`, a negative number where an
//! unsigned one belongs is `RangeUnderflow`, a number too wide for its
//! wire field is `RangeOverflow`. Server-side domain checks (epoch,
//! future) are not done here; those belong to the engine.

use tidemark_core::{Error, NanoTime, Namespace, Result, SetName};
use tidemark_engine::InfoPolicy;

use crate::arg::Arg;

/// Validated arguments for a truncate call.
#[derive(Debug, Clone, PartialEq)]
pub struct TruncateArgs {
    /// Namespace to truncate
    pub namespace: Namespace,
    /// Set scope; `None` means the whole namespace
    pub set: Option<SetName>,
    /// Threshold last-update time; zero means "now"
    pub threshold: NanoTime,
    /// Optional per-request policy
    pub policy: Option<InfoPolicy>,
}

/// Validate a namespace argument: non-empty text.
pub fn namespace_arg(arg: &Arg) -> Result<Namespace> {
    match arg {
        Arg::Text(name) => Namespace::new(name.as_str()),
        other => Err(Error::TypeArgument(format!(
            "namespace must be text, got {}",
            other.type_name()
        ))),
    }
}

/// Validate a set argument.
///
/// Empty text and null both mean "the whole namespace" and map to
/// `None`; non-empty text names a set.
pub fn set_arg(arg: &Arg) -> Result<Option<SetName>> {
    match arg {
        Arg::Null => Ok(None),
        Arg::Text(name) if name.is_empty() => Ok(None),
        Arg::Text(name) => SetName::new(name.as_str()).map(Some),
        other => Err(Error::TypeArgument(format!(
            "set must be text or null, got {}",
            other.type_name()
        ))),
    }
}

/// Validate a threshold argument: a non-negative integer that fits in
/// u64 nanoseconds. Zero is the "now" sentinel and passes unchanged.
pub fn threshold_arg(arg: &Arg) -> Result<NanoTime> {
    match arg {
        Arg::Int(n) if *n < 0 => Err(Error::RangeUnderflow(format!(
            "threshold must be non-negative, got {}",
            n
        ))),
        Arg::Int(n) if *n > u64::MAX as i128 => Err(Error::RangeOverflow(format!(
            "threshold {} does not fit in 64 bits",
            n
        ))),
        Arg::Int(n) => Ok(NanoTime::from_nanos(*n as u64)),
        other => Err(Error::TypeArgument(format!(
            "threshold must be an integer, got {}",
            other.type_name()
        ))),
    }
}

/// Validate an optional policy argument: null or a map whose `timeout`
/// key (if present) is a millisecond count fitting in u32. Unknown
/// keys are ignored.
pub fn policy_arg(arg: &Arg) -> Result<Option<InfoPolicy>> {
    let map = match arg {
        Arg::Null => return Ok(None),
        Arg::Map(map) => map,
        other => {
            return Err(Error::TypeArgument(format!(
                "policy must be a map or null, got {}",
                other.type_name()
            )))
        }
    };

    let mut policy = InfoPolicy::default();
    if let Some(timeout) = map.get("timeout") {
        match timeout {
            Arg::Int(ms) if *ms < 0 => {
                return Err(Error::RangeUnderflow(format!(
                    "policy timeout must be non-negative, got {}",
                    ms
                )))
            }
            Arg::Int(ms) if *ms > u32::MAX as i128 => {
                return Err(Error::RangeOverflow(format!(
                    "policy timeout {} does not fit in 32 bits",
                    ms
                )))
            }
            Arg::Int(ms) => policy = InfoPolicy::with_timeout_ms(*ms as u64),
            other => {
                return Err(Error::TypeArgument(format!(
                    "policy timeout must be an integer, got {}",
                    other.type_name()
                )))
            }
        }
    }
    Ok(Some(policy))
}

/// Validate a positional truncate argument list:
/// `(namespace, set, threshold[, policy])`.
pub fn parse_truncate_args(args: &[Arg]) -> Result<TruncateArgs> {
    if args.len() < 3 {
        return Err(Error::TypeArgument(format!(
            "truncate takes namespace, set and threshold; got {} argument(s)",
            args.len()
        )));
    }
    if args.len() > 4 {
        return Err(Error::TypeArgument(format!(
            "truncate takes at most 4 arguments, got {}",
            args.len()
        )));
    }

    Ok(TruncateArgs {
        namespace: namespace_arg(&args[0])?,
        set: set_arg(&args[1])?,
        threshold: threshold_arg(&args[2])?,
        policy: match args.get(3) {
            Some(arg) => policy_arg(arg)?,
            None => None,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    fn policy_map(timeout: Arg) -> Arg {
        let mut map = HashMap::new();
        map.insert("timeout".to_string(), timeout);
        Arg::Map(map)
    }

    #[test]
    fn test_namespace_accepts_text() {
        assert_eq!(namespace_arg(&Arg::from("test")).unwrap().as_str(), "test");
    }

    #[test]
    fn test_namespace_rejects_non_text() {
        for bad in [
            Arg::Null,
            Arg::Bool(true),
            Arg::Int(5),
            Arg::Float(1.0),
            Arg::Bytes(vec![1]),
            Arg::List(vec![]),
            Arg::Map(HashMap::new()),
        ] {
            assert!(matches!(
                namespace_arg(&bad).unwrap_err(),
                Error::TypeArgument(_)
            ));
        }
    }

    #[test]
    fn test_namespace_rejects_empty() {
        assert!(matches!(
            namespace_arg(&Arg::from("")).unwrap_err(),
            Error::TypeArgument(_)
        ));
    }

    #[test]
    fn test_set_empty_text_means_whole_namespace() {
        assert_eq!(set_arg(&Arg::from("")).unwrap(), None);
        assert_eq!(set_arg(&Arg::Null).unwrap(), None);
        assert_eq!(
            set_arg(&Arg::from("demo")).unwrap().unwrap().as_str(),
            "demo"
        );
    }

    #[test]
    fn test_set_rejects_non_text() {
        assert!(matches!(
            set_arg(&Arg::Int(1)).unwrap_err(),
            Error::TypeArgument(_)
        ));
    }

    #[test]
    fn test_threshold_zero_is_sentinel() {
        assert_eq!(
            threshold_arg(&Arg::Int(0)).unwrap(),
            NanoTime::from_nanos(0)
        );
    }

    #[test]
    fn test_threshold_negative_underflows() {
        assert!(matches!(
            threshold_arg(&Arg::Int(-1)).unwrap_err(),
            Error::RangeUnderflow(_)
        ));
    }

    #[test]
    fn test_threshold_beyond_u64_overflows() {
        let err = threshold_arg(&Arg::Int(u64::MAX as i128 + 1)).unwrap_err();
        assert!(matches!(err, Error::RangeOverflow(_)));
        assert!(err.is_client_side());
    }

    #[test]
    fn test_threshold_u64_max_is_in_range() {
        // The range guard is exact; domain checks are the engine's job
        assert_eq!(
            threshold_arg(&Arg::Int(u64::MAX as i128)).unwrap(),
            NanoTime::from_nanos(u64::MAX)
        );
    }

    #[test]
    fn test_threshold_rejects_non_int() {
        for bad in [Arg::Null, Arg::Bool(true), Arg::Float(1.0), Arg::from("0")] {
            assert!(matches!(
                threshold_arg(&bad).unwrap_err(),
                Error::TypeArgument(_)
            ));
        }
    }

    #[test]
    fn test_policy_null_is_absent() {
        assert_eq!(policy_arg(&Arg::Null).unwrap(), None);
    }

    #[test]
    fn test_policy_timeout_parsed() {
        let policy = policy_arg(&policy_map(Arg::Int(1000))).unwrap().unwrap();
        assert_eq!(policy.timeout, Some(Duration::from_millis(1000)));
    }

    #[test]
    fn test_policy_without_timeout_is_default() {
        let policy = policy_arg(&Arg::Map(HashMap::new())).unwrap().unwrap();
        assert_eq!(policy.timeout, None);
    }

    #[test]
    fn test_policy_unknown_keys_ignored() {
        let mut map = HashMap::new();
        map.insert("compression".to_string(), Arg::Bool(true));
        map.insert("timeout".to_string(), Arg::Int(250));
        let policy = policy_arg(&Arg::Map(map)).unwrap().unwrap();
        assert_eq!(policy.timeout, Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_policy_timeout_type_and_range() {
        assert!(matches!(
            policy_arg(&policy_map(Arg::from("soon"))).unwrap_err(),
            Error::TypeArgument(_)
        ));
        assert!(matches!(
            policy_arg(&policy_map(Arg::Int(-5))).unwrap_err(),
            Error::RangeUnderflow(_)
        ));
        assert!(matches!(
            policy_arg(&policy_map(Arg::Int(u32::MAX as i128 + 1))).unwrap_err(),
            Error::RangeOverflow(_)
        ));
    }

    #[test]
    fn test_policy_rejects_non_map() {
        assert!(matches!(
            policy_arg(&Arg::Int(1000)).unwrap_err(),
            Error::TypeArgument(_)
        ));
    }

    #[test]
    fn test_parse_full_argument_list() {
        let parsed = parse_truncate_args(&[
            Arg::from("test"),
            Arg::from("demo"),
            Arg::Int(0),
            policy_map(Arg::Int(500)),
        ])
        .unwrap();
        assert_eq!(parsed.namespace.as_str(), "test");
        assert_eq!(parsed.set.unwrap().as_str(), "demo");
        assert_eq!(parsed.threshold, NanoTime::from_nanos(0));
        assert_eq!(
            parsed.policy.unwrap().timeout,
            Some(Duration::from_millis(500))
        );
    }

    #[test]
    fn test_parse_policy_is_optional() {
        let parsed =
            parse_truncate_args(&[Arg::from("test"), Arg::from(""), Arg::Int(0)]).unwrap();
        assert_eq!(parsed.set, None);
        assert_eq!(parsed.policy, None);
    }

    #[test]
    fn test_parse_arity_errors() {
        assert!(matches!(
            parse_truncate_args(&[]).unwrap_err(),
            Error::TypeArgument(_)
        ));
        assert!(matches!(
            parse_truncate_args(&[Arg::from("test")]).unwrap_err(),
            Error::TypeArgument(_)
        ));
        assert!(matches!(
            parse_truncate_args(&[Arg::from("test"), Arg::from("demo")]).unwrap_err(),
            Error::TypeArgument(_)
        ));
        assert!(matches!(
            parse_truncate_args(&[
                Arg::from("test"),
                Arg::from("demo"),
                Arg::Int(0),
                Arg::Null,
                Arg::Null
            ])
            .unwrap_err(),
            Error::TypeArgument(_)
        ));
    }

    proptest::proptest! {
        #[test]
        fn prop_threshold_classification_is_total(n in proptest::num::i128::ANY) {
            match threshold_arg(&Arg::Int(n)) {
                Ok(t) => {
                    proptest::prop_assert!(n >= 0 && n <= u64::MAX as i128);
                    proptest::prop_assert_eq!(t.as_nanos() as i128, n);
                }
                Err(Error::RangeUnderflow(_)) => proptest::prop_assert!(n < 0),
                Err(Error::RangeOverflow(_)) => proptest::prop_assert!(n > u64::MAX as i128),
                Err(other) => proptest::prop_assert!(false, "unexpected error {:?}", other),
            }
        }
    }

    #[test]
    fn test_parse_reports_first_bad_argument() {
        let err = parse_truncate_args(&[Arg::Int(1), Arg::Float(2.0), Arg::from("3")]).unwrap_err();
        assert!(matches!(err, Error::TypeArgument(_)));
        assert!(err.to_string().contains("namespace"));
    }
}
