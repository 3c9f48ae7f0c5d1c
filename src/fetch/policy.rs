use chrono::{Duration, NaiveDateTime};

/// Where the domain list comes from on this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Network,
    Cache { age: Duration },
}

/// The cache is used only while it is younger than `ttl_seconds` (strictly),
/// or when forced; a missing cache file always means a network call.
pub fn choose_source(
    now: NaiveDateTime,
    last_performed: NaiveDateTime,
    ttl_seconds: i64,
    force_local: bool,
    cache_exists: bool,
) -> Source {
    if !cache_exists {
        return Source::Network;
    }

    let age = now - last_performed;
    let ttl = Duration::try_seconds(ttl_seconds).unwrap_or(if ttl_seconds < 0 {
        Duration::MIN
    } else {
        Duration::MAX
    });
    if force_local || age < ttl {
        Source::Cache { age }
    } else {
        Source::Network
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(seconds: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            + Duration::seconds(seconds)
    }

    #[test]
    fn test_fresh_cache_is_used() {
        assert_eq!(
            choose_source(at(239), at(0), 240, false, true),
            Source::Cache {
                age: Duration::seconds(239)
            }
        );
    }

    #[test]
    fn test_ttl_boundary_goes_to_network() {
        assert_eq!(choose_source(at(240), at(0), 240, false, true), Source::Network);
        assert_eq!(choose_source(at(241), at(0), 240, false, true), Source::Network);
    }

    #[test]
    fn test_force_local_uses_stale_cache() {
        assert!(matches!(
            choose_source(at(10_000), at(0), 240, true, true),
            Source::Cache { .. }
        ));
    }

    #[test]
    fn test_missing_cache_requires_network() {
        assert_eq!(choose_source(at(1), at(0), 240, false, false), Source::Network);
        assert_eq!(choose_source(at(1), at(0), 240, true, false), Source::Network);
    }

    #[test]
    fn test_zero_ttl_always_fetches() {
        assert_eq!(choose_source(at(0), at(0), 0, false, true), Source::Network);
    }
}
