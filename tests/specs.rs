//! Workspace-level integration specs.
//!
//! These exercise `qjb-engine::Broker` end to end the way a client
//! driving the wire protocol would, plus the `qjb` CLI's argument
//! surface via `assert_cmd`. Per-module unit tests already cover the
//! individual data structures; these cover the scenarios that only
//! make sense as a sequence of operations against one broker.

mod engine {
    use qjb_core::JobState;
    use qjb_engine::{Broker, CompleteOutcome};
    use serde_json::json;

    #[test]
    fn config_put_get_delete_round_trips() {
        use qjb_engine::ConfigQuery;

        let broker = Broker::new();
        broker.setconfig("testing", Some("foo".into()));

        let value = broker.getconfig(Some("testing")).expect("value was just set");
        assert!(matches!(value, ConfigQuery::Value(qjb_core::ConfigValue::Text(s)) if s == "foo"));

        let all = broker.getconfig(None).unwrap();
        let map = all.as_map().expect("getconfig() with no name returns the mapping");
        assert!(matches!(map.get("testing"), Some(qjb_core::ConfigValue::Text(s)) if s == "foo"));

        broker.setconfig("testing", None);
        assert!(broker.getconfig(Some("testing")).is_none());
    }

    #[test]
    fn scheduled_job_is_invisible_until_its_delay_elapses() {
        let broker = Broker::new();
        broker.put("q", "j1", json!({}), 0.0, 0, vec![], 10.0).unwrap();

        assert!(broker.pop("q", "w1", 1, 0.0, 60.0).is_empty());
        let popped = broker.pop("q", "w1", 1, 11.0, 60.0);
        assert_eq!(popped.into_iter().map(|j| j.id).collect::<Vec<_>>(), vec!["j1"]);
    }

    #[test]
    fn lower_priority_number_pops_first() {
        let broker = Broker::new();
        for i in 0..10 {
            let priority = -i;
            broker.put("q", &format!("j{i}"), json!({}), 0.0, priority, vec![], 0.0).unwrap();
        }

        let popped = broker.pop("q", "w1", 10, 0.0, 60.0);
        let ids: Vec<_> = popped.iter().map(|j| j.id.clone()).collect();
        assert_eq!(ids, vec!["j9", "j8", "j7", "j6", "j5", "j4", "j3", "j2", "j1", "j0"]);
    }

    #[test]
    fn lease_expires_and_is_stolen_by_another_worker() {
        let broker = Broker::new();
        broker.put("q", "j1", json!({}), 0.0, 0, vec![], 0.0).unwrap();

        let first = broker.pop("q", "worker-a", 1, 0.0, -10.0);
        assert_eq!(first.len(), 1);

        let second = broker.pop("q", "worker-b", 1, 5.0, 60.0);
        assert_eq!(second.into_iter().map(|j| j.id).collect::<Vec<_>>(), vec!["j1"]);

        assert_eq!(broker.heartbeat("j1", "worker-a", 5.0, None).unwrap(), None);
        let renewed = broker.heartbeat("j1", "worker-b", 5.0, None).unwrap();
        assert!(renewed.unwrap() >= 5.0);
    }

    #[test]
    fn complete_with_next_queue_advances_to_waiting() {
        let broker = Broker::new();
        broker.put("q", "j1", json!({}), 0.0, 0, vec![], 0.0).unwrap();
        broker.pop("q", "w1", 1, 0.0, 60.0);

        let outcome = broker.complete("j1", "w1", "q", 1.0, Some("q"), 0.0, None).unwrap();
        assert_eq!(outcome, Some(CompleteOutcome::Waiting));

        let job = broker.get("j1").expect("job still exists");
        assert_eq!(job.state, JobState::Waiting);
        assert_eq!(job.queue, "q");
        assert_eq!(job.worker, "");
        assert_eq!(job.history.len(), 2);
    }

    #[test]
    fn retention_by_count_keeps_only_the_newest_k() {
        let broker = Broker::new();
        broker.setconfig("jobs-history-count", Some(qjb_core::ConfigValue::from(10i64)));

        for i in 0..20 {
            let id = format!("j{i}");
            broker.put("q", &id, json!({}), 0.0, 0, vec![], 0.0).unwrap();
            broker.pop("q", "w1", 1, 0.0, 60.0);
            broker.complete(&id, "w1", "q", 1.0, None, 0.0, None).unwrap();
        }

        let mut remaining = 0;
        for i in 0..20 {
            if broker.get(&format!("j{i}")).is_some() {
                remaining += 1;
            }
        }
        assert_eq!(remaining, 10);
    }

    #[test]
    fn stats_wait_matches_the_known_sequence() {
        let broker = Broker::new();
        for i in 0..20 {
            broker.put("q", &format!("j{i}"), json!({}), 0.0, 0, vec![], 0.0).unwrap();
        }
        for i in 0..20 {
            broker.pop("q", "w1", 1, i as f64, 60.0);
        }

        let stats = broker.stats("q", 0.0);
        assert_eq!(stats.wait.count, 20);
        assert_eq!(stats.wait.mean(), Some(9.5));
        let std = stats.wait.std_dev().expect("count >= 2");
        assert!((std - 5.916_079_783_1).abs() < 1e-8);
        for bucket in 0..20 {
            assert_eq!(stats.wait.histogram[bucket], 1);
        }
    }

    #[test]
    fn cancel_invalidates_heartbeat_get_and_complete() {
        let broker = Broker::new();
        broker.put("q", "j1", json!({}), 0.0, 0, vec![], 0.0).unwrap();
        broker.pop("q", "w1", 1, 0.0, 60.0);

        broker.cancel("j1");

        assert!(broker.get("j1").is_none());
        assert_eq!(broker.heartbeat("j1", "w1", 0.0, None).unwrap(), None);
        assert_eq!(broker.complete("j1", "w1", "q", 0.0, None, 0.0, None).unwrap(), None);
    }

    #[test]
    fn fail_then_put_clears_the_failed_group() {
        let broker = Broker::new();
        broker.put("q", "j1", json!({}), 0.0, 0, vec![], 0.0).unwrap();
        broker.pop("q", "w1", 1, 0.0, 60.0);
        broker.fail("j1", "w1", "boom", "bad input", 0.0, None).unwrap();

        assert_eq!(*broker.failed_counts().get("boom").unwrap(), 1);

        broker.put("q", "j1", json!({}), 1.0, 0, vec![], 0.0).unwrap();
        assert!(broker.failed_counts().get("boom").is_none());
    }
}

mod cli {
    use assert_cmd::Command;
    use std::process::Output;

    fn qjb() -> Command {
        Command::cargo_bin("qjb").expect("qjb binary should be built by the workspace")
    }

    fn run(args: &[&str]) -> Output {
        qjb().args(args).output().expect("qjb should run")
    }

    #[test]
    fn no_args_shows_usage_and_exits_nonzero() {
        let output = run(&[]);
        assert!(!output.status.success());
        assert!(String::from_utf8_lossy(&output.stderr).contains("Usage:"));
    }

    #[test]
    fn help_shows_usage() {
        let output = run(&["--help"]);
        assert!(output.status.success());
        assert!(String::from_utf8_lossy(&output.stdout).contains("Usage:"));
    }

    #[test]
    fn put_without_queue_or_id_is_rejected_before_contacting_a_daemon() {
        let output = run(&["put", "--now", "0"]);
        assert!(!output.status.success());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("--queue") || stderr.contains("required"));
    }

    #[test]
    fn config_help_shows_get_and_set_subcommands() {
        let output = run(&["config", "--help"]);
        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("get"));
        assert!(stdout.contains("set"));
    }
}
