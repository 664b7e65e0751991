#[cfg(test)]
mod tests {
    use indoc::indoc;
    use serde_json::json;
    use std::sync::Arc;
    use tank_adapter::{
        Adapter, DriverError, Events, FacadeLogger, Level, ParamType, RowSet, Value, params,
    };
    use tank_adapter_tests::{
        MemoryConnection, MemoryLogger, NO_SUCH_TABLE, Recorder, init_logs, rows,
    };

    const SELECT_USERS: &str = "SELECT id, name FROM user WHERE active = ?";
    const DELETE_USERS: &str = "DELETE FROM user WHERE active = ?";
    const INSERT_USER: &str = "INSERT INTO user (name) VALUES (?)";
    const DUPLICATE: &str = "INSERT INTO user (id) VALUES (?)";

    fn users() -> RowSet {
        rows(
            ["id", "name"],
            vec![
                [Value::from(1), Value::from("Alice")],
                [Value::from(2), Value::from("Bob")],
            ],
        )
    }

    fn connection() -> MemoryConnection {
        MemoryConnection::new()
            .with_rows(SELECT_USERS, users())
            .with_update(DELETE_USERS, 3)
            .with_update(INSERT_USER, 1)
            .with_failure(DUPLICATE, DriverError::new(1062, "Duplicate entry '1'"))
    }

    fn instrumented() -> (Adapter<MemoryConnection>, Arc<Recorder>, Arc<MemoryLogger>) {
        let recorder = Recorder::new();
        let logger = MemoryLogger::new();
        let adapter = Adapter::new(connection())
            .with_event_manager(Arc::new(Recorder::manager(&recorder)))
            .with_logger(logger.clone());
        (adapter, recorder, logger)
    }

    #[test]
    fn adapter_query() {
        init_logs();
        let (mut adapter, recorder, _) = instrumented();
        let params = params![true];
        let result = adapter
            .query(SELECT_USERS, &params, &[ParamType::Boolean])
            .expect("The query should succeed");
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].get_column("name"), Some(&Value::from("Alice")));
        assert_eq!(result, users());
        assert_eq!(recorder.names(), [Events::BeforeQuery, Events::AfterQuery]);

        let recorded = recorder.recorded();
        assert_eq!(
            recorded[0].json,
            json!({
                "sentence": SELECT_USERS,
                "params": [true],
                "types": ["boolean"],
            })
        );
        assert_eq!(recorded[1].rows, Some(2));
        assert_eq!(recorded[1].affected, None);
        assert_eq!(recorded[1].json["sentence"], SELECT_USERS);
        assert!(recorded[1].json["performance"]["run_time"].is_f64());
        assert!(recorded[1].json.get("result").is_none());
    }

    #[test]
    fn adapter_query_trims_statement() {
        init_logs();
        let (mut adapter, recorder, _) = instrumented();
        let sql = indoc! {"

            SELECT id, name FROM user WHERE active = ?
        "};
        let result = adapter.query(sql, &params![false], &[]).unwrap();
        assert_eq!(result.len(), 2);
        assert!(
            recorder
                .recorded()
                .iter()
                .all(|v| v.sentence == SELECT_USERS)
        );
        let executed = adapter.connection().executed();
        assert_eq!(executed.len(), 1);
        assert_eq!(executed[0].sentence, SELECT_USERS);
        assert_eq!(executed[0].params, params![false]);
        assert!(executed[0].types.is_empty());
    }

    #[test]
    fn adapter_non_query() {
        init_logs();
        let (mut adapter, recorder, _) = instrumented();
        let affected = adapter
            .non_query(DELETE_USERS, &params![false], &[ParamType::Boolean])
            .unwrap();
        assert_eq!(affected, 3);
        assert_eq!(
            recorder.names(),
            [Events::BeforeNonQuery, Events::AfterNonQuery]
        );
        let after = &recorder.recorded()[1];
        assert_eq!(after.affected, Some(3));
        assert_eq!(after.rows, None);
        assert_eq!(
            after.json.as_object().map(|v| v.len()),
            Some(4),
            "Expected sentence, params, types and performance"
        );
    }

    #[test]
    fn adapter_error() {
        init_logs();
        let (mut adapter, recorder, logger) = instrumented();
        let error = adapter
            .non_query(DUPLICATE, &params![1], &[ParamType::Integer])
            .expect_err("The insert must fail");
        assert_eq!(error.code(), Some(1062));
        assert!(error.message().contains("Duplicate entry '1'"));
        assert_eq!(recorder.names(), [Events::BeforeNonQuery, Events::OnError]);

        let recorded = recorder.recorded();
        assert_eq!(recorded[1].error_code, Some(1062));
        assert_eq!(recorded[1].json["error"]["code"], 1062);
        assert_eq!(recorded[1].json["params"], json!([1]));

        let lines = logger.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, Level::Error);
        assert_eq!(
            lines[0].1,
            format!(
                "Error in the tank_adapter::Adapter::non_query(...) -> {}",
                error
            )
        );
    }

    #[test]
    fn adapter_query_error() {
        init_logs();
        let (mut adapter, recorder, logger) = instrumented();
        let error = adapter.query("SELECT * FROM missing", &[], &[]).unwrap_err();
        assert_eq!(error.code(), Some(NO_SUCH_TABLE));
        assert_eq!(recorder.names(), [Events::BeforeQuery, Events::OnError]);
        assert!(
            !recorder
                .names()
                .iter()
                .any(|v| matches!(v, Events::AfterQuery | Events::AfterNonQuery))
        );
        assert!(
            logger.lines()[0]
                .1
                .starts_with("Error in the tank_adapter::Adapter::query(...) -> ")
        );
    }

    #[test]
    fn adapter_performance_log() {
        init_logs();
        let (mut adapter, _, logger) = instrumented();
        adapter
            .query(SELECT_USERS, &params!["yes"], &[ParamType::String])
            .unwrap();
        let lines = logger.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, Level::Info);
        let record: serde_json::Value = serde_json::from_str(&lines[0].1).unwrap();
        let mut keys: Vec<_> = record.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, ["memory", "prettyRunTime", "run_time", "sql"]);
        assert_eq!(
            record["sql"],
            "SELECT id, name FROM user WHERE active = 'yes'"
        );
        assert!(record["run_time"].as_f64().unwrap() >= 0.0);
        assert!(record["prettyRunTime"].is_string());
        assert!(record["memory"].is_u64());
    }

    #[test]
    fn adapter_performance_log_truncated() {
        init_logs();
        let ids = vec!["?"; 200].join(", ");
        let sentence = format!("UPDATE user SET active = false WHERE id IN ({})", ids);
        let params: Vec<Value> = (0..200).map(Value::from).collect();
        let recorder = Recorder::new();
        let logger = MemoryLogger::new();
        let mut adapter = Adapter::new(MemoryConnection::new().with_update(&sentence, 200))
            .with_event_manager(Arc::new(Recorder::manager(&recorder)))
            .with_logger(logger.clone());
        let affected = adapter.non_query(&sentence, &params, &[]).unwrap();
        assert_eq!(affected, 200);

        let lines = logger.lines();
        assert_eq!(lines.len(), 1);
        let record: serde_json::Value = serde_json::from_str(&lines[0].1).unwrap();
        let sql = record["sql"].as_str().unwrap();
        assert!(sql.len() <= 500, "Logged sql is {} bytes long", sql.len());
        assert!(sql.ends_with("..."));
        assert!(sql.starts_with("UPDATE user SET active = false WHERE id IN (0, 1, 2, 3"));
        assert!(
            recorder
                .recorded()
                .iter()
                .all(|v| v.sentence == sentence)
        );
    }

    #[test]
    fn adapter_without_collaborators() {
        init_logs();
        let mut adapter = Adapter::new(connection());
        assert!(adapter.logger().is_none());
        assert!(adapter.event_manager().is_none());
        let result = adapter.query(SELECT_USERS, &params![true], &[]).unwrap();
        assert_eq!(result.len(), 2);
        let affected = adapter.non_query(DELETE_USERS, &params![true], &[]).unwrap();
        assert_eq!(affected, 3);
        let error = adapter.non_query(DUPLICATE, &params![1], &[]).unwrap_err();
        assert_eq!(error.code(), Some(1062));
        adapter.log_info("Nothing to log into");
        assert_eq!(adapter.connection().executed().len(), 3);
    }

    #[test]
    fn adapter_last_insert_id() {
        init_logs();
        let (mut adapter, recorder, logger) = instrumented();
        assert_eq!(adapter.last_insert_id().unwrap(), "0");
        adapter.non_query(INSERT_USER, &params!["Carol"], &[]).unwrap();
        adapter.non_query(INSERT_USER, &params!["Dave"], &[]).unwrap();
        let before = recorder.recorded().len();
        let lines = logger.lines().len();
        assert_eq!(adapter.last_insert_id().unwrap(), "2");
        assert_eq!(recorder.recorded().len(), before);
        assert_eq!(logger.lines().len(), lines);
    }

    #[test]
    fn adapter_set_collaborators() {
        init_logs();
        let mut adapter = Adapter::new(connection());
        adapter.non_query(DELETE_USERS, &params![true], &[]).unwrap();

        let recorder = Recorder::new();
        let logger = MemoryLogger::new();
        adapter
            .set_event_manager(Arc::new(Recorder::manager(&recorder)))
            .set_logger(logger.clone());
        adapter.non_query(DELETE_USERS, &params![true], &[]).unwrap();
        assert_eq!(
            recorder.names(),
            [Events::BeforeNonQuery, Events::AfterNonQuery]
        );
        assert_eq!(logger.lines().len(), 1);

        adapter.log(Level::Warn, "custom");
        adapter.log_error("caller", &DriverError::new(1, "boom"));
        let lines = logger.lines();
        assert_eq!(lines[1], (Level::Warn, "custom".to_string()));
        assert_eq!(
            lines[2],
            (Level::Error, "Error in the caller(...) -> boom".to_string())
        );
    }

    #[test]
    fn adapter_closure_logger() {
        init_logs();
        let lines = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = lines.clone();
        let mut adapter = Adapter::new(connection()).with_logger(Arc::new(
            move |level: Level, message: &str| {
                sink.lock().unwrap().push(format!("{level}: {message}"));
            },
        ));
        adapter.non_query(DELETE_USERS, &params![true], &[]).unwrap();
        let lines = lines.lock().unwrap();
        assert_eq!(lines.len(), 1);
        assert!(
            lines[0].starts_with(r#"INFO: {"sql":"DELETE FROM user WHERE active = true","#)
        );
    }

    #[test]
    fn adapter_facade_logger() {
        init_logs();
        let mut adapter = Adapter::new(connection()).with_logger(Arc::new(FacadeLogger));
        assert!(adapter.logger().is_some());
        let result = adapter.query(SELECT_USERS, &params![true], &[]).unwrap();
        assert_eq!(result, users());
        let error = adapter.query("SELECT 1", &[], &[]).unwrap_err();
        assert_eq!(error.code(), Some(NO_SUCH_TABLE));
    }
}
