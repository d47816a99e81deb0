use logpipe::config::{ColumnSettings, Settings};
use logpipe::domain::Level;
use logpipe::Pipeline;
use tempfile::TempDir;

fn valid_settings(temp_dir: &TempDir) -> Settings {
    Settings {
        application_name: "billing-api".into(),
        application_version: Some("2.1.0".into()),
        minimum_level: Level::Information,
        level_overrides: vec![("billing".into(), Level::Debug)],
        clickhouse_host: "localhost".into(),
        clickhouse_port: 8123,
        clickhouse_user: "default".into(),
        clickhouse_password: "secret".into(),
        clickhouse_database: "logs".into(),
        usage_table: "usage_log".into(),
        // Table creation needs a live server; keep startup offline here.
        auto_create_table: false,
        usage_columns: Vec::new(),
        diagnostics_path: temp_dir
            .path()
            .join("diagnostics.json")
            .to_string_lossy()
            .into_owned(),
    }
}

#[tokio::test]
async fn test_build_from_valid_settings_succeeds() {
    let temp_dir = TempDir::new().unwrap();
    let pipeline = Pipeline::build_from_settings(&valid_settings(&temp_dir))
        .await
        .unwrap();

    let names: Vec<_> = pipeline
        .router()
        .routes()
        .iter()
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(names, ["usage", "diagnostics"]);
}

#[tokio::test]
async fn test_build_is_deterministic() {
    let temp_dir = TempDir::new().unwrap();
    let settings = valid_settings(&temp_dir);

    let first = Pipeline::build_from_settings(&settings).await.unwrap();
    let second = Pipeline::build_from_settings(&settings).await.unwrap();

    let names = |p: &Pipeline| -> Vec<String> {
        p.router()
            .routes()
            .iter()
            .map(|r| r.name.clone())
            .collect()
    };
    let filters = |p: &Pipeline| -> Vec<_> {
        p.router()
            .routes()
            .iter()
            .map(|r| r.filter.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(names(&first), names(&second));
    assert_eq!(filters(&first), filters(&second));
}

#[tokio::test]
async fn test_build_fails_fast_on_empty_host() {
    let temp_dir = TempDir::new().unwrap();
    let mut settings = valid_settings(&temp_dir);
    settings.clickhouse_host = String::new();

    let err = Pipeline::build_from_settings(&settings)
        .await
        .err()
        .expect("build must fail before any event is processed");
    assert!(err.to_string().contains("Host cannot be empty"));
}

#[tokio::test]
async fn test_build_fails_fast_on_zero_port() {
    let temp_dir = TempDir::new().unwrap();
    let mut settings = valid_settings(&temp_dir);
    settings.clickhouse_port = 0;

    assert!(Pipeline::build_from_settings(&settings).await.is_err());
}

#[tokio::test]
async fn test_build_fails_fast_on_malformed_table_name() {
    let temp_dir = TempDir::new().unwrap();
    let mut settings = valid_settings(&temp_dir);
    settings.usage_table = "usage log; drop table".into();

    assert!(Pipeline::build_from_settings(&settings).await.is_err());
}

#[tokio::test]
async fn test_build_fails_fast_on_unknown_column_type() {
    let temp_dir = TempDir::new().unwrap();
    let mut settings = valid_settings(&temp_dir);
    settings.usage_columns = vec![ColumnSettings {
        name: "UsageName".into(),
        allow_null: false,
        data_type: "nvarchar".into(),
        max_length: Some(200),
        indexed: true,
    }];

    let result = Pipeline::build_from_settings(&settings).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_build_fails_fast_on_duplicate_columns() {
    let temp_dir = TempDir::new().unwrap();
    let mut settings = valid_settings(&temp_dir);
    let column = ColumnSettings {
        name: "UsageName".into(),
        allow_null: false,
        data_type: "string".into(),
        max_length: None,
        indexed: false,
    };
    settings.usage_columns = vec![column.clone(), column];

    assert!(Pipeline::build_from_settings(&settings).await.is_err());
}
